// Shared work queue - one producer side, a fixed set of competing consumers

use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

/// Multi-consumer FIFO queue drained by a fixed number of long-lived workers.
///
/// Items are handed out in send order. Each item goes to exactly one
/// consumer. `pull` returns `None` once every sender is dropped and the queue
/// is empty, or as soon as the given token fires.
pub struct WorkQueue<T> {
    rx: Arc<Mutex<mpsc::Receiver<T>>>,
}

impl<T> Clone for WorkQueue<T> {
    fn clone(&self) -> Self {
        Self {
            rx: Arc::clone(&self.rx),
        }
    }
}

/// Create a bounded work queue. Senders block once `capacity` items wait.
pub fn work_queue<T>(capacity: usize) -> (mpsc::Sender<T>, WorkQueue<T>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (
        tx,
        WorkQueue {
            rx: Arc::new(Mutex::new(rx)),
        },
    )
}

impl<T> WorkQueue<T> {
    /// Wait for the next item. Cancellation wins over a ready item.
    pub async fn pull(&self, cancel: &CancellationToken) -> Option<T> {
        if cancel.is_cancelled() {
            return None;
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            item = async { self.rx.lock().await.recv().await } => item,
        }
    }

    /// Remove and return everything still queued without waiting for senders.
    pub async fn drain(&self) -> Vec<T> {
        let mut rx = self.rx.lock().await;
        let mut rest = Vec::new();
        while let Ok(item) = rx.try_recv() {
            rest.push(item);
        }
        rest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pull_in_send_order_then_none() {
        let (tx, queue) = work_queue(4);
        let token = CancellationToken::new();

        tx.send(1).await.unwrap();
        tx.send(2).await.unwrap();
        drop(tx);

        assert_eq!(queue.pull(&token).await, Some(1));
        assert_eq!(queue.pull(&token).await, Some(2));
        assert_eq!(queue.pull(&token).await, None);
    }

    #[tokio::test]
    async fn test_cancelled_pull_leaves_items_queued() {
        let (tx, queue) = work_queue(4);
        let token = CancellationToken::new();

        tx.send("a").await.unwrap();
        tx.send("b").await.unwrap();
        token.cancel();

        assert_eq!(queue.pull(&token).await, None);
        assert_eq!(queue.drain().await, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_blocked_pull_released_by_cancel() {
        let (_tx, queue) = work_queue::<u32>(1);
        let token = CancellationToken::new();

        let waiter = {
            let queue = queue.clone();
            let token = token.clone();
            tokio::spawn(async move { queue.pull(&token).await })
        };

        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        token.cancel();

        let pulled = tokio::time::timeout(std::time::Duration::from_secs(1), waiter)
            .await
            .expect("pull should return after cancel")
            .unwrap();
        assert_eq!(pulled, None);
    }
}
