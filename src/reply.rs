//! Simulated-reply scheduling.
//!
//! Every outgoing message schedules exactly one reply task. Tasks are tracked
//! per contact id so pending timers can be aborted on shutdown instead of
//! outliving the terminal session. A reply whose contact is no longer
//! selected when the timer fires is still delivered; the store decides
//! whether it renders or queues (see `ChatStore::apply_reply`).

use std::collections::HashMap;
use std::time::Duration;

use log::{debug, info};
use rand::Rng;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::roster;

/// Default randomized-delay window, in milliseconds. Half-open: replies fire
/// within [1000, 3000).
pub const DEFAULT_DELAY_MS: (u64, u64) = (1000, 3000);

/// A fired reply: which contact it belongs to and the canned line to append.
/// The receiver stamps the display time on delivery.
pub type Reply = (u32, &'static str);

pub struct ReplyScheduler {
    tx: mpsc::UnboundedSender<Reply>,
    pending: HashMap<u32, Vec<JoinHandle<()>>>,
    delay_ms: (u64, u64),
}

impl ReplyScheduler {
    /// Create a scheduler delivering replies over `tx`, with the delay window
    /// from the config (min inclusive, max exclusive).
    pub fn new(tx: mpsc::UnboundedSender<Reply>, delay_ms: (u64, u64)) -> Self {
        ReplyScheduler {
            tx,
            pending: HashMap::new(),
            delay_ms,
        }
    }

    /// Schedule one simulated reply for `contact_id`.
    ///
    /// The delay and the reply line are drawn up front so the spawned task
    /// holds no RNG state across its await point.
    pub fn schedule(&mut self, contact_id: u32) {
        let (min, max) = self.delay_ms;
        let delay = Duration::from_millis(rand::thread_rng().gen_range(min..max));
        let line = roster::pick_reply();
        let tx = self.tx.clone();

        debug!(
            "scheduling reply for contact {} in {} ms",
            contact_id,
            delay.as_millis()
        );
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The receiver only goes away on shutdown; a failed send here
            // just means nobody is left to read the reply.
            let _ = tx.send((contact_id, line));
        });

        self.prune();
        self.pending.entry(contact_id).or_default().push(handle);
    }

    /// Abort pending replies for one contact.
    pub fn cancel(&mut self, contact_id: u32) {
        if let Some(handles) = self.pending.remove(&contact_id) {
            let count = handles.len();
            for handle in handles {
                handle.abort();
            }
            if count > 0 {
                info!(
                    "cancelled {} pending replies for contact {}",
                    count, contact_id
                );
            }
        }
    }

    /// Abort every pending reply. Called on shutdown.
    pub fn cancel_all(&mut self) {
        for (_, handles) in self.pending.drain() {
            for handle in handles {
                handle.abort();
            }
        }
    }

    /// Number of reply tasks still outstanding.
    pub fn pending_count(&mut self) -> usize {
        self.prune();
        self.pending.values().map(Vec::len).sum()
    }

    // Drop handles of tasks that have already fired.
    fn prune(&mut self) {
        for handles in self.pending.values_mut() {
            handles.retain(|h| !h.is_finished());
        }
        self.pending.retain(|_, handles| !handles.is_empty());
    }
}

impl Drop for ReplyScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::timeout;

    #[tokio::test]
    async fn schedule_delivers_one_reply_from_the_pool() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = ReplyScheduler::new(tx, (1, 2));

        scheduler.schedule(7);
        let (contact_id, line) = timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("reply timer never fired")
            .expect("channel closed");

        assert_eq!(contact_id, 7);
        assert!(roster::REPLY_POOL.contains(&line));
    }

    #[tokio::test]
    async fn each_send_gets_its_own_reply() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = ReplyScheduler::new(tx, (1, 2));

        scheduler.schedule(1);
        scheduler.schedule(1);
        scheduler.schedule(2);

        let mut delivered = Vec::new();
        for _ in 0..3 {
            let (id, _) = timeout(Duration::from_secs(2), rx.recv())
                .await
                .expect("reply timer never fired")
                .expect("channel closed");
            delivered.push(id);
        }
        delivered.sort_unstable();
        assert_eq!(delivered, vec![1, 1, 2]);
    }

    #[tokio::test]
    async fn cancel_aborts_pending_replies() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = ReplyScheduler::new(tx, (200, 201));

        scheduler.schedule(3);
        scheduler.cancel(3);
        assert_eq!(scheduler.pending_count(), 0);

        let outcome = timeout(Duration::from_millis(400), rx.recv()).await;
        assert!(outcome.is_err(), "cancelled reply must never be delivered");
    }
}
