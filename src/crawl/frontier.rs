// src/crawl/frontier.rs
// =============================================================================
// The crawl's shared state: what is queued, what has been seen, what is done.
//
// The dispatcher pops from it, and worker tasks push discoveries and mark
// pages done. All three collections sit behind ONE mutex, so "is this link new?"
// and "queue it" happen as one step and no link can be queued twice.
//
// The lock is never held across an .await. When the dispatcher has nothing
// to pop it parks on a Notify, and workers ring it whenever they change
// something.
//
// Invariant: done ⊆ seen.
// =============================================================================

use std::collections::{BTreeSet, VecDeque};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::time::{timeout_at, Instant};

use crate::link::{Hyperlink, HyperlinkSet};

/// What the dispatcher gets when it asks for more work
#[derive(Debug, PartialEq, Eq)]
pub enum Next {
    /// A link to visit
    Link(Hyperlink),
    /// Every seen link is done
    Complete,
    /// Nothing arrived within the wait
    Idle,
}

#[derive(Debug, Default)]
struct State {
    queue: VecDeque<Hyperlink>,
    seen: HyperlinkSet,
    done: HyperlinkSet,
}

impl State {
    fn is_complete(&self) -> bool {
        // done ⊆ seen, so equal sizes means equal sets
        !self.seen.is_empty() && self.seen.len() == self.done.len()
    }

    fn admit(&mut self, link: Hyperlink) -> bool {
        if self.seen.insert(link.clone()) {
            self.queue.push_back(link);
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Default)]
pub struct Frontier {
    state: Mutex<State>,
    wakeup: Notify,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `link` unless it was seen before. Returns true if queued.
    pub fn admit(&self, link: Hyperlink) -> bool {
        let admitted = self.state.lock().admit(link);
        if admitted {
            self.wakeup.notify_one();
        }
        admitted
    }

    /// Queues every unseen link in `links`, then marks `page` done.
    /// Returns how many links were new.
    pub fn expand(&self, page: &Hyperlink, links: HyperlinkSet) -> usize {
        let admitted = {
            let mut state = self.state.lock();
            let admitted = links
                .into_iter()
                .filter(|link| state.admit(link.clone()))
                .count();
            state.done.insert(page.clone());
            admitted
        };
        self.wakeup.notify_one();
        admitted
    }

    /// Marks `page` done without queueing anything (a leaf)
    pub fn mark_done(&self, page: &Hyperlink) {
        self.state.lock().done.insert(page.clone());
        self.wakeup.notify_one();
    }

    pub fn is_done(&self, link: &Hyperlink) -> bool {
        self.state.lock().done.contains(link)
    }

    /// Waits up to `wait` for something to do.
    ///
    /// Completion is checked before the queue, so leftover queue entries
    /// don't keep a finished crawl alive. A `wait` too large
    /// to add to the clock means no deadline at all.
    pub async fn next(&self, wait: Duration) -> Next {
        let deadline = Instant::now().checked_add(wait);
        loop {
            {
                let mut state = self.state.lock();
                if state.is_complete() {
                    return Next::Complete;
                }
                if let Some(link) = state.queue.pop_front() {
                    return Next::Link(link);
                }
            }

            // notify_one stores a permit if nobody is waiting yet, so a
            // wakeup between unlock and here is not lost
            match deadline {
                Some(deadline) => {
                    if timeout_at(deadline, self.wakeup.notified()).await.is_err() {
                        return Next::Idle;
                    }
                }
                None => self.wakeup.notified().await,
            }
        }
    }

    /// Returns the done links as strings and empties everything
    pub fn drain_results(&self) -> BTreeSet<String> {
        let state = std::mem::take(&mut *self.state.lock());
        state
            .done
            .into_iter()
            .map(|link| link.to_string())
            .collect()
    }

    #[cfg(test)]
    fn seen_count(&self) -> usize {
        self.state.lock().seen.len()
    }
}
