//! Change notification for [`CandidateList`].
//!
//! Listeners receive shared references only, so they cannot mutate the list
//! from inside a notification. A listener that needs to react with a
//! mutation queues it, e.g. through a [`ChannelListener`], and the owner of
//! the list applies it after the notifying call returns.

use crossbeam_channel::{unbounded, Receiver, Sender};

use super::{Candidate, CandidateKey, CandidateList};

/// Observer of candidate list changes.
///
/// Notifications are synchronous and delivered in registration order.
pub trait CandidateListListener: Send + Sync {
    /// Candidates were added or removed.
    fn list_changed(&self, list: &CandidateList);

    /// The selected subset changed. `selected` is in list order.
    fn selection_changed(&self, selected: &[&Candidate]);
}

/// Change event forwarded by [`ChannelListener`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListEvent {
    /// Candidates were added or removed; `len` is the new size
    ListChanged {
        /// Number of candidates after the change
        len: usize,
    },
    /// The selection changed
    SelectionChanged {
        /// Selected candidate keys in list order
        selected: Vec<CandidateKey>,
    },
}

/// Listener forwarding events over a channel, for consumers on another
/// thread or for deferred reactions.
#[derive(Debug)]
pub struct ChannelListener {
    tx: Sender<ListEvent>,
}

impl ChannelListener {
    /// Create a listener and the receiving end of its channel.
    pub fn new() -> (Self, Receiver<ListEvent>) {
        let (tx, rx) = unbounded();
        (Self { tx }, rx)
    }

    fn send(&self, event: ListEvent) {
        if self.tx.send(event).is_err() {
            log::debug!("Candidate list event dropped: receiver disconnected");
        }
    }
}

impl CandidateListListener for ChannelListener {
    fn list_changed(&self, list: &CandidateList) {
        self.send(ListEvent::ListChanged { len: list.len() });
    }

    fn selection_changed(&self, selected: &[&Candidate]) {
        self.send(ListEvent::SelectionChanged {
            selected: selected.iter().map(|c| c.key()).collect(),
        });
    }
}
