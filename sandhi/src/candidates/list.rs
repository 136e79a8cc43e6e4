//! Candidate List: ordered candidates with a tracked selection.
//!
//! The selection is a subset of the list. Removing candidates that are
//! selected moves the selection to the candidate that would have been
//! selected next, so a reviewer stepping through matches always lands on a
//! neighbour of what was just handled.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use super::listener::CandidateListListener;
use super::{Candidate, CandidateKey};
use crate::features::FeatureId;

/// Ordered, mutable list of candidates.
#[derive(Default)]
pub struct CandidateList {
    candidates: Vec<Candidate>,
    /// Selected keys; always a subset of the list's keys.
    selected: HashSet<CandidateKey>,
    listeners: Vec<Arc<dyn CandidateListListener>>,
}

impl CandidateList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a list from candidates. Duplicate keys are dropped.
    pub fn from_candidates(candidates: impl IntoIterator<Item = Candidate>) -> Self {
        let mut list = Self::new();
        list.add_all(candidates);
        list
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Number of candidates
    #[inline]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// True if the list is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Candidate at `index`
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Candidate> {
        self.candidates.get(index)
    }

    /// Candidates in list order
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.candidates.iter()
    }

    /// Position of the candidate with `key`
    pub fn index_of(&self, key: &CandidateKey) -> Option<usize> {
        self.candidates.iter().position(|c| c.key() == *key)
    }

    /// True if a candidate with `key` is present
    pub fn contains(&self, key: &CandidateKey) -> bool {
        self.index_of(key).is_some()
    }

    /// Candidate whose reference feature is `id`
    pub fn candidate_for_reference(&self, id: FeatureId) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.reference().id() == id)
    }

    /// Candidate whose subject feature is `id`
    pub fn candidate_for_subject(&self, id: FeatureId) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.subject().id() == id)
    }

    /// True if any candidate involves feature `id` on either side
    pub fn has_candidate(&self, id: FeatureId) -> bool {
        self.candidates.iter().any(|c| c.involves(id))
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Append a candidate. Returns false if its key is already present.
    pub fn add(&mut self, candidate: Candidate) -> bool {
        self.add_all(std::iter::once(candidate)) == 1
    }

    /// Append candidates, skipping keys already present.
    ///
    /// Fires `list_changed` once if anything was added.
    ///
    /// # Returns
    /// Number of candidates added.
    pub fn add_all(&mut self, candidates: impl IntoIterator<Item = Candidate>) -> usize {
        let mut keys: HashSet<CandidateKey> = self.candidates.iter().map(Candidate::key).collect();
        let mut added = 0;
        for candidate in candidates {
            if keys.insert(candidate.key()) {
                self.candidates.push(candidate);
                added += 1;
            } else {
                log::debug!("Skipping duplicate candidate {}", candidate.key());
            }
        }
        if added > 0 {
            self.fire_list_changed();
        }
        added
    }

    /// Remove the candidate with `key`.
    pub fn remove(&mut self, key: &CandidateKey) -> Option<Candidate> {
        self.remove_all(std::slice::from_ref(key)).pop()
    }

    /// Remove candidates by key, in list order.
    ///
    /// If any removed candidate was selected, the selection shrinks to the
    /// survivors. When nothing survives, the candidate that
    /// [`find_next_selection`](Self::find_next_selection) reported before the
    /// removal becomes the selection, provided it was not removed too.
    /// `selection_changed` fires before `list_changed`.
    ///
    /// # Returns
    /// The removed candidates, suitable for [`add_all`](Self::add_all).
    pub fn remove_all(&mut self, keys: &[CandidateKey]) -> Vec<Candidate> {
        if keys.is_empty() || self.candidates.is_empty() {
            return Vec::new();
        }
        let doomed: HashSet<CandidateKey> = keys.iter().copied().collect();
        let next = self.find_next_selection().map(Candidate::key);

        let (removed, kept): (Vec<Candidate>, Vec<Candidate>) = std::mem::take(&mut self.candidates)
            .into_iter()
            .partition(|c| doomed.contains(&c.key()));
        self.candidates = kept;

        let before = self.selected.len();
        self.selected.retain(|k| !doomed.contains(k));
        if self.selected.len() != before {
            if self.selected.is_empty() {
                if let Some(next) = next.filter(|k| !doomed.contains(k)) {
                    self.selected.insert(next);
                }
            }
            self.fire_selection_changed();
        }

        if !removed.is_empty() {
            log::debug!(
                "Removed {} candidates, {} remain",
                removed.len(),
                self.candidates.len()
            );
            self.fire_list_changed();
        }
        removed
    }

    /// Remove every candidate involving any of `ids`.
    pub fn remove_features(&mut self, ids: &[FeatureId]) -> Vec<Candidate> {
        let ids: HashSet<FeatureId> = ids.iter().copied().collect();
        let keys: Vec<CandidateKey> = self
            .candidates
            .iter()
            .map(Candidate::key)
            .filter(|k| ids.contains(&k.reference) || ids.contains(&k.subject))
            .collect();
        self.remove_all(&keys)
    }

    /// Remove all candidates and clear the selection.
    pub fn clear(&mut self) {
        if self.candidates.is_empty() {
            return;
        }
        self.clear_selection();
        self.candidates.clear();
        self.fire_list_changed();
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// Selected candidates, in list order
    pub fn selected(&self) -> Vec<&Candidate> {
        self.candidates
            .iter()
            .filter(|c| self.selected.contains(&c.key()))
            .collect()
    }

    /// Selected keys, in list order
    pub fn selected_keys(&self) -> Vec<CandidateKey> {
        self.selected().into_iter().map(Candidate::key).collect()
    }

    /// Number of selected candidates
    #[inline]
    pub fn selection_len(&self) -> usize {
        self.selected.len()
    }

    /// True if the candidate with `key` is selected
    #[inline]
    pub fn is_selected(&self, key: &CandidateKey) -> bool {
        self.selected.contains(key)
    }

    /// Replace the selection.
    ///
    /// Keys not present in the list are ignored. Fires `selection_changed`
    /// only if the selected set actually changes.
    pub fn set_selected(&mut self, keys: impl IntoIterator<Item = CandidateKey>) {
        let present: HashSet<CandidateKey> = self.candidates.iter().map(Candidate::key).collect();
        let wanted: HashSet<CandidateKey> = keys.into_iter().filter(|k| present.contains(k)).collect();
        if wanted == self.selected {
            return;
        }
        self.selected = wanted;
        self.fire_selection_changed();
    }

    /// Select exactly one candidate.
    pub fn select(&mut self, key: CandidateKey) {
        self.set_selected(std::iter::once(key));
    }

    /// Deselect everything.
    pub fn clear_selection(&mut self) {
        self.set_selected(std::iter::empty());
    }

    /// Candidate to select after the current selection is consumed.
    ///
    /// 1. The first unselected candidate sitting between two selected
    ///    neighbours (a gap in the selection).
    /// 2. Otherwise the candidate after the last selected one.
    /// 3. Otherwise the candidate before the first selected one.
    ///
    /// With no selection this is the first candidate. `None` when every
    /// candidate is selected or the list is empty.
    pub fn find_next_selection(&self) -> Option<&Candidate> {
        let is_sel = |i: usize| self.selected.contains(&self.candidates[i].key());
        let len = self.candidates.len();

        for i in 1..len.saturating_sub(1) {
            if !is_sel(i) && is_sel(i - 1) && is_sel(i + 1) {
                return self.candidates.get(i);
            }
        }

        let first = (0..len).find(|&i| is_sel(i));
        let last = (0..len).rev().find(|&i| is_sel(i));
        match (first, last) {
            (Some(first), Some(last)) => self
                .candidates
                .get(last + 1)
                .or_else(|| first.checked_sub(1).and_then(|i| self.candidates.get(i))),
            _ => self.candidates.first(),
        }
    }

    // ========================================================================
    // Listeners
    // ========================================================================

    /// Register a listener. Registering the same listener twice is a no-op.
    pub fn add_listener(&mut self, listener: Arc<dyn CandidateListListener>) {
        if !self.listeners.iter().any(|l| Arc::ptr_eq(l, &listener)) {
            self.listeners.push(listener);
        }
    }

    /// Unregister a listener. Returns false if it was not registered.
    pub fn remove_listener(&mut self, listener: &Arc<dyn CandidateListListener>) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| !Arc::ptr_eq(l, listener));
        self.listeners.len() != before
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn fire_list_changed(&self) {
        for listener in &self.listeners {
            listener.list_changed(self);
        }
    }

    fn fire_selection_changed(&self) {
        if self.listeners.is_empty() {
            return;
        }
        let selected = self.selected();
        for listener in &self.listeners {
            listener.selection_changed(&selected);
        }
    }
}

impl<'a> IntoIterator for &'a CandidateList {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}

impl fmt::Debug for CandidateList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CandidateList")
            .field("candidates", &self.candidates.len())
            .field("selected", &self.selected.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
