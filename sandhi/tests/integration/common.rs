//! Shared fixtures: features, recording listener and a scripted host.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use sandhi::{
    Candidate, CandidateKey, CandidateList, CandidateListListener, ConflationHost, Feature,
    FeatureId, ProgressSink, ReplaceCommand, ReplaceError, ReversibleOperation, SimpleFeature,
    TargetCopy,
};

/// Initialise logging once; honours RUST_LOG.
pub fn init_logging() {
    env_logger::try_init().ok();
}

/// Point feature
pub fn point(id: u64, x: f64, y: f64) -> Feature {
    SimpleFeature::point(id, x, y).into_feature().unwrap()
}

/// Deterministic scatter of `n` points, reproducible without an RNG crate.
pub fn scatter(first_id: u64, n: usize, seed: u64, extent: f64) -> Vec<Feature> {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 11) as f64 / (1u64 << 53) as f64
    };
    (0..n)
        .map(|i| point(first_id + i as u64, next() * extent, next() * extent))
        .collect()
}

/// Event seen by [`RecordingListener`].
#[derive(Clone, Debug, PartialEq)]
pub enum Recorded {
    List(usize),
    Selection(Vec<CandidateKey>),
}

/// Listener recording every notification in order.
#[derive(Default)]
pub struct RecordingListener {
    events: Mutex<Vec<Recorded>>,
}

impl RecordingListener {
    pub fn attach(list: &mut CandidateList) -> Arc<Self> {
        let listener = Arc::new(Self::default());
        list.add_listener(listener.clone());
        listener
    }

    pub fn take(&self) -> Vec<Recorded> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl CandidateListListener for RecordingListener {
    fn list_changed(&self, list: &CandidateList) {
        self.events.lock().push(Recorded::List(list.len()));
    }

    fn selection_changed(&self, selected: &[&Candidate]) {
        self.events
            .lock()
            .push(Recorded::Selection(selected.iter().map(|c| c.key()).collect()));
    }
}

/// Listener appending `(tag, event)` to a log shared with other listeners.
pub struct TaggedListener {
    pub tag: &'static str,
    pub log: Arc<Mutex<Vec<(&'static str, Recorded)>>>,
}

impl CandidateListListener for TaggedListener {
    fn list_changed(&self, list: &CandidateList) {
        self.log.lock().push((self.tag, Recorded::List(list.len())));
    }

    fn selection_changed(&self, selected: &[&Candidate]) {
        let keys = selected.iter().map(|c| c.key()).collect();
        self.log.lock().push((self.tag, Recorded::Selection(keys)));
    }
}

/// Progress sink recording reports and cancelling after `cancel_after`
/// checks.
#[derive(Default)]
pub struct RecordingProgress {
    pub reports: Mutex<Vec<(usize, usize)>>,
    pub cancel_after: Option<usize>,
    pub checks: Mutex<usize>,
}

impl ProgressSink for RecordingProgress {
    fn report_progress(&self, done: usize, total: usize, _label: &str) {
        self.reports.lock().push((done, total));
    }

    fn is_cancelled(&self) -> bool {
        let mut checks = self.checks.lock();
        *checks += 1;
        self.cancel_after.is_some_and(|limit| *checks > limit)
    }
}

/// Operation tracking whether it is currently applied.
pub struct TrackedOp {
    applied: Arc<Mutex<HashSet<FeatureId>>>,
    id: FeatureId,
    action: &'static str,
}

impl ReversibleOperation for TrackedOp {
    fn execute(&mut self) -> Result<(), ReplaceError> {
        self.applied.lock().insert(self.id);
        Ok(())
    }

    fn undo(&mut self) {
        self.applied.lock().remove(&self.id);
    }

    fn description(&self) -> String {
        format!("{} {}", self.action, self.id)
    }
}

/// Host refusing subjects in `refuse` and cancelling at `cancel_at`.
///
/// With `target` set, references live in another dataset and are copied
/// into `target` before each replacement.
#[derive(Default)]
pub struct FakeHost {
    pub applied: Arc<Mutex<HashSet<FeatureId>>>,
    pub target: Option<Arc<Mutex<HashSet<FeatureId>>>>,
    pub refuse: HashSet<FeatureId>,
    pub cancel_at: Option<FeatureId>,
    pub shown: Vec<(String, String)>,
}

impl ConflationHost for FakeHost {
    fn build_replace_command(
        &mut self,
        subject: &Feature,
        _reference: &Feature,
    ) -> Result<ReplaceCommand, ReplaceError> {
        if self.cancel_at == Some(subject.id()) {
            return Ok(ReplaceCommand::Cancelled);
        }
        if self.refuse.contains(&subject.id()) {
            return Err(ReplaceError::CannotReplace(format!(
                "{} is locked",
                subject.id()
            )));
        }
        Ok(ReplaceCommand::Ready(Box::new(TrackedOp {
            applied: Arc::clone(&self.applied),
            id: subject.id(),
            action: "replace geometry of",
        })))
    }

    fn materialize_in_target(
        &mut self,
        reference: &Feature,
    ) -> Result<Option<TargetCopy>, ReplaceError> {
        let Some(target) = &self.target else {
            return Ok(None);
        };
        let mut operation = TrackedOp {
            applied: Arc::clone(target),
            id: reference.id(),
            action: "copy",
        };
        operation.execute()?;
        Ok(Some(TargetCopy {
            feature: reference.clone(),
            operation: Box::new(operation),
        }))
    }

    fn build_copy_command(
        &mut self,
        _features: &[Feature],
    ) -> Result<Box<dyn ReversibleOperation>, ReplaceError> {
        Err(ReplaceError::CannotReplace("copy not available".into()))
    }

    fn show_error(&mut self, title: &str, message: &str) {
        self.shown.push((title.to_string(), message.to_string()));
    }
}
