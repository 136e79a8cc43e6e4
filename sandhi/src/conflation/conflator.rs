//! The orchestrator: generate candidates, then conflate or discard them.

use std::fmt;

use super::host::{ConflationHost, ReplaceCommand, ReversibleOperation, TargetCopy};
use super::unmatched::UnmatchedList;
use crate::candidates::{Candidate, CandidateKey, CandidateList};
use crate::config::SandhiConfig;
use crate::error::{ConflationError, ReplaceError, Result};
use crate::features::{build_collections, Feature, FeatureId};
use crate::matching::{MatchFinder, ProgressSink};
use crate::scoring::ScoringPipeline;

/// Everything produced by one matching run.
#[derive(Debug, Default)]
pub struct MatchRun {
    /// Candidates, nothing selected
    pub candidates: CandidateList,
    /// Reference features that appear in no candidate
    pub unmatched_reference: UnmatchedList,
    /// Subject features that appear in no candidate
    pub unmatched_subject: UnmatchedList,
}

impl MatchRun {
    /// Forget features deleted from the host dataset.
    ///
    /// # Returns
    /// Number of candidates and unmatched entries dropped.
    pub fn features_removed(&mut self, ids: &[FeatureId]) -> usize {
        let candidates = self.candidates.remove_features(ids).len();
        let reference = self.unmatched_reference.remove_all(ids).len();
        let subject = self.unmatched_subject.remove_all(ids).len();
        candidates + reference + subject
    }
}

/// A candidate whose replacement was executed.
pub struct AppliedConflation {
    candidate: Candidate,
    operation: Box<dyn ReversibleOperation>,
}

impl AppliedConflation {
    /// The consumed candidate
    pub fn candidate(&self) -> &Candidate {
        &self.candidate
    }

    /// Description of the executed operation
    pub fn description(&self) -> String {
        self.operation.description()
    }

    /// Per-field modifications made by the replacement.
    ///
    /// # Errors
    /// Always [`ConflationError::Unsupported`]: field-level diffing is not
    /// tracked.
    pub fn modified_features(&self) -> Result<Vec<FeatureId>> {
        Err(ConflationError::Unsupported(
            "per-field modification tracking",
        ))
    }
}

impl fmt::Debug for AppliedConflation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppliedConflation")
            .field("candidate", &self.candidate.key())
            .field("operation", &self.operation.description())
            .finish()
    }
}

/// A candidate the host refused to conflate.
#[derive(Clone, Debug, PartialEq)]
pub struct ConflationFailure {
    /// The candidate left in the list
    pub key: CandidateKey,
    /// Host error
    pub error: ReplaceError,
}

/// Result of [`Conflator::conflate_selected`].
#[derive(Debug, Default)]
pub struct ConflateOutcome {
    /// Executed replacements, in processing order
    pub applied: Vec<AppliedConflation>,
    /// Per-pair failures; these candidates stay in the list
    pub failures: Vec<ConflationFailure>,
    /// The user cancelled; remaining candidates were not processed
    pub cancelled: bool,
}

impl ConflateOutcome {
    /// True if nothing failed and nothing was cancelled
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && !self.cancelled
    }
}

/// Candidates discarded by [`Conflator::delete_selected`].
#[derive(Debug, Default)]
pub struct RemovedCandidates {
    /// Removed candidates, in list order
    pub candidates: Vec<Candidate>,
}

/// Reference features copied into the subject dataset.
pub struct CopiedFeatures {
    features: Vec<Feature>,
    operation: Box<dyn ReversibleOperation>,
}

impl CopiedFeatures {
    /// The copied features
    pub fn features(&self) -> &[Feature] {
        &self.features
    }
}

impl fmt::Debug for CopiedFeatures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CopiedFeatures")
            .field("features", &self.features.len())
            .field("operation", &self.operation.description())
            .finish()
    }
}

/// Unmatched features dropped by [`Conflator::remove_unmatched`].
#[derive(Debug, Default)]
pub struct RemovedUnmatched {
    /// Removed features, in list order
    pub features: Vec<Feature>,
}

/// A reference copy followed by the replacement that uses it.
struct CopyThenReplace {
    copy: Box<dyn ReversibleOperation>,
    replace: Box<dyn ReversibleOperation>,
}

impl ReversibleOperation for CopyThenReplace {
    fn execute(&mut self) -> std::result::Result<(), ReplaceError> {
        self.copy.execute()?;
        if let Err(error) = self.replace.execute() {
            self.copy.undo();
            return Err(error);
        }
        Ok(())
    }

    fn undo(&mut self) {
        self.replace.undo();
        self.copy.undo();
    }

    fn description(&self) -> String {
        format!("{}, {}", self.copy.description(), self.replace.description())
    }
}

/// Build and execute the replacement for one candidate.
///
/// When the host keeps the reference in another dataset it is copied into
/// the subject dataset first, and that copy is undone unless the
/// replacement executes.
///
/// # Returns
/// `None` if the user cancelled.
fn replace_pair<H>(
    host: &mut H,
    candidate: &Candidate,
) -> std::result::Result<Option<Box<dyn ReversibleOperation>>, ReplaceError>
where
    H: ConflationHost + ?Sized,
{
    let copy = host.materialize_in_target(candidate.reference())?;
    let reference = copy
        .as_ref()
        .map_or(candidate.reference(), |copy| &copy.feature);
    let result = host
        .build_replace_command(candidate.subject(), reference)
        .and_then(|command| match command {
            ReplaceCommand::Ready(mut op) => op.execute().map(|()| Some(op)),
            ReplaceCommand::Cancelled => Ok(None),
        });

    match (copy, result) {
        (None, result) => result,
        (Some(TargetCopy { operation, .. }), Ok(Some(replace))) => {
            Ok(Some(Box::new(CopyThenReplace {
                copy: operation,
                replace,
            })))
        }
        (Some(TargetCopy { mut operation, .. }), result) => {
            operation.undo();
            log::debug!("Rolled back {}", operation.description());
            result
        }
    }
}

/// Conflation Orchestrator.
#[derive(Clone, Debug, Default)]
pub struct Conflator {
    config: SandhiConfig,
}

impl Conflator {
    /// Create an orchestrator with the given configuration.
    pub fn new(config: SandhiConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &SandhiConfig {
        &self.config
    }

    /// Match `subject` features against `reference` features.
    ///
    /// The scoring scale is the diagonal of the envelope of both
    /// collections. The candidate list comes back with an empty selection.
    ///
    /// # Returns
    /// `None` if `progress` cancelled the run.
    pub fn generate_candidates(
        &self,
        reference: &[Feature],
        subject: &[Feature],
        progress: &dyn ProgressSink,
    ) -> Option<MatchRun> {
        let (reference, subject) = build_collections(reference, subject);
        let envelope = reference.envelope().union(&subject.envelope());
        let scorer = ScoringPipeline::for_envelope(&envelope, &self.config.matching);
        let finder = MatchFinder::new(scorer, &self.config);

        let Some(pairs) = finder.find_matches(&reference, &subject, progress) else {
            log::info!("Matching cancelled, no candidates generated");
            return None;
        };

        let mut reference_matched = vec![false; reference.len()];
        let mut subject_matched = vec![false; subject.len()];
        for pair in &pairs {
            reference_matched[pair.reference_index] = true;
            subject_matched[pair.subject_index] = true;
        }
        let unmatched = |features: &[Feature], matched: &[bool]| {
            UnmatchedList::from_features(
                features
                    .iter()
                    .zip(matched)
                    .filter(|(_, is_matched)| !**is_matched)
                    .map(|(f, _)| f.clone()),
            )
        };

        let run = MatchRun {
            unmatched_reference: unmatched(reference.features(), &reference_matched),
            unmatched_subject: unmatched(subject.features(), &subject_matched),
            candidates: CandidateList::from_candidates(pairs.into_iter().map(Candidate::from)),
        };
        log::info!(
            "Generated {} candidates ({} reference and {} subject unmatched)",
            run.candidates.len(),
            run.unmatched_reference.len(),
            run.unmatched_subject.len()
        );
        Some(run)
    }

    /// Conflate every selected candidate.
    ///
    /// The selection is snapshotted before the first replacement. Each
    /// success removes its candidate from the list. A host failure is shown
    /// to the user and recorded, and the batch moves on; a cancellation stops
    /// the batch but keeps what was already applied. If every selected
    /// candidate was consumed, the candidate that was next in line before
    /// the batch becomes the selection.
    pub fn conflate_selected<H>(&self, list: &mut CandidateList, host: &mut H) -> ConflateOutcome
    where
        H: ConflationHost + ?Sized,
    {
        let batch: Vec<Candidate> = list.selected().into_iter().cloned().collect();
        let next = list.find_next_selection().map(Candidate::key);
        let mut outcome = ConflateOutcome::default();
        if batch.is_empty() {
            return outcome;
        }

        for candidate in &batch {
            let key = candidate.key();
            match replace_pair(host, candidate) {
                Ok(Some(operation)) => {
                    log::debug!("Conflated {}: {}", key, operation.description());
                    if let Some(candidate) = list.remove(&key) {
                        outcome.applied.push(AppliedConflation {
                            candidate,
                            operation,
                        });
                    }
                }
                Ok(None) => {
                    log::info!("Conflation cancelled at {}", key);
                    outcome.cancelled = true;
                    break;
                }
                Err(error) => {
                    log::warn!("Could not conflate {}: {}", key, error);
                    host.show_error("Conflation failed", &format!("{}: {}", key, error));
                    outcome.failures.push(ConflationFailure { key, error });
                }
            }
        }

        let batch_consumed = batch.iter().all(|c| !list.contains(&c.key()));
        if batch_consumed {
            if let Some(next) = next.filter(|k| list.contains(k)) {
                list.select(next);
            }
        }

        log::info!(
            "Conflated {} of {} selected candidates ({} failed{})",
            outcome.applied.len(),
            batch.len(),
            outcome.failures.len(),
            if outcome.cancelled { ", cancelled" } else { "" }
        );
        outcome
    }

    /// Discard the selected candidates without touching the host dataset.
    pub fn delete_selected(&self, list: &mut CandidateList) -> RemovedCandidates {
        let keys = list.selected_keys();
        let candidates = list.remove_all(&keys);
        log::debug!("Deleted {} candidates", candidates.len());
        RemovedCandidates { candidates }
    }

    /// Undo a conflation and put its candidate back in the list.
    ///
    /// # Returns
    /// False if the candidate was already back in the list.
    pub fn undo_conflation(&self, list: &mut CandidateList, applied: AppliedConflation) -> bool {
        let AppliedConflation {
            candidate,
            mut operation,
        } = applied;
        operation.undo();
        log::debug!("Undid {}", operation.description());
        list.add(candidate)
    }

    /// Put deleted candidates back in the list.
    pub fn undo_delete(&self, list: &mut CandidateList, removed: RemovedCandidates) -> usize {
        list.add_all(removed.candidates)
    }

    /// Copy unmatched reference features into the subject dataset.
    ///
    /// Copied features leave `unmatched`.
    ///
    /// # Returns
    /// `None` if none of `ids` is in `unmatched`.
    ///
    /// # Errors
    /// The host's error when the copy cannot be built or executed; it has
    /// already been shown to the user and `unmatched` is unchanged.
    pub fn conflate_unmatched<H>(
        &self,
        unmatched: &mut UnmatchedList,
        ids: &[FeatureId],
        host: &mut H,
    ) -> std::result::Result<Option<CopiedFeatures>, ReplaceError>
    where
        H: ConflationHost + ?Sized,
    {
        let features: Vec<Feature> = ids.iter().filter_map(|&id| unmatched.get(id).cloned()).collect();
        if features.is_empty() {
            return Ok(None);
        }

        let result = host.build_copy_command(&features).and_then(|mut op| {
            op.execute()?;
            Ok(op)
        });
        let operation = match result {
            Ok(op) => op,
            Err(error) => {
                log::warn!("Could not copy {} features: {}", features.len(), error);
                host.show_error("Copy failed", &error.to_string());
                return Err(error);
            }
        };

        let features = unmatched.remove_all(ids);
        log::debug!(
            "Copied {} unmatched features: {}",
            features.len(),
            operation.description()
        );
        Ok(Some(CopiedFeatures {
            features,
            operation,
        }))
    }

    /// Undo a copy and list its features as unmatched again.
    pub fn undo_copy(&self, unmatched: &mut UnmatchedList, copied: CopiedFeatures) -> usize {
        let CopiedFeatures {
            features,
            mut operation,
        } = copied;
        operation.undo();
        unmatched.add_all(features)
    }

    /// Drop features from an unmatched list.
    pub fn remove_unmatched(
        &self,
        unmatched: &mut UnmatchedList,
        ids: &[FeatureId],
    ) -> RemovedUnmatched {
        RemovedUnmatched {
            features: unmatched.remove_all(ids),
        }
    }

    /// Restore features dropped by [`remove_unmatched`](Self::remove_unmatched).
    pub fn undo_remove_unmatched(
        &self,
        unmatched: &mut UnmatchedList,
        removed: RemovedUnmatched,
    ) -> usize {
        unmatched.add_all(removed.features)
    }
}
