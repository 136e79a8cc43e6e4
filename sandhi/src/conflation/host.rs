//! Boundary with the host editor.

use std::fmt;

use crate::error::ReplaceError;
use crate::features::Feature;

/// An edit built by the host that can be executed and later undone.
pub trait ReversibleOperation: Send {
    /// Apply the edit to the host dataset.
    fn execute(&mut self) -> Result<(), ReplaceError>;

    /// Revert a previously executed edit.
    fn undo(&mut self);

    /// Human-readable summary for logs and undo menus
    fn description(&self) -> String;
}

/// Result of asking the host for a geometry replacement.
pub enum ReplaceCommand {
    /// Operation ready to execute
    Ready(Box<dyn ReversibleOperation>),
    /// The user cancelled an interactive step (e.g. a tag conflict dialog)
    Cancelled,
}

impl fmt::Debug for ReplaceCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(op) => f.debug_tuple("Ready").field(&op.description()).finish(),
            Self::Cancelled => f.write_str("Cancelled"),
        }
    }
}

/// A reference feature copied into the subject dataset so a replacement
/// can point at it.
pub struct TargetCopy {
    /// The reference as it exists in the subject dataset
    pub feature: Feature,
    /// The executed copy
    pub operation: Box<dyn ReversibleOperation>,
}

impl fmt::Debug for TargetCopy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetCopy")
            .field("feature", &self.feature.id())
            .field("operation", &self.operation.description())
            .finish()
    }
}

/// Host services used by the [`Conflator`](super::Conflator).
///
/// Only the orchestrator talks to the user; the Match Finder and the
/// Candidate List report through return values.
pub trait ConflationHost {
    /// Copy `reference` into the subject dataset and look up the copy.
    ///
    /// Returns `None` when reference and subject live in the same dataset,
    /// which is the default. The returned copy has already been executed;
    /// the caller undoes it if the replacement does not go ahead.
    fn materialize_in_target(
        &mut self,
        _reference: &Feature,
    ) -> Result<Option<TargetCopy>, ReplaceError> {
        Ok(None)
    }

    /// Build an operation replacing `subject`'s geometry with `reference`'s.
    ///
    /// # Errors
    /// [`ReplaceError::CannotReplace`] when the pair cannot be merged. The
    /// batch records the failure and continues.
    fn build_replace_command(
        &mut self,
        subject: &Feature,
        reference: &Feature,
    ) -> Result<ReplaceCommand, ReplaceError>;

    /// Build an operation copying reference features into the subject
    /// dataset.
    fn build_copy_command(
        &mut self,
        features: &[Feature],
    ) -> Result<Box<dyn ReversibleOperation>, ReplaceError>;

    /// Show an error to the user.
    fn show_error(&mut self, title: &str, message: &str) {
        log::warn!("{}: {}", title, message);
    }
}
