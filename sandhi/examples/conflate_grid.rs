//! Conflate two synthetic surveys of the same block of buildings.
//!
//! Builds a reference grid of building outlines and a shifted, partial
//! subject survey, generates candidates, then walks the selection through
//! the list the way a reviewer would: conflate a few, delete one and undo
//! it, then copy the buildings the subject survey missed.
//!
//! Usage:
//!   cargo run -p sandhi --example conflate_grid
//!   RUST_LOG=debug cargo run -p sandhi --example conflate_grid

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use sandhi::{
    Bounds, CancelFlag, ChannelListener, ConflationHost, Conflator, Feature, ListEvent, Point2D,
    ReplaceCommand, ReplaceError, ReversibleOperation, SandhiConfig, SimpleFeature,
};

/// Host that "replaces" geometry by counting applied edits.
#[derive(Default)]
struct CountingHost {
    applied: Arc<AtomicUsize>,
}

struct CountingEdit {
    applied: Arc<AtomicUsize>,
    label: String,
}

impl ReversibleOperation for CountingEdit {
    fn execute(&mut self) -> Result<(), ReplaceError> {
        self.applied.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn undo(&mut self) {
        self.applied.fetch_sub(1, Ordering::SeqCst);
    }

    fn description(&self) -> String {
        self.label.clone()
    }
}

impl ConflationHost for CountingHost {
    fn build_replace_command(
        &mut self,
        subject: &Feature,
        reference: &Feature,
    ) -> Result<ReplaceCommand, ReplaceError> {
        if subject.kind() != reference.kind() {
            return Err(ReplaceError::CannotReplace(format!(
                "{:?} and {:?}",
                subject.kind(),
                reference.kind()
            )));
        }
        Ok(ReplaceCommand::Ready(Box::new(CountingEdit {
            applied: Arc::clone(&self.applied),
            label: format!("replace {} with {}", subject.id(), reference.id()),
        })))
    }

    fn build_copy_command(
        &mut self,
        features: &[Feature],
    ) -> Result<Box<dyn ReversibleOperation>, ReplaceError> {
        Ok(Box::new(CountingEdit {
            applied: Arc::clone(&self.applied),
            label: format!("copy {} features", features.len()),
        }))
    }
}

fn building(id: u64, x: f64, y: f64) -> Result<Feature, sandhi::ConflationError> {
    SimpleFeature::area(
        id,
        Bounds::new(Point2D::new(x, y), Point2D::new(x + 12.0, y + 8.0)),
    )
    .with_tag("building", "yes")
    .into_feature()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SandhiConfig::load_default()?;
    let conflator = Conflator::new(config);

    // 8x8 reference block; the subject survey is shifted by (1.5, -1) and
    // misses every seventh building.
    let mut reference = Vec::new();
    let mut subject = Vec::new();
    for i in 0..8u64 {
        for j in 0..8u64 {
            let id = i * 8 + j;
            let (x, y) = (i as f64 * 30.0, j as f64 * 30.0);
            reference.push(building(id, x, y)?);
            if id % 7 != 3 {
                subject.push(building(1000 + id, x + 1.5, y - 1.0)?);
            }
        }
    }

    let cancel = CancelFlag::new();
    let Some(mut run) = conflator.generate_candidates(&reference, &subject, &cancel) else {
        println!("Matching cancelled");
        return Ok(());
    };

    let (listener, events) = ChannelListener::new();
    run.candidates.add_listener(Arc::new(listener));

    println!(
        "{} candidates, {} reference-only, {} subject-only",
        run.candidates.len(),
        run.unmatched_reference.len(),
        run.unmatched_subject.len()
    );

    let mut host = CountingHost::default();

    // Conflate the first three candidates.
    let first: Vec<_> = run.candidates.iter().take(3).map(|c| c.key()).collect();
    run.candidates.set_selected(first);
    let outcome = conflator.conflate_selected(&mut run.candidates, &mut host);
    println!(
        "Conflated {} ({} failed), next selection: {:?}",
        outcome.applied.len(),
        outcome.failures.len(),
        run.candidates.selected_keys()
    );

    // Discard the current selection, then change our mind.
    let removed = conflator.delete_selected(&mut run.candidates);
    println!("Deleted {} candidates", removed.candidates.len());
    conflator.undo_delete(&mut run.candidates, removed);

    // Copy the reference-only buildings into the subject dataset.
    let missing: Vec<_> = run.unmatched_reference.iter().map(|f| f.id()).collect();
    if let Some(copied) =
        conflator.conflate_unmatched(&mut run.unmatched_reference, &missing, &mut host)?
    {
        println!("Copied {} reference-only buildings", copied.features().len());
    }

    let mut list_changes = 0;
    let mut selection_changes = 0;
    for event in events.try_iter() {
        match event {
            ListEvent::ListChanged { .. } => list_changes += 1,
            ListEvent::SelectionChanged { .. } => selection_changes += 1,
        }
    }
    println!(
        "{} list and {} selection notifications, {} edits applied, {} candidates left",
        list_changes,
        selection_changes,
        host.applied.load(Ordering::SeqCst),
        run.candidates.len()
    );

    Ok(())
}
