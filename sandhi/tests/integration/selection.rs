//! Candidate list selection protocol and the conflation workflow.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use sandhi::{
    CandidateKey, CandidateList, Conflator, FeatureId, MatchRun, NoProgress, ReplaceError,
};

use crate::common::{init_logging, point, FakeHost, Recorded, RecordingListener, TaggedListener};

/// Six separated pairs along the x axis: reference i at (40i, 0) matched
/// with subject 100+i one unit above it.
fn row_of_pairs() -> MatchRun {
    let reference: Vec<_> = (0..6).map(|i| point(i, 40.0 * i as f64, 0.0)).collect();
    let subject: Vec<_> = (0..6)
        .map(|i| point(100 + i, 40.0 * i as f64, 1.0))
        .collect();
    Conflator::default()
        .generate_candidates(&reference, &subject, &NoProgress)
        .unwrap()
}

fn key(i: u64) -> CandidateKey {
    CandidateKey::new(FeatureId(i), FeatureId(100 + i))
}

fn next_key(list: &CandidateList) -> Option<CandidateKey> {
    list.find_next_selection().map(|c| c.key())
}

#[test]
fn run_lists_candidates_in_reference_order() {
    let run = row_of_pairs();
    let keys: Vec<CandidateKey> = run.candidates.iter().map(|c| c.key()).collect();
    assert_eq!(keys, (0..6).map(key).collect::<Vec<_>>());
    assert_eq!(run.candidates.selection_len(), 0);
}

#[test]
fn next_selection_policy() {
    let mut list = row_of_pairs().candidates;

    assert_eq!(next_key(&list), Some(key(0)));

    list.set_selected([key(1), key(3)]);
    assert_eq!(next_key(&list), Some(key(2)));

    list.set_selected([key(1), key(3), key(5)]);
    assert_eq!(next_key(&list), Some(key(2)));

    list.set_selected([key(4), key(5)]);
    assert_eq!(next_key(&list), Some(key(3)));

    list.set_selected([key(0)]);
    assert_eq!(next_key(&list), Some(key(1)));

    list.set_selected((0..6).map(key));
    assert_eq!(next_key(&list), None);
}

#[test]
fn removing_whole_selection_selects_precomputed_next() {
    let mut list = row_of_pairs().candidates;
    list.set_selected([key(2), key(3)]);
    let expected = next_key(&list);
    let recorder = RecordingListener::attach(&mut list);

    let removed = list.remove_all(&[key(2), key(3)]);
    assert_eq!(removed.len(), 2);
    assert_eq!(list.selected_keys(), expected.into_iter().collect::<Vec<_>>());
    assert_eq!(
        recorder.take(),
        vec![Recorded::Selection(vec![key(4)]), Recorded::List(4)]
    );
}

#[test]
fn removing_last_candidates_empties_selection() {
    let mut list = row_of_pairs().candidates;
    let all: Vec<CandidateKey> = (0..6).map(key).collect();
    list.set_selected(all.clone());
    list.remove_all(&all);
    assert!(list.is_empty());
    assert_eq!(list.selection_len(), 0);
}

#[test]
fn set_selected_with_equal_set_is_silent() {
    let mut list = row_of_pairs().candidates;
    list.set_selected([key(1), key(4)]);
    let recorder = RecordingListener::attach(&mut list);

    list.set_selected([key(4), key(1)]);
    list.set_selected([key(4), key(1), key(4)]);
    assert!(recorder.take().is_empty());

    list.set_selected([key(4)]);
    assert_eq!(recorder.take(), vec![Recorded::Selection(vec![key(4)])]);
}

#[test]
fn remove_then_add_all_round_trip() {
    let mut list = row_of_pairs().candidates;
    let removed = list.remove_all(&[key(4), key(1)]);
    let remaining: Vec<CandidateKey> = list.iter().map(|c| c.key()).collect();
    assert_eq!(remaining, vec![key(0), key(2), key(3), key(5)]);

    list.add_all(removed);
    assert_eq!(list.len(), 6);
    let keys: Vec<CandidateKey> = list.iter().map(|c| c.key()).collect();
    assert_eq!(&keys[..4], &remaining[..]);
    for i in 0..6 {
        assert!(list.contains(&key(i)));
    }
}

#[test]
fn listeners_notified_in_registration_order() {
    let mut list = row_of_pairs().candidates;
    let log = Arc::new(Mutex::new(Vec::new()));
    for tag in ["first", "second"] {
        list.add_listener(Arc::new(TaggedListener {
            tag,
            log: Arc::clone(&log),
        }));
    }

    list.select(key(0));
    list.remove(&key(0));

    let log = log.lock();
    let tags: Vec<&str> = log.iter().map(|(tag, _)| *tag).collect();
    assert_eq!(tags, vec!["first", "second", "first", "second", "first", "second"]);
    for pair in log.chunks(2) {
        assert_eq!(pair[0].1, pair[1].1);
    }
    assert_eq!(log[0].1, Recorded::Selection(vec![key(0)]));
    assert_eq!(log[2].1, Recorded::Selection(vec![key(1)]));
    assert_eq!(log[4].1, Recorded::List(5));
}

#[test]
fn conflate_batch_with_failure_and_undo() {
    init_logging();
    let conflator = Conflator::default();
    let mut run = row_of_pairs();
    let list = &mut run.candidates;
    list.set_selected([key(1), key(2), key(3)]);
    let recorder = RecordingListener::attach(list);

    let mut host = FakeHost::default();
    host.refuse.insert(FeatureId(102));

    let mut outcome = conflator.conflate_selected(list, &mut host);
    assert_eq!(outcome.applied.len(), 2);
    assert_eq!(
        outcome.failures.iter().map(|f| f.key).collect::<Vec<_>>(),
        vec![key(2)]
    );
    assert!(matches!(
        outcome.failures[0].error,
        ReplaceError::CannotReplace(_)
    ));
    assert!(!outcome.cancelled);
    assert_eq!(host.shown.len(), 1);
    assert_eq!(host.applied.lock().len(), 2);

    assert_eq!(list.len(), 4);
    assert_eq!(list.selected_keys(), vec![key(2)]);
    assert!(recorder
        .take()
        .iter()
        .any(|e| matches!(e, Recorded::List(4))));

    let applied = outcome.applied.pop().unwrap();
    assert_eq!(applied.candidate().key(), key(3));
    assert!(conflator.undo_conflation(list, applied));
    assert!(list.contains(&key(3)));
    assert!(!host.applied.lock().contains(&FeatureId(103)));
}

#[test]
fn conflate_cancel_keeps_applied() {
    let conflator = Conflator::default();
    let mut run = row_of_pairs();
    let list = &mut run.candidates;
    list.set_selected([key(0), key(1), key(2)]);

    let mut host = FakeHost {
        cancel_at: Some(FeatureId(101)),
        ..Default::default()
    };
    let outcome = conflator.conflate_selected(list, &mut host);

    assert!(outcome.cancelled);
    assert_eq!(outcome.applied.len(), 1);
    assert!(host.shown.is_empty());
    assert!(!list.contains(&key(0)));
    assert!(list.contains(&key(1)));
    assert!(list.contains(&key(2)));
}

#[test]
fn cross_dataset_conflation_keeps_only_used_copies() {
    let conflator = Conflator::default();
    let mut run = row_of_pairs();
    let list = &mut run.candidates;
    list.set_selected([key(0), key(1), key(2)]);

    let target = Arc::new(Mutex::new(HashSet::new()));
    let mut host = FakeHost {
        target: Some(Arc::clone(&target)),
        cancel_at: Some(FeatureId(102)),
        ..Default::default()
    };
    host.refuse.insert(FeatureId(101));

    let mut outcome = conflator.conflate_selected(list, &mut host);
    assert!(outcome.cancelled);
    assert_eq!(outcome.applied.len(), 1);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(host.shown.len(), 1);
    assert_eq!(*target.lock(), HashSet::from([FeatureId(0)]));
    assert_eq!(*host.applied.lock(), HashSet::from([FeatureId(100)]));

    let applied = outcome.applied.pop().unwrap();
    assert!(conflator.undo_conflation(list, applied));
    assert!(target.lock().is_empty());
    assert!(host.applied.lock().is_empty());
    assert!(list.contains(&key(0)));
}

#[test]
fn conflate_full_selection_advances_to_neighbour() {
    let conflator = Conflator::default();
    let mut run = row_of_pairs();
    let list = &mut run.candidates;
    list.set_selected([key(4), key(5)]);

    let outcome = conflator.conflate_selected(list, &mut FakeHost::default());
    assert!(outcome.is_complete());
    assert_eq!(list.selected_keys(), vec![key(3)]);
}

#[test]
fn delete_selected_has_no_host_effect() {
    let conflator = Conflator::default();
    let mut run = row_of_pairs();
    run.candidates.set_selected([key(0)]);

    let removed = conflator.delete_selected(&mut run.candidates);
    assert_eq!(removed.candidates.len(), 1);
    assert_eq!(run.candidates.selected_keys(), vec![key(1)]);

    conflator.undo_delete(&mut run.candidates, removed);
    assert_eq!(run.candidates.len(), 6);
}

#[test]
fn copy_failure_leaves_unmatched_untouched() {
    let conflator = Conflator::default();
    let reference = vec![point(1, 0.0, 0.0), point(2, 500.0, 0.0)];
    let subject = vec![point(11, 0.0, 1.0)];
    let mut run = conflator
        .generate_candidates(&reference, &subject, &NoProgress)
        .unwrap();
    let mut host = FakeHost::default();

    let result =
        conflator.conflate_unmatched(&mut run.unmatched_reference, &[FeatureId(2)], &mut host);
    assert!(result.is_err());
    assert!(run.unmatched_reference.contains(FeatureId(2)));
    assert_eq!(host.shown.len(), 1);
}

#[test]
fn host_deletion_prunes_run() {
    let mut run = row_of_pairs();
    run.candidates.select(key(2));
    let dropped = run.features_removed(&[FeatureId(102)]);
    assert_eq!(dropped, 1);
    assert_eq!(run.candidates.len(), 5);
    assert_eq!(run.candidates.selected_keys(), vec![key(3)]);
}
