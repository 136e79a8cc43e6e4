//! Matching pipeline: collections, scoring and the Match Finder.

use std::collections::HashSet;
use std::path::Path;

use approx::assert_relative_eq;
use sandhi::{
    build_collections, Bounds, Conflator, FeatureId, MatchFinder, MatchPolicy, NoProgress,
    Point2D, SandhiConfig, ScoringPipeline, SimpleFeature,
};

use crate::common::{init_logging, point, scatter, RecordingProgress};

fn finder_for(
    reference: &sandhi::FeatureCollection,
    subject: &sandhi::FeatureCollection,
    config: &SandhiConfig,
) -> MatchFinder<ScoringPipeline> {
    let envelope = reference.envelope().union(&subject.envelope());
    MatchFinder::new(
        ScoringPipeline::for_envelope(&envelope, &config.matching),
        config,
    )
}

#[test]
fn two_pairs_on_diagonal() {
    init_logging();
    let reference = vec![point(1, 0.0, 0.0), point(2, 100.0, 100.0)];
    let subject = vec![point(11, 1.0, 1.0), point(12, 99.0, 99.0)];

    let run = Conflator::default()
        .generate_candidates(&reference, &subject, &NoProgress)
        .unwrap();

    let pairs: Vec<(FeatureId, FeatureId)> = run
        .candidates
        .iter()
        .map(|c| (c.reference().id(), c.subject().id()))
        .collect();
    assert_eq!(
        pairs,
        vec![(FeatureId(1), FeatureId(11)), (FeatureId(2), FeatureId(12))]
    );
    for c in &run.candidates {
        assert_relative_eq!(c.score(), 0.99, epsilon = 1e-9);
        assert_relative_eq!(c.distance(), 2f64.sqrt(), epsilon = 1e-12);
    }
    assert!(run.unmatched_reference.is_empty());
    assert!(run.unmatched_subject.is_empty());
}

#[test]
fn one_to_one_never_reuses_a_feature() {
    init_logging();
    let reference = scatter(0, 60, 7, 200.0);
    let subject = scatter(1000, 45, 11, 200.0);
    let (reference, subject) = build_collections(&reference, &subject);
    let config = SandhiConfig::default();

    let pairs = finder_for(&reference, &subject, &config)
        .find_matches(&reference, &subject, &NoProgress)
        .unwrap();

    assert!(!pairs.is_empty());
    let mut refs = HashSet::new();
    let mut subs = HashSet::new();
    for p in &pairs {
        assert!(refs.insert(p.reference.id()), "reference reused");
        assert!(subs.insert(p.subject.id()), "subject reused");
        assert!((0.0..=1.0).contains(&p.score));
        assert!(p.distance >= 0.0);
        assert!(p.distance <= config.matching.threshold_distance);
    }
    let indices: Vec<usize> = pairs.iter().map(|p| p.reference_index).collect();
    let mut sorted = indices.clone();
    sorted.sort_unstable();
    assert_eq!(indices, sorted);
}

#[test]
fn grid_index_matches_brute_force() {
    init_logging();
    let reference = scatter(0, 80, 3, 300.0);
    let subject = scatter(1000, 90, 5, 300.0);
    let (reference, subject) = build_collections(&reference, &subject);

    for policy in [MatchPolicy::OneToOne, MatchPolicy::Disambiguating] {
        let mut brute = SandhiConfig::default();
        brute.matching.policy = policy;
        brute.index.enabled = false;
        let mut indexed = brute.clone();
        indexed.index.enabled = true;
        indexed.index.min_pairs = 0;

        let a = finder_for(&reference, &subject, &brute)
            .find_matches(&reference, &subject, &NoProgress)
            .unwrap();
        let b = finder_for(&reference, &subject, &indexed)
            .find_matches(&reference, &subject, &NoProgress)
            .unwrap();

        let key = |p: &sandhi::ScoredPair| (p.reference_index, p.subject_index);
        assert_eq!(
            a.iter().map(key).collect::<Vec<_>>(),
            b.iter().map(key).collect::<Vec<_>>(),
            "policy {}",
            policy
        );
    }
}

#[test]
fn disambiguating_lets_subjects_repeat() {
    init_logging();
    let config = SandhiConfig::from_yaml("matching:\n  policy: disambiguating\n").unwrap();
    assert_eq!(config.matching.policy, MatchPolicy::Disambiguating);

    let reference = vec![point(1, 0.0, 0.0), point(2, 4.0, 0.0)];
    let subject = vec![point(11, 1.0, 0.0), point(12, 50.0, 50.0)];
    let run = Conflator::new(config)
        .generate_candidates(&reference, &subject, &NoProgress)
        .unwrap();

    assert_eq!(run.candidates.len(), 2);
    assert!(run.candidates.iter().all(|c| c.subject().id() == FeatureId(11)));
    assert!(run.unmatched_subject.contains(FeatureId(12)));
}

#[test]
fn coincident_areas_score_one() {
    let bounds = Bounds::new(Point2D::new(10.0, 10.0), Point2D::new(20.0, 30.0));
    let reference = vec![SimpleFeature::area(1, bounds).into_feature().unwrap()];
    let subject = vec![
        SimpleFeature::area(2, bounds).into_feature().unwrap(),
        point(3, 15.0, 20.0),
    ];

    let run = Conflator::default()
        .generate_candidates(&reference, &subject, &NoProgress)
        .unwrap();

    assert_eq!(run.candidates.len(), 1);
    let c = run.candidates.get(0).unwrap();
    assert_eq!(c.subject().id(), FeatureId(2));
    assert!(c.is_identical());
    assert_relative_eq!(c.score(), 1.0);
}

#[test]
fn feature_in_both_selections_stays_reference() {
    let shared = point(1, 0.0, 0.0);
    let reference = vec![shared.clone()];
    let subject = vec![shared, point(2, 0.5, 0.0)];
    let run = Conflator::default()
        .generate_candidates(&reference, &subject, &NoProgress)
        .unwrap();

    assert_eq!(run.candidates.len(), 1);
    let c = run.candidates.get(0).unwrap();
    assert_eq!(c.reference().id(), FeatureId(1));
    assert_eq!(c.subject().id(), FeatureId(2));
}

#[test]
fn empty_selection_yields_empty_run() {
    let run = Conflator::default()
        .generate_candidates(&[], &[point(1, 0.0, 0.0)], &NoProgress)
        .unwrap();
    assert!(run.candidates.is_empty());
    assert_eq!(run.unmatched_subject.len(), 1);
}

#[test]
fn progress_reaches_total() {
    let reference = scatter(0, 20, 1, 100.0);
    let subject = scatter(100, 30, 2, 100.0);
    let progress = RecordingProgress::default();

    Conflator::default()
        .generate_candidates(&reference, &subject, &progress)
        .unwrap();

    let reports = progress.reports.lock();
    assert_eq!(reports.first(), Some(&(0, 600)));
    assert_eq!(reports.last(), Some(&(600, 600)));
    assert!(reports.windows(2).all(|w| w[0].0 <= w[1].0));
}

#[test]
fn cancellation_returns_nothing() {
    let reference = scatter(0, 20, 1, 100.0);
    let subject = scatter(100, 30, 2, 100.0);
    let progress = RecordingProgress {
        cancel_after: Some(3),
        ..Default::default()
    };

    let run = Conflator::default().generate_candidates(&reference, &subject, &progress);
    assert!(run.is_none());
}

#[test]
fn shipped_config_loads() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("configs/sandhi.yaml");
    let config = SandhiConfig::load(&path).unwrap();
    assert_eq!(config, SandhiConfig::default());
}
