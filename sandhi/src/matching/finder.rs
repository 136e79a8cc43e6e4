//! Match Finder: pairwise scoring and resolution into correspondences.

use std::cmp::Ordering;

use super::policy::MatchPolicy;
use super::progress::ProgressSink;
use super::spatial_index::PointGridIndex;
use crate::config::{IndexSection, SandhiConfig};
use crate::core::Point2D;
use crate::features::{Feature, FeatureCollection};
use crate::scoring::PairScorer;

/// Label passed to the progress sink while scoring.
const PROGRESS_LABEL: &str = "Scoring feature pairs";

/// Largest cell coordinate magnitude the grid index is used for (2^53, the
/// limit of exact integers in f64).
const MAX_GRID_CELLS: f64 = 9_007_199_254_740_992.0;

/// A resolved reference/subject correspondence.
#[derive(Clone, Debug)]
pub struct ScoredPair {
    /// Enumeration index of the reference in its collection
    pub reference_index: usize,
    /// Enumeration index of the subject in its collection
    pub subject_index: usize,
    /// Reference feature
    pub reference: Feature,
    /// Subject feature
    pub subject: Feature,
    /// Raw centroid distance
    pub distance: f64,
    /// Normalized score in [0, 1]
    pub score: f64,
    /// Geometries are coincident
    pub identical: bool,
}

/// Pair that passed the score threshold, by collection index.
#[derive(Clone, Copy, Debug)]
struct RawPair {
    r: usize,
    s: usize,
    distance: f64,
    score: f64,
    identical: bool,
}

/// Total ranking of pairs: higher score first, then shorter distance, then
/// lower reference index, then lower subject index.
fn rank(a: &RawPair, b: &RawPair) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.distance.total_cmp(&b.distance))
        .then_with(|| a.r.cmp(&b.r))
        .then_with(|| a.s.cmp(&b.s))
}

/// Computes correspondences between a reference and a subject collection.
///
/// The Match Finder never mutates its inputs. Features without a pair
/// scoring above `min_score` are simply absent from the result.
///
/// # Example
///
/// ```rust,ignore
/// use sandhi::matching::{MatchFinder, NoProgress};
/// use sandhi::scoring::ScoringPipeline;
///
/// let scorer = ScoringPipeline::for_envelope(&envelope, &config.matching);
/// let finder = MatchFinder::new(scorer, &config);
/// let pairs = finder.find_matches(&reference, &subject, &NoProgress)
///     .expect("not cancelled");
/// ```
#[derive(Clone, Debug)]
pub struct MatchFinder<S: PairScorer> {
    scorer: S,
    policy: MatchPolicy,
    min_score: f64,
    index: IndexSection,
    report_interval: usize,
}

impl<S: PairScorer> MatchFinder<S> {
    /// Create a finder using the policy and thresholds from `config`.
    pub fn new(scorer: S, config: &SandhiConfig) -> Self {
        Self {
            scorer,
            policy: config.matching.policy,
            min_score: config.matching.min_score,
            index: config.index.clone(),
            report_interval: config.progress.report_interval.max(1),
        }
    }

    /// Builder-style policy override.
    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Resolution policy
    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    /// The scoring pipeline
    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    /// Find matches between `reference` and `subject`.
    ///
    /// Results are ordered by reference enumeration index.
    ///
    /// # Returns
    /// `None` if `progress` requested cancellation. Matching is all or
    /// nothing: no partial result is ever returned.
    pub fn find_matches(
        &self,
        reference: &FeatureCollection,
        subject: &FeatureCollection,
        progress: &dyn ProgressSink,
    ) -> Option<Vec<ScoredPair>> {
        if reference.is_empty() || subject.is_empty() {
            log::debug!(
                "Nothing to match ({} reference, {} subject)",
                reference.len(),
                subject.len()
            );
            return Some(Vec::new());
        }

        let scored = self.score_pairs(reference, subject, progress)?;
        let resolved = match self.policy {
            MatchPolicy::OneToOne => resolve_one_to_one(scored, reference.len(), subject.len()),
            MatchPolicy::Disambiguating => resolve_disambiguating(scored, reference.len()),
        };

        log::info!(
            "{} matching ({}): {} reference, {} subject -> {} matches",
            self.policy,
            self.scorer.name(),
            reference.len(),
            subject.len(),
            resolved.len()
        );

        Some(
            resolved
                .into_iter()
                .filter_map(|p| {
                    Some(ScoredPair {
                        reference_index: p.r,
                        subject_index: p.s,
                        reference: reference.get(p.r)?.clone(),
                        subject: subject.get(p.s)?.clone(),
                        distance: p.distance,
                        score: p.score,
                        identical: p.identical,
                    })
                })
                .collect(),
        )
    }

    /// Build a grid over subject centroids if the run is large enough and
    /// the scorer has a finite, positive cutoff.
    ///
    /// Falls back to brute force when centroids lie so far from the origin,
    /// measured in cells, that cell coordinates are no longer exact.
    fn build_index(
        &self,
        reference: &FeatureCollection,
        subject: &FeatureCollection,
        pair_count: usize,
    ) -> Option<(PointGridIndex, f64)> {
        if !self.index.enabled || pair_count < self.index.min_pairs {
            return None;
        }
        let cutoff = self.scorer.cutoff_distance()?;
        let extent = reference
            .iter()
            .chain(subject.iter())
            .map(|f| {
                let c = f.centroid();
                c.x.abs().max(c.y.abs())
            })
            .fold(0.0_f64, f64::max);
        let cells = extent / cutoff;
        if cells.is_nan() || cells >= MAX_GRID_CELLS {
            log::debug!(
                "Grid index skipped: extent {:.3e} over cell size {:.3e} exceeds {:.0e} cells",
                extent,
                cutoff,
                MAX_GRID_CELLS
            );
            return None;
        }

        let centroids: Vec<Point2D> = subject.iter().map(Feature::centroid).collect();
        let index = PointGridIndex::build(&centroids, cutoff)?;
        log::debug!(
            "Using grid index: cell size {:.3}, {} cells for {} subjects",
            index.cell_size(),
            index.num_cells(),
            index.len()
        );
        Some((index, cutoff))
    }

    /// Score all pairs, keeping those above `min_score`.
    fn score_pairs(
        &self,
        reference: &FeatureCollection,
        subject: &FeatureCollection,
        progress: &dyn ProgressSink,
    ) -> Option<Vec<RawPair>> {
        let n = reference.len();
        let m = subject.len();
        let total = n.saturating_mul(m);
        let index = self.build_index(reference, subject, total);

        let mut pairs = Vec::new();
        let mut nearby: Vec<usize> = Vec::new();
        let mut done = 0usize;
        let mut last_report = 0usize;
        let mut since_check = 0usize;

        progress.report_progress(0, total, PROGRESS_LABEL);

        for (ri, r) in reference.iter().enumerate() {
            if progress.is_cancelled() {
                log::info!("Matching cancelled after {}/{} pairs", done, total);
                return None;
            }

            match &index {
                Some((grid, cutoff)) => grid.query_radius_into(r.centroid(), *cutoff, &mut nearby),
                None => {
                    nearby.clear();
                    nearby.extend(0..m);
                }
            }

            for &si in &nearby {
                let Some(s) = subject.get(si) else {
                    continue;
                };
                let pair = self.scorer.score_pair(r, s);
                if pair.score > self.min_score {
                    pairs.push(RawPair {
                        r: ri,
                        s: si,
                        distance: pair.distance,
                        score: pair.score,
                        identical: pair.identical,
                    });
                }

                since_check += 1;
                if since_check >= self.report_interval {
                    since_check = 0;
                    if progress.is_cancelled() {
                        log::info!("Matching cancelled after {}/{} pairs", done, total);
                        return None;
                    }
                }
            }

            // Pruned pairs count as scored: they are known to score zero
            done += m;
            if done - last_report >= self.report_interval || done == total {
                progress.report_progress(done, total, PROGRESS_LABEL);
                last_report = done;
            }
        }

        log::debug!("{} of {} pairs above minimum score", pairs.len(), total);
        Some(pairs)
    }
}

/// Greedy global resolution: repeatedly take the best remaining pair whose
/// reference and subject are both unused.
fn resolve_one_to_one(mut pairs: Vec<RawPair>, n: usize, m: usize) -> Vec<RawPair> {
    pairs.sort_by(rank);

    let limit = n.min(m);
    let mut used_ref = vec![false; n];
    let mut used_sub = vec![false; m];
    let mut result = Vec::with_capacity(limit);

    for p in pairs {
        if result.len() == limit {
            break;
        }
        if used_ref[p.r] || used_sub[p.s] {
            continue;
        }
        used_ref[p.r] = true;
        used_sub[p.s] = true;
        result.push(p);
    }

    result.sort_by_key(|p| p.r);
    result
}

/// Per-reference resolution: each reference keeps its own best subject.
fn resolve_disambiguating(pairs: Vec<RawPair>, n: usize) -> Vec<RawPair> {
    let mut best: Vec<Option<RawPair>> = vec![None; n];
    for p in pairs {
        let replace = match &best[p.r] {
            Some(current) => rank(&p, current) == Ordering::Less,
            None => true,
        };
        if replace {
            best[p.r] = Some(p);
        }
    }
    best.into_iter().flatten().collect()
}
