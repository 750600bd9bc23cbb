use arc_swap::ArcSwapOption;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::debug;
use warden_dns_domain::{AnomalyEngineStats, DomainFeatures};

const FEATURE_DIMS: usize = 5;
const TREES: usize = 100;
const SUBSAMPLE: usize = 256;

/// Refit schedule: geometric (every doubling) until this many samples,
/// then linear.
const GEOMETRIC_CAP: u64 = 8192;
const LINEAR_REFIT_STEP: u64 = 1000;

const SCORE_WINDOW: usize = 512;
const THRESHOLD_PERCENTILE: f64 = 0.05;
const THRESHOLD_CLAMP: (f64, f64) = (-0.3, 0.0);

/// Harmonic-number approximation used for expected path lengths.
fn harmonic(n: f64) -> f64 {
    n.ln() + 0.577_215_664_901_532_9
}

/// Average unsuccessful-search path length in a BST of n points.
fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        n => {
            let n = n as f64;
            2.0 * harmonic(n - 1.0) - 2.0 * (n - 1.0) / n
        }
    }
}

enum Node {
    Split {
        dim: usize,
        value: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        size: usize,
    },
}

struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn fit(samples: &[[f64; FEATURE_DIMS]], max_depth: usize, rng: &mut fastrand::Rng) -> Self {
        let mut tree = Tree { nodes: Vec::new() };
        let indices: Vec<usize> = (0..samples.len()).collect();
        tree.build(samples, indices, 0, max_depth, rng);
        tree
    }

    fn build(
        &mut self,
        samples: &[[f64; FEATURE_DIMS]],
        indices: Vec<usize>,
        depth: usize,
        max_depth: usize,
        rng: &mut fastrand::Rng,
    ) -> usize {
        if indices.len() <= 1 || depth >= max_depth {
            self.nodes.push(Node::Leaf {
                size: indices.len(),
            });
            return self.nodes.len() - 1;
        }

        let dim = rng.usize(..FEATURE_DIMS);
        let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
        for &i in &indices {
            lo = lo.min(samples[i][dim]);
            hi = hi.max(samples[i][dim]);
        }
        if !(hi > lo) {
            // Constant along the chosen axis; nothing left to isolate.
            self.nodes.push(Node::Leaf {
                size: indices.len(),
            });
            return self.nodes.len() - 1;
        }

        let value = lo + rng.f64() * (hi - lo);
        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) =
            indices.iter().copied().partition(|&i| samples[i][dim] < value);

        let slot = self.nodes.len();
        self.nodes.push(Node::Leaf { size: 0 }); // placeholder
        let left = self.build(samples, left_idx, depth + 1, max_depth, rng);
        let right = self.build(samples, right_idx, depth + 1, max_depth, rng);
        self.nodes[slot] = Node::Split {
            dim,
            value,
            left,
            right,
        };
        slot
    }

    fn path_length(&self, x: &[f64; FEATURE_DIMS]) -> f64 {
        let mut node = 0;
        let mut depth = 0.0;
        loop {
            match &self.nodes[node] {
                Node::Leaf { size } => return depth + average_path_length(*size),
                Node::Split {
                    dim,
                    value,
                    left,
                    right,
                } => {
                    node = if x[*dim] < *value { *left } else { *right };
                    depth += 1.0;
                }
            }
        }
    }
}

/// Isolation-forest ensemble over the domain feature vector. Scores follow
/// the signed decision-function convention: values below zero are more
/// anomalous than the training mass.
pub struct IsolationForest {
    trees: Vec<Tree>,
    normalizer: f64,
}

impl IsolationForest {
    pub fn fit(samples: &[[f64; FEATURE_DIMS]], rng: &mut fastrand::Rng) -> Self {
        let psi = samples.len().min(SUBSAMPLE);
        let max_depth = (psi as f64).log2().ceil().max(1.0) as usize;

        let trees = (0..TREES)
            .map(|_| {
                let subsample: Vec<[f64; FEATURE_DIMS]> =
                    (0..psi).map(|_| samples[rng.usize(..samples.len())]).collect();
                Tree::fit(&subsample, max_depth, rng)
            })
            .collect();

        Self {
            trees,
            normalizer: average_path_length(psi),
        }
    }

    /// Signed score; lower = more anomalous. Zero-centered around the
    /// 0.5 isolation score of an average inlier.
    pub fn decision(&self, x: &[f64; FEATURE_DIMS]) -> f64 {
        if self.normalizer <= 0.0 {
            return 0.0;
        }
        let mean_path: f64 = self
            .trees
            .iter()
            .map(|tree| tree.path_length(x))
            .sum::<f64>()
            / self.trees.len() as f64;
        let isolation = 2f64.powf(-mean_path / self.normalizer);
        0.5 - isolation
    }
}

struct FitState {
    samples: VecDeque<[f64; FEATURE_DIMS]>,
    seen: u64,
    next_fit_at: u64,
    recent_scores: VecDeque<f64>,
    threshold: f64,
    rng: fastrand::Rng,
}

/// Incremental outlier detector over recent traffic. Samples accumulate
/// in a bounded ring; refits happen at geometric intervals and publish an
/// immutable model snapshot, so scoring never blocks a fit in progress.
pub struct AnomalyEngine {
    state: Mutex<FitState>,
    model: ArcSwapOption<IsolationForest>,
    min_samples: usize,
    buffer_capacity: usize,
    fits: AtomicU64,
}

impl AnomalyEngine {
    pub fn new(min_samples: usize, buffer_capacity: usize, initial_threshold: f64) -> Self {
        Self {
            state: Mutex::new(FitState {
                samples: VecDeque::with_capacity(buffer_capacity.min(4096)),
                seen: 0,
                next_fit_at: min_samples.max(2) as u64,
                recent_scores: VecDeque::with_capacity(SCORE_WINDOW),
                threshold: initial_threshold,
                rng: fastrand::Rng::with_seed(0x5eed_0f0e),
            }),
            model: ArcSwapOption::const_empty(),
            min_samples: min_samples.max(2),
            buffer_capacity: buffer_capacity.max(16),
            fits: AtomicU64::new(0),
        }
    }

    /// Appends a sample to the ring buffer and refits when the schedule
    /// says so. Serialized by the state lock; readers keep scoring the
    /// previous snapshot meanwhile.
    pub fn fit_incremental(&self, features: &DomainFeatures) {
        let mut state = self.state.lock().unwrap();
        if state.samples.len() == self.buffer_capacity {
            state.samples.pop_front();
        }
        state.samples.push_back(features.vector());
        state.seen += 1;

        if state.seen < self.min_samples as u64 || state.seen < state.next_fit_at {
            return;
        }

        let samples: Vec<[f64; FEATURE_DIMS]> = state.samples.iter().copied().collect();
        let forest = IsolationForest::fit(&samples, &mut state.rng);
        self.model.store(Some(Arc::new(forest)));
        self.fits.fetch_add(1, Ordering::Relaxed);

        state.next_fit_at = if state.seen < GEOMETRIC_CAP {
            state.seen * 2
        } else {
            state.seen + LINEAR_REFIT_STEP
        };

        // Adaptive cut: 5th percentile of recent scores, clamped.
        if state.recent_scores.len() >= self.min_samples {
            let mut sorted: Vec<f64> = state.recent_scores.iter().copied().collect();
            sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            let rank =
                ((sorted.len() as f64 * THRESHOLD_PERCENTILE) as usize).min(sorted.len() - 1);
            state.threshold = sorted[rank].clamp(THRESHOLD_CLAMP.0, THRESHOLD_CLAMP.1);
        }

        debug!(
            seen = state.seen,
            next_fit_at = state.next_fit_at,
            threshold = state.threshold,
            "Anomaly model refit"
        );
    }

    /// Signed score, lower = more anomalous; 0.0 before the first fit.
    pub fn score(&self, features: &DomainFeatures) -> f64 {
        let Some(model) = self.model.load_full() else {
            return 0.0;
        };
        let score = model.decision(&features.vector());

        let mut state = self.state.lock().unwrap();
        if state.recent_scores.len() == SCORE_WINDOW {
            state.recent_scores.pop_front();
        }
        state.recent_scores.push_back(score);
        score
    }

    /// (score, is_anomaly) in one call; (0.0, false) during cold start.
    pub fn evaluate(&self, features: &DomainFeatures) -> (f64, bool) {
        if !self.is_trained() {
            return (0.0, false);
        }
        let score = self.score(features);
        let threshold = self.state.lock().unwrap().threshold;
        (score, score < threshold)
    }

    pub fn is_trained(&self) -> bool {
        self.model.load().is_some()
    }

    pub fn threshold(&self) -> f64 {
        self.state.lock().unwrap().threshold
    }

    pub fn stats(&self) -> AnomalyEngineStats {
        let state = self.state.lock().unwrap();
        AnomalyEngineStats {
            samples_seen: state.seen,
            buffer_len: state.samples.len(),
            fits: self.fits.load(Ordering::Relaxed),
            trained: self.model.load().is_some(),
        }
    }
}
