//! Depth-limited regression trees fit by exact greedy splitting.
//!
//! These are the base learners of the boosted ensemble. Splits minimize
//! the summed squared error of the two children, found by scanning each
//! feature in sorted order with prefix sums:
//!
//! ```text
//! sse(side) = Σ t² − (Σ t)² / n
//! best split = argmin over (feature, position) of sse(left) + sse(right)
//! ```
//!
//! Fitting is fully deterministic: no feature or sample subsampling, and
//! ties resolve to the first (lowest feature index, leftmost position)
//! candidate.

use serde::{Deserialize, Serialize};

/// Structural limits for a single tree.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TreeParams {
    /// Maximum split depth; 0 means a single leaf.
    pub max_depth: usize,
    /// Minimum number of samples on each side of a split.
    pub min_samples_leaf: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A fitted regression tree over rows of schema-ordered feature values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct RegressionTree {
    nodes: Vec<Node>,
    root: usize,
}

impl RegressionTree {
    /// Fits a tree to `targets` over the given rows. Rows and targets are
    /// index-aligned; every row must have the same width.
    pub fn fit(
        rows: &[Vec<f64>],
        targets: &[f64],
        params: TreeParams,
    ) -> Self {
        let mut nodes = Vec::new();
        let indices: Vec<usize> = (0..targets.len()).collect();
        let root = build(rows, targets, indices, 0, params, &mut nodes);
        Self { nodes, root }
    }

    /// Scores one row: walks to a leaf, `value <= threshold` going left.
    pub fn predict(&self, row: &[f64]) -> f64 {
        match self.nodes[self.leaf_index(row)] {
            Node::Leaf { value } => value,
            // leaf_index only ever returns leaves.
            Node::Split { .. } => unreachable!("leaf_index returned a split"),
        }
    }

    /// Returns the arena index of the leaf this row falls into.
    pub fn leaf_index(&self, row: &[f64]) -> usize {
        let mut current = self.root;
        loop {
            match self.nodes[current] {
                Node::Leaf { .. } => return current,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    current = if row[feature] <= threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    /// Overwrites a leaf's value. Used by the quantile loss, which refits
    /// leaf values to residual quantiles after the structure is grown.
    pub fn set_leaf_value(&mut self, leaf: usize, value: f64) {
        match &mut self.nodes[leaf] {
            Node::Leaf { value: slot } => *slot = value,
            Node::Split { .. } => {
                debug_assert!(false, "set_leaf_value on a split node");
            }
        }
    }
}

/// Recursively grows the tree, returning the arena index of the new node.
fn build(
    rows: &[Vec<f64>],
    targets: &[f64],
    indices: Vec<usize>,
    depth: usize,
    params: TreeParams,
    nodes: &mut Vec<Node>,
) -> usize {
    let stop = depth >= params.max_depth
        || indices.len() < 2 * params.min_samples_leaf;

    if !stop {
        if let Some(split) =
            best_split(rows, targets, &indices, params.min_samples_leaf)
        {
            let left =
                build(rows, targets, split.left, depth + 1, params, nodes);
            let right =
                build(rows, targets, split.right, depth + 1, params, nodes);
            nodes.push(Node::Split {
                feature: split.feature,
                threshold: split.threshold,
                left,
                right,
            });
            return nodes.len() - 1;
        }
    }

    nodes.push(Node::Leaf {
        value: mean(targets, &indices),
    });
    nodes.len() - 1
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    left: Vec<usize>,
    right: Vec<usize>,
}

/// Finds the SSE-minimizing split, or `None` when no split improves on the
/// parent (all feature values tied, or min-leaf constraints unsatisfiable).
fn best_split(
    rows: &[Vec<f64>],
    targets: &[f64],
    indices: &[usize],
    min_leaf: usize,
) -> Option<SplitCandidate> {
    let n = indices.len();
    let n_features = rows.first().map_or(0, Vec::len);

    let total_sum: f64 = indices.iter().map(|&i| targets[i]).sum();
    let total_sumsq: f64 = indices.iter().map(|&i| targets[i].powi(2)).sum();
    #[expect(
        clippy::cast_precision_loss,
        reason = "sample counts are far below 2^52"
    )]
    let parent_sse = total_sumsq - total_sum.powi(2) / n as f64;

    let mut best: Option<(f64, usize, f64, Vec<usize>)> = None;

    for feature in 0..n_features {
        let mut order: Vec<usize> = indices.to_vec();
        order.sort_by(|&a, &b| {
            rows[a][feature].total_cmp(&rows[b][feature])
        });

        let mut left_sum = 0.0;
        let mut left_sumsq = 0.0;

        for k in 1..n {
            let t = targets[order[k - 1]];
            left_sum += t;
            left_sumsq += t * t;

            if k < min_leaf || n - k < min_leaf {
                continue;
            }

            let lo = rows[order[k - 1]][feature];
            let hi = rows[order[k]][feature];
            if lo >= hi {
                // Tied feature values cannot be separated.
                continue;
            }

            #[expect(
                clippy::cast_precision_loss,
                reason = "sample counts are far below 2^52"
            )]
            let sse = (left_sumsq - left_sum.powi(2) / k as f64)
                + ((total_sumsq - left_sumsq)
                    - (total_sum - left_sum).powi(2) / (n - k) as f64);

            let improves = match &best {
                Some((best_sse, ..)) => sse < *best_sse,
                None => sse < parent_sse - 1e-12,
            };
            if improves {
                let threshold = lo + (hi - lo) / 2.0;
                best = Some((sse, feature, threshold, order[..k].to_vec()));
            }
        }
    }

    let (_, feature, threshold, left) = best?;
    let mut in_left = vec![false; rows.len()];
    for &i in &left {
        in_left[i] = true;
    }
    let right: Vec<usize> =
        indices.iter().copied().filter(|&i| !in_left[i]).collect();
    Some(SplitCandidate {
        feature,
        threshold,
        left,
        right,
    })
}

fn mean(targets: &[f64], indices: &[usize]) -> f64 {
    if indices.is_empty() {
        return 0.0;
    }
    let sum: f64 = indices.iter().map(|&i| targets[i]).sum();
    #[expect(
        clippy::cast_precision_loss,
        reason = "sample counts are far below 2^52"
    )]
    let n = indices.len() as f64;
    sum / n
}
