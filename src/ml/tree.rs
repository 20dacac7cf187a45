use super::FeatureRow;
use serde::{Deserialize, Serialize};

/// Growth limits for a single boosted tree.
#[derive(Debug, Clone, Copy)]
pub struct TreeParams {
    pub max_depth: usize,
    /// Minimum hessian sum in each child.
    pub min_child_weight: f64,
    /// L2 penalty on leaf weights.
    pub lambda: f64,
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

/// Regression tree fitted to first and second order gradients.
///
/// Splits maximize the second-order gain `G_L²/(H_L+λ) + G_R²/(H_R+λ) - G²/(H+λ)`
/// and leaves hold the Newton step `-G/(H+λ)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

struct Builder<'a> {
    rows: &'a [FeatureRow],
    grad: &'a [f64],
    hess: &'a [f64],
    params: TreeParams,
    nodes: Vec<Node>,
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    gain: f64,
}

impl RegressionTree {
    /// Fit on the rows selected by `indices`.
    pub fn fit(
        rows: &[FeatureRow],
        grad: &[f64],
        hess: &[f64],
        indices: &[usize],
        params: TreeParams,
    ) -> Self {
        let mut builder = Builder {
            rows,
            grad,
            hess,
            params,
            nodes: Vec::new(),
        };
        builder.grow(indices.to_vec(), 0);
        Self {
            nodes: builder.nodes,
        }
    }

    pub fn predict(&self, row: &FeatureRow) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], idx: usize) -> usize {
            match &nodes[idx] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => {
                    1 + walk(nodes, *left).max(walk(nodes, *right))
                }
            }
        }
        walk(&self.nodes, 0)
    }
}

impl Builder<'_> {
    /// Push the subtree for `indices` and return its node index.
    fn grow(&mut self, indices: Vec<usize>, depth: usize) -> usize {
        let (g, h) = self.sums(&indices);
        let id = self.nodes.len();
        self.nodes.push(Node::Leaf {
            value: -g / (h + self.params.lambda),
        });

        if depth >= self.params.max_depth || indices.len() < 2 {
            return id;
        }

        let Some(best) = self.best_split(&indices, g, h) else {
            return id;
        };

        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&i| self.rows[i][best.feature] <= best.threshold);

        let left = self.grow(left_idx, depth + 1);
        let right = self.grow(right_idx, depth + 1);
        self.nodes[id] = Node::Split {
            feature: best.feature,
            threshold: best.threshold,
            left,
            right,
        };
        id
    }

    fn sums(&self, indices: &[usize]) -> (f64, f64) {
        indices.iter().fold((0.0, 0.0), |(g, h), &i| {
            (g + self.grad[i], h + self.hess[i])
        })
    }

    fn score(&self, g: f64, h: f64) -> f64 {
        g * g / (h + self.params.lambda)
    }

    fn best_split(&self, indices: &[usize], g_total: f64, h_total: f64) -> Option<BestSplit> {
        let parent = self.score(g_total, h_total);
        let n_features = self.rows.first().map(|r| r.len()).unwrap_or(0);
        let mut best: Option<BestSplit> = None;
        let mut sorted = indices.to_vec();

        for feature in 0..n_features {
            sorted.sort_by(|&a, &b| self.rows[a][feature].total_cmp(&self.rows[b][feature]));

            let mut g_left = 0.0;
            let mut h_left = 0.0;
            for pos in 0..sorted.len() - 1 {
                let i = sorted[pos];
                g_left += self.grad[i];
                h_left += self.hess[i];

                let here = self.rows[i][feature];
                let next = self.rows[sorted[pos + 1]][feature];
                if next <= here {
                    continue;
                }

                let h_right = h_total - h_left;
                if h_left < self.params.min_child_weight || h_right < self.params.min_child_weight
                {
                    continue;
                }

                let gain = self.score(g_left, h_left) + self.score(g_total - g_left, h_right)
                    - parent;
                if gain > 1e-12 && best.as_ref().map_or(true, |b| gain > b.gain) {
                    best = Some(BestSplit {
                        feature,
                        threshold: (here + next) / 2.0,
                        gain,
                    });
                }
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(max_depth: usize) -> TreeParams {
        TreeParams {
            max_depth,
            min_child_weight: 0.0,
            lambda: 0.0,
        }
    }

    #[test]
    fn splits_on_informative_feature() {
        // Target is +1 when feature 2 > 0, else -1; gradient = -target, hessian = 1.
        let rows: Vec<FeatureRow> = (0..10)
            .map(|i| [0.0, (i % 3) as f64, i as f64 - 4.5, 1.0])
            .collect();
        let grad: Vec<f64> = rows.iter().map(|r| if r[2] > 0.0 { -1.0 } else { 1.0 }).collect();
        let hess = vec![1.0; rows.len()];
        let idx: Vec<usize> = (0..rows.len()).collect();

        let tree = RegressionTree::fit(&rows, &grad, &hess, &idx, params(3));
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.predict(&[0.0, 0.0, 3.0, 1.0]), 1.0);
        assert_eq!(tree.predict(&[0.0, 0.0, -3.0, 1.0]), -1.0);
    }

    #[test]
    fn depth_zero_is_single_leaf() {
        let rows: Vec<FeatureRow> = vec![[0.0; 4], [1.0; 4]];
        let tree = RegressionTree::fit(&rows, &[1.0, -1.0], &[1.0, 1.0], &[0, 1], params(0));
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.predict(&[5.0; 4]), 0.0);
    }

    #[test]
    fn respects_max_depth() {
        let rows: Vec<FeatureRow> = (0..64).map(|i| [i as f64, 0.0, 0.0, 0.0]).collect();
        let grad: Vec<f64> = (0..64).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let hess = vec![1.0; 64];
        let idx: Vec<usize> = (0..64).collect();
        let tree = RegressionTree::fit(&rows, &grad, &hess, &idx, params(2));
        assert!(tree.depth() <= 2);
    }

    #[test]
    fn min_child_weight_blocks_tiny_children() {
        let rows: Vec<FeatureRow> = vec![[0.0; 4], [1.0; 4], [2.0; 4]];
        let tree = RegressionTree::fit(
            &rows,
            &[1.0, 1.0, -1.0],
            &[0.25, 0.25, 0.25],
            &[0, 1, 2],
            TreeParams {
                max_depth: 5,
                min_child_weight: 1.0,
                lambda: 1.0,
            },
        );
        assert_eq!(tree.node_count(), 1);
    }
}
