use super::tree::{RegressionTree, TreeParams};
use super::FeatureRow;
use crate::error::{Result, RiceIntelError};
use serde::{Deserialize, Serialize};

const MIN_HESSIAN: f64 = 1e-16;
const PROB_CLIP: f64 = 1e-6;

#[derive(Debug, Clone, Copy)]
pub struct BoostingParams {
    pub n_estimators: usize,
    pub learning_rate: f64,
    pub tree: TreeParams,
}

/// Gradient-boosted tree ensemble for classification.
///
/// Two classes are modelled with a single logistic score per round; more than
/// two use softmax with one tree per class per round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoostingClassifier {
    n_classes: usize,
    learning_rate: f64,
    base_score: Vec<f64>,
    /// `rounds[r][k]` is the tree for output `k` in round `r`.
    rounds: Vec<Vec<RegressionTree>>,
}

impl GradientBoostingClassifier {
    pub fn fit(
        rows: &[FeatureRow],
        labels: &[usize],
        n_classes: usize,
        params: &BoostingParams,
    ) -> Result<Self> {
        if rows.is_empty() || rows.len() != labels.len() {
            return Err(RiceIntelError::Model(format!(
                "Cannot fit on {} rows with {} labels",
                rows.len(),
                labels.len()
            )));
        }
        if n_classes < 2 {
            return Err(RiceIntelError::Model(format!(
                "Need at least 2 classes, got {}",
                n_classes
            )));
        }
        if labels.iter().any(|&y| y >= n_classes) {
            return Err(RiceIntelError::Model("Label index out of range".into()));
        }

        let n_outputs = if n_classes == 2 { 1 } else { n_classes };
        let base_score = prior_scores(labels, n_classes);
        let mut model = Self {
            n_classes,
            learning_rate: params.learning_rate,
            base_score,
            rounds: Vec::with_capacity(params.n_estimators),
        };

        let n = rows.len();
        let indices: Vec<usize> = (0..n).collect();
        let mut scores: Vec<Vec<f64>> = vec![model.base_score.clone(); n];
        let mut grad = vec![vec![0.0; n]; n_outputs];
        let mut hess = vec![vec![0.0; n]; n_outputs];

        for _ in 0..params.n_estimators {
            for i in 0..n {
                let probs = model.probabilities(&scores[i]);
                if n_outputs == 1 {
                    let p = probs[1];
                    let y = if labels[i] == 1 { 1.0 } else { 0.0 };
                    grad[0][i] = p - y;
                    hess[0][i] = (p * (1.0 - p)).max(MIN_HESSIAN);
                } else {
                    for k in 0..n_outputs {
                        let p = probs[k];
                        let y = if labels[i] == k { 1.0 } else { 0.0 };
                        grad[k][i] = p - y;
                        hess[k][i] = (p * (1.0 - p)).max(MIN_HESSIAN);
                    }
                }
            }

            let round: Vec<RegressionTree> = (0..n_outputs)
                .map(|k| RegressionTree::fit(rows, &grad[k], &hess[k], &indices, params.tree))
                .collect();

            tracing::trace!(
                "Round {}: first tree depth {}, {} nodes",
                model.rounds.len(),
                round[0].depth(),
                round[0].node_count()
            );

            for (i, row) in rows.iter().enumerate() {
                for (k, tree) in round.iter().enumerate() {
                    scores[i][k] += params.learning_rate * tree.predict(row);
                }
            }
            model.rounds.push(round);
        }

        Ok(model)
    }

    /// Raw additive scores: one value for binary models, one per class otherwise.
    pub fn decision_function(&self, row: &FeatureRow) -> Vec<f64> {
        let mut scores = self.base_score.clone();
        for round in &self.rounds {
            for (k, tree) in round.iter().enumerate() {
                scores[k] += self.learning_rate * tree.predict(row);
            }
        }
        scores
    }

    pub fn predict_proba(&self, row: &FeatureRow) -> Vec<f64> {
        self.probabilities(&self.decision_function(row))
    }

    pub fn predict(&self, row: &FeatureRow) -> usize {
        argmax(&self.predict_proba(row))
    }

    pub fn n_rounds(&self) -> usize {
        self.rounds.len()
    }

    fn probabilities(&self, scores: &[f64]) -> Vec<f64> {
        if self.n_classes == 2 {
            let p = sigmoid(scores[0]);
            vec![1.0 - p, p]
        } else {
            softmax(scores)
        }
    }
}

fn prior_scores(labels: &[usize], n_classes: usize) -> Vec<f64> {
    let n = labels.len() as f64;
    let freq: Vec<f64> = (0..n_classes)
        .map(|k| {
            let count = labels.iter().filter(|&&y| y == k).count() as f64;
            (count / n).clamp(PROB_CLIP, 1.0 - PROB_CLIP)
        })
        .collect();

    if n_classes == 2 {
        vec![(freq[1] / (1.0 - freq[1])).ln()]
    } else {
        freq.iter().map(|p| p.ln()).collect()
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.iter().map(|e| e / sum).collect()
}

/// First index of the largest value.
fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}
