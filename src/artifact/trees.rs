//! Gradient-boosted tree ensemble evaluation.
//!
//! A regression ensemble is evaluated as base_score plus the sum of one
//! leaf value per tree. Trees are stored as flat node arrays with index
//! links; node 0 is the root. Split semantics follow the exporter:
//! go left when `feature < threshold`, right otherwise.

use serde::{Deserialize, Serialize};

/// One node of a flat-stored decision tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// A single regression tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

impl Tree {
    /// Walk from the root to a leaf for the given encoded features.
    ///
    /// Node links are validated at load time, so traversal itself cannot
    /// escape the node array; an empty tree contributes nothing.
    pub fn evaluate(&self, features: &[f64]) -> f64 {
        let mut index = 0usize;
        loop {
            match self.nodes.get(index) {
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let value = features.get(*feature).copied().unwrap_or(0.0);
                    index = if value < *threshold { *left } else { *right };
                }
                Some(TreeNode::Leaf { value }) => return *value,
                None => return 0.0,
            }
        }
    }

    /// Structural check: every link stays inside the node array and points
    /// forward (flat dumps are topologically ordered), and every split
    /// feature index is below the encoded width.
    pub fn check(&self, feature_width: usize) -> Result<(), String> {
        for (i, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split {
                feature,
                left,
                right,
                ..
            } = node
            {
                if *feature >= feature_width {
                    return Err(format!(
                        "tree node {i} splits on feature {feature}, but the encoded width is {feature_width}"
                    ));
                }
                for child in [left, right] {
                    if *child >= self.nodes.len() {
                        return Err(format!(
                            "tree node {i} links to node {child}, out of range ({} nodes)",
                            self.nodes.len()
                        ));
                    }
                    if *child <= i {
                        return Err(format!(
                            "tree node {i} links backwards to node {child}"
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Evaluate a full ensemble.
pub fn evaluate_ensemble(base_score: f64, trees: &[Tree], features: &[f64]) -> f64 {
    base_score + trees.iter().map(|t| t.evaluate(features)).sum::<f64>()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump(feature: usize, threshold: f64, low: f64, high: f64) -> Tree {
        Tree {
            nodes: vec![
                TreeNode::Split {
                    feature,
                    threshold,
                    left: 1,
                    right: 2,
                },
                TreeNode::Leaf { value: low },
                TreeNode::Leaf { value: high },
            ],
        }
    }

    #[test]
    fn test_stump_routing() {
        let tree = stump(0, 5.0, -1.0, 1.0);
        assert_eq!(tree.evaluate(&[4.9]), -1.0);
        assert_eq!(tree.evaluate(&[5.0]), 1.0);
        assert_eq!(tree.evaluate(&[100.0]), 1.0);
    }

    #[test]
    fn test_ensemble_sums_trees() {
        let trees = vec![stump(0, 5.0, -1.0, 1.0), stump(1, 0.5, 10.0, 20.0)];
        // base 100, first tree -1 (4.0 < 5.0), second tree 20 (0.9 >= 0.5)
        assert_eq!(evaluate_ensemble(100.0, &trees, &[4.0, 0.9]), 119.0);
    }

    #[test]
    fn test_check_rejects_bad_links() {
        let tree = Tree {
            nodes: vec![TreeNode::Split {
                feature: 0,
                threshold: 1.0,
                left: 5,
                right: 1,
            }],
        };
        assert!(tree.check(4).unwrap_err().contains("out of range"));

        let tree = stump(7, 1.0, 0.0, 0.0);
        assert!(tree.check(4).unwrap_err().contains("feature 7"));

        assert!(stump(0, 1.0, 0.0, 0.0).check(4).is_ok());
    }

    #[test]
    fn test_nodes_roundtrip_through_json() {
        let tree = stump(2, 1.5, -3.0, 3.0);
        let json = serde_json::to_string(&tree).unwrap();
        let back: Tree = serde_json::from_str(&json).unwrap();
        assert_eq!(back.evaluate(&[0.0, 0.0, 2.0]), 3.0);
    }
}
