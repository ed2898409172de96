use serde::Serialize;

use crate::aggregate::CategoryCount;
use crate::error::StructureError;

/// Id of the synthetic root. Shown on its own when nothing is shared.
pub const SENTINEL_ROOT: &str = "No common depicted words!";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HierarchyNode {
    pub id: String,
    pub parent_id: Option<String>,
    pub value: f64,
}

impl HierarchyNode {
    pub fn root() -> Self {
        Self {
            id: SENTINEL_ROOT.to_string(),
            parent_id: None,
            value: 0.0,
        }
    }

    pub fn leaf(id: impl Into<String>, value: f64) -> Self {
        Self {
            id: id.into(),
            parent_id: Some(SENTINEL_ROOT.to_string()),
            value,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Root first, then one leaf per category in input order.
pub fn build(counts: &[CategoryCount]) -> Result<Vec<HierarchyNode>, StructureError> {
    let mut nodes = Vec::with_capacity(counts.len() + 1);
    nodes.push(HierarchyNode::root());
    for count in counts {
        if count.key == SENTINEL_ROOT {
            return Err(StructureError::SentinelCollision);
        }
        nodes.push(HierarchyNode::leaf(count.key.clone(), count.weight as f64));
    }
    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_flat_tree_under_sentinel() {
        let counts = vec![CategoryCount::new("cat", 3), CategoryCount::new("dog", 2)];
        let nodes = build(&counts).unwrap();
        assert_eq!(nodes.len(), 3);
        assert!(nodes[0].is_root());
        assert_eq!(nodes[0].id, SENTINEL_ROOT);
        assert_eq!(nodes[0].value, 0.0);
        for node in &nodes[1..] {
            assert_eq!(node.parent_id.as_deref(), Some(SENTINEL_ROOT));
        }
        assert_eq!(nodes[1].value, 3.0);
        assert_eq!(nodes[2].id, "dog");
    }

    #[test]
    fn empty_counts_give_root_only() {
        let nodes = build(&[]).unwrap();
        assert_eq!(nodes, vec![HierarchyNode::root()]);
    }

    #[test]
    fn rejects_sentinel_key() {
        let counts = vec![
            CategoryCount::new("cat", 2),
            CategoryCount::new(SENTINEL_ROOT, 4),
        ];
        assert_eq!(build(&counts), Err(StructureError::SentinelCollision));
    }
}
