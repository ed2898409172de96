mod label;
mod treemap;
pub(crate) mod types;

pub use label::LabelPolicy;
pub use treemap::GOLDEN_RATIO;
pub use types::*;

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::error::StructureError;
use crate::hierarchy::HierarchyNode;

/// Treemap layout of a flat hierarchy inside `[0, 0, width, height]`.
///
/// The first rectangle is the root, covering the full area; the children
/// follow, largest value first (ties keep their input order), and tile the
/// root exactly.
pub fn layout(
    nodes: &[HierarchyNode],
    width: f64,
    height: f64,
) -> Result<Vec<LayoutRect>, StructureError> {
    let (root, mut children) = split_flat(nodes)?;
    let bounds = Rect::sized(width, height);

    children.sort_by(|a, b| {
        b.value
            .partial_cmp(&a.value)
            .unwrap_or(Ordering::Equal)
    });
    let values: Vec<f64> = children.iter().map(|node| node.value.max(0.0)).collect();
    let total: f64 = values.iter().sum();

    let mut out = Vec::with_capacity(children.len() + 1);
    out.push(LayoutRect::new(root.id.clone(), bounds, total));
    if children.is_empty() {
        return Ok(out);
    }
    let tiles = treemap::squarify(&values, bounds, GOLDEN_RATIO);
    for ((node, value), tile) in children.iter().zip(values).zip(tiles) {
        out.push(LayoutRect::new(node.id.clone(), tile, value));
    }
    Ok(out)
}

fn split_flat(
    nodes: &[HierarchyNode],
) -> Result<(&HierarchyNode, Vec<&HierarchyNode>), StructureError> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(nodes.len());
    let mut root: Option<&HierarchyNode> = None;
    for node in nodes {
        if !seen.insert(node.id.as_str()) {
            return Err(StructureError::DuplicateId(node.id.clone()));
        }
        if node.is_root() {
            if let Some(first) = root {
                return Err(StructureError::MultipleRoots {
                    first: first.id.clone(),
                    second: node.id.clone(),
                });
            }
            root = Some(node);
        }
    }
    let root = root.ok_or(StructureError::MissingRoot)?;

    let mut children = Vec::with_capacity(nodes.len().saturating_sub(1));
    for node in nodes {
        let Some(parent) = node.parent_id.as_deref() else {
            continue;
        };
        if parent != root.id {
            return Err(StructureError::NotFlat {
                id: node.id.clone(),
                parent: parent.to_string(),
                root: root.id.clone(),
            });
        }
        children.push(node);
    }
    Ok((root, children))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::CategoryCount;
    use crate::hierarchy::{self, SENTINEL_ROOT};

    fn nodes(weights: &[(&str, u64)]) -> Vec<HierarchyNode> {
        let counts: Vec<CategoryCount> = weights
            .iter()
            .map(|(key, weight)| CategoryCount::new(*key, *weight))
            .collect();
        hierarchy::build(&counts).unwrap()
    }

    #[test]
    fn root_sums_children_and_covers_bounds() {
        let rects = layout(&nodes(&[("cat", 4), ("dog", 3), ("owl", 2)]), 400.0, 300.0).unwrap();
        assert_eq!(rects.len(), 4);
        let root = &rects[0];
        assert_eq!(root.id, SENTINEL_ROOT);
        assert_eq!(root.value, 9.0);
        assert_eq!(root.rect(), Rect::sized(400.0, 300.0));
        let covered: f64 = rects[1..].iter().map(LayoutRect::area).sum();
        assert!((covered - root.area()).abs() < 1e-6);
    }

    #[test]
    fn areas_follow_values() {
        let rects = layout(
            &nodes(&[("a", 2), ("b", 9), ("c", 5), ("d", 5), ("e", 3)]),
            400.0,
            300.0,
        )
        .unwrap();
        let leaves = &rects[1..];
        for i in leaves {
            for j in leaves {
                let expected = i.value / j.value;
                let actual = i.area() / j.area();
                assert!((actual - expected).abs() / expected < 0.01, "{} vs {}", i.id, j.id);
            }
        }
    }

    #[test]
    fn children_sorted_descending_with_stable_ties() {
        let rects = layout(
            &nodes(&[("a", 2), ("b", 9), ("c", 5), ("d", 5), ("e", 3)]),
            400.0,
            300.0,
        )
        .unwrap();
        let order: Vec<&str> = rects[1..].iter().map(|rect| rect.id.as_str()).collect();
        assert_eq!(order, vec!["b", "c", "d", "e", "a"]);
    }

    #[test]
    fn leaves_do_not_overlap() {
        let rects = layout(
            &nodes(&[("a", 7), ("b", 6), ("c", 6), ("d", 4), ("e", 2), ("f", 2)]),
            300.0,
            300.0,
        )
        .unwrap();
        let leaves = &rects[1..];
        for (idx, a) in leaves.iter().enumerate() {
            for b in &leaves[idx + 1..] {
                let overlap_w = (a.x1.min(b.x1) - a.x0.max(b.x0)).max(0.0);
                let overlap_h = (a.y1.min(b.y1) - a.y0.max(b.y0)).max(0.0);
                assert!(overlap_w * overlap_h < 1e-6, "{} overlaps {}", a.id, b.id);
            }
        }
    }

    #[test]
    fn degenerate_inputs() {
        let rects = layout(&nodes(&[]), 400.0, 300.0).unwrap();
        assert_eq!(rects.len(), 1);
        assert_eq!(rects[0].value, 0.0);

        let rects = layout(&nodes(&[("solo", 3)]), 400.0, 300.0).unwrap();
        assert_eq!(rects[1].rect(), Rect::sized(400.0, 300.0));
    }

    #[test]
    fn rejects_malformed_hierarchies() {
        assert_eq!(
            layout(&[HierarchyNode::leaf("cat", 2.0)], 10.0, 10.0),
            Err(StructureError::MissingRoot)
        );

        let mut second = HierarchyNode::root();
        second.id = "other".to_string();
        assert!(matches!(
            layout(&[HierarchyNode::root(), second], 10.0, 10.0),
            Err(StructureError::MultipleRoots { .. })
        ));

        let mut nested = HierarchyNode::leaf("kitten", 1.0);
        nested.parent_id = Some("cat".to_string());
        let tree = vec![HierarchyNode::root(), HierarchyNode::leaf("cat", 2.0), nested];
        assert!(matches!(
            layout(&tree, 10.0, 10.0),
            Err(StructureError::NotFlat { .. })
        ));

        let tree = vec![
            HierarchyNode::root(),
            HierarchyNode::leaf("cat", 2.0),
            HierarchyNode::leaf("cat", 3.0),
        ];
        assert_eq!(
            layout(&tree, 10.0, 10.0),
            Err(StructureError::DuplicateId("cat".to_string()))
        );
    }
}
