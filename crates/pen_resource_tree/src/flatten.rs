//! Depth first flattening and identity based child indexing.
//!
//! Consumers outside the process cannot hold node references, so a tree is
//! flattened once into an ordered sequence and every parent/child edge is
//! re-expressed as a position in that same sequence.

use crate::node::ResourceNode;
use std::collections::HashMap;

/// Flatten a tree below `root` in pre-order (parent before children, children
/// in order).
///
/// Every node appears exactly once. Nodes are not deduplicated: two nodes that
/// share a resource handle keep their own positions.
pub fn flatten(root: &ResourceNode) -> Vec<&ResourceNode> {
    flatten_all(std::slice::from_ref(root))
}

/// Flatten several roots one after the other.
pub fn flatten_all<'a>(roots: impl IntoIterator<Item = &'a ResourceNode>) -> Vec<&'a ResourceNode> {
    let mut flat = Vec::new();

    // Explicit stack, deep material/texture chains must not overflow
    let mut stack: Vec<&ResourceNode> = roots.into_iter().collect();
    stack.reverse();
    while let Some(node) = stack.pop() {
        flat.push(node);
        stack.extend(node.children.iter().rev());
    }

    flat
}

/// For every node of `flat`, the positions of its children within `flat`.
///
/// Children are looked up by identity, never by content, so two equal looking
/// nodes resolve to their own positions. A child that is not part of `flat`
/// resolves to `None`. If a node occurs more than once, its first position is
/// used.
pub fn child_indices(flat: &[&ResourceNode]) -> Vec<Vec<Option<usize>>> {
    let mut positions: HashMap<*const ResourceNode, usize> = HashMap::with_capacity(flat.len());
    for (index, node) in flat.iter().enumerate() {
        positions.entry(*node as *const ResourceNode).or_insert(index);
    }

    flat.iter()
        .map(|node| {
            node.children
                .iter()
                .map(|child| positions.get(&(child as *const ResourceNode)).copied())
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{ResourceHandle, ResourceType};

    fn leaf(handle: usize, path: &str) -> ResourceNode {
        ResourceNode::new(ResourceType::Tex, ResourceHandle(handle), path)
    }

    #[test]
    fn test_root_with_two_leaves() {
        let root = ResourceNode::new(ResourceType::Mtrl, ResourceHandle(1), "/m.mtrl")
            .with_child(leaf(2, "/a.tex"))
            .with_child(leaf(3, "/b.tex"));

        let flat = flatten(&root);
        assert_eq!(flat.len(), 3);

        let indices = child_indices(&flat);
        assert_eq!(indices[0], vec![Some(1), Some(2)]);
        assert!(indices[1].is_empty());
        assert!(indices[2].is_empty());
    }

    #[test]
    fn test_preorder() {
        let root = ResourceNode::new(ResourceType::Mdl, ResourceHandle(1), "root")
            .with_child(
                ResourceNode::new(ResourceType::Mtrl, ResourceHandle(2), "m1")
                    .with_child(leaf(3, "t1"))
                    .with_child(leaf(4, "t2")),
            )
            .with_child(
                ResourceNode::new(ResourceType::Mtrl, ResourceHandle(5), "m2")
                    .with_child(leaf(6, "t3")),
            );

        let flat = flatten(&root);
        let paths: Vec<&str> = flat.iter().map(|n| n.full_path.as_str()).collect();
        assert_eq!(paths, vec!["root", "m1", "t1", "t2", "m2", "t3"]);

        let indices = child_indices(&flat);
        assert_eq!(indices[0], vec![Some(1), Some(4)]);
        assert_eq!(indices[1], vec![Some(2), Some(3)]);
        assert_eq!(indices[4], vec![Some(5)]);
    }

    #[test]
    fn test_identical_children_keep_their_own_positions() {
        // Same texture referenced twice: equal content, distinct nodes
        let root = ResourceNode::new(ResourceType::Mtrl, ResourceHandle(1), "/m.mtrl")
            .with_child(leaf(7, "/shared.tex"))
            .with_child(leaf(7, "/shared.tex"));

        let flat = flatten(&root);
        assert_eq!(flat.len(), 3);
        assert_eq!(flat[1], flat[2]);
        assert_eq!(child_indices(&flat)[0], vec![Some(1), Some(2)]);
    }

    #[test]
    fn test_missing_child_is_unresolved() {
        let root = ResourceNode::new(ResourceType::Mtrl, ResourceHandle(1), "/m.mtrl")
            .with_child(leaf(2, "/a.tex"))
            .with_child(leaf(3, "/b.tex"));

        // Partial sequence without the first child
        let partial = vec![&root, &root.children[1]];
        let indices = child_indices(&partial);
        assert_eq!(indices[0], vec![None, Some(1)]);
    }

    #[test]
    fn test_flatten_all_keeps_root_order() {
        let roots = vec![leaf(1, "first"), leaf(2, "second").with_child(leaf(3, "third"))];
        let flat = flatten_all(&roots);
        let paths: Vec<&str> = flat.iter().map(|n| n.full_path.as_str()).collect();
        assert_eq!(paths, vec!["first", "second", "third"]);
    }
}
