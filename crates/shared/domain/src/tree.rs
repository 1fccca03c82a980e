//! Flat category list to nested forest.
//!
//! Siblings keep their input order, so callers sort by `view_order` first.
//! Nodes whose parent is absent from the input (root categories, or the
//! top of a filtered result) become tree roots.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::error::{DomainError, DomainResult};

/// Category with its nested children, shaped for the admin tree grid.
///
/// `children` and `expanded` are only serialized for non-leaf nodes; their
/// absence tells the grid the row is a collapsed leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CategoryNode {
    pub id: i32,
    pub parent_id: Option<i32>,
    pub name: String,
    pub is_active: bool,
    pub view_order: i32,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CategoryNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanded: Option<bool>,
}

impl CategoryNode {
    fn new(category: &Category, children: Vec<CategoryNode>) -> Self {
        let expanded = (!children.is_empty()).then_some(true);
        Self {
            id: category.id,
            parent_id: category.parent_id,
            name: category.name.clone(),
            is_active: category.is_active,
            view_order: category.view_order,
            created_at: category.created_at,
            children,
            expanded,
        }
    }

    /// Check if this node has no children
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, including itself
    pub fn size(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            count += 1;
            pending.extend(node.children.iter());
        }
        count
    }
}

// Unlinks children level by level so dropping a deep chain does not recurse.
impl Drop for CategoryNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Group categories by `parent_id`, keeping input order inside each group.
pub fn group_by_parent(categories: &[Category]) -> HashMap<Option<i32>, Vec<&Category>> {
    let mut groups: HashMap<Option<i32>, Vec<&Category>> = HashMap::new();
    for category in categories {
        groups.entry(category.parent_id).or_default().push(category);
    }
    groups
}

/// Nest a flat category list into a forest.
///
/// Works with an explicit stack, so hierarchy depth is only bounded by
/// memory. Fails with [`DomainError::CycleDetected`] when a category is
/// reached twice or cannot be reached from any root, which only happens
/// when the parent relation is corrupt.
pub fn build_forest(categories: &[Category]) -> DomainResult<Vec<CategoryNode>> {
    if categories.is_empty() {
        return Ok(Vec::new());
    }

    let present: HashSet<i32> = categories.iter().map(|c| c.id).collect();
    let groups = group_by_parent(categories);

    let tops: Vec<&Category> = categories
        .iter()
        .filter(|c| match c.parent_id {
            None => true,
            Some(parent_id) => !present.contains(&parent_id),
        })
        .collect();

    // Pre-order walk: every category comes after its parent
    let mut visited = HashSet::with_capacity(categories.len());
    let mut order: Vec<&Category> = Vec::with_capacity(categories.len());
    let mut stack: Vec<&Category> = tops.iter().rev().copied().collect();
    while let Some(category) = stack.pop() {
        if !visited.insert(category.id) {
            return Err(DomainError::CycleDetected(category.id));
        }
        order.push(category);
        if let Some(kids) = groups.get(&Some(category.id)) {
            stack.extend(kids.iter().rev().copied());
        }
    }

    if visited.len() < categories.len() {
        let stray = categories
            .iter()
            .find(|c| !visited.contains(&c.id))
            .map(|c| c.id)
            .unwrap_or_default();
        return Err(DomainError::CycleDetected(stray));
    }

    // Reverse pre-order builds every subtree before its parent
    let mut built: HashMap<i32, CategoryNode> = HashMap::with_capacity(order.len());
    for category in order.into_iter().rev() {
        let children = match groups.get(&Some(category.id)) {
            Some(kids) => take_built(&mut built, kids)?,
            None => Vec::new(),
        };
        built.insert(category.id, CategoryNode::new(category, children));
    }

    take_built(&mut built, &tops)
}

fn take_built(
    built: &mut HashMap<i32, CategoryNode>,
    categories: &[&Category],
) -> DomainResult<Vec<CategoryNode>> {
    categories
        .iter()
        .map(|c| {
            built
                .remove(&c.id)
                .ok_or_else(|| DomainError::CycleDetected(c.id))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: i32, parent_id: Option<i32>, view_order: i32) -> Category {
        Category {
            id,
            parent_id,
            name: format!("category-{}", id),
            is_active: true,
            view_order,
            created_at: DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap(),
        }
    }

    #[test]
    fn empty_input_builds_empty_forest() {
        assert!(build_forest(&[]).unwrap().is_empty());
    }

    #[test]
    fn nests_children_under_parents_in_input_order() {
        let flat = vec![
            category(1, None, 0),
            category(6, None, 1),
            category(3, Some(1), 0),
            category(2, Some(1), 1),
            category(4, Some(3), 0),
        ];
        let forest = build_forest(&flat).unwrap();

        assert_eq!(forest.len(), 2);
        assert_eq!(forest[0].id, 1);
        let kids: Vec<i32> = forest[0].children.iter().map(|n| n.id).collect();
        assert_eq!(kids, vec![3, 2]);
        assert_eq!(forest[0].children[0].children[0].id, 4);
        assert_eq!(forest[1].id, 6);
        assert_eq!(forest.iter().map(CategoryNode::size).sum::<usize>(), 5);
    }

    #[test]
    fn expanded_only_on_nodes_with_children() {
        let flat = vec![category(1, None, 0), category(2, Some(1), 0)];
        let forest = build_forest(&flat).unwrap();

        assert_eq!(forest[0].expanded, Some(true));
        assert_eq!(forest[0].children[0].expanded, None);
        assert!(forest[0].children[0].is_leaf());
    }

    #[test]
    fn leaf_serializes_without_children_or_expanded() {
        let flat = vec![category(1, None, 0), category(2, Some(1), 0)];
        let json = serde_json::to_value(build_forest(&flat).unwrap()).unwrap();

        assert_eq!(json[0]["expanded"], serde_json::json!(true));
        assert!(json[0]["children"].is_array());
        let leaf = &json[0]["children"][0];
        assert!(leaf.get("children").is_none());
        assert!(leaf.get("expanded").is_none());
    }

    #[test]
    fn building_twice_is_identical() {
        let flat = vec![
            category(1, None, 0),
            category(2, Some(1), 0),
            category(3, Some(2), 0),
        ];
        assert_eq!(build_forest(&flat).unwrap(), build_forest(&flat).unwrap());
    }

    #[test]
    fn orphan_of_filtered_list_becomes_root() {
        // parent 1 filtered out of the list
        let flat = vec![category(2, Some(1), 0), category(3, Some(2), 0)];
        let forest = build_forest(&flat).unwrap();

        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].id, 2);
        assert_eq!(forest[0].children[0].id, 3);
    }

    #[test]
    fn cycle_fails_instead_of_recursing() {
        let flat = vec![
            category(1, None, 0),
            category(2, Some(3), 0),
            category(3, Some(2), 0),
        ];
        assert!(matches!(
            build_forest(&flat),
            Err(DomainError::CycleDetected(2))
        ));
    }

    #[test]
    fn self_parent_is_a_cycle() {
        let flat = vec![category(7, Some(7), 0)];
        assert!(matches!(
            build_forest(&flat),
            Err(DomainError::CycleDetected(7))
        ));
    }

    #[test]
    fn group_by_parent_keeps_root_group() {
        let flat = vec![category(1, None, 0), category(2, None, 1), category(3, Some(1), 0)];
        let groups = group_by_parent(&flat);
        assert_eq!(groups[&None].len(), 2);
        assert_eq!(groups[&Some(1)][0].id, 3);
    }

    #[test]
    fn deep_chain_builds_without_recursion() {
        let depth = 20_000;
        let flat: Vec<Category> = (1..=depth)
            .map(|id| category(id, (id > 1).then_some(id - 1), 0))
            .collect();

        let forest = build_forest(&flat).unwrap();
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].size(), depth as usize);

        let mut levels = 1;
        let mut node = &forest[0];
        while let Some(child) = node.children.first() {
            assert_eq!(child.parent_id, Some(node.id));
            node = child;
            levels += 1;
        }
        assert_eq!(levels, depth);
        assert!(node.is_leaf());

        drop(forest);
    }
}
