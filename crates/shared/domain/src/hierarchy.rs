//! Transitive closure over the category parent relation.
//!
//! The index is built from `(id, parent_id)` pairs and answers subtree,
//! ancestor and descendant questions without any depth limit. Every walk
//! keeps a visited set so corrupt data (a cycle in `parent_id`) fails with
//! [`DomainError::CycleDetected`] instead of looping.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::category::Category;
use crate::error::{DomainError, DomainResult};

/// Parent/children lookup tables for a set of categories.
#[derive(Debug, Clone, Default)]
pub struct ParentIndex {
    parents: HashMap<i32, Option<i32>>,
    children: HashMap<i32, Vec<i32>>,
}

impl ParentIndex {
    /// Build the index from `(id, parent_id)` pairs. Child lists keep the
    /// input order.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (i32, Option<i32>)>,
    {
        let mut index = Self::default();
        for (id, parent_id) in pairs {
            index.parents.insert(id, parent_id);
            if let Some(parent_id) = parent_id {
                index.children.entry(parent_id).or_default().push(id);
            }
        }
        index
    }

    /// Build the index from stored categories.
    pub fn from_categories(categories: &[Category]) -> Self {
        Self::from_pairs(categories.iter().map(|c| (c.id, c.parent_id)))
    }

    /// Check if a category id is known to the index
    pub fn contains(&self, id: i32) -> bool {
        self.parents.contains_key(&id)
    }

    /// Number of indexed categories
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    /// True when nothing is indexed
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Direct children of a category, in input order
    pub fn children_of(&self, id: i32) -> &[i32] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `root` followed by every transitive descendant, breadth first.
    pub fn subtree(&self, root: i32) -> DomainResult<Vec<i32>> {
        if !self.contains(root) {
            return Err(DomainError::not_found(format!("Category {}", root)));
        }

        let mut visited = HashSet::from([root]);
        let mut ordered = vec![root];
        let mut queue = VecDeque::from([root]);

        while let Some(current) = queue.pop_front() {
            for &child in self.children_of(current) {
                if !visited.insert(child) {
                    return Err(DomainError::CycleDetected(child));
                }
                ordered.push(child);
                queue.push_back(child);
            }
        }

        Ok(ordered)
    }

    /// Ancestors of `id`, nearest first. Stops at a root or at a parent
    /// that is not indexed.
    pub fn ancestors(&self, id: i32) -> DomainResult<Vec<i32>> {
        let mut visited = HashSet::from([id]);
        let mut chain = Vec::new();
        let mut current = self.parents.get(&id).copied().flatten();

        while let Some(parent) = current {
            if !visited.insert(parent) {
                return Err(DomainError::CycleDetected(parent));
            }
            chain.push(parent);
            current = self.parents.get(&parent).copied().flatten();
        }

        Ok(chain)
    }

    /// Check if `candidate` lies strictly below `ancestor`.
    pub fn is_descendant(&self, ancestor: i32, candidate: i32) -> DomainResult<bool> {
        Ok(self.ancestors(candidate)?.contains(&ancestor))
    }

    /// Reject re-parenting `id` under `new_parent` when that would make the
    /// category its own ancestor.
    pub fn ensure_acyclic_move(&self, id: i32, new_parent: Option<i32>) -> DomainResult<()> {
        let Some(parent) = new_parent else {
            return Ok(());
        };
        if parent == id || self.is_descendant(id, parent)? {
            return Err(DomainError::CycleDetected(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ParentIndex {
        // 1 -> 2 -> 3, 1 -> 4, 5 (separate root)
        ParentIndex::from_pairs([
            (1, None),
            (2, Some(1)),
            (3, Some(2)),
            (4, Some(1)),
            (5, None),
        ])
    }

    #[test]
    fn subtree_includes_root_and_all_descendants() {
        let mut ids = sample().subtree(1).unwrap();
        ids.sort();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn subtree_of_leaf_is_itself() {
        assert_eq!(sample().subtree(3).unwrap(), vec![3]);
    }

    #[test]
    fn subtree_of_unknown_root_is_not_found() {
        assert!(matches!(
            sample().subtree(42),
            Err(DomainError::NotFound(_))
        ));
    }

    #[test]
    fn deep_chain_has_no_depth_limit() {
        let depth = 5_000;
        let pairs = (1..=depth).map(|id| (id, if id == 1 { None } else { Some(id - 1) }));
        let index = ParentIndex::from_pairs(pairs);
        assert_eq!(index.subtree(1).unwrap().len(), depth as usize);
        assert_eq!(index.ancestors(depth).unwrap().len(), depth as usize - 1);
    }

    #[test]
    fn cycle_is_detected_not_looped() {
        let index = ParentIndex::from_pairs([(1, Some(3)), (2, Some(1)), (3, Some(2))]);
        assert!(matches!(
            index.subtree(1),
            Err(DomainError::CycleDetected(_))
        ));
        assert!(matches!(
            index.ancestors(1),
            Err(DomainError::CycleDetected(_))
        ));
    }

    #[test]
    fn ancestors_nearest_first() {
        assert_eq!(sample().ancestors(3).unwrap(), vec![2, 1]);
        assert!(sample().ancestors(5).unwrap().is_empty());
    }

    #[test]
    fn moving_under_own_descendant_is_rejected() {
        let index = sample();
        assert!(matches!(
            index.ensure_acyclic_move(1, Some(3)),
            Err(DomainError::CycleDetected(1))
        ));
        assert!(index.ensure_acyclic_move(3, Some(4)).is_ok());
        assert!(index.ensure_acyclic_move(2, None).is_ok());
    }
}
