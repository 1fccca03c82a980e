//! Product category entity and the commands that mutate it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::MAX_CATEGORY_NAME_LENGTH;
use crate::error::{DomainError, DomainResult};

/// Product category as stored.
///
/// `parent_id == None` marks a root-level category. Sibling order is given
/// by `view_order` ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Category {
    /// Category identifier, assigned by the store
    pub id: i32,
    /// Parent category (None = root)
    pub parent_id: Option<i32>,
    /// Display name
    pub name: String,
    /// Customer-facing visibility
    pub is_active: bool,
    /// Sort key among siblings
    pub view_order: i32,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Check if this category sits at the top of a tree
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Trim a category name and reject blank or oversized values.
pub fn normalize_name(name: &str) -> DomainResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("Category name cannot be empty"));
    }
    if trimmed.chars().count() > MAX_CATEGORY_NAME_LENGTH {
        return Err(DomainError::validation(format!(
            "Category name must be at most {} characters",
            MAX_CATEGORY_NAME_LENGTH
        )));
    }
    Ok(trimmed.to_string())
}

fn validate_id(id: i32) -> DomainResult<()> {
    if id <= 0 {
        return Err(DomainError::validation("Category id is not valid"));
    }
    Ok(())
}

/// Category creation data transfer object
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewCategory {
    /// Parent category (None = root)
    pub parent_id: Option<i32>,
    /// Display name, trimmed before persistence
    pub name: String,
    /// Visibility, active when omitted
    pub is_active: Option<bool>,
    /// Sibling position, appended after existing siblings when omitted
    pub view_order: Option<i32>,
}

impl NewCategory {
    /// Validate and return the normalized command.
    pub fn normalized(self) -> DomainResult<Self> {
        if let Some(parent_id) = self.parent_id {
            validate_id(parent_id)?;
        }
        Ok(Self {
            name: normalize_name(&self.name)?,
            ..self
        })
    }
}

/// Category update data transfer object.
///
/// `parent_id` and `name` are always written; the remaining fields are
/// left untouched when `None`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateCategory {
    pub id: i32,
    pub parent_id: Option<i32>,
    pub name: String,
    pub is_active: Option<bool>,
    pub view_order: Option<i32>,
}

impl UpdateCategory {
    /// Validate and return the normalized command.
    pub fn normalized(self) -> DomainResult<Self> {
        validate_id(self.id)?;
        if let Some(parent_id) = self.parent_id {
            validate_id(parent_id)?;
            if parent_id == self.id {
                return Err(DomainError::validation(
                    "A category cannot be its own parent",
                ));
            }
        }
        Ok(Self {
            name: normalize_name(&self.name)?,
            ..self
        })
    }
}

/// Drag-and-drop move: re-parent a category and insert it at `position`
/// among its new siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct MoveCategory {
    pub id: i32,
    pub parent_id: Option<i32>,
    pub position: usize,
}

impl MoveCategory {
    /// Validate ids and self-parenting.
    pub fn validate(&self) -> DomainResult<()> {
        validate_id(self.id)?;
        if let Some(parent_id) = self.parent_id {
            validate_id(parent_id)?;
            if parent_id == self.id {
                return Err(DomainError::validation(
                    "A category cannot be its own parent",
                ));
            }
        }
        Ok(())
    }
}

/// Typed list filter. Omitted fields impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryFilter {
    /// Case-sensitive substring match on the name
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

impl CategoryFilter {
    /// Build a filter from raw request values; an empty name means "any".
    pub fn new(name: &str, is_active: Option<bool>) -> Self {
        let mut filter = Self::default();
        if !name.is_empty() {
            filter.name = Some(name.to_string());
        }
        filter.is_active = is_active;
        filter
    }

    /// Check whether a category satisfies every present constraint
    pub fn matches(&self, category: &Category) -> bool {
        if let Some(ref name) = self.name {
            if !category.name.contains(name.as_str()) {
                return false;
            }
        }
        if let Some(is_active) = self.is_active {
            if category.is_active != is_active {
                return false;
            }
        }
        true
    }

    /// True when no constraint is set
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.is_active.is_none()
    }
}

/// What happens to products attached to a deleted subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletePolicy {
    /// Clear the product's category reference
    DetachProducts,
    /// Soft delete the product (`deleted_at = now`)
    SoftDeleteProducts,
}

impl DeletePolicy {
    /// Map the `deleteRelatedProducts` flag onto a policy
    pub fn from_flag(delete_related_products: bool) -> Self {
        if delete_related_products {
            DeletePolicy::SoftDeleteProducts
        } else {
            DeletePolicy::DetachProducts
        }
    }
}

impl Default for DeletePolicy {
    fn default() -> Self {
        DeletePolicy::DetachProducts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: i32, name: &str, is_active: bool) -> Category {
        Category {
            id,
            parent_id: None,
            name: name.to_string(),
            is_active,
            view_order: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn normalize_name_trims_whitespace() {
        assert_eq!(normalize_name("  Shoes \n").unwrap(), "Shoes");
    }

    #[test]
    fn normalize_name_rejects_blank() {
        assert!(matches!(
            normalize_name("   "),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn update_rejects_self_parent() {
        let change = UpdateCategory {
            id: 4,
            parent_id: Some(4),
            name: "Loop".to_string(),
            is_active: None,
            view_order: None,
        };
        assert!(change.normalized().is_err());
    }

    #[test]
    fn new_category_rejects_non_positive_parent() {
        let new = NewCategory {
            parent_id: Some(0),
            name: "Orphan".to_string(),
            ..Default::default()
        };
        assert!(new.normalized().is_err());
    }

    #[test]
    fn empty_name_filter_imposes_no_constraint() {
        let filter = CategoryFilter::new("", None);
        assert!(filter.is_empty());
        assert!(filter.matches(&category(1, "anything", false)));
    }

    #[test]
    fn filters_intersect() {
        let filter = CategoryFilter::new("abc", Some(true));
        assert!(filter.matches(&category(1, "xabcx", true)));
        assert!(!filter.matches(&category(2, "xabcx", false)));
        assert!(!filter.matches(&category(3, "xyz", true)));
    }

    #[test]
    fn name_filter_is_case_sensitive() {
        let filter = CategoryFilter::new("abc", None);
        assert!(!filter.matches(&category(1, "ABC", true)));
    }

    #[test]
    fn delete_policy_from_flag() {
        assert_eq!(DeletePolicy::from_flag(true), DeletePolicy::SoftDeleteProducts);
        assert_eq!(DeletePolicy::from_flag(false), DeletePolicy::DetachProducts);
    }
}
