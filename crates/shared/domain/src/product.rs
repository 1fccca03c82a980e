//! Product entity, soft delete state, and list options.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, MAX_PRODUCT_NAME_LENGTH};
use crate::error::{DomainError, DomainResult};

/// Product domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Product {
    pub id: i32,
    /// Attached category (None = uncategorized)
    pub category_id: Option<i32>,
    pub name: String,
    pub model_name: String,
    /// Price in minor currency units
    pub price: i64,
    pub stock_count: i32,
    /// Exposure timestamp (None = hidden from the storefront)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exposed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    /// Soft delete timestamp (None = alive, Some = deleted)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Check if product is soft deleted
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Check if product is shown on the storefront
    pub fn is_exposed(&self) -> bool {
        self.exposed_at.is_some()
    }

    /// Visible to customers: exposed and not deleted
    pub fn is_visible(&self) -> bool {
        self.is_exposed() && !self.is_deleted()
    }
}

/// Product creation data transfer object
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewProduct {
    pub category_id: Option<i32>,
    pub name: String,
    pub model_name: String,
    pub price: i64,
    pub stock_count: i32,
    /// Expose immediately after creation
    pub exposed: bool,
}

impl NewProduct {
    /// Validate and return the normalized command.
    pub fn normalized(self) -> DomainResult<Self> {
        let name = normalize_product_name(&self.name)?;
        let category_id = normalize_fields(self.category_id, self.price)?;
        Ok(Self {
            category_id,
            name,
            model_name: self.model_name.trim().to_string(),
            ..self
        })
    }
}

/// Product edit: every editable field is replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateProduct {
    pub id: i32,
    /// Target category; `None` (or 0) leaves the product uncategorized
    pub category_id: Option<i32>,
    pub name: String,
    pub model_name: String,
    pub price: i64,
    pub stock_count: i32,
    /// Shown on the storefront; an already exposed product keeps its timestamp
    pub exposed: bool,
}

impl UpdateProduct {
    /// Validate and return the normalized command.
    pub fn normalized(self) -> DomainResult<Self> {
        if self.id <= 0 {
            return Err(DomainError::validation("Product id is not valid"));
        }
        let name = normalize_product_name(&self.name)?;
        let category_id = normalize_fields(self.category_id, self.price)?;
        Ok(Self {
            category_id,
            name,
            model_name: self.model_name.trim().to_string(),
            ..self
        })
    }
}

fn normalize_product_name(name: &str) -> DomainResult<String> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(DomainError::validation("Product name cannot be empty"));
    }
    if name.chars().count() > MAX_PRODUCT_NAME_LENGTH {
        return Err(DomainError::validation(format!(
            "Product name must be at most {} characters",
            MAX_PRODUCT_NAME_LENGTH
        )));
    }
    Ok(name)
}

/// Checks price and returns the category with the 0 sentinel dropped.
fn normalize_fields(category_id: Option<i32>, price: i64) -> DomainResult<Option<i32>> {
    if price < 0 {
        return Err(DomainError::validation("Price cannot be negative"));
    }
    // 0 is the "no category" sentinel used by the admin forms
    let category_id = category_id.filter(|id| *id != 0);
    if matches!(category_id, Some(id) if id < 0) {
        return Err(DomainError::validation("Category id is not valid"));
    }
    Ok(category_id)
}

/// Which products a listing considers by deletion state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AliveFilter {
    /// Not soft-deleted
    #[default]
    Alive,
    /// Only soft-deleted
    Deleted,
    /// Everything
    All,
}

/// Product list query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductListOption {
    /// Substring match on the name
    pub name: Option<String>,
    /// Restrict to this category and all of its descendants
    pub category_id: Option<i32>,
    /// 1-based page number
    pub page: u64,
    /// Page size
    pub unit: u64,
    pub alive: AliveFilter,
}

impl Default for ProductListOption {
    fn default() -> Self {
        Self {
            name: None,
            category_id: None,
            page: DEFAULT_PAGE_NUMBER,
            unit: DEFAULT_PAGE_SIZE,
            alive: AliveFilter::Alive,
        }
    }
}

impl ProductListOption {
    /// Clamp paging and drop empty/sentinel filters.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.filter(|n| !n.is_empty()),
            category_id: self.category_id.filter(|id| *id > 0),
            page: self.page.max(1),
            unit: self.unit.clamp(1, MAX_PAGE_SIZE),
            alive: self.alive,
        }
    }

    /// Offset for the database query, capped to what a signed SQL
    /// OFFSET accepts
    pub fn offset(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.unit)
            .min(i64::MAX as u64)
    }
}
