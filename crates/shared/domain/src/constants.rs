//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Roles
// =============================================================================

/// Role required for catalog management
pub const ROLE_ADMIN: &str = "admin";

/// Role of regular storefront customers
pub const ROLE_USER: &str = "user";

// =============================================================================
// Validation
// =============================================================================

/// Maximum category name length (matches the column width)
pub const MAX_CATEGORY_NAME_LENGTH: usize = 100;

/// Maximum product name length (matches the column width)
pub const MAX_PRODUCT_NAME_LENGTH: usize = 200;

/// Sentinel category id meaning "no scoping" in list requests
pub const ALL_CATEGORIES: i32 = 0;

// =============================================================================
// Pagination
// =============================================================================

/// Default number of products per page
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Maximum allowed items per page to prevent excessive queries
pub const MAX_PAGE_SIZE: u64 = 100;

/// Default starting page number (1-indexed)
pub const DEFAULT_PAGE_NUMBER: u64 = 1;

// =============================================================================
// Authentication
// =============================================================================

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";
