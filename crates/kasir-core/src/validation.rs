//! # Validation Module
//!
//! Turns client drafts into validated values before any database work.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractor                                               │
//! │  └── Malformed JSON / wrong types → 400                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required fields present and not blank                             │
//! │  ├── Lengths, SKU charset, non-negative price/stock                    │
//! │  └── Closed sets (role)                                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── UNIQUE (username, category name, sku)  → 409                      │
//! │  └── FOREIGN KEY (category_id, ...)          → 400 / 409                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::{
    CategoryDraft, NewCategory, NewProduct, NewUser, ProductDraft, Role, UserDraft,
};
use crate::MAX_USERNAME_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

pub const LOGIN_REQUIRED: &str = "Username dan password wajib diisi.";
pub const CATEGORY_REQUIRED: &str = "Nama kategori wajib diisi.";
pub const PRODUCT_REQUIRED: &str = "Data produk (category_id, sku, name, price, stock) wajib diisi.";
pub const REGISTRATION_REQUIRED: &str = "Username, password, dan role wajib diisi.";
pub const DEACTIVATION_REQUIRED: &str = "ID pengguna yang akan dideactivate wajib diisi.";

/// Trims and drops blank strings.
fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a SKU.
///
/// ## Rules
/// - Between 1 and 50 characters
/// - Letters, digits, hyphens, underscores and dots only
///
/// ```rust
/// use kasir_core::validation::validate_sku;
///
/// assert!(validate_sku("KOPI-001").is_ok());
/// assert!(validate_sku("").is_err());
/// assert!(validate_sku("has space").is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::required("sku"));
    }

    if sku.chars().count() > 50 {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: 50,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err(ValidationError::invalid(
            "sku",
            "hanya huruf, angka, tanda hubung, garis bawah, dan titik",
        ));
    }

    Ok(())
}

/// Validates a display name (product or category), at most `max` characters.
pub fn validate_name(field: &str, name: &str, max: usize) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::required(field));
    }

    if name.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

// =============================================================================
// Draft Validators
// =============================================================================

/// Validates login input and returns `(username, password)`.
///
/// The password is not trimmed; whitespace is part of it.
pub fn validate_credentials(
    username: Option<String>,
    password: Option<String>,
) -> ValidationResult<(String, String)> {
    match (present(username), password.filter(|p| !p.is_empty())) {
        (Some(username), Some(password)) => Ok((username, password)),
        _ => Err(ValidationError::Incomplete(LOGIN_REQUIRED)),
    }
}

/// Validates a category create/update payload.
pub fn validate_category(draft: CategoryDraft) -> ValidationResult<NewCategory> {
    let name = present(draft.name).ok_or(ValidationError::Incomplete(CATEGORY_REQUIRED))?;
    validate_name("name", &name, 100)?;

    Ok(NewCategory {
        name,
        description: present(draft.description),
    })
}

/// Validates a product create/update payload.
///
/// All of category_id, sku, name, price and stock are required on both
/// create and update. A zero category id counts as missing.
pub fn validate_product(draft: ProductDraft) -> ValidationResult<NewProduct> {
    let (Some(category_id), Some(sku), Some(name), Some(price), Some(stock)) = (
        draft.category_id.filter(|id| *id != 0),
        present(draft.sku),
        present(draft.name),
        draft.price,
        draft.stock,
    ) else {
        return Err(ValidationError::Incomplete(PRODUCT_REQUIRED));
    };

    validate_sku(&sku)?;
    validate_name("name", &name, 200)?;

    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }
    if stock < 0 {
        return Err(ValidationError::Negative {
            field: "stock".to_string(),
        });
    }

    Ok(NewProduct {
        category_id,
        sku,
        name,
        price,
        stock,
        description: present(draft.description),
    })
}

/// Validates a staff registration payload.
pub fn validate_registration(draft: UserDraft) -> ValidationResult<NewUser> {
    let (Some(username), Some(password), Some(role)) = (
        present(draft.username),
        draft.password.filter(|p| !p.is_empty()),
        present(draft.role),
    ) else {
        return Err(ValidationError::Incomplete(REGISTRATION_REQUIRED));
    };

    let role: Role = role.parse()?;
    validate_name("username", &username, MAX_USERNAME_LEN)?;
    if username.chars().any(char::is_whitespace) {
        return Err(ValidationError::invalid("username", "tidak boleh mengandung spasi"));
    }

    Ok(NewUser {
        username,
        password,
        fullname: present(draft.fullname),
        role,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
