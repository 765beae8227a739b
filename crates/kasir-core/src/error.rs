//! # Error Types
//!
//! Domain-specific error types for kasir-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kasir-core errors (this file)                                         │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  kasir-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  kasir-api errors                                                      │
//! │  └── ApiError         - What the HTTP client sees ({message, code})    │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → JSON body              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Messages are shown to store staff as-is, so they are written in Indonesian.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A sale line references a product id that does not exist.
    #[error("Produk dengan ID {0} tidak ditemukan.")]
    ProductNotFound(i64),

    /// Requested quantity exceeds the stock read for the product.
    ///
    /// ## User Workflow
    /// ```text
    /// POST /transactions  items: [{product_id: 1, quantity: 1000}]
    ///      │
    ///      ▼
    /// Read product 1: stock = 5
    ///      │
    ///      ▼
    /// InsufficientStock { product: "Kopi Susu", remaining: 5 }
    ///      │
    ///      ▼
    /// 400 "Stok tidak cukup untuk produk Kopi Susu. Tersisa: 5"
    /// ```
    #[error("Stok tidak cukup untuk produk {product}. Tersisa: {remaining}")]
    InsufficientStock { product: String, remaining: i64 },

    /// The caller's role is not in the route's required set.
    #[error("Akses terlarang. Diperlukan peran {required}.")]
    Forbidden { required: String },

    /// An account tried to deactivate itself.
    #[error("Tidak dapat menonaktifkan akun sendiri.")]
    SelfDeactivation,

    /// Validation error (wraps ValidationError).
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any store access so a bad payload never opens a
/// database transaction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// One or more required fields are missing. Carries the full message
    /// for the payload, e.g. "Nama kategori wajib diisi."
    #[error("{0}")]
    Incomplete(&'static str),

    /// A single required field is missing or blank.
    #[error("{field} wajib diisi.")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} maksimal {max} karakter.")]
    TooLong { field: String, max: usize },

    /// Value must be strictly positive.
    #[error("{field} harus lebih dari 0.")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} tidak boleh negatif.")]
    Negative { field: String },

    /// Invalid format (bad id, unparseable amount, malformed JSON).
    #[error("{field} tidak valid: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in the allowed set.
    #[error("{field} harus {allowed}.")]
    NotAllowed { field: String, allowed: String },
}

impl ValidationError {
    /// Creates a Required error for a field.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    /// Creates an InvalidFormat error.
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_stock_message_names_product_and_remaining() {
        let err = CoreError::InsufficientStock {
            product: "Kopi Susu".to_string(),
            remaining: 5,
        };
        assert_eq!(
            err.to_string(),
            "Stok tidak cukup untuk produk Kopi Susu. Tersisa: 5"
        );
    }

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            ValidationError::required("username").to_string(),
            "username wajib diisi."
        );
        assert_eq!(
            ValidationError::NotAllowed {
                field: "Role".to_string(),
                allowed: "\"admin\" atau \"kasir\"".to_string(),
            }
            .to_string(),
            "Role harus \"admin\" atau \"kasir\"."
        );
    }

    #[test]
    fn test_validation_converts_to_core_error_transparently() {
        let core_err: CoreError = ValidationError::Incomplete("Nama kategori wajib diisi.").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.to_string(), "Nama kategori wajib diisi.");
    }
}
