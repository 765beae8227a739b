//! Role sets for route gates.
//!
//! Token verification happens once per request in the API layer; these
//! checks only compare the already-verified role against a route's set.

use crate::error::{CoreError, CoreResult};
use crate::types::Role;

/// Catalog management, user administration, transaction status changes.
pub const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// Recording and reading sales, reading one's own profile.
pub const ADMIN_OR_CASHIER: &[Role] = &[Role::Admin, Role::Cashier];

/// Checks that `role` is a member of `allowed`.
///
/// ```rust
/// use kasir_core::{require_role, Role, ADMIN_ONLY, ADMIN_OR_CASHIER};
///
/// assert!(require_role(Role::Cashier, ADMIN_OR_CASHIER).is_ok());
/// assert!(require_role(Role::Cashier, ADMIN_ONLY).is_err());
/// ```
pub fn require_role(role: Role, allowed: &[Role]) -> CoreResult<()> {
    if allowed.contains(&role) {
        return Ok(());
    }

    Err(CoreError::Forbidden {
        required: describe(allowed),
    })
}

/// "Admin", "Admin atau Kasir", ...
fn describe(allowed: &[Role]) -> String {
    allowed
        .iter()
        .map(Role::label)
        .collect::<Vec<_>>()
        .join(" atau ")
}
