//! Role-based access control.
//!
//! A request's authorization is decided in one place, after authentication
//! and before the handler runs:
//!
//! 1. The matched route template and HTTP method form a route key
//!    (`"GET /bank-details/{localAuthority}"`).
//! 2. The route key maps to a permission key (`viewFullBankDetails`, ...).
//!    Routes without a mapping carry no restriction.
//! 3. The caller's raw role is normalized to a [`RoleCode`] and checked
//!    against the configured allow-list for that permission.
//!
//! The result is a request-scoped [`AccessDecision`] that handlers use to
//! mask data or refuse an action. Denial is a value, not an error: the
//! request still reaches its handler.

pub mod policy;
pub mod roles;

pub use policy::{AccessDecision, AccessPolicy, PermissionKey, permission_for_route};
pub use roles::RoleCode;
