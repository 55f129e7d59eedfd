//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`]: the caller, decoded from a JWT Bearer token.
//! - [`rbac::RequireSuperAdmin`]: requires the `super_admin` role.

pub mod auth;
pub mod rbac;
