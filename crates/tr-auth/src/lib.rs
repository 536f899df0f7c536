//! # tr-auth
//!
//! Identity and role resolution for Issue Tracker RS.
//!
//! ## Features
//!
//! - `CurrentUser`, the acting user with its group memberships
//! - `RoleResolver`, which loads a `CurrentUser` from the user directory
//! - JWT bearer tokens that carry the user id

pub mod current_user;
pub mod jwt;
pub mod resolver;

pub use current_user::CurrentUser;
pub use jwt::{extract_bearer_token, Claims, JwtError, JwtService};
pub use resolver::{DirectoryRoleResolver, RoleResolver};
