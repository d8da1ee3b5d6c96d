//! Umat Permission Codec
//!
//! Role permissions in the admin console exist in two shapes:
//!
//! - a nested [`Policy`]: module name → [`ModulePermission`] (a [`Scope`] and a
//!   set of [`Action`]s), which the role editor renders per module;
//! - a flat list of `"<module>_<action>"` strings, which the role endpoint
//!   stores and the bulk checkbox grid toggles.
//!
//! [`flatten`] and [`unflatten`] convert between them losslessly for the
//! closed action vocabulary. Scope is not part of the flat form and is
//! supplied by the caller when rebuilding.
//!
//! # Example
//!
//! ```rust
//! use umat_permission::{flatten, unflatten, Action, ModulePermission, Policy, Scope};
//!
//! let policy = Policy::new().with_module(
//!     "account",
//!     ModulePermission::new(Scope::Nasional).with(Action::EditRole),
//! );
//!
//! let flat = flatten(&policy);
//! assert_eq!(flat, vec!["account_edit_role"]);
//!
//! let back = unflatten(&flat, Scope::Nasional);
//! assert_eq!(back, policy);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod action;
pub mod codec;
pub mod error;
pub mod modules;
pub mod policy;
pub mod scope;

// Re-exports for convenience
pub use action::Action;
pub use codec::{flatten, unflatten, unflatten_with_scopes, PermissionKey};
pub use error::{PermissionError, PermissionResult};
pub use policy::{ModulePermission, Policy};
pub use scope::Scope;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
