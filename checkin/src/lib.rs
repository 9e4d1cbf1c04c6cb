//! Check-in form authorization.
//!
//! A check-in is signed off section by section, each section owned by one
//! plant role. This crate decides, per section, whether the current actor
//! may edit it:
//!
//! - **Roles and sections**: closed enums with stable ids, parsed once from
//!   directory display names
//! - **Ownership table**: one owning role per section, loadable from YAML
//! - **Authorizer**: admin override or owning role, fail-closed for sections
//!   without an owner
//! - **Form**: guarded edits that leave values untouched on denial
//!
//! # Example
//!
//! ```
//! use checkin::{Actor, FieldAuthorizer};
//!
//! let authorizer = FieldAuthorizer::default();
//! let actor = Actor::from_display_names("Q. Lead", ["Quality Manager"]);
//! assert!(authorizer.can_edit(&actor, "quality_manager"));
//! assert!(!authorizer.can_edit(&actor, "hse_manager"));
//! ```

pub mod evaluator;
pub mod form;
pub mod table;
pub mod types;

// Re-export main types
pub use evaluator::{AdminPolicy, FieldAuthorizer};
pub use form::CheckinForm;
pub use table::OwnershipTable;
pub use types::*;
