//! Domain model (names, argument scopes, task declarations, errors).

pub mod decl;
pub mod errors;
pub mod name;
pub mod scope;

pub use decl::{Manifest, TaskDecl};
pub use errors::{InvokeError, ManifestError};
pub use name::{ArgName, TaskName, arg_names};
pub use scope::ArgScope;
