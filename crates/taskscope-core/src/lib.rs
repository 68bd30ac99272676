//! taskscope-core
//!
//! Argument scopes for task invocations, plus the pieces that drive them.
//!
//! # モジュール構成
//! - **domain**: names, `ArgScope`, task declarations / manifest, errors
//! - **invocation**: invocation-string parser, prerequisite graph, invoker
//! - **runtime**: task actions and their registry

pub mod domain;
pub mod invocation;
pub mod runtime;

pub use domain::{
    ArgName, ArgScope, InvokeError, Manifest, ManifestError, TaskDecl, TaskName, arg_names,
};
pub use invocation::{Invocation, InvocationReport, Invoker, parse_invocation};
pub use runtime::{ActionRegistry, ActionResult, FnAction, TaskAction};
