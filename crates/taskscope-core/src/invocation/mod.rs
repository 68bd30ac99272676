//! Invocation - 呼び出し文字列の解析、前提タスクのグラフ、実行
//!
//! - **parse**: `name[a,b]` -> task name + positional values
//! - **graph**: prerequisite graph with cycle detection
//! - **invoker**: derives argument scopes down the prerequisite chain and runs actions

pub mod graph;
pub mod invoker;
pub mod parse;

pub use self::graph::DependencyGraph;
pub use self::invoker::{ExecutedTask, InvocationReport, Invoker};
pub use self::parse::{Invocation, parse_invocation};
