//! Errors - マニフェスト読み込みとタスク呼び出しのエラー型
//!
//! Argument lookup itself never fails; these cover the layers around it.

use thiserror::Error;

use super::name::TaskName;

/// Raised while loading or validating a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("manifest decode: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("task '{0}' is declared more than once")]
    DuplicateTask(TaskName),

    #[error("task '{task}' names unknown prerequisite '{prerequisite}'")]
    UnknownPrerequisite {
        task: TaskName,
        prerequisite: TaskName,
    },

    #[error("default task '{0}' is not declared")]
    UnknownDefaultTask(TaskName),
}

/// Raised while invoking a task and its prerequisites.
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("don't know how to build task '{0}'")]
    UnknownTask(TaskName),

    #[error("no default task declared")]
    NoDefaultTask,

    #[error("circular dependency detected: {}", render_chain(.0))]
    CircularDependency(Vec<TaskName>),

    #[error("task '{task}' failed: {message}")]
    Action { task: TaskName, message: String },

    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

fn render_chain(chain: &[TaskName]) -> String {
    chain
        .iter()
        .map(TaskName::as_str)
        .collect::<Vec<_>>()
        .join(" => ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circular_dependency_renders_chain() {
        let err = InvokeError::CircularDependency(vec![
            TaskName::new("a"),
            TaskName::new("b"),
            TaskName::new("a"),
        ]);
        assert_eq!(err.to_string(), "circular dependency detected: a => b => a");
    }

    #[test]
    fn manifest_error_converts_into_invoke_error() {
        let err: InvokeError = ManifestError::UnknownDefaultTask(TaskName::new("x")).into();
        assert_eq!(err.to_string(), "default task 'x' is not declared");
    }
}
