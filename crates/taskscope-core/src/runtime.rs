use std::collections::HashMap;
use std::error::Error;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{ArgScope, TaskName};

pub type ActionResult = Result<(), Box<dyn Error + Send + Sync>>;

/// The body of a task.
///
/// Receives the task's resolved argument scope; reads arguments through
/// `ArgScope::get` and friends.
#[async_trait]
pub trait TaskAction: Send + Sync {
    async fn run(&self, task: &TaskName, args: &ArgScope) -> ActionResult;
}

/// Adapts a plain synchronous closure into a [`TaskAction`].
pub struct FnAction<F>(F);

impl<F> FnAction<F>
where
    F: Fn(&TaskName, &ArgScope) -> ActionResult + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> TaskAction for FnAction<F>
where
    F: Fn(&TaskName, &ArgScope) -> ActionResult + Send + Sync,
{
    async fn run(&self, task: &TaskName, args: &ArgScope) -> ActionResult {
        (self.0)(task, args)
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("action for task '{0}' is already registered")]
    AlreadyRegistered(TaskName),
}

/// Registry of task bodies (task name -> action).
///
/// Design:
/// - Built during initialization (mutable).
/// - Shared by the invoker afterwards (immutable, behind `Arc`).
#[derive(Default)]
pub struct ActionRegistry {
    actions: HashMap<TaskName, Arc<dyn TaskAction>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self {
            actions: HashMap::new(),
        }
    }

    pub fn register(
        &mut self,
        task: impl Into<TaskName>,
        action: Arc<dyn TaskAction>,
    ) -> Result<(), RegistryError> {
        let task = task.into();
        if self.actions.contains_key(&task) {
            return Err(RegistryError::AlreadyRegistered(task));
        }
        self.actions.insert(task, action);
        Ok(())
    }

    pub fn get(&self, task: &str) -> Option<&Arc<dyn TaskAction>> {
        self.actions.get(task)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
