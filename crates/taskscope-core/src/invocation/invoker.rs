//! Invoker - タスクとその前提タスクを実行する
//!
//! Flow for one invocation:
//! 1. build the root scope from the task's declared names + the call values
//!    (the shared empty scope when there is nothing to bind)
//! 2. apply the task's declared defaults
//! 3. for each prerequisite, in order: derive a child scope with the
//!    prerequisite's declared names, apply its defaults, recurse
//! 4. run the task's action
//!
//! Steps 1–3 only touch argument scopes, so they run synchronously and
//! produce a plan; step 4 runs the plan's actions one by one.
//! Each task runs at most once per `Invoker` until re-enabled. A task counts
//! as invoked once its step is reached; steps after a failure stay runnable.

use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use super::graph::DependencyGraph;
use super::parse::Invocation;
use crate::domain::{ArgName, ArgScope, InvokeError, Manifest, TaskDecl, TaskName};
use crate::runtime::ActionRegistry;

/// A task together with the scope it runs (or ran) with.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutedTask {
    pub task: TaskName,
    pub args: Arc<ArgScope>,
}

/// Tasks executed by one `invoke` call, in execution order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InvocationReport {
    pub executed: Vec<ExecutedTask>,
}

impl InvocationReport {
    pub fn get(&self, task: &str) -> Option<&ExecutedTask> {
        self.executed.iter().find(|e| e.task.as_str() == task)
    }

    pub fn order(&self) -> Vec<&str> {
        self.executed.iter().map(|e| e.task.as_str()).collect()
    }
}

pub struct Invoker {
    manifest: Manifest,
    registry: Arc<ActionRegistry>,
    invoked: HashSet<TaskName>,
}

impl Invoker {
    /// Validate the manifest and reject prerequisite cycles up front.
    pub fn new(manifest: Manifest, registry: Arc<ActionRegistry>) -> Result<Self, InvokeError> {
        manifest.validate()?;
        if let Some(cycle) = DependencyGraph::from_manifest(&manifest).detect_cycle() {
            return Err(InvokeError::CircularDependency(cycle));
        }
        Ok(Self {
            manifest,
            registry,
            invoked: HashSet::new(),
        })
    }

    /// Allow `task` to run again on a later invocation.
    ///
    /// Returns whether the task had been invoked.
    pub fn reenable(&mut self, task: &str) -> bool {
        self.invoked.remove(task)
    }

    /// Invoke the manifest's default task with no arguments.
    pub async fn invoke_default(&mut self) -> Result<InvocationReport, InvokeError> {
        let task = self
            .manifest
            .default
            .clone()
            .ok_or(InvokeError::NoDefaultTask)?;
        self.invoke(Invocation::new(task, Vec::new())).await
    }

    pub async fn invoke(&mut self, invocation: Invocation) -> Result<InvocationReport, InvokeError> {
        let plan = self.plan(invocation)?;

        let mut report = InvocationReport::default();
        for step in plan {
            self.invoked.insert(step.task.clone());
            self.execute(&step).await?;
            report.executed.push(step);
        }
        Ok(report)
    }

    /// Resolve every scope the invocation needs, prerequisites first.
    ///
    /// Tasks already invoked are left out. Planning marks nothing; only
    /// `invoke` does, as it reaches each step.
    pub fn plan(&self, invocation: Invocation) -> Result<Vec<ExecutedTask>, InvokeError> {
        let decl = self.decl(&invocation.task)?;
        let root = if decl.takes_no_args() && invocation.args.is_empty() {
            ArgScope::empty()
        } else {
            let mut scope = ArgScope::new(decl.arg_names.clone(), invocation.args);
            scope.with_defaults(cloned_defaults(decl));
            Arc::new(scope)
        };

        let mut plan = Vec::new();
        let mut planned = HashSet::new();
        self.plan_task(&invocation.task, root, &mut planned, &mut plan)?;
        Ok(plan)
    }

    fn plan_task(
        &self,
        task: &TaskName,
        args: Arc<ArgScope>,
        planned: &mut HashSet<TaskName>,
        plan: &mut Vec<ExecutedTask>,
    ) -> Result<(), InvokeError> {
        if self.invoked.contains(task) {
            debug!(task = %task, "already invoked; skipping");
            return Ok(());
        }
        if !planned.insert(task.clone()) {
            return Ok(());
        }

        let prerequisites = self.decl(task)?.prerequisites.clone();
        for prereq in &prerequisites {
            let decl = self.decl(prereq)?;
            let mut child = args.derive_child(decl.arg_names.clone());
            child.with_defaults(cloned_defaults(decl));
            self.plan_task(prereq, Arc::new(child), planned, plan)?;
        }

        plan.push(ExecutedTask {
            task: task.clone(),
            args,
        });
        Ok(())
    }

    async fn execute(&self, step: &ExecutedTask) -> Result<(), InvokeError> {
        let Some(action) = self.registry.get(step.task.as_str()) else {
            debug!(task = %step.task, "no action registered; nothing to run");
            return Ok(());
        };

        debug!(task = %step.task, args = %step.args, "executing task");
        action
            .run(&step.task, &step.args)
            .await
            .map_err(|e| InvokeError::Action {
                task: step.task.clone(),
                message: e.to_string(),
            })
    }

    fn decl(&self, task: &TaskName) -> Result<&TaskDecl, InvokeError> {
        self.manifest
            .get(task.as_str())
            .ok_or_else(|| InvokeError::UnknownTask(task.clone()))
    }
}

fn cloned_defaults(decl: &TaskDecl) -> impl Iterator<Item = (ArgName, Value)> + '_ {
    decl.defaults.iter().map(|(k, v)| (k.clone(), v.clone()))
}
