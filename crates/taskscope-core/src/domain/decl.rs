//! Task declarations and the manifest they are loaded from.
//!
//! A declaration says which parameters a task takes (in order), which
//! defaults fill them, and which prerequisites must run first. Loading keeps
//! optional fields flexible with `#[serde(default)]` so a minimal manifest is
//! just a list of names.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

use super::errors::ManifestError;
use super::name::{ArgName, TaskName};

/// One declared task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDecl {
    pub name: TaskName,

    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Declared parameter names, in positional order.
    #[serde(default, rename = "args", skip_serializing_if = "Vec::is_empty")]
    pub arg_names: Vec<ArgName>,

    /// Default values, applied in declaration order to names left unbound.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub defaults: IndexMap<ArgName, Value>,

    /// Tasks that run before this one, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prerequisites: Vec<TaskName>,
}

impl TaskDecl {
    pub fn new(name: impl Into<TaskName>) -> Self {
        Self {
            name: name.into(),
            description: None,
            arg_names: Vec::new(),
            defaults: IndexMap::new(),
            prerequisites: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ArgName>,
    {
        self.arg_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_default(mut self, name: impl Into<ArgName>, value: Value) -> Self {
        self.defaults.insert(name.into(), value);
        self
    }

    pub fn with_prerequisite(mut self, task: impl Into<TaskName>) -> Self {
        self.prerequisites.push(task.into());
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Declares no parameters and no defaults, so it can run with the shared
    /// empty scope.
    pub fn takes_no_args(&self) -> bool {
        self.arg_names.is_empty() && self.defaults.is_empty()
    }
}

/// A set of task declarations plus the task to run when none is named.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<TaskName>,

    #[serde(default)]
    pub tasks: Vec<TaskDecl>,
}

impl Manifest {
    pub fn new(tasks: Vec<TaskDecl>) -> Self {
        Self {
            default: None,
            tasks,
        }
    }

    pub fn with_default_task(mut self, task: impl Into<TaskName>) -> Self {
        self.default = Some(task.into());
        self
    }

    /// Decode and validate a JSON manifest.
    pub fn from_json_str(s: &str) -> Result<Self, ManifestError> {
        let manifest: Manifest = serde_json::from_str(s)?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn get(&self, name: &str) -> Option<&TaskDecl> {
        self.tasks.iter().find(|t| t.name.as_str() == name)
    }

    /// Every prerequisite and the default task must be declared, and no task
    /// may be declared twice.
    pub fn validate(&self) -> Result<(), ManifestError> {
        let mut seen: HashSet<&str> = HashSet::new();
        for task in &self.tasks {
            if !seen.insert(task.name.as_str()) {
                return Err(ManifestError::DuplicateTask(task.name.clone()));
            }
        }

        for task in &self.tasks {
            if let Some(missing) = task
                .prerequisites
                .iter()
                .find(|p| !seen.contains(p.as_str()))
            {
                return Err(ManifestError::UnknownPrerequisite {
                    task: task.name.clone(),
                    prerequisite: missing.clone(),
                });
            }
        }

        if let Some(default) = &self.default
            && !seen.contains(default.as_str())
        {
            return Err(ManifestError::UnknownDefaultTask(default.clone()));
        }
        Ok(())
    }
}
