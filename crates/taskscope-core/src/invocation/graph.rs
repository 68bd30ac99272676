//! Prerequisite graph between declared tasks.
//!
//! Edges run from a task to the tasks it depends on (its prerequisites).
//! Edge sets are insertion-ordered so traversal (and therefore the reported
//! cycle) is deterministic.

use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;

use crate::domain::{Manifest, TaskName};

pub struct DependencyGraph {
    /// task -> prerequisites
    edges: IndexMap<TaskName, IndexSet<TaskName>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// on the current DFS path
    Gray,
    /// fully explored
    Black,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self {
            edges: IndexMap::new(),
        }
    }

    /// Build the graph from every declared prerequisite in a manifest.
    pub fn from_manifest(manifest: &Manifest) -> Self {
        let mut graph = Self::new();
        for task in &manifest.tasks {
            for prereq in &task.prerequisites {
                graph.add_dependency(task.name.clone(), prereq.clone());
            }
        }
        graph
    }

    /// Add a dependency: `task` depends on `depends_on`.
    pub fn add_dependency(&mut self, task: TaskName, depends_on: TaskName) {
        self.edges.entry(task).or_default().insert(depends_on);
    }

    /// Prerequisites of `task`, in insertion order.
    pub fn dependencies_of(&self, task: &TaskName) -> Vec<TaskName> {
        self.edges
            .get(task)
            .map(|deps| deps.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Detect a cycle in the graph.
    ///
    /// Returns the first cycle found as a path that starts and ends with the
    /// same task (`a => b => a`), or `None` if the graph is acyclic.
    ///
    /// Three-colour DFS: unvisited (absent), Gray (on the current path),
    /// Black (done). Reaching a Gray node closes a cycle. O(V + E).
    pub fn detect_cycle(&self) -> Option<Vec<TaskName>> {
        let mut colors: HashMap<&TaskName, Color> = HashMap::new();
        let mut path: Vec<&TaskName> = Vec::new();

        for start in self.edges.keys() {
            if colors.contains_key(start) {
                continue;
            }
            if let Some(cycle) = self.dfs_cycle(start, &mut colors, &mut path) {
                return Some(cycle);
            }
        }
        None
    }

    fn dfs_cycle<'a>(
        &'a self,
        node: &'a TaskName,
        colors: &mut HashMap<&'a TaskName, Color>,
        path: &mut Vec<&'a TaskName>,
    ) -> Option<Vec<TaskName>> {
        colors.insert(node, Color::Gray);
        path.push(node);

        if let Some(deps) = self.edges.get(node) {
            for dep in deps {
                match colors.get(dep) {
                    Some(Color::Gray) => {
                        let start = path.iter().position(|n| *n == dep).unwrap_or(0);
                        let mut cycle: Vec<TaskName> =
                            path[start..].iter().map(|n| (*n).clone()).collect();
                        cycle.push(dep.clone());
                        return Some(cycle);
                    }
                    Some(Color::Black) => {}
                    None => {
                        if let Some(cycle) = self.dfs_cycle(dep, colors, path) {
                            return Some(cycle);
                        }
                    }
                }
            }
        }

        colors.insert(node, Color::Black);
        path.pop();
        None
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}
