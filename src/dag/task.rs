// src/dag/task.rs

//! Tasks: one request to run a target for one project.

use std::fmt;

use crate::dag::model::ProjectId;

/// Which target of which project a task runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetRef {
    pub project: ProjectId,
    pub target: String,
    pub configuration: Option<String>,
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.project, self.target)?;
        if let Some(cfg) = &self.configuration {
            write!(f, ":{cfg}")?;
        }
        Ok(())
    }
}

/// Flag overrides, kept in the order they were first set.
///
/// Setting an existing flag again replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Overrides(Vec<(String, String)>);

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, flag: impl Into<String>, value: impl Into<String>) {
        let flag = flag.into();
        let value = value.into();
        match self.0.iter_mut().find(|(f, _)| *f == flag) {
            Some(entry) => entry.1 = value,
            None => self.0.push((flag, value)),
        }
    }

    pub fn get(&self, flag: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(f, _)| f == flag)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(f, v)| (f.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Overrides {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut overrides = Overrides::new();
        for (k, v) in iter {
            overrides.set(k, v);
        }
        overrides
    }
}

/// A single unit of work handed to the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Task {
    /// `project:target[:configuration]`, used in logs and output prefixes.
    pub id: String,
    pub target: TargetRef,
    pub overrides: Overrides,
}

impl Task {
    pub fn new(
        project: impl Into<String>,
        target: impl Into<String>,
        configuration: Option<String>,
        overrides: Overrides,
    ) -> Self {
        let target = TargetRef {
            project: project.into(),
            target: target.into(),
            configuration,
        };
        Self {
            id: target.to_string(),
            target,
            overrides,
        }
    }

    pub fn project(&self) -> &str {
        &self.target.project
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}
