use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// How a project dependency was discovered.
///
/// - `Static`: declared import / package reference (default).
/// - `Dynamic`: lazily loaded reference (e.g. a dynamic import).
/// - `Implicit`: declared by hand in the workspace file, with no code-level
///   reference backing it.
///
/// The kind is carried for reporting only; scheduling treats every kind the
/// same way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    #[default]
    Static,
    Dynamic,
    Implicit,
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DependencyKind::Static => "static",
            DependencyKind::Dynamic => "dynamic",
            DependencyKind::Implicit => "implicit",
        };
        f.write_str(s)
    }
}

impl FromStr for DependencyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "static" => Ok(DependencyKind::Static),
            "dynamic" => Ok(DependencyKind::Dynamic),
            "implicit" => Ok(DependencyKind::Implicit),
            other => Err(format!(
                "invalid dependency kind: {other} (expected \"static\", \"dynamic\" or \"implicit\")"
            )),
        }
    }
}
