use std::fmt;
use std::str::FromStr;

/// What a cache does when a background write settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WritePolicy {
    /// Keep the local change whatever happens. A failed write leaves the cache and the
    /// backend out of step until the next full load.
    #[default]
    Optimistic,
    /// Adopt what the backend confirmed; undo a failed write unless a newer local
    /// change to the same entity superseded it.
    Reconcile,
}

impl FromStr for WritePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reconcile" => Ok(WritePolicy::Reconcile),
            "optimistic" => Ok(WritePolicy::Optimistic),
            other => Err(format!("expected `reconcile` or `optimistic`, got {other:?}")),
        }
    }
}

impl fmt::Display for WritePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WritePolicy::Reconcile => f.write_str("reconcile"),
            WritePolicy::Optimistic => f.write_str("optimistic"),
        }
    }
}
