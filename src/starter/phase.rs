use std::fmt;

/// Ordered startup phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    /// Register the pipeline store and runner
    Singletons,
    /// Scan, describe, synthesize and register stores
    Discovery,
    /// Start loading pipeline definitions
    Migration,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Self::Singletons, Self::Discovery, Self::Migration];

    /// Phase that must complete before this one may run
    pub fn requires(&self) -> Option<Phase> {
        match self {
            Self::Singletons => None,
            Self::Discovery => Some(Self::Singletons),
            Self::Migration => Some(Self::Discovery),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Singletons => "singletons",
            Self::Discovery => "discovery",
            Self::Migration => "migration",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
