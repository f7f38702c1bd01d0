//! Artifact - A deployable unit identified by name and version
//!
//! ArtifactDefinition is immutable once registered for a run.
//! The name is its identity; the version decides deploy vs. upgrade.

use core::fmt;

use super::version::Version;

/// Initializer entry point used when none is configured
pub const DEFAULT_INITIALIZER: &str = "initialize";

/// A typed initializer argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitArg {
    Bool(bool),
    Int(i64),
    /// Only used for values above `i64::MAX`
    Uint(u64),
    Text(String),
    List(Vec<InitArg>),
}

impl fmt::Display for InitArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitArg::Bool(b) => write!(f, "{}", b),
            InitArg::Int(n) => write!(f, "{}", n),
            InitArg::Uint(n) => write!(f, "{}", n),
            InitArg::Text(s) => write!(f, "{:?}", s),
            InitArg::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}

/// ArtifactDefinition - what the operator wants to be live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDefinition {
    name: String,
    version: Version,
    init_args: Vec<InitArg>,
    initializer: String,
}

impl ArtifactDefinition {
    /// Create a definition with no initializer arguments
    pub fn new(name: impl Into<String>, version: Version) -> Self {
        Self {
            name: name.into(),
            version,
            init_args: Vec::new(),
            initializer: DEFAULT_INITIALIZER.to_string(),
        }
    }

    pub fn with_init_args(mut self, init_args: Vec<InitArg>) -> Self {
        self.init_args = init_args;
        self
    }

    pub fn with_initializer(mut self, initializer: impl Into<String>) -> Self {
        self.initializer = initializer.into();
        self
    }

    // ========== Getters ==========

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn init_args(&self) -> &[InitArg] {
        &self.init_args
    }

    pub fn initializer(&self) -> &str {
        &self.initializer
    }
}
