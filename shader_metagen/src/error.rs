//! Error types for shader metagen
//!
//! Every failure in the reconciliation pipeline is one of these variants.
//! Load and configuration errors carry the offending file or input, binding
//! conflicts carry both disagreeing declarations, and the context wrappers
//! record which pipeline or global set was being built when it happened.

use std::fmt;
use crate::descriptor::{DescriptorBinding, MAX_BINDING_SLOT};

/// Result type for shader metagen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Two declarations of the same `(set_index, slot)` that are not structurally equal
#[derive(Debug, Clone)]
pub struct BindingConflict {
    /// Descriptor set index both declarations live in
    pub set_index: u32,
    /// Binding slot both declarations occupy
    pub slot: u32,
    /// Declaration already accumulated
    pub existing: DescriptorBinding,
    /// Declaration that disagreed with it
    pub incoming: DescriptorBinding,
}

impl fmt::Display for BindingConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "set {} slot {}: '{}' ({}) conflicts with '{}' ({})",
            self.set_index,
            self.slot,
            self.existing.name,
            self.existing.describe(),
            self.incoming.name,
            self.incoming.describe(),
        )
    }
}

/// Shader metagen errors
#[derive(Debug, Clone)]
pub enum Error {
    /// A shader file could not be read or failed reflection
    LoadFailed {
        filename: String,
        reason: String,
    },

    /// A stage references a file the module cache never loaded
    ModuleNotLoaded {
        filename: String,
    },

    /// Two sources disagree on the shape of one binding slot
    BindingConflict(Box<BindingConflict>),

    /// A binding slot is above `MAX_BINDING_SLOT`
    SlotOutOfRange {
        set_index: u32,
        slot: u32,
    },

    /// Union was asked to merge sets with different set indices (caller bug)
    SetIndexMismatch {
        left: u32,
        right: u32,
    },

    /// Declared pipeline/global input is malformed
    InvalidConfig(String),

    /// Error raised while aggregating the stages of one pipeline
    InPipeline {
        pipeline: String,
        source: Box<Error>,
    },

    /// Error raised while populating one global descriptor set
    InGlobalSet {
        id: u32,
        name: String,
        source: Box<Error>,
    },
}

impl Error {
    /// Wrap this error with the pipeline it was raised for
    pub fn in_pipeline(self, pipeline: &str) -> Self {
        Error::InPipeline {
            pipeline: pipeline.to_string(),
            source: Box::new(self),
        }
    }

    /// Wrap this error with the global set it was raised for
    pub fn in_global_set(self, id: u32, name: &str) -> Self {
        Error::InGlobalSet {
            id,
            name: name.to_string(),
            source: Box::new(self),
        }
    }

    /// Innermost error, with all context wrappers removed
    pub fn root(&self) -> &Error {
        match self {
            Error::InPipeline { source, .. } | Error::InGlobalSet { source, .. } => source.root(),
            other => other,
        }
    }

    /// Binding conflict details, if the root cause is a conflict
    pub fn conflict(&self) -> Option<&BindingConflict> {
        match self.root() {
            Error::BindingConflict(conflict) => Some(conflict.as_ref()),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::LoadFailed { filename, reason } => {
                write!(f, "Failed to load shader module '{}': {}", filename, reason)
            }
            Error::ModuleNotLoaded { filename } => {
                write!(f, "Shader module '{}' is not in the module cache", filename)
            }
            Error::BindingConflict(conflict) => write!(f, "Binding conflict: {}", conflict),
            Error::SetIndexMismatch { left, right } => {
                write!(f, "Cannot union descriptor set {} with descriptor set {}", left, right)
            }
            Error::SlotOutOfRange { set_index, slot } => write!(
                f,
                "Binding slot {} in descriptor set {} exceeds the maximum slot {}",
                slot, set_index, MAX_BINDING_SLOT
            ),
            Error::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            Error::InPipeline { pipeline, source } => {
                write!(f, "Pipeline '{}': {}", pipeline, source)
            }
            Error::InGlobalSet { id, name, source } => {
                write!(f, "Global set '{}' (ID={}): {}", name, id, source)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InPipeline { source, .. } | Error::InGlobalSet { source, .. } => {
                Some(source.as_ref())
            }
            _ => None,
        }
    }
}

// ===== ERROR MACROS =====

/// Log an error (with file:line) and evaluate to it
///
/// # Example
///
/// ```no_run
/// use shader_metagen::metagen::Error;
///
/// let err = shader_metagen::metagen_err!("shader_metagen::ModuleCache",
///     Error::ModuleNotLoaded { filename: "missing.spv".to_string() });
/// ```
#[macro_export]
macro_rules! metagen_err {
    ($source:expr, $error:expr) => {{
        let error: $crate::error::Error = $error;
        $crate::metagen_error!($source, "{}", error);
        error
    }};
}

/// Log an error (with file:line) and return it from the enclosing function
#[macro_export]
macro_rules! metagen_bail {
    ($source:expr, $error:expr) => {
        return Err($crate::metagen_err!($source, $error))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
