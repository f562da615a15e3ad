//! Error types for covenant-core.
//!
//! Uses `thiserror` for structured, matchable variants. [`ContractError`]
//! covers the two ways a contract rejects a construction; [`CoreError`] covers
//! registry and object failures and wraps contract errors transparently.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::id::ClassId;

/// A contract rejected a construction or an explicit verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum ContractError {
    /// The concrete type under construction is the contract itself.
    #[error("Cannot create an instance of Interface")]
    DirectInstantiation,

    /// One or more required names are not callable on the concrete type.
    #[error(
        "The following function(s) need to be implemented for class {class}: {list}",
        list = missing.join(", ")
    )]
    Violation {
        /// Name of the most-derived type.
        class: String,
        /// Missing names in declaration order.
        missing: Vec<String>,
    },
}

/// Errors produced by the class registry and object operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum CoreError {
    /// Attempting to register a class name that already exists in the registry.
    #[error("duplicate class name: '{name}'")]
    DuplicateClassName { name: String },

    /// A ClassId was not found in the registry.
    #[error("class not found: ClassId({id})", id = id.0)]
    ClassNotFound { id: ClassId },

    /// A class builder named a parent that is not registered.
    #[error("unknown parent class: '{name}'")]
    UnknownParent { name: String },

    /// No binding for `name` on the object or any of its ancestors.
    #[error("member not found: '{name}'")]
    MemberNotFound { name: String },

    /// `name` resolved to a field, not a method.
    #[error("member '{name}' is not callable")]
    NotCallable { name: String },

    #[error(transparent)]
    Contract(#[from] ContractError),
}
