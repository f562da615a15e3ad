//! Construction chains.
//!
//! [`ClassRegistry::instantiate`] runs each class's constructor step from the
//! root down to the concrete class. A concrete step attaches the class's
//! instance members to the new object. A contract step runs the contract's
//! guard, either deferred until the whole chain has run (the default) or
//! immediately at that step, per [`GuardTiming`].
//!
//! A failed guard fails the whole construction; no object is returned.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::class::ClassKind;
use crate::contract::Contract;
use crate::error::{ContractError, CoreError};
use crate::id::ClassId;
use crate::object::Object;
use crate::registry::ClassRegistry;

/// When contract guards run during a construction chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuardTiming {
    /// Once, after every constructor step of the concrete class has run.
    /// Sees instance members attached anywhere in the chain.
    #[default]
    Deferred,
    /// At the contract's own step, before descendant constructor steps.
    /// Prototype methods are visible; instance members attached by
    /// descendants are not.
    Eager,
}

impl fmt::Display for GuardTiming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuardTiming::Deferred => write!(f, "deferred"),
            GuardTiming::Eager => write!(f, "eager"),
        }
    }
}

impl FromStr for GuardTiming {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deferred" | "Deferred" => Ok(GuardTiming::Deferred),
            "eager" | "Eager" => Ok(GuardTiming::Eager),
            _ => Err(format!(
                "invalid guard timing '{}', expected deferred/eager",
                s
            )),
        }
    }
}

/// Options for [`ClassRegistry::instantiate_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConstructOptions {
    pub timing: GuardTiming,
}

impl ClassRegistry {
    /// Constructs an instance of `class` with default options.
    pub fn instantiate(&self, class: ClassId) -> Result<Object, CoreError> {
        self.instantiate_with(class, &ConstructOptions::default())
    }

    /// Constructs an instance of `class`.
    ///
    /// Fails with [`ContractError::DirectInstantiation`] if `class` is a
    /// contract class, and with [`ContractError::Violation`] if any contract
    /// on the chain is not satisfied by the concrete class.
    pub fn instantiate_with(
        &self,
        class: ClassId,
        options: &ConstructOptions,
    ) -> Result<Object, CoreError> {
        let def = self.get(class).ok_or(CoreError::ClassNotFound { id: class })?;
        if def.is_contract() {
            tracing::warn!("refused direct instantiation of contract class '{}'", def.name);
            return Err(ContractError::DirectInstantiation.into());
        }

        let mut object = Object::of_class(class);
        let mut pending: Vec<&Contract> = Vec::new();

        // Root first, concrete class last.
        for step in self.ancestry(class).into_iter().rev() {
            let step_def = self.get(step).ok_or(CoreError::ClassNotFound { id: step })?;
            match &step_def.kind {
                ClassKind::Contract(contract) => match options.timing {
                    GuardTiming::Deferred => pending.push(contract),
                    GuardTiming::Eager => self.run_guard(contract, class, &object, &def.name)?,
                },
                ClassKind::Concrete => {
                    for (name, member) in &step_def.instance_members {
                        object.set(name.clone(), member.clone());
                    }
                }
            }
        }

        for contract in pending {
            self.run_guard(contract, class, &object, &def.name)?;
        }

        tracing::debug!(
            "constructed '{}' with {} own member(s) ({} timing)",
            def.name,
            object.own_members().len(),
            options.timing
        );
        Ok(object)
    }

    fn run_guard(
        &self,
        contract: &Contract,
        class: ClassId,
        object: &Object,
        class_name: &str,
    ) -> Result<(), CoreError> {
        contract.guard(self, class, object).map_err(|err| {
            tracing::warn!("construction of '{}' rejected: {}", class_name, err);
            CoreError::from(err)
        })
    }
}
