//! Contract checking: compute missing names, guard constructions, verify
//! candidates.
//!
//! Every check makes a single pass over the required names and never stops at
//! the first miss, so a violation always reports the full missing list in
//! declaration order.

use indexmap::IndexSet;

use crate::contract::Contract;
use crate::error::ContractError;
use crate::id::ClassId;
use crate::member::Member;
use crate::object::{MemberLookup, Object};
use crate::registry::ClassRegistry;

/// Type name reported for candidates that have none, such as plain objects.
pub const ANONYMOUS: &str = "<anonymous>";

impl Contract {
    /// Required names with no callable binding on `candidate`, in declaration
    /// order, each reported once.
    pub fn missing<L>(&self, candidate: &L) -> Vec<String>
    where
        L: MemberLookup + ?Sized,
    {
        let missing: IndexSet<&str> = self
            .required()
            .iter()
            .map(String::as_str)
            .filter(|name| !is_callable(candidate, name))
            .collect();
        missing.into_iter().map(str::to_string).collect()
    }

    /// Returns true iff every required name resolves to a callable member.
    ///
    /// The candidate need not descend from the contract. Never fails.
    pub fn is_implemented_by<L>(&self, candidate: &L) -> bool
    where
        L: MemberLookup + ?Sized,
    {
        self.required()
            .iter()
            .all(|name| is_callable(candidate, name))
    }

    /// Checks `candidate`, reporting every missing name against its type name.
    ///
    /// Safe to repeat: verifying an object that already passed construction
    /// succeeds again as long as its members are unchanged.
    pub fn verify<L>(&self, candidate: &L) -> Result<(), ContractError>
    where
        L: MemberLookup + ?Sized,
    {
        let missing = self.missing(candidate);
        if missing.is_empty() {
            return Ok(());
        }
        Err(ContractError::Violation {
            class: candidate.type_name().unwrap_or(ANONYMOUS).to_string(),
            missing,
        })
    }

    /// The construction guard.
    ///
    /// Fails with [`ContractError::DirectInstantiation`] when `concrete` is
    /// itself a contract class, before looking at any members. Otherwise
    /// checks `object` with its own members and the full ancestry of its
    /// class visible, and reports gaps against `concrete`.
    pub fn guard(
        &self,
        registry: &ClassRegistry,
        concrete: ClassId,
        object: &Object,
    ) -> Result<(), ContractError> {
        let def = registry.get(concrete);
        if def.is_some_and(|def| def.is_contract()) {
            return Err(ContractError::DirectInstantiation);
        }
        let missing = self.missing(&registry.bind(object));
        if missing.is_empty() {
            return Ok(());
        }
        Err(ContractError::Violation {
            class: def.map_or(ANONYMOUS, |def| def.name.as_str()).to_string(),
            missing,
        })
    }
}

fn is_callable<L>(candidate: &L, name: &str) -> bool
where
    L: MemberLookup + ?Sized,
{
    candidate.lookup(name).is_some_and(Member::is_callable)
}
