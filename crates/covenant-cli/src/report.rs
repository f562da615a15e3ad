//! Machine-readable results for the `check`, `satisfies` and `capabilities`
//! subcommands.

use serde::Serialize;

use covenant_core::{
    effective_capabilities, ClassId, ClassKind, ClassRegistry, ConstructOptions, ContractError,
    CoreError, GuardTiming,
};

use crate::error::CliError;
use crate::manifest::Manifest;

/// Outcome of constructing one class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassResult {
    pub class: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckReport {
    pub timing: GuardTiming,
    pub results: Vec<ClassResult>,
}

impl CheckReport {
    /// True if any class was rejected by a contract.
    pub fn has_violations(&self) -> bool {
        self.results.iter().any(|r| !r.ok)
    }
}

/// Instantiates every concrete class, or only `class` when given.
///
/// Naming a contract class explicitly reports its direct-instantiation
/// failure. Registry errors other than contract rejections abort the check.
pub fn check(
    registry: &ClassRegistry,
    class: Option<&str>,
    options: &ConstructOptions,
) -> Result<CheckReport, CliError> {
    let targets = match class {
        Some(name) => vec![lookup_class(registry, name)?],
        None => registry
            .classes()
            .filter(|def| matches!(def.kind, ClassKind::Concrete))
            .map(|def| def.id)
            .collect(),
    };

    let mut results = Vec::with_capacity(targets.len());
    for id in targets {
        let name = registry
            .get(id)
            .map(|def| def.name.clone())
            .unwrap_or_default();
        let result = match registry.instantiate_with(id, options) {
            Ok(_) => ClassResult {
                class: name,
                ok: true,
                error: None,
                missing: Vec::new(),
            },
            Err(CoreError::Contract(err)) => {
                let missing = match &err {
                    ContractError::Violation { missing, .. } => missing.clone(),
                    ContractError::DirectInstantiation => Vec::new(),
                };
                ClassResult {
                    class: name,
                    ok: false,
                    error: Some(err.to_string()),
                    missing,
                }
            }
            Err(other) => return Err(other.into()),
        };
        results.push(result);
    }

    Ok(CheckReport {
        timing: options.timing,
        results,
    })
}

/// Runs the non-invasive predicate for `contract` against the prototype chain
/// of `class`.
pub fn satisfies(
    manifest: &Manifest,
    registry: &ClassRegistry,
    contract: &str,
    class: &str,
) -> Result<bool, CliError> {
    let contract = manifest
        .contracts
        .get(contract)
        .ok_or_else(|| CliError::UnknownContract {
            name: contract.to_string(),
        })?;
    let id = lookup_class(registry, class)?;
    Ok(contract.is_implemented_by(&registry.class_view(id)))
}

/// Effective capability set of `class`'s prototype chain, nearest first.
pub fn capabilities(registry: &ClassRegistry, class: &str) -> Result<Vec<String>, CliError> {
    let id = lookup_class(registry, class)?;
    Ok(effective_capabilities(&registry.class_view(id))
        .into_iter()
        .collect())
}

fn lookup_class(registry: &ClassRegistry, name: &str) -> Result<ClassId, CliError> {
    registry
        .get_by_name(name)
        .ok_or_else(|| CliError::UnknownClass {
            name: name.to_string(),
        })
}
