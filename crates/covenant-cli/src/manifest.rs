//! JSON manifests describing contracts and classes.
//!
//! A manifest lists named contracts and an ordered list of classes. Classes
//! are registered in file order, so `extends` must name a contract or class
//! declared earlier. Methods are declared by name only and bound to a no-op
//! callable.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use covenant_core::{ClassBuilder, ClassRegistry, Contract, CoreError, Member, Method, Value};

use crate::error::CliError;

/// Top-level manifest document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Contract name -> required method names, in order.
    #[serde(default)]
    pub contracts: IndexMap<String, Contract>,
    #[serde(default)]
    pub classes: Vec<ClassSpec>,
}

/// One class entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassSpec {
    pub name: String,
    /// Parent contract or class name.
    #[serde(default)]
    pub extends: Option<String>,
    /// Prototype methods.
    #[serde(default)]
    pub methods: Vec<String>,
    /// Prototype fields (not callable).
    #[serde(default)]
    pub fields: IndexMap<String, Value>,
    /// Methods the constructor attaches to each instance.
    #[serde(default)]
    pub instance_methods: Vec<String>,
    /// Fields the constructor attaches to each instance.
    #[serde(default)]
    pub instance_fields: IndexMap<String, Value>,
}

impl Manifest {
    pub fn from_json(json: &str) -> Result<Self, CliError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, CliError> {
        let text = fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let manifest = Self::from_json(&text)?;
        tracing::info!(
            "loaded manifest '{}': {} contract(s), {} class(es)",
            path.display(),
            manifest.contracts.len(),
            manifest.classes.len()
        );
        Ok(manifest)
    }

    /// Builds a registry: contracts first, then classes in file order.
    pub fn build_registry(&self) -> Result<ClassRegistry, CoreError> {
        let mut registry = ClassRegistry::new();
        for (name, contract) in &self.contracts {
            registry.declare_contract(name, contract.clone())?;
        }
        for spec in &self.classes {
            registry.define(spec.to_builder())?;
        }
        Ok(registry)
    }
}

impl ClassSpec {
    fn to_builder(&self) -> ClassBuilder {
        let mut builder = ClassBuilder::new(self.name.as_str());
        if let Some(parent) = &self.extends {
            builder = builder.extends_named(parent.as_str());
        }
        for name in &self.methods {
            builder = builder.member(name.as_str(), Method::noop());
        }
        for (name, value) in &self.fields {
            builder = builder.member(name.as_str(), Member::Field(value.clone()));
        }
        for name in &self.instance_methods {
            builder = builder.instance_member(name.as_str(), Method::noop());
        }
        for (name, value) in &self.instance_fields {
            builder = builder.instance_member(name.as_str(), Member::Field(value.clone()));
        }
        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "contracts": { "Worker": ["doWork", "doMoreWork"] },
        "classes": [
            { "name": "Base", "extends": "Worker", "methods": ["doWork"],
              "fields": { "label": "base" } },
            { "name": "Impl", "extends": "Base", "instance_methods": ["doMoreWork"] }
        ]
    }"#;

    #[test]
    fn parses_and_builds_registry() {
        let manifest = Manifest::from_json(SAMPLE).unwrap();
        assert_eq!(
            manifest.contracts["Worker"].required(),
            ["doWork", "doMoreWork"]
        );
        let registry = manifest.build_registry().unwrap();
        assert_eq!(registry.len(), 3);

        let base = registry.get_by_name("Base").unwrap();
        let imp = registry.get_by_name("Impl").unwrap();
        assert_eq!(registry.parent_of(imp), Some(base));
        assert!(registry.instantiate(imp).is_ok());
        assert!(registry.instantiate(base).is_err());
    }

    #[test]
    fn unknown_parent_is_a_core_error() {
        let manifest = Manifest::from_json(
            r#"{ "classes": [ { "name": "A", "extends": "Nope" } ] }"#,
        )
        .unwrap();
        assert_eq!(
            manifest.build_registry().unwrap_err(),
            CoreError::UnknownParent {
                name: "Nope".into()
            }
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Manifest::from_json(r#"{ "classes": [ { "name": "A", "method": [] } ] }"#)
            .unwrap_err();
        assert!(matches!(err, CliError::Json(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Manifest::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, CliError::Io { .. }));
    }
}
