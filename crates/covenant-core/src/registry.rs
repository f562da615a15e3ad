//! ClassRegistry: the class hierarchy of the dynamic object model.
//!
//! Classes are nodes of a petgraph `StableGraph`; each class with a parent has
//! exactly one outgoing [`Extends`] edge to it. Parents must be registered
//! before their children and edges are never rewired, so the hierarchy is a
//! forest and ancestry walks always terminate.
//!
//! Prototype tables may still grow after registration through
//! [`ClassRegistry::add_method`]; lookups always see the current tables.

use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableGraph;
use petgraph::{Directed, Direction};

use crate::class::{ClassBuilder, ClassDef, ClassKind, ParentRef};
use crate::contract::Contract;
use crate::error::CoreError;
use crate::id::ClassId;
use crate::member::Member;
use crate::object::{ClassView, Object, ObjectRef};

/// Child-to-parent edge in the class hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extends;

/// Registry of all classes, providing nominal identity via [`ClassId`] and
/// unique class names.
#[derive(Debug, Clone, Default)]
pub struct ClassRegistry {
    hierarchy: StableGraph<ClassDef, Extends, Directed, u32>,
    names: HashMap<String, ClassId>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        ClassRegistry::default()
    }

    // -----------------------------------------------------------------------
    // Registration
    // -----------------------------------------------------------------------

    /// Registers `contract` as an abstract root class named `name`.
    ///
    /// Classes extending it run the contract's guard when constructed.
    /// Instantiating it directly always fails.
    pub fn declare_contract(
        &mut self,
        name: &str,
        contract: Contract,
    ) -> Result<ClassId, CoreError> {
        let id = self.insert(
            name,
            None,
            ClassKind::Contract(contract),
            IndexMap::new(),
            IndexMap::new(),
        )?;
        tracing::debug!("declared contract class '{}' as ClassId({})", name, id);
        Ok(id)
    }

    /// Registers a concrete class.
    ///
    /// Returns [`CoreError::UnknownParent`] if the builder names a parent that
    /// is not registered, and [`CoreError::DuplicateClassName`] if the name is
    /// taken.
    pub fn define(&mut self, builder: ClassBuilder) -> Result<ClassId, CoreError> {
        let parent = match &builder.parent {
            None => None,
            Some(ParentRef::Id(id)) => {
                if !self.contains(*id) {
                    return Err(CoreError::UnknownParent {
                        name: format!("ClassId({})", id),
                    });
                }
                Some(*id)
            }
            Some(ParentRef::Name(name)) => Some(
                self.get_by_name(name)
                    .ok_or_else(|| CoreError::UnknownParent { name: name.clone() })?,
            ),
        };

        let ClassBuilder {
            name,
            methods,
            instance_members,
            ..
        } = builder;
        let id = self.insert(&name, parent, ClassKind::Concrete, methods, instance_members)?;
        tracing::debug!("defined class '{}' as ClassId({}), parent {:?}", name, id, parent);
        Ok(id)
    }

    /// Binds `name` on the prototype table of `class`, replacing any previous
    /// binding. Existing objects and descendants see the change immediately.
    pub fn add_method(
        &mut self,
        class: ClassId,
        name: impl Into<String>,
        member: impl Into<Member>,
    ) -> Result<(), CoreError> {
        let def = self
            .hierarchy
            .node_weight_mut(class.into())
            .ok_or(CoreError::ClassNotFound { id: class })?;
        def.methods.insert(name.into(), member.into());
        Ok(())
    }

    fn insert(
        &mut self,
        name: &str,
        parent: Option<ClassId>,
        kind: ClassKind,
        methods: IndexMap<String, Member>,
        instance_members: IndexMap<String, Member>,
    ) -> Result<ClassId, CoreError> {
        if self.names.contains_key(name) {
            return Err(CoreError::DuplicateClassName {
                name: name.to_string(),
            });
        }

        let idx = self.hierarchy.add_node(ClassDef {
            // Patched below once the node index is known.
            id: ClassId(u32::MAX),
            name: name.to_string(),
            parent,
            kind,
            methods,
            instance_members,
        });
        let id = ClassId::from(idx);
        self.hierarchy[idx].id = id;

        if let Some(parent) = parent {
            self.hierarchy.add_edge(idx, parent.into(), Extends);
        }
        self.names.insert(name.to_string(), id);
        Ok(id)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn contains(&self, id: ClassId) -> bool {
        self.hierarchy.contains_node(id.into())
    }

    pub fn get(&self, id: ClassId) -> Option<&ClassDef> {
        self.hierarchy.node_weight(id.into())
    }

    pub fn get_by_name(&self, name: &str) -> Option<ClassId> {
        self.names.get(name).copied()
    }

    /// All classes in registration order.
    pub fn classes(&self) -> impl Iterator<Item = &ClassDef> {
        self.hierarchy.node_weights()
    }

    pub fn len(&self) -> usize {
        self.hierarchy.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.hierarchy.node_count() == 0
    }

    pub fn parent_of(&self, id: ClassId) -> Option<ClassId> {
        let idx: NodeIndex<u32> = id.into();
        if !self.hierarchy.contains_node(idx) {
            return None;
        }
        self.hierarchy
            .neighbors_directed(idx, Direction::Outgoing)
            .next()
            .map(ClassId::from)
    }

    /// `id` followed by each ancestor up to its root. Empty if `id` is not
    /// registered.
    pub fn ancestry(&self, id: ClassId) -> Vec<ClassId> {
        let mut chain = Vec::new();
        if !self.contains(id) {
            return chain;
        }
        let mut current = Some(id);
        while let Some(class) = current {
            chain.push(class);
            current = self.parent_of(class);
        }
        chain
    }

    /// Resolves `name` against the prototype tables of `id` and its
    /// ancestors, nearest first.
    pub fn resolve(&self, id: ClassId, name: &str) -> Option<&Member> {
        self.ancestry(id)
            .into_iter()
            .filter_map(|class| self.get(class))
            .find_map(|def| def.methods.get(name))
    }

    /// Names bound anywhere on the prototype chain of `id`, nearest first,
    /// without duplicates.
    pub fn prototype_names(&self, id: ClassId) -> Vec<&str> {
        let mut names: IndexSet<&str> = IndexSet::new();
        for def in self.ancestry(id).into_iter().filter_map(|c| self.get(c)) {
            names.extend(def.methods.keys().map(String::as_str));
        }
        names.into_iter().collect()
    }

    /// Contracts on the chain of `id`, root first.
    pub fn contracts_of(&self, id: ClassId) -> Vec<&Contract> {
        let mut contracts: Vec<&Contract> = self
            .ancestry(id)
            .into_iter()
            .filter_map(|class| self.get(class))
            .filter_map(ClassDef::contract)
            .collect();
        contracts.reverse();
        contracts
    }

    /// A lookup over the prototype chain of `class`, without instance members.
    pub fn class_view(&self, class: ClassId) -> ClassView<'_> {
        ClassView::new(self, class)
    }

    /// Binds `object` to this registry so lookups walk its class ancestry.
    pub fn bind<'a>(&'a self, object: &'a Object) -> ObjectRef<'a> {
        ObjectRef::new(self, object)
    }
}
