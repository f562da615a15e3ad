//! Class definitions for the dynamic object model.
//!
//! A [`ClassDef`] is a named node in the registry's hierarchy with at most one
//! parent. Its `methods` table plays the role of a prototype: every instance
//! of the class or of a descendant resolves names through it. Its
//! `instance_members` are attached to each new object by the class's
//! constructor step.
//!
//! Contract classes ([`ClassKind::Contract`]) are roots that carry a
//! [`Contract`]; constructing a descendant runs the contract's guard.

use indexmap::IndexMap;

use crate::contract::Contract;
use crate::id::ClassId;
use crate::member::Member;
use crate::value::Value;

/// What kind of class a registry node is.
#[derive(Debug, Clone)]
pub enum ClassKind {
    /// An ordinary class that may be instantiated.
    Concrete,
    /// An abstract contract base. Never instantiated directly.
    Contract(Contract),
}

/// A class registered in a [`ClassRegistry`](crate::registry::ClassRegistry).
#[derive(Debug, Clone)]
pub struct ClassDef {
    pub id: ClassId,
    pub name: String,
    /// Direct parent. `None` for roots.
    pub parent: Option<ClassId>,
    pub kind: ClassKind,
    /// Prototype table, in declaration order.
    pub methods: IndexMap<String, Member>,
    /// Members attached to `this` by this class's constructor step.
    pub instance_members: IndexMap<String, Member>,
}

impl ClassDef {
    pub fn contract(&self) -> Option<&Contract> {
        match &self.kind {
            ClassKind::Contract(c) => Some(c),
            ClassKind::Concrete => None,
        }
    }

    pub fn is_contract(&self) -> bool {
        self.contract().is_some()
    }
}

/// How a [`ClassBuilder`] names its parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParentRef {
    Id(ClassId),
    Name(String),
}

/// Declarative description of a concrete class, registered with
/// [`ClassRegistry::define`](crate::registry::ClassRegistry::define).
#[derive(Debug, Clone)]
pub struct ClassBuilder {
    pub(crate) name: String,
    pub(crate) parent: Option<ParentRef>,
    pub(crate) methods: IndexMap<String, Member>,
    pub(crate) instance_members: IndexMap<String, Member>,
}

impl ClassBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        ClassBuilder {
            name: name.into(),
            parent: None,
            methods: IndexMap::new(),
            instance_members: IndexMap::new(),
        }
    }

    pub fn extends(mut self, parent: ClassId) -> Self {
        self.parent = Some(ParentRef::Id(parent));
        self
    }

    pub fn extends_named(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(ParentRef::Name(parent.into()));
        self
    }

    /// Adds a prototype member. A later binding for the same name replaces
    /// the earlier one.
    pub fn member(mut self, name: impl Into<String>, member: impl Into<Member>) -> Self {
        self.methods.insert(name.into(), member.into());
        self
    }

    /// Adds a prototype method.
    pub fn method<F>(self, name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        self.member(name, Member::method(func))
    }

    /// Adds a member the constructor attaches to every new instance.
    pub fn instance_member(mut self, name: impl Into<String>, member: impl Into<Member>) -> Self {
        self.instance_members.insert(name.into(), member.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_declaration_order() {
        let b = ClassBuilder::new("MyClass")
            .method("b", |_| Value::Null)
            .method("a", |_| Value::Null)
            .member("label", Value::from("x"));
        let names: Vec<&str> = b.methods.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["b", "a", "label"]);
    }

    #[test]
    fn later_binding_replaces_earlier() {
        let b = ClassBuilder::new("MyClass")
            .method("run", |_| Value::Null)
            .member("run", Value::Int(1));
        assert_eq!(b.methods.len(), 1);
        assert!(!b.methods["run"].is_callable());
    }

    #[test]
    fn parent_by_name_or_id() {
        let by_name = ClassBuilder::new("Sub").extends_named("Base");
        assert_eq!(by_name.parent, Some(ParentRef::Name("Base".into())));
        let by_id = ClassBuilder::new("Sub").extends(ClassId(4));
        assert_eq!(by_id.parent, Some(ParentRef::Id(ClassId(4))));
    }
}
