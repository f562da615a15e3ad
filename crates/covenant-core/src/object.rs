//! Objects and member lookup.
//!
//! [`MemberLookup`] is the seam contracts check against: anything that can
//! resolve a name to its nearest [`Member`] can be tested with
//! [`Contract::is_implemented_by`](crate::contract::Contract::is_implemented_by).
//! Implementations are provided for registry-bound objects ([`ObjectRef`]),
//! class prototypes ([`ClassView`]), [`PlainObject`]s and plain member maps.

use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};

use crate::error::CoreError;
use crate::id::ClassId;
use crate::member::Member;
use crate::registry::ClassRegistry;
use crate::value::Value;

/// Resolves names to members, nearest binding first.
pub trait MemberLookup {
    /// Returns the nearest binding for `name`, if any.
    fn lookup(&self, name: &str) -> Option<&Member>;

    /// Every visible name, nearest scope first, without duplicates.
    fn member_names(&self) -> Vec<&str>;

    /// Name of the concrete type, if the candidate has one.
    fn type_name(&self) -> Option<&str> {
        None
    }
}

/// Names whose nearest binding is callable, in resolution order.
pub fn effective_capabilities<L>(candidate: &L) -> IndexSet<String>
where
    L: MemberLookup + ?Sized,
{
    candidate
        .member_names()
        .into_iter()
        .filter(|name| candidate.lookup(name).is_some_and(Member::is_callable))
        .map(str::to_string)
        .collect()
}

/// An instance of a registered class, with the members its constructor
/// steps attached.
///
/// Produced by [`ClassRegistry::instantiate`]. An `Object` is not a
/// [`MemberLookup`] on its own: its capabilities live on its class chain, so
/// it is checked through [`ClassRegistry::bind`].
#[derive(Debug, Clone)]
pub struct Object {
    class: ClassId,
    own: IndexMap<String, Member>,
}

impl Object {
    pub(crate) fn of_class(class: ClassId) -> Self {
        Object {
            class,
            own: IndexMap::new(),
        }
    }

    /// Binds an own member, replacing any previous own binding for `name`.
    pub fn set(&mut self, name: impl Into<String>, member: impl Into<Member>) {
        self.own.insert(name.into(), member.into());
    }

    pub fn class(&self) -> ClassId {
        self.class
    }

    pub fn own_members(&self) -> &IndexMap<String, Member> {
        &self.own
    }
}

/// A classless object: only its own members are visible.
#[derive(Debug, Clone, Default)]
pub struct PlainObject {
    members: IndexMap<String, Member>,
}

impl PlainObject {
    pub fn new() -> Self {
        PlainObject::default()
    }

    pub fn with_member(mut self, name: impl Into<String>, member: impl Into<Member>) -> Self {
        self.set(name, member);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, member: impl Into<Member>) {
        self.members.insert(name.into(), member.into());
    }
}

impl MemberLookup for PlainObject {
    fn lookup(&self, name: &str) -> Option<&Member> {
        self.members.get(name)
    }

    fn member_names(&self) -> Vec<&str> {
        self.members.keys().map(String::as_str).collect()
    }
}

impl MemberLookup for IndexMap<String, Member> {
    fn lookup(&self, name: &str) -> Option<&Member> {
        self.get(name)
    }

    fn member_names(&self) -> Vec<&str> {
        self.keys().map(String::as_str).collect()
    }
}

impl MemberLookup for HashMap<String, Member> {
    fn lookup(&self, name: &str) -> Option<&Member> {
        self.get(name)
    }

    fn member_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// An [`Object`] bound to the registry that defines its class.
///
/// Lookup order: own members, then the concrete class's prototype table,
/// then each ancestor up to the root.
#[derive(Debug, Clone, Copy)]
pub struct ObjectRef<'a> {
    registry: &'a ClassRegistry,
    object: &'a Object,
}

impl<'a> ObjectRef<'a> {
    pub(crate) fn new(registry: &'a ClassRegistry, object: &'a Object) -> Self {
        ObjectRef { registry, object }
    }

    pub fn object(&self) -> &'a Object {
        self.object
    }

    /// Invokes the method `name` resolves to.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, CoreError> {
        let member = self.lookup(name).ok_or_else(|| CoreError::MemberNotFound {
            name: name.to_string(),
        })?;
        let method = member.as_method().ok_or_else(|| CoreError::NotCallable {
            name: name.to_string(),
        })?;
        Ok(method.call(args))
    }
}

impl MemberLookup for ObjectRef<'_> {
    fn lookup(&self, name: &str) -> Option<&Member> {
        self.object
            .own
            .get(name)
            .or_else(|| self.registry.resolve(self.object.class, name))
    }

    fn member_names(&self) -> Vec<&str> {
        let mut names: IndexSet<&str> = self.object.own.keys().map(String::as_str).collect();
        names.extend(self.registry.prototype_names(self.object.class));
        names.into_iter().collect()
    }

    fn type_name(&self) -> Option<&str> {
        self.registry
            .get(self.object.class)
            .map(|def| def.name.as_str())
    }
}

/// A class's prototype chain, checked without constructing an instance.
///
/// Instance members attached by constructors are not visible here.
#[derive(Debug, Clone, Copy)]
pub struct ClassView<'a> {
    registry: &'a ClassRegistry,
    class: ClassId,
}

impl<'a> ClassView<'a> {
    pub(crate) fn new(registry: &'a ClassRegistry, class: ClassId) -> Self {
        ClassView { registry, class }
    }

    pub fn class(&self) -> ClassId {
        self.class
    }
}

impl MemberLookup for ClassView<'_> {
    fn lookup(&self, name: &str) -> Option<&Member> {
        self.registry.resolve(self.class, name)
    }

    fn member_names(&self) -> Vec<&str> {
        self.registry.prototype_names(self.class)
    }

    fn type_name(&self) -> Option<&str> {
        self.registry.get(self.class).map(|def| def.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::ClassBuilder;

    fn noop() -> Member {
        Member::method(|_| Value::Null)
    }

    #[test]
    fn plain_object_sees_only_own_members() {
        let obj = PlainObject::new()
            .with_member("run", noop())
            .with_member("label", Value::from("x"));
        let caps = effective_capabilities(&obj);
        assert_eq!(caps.into_iter().collect::<Vec<_>>(), vec!["run".to_string()]);
        assert_eq!(obj.type_name(), None);
    }

    #[test]
    fn own_member_shadows_prototype() {
        let mut registry = ClassRegistry::new();
        let id = registry
            .define(ClassBuilder::new("Worker").method("run", |_| Value::Int(1)))
            .unwrap();
        let mut obj = registry.instantiate(id).unwrap();
        obj.set("run", Value::from("not a function"));

        let bound = registry.bind(&obj);
        assert!(!bound.lookup("run").unwrap().is_callable());
        assert!(effective_capabilities(&bound).is_empty());
        assert_eq!(
            bound.call("run", &[]),
            Err(CoreError::NotCallable { name: "run".into() })
        );
    }

    #[test]
    fn bound_object_names_are_nearest_first() {
        let mut registry = ClassRegistry::new();
        let base = registry
            .define(ClassBuilder::new("Base").method("a", |_| Value::Null).method("b", |_| Value::Null))
            .unwrap();
        let sub = registry
            .define(
                ClassBuilder::new("Sub")
                    .extends(base)
                    .method("c", |_| Value::Null)
                    .method("a", |_| Value::Null)
                    .instance_member("d", noop()),
            )
            .unwrap();
        let obj = registry.instantiate(sub).unwrap();
        let bound = registry.bind(&obj);
        assert_eq!(bound.member_names(), vec!["d", "c", "a", "b"]);
        assert_eq!(bound.type_name(), Some("Sub"));
    }

    #[test]
    fn call_reports_missing_member() {
        let mut registry = ClassRegistry::new();
        let id = registry.define(ClassBuilder::new("Empty")).unwrap();
        let obj = registry.instantiate(id).unwrap();
        assert_eq!(
            registry.bind(&obj).call("nope", &[]),
            Err(CoreError::MemberNotFound { name: "nope".into() })
        );
    }

    #[test]
    fn hash_map_names_are_sorted() {
        let mut map = HashMap::new();
        map.insert("b".to_string(), noop());
        map.insert("a".to_string(), noop());
        assert_eq!(map.member_names(), vec!["a", "b"]);
    }
}
