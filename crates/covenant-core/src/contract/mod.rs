//! Capability contracts.
//!
//! A [`Contract`] is an ordered list of method names that an implementing
//! type must expose as callable members. Contracts are immutable once built.
//! They are enforced two ways:
//!
//! - as a base class ([`ClassRegistry::declare_contract`]): constructing any
//!   descendant runs [`Contract::guard`], and constructing the contract class
//!   itself always fails;
//! - non-invasively, with [`Contract::is_implemented_by`] on any
//!   [`MemberLookup`](crate::object::MemberLookup), no ancestry required.
//!
//! Only presence and callability are checked, never arity or argument types.
//!
//! The factory comes in several equivalent spellings, all producing equal
//! contracts: [`Contract::new`], [`Contract::create`], the free function
//! [`create`], the [`contract!`](crate::contract!) macro, `From<[&str; N]>`
//! and `FromIterator`.
//!
//! [`ClassRegistry::declare_contract`]: crate::registry::ClassRegistry::declare_contract

pub mod check;

use serde::{Deserialize, Serialize};

/// An immutable, ordered set of required capability names.
///
/// Order is significant: it is the order names appear in violation reports.
/// Duplicates are kept but inert.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Contract {
    required: Vec<String>,
}

impl Contract {
    /// Builds a contract requiring `names`, in order.
    ///
    /// Names are copied; the contract never aliases caller storage. An empty
    /// list is satisfied by everything.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let required: Vec<String> = names.into_iter().map(Into::into).collect();
        tracing::debug!("created contract requiring {:?}", required);
        Contract { required }
    }

    /// Identical to [`Contract::new`].
    pub fn create<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Contract::new(names)
    }

    /// The required names in declaration order.
    pub fn required(&self) -> &[String] {
        &self.required
    }

    pub fn requires(&self, name: &str) -> bool {
        self.required.iter().any(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.required.len()
    }

    pub fn is_empty(&self) -> bool {
        self.required.is_empty()
    }
}

/// Identical to [`Contract::new`].
pub fn create<I, S>(names: I) -> Contract
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Contract::new(names)
}

impl<const N: usize> From<[&str; N]> for Contract {
    fn from(names: [&str; N]) -> Self {
        Contract::new(names)
    }
}

impl From<Vec<String>> for Contract {
    fn from(names: Vec<String>) -> Self {
        Contract::new(names)
    }
}

impl<S: Into<String>> FromIterator<S> for Contract {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Contract::new(iter)
    }
}

/// Builds a [`Contract`] from a variadic list of names.
///
/// ```
/// use covenant_core::contract;
///
/// let c = contract!("doWork", "doMoreWork");
/// assert_eq!(c.required(), ["doWork", "doMoreWork"]);
/// assert!(contract!().is_empty());
/// ```
#[macro_export]
macro_rules! contract {
    ($($name:expr),* $(,)?) => {{
        let names: ::std::vec::Vec<::std::string::String> =
            ::std::vec![$(::std::string::String::from($name)),*];
        $crate::contract::Contract::new(names)
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_factory_forms_are_equal() {
        let names = ["doWork", "doMoreWork"];
        let a = Contract::new(names);
        let b = Contract::create(names);
        let c = create(names);
        let d = crate::contract!("doWork", "doMoreWork");
        let e = Contract::from(names);
        let f: Contract = names.iter().copied().collect();
        for other in [&b, &c, &d, &e, &f] {
            assert_eq!(&a, other);
        }
    }

    #[test]
    fn order_is_preserved() {
        let c = Contract::new(["z", "a", "m"]);
        assert_eq!(c.required(), ["z", "a", "m"]);
    }

    #[test]
    fn input_is_copied() {
        let mut names = vec!["methodA".to_string()];
        let c = Contract::from(names.clone());
        names.push("methodB".to_string());
        names[0].push_str("-changed");
        assert_eq!(c.required(), ["methodA"]);
    }

    #[test]
    fn empty_contract_is_permitted() {
        let c = Contract::new(Vec::<String>::new());
        assert!(c.is_empty());
        assert_eq!(c, crate::contract!());
    }

    #[test]
    fn serializes_as_name_list() {
        let c = crate::contract!("a", "b");
        assert_eq!(serde_json::to_string(&c).unwrap(), r#"["a","b"]"#);
        let back: Contract = serde_json::from_str(r#"["a","b"]"#).unwrap();
        assert_eq!(back, c);
        assert!(back.requires("b"));
        assert!(!back.requires("c"));
        assert_eq!(back.len(), 2);
    }
}
