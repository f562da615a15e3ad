//! Class identity.

use std::fmt;

use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

/// Identifies a class within one [`ClassRegistry`](crate::registry::ClassRegistry).
///
/// The inner value is the class's node index in the registry's hierarchy
/// graph. Ids are never reused because classes are never removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassId(pub u32);

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<NodeIndex<u32>> for ClassId {
    fn from(idx: NodeIndex<u32>) -> Self {
        ClassId(idx.index() as u32)
    }
}

impl From<ClassId> for NodeIndex<u32> {
    fn from(id: ClassId) -> Self {
        NodeIndex::new(id.0 as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::ClassBuilder;
    use crate::contract::Contract;
    use crate::registry::ClassRegistry;

    #[test]
    fn ids_follow_registration_order() {
        let mut reg = ClassRegistry::new();
        let iface = reg
            .declare_contract("Interface", Contract::new(["run"]))
            .unwrap();
        let a = reg.define(ClassBuilder::new("A").extends(iface)).unwrap();
        let b = reg.define(ClassBuilder::new("B").extends(a)).unwrap();
        assert_eq!((iface, a, b), (ClassId(0), ClassId(1), ClassId(2)));
        assert_eq!(reg.get(b).unwrap().id, b);
    }

    #[test]
    fn error_messages_use_the_raw_index() {
        assert_eq!(
            crate::error::CoreError::ClassNotFound { id: ClassId(7) }.to_string(),
            "class not found: ClassId(7)"
        );
    }
}
