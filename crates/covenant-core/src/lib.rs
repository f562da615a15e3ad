pub mod class;
pub mod construct;
pub mod contract;
pub mod error;
pub mod id;
pub mod member;
pub mod object;
pub mod registry;
pub mod value;

// Re-export commonly used types
pub use class::{ClassBuilder, ClassDef, ClassKind};
pub use construct::{ConstructOptions, GuardTiming};
pub use contract::Contract;
pub use error::{ContractError, CoreError};
pub use id::ClassId;
pub use member::{Member, Method};
pub use object::{
    effective_capabilities, ClassView, MemberLookup, Object, ObjectRef, PlainObject,
};
pub use registry::ClassRegistry;
pub use value::Value;
