//! Members bound on objects and class prototype tables.
//!
//! A name resolves to a [`Member`]: either a callable [`Method`] or a plain
//! [`Field`](Member::Field). Only methods count as capabilities; a field bound
//! to a required name does not satisfy a contract.

use std::fmt;
use std::sync::Arc;

use crate::value::Value;

type NativeFn = dyn Fn(&[Value]) -> Value + Send + Sync;

/// A native callable. Cloning shares the underlying closure.
#[derive(Clone)]
pub struct Method {
    func: Arc<NativeFn>,
}

impl Method {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Method {
            func: Arc::new(func),
        }
    }

    /// A method that ignores its arguments and returns `Value::Null`.
    ///
    /// Used for members declared by name only, e.g. from a manifest.
    pub fn noop() -> Self {
        Method::new(|_| Value::Null)
    }

    pub fn call(&self, args: &[Value]) -> Value {
        (self.func)(args)
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Method(<native>)")
    }
}

/// A value bound to a name on an object or a prototype table.
#[derive(Debug, Clone)]
pub enum Member {
    Method(Method),
    Field(Value),
}

impl Member {
    /// Shorthand for `Member::Method(Method::new(func))`.
    pub fn method<F>(func: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Member::Method(Method::new(func))
    }

    pub fn field(value: impl Into<Value>) -> Self {
        Member::Field(value.into())
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Member::Method(_))
    }

    pub fn as_method(&self) -> Option<&Method> {
        match self {
            Member::Method(m) => Some(m),
            Member::Field(_) => None,
        }
    }
}

impl From<Method> for Member {
    fn from(m: Method) -> Self {
        Member::Method(m)
    }
}

impl From<Value> for Member {
    fn from(v: Value) -> Self {
        Member::Field(v)
    }
}
