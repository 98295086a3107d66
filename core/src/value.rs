//! Runtime values checked by descriptors.
//!
//! [`Value`] is the dynamic representation every descriptor's
//! [`test`](crate::Type::test) inspects. It is a closed set of variants, one
//! per runtime kind, so descriptors never need to introspect foreign types.

use std::fmt;
use std::sync::Arc;

use num_bigint::BigInt;
use serde::{Serialize, Serializer};

use crate::error::CallError;

/// Runtime kind of a [`Value`].
///
/// # Examples
///
/// ```
/// use chat_schema_core::{Value, ValueKind};
///
/// assert_eq!(Value::from("hi").kind(), ValueKind::String);
/// assert_eq!(ValueKind::BigInt.to_string(), "bigint");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Undefined,
    Null,
    Boolean,
    Number,
    BigInt,
    String,
    Function,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::BigInt => "bigint",
            Self::String => "string",
            Self::Function => "function",
        };
        f.write_str(name)
    }
}

/// Signature shared by every callable value.
pub type Invoke = dyn Fn(&[Value]) -> Result<Value, CallError> + Send + Sync;

/// A function value with a declared arity.
///
/// Cloning is cheap: the body is reference counted, so the same callable can
/// be held by several descriptors or values at once.
///
/// # Examples
///
/// ```
/// use chat_schema_core::{Callable, Value};
///
/// let double = Callable::new(1, |args| {
///     let n = args.first().and_then(Value::as_number).unwrap_or_default();
///     Ok(Value::Number(n * 2.0))
/// });
/// assert_eq!(double.arity(), 1);
/// assert_eq!(double.call(&[Value::from(4)]).unwrap(), Value::from(8));
/// ```
#[derive(Clone)]
pub struct Callable {
    arity: usize,
    invoke: Arc<Invoke>,
}

impl Callable {
    /// Wraps a closure taking `arity` positional arguments.
    pub fn new<F>(arity: usize, invoke: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, CallError> + Send + Sync + 'static,
    {
        Self {
            arity,
            invoke: Arc::new(invoke),
        }
    }

    pub(crate) fn from_shared(arity: usize, invoke: Arc<Invoke>) -> Self {
        Self { arity, invoke }
    }

    /// Number of declared positional parameters.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Invokes the function body.
    pub fn call(&self, args: &[Value]) -> Result<Value, CallError> {
        (self.invoke)(args)
    }

    /// Returns `true` if both handles share the same function body.
    pub fn ptr_eq(&self, other: &Callable) -> bool {
        Arc::ptr_eq(&self.invoke, &other.invoke)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// A dynamically typed runtime value.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Absence of a value (also the result of `void` functions).
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    BigInt(BigInt),
    String(String),
    Function(Callable),
}

impl Value {
    /// Returns the runtime kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Undefined => ValueKind::Undefined,
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Boolean,
            Self::Number(_) => ValueKind::Number,
            Self::BigInt(_) => ValueKind::BigInt,
            Self::String(_) => ValueKind::String,
            Self::Function(_) => ValueKind::Function,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bigint(&self) -> Option<&BigInt> {
        match self {
            Self::BigInt(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Callable> {
        match self {
            Self::Function(c) => Some(c),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::BigInt(a), Self::BigInt(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Function(a), Self::Function(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("undefined"),
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) if n.is_infinite() => {
                f.write_str(if *n > 0.0 { "Infinity" } else { "-Infinity" })
            }
            Self::Number(n) => write!(f, "{n}"),
            Self::BigInt(b) => write!(f, "{b}"),
            Self::String(s) => f.write_str(s),
            Self::Function(c) => write!(f, "[function/{}]", c.arity()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Undefined | Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) if n.is_finite() => serializer.serialize_f64(*n),
            Self::String(s) => serializer.serialize_str(s),
            other => serializer.collect_str(other),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Self::BigInt(value)
    }
}

impl From<Callable> for Value {
    fn from(value: Callable) -> Self {
        Self::Function(value)
    }
}
