//! The contract shared by every descriptor kind.
//!
//! Concrete descriptors implement [`Type`] with a precise `Output` type.
//! [`Descriptor`] erases that type into a closed enum so heterogeneous
//! descriptors can sit side by side, e.g. as the parameters of a
//! [`FunctionType`].

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::error::ParseError;
use crate::function::FunctionType;
use crate::scalar::{
    AnyType, BigIntType, BooleanType, EmptyType, NeverType, NumberType, StringType,
};
use crate::value::Value;

/// Descriptor kind, used in error messages and introspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    String,
    Number,
    BigInt,
    Boolean,
    Null,
    Undefined,
    Void,
    Any,
    Never,
    Function,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Number => "number",
            Self::BigInt => "bigint",
            Self::Boolean => "boolean",
            Self::Null => "null",
            Self::Undefined => "undefined",
            Self::Void => "void",
            Self::Any => "any",
            Self::Never => "never",
            Self::Function => "function",
        };
        f.write_str(name)
    }
}

/// Validate/parse contract implemented by every descriptor.
///
/// Descriptors are immutable. Refinement methods take `&self`, clone the
/// descriptor, extend the clone's constraint list by one entry and return
/// it; the receiver is never altered.
pub trait Type: Clone + Into<Descriptor> {
    /// Rust type produced by [`parse`](Type::parse).
    type Output;

    /// Kind of this descriptor.
    fn kind(&self) -> Kind;

    /// Returns `true` if `value` has this descriptor's runtime kind and
    /// satisfies its constraint list. Never fails.
    fn test(&self, value: &Value) -> bool;

    /// Converts `text` into a value of this kind.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidLiteral`] if the text is not a literal of
    /// this kind and [`ParseError::ConstraintViolation`] if the converted
    /// value fails the constraint list. Some kinds fail unconditionally.
    fn parse(&self, text: &str) -> Result<Self::Output, ParseError>;

    /// Evaluates only the constraint list against an already typed value.
    fn check(&self, value: &Self::Output) -> bool;

    /// Like [`parse`](Type::parse), but returns a tagged outcome.
    fn safe_parse(&self, text: &str) -> SafeParse<Self::Output> {
        self.parse(text).into()
    }
}

/// Outcome of [`Type::safe_parse`].
///
/// Only [`ParseError`]s are captured; anything else (a panic in a
/// refinement predicate, say) propagates unchanged.
///
/// # Examples
///
/// ```
/// use chat_schema_core::{number, Type};
///
/// let ok = number().safe_parse("42");
/// assert!(ok.is_success());
/// assert_eq!(ok.value(), Some(&42.0));
///
/// let err = number().safe_parse("forty-two");
/// assert!(!err.is_success());
/// assert_eq!(
///     serde_json::to_string(&err).unwrap(),
///     r#"{"success":false,"error":"`forty-two` is not a valid number literal"}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum SafeParse<T> {
    Success(T),
    Failure(ParseError),
}

impl<T> SafeParse<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ParseError> {
        match self {
            Self::Success(_) => None,
            Self::Failure(err) => Some(err),
        }
    }

    pub fn into_result(self) -> Result<T, ParseError> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(err) => Err(err),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> SafeParse<U> {
        match self {
            Self::Success(value) => SafeParse::Success(f(value)),
            Self::Failure(err) => SafeParse::Failure(err),
        }
    }
}

impl<T> From<Result<T, ParseError>> for SafeParse<T> {
    fn from(result: Result<T, ParseError>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(err) => Self::Failure(err),
        }
    }
}

impl<T: Serialize> Serialize for SafeParse<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SafeParse", 2)?;
        match self {
            Self::Success(value) => {
                state.serialize_field("success", &true)?;
                state.serialize_field("value", value)?;
            }
            Self::Failure(err) => {
                state.serialize_field("success", &false)?;
                state.serialize_field("error", &err.to_string())?;
            }
        }
        state.end()
    }
}

/// Any descriptor, with its output type erased to [`Value`].
///
/// # Examples
///
/// ```
/// use chat_schema_core::{boolean, number, Descriptor, Kind, Value};
///
/// let params: Vec<Descriptor> = vec![number().int().into(), boolean().into()];
/// assert_eq!(params[0].kind(), Kind::Number);
/// assert!(params[0].test(&Value::from(3)));
/// assert_eq!(params[1].parse("true").unwrap(), Value::Bool(true));
/// ```
#[derive(Debug, Clone)]
pub enum Descriptor {
    String(StringType),
    Number(NumberType),
    BigInt(BigIntType),
    Boolean(BooleanType),
    Empty(EmptyType),
    Any(AnyType),
    Never(NeverType),
    Function(FunctionType),
}

impl Descriptor {
    pub fn kind(&self) -> Kind {
        match self {
            Self::String(t) => t.kind(),
            Self::Number(t) => t.kind(),
            Self::BigInt(t) => t.kind(),
            Self::Boolean(t) => t.kind(),
            Self::Empty(t) => t.kind(),
            Self::Any(t) => t.kind(),
            Self::Never(t) => t.kind(),
            Self::Function(t) => t.kind(),
        }
    }

    pub fn test(&self, value: &Value) -> bool {
        match self {
            Self::String(t) => t.test(value),
            Self::Number(t) => t.test(value),
            Self::BigInt(t) => t.test(value),
            Self::Boolean(t) => t.test(value),
            Self::Empty(t) => t.test(value),
            Self::Any(t) => t.test(value),
            Self::Never(t) => t.test(value),
            Self::Function(t) => t.test(value),
        }
    }

    pub fn parse(&self, text: &str) -> Result<Value, ParseError> {
        match self {
            Self::String(t) => t.parse(text).map(Value::String),
            Self::Number(t) => t.parse(text).map(Value::Number),
            Self::BigInt(t) => t.parse(text).map(Value::BigInt),
            Self::Boolean(t) => t.parse(text).map(Value::Bool),
            Self::Empty(t) => t.parse(text),
            Self::Any(t) => t.parse(text),
            Self::Never(t) => t.parse(text).map(|never| -> Value { match never {} }),
            Self::Function(t) => t.parse(text).map(Value::Function),
        }
    }

    pub fn safe_parse(&self, text: &str) -> SafeParse<Value> {
        self.parse(text).into()
    }

    /// Describes the first constraint `value` violates.
    ///
    /// Returns `None` when `value` passes, and also when it has the wrong
    /// kind (or arity): the kinds alone explain that mismatch.
    pub fn violation(&self, value: &Value) -> Option<String> {
        match self {
            Self::String(t) => value
                .as_str()
                .and_then(|s| t.constraints().violation(s))
                .map(ToString::to_string),
            Self::Number(t) => value
                .as_number()
                .and_then(|n| t.constraints().violation(&n))
                .map(ToString::to_string),
            Self::BigInt(t) => value
                .as_bigint()
                .and_then(|b| t.constraints().violation(b))
                .map(ToString::to_string),
            Self::Boolean(t) => value
                .as_bool()
                .and_then(|b| t.constraints().violation(&b))
                .map(ToString::to_string),
            Self::Empty(t) => (*value == t.empty_kind().value())
                .then(|| t.constraints().violation(value))
                .flatten()
                .map(ToString::to_string),
            Self::Any(t) => t.constraints().violation(value).map(ToString::to_string),
            Self::Never(_) => None,
            Self::Function(t) => value
                .as_function()
                .filter(|f| f.arity() == t.arity())
                .and_then(|f| t.constraints().violation(f))
                .map(ToString::to_string),
        }
    }
}

macro_rules! descriptor_from {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Descriptor {
                fn from(t: $ty) -> Self {
                    Self::$variant(t)
                }
            }

            impl From<&$ty> for Descriptor {
                fn from(t: &$ty) -> Self {
                    Self::$variant(t.clone())
                }
            }
        )*
    };
}

descriptor_from!(
    String(StringType),
    Number(NumberType),
    BigInt(BigIntType),
    Boolean(BooleanType),
    Empty(EmptyType),
    Any(AnyType),
    Never(NeverType),
    Function(FunctionType),
);

impl From<&Descriptor> for Descriptor {
    fn from(d: &Descriptor) -> Self {
        d.clone()
    }
}
