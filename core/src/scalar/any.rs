use std::sync::LazyLock;

use tracing::debug;

use super::constraint_violation;
use crate::constraint::{Constraints, Refinement};
use crate::descriptor::{Descriptor, Kind, Type};
use crate::error::ParseError;
use crate::registry::{bigint, boolean, null, number, string, undefined};
use crate::value::Value;

/// Candidate kinds tried by [`AnyType::parse`], in priority order.
///
/// `true`/`false` are booleans before strings, empty text is null before
/// undefined, and integer text is a big integer before a float.
static PARSE_PRIORITY: LazyLock<[Descriptor; 6]> = LazyLock::new(|| {
    [
        boolean().into(),
        null().into(),
        undefined().into(),
        bigint().into(),
        number().into(),
        string().into(),
    ]
});

/// Descriptor accepting every value, subject to its constraint list.
///
/// # Examples
///
/// ```
/// use chat_schema_core::{any, Type, Value};
/// use num_bigint::BigInt;
///
/// assert_eq!(any().parse("true").unwrap(), Value::Bool(true));
/// assert_eq!(any().parse("").unwrap(), Value::Null);
/// assert_eq!(any().parse("42").unwrap(), Value::BigInt(BigInt::from(42)));
/// assert_eq!(any().parse("2.5").unwrap(), Value::Number(2.5));
/// assert_eq!(any().parse("hello").unwrap(), Value::from("hello"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct AnyType {
    constraints: Constraints<Refinement<Value>>,
}

impl AnyType {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn constraints(&self) -> &Constraints<Refinement<Value>> {
        &self.constraints
    }

    pub fn refine<F>(&self, label: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            constraints: self.constraints.with(Refinement::new(label, predicate)),
        }
    }
}

impl Type for AnyType {
    type Output = Value;

    fn kind(&self) -> Kind {
        Kind::Any
    }

    fn test(&self, value: &Value) -> bool {
        self.check(value)
    }

    fn parse(&self, text: &str) -> Result<Value, ParseError> {
        let (kind, value) = PARSE_PRIORITY
            .iter()
            .find_map(|candidate| {
                let value = candidate.parse(text).ok()?;
                Some((candidate.kind(), value))
            })
            .ok_or_else(|| ParseError::NotRepresentable {
                input: text.to_string(),
            })?;
        debug!(input = text, %kind, "Inferred value kind");

        match self.constraints.violation(&value) {
            Some(c) => Err(constraint_violation(Kind::Any, text, c)),
            None => Ok(value),
        }
    }

    fn check(&self, value: &Value) -> bool {
        self.constraints.check(value)
    }
}
