use super::{constraint_violation, invalid_literal};
use crate::constraint::{Constraints, Refinement};
use crate::descriptor::{Kind, Type};
use crate::error::ParseError;
use crate::value::Value;

/// Which "no value" descriptor an [`EmptyType`] stands for.
///
/// `Undefined` and `Void` are two names for the same semantics: both accept
/// [`Value::Undefined`] only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EmptyKind {
    Null,
    #[default]
    Undefined,
    Void,
}

impl EmptyKind {
    /// The single value this kind describes.
    pub fn value(self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Undefined | Self::Void => Value::Undefined,
        }
    }

    fn descriptor_kind(self) -> Kind {
        match self {
            Self::Null => Kind::Null,
            Self::Undefined => Kind::Undefined,
            Self::Void => Kind::Void,
        }
    }
}

/// Descriptor for `null`, `undefined` and `void`.
///
/// Parsing succeeds only on empty text and yields the kind's single value.
///
/// # Examples
///
/// ```
/// use chat_schema_core::{null, void, Type, Value};
///
/// assert_eq!(null().parse("").unwrap(), Value::Null);
/// assert_eq!(void().parse("").unwrap(), Value::Undefined);
/// assert!(void().parse("x").is_err());
/// assert!(!null().test(&Value::Undefined));
/// ```
#[derive(Debug, Clone, Default)]
pub struct EmptyType {
    kind: EmptyKind,
    constraints: Constraints<Refinement<Value>>,
}

impl EmptyType {
    pub fn new(kind: EmptyKind) -> Self {
        Self {
            kind,
            constraints: Constraints::new(),
        }
    }

    pub fn empty_kind(&self) -> EmptyKind {
        self.kind
    }

    pub fn constraints(&self) -> &Constraints<Refinement<Value>> {
        &self.constraints
    }

    pub fn refine<F>(&self, label: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            kind: self.kind,
            constraints: self.constraints.with(Refinement::new(label, predicate)),
        }
    }
}

impl Type for EmptyType {
    type Output = Value;

    fn kind(&self) -> Kind {
        self.kind.descriptor_kind()
    }

    fn test(&self, value: &Value) -> bool {
        *value == self.kind.value() && self.check(value)
    }

    fn parse(&self, text: &str) -> Result<Value, ParseError> {
        if !text.is_empty() {
            return Err(invalid_literal(self.kind(), text));
        }
        let value = self.kind.value();
        match self.constraints.violation(&value) {
            Some(c) => Err(constraint_violation(self.kind(), text, c)),
            None => Ok(value),
        }
    }

    fn check(&self, value: &Value) -> bool {
        self.constraints.check(value)
    }
}
