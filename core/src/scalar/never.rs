use std::convert::Infallible;

use crate::descriptor::{Kind, Type};
use crate::error::ParseError;
use crate::value::Value;

/// Descriptor that accepts no value at all.
///
/// # Examples
///
/// ```
/// use chat_schema_core::{never, Type, Value};
///
/// assert!(!never().test(&Value::Undefined));
/// assert!(never().parse("").is_err());
/// ```
///
/// It has no refinements: there is nothing left to narrow.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverType;

impl NeverType {
    pub fn new() -> Self {
        Self
    }
}

impl Type for NeverType {
    type Output = Infallible;

    fn kind(&self) -> Kind {
        Kind::Never
    }

    fn test(&self, _value: &Value) -> bool {
        false
    }

    fn parse(&self, text: &str) -> Result<Infallible, ParseError> {
        Err(ParseError::Unsupported {
            kind: Kind::Never,
            input: text.to_string(),
        })
    }

    fn check(&self, value: &Infallible) -> bool {
        match *value {}
    }
}
