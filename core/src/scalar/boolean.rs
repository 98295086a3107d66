use super::{constraint_violation, invalid_literal};
use crate::constraint::{Constraints, Refinement};
use crate::descriptor::{Kind, Type};
use crate::error::ParseError;
use crate::value::Value;

/// Descriptor for booleans. Only the exact tokens `true` and `false` parse.
#[derive(Debug, Clone, Default)]
pub struct BooleanType {
    constraints: Constraints<Refinement<bool>>,
}

impl BooleanType {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn constraints(&self) -> &Constraints<Refinement<bool>> {
        &self.constraints
    }

    pub fn refine<F>(&self, label: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&bool) -> bool + Send + Sync + 'static,
    {
        Self {
            constraints: self.constraints.with(Refinement::new(label, predicate)),
        }
    }
}

impl Type for BooleanType {
    type Output = bool;

    fn kind(&self) -> Kind {
        Kind::Boolean
    }

    fn test(&self, value: &Value) -> bool {
        value.as_bool().is_some_and(|b| self.check(&b))
    }

    fn parse(&self, text: &str) -> Result<bool, ParseError> {
        let b = match text {
            "true" => true,
            "false" => false,
            _ => return Err(invalid_literal(Kind::Boolean, text)),
        };
        match self.constraints.violation(&b) {
            Some(c) => Err(constraint_violation(Kind::Boolean, text, c)),
            None => Ok(b),
        }
    }

    fn check(&self, value: &bool) -> bool {
        self.constraints.check(value)
    }
}
