use std::fmt;

use super::{constraint_violation, invalid_literal};
use crate::constraint::{Constraints, NumberConstraint, Refinement};
use crate::descriptor::{Kind, Type};
use crate::error::ParseError;
use crate::value::Value;

/// A recorded lower or upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bound<T> {
    pub value: T,
    pub inclusive: bool,
}

impl<T> Bound<T> {
    pub(crate) fn inclusive(value: T) -> Self {
        Self {
            value,
            inclusive: true,
        }
    }

    pub(crate) fn exclusive(value: T) -> Self {
        Self {
            value,
            inclusive: false,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Bound<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.inclusive { "inclusive" } else { "exclusive" };
        write!(f, "{} ({marker})", self.value)
    }
}

/// Descriptor for 64-bit floating point numbers.
///
/// # Examples
///
/// ```
/// use chat_schema_core::{number, Type, Value};
///
/// let percent = number().int().min(0.0).max(100.0);
/// assert!(percent.test(&Value::from(42)));
/// assert!(!percent.test(&Value::from(42.5)));
/// assert_eq!(percent.parse(" 7 ").unwrap(), 7.0);
/// assert!(percent.parse("101").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct NumberType {
    lower: Option<Bound<f64>>,
    upper: Option<Bound<f64>>,
    multiple_of: Option<f64>,
    integer: bool,
    finite: bool,
    constraints: Constraints<NumberConstraint>,
}

impl NumberType {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lower_bound(&self) -> Option<Bound<f64>> {
        self.lower
    }

    pub fn upper_bound(&self) -> Option<Bound<f64>> {
        self.upper
    }

    pub fn multiple_of_base(&self) -> Option<f64> {
        self.multiple_of
    }

    pub fn is_integer(&self) -> bool {
        self.integer
    }

    pub fn is_finite(&self) -> bool {
        self.finite
    }

    pub fn constraints(&self) -> &Constraints<NumberConstraint> {
        &self.constraints
    }

    fn extend(&self, constraint: NumberConstraint) -> Self {
        Self {
            constraints: self.constraints.with(constraint),
            ..self.clone()
        }
    }

    pub fn ge(&self, value: f64) -> Self {
        let mut next = self.extend(NumberConstraint::Ge(value));
        next.lower = Some(Bound::inclusive(value));
        next
    }

    pub fn gt(&self, value: f64) -> Self {
        let mut next = self.extend(NumberConstraint::Gt(value));
        next.lower = Some(Bound::exclusive(value));
        next
    }

    pub fn le(&self, value: f64) -> Self {
        let mut next = self.extend(NumberConstraint::Le(value));
        next.upper = Some(Bound::inclusive(value));
        next
    }

    pub fn lt(&self, value: f64) -> Self {
        let mut next = self.extend(NumberConstraint::Lt(value));
        next.upper = Some(Bound::exclusive(value));
        next
    }

    /// Alias of [`le`](Self::le).
    pub fn max(&self, value: f64) -> Self {
        self.le(value)
    }

    /// Alias of [`ge`](Self::ge).
    pub fn min(&self, value: f64) -> Self {
        self.ge(value)
    }

    pub fn positive(&self) -> Self {
        self.gt(0.0)
    }

    pub fn negative(&self) -> Self {
        self.lt(0.0)
    }

    pub fn non_positive(&self) -> Self {
        self.le(0.0)
    }

    pub fn non_negative(&self) -> Self {
        self.ge(0.0)
    }

    /// `value % base == 0`. A zero base rejects everything.
    pub fn multiple_of(&self, base: f64) -> Self {
        let mut next = self.extend(NumberConstraint::MultipleOf(base));
        next.multiple_of = Some(base);
        next
    }

    pub fn int(&self) -> Self {
        let mut next = self.extend(NumberConstraint::Integer);
        next.integer = true;
        next
    }

    pub fn finite(&self) -> Self {
        let mut next = self.extend(NumberConstraint::Finite);
        next.finite = true;
        next
    }

    pub fn refine<F>(&self, label: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&f64) -> bool + Send + Sync + 'static,
    {
        self.extend(NumberConstraint::Refine(Refinement::new(label, predicate)))
    }
}

/// Converts numeric text, accepting `Infinity` spellings. NaN is rejected.
///
/// Apart from `Infinity`, the only letters allowed are exponent markers, so
/// `inf` and `nan` in any case stay non-numeric.
fn number_literal(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let parsed = match trimmed {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        other if other
            .bytes()
            .any(|b| b.is_ascii_alphabetic() && !matches!(b, b'e' | b'E')) =>
        {
            return None;
        }
        other => other.parse::<f64>().ok()?,
    };
    (!parsed.is_nan()).then_some(parsed)
}

impl Type for NumberType {
    type Output = f64;

    fn kind(&self) -> Kind {
        Kind::Number
    }

    fn test(&self, value: &Value) -> bool {
        value.as_number().is_some_and(|n| self.check(&n))
    }

    fn parse(&self, text: &str) -> Result<f64, ParseError> {
        let n = number_literal(text).ok_or_else(|| invalid_literal(Kind::Number, text))?;
        match self.constraints.violation(&n) {
            Some(c) => Err(constraint_violation(Kind::Number, text, c)),
            None => Ok(n),
        }
    }

    fn check(&self, value: &f64) -> bool {
        self.constraints.check(value)
    }
}
