use num_bigint::BigInt;

use super::number::Bound;
use super::{constraint_violation, invalid_literal};
use crate::constraint::{BigIntConstraint, Constraints, Refinement};
use crate::descriptor::{Kind, Type};
use crate::error::ParseError;
use crate::value::Value;

/// Descriptor for arbitrary-precision integers.
///
/// # Examples
///
/// ```
/// use chat_schema_core::{bigint, Type};
/// use num_bigint::BigInt;
///
/// let id = bigint().positive();
/// let parsed = id.parse("123456789012345678901234567890").unwrap();
/// assert_eq!(parsed.to_string(), "123456789012345678901234567890");
/// assert!(id.parse("0").is_err());
/// assert!(id.parse("1.5").is_err());
/// assert!(id.check(&BigInt::from(1)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct BigIntType {
    lower: Option<Bound<BigInt>>,
    upper: Option<Bound<BigInt>>,
    multiple_of: Option<BigInt>,
    constraints: Constraints<BigIntConstraint>,
}

impl BigIntType {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lower_bound(&self) -> Option<&Bound<BigInt>> {
        self.lower.as_ref()
    }

    pub fn upper_bound(&self) -> Option<&Bound<BigInt>> {
        self.upper.as_ref()
    }

    pub fn multiple_of_base(&self) -> Option<&BigInt> {
        self.multiple_of.as_ref()
    }

    pub fn constraints(&self) -> &Constraints<BigIntConstraint> {
        &self.constraints
    }

    fn extend(&self, constraint: BigIntConstraint) -> Self {
        Self {
            constraints: self.constraints.with(constraint),
            ..self.clone()
        }
    }

    pub fn ge(&self, value: impl Into<BigInt>) -> Self {
        let value = value.into();
        let mut next = self.extend(BigIntConstraint::Ge(value.clone()));
        next.lower = Some(Bound::inclusive(value));
        next
    }

    pub fn gt(&self, value: impl Into<BigInt>) -> Self {
        let value = value.into();
        let mut next = self.extend(BigIntConstraint::Gt(value.clone()));
        next.lower = Some(Bound::exclusive(value));
        next
    }

    pub fn le(&self, value: impl Into<BigInt>) -> Self {
        let value = value.into();
        let mut next = self.extend(BigIntConstraint::Le(value.clone()));
        next.upper = Some(Bound::inclusive(value));
        next
    }

    pub fn lt(&self, value: impl Into<BigInt>) -> Self {
        let value = value.into();
        let mut next = self.extend(BigIntConstraint::Lt(value.clone()));
        next.upper = Some(Bound::exclusive(value));
        next
    }

    pub fn max(&self, value: impl Into<BigInt>) -> Self {
        self.le(value)
    }

    pub fn min(&self, value: impl Into<BigInt>) -> Self {
        self.ge(value)
    }

    pub fn positive(&self) -> Self {
        self.gt(0)
    }

    pub fn negative(&self) -> Self {
        self.lt(0)
    }

    pub fn non_positive(&self) -> Self {
        self.le(0)
    }

    pub fn non_negative(&self) -> Self {
        self.ge(0)
    }

    pub fn multiple_of(&self, base: impl Into<BigInt>) -> Self {
        let base = base.into();
        let mut next = self.extend(BigIntConstraint::MultipleOf(base.clone()));
        next.multiple_of = Some(base);
        next
    }

    pub fn refine<F>(&self, label: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&BigInt) -> bool + Send + Sync + 'static,
    {
        self.extend(BigIntConstraint::Refine(Refinement::new(label, predicate)))
    }
}

/// Optional sign followed by ASCII decimal digits, surrounding whitespace ignored.
fn integer_literal(text: &str) -> Option<BigInt> {
    let trimmed = text.trim();
    let digits = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let magnitude = BigInt::parse_bytes(digits.as_bytes(), 10)?;
    Some(if trimmed.starts_with('-') {
        -magnitude
    } else {
        magnitude
    })
}

impl Type for BigIntType {
    type Output = BigInt;

    fn kind(&self) -> Kind {
        Kind::BigInt
    }

    fn test(&self, value: &Value) -> bool {
        value.as_bigint().is_some_and(|b| self.check(b))
    }

    fn parse(&self, text: &str) -> Result<BigInt, ParseError> {
        let b = integer_literal(text).ok_or_else(|| invalid_literal(Kind::BigInt, text))?;
        match self.constraints.violation(&b) {
            Some(c) => Err(constraint_violation(Kind::BigInt, text, c)),
            None => Ok(b),
        }
    }

    fn check(&self, value: &BigInt) -> bool {
        self.constraints.check(value)
    }
}
