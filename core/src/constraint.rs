//! Constraint lists attached to descriptors.
//!
//! Constraints are kept as tagged descriptions (kind plus parameters) rather
//! than opaque closures, so a descriptor can always report which entry a
//! value violated. [`Refinement`] is the one closure-backed constraint; it
//! carries a label for the same reason.

use std::fmt;
use std::sync::Arc;

use num_bigint::BigInt;
use regex::Regex;

/// A predicate over values of type `T`.
pub trait Constraint<T: ?Sized>: fmt::Display {
    /// Returns `true` if `value` satisfies this constraint.
    fn holds(&self, value: &T) -> bool;
}

/// An ordered, append-only list of constraints, evaluated conjunctively.
///
/// Lists are only ever extended on a fresh clone, so a list reachable from a
/// published descriptor never changes.
///
/// # Examples
///
/// ```
/// use chat_schema_core::{Constraints, NumberConstraint};
///
/// let list = Constraints::new()
///     .with(NumberConstraint::Ge(1.0))
///     .with(NumberConstraint::Lt(10.0));
/// assert!(list.check(&5.0));
/// assert_eq!(list.violation(&10.0).unwrap().to_string(), "value < 10");
/// ```
#[derive(Debug, Clone)]
pub struct Constraints<C> {
    items: Vec<C>,
}

impl<C> Default for Constraints<C> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<C: Clone> Constraints<C> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of this list with `constraint` appended.
    pub fn with(&self, constraint: C) -> Self {
        let mut items = self.items.clone();
        items.push(constraint);
        Self { items }
    }
}

impl<C> Constraints<C> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, C> {
        self.items.iter()
    }

    /// Returns `true` if every constraint holds for `value`.
    pub fn check<T: ?Sized>(&self, value: &T) -> bool
    where
        C: Constraint<T>,
    {
        self.items.iter().all(|c| c.holds(value))
    }

    /// Returns the first constraint `value` violates, if any.
    pub fn violation<T: ?Sized>(&self, value: &T) -> Option<&C>
    where
        C: Constraint<T>,
    {
        self.items.iter().find(|c| !c.holds(value))
    }
}

impl<'a, C> IntoIterator for &'a Constraints<C> {
    type Item = &'a C;
    type IntoIter = std::slice::Iter<'a, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// A labelled user-supplied predicate.
///
/// # Examples
///
/// ```
/// use chat_schema_core::{Constraint, Refinement};
///
/// let even = Refinement::new("even", |n: &f64| n % 2.0 == 0.0);
/// assert!(even.holds(&4.0));
/// assert_eq!(even.to_string(), "refine(even)");
/// ```
pub struct Refinement<T: ?Sized> {
    label: String,
    predicate: Arc<dyn Fn(&T) -> bool + Send + Sync>,
}

impl<T: ?Sized> Refinement<T> {
    pub fn new<F>(label: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            predicate: Arc::new(predicate),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl<T: ?Sized> Clone for Refinement<T> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Refinement<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Refinement").field(&self.label).finish()
    }
}

impl<T: ?Sized> fmt::Display for Refinement<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "refine({})", self.label)
    }
}

impl<T: ?Sized> Constraint<T> for Refinement<T> {
    fn holds(&self, value: &T) -> bool {
        (self.predicate)(value)
    }
}

/// Constraint on a string value. Lengths and positions count `char`s.
#[derive(Debug, Clone)]
pub enum StringConstraint {
    MaxLength(usize),
    MinLength(usize),
    Pattern(Regex),
    /// `needle` occurs at or after `position`.
    Includes { needle: String, position: usize },
    /// `needle` occurs exactly at `position`.
    StartsWith { needle: String, position: usize },
    /// `needle` ends at `end`, or at the end of the string when `None`.
    EndsWith { needle: String, end: Option<usize> },
    Refine(Refinement<str>),
}

/// Byte offset of the `chars`-th character, clamped to the string length.
fn byte_offset(s: &str, chars: usize) -> usize {
    s.char_indices().nth(chars).map_or(s.len(), |(i, _)| i)
}

impl Constraint<str> for StringConstraint {
    fn holds(&self, value: &str) -> bool {
        match self {
            Self::MaxLength(n) => value.chars().count() <= *n,
            Self::MinLength(n) => value.chars().count() >= *n,
            Self::Pattern(re) => re.is_match(value),
            Self::Includes { needle, position } => {
                value[byte_offset(value, *position)..].contains(needle.as_str())
            }
            Self::StartsWith { needle, position } => {
                value[byte_offset(value, *position)..].starts_with(needle.as_str())
            }
            Self::EndsWith { needle, end } => {
                let end = end.map_or(value.len(), |e| byte_offset(value, e));
                value[..end].ends_with(needle.as_str())
            }
            Self::Refine(r) => r.holds(value),
        }
    }
}

impl Constraint<String> for StringConstraint {
    fn holds(&self, value: &String) -> bool {
        Constraint::<str>::holds(self, value.as_str())
    }
}

impl fmt::Display for StringConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaxLength(n) => write!(f, "length <= {n}"),
            Self::MinLength(n) => write!(f, "length >= {n}"),
            Self::Pattern(re) => write!(f, "matches /{}/", re.as_str()),
            Self::Includes { needle, position: 0 } => write!(f, "includes {needle:?}"),
            Self::Includes { needle, position } => {
                write!(f, "includes {needle:?} from {position}")
            }
            Self::StartsWith { needle, position: 0 } => write!(f, "starts with {needle:?}"),
            Self::StartsWith { needle, position } => {
                write!(f, "starts with {needle:?} at {position}")
            }
            Self::EndsWith { needle, end: None } => write!(f, "ends with {needle:?}"),
            Self::EndsWith {
                needle,
                end: Some(end),
            } => write!(f, "ends with {needle:?} before {end}"),
            Self::Refine(r) => write!(f, "{r}"),
        }
    }
}

/// Constraint on a floating point number.
#[derive(Debug, Clone)]
pub enum NumberConstraint {
    Ge(f64),
    Gt(f64),
    Le(f64),
    Lt(f64),
    MultipleOf(f64),
    Integer,
    Finite,
    Refine(Refinement<f64>),
}

impl Constraint<f64> for NumberConstraint {
    fn holds(&self, value: &f64) -> bool {
        let v = *value;
        match self {
            Self::Ge(n) => v >= *n,
            Self::Gt(n) => v > *n,
            Self::Le(n) => v <= *n,
            Self::Lt(n) => v < *n,
            Self::MultipleOf(base) => v % base == 0.0,
            Self::Integer => v.is_finite() && v.fract() == 0.0,
            Self::Finite => v.is_finite(),
            Self::Refine(r) => r.holds(value),
        }
    }
}

impl fmt::Display for NumberConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ge(n) => write!(f, "value >= {n}"),
            Self::Gt(n) => write!(f, "value > {n}"),
            Self::Le(n) => write!(f, "value <= {n}"),
            Self::Lt(n) => write!(f, "value < {n}"),
            Self::MultipleOf(base) => write!(f, "multiple of {base}"),
            Self::Integer => f.write_str("integer"),
            Self::Finite => f.write_str("finite"),
            Self::Refine(r) => write!(f, "{r}"),
        }
    }
}

/// Constraint on an arbitrary-precision integer.
#[derive(Debug, Clone)]
pub enum BigIntConstraint {
    Ge(BigInt),
    Gt(BigInt),
    Le(BigInt),
    Lt(BigInt),
    MultipleOf(BigInt),
    Refine(Refinement<BigInt>),
}

impl Constraint<BigInt> for BigIntConstraint {
    fn holds(&self, value: &BigInt) -> bool {
        match self {
            Self::Ge(n) => value >= n,
            Self::Gt(n) => value > n,
            Self::Le(n) => value <= n,
            Self::Lt(n) => value < n,
            // A zero base divides nothing.
            Self::MultipleOf(base) => {
                *base != BigInt::from(0) && value % base == BigInt::from(0)
            }
            Self::Refine(r) => r.holds(value),
        }
    }
}

impl fmt::Display for BigIntConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ge(n) => write!(f, "value >= {n}"),
            Self::Gt(n) => write!(f, "value > {n}"),
            Self::Le(n) => write!(f, "value <= {n}"),
            Self::Lt(n) => write!(f, "value < {n}"),
            Self::MultipleOf(base) => write!(f, "multiple of {base}"),
            Self::Refine(r) => write!(f, "{r}"),
        }
    }
}
