use regex::Regex;

use super::constraint_violation;
use crate::constraint::{Constraints, Refinement, StringConstraint};
use crate::descriptor::{Kind, Type};
use crate::error::ParseError;
use crate::value::Value;

/// Descriptor for string values.
///
/// Parsing is the identity conversion, subject to the constraint list.
///
/// # Examples
///
/// ```
/// use chat_schema_core::{string, Type, Value};
///
/// let handle = string().min(3).max(16).starts_with("@");
/// assert!(handle.test(&Value::from("@ferris")));
/// assert!(!handle.test(&Value::from("ferris")));
/// assert_eq!(handle.parse("@crab").unwrap(), "@crab");
/// assert!(handle.parse("@").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StringType {
    max_length: Option<usize>,
    min_length: Option<usize>,
    pattern: Option<Regex>,
    constraints: Constraints<StringConstraint>,
}

impl StringType {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    pub fn min_length(&self) -> Option<usize> {
        self.min_length
    }

    pub fn pattern(&self) -> Option<&Regex> {
        self.pattern.as_ref()
    }

    pub fn constraints(&self) -> &Constraints<StringConstraint> {
        &self.constraints
    }

    fn extend(&self, constraint: StringConstraint) -> Self {
        Self {
            constraints: self.constraints.with(constraint),
            ..self.clone()
        }
    }

    /// At most `length` characters.
    pub fn max(&self, length: usize) -> Self {
        let mut next = self.extend(StringConstraint::MaxLength(length));
        next.max_length = Some(length);
        next
    }

    /// At least `length` characters.
    pub fn min(&self, length: usize) -> Self {
        let mut next = self.extend(StringConstraint::MinLength(length));
        next.min_length = Some(length);
        next
    }

    /// Exactly `length` characters.
    pub fn length(&self, length: usize) -> Self {
        self.min(length).max(length)
    }

    /// Must match `pattern` somewhere in the string (anchor it for a full match).
    pub fn regex(&self, pattern: Regex) -> Self {
        let mut next = self.extend(StringConstraint::Pattern(pattern.clone()));
        next.pattern = Some(pattern);
        next
    }

    pub fn includes(&self, needle: impl Into<String>) -> Self {
        self.includes_from(needle, 0)
    }

    /// `needle` must occur at or after character `position`.
    pub fn includes_from(&self, needle: impl Into<String>, position: usize) -> Self {
        self.extend(StringConstraint::Includes {
            needle: needle.into(),
            position,
        })
    }

    pub fn starts_with(&self, needle: impl Into<String>) -> Self {
        self.starts_with_at(needle, 0)
    }

    /// `needle` must occur exactly at character `position`.
    pub fn starts_with_at(&self, needle: impl Into<String>, position: usize) -> Self {
        self.extend(StringConstraint::StartsWith {
            needle: needle.into(),
            position,
        })
    }

    pub fn ends_with(&self, needle: impl Into<String>) -> Self {
        self.extend(StringConstraint::EndsWith {
            needle: needle.into(),
            end: None,
        })
    }

    /// `needle` must end right before character `end`.
    pub fn ends_with_before(&self, needle: impl Into<String>, end: usize) -> Self {
        self.extend(StringConstraint::EndsWith {
            needle: needle.into(),
            end: Some(end),
        })
    }

    /// Appends a labelled custom predicate.
    pub fn refine<F>(&self, label: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.extend(StringConstraint::Refine(Refinement::new(label, predicate)))
    }
}

impl Type for StringType {
    type Output = String;

    fn kind(&self) -> Kind {
        Kind::String
    }

    fn test(&self, value: &Value) -> bool {
        value.as_str().is_some_and(|s| self.constraints.check(s))
    }

    fn parse(&self, text: &str) -> Result<String, ParseError> {
        match self.constraints.violation(text) {
            Some(c) => Err(constraint_violation(Kind::String, text, c)),
            None => Ok(text.to_string()),
        }
    }

    fn check(&self, value: &String) -> bool {
        self.constraints.check(value)
    }
}
