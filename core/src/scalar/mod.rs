//! Scalar descriptors.
//!
//! One descriptor per scalar kind. Each refinement method follows the same
//! clone-then-extend pattern: clone the receiver, record the refinement in
//! the clone's metadata, append the equivalent constraint, return the clone.

mod any;
mod bigint;
mod boolean;
mod empty;
mod never;
mod number;
mod string;

use std::fmt::Display;

pub use any::AnyType;
pub use bigint::BigIntType;
pub use boolean::BooleanType;
pub use empty::{EmptyKind, EmptyType};
pub use never::NeverType;
pub use number::{Bound, NumberType};
pub use string::StringType;

use crate::descriptor::Kind;
use crate::error::ParseError;

fn invalid_literal(kind: Kind, input: &str) -> ParseError {
    ParseError::InvalidLiteral {
        kind,
        input: input.to_string(),
    }
}

fn constraint_violation(kind: Kind, input: &str, constraint: &impl Display) -> ParseError {
    ParseError::ConstraintViolation {
        kind,
        input: input.to_string(),
        constraint: constraint.to_string(),
    }
}
