//! Runtime type descriptors.
//!
//! A descriptor describes one shape of data and can:
//!
//! - [`test`](Type::test) whether a runtime [`Value`] conforms to it,
//! - [`parse`](Type::parse) text into that shape (or
//!   [`safe_parse`](Type::safe_parse) it into a tagged outcome),
//! - build a stricter descriptor through chainable refinement methods.
//!
//! Descriptors are immutable: every refinement returns a new descriptor whose
//! constraint list is the receiver's list plus one entry.
//!
//! Entry points are the shared defaults in [`registry`]: [`string`],
//! [`number`], [`bigint`], [`boolean`], [`null`], [`undefined`], [`void`],
//! [`any`], [`never`] and [`function`].
//!
//! # Example
//!
//! ```
//! use chat_schema_core::*;
//!
//! let age = number().int().non_negative().lt(150.0);
//! assert_eq!(age.parse("42").unwrap(), 42.0);
//! assert!(age.safe_parse("-1").error().is_some());
//!
//! let greet = function()
//!     .args([string().min(1)])
//!     .returns(string())
//!     .implement(|args| Value::from(format!("Hello, {}!", args[0])));
//! assert_eq!(
//!     greet.execute(&[Value::from("ferris")]).unwrap(),
//!     Value::from("Hello, ferris!")
//! );
//! assert!(greet.execute(&[Value::from("")]).is_err());
//! ```

mod constraint;
mod descriptor;
mod error;
mod function;
pub mod registry;
mod scalar;
mod value;

pub use constraint::{
    BigIntConstraint, Constraint, Constraints, NumberConstraint, Refinement, StringConstraint,
};
pub use descriptor::{Descriptor, Kind, SafeParse, Type};
pub use error::{BoxError, CallError, ParseError};
pub use function::{check_args, FunctionType, ReturnPolicy};
pub use num_bigint::BigInt;
pub use registry::{
    any, bigint, boolean, function, never, null, number, string, undefined, void,
};
pub use scalar::{
    AnyType, BigIntType, BooleanType, Bound, EmptyKind, EmptyType, NeverType, NumberType,
    StringType,
};
pub use value::{Callable, Invoke, Value, ValueKind};
