//! Process-wide default descriptors, the entry points of every refinement
//! chain.
//!
//! Each function returns a shared descriptor with an empty constraint list.
//! Refining it never alters the singleton:
//!
//! ```
//! use chat_schema_core::{number, Type, Value};
//!
//! let small = number().lt(10.0);
//! assert!(!small.test(&Value::from(11)));
//! assert!(number().test(&Value::from(11)));
//! ```

use std::sync::LazyLock;

use crate::function::FunctionType;
use crate::scalar::{
    AnyType, BigIntType, BooleanType, EmptyKind, EmptyType, NeverType, NumberType, StringType,
};

static STRING: LazyLock<StringType> = LazyLock::new(StringType::new);
static NUMBER: LazyLock<NumberType> = LazyLock::new(NumberType::new);
static BIGINT: LazyLock<BigIntType> = LazyLock::new(BigIntType::new);
static BOOLEAN: LazyLock<BooleanType> = LazyLock::new(BooleanType::new);
static NULL: LazyLock<EmptyType> = LazyLock::new(|| EmptyType::new(EmptyKind::Null));
static UNDEFINED: LazyLock<EmptyType> = LazyLock::new(|| EmptyType::new(EmptyKind::Undefined));
static VOID: LazyLock<EmptyType> = LazyLock::new(|| EmptyType::new(EmptyKind::Void));
static ANY: LazyLock<AnyType> = LazyLock::new(AnyType::new);
static NEVER: LazyLock<NeverType> = LazyLock::new(NeverType::new);
static FUNCTION: LazyLock<FunctionType> = LazyLock::new(FunctionType::new);

pub fn string() -> &'static StringType {
    &STRING
}

pub fn number() -> &'static NumberType {
    &NUMBER
}

pub fn bigint() -> &'static BigIntType {
    &BIGINT
}

pub fn boolean() -> &'static BooleanType {
    &BOOLEAN
}

pub fn null() -> &'static EmptyType {
    &NULL
}

pub fn undefined() -> &'static EmptyType {
    &UNDEFINED
}

pub fn void() -> &'static EmptyType {
    &VOID
}

pub fn any() -> &'static AnyType {
    &ANY
}

pub fn never() -> &'static NeverType {
    &NEVER
}

/// Arity 0, returns void, executor does nothing.
pub fn function() -> &'static FunctionType {
    &FUNCTION
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{Kind, Type};

    #[test]
    fn test_singletons_have_empty_constraints() {
        assert!(string().constraints().is_empty());
        assert!(number().constraints().is_empty());
        assert!(bigint().constraints().is_empty());
        assert!(boolean().constraints().is_empty());
        assert!(null().constraints().is_empty());
        assert!(any().constraints().is_empty());
        assert_eq!(function().arity(), 0);
    }

    #[test]
    fn test_singletons_report_their_kind() {
        let kinds = [
            string().kind(),
            number().kind(),
            bigint().kind(),
            boolean().kind(),
            null().kind(),
            undefined().kind(),
            void().kind(),
            any().kind(),
            never().kind(),
            function().kind(),
        ];
        assert_eq!(
            kinds,
            [
                Kind::String,
                Kind::Number,
                Kind::BigInt,
                Kind::Boolean,
                Kind::Null,
                Kind::Undefined,
                Kind::Void,
                Kind::Any,
                Kind::Never,
                Kind::Function,
            ]
        );
    }

    #[test]
    fn test_same_instance_every_call() {
        assert!(std::ptr::eq(string(), string()));
        assert!(std::ptr::eq(function(), function()));
    }
}
