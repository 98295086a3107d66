//! Function descriptors: argument/return contracts for callables.
//!
//! A [`FunctionType`] carries a positional parameter list, a return
//! descriptor and an executor. [`FunctionType::implement`] wraps a raw
//! closure into an executor that checks every argument before the call and
//! the result after it.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::constraint::{Constraints, Refinement};
use crate::descriptor::{Descriptor, Kind, Type};
use crate::error::{BoxError, CallError, ParseError};
use crate::scalar::{EmptyKind, EmptyType};
use crate::value::{Callable, Invoke, Value};

static MISSING: Value = Value::Undefined;

/// Checks `args` against `params` left to right, stopping at the first
/// mismatch. A missing argument is checked as [`Value::Undefined`]; extra
/// arguments are ignored.
///
/// # Errors
///
/// Returns [`CallError::InvalidArgument`] for the first rejected argument.
pub fn check_args(params: &[Descriptor], args: &[Value]) -> Result<(), CallError> {
    for (index, param) in params.iter().enumerate() {
        let arg = args.get(index).unwrap_or(&MISSING);
        if !param.test(arg) {
            debug!(index, expected = %param.kind(), found = %arg.kind(), "Argument rejected");
            return Err(CallError::InvalidArgument {
                index,
                expected: param.kind(),
                found: arg.kind(),
                constraint: param.violation(arg),
            });
        }
    }
    Ok(())
}

/// What an implemented function does when its result fails the return
/// descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnPolicy {
    /// Fail the call with [`CallError::InvalidReturn`].
    #[default]
    Enforce,
    /// Log a warning and deliver the value anyway.
    Observe,
}

/// Descriptor for callables.
///
/// # Examples
///
/// ```
/// use chat_schema_core::{function, number, CallError, Value};
///
/// let add = function()
///     .args([number(), number()])
///     .returns(number())
///     .implement(|args| {
///         let a = args[0].as_number().unwrap_or_default();
///         let b = args[1].as_number().unwrap_or_default();
///         Value::Number(a + b)
///     });
///
/// assert_eq!(add.execute(&[Value::from(3), Value::from(5)]).unwrap(), Value::from(8));
/// assert!(matches!(
///     add.execute(&[Value::from(3), Value::from("x")]),
///     Err(CallError::InvalidArgument { index: 1, .. })
/// ));
/// ```
#[derive(Clone)]
pub struct FunctionType {
    params: Arc<[Descriptor]>,
    returns: Arc<Descriptor>,
    executor: Arc<Invoke>,
    return_policy: ReturnPolicy,
    constraints: Constraints<Refinement<Callable>>,
}

impl Default for FunctionType {
    fn default() -> Self {
        Self {
            params: Arc::from([]),
            returns: Arc::new(EmptyType::new(EmptyKind::Void).into()),
            executor: Arc::new(|_: &[Value]| Ok::<_, CallError>(Value::Undefined)),
            return_policy: ReturnPolicy::default(),
            constraints: Constraints::new(),
        }
    }
}

impl FunctionType {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn params(&self) -> &[Descriptor] {
        &self.params
    }

    pub fn return_type(&self) -> &Descriptor {
        &self.returns
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn constraints(&self) -> &Constraints<Refinement<Callable>> {
        &self.constraints
    }

    /// Replaces the parameter list; the arity becomes its length.
    pub fn args<I>(&self, params: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Descriptor>,
    {
        Self {
            params: params.into_iter().map(Into::into).collect(),
            ..self.clone()
        }
    }

    /// Replaces the return descriptor.
    pub fn returns(&self, descriptor: impl Into<Descriptor>) -> Self {
        Self {
            returns: Arc::new(descriptor.into()),
            ..self.clone()
        }
    }

    /// Sets how later [`implement`](Self::implement) calls treat a result
    /// that fails the return descriptor.
    pub fn return_policy(&self, policy: ReturnPolicy) -> Self {
        Self {
            return_policy: policy,
            ..self.clone()
        }
    }

    pub fn refine<F>(&self, label: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Callable) -> bool + Send + Sync + 'static,
    {
        Self {
            constraints: self.constraints.with(Refinement::new(label, predicate)),
            ..self.clone()
        }
    }

    /// Wraps an infallible body into a contract-checked executor.
    pub fn implement<F>(&self, body: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        self.try_implement(move |args| Ok::<_, CallError>(body(args)))
    }

    /// Wraps a fallible body into a contract-checked executor.
    ///
    /// The executor runs [`check_args`] and does not run `body` on a
    /// mismatch. The parameter list, return descriptor and
    /// policy are captured now; later `args`/`returns` calls do not affect
    /// this executor.
    pub fn try_implement<F, E>(&self, body: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        let params = Arc::clone(&self.params);
        let returns = Arc::clone(&self.returns);
        let policy = self.return_policy;

        let executor = move |args: &[Value]| -> Result<Value, CallError> {
            check_args(&params, args)?;
            let result = body(args).map_err(|err| CallError::Failed(err.into()))?;

            if !returns.test(&result) {
                match policy {
                    ReturnPolicy::Enforce => {
                        debug!(
                            expected = %returns.kind(),
                            found = %result.kind(),
                            "Return value rejected"
                        );
                        return Err(CallError::InvalidReturn {
                            expected: returns.kind(),
                            found: result.kind(),
                            constraint: returns.violation(&result),
                        });
                    }
                    ReturnPolicy::Observe => {
                        warn!(
                            expected = %returns.kind(),
                            found = %result.kind(),
                            "Return value violates descriptor"
                        );
                    }
                }
            }
            Ok(result)
        };

        Self {
            executor: Arc::new(executor),
            ..self.clone()
        }
    }

    /// Runs the current executor.
    pub fn execute(&self, args: &[Value]) -> Result<Value, CallError> {
        (self.executor)(args)
    }

    /// The current executor as a function value of this descriptor's arity.
    pub fn callable(&self) -> Callable {
        Callable::from_shared(self.arity(), Arc::clone(&self.executor))
    }
}

impl fmt::Debug for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionType")
            .field("params", &self.params)
            .field("returns", &self.returns)
            .field("return_policy", &self.return_policy)
            .field("constraints", &self.constraints)
            .finish_non_exhaustive()
    }
}

impl Type for FunctionType {
    type Output = Callable;

    fn kind(&self) -> Kind {
        Kind::Function
    }

    /// Accepts a function value whose arity equals the parameter count.
    fn test(&self, value: &Value) -> bool {
        value
            .as_function()
            .is_some_and(|f| f.arity() == self.arity() && self.check(f))
    }

    fn parse(&self, text: &str) -> Result<Callable, ParseError> {
        Err(ParseError::Unsupported {
            kind: Kind::Function,
            input: text.to_string(),
        })
    }

    fn check(&self, value: &Callable) -> bool {
        self.constraints.check(value)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::registry::{number, string};

    fn add() -> FunctionType {
        FunctionType::new()
            .args([number(), number()])
            .returns(number())
            .implement(|args| {
                let a = args[0].as_number().unwrap_or_default();
                let b = args[1].as_number().unwrap_or_default();
                Value::Number(a + b)
            })
    }

    #[test]
    fn test_default_is_void_noop() {
        let f = FunctionType::new();
        assert_eq!(f.arity(), 0);
        assert_eq!(f.return_type().kind(), Kind::Void);
        assert_eq!(f.execute(&[Value::from(1)]).unwrap(), Value::Undefined);
    }

    #[test]
    fn test_execute_checks_arguments_before_body() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let f = FunctionType::new()
            .args([number(), number()])
            .returns(number())
            .implement(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Value::from(0)
            });

        let err = f.execute(&[Value::from(3), Value::from("x")]).unwrap_err();
        assert!(matches!(
            err,
            CallError::InvalidArgument {
                index: 1,
                expected: Kind::Number,
                found: crate::ValueKind::String,
                constraint: None,
            }
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let err = f.execute(&[Value::from(3)]).unwrap_err();
        assert!(matches!(err, CallError::InvalidArgument { index: 1, .. }));

        assert!(f.execute(&[Value::from(1), Value::from(2)]).is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_add_end_to_end() {
        assert_eq!(
            add().execute(&[Value::from(3), Value::from(5)]).unwrap(),
            Value::from(8)
        );
    }

    #[test]
    fn test_return_policy() {
        let liar = FunctionType::new()
            .args([string()])
            .returns(number())
            .implement(|args| args[0].clone());
        assert!(matches!(
            liar.execute(&[Value::from("hi")]),
            Err(CallError::InvalidReturn {
                expected: Kind::Number,
                ..
            })
        ));

        let lenient = FunctionType::new()
            .args([string()])
            .returns(number())
            .return_policy(ReturnPolicy::Observe)
            .implement(|args| args[0].clone());
        assert_eq!(
            lenient.execute(&[Value::from("hi")]).unwrap(),
            Value::from("hi")
        );
    }

    #[test]
    fn test_contract_errors_name_the_constraint() {
        let shout = FunctionType::new()
            .args([string().min(1)])
            .returns(string().max(5))
            .implement(|args| Value::from(args[0].as_str().unwrap_or_default().to_uppercase()));

        let err = shout.execute(&[Value::from("whisper")]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid return value (expected string, got string): violates `length <= 5`"
        );

        let err = shout.execute(&[Value::from("")]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid argument at index 0 (expected string, got string): violates `length >= 1`"
        );
    }

    #[test]
    fn test_check_args_alone() {
        let params = [Descriptor::from(number().int()), string().into()];
        assert!(check_args(&params, &[Value::from(1), Value::from("a"), Value::Null]).is_ok());
        assert!(matches!(
            check_args(&params, &[Value::from(1.5)]),
            Err(CallError::InvalidArgument { index: 0, constraint: Some(_), .. })
        ));
        assert!(matches!(
            check_args(&params, &[Value::from(1)]),
            Err(CallError::InvalidArgument { index: 1, constraint: None, .. })
        ));
        assert!(check_args(&[], &[]).is_ok());
    }

    #[test]
    fn test_body_failure_is_surfaced() {
        let f = FunctionType::new()
            .args([number()])
            .returns(number())
            .try_implement(|args| {
                let n = args[0].as_number().unwrap_or_default();
                if n == 0.0 {
                    Err("division by zero")
                } else {
                    Ok(Value::from(1.0 / n))
                }
            });
        assert_eq!(f.execute(&[Value::from(4)]).unwrap(), Value::from(0.25));
        let err = f.execute(&[Value::from(0)]).unwrap_err();
        assert_eq!(err.to_string(), "function body failed: division by zero");
    }

    #[test]
    fn test_args_and_returns_keep_executor() {
        let f = add();
        let widened = f.args([number(), number(), number()]).returns(string());
        assert_eq!(widened.arity(), 3);
        assert_eq!(widened.return_type().kind(), Kind::String);
        // The executor still enforces the contract captured by `implement`.
        assert_eq!(
            widened
                .execute(&[Value::from(1), Value::from(2), Value::from("ignored")])
                .unwrap(),
            Value::from(3)
        );
        assert_eq!(f.arity(), 2);
    }

    #[test]
    fn test_test_matches_arity() {
        let binary = FunctionType::new().args([number(), number()]);
        assert!(binary.test(&Value::from(add().callable())));
        assert!(!binary.test(&Value::from(FunctionType::new().callable())));
        assert!(!binary.test(&Value::from("fn")));
        assert!(binary.parse("(a, b) => a + b").is_err());
    }

    #[test]
    fn test_higher_order_parameter() {
        let apply = FunctionType::new()
            .args([
                Descriptor::from(FunctionType::new().args([number(), number()])),
                number().into(),
            ])
            .returns(number())
            .try_implement(|args| {
                let f = args[0].as_function().ok_or("not a function")?;
                f.call(&[args[1].clone(), args[1].clone()]).map_err(BoxError::from)
            });
        let doubled = apply
            .execute(&[Value::from(add().callable()), Value::from(21)])
            .unwrap();
        assert_eq!(doubled, Value::from(42));
    }
}
