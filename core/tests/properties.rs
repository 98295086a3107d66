use chat_schema_core::*;
use regex::Regex;

fn sample_values() -> Vec<Value> {
    vec![
        Value::Undefined,
        Value::Null,
        Value::from(true),
        Value::from(false),
        Value::from(-3),
        Value::from(0),
        Value::from(5),
        Value::from(6),
        Value::from(2.5),
        Value::Number(f64::INFINITY),
        Value::from(BigInt::from(-4)),
        Value::from(BigInt::from(10)),
        Value::from(""),
        Value::from("abc"),
        Value::from("hello world"),
        Value::from(function().callable()),
    ]
}

// ---------------------------------------------------------------------------
// Immutability and monotonicity
// ---------------------------------------------------------------------------

#[test]
fn refinement_never_mutates_the_receiver() {
    let base = number().ge(0.0);
    let before: Vec<bool> = sample_values().iter().map(|v| base.test(v)).collect();

    let _ = base.lt(3.0).int().multiple_of(2.0);

    let after: Vec<bool> = sample_values().iter().map(|v| base.test(v)).collect();
    assert_eq!(before, after);
    assert_eq!(base.constraints().len(), 1);
    assert!(number().constraints().is_empty());
}

#[test]
fn number_refinements_only_narrow() {
    let d1 = number().ge(-5.0);
    let refinements = [
        d1.le(5.0),
        d1.positive(),
        d1.int(),
        d1.finite(),
        d1.multiple_of(3.0),
        d1.refine("even", |n| n % 2.0 == 0.0),
    ];
    for d2 in &refinements {
        for v in sample_values() {
            if d2.test(&v) {
                assert!(d1.test(&v), "{v} accepted by refinement but not by parent");
            }
        }
    }
    // Not conversely: the parent accepts something every refinement rejects.
    assert!(d1.test(&Value::from(2.5)));
    assert!(!d1.int().test(&Value::from(2.5)));
}

#[test]
fn string_refinements_only_narrow() {
    let d1 = string().max(20);
    let refinements = [
        d1.min(1),
        d1.length(3),
        d1.regex(Regex::new("^[a-z]+$").unwrap()),
        d1.includes("o"),
        d1.starts_with("he"),
        d1.ends_with("c"),
    ];
    for d2 in &refinements {
        for v in sample_values() {
            if d2.test(&v) {
                assert!(d1.test(&v));
            }
        }
    }
}

#[test]
fn bigint_refinements_only_narrow() {
    let d1 = bigint();
    let d2 = d1.non_negative().multiple_of(5);
    for v in sample_values() {
        if d2.test(&v) {
            assert!(d1.test(&v));
        }
    }
    assert!(d2.test(&Value::from(BigInt::from(10))));
    assert!(!d2.test(&Value::from(BigInt::from(-4))));
}

// ---------------------------------------------------------------------------
// Parse contract
// ---------------------------------------------------------------------------

#[test]
fn string_parse_round_trips() {
    let s = string().min(1).max(32);
    for text in ["a", "hello world", "λ calculus"] {
        let parsed = s.parse(text).unwrap();
        assert!(s.test(&Value::from(parsed.clone())));
        assert_eq!(parsed, text);
    }
}

#[test]
fn numeric_boundaries() {
    assert!(number().ge(5.0).test(&Value::from(5)));
    assert!(!number().gt(5.0).test(&Value::from(5)));
    assert!(!number().le(5.0).test(&Value::from(6)));
}

#[test]
fn parse_error_taxonomy() {
    assert!(matches!(
        number().parse("five"),
        Err(ParseError::InvalidLiteral {
            kind: Kind::Number,
            ..
        })
    ));
    assert!(matches!(
        number().gt(5.0).parse("5"),
        Err(ParseError::ConstraintViolation {
            kind: Kind::Number,
            ..
        })
    ));
    assert!(matches!(
        boolean().parse("yes"),
        Err(ParseError::InvalidLiteral { .. })
    ));
    assert!(matches!(
        function().parse("x"),
        Err(ParseError::Unsupported {
            kind: Kind::Function,
            ..
        })
    ));
    assert!(matches!(
        never().parse("x"),
        Err(ParseError::Unsupported {
            kind: Kind::Never,
            ..
        })
    ));
}

#[test]
fn safe_parse_mirrors_parse() {
    for text in ["1", "-2.5", "x", "", "true"] {
        let direct = number().parse(text);
        let safe = number().safe_parse(text);
        assert_eq!(safe.clone().into_result(), direct);
        assert_eq!(safe.is_success(), direct.is_ok());
    }
}

#[test]
fn any_type_priority() {
    assert_eq!(any().parse("true").unwrap(), Value::Bool(true));
    assert_eq!(any().parse("").unwrap(), Value::Null);
    assert_eq!(any().parse("2.5").unwrap(), Value::Number(2.5));
    assert_eq!(any().parse("7").unwrap(), Value::BigInt(BigInt::from(7)));
    assert_eq!(any().parse("seven").unwrap(), Value::from("seven"));
}

#[test]
fn never_and_void() {
    for v in sample_values() {
        assert!(!never().test(&v));
    }
    assert_eq!(void().parse("").unwrap(), Value::Undefined);
    assert!(matches!(
        void().parse("x"),
        Err(ParseError::InvalidLiteral {
            kind: Kind::Void,
            ..
        })
    ));
}

// ---------------------------------------------------------------------------
// Function contracts
// ---------------------------------------------------------------------------

#[test]
fn function_contract_end_to_end() {
    let f = function()
        .args([number(), number()])
        .returns(number())
        .implement(|args| {
            let sum: f64 = args.iter().filter_map(Value::as_number).sum();
            Value::Number(sum)
        });

    assert_eq!(
        f.execute(&[Value::from(3), Value::from(5)]).unwrap(),
        Value::from(8)
    );
    let err = f.execute(&[Value::from(3), Value::from("x")]).unwrap_err();
    assert!(matches!(err, CallError::InvalidArgument { index: 1, .. }));
}

#[test]
fn function_test_checks_callable_and_arity() {
    let unary = function().args([string()]);
    let shout = unary.implement(|args| Value::from(args[0].to_string().to_uppercase()));

    assert!(unary.test(&Value::from(shout.callable())));
    assert!(!unary.test(&Value::from(function().callable())));
    assert!(!unary.test(&Value::from("not callable")));

    let named = unary.refine("unary", |c| c.arity() == 1);
    assert!(named.test(&Value::from(shout.callable())));
}

#[test]
fn descriptors_are_shareable_across_threads() {
    let even = number().int().multiple_of(2.0);
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let d = even.clone();
            std::thread::spawn(move || d.test(&Value::from(i)))
        })
        .collect();
    let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, vec![true, false, true, false]);
}
