use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chat_schema_command::{ChatKind, Command, CommandError, CommandSet, Message, RuntimeConfig};
use chat_schema_core::{
    BigInt, CallError, Descriptor, FunctionType, Kind, ReturnPolicy, Value, ValueKind, registry,
};

fn bot() -> CommandSet {
    let mut set = CommandSet::new();
    set.register(Command::new("ping").implement(|_, _| Ok(Some("pong".into()))))
        .unwrap();
    set.register(
        Command::new("ban")
            .args([
                Descriptor::from(registry::string().starts_with("@").min(2)),
                Descriptor::from(registry::number().int().positive().le(365.0)),
            ])
            .implement(|_, args| Ok(Some(format!("banned {} for {} day(s)", args[0], args[1])))),
    )
    .unwrap();
    set.register(
        Command::new("kick-log")
            .chat_kinds([ChatKind::Feed])
            .implement(|msg, _| Ok(Some(format!("feed event from {}", msg.author)))),
    )
    .unwrap();
    set.register(
        Command::new("id")
            .args([registry::bigint().non_negative()])
            .implement(|_, args| Ok(args[0].as_bigint().map(|id| format!("#{id}")))),
    )
    .unwrap();
    set
}

fn normal(content: &str) -> Message {
    Message::new(ChatKind::Normal, "mod", content)
}

#[test]
fn dispatch_parses_each_token_with_its_descriptor() {
    let set = bot();
    assert_eq!(
        set.dispatch(&normal("/ban @spam 7")).unwrap().as_deref(),
        Some("banned @spam for 7 day(s)")
    );
    assert_eq!(
        set.dispatch(&normal("/id 18446744073709551616")).unwrap().as_deref(),
        Some("#18446744073709551616")
    );
}

#[test]
fn dispatch_reports_first_bad_token() {
    let set = bot();
    for (content, bad_index) in [("/ban spam 7", 0), ("/ban @spam 0", 1), ("/ban @spam 1.5", 1)] {
        match set.dispatch(&normal(content)) {
            Err(CommandError::InvalidArgument { command, index, .. }) => {
                assert_eq!(command, "ban");
                assert_eq!(index, bad_index, "content {content:?}");
            }
            other => panic!("unexpected outcome for {content:?}: {other:?}"),
        }
    }
    assert!(matches!(
        set.dispatch(&normal("/ban @spam")),
        Err(CommandError::ArityMismatch {
            expected: 2,
            found: 1,
            ..
        })
    ));
}

#[test]
fn feed_commands_accept_every_feed_subtype() {
    let set = bot();
    for kind in ChatKind::ALL {
        let msg = Message::new(kind, "bot", "/kick-log");
        let outcome = set.dispatch(&msg);
        if kind.is_feed() {
            assert_eq!(
                outcome.unwrap().as_deref(),
                Some("feed event from bot"),
                "kind {kind}"
            );
        } else {
            assert!(
                matches!(
                    outcome,
                    Err(CommandError::ChatKindMismatch { found, .. }) if found == kind
                ),
                "kind {kind}"
            );
        }
    }
}

#[test]
fn execute_checks_typed_arguments() {
    let set = bot();
    let ban = set.get("ban").unwrap();
    let msg = normal("");
    assert!(
        ban.execute(&msg, &[Value::from("@troll"), Value::from(30)])
            .is_ok()
    );
    assert!(matches!(
        ban.execute(&msg, &[Value::from("@troll"), Value::from(BigInt::from(30))]),
        Err(CommandError::Contract {
            source: CallError::InvalidArgument {
                index: 1,
                expected: Kind::Number,
                found: ValueKind::BigInt,
                constraint: None,
            },
            ..
        })
    ));
}

#[test]
fn body_is_not_run_after_rejection() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let mut set = CommandSet::new();
    set.register(
        Command::new("count")
            .args([registry::number()])
            .implement(move |_, _| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(None)
            }),
    )
    .unwrap();

    assert!(set.dispatch(&normal("/count x")).is_err());
    assert!(set.dispatch(&normal("/count")).is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(set.dispatch(&normal("/count 1")).unwrap(), None);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

fn shouting_bot(config: &RuntimeConfig) -> CommandSet {
    let shout = FunctionType::new()
        .args([registry::string()])
        .returns(registry::string().max(5))
        .return_policy(config.return_policy)
        .implement(|args| Value::from(args[0].to_string().to_uppercase()));

    let mut set = CommandSet::from_config(config);
    set.register(
        Command::new("shout")
            .args([registry::string()])
            .implement(move |_, args| Ok(Some(shout.execute(args)?.to_string()))),
    )
    .unwrap();
    set
}

#[test]
fn command_bodies_can_call_function_descriptors() {
    let config = RuntimeConfig::from_yaml_str("return_policy: observe").unwrap();
    assert_eq!(config.return_policy, ReturnPolicy::Observe);

    // The result breaks the `max(5)` return descriptor; observe still delivers it.
    assert_eq!(
        shouting_bot(&config)
            .dispatch(&normal("/shout whisper"))
            .unwrap()
            .as_deref(),
        Some("WHISPER")
    );
}

#[test]
fn enforced_return_contract_fails_dispatch() {
    let set = shouting_bot(&RuntimeConfig::default());
    assert_eq!(
        set.dispatch(&normal("/shout hey")).unwrap().as_deref(),
        Some("HEY")
    );

    let err = set.dispatch(&normal("/shout whisper")).unwrap_err();
    match &err {
        CommandError::Contract {
            command,
            source: CallError::InvalidReturn { constraint, .. },
        } => {
            assert_eq!(command, "shout");
            assert_eq!(constraint.as_deref(), Some("length <= 5"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().ends_with("violates `length <= 5`"));
}

#[test]
fn config_file_drives_prefix() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("runtime.yml");
    RuntimeConfig {
        prefix: "::".into(),
        ..RuntimeConfig::default()
    }
    .save(&path)
    .unwrap();

    let config = RuntimeConfig::load(&path).unwrap();
    let mut set = CommandSet::from_config(&config);
    set.register(Command::new("ping").implement(|_, _| Ok(Some("pong".into()))))
        .unwrap();
    assert_eq!(
        set.dispatch(&normal("::ping")).unwrap().as_deref(),
        Some("pong")
    );
    assert_eq!(set.dispatch(&normal("/ping")).unwrap(), None);
}

#[test]
fn command_sets_are_shareable_across_threads() {
    let set = Arc::new(bot());
    let handles: Vec<_> = (1..=4)
        .map(|days| {
            let set = Arc::clone(&set);
            std::thread::spawn(move || {
                set.dispatch(&normal(&format!("/ban @user{days} {days}")))
                    .unwrap()
            })
        })
        .collect();
    for (days, handle) in (1..=4).zip(handles) {
        assert_eq!(
            handle.join().unwrap(),
            Some(format!("banned @user{days} for {days} day(s)"))
        );
    }
}
