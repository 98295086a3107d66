use std::path::{Path, PathBuf};

use chat_schema_command::{ChatKind, Message, RuntimeConfig};
use chat_schema_core::{Descriptor, Kind, SafeParse, Type, Value, registry};
use clap::{Args, Parser, Subcommand};
use regex::Regex;
use tracing::debug;

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Text,
}

/// Descriptor kinds that can parse text from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum CliKind {
    String,
    Number,
    Bigint,
    Boolean,
    Null,
    Undefined,
    Void,
    Any,
    Never,
}

impl From<CliKind> for Kind {
    fn from(kind: CliKind) -> Self {
        match kind {
            CliKind::String => Self::String,
            CliKind::Number => Self::Number,
            CliKind::Bigint => Self::BigInt,
            CliKind::Boolean => Self::Boolean,
            CliKind::Null => Self::Null,
            CliKind::Undefined => Self::Undefined,
            CliKind::Void => Self::Void,
            CliKind::Any => Self::Any,
            CliKind::Never => Self::Never,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "chat-schema")]
#[command(about = "Parse text with type descriptors and dispatch typed chat commands")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse text with a refined descriptor and print the outcome.
    Parse(ParseArgs),
    /// Infer the kind of a piece of text, trying boolean, null, undefined,
    /// bigint, number and string in that order.
    Infer(InferArgs),
    /// Route a chat message through the built-in demo commands.
    Dispatch(DispatchArgs),
    /// Write the default runtime configuration as YAML.
    InitConfig(InitConfigArgs),
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Descriptor kind to parse with.
    kind: CliKind,
    /// Text to parse.
    #[arg(allow_hyphen_values = true)]
    text: String,
    /// Inclusive lower bound (minimum length for strings).
    #[arg(long, allow_hyphen_values = true)]
    min: Option<String>,
    /// Inclusive upper bound (maximum length for strings).
    #[arg(long, allow_hyphen_values = true)]
    max: Option<String>,
    /// Exclusive lower bound.
    #[arg(long, allow_hyphen_values = true)]
    gt: Option<String>,
    /// Exclusive upper bound.
    #[arg(long, allow_hyphen_values = true)]
    lt: Option<String>,
    /// Require an integral number.
    #[arg(long)]
    int: bool,
    /// Require a finite number.
    #[arg(long)]
    finite: bool,
    /// Require a multiple of this base.
    #[arg(long, allow_hyphen_values = true)]
    multiple_of: Option<String>,
    /// Require a match of this regular expression.
    #[arg(long)]
    regex: Option<String>,
    /// Require this prefix.
    #[arg(long)]
    starts_with: Option<String>,
    /// Require this suffix.
    #[arg(long)]
    ends_with: Option<String>,
    /// Require this substring.
    #[arg(long)]
    includes: Option<String>,
    /// Output format.
    #[arg(long, default_value = "text")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct InferArgs {
    /// Text to classify.
    #[arg(allow_hyphen_values = true)]
    text: String,
    /// Output format.
    #[arg(long, default_value = "text")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct DispatchArgs {
    /// Path to a runtime configuration YAML file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Chat kind the message was posted as.
    #[arg(long, default_value = "normal")]
    chat: ChatKind,
    /// Author name passed to the command.
    #[arg(long, default_value = "cli")]
    author: String,
    /// Message content, including the command prefix.
    #[arg(allow_hyphen_values = true)]
    message: String,
}

#[derive(Debug, Args)]
struct InitConfigArgs {
    /// Destination file.
    path: PathBuf,
    /// Overwrite an existing file.
    #[arg(long)]
    force: bool,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Parse(args) => run_parse(args),
        Command::Infer(args) => run_infer(args),
        Command::Dispatch(args) => run_dispatch(args),
        Command::InitConfig(args) => run_init_config(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` takes precedence over
/// `level`.
fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

fn run_parse(args: ParseArgs) -> Result<(), String> {
    init_logging(&RuntimeConfig::default().log_level);
    let descriptor = build_descriptor(&args)?;
    debug!(kind = %descriptor.kind(), text = %args.text, "Parsing text");
    print_outcome(descriptor.safe_parse(&args.text), args.format)
}

fn run_infer(args: InferArgs) -> Result<(), String> {
    init_logging(&RuntimeConfig::default().log_level);
    print_outcome(registry::any().safe_parse(&args.text), args.format)
}

fn run_dispatch(args: DispatchArgs) -> Result<(), String> {
    let config = match &args.config {
        Some(path) => RuntimeConfig::load(path)
            .map_err(|err| format!("Failed to load '{}': {err}", path.display()))?,
        None => RuntimeConfig::default(),
    };
    init_logging(&config.log_level);

    let commands = demo::commands(&config).map_err(|err| err.to_string())?;
    let msg = Message::new(args.chat, args.author, args.message);
    match commands.dispatch(&msg).map_err(|err| err.to_string())? {
        Some(reply) => println!("{reply}"),
        None => debug!("Command produced no reply"),
    }
    Ok(())
}

fn run_init_config(args: InitConfigArgs) -> Result<(), String> {
    if args.path.exists() && !args.force {
        return Err(format!(
            "'{}' already exists (use --force to overwrite)",
            args.path.display()
        ));
    }
    create_parent_dir(&args.path)?;
    RuntimeConfig::default()
        .save(&args.path)
        .map_err(|err| format!("Failed to write '{}': {err}", args.path.display()))?;
    println!("Wrote default configuration to '{}'.", args.path.display());
    Ok(())
}

fn create_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|err| {
                format!(
                    "Failed to create output directory '{}': {err}",
                    parent.display()
                )
            })?;
        }
    }
    Ok(())
}

/// Prints a parse outcome and turns a failure into the process error.
fn print_outcome(outcome: SafeParse<Value>, format: CliOutputFormat) -> Result<(), String> {
    match format {
        CliOutputFormat::Json => {
            let raw = serde_json::to_string(&outcome)
                .map_err(|err| format!("Failed to serialize outcome: {err}"))?;
            println!("{raw}");
        }
        CliOutputFormat::Text => {
            if let SafeParse::Success(value) = &outcome {
                println!("{}\t{value}", value.kind());
            }
        }
    }
    outcome
        .into_result()
        .map(|_| ())
        .map_err(|err| err.to_string())
}

/// Builds the descriptor named by `args.kind` with every refinement flag
/// applied. Bound values are themselves parsed with descriptors.
fn build_descriptor(args: &ParseArgs) -> Result<Descriptor, String> {
    let kind = Kind::from(args.kind);
    match args.kind {
        CliKind::String => {
            reject_flags(kind, &[
                ("--gt", args.gt.is_some()),
                ("--lt", args.lt.is_some()),
                ("--int", args.int),
                ("--finite", args.finite),
                ("--multiple-of", args.multiple_of.is_some()),
            ])?;
            let length = registry::number().int().non_negative().finite();
            let mut s = registry::string().clone();
            if let Some(min) = &args.min {
                s = s.min(flag_value(&length, "--min", min)? as usize);
            }
            if let Some(max) = &args.max {
                s = s.max(flag_value(&length, "--max", max)? as usize);
            }
            if let Some(pattern) = &args.regex {
                let re = Regex::new(pattern)
                    .map_err(|err| format!("--regex `{pattern}` is invalid: {err}"))?;
                s = s.regex(re);
            }
            if let Some(needle) = &args.starts_with {
                s = s.starts_with(needle.as_str());
            }
            if let Some(needle) = &args.ends_with {
                s = s.ends_with(needle.as_str());
            }
            if let Some(needle) = &args.includes {
                s = s.includes(needle.as_str());
            }
            Ok(s.into())
        }
        CliKind::Number => {
            reject_string_flags(kind, args)?;
            let bound = registry::number();
            let mut n = registry::number().clone();
            if let Some(min) = &args.min {
                n = n.min(flag_value(bound, "--min", min)?);
            }
            if let Some(max) = &args.max {
                n = n.max(flag_value(bound, "--max", max)?);
            }
            if let Some(gt) = &args.gt {
                n = n.gt(flag_value(bound, "--gt", gt)?);
            }
            if let Some(lt) = &args.lt {
                n = n.lt(flag_value(bound, "--lt", lt)?);
            }
            if let Some(base) = &args.multiple_of {
                n = n.multiple_of(flag_value(bound, "--multiple-of", base)?);
            }
            if args.int {
                n = n.int();
            }
            if args.finite {
                n = n.finite();
            }
            Ok(n.into())
        }
        CliKind::Bigint => {
            reject_string_flags(kind, args)?;
            reject_flags(kind, &[("--int", args.int), ("--finite", args.finite)])?;
            let bound = registry::bigint();
            let mut b = registry::bigint().clone();
            if let Some(min) = &args.min {
                b = b.min(flag_value(bound, "--min", min)?);
            }
            if let Some(max) = &args.max {
                b = b.max(flag_value(bound, "--max", max)?);
            }
            if let Some(gt) = &args.gt {
                b = b.gt(flag_value(bound, "--gt", gt)?);
            }
            if let Some(lt) = &args.lt {
                b = b.lt(flag_value(bound, "--lt", lt)?);
            }
            if let Some(base) = &args.multiple_of {
                b = b.multiple_of(flag_value(bound, "--multiple-of", base)?);
            }
            Ok(b.into())
        }
        other => {
            reject_string_flags(kind, args)?;
            reject_flags(kind, &[
                ("--min", args.min.is_some()),
                ("--max", args.max.is_some()),
                ("--gt", args.gt.is_some()),
                ("--lt", args.lt.is_some()),
                ("--int", args.int),
                ("--finite", args.finite),
                ("--multiple-of", args.multiple_of.is_some()),
            ])?;
            Ok(match other {
                CliKind::Boolean => registry::boolean().into(),
                CliKind::Null => registry::null().into(),
                CliKind::Undefined => registry::undefined().into(),
                CliKind::Void => registry::void().into(),
                CliKind::Any => registry::any().into(),
                _ => registry::never().into(),
            })
        }
    }
}

fn reject_string_flags(kind: Kind, args: &ParseArgs) -> Result<(), String> {
    reject_flags(kind, &[
        ("--regex", args.regex.is_some()),
        ("--starts-with", args.starts_with.is_some()),
        ("--ends-with", args.ends_with.is_some()),
        ("--includes", args.includes.is_some()),
    ])
}

fn reject_flags(kind: Kind, flags: &[(&str, bool)]) -> Result<(), String> {
    match flags.iter().find(|(_, set)| *set) {
        Some((flag, _)) => Err(format!("{flag} does not apply to {kind}")),
        None => Ok(()),
    }
}

fn flag_value<T: Type>(descriptor: &T, flag: &str, raw: &str) -> Result<T::Output, String> {
    descriptor
        .parse(raw)
        .map_err(|err| format!("{flag}: {err}"))
}

mod demo {
    //! Commands available to `chat-schema dispatch`.

    use chat_schema_command::{ChatKind, Command, CommandSet, Result, RuntimeConfig};
    use chat_schema_core::{Value, registry};

    pub(crate) fn commands(config: &RuntimeConfig) -> Result<CommandSet> {
        let adder = registry::function()
            .args([registry::number(), registry::number()])
            .returns(registry::number().finite())
            .return_policy(config.return_policy)
            .implement(|args| {
                let a = args[0].as_number().unwrap_or_default();
                let b = args[1].as_number().unwrap_or_default();
                Value::Number(a + b)
            });

        let mut set = CommandSet::from_config(config);
        set.register(Command::new("ping").implement(|_, _| Ok(Some("pong".to_string()))))?;
        set.register(
            Command::new("hello")
                .chat_kinds([ChatKind::Normal, ChatKind::Reply])
                .implement(|msg, _| Ok(Some(format!("Hello, {}!", msg.author)))),
        )?;
        set.register(
            Command::new("add")
                .args([registry::number().finite(), registry::number().finite()])
                .implement(move |_, args| Ok(Some(adder.execute(args)?.to_string()))),
        )?;
        set.register(
            Command::new("echo")
                .args([registry::string().min(1)])
                .implement(|_, args| Ok(args[0].as_str().map(str::to_string))),
        )?;
        Ok(set)
    }

}
