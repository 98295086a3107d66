//! Typed chat commands.

use std::fmt;
use std::sync::Arc;

use chat_schema_core::{CallError, Descriptor, Value, check_args};
use tracing::debug;

use crate::chat::{ChatKind, Message};
use crate::error::{CommandError, Result};

/// What a command body returns: an optional reply, or the call failure.
pub type Reply = std::result::Result<Option<String>, CallError>;

type Handler = dyn Fn(&Message, &[Value]) -> Reply + Send + Sync;

/// A named command with accepted chat kinds, typed parameters and a body.
///
/// Builder methods never modify the receiver; each returns an updated copy.
///
/// A body replies with `Ok(Some(text))`, stays silent with `Ok(None)` and
/// fails with a [`CallError`], typically one raised by a function descriptor
/// it calls.
///
/// # Examples
///
/// ```
/// use chat_schema_command::{ChatKind, Command, Message};
/// use chat_schema_core::{registry, Descriptor};
///
/// let repeat = Command::new("repeat")
///     .args([
///         Descriptor::from(registry::string()),
///         Descriptor::from(registry::number().int().positive()),
///     ])
///     .implement(|_, args| {
///         let word = args[0].as_str().unwrap_or_default();
///         let times = args[1].as_number().unwrap_or_default() as usize;
///         Ok(Some(word.repeat(times)))
///     });
///
/// let msg = Message::new(ChatKind::Normal, "ferris", "/repeat ha 3");
/// assert_eq!(repeat.invoke(&msg, &["ha", "3"]).unwrap().as_deref(), Some("hahaha"));
/// assert!(repeat.invoke(&msg, &["ha", "-1"]).is_err());
/// ```
#[derive(Clone)]
pub struct Command {
    name: String,
    chat_kinds: Arc<[ChatKind]>,
    params: Arc<[Descriptor]>,
    handler: Arc<Handler>,
}

impl Command {
    /// Creates a command that accepts [`ChatKind::Normal`] chats, takes no
    /// parameters and replies with nothing.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            chat_kinds: Arc::from([ChatKind::Normal]),
            params: Arc::from([]),
            handler: Arc::new(|_: &Message, _: &[Value]| Ok::<_, CallError>(None)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[Descriptor] {
        &self.params
    }

    pub fn chat_kinds_accepted(&self) -> &[ChatKind] {
        &self.chat_kinds
    }

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

    pub fn chat_kinds(&self, kinds: impl IntoIterator<Item = ChatKind>) -> Self {
        Self {
            chat_kinds: kinds.into_iter().collect(),
            ..self.clone()
        }
    }

    pub fn implement<F>(&self, body: F) -> Self
    where
        F: Fn(&Message, &[Value]) -> Reply + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(body),
            ..self.clone()
        }
    }

    /// Returns `true` if a message from a chat of kind `chat` may run this
    /// command.
    pub fn accepts(&self, chat: ChatKind) -> bool {
        self.chat_kinds.iter().any(|kind| kind.matches(chat))
    }

    /// Runs the body with already typed arguments.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::ChatKindMismatch`] if the message's chat kind
    /// is not accepted, and [`CommandError::Contract`] for the first
    /// argument that fails its parameter descriptor. The body is not run in
    /// either case. A [`CallError`] raised by the body is also reported as
    /// [`CommandError::Contract`].
    pub fn execute(&self, msg: &Message, args: &[Value]) -> Result<Option<String>> {
        self.ensure_chat(msg)?;
        self.run(msg, args)
    }

    /// Parses text tokens with the parameter descriptors, then runs the body.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::ChatKindMismatch`] for an unaccepted chat,
    /// [`CommandError::ArityMismatch`] if the token count differs from the
    /// parameter count, and [`CommandError::InvalidArgument`] for the first
    /// token that does not parse.
    pub fn invoke(&self, msg: &Message, tokens: &[&str]) -> Result<Option<String>> {
        self.ensure_chat(msg)?;
        if tokens.len() != self.params.len() {
            return Err(CommandError::ArityMismatch {
                command: self.name.clone(),
                expected: self.params.len(),
                found: tokens.len(),
            });
        }

        let args = self
            .params
            .iter()
            .zip(tokens)
            .enumerate()
            .map(|(index, (param, token))| {
                param.parse(token).map_err(|source| {
                    debug!(command = %self.name, index, %source, "Argument did not parse");
                    CommandError::InvalidArgument {
                        command: self.name.clone(),
                        index,
                        source,
                    }
                })
            })
            .collect::<Result<Vec<_>>>()?;

        self.run(msg, &args)
    }

    fn ensure_chat(&self, msg: &Message) -> Result<()> {
        if self.accepts(msg.chat) {
            return Ok(());
        }
        debug!(command = %self.name, chat = %msg.chat, "Chat kind not accepted");
        let expected = self
            .chat_kinds
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" | ");
        Err(CommandError::ChatKindMismatch {
            command: self.name.clone(),
            expected,
            found: msg.chat,
        })
    }

    fn run(&self, msg: &Message, args: &[Value]) -> Result<Option<String>> {
        check_args(&self.params, args)
            .and_then(|()| (self.handler)(msg, args))
            .map_err(|source| {
                debug!(command = %self.name, %source, "Command contract failed");
                CommandError::Contract {
                    command: self.name.clone(),
                    source,
                }
            })
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("chat_kinds", &self.chat_kinds)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}
