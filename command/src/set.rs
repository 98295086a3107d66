//! Prefix-based routing of chat messages to commands.

use std::collections::BTreeMap;

use tracing::debug;

use crate::chat::Message;
use crate::command::Command;
use crate::config::RuntimeConfig;
use crate::error::{CommandError, Result};

/// Prefix that marks a message as a command unless configured otherwise.
pub const DEFAULT_PREFIX: &str = "/";

/// Registered commands, looked up by name.
///
/// # Examples
///
/// ```
/// use chat_schema_command::{ChatKind, Command, CommandSet, Message};
///
/// let mut set = CommandSet::new();
/// set.register(Command::new("ping").implement(|_, _| Ok(Some("pong".into()))))
///     .unwrap();
///
/// let msg = Message::new(ChatKind::Normal, "ferris", "/ping");
/// assert_eq!(set.dispatch(&msg).unwrap().as_deref(), Some("pong"));
///
/// let chatter = Message::new(ChatKind::Normal, "ferris", "ping");
/// assert_eq!(set.dispatch(&chatter).unwrap(), None);
/// ```
#[derive(Debug, Clone)]
pub struct CommandSet {
    prefix: String,
    commands: BTreeMap<String, Command>,
}

impl Default for CommandSet {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_PREFIX)
    }
}

impl CommandSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            commands: BTreeMap::new(),
        }
    }

    /// Creates an empty set using the configured prefix.
    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self::with_prefix(config.prefix.clone())
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    /// Registered command names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    /// Adds a command.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::DuplicateCommand`] if a command with the same
    /// name is already registered. The existing command is kept.
    pub fn register(&mut self, command: Command) -> Result<()> {
        if self.commands.contains_key(command.name()) {
            return Err(CommandError::DuplicateCommand(command.name().to_string()));
        }
        debug!(command = command.name(), "Registered command");
        self.commands.insert(command.name().to_string(), command);
        Ok(())
    }

    /// Routes a message to the command it names.
    ///
    /// Content without the prefix, or with nothing after it, is not a
    /// command and yields `Ok(None)`. Otherwise the content after the prefix
    /// is split on whitespace: the first token names the command and the
    /// rest become its arguments.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::UnknownCommand`] if no command has that name,
    /// or whatever [`Command::invoke`] returns.
    pub fn dispatch(&self, msg: &Message) -> Result<Option<String>> {
        let Some(rest) = msg.content.strip_prefix(self.prefix.as_str()) else {
            debug!(author = %msg.author, "Not a command");
            return Ok(None);
        };
        let mut tokens = rest.split_whitespace();
        let Some(name) = tokens.next() else {
            return Ok(None);
        };
        let command = self.commands.get(name).ok_or_else(|| {
            debug!(command = name, "Unknown command");
            CommandError::UnknownCommand(name.to_string())
        })?;
        let args: Vec<&str> = tokens.collect();
        debug!(
            command = name,
            author = %msg.author,
            chat = %msg.chat,
            args = args.len(),
            "Dispatching command"
        );
        command.invoke(msg, &args)
    }
}

#[cfg(test)]
mod tests {
    use chat_schema_core::registry;

    use super::*;
    use crate::chat::ChatKind;

    fn echo() -> Command {
        Command::new("echo")
            .args([registry::string()])
            .implement(|_, args| Ok(args[0].as_str().map(str::to_string)))
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut set = CommandSet::new();
        set.register(echo()).unwrap();
        let err = set.register(Command::new("echo")).unwrap_err();
        assert!(matches!(err, CommandError::DuplicateCommand(name) if name == "echo"));
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("echo").unwrap().params().len(), 1);
    }

    #[test]
    fn test_dispatch_ignores_plain_chatter() {
        let mut set = CommandSet::new();
        set.register(echo()).unwrap();
        for content in ["hello", "", "/", "/   ", " /echo hi"] {
            let msg = Message::new(ChatKind::Normal, "a", content);
            assert_eq!(set.dispatch(&msg).unwrap(), None, "content {content:?}");
        }
    }

    #[test]
    fn test_dispatch_routes_tokens() {
        let mut set = CommandSet::new();
        set.register(echo()).unwrap();
        let msg = Message::new(ChatKind::Normal, "a", "/echo   hi");
        assert_eq!(set.dispatch(&msg).unwrap().as_deref(), Some("hi"));

        let msg = Message::new(ChatKind::Normal, "a", "/missing 1");
        assert!(matches!(
            set.dispatch(&msg),
            Err(CommandError::UnknownCommand(name)) if name == "missing"
        ));
    }

    #[test]
    fn test_custom_prefix() {
        let config = RuntimeConfig {
            prefix: "!".into(),
            ..RuntimeConfig::default()
        };
        let mut set = CommandSet::from_config(&config);
        set.register(echo()).unwrap();
        assert_eq!(set.prefix(), "!");
        let bang = Message::new(ChatKind::Normal, "a", "!echo yo");
        assert_eq!(set.dispatch(&bang).unwrap().as_deref(), Some("yo"));
        let slash = Message::new(ChatKind::Normal, "a", "/echo yo");
        assert_eq!(set.dispatch(&slash).unwrap(), None);
    }

    #[test]
    fn test_names_sorted() {
        let mut set = CommandSet::new();
        set.register(Command::new("b")).unwrap();
        set.register(Command::new("a")).unwrap();
        assert_eq!(set.names().collect::<Vec<_>>(), ["a", "b"]);
    }
}
