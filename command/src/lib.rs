//! Typed chat commands built on `chat-schema-core` descriptors.
//!
//! A [`Command`] declares which chat kinds it accepts and a descriptor per
//! positional parameter. A [`CommandSet`] recognizes prefixed messages,
//! parses their whitespace-separated tokens with those descriptors and runs
//! the matching command.
//!
//! # Quick start
//!
//! ```
//! use chat_schema_command::{ChatKind, Command, CommandSet, Message, RuntimeConfig};
//! use chat_schema_core::registry;
//!
//! let config = RuntimeConfig::default();
//! let mut commands = CommandSet::from_config(&config);
//! commands
//!     .register(
//!         Command::new("double")
//!             .args([registry::number().finite()])
//!             .implement(|_, args| {
//!                 let n = args[0].as_number().unwrap_or_default();
//!                 Ok(Some((n * 2.0).to_string()))
//!             }),
//!     )
//!     .unwrap();
//!
//! let msg = Message::new(ChatKind::Normal, "ferris", "/double 21");
//! assert_eq!(commands.dispatch(&msg).unwrap().as_deref(), Some("42"));
//!
//! let msg = Message::new(ChatKind::Normal, "ferris", "/double Infinity");
//! assert!(commands.dispatch(&msg).is_err());
//! ```

mod chat;
mod command;
mod config;
mod error;
mod set;

pub use chat::{ChatKind, Message};
pub use command::{Command, Reply};
pub use config::RuntimeConfig;
pub use error::{CommandError, Result};
pub use set::{CommandSet, DEFAULT_PREFIX};
