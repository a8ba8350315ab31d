//! Shell command validation.

use crate::error::{Error, Result};

/// Longest command accepted.
pub const MAX_COMMAND_LEN: usize = 10_000;

/// Validates shell commands before they are handed to `sh -c`.
///
/// Release commands chain steps with `&&`, so shell features are allowed by
/// default; [`CommandValidator::strict`] rejects them for configurations that
/// should only ever run single programs.
#[derive(Debug, Clone, Copy)]
pub struct CommandValidator {
    allow_shell: bool,
}

impl Default for CommandValidator {
    fn default() -> Self {
        Self { allow_shell: true }
    }
}

impl CommandValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a validator that disallows shell features.
    pub fn strict() -> Self {
        Self { allow_shell: false }
    }

    /// Validates a command string before execution.
    ///
    /// # Errors
    ///
    /// Returns an error for empty or oversized commands, NUL bytes, embedded
    /// newlines, and (in strict mode) shell operators.
    pub fn validate(&self, command: &str) -> Result<()> {
        if command.trim().is_empty() {
            return Err(Error::CommandRejected("command cannot be empty".to_string()));
        }

        if command.len() > MAX_COMMAND_LEN {
            return Err(Error::CommandRejected(format!(
                "command is longer than {} bytes",
                MAX_COMMAND_LEN
            )));
        }

        if command.contains('\0') {
            return Err(Error::CommandRejected(
                "command contains a NUL byte".to_string(),
            ));
        }

        if command.contains('\n') || command.contains('\r') {
            return Err(Error::CommandRejected(format!(
                "command spans multiple lines: {}",
                command.escape_debug()
            )));
        }

        if !self.allow_shell
            && (command.contains(';')
                || command.contains("&&")
                || command.contains("||")
                || command.contains('|')
                || command.contains('`')
                || command.contains('$'))
        {
            return Err(Error::CommandRejected(format!(
                "command contains shell features: {}",
                command
            )));
        }

        Ok(())
    }
}
