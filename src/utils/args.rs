//! Command argument parsing.
//!
//! Arguments are whitespace separated. IDs must parse as integers; anything
//! else is rejected before any state is touched.

use thiserror::Error;

/// Why a command's arguments were rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgError {
    #[error("missing <{0}>")]
    Missing(&'static str),

    #[error("<{name}> must be an integer, got `{value}`")]
    NotAnInteger { name: &'static str, value: String },
}

/// Positional arguments following a command.
#[derive(Debug, Clone)]
pub struct CommandArgs<'a> {
    parts: Vec<&'a str>,
}

impl<'a> CommandArgs<'a> {
    /// Split the argument string of a command.
    pub fn parse(args: &'a str) -> Self {
        Self {
            parts: args.split_whitespace().collect(),
        }
    }

    /// Required string argument.
    pub fn string(&self, index: usize, name: &'static str) -> Result<&'a str, ArgError> {
        self.parts.get(index).copied().ok_or(ArgError::Missing(name))
    }

    /// Required user ID.
    pub fn user_id(&self, index: usize) -> Result<u64, ArgError> {
        let raw = self.string(index, "user_id")?;
        raw.parse().map_err(|_| ArgError::NotAnInteger {
            name: "user_id",
            value: raw.to_string(),
        })
    }

    /// Required chat ID (chat IDs are negative for groups and channels).
    pub fn chat_id(&self, index: usize) -> Result<i64, ArgError> {
        let raw = self.string(index, "chat_id")?;
        raw.parse().map_err(|_| ArgError::NotAnInteger {
            name: "chat_id",
            value: raw.to_string(),
        })
    }

    /// Optional chat ID: absent is fine, malformed is not.
    pub fn optional_chat_id(&self, index: usize) -> Result<Option<i64>, ArgError> {
        if index >= self.parts.len() {
            return Ok(None);
        }
        self.chat_id(index).map(Some)
    }

    /// Everything from `index` on, joined by single spaces.
    pub fn rest(&self, index: usize) -> Option<String> {
        let rest = self.parts.get(index..)?;
        if rest.is_empty() {
            None
        } else {
            Some(rest.join(" "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id() {
        let args = CommandArgs::parse("  42   spam bot ");
        assert_eq!(args.user_id(0), Ok(42));
        assert_eq!(args.rest(1).as_deref(), Some("spam bot"));
        assert_eq!(args.rest(3), None);
    }

    #[test]
    fn test_missing_argument() {
        let args = CommandArgs::parse("");
        assert_eq!(args.user_id(0), Err(ArgError::Missing("user_id")));
        assert_eq!(args.string(1, "link"), Err(ArgError::Missing("link")));
    }

    #[test]
    fn test_non_integer_ids() {
        let args = CommandArgs::parse("@someone -100x");
        assert_eq!(
            args.user_id(0),
            Err(ArgError::NotAnInteger {
                name: "user_id",
                value: "@someone".to_string()
            })
        );
        assert!(matches!(args.chat_id(1), Err(ArgError::NotAnInteger { .. })));
    }

    #[test]
    fn test_negative_user_id_rejected() {
        let args = CommandArgs::parse("-5");
        assert!(args.user_id(0).is_err());
        assert_eq!(args.chat_id(0), Ok(-5));
    }

    #[test]
    fn test_optional_chat_id() {
        assert_eq!(CommandArgs::parse("").optional_chat_id(0), Ok(None));
        assert_eq!(CommandArgs::parse("-1001").optional_chat_id(0), Ok(Some(-1001)));
        assert!(CommandArgs::parse("abc").optional_chat_id(0).is_err());
    }
}
