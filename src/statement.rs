//! Statement parsing and execution.
//!
//! Input lines are either meta commands (a leading `.`) handled by the
//! shell, or statements prepared here into a [`Statement`] and run
//! against a [`Table`].

use crate::error::Result;
use crate::row::Row;
use crate::table::Table;
use crate::types::{EMAIL_MAX_LEN, USERNAME_MAX_LEN};
use std::io::Write;
use thiserror::Error;

/// A parsed, executable statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Insert(Row),
    Select,
}

/// Why an input line could not be prepared into a [`Statement`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PrepareError {
    #[error("Syntax error. Could not parse statement")]
    Syntax,
    #[error("Field is too long")]
    FieldTooLong,
    #[error("Id cannot be negative")]
    NegativeId,
    #[error("Unrecognized command at the start of {0}")]
    Unrecognized(String),
}

/// A shell-level command, recognized by its leading `.`
///
/// The dump commands print human-readable text by default; a `json`
/// argument switches them to a JSON rendering of the same data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaCommand {
    Exit,
    Constants { json: bool },
    Btree { json: bool },
}

/// Why a `.`-prefixed line is not a [`MetaCommand`]
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unrecognized meta command: {0}")]
pub struct UnrecognizedMeta(pub String);

impl MetaCommand {
    pub fn parse(input: &str) -> std::result::Result<Self, UnrecognizedMeta> {
        let input = input.trim();
        let mut tokens = input.split_whitespace();
        match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(".exit"), None, None) => Ok(Self::Exit),
            (Some(".constants"), None, None) => Ok(Self::Constants { json: false }),
            (Some(".constants"), Some("json"), None) => Ok(Self::Constants { json: true }),
            (Some(".btree"), None, None) => Ok(Self::Btree { json: false }),
            (Some(".btree"), Some("json"), None) => Ok(Self::Btree { json: true }),
            _ => Err(UnrecognizedMeta(input.to_string())),
        }
    }
}

impl Statement {
    /// Parse an input line into a statement
    pub fn prepare(input: &str) -> std::result::Result<Self, PrepareError> {
        let input = input.trim();
        let mut tokens = input.split_whitespace();

        match tokens.next() {
            Some("insert") => {
                let (id, username, email) = match (
                    tokens.next(),
                    tokens.next(),
                    tokens.next(),
                    tokens.next(),
                ) {
                    (Some(id), Some(username), Some(email), None) => (id, username, email),
                    _ => return Err(PrepareError::Syntax),
                };

                let id: i64 = id.parse().map_err(|_| PrepareError::Syntax)?;
                if id < 0 {
                    return Err(PrepareError::NegativeId);
                }
                // Keys are signed 32-bit at the input boundary.
                if id > i64::from(i32::MAX) {
                    return Err(PrepareError::Syntax);
                }
                let id = id as u32;

                if username.len() > USERNAME_MAX_LEN || email.len() > EMAIL_MAX_LEN {
                    return Err(PrepareError::FieldTooLong);
                }

                Ok(Self::Insert(Row::new(id, username, email)))
            }
            Some("select") => Ok(Self::Select),
            _ => Err(PrepareError::Unrecognized(input.to_string())),
        }
    }

    /// Run the statement against a table, writing any output rows
    pub fn execute(&self, table: &mut Table, out: &mut impl Write) -> Result<()> {
        match self {
            Self::Insert(row) => table.insert(row),
            Self::Select => {
                for row in table.rows()? {
                    writeln!(out, "{}", row?)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_prepare_insert() {
        let stmt = Statement::prepare("insert 1 alice alice@example.com").unwrap();
        assert_eq!(
            stmt,
            Statement::Insert(Row::new(1, "alice", "alice@example.com"))
        );
    }

    #[test]
    fn test_prepare_select() {
        assert_eq!(Statement::prepare("select").unwrap(), Statement::Select);
    }

    #[test]
    fn test_prepare_syntax_errors() {
        for input in ["insert", "insert 1 alice", "insert 1 a b c", "insert x a b"] {
            assert_eq!(Statement::prepare(input), Err(PrepareError::Syntax));
        }
    }

    #[test]
    fn test_prepare_id_range() {
        let input = format!("insert {} alice a@b.com", i32::MAX);
        assert_eq!(
            Statement::prepare(&input).unwrap(),
            Statement::Insert(Row::new(i32::MAX as u32, "alice", "a@b.com"))
        );

        // Past the signed 32-bit range the id is rejected, even though
        // it would fit the unsigned on-disk key.
        let input = format!("insert {} alice a@b.com", i32::MAX as i64 + 1);
        assert_eq!(Statement::prepare(&input), Err(PrepareError::Syntax));
        let input = format!("insert {} alice a@b.com", u32::MAX);
        assert_eq!(Statement::prepare(&input), Err(PrepareError::Syntax));
    }

    #[test]
    fn test_prepare_negative_id() {
        assert_eq!(
            Statement::prepare("insert -1 alice alice@example.com"),
            Err(PrepareError::NegativeId)
        );
    }

    #[test]
    fn test_prepare_field_too_long() {
        let long_name = "a".repeat(USERNAME_MAX_LEN + 1);
        let input = format!("insert 1 {long_name} a@b.com");
        assert_eq!(Statement::prepare(&input), Err(PrepareError::FieldTooLong));

        let long_email = "a".repeat(EMAIL_MAX_LEN + 1);
        let input = format!("insert 1 alice {long_email}");
        assert_eq!(Statement::prepare(&input), Err(PrepareError::FieldTooLong));
    }

    #[test]
    fn test_prepare_max_length_fields_accepted() {
        let name = "a".repeat(USERNAME_MAX_LEN);
        let email = "b".repeat(EMAIL_MAX_LEN);
        let input = format!("insert 1 {name} {email}");
        assert!(Statement::prepare(&input).is_ok());
    }

    #[test]
    fn test_prepare_unrecognized() {
        assert_eq!(
            Statement::prepare("delete 1"),
            Err(PrepareError::Unrecognized("delete 1".to_string()))
        );
    }

    #[test]
    fn test_meta_parse() {
        assert_eq!(MetaCommand::parse(".exit"), Ok(MetaCommand::Exit));
        assert_eq!(
            MetaCommand::parse(".constants"),
            Ok(MetaCommand::Constants { json: false })
        );
        assert_eq!(
            MetaCommand::parse(".btree"),
            Ok(MetaCommand::Btree { json: false })
        );
        assert_eq!(
            MetaCommand::parse(".quit"),
            Err(UnrecognizedMeta(".quit".to_string()))
        );
    }

    #[test]
    fn test_meta_parse_json_dumps() {
        assert_eq!(
            MetaCommand::parse(".constants json"),
            Ok(MetaCommand::Constants { json: true })
        );
        assert_eq!(
            MetaCommand::parse(".btree json"),
            Ok(MetaCommand::Btree { json: true })
        );
        // Only `json` is a recognized dump argument.
        assert_eq!(
            MetaCommand::parse(".btree xml"),
            Err(UnrecognizedMeta(".btree xml".to_string()))
        );
    }

    #[test]
    fn test_execute_insert_then_select() -> Result<()> {
        let dir = tempdir().unwrap();
        let mut table = Table::open(&dir.path().join("test.db"))?;

        let mut out = Vec::new();
        Statement::prepare("insert 1 alice alice@example.com")
            .unwrap()
            .execute(&mut table, &mut out)?;
        Statement::Select.execute(&mut table, &mut out)?;

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "[1, alice, alice@example.com]\n"
        );
        Ok(())
    }
}
