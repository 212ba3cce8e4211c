//! Row type and its fixed-width binary codec.
//!
//! A row serializes to exactly [`ROW_SIZE`] bytes: the id as a
//! little-endian u32, then the username and email zero-padded to their
//! fixed capacities. The final byte of each text field is always a NUL
//! terminator, so deserialization is bounded regardless of the source
//! content. Length validation happens in the input layer before a row
//! is ever handed to the codec.

use crate::types::{
    EMAIL_MAX_LEN, EMAIL_OFFSET, ID_OFFSET, ID_SIZE, ROW_SIZE, USERNAME_MAX_LEN, USERNAME_OFFSET,
};
use std::fmt;

/// One logical record: integer primary key plus two fixed-width text columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: u32,
    pub username: String,
    pub email: String,
}

impl Row {
    /// Create a new row
    pub fn new(id: u32, username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            email: email.into(),
        }
    }

    /// Serialize this row into a destination slot of at least [`ROW_SIZE`] bytes
    pub fn serialize(&self, dest: &mut [u8]) {
        let dest = &mut dest[..ROW_SIZE];
        dest.fill(0);
        dest[ID_OFFSET..ID_OFFSET + ID_SIZE].copy_from_slice(&self.id.to_le_bytes());

        let username = self.username.as_bytes();
        let len = username.len().min(USERNAME_MAX_LEN);
        dest[USERNAME_OFFSET..USERNAME_OFFSET + len].copy_from_slice(&username[..len]);

        let email = self.email.as_bytes();
        let len = email.len().min(EMAIL_MAX_LEN);
        dest[EMAIL_OFFSET..EMAIL_OFFSET + len].copy_from_slice(&email[..len]);
    }

    /// Reconstruct a row from a serialized slot of at least [`ROW_SIZE`] bytes
    pub fn deserialize(src: &[u8]) -> Self {
        let src = &src[..ROW_SIZE];
        let id = u32::from_le_bytes([
            src[ID_OFFSET],
            src[ID_OFFSET + 1],
            src[ID_OFFSET + 2],
            src[ID_OFFSET + 3],
        ]);
        let username = read_text(&src[USERNAME_OFFSET..EMAIL_OFFSET]);
        let email = read_text(&src[EMAIL_OFFSET..]);
        Self {
            id,
            username,
            email,
        }
    }
}

/// Read a NUL-terminated text field, bounded at the field's capacity
fn read_text(field: &[u8]) -> String {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    String::from_utf8_lossy(&field[..end]).into_owned()
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.id, self.username, self.email)
    }
}
