//! Metadata tokens.
//!
//! A token packs a table id into its high byte and a 1-based row index into the low 24 bits.
//! `0x06000012` names row 18 of the `MethodDef` table.

use std::fmt;

/// A metadata token (ECMA-335 II.22).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Token(pub u32);

impl Token {
    /// Wrap a raw token value
    #[must_use]
    pub fn new(value: u32) -> Self {
        Token(value)
    }

    /// Build a token from a table id and a 1-based row
    #[must_use]
    pub fn from_parts(table: u8, row: u32) -> Self {
        Token((u32::from(table) << 24) | (row & 0x00FF_FFFF))
    }

    /// The raw 32-bit value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// The table id stored in the high byte
    #[must_use]
    pub fn table(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// The 1-based row index, `0` for a null reference
    #[must_use]
    pub fn row(&self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// Returns `true` if the token does not reference any row
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.row() == 0
    }
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(value)
    }
}

impl From<Token> for u32 {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token(0x{:08x}, table: 0x{:02x}, row: {})",
            self.0,
            self.table(),
            self.row()
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}
