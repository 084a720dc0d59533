//! Cursor over a byte slice with the ECMA-335 compressed encodings.
//!
//! Signature blobs pack integers and type tokens with the variable-length encodings described
//! in ECMA-335 II.23.2. [`Parser`] tracks a position and decodes them with bounds checking.

use crate::{
    file::io::{read_le_at, CilIO},
    metadata::token::Token,
    Error::OutOfBounds,
    Result,
};

/// A generic binary data parser for signature blobs.
///
/// # Examples
///
/// ```rust
/// use pinvokegen::Parser;
///
/// let data = [0x03, 0x80, 0x80];
/// let mut parser = Parser::new(&data);
///
/// assert_eq!(parser.read_compressed_uint()?, 3);
/// assert_eq!(parser.read_compressed_uint()?, 0x80);
/// assert!(!parser.has_more_data());
/// # Ok::<(), pinvokegen::Error>(())
/// ```
pub struct Parser<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser positioned at the start of `data`
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser { data, position: 0 }
    }

    /// Total length of the underlying buffer
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the underlying buffer is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` while unread bytes remain
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        self.position < self.data.len()
    }

    /// Current position
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// Skip one byte
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] at the end of the data.
    pub fn advance(&mut self) -> Result<()> {
        if self.position >= self.data.len() {
            return Err(OutOfBounds);
        }

        self.position += 1;
        Ok(())
    }

    /// Look at the next byte without consuming it
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] at the end of the data.
    pub fn peek_byte(&self) -> Result<u8> {
        self.data.get(self.position).copied().ok_or(OutOfBounds)
    }

    /// Read a little-endian `T` and advance
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if not enough data remains.
    pub fn read_le<T: CilIO>(&mut self) -> Result<T> {
        read_le_at::<T>(self.data, &mut self.position)
    }

    /// Read a compressed unsigned integer (ECMA-335 II.23.2)
    ///
    /// # Errors
    /// Returns an error for an invalid lead byte or truncated data.
    pub fn read_compressed_uint(&mut self) -> Result<u32> {
        let first_byte = self.read_le::<u8>()?;

        // 0xxxxxxx
        if (first_byte & 0x80) == 0 {
            return Ok(u32::from(first_byte));
        }

        // 10xxxxxx xxxxxxxx
        if (first_byte & 0xC0) == 0x80 {
            let second_byte = self.read_le::<u8>()?;
            return Ok(((u32::from(first_byte) & 0x3F) << 8) | u32::from(second_byte));
        }

        // 110xxxxx xxxxxxxx xxxxxxxx xxxxxxxx
        if (first_byte & 0xE0) == 0xC0 {
            let b1 = u32::from(self.read_le::<u8>()?);
            let b2 = u32::from(self.read_le::<u8>()?);
            let b3 = u32::from(self.read_le::<u8>()?);
            return Ok(((u32::from(first_byte) & 0x1F) << 24) | (b1 << 16) | (b2 << 8) | b3);
        }

        Err(malformed_error!("Invalid compressed uint - {}", first_byte))
    }

    /// Read a `TypeDefOrRefOrSpecEncoded` token (ECMA-335 II.23.2.8)
    ///
    /// # Errors
    /// Returns an error if the tag bits do not name TypeDef, TypeRef or TypeSpec.
    pub fn read_compressed_token(&mut self) -> Result<Token> {
        let compressed_token = self.read_compressed_uint()?;
        let table: u32 = match compressed_token & 0x3 {
            0x0 => 0x0200_0000,
            0x1 => 0x0100_0000,
            0x2 => 0x1B00_0000,
            _ => {
                return Err(malformed_error!(
                    "Invalid compressed token - {}",
                    compressed_token
                ))
            }
        };

        Ok(Token::new(table | (compressed_token >> 2)))
    }
}
