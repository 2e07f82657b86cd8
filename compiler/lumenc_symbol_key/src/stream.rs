//! The token stream a symbol key is made of, with its writer and reader.
//!
//! The stream is an ordered sequence of primitive tokens; the order in
//! which fields are written is part of the compatibility surface of every
//! codec, so readers consume tokens in exactly the order the writer
//! produced them.

use lumenc_table::{GlobalID, Table};
use serde::{Deserialize, Serialize};

use crate::{set::Candidates, KeyError, KeyKind};

/// A single token of a symbol key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Token {
    /// A string value.
    Str(String),

    /// A boolean value.
    Bool(bool),

    /// Opens a nested identity; the tokens of the nested symbol's codec
    /// follow immediately after.
    Tag(KeyKind),

    /// The explicit "no symbol" sentinel written in place of a nested
    /// identity.
    None,
}

/// Appends tokens to a symbol key under construction.
#[derive(Debug, Default)]
pub struct Writer {
    tokens: Vec<Token>,
}

impl Writer {
    /// Appends a string token.
    pub fn write_string(&mut self, value: &str) {
        self.tokens.push(Token::Str(value.to_owned()));
    }

    /// Appends a boolean token.
    pub fn write_bool(&mut self, value: bool) {
        self.tokens.push(Token::Bool(value));
    }

    /// Appends the full identity of the given symbol, or the
    /// [`Token::None`] sentinel when there is no symbol.
    ///
    /// Dispatches to the codec of the symbol's kind, which recursively
    /// writes the whole containment chain.
    ///
    /// # Errors
    ///
    /// - [`KeyError::DanglingSymbol`]: the symbol has no components in the
    ///   given table.
    /// - [`KeyError::UnsupportedKind`]: no codec exists for the symbol's
    ///   kind.
    pub fn write_symbol_key(
        &mut self,
        table: &Table,
        id: Option<GlobalID>,
    ) -> Result<(), KeyError> {
        let Some(id) = id else {
            self.tokens.push(Token::None);
            return Ok(());
        };

        let kind = table.kind_of(id).ok_or(KeyError::DanglingSymbol(id))?;
        let key_kind = KeyKind::try_from(kind)?;

        self.tokens.push(Token::Tag(key_kind));
        key_kind.codec().encode(table, id, self)
    }

    /// Consumes the writer, yielding the accumulated tokens.
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> { self.tokens }
}

/// Reads the tokens of a symbol key back, in writing order.
#[derive(Debug)]
pub struct Reader<'a> {
    tokens: &'a [Token],
    position: usize,
}

impl<'a> Reader<'a> {
    /// Creates a reader positioned at the start of the given tokens.
    #[must_use]
    pub const fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, position: 0 }
    }

    /// Reads the next token as a string.
    ///
    /// # Errors
    ///
    /// - [`KeyError::UnexpectedEnd`]: the stream is exhausted.
    /// - [`KeyError::ExpectedString`]: the next token is not a string.
    pub fn read_string(&mut self) -> Result<&'a str, KeyError> {
        let position = self.position;

        match self.next()? {
            Token::Str(value) => Ok(value),
            _ => Err(KeyError::ExpectedString(position)),
        }
    }

    /// Reads the next token as a boolean.
    ///
    /// # Errors
    ///
    /// - [`KeyError::UnexpectedEnd`]: the stream is exhausted.
    /// - [`KeyError::ExpectedBool`]: the next token is not a boolean.
    pub fn read_bool(&mut self) -> Result<bool, KeyError> {
        let position = self.position;

        match self.next()? {
            Token::Bool(value) => Ok(*value),
            _ => Err(KeyError::ExpectedBool(position)),
        }
    }

    /// Reads a nested identity and accumulates every symbol it plausibly
    /// resolves to into `candidates`.
    ///
    /// The [`Token::None`] sentinel is consumed into an empty candidate
    /// set; otherwise the tag token selects the codec that reads the rest
    /// of the nested identity.
    ///
    /// # Errors
    ///
    /// - [`KeyError::UnexpectedEnd`]: the stream is exhausted.
    /// - [`KeyError::ExpectedKey`]: the next token opens neither a nested
    ///   identity nor the sentinel.
    /// - Any error of the dispatched codec.
    pub fn read_symbol_key(
        &mut self,
        table: &Table,
        candidates: &mut Candidates,
    ) -> Result<(), KeyError> {
        let position = self.position;

        match self.next()? {
            Token::None => Ok(()),
            Token::Tag(kind) => kind.codec().resolve(table, self, candidates),
            _ => Err(KeyError::ExpectedKey(position)),
        }
    }

    fn next(&mut self) -> Result<&'a Token, KeyError> {
        let token =
            self.tokens.get(self.position).ok_or(KeyError::UnexpectedEnd)?;
        self.position += 1;

        Ok(token)
    }
}
