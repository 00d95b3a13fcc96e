//! Whitespace token stream used by component constructors
//!
//! Constructors consume their positional fields in order. Trailing optional
//! fields are read with the `optional_*` methods, which return `None` once
//! the stream is exhausted but still reject a present, malformed value.

use crate::foundation::math::Vec3;
use std::iter::Peekable;
use std::str::{FromStr, SplitWhitespace};
use thiserror::Error;

/// Token-level parse failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The stream ended before a required field
    #[error("missing field '{field}'")]
    Missing {
        /// Field name
        field: &'static str,
    },

    /// A field was present but could not be parsed
    #[error("invalid value '{value}' for field '{field}'")]
    Invalid {
        /// Field name
        field: &'static str,
        /// Offending token
        value: String,
    },
}

/// Cursor over the whitespace-separated fields of one line
#[derive(Debug, Clone)]
pub struct TokenStream<'a> {
    tokens: Peekable<SplitWhitespace<'a>>,
}

impl<'a> TokenStream<'a> {
    /// Tokenize `text`
    pub fn new(text: &'a str) -> Self {
        Self {
            tokens: text.split_whitespace().peekable(),
        }
    }

    /// Whether every token was consumed
    pub fn is_empty(&mut self) -> bool {
        self.tokens.peek().is_none()
    }

    /// Next token as a string
    pub fn next_str(&mut self, field: &'static str) -> Result<&'a str, TokenError> {
        self.tokens.next().ok_or(TokenError::Missing { field })
    }

    /// Next token parsed as `T`
    pub fn next_parsed<T: FromStr>(&mut self, field: &'static str) -> Result<T, TokenError> {
        let token = self.next_str(field)?;
        parse_token(token, field)
    }

    /// Next token as `f32`
    pub fn next_f32(&mut self, field: &'static str) -> Result<f32, TokenError> {
        self.next_parsed(field)
    }

    /// Next three tokens as a vector
    pub fn next_vec3(&mut self, field: &'static str) -> Result<Vec3, TokenError> {
        Ok(Vec3::new(
            self.next_f32(field)?,
            self.next_f32(field)?,
            self.next_f32(field)?,
        ))
    }

    /// Next token if any
    pub fn optional_str(&mut self) -> Option<&'a str> {
        self.tokens.next()
    }

    /// Next token parsed as `T`, `None` at end of stream
    pub fn optional_parsed<T: FromStr>(&mut self, field: &'static str) -> Result<Option<T>, TokenError> {
        match self.tokens.next() {
            Some(token) => parse_token(token, field).map(Some),
            None => Ok(None),
        }
    }

    /// Next token as `f32`, `None` at end of stream
    pub fn optional_f32(&mut self, field: &'static str) -> Result<Option<f32>, TokenError> {
        self.optional_parsed(field)
    }

    /// Next token as a flag (`1`/`0`/`true`/`false`), `None` at end of stream
    pub fn optional_bool(&mut self, field: &'static str) -> Result<Option<bool>, TokenError> {
        match self.tokens.next() {
            Some("1" | "true" | "TRUE" | "True") => Ok(Some(true)),
            Some("0" | "false" | "FALSE" | "False") => Ok(Some(false)),
            Some(other) => Err(TokenError::Invalid {
                field,
                value: other.to_string(),
            }),
            None => Ok(None),
        }
    }

    /// Next three tokens as a vector, `None` at end of stream
    ///
    /// A partially present vector is an error.
    pub fn optional_vec3(&mut self, field: &'static str) -> Result<Option<Vec3>, TokenError> {
        if self.is_empty() {
            return Ok(None);
        }
        self.next_vec3(field).map(Some)
    }

    /// Remaining tokens joined by single spaces
    pub fn rest(&mut self) -> String {
        self.tokens.by_ref().collect::<Vec<_>>().join(" ")
    }
}

fn parse_token<T: FromStr>(token: &str, field: &'static str) -> Result<T, TokenError> {
    token.parse().map_err(|_| TokenError::Invalid {
        field,
        value: token.to_string(),
    })
}
