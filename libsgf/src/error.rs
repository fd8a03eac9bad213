//! Error types for SGF parsing.

use std::fmt;
use thiserror::Error;

/// Result type for SGF lexing operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Characters quoted on each side of an error offset.
const CONTEXT_CHARS: usize = 6;

/// Parse context carrying filename for error reporting.
#[derive(Clone, Debug, Default)]
pub struct ParseContext {
    pub filename: Option<String>,
}

impl ParseContext {
    /// Create a new parse context.
    pub fn new(filename: Option<&str>) -> Self {
        Self {
            filename: filename.map(String::from),
        }
    }

    /// Describe where in `input` an error at byte `offset` was detected.
    pub fn locate(&self, input: &str, offset: usize) -> Location {
        Location {
            offset,
            context: quote_context(input, offset),
            filename: self.filename.clone(),
        }
    }
}

/// Up to six characters either side of `offset`, joined by a bar.
fn quote_context(input: &str, offset: usize) -> String {
    let mut offset = offset.min(input.len());
    while !input.is_char_boundary(offset) {
        offset -= 1;
    }
    let (head, tail) = input.split_at(offset);
    let start = head
        .char_indices()
        .rev()
        .nth(CONTEXT_CHARS - 1)
        .map_or(0, |(i, _)| i);
    let after: String = tail.chars().take(CONTEXT_CHARS).collect();
    format!("{}|{}", &head[start..], after)
}

/// Where a lexical error was detected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    /// Byte offset into the newline-stripped document.
    pub offset: usize,
    /// Text around the offset, `before|after`.
    pub context: String,
    pub filename: Option<String>,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.filename {
            Some(name) => write!(
                f,
                ", position {} of <{}>, {:?}",
                self.offset, name, self.context
            ),
            None => write!(f, ", position {}, {:?}", self.offset, self.context),
        }
    }
}

/// Error type for SGF lexing.
///
/// Every variant is fatal for the document: the lexer stops at the first one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// `(` not immediately followed by `;`.
    #[error("semicolon expected{0}")]
    SemicolonExpected(Location),

    /// `;` not followed by a property name.
    #[error("property expected{0}")]
    PropertyExpected(Location),

    /// Property name not followed by `[`.
    #[error("left bracket '[' expected{0}")]
    LeftBracketExpected(Location),

    /// Property value not closed by `]`.
    #[error("right bracket ']' expected{0}")]
    RightBracketExpected(Location),

    /// Something other than a value, property, node, or parenthesis after `]`.
    #[error("property, node, or parenthesis expected, found {found}{location}")]
    UnexpectedAfterValue { found: String, location: Location },
}

impl ParseError {
    /// Where the error was detected.
    pub fn location(&self) -> &Location {
        match self {
            ParseError::SemicolonExpected(loc)
            | ParseError::PropertyExpected(loc)
            | ParseError::LeftBracketExpected(loc)
            | ParseError::RightBracketExpected(loc) => loc,
            ParseError::UnexpectedAfterValue { location, .. } => location,
        }
    }

    /// Byte offset at which the error was detected.
    pub fn offset(&self) -> usize {
        self.location().offset
    }

    /// Diagnostic snippet around the offset.
    pub fn context(&self) -> &str {
        &self.location().context
    }
}

/// Error returned when indexing into the main line.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupError {
    /// Main-line positions count from 1.
    #[error("node index must be at least 1")]
    ZeroIndex,

    #[error("node index {index} is past the end of the main line ({len} nodes)")]
    OutOfRange { index: usize, len: usize },
}
