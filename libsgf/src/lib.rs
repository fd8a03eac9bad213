//! SGF (Smart Game Format) parser implementation.
//!
//! SGF stores board-game records as a parenthesized tree of nodes. Each node
//! is a semicolon followed by properties such as `B[pd]` or `AB[aa][bb]`, and
//! nested parentheses hold alternative continuations (variations).
//!
//! # Parsing Pipeline
//!
//! The parser operates in two phases:
//!
//! 1. **Lexer**: Strips line breaks and scans the text into tokens with a
//!    character-level state machine, stopping at the first lexical error.
//!
//! 2. **Tree Builder**: Pulls tokens one at a time and assembles the header
//!    map and the node tree, tracking variations with a stack.
//!
//! Parsing never fails outright. A malformed document yields a [`Game`]
//! holding everything read before the error, plus the error itself.

mod encode;
mod error;
mod game;
mod lexer;
mod parser;
pub mod props;

pub use encode::to_sgf;
pub use error::{Location, LookupError, ParseContext, ParseError, Result};
pub use game::{Game, GameInfo, GameTree, MainLine, Node, NodeRef, PlayerInfo, Property};
pub use lexer::{Lexer, Token, TokenType};

use tracing::debug;

/// Parse an SGF document from a string.
///
/// # Example
///
/// ```
/// use libsgf::parse;
///
/// let game = parse("(;GM[1]KM[6.5];B[pd];W[dp])");
/// assert_eq!(game.info().get("KM"), Some("6.5"));
/// assert_eq!(game.node_count(), 2);
/// ```
pub fn parse(input: &str) -> Game {
    parse_with_filename(input, None)
}

/// Parse an SGF document from a string with a filename for error messages.
pub fn parse_with_filename(input: &str, filename: Option<&str>) -> Game {
    let ctx = ParseContext::new(filename);
    debug!(filename, bytes = input.len(), "parsing SGF document");

    let game = parser::build(Lexer::new(input, ctx));

    debug!(
        header = game.info().len(),
        nodes = game.tree().map_or(0, GameTree::len),
        errors = game.errors().len(),
        "parsed SGF document"
    );
    game
}

/// Tokenize an SGF document without building a tree.
pub fn lex(input: &str) -> Lexer {
    Lexer::new(input, ParseContext::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_filename_decorates_errors() {
        let game = parse_with_filename("(;GM[1];B[aa]", Some("broken.sgf"));
        assert_eq!(
            game.errors()[0].to_string(),
            "property, node, or parenthesis expected, found end of input, position 13 of <broken.sgf>, \";B[aa]|\""
        );
    }

    #[test]
    fn test_lex_reports_tokens() {
        let kinds: Vec<TokenType> = lex("(;A[b])").map(|t| t.unwrap().typ).collect();
        assert_eq!(kinds.first(), Some(&TokenType::LeftParen));
        assert_eq!(kinds.last(), Some(&TokenType::Eof));
    }

    #[test]
    fn test_parse_is_deterministic() {
        let text = "(;GM[1]PB[a];B[aa](;W[bb])(;W[cc];B[dd]))";
        assert_eq!(parse(text), parse(text));
    }
}
