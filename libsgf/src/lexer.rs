//! Tokenizer
//!
//! The lexer walks the document one character at a time and produces a flat
//! token stream:
//! - `LeftParen` / `RightParen`: game tree and variation boundaries
//! - `Semicolon`: node start
//! - `PropertyName`: uppercased alphabetic run
//! - `PropertyValue`: raw text between `[` and `]`
//! - `Eof`: clean end of input
//!
//! Lexical errors are yielded as `Err` items. Either `Eof` or an error is the
//! last item; the iterator is fused after that.
//!
//! Line breaks are removed from the whole document before scanning, so token
//! and error offsets index into the stripped text.

use std::iter::FusedIterator;

use crate::error::{Location, ParseContext, ParseError, Result};

/// Token type in the lexer output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `;`
    Semicolon,
    /// Property identifier, uppercased.
    PropertyName,
    /// Bracketed value, brackets removed.
    PropertyValue,
    /// End of input.
    Eof,
}

/// A single token in the token stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub typ: TokenType,
    /// Byte offset of the token text.
    pub offset: usize,
    pub text: String,
}

impl Token {
    fn new(typ: TokenType, offset: usize, text: impl Into<String>) -> Self {
        Self {
            typ,
            offset,
            text: text.into(),
        }
    }
}

/// What the lexer found missing when it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expected {
    Semicolon,
    Property,
    LeftBracket,
    RightBracket,
    AfterValue,
}

/// Lexer state: the next scanning step to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Begin,
    LeftParen,
    Semicolon,
    PropertyName,
    PropertyValue,
    RightParen,
    End,
    Reject(Expected),
    Done,
}

/// Pull-based SGF tokenizer.
#[derive(Debug, Clone)]
pub struct Lexer {
    input: String,
    ctx: ParseContext,
    pos: usize,
    state: State,
}

impl Lexer {
    /// Create a lexer over `input` with line breaks removed.
    pub fn new(input: &str, ctx: ParseContext) -> Self {
        Self {
            input: strip_newlines(input),
            ctx,
            pos: 0,
            state: State::Begin,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consume characters while `accept` holds and return where the run began.
    fn accept_run(&mut self, accept: impl Fn(char) -> bool) -> usize {
        let start = self.pos;
        while self.peek().is_some_and(&accept) {
            self.bump();
        }
        start
    }

    fn locate(&self) -> Location {
        self.ctx.locate(&self.input, self.pos)
    }

    /// Run one scanning step. Steps that only skip input return `None`.
    fn step(&mut self) -> Option<Result<Token>> {
        match self.state {
            State::Begin => self.lex_begin(),
            State::LeftParen => Some(Ok(self.lex_left_paren())),
            State::Semicolon => Some(Ok(self.lex_semicolon())),
            State::PropertyName => Some(Ok(self.lex_property_name())),
            State::PropertyValue => Some(Ok(self.lex_property_value())),
            State::RightParen => Some(Ok(self.lex_right_paren())),
            State::End => {
                self.state = State::Done;
                Some(Ok(Token::new(TokenType::Eof, self.pos, "")))
            }
            State::Reject(expected) => {
                self.state = State::Done;
                Some(Err(self.reject(expected)))
            }
            State::Done => None,
        }
    }

    /// Skip to the first `(`. Anything before it is not part of the record.
    fn lex_begin(&mut self) -> Option<Result<Token>> {
        match self.input[self.pos..].find('(') {
            Some(skip) => {
                self.pos += skip;
                self.state = State::LeftParen;
            }
            None => {
                self.pos = self.input.len();
                self.state = State::End;
            }
        }
        None
    }

    fn lex_left_paren(&mut self) -> Token {
        let start = self.pos;
        self.bump();
        self.state = if self.peek() == Some(';') {
            State::Semicolon
        } else {
            State::Reject(Expected::Semicolon)
        };
        Token::new(TokenType::LeftParen, start, "(")
    }

    fn lex_semicolon(&mut self) -> Token {
        let start = self.pos;
        self.bump();
        // A doubled semicolon is tolerated and dropped.
        if self.peek() == Some(';') {
            self.bump();
        }
        self.state = if self.peek().is_some_and(is_alpha) {
            State::PropertyName
        } else {
            State::Reject(Expected::Property)
        };
        Token::new(TokenType::Semicolon, start, ";")
    }

    fn lex_property_name(&mut self) -> Token {
        let start = self.accept_run(is_alpha);
        let name = self.input[start..self.pos].to_uppercase();
        self.state = if self.peek() == Some('[') {
            State::PropertyValue
        } else {
            State::Reject(Expected::LeftBracket)
        };
        Token::new(TokenType::PropertyName, start, name)
    }

    fn lex_property_value(&mut self) -> Token {
        self.bump();
        let start = self.accept_run(is_value_char);
        let token = Token::new(TokenType::PropertyValue, start, &self.input[start..self.pos]);

        if self.peek() != Some(']') {
            self.state = State::Reject(Expected::RightBracket);
            return token;
        }
        self.bump();
        self.accept_run(is_whitespace);

        self.state = match self.peek() {
            Some('[') => State::PropertyValue,
            Some(';') => State::Semicolon,
            Some('(') => State::LeftParen,
            Some(')') => State::RightParen,
            Some(c) if is_alpha(c) => State::PropertyName,
            _ => State::Reject(Expected::AfterValue),
        };
        token
    }

    fn lex_right_paren(&mut self) -> Token {
        let start = self.pos;
        self.bump();
        self.state = match self.peek() {
            Some('(') => State::LeftParen,
            // Accepted without a preceding semicolon.
            Some(c) if is_alpha(c) => State::PropertyName,
            Some(')') => State::RightParen,
            Some(';') => State::Semicolon,
            _ => State::End,
        };
        Token::new(TokenType::RightParen, start, ")")
    }

    fn reject(&self, expected: Expected) -> ParseError {
        let location = self.locate();
        match expected {
            Expected::Semicolon => ParseError::SemicolonExpected(location),
            Expected::Property => ParseError::PropertyExpected(location),
            Expected::LeftBracket => ParseError::LeftBracketExpected(location),
            Expected::RightBracket => ParseError::RightBracketExpected(location),
            Expected::AfterValue => ParseError::UnexpectedAfterValue {
                found: match self.peek() {
                    Some(c) => format!("{:?}", c),
                    None => "end of input".to_string(),
                },
                location,
            },
        }
    }
}

impl Iterator for Lexer {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.state != State::Done {
            if let Some(item) = self.step() {
                return Some(item);
            }
        }
        None
    }
}

impl FusedIterator for Lexer {}

/// Remove every line feed and carriage return.
fn strip_newlines(input: &str) -> String {
    input.chars().filter(|&c| c != '\n' && c != '\r').collect()
}

fn is_alpha(c: char) -> bool {
    c.is_alphabetic()
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Printable characters other than the closing bracket.
///
/// Printable means the ASCII space, or any character that is not a control,
/// whitespace, format, private-use or noncharacter code point. Unassigned
/// code points cannot be told apart without the Unicode tables and are
/// accepted.
fn is_value_char(c: char) -> bool {
    if c == ']' {
        return false;
    }
    c == ' '
        || !(c.is_control()
            || c.is_whitespace()
            || is_format(c)
            || is_private_use(c)
            || is_noncharacter(c))
}

/// General category Cf.
fn is_format(c: char) -> bool {
    matches!(
        c,
        '\u{00AD}'
            | '\u{0600}'..='\u{0605}'
            | '\u{061C}'
            | '\u{06DD}'
            | '\u{070F}'
            | '\u{0890}'..='\u{0891}'
            | '\u{08E2}'
            | '\u{180E}'
            | '\u{200B}'..='\u{200F}'
            | '\u{202A}'..='\u{202E}'
            | '\u{2060}'..='\u{2064}'
            | '\u{2066}'..='\u{206F}'
            | '\u{FEFF}'
            | '\u{FFF9}'..='\u{FFFB}'
            | '\u{110BD}'
            | '\u{110CD}'
            | '\u{13430}'..='\u{1343F}'
            | '\u{1BCA0}'..='\u{1BCA3}'
            | '\u{1D173}'..='\u{1D17A}'
            | '\u{E0001}'
            | '\u{E0020}'..='\u{E007F}'
    )
}

/// General category Co.
fn is_private_use(c: char) -> bool {
    matches!(
        c,
        '\u{E000}'..='\u{F8FF}' | '\u{F0000}'..='\u{FFFFD}' | '\u{100000}'..='\u{10FFFD}'
    )
}

/// U+FDD0..U+FDEF and the last two code points of every plane.
fn is_noncharacter(c: char) -> bool {
    let cp = u32::from(c);
    (0xFDD0..=0xFDEF).contains(&cp) || cp & 0xFFFE == 0xFFFE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> Vec<Result<Token>> {
        Lexer::new(input, ParseContext::default()).collect()
    }

    fn types(input: &str) -> Vec<TokenType> {
        lex(input)
            .into_iter()
            .map_while(|item| item.ok())
            .map(|t| t.typ)
            .collect()
    }

    #[test]
    fn test_simple_document() {
        use TokenType::*;
        assert_eq!(
            types("(;GM[1];B[aa])"),
            vec![
                LeftParen,
                Semicolon,
                PropertyName,
                PropertyValue,
                Semicolon,
                PropertyName,
                PropertyValue,
                RightParen,
                Eof
            ]
        );
    }

    #[test]
    fn test_token_text_and_offsets() {
        let tokens: Vec<Token> = lex("(;sz[19])").into_iter().map(|t| t.unwrap()).collect();
        assert_eq!(tokens[2], Token::new(TokenType::PropertyName, 2, "SZ"));
        assert_eq!(tokens[3], Token::new(TokenType::PropertyValue, 5, "19"));
        assert_eq!(tokens[4], Token::new(TokenType::RightParen, 8, ")"));
        assert_eq!(tokens[5], Token::new(TokenType::Eof, 9, ""));
    }

    #[test]
    fn test_no_paren_is_clean_eof() {
        assert_eq!(types(""), vec![TokenType::Eof]);
        assert_eq!(types("just some text"), vec![TokenType::Eof]);
    }

    #[test]
    fn test_leading_garbage_is_skipped() {
        let tokens: Vec<Token> = lex("junk (;C[x])").into_iter().map(|t| t.unwrap()).collect();
        assert_eq!(tokens[0], Token::new(TokenType::LeftParen, 5, "("));
    }

    #[test]
    fn test_multi_value_repeats_value_tokens() {
        use TokenType::*;
        assert_eq!(
            types("(;AB[aa] [bb])"),
            vec![
                LeftParen,
                Semicolon,
                PropertyName,
                PropertyValue,
                PropertyValue,
                RightParen,
                Eof
            ]
        );
    }

    #[test]
    fn test_double_semicolon_is_absorbed() {
        use TokenType::*;
        assert_eq!(
            types("(;;C[x])"),
            vec![LeftParen, Semicolon, PropertyName, PropertyValue, RightParen, Eof]
        );
    }

    #[test]
    fn test_newlines_are_stripped() {
        let tokens: Vec<Token> = lex("(;C[line one\r\nline two]\n)")
            .into_iter()
            .map(|t| t.unwrap())
            .collect();
        assert_eq!(tokens[3].text, "line oneline two");
        assert_eq!(tokens[4].typ, TokenType::RightParen);
    }

    #[test]
    fn test_empty_value() {
        let tokens: Vec<Token> = lex("(;PL[])").into_iter().map(|t| t.unwrap()).collect();
        assert_eq!(tokens[3], Token::new(TokenType::PropertyValue, 5, ""));
    }

    #[test]
    fn test_name_after_right_paren() {
        use TokenType::*;
        assert_eq!(
            types("(;A[1](;B[2])C[3])"),
            vec![
                LeftParen,
                Semicolon,
                PropertyName,
                PropertyValue,
                LeftParen,
                Semicolon,
                PropertyName,
                PropertyValue,
                RightParen,
                PropertyName,
                PropertyValue,
                RightParen,
                Eof
            ]
        );
    }

    #[test]
    fn test_space_after_right_paren_ends_input() {
        use TokenType::*;
        assert_eq!(
            types("(;A[1]) (;B[2])"),
            vec![LeftParen, Semicolon, PropertyName, PropertyValue, RightParen, Eof]
        );
    }

    #[test]
    fn test_missing_semicolon() {
        let items = lex("( ;A[1])");
        assert_eq!(items.len(), 2);
        assert!(matches!(items[1], Err(ParseError::SemicolonExpected(_))));
        assert_eq!(items[1].as_ref().unwrap_err().offset(), 1);
    }

    #[test]
    fn test_missing_property() {
        let items = lex("(;[1])");
        assert!(matches!(
            items.last(),
            Some(Err(ParseError::PropertyExpected(_)))
        ));
    }

    #[test]
    fn test_missing_left_bracket() {
        let items = lex("(;GM 1)");
        let err = items.last().unwrap().as_ref().unwrap_err();
        assert!(matches!(err, ParseError::LeftBracketExpected(_)));
        assert_eq!(err.offset(), 4);
    }

    #[test]
    fn test_unterminated_value() {
        let items = lex("(;KEY[unterminated");
        assert_eq!(items.len(), 5);
        let err = items[4].as_ref().unwrap_err();
        assert!(matches!(err, ParseError::RightBracketExpected(_)));
        assert_eq!(err.offset(), 18);
        assert_eq!(
            err.to_string(),
            "right bracket ']' expected, position 18, \"inated|\""
        );
    }

    #[test]
    fn test_value_at_end_without_paren() {
        let items = lex("(;A[1]");
        let err = items.last().unwrap().as_ref().unwrap_err();
        assert_eq!(
            err.to_string(),
            "property, node, or parenthesis expected, found end of input, position 6, \"(;A[1]|\""
        );
    }

    #[test]
    fn test_tab_inside_value_needs_bracket() {
        let items = lex("(;C[a\tb])");
        assert!(matches!(
            items.last(),
            Some(Err(ParseError::RightBracketExpected(_)))
        ));
    }

    #[test]
    fn test_unprintable_characters_end_value() {
        for c in ['\u{200D}', '\u{FEFF}', '\u{E000}', '\u{FFFF}', '\u{00A0}'] {
            let items = lex(&format!("(;C[a{}b])", c));
            match items.last() {
                Some(Err(err @ ParseError::RightBracketExpected(_))) => assert_eq!(err.offset(), 5),
                other => panic!("U+{:04X}: expected a bracket error, got {:?}", u32::from(c), other),
            }
        }
    }

    #[test]
    fn test_printable_characters_in_value() {
        assert!(is_value_char(' '));
        assert!(is_value_char('é'));
        assert!(is_value_char('\u{1F600}'));
        assert!(is_value_char('\u{0301}'));
        assert!(!is_value_char(']'));
        assert!(!is_value_char('\u{E0041}'));
        assert!(!is_value_char('\u{10FFFD}'));
    }

    #[test]
    fn test_error_is_last_item() {
        let mut lexer = Lexer::new("(x", ParseContext::default());
        assert!(lexer.next().unwrap().is_ok());
        assert!(lexer.next().unwrap().is_err());
        assert!(lexer.next().is_none());
        assert!(lexer.next().is_none());
    }

    #[test]
    fn test_unicode_names_and_values() {
        let tokens: Vec<Token> = lex("(;é[日本])").into_iter().map(|t| t.unwrap()).collect();
        assert_eq!(tokens[2].text, "É");
        assert_eq!(tokens[3].text, "日本");
    }
}
