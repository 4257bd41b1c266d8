// Copyright (c) Riptide contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Tokenizer for the supported Ruby subset.
//!
//! The lexer is context-free. A leading `-` is never folded into a numeric
//! literal, and commands are not told apart from binary operators here. Each
//! token records whether whitespace preceded it; the parser decides the rest.

use crate::errors::ParseError;
use crate::location::Location;

/// Token kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Integer,
    Float,
    Rational,
    Imaginary,
    Identifier,
    Constant,

    KeywordAnd,
    KeywordOr,
    KeywordDo,
    KeywordEnd,
    KeywordNil,
    KeywordTrue,
    KeywordFalse,
    KeywordSelf,
    /// Any other reserved word (`if`, `def`, ...).
    KeywordOther,

    ParenLeft,
    ParenRight,
    BracketLeft,
    BracketRight,
    BraceLeft,
    BraceRight,
    Comma,
    Dot,
    AmpersandDot,
    ColonColon,
    DotDot,
    DotDotDot,
    Pipe,
    PipePipe,
    Ampersand,
    AmpersandAmpersand,
    Caret,
    Tilde,
    Bang,
    BangEqual,
    BangTilde,
    Equal,
    EqualEqual,
    EqualEqualEqual,
    EqualTilde,
    Less,
    LessEqual,
    LessLess,
    Spaceship,
    Greater,
    GreaterEqual,
    GreaterGreater,
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    Percent,
    Semicolon,
    Newline,
    Eof,
}

impl TokenKind {
    /// Whether the token is a numeric literal.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            TokenKind::Integer | TokenKind::Float | TokenKind::Rational | TokenKind::Imaginary
        )
    }
}

/// A lexed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub location: Location,
    /// Whether whitespace (not newlines) separated this token from the previous one.
    pub space_before: bool,
}

/// A `#` comment and whether it appeared before the first real token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comment {
    pub location: Location,
    pub leading: bool,
}

/// Output of [`tokenize`].
#[derive(Debug, Clone, Default)]
pub struct Lexed {
    pub tokens: Vec<Token>,
    pub comments: Vec<Comment>,
    pub errors: Vec<ParseError>,
}

const RESERVED_WORDS: &[&str] = &[
    "BEGIN", "END", "__ENCODING__", "__FILE__", "__LINE__", "alias", "begin", "break", "case",
    "class", "def", "defined?", "else", "elsif", "ensure", "for", "if", "in", "module", "next",
    "not", "redo", "rescue", "retry", "return", "super", "then", "undef", "unless", "until", "when",
    "while", "yield",
];

/// Tokenizes `text`. The token list always ends with [`TokenKind::Eof`].
///
/// Unknown characters are reported as errors and skipped so that the parser
/// still sees the rest of the input.
pub fn tokenize(text: &str) -> Lexed {
    Lexer::new(text).run()
}

struct Lexer<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    space_before: bool,
    seen_token: bool,
    out: Lexed,
}

impl<'a> Lexer<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
            space_before: false,
            seen_token: false,
            out: Lexed::default(),
        }
    }

    fn run(mut self) -> Lexed {
        while let Some(byte) = self.peek_byte(0) {
            match byte {
                b' ' | b'\t' | b'\r' | b'\x0c' => {
                    self.pos += 1;
                    self.space_before = true;
                }
                b'\\' if self.peek_byte(1) == Some(b'\n') => {
                    // Line continuation.
                    self.pos += 2;
                    self.space_before = true;
                }
                b'#' => self.comment(),
                b'\n' => {
                    self.push(TokenKind::Newline, self.pos, self.pos + 1);
                    self.space_before = false;
                }
                b'0'..=b'9' => self.number(),
                b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.word(),
                _ if byte >= 0x80 => self.word(),
                _ => self.punctuation(byte),
            }
        }
        let end = self.text.len();
        self.out.tokens.push(Token {
            kind: TokenKind::Eof,
            location: Location::empty(end),
            space_before: self.space_before,
        });
        self.out
    }

    fn peek_byte(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    fn push(&mut self, kind: TokenKind, start: usize, end: usize) {
        if kind != TokenKind::Newline {
            self.seen_token = true;
        }
        self.out.tokens.push(Token {
            kind,
            location: Location::new(start, end),
            space_before: self.space_before,
        });
        self.pos = end;
        self.space_before = false;
    }

    fn comment(&mut self) {
        let start = self.pos;
        let end = memchr::memchr(b'\n', &self.bytes[start..])
            .map(|i| start + i)
            .unwrap_or(self.bytes.len());
        self.out.comments.push(Comment {
            location: Location::new(start, end),
            leading: !self.seen_token,
        });
        self.pos = end;
    }

    fn digits(&mut self) {
        while let Some(b) = self.peek_byte(0) {
            let underscore_between_digits =
                b == b'_' && self.peek_byte(1).is_some_and(|n| n.is_ascii_digit());
            if b.is_ascii_digit() || underscore_between_digits {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn number(&mut self) {
        let start = self.pos;
        let mut kind = TokenKind::Integer;

        if self.peek_byte(0) == Some(b'0')
            && matches!(self.peek_byte(1), Some(b'x' | b'X' | b'b' | b'B' | b'o' | b'O'))
        {
            self.pos += 2;
            while let Some(b) = self.peek_byte(0) {
                if b.is_ascii_hexdigit() || b == b'_' {
                    self.pos += 1;
                } else {
                    break;
                }
            }
        } else {
            self.digits();
            if self.peek_byte(0) == Some(b'.') && self.peek_byte(1).is_some_and(|b| b.is_ascii_digit())
            {
                self.pos += 1;
                self.digits();
                kind = TokenKind::Float;
            }
            if matches!(self.peek_byte(0), Some(b'e' | b'E')) {
                let sign = usize::from(matches!(self.peek_byte(1), Some(b'+' | b'-')));
                if self.peek_byte(1 + sign).is_some_and(|b| b.is_ascii_digit()) {
                    self.pos += 1 + sign;
                    self.digits();
                    kind = TokenKind::Float;
                }
            }
        }

        // Suffixes: `r` (rational), `i` (imaginary), `ri` (both). A suffix
        // followed by an identifier character is not a suffix.
        let ident_continues = |lexer: &Self, ahead: usize| {
            lexer
                .peek_byte(ahead)
                .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_')
        };
        if self.peek_byte(0) == Some(b'r') && !ident_continues(self, 1) {
            self.pos += 1;
            kind = TokenKind::Rational;
        } else if self.peek_byte(0) == Some(b'r')
            && self.peek_byte(1) == Some(b'i')
            && !ident_continues(self, 2)
        {
            self.pos += 2;
            kind = TokenKind::Imaginary;
        } else if self.peek_byte(0) == Some(b'i') && !ident_continues(self, 1) {
            self.pos += 1;
            kind = TokenKind::Imaginary;
        }

        let end = self.pos;
        self.push(kind, start, end);
    }

    fn word(&mut self) {
        let start = self.pos;
        while let Some(b) = self.peek_byte(0) {
            if b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80 {
                self.pos += 1;
            } else {
                break;
            }
        }
        // Method names may end in `?` or `!` (but not `!=`).
        if let Some(b'?' | b'!') = self.peek_byte(0) {
            if self.peek_byte(1) != Some(b'=') {
                self.pos += 1;
            }
        }
        let end = self.pos;
        let word = &self.text[start..end];
        let kind = match word {
            "and" => TokenKind::KeywordAnd,
            "or" => TokenKind::KeywordOr,
            "do" => TokenKind::KeywordDo,
            "end" => TokenKind::KeywordEnd,
            "nil" => TokenKind::KeywordNil,
            "true" => TokenKind::KeywordTrue,
            "false" => TokenKind::KeywordFalse,
            "self" => TokenKind::KeywordSelf,
            w if RESERVED_WORDS.contains(&w) => TokenKind::KeywordOther,
            w if w.starts_with(|c: char| c.is_ascii_uppercase()) => TokenKind::Constant,
            _ => TokenKind::Identifier,
        };
        self.push(kind, start, end);
    }

    fn punctuation(&mut self, byte: u8) {
        use TokenKind::*;

        let start = self.pos;
        let next = self.peek_byte(1);
        let third = self.peek_byte(2);
        let (kind, len) = match (byte, next, third) {
            (b'.', Some(b'.'), Some(b'.')) => (DotDotDot, 3),
            (b'.', Some(b'.'), _) => (DotDot, 2),
            (b'.', _, _) => (Dot, 1),
            (b'&', Some(b'.'), _) => (AmpersandDot, 2),
            (b'&', Some(b'&'), _) => (AmpersandAmpersand, 2),
            (b'&', _, _) => (Ampersand, 1),
            (b'|', Some(b'|'), _) => (PipePipe, 2),
            (b'|', _, _) => (Pipe, 1),
            (b':', Some(b':'), _) => (ColonColon, 2),
            (b'<', Some(b'='), Some(b'>')) => (Spaceship, 3),
            (b'<', Some(b'='), _) => (LessEqual, 2),
            (b'<', Some(b'<'), _) => (LessLess, 2),
            (b'<', _, _) => (Less, 1),
            (b'>', Some(b'='), _) => (GreaterEqual, 2),
            (b'>', Some(b'>'), _) => (GreaterGreater, 2),
            (b'>', _, _) => (Greater, 1),
            (b'=', Some(b'='), Some(b'=')) => (EqualEqualEqual, 3),
            (b'=', Some(b'='), _) => (EqualEqual, 2),
            (b'=', Some(b'~'), _) => (EqualTilde, 2),
            (b'=', _, _) => (Equal, 1),
            (b'!', Some(b'='), _) => (BangEqual, 2),
            (b'!', Some(b'~'), _) => (BangTilde, 2),
            (b'!', _, _) => (Bang, 1),
            (b'*', Some(b'*'), _) => (StarStar, 2),
            (b'*', _, _) => (Star, 1),
            (b'+', _, _) => (Plus, 1),
            (b'-', _, _) => (Minus, 1),
            (b'/', _, _) => (Slash, 1),
            (b'%', _, _) => (Percent, 1),
            (b'^', _, _) => (Caret, 1),
            (b'~', _, _) => (Tilde, 1),
            (b'(', _, _) => (ParenLeft, 1),
            (b')', _, _) => (ParenRight, 1),
            (b'[', _, _) => (BracketLeft, 1),
            (b']', _, _) => (BracketRight, 1),
            (b'{', _, _) => (BraceLeft, 1),
            (b'}', _, _) => (BraceRight, 1),
            (b',', _, _) => (Comma, 1),
            (b';', _, _) => (Semicolon, 1),
            _ => {
                let ch = self.text[start..].chars().next().unwrap_or('?');
                let end = start + ch.len_utf8();
                self.out.errors.push(ParseError::new(
                    format!("unexpected character {ch:?}"),
                    Location::new(start, end),
                ));
                self.pos = end;
                return;
            }
        };
        self.push(kind, start, start + len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    fn kinds(text: &str) -> Vec<TokenKind> {
        tokenize(text).tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_numbers() {
        use TokenKind::*;
        assert_eq!(
            kinds("1 1.5 3r 1.5r 2i 3ri 1e3 0x1F 1_000"),
            vec![Integer, Float, Rational, Rational, Imaginary, Imaginary, Float, Integer, Integer, Eof]
        );
    }

    #[test]
    fn test_minus_is_not_folded_into_literal() {
        use TokenKind::*;
        let lexed = tokenize("-5");
        assert_eq!(lexed.tokens.iter().map(|t| t.kind).collect_vec(), vec![Minus, Integer, Eof]);
        assert!(!lexed.tokens[1].space_before);
    }

    #[test]
    fn test_method_call_on_integer_is_not_a_float() {
        use TokenKind::*;
        assert_eq!(kinds("1.abs"), vec![Integer, Dot, Identifier, Eof]);
        assert_eq!(kinds("1..2"), vec![Integer, DotDot, Integer, Eof]);
    }

    #[test]
    fn test_words_and_keywords() {
        use TokenKind::*;
        assert_eq!(
            kinds("foo Bar and or do end nil true false self if not empty?"),
            vec![
                Identifier, Constant, KeywordAnd, KeywordOr, KeywordDo, KeywordEnd, KeywordNil,
                KeywordTrue, KeywordFalse, KeywordSelf, KeywordOther, KeywordOther, Identifier, Eof
            ]
        );
    }

    #[test]
    fn test_punctuation() {
        use TokenKind::*;
        assert_eq!(
            kinds("a&.b ... .. :: <=> && || != ** |"),
            vec![
                Identifier, AmpersandDot, Identifier, DotDotDot, DotDot, ColonColon, Spaceship,
                AmpersandAmpersand, PipePipe, BangEqual, StarStar, Pipe, Eof
            ]
        );
    }

    #[test]
    fn test_match_and_case_equality_operators() {
        use TokenKind::*;
        assert_eq!(
            kinds("a =~ b !~ c === d == e"),
            vec![
                Identifier, EqualTilde, Identifier, BangTilde, Identifier, EqualEqualEqual,
                Identifier, EqualEqual, Identifier, Eof
            ]
        );
        assert_eq!(kinds("a = ~b"), vec![Identifier, Equal, Tilde, Identifier, Eof]);
    }

    #[test]
    fn test_space_before_is_recorded() {
        let lexed = tokenize("foo bar(1)");
        let spaces = lexed.tokens.iter().map(|t| t.space_before).collect_vec();
        assert_eq!(spaces, vec![false, true, false, false, false, false]);
    }

    #[test]
    fn test_leading_comments_are_marked() {
        let lexed = tokenize("# one\n# two\nfoo # three\n");
        let leading = lexed.comments.iter().map(|c| c.leading).collect_vec();
        assert_eq!(leading, vec![true, true, false]);
    }

    #[test]
    fn test_unknown_character_is_reported() {
        let lexed = tokenize("1 $ 2");
        assert_eq!(lexed.errors.len(), 1);
        assert_eq!(lexed.errors[0].location, Location::new(2, 3));
        assert_eq!(kinds("1 $ 2").len(), 3);
    }
}
