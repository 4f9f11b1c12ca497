//! Handcrafted lexer turning source text into tokens
//!
//! The lexer is a lazy iterator over [`Token`]s: no token is produced
//! until the parser (or a diagnostics tool) pulls it. Whitespace and
//! `//` line comments are discarded, never tokenized.

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use crate::error::LexError;

/// A position in the source text.
///
/// Lines and columns are 1-based; `offset` is the byte offset of the
/// position's first character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// 1-based line number
    pub line: usize,
    /// 1-based column number
    pub column: usize,
    /// Byte offset into the source
    pub offset: usize,
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The kind of a token, carrying the decoded payload for literals.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// An identifier such as `something` or `println`
    Ident(String),
    /// A string literal, escapes already decoded
    String(String),
    /// An integer literal
    Number(i64),

    // Keywords
    /// `let`
    Let,
    /// `fn`
    Fn,
    /// `if`
    If,
    /// `else`
    Else,
    /// `true`
    True,
    /// `false`
    False,

    // Punctuation
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `;`
    Semi,
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// `=`
    Equals,

    /// End of input
    Eof,
}

/// A single token: kind, raw text and source position.
///
/// Tokens are immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// What the token is
    pub kind: TokenKind,
    /// The raw lexeme as written in the source
    pub lexeme: String,
    /// Where the token starts
    pub span: Span,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TokenKind::Eof => write!(f, "<eof>"),
            _ => write!(f, "{}", self.lexeme),
        }
    }
}

/// Lazy tokenizer over a source string.
///
/// # Example
///
/// ```
/// use lenar::lexer::{Lexer, TokenKind};
///
/// let mut lexer = Lexer::new("let x = 1");
/// let first = lexer.next().unwrap().unwrap();
/// assert_eq!(first.kind, TokenKind::Let);
/// ```
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    column: usize,
    offset: usize,
}

impl<'a> Lexer<'a> {
    /// Create a lexer positioned at the start of `source`.
    pub fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().peekable(),
            line: 1,
            column: 1,
            offset: 0,
        }
    }

    fn span(&self) -> Span {
        Span {
            line: self.line,
            column: self.column,
            offset: self.offset,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        self.offset += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn skip_trivia(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() {
                self.bump();
            } else if ch == '/' {
                // Only a `//` pair starts a comment; a lone `/` is an error
                // reported by the caller.
                let mut lookahead = self.chars.clone();
                lookahead.next();
                if lookahead.peek() == Some(&'/') {
                    while let Some(&c) = self.chars.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                } else {
                    break;
                }
            } else {
                break;
            }
        }
    }

    fn lex_string(&mut self, start: Span) -> Result<Token, LexError> {
        // Opening quote already consumed.
        let mut decoded = String::new();
        let mut raw = String::from('"');

        loop {
            let span = self.span();
            match self.bump() {
                None => return Err(LexError::UnterminatedString { span: start }),
                Some('"') => {
                    raw.push('"');
                    break;
                }
                Some('\\') => {
                    raw.push('\\');
                    let esc = self
                        .bump()
                        .ok_or(LexError::UnterminatedString { span: start })?;
                    raw.push(esc);
                    match esc {
                        'n' => decoded.push('\n'),
                        't' => decoded.push('\t'),
                        'r' => decoded.push('\r'),
                        '0' => decoded.push('\0'),
                        '\\' => decoded.push('\\'),
                        '"' => decoded.push('"'),
                        other => return Err(LexError::InvalidEscape { ch: other, span }),
                    }
                }
                Some(ch) => {
                    raw.push(ch);
                    decoded.push(ch);
                }
            }
        }

        Ok(Token {
            kind: TokenKind::String(decoded),
            lexeme: raw,
            span: start,
        })
    }

    fn lex_number(&mut self, first: char, start: Span) -> Result<Token, LexError> {
        let mut text = String::from(first);
        while let Some(&ch) = self.chars.peek() {
            if ch.is_ascii_digit() {
                text.push(ch);
                self.bump();
            } else {
                break;
            }
        }

        let value = text
            .parse::<i64>()
            .map_err(|_| LexError::NumberOutOfRange {
                text: text.clone(),
                span: start,
            })?;

        Ok(Token {
            kind: TokenKind::Number(value),
            lexeme: text,
            span: start,
        })
    }

    fn lex_word(&mut self, first: char, start: Span) -> Token {
        let mut text = String::from(first);
        while let Some(&ch) = self.chars.peek() {
            if ch.is_alphanumeric() || ch == '_' {
                text.push(ch);
                self.bump();
            } else {
                break;
            }
        }

        let kind = match text.as_str() {
            "let" => TokenKind::Let,
            "fn" => TokenKind::Fn,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            _ => TokenKind::Ident(text.clone()),
        };

        Token {
            kind,
            lexeme: text,
            span: start,
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_trivia();

        let start = self.span();
        let ch = self.bump()?;

        let punct = |kind: TokenKind| {
            Ok(Token {
                kind,
                lexeme: ch.to_string(),
                span: start,
            })
        };

        Some(match ch {
            '(' => punct(TokenKind::LParen),
            ')' => punct(TokenKind::RParen),
            '{' => punct(TokenKind::LBrace),
            '}' => punct(TokenKind::RBrace),
            ';' => punct(TokenKind::Semi),
            ',' => punct(TokenKind::Comma),
            '.' => punct(TokenKind::Dot),
            '=' => punct(TokenKind::Equals),
            '"' => self.lex_string(start),
            c if c.is_ascii_digit() => self.lex_number(c, start),
            c if c.is_alphabetic() || c == '_' => Ok(self.lex_word(c, start)),
            c => Err(LexError::UnexpectedChar { ch: c, span: start }),
        })
    }
}

/// Tokenize an entire source string.
///
/// Returns the full token sequence terminated by an [`TokenKind::Eof`]
/// token, or the first [`LexError`] encountered.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    for token in &mut lexer {
        tokens.push(token?);
    }
    tokens.push(Token {
        kind: TokenKind::Eof,
        lexeme: String::new(),
        span: lexer.span(),
    });
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_tokenize_let_statement() {
        assert_eq!(
            kinds("let x = 1;"),
            vec![
                TokenKind::Let,
                TokenKind::Ident("x".into()),
                TokenKind::Equals,
                TokenKind::Number(1),
                TokenKind::Semi,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_tokenize_string_escapes() {
        assert_eq!(
            kinds(r#""a\nb\"c""#),
            vec![TokenKind::String("a\nb\"c".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_tokenize_dotted_path() {
        assert_eq!(
            kinds("Lenar.version"),
            vec![
                TokenKind::Ident("Lenar".into()),
                TokenKind::Dot,
                TokenKind::Ident("version".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_tokenize_keywords_and_bools() {
        assert_eq!(
            kinds("fn if else true false"),
            vec![
                TokenKind::Fn,
                TokenKind::If,
                TokenKind::Else,
                TokenKind::True,
                TokenKind::False,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_tokenize_skips_comments() {
        assert_eq!(
            kinds("1 // ignored until end of line\n2"),
            vec![TokenKind::Number(1), TokenKind::Number(2), TokenKind::Eof]
        );
    }

    #[test]
    fn test_tokenize_tracks_positions() {
        let tokens = tokenize("let x =\n  1").unwrap();
        assert_eq!(tokens[0].span.line, 1);
        assert_eq!(tokens[0].span.column, 1);
        assert_eq!(tokens[3].span.line, 2);
        assert_eq!(tokens[3].span.column, 3);
    }

    #[test]
    fn test_tokenize_unexpected_char() {
        let err = tokenize("let @").unwrap_err();
        assert!(matches!(err, LexError::UnexpectedChar { ch: '@', .. }));
    }

    #[test]
    fn test_tokenize_unterminated_string() {
        let err = tokenize(r#""never closed"#).unwrap_err();
        assert!(matches!(err, LexError::UnterminatedString { .. }));
    }

    #[test]
    fn test_tokenize_invalid_escape() {
        let err = tokenize(r#""bad \q escape""#).unwrap_err();
        assert!(matches!(err, LexError::InvalidEscape { ch: 'q', .. }));
    }

    #[test]
    fn test_lexer_is_lazy() {
        // The iterator yields good tokens before hitting the bad character.
        let mut lexer = Lexer::new("ok @");
        assert!(lexer.next().unwrap().is_ok());
        assert!(lexer.next().unwrap().is_err());
    }
}
