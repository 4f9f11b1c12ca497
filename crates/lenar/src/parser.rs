//! Handcrafted recursive-descent parser
//!
//! One parsing function per grammar production, fixed single-token
//! lookahead, no backtracking. The grammar has no infix operators:
//! everything composes through function-call syntax, so no precedence
//! climbing is needed beyond nested calls.
//!
//! ```text
//! program    := statement*
//! statement  := let | expression ';'?
//! let        := 'let' IDENT '=' expression
//! expression := if | function | block | primary call-suffix*
//! if         := 'if' '(' expression ')' block ('else' block)?
//! function   := 'fn' '(' param-list? ')' block
//! block      := '{' statement* '}'
//! primary    := literal | identifier ('.' identifier)*
//! ```
//!
//! Arguments and parameters may be separated by commas or plain
//! juxtaposition, as in `isEqual("test" "test")`.

use crate::ast::{Block, Expr, Literal, Program};
use crate::error::ParseError;
use crate::lexer::{tokenize, Token, TokenKind};

/// Parse a full source string into a [`Program`].
///
/// The first lexing or parsing failure aborts the parse; no partial AST
/// is ever returned.
pub fn parse(source: &str) -> Result<Program, ParseError> {
    let tokens = tokenize(source)?;
    Parser::new(tokens).parse_program()
}

/// Token-stream parser, for hosts that already hold tokens
/// (e.g. a REPL that tokenizes incrementally for diagnostics).
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Create a parser over a token sequence produced by
    /// [`tokenize`](crate::lexer::tokenize).
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Parse the whole token stream as a program.
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut exprs = Vec::new();
        while !self.at_eof() {
            exprs.push(self.parse_statement()?);
            self.skip_semis();
        }
        Ok(Program { exprs })
    }

    // ═══════════════════════════════════════════════════════════════════
    // Productions
    // ═══════════════════════════════════════════════════════════════════

    fn parse_statement(&mut self) -> Result<Expr, ParseError> {
        if matches!(self.peek_kind(), Some(TokenKind::Let)) {
            self.parse_let()
        } else {
            self.parse_expression()
        }
    }

    fn parse_let(&mut self) -> Result<Expr, ParseError> {
        self.expect(&TokenKind::Let, "`let`")?;
        let name = self.expect_ident("a variable name")?;
        self.expect(&TokenKind::Equals, "`=`")?;
        let value = self.parse_expression()?;
        Ok(Expr::Let {
            name,
            value: Box::new(value),
        })
    }

    fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        let expr = match self.peek_kind() {
            Some(TokenKind::If) => self.parse_if()?,
            Some(TokenKind::Fn) => self.parse_function()?,
            Some(TokenKind::LBrace) => Expr::Block(self.parse_block()?),
            _ => self.parse_primary()?,
        };
        self.parse_call_suffixes(expr)
    }

    fn parse_if(&mut self) -> Result<Expr, ParseError> {
        self.expect(&TokenKind::If, "`if`")?;
        self.expect(&TokenKind::LParen, "`(` after `if`")?;
        let condition = self.parse_expression()?;
        self.expect(&TokenKind::RParen, "`)` after the condition")?;
        let then_branch = self.parse_block()?;

        let else_branch = if matches!(self.peek_kind(), Some(TokenKind::Else)) {
            self.advance();
            Some(self.parse_block()?)
        } else {
            None
        };

        Ok(Expr::If {
            condition: Box::new(condition),
            then_branch,
            else_branch,
        })
    }

    fn parse_function(&mut self) -> Result<Expr, ParseError> {
        self.expect(&TokenKind::Fn, "`fn`")?;
        self.expect(&TokenKind::LParen, "`(` after `fn`")?;

        let mut params = Vec::new();
        while !matches!(self.peek_kind(), Some(TokenKind::RParen)) {
            params.push(self.expect_ident("a parameter name")?);
            if matches!(self.peek_kind(), Some(TokenKind::Comma)) {
                self.advance();
            }
        }
        self.expect(&TokenKind::RParen, "`)` after parameters")?;

        let body = self.parse_block()?;
        Ok(Expr::Function { params, body })
    }

    fn parse_block(&mut self) -> Result<Block, ParseError> {
        self.expect(&TokenKind::LBrace, "`{`")?;
        let mut exprs = Vec::new();
        loop {
            self.skip_semis();
            match self.peek_kind() {
                Some(TokenKind::RBrace) => break,
                Some(TokenKind::Eof) | None => {
                    return Err(ParseError::UnexpectedEof {
                        expected: "`}` to close the block".into(),
                    })
                }
                _ => exprs.push(self.parse_statement()?),
            }
        }
        self.expect(&TokenKind::RBrace, "`}`")?;
        Ok(Block { exprs })
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.advance().ok_or_else(|| ParseError::UnexpectedEof {
            expected: "an expression".into(),
        })?;

        match token.kind {
            TokenKind::String(s) => Ok(Expr::Literal(Literal::String(s))),
            TokenKind::Number(n) => Ok(Expr::Literal(Literal::Number(n))),
            TokenKind::True => Ok(Expr::Literal(Literal::Bool(true))),
            TokenKind::False => Ok(Expr::Literal(Literal::Bool(false))),
            TokenKind::Ident(name) => {
                let mut path = vec![name];
                while matches!(self.peek_kind(), Some(TokenKind::Dot)) {
                    self.advance();
                    path.push(self.expect_ident("a member name after `.`")?);
                }
                Ok(Expr::Identifier { path })
            }
            TokenKind::Eof => Err(ParseError::UnexpectedEof {
                expected: "an expression".into(),
            }),
            _ => Err(ParseError::UnexpectedToken {
                expected: "an expression".into(),
                found: token.lexeme,
                span: token.span,
            }),
        }
    }

    /// Wrap `expr` in [`Expr::Call`] nodes for each trailing argument
    /// list, so `f(x)(y)` parses as `Call(Call(f, x), y)`.
    fn parse_call_suffixes(&mut self, mut expr: Expr) -> Result<Expr, ParseError> {
        while matches!(self.peek_kind(), Some(TokenKind::LParen)) {
            self.advance();
            let mut args = Vec::new();
            while !matches!(self.peek_kind(), Some(TokenKind::RParen)) {
                if matches!(self.peek_kind(), Some(TokenKind::Eof) | None) {
                    return Err(ParseError::UnexpectedEof {
                        expected: "`)` to close the argument list".into(),
                    });
                }
                args.push(self.parse_expression()?);
                if matches!(self.peek_kind(), Some(TokenKind::Comma)) {
                    self.advance();
                }
            }
            self.advance(); // consume `)`
            expr = Expr::Call {
                callee: Box::new(expr),
                args,
            };
        }
        Ok(expr)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Token-stream helpers
    // ═══════════════════════════════════════════════════════════════════

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    fn at_eof(&self) -> bool {
        matches!(self.peek_kind(), Some(TokenKind::Eof) | None)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned()?;
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        Some(token)
    }

    fn skip_semis(&mut self) {
        while matches!(self.peek_kind(), Some(TokenKind::Semi)) {
            self.advance();
        }
    }

    fn expect(&mut self, kind: &TokenKind, expected: &str) -> Result<Token, ParseError> {
        match self.tokens.get(self.pos) {
            Some(token) if &token.kind == kind => {
                self.pos += 1;
                Ok(token.clone())
            }
            Some(token) if token.kind == TokenKind::Eof => Err(ParseError::UnexpectedEof {
                expected: expected.into(),
            }),
            Some(token) => Err(ParseError::UnexpectedToken {
                expected: expected.into(),
                found: token.lexeme.clone(),
                span: token.span,
            }),
            None => Err(ParseError::UnexpectedEof {
                expected: expected.into(),
            }),
        }
    }

    fn expect_ident(&mut self, expected: &str) -> Result<String, ParseError> {
        match self.tokens.get(self.pos) {
            Some(token) => {
                if let TokenKind::Ident(name) = &token.kind {
                    let name = name.clone();
                    self.pos += 1;
                    Ok(name)
                } else if token.kind == TokenKind::Eof {
                    Err(ParseError::UnexpectedEof {
                        expected: expected.into(),
                    })
                } else {
                    Err(ParseError::UnexpectedToken {
                        expected: expected.into(),
                        found: token.lexeme.clone(),
                        span: token.span,
                    })
                }
            }
            None => Err(ParseError::UnexpectedEof {
                expected: expected.into(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_let_binding() {
        let program = parse(r#"let greeting = "hi";"#).unwrap();
        assert_eq!(
            program.exprs,
            vec![Expr::Let {
                name: "greeting".into(),
                value: Box::new(Expr::Literal(Literal::String("hi".into()))),
            }]
        );
    }

    #[test]
    fn test_parse_call_space_separated_args() {
        let program = parse(r#"isEqual("test" "test")"#).unwrap();
        assert_eq!(
            program.exprs,
            vec![Expr::Call {
                callee: Box::new(Expr::ident("isEqual")),
                args: vec![
                    Expr::Literal(Literal::String("test".into())),
                    Expr::Literal(Literal::String("test".into())),
                ],
            }]
        );
    }

    #[test]
    fn test_parse_call_comma_separated_args() {
        let with_commas = parse("f(1, 2, 3)").unwrap();
        let without = parse("f(1 2 3)").unwrap();
        assert_eq!(with_commas, without);
    }

    #[test]
    fn test_parse_dotted_identifier() {
        let program = parse("Lenar.version").unwrap();
        assert_eq!(
            program.exprs,
            vec![Expr::Identifier {
                path: vec!["Lenar".into(), "version".into()],
            }]
        );
    }

    #[test]
    fn test_parse_function_literal() {
        let program = parse(r#"fn(v) { v }"#).unwrap();
        assert_eq!(
            program.exprs,
            vec![Expr::Function {
                params: vec!["v".into()],
                body: Block {
                    exprs: vec![Expr::ident("v")],
                },
            }]
        );
    }

    #[test]
    fn test_parse_if_else() {
        let program = parse(r#"if(true) { 1 } else { 2 }"#).unwrap();
        match &program.exprs[0] {
            Expr::If {
                condition,
                then_branch,
                else_branch,
            } => {
                assert_eq!(**condition, Expr::Literal(Literal::Bool(true)));
                assert_eq!(then_branch.exprs.len(), 1);
                assert!(else_branch.is_some());
            }
            other => panic!("expected if expression, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_if_without_else() {
        let program = parse(r#"if(false) { 1 }"#).unwrap();
        match &program.exprs[0] {
            Expr::If { else_branch, .. } => assert!(else_branch.is_none()),
            other => panic!("expected if expression, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_chained_calls() {
        let program = parse("f(1)(2)").unwrap();
        match &program.exprs[0] {
            Expr::Call { callee, args } => {
                assert!(matches!(**callee, Expr::Call { .. }));
                assert_eq!(args, &vec![Expr::Literal(Literal::Number(2))]);
            }
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_is_deterministic() {
        let source = r#"
            if(isEqual("test" "test")) {
                let something = fn(v) { println(Lenar.version); "hi" };
                println(something("hey"));
            };
        "#;
        let first = parse(source).unwrap();
        let second = parse(source).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_parse_unexpected_token() {
        let err = parse("let = 1").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { .. }));
    }

    #[test]
    fn test_parse_unexpected_eof() {
        let err = parse("let x =").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof { .. }));
    }

    #[test]
    fn test_parse_unclosed_block() {
        let err = parse("{ let x = 1;").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof { .. }));
    }

    #[test]
    fn test_parse_lex_error_propagates() {
        let err = parse("let x = @").unwrap_err();
        assert!(matches!(err, ParseError::Lex(_)));
    }
}
