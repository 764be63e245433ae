pub mod error;
pub mod expressions;
pub mod statements;

use crate::ast::Program;
use crate::lexer::{Token, TokenKind};
pub use error::{Expected, ParseError};
use statements::parse_statement;

pub struct Parser<'a> {
    pub iter: std::iter::Peekable<crate::lexer::Tokenizer<'a>>,
}

impl<'a> Parser<'a> {
    pub fn new(tokenizer: crate::lexer::Tokenizer<'a>) -> Self {
        let iter = tokenizer.peekable();
        Self { iter }
    }

    pub(crate) fn parse_ident(&mut self) -> Result<std::rc::Rc<str>, ParseError> {
        let token = self.iter.next();
        match token {
            Some(Token {
                kind: TokenKind::Ident(name),
                ..
            }) => Ok(name),
            _ => Err(ParseError::unexpected_other(Expected::Identifier, token)),
        }
    }

    pub(crate) fn expect_token(&mut self, token_kind: TokenKind) -> Result<(), ParseError> {
        let token = self.iter.next();
        match token {
            Some(Token { kind, .. }) if kind == token_kind => Ok(()),
            _ => Err(ParseError::unexpected_token(token_kind, token)),
        }
    }

    /// Consumes the `;` ending a statement, if there is one.
    pub(crate) fn skip_terminator(&mut self) {
        self.iter.next_if(|token| token.kind == TokenKind::SemiColon);
    }

    /// Skips the statement starting at the current token: everything up to
    /// and including the next `;` outside of any braces. Braces opened by
    /// the statement are matched first, so an error inside a function body
    /// or block does not resume in the middle of it.
    fn synchronize(&mut self) {
        let mut depth = 0usize;
        for token in self.iter.by_ref() {
            match token.kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => depth = depth.saturating_sub(1),
                TokenKind::SemiColon if depth == 0 => break,
                _ => {}
            }
        }
    }

    /// Parses the whole token stream. Parsing carries on after a failed
    /// statement, so every error found in one pass is reported.
    pub fn parse_program(&mut self) -> Result<Program, Vec<ParseError>> {
        let mut statements = Vec::new();
        let mut errors = Vec::new();

        while self.iter.peek().is_some() {
            let statement_start = self.iter.clone();
            match parse_statement(self) {
                Ok(statement) => {
                    statements.push(statement);
                    self.skip_terminator();
                }
                Err(err) => {
                    tracing::trace!(%err, "skipping to the next statement");
                    errors.push(err);
                    // The failed statement may have consumed its own `;`,
                    // so recovery restarts from where it began.
                    self.iter = statement_start;
                    self.synchronize();
                }
            }
        }

        tracing::debug!(
            statements = statements.len(),
            errors = errors.len(),
            "parsed program"
        );

        if errors.is_empty() {
            Ok(Program { statements })
        } else {
            Err(errors)
        }
    }
}

/// Lexes and parses `input` in one go.
pub fn parse(input: &str) -> Result<Program, Vec<ParseError>> {
    Parser::new(crate::lexer::Tokenizer::new(input)).parse_program()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn test_parsing(tests: Vec<(&str, &str)>) {
        for (input, expected) in tests {
            let program = match parse(input) {
                Ok(program) => program,
                Err(errors) => panic!("failed to parse {input:?}: {errors:?}"),
            };

            assert_eq!(program.to_string(), expected)
        }
    }

    fn parse_errors(input: &str) -> Vec<ParseError> {
        match parse(input) {
            Ok(program) => panic!("expected {input:?} to fail, got {program}"),
            Err(errors) => errors,
        }
    }

    #[test]
    fn test_statements() {
        let tests = vec![
            ("let x = 5;", "let x = 5;\n"),
            ("let y = true", "let y = true;\n"),
            ("let foobar = y;", "let foobar = y;\n"),
            ("return 5;", "return 5;\n"),
            ("return add(1, 2)", "return add(1, 2);\n"),
            ("foobar;", "foobar;\n"),
            ("\"hello world\"", "\"hello world\";\n"),
            ("let a = 1 let b = 2", "let a = 1;\nlet b = 2;\n"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_prefix_and_infix() {
        let tests = vec![
            ("-a * b", "((-a) * b);\n"),
            ("!-a", "(!(-a));\n"),
            ("!5", "(!5);\n"),
            ("a + b + c", "((a + b) + c);\n"),
            ("a + b - c", "((a + b) - c);\n"),
            ("a * b * c", "((a * b) * c);\n"),
            ("a * b / c", "((a * b) / c);\n"),
            ("a + b / c", "(a + (b / c));\n"),
            (
                "a + b * c + d / e - f",
                "(((a + (b * c)) + (d / e)) - f);\n",
            ),
            ("3 + 4; -5 * 5", "(3 + 4);\n((-5) * 5);\n"),
            ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4));\n"),
            ("5 < 4 != 3 > 4", "((5 < 4) != (3 > 4));\n"),
            (
                "3 + 4 * 5 == 3 * 1 + 4 * 5",
                "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)));\n",
            ),
            ("true == !false", "(true == (!false));\n"),
            ("3 > 5 == false", "((3 > 5) == false);\n"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_expression_precedence() {
        let tests = vec![
            ("1 + (2 + 3) + 4", "((1 + (2 + 3)) + 4);\n"),
            ("(5 + 5) * 2", "((5 + 5) * 2);\n"),
            ("2 / (5 + 5)", "(2 / (5 + 5));\n"),
            ("-(5 + 5)", "(-(5 + 5));\n"),
            ("!(true == true)", "(!(true == true));\n"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_call_and_index_expression() {
        let tests = vec![
            ("a + add(b * c) + d", "((a + add((b * c))) + d);\n"),
            (
                "add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))",
                "add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)));\n",
            ),
            (
                "add(a + b + c * d / f + g)",
                "add((((a + b) + ((c * d) / f)) + g));\n",
            ),
            ("a * [1, 2, 3, 4][b * c] * d", "((a * ([1, 2, 3, 4][(b * c)])) * d);\n"),
            (
                "add(a * b[2], b[1], 2 * [1, 2][1])",
                "add((a * (b[2])), (b[1]), (2 * ([1, 2][1])));\n",
            ),
            ("f(x)(y)", "f(x)(y);\n"),
            ("-f(1)[0]", "(-(f(1)[0]));\n"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_conditional() {
        let tests = vec![
            ("if (x < y) { x }", "if (x < y) { x; };\n"),
            (
                "if x < y { x } else { y; }",
                "if (x < y) { x; } else { y; };\n",
            ),
            ("if (x) { let a = 1; a }", "if x { let a = 1; a; };\n"),
            ("if (x) {}", "if x { };\n"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_function() {
        let tests = vec![
            ("fn() {};", "fn() { };\n"),
            ("fn(x) {};", "fn(x) { };\n"),
            ("fn(x, y, z,) { x + y; }", "fn(x, y, z) { (x + y); };\n"),
            (
                "let getName = fn(person) { person[\"name\"]; };",
                "let getName = fn(person) { (person[\"name\"]); };\n",
            ),
            (
                "let getName = fn(person) { return person[\"name\"] };",
                "let getName = fn(person) { return (person[\"name\"]); };\n",
            ),
            ("fn(x) { x }(5)", "fn(x) { x; }(5);\n"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_collections() {
        let tests = vec![
            ("[]", "[];\n"),
            ("[1, 2 * 2, 3 + 3]", "[1, (2 * 2), (3 + 3)];\n"),
            ("{}", "{};\n"),
            (
                "{\"one\": 1, \"two\": 2,}",
                "{\"one\": 1, \"two\": 2};\n",
            ),
            (
                "{\"one\": 0 + 1, true: 10 - 8, 3: 15 / 5}",
                "{\"one\": (0 + 1), true: (10 - 8), 3: (15 / 5)};\n",
            ),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_rendering_is_stable_under_reparsing() {
        let inputs = vec![
            "let add = fn(a, b) { return a + b; }; add(1, 2 * 3)",
            "let m = {\"k\": [1, -2], true: fn(x) { if (x > 1) { x } else { !x } }}; m[true](3)",
            "let counter = fn(n) { fn() { n + 1 } }; counter(-5)()[0]",
            "if (a == b) { } else { let c = [a, b]; c[0] }",
        ];

        for input in inputs {
            let first = parse(input).map(|p| p.to_string());
            let first = match first {
                Ok(rendered) => rendered,
                Err(errors) => panic!("failed to parse {input:?}: {errors:?}"),
            };
            let second = parse(&first).map(|p| p.to_string());
            assert_eq!(second, Ok(first));
        }
    }

    #[test]
    fn test_errors_are_collected() {
        let errors = parse_errors("let = 5; let x 10; let y = 1; let 838383;");

        assert_eq!(errors.len(), 3);
        assert!(matches!(
            &errors[0],
            ParseError::UnexpectedToken {
                expected: Expected::Identifier,
                got: Token {
                    kind: TokenKind::Assign,
                    ..
                }
            }
        ));
        assert!(matches!(
            &errors[1],
            ParseError::UnexpectedToken {
                expected: Expected::Token(TokenKind::Assign),
                got: Token {
                    kind: TokenKind::Int(_),
                    ..
                }
            }
        ));
        assert!(matches!(
            &errors[2],
            ParseError::UnexpectedToken {
                expected: Expected::Identifier,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_prefix_and_unterminated() {
        let errors = parse_errors(")");
        assert!(matches!(
            errors.as_slice(),
            [ParseError::NoPrefixFunction(Token {
                kind: TokenKind::RParen,
                ..
            })]
        ));

        let errors = parse_errors("fn(x) { x");
        assert_eq!(
            errors,
            vec![ParseError::PrematureEndOfInput {
                expected: Expected::Token(TokenKind::RBrace)
            }]
        );

        let errors = parse_errors("[1, 2");
        assert_eq!(
            errors,
            vec![ParseError::PrematureEndOfInput {
                expected: Expected::Token(TokenKind::RBracket)
            }]
        );

        let errors = parse_errors("add(1,");
        assert_eq!(
            errors,
            vec![ParseError::PrematureEndOfInput {
                expected: Expected::Token(TokenKind::RParen)
            }]
        );

        let errors = parse_errors("99999999999999999999");
        assert!(matches!(
            errors.as_slice(),
            [ParseError::InvalidInteger { .. }]
        ));
    }

    #[test]
    fn test_recovery_resumes_at_next_statement() {
        let tests = vec![
            // The first statement fails on its own `;`.
            ("let x = ; let = 5;", 2),
            ("let x ; let y 5;", 2),
            ("let x = ; let y = 5;", 1),
            // Errors inside a body skip the rest of the enclosing statement.
            ("let f = fn() { let = 1; 2 }; let y = 3;", 1),
            ("let f = fn() { let = 1; 2 }; let = 3;", 2),
            ("if (x) { let y; } else { y }; let 1;", 2),
            ("let g = fn() { if (a) { let = 1; } }; let h = 2; let ;", 2),
        ];

        for (input, expected) in tests {
            let errors = parse_errors(input);
            assert_eq!(errors.len(), expected, "input: {input}, errors: {errors:?}");
        }
    }

    #[test]
    fn test_recovery_reports_the_later_error() {
        let errors = parse_errors("let x = ; let = 5;");
        assert!(matches!(
            errors.as_slice(),
            [
                ParseError::NoPrefixFunction(Token {
                    kind: TokenKind::SemiColon,
                    ..
                }),
                ParseError::UnexpectedToken {
                    expected: Expected::Identifier,
                    got: Token {
                        kind: TokenKind::Assign,
                        ..
                    }
                }
            ]
        ));

        let errors = parse_errors("let f = fn() { let = 1; 2 }; let y = 3;");
        assert!(matches!(
            errors.as_slice(),
            [ParseError::UnexpectedToken {
                expected: Expected::Identifier,
                ..
            }]
        ));
    }
}
