use std::fmt::Display;
use std::rc::Rc;

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum TokenKind {
    Illegal(Rc<str>),
    Ident(Rc<str>),
    Int(Rc<str>),
    String(Rc<str>),

    // Operators
    Assign,
    Plus,
    Minus,
    Bang,
    Asterisk,
    Slash,

    Equal,
    NotEqual,

    GreaterThan,
    LessThan,

    Comma,
    Colon,
    SemiColon,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,

    // Keywords
    Function,
    Let,
    True,
    False,
    If,
    Else,
    Return,
}

/// A token together with the byte range it was read from.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

fn keywords(ident: &str) -> Option<TokenKind> {
    match ident {
        "fn" => Some(TokenKind::Function),
        "let" => Some(TokenKind::Let),
        "true" => Some(TokenKind::True),
        "false" => Some(TokenKind::False),
        "if" => Some(TokenKind::If),
        "else" => Some(TokenKind::Else),
        "return" => Some(TokenKind::Return),
        _ => None,
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use TokenKind::*;
        let literal = match self {
            Illegal(value) | Ident(value) | Int(value) | String(value) => value.as_ref(),
            Assign => "=",
            Plus => "+",
            Minus => "-",
            Bang => "!",
            Asterisk => "*",
            Slash => "/",
            Equal => "==",
            NotEqual => "!=",
            GreaterThan => ">",
            LessThan => "<",
            Comma => ",",
            Colon => ":",
            SemiColon => ";",
            LParen => "(",
            RParen => ")",
            LBrace => "{",
            RBrace => "}",
            LBracket => "[",
            RBracket => "]",
            Function => "fn",
            Let => "let",
            True => "true",
            False => "false",
            If => "if",
            Else => "else",
            Return => "return",
        };
        write!(f, "{}", literal)
    }
}

/// Turns source text into tokens. The iterator running out plays the role of
/// the end-of-file token.
#[derive(Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    iter: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        let iter = input.char_indices().peekable();
        Self { input, iter }
    }

    fn is_letter(ch: char) -> bool {
        ch.is_ascii_alphabetic() || ch == '_'
    }

    fn token(&mut self, kind: TokenKind, start: usize) -> Token {
        Token {
            kind,
            start,
            end: self.next_idx(),
        }
    }

    /// Emits `double` if the next character is `second`, `single` otherwise.
    fn one_or_two(
        &mut self,
        start: usize,
        second: char,
        double: TokenKind,
        single: TokenKind,
    ) -> Token {
        if self.iter.next_if(|(_, ch)| *ch == second).is_some() {
            self.token(double, start)
        } else {
            self.token(single, start)
        }
    }

    fn read_identifier(&mut self, start: usize) -> Token {
        while self.iter.next_if(|(_, ch)| Self::is_letter(*ch)).is_some() {}

        let end = self.next_idx();
        let ident = &self.input[start..end];
        let kind = keywords(ident).unwrap_or_else(|| TokenKind::Ident(ident.into()));
        self.token(kind, start)
    }

    fn read_number(&mut self, start: usize) -> Token {
        while self.iter.next_if(|(_, ch)| ch.is_ascii_digit()).is_some() {}

        let end = self.next_idx();
        let digits = &self.input[start..end];
        self.token(TokenKind::Int(digits.into()), start)
    }

    fn read_string(&mut self, start: usize) -> Token {
        loop {
            match self.iter.next() {
                Some((_, '"')) => break,
                None => {
                    return self.token(TokenKind::Illegal("unterminated string".into()), start)
                }
                _ => {}
            }
        }

        let end = self.next_idx();
        let string = &self.input[start..end];
        self.token(TokenKind::String(string.into()), start)
    }

    fn next_idx(&mut self) -> usize {
        self.iter
            .peek()
            .map(|(idx, _)| *idx)
            .unwrap_or(self.input.len())
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        while self.iter.next_if(|(_, ch)| ch.is_whitespace()).is_some() {}

        let (idx, ch) = self.iter.next()?;
        let tok = match ch {
            '=' => self.one_or_two(idx, '=', TokenKind::Equal, TokenKind::Assign),
            '!' => self.one_or_two(idx, '=', TokenKind::NotEqual, TokenKind::Bang),
            '+' => self.token(TokenKind::Plus, idx),
            '-' => self.token(TokenKind::Minus, idx),
            '*' => self.token(TokenKind::Asterisk, idx),
            '/' => self.token(TokenKind::Slash, idx),
            '<' => self.token(TokenKind::LessThan, idx),
            '>' => self.token(TokenKind::GreaterThan, idx),
            ',' => self.token(TokenKind::Comma, idx),
            ':' => self.token(TokenKind::Colon, idx),
            ';' => self.token(TokenKind::SemiColon, idx),
            '(' => self.token(TokenKind::LParen, idx),
            ')' => self.token(TokenKind::RParen, idx),
            '{' => self.token(TokenKind::LBrace, idx),
            '}' => self.token(TokenKind::RBrace, idx),
            '[' => self.token(TokenKind::LBracket, idx),
            ']' => self.token(TokenKind::RBracket, idx),
            '"' => self.read_string(idx),
            c if Tokenizer::is_letter(c) => self.read_identifier(idx),
            c if c.is_ascii_digit() => self.read_number(idx),
            _ => self.token(TokenKind::Illegal(ch.to_string().into()), idx),
        };
        Some(tok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Tokenizer::new(input).map(|token| token.kind).collect()
    }

    #[test]
    fn test_spans() {
        let output = Tokenizer::new("=+(){},;").collect::<Vec<_>>();
        let spans = output
            .iter()
            .map(|token| (token.start, token.end))
            .collect::<Vec<_>>();

        assert_eq!(
            spans,
            vec![(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 6), (6, 7), (7, 8)]
        );

        let output = Tokenizer::new("a == bc").collect::<Vec<_>>();
        assert_eq!(
            output,
            vec![
                Token {
                    kind: TokenKind::Ident("a".into()),
                    start: 0,
                    end: 1
                },
                Token {
                    kind: TokenKind::Equal,
                    start: 2,
                    end: 4
                },
                Token {
                    kind: TokenKind::Ident("bc".into()),
                    start: 5,
                    end: 7
                },
            ]
        );
    }

    #[test]
    fn test_statements() {
        let input = "let five = 5;
    let add = fn(x, y) {
    x + y;
    };
    let result = add(five, 10);
    ";
        let expected_output = vec![
            TokenKind::Let,
            TokenKind::Ident("five".into()),
            TokenKind::Assign,
            TokenKind::Int("5".into()),
            TokenKind::SemiColon,
            TokenKind::Let,
            TokenKind::Ident("add".into()),
            TokenKind::Assign,
            TokenKind::Function,
            TokenKind::LParen,
            TokenKind::Ident("x".into()),
            TokenKind::Comma,
            TokenKind::Ident("y".into()),
            TokenKind::RParen,
            TokenKind::LBrace,
            TokenKind::Ident("x".into()),
            TokenKind::Plus,
            TokenKind::Ident("y".into()),
            TokenKind::SemiColon,
            TokenKind::RBrace,
            TokenKind::SemiColon,
            TokenKind::Let,
            TokenKind::Ident("result".into()),
            TokenKind::Assign,
            TokenKind::Ident("add".into()),
            TokenKind::LParen,
            TokenKind::Ident("five".into()),
            TokenKind::Comma,
            TokenKind::Int("10".into()),
            TokenKind::RParen,
            TokenKind::SemiColon,
        ];

        assert_eq!(kinds(input), expected_output)
    }

    #[test]
    fn test_operators() {
        let expected_output = vec![
            TokenKind::Bang,
            TokenKind::Minus,
            TokenKind::Slash,
            TokenKind::Asterisk,
            TokenKind::Int("5".into()),
            TokenKind::SemiColon,
            TokenKind::Int("5".into()),
            TokenKind::LessThan,
            TokenKind::Int("10".into()),
            TokenKind::GreaterThan,
            TokenKind::Int("5".into()),
            TokenKind::SemiColon,
            TokenKind::Int("10".into()),
            TokenKind::Equal,
            TokenKind::Int("10".into()),
            TokenKind::NotEqual,
            TokenKind::Int("9".into()),
        ];

        assert_eq!(kinds("!-/*5;\n 5 < 10 > 5;\n 10 == 10 != 9"), expected_output)
    }

    #[test]
    fn test_keywords() {
        let expected_output = vec![
            TokenKind::If,
            TokenKind::LParen,
            TokenKind::Int("5".into()),
            TokenKind::LessThan,
            TokenKind::Int("10".into()),
            TokenKind::RParen,
            TokenKind::LBrace,
            TokenKind::Return,
            TokenKind::True,
            TokenKind::SemiColon,
            TokenKind::RBrace,
            TokenKind::Else,
            TokenKind::LBrace,
            TokenKind::Return,
            TokenKind::False,
            TokenKind::SemiColon,
            TokenKind::RBrace,
        ];

        assert_eq!(
            kinds("if (5 < 10) {\n return true;\n } else {\n return false;\n }"),
            expected_output
        )
    }

    #[test]
    fn test_collections_and_strings() {
        let expected_output = vec![
            TokenKind::LBrace,
            TokenKind::String("\"one\"".into()),
            TokenKind::Colon,
            TokenKind::LBracket,
            TokenKind::Int("1".into()),
            TokenKind::Comma,
            TokenKind::String("\"foo bar\"".into()),
            TokenKind::RBracket,
            TokenKind::RBrace,
        ];

        assert_eq!(kinds(r#"{"one": [1, "foo bar"]}"#), expected_output)
    }

    #[test]
    fn test_illegal_input() {
        assert_eq!(
            kinds("a @ \"open"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::Illegal("@".into()),
                TokenKind::Illegal("unterminated string".into()),
            ]
        )
    }

    #[test]
    fn test_display_round_trips_literals() {
        let rendered = Tokenizer::new("let x = fn(a) { a != 10 };")
            .map(|token| token.kind.to_string())
            .collect::<Vec<_>>()
            .join(" ");

        assert_eq!(rendered, "let x = fn ( a ) { a != 10 } ;")
    }
}
