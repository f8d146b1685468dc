use std::{fmt, iter::Peekable};

use crate::token::{Span, Token, TokenKind, KEYWORDS};

pub const SUGGESTED_TOKENS_CAPACITY: usize = 8_192;

type Result<T, E = Error> = std::result::Result<T, E>;

/// Lexes the provided string, producing the tokens into the provided buffer.
/// Any tokens already in the buffer are discarded.
///
/// Lexing stops at the first invalid input. In that case the buffer holds
/// the tokens produced so far and the error is returned.
pub fn lex(src: &str, tokens: &mut Vec<Token>) -> Result<()> {
    Lexer::new(src, tokens).lex()
}

/// A convenience function that allocates a new buffer per lexed input and
/// returns it.
pub fn lex_in_new(src: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::with_capacity(src.len() / 2);
    lex(src, &mut tokens)?;
    Ok(tokens)
}

/// The Minilang lexer
struct Lexer<'src, 'tok> {
    src: &'src str,
    iter: Peekable<std::str::Chars<'src>>,
    cursor: usize,
    current_lo: usize,
    tokens: &'tok mut Vec<Token>,
}

impl Lexer<'_, '_> {
    /// Scans the source string until the input is exhausted.
    ///
    /// Whitespace and comments are skipped; every other lexeme is written
    /// into the provided tokens buffer.
    fn lex(mut self) -> Result<()> {
        self.tokens.clear();
        while let Some(current) = self.mark_advance() {
            if let Some(kind) = self.scan_token_kind(current)? {
                self.produce(kind);
            }
        }
        Ok(())
    }

    /// Scans the token which starts with the given character. Returns `None`
    /// for trivia.
    fn scan_token_kind(&mut self, current: char) -> Result<Option<TokenKind>> {
        use TokenKind::*;
        let kind = match current {
            '=' => Assign,
            '+' => Plus,
            '-' => Minus,
            '*' => Star,
            '/' => Slash,
            '(' => LParen,
            ')' => RParen,
            ':' => Colon,
            ';' => Semicolon,
            '#' => {
                self.comment();
                return Ok(None);
            }
            c if c.is_ascii_whitespace() => return Ok(None),
            c if c.is_ascii_digit() => self.number()?,
            c if c.is_ascii_alphabetic() || c == '_' => self.identifier_or_keyword(),
            c => return Err(Error::InvalidCharacter(c)),
        };
        Ok(Some(kind))
    }

    fn identifier_or_keyword(&mut self) -> TokenKind {
        let valid_identifier_suffix = |c: char| c.is_ascii_alphanumeric() || c == '_';

        while self.peek().is_some_and(valid_identifier_suffix) {
            self.advance();
        }
        let substr = self.substr();
        match KEYWORDS.get(substr).cloned() {
            Some(keyword) => keyword,
            None => TokenKind::Identifier(Box::from(substr)),
        }
    }

    /// Scans an integer literal, or a float literal if the digits are
    /// followed by a dot. The fractional digits may be empty (`1.`).
    ///
    /// Literals are emitted as C `int` and `float`, so they must fit an
    /// `i32` and a finite `f32` respectively.
    fn number(&mut self) -> Result<TokenKind> {
        self.digits();
        if self.peek() != Some('.') {
            return match self.substr().parse() {
                Ok(value) => Ok(TokenKind::Int(value)),
                Err(_) => Err(Error::IntegerOutOfRange(Box::from(self.substr()))),
            };
        }
        self.advance();
        self.digits();
        match self.substr().parse::<f32>() {
            Ok(value) if value.is_finite() => Ok(TokenKind::Float(value)),
            Ok(_) => Err(Error::FloatOutOfRange(Box::from(self.substr()))),
            Err(_) => unreachable!("`digits '.' digits` is always a valid float"),
        }
    }

    fn digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    /// Skips a line comment. The comment ends right before the next line
    /// break, or at the end of the input.
    fn comment(&mut self) {
        while self.peek().is_some_and(|c| c != '\n') {
            self.advance();
        }
    }
}

impl Lexer<'_, '_> {
    /// Constructs a new lexer with the default state.
    fn new<'src, 'tok>(src: &'src str, tokens: &'tok mut Vec<Token>) -> Lexer<'src, 'tok> {
        Lexer {
            src,
            iter: src.chars().peekable(),
            cursor: 0,
            current_lo: 0,
            tokens,
        }
    }

    /// Starts a new token "mark" and advances the iterator.
    fn mark_advance(&mut self) -> Option<char> {
        self.current_lo = self.cursor;
        self.advance()
    }

    /// Returns the next char and advances the iterator.
    fn advance(&mut self) -> Option<char> {
        self.iter
            .next()
            .inspect(|c| self.cursor += c.len_utf8())
    }

    /// Returns the next char without advancing the iterator.
    fn peek(&mut self) -> Option<char> {
        self.iter.peek().copied()
    }

    /// Returns the current span.
    fn span(&self) -> Span {
        Span::new_of_bounds(self.current_lo..self.cursor)
    }

    /// Returns the substring of the current marked bounds.
    fn substr(&self) -> &str {
        self.span().substr(self.src)
    }

    /// Produces a token using the marked bounds.
    fn produce(&mut self, kind: TokenKind) {
        self.tokens.push(Token::new(kind, self.span()));
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    InvalidCharacter(char),
    IntegerOutOfRange(Box<str>),
    FloatOutOfRange(Box<str>),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidCharacter(c) => write!(f, "invalid character: {c:?}"),
            Error::IntegerOutOfRange(lexeme) => {
                write!(f, "integer literal {lexeme} is out of range")
            }
            Error::FloatOutOfRange(lexeme) => write!(f, "float literal {lexeme} is out of range"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Type as Ty;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_demo_programs_lex() {
        for input in [
            include_str!("../demos/countdown.mini"),
            include_str!("../demos/sum.mini"),
            include_str!("../demos/circle.mini"),
            include_str!("../demos/big.mini"),
        ] {
            assert!(lex_in_new(input).is_ok());
        }
    }

    #[test]
    fn tests_with_span() {
        use TokenKind::*;
        let cases = cases!(match .. {
            "=+-*/():;" => [
                (Assign, 0..1),
                (Plus, 1..2),
                (Minus, 2..3),
                (Star, 3..4),
                (Slash, 4..5),
                (LParen, 5..6),
                (RParen, 6..7),
                (Colon, 7..8),
                (Semicolon, 8..9),
            ],
            "print read var while do done" => [
                (Print, 0..5),
                (Read, 6..10),
                (Var, 11..14),
                (While, 15..20),
                (Do, 21..23),
                (Done, 24..28),
            ],
            "int float Int printer _done" => [
                (Type(Ty::Int), 0..3),
                (Type(Ty::Float), 4..9),
                (Identifier("Int".into()), 10..13),
                (Identifier("printer".into()), 14..21),
                (Identifier("_done".into()), 22..27),
            ],
            "1/11/007/123456789" => [
                (Int(1), 0..1),
                (Slash, 1..2),
                (Int(11), 2..4),
                (Slash, 4..5),
                (Int(7), 5..8),
                (Slash, 8..9),
                (Int(123_456_789), 9..18),
            ],
            "1.5 2. 0.25 3.x" => [
                (Float(1.5), 0..3),
                (Float(2.0), 4..6),
                (Float(0.25), 7..11),
                (Float(3.0), 12..14),
                (Identifier("x".into()), 14..15),
            ],
            "a1b2 9lives" => [
                (Identifier("a1b2".into()), 0..4),
                (Int(9), 5..6),
                (Identifier("lives".into()), 6..11),
            ],
            "x = 1; # set x\nprint x;" => [
                (Identifier("x".into()), 0..1),
                (Assign, 2..3),
                (Int(1), 4..5),
                (Semicolon, 5..6),
                (Print, 15..20),
                (Identifier("x".into()), 21..22),
                (Semicolon, 22..23),
            ],
            "print 1; # no trailing line break" => [
                (Print, 0..5),
                (Int(1), 6..7),
                (Semicolon, 7..8),
            ],
            "# only a comment\n\t  \n" => [],
            "" => [],
        });

        for (input, tokens) in cases {
            let lexed = lex_in_new(input).expect("failed to lex");
            assert_eq!(lexed, tokens.as_slice(), "input: {input:?}");
        }
    }

    #[test]
    fn test_errors() {
        let cases: &[(&str, Error)] = &[
            ("x = 1 $ 2;", Error::InvalidCharacter('$')),
            ("x = 1.5.2;", Error::InvalidCharacter('.')),
            ("print x < y;", Error::InvalidCharacter('<')),
            ("var é: int;", Error::InvalidCharacter('é')),
            (
                "x = 99999999999999999999;",
                Error::IntegerOutOfRange("99999999999999999999".into()),
            ),
            (
                "print 2147483648;",
                Error::IntegerOutOfRange("2147483648".into()),
            ),
            (
                "print 1000000000000000000000000000000000000000.0;",
                Error::FloatOutOfRange("1000000000000000000000000000000000000000.0".into()),
            ),
        ];
        for (input, expected) in cases {
            assert_eq!(lex_in_new(input).as_ref(), Err(expected), "input: {input:?}");
        }
    }

    #[test]
    fn test_literal_limits() {
        let lexed = lex_in_new("2147483647 340282350000000000000000000000000000000.0")
            .expect("failed to lex");
        let kinds: Vec<_> = lexed.into_iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            [TokenKind::Int(i32::MAX), TokenKind::Float(f32::MAX)]
        );
    }

    #[test]
    fn test_reused_buffer() {
        let mut tokens = Vec::with_capacity(SUGGESTED_TOKENS_CAPACITY);
        lex("print 1;", &mut tokens).expect("failed to lex");
        lex("done", &mut tokens).expect("failed to lex");
        assert_eq!(tokens, [Token::new(TokenKind::Done, Span::new_of_bounds(0..4))]);
    }

    #[test]
    fn test_partial_output_on_error() {
        let mut tokens = Vec::new();
        let result = lex("print 1 ?", &mut tokens);
        assert_eq!(result, Err(Error::InvalidCharacter('?')));
        let kinds: Vec<_> = tokens.into_iter().map(|t| t.kind).collect();
        assert_eq!(kinds, [TokenKind::Print, TokenKind::Int(1)]);
    }

    #[test]
    fn test_deterministic() {
        let input = include_str!("../demos/big.mini");
        assert_eq!(lex_in_new(input), lex_in_new(input));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            Error::InvalidCharacter('$').to_string(),
            "invalid character: '$'"
        );
        assert_eq!(
            Error::IntegerOutOfRange("123".into()).to_string(),
            "integer literal 123 is out of range"
        );
    }

    macro_rules! cases {
        (match .. {
            $($str:expr => [$(($kind:expr, $range:expr)),* $(,)?]),* $(,)?
        }) => {{
            &[$((
                $str,
                vec![
                    $(Token::new($kind, Span::new_of_bounds($range.start..$range.end))),*
                ],
            )),*]
        }};
    }
    use cases;
}
