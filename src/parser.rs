use std::fmt;

use crate::{
    ast::{BinaryOperator, Decl, Expr, ExprKind, Ident, Program, Stmt, Untyped},
    token::{Token, TokenKind},
    types::Type,
    util::intern::Interner,
};

type Result<T, E = Error> = std::result::Result<T, E>;

/// Bounds both the nesting of expressions and loops and the height of
/// expression trees. Every later stage walks the tree recursively.
pub const MAX_DEPTH: usize = 512;

/// Parses a whole program out of the provided tokens.
pub fn parse_program(tokens: &[Token], idents: &mut Interner) -> Result<Program<Untyped>> {
    parse(tokens, idents, Parser::parse_program)
}

/// Parses a single expression. The expression must span all the tokens.
pub fn parse_expr(tokens: &[Token], idents: &mut Interner) -> Result<Expr<Untyped>> {
    parse(tokens, idents, |p| {
        let expr = p.parse_expr()?;
        p.expect_end()?;
        Ok(expr)
    })
}

fn parse<'tok, 'ident, T>(
    tokens: &'tok [Token],
    idents: &'ident mut Interner,
    f: impl FnOnce(&mut Parser<'tok, 'ident>) -> Result<T>,
) -> Result<T> {
    let mut p = Parser::new(tokens, idents);
    f(&mut p)
}

struct Parser<'tok, 'ident> {
    tokens: &'tok [Token],
    idents: &'ident mut Interner,
    cursor: usize,
    nesting: usize,
}

impl Parser<'_, '_> {
    fn parse_program(&mut self) -> Result<Program<Untyped>> {
        let mut decls = Vec::new();
        while self.is(&TokenKind::Var) {
            decls.push(self.parse_decl()?);
        }

        let mut stmts = Vec::new();
        while self.peek().is_some() {
            stmts.push(self.parse_stmt()?);
        }

        Ok(Program { decls, stmts })
    }

    fn parse_decl(&mut self) -> Result<Decl> {
        self.consume(&TokenKind::Var)?;
        let name = self.parse_ident()?;
        self.consume(&TokenKind::Colon)?;
        let ty = self.parse_type()?;
        self.consume(&TokenKind::Semicolon)?;
        Ok(Decl { name, ty })
    }

    fn parse_stmt(&mut self) -> Result<Stmt<Untyped>> {
        let stmt = match self.peek() {
            // Assignment: ID = expr ;
            Some(TokenKind::Identifier(_)) => {
                let target = self.parse_ident()?;
                self.consume(&TokenKind::Assign)?;
                let value = self.parse_expr()?;
                self.consume(&TokenKind::Semicolon)?;
                Stmt::Assignment { target, value }
            }

            // Print: print expr ;
            Some(TokenKind::Print) => {
                self.advance();
                let expr = self.parse_expr()?;
                self.consume(&TokenKind::Semicolon)?;
                Stmt::Print(expr)
            }

            // Read: read ID ;
            Some(TokenKind::Read) => {
                self.advance();
                let target = self.parse_ident()?;
                self.consume(&TokenKind::Semicolon)?;
                Stmt::Read(target)
            }

            // Loop: while expr do stmt* done
            Some(TokenKind::While) => {
                self.advance();
                let predicate = self.parse_expr()?;
                self.consume(&TokenKind::Do)?;
                let body = self.nested(Self::parse_body)?;
                self.consume(&TokenKind::Done)?;
                Stmt::While { predicate, body }
            }

            found => {
                return Err(Error::IllegalStatement {
                    found: found.cloned(),
                })
            }
        };
        Ok(stmt)
    }

    fn parse_body(&mut self) -> Result<Vec<Stmt<Untyped>>> {
        let mut body = Vec::new();
        while self.peek().is_some() && !self.is(&TokenKind::Done) {
            body.push(self.parse_stmt()?);
        }
        Ok(body)
    }

    fn parse_type(&mut self) -> Result<Type> {
        match self.peek() {
            Some(&TokenKind::Type(ty)) => {
                self.advance();
                Ok(ty)
            }
            found => Err(Error::Unexpected {
                expected: Expected::TypeName,
                found: found.cloned(),
            }),
        }
    }

    fn parse_ident(&mut self) -> Result<Ident> {
        match self.peek() {
            Some(TokenKind::Identifier(name)) => {
                let ident = self.idents.intern(name);
                self.advance();
                Ok(ident)
            }
            found => Err(Error::Unexpected {
                expected: Expected::Identifier,
                found: found.cloned(),
            }),
        }
    }

    fn parse_expr(&mut self) -> Result<Expr<Untyped>> {
        self.parse_expr_bp(0).map(|(expr, _height)| expr)
    }

    /// Precedence climbing. Operators whose left binding power is below
    /// `min_bp` are left for an outer call, which folds them into a
    /// left-leaning tree.
    ///
    /// Also returns the height of the produced tree, a leaf being of height
    /// zero.
    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<(Expr<Untyped>, usize)> {
        self.nested(|p| {
            let (mut lhs, mut height) = p.parse_factor()?;

            while let Some((op, (lbp, rbp))) = p.peek().and_then(Self::infix_binding_power) {
                if lbp < min_bp {
                    // Operator binds less tightly than the minimum required
                    break;
                }
                p.advance(); // Operator
                let (rhs, rhs_height) = p.parse_expr_bp(rbp)?;
                height = 1 + height.max(rhs_height);
                if height > MAX_DEPTH {
                    return Err(Error::TooDeep);
                }
                lhs = Expr::untyped(ExprKind::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                });
            }

            Ok((lhs, height))
        })
    }

    /// Parses the tightest-binding expressions: literals, identifiers and
    /// parenthesized expressions.
    fn parse_factor(&mut self) -> Result<(Expr<Untyped>, usize)> {
        let kind = match self.peek() {
            Some(TokenKind::LParen) => {
                self.advance();
                let parsed = self.parse_expr_bp(0)?;
                self.consume(&TokenKind::RParen)?;
                return Ok(parsed);
            }
            Some(&TokenKind::Int(value)) => {
                self.advance();
                ExprKind::Int(value)
            }
            Some(&TokenKind::Float(value)) => {
                self.advance();
                ExprKind::Float(value)
            }
            Some(TokenKind::Identifier(_)) => ExprKind::Id(self.parse_ident()?),
            found => {
                return Err(Error::UnexpectedTokenInExpr {
                    found: found.cloned(),
                })
            }
        };
        Ok((Expr::untyped(kind), 0))
    }

    /// Both levels are left-associative, hence `lbp < rbp`.
    fn infix_binding_power(kind: &TokenKind) -> Option<(BinaryOperator, (u8, u8))> {
        let bp = match kind {
            TokenKind::Plus => (BinaryOperator::Add, (1, 2)),
            TokenKind::Minus => (BinaryOperator::Sub, (1, 2)),
            TokenKind::Star => (BinaryOperator::Mul, (3, 4)),
            TokenKind::Slash => (BinaryOperator::Div, (3, 4)),
            _ => return None,
        };
        Some(bp)
    }
}

impl<'tok, 'ident> Parser<'tok, 'ident> {
    fn new(tokens: &'tok [Token], idents: &'ident mut Interner) -> Parser<'tok, 'ident> {
        Parser {
            tokens,
            idents,
            cursor: 0,
            nesting: 0,
        }
    }

    /// Returns the current token kind, or `None` at the end of input.
    fn peek(&self) -> Option<&'tok TokenKind> {
        self.tokens.get(self.cursor).map(|token| &token.kind)
    }

    /// Runs `f` one nesting level deeper, failing once `MAX_DEPTH` is
    /// reached.
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.nesting >= MAX_DEPTH {
            return Err(Error::TooDeep);
        }
        self.nesting += 1;
        let result = f(self);
        self.nesting -= 1;
        result
    }

    /// Moves past the current token.
    fn advance(&mut self) {
        debug_assert!(self.cursor < self.tokens.len(), "advanced past the end");
        self.cursor += 1;
    }

    /// Checks whether the current token matches the given one.
    fn is(&self, expect: &TokenKind) -> bool {
        self.peek() == Some(expect)
    }

    /// Advances if the current token matches the provided one. If not,
    /// fails with the expected and found kinds.
    fn consume(&mut self, expect: &TokenKind) -> Result<()> {
        if self.is(expect) {
            self.advance();
            Ok(())
        } else {
            Err(Error::Unexpected {
                expected: Expected::Token(expect.clone()),
                found: self.peek().cloned(),
            })
        }
    }

    fn expect_end(&self) -> Result<()> {
        match self.peek() {
            None => Ok(()),
            Some(found) => Err(Error::TrailingInput {
                found: found.clone(),
            }),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    Unexpected {
        expected: Expected,
        /// `None` at the end of input.
        found: Option<TokenKind>,
    },
    IllegalStatement {
        found: Option<TokenKind>,
    },
    UnexpectedTokenInExpr {
        found: Option<TokenKind>,
    },
    TrailingInput {
        found: TokenKind,
    },
    TooDeep,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expected {
    Token(TokenKind),
    Identifier,
    TypeName,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Token(kind) => write!(f, "{kind}"),
            Expected::Identifier => f.write_str("an identifier"),
            Expected::TypeName => f.write_str("a type name"),
        }
    }
}

/// Renders the found token, or the end of input.
pub(crate) struct Found<'a>(pub &'a Option<TokenKind>);

impl fmt::Display for Found<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(kind) => write!(f, "{kind}"),
            None => f.write_str("end of input"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Unexpected { expected, found } => {
                write!(f, "expected {expected}, but got {}", Found(found))
            }
            Error::IllegalStatement { found } => {
                write!(f, "illegal statement starting with {}", Found(found))
            }
            Error::UnexpectedTokenInExpr { found } => {
                write!(f, "unexpected {} in expression", Found(found))
            }
            Error::TrailingInput { found } => write!(f, "unexpected {found} after expression"),
            Error::TooDeep => write!(f, "nesting is too deep (the limit is {MAX_DEPTH})"),
        }
    }
}
