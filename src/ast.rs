// program ::= decl* stmt*
// decl ::= var ID ':' TYPE ';'
// stmt ::= ID '=' expr ';'
//        | print expr ';'
//        | read ID ';'
//        | while expr do stmt* done
// expr ::= term (('+' | '-') term)*
// term ::= factor (('*' | '/') factor)*
// factor ::= '(' expr ')'
//          | integer
//          | float
//          | ID

// Precedence
//
// * /
// + -

use std::fmt;

use crate::{types::Type, util::intern::Interned};

pub type Ident = Interned;

/// Describes which information an AST carries on its expressions.
///
/// The parser produces `Program<Untyped>`; the type checker maps it into a
/// fresh `Program<Typed>`, in which every expression knows its type.
pub trait Info {
    type Expr: fmt::Debug + Clone + PartialEq;
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Untyped;

impl Info for Untyped {
    type Expr = ();
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Typed;

impl Info for Typed {
    type Expr = Type;
}

#[derive(Debug, PartialEq)]
pub struct Program<I: Info> {
    pub decls: Vec<Decl>,
    pub stmts: Vec<Stmt<I>>,
}

impl<I: Info> Default for Program<I> {
    fn default() -> Self {
        Program {
            decls: Vec::new(),
            stmts: Vec::new(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Decl {
    pub name: Ident,
    pub ty: Type,
}

#[derive(Debug, PartialEq)]
pub enum Stmt<I: Info> {
    Assignment {
        target: Ident,
        value: Expr<I>,
    },
    Print(Expr<I>),
    Read(Ident),
    While {
        predicate: Expr<I>,
        body: Vec<Stmt<I>>,
    },
}

#[derive(Debug, PartialEq)]
pub struct Expr<I: Info> {
    pub kind: ExprKind<I>,
    pub info: I::Expr,
}

impl Expr<Untyped> {
    pub fn untyped(kind: ExprKind<Untyped>) -> Self {
        Expr { kind, info: () }
    }
}

impl Expr<Typed> {
    pub fn ty(&self) -> Type {
        self.info
    }
}

#[derive(Debug, PartialEq)]
pub enum ExprKind<I: Info> {
    Binary {
        op: BinaryOperator,
        lhs: Box<Expr<I>>,
        rhs: Box<Expr<I>>,
    },
    Id(Ident),
    Int(i32),
    Float(f32),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOperator {
    /// The operator's symbol, shared by Minilang and C.
    pub const fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
        }
    }
}
