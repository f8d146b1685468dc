use std::{fmt, ops::Range};

use crate::types::Type;

#[derive(Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    lo: usize,
    len: u32,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Token {
        Token {
            kind,
            len: span.len,
            lo: span.lo,
        }
    }

    pub fn span(&self) -> Span {
        Span {
            len: self.len,
            lo: self.lo,
        }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token({:?}, {})", self.kind, self.span())
    }
}

#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Span {
    pub len: u32,
    pub lo: usize,
}

impl Span {
    pub fn new_of_bounds(Range { start: lo, end: hi }: Range<usize>) -> Span {
        debug_assert!(hi >= lo);
        let len = u32::try_from(hi - lo).unwrap_or(u32::MAX);
        Self::new_of_length(lo, len)
    }

    pub fn new_of_length(lo: usize, len: u32) -> Span {
        Span { len, lo }
    }

    pub fn hi(&self) -> usize {
        self.lo + self.len as usize
    }

    pub fn substr<'src>(&self, src: &'src str) -> &'src str {
        &src[self.lo..self.hi()]
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Span({self}, len: {})", self.len)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lo = self.lo;
        let hi = self.hi();
        write!(f, "{lo}..{hi}")
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Print,
    Read,
    Var,
    While,
    Do,
    Done,

    /// `=`
    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    Colon,
    Semicolon,

    Identifier(Box<str>),
    Int(i32),
    Float(f32),
    /// One of the type names, `int` or `float`.
    Type(Type),
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use TokenKind::*;
        match self {
            Print => f.write_str("`print`"),
            Read => f.write_str("`read`"),
            Var => f.write_str("`var`"),
            While => f.write_str("`while`"),
            Do => f.write_str("`do`"),
            Done => f.write_str("`done`"),
            Assign => f.write_str("`=`"),
            Plus => f.write_str("`+`"),
            Minus => f.write_str("`-`"),
            Star => f.write_str("`*`"),
            Slash => f.write_str("`/`"),
            LParen => f.write_str("`(`"),
            RParen => f.write_str("`)`"),
            Colon => f.write_str("`:`"),
            Semicolon => f.write_str("`;`"),
            Identifier(name) => write!(f, "identifier `{name}`"),
            Int(value) => write!(f, "integer literal `{value}`"),
            Float(value) => write!(f, "float literal `{value:?}`"),
            TokenKind::Type(ty) => write!(f, "type `{ty}`"),
        }
    }
}

pub static KEYWORDS: phf::Map<&'static str, TokenKind> = phf::phf_map! {
    "print" => TokenKind::Print,
    "read" => TokenKind::Read,
    "var" => TokenKind::Var,
    "while" => TokenKind::While,
    "do" => TokenKind::Do,
    "done" => TokenKind::Done,
    "int" => TokenKind::Type(Type::Int),
    "float" => TokenKind::Type(Type::Float),
};
