use crate::{pipeline, symbol_table, type_checker, util::fmt::Show};

impl Show for symbol_table::Error {
    fn show(&self, f: &mut std::fmt::Formatter<'_>, ctx: &super::Context<'_>) -> std::fmt::Result {
        let i = ctx.idents;
        match self {
            symbol_table::Error::DuplicateDeclaration(name) => {
                let name = i.get(name);
                write!(f, "{name} is already declared")
            }
        }
    }
}

impl Show for type_checker::Error {
    fn show(&self, f: &mut std::fmt::Formatter<'_>, ctx: &super::Context<'_>) -> std::fmt::Result {
        let i = ctx.idents;

        use type_checker::Error::*;
        match self {
            UndeclaredVariable(name) => {
                let name = i.get(name);
                write!(f, "undeclared variable: {name}")
            }
            OperandMismatch { lhs, rhs } => {
                write!(f, "operands must have the same type, but got {lhs} and {rhs}")
            }
            AssignmentMismatch {
                target,
                expected,
                actual,
            } => {
                let target = i.get(target);
                write!(
                    f,
                    "cannot assign to {target}: expected type {expected}, but got {actual}"
                )
            }
            NonIntCondition(actual) => {
                write!(f, "loop condition must be an int, but got {actual}")
            }
        }
    }
}

impl Show for pipeline::Error {
    fn show(&self, f: &mut std::fmt::Formatter<'_>, ctx: &super::Context<'_>) -> std::fmt::Result {
        match self {
            pipeline::Error::Lexer(error) => write!(f, "{error}"),
            pipeline::Error::Parser(error) => write!(f, "{error}"),
            pipeline::Error::SymbolTable(error) => error.show(f, ctx),
            pipeline::Error::TypeChecker(error) => error.show(f, ctx),
        }
    }
}
