use crate::{
    ast::{Expr, ExprKind, Ident, Program, Stmt, Typed, Untyped},
    symbol_table::SymbolTable,
    types::Type,
};

type Result<T, E = Error> = std::result::Result<T, E>;

pub struct Checker<'sym> {
    symbols: &'sym SymbolTable,
}

impl<'sym> Checker<'sym> {
    pub fn new(symbols: &'sym SymbolTable) -> Checker<'sym> {
        Checker { symbols }
    }

    /// Checks the program's statements, mapping the untyped tree into a typed
    /// one. Declarations are moved over unchanged.
    pub fn check(&self, program: Program<Untyped>) -> Result<Program<Typed>> {
        let stmts = self.check_stmts(program.stmts)?;
        Ok(Program {
            decls: program.decls,
            stmts,
        })
    }

    fn check_stmts(&self, stmts: Vec<Stmt<Untyped>>) -> Result<Vec<Stmt<Typed>>> {
        stmts
            .into_iter()
            .map(|stmt| self.check_stmt(stmt))
            .collect()
    }

    fn check_stmt(&self, stmt: Stmt<Untyped>) -> Result<Stmt<Typed>> {
        let typed = match stmt {
            Stmt::Assignment { target, value } => {
                let value = self.check_expr(value)?;
                let expected = self.lookup(target)?;
                if value.ty() != expected {
                    return Err(Error::AssignmentMismatch {
                        target,
                        expected,
                        actual: value.ty(),
                    });
                }
                Stmt::Assignment { target, value }
            }
            Stmt::Print(expr) => Stmt::Print(self.check_expr(expr)?),
            Stmt::Read(target) => {
                // The generator picks the conversion from the declared type.
                self.lookup(target)?;
                Stmt::Read(target)
            }
            Stmt::While { predicate, body } => {
                let predicate = self.check_expr(predicate)?;
                if predicate.ty() != Type::Int {
                    return Err(Error::NonIntCondition(predicate.ty()));
                }
                let body = self.check_stmts(body)?;
                Stmt::While { predicate, body }
            }
        };
        Ok(typed)
    }

    fn check_expr(&self, expr: Expr<Untyped>) -> Result<Expr<Typed>> {
        let (kind, ty) = match expr.kind {
            ExprKind::Int(value) => (ExprKind::Int(value), Type::Int),
            ExprKind::Float(value) => (ExprKind::Float(value), Type::Float),
            ExprKind::Id(name) => (ExprKind::Id(name), self.lookup(name)?),
            ExprKind::Binary { op, lhs, rhs } => {
                let lhs = self.check_expr(*lhs)?;
                let rhs = self.check_expr(*rhs)?;
                if lhs.ty() != rhs.ty() {
                    return Err(Error::OperandMismatch {
                        lhs: lhs.ty(),
                        rhs: rhs.ty(),
                    });
                }
                let ty = lhs.ty();
                let kind = ExprKind::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                };
                (kind, ty)
            }
        };
        Ok(Expr { kind, info: ty })
    }

    fn lookup(&self, name: Ident) -> Result<Type> {
        self.symbols
            .get(name)
            .ok_or(Error::UndeclaredVariable(name))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    UndeclaredVariable(Ident),
    OperandMismatch {
        lhs: Type,
        rhs: Type,
    },
    AssignmentMismatch {
        target: Ident,
        expected: Type,
        actual: Type,
    },
    NonIntCondition(Type),
}
