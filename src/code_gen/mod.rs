use std::{
    fmt::{self, Write},
    format_args as f,
};

use crate::{
    ast::{Decl, Expr, ExprKind, Ident, Program, Stmt, Typed},
    symbol_table::SymbolTable,
    types::Type,
    util::intern::Interner,
};


const DEFAULT_CODE_CAPACITY: usize = 4 * 1024; // 4 KiB
const INDENT_WIDTH: usize = 4;

/// Emits C source for a typed program.
///
/// Every expression is flattened into a sequence of declarations of
/// temporaries (`t_1`, `t_2`, ...), one per literal and operator. Temporary
/// numbering is local to each generator.
///
/// Identifiers are emitted as written, so a program declaring a name such as
/// `t_1`, `main` or `printf` yields C that does not compile.
pub struct CodeGen<'a> {
    symbols: &'a SymbolTable,
    idents: &'a Interner,
    code: String,
    temps: Temps,
    depth: usize,
}

impl<'a> CodeGen<'a> {
    pub fn new(symbols: &'a SymbolTable, idents: &'a Interner) -> CodeGen<'a> {
        CodeGen {
            symbols,
            idents,
            code: String::with_capacity(DEFAULT_CODE_CAPACITY),
            temps: Temps::default(),
            depth: 0,
        }
    }

    pub fn gen(mut self, program: &Program<Typed>) -> String {
        self.gen_program(program);

        self.code
    }

    fn gen_program(&mut self, program: &Program<Typed>) {
        self.line(f!("#include <stdio.h>"));
        self.line(f!("int main(void) {{"));
        self.depth += 1;
        for decl in &program.decls {
            self.gen_decl(*decl);
        }
        for stmt in &program.stmts {
            self.gen_stmt(stmt);
        }
        self.line(f!("return 0;"));
        self.depth -= 1;
        self.line(f!("}}"));
    }

    fn gen_decl(&mut self, Decl { name, ty }: Decl) {
        let name = self.var(name);
        self.line(f!("{ty} {name};"));
    }

    fn gen_stmt(&mut self, stmt: &Stmt<Typed>) {
        match stmt {
            Stmt::Assignment { target, value } => {
                let value = self.gen_expr(value, None);
                let target = self.var(*target);
                self.line(f!("{target} = {value};"));
            }
            Stmt::Print(expr) => {
                let value = self.gen_expr(expr, None);
                let conv = expr.ty().conversion();
                self.line(f!("printf(\"{conv}\\n\", {value});"));
            }
            Stmt::Read(target) => {
                let Some(ty) = self.symbols.get(*target) else {
                    unreachable!("read target is checked to be declared");
                };
                let target = self.var(*target);
                let conv = ty.conversion();
                self.line(f!("scanf(\"{conv}\", &{target});"));
            }
            Stmt::While { predicate, body } => {
                let cond = self.gen_expr(predicate, None);
                self.line(f!("while ({cond}) {{"));
                self.depth += 1;
                for stmt in body {
                    self.gen_stmt(stmt);
                }
                // Refresh the condition for the next test.
                self.gen_expr(predicate, Some(cond));
                self.depth -= 1;
                self.line(f!("}}"));
            }
        }
    }

    /// Emits the code computing `expr` and returns where its value lives.
    ///
    /// When `dest` is given, the value is stored there instead of in a fresh
    /// temporary. An identifier is its own location, so it ignores `dest`.
    /// Operands are always evaluated left to right.
    fn gen_expr(&mut self, expr: &Expr<Typed>, dest: Option<Loc<'a>>) -> Loc<'a> {
        let ty = expr.ty();
        match &expr.kind {
            ExprKind::Int(value) => self.store(ty, dest, f!("{value}")),
            ExprKind::Float(value) => self.store(ty, dest, f!("{value:?}")),
            ExprKind::Id(name) => self.var(*name),
            ExprKind::Binary { op, lhs, rhs } => {
                let lhs = self.gen_expr(lhs, None);
                let rhs = self.gen_expr(rhs, None);
                let op = op.symbol();
                self.store(ty, dest, f!("{lhs} {op} {rhs}"))
            }
        }
    }

    /// Stores `value` into `dest`, or into a newly declared temporary.
    fn store(&mut self, ty: Type, dest: Option<Loc<'a>>, value: fmt::Arguments<'_>) -> Loc<'a> {
        match dest {
            Some(dest) => {
                self.line(f!("{dest} = {value};"));
                dest
            }
            None => {
                let temp = self.temps.fresh();
                self.line(f!("{ty} {temp} = {value};"));
                temp
            }
        }
    }

    fn var(&self, name: Ident) -> Loc<'a> {
        let idents: &'a Interner = self.idents;
        Loc::Var(idents.get(name))
    }
}

// Utility functions.
impl CodeGen<'_> {
    /// Emits a single indented line.
    fn line(&mut self, f: fmt::Arguments<'_>) {
        let indent = self.depth * INDENT_WIDTH;
        self.code
            .write_fmt(f!("{:indent$}{f}\n", ""))
            .expect("code emit should be infallible");
    }
}

/// Where a generated value lives: a source variable or a temporary.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Loc<'a> {
    Var(&'a str),
    Temp(u32),
}

impl fmt::Display for Loc<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Loc::Var(name) => f.write_str(name),
            Loc::Temp(n) => write!(f, "t_{n}"),
        }
    }
}

/// Mints temporaries in strictly increasing order, starting from `t_1`.
/// Temporaries are never reused.
#[derive(Default)]
struct Temps {
    last: u32,
}

impl Temps {
    fn fresh(&mut self) -> Loc<'static> {
        self.last += 1;
        Loc::Temp(self.last)
    }
}
