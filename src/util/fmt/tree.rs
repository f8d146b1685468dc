use std::io::Write;

use crate::{ast::*, types::Type, util::intern::Interner};

const INDENT_WIDTH: usize = 2;

pub fn print_program_string<I: InfoWriter>(idents: &Interner, program: &Program<I>) -> String {
    let mut buf = Vec::with_capacity(1024);
    print_program(&mut buf, idents, program).unwrap();
    String::from_utf8(buf).unwrap()
}

pub fn print_expr_string<I: InfoWriter>(idents: &Interner, expr: &Expr<I>) -> String {
    let mut buf = Vec::with_capacity(512);
    print_expr(&mut buf, idents, 0, expr).unwrap();
    String::from_utf8(buf).unwrap()
}

pub fn print_program<I: InfoWriter>(
    w: &mut impl Write,
    idents: &Interner,
    program: &Program<I>,
) -> std::io::Result<()> {
    for Decl { name, ty } in &program.decls {
        writeln!(w, "decl {}: {ty}", idents.get(name))?;
    }
    for stmt in &program.stmts {
        print_stmt(w, idents, 0, stmt)?;
    }
    Ok(())
}

fn print_stmt<I: InfoWriter>(
    w: &mut impl Write,
    idents: &Interner,
    i: usize,
    stmt: &Stmt<I>,
) -> std::io::Result<()> {
    sp(w, i)?;
    match stmt {
        Stmt::Assignment { target, value } => {
            writeln!(w, "assignment {}", idents.get(target))?;
            print_expr(w, idents, i + 1, value)?;
        }
        Stmt::Print(expr) => {
            writeln!(w, "print")?;
            print_expr(w, idents, i + 1, expr)?;
        }
        Stmt::Read(target) => {
            writeln!(w, "read {}", idents.get(target))?;
        }
        Stmt::While { predicate, body } => {
            writeln!(w, "while")?;
            print_expr(w, idents, i + 1, predicate)?;
            sp(w, i + 1)?;
            writeln!(w, "body")?;
            for stmt in body {
                print_stmt(w, idents, i + 2, stmt)?;
            }
        }
    }
    Ok(())
}

pub fn print_expr<I: InfoWriter>(
    w: &mut impl Write,
    idents: &Interner,
    i: usize,
    expr: &Expr<I>,
) -> std::io::Result<()> {
    sp(w, i)?;
    let info = expr.info.write_resolved(); // inferred type, for typed ASTs
    match &expr.kind {
        ExprKind::Binary { op, lhs, rhs } => {
            writeln!(w, "binary {op:?}{info}")?;
            print_expr(w, idents, i + 1, lhs)?;
            print_expr(w, idents, i + 1, rhs)?;
        }
        ExprKind::Id(ident) => {
            writeln!(w, "ident {}{info}", idents.get(ident))?;
        }
        ExprKind::Int(val) => {
            writeln!(w, "int {val}{info}")?;
        }
        ExprKind::Float(val) => {
            writeln!(w, "float {val:?}{info}")?;
        }
    }
    Ok(())
}

fn sp(w: &mut impl Write, i: usize) -> std::io::Result<()> {
    write!(w, "{:width$}", "", width = i * INDENT_WIDTH)
}

pub trait InfoWriter: Info<Expr: TypeWriter> {}

impl<I> InfoWriter for I
where
    I: Info,
    I::Expr: TypeWriter,
{
}

pub trait TypeWriter {
    fn write_resolved(&self) -> impl std::fmt::Display;
}

impl TypeWriter for () {
    fn write_resolved(&self) -> impl std::fmt::Display {
        ""
    }
}

impl TypeWriter for Type {
    fn write_resolved(&self) -> impl std::fmt::Display {
        struct Resolved(Type);

        impl std::fmt::Display for Resolved {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, " %: {}", self.0)
            }
        }

        Resolved(*self)
    }
}
