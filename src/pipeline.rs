use crate::{
    ast::{Program, Typed},
    code_gen::CodeGen,
    lexer, parser,
    symbol_table::{self, SymbolTable},
    type_checker::{self, Checker},
    util::intern::Interner,
};

/// Compiles a Minilang program into C source code.
///
/// Identifiers are interned into `idents`, which is needed to render the
/// error, if any.
pub fn compile(src: &str, idents: &mut Interner) -> Result<String, Error> {
    let (program, symbols) = check(src, idents)?;
    Ok(CodeGen::new(&symbols, idents).gen(&program))
}

/// Runs every stage but code generation, returning the typed program along
/// with its symbol table.
pub fn check(src: &str, idents: &mut Interner) -> Result<(Program<Typed>, SymbolTable), Error> {
    let tokens = lexer::lex_in_new(src)?;
    let program = parser::parse_program(&tokens, idents)?;
    let symbols = SymbolTable::build(&program.decls)?;
    let program = Checker::new(&symbols).check(program)?;
    Ok((program, symbols))
}

#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    Lexer(lexer::Error),
    Parser(parser::Error),
    SymbolTable(symbol_table::Error),
    TypeChecker(type_checker::Error),
}

impl Error {
    pub fn category(&self) -> Category {
        use type_checker::Error::*;
        match self {
            Error::Lexer(_) => Category::Lexical,
            Error::Parser(_) => Category::Syntactic,
            Error::SymbolTable(symbol_table::Error::DuplicateDeclaration(_)) => {
                Category::Redeclaration
            }
            Error::TypeChecker(UndeclaredVariable(_)) => Category::Undeclared,
            Error::TypeChecker(
                OperandMismatch { .. } | AssignmentMismatch { .. } | NonIntCondition(_),
            ) => Category::TypeMismatch,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Category {
    Lexical,
    Syntactic,
    Undeclared,
    Redeclaration,
    TypeMismatch,
}

impl From<lexer::Error> for Error {
    fn from(error: lexer::Error) -> Self {
        Error::Lexer(error)
    }
}

impl From<parser::Error> for Error {
    fn from(error: parser::Error) -> Self {
        Error::Parser(error)
    }
}

impl From<symbol_table::Error> for Error {
    fn from(error: symbol_table::Error) -> Self {
        Error::SymbolTable(error)
    }
}

impl From<type_checker::Error> for Error {
    fn from(error: type_checker::Error) -> Self {
        Error::TypeChecker(error)
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::util::fmt::{Context, Show};

    fn category_of(src: &str) -> Category {
        compile(src, &mut Interner::default())
            .expect_err("should fail")
            .category()
    }

    #[test]
    fn test_end_to_end() {
        let src = indoc! {"
            var x: int;
            x = 1 + 2;
            print x;
        "};
        let code = compile(src, &mut Interner::default()).expect("should compile");
        assert_eq!(
            code,
            indoc! {r#"
                #include <stdio.h>
                int main(void) {
                    int x;
                    int t_1 = 1;
                    int t_2 = 2;
                    int t_3 = t_1 + t_2;
                    x = t_3;
                    printf("%d\n", x);
                    return 0;
                }
            "#}
        );
    }

    #[test]
    fn test_one_declaration_line_per_symbol() {
        let src = include_str!("../demos/big.mini");
        let mut idents = Interner::default();
        let (_, symbols) = check(src, &mut idents).expect("should check");
        let code = compile(src, &mut idents).expect("should compile");
        assert!(!code.is_empty());
        for (name, ty) in symbols.iter() {
            let decl = format!("    {ty} {};", idents.get(name));
            let count = code.lines().filter(|line| *line == decl).count();
            assert_eq!(count, 1, "declaration of {}", idents.get(name));
        }
    }

    #[test]
    fn test_declarations_keep_source_order() {
        let src = "var c: int; var a: float; var b: int;";
        let code = compile(src, &mut Interner::default()).expect("should compile");
        let decls: Vec<_> = code.lines().skip(2).take(3).collect();
        assert_eq!(decls, ["    int c;", "    float a;", "    int b;"]);
    }

    #[test]
    fn test_repeated_compilations_restart_temporaries() {
        let src = "print 1 + 2;";
        let mut idents = Interner::default();
        let first = compile(src, &mut idents).expect("should compile");
        let second = compile(src, &mut idents).expect("should compile");
        assert_eq!(first, second);
        assert!(second.contains("int t_1 = 1;"));
    }

    #[test]
    fn test_demos_compile() {
        for src in [
            include_str!("../demos/countdown.mini"),
            include_str!("../demos/sum.mini"),
            include_str!("../demos/circle.mini"),
            include_str!("../demos/big.mini"),
        ] {
            assert!(compile(src, &mut Interner::default()).is_ok());
        }
    }

    #[test]
    fn test_categories() {
        assert_eq!(category_of("print 1 ! 2;"), Category::Lexical);
        assert_eq!(category_of("print 1 2;"), Category::Syntactic);
        assert_eq!(category_of("print x;"), Category::Undeclared);
        assert_eq!(
            category_of("var x: int; var x: float;"),
            Category::Redeclaration
        );
        assert_eq!(category_of("var x: int; x = 1.0;"), Category::TypeMismatch);
        assert_eq!(category_of("print 1 + 1.0;"), Category::TypeMismatch);
        assert_eq!(
            category_of("var f: float; while f do done"),
            Category::TypeMismatch
        );
    }

    fn message_of(src: &str) -> String {
        let mut idents = Interner::default();
        let error = compile(src, &mut idents).expect_err("should fail");
        let ctx = Context { idents: &idents };
        let rendered = error.display(&ctx).to_string();
        rendered
    }

    #[test]
    fn test_long_expressions() {
        let src = format!("var x: int; x = 1{}; print x;", " + 1".repeat(500));
        let code = compile(&src, &mut Interner::default()).expect("should compile");
        assert!(code.contains("    int t_1001 = t_999 + t_1000;\n    x = t_1001;\n"));

        let src = format!("print 1{};", " + 1".repeat(5_000));
        assert_eq!(message_of(&src), "nesting is too deep (the limit is 512)");
        assert_eq!(category_of(&src), Category::Syntactic);

        let src = format!("print {}1{};", "(".repeat(20_000), ")".repeat(20_000));
        assert_eq!(message_of(&src), "nesting is too deep (the limit is 512)");
    }

    #[test]
    fn test_deeply_nested_loops() {
        let src = format!("{}print 1;{}", "while 1 do ".repeat(100), " done".repeat(100));
        assert!(compile(&src, &mut Interner::default()).is_ok());

        let src = format!("{}print 1;{}", "while 1 do ".repeat(600), " done".repeat(600));
        assert_eq!(message_of(&src), "nesting is too deep (the limit is 512)");
    }

    #[test]
    fn test_literals_fit_c_types() {
        assert_eq!(
            message_of("print 3000000000;"),
            "integer literal 3000000000 is out of range"
        );
        assert_eq!(category_of("print 2147483648;"), Category::Lexical);
        let code = compile("print 2147483647;", &mut Interner::default()).expect("should compile");
        assert!(code.contains("int t_1 = 2147483647;"));
    }

    #[test]
    fn test_redeclaration_precedes_type_checking() {
        // The assignment is also ill-typed, but the duplicate is found first.
        let src = "var x: int; var x: float; x = 1.0;";
        assert_eq!(category_of(src), Category::Redeclaration);
    }
}
