use crate::{
    lexer, parser,
    pipeline::{self, Error},
    util::{
        fmt::{tree, Context, Show},
        intern::Interner,
    },
};

pub fn format_errors<E: Show>(i: &Interner, e: &[E]) -> Vec<String> {
    let ctx = Context { idents: i };
    e.iter().map(|e| format!("{}", e.display(&ctx))).collect()
}

/// Each variant contains the input.
pub enum Test {
    ParserProgram(&'static str),
    ParserExpr(&'static str),
    CheckerProgram(&'static str),
    CodeGenProgram(&'static str),
}

pub enum Assertion {
    TreeOk(&'static str),
    CodeOk(&'static str),
    ExpectedErrors(&'static [&'static str]),
}

/// Runs the stages selected by `test`, returning the printed output (a tree,
/// or C code) along with the rendered errors.
#[track_caller]
pub fn run_pipeline(test: Test) -> (String, Vec<String>) {
    let mut idents = Interner::with_capacity(32);
    match run(&test, &mut idents) {
        Ok(output) => (output, vec![]),
        Err(error) => (String::new(), format_errors(&idents, &[error])),
    }
}

fn run(test: &Test, idents: &mut Interner) -> Result<String, Error> {
    match *test {
        Test::ParserProgram(input) => {
            let tokens = lexer::lex_in_new(input)?;
            let prog = parser::parse_program(&tokens, idents)?;
            Ok(tree::print_program_string(idents, &prog))
        }
        Test::ParserExpr(input) => {
            let tokens = lexer::lex_in_new(input)?;
            let expr = parser::parse_expr(&tokens, idents)?;
            Ok(tree::print_expr_string(idents, &expr))
        }
        Test::CheckerProgram(input) => {
            let (prog, _symbols) = pipeline::check(input, idents)?;
            Ok(tree::print_program_string(idents, &prog))
        }
        Test::CodeGenProgram(input) => pipeline::compile(input, idents),
    }
}

#[track_caller]
pub fn run_assertion(assertion: Assertion, formatted_actual: &str, formatted_errors: &[String]) {
    match assertion {
        Assertion::TreeOk(expected) | Assertion::CodeOk(expected) => {
            let expected_errors: &[&str] = &[];
            ::pretty_assertions::assert_eq!(formatted_errors, expected_errors);
            ::pretty_assertions::assert_eq!(formatted_actual.trim(), expected.trim());
        }
        Assertion::ExpectedErrors(expected_errors) => {
            ::pretty_assertions::assert_eq!(formatted_errors, expected_errors);
            ::pretty_assertions::assert_eq!(formatted_actual, "");
        }
    }
}

macro_rules! tree_tests {
    (
        use $test_kind:ident;

        $(
            fn $test_name:ident() {
                let $source_kind:ident = $source:expr;
                $($assertions_tt:tt)*
            }
        )*
    ) => {
        $(
            #[test]
            fn $test_name() {
                let test: crate::util::test_utils::Test =
                    tree_tests!(@@get_test($test_kind, $source_kind), $source);
                let (formatted_actual, formatted_errors) =
                    crate::util::test_utils::run_pipeline(test);
                let ctx = (&formatted_actual, &formatted_errors);
                tree_tests!(@@expand_assertions, ctx, [$($assertions_tt)*]);
            }
        )*
    };

    (@@expand_assertions, $ctx:expr, []) => {};
    (@@expand_assertions, $ctx:expr, [
        let $assertion:ident = $assertion_expected:expr;
        $($rest_assertions_tt:tt)*
    ]) => {
        crate::util::test_utils::run_assertion(
            tree_tests!(@@assertion, $assertion, $assertion_expected),
            $ctx.0,
            $ctx.1,
        );
        tree_tests!(@@expand_assertions, $ctx, [$($rest_assertions_tt)*]);
    };

    (@@assertion, tree_ok, $expected:expr) => {
        crate::util::test_utils::Assertion::TreeOk(::indoc::indoc! { $expected })
    };
    (@@assertion, code_ok, $expected:expr) => {
        crate::util::test_utils::Assertion::CodeOk(::indoc::indoc! { $expected })
    };
    (@@assertion, expected_errors, $expected:expr) => {
        crate::util::test_utils::Assertion::ExpectedErrors($expected)
    };

    (@@get_test(parser, program), $source:expr) => {
        crate::util::test_utils::Test::ParserProgram($source)
    };
    (@@get_test(parser, expr), $source:expr) => {
        crate::util::test_utils::Test::ParserExpr($source)
    };
    (@@get_test(checker, program), $source:expr) => {
        crate::util::test_utils::Test::CheckerProgram($source)
    };
    (@@get_test(codegen, program), $source:expr) => {
        crate::util::test_utils::Test::CodeGenProgram($source)
    };
}
pub(crate) use tree_tests;
