use std::{
    error::Error,
    fs,
    io::{self, Read, Write},
    process::exit,
};

use minilang::{
    lexer, pipeline,
    util::{
        fmt::{symbols, tree, Context, Show},
        intern::Interner,
    },
};

const USAGE: &str = "usage: minilang [compile|tokens|symbols|ast] [FILE]";

#[derive(Copy, Clone)]
enum Mode {
    Compile,
    Tokens,
    Symbols,
    Ast,
}

fn main() {
    let (mode, path) = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            eprintln!("{USAGE}");
            exit(2);
        }
    };

    let src = match read_source(path.as_deref()) {
        Ok(src) => src,
        Err(error) => {
            eprintln!("Error: failed to read input: {error}");
            exit(2);
        }
    };

    let mut idents = Interner::with_capacity(64);
    let output = match run(mode, &src, &mut idents) {
        Ok(output) => output,
        Err(error) => {
            let ctx = Context { idents: &idents };
            eprintln!("Error: {}", error.display(&ctx));
            exit(1);
        }
    };

    if let Err(error) = io::stdout().write_all(output.as_bytes()) {
        eprintln!("Error: failed to write output: {error}");
        exit(2);
    }
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<(Mode, Option<String>), String> {
    let mut mode = Mode::Compile;
    let mut path = None;
    if let Some(first) = args.next() {
        match first.as_str() {
            "compile" => mode = Mode::Compile,
            "tokens" => mode = Mode::Tokens,
            "symbols" => mode = Mode::Symbols,
            "ast" => mode = Mode::Ast,
            "-h" | "--help" => {
                println!("{USAGE}");
                exit(0);
            }
            _ => path = Some(first),
        }
    }
    if path.is_none() {
        path = args.next();
    }
    if let Some(extra) = args.next() {
        return Err(format!("unexpected argument `{extra}`"));
    }
    Ok((mode, path.filter(|path| path != "-")))
}

fn read_source(path: Option<&str>) -> Result<String, Box<dyn Error>> {
    let src = match path {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut src = String::new();
            io::stdin().read_to_string(&mut src)?;
            src
        }
    };
    Ok(src)
}

fn run(mode: Mode, src: &str, idents: &mut Interner) -> Result<String, pipeline::Error> {
    match mode {
        Mode::Compile => pipeline::compile(src, idents),
        Mode::Tokens => {
            let tokens = lexer::lex_in_new(src)?;
            Ok(tokens.iter().map(|token| format!("{token:?}\n")).collect())
        }
        Mode::Symbols => {
            let (_, table) = pipeline::check(src, idents)?;
            Ok(symbols::print_symbols_string(idents, &table))
        }
        Mode::Ast => {
            let (program, _) = pipeline::check(src, idents)?;
            Ok(tree::print_program_string(idents, &program))
        }
    }
}
