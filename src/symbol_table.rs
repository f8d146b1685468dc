use std::collections::HashMap;

use crate::{
    ast::{Decl, Ident},
    types::Type,
};

/// Maps every declared variable to its type.
///
/// Built once from the program's declarations and read-only afterwards.
/// Iteration follows declaration order.
#[derive(Debug, Default)]
pub struct SymbolTable {
    map: HashMap<Ident, Type>,
    order: Vec<Ident>,
}

impl SymbolTable {
    /// Builds the table, failing on the first name declared twice.
    pub fn build(decls: &[Decl]) -> Result<SymbolTable, Error> {
        let mut table = SymbolTable {
            map: HashMap::with_capacity(decls.len()),
            order: Vec::with_capacity(decls.len()),
        };
        for decl in decls {
            table.define(decl.name, decl.ty)?;
        }
        Ok(table)
    }

    /// Attempts to define the provided variable.
    ///
    /// Fails if the variable is already defined.
    fn define(&mut self, name: Ident, ty: Type) -> Result<(), Error> {
        if self.has(name) {
            return Err(Error::DuplicateDeclaration(name));
        }
        self.map.insert(name, ty);
        self.order.push(name);
        Ok(())
    }

    pub fn has(&self, name: Ident) -> bool {
        self.map.contains_key(&name)
    }

    pub fn get(&self, name: Ident) -> Option<Type> {
        self.map.get(&name).copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterates over `(name, type)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Ident, Type)> + '_ {
        self.order.iter().map(|name| (*name, self.map[name]))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    DuplicateDeclaration(Ident),
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        lexer,
        parser,
        util::{intern::Interner, test_utils::tree_tests},
    };

    fn build(src: &str) -> (Interner, Result<SymbolTable, Error>) {
        let mut i = Interner::with_capacity(8);
        let tokens = lexer::lex_in_new(src).expect("failed to lex");
        let prog = parser::parse_program(&tokens, &mut i).expect("failed to parse");
        let table = SymbolTable::build(&prog.decls);
        (i, table)
    }

    #[test]
    fn test_build_in_declaration_order() {
        let (i, table) = build("var zeta: float; var alpha: int; var mid: int;");
        let table = table.expect("should build");
        let entries: Vec<_> = table.iter().map(|(name, ty)| (i.get(name), ty)).collect();
        assert_eq!(
            entries,
            [
                ("zeta", Type::Float),
                ("alpha", Type::Int),
                ("mid", Type::Int),
            ]
        );
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_lookup() {
        let (mut i, table) = build("var x: int; var y: float;");
        let table = table.expect("should build");
        assert_eq!(table.get(i.intern("x")), Some(Type::Int));
        assert_eq!(table.get(i.intern("y")), Some(Type::Float));
        assert_eq!(table.get(i.intern("z")), None);
        assert!(!table.has(i.intern("z")));
    }

    #[test]
    fn test_empty() {
        let (_, table) = build("print 1;");
        assert!(table.expect("should build").is_empty());
    }

    #[test]
    fn test_duplicate_declaration() {
        let (mut i, table) = build("var x: int; var y: int; var x: float;");
        assert_eq!(
            table.map(|_| ()),
            Err(Error::DuplicateDeclaration(i.intern("x")))
        );
    }

    tree_tests!(
        use checker;

        fn test_duplicate_reported_before_type_errors() {
            let program = "var x: int; var x: float; x = 1.0; print y;";
            let expected_errors = &["x is already declared"];
        }

        fn test_same_type_duplicate() {
            let program = "var count: int; var count: int;";
            let expected_errors = &["count is already declared"];
        }
    );
}
