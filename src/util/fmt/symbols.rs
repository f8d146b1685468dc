use std::io::Write;

use crate::{symbol_table::SymbolTable, util::intern::Interner};

pub fn print_symbols_string(idents: &Interner, symbols: &SymbolTable) -> String {
    let mut buf = Vec::with_capacity(256);
    print_symbols(&mut buf, idents, symbols).unwrap();
    String::from_utf8(buf).unwrap()
}

/// Writes the table as a tab separated report, one symbol per line.
pub fn print_symbols(
    w: &mut impl Write,
    idents: &Interner,
    symbols: &SymbolTable,
) -> std::io::Result<()> {
    writeln!(w, "<------ Symbol Table ------>")?;
    writeln!(w, "Scope : Global")?;
    writeln!(w)?;
    writeln!(w, "Symbol\tType")?;
    for (name, ty) in symbols.iter() {
        writeln!(w, "{}\t{ty}", idents.get(name))?;
    }
    Ok(())
}
