use std::fmt;

/// The static type of a variable or expression.
///
/// Minilang has no subtyping nor implicit conversions, so two types are
/// compatible only when they are equal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    Float,
}

impl Type {
    pub const ALL: &[Type] = &[Type::Int, Type::Float];

    /// The Minilang spelling of the type, which coincides with the C one.
    pub const fn name(self) -> &'static str {
        match self {
            Type::Int => "int",
            Type::Float => "float",
        }
    }

    /// The `printf`/`scanf` conversion specifier for values of this type.
    pub const fn conversion(self) -> &'static str {
        match self {
            Type::Int => "%d",
            Type::Float => "%f",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
