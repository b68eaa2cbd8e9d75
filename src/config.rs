
/// Maximum number of characters in an identifier.
pub const MAX_IDENT_LENGTH: usize = 64;

/// Default number of spaces per indentation level in rendered output.
pub const INDENT_WIDTH: usize = 4;

/// Name of the generated target entry point. Programs may not use it as their name.
pub const TARGET_ENTRY: &str = "main";

/// Prefix of the generated vector builtin helpers.
pub const BUILTIN_PREFIX: &str = "algo_";

/// Target type names of the scalar types.
pub mod target_types {
    pub const BOOLEAN: &str = "bool";
    pub const INTEGER: &str = "long long";
    pub const NATURAL: &str = "unsigned long long";
    pub const REAL: &str = "double";
    pub const CHAR: &str = "char";
    pub const STRING: &str = "std::string";
    pub const VECTOR: &str = "std::vector";
}
