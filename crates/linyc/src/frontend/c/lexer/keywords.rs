//! Reserved words

/// Every word the lexer classifies as a keyword rather than an identifier
pub const KEYWORDS: &[&str] = &[
    // Storage class and type keywords
    "unsigned",
    "signed",
    "char",
    "int",
    "short",
    "long",
    "float",
    "double",
    "void",
    "struct",
    "union",
    "static",
    "const",
    "extern",
    "restrict",
    "typedef",
    // Control flow
    "return",
    "if",
    "else",
    "while",
    "for",
    "do",
    "break",
    "continue",
    "switch",
    "case",
    "default",
    "goto",
    // Directive-like
    "include",
    "sizeof",
    // Pragma marker that disables type checking for a declaration
    "__ignore_typecheck",
];

/// Check if `lexeme` is a reserved word
pub fn is_keyword(lexeme: &str) -> bool {
    KEYWORDS.contains(&lexeme)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords() {
        for word in ["int", "unsigned", "restrict", "goto", "include", "sizeof", "__ignore_typecheck"] {
            assert!(is_keyword(word), "{word} should be a keyword");
        }
    }

    #[test]
    fn test_identifiers() {
        for word in ["main", "Int", "includes", "_", "enum", "volatile", ""] {
            assert!(!is_keyword(word), "{word} should not be a keyword");
        }
    }
}
