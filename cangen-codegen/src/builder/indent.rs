//! Indentation configuration for code generation.

/// Indentation width, in spaces, for one level of generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indent(pub u8);

impl Indent {
    /// 4-space indentation (C, C++).
    pub const C: Self = Self(4);

    /// 4-space indentation (Java).
    pub const JAVA: Self = Self(4);

    /// Convert to the string representation for one indent level.
    pub fn as_str(&self) -> &'static str {
        match self.0 {
            2 => "  ",
            8 => "        ",
            // Fallback to 4 whitespaces
            _ => "    ",
        }
    }
}

impl Default for Indent {
    fn default() -> Self {
        Self::C
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent_as_str() {
        assert_eq!(Indent(2).as_str(), "  ");
        assert_eq!(Indent(4).as_str(), "    ");
        assert_eq!(Indent(3).as_str(), "    ");
    }

    #[test]
    fn test_default() {
        assert_eq!(Indent::default(), Indent::C);
    }
}
