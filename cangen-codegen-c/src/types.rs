//! C integer types and literal formatting.

/// Fixed-width integer type holding a raw signal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CType {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
}

impl CType {
    /// Smallest type holding `length` bits.
    pub fn for_signal(length: u32, is_signed: bool) -> Self {
        match (length, is_signed) {
            (0..=8, false) => CType::U8,
            (9..=16, false) => CType::U16,
            (17..=32, false) => CType::U32,
            (_, false) => CType::U64,
            (0..=8, true) => CType::I8,
            (9..=16, true) => CType::I16,
            (17..=32, true) => CType::I32,
            (_, true) => CType::I64,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CType::U8 => "uint8_t",
            CType::U16 => "uint16_t",
            CType::U32 => "uint32_t",
            CType::U64 => "uint64_t",
            CType::I8 => "int8_t",
            CType::I16 => "int16_t",
            CType::I32 => "int32_t",
            CType::I64 => "int64_t",
        }
    }

    pub fn is_signed(self) -> bool {
        matches!(self, CType::I8 | CType::I16 | CType::I32 | CType::I64)
    }

    pub fn bits(self) -> u32 {
        match self {
            CType::U8 | CType::I8 => 8,
            CType::U16 | CType::I16 => 16,
            CType::U32 | CType::I32 => 32,
            CType::U64 | CType::I64 => 64,
        }
    }

    pub fn min(self) -> i128 {
        if self.is_signed() {
            -(1i128 << (self.bits() - 1))
        } else {
            0
        }
    }

    pub fn max(self) -> i128 {
        if self.is_signed() {
            (1i128 << (self.bits() - 1)) - 1
        } else {
            (1i128 << self.bits()) - 1
        }
    }

    /// Integer literal of this type's signedness.
    pub fn literal(self, value: i128) -> String {
        if self.is_signed() {
            signed_literal(value)
        } else {
            format!("{value}u")
        }
    }
}

/// Signed literal; the most negative 64-bit value has no literal form.
fn signed_literal(value: i128) -> String {
    if value == i128::from(i64::MIN) {
        "INT64_MIN".to_string()
    } else {
        value.to_string()
    }
}

/// Floating point literal that C parses as a `double` (or `float` with the suffix).
pub fn float_literal(value: f64, use_float: bool) -> String {
    let mut literal = format!("{value:?}");
    if !literal.contains(['.', 'e', 'E']) {
        literal.push_str(".0");
    }
    if use_float {
        literal.push('f');
    }
    literal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_signal() {
        assert_eq!(CType::for_signal(1, false), CType::U8);
        assert_eq!(CType::for_signal(9, false), CType::U16);
        assert_eq!(CType::for_signal(32, false), CType::U32);
        assert_eq!(CType::for_signal(33, true), CType::I64);
        assert_eq!(CType::for_signal(12, true).as_str(), "int16_t");
    }

    #[test]
    fn test_limits() {
        assert_eq!(CType::U8.max(), 255);
        assert_eq!(CType::I8.min(), -128);
        assert_eq!(CType::U64.max(), u64::MAX as i128);
        assert_eq!(CType::I64.min(), i64::MIN as i128);
    }

    #[test]
    fn test_literals() {
        assert_eq!(CType::U16.literal(300), "300u");
        assert_eq!(CType::I16.literal(-3), "-3");
        assert_eq!(CType::I64.literal(i64::MIN as i128), "INT64_MIN");
        assert_eq!(float_literal(0.1, false), "0.1");
        assert_eq!(float_literal(1.0, false), "1.0");
        assert_eq!(float_literal(-40.0, true), "-40.0f");
        assert_eq!(float_literal(1e-7, false), "1e-7");
    }
}
