//! Java identifiers and field types derived from the database.

use cangen_core::{to_camel_case, to_pascal_case, to_snake_case};
use cangen_dbc::{Message, Signal};

const KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally",
    "float", "for", "goto", "if", "implements", "import", "instanceof", "int", "interface",
    "long", "native", "new", "package", "private", "protected", "public", "return", "short",
    "static", "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "try", "void", "volatile", "while", "true", "false", "null",
];

fn escape(name: String) -> String {
    if KEYWORDS.contains(&name.as_str()) {
        format!("{name}_")
    } else if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{name}")
    } else {
        name
    }
}

/// Nested model class for a message, e.g. `EngineData`.
pub fn message_class(message: &Message) -> String {
    escape(to_pascal_case(&to_snake_case(&message.name)))
}

/// Prefix of the native methods for a message, e.g. `engineData`.
pub fn method_prefix(message: &Message) -> String {
    escape(to_camel_case(&to_snake_case(&message.name)))
}

/// Model field holding a signal value, e.g. `engineSpeed`.
pub fn field_name(signal: &Signal) -> String {
    escape(to_camel_case(&to_snake_case(&signal.name)))
}

/// Constant name for a named signal value, e.g. `GEAR_NEUTRAL`.
pub fn choice_constant(signal: &Signal, value: i64, choice: &str) -> String {
    let signal = to_snake_case(&signal.name).trim_matches('_').to_uppercase();
    let mut choice = to_snake_case(choice).trim_matches('_').to_uppercase();
    if choice.is_empty() {
        choice = value.unsigned_abs().to_string();
    }
    escape(format!("{signal}_{choice}"))
}

/// Java type of a model field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Scaled physical value.
    Double,
    /// Raw bus value.
    Long,
}

impl FieldType {
    pub fn new(floating_point_numbers: bool) -> Self {
        if floating_point_numbers {
            FieldType::Double
        } else {
            FieldType::Long
        }
    }

    pub fn java(self) -> &'static str {
        match self {
            FieldType::Double => "double",
            FieldType::Long => "long",
        }
    }

    /// JNI type signature.
    pub fn signature(self) -> &'static str {
        match self {
            FieldType::Double => "D",
            FieldType::Long => "J",
        }
    }

    /// Suffix of the JNI field accessors (`GetDoubleField`, `SetLongField`).
    pub fn accessor(self) -> &'static str {
        match self {
            FieldType::Double => "Double",
            FieldType::Long => "Long",
        }
    }

    pub fn jni(self) -> &'static str {
        match self {
            FieldType::Double => "jdouble",
            FieldType::Long => "jlong",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_names() {
        let message = Message::new(1, "ENGINE_DATA", 8);
        assert_eq!(message_class(&message), "EngineData");
        assert_eq!(method_prefix(&message), "engineData");

        let message = Message::new(1, "VehicleSpeed", 8);
        assert_eq!(message_class(&message), "VehicleSpeed");
        assert_eq!(method_prefix(&message), "vehicleSpeed");
    }

    #[test]
    fn test_field_names() {
        assert_eq!(field_name(&Signal::new("EngineSpeed", 0, 8)), "engineSpeed");
        assert_eq!(field_name(&Signal::new("Class", 0, 8)), "class_");
        assert_eq!(field_name(&Signal::new("2ndGear", 0, 8)), "_2ndGear");
    }

    #[test]
    fn test_choice_constant() {
        let signal = Signal::new("Gear", 0, 8);
        assert_eq!(choice_constant(&signal, 0, "Neutral"), "GEAR_NEUTRAL");
        assert_eq!(choice_constant(&signal, -1, "---"), "GEAR_1");
    }

    #[test]
    fn test_field_type() {
        assert_eq!(FieldType::new(true).java(), "double");
        assert_eq!(FieldType::new(false).signature(), "J");
        assert_eq!(FieldType::new(false).accessor(), "Long");
    }
}
