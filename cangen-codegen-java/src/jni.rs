//! JNI symbol mangling.

use std::fmt::Write;

use cangen_codegen::JavaPackage;

/// Mangle a Java name component as required for JNI symbol lookup.
///
/// `.` and `/` separate components and become `_`; `_` becomes `_1`, `;`
/// becomes `_2`, `[` becomes `_3`, and any other character that is not an
/// ASCII letter or digit becomes `_0xxxx`.
pub fn mangle(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' => out.push(c),
            '.' | '/' => out.push('_'),
            '_' => out.push_str("_1"),
            ';' => out.push_str("_2"),
            '[' => out.push_str("_3"),
            other => {
                let mut units = [0u16; 2];
                for unit in other.encode_utf16(&mut units) {
                    let _ = write!(out, "_0{unit:04x}");
                }
            }
        }
    }
    out
}

/// Exported C symbol implementing `package.class.method`.
pub fn symbol(package: &JavaPackage, class: &str, method: &str) -> String {
    format!(
        "Java_{}_{}_{}",
        mangle(package.as_str()),
        mangle(class),
        mangle(method)
    )
}

/// Binary name used by `FindClass`, e.g. `can/tools/DemoModel$Status`.
pub fn nested_class_path(package: &JavaPackage, outer: &str, inner: &str) -> String {
    let mut path: Vec<&str> = package.segments().collect();
    path.push(outer);
    format!("{}${inner}", path.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mangle() {
        assert_eq!(mangle("can.tools"), "can_tools");
        assert_eq!(mangle("my_pkg.sub"), "my_1pkg_sub");
        assert_eq!(mangle("Outer$Inner"), "Outer_00024Inner");
        assert_eq!(mangle("caf\u{e9}"), "caf_000e9");
    }

    #[test]
    fn test_symbol() {
        let package = JavaPackage::new("com.example.can_bus").unwrap();
        assert_eq!(
            symbol(&package, "DemoNative", "statusPack"),
            "Java_com_example_can_1bus_DemoNative_statusPack"
        );
    }

    #[test]
    fn test_nested_class_path() {
        let package = JavaPackage::default();
        assert_eq!(
            nested_class_path(&package, "DemoModel", "Status"),
            "can/tools/DemoModel$Status"
        );
    }
}
