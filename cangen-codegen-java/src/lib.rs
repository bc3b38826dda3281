//! Java, JNI and CMake generators for cangen.
//!
//! [`java_generators`] returns the full pipeline behind
//! `cangen generate-java-code`: the C source, the Java model and native
//! classes, the JNI bridge, the CMake build descriptor and the logging
//! header. Every generator derives its file and symbol names from the
//! request's single [`DatabaseName`](cangen_core::DatabaseName).

mod generators;
mod java;
mod jni;

pub mod files;

pub use generators::{
    CMakeListsGenerator, JavaModelGenerator, JavaNativeGenerator, JniSourceGenerator,
    LogHeaderGenerator, java_generators,
};
pub use java::FieldType;
pub use jni::{mangle, symbol};
