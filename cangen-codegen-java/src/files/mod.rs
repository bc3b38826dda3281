mod cmake_lists;
mod jni_cpp;
mod log_header;
mod model_java;
mod native_java;

pub use cmake_lists::{CMakeLists, DEFAULT_MINIMUM_VERSION, FoundLibrary, LibraryKind, LibraryTarget};
pub use jni_cpp::JniCpp;
pub use log_header::LogHeader;
pub use model_java::ModelJava;
pub use native_java::NativeJava;
