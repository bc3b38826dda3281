//! The generators of the Java pipeline.

use cangen_codegen::{ArtifactGenerator, GenerationRequest};
use cangen_codegen_c::{CSourceGenerator, MessageLayout};
use cangen_core::{File, GeneratedFile};
use eyre::Result;
use tracing::debug;

use crate::{
    files::{CMakeLists, JniCpp, LogHeader, ModelJava, NativeJava},
    java::FieldType,
};

/// All generators of `generate-java-code`, in execution order.
pub fn java_generators() -> Vec<Box<dyn ArtifactGenerator>> {
    vec![
        Box::new(CSourceGenerator),
        Box::new(JavaModelGenerator),
        Box::new(JavaNativeGenerator),
        Box::new(JniSourceGenerator),
        Box::new(CMakeListsGenerator),
        Box::new(LogHeaderGenerator),
    ]
}

/// Generates `<Database>Model.java`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JavaModelGenerator;

impl ArtifactGenerator for JavaModelGenerator {
    fn name(&self) -> &'static str {
        "java-model"
    }

    fn render(&self, request: &GenerationRequest) -> Result<Vec<File>> {
        let messages = request.messages();
        let file = ModelJava {
            names: request.names(),
            package: request.package(),
            messages: &messages,
            field_type: FieldType::new(request.options().floating_point_numbers),
            provenance: request.provenance(),
        };
        Ok(vec![file.to_file()])
    }
}

/// Generates `<Database>Native.java`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JavaNativeGenerator;

impl ArtifactGenerator for JavaNativeGenerator {
    fn name(&self) -> &'static str {
        "java-native"
    }

    fn render(&self, request: &GenerationRequest) -> Result<Vec<File>> {
        let messages = request.messages();
        let file = NativeJava {
            names: request.names(),
            package: request.package(),
            messages: &messages,
            provenance: request.provenance(),
        };
        Ok(vec![file.to_file()])
    }
}

/// Generates the `<Database>.cpp` JNI bridge.
#[derive(Debug, Clone, Copy, Default)]
pub struct JniSourceGenerator;

impl ArtifactGenerator for JniSourceGenerator {
    fn name(&self) -> &'static str {
        "jni-source"
    }

    fn render(&self, request: &GenerationRequest) -> Result<Vec<File>> {
        let names = request.names();
        let messages = request
            .messages()
            .into_iter()
            .map(|message| MessageLayout::new(names, message))
            .collect::<Result<Vec<_>>>()?;
        debug!(messages = messages.len(), "rendering JNI bridge");
        let file = JniCpp {
            names,
            package: request.package(),
            messages: &messages,
            field_type: FieldType::new(request.options().floating_point_numbers),
            android: request.options().android,
            provenance: request.provenance(),
        };
        Ok(vec![file.to_file()])
    }
}

/// Generates `CMakeLists.txt`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CMakeListsGenerator;

impl ArtifactGenerator for CMakeListsGenerator {
    fn name(&self) -> &'static str {
        "cmake-lists"
    }

    fn render(&self, request: &GenerationRequest) -> Result<Vec<File>> {
        let file = CMakeLists::for_database(request.names(), request.provenance().clone());
        Ok(vec![file.to_file()])
    }
}

/// Generates `log.h`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogHeaderGenerator;

impl ArtifactGenerator for LogHeaderGenerator {
    fn name(&self) -> &'static str {
        "log-header"
    }

    fn render(&self, request: &GenerationRequest) -> Result<Vec<File>> {
        let file = LogHeader {
            provenance: request.provenance(),
        };
        Ok(vec![file.to_file()])
    }
}
