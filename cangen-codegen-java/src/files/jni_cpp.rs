use std::path::{Path, PathBuf};

use cangen_codegen::{CommentStyle, JavaPackage, Provenance, builder::CodeBuilder};
use cangen_codegen_c::{MessageLayout, SignalLayout};
use cangen_core::{DatabaseName, GeneratedFile};

use super::log_header::LOG_HEADER_FILE;
use crate::{
    java::{FieldType, field_name, message_class, method_prefix},
    jni::{nested_class_path, symbol},
};

/// `<Database>.cpp`: JNI functions bridging the model classes to the C code.
pub struct JniCpp<'a> {
    pub names: &'a DatabaseName,
    pub package: &'a JavaPackage,
    pub messages: &'a [MessageLayout<'a>],
    pub field_type: FieldType,
    pub android: bool,
    pub provenance: &'a Provenance,
}

impl JniCpp<'_> {
    /// Expression reading a model field into the C struct member type.
    fn read_field(&self, m: &MessageLayout<'_>, s: &SignalLayout<'_>) -> String {
        let get = format!(
            "env->Get{}Field(message, env->GetFieldID(cls, \"{}\", \"{}\"))",
            self.field_type.accessor(),
            field_name(s.signal),
            self.field_type.signature()
        );
        match self.field_type {
            FieldType::Double => format!("{}({get})", m.signal_fn(s, "encode")),
            FieldType::Long => format!("static_cast<{}>({get})", s.raw_type.as_str()),
        }
    }

    /// Statement storing a C struct member into a model field.
    fn write_field(&self, m: &MessageLayout<'_>, s: &SignalLayout<'_>) -> String {
        let value = match self.field_type {
            FieldType::Double => format!("{}(msg.{})", m.signal_fn(s, "decode"), s.field),
            FieldType::Long => format!("msg.{}", s.field),
        };
        format!(
            "env->Set{}Field(result, env->GetFieldID(cls, \"{}\", \"{}\"), static_cast<{}>({value}));",
            self.field_type.accessor(),
            field_name(s.signal),
            self.field_type.signature(),
            self.field_type.jni()
        )
    }

    fn render_pack(&self, b: CodeBuilder, m: &MessageLayout<'_>) -> CodeBuilder {
        let method = format!("{}Pack", method_prefix(m.message));
        let symbol = symbol(self.package, &self.names.native_class(), &method);
        let buffer_len = m.message.length.max(1);

        b.line("JNIEXPORT jbyteArray JNICALL")
            .line(&format!(
                "{symbol}(JNIEnv *env, jclass /* clazz */, jobject message)"
            ))
            .block_with_close("{", "}", |b| {
                b.block_with_close("if (message == nullptr) {", "}", |b| {
                    b.line(&format!("LOGE(\"{method}: message is null\");"))
                        .line("return nullptr;")
                })
                .blank()
                .line(&format!("struct {} msg;", m.struct_name()))
                .line(&format!("{}(&msg);", m.init_fn()))
                .when(!m.signals.is_empty(), |b| {
                    b.line("jclass cls = env->GetObjectClass(message);").blank()
                })
                .each(&m.signals, |b, s| {
                    b.line(&format!("msg.{} = {};", s.field, self.read_field(m, s)))
                })
                .when(!m.signals.is_empty(), |b| b.blank())
                .line(&format!("uint8_t buffer[{buffer_len}];"))
                .line(&format!(
                    "int size = {}(buffer, &msg, sizeof(buffer));",
                    m.pack_fn()
                ))
                .block_with_close("if (size < 0) {", "}", |b| {
                    b.line(&format!("LOGE(\"{method}: pack failed (%d)\", size);"))
                        .line("return nullptr;")
                })
                .blank()
                .line("jbyteArray result = env->NewByteArray(size);")
                .line("env->SetByteArrayRegion(result, 0, size, reinterpret_cast<const jbyte *>(buffer));")
                .line("return result;")
            })
            .blank()
    }

    fn render_unpack(&self, b: CodeBuilder, m: &MessageLayout<'_>) -> CodeBuilder {
        let method = format!("{}Unpack", method_prefix(m.message));
        let symbol = symbol(self.package, &self.names.native_class(), &method);
        let class_path =
            nested_class_path(self.package, &self.names.model_class(), &message_class(m.message));

        b.line("JNIEXPORT jobject JNICALL")
            .line(&format!(
                "{symbol}(JNIEnv *env, jclass /* clazz */, jbyteArray data)"
            ))
            .block_with_close("{", "}", |b| {
                b.block_with_close("if (data == nullptr) {", "}", |b| {
                    b.line(&format!("LOGE(\"{method}: data is null\");"))
                        .line("return nullptr;")
                })
                .blank()
                .line("jsize size = env->GetArrayLength(data);")
                .line("jbyte *bytes = env->GetByteArrayElements(data, nullptr);")
                .line(&format!("struct {} msg;", m.struct_name()))
                .line(&format!(
                    "int res = {}(&msg, reinterpret_cast<const uint8_t *>(bytes), static_cast<size_t>(size));",
                    m.unpack_fn()
                ))
                .line("env->ReleaseByteArrayElements(data, bytes, JNI_ABORT);")
                .block_with_close("if (res < 0) {", "}", |b| {
                    b.line(&format!("LOGE(\"{method}: unpack failed (%d)\", res);"))
                        .line("return nullptr;")
                })
                .blank()
                .line(&format!("jclass cls = env->FindClass(\"{class_path}\");"))
                .line("jobject result = env->NewObject(cls, env->GetMethodID(cls, \"<init>\", \"()V\"));")
                .each(&m.signals, |b, s| b.line(&self.write_field(m, s)))
                .line("return result;")
            })
            .blank()
    }
}

impl GeneratedFile for JniCpp<'_> {
    fn path(&self, base: &Path) -> PathBuf {
        base.join(self.names.jni_source_file())
    }

    fn render(&self) -> String {
        let b = CodeBuilder::c()
            .raw(&self.provenance.header(CommentStyle::Block))
            .blank()
            .line("#include <jni.h>")
            .blank()
            .line("#include <cstddef>")
            .line("#include <cstdint>")
            .blank()
            .when(self.android, |b| b.line("#define CANGEN_ANDROID").blank())
            .line(&format!("#include \"{LOG_HEADER_FILE}\""))
            .line(&format!("#include \"{}\"", self.names.c_header_file()))
            .blank()
            .line("extern \"C\" {")
            .blank();

        let b = self.messages.iter().fold(b, |b, m| {
            let b = self.render_pack(b, m);
            self.render_unpack(b, m)
        });

        b.line("}  // extern \"C\"").build()
    }
}
