use std::path::{Path, PathBuf};

use cangen_codegen::{CommentStyle, Provenance};
use cangen_core::GeneratedFile;

pub(crate) const LOG_HEADER_FILE: &str = "log.h";

const BODY: &str = r#"#ifndef CANGEN_LOG_H
#define CANGEN_LOG_H

#ifndef LOG_TAG
#    define LOG_TAG "cangen"
#endif

#if defined(__ANDROID__) || defined(CANGEN_ANDROID)

#include <android/log.h>

#define LOGD(...) __android_log_print(ANDROID_LOG_DEBUG, LOG_TAG, __VA_ARGS__)
#define LOGI(...) __android_log_print(ANDROID_LOG_INFO, LOG_TAG, __VA_ARGS__)
#define LOGE(...) __android_log_print(ANDROID_LOG_ERROR, LOG_TAG, __VA_ARGS__)

#else

#include <stdio.h>

#define CANGEN_LOG(stream, level, ...)                  \
    do {                                                \
        fprintf(stream, level "/" LOG_TAG ": ");        \
        fprintf(stream, __VA_ARGS__);                   \
        fputc('\n', stream);                            \
    } while (0)

#define LOGD(...) CANGEN_LOG(stdout, "D", __VA_ARGS__)
#define LOGI(...) CANGEN_LOG(stdout, "I", __VA_ARGS__)
#define LOGE(...) CANGEN_LOG(stderr, "E", __VA_ARGS__)

#endif

#endif /* CANGEN_LOG_H */
"#;

/// `log.h`: logging macros used by the JNI bridge.
pub struct LogHeader<'a> {
    pub provenance: &'a Provenance,
}

impl GeneratedFile for LogHeader<'_> {
    fn path(&self, base: &Path) -> PathBuf {
        base.join(LOG_HEADER_FILE)
    }

    fn render(&self) -> String {
        format!("{}\n{BODY}", self.provenance.header(CommentStyle::Block))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_header() {
        let provenance = Provenance::fixed("0.0.0", "today");
        let header = LogHeader {
            provenance: &provenance,
        };

        assert_eq!(header.path(Path::new("out")), Path::new("out/log.h"));
        let content = header.render();
        assert!(content.contains("#if defined(__ANDROID__) || defined(CANGEN_ANDROID)"));
        assert!(content.contains("#define LOGE(...) __android_log_print(ANDROID_LOG_ERROR, LOG_TAG, __VA_ARGS__)"));
        assert!(content.contains("#define LOGD(...) CANGEN_LOG(stdout, \"D\", __VA_ARGS__)"));
        assert!(content.ends_with("#endif /* CANGEN_LOG_H */\n"));
    }
}
