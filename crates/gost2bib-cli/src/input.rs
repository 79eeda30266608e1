use std::path::Path;

use anyhow::{Context, Result, anyhow};
use encoding_rs::Encoding;

/// Default label for reference lists typed on Russian Windows machines.
pub const DEFAULT_ENCODING: &str = "windows-1251";

/// Look up a WHATWG encoding label (`windows-1251`, `cp1251`, `koi8-r`, `utf-8`, ...).
pub fn encoding_for_label(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| anyhow!("unknown encoding label {:?}", label))
}

/// Decode raw bytes. A byte-order mark overrides `encoding`; malformed
/// sequences become U+FFFD and are reported once.
pub fn decode(bytes: &[u8], encoding: &'static Encoding) -> String {
    let (text, used, had_errors) = encoding.decode(bytes);
    if used != encoding {
        tracing::debug!(
            requested = encoding.name(),
            used = used.name(),
            "byte-order mark overrides encoding"
        );
    }
    if had_errors {
        tracing::warn!(
            encoding = used.name(),
            "input contains bytes that are invalid in this encoding"
        );
    }
    text.into_owned()
}

/// Read and decode a reference list file.
pub fn read_reference_list(path: &Path, label: &str) -> Result<String> {
    let encoding = encoding_for_label(label)?;
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        bytes = bytes.len(),
        encoding = encoding.name(),
        "read reference list"
    );
    Ok(decode(&bytes, encoding))
}
