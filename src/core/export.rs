//! User-triggered export of a rendered quotation: file or clipboard.
//!
//! Exports never touch the parsed or rendered values, so a failed attempt can be
//! retried as-is.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::paths;
use crate::core::quotation::DualQuotationResult;
use crate::core::render::{Audience, Document, markdown, text};

/// Line width used for plain-text exports.
pub const TEXT_EXPORT_WIDTH: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Markdown,
    Text,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Markdown => "md",
            ExportFormat::Text => "txt",
            ExportFormat::Json => "json",
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no export directory available")]
    NoExportDir,
    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("clipboard unavailable: {0}")]
    Clipboard(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Serialize for export. Markdown and text use the rendered documents (joined by
/// a page break line); JSON uses the parsed quotation.
pub fn export_string(
    docs: &[&Document],
    parsed: &DualQuotationResult,
    format: ExportFormat,
) -> Result<String, ExportError> {
    Ok(match format {
        ExportFormat::Markdown => docs
            .iter()
            .map(|d| markdown::to_markdown(d))
            .collect::<Vec<_>>()
            .join("\n---\n\n"),
        ExportFormat::Text => docs
            .iter()
            .map(|d| text::to_plain_text(d, TEXT_EXPORT_WIDTH))
            .collect::<Vec<_>>()
            .join(&format!("\n{}\n\n", "=".repeat(TEXT_EXPORT_WIDTH))),
        ExportFormat::Json => {
            let mut json = serde_json::to_string_pretty(parsed)?;
            json.push('\n');
            json
        }
    })
}

/// File name like `cotizacion_000123191026_cliente.md`.
pub fn file_name(label: &str, audience: Option<Audience>, format: ExportFormat) -> String {
    let label: String = label
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let suffix = match audience {
        Some(Audience::Customer) => "_cliente",
        Some(Audience::Internal) => "_interna",
        None => "",
    };
    format!("cotizacion_{}{}.{}", label, suffix, format.extension())
}

/// Write `content` to `dest`. A directory (or None, meaning the default exports
/// directory) gets `file_name` appended. Returns the written path.
pub fn write_export(
    content: &str,
    dest: Option<&Path>,
    file_name: &str,
) -> Result<PathBuf, ExportError> {
    let path = match dest {
        Some(p) if !p.is_dir() => p.to_path_buf(),
        Some(dir) => dir.join(file_name),
        None => paths::exports_dir()
            .ok_or(ExportError::NoExportDir)?
            .join(file_name),
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ExportError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(&path, content).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;
    log::info!("exported {}", path.display());
    Ok(path)
}

pub fn copy_to_clipboard(content: &str) -> Result<(), ExportError> {
    arboard::Clipboard::new()
        .and_then(|mut c| c.set_text(content.to_string()))
        .map_err(|e| ExportError::Clipboard(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::quotation::split_dual_response;
    use crate::core::render::Block;

    fn doc() -> Document {
        Document {
            audience: Audience::Customer,
            blocks: vec![Block::Heading("Cotización".into())],
        }
    }

    #[test]
    fn file_name_is_sanitized() {
        assert_eq!(
            file_name("000123191026", Some(Audience::Customer), ExportFormat::Markdown),
            "cotizacion_000123191026_cliente.md"
        );
        assert_eq!(
            file_name("a/b c", None, ExportFormat::Json),
            "cotizacion_a_b_c.json"
        );
    }

    #[test]
    fn markdown_joins_documents() {
        let d = doc();
        let parsed = split_dual_response("");
        let out = export_string(&[&d, &d], &parsed, ExportFormat::Markdown).unwrap();
        assert_eq!(out, "## Cotización\n\n---\n\n## Cotización\n");
    }

    #[test]
    fn json_uses_parsed_result() {
        let parsed = split_dual_response("hola");
        let out = export_string(&[], &parsed, ExportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["rawResponse"], "hola");
        assert!(value["customer"].is_null());
    }

    #[test]
    fn writes_into_directory_or_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_export("x", Some(dir.path()), "cotizacion_1.md").unwrap();
        assert_eq!(path, dir.path().join("cotizacion_1.md"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "x");

        let explicit = dir.path().join("sub").join("salida.txt");
        let path = write_export("y", Some(&explicit), "ignored.md").unwrap();
        assert_eq!(path, explicit);
        assert_eq!(fs::read_to_string(&explicit).unwrap(), "y");
    }

    #[test]
    fn write_failure_is_an_error_value() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("archivo");
        fs::write(&blocker, "").unwrap();
        let err = write_export("x", Some(&blocker.join("dentro.md")), "n.md").unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
    }
}
