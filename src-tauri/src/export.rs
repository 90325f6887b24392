use std::{fs, path::Path};

use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine,
};
use serde::Serialize;

use crate::APP_TITLE;

const DATA_URL_SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ExportFormat {
    Md,
    Png,
    Pdf,
}

impl ExportFormat {
    pub(crate) const ALL: [ExportFormat; 3] = [ExportFormat::Md, ExportFormat::Png, ExportFormat::Pdf];

    pub(crate) fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "md" => Some(Self::Md),
            "png" => Some(Self::Png),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    pub(crate) fn extension(self) -> &'static str {
        match self {
            Self::Md => "md",
            Self::Png => "png",
            Self::Pdf => "pdf",
        }
    }

    pub(crate) fn filter_name(self) -> &'static str {
        match self {
            Self::Md => "Markdown",
            Self::Png => "Image",
            Self::Pdf => "PDF",
        }
    }

    pub(crate) fn menu_label(self) -> &'static str {
        match self {
            Self::Md => "Markdown",
            Self::Png => "PNG",
            Self::Pdf => "PDF",
        }
    }
}

pub(crate) fn default_export_file_name(format: ExportFormat, unix_seconds: i64) -> String {
    format!("{APP_TITLE}-{unix_seconds}.{}", format.extension())
}

/// Strips a leading `data:<mime>;base64,` header when present and decodes
/// the rest. Whitespace and missing padding are tolerated.
pub(crate) fn decode_data_url(data_url: &str) -> Result<Vec<u8>, String> {
    let trimmed = data_url.trim();
    let payload = match trimmed.strip_prefix(DATA_URL_SCHEME) {
        Some(rest) => match rest.find(BASE64_MARKER) {
            Some(index)
                if index > 0 && !rest[..index].chars().any(char::is_whitespace) =>
            {
                &rest[index + BASE64_MARKER.len()..]
            }
            _ => trimmed,
        },
        None => trimmed,
    };

    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    LENIENT_BASE64
        .decode(compact.as_bytes())
        .map_err(|error| format!("Export data is not valid base64: {error}"))
}

pub(crate) fn write_export(path: &Path, data_url: &str) -> Result<(), String> {
    let bytes = decode_data_url(data_url)?;
    fs::write(path, bytes).map_err(|error| format!("Failed to write {}: {}", path.display(), error))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_only_known_formats() {
        assert_eq!(ExportFormat::parse("md"), Some(ExportFormat::Md));
        assert_eq!(ExportFormat::parse("png"), Some(ExportFormat::Png));
        assert_eq!(ExportFormat::parse("pdf"), Some(ExportFormat::Pdf));
        assert_eq!(ExportFormat::parse(""), None);
        assert_eq!(ExportFormat::parse("docx"), None);
    }

    #[test]
    fn default_export_file_name_uses_timestamp_and_extension() {
        assert_eq!(
            default_export_file_name(ExportFormat::Png, 1_700_000_000),
            "BingGPT-1700000000.png"
        );
    }

    #[test]
    fn filters_match_the_export_format() {
        assert_eq!(ExportFormat::Md.filter_name(), "Markdown");
        assert_eq!(ExportFormat::Png.filter_name(), "Image");
        assert_eq!(ExportFormat::Pdf.extension(), "pdf");
    }

    #[test]
    fn decode_data_url_strips_the_header() {
        let bytes = decode_data_url("data:text/markdown;base64,IyBIZWxsbw==").expect("decodes");
        assert_eq!(bytes, b"# Hello");
    }

    #[test]
    fn decode_data_url_accepts_bare_base64_without_padding() {
        let bytes = decode_data_url("IyBIZWxsbw").expect("decodes");
        assert_eq!(bytes, b"# Hello");
    }

    #[test]
    fn decode_data_url_rejects_garbage() {
        assert!(decode_data_url("data:image/png;base64,@@@").is_err());
    }

    #[test]
    fn write_export_writes_decoded_bytes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("BingGPT-1.md");

        write_export(&path, "data:text/markdown;base64,IyBIZWxsbw==").expect("writes");

        assert_eq!(fs::read(&path).expect("read"), b"# Hello");
    }

    #[test]
    fn write_export_reports_unwritable_targets() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing").join("out.md");

        let error = write_export(&path, "IyBIZWxsbw==").expect_err("write fails");
        assert!(error.starts_with("Failed to write"));
    }
}
