//! Downloaded attachments and content sniffing.
//!
//! Attachment endpoints often answer `application/octet-stream`, so the
//! payload's leading bytes decide the type when they are recognisable.

use percent_encoding::percent_decode_str;

/// A downloaded file
#[derive(Debug, Clone)]
pub struct Attachment {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(bytes: Vec<u8>, content_type: Option<&str>, disposition: Option<&str>) -> Self {
        let mime_type = sniff_mime(&bytes)
            .map(str::to_string)
            .or_else(|| {
                content_type
                    .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_string())
                    .filter(|ct| !ct.is_empty())
            })
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let file_name = disposition
            .and_then(filename_from_disposition)
            .unwrap_or_else(|| format!("attachment.{}", extension_for(&mime_type)));

        Self {
            file_name,
            mime_type,
            bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// MIME type from magic bytes
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    const SIGNATURES: &[(&[u8], &str)] = &[
        (b"%PDF-", "application/pdf"),
        (b"\x89PNG\r\n\x1a\n", "image/png"),
        (b"\xff\xd8\xff", "image/jpeg"),
        (b"GIF87a", "image/gif"),
        (b"GIF89a", "image/gif"),
        (b"PK\x03\x04", "application/zip"),
    ];

    if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        return Some("image/webp");
    }

    SIGNATURES
        .iter()
        .find(|(magic, _)| bytes.starts_with(magic))
        .map(|(_, mime)| *mime)
}

pub fn extension_for(mime_type: &str) -> &'static str {
    match mime_type {
        "application/pdf" => "pdf",
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "application/zip" => "zip",
        "text/plain" => "txt",
        "text/csv" => "csv",
        "application/json" => "json",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => "docx",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => "xlsx",
        _ => "bin",
    }
}

/// `filename*=UTF-8''..` wins over `filename=".."`
pub fn filename_from_disposition(disposition: &str) -> Option<String> {
    let mut plain = None;

    for part in disposition.split(';').map(str::trim) {
        if let Some(value) = part.strip_prefix("filename*=") {
            let encoded = value.split("''").nth(1).unwrap_or(value);
            if let Ok(name) = percent_decode_str(encoded.trim_matches('"')).decode_utf8() {
                return sanitize(&name);
            }
        } else if let Some(value) = part.strip_prefix("filename=") {
            plain = Some(value.trim_matches('"').to_string());
        }
    }

    plain.and_then(|name| sanitize(&name))
}

// Keep only the final path component.
fn sanitize(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name).trim();
    if base.is_empty() || base == "." || base == ".." {
        None
    } else {
        Some(base.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_known_signatures() {
        assert_eq!(sniff_mime(b"%PDF-1.7 ..."), Some("application/pdf"));
        assert_eq!(sniff_mime(b"\x89PNG\r\n\x1a\n...."), Some("image/png"));
        assert_eq!(sniff_mime(b"\xff\xd8\xff\xe0"), Some("image/jpeg"));
        assert_eq!(sniff_mime(b"RIFF\x00\x00\x00\x00WEBPVP8 "), Some("image/webp"));
        assert_eq!(sniff_mime(b"hello"), None);
        assert_eq!(sniff_mime(b""), None);
    }

    #[test]
    fn test_sniffed_type_beats_header() {
        let a = Attachment::new(b"%PDF-1.4".to_vec(), Some("application/octet-stream"), None);
        assert_eq!(a.mime_type, "application/pdf");
        assert_eq!(a.file_name, "attachment.pdf");
    }

    #[test]
    fn test_header_used_when_unrecognised() {
        let a = Attachment::new(b"a,b\n1,2".to_vec(), Some("text/csv; charset=utf-8"), None);
        assert_eq!(a.mime_type, "text/csv");
        assert_eq!(a.file_name, "attachment.csv");

        let b = Attachment::new(b"???".to_vec(), None, None);
        assert_eq!(b.mime_type, "application/octet-stream");
        assert_eq!(b.file_name, "attachment.bin");
    }

    #[test]
    fn test_disposition_file_names() {
        assert_eq!(
            filename_from_disposition("attachment; filename=\"report.pdf\"").as_deref(),
            Some("report.pdf")
        );
        assert_eq!(
            filename_from_disposition("attachment; filename=a.txt; filename*=UTF-8''r%C3%A9sum%C3%A9.pdf")
                .as_deref(),
            Some("résumé.pdf")
        );
        assert_eq!(
            filename_from_disposition("attachment; filename=\"../../etc/passwd\"").as_deref(),
            Some("passwd")
        );
        assert_eq!(
            filename_from_disposition("attachment; filename=\"plain.pdf\"; filename*=UTF-8''bad%FF.pdf").as_deref(),
            Some("plain.pdf")
        );
        assert_eq!(filename_from_disposition("inline"), None);
    }
}
