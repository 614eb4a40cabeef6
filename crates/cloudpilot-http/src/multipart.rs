//! Multipart form data parsing for the upload endpoints.
//!
//! Parses `multipart/form-data` bodies into text fields and named file
//! parts. This is a synchronous parser over the already-collected body
//! bytes; upload bodies are bounded by the archive sizes this API deals
//! with, so nothing streams.

use std::collections::HashMap;

use bytes::Bytes;

use cloudpilot_model::ApiError;

/// One uploaded file part.
#[derive(Debug, Clone)]
pub struct FilePart {
    /// The client-supplied file name, if any.
    pub filename: Option<String>,
    /// The part's declared Content-Type, if any.
    pub content_type: Option<String>,
    /// The file bytes.
    pub data: Bytes,
}

/// A parsed multipart form submission.
#[derive(Debug, Default)]
pub struct MultipartForm {
    /// Text fields, by field name.
    pub fields: HashMap<String, String>,
    /// File parts, by field name.
    pub files: HashMap<String, FilePart>,
}

impl MultipartForm {
    /// Get a text field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Get a file part by field name.
    #[must_use]
    pub fn file(&self, name: &str) -> Option<&FilePart> {
        self.files.get(name)
    }
}

/// Extract the boundary from a `multipart/form-data` Content-Type header.
///
/// # Errors
///
/// Returns an error when the Content-Type is not multipart/form-data or
/// carries no boundary.
pub fn extract_boundary(content_type: &str) -> Result<String, ApiError> {
    if !content_type
        .to_ascii_lowercase()
        .starts_with("multipart/form-data")
    {
        return Err(ApiError::invalid_request(format!(
            "expected multipart/form-data, got: {content_type}"
        )));
    }

    content_type
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("boundary="))
        .map(|value| value.trim_matches('"').to_owned())
        .filter(|boundary| !boundary.is_empty())
        .ok_or_else(|| ApiError::invalid_request("missing multipart boundary"))
}

/// Parse a multipart/form-data body.
///
/// Parts with a `filename` parameter become file parts keyed by their field
/// name; everything else becomes a text field. Later parts with the same
/// name win.
///
/// # Errors
///
/// Returns an error when the body contains no parts at all.
pub fn parse_multipart(body: &[u8], boundary: &str) -> Result<MultipartForm, ApiError> {
    let delimiter = format!("--{boundary}");
    let mut form = MultipartForm::default();
    let mut saw_part = false;

    for raw_part in split_parts(body, delimiter.as_bytes()) {
        let Some((header_block, content)) = split_once_bytes(raw_part, b"\r\n\r\n") else {
            continue;
        };
        saw_part = true;

        let headers = PartHeaders::parse(header_block);
        let Some(name) = headers.name else {
            continue;
        };

        if headers.filename.is_some() {
            form.files.insert(
                name,
                FilePart {
                    filename: headers.filename,
                    content_type: headers.content_type,
                    data: Bytes::copy_from_slice(content),
                },
            );
        } else {
            form.fields
                .insert(name, String::from_utf8_lossy(content).into_owned());
        }
    }

    if !saw_part {
        return Err(ApiError::invalid_request("empty multipart body"));
    }

    Ok(form)
}

/// Headers of one multipart part.
#[derive(Debug, Default)]
struct PartHeaders {
    name: Option<String>,
    filename: Option<String>,
    content_type: Option<String>,
}

impl PartHeaders {
    fn parse(block: &[u8]) -> Self {
        let mut headers = Self::default();
        let text = String::from_utf8_lossy(block);

        for line in text.split("\r\n") {
            let lower = line.to_ascii_lowercase();
            if lower.starts_with("content-disposition:") {
                headers.name = header_param(line, "name");
                headers.filename = header_param(line, "filename");
            } else if let Some(value) = lower.strip_prefix("content-type:") {
                headers.content_type = Some(value.trim().to_owned());
            }
        }

        headers
    }
}

/// Extract a `param="value"` (or unquoted `param=value`) from a header line.
fn header_param(line: &str, param: &str) -> Option<String> {
    let lower = line.to_ascii_lowercase();
    let pattern = format!("{param}=");
    let mut search_from = 0;

    // Match the parameter name exactly: "name=" must not match "filename=".
    while let Some(offset) = lower[search_from..].find(&pattern) {
        let start = search_from + offset;
        let preceded_ok = start == 0
            || matches!(lower.as_bytes()[start - 1], b' ' | b';' | b'\t');
        search_from = start + pattern.len();
        if !preceded_ok {
            continue;
        }

        let rest = &line[start + pattern.len()..];
        if let Some(quoted) = rest.strip_prefix('"') {
            return quoted.split('"').next().map(ToOwned::to_owned);
        }
        let end = rest.find(';').unwrap_or(rest.len());
        let value = rest[..end].trim();
        if !value.is_empty() {
            return Some(value.to_owned());
        }
    }

    None
}

/// Split a multipart body into its parts by the boundary delimiter.
fn split_parts<'a>(body: &'a [u8], delimiter: &[u8]) -> Vec<&'a [u8]> {
    let mut parts = Vec::new();
    let Some(first) = find_bytes(body, delimiter) else {
        return parts;
    };

    let mut remaining = trim_crlf_prefix(&body[first + delimiter.len()..]);
    loop {
        // `--` after the delimiter marks the terminator.
        if remaining.starts_with(b"--") {
            break;
        }

        match find_bytes(remaining, delimiter) {
            Some(pos) => {
                parts.push(trim_crlf_suffix(&remaining[..pos]));
                remaining = trim_crlf_prefix(&remaining[pos + delimiter.len()..]);
            }
            None => {
                let tail = trim_crlf_suffix(remaining);
                if !tail.is_empty() {
                    parts.push(tail);
                }
                break;
            }
        }
    }

    parts
}

/// Split a byte slice at the first occurrence of a separator.
fn split_once_bytes<'a>(data: &'a [u8], separator: &[u8]) -> Option<(&'a [u8], &'a [u8])> {
    find_bytes(data, separator).map(|pos| (&data[..pos], &data[pos + separator.len()..]))
}

/// Find the position of a needle in a haystack.
fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn trim_crlf_prefix(data: &[u8]) -> &[u8] {
    data.strip_prefix(b"\r\n").unwrap_or(data)
}

fn trim_crlf_suffix(data: &[u8]) -> &[u8] {
    data.strip_suffix(b"\r\n").unwrap_or(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form_body(boundary: &str) -> Vec<u8> {
        format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"bucket_name\"\r\n\
             \r\n\
             demo-site\r\n\
             --{boundary}\r\n\
             Content-Disposition: form-data; name=\"website\"; filename=\"site.zip\"\r\n\
             Content-Type: application/zip\r\n\
             \r\n\
             PKzipbytes\r\n\
             --{boundary}--\r\n"
        )
        .into_bytes()
    }

    #[test]
    fn test_should_extract_boundary() {
        let boundary =
            extract_boundary("multipart/form-data; boundary=----WebKitFormBoundaryX").expect("ok");
        assert_eq!(boundary, "----WebKitFormBoundaryX");
    }

    #[test]
    fn test_should_extract_quoted_boundary() {
        let boundary =
            extract_boundary(r#"multipart/form-data; boundary="abc123""#).expect("ok");
        assert_eq!(boundary, "abc123");
    }

    #[test]
    fn test_should_reject_non_multipart_content_type() {
        assert!(extract_boundary("application/json").is_err());
        assert!(extract_boundary("multipart/form-data").is_err());
    }

    #[test]
    fn test_should_parse_fields_and_named_files() {
        let form = parse_multipart(&form_body("XBOUND"), "XBOUND").expect("parses");

        assert_eq!(form.field("bucket_name"), Some("demo-site"));
        let file = form.file("website").expect("file part");
        assert_eq!(file.filename.as_deref(), Some("site.zip"));
        assert_eq!(file.content_type.as_deref(), Some("application/zip"));
        assert_eq!(file.data.as_ref(), b"PKzipbytes");
    }

    #[test]
    fn test_should_keep_binary_file_bytes_intact() {
        let body = b"--b\r\n\
            Content-Disposition: form-data; name=\"file\"; filename=\"x.bin\"\r\n\
            \r\n\
            \x00\x01\x02\xff\r\n\
            --b--\r\n";
        let form = parse_multipart(body, "b").expect("parses");
        assert_eq!(
            form.file("file").expect("file").data.as_ref(),
            b"\x00\x01\x02\xff"
        );
    }

    #[test]
    fn test_should_reject_empty_body() {
        assert!(parse_multipart(b"", "b").is_err());
    }

    #[test]
    fn test_should_not_confuse_name_with_filename() {
        let body = b"--b\r\n\
            Content-Disposition: form-data; name=\"website\"; filename=\"website.zip\"\r\n\
            \r\n\
            data\r\n\
            --b--\r\n";
        let form = parse_multipart(body, "b").expect("parses");
        let file = form.file("website").expect("file keyed by field name");
        assert_eq!(file.filename.as_deref(), Some("website.zip"));
    }

    #[test]
    fn test_should_treat_missing_file_as_absent_not_error() {
        let body = b"--b\r\n\
            Content-Disposition: form-data; name=\"bucket_name\"\r\n\
            \r\n\
            demo\r\n\
            --b--\r\n";
        let form = parse_multipart(body, "b").expect("parses");
        assert!(form.file("website").is_none());
        assert_eq!(form.field("bucket_name"), Some("demo"));
    }
}
