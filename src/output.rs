//! Turning a result's data URI into a file on disk.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use base64::Engine;

use crate::error::CoverError;

/// A decoded `data:<mime>;base64,<payload>` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    /// MIME type, e.g. `image/png`.
    pub mime_type: String,
    /// Decoded payload.
    pub data: Vec<u8>,
}

impl DataUri {
    /// Parse a base64 data URI.
    ///
    /// # Errors
    ///
    /// Returns an error if the URI is not a base64 `data:` URI or the payload
    /// is not valid base64.
    pub fn parse(uri: &str) -> Result<Self, CoverError> {
        let malformed = || CoverError::InvalidArgument("Malformed image data URI".to_string());

        let rest = uri.strip_prefix("data:").ok_or_else(malformed)?;
        let (header, payload) = rest.split_once(',').ok_or_else(malformed)?;
        let mime_type = header.strip_suffix(";base64").ok_or_else(malformed)?;
        if mime_type.is_empty() {
            return Err(malformed());
        }
        let data = base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| CoverError::InvalidArgument(format!("Invalid image payload: {e}")))?;
        Ok(Self { mime_type: mime_type.to_string(), data })
    }

    /// File extension matching the MIME type.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/jpeg" => "jpg",
            "image/webp" => "webp",
            _ => "png",
        }
    }
}

/// Generate an output filename from a prompt.
///
/// Keeps the ASCII words of the prompt in kebab-case (Chinese-only prompts
/// fall back to `cover`) and appends a unix timestamp.
#[must_use]
pub fn auto_filename(prompt: &str, extension: &str) -> String {
    let sanitized = sanitize_for_filename(prompt, 50);
    let timestamp = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs();
    format!("{sanitized}-{timestamp}.{extension}")
}

/// Lowercase ASCII alphanumerics joined by single hyphens, at most `max_len` bytes.
#[must_use]
pub fn sanitize_for_filename(input: &str, max_len: usize) -> String {
    let mut result = String::with_capacity(max_len);
    let mut last_was_hyphen = true;

    for ch in input.chars() {
        if result.len() >= max_len {
            break;
        }
        if ch.is_ascii_alphanumeric() {
            result.push(ch.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            result.push('-');
            last_was_hyphen = true;
        }
    }

    while result.ends_with('-') {
        result.pop();
    }

    if result.is_empty() {
        "cover".to_string()
    } else {
        result
    }
}

/// Use the explicit path, or derive one from the prompt.
#[must_use]
pub fn resolve_output_path(explicit: Option<&str>, prompt: &str, extension: &str) -> PathBuf {
    match explicit {
        Some(p) => PathBuf::from(p),
        None => PathBuf::from(auto_filename(prompt, extension)),
    }
}

/// `cover.png` becomes `cover-2.png` for the second of several outputs.
#[must_use]
pub fn numbered_path(path: &Path, n: u32) -> PathBuf {
    let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}-{n}.{}", ext.to_string_lossy()),
        None => format!("{stem}-{n}"),
    };
    path.with_file_name(name)
}

/// Write decoded image bytes to `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save_image(image: &DataUri, path: &Path) -> Result<(), CoverError> {
    std::fs::write(path, &image.data).map_err(CoverError::Io)
}
