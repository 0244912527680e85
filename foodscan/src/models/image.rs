use base64::{
    alphabet,
    engine::{
        general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD},
        DecodePaddingMode,
    },
    Engine,
};

use crate::error::{FoodScanError, Result};

// Clients do not always pad their base64.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Mime type assumed when the bytes do not identify as a known image.
pub const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// A decoded food photo ready to be sent to the vision model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl ImagePayload {
    /// Decode an image given as bare base64 or as a `data:<mime>;base64,` URL.
    ///
    /// The mime type is sniffed from the decoded bytes; a declared data URL
    /// mime is only used when sniffing finds nothing.
    pub fn from_base64(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(FoodScanError::Validation(
                "No image data provided".to_string(),
            ));
        }

        let (declared_mime, encoded) = match split_data_url(trimmed) {
            Some((mime, data)) => (Some(mime), data),
            None => (None, trimmed),
        };

        let cleaned: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = LENIENT
            .decode(cleaned.as_bytes())
            .map_err(|e| FoodScanError::Validation(format!("Invalid base64 image data: {e}")))?;

        if bytes.is_empty() {
            return Err(FoodScanError::Validation(
                "No image data provided".to_string(),
            ));
        }

        let mime_type = match infer::get(&bytes) {
            Some(kind) if kind.mime_type().starts_with("image/") => kind.mime_type().to_string(),
            _ => declared_mime
                .filter(|mime| mime.starts_with("image/"))
                .map(str::to_string)
                .unwrap_or_else(|| DEFAULT_IMAGE_MIME.to_string()),
        };

        Ok(Self { bytes, mime_type })
    }

    /// Re-encode as an inline data URL for the model request.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }
}

fn split_data_url(input: &str) -> Option<(&str, &str)> {
    let rest = input.strip_prefix("data:")?;
    let (header, data) = rest.split_once(',')?;
    let mime = header.strip_suffix(";base64")?;
    Some((mime, data))
}
