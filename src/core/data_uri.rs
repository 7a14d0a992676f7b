use std::io::Cursor;

use anyhow::Context;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use image::{DynamicImage, ImageFormat};

/// An inline `data:<mime>;base64,<payload>` image, the form designs are passed around and stored in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl DataUri {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Build from an already base64 encoded payload, as returned by the model API.
    pub fn from_base64(mime_type: impl Into<String>, payload: &str) -> anyhow::Result<Self> {
        let bytes = BASE64
            .decode(payload.trim())
            .context("Image payload is not valid base64")?;
        Ok(Self::new(mime_type, bytes))
    }

    pub fn parse(uri: &str) -> anyhow::Result<Self> {
        let rest = uri
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| anyhow::anyhow!("Not a data URI"))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| anyhow::anyhow!("Data URI has no payload"))?;
        let mime_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| anyhow::anyhow!("Only base64 data URIs are supported"))?;
        let mime_type = if mime_type.is_empty() {
            "application/octet-stream"
        } else {
            mime_type
        };
        Self::from_base64(mime_type, payload)
    }

    /// Encode an image as PNG.
    pub fn from_image(img: &DynamicImage) -> anyhow::Result<Self> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png)
            .context("Failed to encode image as PNG")?;
        Ok(Self::new("image/png", buf.into_inner()))
    }

    pub fn decode_image(&self) -> anyhow::Result<DynamicImage> {
        let format = ImageFormat::from_mime_type(&self.mime_type);
        let img = match format {
            Some(format) => image::load_from_memory_with_format(&self.bytes, format),
            None => image::load_from_memory(&self.bytes),
        };
        img.with_context(|| format!("Failed to decode {} image", self.mime_type))
    }

    pub fn base64_payload(&self) -> String {
        BASE64.encode(&self.bytes)
    }
}

impl std::fmt::Display for DataUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "data:{};base64,{}", self.mime_type, self.base64_payload())
    }
}

/// Decode an image given as a data URI string.
pub fn decode_image_uri(uri: &str) -> anyhow::Result<DynamicImage> {
    DataUri::parse(uri)?.decode_image()
}

/// Encode an image as a PNG data URI string.
pub fn image_to_uri(img: &DynamicImage) -> anyhow::Result<String> {
    Ok(DataUri::from_image(img)?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};

    #[test]
    fn test_parse_data_uri() {
        let uri = DataUri::parse("data:text/plain;base64,aGVsbG8=").unwrap();
        assert_eq!(uri.mime_type, "text/plain");
        assert_eq!(uri.bytes, b"hello");
        assert_eq!(uri.to_string(), "data:text/plain;base64,aGVsbG8=");
    }

    #[test]
    fn test_rejects_non_base64_uri() {
        assert!(DataUri::parse("data:text/plain,hello").is_err());
        assert!(DataUri::parse("https://example.com/a.png").is_err());
    }

    #[test]
    fn test_image_survives_png_encoding() {
        let img = ImageBuffer::from_fn(8, 4, |x, _| Rgba([x as u8 * 30, 0, 0, 255]));
        let uri = image_to_uri(&DynamicImage::ImageRgba8(img)).unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));

        let decoded = decode_image_uri(&uri).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 4));
        assert_eq!(decoded.to_rgba8().get_pixel(3, 1)[0], 90);
    }
}
