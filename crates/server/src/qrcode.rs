//! QR-code rendering: out-of-scope collaborator interface (spec.md §1 "the
//! HTTP handlers for ... QR-code generation"), grounded on
//! `original_source/src/qrcode_utils.py`'s `generate_qrcode_base64`
//! contract — a `box_size=10, border=4` PNG rendered to a
//! `data:image/png;base64,...` URI.

use image::Luma;
use qrcode::QrCode;
use std::io::Cursor;

pub trait QrCodeEncoder: Send + Sync {
    /// Render `data` as a PNG QR code, returning a `data:image/png;base64,...`
    /// URI, or `None` if the payload can't be encoded.
    fn encode_data_url(&self, data: &str) -> Option<String>;
}

pub struct ImageQrCodeEncoder {
    pub box_size: u32,
    pub border: u32,
}

impl Default for ImageQrCodeEncoder {
    fn default() -> Self {
        Self { box_size: 10, border: 4 }
    }
}

impl QrCodeEncoder for ImageQrCodeEncoder {
    fn encode_data_url(&self, data: &str) -> Option<String> {
        let code = QrCode::new(data.as_bytes()).ok()?;
        let image = code
            .render::<Luma<u8>>()
            .min_dimensions(self.box_size, self.box_size)
            .quiet_zone(self.border > 0)
            .build();

        let mut png_bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png_bytes), image::ImageFormat::Png)
            .ok()?;

        Some(format!("data:image/png;base64,{}", base64::Engine::encode(&base64::engine::general_purpose::STANDARD, png_bytes)))
    }
}

/// Build the `/api/qrcode` payload: `rss_url`, an `apple_podcasts_url`
/// derived by swapping the scheme to `pcast://`, and the rendered QR code
/// (spec.md's `qrcode_utils.py` `generate_feed_qr_payload`).
pub fn feed_qr_payload(encoder: &dyn QrCodeEncoder, rss_url: &str) -> (String, Option<String>) {
    let apple_podcasts_url = if let Some(rest) = rss_url.strip_prefix("https://") {
        format!("pcast://{rest}")
    } else if let Some(rest) = rss_url.strip_prefix("http://") {
        format!("pcast://{rest}")
    } else {
        rss_url.to_string()
    };
    (apple_podcasts_url, encoder.encode_data_url(rss_url))
}

#[cfg(test)]
#[path = "qrcode_tests.rs"]
mod tests;
