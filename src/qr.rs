//! QR raster generation for tracking URLs.

use image::{GrayImage, Luma};
use qrcode::{EcLevel, QrCode};

use crate::errors::{FlyerlinkError, Result};

/// Render a QR code for `url` as a grayscale raster.
///
/// `module_px` is the pixel edge length of one QR module. A quiet zone is
/// included so the raster stays decodable even when composited against
/// non-white surroundings.
pub fn render_qr(url: &str, module_px: u32) -> Result<GrayImage> {
    let code = QrCode::with_error_correction_level(url.as_bytes(), EcLevel::M)
        .map_err(|e| FlyerlinkError::qr_encoding(format!("Failed to encode '{}': {}", url, e)))?;

    let module_px = module_px.max(1);
    let image = code
        .render::<Luma<u8>>()
        .module_dimensions(module_px, module_px)
        .quiet_zone(true)
        .build();

    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_produces_square_raster() {
        let img = render_qr("https://example.com/r/abc", 4).unwrap();
        assert_eq!(img.width(), img.height());
        assert!(img.width() > 0);
    }

    #[test]
    fn test_render_is_deterministic() {
        let a = render_qr("https://example.com/r/abc", 4).unwrap();
        let b = render_qr("https://example.com/r/abc", 4).unwrap();
        assert_eq!(a.as_raw(), b.as_raw());
    }
}
