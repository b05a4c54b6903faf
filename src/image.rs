//! Raster images handed to the surface for blitting or texture brushes.

use crate::error::{Error, Result};
use base64::Engine as _;
use tiny_skia::{IntSize, Pixmap};

/// A decoded image held as a premultiplied RGBA pixmap.
#[derive(Debug, Clone)]
pub struct ImageAdapter {
    pixmap: Pixmap,
}

impl ImageAdapter {
    pub fn from_pixmap(pixmap: Pixmap) -> Self {
        Self { pixmap }
    }

    /// Builds an image from straight (non-premultiplied) RGBA bytes.
    pub fn from_rgba8(width: u32, height: u32, rgba: &[u8]) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(Error::ImageDecode(format!(
                "expected {} bytes for {}x{} RGBA, got {}",
                expected,
                width,
                height,
                rgba.len()
            )));
        }
        let size = IntSize::from_wh(width, height)
            .ok_or_else(|| Error::ImageDecode(format!("invalid image size {}x{}", width, height)))?;

        // tiny-skia stores premultiplied RGBA
        let mut data = Vec::with_capacity(expected);
        for px in rgba.chunks_exact(4) {
            let a = px[3] as u16;
            data.push(((px[0] as u16 * a + 127) / 255) as u8);
            data.push(((px[1] as u16 * a + 127) / 255) as u8);
            data.push(((px[2] as u16 * a + 127) / 255) as u8);
            data.push(px[3]);
        }
        let pixmap = Pixmap::from_vec(data, size)
            .ok_or_else(|| Error::ImageDecode("pixmap rejected image data".into()))?;
        Ok(Self { pixmap })
    }

    /// Decodes an encoded image (PNG always; JPEG/GIF/BMP with `image-decode`).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        #[cfg(feature = "image-decode")]
        {
            let decoded = ::image::load_from_memory(bytes).map_err(|e| {
                log::warn!("image decode failed: {}", e);
                Error::ImageDecode(e.to_string())
            })?;
            let rgba = decoded.to_rgba8();
            let (w, h) = rgba.dimensions();
            Self::from_rgba8(w, h, rgba.as_raw())
        }

        #[cfg(not(feature = "image-decode"))]
        {
            let pixmap = Pixmap::decode_png(bytes).map_err(|e| {
                log::warn!("png decode failed: {}", e);
                Error::ImageDecode(e.to_string())
            })?;
            Ok(Self { pixmap })
        }
    }

    /// Decodes a `data:image/...;base64,` URI.
    pub fn from_data_uri(uri: &str) -> Result<Self> {
        let rest = uri
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| Error::ImageDecode("not a data URI".into()))?;
        let (meta, payload) = rest
            .split_once(',')
            .ok_or_else(|| Error::ImageDecode("data URI has no payload".into()))?;
        if !meta.ends_with(";base64") {
            return Err(Error::ImageDecode(format!(
                "only base64 data URIs are supported (got '{}')",
                meta
            )));
        }
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| Error::ImageDecode(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    pub fn width(&self) -> f64 {
        self.pixmap.width() as f64
    }

    pub fn height(&self) -> f64 {
        self.pixmap.height() as f64
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_png() -> Vec<u8> {
        let mut p = Pixmap::new(2, 3).unwrap();
        p.fill(tiny_skia::Color::from_rgba8(10, 20, 30, 255));
        p.encode_png().unwrap()
    }

    #[test]
    fn decodes_png_bytes() {
        let img = ImageAdapter::from_bytes(&tiny_png()).unwrap();
        assert_eq!(img.width(), 2.0);
        assert_eq!(img.height(), 3.0);
        let px = img.pixmap().pixel(1, 1).unwrap();
        assert_eq!((px.red(), px.green(), px.blue(), px.alpha()), (10, 20, 30, 255));
    }

    #[test]
    fn decodes_base64_data_uri() {
        let b64 = base64::engine::general_purpose::STANDARD.encode(tiny_png());
        let uri = format!("data:image/png;base64,{}", b64);
        let img = ImageAdapter::from_data_uri(&uri).unwrap();
        assert_eq!(img.width(), 2.0);
    }

    #[test]
    fn rejects_non_base64_data_uri() {
        let err = ImageAdapter::from_data_uri("data:image/svg+xml,<svg/>").unwrap_err();
        assert!(matches!(err, Error::ImageDecode(_)));
    }

    #[test]
    fn rgba8_is_premultiplied() {
        let img = ImageAdapter::from_rgba8(1, 1, &[255, 0, 0, 128]).unwrap();
        let px = img.pixmap().pixel(0, 0).unwrap();
        assert_eq!(px.alpha(), 128);
        assert_eq!(px.red(), 128);
        assert!(ImageAdapter::from_rgba8(2, 2, &[0; 4]).is_err());
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(ImageAdapter::from_bytes(b"not an image").is_err());
    }
}
