use image::codecs::png::PngEncoder;
use image::{ColorType, GrayImage, ImageEncoder, Luma};
use qrcode::types::QrError;
use qrcode::{Color, EcLevel, QrCode, Version};
use serde::{Deserialize, Serialize};

use crate::{AboutError, Result};

/// Side of the rendered bitmap, in pixels.
pub const DEFAULT_SIZE: u32 = 512;
/// Light border around the symbol, in modules. Four is the margin the QR
/// standard asks readers to expect.
pub const DEFAULT_QUIET_ZONE: u32 = 4;

const DARK: Luma<u8> = Luma([0]);
const LIGHT: Luma<u8> = Luma([255]);

#[derive(Eq, PartialEq, Hash, Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Correction {
    Low,
    Medium,
    Quartile,
    High,
}

impl Correction {
    /// This level followed by every weaker one, strongest first.
    fn fallbacks(self) -> &'static [Correction] {
        use Correction::*;
        static ORDER: [Correction; 4] = [High, Quartile, Medium, Low];
        let start = ORDER
            .iter()
            .position(|level| *level == self)
            .unwrap_or(0);
        &ORDER[start..]
    }
}

impl From<Correction> for EcLevel {
    fn from(level: Correction) -> Self {
        match level {
            Correction::Low => EcLevel::L,
            Correction::Medium => EcLevel::M,
            Correction::Quartile => EcLevel::Q,
            Correction::High => EcLevel::H,
        }
    }
}

impl From<EcLevel> for Correction {
    fn from(level: EcLevel) -> Self {
        match level {
            EcLevel::L => Correction::Low,
            EcLevel::M => Correction::Medium,
            EcLevel::Q => Correction::Quartile,
            EcLevel::H => Correction::High,
        }
    }
}

#[derive(Eq, PartialEq, Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct QrOptions {
    pub size: u32,
    pub quiet_zone: u32,
    /// Level tried first. Weaker levels are tried when the payload
    /// does not fit.
    pub error_correction: Correction,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            quiet_zone: DEFAULT_QUIET_ZONE,
            error_correction: Correction::Medium,
        }
    }
}

/// Module grid of an encoded symbol, without the quiet zone.
#[derive(Eq, PartialEq, Clone, Debug)]
pub struct QrMatrix {
    width: usize,
    dark: Vec<bool>,
    version: i16,
    error_correction: Correction,
}

impl QrMatrix {
    fn from_code(code: &QrCode) -> Self {
        let version = match code.version() {
            Version::Normal(v) | Version::Micro(v) => v,
        };
        Self {
            width: code.width(),
            dark: code
                .to_colors()
                .into_iter()
                .map(|color| color == Color::Dark)
                .collect(),
            version,
            error_correction: code.error_correction_level().into(),
        }
    }

    /// Modules per side.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn version(&self) -> i16 {
        self.version
    }

    pub fn error_correction(&self) -> Correction {
        self.error_correction
    }

    /// Out-of-range coordinates read as light.
    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.width && self.dark[y * self.width + x]
    }
}

/// Square two-color raster of a QR symbol.
#[derive(Clone, Debug)]
pub struct QrBitmap {
    image: GrayImage,
    modules: u32,
}

impl QrBitmap {
    pub fn size(&self) -> u32 {
        self.image.width()
    }

    /// Modules per side including the quiet zone on both sides.
    pub fn module_count(&self) -> u32 {
        self.modules
    }

    pub fn is_dark(&self, x: u32, y: u32) -> bool {
        self.image.get_pixel(x, y) == &DARK
    }

    pub fn as_image(&self) -> &GrayImage {
        &self.image
    }

    pub fn into_image(self) -> GrayImage {
        self.image
    }

    /// Encode as an in-memory PNG.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        PngEncoder::new(&mut bytes).write_image(
            self.image.as_raw(),
            self.image.width(),
            self.image.height(),
            ColorType::L8,
        )?;
        Ok(bytes)
    }
}

impl PartialEq for QrBitmap {
    fn eq(&self, other: &Self) -> bool {
        self.modules == other.modules
            && self.image.dimensions() == other.image.dimensions()
            && self.image.as_raw() == other.image.as_raw()
    }
}

impl Eq for QrBitmap {}

/// Encode `payload` at the first error correction level, starting from
/// the preferred one, whose largest version still holds it.
pub fn encode(payload: &str, options: &QrOptions) -> Result<QrMatrix> {
    for level in options.error_correction.fallbacks() {
        match QrCode::with_error_correction_level(payload, (*level).into()) {
            Ok(code) => {
                let matrix = QrMatrix::from_code(&code);
                log::debug!(
                    "Encoded {} bytes as version {} at {:?}",
                    payload.len(),
                    matrix.version,
                    matrix.error_correction
                );
                return Ok(matrix);
            }
            Err(QrError::DataTooLong) => {
                log::trace!(
                    "{} bytes do not fit at {:?}, lowering correction",
                    payload.len(),
                    level
                );
            }
            Err(e) => return Err(AboutError::Encoding(e.to_string())),
        }
    }

    log::warn!("Payload of {} bytes exceeds QR capacity", payload.len());
    Err(AboutError::EncodingCapacityExceeded { len: payload.len() })
}

/// Render with the default options: 512x512, four module quiet zone.
pub fn render(payload: &str) -> Result<QrBitmap> {
    render_with(payload, &QrOptions::default())
}

pub fn render_with(payload: &str, options: &QrOptions) -> Result<QrBitmap> {
    if options.size == 0 {
        return Err(AboutError::Encoding(
            "output size must be positive".to_owned(),
        ));
    }
    let matrix = encode(payload, options)?;
    Ok(rasterize(&matrix, options.size, options.quiet_zone))
}

/// Nearest-neighbor scale-up of the padded module grid. The scale factor
/// is generally not an integer, so every pixel maps back to the module
/// `pixel * count / size`.
fn rasterize(matrix: &QrMatrix, size: u32, quiet_zone: u32) -> QrBitmap {
    let quiet = quiet_zone as usize;
    let count = matrix.width() + 2 * quiet;

    // Index into the unpadded grid, None inside the quiet zone.
    let lookup: Vec<Option<usize>> = (0..size as u64)
        .map(|pixel| (pixel * count as u64 / size as u64) as usize)
        .map(|module| module.checked_sub(quiet).filter(|m| *m < matrix.width()))
        .collect();

    let image = GrayImage::from_fn(size, size, |x, y| {
        match (lookup[x as usize], lookup[y as usize]) {
            (Some(mx), Some(my)) if matrix.is_dark(mx, my) => DARK,
            _ => LIGHT,
        }
    });

    QrBitmap {
        image,
        modules: count as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const SHORT: &str = "https://example.com";

    #[test]
    fn default_render_is_square_and_two_color() {
        let bitmap = render(SHORT).unwrap();
        assert_eq!(bitmap.size(), DEFAULT_SIZE);
        assert_eq!(bitmap.as_image().height(), DEFAULT_SIZE);
        assert!(bitmap
            .as_image()
            .pixels()
            .all(|p| *p == DARK || *p == LIGHT));
    }

    #[test]
    fn render_is_idempotent() {
        assert_eq!(render(SHORT).unwrap(), render(SHORT).unwrap());
    }

    #[test]
    fn corners_are_quiet_and_finder_is_dark() {
        let bitmap = render(SHORT).unwrap();
        let count = bitmap.module_count();
        assert!(!bitmap.is_dark(0, 0));
        assert!(!bitmap.is_dark(DEFAULT_SIZE - 1, DEFAULT_SIZE - 1));
        // Center of the first module of the top-left finder pattern.
        let center = (2 * DEFAULT_QUIET_ZONE + 1) * DEFAULT_SIZE / (2 * count);
        assert!(bitmap.is_dark(center, center));
    }

    #[test]
    fn module_count_includes_quiet_zone() {
        let options = QrOptions::default();
        let matrix = encode(SHORT, &options).unwrap();
        let bitmap = render_with(SHORT, &options).unwrap();
        assert_eq!(
            bitmap.module_count() as usize,
            matrix.width() + 2 * DEFAULT_QUIET_ZONE as usize
        );
    }

    #[rstest]
    #[case(0)]
    #[case(2)]
    fn nearest_neighbor_matches_modules(#[case] quiet_zone: u32) {
        let options = QrOptions {
            quiet_zone,
            ..QrOptions::default()
        };
        let matrix = encode(SHORT, &options).unwrap();
        let bitmap = render_with(SHORT, &options).unwrap();
        let count = bitmap.module_count();
        for y in 0..DEFAULT_SIZE {
            for x in 0..DEFAULT_SIZE {
                let mx = (x * count / DEFAULT_SIZE) as i64 - quiet_zone as i64;
                let my = (y * count / DEFAULT_SIZE) as i64 - quiet_zone as i64;
                let expected = mx >= 0
                    && my >= 0
                    && matrix.is_dark(mx as usize, my as usize);
                assert_eq!(bitmap.is_dark(x, y), expected, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn exact_integer_scale() {
        let options = QrOptions {
            quiet_zone: 0,
            ..QrOptions::default()
        };
        let width = encode(SHORT, &options).unwrap().width() as u32;
        let options = QrOptions {
            size: width * 3,
            ..options
        };
        let bitmap = render_with(SHORT, &options).unwrap();
        assert_eq!(bitmap.size(), width * 3);
        for m in 0..width {
            let corner = bitmap.is_dark(m * 3, 0);
            assert_eq!(bitmap.is_dark(m * 3 + 1, 1), corner);
            assert_eq!(bitmap.is_dark(m * 3 + 2, 2), corner);
        }
    }

    #[test]
    fn preferred_level_used_when_it_fits() {
        let options = QrOptions {
            error_correction: Correction::High,
            ..QrOptions::default()
        };
        let matrix = encode(SHORT, &options).unwrap();
        assert_eq!(matrix.error_correction(), Correction::High);
    }

    #[test]
    fn falls_back_to_lower_correction() {
        // Over the 2331 byte version 40 capacity at Medium, under 2953 at Low.
        let payload = "a".repeat(2500);
        let matrix = encode(&payload, &QrOptions::default()).unwrap();
        assert_eq!(matrix.error_correction(), Correction::Low);
        assert_eq!(matrix.width(), 17 + 4 * matrix.version() as usize);
    }

    #[test]
    fn capacity_exceeded() {
        let payload = "a".repeat(3000);
        let err = render(&payload).unwrap_err();
        assert!(matches!(
            err,
            AboutError::EncodingCapacityExceeded { len: 3000 }
        ));
    }

    #[test]
    fn zero_size_is_rejected() {
        let options = QrOptions {
            size: 0,
            ..QrOptions::default()
        };
        assert!(matches!(
            render_with(SHORT, &options),
            Err(AboutError::Encoding(_))
        ));
    }

    #[test]
    fn png_export_decodes_to_same_pixels() {
        let bitmap = render(SHORT).unwrap();
        let png = bitmap.to_png().unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_luma8();
        assert_eq!(decoded.dimensions(), (DEFAULT_SIZE, DEFAULT_SIZE));
        assert_eq!(decoded.as_raw(), bitmap.as_image().as_raw());
    }

    #[rstest]
    #[case(Correction::High, 4)]
    #[case(Correction::Quartile, 3)]
    #[case(Correction::Medium, 2)]
    #[case(Correction::Low, 1)]
    fn fallback_chain(#[case] level: Correction, #[case] len: usize) {
        let chain = level.fallbacks();
        assert_eq!(chain.len(), len);
        assert_eq!(chain[0], level);
        assert_eq!(chain[len - 1], Correction::Low);
    }
}
