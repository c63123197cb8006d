//! # Cover Module
//!
//! Renders the square artwork uploaded to newly created monthly playlists
//! and served by `GET /api/images/cover/{month}/{year}`.
//!
//! ## Layout
//!
//! ```text
//! ┌────────────────────────────┐  top colour
//! │  padding                   │
//! │  ███ ███ ███   month code  │  height size/5
//! │                            │
//! │  ██ ██ ██ ██   year        │  height size/7, at padding + size/4
//! │        ◯    ◯              │  3 translucent circles
//! │   ◯                        │
//! └────────────────────────────┘  bottom colour
//! ```
//!
//! Both text lines carry a blurred dark drop shadow. The background
//! gradient and the circles are random; callers that need reproducible
//! output pass their own seeded generator to [`generate`].

pub mod font;

use std::io::Cursor;

use image::{
    DynamicImage, ImageFormat, Rgb, Rgba, RgbaImage,
    codecs::jpeg::JpegEncoder,
    imageops,
};
use rand::{Rng, seq::IndexedRandom};

use crate::{Error, Res};

/// Edge length of generated covers, in pixels.
pub const COVER_SIZE: u32 = 640;

/// Largest JPEG accepted for upload. Spotify caps the base64 body at
/// 256 KB, and base64 grows the payload by a third.
pub const UPLOAD_BYTE_BUDGET: usize = 190_000;

/// Background gradients as (top, bottom) colour pairs.
pub const GRADIENT_PRESETS: [(Rgb<u8>, Rgb<u8>); 5] = [
    (Rgb([0, 180, 255]), Rgb([255, 0, 150])),
    (Rgb([255, 95, 109]), Rgb([255, 195, 113])),
    (Rgb([131, 58, 180]), Rgb([253, 29, 29])),
    (Rgb([29, 253, 149]), Rgb([29, 87, 253])),
    (Rgb([255, 204, 0]), Rgb([255, 82, 82])),
];

const CIRCLE_COUNT: usize = 3;
const CIRCLE_COLOR: Rgba<u8> = Rgba([255, 255, 255, 60]);
const SHADOW_SIGMA: f32 = 6.0;
const MONTH_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);
const MONTH_SHADOW: Rgba<u8> = Rgba([0, 0, 0, 150]);
const YEAR_COLOR: Rgba<u8> = Rgba([235, 235, 235, 255]);
const YEAR_SHADOW: Rgba<u8> = Rgba([0, 0, 0, 140]);

const JPEG_QUALITY_START: u8 = 90;
const JPEG_QUALITY_FLOOR: u8 = 10;
const JPEG_QUALITY_STEP: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverFormat {
    Png,
    /// Lossy encoding, quality lowered until the output fits `max_bytes`.
    Jpeg { max_bytes: usize },
}

/// Checks the month and year path segments of a cover request.
///
/// The month must be three ASCII letters and the year four digits.
/// Returns the upper-cased month code and the numeric year.
pub fn validate_request(month: &str, year: &str) -> Res<(String, i32)> {
    if month.len() != 3 || !month.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(Error::InvalidIdentifier(format!(
            "month code {:?} must be three letters",
            month
        )));
    }

    let invalid_year = || Error::InvalidIdentifier(format!("year {:?} must be four digits", year));
    if year.len() != 4 || !year.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid_year());
    }
    let year = year.parse::<i32>().map_err(|_| invalid_year())?;

    Ok((month.to_ascii_uppercase(), year))
}

/// Draws a cover for `month_code` and `year` on a `size`×`size` canvas.
pub fn generate<R>(month_code: &str, year: i32, size: u32, rng: &mut R) -> RgbaImage
where
    R: Rng + ?Sized,
{
    let (top, bottom) = *GRADIENT_PRESETS.choose(rng).unwrap_or(&GRADIENT_PRESETS[0]);
    let mut image = gradient(size, top, bottom);

    for _ in 0..CIRCLE_COUNT {
        let diameter = rng.random_range(size / 3..=size / 2).max(1) as i64;
        let size = i64::from(size);
        let x = rng.random_range(-diameter / 2..=size - diameter / 2);
        let y = rng.random_range(-diameter / 2..=size - diameter / 2);
        fill_circle(&mut image, x, y, diameter, CIRCLE_COLOR);
    }

    let padding = i64::from(size / 12);
    let month_y = padding;
    let year_y = month_y + i64::from(size / 4);

    draw_shadowed_text(
        &mut image,
        &month_code.to_uppercase(),
        (padding, month_y),
        size / 5,
        MONTH_COLOR,
        MONTH_SHADOW,
    );
    draw_shadowed_text(
        &mut image,
        &year.to_string(),
        (padding, year_y),
        size / 7,
        YEAR_COLOR,
        YEAR_SHADOW,
    );

    // Float blending can leave alpha a step below opaque.
    for pixel in image.pixels_mut() {
        pixel.0[3] = u8::MAX;
    }

    image
}

/// Encodes a generated cover.
///
/// # Errors
///
/// `Unexpected` if the encoder fails, or if a JPEG does not fit its byte
/// budget even at the lowest quality.
pub fn encode(image: &RgbaImage, format: CoverFormat) -> Res<Vec<u8>> {
    let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();

    match format {
        CoverFormat::Png => {
            let mut buf = Cursor::new(Vec::new());
            rgb.write_to(&mut buf, ImageFormat::Png)?;
            Ok(buf.into_inner())
        }
        CoverFormat::Jpeg { max_bytes } => {
            let mut quality = JPEG_QUALITY_START;
            loop {
                let mut buf = Vec::new();
                rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, quality))?;
                if buf.len() <= max_bytes {
                    return Ok(buf);
                }
                if quality <= JPEG_QUALITY_FLOOR {
                    return Err(Error::Unexpected(format!(
                        "cover is {} bytes at quality {}, budget is {}",
                        buf.len(),
                        quality,
                        max_bytes
                    )));
                }
                quality = quality.saturating_sub(JPEG_QUALITY_STEP).max(JPEG_QUALITY_FLOOR);
            }
        }
    }
}

/// Generates and encodes a [`COVER_SIZE`] cover with the thread-local
/// random source.
pub fn render(month_code: &str, year: i32, format: CoverFormat) -> Res<Vec<u8>> {
    let image = generate(month_code, year, COVER_SIZE, &mut rand::rng());
    encode(&image, format)
}

fn gradient(size: u32, top: Rgb<u8>, bottom: Rgb<u8>) -> RgbaImage {
    let span = size.max(1) as i32;
    RgbaImage::from_fn(size, size, |_, y| {
        let y = y as i32;
        let channel = |i: usize| {
            let (from, to) = (i32::from(top[i]), i32::from(bottom[i]));
            (from + (to - from) * y / span) as u8
        };
        Rgba([channel(0), channel(1), channel(2), 255])
    })
}

fn fill_circle(image: &mut RgbaImage, x: i64, y: i64, diameter: i64, color: Rgba<u8>) {
    use image::Pixel;

    let (width, height) = (i64::from(image.width()), i64::from(image.height()));
    // Doubled coordinates keep the centre on the pixel grid for odd diameters.
    let (cx2, cy2) = (2 * x + diameter, 2 * y + diameter);
    let r2 = diameter * diameter;

    for py in y.max(0)..(y + diameter).min(height) {
        for px in x.max(0)..(x + diameter).min(width) {
            let dx = 2 * px + 1 - cx2;
            let dy = 2 * py + 1 - cy2;
            if dx * dx + dy * dy <= r2 {
                image.get_pixel_mut(px as u32, py as u32).blend(&color);
            }
        }
    }
}

fn draw_shadowed_text(
    image: &mut RgbaImage,
    text: &str,
    (x, y): (i64, i64),
    height: u32,
    color: Rgba<u8>,
    shadow: Rgba<u8>,
) {
    let mut layer = RgbaImage::new(image.width(), image.height());
    font::draw_text(&mut layer, text, x, y, height, shadow);
    let layer = imageops::blur(&layer, SHADOW_SIGMA);
    imageops::overlay(image, &layer, 0, 0);

    font::draw_text(image, text, x, y, height, color);
}
