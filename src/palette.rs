//! Album-art palette extraction.
//!
//! Derives a small ordered set of representative colors from a track's
//! cover image: downscale, sample with a stride, drop near-black and
//! near-white pixels, quantize the rest into coarse RGB buckets, and emit
//! the most populated buckets' average colors as hex strings. Results are
//! cosmetic; every failure degrades to "no palette" at the call site.

use std::{
    collections::HashMap,
    fmt,
    future::Future,
    time::{SystemTime, UNIX_EPOCH},
};

use image::{GenericImageView, imageops::FilterType};
use reqwest::{Client, StatusCode};

/// Longest edge of the downscaled sampling bitmap.
const SAMPLE_SIZE: u32 = 120;

/// Only every n-th pixel of the bitmap is sampled.
const PIXEL_STRIDE: usize = 8;

/// Hard cap on the number of sampled pixels.
const MAX_SAMPLES: usize = (SAMPLE_SIZE * SAMPLE_SIZE) as usize / PIXEL_STRIDE;

/// Channel-sum bounds: mean channel below 20 or above 240 is visually
/// uninteresting for a glow effect and gets discarded.
const MIN_CHANNEL_SUM: u32 = 20 * 3;
const MAX_CHANNEL_SUM: u32 = 240 * 3;

/// Each RGB channel is divided into 256/32 = 8 quantization steps.
const BUCKET_DIVISOR: u8 = 32;

/// Number of swatches emitted when the caller has no preference.
pub const DEFAULT_SWATCHES: usize = 5;

#[derive(Debug)]
pub enum PaletteError {
    Request(reqwest::Error),
    Status(StatusCode),
    Decode(image::ImageError),
}

impl fmt::Display for PaletteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaletteError::Request(err) => write!(f, "artwork request failed: {}", err),
            PaletteError::Status(status) => write!(f, "artwork request returned {}", status),
            PaletteError::Decode(err) => write!(f, "artwork could not be decoded: {}", err),
        }
    }
}

impl std::error::Error for PaletteError {}

impl From<reqwest::Error> for PaletteError {
    fn from(err: reqwest::Error) -> Self {
        PaletteError::Request(err)
    }
}

impl From<image::ImageError> for PaletteError {
    fn from(err: image::ImageError) -> Self {
        PaletteError::Decode(err)
    }
}

/// Downloads the raw artwork bytes.
///
/// A `cacheBust` timestamp parameter is appended so an aggressive HTTP
/// cache cannot serve a stale image for a re-encountered URL.
pub async fn fetch_artwork(client: &Client, url: &str) -> Result<Vec<u8>, PaletteError> {
    let separator = if url.contains('?') { '&' } else { '?' };
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let busted = format!("{url}{separator}cacheBust={stamp}");

    let res = client.get(&busted).send().await?;
    if !res.status().is_success() {
        return Err(PaletteError::Status(res.status()));
    }

    Ok(res.bytes().await?.to_vec())
}

struct Bucket {
    color: [u8; 3],
    count: u32,
}

/// Reduces an encoded image to its `swatches` most common quantized colors.
///
/// The image is downscaled to at most 120×120 preserving aspect ratio,
/// which bounds the sampling cost regardless of source resolution. An
/// image that is entirely near-black or near-white yields an empty vec;
/// callers treat that as "no palette available", not as an error.
///
/// Deterministic for a given input: buckets with equal hit counts keep
/// their first-seen order.
pub fn quantize_palette(bytes: &[u8], swatches: usize) -> Result<Vec<String>, PaletteError> {
    let img = image::load_from_memory(bytes)?;
    let (width, height) = img.dimensions();

    let ratio = width as f64 / height as f64;
    let (target_w, target_h) = if ratio > 1.0 {
        (SAMPLE_SIZE, ((SAMPLE_SIZE as f64 / ratio).round() as u32).max(1))
    } else {
        (((SAMPLE_SIZE as f64 * ratio).round() as u32).max(1), SAMPLE_SIZE)
    };
    let bitmap = img
        .resize_exact(target_w, target_h, FilterType::Triangle)
        .to_rgb8();

    let mut buckets: Vec<Bucket> = Vec::new();
    let mut index: HashMap<(u8, u8, u8), usize> = HashMap::new();
    let mut sampled = 0usize;

    for (i, pixel) in bitmap.pixels().enumerate() {
        if i % PIXEL_STRIDE != 0 {
            continue;
        }

        let [r, g, b] = pixel.0;
        let sum = r as u32 + g as u32 + b as u32;
        if sum < MIN_CHANNEL_SUM || sum > MAX_CHANNEL_SUM {
            continue;
        }

        let key = (r / BUCKET_DIVISOR, g / BUCKET_DIVISOR, b / BUCKET_DIVISOR);
        match index.get(&key) {
            Some(&at) => {
                let bucket = &mut buckets[at];
                bucket.count += 1;
                for (avg, channel) in bucket.color.iter_mut().zip([r, g, b]) {
                    *avg = ((*avg as f64 * (bucket.count - 1) as f64 + channel as f64)
                        / bucket.count as f64)
                        .round() as u8;
                }
            }
            None => {
                index.insert(key, buckets.len());
                buckets.push(Bucket {
                    color: [r, g, b],
                    count: 1,
                });
            }
        }

        sampled += 1;
        if sampled >= MAX_SAMPLES {
            break;
        }
    }

    // Stable sort keeps first-seen order among equal counts.
    buckets.sort_by(|a, b| b.count.cmp(&a.count));

    Ok(buckets
        .iter()
        .take(swatches)
        .map(|b| format!("#{:02X}{:02X}{:02X}", b.color[0], b.color[1], b.color[2]))
        .collect())
}

/// Parses a `#RRGGBB` swatch back into channels, for terminal rendering.
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

/// Per-track palette cache. Additive for the session's lifetime: entries
/// are never evicted, so a re-encountered track costs zero extraction work.
#[derive(Debug, Default)]
pub struct PaletteCache {
    entries: HashMap<String, Vec<String>>,
}

impl PaletteCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, track_id: &str) -> Option<&Vec<String>> {
        self.entries.get(track_id)
    }

    /// Returns the cached palette for `track_id`, or loads the artwork via
    /// `load` and extracts one. The loader is not invoked on a cache hit.
    pub async fn get_or_extract<F, Fut>(
        &mut self,
        track_id: &str,
        swatches: usize,
        load: F,
    ) -> Result<Vec<String>, PaletteError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<u8>, PaletteError>>,
    {
        if let Some(palette) = self.entries.get(track_id) {
            return Ok(palette.clone());
        }

        let bytes = load().await?;
        let palette = quantize_palette(&bytes, swatches)?;
        self.entries.insert(track_id.to_string(), palette.clone());
        Ok(palette)
    }
}
