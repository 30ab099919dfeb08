use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};

use image::{ImageBuffer, ImageFormat, Rgb};
use sponowcli::palette::{PaletteCache, PaletteError, hex_to_rgb, quantize_palette};

// Helper function to encode an RGB bitmap as PNG bytes
fn png_bytes(img: &ImageBuffer<Rgb<u8>, Vec<u8>>) -> Vec<u8> {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

// Helper function to build a solid-color image
fn solid(width: u32, height: u32, color: [u8; 3]) -> ImageBuffer<Rgb<u8>, Vec<u8>> {
    ImageBuffer::from_pixel(width, height, Rgb(color))
}

#[test]
fn test_all_black_image_yields_empty_palette() {
    let bytes = png_bytes(&solid(10, 10, [0, 0, 0]));
    let palette = quantize_palette(&bytes, 5).unwrap();
    assert!(palette.is_empty());
}

#[test]
fn test_all_white_image_yields_empty_palette() {
    let bytes = png_bytes(&solid(10, 10, [255, 255, 255]));
    let palette = quantize_palette(&bytes, 5).unwrap();
    assert!(palette.is_empty());
}

#[test]
fn test_solid_color_image_yields_its_color() {
    let bytes = png_bytes(&solid(120, 120, [200, 40, 120]));
    let palette = quantize_palette(&bytes, 5).unwrap();

    assert_eq!(palette, vec!["#C82878".to_string()]);
}

#[test]
fn test_swatches_are_hex_formatted_and_capped() {
    // Four distinct quantization buckets, stripes wide enough to survive
    // the downscale
    let img = ImageBuffer::from_fn(120, 120, |x, _| match x / 30 {
        0 => Rgb([200, 40, 40]),
        1 => Rgb([40, 200, 40]),
        2 => Rgb([40, 40, 200]),
        _ => Rgb([200, 200, 40]),
    });
    let palette = quantize_palette(&png_bytes(&img), 3).unwrap();

    assert_eq!(palette.len(), 3);
    for hex in &palette {
        assert_eq!(hex.len(), 7);
        assert!(hex.starts_with('#'));
        assert!(hex[1..].chars().all(|c| c.is_ascii_hexdigit()));
    }
}

#[test]
fn test_extraction_is_deterministic() {
    let img = ImageBuffer::from_fn(120, 120, |x, y| {
        Rgb([(x * 2) as u8, (y * 2) as u8, 128])
    });
    let bytes = png_bytes(&img);

    let first = quantize_palette(&bytes, 5).unwrap();
    let second = quantize_palette(&bytes, 5).unwrap();

    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn test_dominant_color_listed_first() {
    // Three quarters red, one quarter blue
    let img = ImageBuffer::from_fn(120, 120, |x, _| {
        if x < 90 {
            Rgb([200, 40, 40])
        } else {
            Rgb([40, 40, 200])
        }
    });
    let palette = quantize_palette(&png_bytes(&img), 5).unwrap();

    assert!(palette.len() >= 2);
    let (r, _, b) = hex_to_rgb(&palette[0]).unwrap();
    assert!(r > 150 && b < 100);
}

#[test]
fn test_hex_to_rgb() {
    assert_eq!(hex_to_rgb("#C82878"), Some((200, 40, 120)));
    assert_eq!(hex_to_rgb("#000000"), Some((0, 0, 0)));
    assert_eq!(hex_to_rgb("#FFFFFF"), Some((255, 255, 255)));

    assert_eq!(hex_to_rgb("C82878"), None);
    assert_eq!(hex_to_rgb("#FFF"), None);
    assert_eq!(hex_to_rgb("#GGGGGG"), None);
}

#[test]
fn test_garbage_bytes_are_a_decode_error() {
    assert!(quantize_palette(b"definitely not an image", 5).is_err());
}

#[tokio::test]
async fn test_cache_hit_skips_loader() {
    let mut cache = PaletteCache::new();
    let calls = AtomicUsize::new(0);
    let bytes = png_bytes(&solid(16, 16, [200, 40, 120]));

    let first = cache
        .get_or_extract("T1", 5, || {
            calls.fetch_add(1, Ordering::SeqCst);
            let bytes = bytes.clone();
            async move { Ok::<Vec<u8>, PaletteError>(bytes) }
        })
        .await
        .unwrap();

    let second = cache
        .get_or_extract("T1", 5, || {
            calls.fetch_add(1, Ordering::SeqCst);
            let bytes = bytes.clone();
            async move { Ok::<Vec<u8>, PaletteError>(bytes) }
        })
        .await
        .unwrap();

    // The second request must be served from the cache
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_distinct_tracks_extract_separately() {
    let mut cache = PaletteCache::new();
    let calls = AtomicUsize::new(0);
    let bytes = png_bytes(&solid(16, 16, [200, 40, 120]));

    for track_id in ["T1", "T2"] {
        cache
            .get_or_extract(track_id, 5, || {
                calls.fetch_add(1, Ordering::SeqCst);
                let bytes = bytes.clone();
                async move { Ok::<Vec<u8>, PaletteError>(bytes) }
            })
            .await
            .unwrap();
    }

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(cache.get("T1").is_some());
    assert!(cache.get("T2").is_some());
}
