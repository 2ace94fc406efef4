//! Tests for GIF compilation.

use std::io::Cursor;

use image::codecs::gif::GifDecoder;
use image::AnimationDecoder;

use renderer::colormap::Color;
use renderer::gif::save_gif;
use renderer::{compile_gif, Frame};

fn solid(color: Color) -> Frame {
    Frame::filled(16, 16, color)
}

#[test]
fn test_compile_gif_preserves_frame_order() {
    let colors = [
        Color::rgb(255, 0, 0),
        Color::rgb(0, 255, 0),
        Color::rgb(0, 0, 255),
    ];
    let frames: Vec<Frame> = colors.iter().map(|&c| solid(c)).collect();

    let encoded = compile_gif(&frames, 100).unwrap();

    let decoder = GifDecoder::new(Cursor::new(&encoded[..])).unwrap();
    let decoded = decoder.into_frames().collect_frames().unwrap();
    assert_eq!(decoded.len(), 3);

    // GIF encoding quantizes the palette, so compare dominant channels
    // rather than exact values.
    for (i, (frame, expected)) in decoded.iter().zip(&colors).enumerate() {
        let px = frame.buffer().get_pixel(8, 8);
        let channels = [expected.r, expected.g, expected.b];
        let dominant = channels.iter().position(|&c| c == 255).unwrap();
        for c in 0..3 {
            if c == dominant {
                assert!(px[c] > 200, "frame {i}: channel {c} lost its dominance");
            } else {
                assert!(px[c] < 60, "frame {i}: channel {c} unexpectedly bright");
            }
        }
    }
}

#[test]
fn test_compile_gif_applies_frame_delay() {
    let frames = vec![solid(Color::rgb(40, 40, 40)); 2];
    let encoded = compile_gif(&frames, 100).unwrap();

    let decoder = GifDecoder::new(Cursor::new(&encoded[..])).unwrap();
    let decoded = decoder.into_frames().collect_frames().unwrap();
    let (numer, denom) = decoded[0].delay().numer_denom_ms();
    assert_eq!(numer / denom, 100);
}

#[test]
fn test_compile_gif_rejects_empty_sequence() {
    let err = compile_gif(&[], 100).unwrap_err();
    assert!(matches!(err, wx_common::WxError::EmptySequence));
}

#[test]
fn test_save_gif_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("loop.gif");
    let frames = vec![solid(Color::rgb(120, 60, 30)); 2];

    save_gif(&frames, 50, &path).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..6], b"GIF89a");
}
