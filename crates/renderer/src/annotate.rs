//! Frame annotation: identifier/timestamp banner text.
//!
//! Uses a built-in 5x7 pixel glyph set (uppercase, digits, punctuation)
//! rather than a font asset; banner strings are normalized to uppercase.

use crate::colormap::Color;
use crate::frame::Frame;

const GLYPH_WIDTH: usize = 5;
const GLYPH_HEIGHT: usize = 7;
const GLYPH_ADVANCE: usize = 6;

/// Banner strip height in pixels.
pub const BANNER_HEIGHT: usize = 13;

/// Draw `text` with its top-left corner at (x, y). Characters without a
/// glyph render as blanks.
pub fn draw_text(frame: &mut Frame, x: usize, y: usize, text: &str, color: Color) {
    let mut cursor = x;
    for ch in text.chars() {
        if let Some(rows) = glyph(ch.to_ascii_uppercase()) {
            for (dy, row) in rows.iter().enumerate() {
                for dx in 0..GLYPH_WIDTH {
                    if row & (0x10 >> dx) != 0 {
                        frame.set_pixel(cursor + dx, y + dy, color);
                    }
                }
            }
        }
        cursor += GLYPH_ADVANCE;
    }
}

/// Pixel width of `text` when drawn with [`draw_text`].
pub fn text_width(text: &str) -> usize {
    text.chars().count() * GLYPH_ADVANCE
}

/// Draw a dark banner strip along the bottom edge with `text` in white.
pub fn draw_banner(frame: &mut Frame, text: &str) {
    if frame.height < BANNER_HEIGHT {
        return;
    }
    let top = frame.height - BANNER_HEIGHT;
    frame.fill_rect(0, top, frame.width, BANNER_HEIGHT, Color::rgb(10, 10, 10));
    draw_text(frame, 4, top + 3, text, Color::rgb(255, 255, 255));
}

/// 5x7 glyph rows, MSB-of-5 leftmost.
fn glyph(ch: char) -> Option<[u8; GLYPH_HEIGHT]> {
    let rows = match ch {
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1C, 0x12, 0x11, 0x11, 0x11, 0x12, 0x1C],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        ' ' => [0x00; 7],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        ':' => [0x00, 0x04, 0x00, 0x00, 0x00, 0x04, 0x00],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        '/' => [0x01, 0x01, 0x02, 0x04, 0x08, 0x10, 0x10],
        '(' => [0x02, 0x04, 0x08, 0x08, 0x08, 0x04, 0x02],
        ')' => [0x08, 0x04, 0x02, 0x02, 0x02, 0x04, 0x08],
        _ => return None,
    };
    Some(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_text_sets_pixels() {
        let mut frame = Frame::filled(40, 10, Color::rgb(0, 0, 0));
        draw_text(&mut frame, 0, 0, "KTLX", Color::rgb(255, 255, 255));
        assert!(frame.pixels.iter().any(|&b| b == 255));
    }

    #[test]
    fn test_unknown_glyphs_are_blank() {
        let mut frame = Frame::filled(20, 10, Color::rgb(0, 0, 0));
        draw_text(&mut frame, 0, 0, "@#", Color::rgb(255, 255, 255));
        assert!(frame.pixels.iter().step_by(4).all(|&r| r == 0));
    }

    #[test]
    fn test_banner_covers_bottom_strip() {
        let mut frame = Frame::filled(60, 40, Color::rgb(200, 200, 200));
        draw_banner(&mut frame, "KTLX 2019-09-01 00:00 UTC");
        // Banner background replaces the bottom rows.
        assert_eq!(frame.get_pixel(0, 39), Color::rgb(10, 10, 10));
        // Rows above the banner are untouched.
        assert_eq!(frame.get_pixel(0, 0), Color::rgb(200, 200, 200));
    }

    #[test]
    fn test_text_width() {
        assert_eq!(text_width("KTLX"), 4 * 6);
    }
}
