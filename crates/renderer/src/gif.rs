//! Animation compilation: ordered frames into a looping GIF.

use std::path::Path;

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame as ImageFrame, RgbaImage};
use tracing::info;

use wx_common::{WxError, WxResult};

use crate::frame::Frame;

/// Encode an ordered, non-empty frame sequence into an infinitely looping
/// GIF. Frame order is preserved exactly.
pub fn compile_gif(frames: &[Frame], frame_delay_ms: u32) -> WxResult<Vec<u8>> {
    if frames.is_empty() {
        return Err(WxError::EmptySequence);
    }

    let mut out = Vec::new();
    {
        let mut encoder = GifEncoder::new(&mut out);
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|e| WxError::Render(format!("GIF encoder setup failed: {e}")))?;

        for frame in frames {
            let image = RgbaImage::from_raw(
                frame.width as u32,
                frame.height as u32,
                frame.pixels.clone(),
            )
            .ok_or_else(|| WxError::Render("frame buffer size mismatch".to_string()))?;

            let delay = Delay::from_numer_denom_ms(frame_delay_ms, 1);
            encoder
                .encode_frame(ImageFrame::from_parts(image, 0, 0, delay))
                .map_err(|e| WxError::Render(format!("GIF frame encoding failed: {e}")))?;
        }
    }

    info!(frames = frames.len(), bytes = out.len(), "Compiled GIF");
    Ok(out)
}

/// Compile and write to a file.
pub fn save_gif(frames: &[Frame], frame_delay_ms: u32, path: impl AsRef<Path>) -> WxResult<()> {
    let encoded = compile_gif(frames, frame_delay_ms)?;
    std::fs::write(path, encoded)?;
    Ok(())
}
