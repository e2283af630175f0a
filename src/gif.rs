//! GIF animation rendering

use crate::output::{ensure_parent, OutputError};
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Hold time used for frames without an explicit duration.
const DEFAULT_DURATION_MS: u32 = 100;

/// Render a sequence of frames as an animated GIF.
///
/// `durations_ms[i]` is how long frame `i` is shown; frames past the end of
/// `durations_ms` use 100 ms. GIF delays are stored in centiseconds, so each
/// duration is rounded to the nearest 10 ms (minimum 10 ms). An empty frame
/// list writes nothing.
pub fn render_gif(
    frames: &[RgbaImage],
    durations_ms: &[u32],
    loop_anim: bool,
    path: &Path,
) -> Result<(), OutputError> {
    if frames.is_empty() {
        return Ok(());
    }

    ensure_parent(path)?;
    let file = File::create(path).map_err(|e| OutputError::io(path, e))?;
    let mut encoder = GifEncoder::new(BufWriter::new(file));

    let repeat = if loop_anim { Repeat::Infinite } else { Repeat::Finite(0) };
    encoder.set_repeat(repeat).map_err(|e| OutputError::image(path, e))?;

    for (i, rgba_image) in frames.iter().enumerate() {
        let ms = durations_ms.get(i).copied().unwrap_or(DEFAULT_DURATION_MS);
        let delay_cs = ((ms + 5) / 10).max(1);
        let frame = Frame::from_parts(rgba_image.clone(), 0, 0, Delay::from_numer_denom_ms(delay_cs * 10, 1));
        encoder.encode_frame(frame).map_err(|e| OutputError::image(path, e))?;
    }

    log::debug!("wrote {} ({} frames)", path.display(), frames.len());
    Ok(())
}
