//! Adam7 de-interlacing.
//!
//! ```text
//! 1 6 4 6 2 6 4 6
//! 7 7 7 7 7 7 7 7
//! 5 6 5 6 5 6 5 6
//! 7 7 7 7 7 7 7 7
//! 3 6 4 6 3 6 4 6
//! 7 7 7 7 7 7 7 7
//! 5 6 5 6 5 6 5 6
//! 7 7 7 7 7 7 7 7
//! ```

use crate::{
    error::{Error, Result},
    filter,
    scanline::Scanline,
};
use tracing::error;

/// Where each pass starts and how far apart its pixels are: (x offset, y offset, x step, y step).
const PASSES: [(u32, u32, u32, u32); 7] = [
    (0, 0, 8, 8),
    (4, 0, 8, 8),
    (0, 4, 4, 8),
    (2, 0, 4, 4),
    (0, 2, 2, 4),
    (1, 0, 2, 2),
    (0, 1, 1, 2),
];

/// Dimensions of the reduced image a pass covers. Either may be zero for small images.
pub fn pass_dimensions(pass: usize, width: u32, height: u32) -> (u32, u32) {
    let (x0, y0, dx, dy) = PASSES[pass];
    let span = |full: u32, start: u32, step: u32| if full > start { (full - start + step - 1) / step } else { 0 };

    (span(width, x0, dx), span(height, y0, dy))
}

/// Bytes every pass takes up in the image data as (row length, pass length), along with their total. Passes without
/// pixels take up nothing. `None` if the sizes don't fit in a `usize`.
fn pass_lengths(width: u32, height: u32, pixel_bytes: usize) -> Option<([(usize, usize); 7], usize)> {
    let mut lengths = [(0, 0); 7];
    let mut total = 0usize;

    for (pass, length) in lengths.iter_mut().enumerate() {
        let (pass_width, pass_height) = pass_dimensions(pass, width, height);
        if pass_width == 0 || pass_height == 0 {
            continue;
        }

        let row_length = (pass_width as usize).checked_mul(pixel_bytes)?.checked_add(1)?;
        let pass_length = row_length.checked_mul(pass_height as usize)?;

        *length = (row_length, pass_length);
        total = total.checked_add(pass_length)?;
    }

    Some((lengths, total))
}

/// Unfilters the seven reduced images in `data` and scatters their pixels into full size scanlines.
///
/// Every returned row starts with a zero filter type byte followed by `width` pixels, the same shape
/// [`crate::scanline::scanlines`] produces for non-interlaced images. A reduced scanline with an invalid filter type
/// is logged and skipped, leaving its pixels zeroed.
pub fn deinterlace(width: u32, height: u32, sample_bit_count: u8, data: &[u8]) -> Result<Vec<Scanline>> {
    if sample_bit_count < 8 {
        return Err(Error::UnsupportedInterlace(sample_bit_count));
    }

    let pixel_bytes = sample_bit_count as usize / 8;

    // every pixel and every full row lives in some pass, so the rows below are bounded by the checked data
    let lengths = match pass_lengths(width, height, pixel_bytes) {
        Some((lengths, total)) if total <= data.len() => lengths,
        sizes => {
            return Err(Error::TruncatedImageData {
                expected: sizes.map_or(usize::MAX, |(_, total)| total),
                actual: data.len(),
            })
        }
    };

    let row_length = width as usize * pixel_bytes + 1;
    let mut rows = vec![vec![0u8; row_length]; height as usize];

    let mut offset = 0;

    for (pass, (&(x0, y0, dx, dy), &(pass_row_length, pass_length))) in PASSES.iter().zip(&lengths).enumerate() {
        if pass_length == 0 {
            continue;
        }

        let pass_data = &data[offset..offset + pass_length];
        offset += pass_length;

        let mut previous = vec![0u8; pass_row_length];

        for (reduced_y, encoded) in pass_data.chunks_exact(pass_row_length).enumerate() {
            let mut row = encoded.to_vec();

            if let Err(err) = filter::defilter(&mut row, &previous, sample_bit_count) {
                error!(pass = pass + 1, row = reduced_y, error = %err, "Dropping interlaced scanline");
                continue;
            }

            let y = (y0 + reduced_y as u32 * dy) as usize;

            for (reduced_x, pixel) in row[1..].chunks_exact(pixel_bytes).enumerate() {
                let x = (x0 + reduced_x as u32 * dx) as usize;
                let start = 1 + x * pixel_bytes;
                rows[y][start..start + pixel_bytes].copy_from_slice(pixel);
            }

            previous = row;
        }
    }

    Ok(rows)
}
