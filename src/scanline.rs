use crate::{
    error::{Error, Result},
    filter, interlace,
    png::ImageHeader,
};
use tracing::error;

/// One unfiltered row of pixel data, still prefixed with its filter type byte.
pub type Scanline = Vec<u8>;

/// Splits inflated, non-interlaced image data into unfiltered scanlines.
///
/// A scanline with an invalid filter type is logged and left out of the result, so fewer than `height` rows may come
/// back. The following row is then unfiltered against the last row that did succeed.
pub fn scanlines(data: &[u8], sample_bit_count: u8, row_length: usize, height: u32) -> Result<Vec<Scanline>> {
    let expected = match row_length.checked_mul(height as usize) {
        Some(expected) if expected <= data.len() => expected,
        expected => {
            return Err(Error::TruncatedImageData {
                expected: expected.unwrap_or(usize::MAX),
                actual: data.len(),
            })
        }
    };

    let mut rows = Vec::with_capacity(height as usize);
    let mut previous = vec![0u8; row_length];

    for (i, encoded) in data[..expected].chunks_exact(row_length).enumerate() {
        let mut row = encoded.to_vec();

        match filter::defilter(&mut row, &previous, sample_bit_count) {
            Ok(()) => {
                previous.copy_from_slice(&row);
                rows.push(row);
            }
            Err(err) => error!(row = i, error = %err, "Dropping scanline"),
        }
    }

    Ok(rows)
}

/// Reconstructs every scanline of an image, de-interlacing first when needed.
///
/// Interlaced images must have samples of at least a byte, see [`interlace::deinterlace`].
pub fn reconstruct(header: ImageHeader, data: &[u8]) -> Result<Vec<Scanline>> {
    let sample_bit_count = header.sample_bit_count()?;

    if header.is_interlaced() {
        interlace::deinterlace(header.width(), header.height(), sample_bit_count, data)
    } else {
        scanlines(data, sample_bit_count, header.row_length()?, header.height())
    }
}
