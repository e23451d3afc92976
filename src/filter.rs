//! Reverses the per-scanline predictors PNG encoders apply before compression.

use crate::error::{Error, Result};

const FILTER_NONE: u8 = 0;
const FILTER_SUB: u8 = 1;
const FILTER_UP: u8 = 2;
const FILTER_AVERAGE: u8 = 3;
const FILTER_PAETH: u8 = 4;

/// Unfilters a scanline in place.
///
/// Both `row` and `previous` start with the filter type byte, which is left untouched. `previous` is the already
/// unfiltered row above, or all zeroes for the first row of an image or an interlace pass.
pub fn defilter(row: &mut [u8], previous: &[u8], sample_bit_count: u8) -> Result<()> {
    let (filter, pixels) = match row.split_first_mut() {
        Some((filter, pixels)) => (*filter, pixels),
        None => return Ok(()),
    };
    let above = previous.get(1..).unwrap_or_default();

    // filtering works on whole pixels when they're at least a byte wide, and on single bytes otherwise
    let stride = (sample_bit_count as usize / 8).max(1);
    let above_at = |i: usize| above.get(i).copied().unwrap_or(0);

    match filter {
        FILTER_NONE => {}
        FILTER_SUB => {
            for i in stride..pixels.len() {
                pixels[i] = pixels[i].wrapping_add(pixels[i - stride]);
            }
        }
        FILTER_UP => {
            for (i, pixel) in pixels.iter_mut().enumerate() {
                *pixel = pixel.wrapping_add(above_at(i));
            }
        }
        FILTER_AVERAGE => {
            for i in 0..pixels.len() {
                let left = if i >= stride { pixels[i - stride] as u16 } else { 0 };
                let up = above_at(i) as u16;
                pixels[i] = pixels[i].wrapping_add(((left + up) / 2) as u8);
            }
        }
        FILTER_PAETH => {
            for i in 0..pixels.len() {
                let left = if i >= stride { pixels[i - stride] } else { 0 };
                let up = above_at(i);
                let up_left = if i >= stride { above_at(i - stride) } else { 0 };
                pixels[i] = pixels[i].wrapping_add(paeth(left, up, up_left));
            }
        }
        other => return Err(Error::InvalidFilterType(other)),
    }

    Ok(())
}

fn paeth(a: u8, b: u8, c: u8) -> u8 {
    let p = a as i16 + b as i16 - c as i16;
    let pa = (p - a as i16).abs();
    let pb = (p - b as i16).abs();
    let pc = (p - c as i16).abs();

    // the order of these comparisons is fixed by the format
    if pa <= pb && pa <= pc {
        a
    } else if pb <= pc {
        b
    } else {
        c
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn none_leaves_row_alone() {
        let mut row = vec![FILTER_NONE, 1, 2, 3];
        defilter(&mut row, &[0; 4], 8).unwrap();
        assert_eq!(row, [0, 1, 2, 3]);
    }

    #[test]
    fn sub_uses_pixel_stride() {
        // two RGB pixels: the second pixel's bytes are deltas from the first pixel's bytes
        let mut row = vec![FILTER_SUB, 10, 20, 30, 1, 2, 3];
        defilter(&mut row, &[0; 7], 24).unwrap();
        assert_eq!(row, [FILTER_SUB, 10, 20, 30, 11, 22, 33]);
    }

    #[test]
    fn sub_wraps() {
        let mut row = vec![FILTER_SUB, 200, 100];
        defilter(&mut row, &[0; 3], 8).unwrap();
        assert_eq!(row, [FILTER_SUB, 200, 44]);
    }

    #[test]
    fn up_adds_previous_row() {
        let mut row = vec![FILTER_UP, 1, 2, 3];
        defilter(&mut row, &[FILTER_NONE, 10, 20, 30], 8).unwrap();
        assert_eq!(row, [FILTER_UP, 11, 22, 33]);
    }

    #[test]
    fn average_floors() {
        let mut row = vec![FILTER_AVERAGE, 1, 1];
        defilter(&mut row, &[FILTER_NONE, 5, 6], 8).unwrap();
        // first: 1 + 5/2 = 3, second: 1 + (3 + 6)/2 = 5
        assert_eq!(row, [FILTER_AVERAGE, 3, 5]);
    }

    #[test]
    fn paeth_predicts() {
        assert_eq!(paeth(0, 0, 0), 0);
        assert_eq!(paeth(10, 20, 10), 20);
        assert_eq!(paeth(20, 10, 10), 20);
        assert_eq!(paeth(10, 10, 20), 10);

        let mut row = vec![FILTER_PAETH, 5, 5];
        defilter(&mut row, &[FILTER_NONE, 100, 7], 8).unwrap();
        // first byte: left and up-left are 0 so up (100) wins, second: p = 105 + 7 - 100 = 12, closest is 7
        assert_eq!(row, [FILTER_PAETH, 105, 12]);
    }

    #[test]
    fn rejects_unknown_filter() {
        let mut row = vec![5, 1, 2, 3];
        assert!(matches!(defilter(&mut row, &[0; 4], 8), Err(Error::InvalidFilterType(5))));
    }
}
