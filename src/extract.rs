use crate::{
    error::{Error, Result},
    png::ColorType,
    sample::{ChannelDepth, ColorSample},
    scanline::Scanline,
};
use std::collections::HashMap;

/// Exact color frequencies, kept in the order each color was first seen.
#[derive(Debug, Default)]
pub struct ColorCounts {
    index: HashMap<ColorSample, usize>,
    colors: Vec<ColorSample>,
}

impl ColorCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts a sample. The first sample of a color is kept as its representative, later ones only bump the count.
    pub fn record(&mut self, sample: ColorSample) {
        match self.index.get(&sample) {
            Some(&i) => {
                let color = &mut self.colors[i];
                color.set_frequency(color.frequency() + 1);
            }
            None => {
                self.index.insert(sample, self.colors.len());
                self.colors.push(sample);
            }
        }
    }

    pub fn frequency(&self, color: &ColorSample) -> Option<u32> {
        self.index.get(color).map(|&i| self.colors[i].frequency())
    }

    /// Drops every color seen fewer than `min_frequency` times.
    pub fn retain_frequent(&mut self, min_frequency: u32) {
        self.colors.retain(|color| color.frequency() >= min_frequency);
        self.index = self.colors.iter().enumerate().map(|(i, color)| (*color, i)).collect();
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[ColorSample] {
        &self.colors
    }

    pub fn into_colors(self) -> Vec<ColorSample> {
        self.colors
    }
}

/// The smallest number of occurrences a color needs to survive the frequency filter, as a fraction of the image area.
pub fn min_frequency(width: u32, height: u32, threshold: f64) -> u32 {
    (width as f64 * height as f64 * threshold).floor() as u32
}

/// Reads channel values off a scanline one after the other.
struct SampleCursor<'a> {
    data: &'a [u8],
    offset: usize,
    depth: ChannelDepth,
}

impl<'a> SampleCursor<'a> {
    fn new(data: &'a [u8], depth: ChannelDepth) -> Self {
        Self { data, offset: 0, depth }
    }

    fn channel(&mut self, sample: usize) -> Result<u16> {
        let end = self.offset + self.depth.bytes();
        let bytes = self
            .data
            .get(self.offset..end)
            .ok_or(Error::TruncatedRow { sample })?;
        self.offset = end;

        Ok(match self.depth {
            ChannelDepth::Eight => bytes[0] as u16,
            ChannelDepth::Sixteen => u16::from_be_bytes([bytes[0], bytes[1]]),
        })
    }
}

/// Decodes the pixels of unfiltered scanlines into color samples.
#[derive(Debug, Clone, Copy)]
pub struct SampleExtractor {
    color_type: ColorType,
    depth: ChannelDepth,
    sample_bit_count: usize,
    minimum_alpha: u16,
}

impl SampleExtractor {
    pub fn new(color_type: ColorType, bit_depth: u8, minimum_alpha: u16) -> Self {
        Self {
            color_type,
            depth: ChannelDepth::from_bit_depth(bit_depth),
            sample_bit_count: (color_type.channel_count() * bit_depth) as usize,
            minimum_alpha,
        }
    }

    /// Counts the colors of every row. Samples whose alpha isn't above the minimum are skipped.
    ///
    /// Indexed and grayscale rows are walked through but yield no colors.
    pub fn extract<I>(&self, rows: I) -> Result<ColorCounts>
    where
        I: IntoIterator<Item = Scanline>,
    {
        let mut counts = ColorCounts::new();

        for (y, row) in rows.into_iter().enumerate() {
            let pixels = row.get(1..).unwrap_or_default();
            let sample_count = (pixels.len() * 8) / self.sample_bit_count;
            let mut cursor = SampleCursor::new(pixels, self.depth);

            for x in 0..sample_count {
                if let Some(sample) = self.decode(&mut cursor, (x, y))? {
                    if sample.alpha() > self.minimum_alpha {
                        counts.record(sample);
                    }
                }
            }
        }

        Ok(counts)
    }

    fn decode(&self, cursor: &mut SampleCursor<'_>, (x, y): (usize, usize)) -> Result<Option<ColorSample>> {
        let position = (x as u32, y as u32);

        match self.color_type {
            ColorType::Indexed | ColorType::Grayscale | ColorType::GrayscaleAlpha => Ok(None),
            ColorType::Truecolor => {
                let red = cursor.channel(x)?;
                let green = cursor.channel(x)?;
                let blue = cursor.channel(x)?;

                Ok(Some(ColorSample::opaque(position, (red, green, blue), self.depth)))
            }
            ColorType::TruecolorAlpha => {
                let red = cursor.channel(x)?;
                let green = cursor.channel(x)?;
                let blue = cursor.channel(x)?;
                let alpha = cursor.channel(x)?;

                Ok(Some(ColorSample::new(position, (red, green, blue, alpha), self.depth)))
            }
        }
    }
}
