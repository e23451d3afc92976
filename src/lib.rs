// Copyright 2022 Spanfile
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A library to extract the dominant colors from a PNG image.
//!
//! The image data is inflated and unfiltered straight from the chunk stream, without decoding the image into a pixel
//! buffer first. Every exact color is counted, rare colors are dropped, and the remaining ones are merged with their
//! close neighbours so that a single representative is left for every cluster of near identical colors.
//!
//! ```no_run
//! use dominance::{CountConfig, PngImage};
//!
//! let image = PngImage::open("logo.png")?;
//! let config = CountConfig::default().distance_threshold(0.05);
//!
//! if let Some(stats) = dominance::count(&image, &config)? {
//!     print!("{}", stats);
//! }
//! # Ok::<(), dominance::Error>(())
//! ```
//!
//! Only truecolor images, with or without alpha, produce colors. Indexed and grayscale images are read through but
//! yield an empty palette, and interlaced images with pixels smaller than a byte are skipped entirely.

mod error;
mod extract;
mod merge;
mod sample;
mod stats;

pub mod filter;
pub mod inflate;
pub mod interlace;
pub mod png;
pub mod scanline;

pub const DEFAULT_DISTANCE_THRESHOLD: f64 = 0.01;
pub const DEFAULT_FREQUENCY_THRESHOLD: f64 = 0.01;
pub const DEFAULT_MINIMUM_ALPHA: u16 = 30;

pub use crate::{
    error::{Error, Result},
    extract::{min_frequency, ColorCounts, SampleExtractor},
    merge::merge_colors,
    png::{Chunk, ColorType, ImageHeader, PngImage},
    sample::{ChannelDepth, ColorSample},
    stats::Stats,
};

use tracing::debug;

/// Thresholds used when counting colors.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CountConfig {
    distance_threshold: f64,
    frequency_threshold: f64,
    minimum_alpha: u16,
}

impl CountConfig {
    pub fn new() -> Self {
        Self {
            distance_threshold: DEFAULT_DISTANCE_THRESHOLD,
            frequency_threshold: DEFAULT_FREQUENCY_THRESHOLD,
            minimum_alpha: DEFAULT_MINIMUM_ALPHA,
        }
    }

    /// Colors closer than this to each other are merged. See [`ColorSample::distance`].
    pub fn distance_threshold(self, distance_threshold: f64) -> Self {
        Self {
            distance_threshold,
            ..self
        }
    }

    /// Colors covering less than this fraction of the image are dropped. Zero keeps every color.
    pub fn frequency_threshold(self, frequency_threshold: f64) -> Self {
        Self {
            frequency_threshold,
            ..self
        }
    }

    /// Pixels with an alpha value at or below this are ignored. The value is in the image's own channel units, so
    /// it's compared against 16 bit alpha values as is.
    pub fn minimum_alpha(self, minimum_alpha: u16) -> Self {
        Self { minimum_alpha, ..self }
    }

    pub fn get_distance_threshold(&self) -> f64 {
        self.distance_threshold
    }

    pub fn get_frequency_threshold(&self) -> f64 {
        self.frequency_threshold
    }

    pub fn get_minimum_alpha(&self) -> u16 {
        self.minimum_alpha
    }
}

impl Default for CountConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Counts the dominant colors of an image.
///
/// Returns `Ok(None)` for interlaced images with pixels smaller than a byte, which aren't supported. Scanlines with an
/// invalid filter type are logged and left out of the count.
pub fn count(image: &PngImage, config: &CountConfig) -> Result<Option<Stats>> {
    debug!(file = image.file_name(), "Counting colors");

    let header = image.header();
    let color_type = header.color_type()?;
    let sample_bit_count = header.sample_bit_count()?;

    if header.is_interlaced() && sample_bit_count < 8 {
        debug!(
            file = image.file_name(),
            sample_bit_count, "Interlaced images with samples smaller than a byte are not supported"
        );
        return Ok(None);
    }

    let (head, image_data) = split_chunks(image.chunks());
    debug!(chunks = head.len(), image_data = image_data.len(), "Split chunk stream");

    let inflated = inflate::inflate_chunks(image_data)?;
    let rows = scanline::reconstruct(header, &inflated)?;

    let mut counts = SampleExtractor::new(color_type, header.bit_depth(), config.minimum_alpha).extract(rows)?;
    debug!(colors = counts.len(), "Full color count");

    if config.frequency_threshold > 0.0 {
        counts.retain_frequent(min_frequency(
            header.width(),
            header.height(),
            config.frequency_threshold,
        ));
    }
    debug!(colors = counts.len(), "Filtered color count");

    let candidates = counts.len();
    let colors = merge_colors(counts.into_colors(), header.bit_depth(), config.distance_threshold);
    debug!(colors = colors.len(), "Dominant color count");

    Ok(Some(Stats::new(
        image.file_name().to_owned(),
        (header.width(), header.height()),
        candidates,
        colors,
    )))
}

/// Splits the chunk stream into copies of the critical chunks before the image data, with interlacing switched off,
/// and the run of image data chunks itself.
fn split_chunks(chunks: &[Chunk]) -> (Vec<Chunk>, &[Chunk]) {
    let start = chunks.iter().position(Chunk::is_image_data).unwrap_or(chunks.len());
    let end = chunks[start..]
        .iter()
        .position(|chunk| !chunk.is_image_data())
        .map_or(chunks.len(), |len| start + len);

    let head = chunks[..start]
        .iter()
        .filter(|chunk| chunk.is_critical())
        .map(Chunk::deinterlaced_copy)
        .collect();

    (head, &chunks[start..end])
}
