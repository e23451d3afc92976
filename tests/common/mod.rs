#![allow(dead_code)]

use dominance::{
    interlace::pass_dimensions,
    png::{IDAT, IEND, IHDR},
    Chunk, PngImage,
};
use miniz_oxide::deflate::compress_to_vec_zlib;
use std::{
    io::{self, Write},
    sync::{Arc, Mutex},
};

pub const GRAYSCALE: u8 = 0;
pub const TRUECOLOR: u8 = 2;
pub const INDEXED: u8 = 3;
pub const TRUECOLOR_ALPHA: u8 = 6;

/// Where each Adam7 pass starts and how far apart its pixels are.
const PASSES: [(u32, u32, u32, u32); 7] = [
    (0, 0, 8, 8),
    (4, 0, 8, 8),
    (0, 4, 4, 8),
    (2, 0, 4, 4),
    (0, 2, 2, 4),
    (1, 0, 2, 2),
    (0, 1, 1, 2),
];

pub fn header(width: u32, height: u32, bit_depth: u8, color_type: u8, interlace: u8) -> Chunk {
    let mut data = Vec::with_capacity(13);
    data.extend_from_slice(&width.to_be_bytes());
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&[bit_depth, color_type, 0, 0, interlace]);

    Chunk::new(IHDR, data)
}

/// An image whose single IDAT chunk holds exactly `idat`.
pub fn image_with_idat(header: Chunk, idat: Vec<u8>) -> PngImage {
    PngImage::from_chunks("fixture.png", vec![header, Chunk::new(IDAT, idat), Chunk::new(IEND, Vec::new())])
        .expect("fixture chunks are valid")
}

/// An image with the given filtered (or interlaced) scanline bytes, compressed and split over two IDAT chunks.
pub fn image(header: Chunk, raw: &[u8]) -> PngImage {
    let compressed = compress_to_vec_zlib(raw, 6);
    let (first, second) = compressed.split_at(compressed.len() / 2);

    PngImage::from_chunks(
        "fixture.png",
        vec![
            header,
            Chunk::new(*b"tEXt", b"Software\0fixtures".to_vec()),
            Chunk::new(IDAT, first.to_vec()),
            Chunk::new(IDAT, second.to_vec()),
            Chunk::new(IEND, Vec::new()),
        ],
    )
    .expect("fixture chunks are valid")
}

/// Prefixes every row with the None filter type.
pub fn unfiltered(rows: &[Vec<u8>]) -> Vec<u8> {
    rows.iter()
        .flat_map(|row| std::iter::once(0).chain(row.iter().copied()))
        .collect()
}

/// Splits RGBA pixels into rows of `width` pixels each.
pub fn rgba_rows(width: usize, pixels: &[[u8; 4]]) -> Vec<Vec<u8>> {
    pixels.chunks(width).map(|row| row.concat()).collect()
}

/// Lays out whole-byte pixels as the seven unfiltered Adam7 passes.
pub fn adam7(width: u32, height: u32, pixel_bytes: usize, pixels: &[u8]) -> Vec<u8> {
    let mut data = Vec::new();

    for (pass, &(x0, y0, dx, dy)) in PASSES.iter().enumerate() {
        let (pass_width, pass_height) = pass_dimensions(pass, width, height);
        if pass_width == 0 {
            continue;
        }

        for reduced_y in 0..pass_height {
            data.push(0);

            for reduced_x in 0..pass_width {
                let x = (x0 + reduced_x * dx) as usize;
                let y = (y0 + reduced_y * dy) as usize;
                let start = (y * width as usize + x) * pixel_bytes;
                data.extend_from_slice(&pixels[start..start + pixel_bytes]);
            }
        }
    }

    data
}

#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `f` with a debug level subscriber installed and returns whatever it logged.
pub fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, String) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .without_time()
        .with_writer(move || writer.clone())
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();

    (result, logs)
}
