use miniz_oxide::inflate::TINFLStatus;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while reading a PNG or counting its colors.
///
/// Unsupported layouts are not errors: [`crate::count`] reports those by returning `Ok(None)`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),

    #[error("not a PNG file: bad signature")]
    InvalidSignature,

    #[error("chunk at byte offset {offset} runs past the end of the file")]
    TruncatedChunk { offset: usize },

    #[error("CRC mismatch in {kind} chunk: stored {stored:#010x}, computed {computed:#010x}")]
    CrcMismatch { kind: String, stored: u32, computed: u32 },

    #[error("image has no IHDR chunk")]
    MissingHeader,

    #[error("invalid IHDR chunk: {0}")]
    InvalidHeader(&'static str),

    #[error("unknown color type {0}")]
    UnknownColorType(u8),

    #[error("failed to inflate image data: {0:?}")]
    Inflate(TINFLStatus),

    #[error("invalid filter type {0}")]
    InvalidFilterType(u8),

    #[error("image data holds {actual} bytes, expected at least {expected}")]
    TruncatedImageData { expected: usize, actual: usize },

    #[error("scanline ended before sample {sample} could be read")]
    TruncatedRow { sample: usize },

    #[error("cannot de-interlace samples of {0} bits")]
    UnsupportedInterlace(u8),
}
