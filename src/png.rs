//! The PNG container: the file signature, the chunk stream and the image header.

use crate::error::{Error, Result};
use std::{borrow::Cow, path::Path, sync::OnceLock};

pub const SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

pub const IHDR: [u8; 4] = *b"IHDR";
pub const IDAT: [u8; 4] = *b"IDAT";
pub const IEND: [u8; 4] = *b"IEND";

const INTERLACE_OFFSET: usize = 12;

/// Largest width or height a PNG may declare.
pub const MAX_DIMENSION: u32 = (1 << 31) - 1;

/// How the channels of a pixel are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorType {
    Grayscale,
    Truecolor,
    Indexed,
    GrayscaleAlpha,
    TruecolorAlpha,
}

impl ColorType {
    pub fn channel_count(self) -> u8 {
        match self {
            ColorType::Grayscale | ColorType::Indexed => 1,
            ColorType::GrayscaleAlpha => 2,
            ColorType::Truecolor => 3,
            ColorType::TruecolorAlpha => 4,
        }
    }
}

impl TryFrom<u8> for ColorType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(ColorType::Grayscale),
            2 => Ok(ColorType::Truecolor),
            3 => Ok(ColorType::Indexed),
            4 => Ok(ColorType::GrayscaleAlpha),
            6 => Ok(ColorType::TruecolorAlpha),
            other => Err(Error::UnknownColorType(other)),
        }
    }
}

/// A single chunk: its four-byte type and its payload. The length and CRC are implied by the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    kind: [u8; 4],
    data: Vec<u8>,
}

impl Chunk {
    pub fn new(kind: [u8; 4], data: Vec<u8>) -> Self {
        Self { kind, data }
    }

    pub fn kind(&self) -> [u8; 4] {
        self.kind
    }

    pub fn kind_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.kind)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Critical chunks have the ancillary bit (bit 5 of the first type byte) cleared. Decoders must understand them.
    pub fn is_critical(&self) -> bool {
        self.kind[0] & 0x20 == 0
    }

    pub fn is_image_data(&self) -> bool {
        self.kind == IDAT
    }

    /// A copy of this chunk with the interlace method reset to 0 if it's the image header.
    pub(crate) fn deinterlaced_copy(&self) -> Chunk {
        let mut copy = self.clone();

        if copy.kind == IHDR && copy.data.len() > INTERLACE_OFFSET {
            copy.data[INTERLACE_OFFSET] = 0;
        }

        copy
    }

    pub fn crc(&self) -> u32 {
        crc32(&self.kind, &self.data)
    }
}

/// The contents of the IHDR chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHeader {
    width: u32,
    height: u32,
    bit_depth: u8,
    color_type: u8,
    interlace: u8,
}

impl ImageHeader {
    /// The color type byte is kept raw here. It gets validated by [`ImageHeader::color_type`] so that an unknown
    /// layout fails the color count instead of making the whole file unreadable.
    pub fn parse(data: &[u8]) -> Result<Self> {
        match data {
            [w0, w1, w2, w3, h0, h1, h2, h3, bit_depth, color_type, _compression, _filter, interlace] => {
                let width = u32::from_be_bytes([*w0, *w1, *w2, *w3]);
                let height = u32::from_be_bytes([*h0, *h1, *h2, *h3]);

                if width == 0 || height == 0 {
                    return Err(Error::InvalidHeader("image dimensions cannot be zero"));
                }

                if width > MAX_DIMENSION || height > MAX_DIMENSION {
                    return Err(Error::InvalidHeader("image dimensions cannot exceed 2^31 - 1"));
                }

                if ![1, 2, 4, 8, 16].contains(bit_depth) {
                    return Err(Error::InvalidHeader("bit depth must be 1, 2, 4, 8 or 16"));
                }

                if *interlace > 1 {
                    return Err(Error::InvalidHeader("interlace method must be 0 or 1"));
                }

                Ok(Self {
                    width,
                    height,
                    bit_depth: *bit_depth,
                    color_type: *color_type,
                    interlace: *interlace,
                })
            }
            _ => Err(Error::InvalidHeader("IHDR must be exactly 13 bytes")),
        }
    }

    pub fn width(self) -> u32 {
        self.width
    }

    pub fn height(self) -> u32 {
        self.height
    }

    pub fn bit_depth(self) -> u8 {
        self.bit_depth
    }

    pub fn color_type(self) -> Result<ColorType> {
        ColorType::try_from(self.color_type)
    }

    pub fn is_interlaced(self) -> bool {
        self.interlace == 1
    }

    /// Bits taken up by a single pixel.
    pub fn sample_bit_count(self) -> Result<u8> {
        Ok(self.color_type()?.channel_count() * self.bit_depth)
    }

    /// Bytes in one filtered scanline of the full image, including the leading filter type byte.
    pub fn row_length(self) -> Result<usize> {
        let bits = (self.width as usize)
            .checked_mul(self.sample_bit_count()? as usize)
            .ok_or(Error::InvalidHeader("scanline length overflows"))?;
        Ok(bits / 8 + usize::from(bits % 8 != 0) + 1)
    }
}

/// A PNG split into its chunks.
#[derive(Debug, Clone)]
pub struct PngImage {
    file_name: String,
    header: ImageHeader,
    chunks: Vec<Chunk>,
}

impl PngImage {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self::from_bytes(file_name, &bytes)
    }

    pub fn from_bytes<S: Into<String>>(file_name: S, bytes: &[u8]) -> Result<Self> {
        let mut rest = bytes.strip_prefix(&SIGNATURE[..]).ok_or(Error::InvalidSignature)?;
        let mut offset = SIGNATURE.len();
        let mut chunks = Vec::new();

        while !rest.is_empty() {
            let (chunk, consumed) = read_chunk(rest, offset)?;
            let is_end = chunk.kind == IEND;

            chunks.push(chunk);
            offset += consumed;
            rest = &rest[consumed..];

            if is_end {
                break;
            }
        }

        Self::from_chunks(file_name, chunks)
    }

    pub fn from_chunks<S: Into<String>>(file_name: S, chunks: Vec<Chunk>) -> Result<Self> {
        let header = chunks
            .iter()
            .find(|chunk| chunk.kind == IHDR)
            .ok_or(Error::MissingHeader)
            .and_then(|chunk| ImageHeader::parse(&chunk.data))?;

        Ok(Self {
            file_name: file_name.into(),
            header,
            chunks,
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn header(&self) -> ImageHeader {
        self.header
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn width(&self) -> u32 {
        self.header.width
    }

    pub fn height(&self) -> u32 {
        self.header.height
    }
}

fn read_chunk(bytes: &[u8], offset: usize) -> Result<(Chunk, usize)> {
    let truncated = || Error::TruncatedChunk { offset };

    let length = bytes.get(0..4).ok_or_else(truncated)?;
    let length = u32::from_be_bytes([length[0], length[1], length[2], length[3]]) as usize;
    let total = length.checked_add(12).ok_or_else(truncated)?;
    let record = bytes.get(..total).ok_or_else(truncated)?;

    let kind = [record[4], record[5], record[6], record[7]];
    let data = &record[8..8 + length];
    let stored = u32::from_be_bytes([record[8 + length], record[9 + length], record[10 + length], record[11 + length]]);

    let chunk = Chunk::new(kind, data.to_vec());
    let computed = chunk.crc();

    if stored != computed {
        return Err(Error::CrcMismatch {
            kind: chunk.kind_str().into_owned(),
            stored,
            computed,
        });
    }

    Ok((chunk, total))
}

/// CRC-32 over the chunk type followed by the chunk data.
pub(crate) fn crc32(kind: &[u8], data: &[u8]) -> u32 {
    static TABLE: OnceLock<[u32; 256]> = OnceLock::new();

    let table = TABLE.get_or_init(|| {
        let mut table = [0u32; 256];

        for (n, entry) in table.iter_mut().enumerate() {
            let mut c = n as u32;
            for _ in 0..8 {
                c = if c & 1 != 0 { 0xedb8_8320 ^ (c >> 1) } else { c >> 1 };
            }
            *entry = c;
        }

        table
    });

    let crc = kind
        .iter()
        .chain(data)
        .fold(0xffff_ffff_u32, |c, &b| table[((c ^ b as u32) & 0xff) as usize] ^ (c >> 8));

    crc ^ 0xffff_ffff
}
