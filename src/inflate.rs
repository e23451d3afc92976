use crate::{
    error::{Error, Result},
    png::Chunk,
};

/// Decompresses a zlib stream, such as the concatenated payloads of every IDAT chunk.
pub fn inflate(compressed: &[u8]) -> Result<Vec<u8>> {
    miniz_oxide::inflate::decompress_to_vec_zlib(compressed).map_err(|err| Error::Inflate(err.status))
}

/// Concatenates the payloads of the given image data chunks and inflates them.
pub fn inflate_chunks<'a, I>(chunks: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = &'a Chunk>,
{
    let compressed = chunks.into_iter().fold(Vec::new(), |mut compressed, chunk| {
        compressed.extend_from_slice(chunk.data());
        compressed
    });

    inflate(&compressed)
}
