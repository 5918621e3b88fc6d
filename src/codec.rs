//! Value Codec Module
//!
//! Frames cached payloads with a one-byte format tag and LZ4-compresses
//! payloads above a size threshold. Decoding picks the branch from the tag,
//! so callers never need to know whether compression was applied.
//!
//! Security limits on decode:
//! - 512MB cap on the declared uncompressed size
//! - 1000x max compression ratio

use crate::error::CodecError;

/// Tag for payloads stored as-is.
pub const TAG_RAW: u8 = 0x00;
/// Tag for size-prepended LZ4 block payloads.
pub const TAG_LZ4: u8 = 0x01;

const MAX_UNCOMPRESSED_SIZE: u64 = 512 * 1024 * 1024;
const MAX_COMPRESSION_RATIO: u64 = 1000;
const SIZE_PREFIX_LEN: usize = 4;

// == Value Codec ==
/// Encodes and decodes cached payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueCodec {
    compression_threshold: usize,
}

impl ValueCodec {
    /// Payloads strictly larger than `compression_threshold` bytes are
    /// candidates for compression.
    pub fn new(compression_threshold: usize) -> Self {
        Self {
            compression_threshold,
        }
    }

    // == Encode ==
    /// Frames `data` for storage. Never fails.
    ///
    /// Compressed output is only kept when it is actually smaller than the
    /// raw framing; incompressible payloads fall back to the raw tag.
    pub fn encode(&self, data: &[u8]) -> Vec<u8> {
        if data.len() > self.compression_threshold {
            let compressed = lz4_flex::compress_prepend_size(data);
            if compressed.len() < data.len() {
                let mut out = Vec::with_capacity(compressed.len() + 1);
                out.push(TAG_LZ4);
                out.extend_from_slice(&compressed);
                return out;
            }
        }

        let mut out = Vec::with_capacity(data.len() + 1);
        out.push(TAG_RAW);
        out.extend_from_slice(data);
        out
    }

    // == Decode ==
    /// Recovers the original payload from a framed value.
    pub fn decode(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        let (&tag, body) = data.split_first().ok_or(CodecError::MissingTag)?;

        match tag {
            TAG_RAW => Ok(body.to_vec()),
            TAG_LZ4 => decompress(body),
            other => Err(CodecError::UnknownTag(other)),
        }
    }
}

impl Default for ValueCodec {
    fn default() -> Self {
        Self::new(1024)
    }
}

fn decompress(body: &[u8]) -> Result<Vec<u8>, CodecError> {
    if body.len() < SIZE_PREFIX_LEN {
        return Err(CodecError::DecompressionFailed(
            "truncated size prefix".to_string(),
        ));
    }

    let mut prefix = [0u8; SIZE_PREFIX_LEN];
    prefix.copy_from_slice(&body[..SIZE_PREFIX_LEN]);
    let declared = u64::from(u32::from_le_bytes(prefix));
    let compressed_size = (body.len() - SIZE_PREFIX_LEN) as u64;

    // Integer-only ratio check; an empty block can't expand to anything
    if declared > MAX_UNCOMPRESSED_SIZE {
        return Err(CodecError::DecompressionBomb);
    }
    let max_allowed = MAX_COMPRESSION_RATIO
        .checked_mul(compressed_size)
        .ok_or(CodecError::DecompressionBomb)?;
    if declared > max_allowed {
        return Err(CodecError::DecompressionBomb);
    }

    lz4_flex::decompress_size_prepended(body)
        .map_err(|e| CodecError::DecompressionFailed(e.to_string()))
}
