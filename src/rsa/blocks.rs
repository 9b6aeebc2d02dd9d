// Message Block Codec
// Splits UTF-8 text into integers below the modulus and joins them back

use super::bigint::{bit_length, from_bytes, to_bytes, RsaBigInt};
use super::error::{RsaError, RsaResult};

/// Bytes per block: floor((bits(n) - 1) / 8), so every block value stays below n
pub fn block_size(n: &RsaBigInt) -> usize {
    (bit_length(n).saturating_sub(1) / 8) as usize
}

/// Split message bytes into big-endian block integers, in message order
pub fn split(message: &[u8], n: &RsaBigInt) -> RsaResult<Vec<RsaBigInt>> {
    let size = block_size(n);
    if size == 0 {
        return Err(RsaError::Encryption(format!(
            "Modulus of {} bits cannot hold a single byte",
            bit_length(n)
        )));
    }

    message
        .chunks(size)
        .map(|chunk| {
            let block = from_bytes(chunk);
            if &block >= n {
                return Err(RsaError::Encryption(
                    "Block is too large for the key".to_string(),
                ));
            }
            Ok(block)
        })
        .collect()
}

/// Concatenate the minimal big-endian bytes of each block and decode as UTF-8
pub fn join(blocks: &[RsaBigInt]) -> RsaResult<String> {
    let bytes: Vec<u8> = blocks.iter().flat_map(to_bytes).collect();
    String::from_utf8(bytes).map_err(|e| {
        RsaError::Decryption(format!("Recovered bytes are not valid UTF-8: {}", e))
    })
}
