//! # Ledger File Codec
//!
//! The ledger file is one JSON array of block objects, pretty-printed with
//! four-space indentation. Decoding is strict: anything that is not an array
//! of well-formed blocks is a corrupted file.

use serde::Serialize;
use shared_types::LedgerBlock;

use super::errors::ChainStoreError;

const INDENT: &[u8] = b"    ";

/// Encode a chain as the on-disk document.
pub fn encode_chain(chain: &[LedgerBlock]) -> Result<Vec<u8>, ChainStoreError> {
    let mut out = Vec::with_capacity(256 * (chain.len() + 1));
    let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    chain
        .serialize(&mut serializer)
        .map_err(ChainStoreError::io)?;
    out.push(b'\n');
    Ok(out)
}

/// Decode the on-disk document.
///
/// Empty or whitespace-only content decodes to an empty chain.
pub fn decode_chain(bytes: &[u8]) -> Result<Vec<LedgerBlock>, ChainStoreError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    serde_json::from_slice(bytes).map_err(|e| ChainStoreError::CorruptedLedgerFile {
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::chain_of;

    #[test]
    fn test_encoded_file_layout() {
        let bytes = encode_chain(&chain_of(1)).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("[\n    {\n        \"index\": 0,\n"));
        assert!(text.ends_with("]\n"));
        assert!(text.contains("\"created_at\": \"2024-01-01T00:00:00\""));
    }

    #[test]
    fn test_decode_restores_chain() {
        let chain = chain_of(3);
        let decoded = decode_chain(&encode_chain(&chain).unwrap()).unwrap();
        assert_eq!(decoded, chain);
    }

    #[test]
    fn test_blank_file_is_empty_chain() {
        assert!(decode_chain(b"").unwrap().is_empty());
        assert!(decode_chain(b"  \n").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_file_is_corrupted() {
        for bad in [&b"[{\"index\": 0,"[..], b"{}", b"[{\"index\": \"zero\"}]"] {
            assert!(matches!(
                decode_chain(bad),
                Err(ChainStoreError::CorruptedLedgerFile { .. })
            ));
        }
    }
}
