use serde_json::json;
use shared_types::{parse_timestamp, BlockData, LedgerBlock};

/// Block `prev.index + 1` linked to `prev`, carrying record `id`.
pub fn make_test_block(prev: &LedgerBlock, id: u64) -> LedgerBlock {
    let mut data = BlockData::new();
    data.insert("id".into(), json!(id));
    data.insert("student_id".into(), json!(format!("S-{id}")));
    data.insert("degree_name".into(), json!("BSc Test"));
    let timestamp = parse_timestamp("2025-06-01T12:00:00").unwrap();
    LedgerBlock::build(prev.index + 1, prev.hash.clone(), timestamp, data, 0)
}

/// Genesis followed by `len - 1` linked blocks.
pub fn chain_of(len: usize) -> Vec<LedgerBlock> {
    let mut chain = vec![LedgerBlock::genesis()];
    for id in 1..len as u64 {
        let next = make_test_block(&chain[chain.len() - 1], id);
        chain.push(next);
    }
    chain
}
