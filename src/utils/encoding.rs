//! Posting list codec: ascending doc ids stored as LEB128 varint gaps.

const CONTINUATION: u8 = 0x80;
const PAYLOAD: u8 = 0x7F;
/// A u32 never needs more than five 7-bit groups
const MAX_VARINT_LEN: usize = 5;
/// The fifth group only has room for the top 4 bits of a u32
const LAST_GROUP_MAX: u32 = 0x0F;

fn push_varint(buf: &mut Vec<u8>, mut value: u32) {
    while value >= u32::from(CONTINUATION) {
        buf.push((value as u8 & PAYLOAD) | CONTINUATION);
        value >>= 7;
    }
    buf.push(value as u8);
}

/// Read one varint from the front of `bytes`, returning it and its length
fn take_varint(bytes: &[u8]) -> Option<(u32, usize)> {
    let mut value = 0u32;
    for (i, &byte) in bytes.iter().take(MAX_VARINT_LEN).enumerate() {
        let group = u32::from(byte & PAYLOAD);
        if i == MAX_VARINT_LEN - 1 && group > LAST_GROUP_MAX {
            return None;
        }
        value |= group << (7 * i);
        if byte & CONTINUATION == 0 {
            return Some((value, i + 1));
        }
    }
    None
}

/// Encode strictly ascending doc ids as gaps from the previous id
pub fn encode_postings(doc_ids: &[u32]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(doc_ids.len());
    let mut prev = 0;
    for &id in doc_ids {
        push_varint(&mut buf, id - prev);
        prev = id;
    }
    buf
}

/// Decode a posting list.
///
/// `None` on a cut-off varint or when the ids would overflow, so a damaged
/// artifact is rejected instead of yielding a shorter list.
pub fn decode_postings(mut bytes: &[u8]) -> Option<Vec<u32>> {
    let mut doc_ids = Vec::new();
    let mut current = 0u32;

    while !bytes.is_empty() {
        let (gap, len) = take_varint(bytes)?;
        current = current.checked_add(gap)?;
        doc_ids.push(current);
        bytes = &bytes[len..];
    }

    Some(doc_ids)
}
