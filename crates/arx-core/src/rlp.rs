//! Recursive-length-prefix (RLP) encoding and decoding.
//!
//! The encoder follows the two-pass discipline the wire format invites:
//! measure with [`encoded_value_len`]/[`encoded_list_len`], check the
//! output buffer, then write. Nothing is ever written past the caller's
//! buffer; capacity problems surface as [`RlpError::OutputTooSmall`].
//!
//! List encoding takes a slice of typed [`RlpItem`] values. Integers are
//! encoded as their minimal big-endian byte string (zero is the empty
//! string). Payloads of 55 bytes and up use the long header form;
//! 0..=54 use the short form.
//!
//! The decoder walks one level of list structure, handing each item's
//! byte range to a caller-supplied handler. Items may be byte strings or
//! the empty list (`0xc0`); decoding rejects nested non-empty lists,
//! length-of-length fields over 4 bytes, and any disagreement between
//! declared and actual lengths.

use arx_uint::U256;
use tracing::debug;

use crate::error::RlpError;

/// Largest payload the 4-byte length field supports.
const MAX_PAYLOAD: usize = 0xffff_fff9;

/// Payloads shorter than this use the single-byte header form.
const SHORT_FORM_LIMIT: usize = 55;

/// A typed value in an RLP list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RlpItem<'a> {
    /// Unsigned integer, minimal big-endian encoding.
    Uint(u64),
    /// 256-bit unsigned integer, minimal big-endian encoding.
    Uint256(U256),
    /// UTF-8 string, encoded as its bytes.
    Str(&'a str),
    /// Raw byte string.
    Bytes(&'a [u8]),
    /// Nested empty list, the single byte `0xc0`.
    EmptyList,
}

/// Number of bytes needed for the big-endian length field.
fn len_of_len(len: usize) -> usize {
    if len >> 24 != 0 {
        4
    } else if len >> 16 != 0 {
        3
    } else if len >> 8 != 0 {
        2
    } else {
        1
    }
}

/// Encoded size of a byte-string value.
pub fn encoded_value_len(buf: &[u8]) -> Result<usize, RlpError> {
    if buf.len() == 1 && buf[0] <= 0x7f {
        Ok(1)
    } else if buf.len() < SHORT_FORM_LIMIT {
        Ok(buf.len() + 1)
    } else if buf.len() > MAX_PAYLOAD {
        Err(RlpError::TooLong)
    } else {
        Ok(1 + len_of_len(buf.len()) + buf.len())
    }
}

/// Encode a byte-string value into `out`, returning the encoded length.
pub fn encode_value(buf: &[u8], out: &mut [u8]) -> Result<usize, RlpError> {
    let need = encoded_value_len(buf)?;
    if out.len() < need {
        return Err(RlpError::OutputTooSmall {
            need,
            have: out.len(),
        });
    }

    if buf.len() == 1 && buf[0] <= 0x7f {
        // A single byte in [0x00, 0x7f] is its own encoding.
        out[0] = buf[0];
    } else if buf.len() < SHORT_FORM_LIMIT {
        out[0] = 0x80 + buf.len() as u8;
        out[1..1 + buf.len()].copy_from_slice(buf);
    } else {
        let lenlen = len_of_len(buf.len());
        out[0] = 0xb7 + lenlen as u8;
        out[1..1 + lenlen].copy_from_slice(&(buf.len() as u32).to_be_bytes()[4 - lenlen..]);
        out[1 + lenlen..need].copy_from_slice(buf);
    }
    Ok(need)
}

/// Minimal big-endian bytes of `val`; empty for zero.
fn uint_bytes(val: u64) -> ([u8; 8], usize) {
    let be = val.to_be_bytes();
    let skip = (val.leading_zeros() / 8) as usize;
    (be, 8 - skip.min(8))
}

/// Encoded size of an unsigned integer value.
pub fn encoded_uint_len(val: u64) -> usize {
    let (be, len) = uint_bytes(val);
    // minimal integer bytes never hit the long form or the size cap
    encoded_value_len(&be[8 - len..]).expect("u64 encoding is at most 9 bytes")
}

/// Encode an unsigned integer as its minimal big-endian byte string.
pub fn encode_uint(val: u64, out: &mut [u8]) -> Result<usize, RlpError> {
    let (be, len) = uint_bytes(val);
    encode_value(&be[8 - len..], out)
}

/// Encoded size of a 256-bit unsigned integer value.
pub fn encoded_uint256_len(val: &U256) -> usize {
    let (bytes, len) = val.to_be_bytes_trimmed();
    encoded_value_len(&bytes[32 - len..]).expect("u256 encoding is at most 33 bytes")
}

/// Encode a 256-bit unsigned integer as its minimal big-endian bytes.
pub fn encode_uint256(val: &U256, out: &mut [u8]) -> Result<usize, RlpError> {
    let (bytes, len) = val.to_be_bytes_trimmed();
    encode_value(&bytes[32 - len..], out)
}

/// Encoded size of one list item.
fn encoded_item_len(item: &RlpItem<'_>) -> Result<usize, RlpError> {
    match item {
        RlpItem::Uint(v) => Ok(encoded_uint_len(*v)),
        RlpItem::Uint256(v) => Ok(encoded_uint256_len(v)),
        RlpItem::Str(s) => encoded_value_len(s.as_bytes()),
        RlpItem::Bytes(b) => encoded_value_len(b),
        RlpItem::EmptyList => Ok(1),
    }
}

/// Summed payload size of a list's items, before the list header.
fn list_payload_len(items: &[RlpItem<'_>]) -> Result<usize, RlpError> {
    let mut total = 0usize;
    for item in items {
        total += encoded_item_len(item)?;
    }
    if total > MAX_PAYLOAD {
        return Err(RlpError::TooLong);
    }
    Ok(total)
}

/// Encoded size of a list, header included.
pub fn encoded_list_len(items: &[RlpItem<'_>]) -> Result<usize, RlpError> {
    let payload = list_payload_len(items)?;
    if payload < SHORT_FORM_LIMIT {
        Ok(1 + payload)
    } else {
        Ok(1 + len_of_len(payload) + payload)
    }
}

/// Encode a list of typed items into `out`, returning the encoded
/// length. The items' combined size is measured first; `out` is only
/// written once it is known to fit.
pub fn encode_list(items: &[RlpItem<'_>], out: &mut [u8]) -> Result<usize, RlpError> {
    let payload = list_payload_len(items)?;
    let need = encoded_list_len(items)?;
    if out.len() < need {
        debug!(need, have = out.len(), "rlp list does not fit output buffer");
        return Err(RlpError::OutputTooSmall {
            need,
            have: out.len(),
        });
    }

    let mut pos = if payload < SHORT_FORM_LIMIT {
        out[0] = 0xc0 + payload as u8;
        1
    } else {
        let lenlen = len_of_len(payload);
        out[0] = 0xf7 + lenlen as u8;
        out[1..1 + lenlen].copy_from_slice(&(payload as u32).to_be_bytes()[4 - lenlen..]);
        1 + lenlen
    };

    for item in items {
        pos += match item {
            RlpItem::Uint(v) => encode_uint(*v, &mut out[pos..])?,
            RlpItem::Uint256(v) => encode_uint256(v, &mut out[pos..])?,
            RlpItem::Str(s) => encode_value(s.as_bytes(), &mut out[pos..])?,
            RlpItem::Bytes(b) => encode_value(b, &mut out[pos..])?,
            RlpItem::EmptyList => {
                out[pos] = 0xc0;
                1
            }
        };
    }
    debug_assert_eq!(pos, need);
    Ok(need)
}

/// Decode one level of an RLP list, dispatching each item's bytes to
/// `handler(item, index)`. Returns the item count on success.
///
/// The declared list payload must account for the buffer exactly, and
/// `items_count` items must consume the payload exactly. The payload is
/// addressed from the tail of the buffer (`buf[buf.len() - payload ..]`),
/// which coincides with header-relative addressing for well-formed
/// input.
pub fn decode_list(
    buf: &[u8],
    items_count: usize,
    mut handler: impl FnMut(&[u8], usize) -> Result<(), RlpError>,
) -> Result<usize, RlpError> {
    let Some(&head) = buf.first() else {
        return Err(RlpError::ListHeader(0x00));
    };
    if head < 0xc0 {
        return Err(RlpError::ListHeader(head));
    }

    let (payload, header_len) = if head < 0xf8 {
        ((head - 0xc0) as usize, 1)
    } else {
        let lenlen = (head - 0xf7) as usize;
        if lenlen > 4 || buf.len() < 1 + lenlen {
            return Err(RlpError::ListHeader(head));
        }
        let mut len_bytes = [0u8; 4];
        len_bytes[4 - lenlen..].copy_from_slice(&buf[1..1 + lenlen]);
        (u32::from_be_bytes(len_bytes) as usize, 1 + lenlen)
    };

    if payload + header_len != buf.len() {
        debug!(payload, buflen = buf.len(), "rlp list length mismatch");
        return Err(RlpError::PayloadLength {
            payload,
            buflen: buf.len(),
        });
    }

    if payload == 0 {
        if items_count != 0 {
            return Err(RlpError::EmptyPayload(items_count));
        }
        return Ok(0);
    }

    let mut p = buf.len() - payload;
    let mut remaining = payload;

    for index in 0..items_count {
        if remaining == 0 {
            return Err(RlpError::Truncated { index });
        }
        let b = buf[p];
        match b {
            0x00..=0x7f => {
                handler(&buf[p..p + 1], index)?;
                p += 1;
                remaining -= 1;
            }
            0x80..=0xb6 => {
                let len = (b - 0x80) as usize;
                if remaining < len + 1 {
                    return Err(RlpError::Truncated { index });
                }
                handler(&buf[p + 1..p + 1 + len], index)?;
                p += len + 1;
                remaining -= len + 1;
            }
            0xb8..=0xbb => {
                let lenlen = (b - 0xb7) as usize;
                if remaining < 1 + lenlen {
                    return Err(RlpError::Truncated { index });
                }
                let mut len_bytes = [0u8; 4];
                len_bytes[4 - lenlen..].copy_from_slice(&buf[p + 1..p + 1 + lenlen]);
                let len = u32::from_be_bytes(len_bytes) as usize;
                if remaining - 1 - lenlen < len {
                    return Err(RlpError::Truncated { index });
                }
                handler(&buf[p + 1 + lenlen..p + 1 + lenlen + len], index)?;
                p += 1 + lenlen + len;
                remaining -= 1 + lenlen + len;
            }
            0xbc..=0xbf => return Err(RlpError::LengthOfLength { index }),
            0xc0 => {
                handler(&[], index)?;
                p += 1;
                remaining -= 1;
            }
            // 0xb7 is unreachable from the encoder; anything above 0xc0
            // would be a nested non-empty list, which this decoder does
            // not walk.
            _ => return Err(RlpError::ItemHeader { index, byte: b }),
        }
    }

    if remaining != 0 {
        return Err(RlpError::TrailingBytes {
            count: items_count,
            remaining,
        });
    }
    Ok(items_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_value_vec(buf: &[u8]) -> Vec<u8> {
        let mut out = vec![0u8; encoded_value_len(buf).unwrap()];
        let n = encode_value(buf, &mut out).unwrap();
        assert_eq!(n, out.len());
        out
    }

    fn encode_list_vec(items: &[RlpItem<'_>]) -> Vec<u8> {
        let mut out = vec![0u8; encoded_list_len(items).unwrap()];
        let n = encode_list(items, &mut out).unwrap();
        assert_eq!(n, out.len());
        out
    }

    fn collect_items(buf: &[u8], count: usize) -> Vec<Vec<u8>> {
        let mut items = Vec::new();
        let n = decode_list(buf, count, |item, index| {
            assert_eq!(index, items.len());
            items.push(item.to_vec());
            Ok(())
        })
        .unwrap();
        assert_eq!(n, count);
        items
    }

    // --- Value encoding: known vectors ---

    #[test]
    fn zero_byte_self_encodes() {
        assert_eq!(encode_value_vec(&[0x00]), vec![0x00]);
    }

    #[test]
    fn small_byte_self_encodes() {
        assert_eq!(encode_value_vec(&[0x7f]), vec![0x7f]);
    }

    #[test]
    fn byte_above_7f_gets_prefix() {
        assert_eq!(encode_value_vec(&[0x80]), vec![0x81, 0x80]);
    }

    #[test]
    fn empty_string() {
        assert_eq!(encode_value_vec(&[]), vec![0x80]);
    }

    #[test]
    fn dog() {
        assert_eq!(encode_value_vec(b"dog"), vec![0x83, b'd', b'o', b'g']);
    }

    // --- Short/long form boundary ---

    #[test]
    fn boundary_54_is_short_form() {
        let encoded = encode_value_vec(&[0xaa; 54]);
        assert_eq!(encoded[0], 0x80 + 54);
        assert_eq!(encoded.len(), 55);
    }

    #[test]
    fn boundary_55_is_first_long_form() {
        let encoded = encode_value_vec(&[0xaa; 55]);
        assert_eq!(encoded[0], 0xb8);
        assert_eq!(encoded[1], 55);
        assert_eq!(encoded.len(), 57);
    }

    #[test]
    fn boundary_56_stays_long_form() {
        let encoded = encode_value_vec(&[0xaa; 56]);
        assert_eq!(encoded[0], 0xb8);
        assert_eq!(encoded[1], 56);
    }

    #[test]
    fn long_form_two_length_bytes() {
        let encoded = encode_value_vec(&[0xaa; 300]);
        assert_eq!(encoded[0], 0xb9);
        assert_eq!(&encoded[1..3], &300u16.to_be_bytes());
        assert_eq!(encoded.len(), 3 + 300);
    }

    // --- Capacity ---

    #[test]
    fn value_capacity_checked_before_write() {
        let mut out = [0u8; 3];
        let err = encode_value(b"dog", &mut out).unwrap_err();
        assert_eq!(err, RlpError::OutputTooSmall { need: 4, have: 3 });
        // nothing was written
        assert_eq!(out, [0u8; 3]);
    }

    #[test]
    fn list_capacity_checked_before_write() {
        let mut out = [0u8; 4];
        let err = encode_list(&[RlpItem::Str("dog")], &mut out).unwrap_err();
        assert_eq!(err, RlpError::OutputTooSmall { need: 5, have: 4 });
        assert_eq!(out, [0u8; 4]);
    }

    #[test]
    fn measured_len_matches_written_len() {
        for payload in [vec![], vec![0x01], vec![0xaa; 54], vec![0xbb; 55], vec![0xcc; 400]] {
            let encoded = encode_value_vec(&payload);
            assert_eq!(encoded.len(), encoded_value_len(&payload).unwrap());
        }
    }

    // --- Integer encoding ---

    #[test]
    fn uint_zero_is_empty_string() {
        let mut out = [0u8; 9];
        assert_eq!(encode_uint(0, &mut out).unwrap(), 1);
        assert_eq!(out[0], 0x80);
    }

    #[test]
    fn uint_small_self_encodes() {
        let mut out = [0u8; 9];
        assert_eq!(encode_uint(0x7f, &mut out).unwrap(), 1);
        assert_eq!(out[0], 0x7f);
    }

    #[test]
    fn uint_strips_leading_zero_bytes() {
        let mut out = [0u8; 9];
        let n = encode_uint(1024, &mut out).unwrap();
        assert_eq!(&out[..n], &[0x82, 0x04, 0x00]);
    }

    #[test]
    fn uint_max_u64() {
        let mut out = [0u8; 9];
        let n = encode_uint(u64::MAX, &mut out).unwrap();
        assert_eq!(out[0], 0x88);
        assert_eq!(n, 9);
        assert_eq!(encoded_uint_len(u64::MAX), 9);
    }

    #[test]
    fn uint256_zero_is_empty_string() {
        let mut out = [0u8; 33];
        assert_eq!(encode_uint256(&U256::ZERO, &mut out).unwrap(), 1);
        assert_eq!(out[0], 0x80);
    }

    #[test]
    fn uint256_full_width() {
        let mut out = [0u8; 34];
        let n = encode_uint256(&U256::MAX, &mut out).unwrap();
        assert_eq!(n, 33);
        assert_eq!(out[0], 0x80 + 32);
        assert!(out[1..33].iter().all(|&b| b == 0xff));
    }

    #[test]
    fn uint256_matches_uint_for_small_values() {
        let mut a = [0u8; 33];
        let mut b = [0u8; 9];
        let na = encode_uint256(&U256::from_u64(123_456), &mut a).unwrap();
        let nb = encode_uint(123_456, &mut b).unwrap();
        assert_eq!(&a[..na], &b[..nb]);
    }

    // --- List encoding ---

    #[test]
    fn empty_list() {
        assert_eq!(encode_list_vec(&[]), vec![0xc0]);
    }

    #[test]
    fn dog_list_vector() {
        assert_eq!(
            encode_list_vec(&[RlpItem::Str("dog")]),
            vec![0xc4, 0x83, b'd', b'o', b'g']
        );
    }

    #[test]
    fn list_with_empty_list_item() {
        assert_eq!(
            encode_list_vec(&[RlpItem::Uint(1), RlpItem::EmptyList]),
            vec![0xc2, 0x01, 0xc0]
        );
    }

    #[test]
    fn list_payload_boundary_54_short() {
        let bytes = [0u8; 53]; // encodes to 54 payload bytes
        let encoded = encode_list_vec(&[RlpItem::Bytes(&bytes)]);
        assert_eq!(encoded[0], 0xc0 + 54);
    }

    #[test]
    fn list_payload_boundary_55_long() {
        let bytes = [0u8; 54]; // encodes to 55 payload bytes
        let encoded = encode_list_vec(&[RlpItem::Bytes(&bytes)]);
        assert_eq!(encoded[0], 0xf8);
        assert_eq!(encoded[1], 55);
    }

    #[test]
    fn mixed_typed_list_round_trips() {
        let value = U256::from_hex_str("0de0b6b3a7640000", None).unwrap(); // 10^18
        let items = [
            RlpItem::Uint(9),
            RlpItem::Uint(21_000),
            RlpItem::Uint256(value),
            RlpItem::Str("hello"),
            RlpItem::Bytes(&[0xab, 0xcd]),
            RlpItem::EmptyList,
        ];
        let encoded = encode_list_vec(&items);
        let decoded = collect_items(&encoded, items.len());
        assert_eq!(decoded[0], vec![0x09]);
        assert_eq!(decoded[1], vec![0x52, 0x08]);
        assert_eq!(decoded[2], hex::decode("0de0b6b3a7640000").unwrap());
        assert_eq!(decoded[3], b"hello");
        assert_eq!(decoded[4], vec![0xab, 0xcd]);
        assert_eq!(decoded[5], Vec::<u8>::new());
    }

    #[test]
    fn long_form_list_round_trips() {
        let blob = [0x55u8; 120];
        let items = [RlpItem::Bytes(&blob), RlpItem::Uint(7)];
        let encoded = encode_list_vec(&items);
        assert_eq!(encoded[0], 0xf8); // long form, one length byte
        let decoded = collect_items(&encoded, 2);
        assert_eq!(decoded[0], blob.to_vec());
        assert_eq!(decoded[1], vec![0x07]);
    }

    // --- Decoding errors ---

    #[test]
    fn decode_rejects_empty_buffer() {
        let err = decode_list(&[], 0, |_, _| Ok(())).unwrap_err();
        assert_eq!(err, RlpError::ListHeader(0x00));
    }

    #[test]
    fn decode_rejects_non_list_header() {
        let err = decode_list(&[0x83, b'd', b'o', b'g'], 1, |_, _| Ok(())).unwrap_err();
        assert_eq!(err, RlpError::ListHeader(0x83));
    }

    #[test]
    fn decode_rejects_short_buffer() {
        // header says 4 payload bytes, only 3 present
        let err = decode_list(&[0xc4, 0x01, 0x02, 0x03], 3, |_, _| Ok(())).unwrap_err();
        assert_eq!(err, RlpError::PayloadLength { payload: 4, buflen: 4 });
    }

    #[test]
    fn decode_rejects_long_buffer() {
        let mut encoded = encode_list_vec(&[RlpItem::Uint(1)]);
        encoded.push(0x00);
        let err = decode_list(&encoded, 1, |_, _| Ok(())).unwrap_err();
        assert!(matches!(err, RlpError::PayloadLength { .. }));
    }

    #[test]
    fn decode_rejects_nonzero_count_for_empty_list() {
        let err = decode_list(&[0xc0], 2, |_, _| Ok(())).unwrap_err();
        assert_eq!(err, RlpError::EmptyPayload(2));
    }

    #[test]
    fn decode_empty_list_zero_items() {
        assert_eq!(decode_list(&[0xc0], 0, |_, _| Ok(())).unwrap(), 0);
    }

    #[test]
    fn decode_rejects_undercount() {
        let encoded = encode_list_vec(&[RlpItem::Uint(1), RlpItem::Uint(2)]);
        let err = decode_list(&encoded, 1, |_, _| Ok(())).unwrap_err();
        assert_eq!(
            err,
            RlpError::TrailingBytes {
                count: 1,
                remaining: 1
            }
        );
    }

    #[test]
    fn decode_rejects_overcount() {
        let encoded = encode_list_vec(&[RlpItem::Uint(1)]);
        let err = decode_list(&encoded, 2, |_, _| Ok(())).unwrap_err();
        assert_eq!(err, RlpError::Truncated { index: 1 });
    }

    #[test]
    fn decode_rejects_item_lenlen_over_4() {
        // item header 0xbc declares a 5-byte length-of-length
        let buf = [0xc6, 0xbc, 0x00, 0x00, 0x00, 0x00, 0x01];
        let err = decode_list(&buf, 1, |_, _| Ok(())).unwrap_err();
        assert_eq!(err, RlpError::LengthOfLength { index: 0 });
    }

    #[test]
    fn decode_rejects_nested_list_item() {
        // 0xc2 opens a nested two-byte list; only 0xc0 is supported
        let buf = [0xc3, 0xc2, 0x01, 0x02];
        let err = decode_list(&buf, 1, |_, _| Ok(())).unwrap_err();
        assert_eq!(
            err,
            RlpError::ItemHeader {
                index: 0,
                byte: 0xc2
            }
        );
    }

    #[test]
    fn decode_rejects_truncated_item() {
        // item declares 3 bytes, payload only has 2 more
        let buf = [0xc3, 0x83, b'd', b'o'];
        let err = decode_list(&buf, 1, |_, _| Ok(())).unwrap_err();
        assert_eq!(err, RlpError::Truncated { index: 0 });
    }

    #[test]
    fn decode_propagates_handler_error() {
        let encoded = encode_list_vec(&[RlpItem::Uint(1), RlpItem::Uint(2)]);
        let mut seen = 0;
        let err = decode_list(&encoded, 2, |_, index| {
            seen += 1;
            if index == 0 {
                Err(RlpError::Handler {
                    index,
                    reason: "unexpected value".into(),
                })
            } else {
                Ok(())
            }
        })
        .unwrap_err();
        assert!(matches!(err, RlpError::Handler { index: 0, .. }));
        // decode aborted at the first item
        assert_eq!(seen, 1);
    }

    #[test]
    fn decode_payload_addressed_from_buffer_tail() {
        // Long-form list header: the payload starts at
        // buf[len - payload], two bytes past the start.
        let blob = [0x11u8; 60];
        let encoded = encode_list_vec(&[RlpItem::Bytes(&blob)]);
        assert_eq!(encoded[0], 0xf8);
        let payload = encoded[1] as usize;
        assert_eq!(&encoded[encoded.len() - payload..][..2], &[0xb8, 60]);
        let decoded = collect_items(&encoded, 1);
        assert_eq!(decoded[0], blob.to_vec());
    }
}
