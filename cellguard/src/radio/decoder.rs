//! Fixed-width slot decoder.

use tracing::{error, trace};

/// Width of one slot in bytes.
pub const SLOT_WIDTH: usize = 34;

/// Leading header bytes of each slot that carry no text.
pub const SLOT_HEADER_LEN: usize = 2;

/// Decodes a buffer using the standard 34-byte slot layout.
///
/// See [`RecordDecoder::decode`].
pub fn unpack_records(buf: &[u8]) -> Vec<String> {
    RecordDecoder::default().decode(buf)
}

/// Decoder for buffers made of fixed-width text slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordDecoder {
    slot_width: usize,
    header_len: usize,
}

impl Default for RecordDecoder {
    fn default() -> Self {
        Self {
            slot_width: SLOT_WIDTH,
            header_len: SLOT_HEADER_LEN,
        }
    }
}

impl RecordDecoder {
    /// Creates a decoder for a custom slot layout.
    ///
    /// # Panics
    ///
    /// Panics if `slot_width` is zero.
    pub fn new(slot_width: usize, header_len: usize) -> Self {
        assert!(slot_width > 0, "slot width must be non-zero");
        Self {
            slot_width,
            header_len,
        }
    }

    /// Slot width in bytes.
    pub fn slot_width(&self) -> usize {
        self.slot_width
    }

    /// Decodes `buf` into one trimmed string per slot.
    ///
    /// A record starts right after the slot header and ends at the first
    /// zero byte or after `slot_width` bytes, whichever comes first. A
    /// trailing partial slot is ignored. If the buffer ends while a record
    /// is still being scanned, that record is dropped and decoding stops
    /// with the records read so far. Trailing empty records are removed.
    pub fn decode(&self, buf: &[u8]) -> Vec<String> {
        if buf.is_empty() {
            trace!("Raw record buffer is empty");
            return Vec::new();
        }

        let slots = buf.len() / self.slot_width;
        let mut records = Vec::with_capacity(slots);

        for slot in 0..slots {
            // An offset that does not fit in usize is past any buffer.
            let start = (slot * self.slot_width)
                .checked_add(self.header_len)
                .unwrap_or(usize::MAX);
            match self.record_bytes(buf, start) {
                Some(bytes) => records.push(clean(bytes)),
                None => {
                    error!(
                        slot,
                        offset = start,
                        buffer_len = buf.len(),
                        "Unexpected end of raw record buffer"
                    );
                    break;
                }
            }
        }

        while records.last().is_some_and(|r| r.is_empty()) {
            records.pop();
        }
        records
    }

    /// Returns the record bytes starting at `start`, or `None` when the
    /// buffer ends before the record does.
    fn record_bytes<'a>(&self, buf: &'a [u8], start: usize) -> Option<&'a [u8]> {
        if start >= buf.len() {
            return None;
        }
        let end = buf.len().min(start.saturating_add(self.slot_width));
        let window = &buf[start..end];

        match window.iter().position(|&b| b == 0) {
            Some(len) => Some(&window[..len]),
            None if window.len() == self.slot_width => Some(window),
            None => None,
        }
    }
}

fn clean(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_matches(|c: char| c.is_whitespace() || c.is_control())
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a zero-padded slot with the given header and text.
    fn slot(header: [u8; 2], text: &str) -> Vec<u8> {
        let mut buf = vec![0u8; SLOT_WIDTH];
        buf[..2].copy_from_slice(&header);
        buf[2..2 + text.len()].copy_from_slice(text.as_bytes());
        buf
    }

    #[test]
    fn test_empty_buffer() {
        assert!(unpack_records(&[]).is_empty());
    }

    #[test]
    fn test_single_slot() {
        let buf = slot([0xAA, 0xAA], "CELL1");
        assert_eq!(unpack_records(&buf), vec!["CELL1"]);
    }

    #[test]
    fn test_text_is_trimmed() {
        let buf = slot([0x00, 0x01], "  LAC: 4711 \t");
        assert_eq!(unpack_records(&buf), vec!["LAC: 4711"]);
    }

    #[test]
    fn test_trailing_empty_slots_dropped() {
        let mut buf = slot([0, 0], "MCC 262");
        buf.extend(slot([0, 0], "MNC 01"));
        buf.extend(vec![0u8; SLOT_WIDTH * 3]);

        assert_eq!(unpack_records(&buf), vec!["MCC 262", "MNC 01"]);
    }

    #[test]
    fn test_inner_empty_slot_preserved() {
        let mut buf = slot([1, 1], "first");
        buf.extend(vec![0u8; SLOT_WIDTH]);
        buf.extend(slot([1, 1], "third"));
        buf.extend(vec![0u8; SLOT_WIDTH]);

        let records = unpack_records(&buf);
        assert_eq!(records.len(), 3);
        assert_eq!(records, vec!["first", "", "third"]);
    }

    #[test]
    fn test_whitespace_only_slot_counts_as_empty() {
        let mut buf = slot([0, 0], "data");
        buf.extend(slot([0, 0], "    "));
        assert_eq!(unpack_records(&buf), vec!["data"]);
    }

    #[test]
    fn test_partial_trailing_slot_ignored() {
        let mut buf = slot([0, 0], "A");
        buf.extend(slot([0, 0], "B"));
        buf.extend([0x20, 0x20, b'C', b'C', b'C']);

        assert_eq!(unpack_records(&buf), vec!["A", "B"]);
    }

    #[test]
    fn test_full_width_record_without_terminator() {
        // 32 bytes of text fill the slot; the scan runs into the next
        // slot's header, which is zero.
        let text = "X".repeat(SLOT_WIDTH - SLOT_HEADER_LEN);
        let mut buf = slot([0, 0], &text);
        buf.extend(slot([0, 0], "next"));

        assert_eq!(unpack_records(&buf), vec![text.as_str(), "next"]);
    }

    #[test]
    fn test_huge_header_len_is_truncation() {
        let buf = slot([0, 0], "CELL1");
        assert!(RecordDecoder::new(SLOT_WIDTH, usize::MAX).decode(&buf).is_empty());
        assert!(RecordDecoder::new(usize::MAX, 2).decode(&buf).is_empty());
    }

    #[test]
    fn test_truncated_last_record_halts_decoding() {
        let mut buf = slot([0, 0], "ok");
        // Last slot has no terminator and the buffer ends before the scan
        // has covered a full slot width.
        let mut last = vec![b'Z'; SLOT_WIDTH];
        last[..2].copy_from_slice(&[0, 0]);
        buf.extend(last);

        assert_eq!(unpack_records(&buf), vec!["ok"]);
    }

    #[test]
    fn test_truncation_keeps_earlier_records_only() {
        // Three slots, the middle one unterminated right up to a short
        // partial tail, so the scan of slot 1 stays inside the buffer.
        let mut buf = slot([0, 0], "one");
        let mut middle = vec![b'M'; SLOT_WIDTH];
        middle[..2].copy_from_slice(&[0, 0]);
        buf.extend(middle);
        buf.push(b'M');

        // Slot 1 scans 34 bytes from offset 36: bytes 36..70, buffer is 69.
        assert_eq!(unpack_records(&buf), vec!["one"]);
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let mut buf = slot([0, 0], "");
        buf[2] = b'a';
        buf[3] = 0xFF;
        buf[4] = b'b';
        assert_eq!(unpack_records(&buf), vec!["a\u{FFFD}b"]);
    }

    #[test]
    fn test_custom_layout() {
        let decoder = RecordDecoder::new(8, 1);
        let buf = b"#abc\0\0\0\0#xyz\0\0\0\0";
        assert_eq!(decoder.decode(buf), vec!["abc", "xyz"]);
    }

    #[test]
    fn test_buffer_shorter_than_slot() {
        assert!(unpack_records(&[1, 2, 3]).is_empty());
    }
}
