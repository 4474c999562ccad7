//! Decoding of raw radio interface responses.
//!
//! Some baseband vendors answer diagnostic OEM requests with a flat byte
//! buffer made of fixed-width slots, one line of text per slot:
//!
//! ```text
//! ┌──────┬──────────────────────────────┐┌──────┬────────────── ...
//! │ hdr  │ text \0 padding              ││ hdr  │ text \0 ...
//! │ 2 B  │ up to 32 B                   ││ 2 B  │
//! └──────┴──────────────────────────────┘└──────┴────────────── ...
//! ◄────────────── 34 bytes ─────────────►
//! ```
//!
//! [`unpack_records`] turns such a buffer into the list of lines.

mod decoder;

pub use decoder::{unpack_records, RecordDecoder, SLOT_HEADER_LEN, SLOT_WIDTH};
