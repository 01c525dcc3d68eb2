//! HDLC-subset framing: flag-delimited, bit-stuffed frames with in-band
//! escaping of reserved bytes (spec.md §4.3, §4.4, §6).
//!
//! FCS/CRC is explicitly out of scope here; the AX.25 layer above this
//! crate is responsible for verifying and generating it.

pub mod rx;
pub mod tx;

pub use rx::{HdlcRx, RxEvent};
pub use tx::HdlcTx;
