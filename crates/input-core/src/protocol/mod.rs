//! Protocol module containing record types, the binary codec and the sink seam.

pub mod codec;
pub mod messages;
pub mod sink;
pub mod text;

pub use codec::{decode_record, record_to_le_bytes, ProtocolError, WireEncoder};
pub use messages::*;
pub use sink::{RecordSink, RecordingSink};
