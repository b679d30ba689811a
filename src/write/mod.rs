//! The emission pipeline.
//!
//! Writing uses a strict phase order. The model and configuration are
//! validated first; no byte reaches the destination before validation
//! passes. Records are then emitted deterministically — file header,
//! origins, the remaining sets in insertion order, no-format data, then
//! one frame-data record per source row — with each record segmented,
//! the segments packed greedily into visible records, and the visible
//! records pushed through a fixed-capacity output buffer.

mod file;
mod frame_data;
mod output;
mod segment;
mod sul;

pub use self::file::{LogicalFile, Writer, WriterConfig};
pub use self::frame_data::{ChannelBinding, FrameStream, NoFormatData};
pub use self::output::{BufferedOutput, ByteWriter};
pub use self::segment::{LogicalRecord, SegmentAttrs, Segments};
pub use self::sul::StorageUnitLabel;
