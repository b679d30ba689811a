//! A writer for RP66 V1 ("DLIS") well log interchange files.
//!
//! RP66 V1 is a self-describing binary container used to transport
//! well-logging data. A file starts with an 80-byte Storage Unit Label and
//! continues as a sequence of visible records, each carrying one or more
//! logical record segments. Logical records come in two families:
//! explicitly formatted records (EFLRs) describing the dataset — origins,
//! channels, frames, calibrations, zones, parameters — and indirectly
//! formatted records (IFLRs) carrying the sampled data itself, one record
//! per frame row.
//!
//! This crate converts a typed in-memory description of a dataset plus
//! numeric sample arrays into a byte-exact RP66 V1 file:
//!
//! - [`codec`] encodes typed scalar values under RP66 representation codes.
//! - [`model`] holds the logical model: attributes, items, sets, and the
//!   static attribute catalog for every EFLR kind.
//! - [`source`] defines the tabular data-source contract that frame data is
//!   streamed from, with two in-memory adapters.
//! - [`write`] segments logical records, packs segments into visible
//!   records, and drives the whole pipeline to disk.
//!
//! ## Example
//!
//! ```no_run
//! use dlis_writer::model::{FileHeader, Item, Set, SetKind, Values};
//! use dlis_writer::source::{ColumnSource, Samples};
//! use dlis_writer::write::{ChannelBinding, FrameStream, LogicalFile, Writer, WriterConfig};
//!
//! # fn main() -> dlis_writer::Result<()> {
//! let mut origin = Item::new("ORIGIN-1");
//! origin.set("FILE-SET-NUMBER", 1i64);
//!
//! let mut channel = Item::new("DEPTH");
//! channel.set("REPRESENTATION-CODE", 7i64); // FDOUBL
//! channel.set("DIMENSION", vec![1i64]);
//!
//! let mut frame = Item::new("MAIN");
//! frame.set("INDEX-TYPE", "BOREHOLE-DEPTH");
//! frame.set("CHANNELS", Values::from(vec![channel.reference()]));
//!
//! let mut channels = Set::new(SetKind::Channel, None);
//! channels.add_item(channel)?;
//! let mut frames = Set::new(SetKind::Frame, None);
//! frames.add_item(frame)?;
//!
//! let mut file = LogicalFile::new(FileHeader::new("FILE", 1)?, origin)?;
//! file.add_set(channels)?;
//! file.add_set(frames)?;
//!
//! let mut source = ColumnSource::new();
//! source.add_column("depth", Samples::F64(vec![0.0, 0.5, 1.0]), vec![1])?;
//!
//! let stream = FrameStream::new(
//!     "MAIN",
//!     vec![ChannelBinding::scalar("DEPTH", "depth", dlis_writer::codec::ReprCode::Fdoubl)],
//!     &source,
//! );
//! Writer::new(WriterConfig::default()).write(file, vec![stream], "out.dlis")?;
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod model;
pub mod rp66;
pub mod source;
pub mod write;

mod error;

pub use error::{Error, Result};
