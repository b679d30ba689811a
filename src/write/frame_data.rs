//! Indirectly formatted logical records: frame data and no-format data.
//!
//! Each data row of a frame becomes one Frame Data record: the frame's
//! OBNAME, a 1-based row index, and the row's samples serialized
//! big-endian per channel. No-format records carry raw bytes behind a
//! NO-FORMAT item reference.

use crate::codec::{self, ObName, ReprCode};
use crate::error::{Error, Result};
use crate::rp66::segment::{MIN_BODY_SIZE, PAD_BYTE};
use crate::source::{DataSource, Row};

/// Binds one frame channel to a data-source column.
#[derive(Debug, Clone)]
pub struct ChannelBinding {
    /// The channel item the samples belong to.
    pub channel: ObName,
    /// The source column the samples come from.
    pub dataset_name: String,
    /// The representation code the samples are written under.
    pub code: ReprCode,
    /// The per-row sample dimensions.
    pub dimension: Vec<usize>,
}

impl ChannelBinding {
    /// Creates a binding.
    pub fn new(
        channel: ObName,
        dataset_name: impl Into<String>,
        code: ReprCode,
        dimension: Vec<usize>,
    ) -> ChannelBinding {
        ChannelBinding {
            channel,
            dataset_name: dataset_name.into(),
            code,
            dimension,
        }
    }

    /// Creates a binding for a scalar channel.
    pub fn scalar(
        channel_name: &str,
        dataset_name: &str,
        code: ReprCode,
    ) -> ChannelBinding {
        ChannelBinding::new(ObName::new(channel_name), dataset_name, code, vec![1])
    }

    /// Returns the number of samples one row holds.
    pub fn element_count(&self) -> usize {
        self.dimension.iter().product()
    }
}

/// One frame's stream of data rows.
///
/// The bindings must list the frame's channels in frame order; validation
/// checks them against both the frame item and the source dtype before
/// the first row is emitted.
pub struct FrameStream<'a> {
    frame: ObName,
    bindings: Vec<ChannelBinding>,
    source: &'a dyn DataSource,
    chunk_rows: Option<usize>,
}

impl<'a> FrameStream<'a> {
    /// Creates a stream for the named frame.
    pub fn new(
        frame_name: &str,
        bindings: Vec<ChannelBinding>,
        source: &'a dyn DataSource,
    ) -> FrameStream<'a> {
        FrameStream {
            frame: ObName::new(frame_name),
            bindings,
            source,
            chunk_rows: None,
        }
    }

    /// Sets the number of rows loaded from the source at a time.
    pub fn with_chunk_rows(mut self, chunk_rows: usize) -> FrameStream<'a> {
        self.chunk_rows = Some(chunk_rows);
        self
    }

    /// Returns the frame reference.
    pub fn frame(&self) -> &ObName {
        &self.frame
    }

    /// Returns the channel bindings.
    pub fn bindings(&self) -> &[ChannelBinding] {
        &self.bindings
    }

    /// Returns the data source.
    pub fn source(&self) -> &dyn DataSource {
        self.source
    }

    /// Returns the number of rows the stream will emit.
    pub fn row_count(&self) -> usize {
        self.source.row_count()
    }

    pub(crate) fn resolve_origin(&mut self, default: u32) {
        self.frame.origin.get_or_insert(default);
        for binding in &mut self.bindings {
            binding.channel.origin.get_or_insert(default);
        }
    }

    /// Checks the bindings against the source dtype: same columns in the
    /// same order, encodable sample types, matching shapes.
    pub(crate) fn validate_against_source(&self) -> Result<()> {
        let dtype = self.source.dtype();
        if dtype.len() != self.bindings.len() {
            return Err(Error::validation(format!(
                "frame {:?} binds {} channels; the data source has {} columns",
                self.frame.name,
                self.bindings.len(),
                dtype.len(),
            )));
        }
        for (binding, spec) in self.bindings.iter().zip(dtype) {
            if binding.dataset_name != spec.name {
                return Err(Error::validation(format!(
                    "frame {:?} expects column {:?}; the data source has {:?} \
                     at that position",
                    self.frame.name, binding.dataset_name, spec.name,
                )));
            }
            if !spec.sample.encodable_as(binding.code) {
                return Err(Error::validation(format!(
                    "column {:?} holds {:?} samples, which cannot be encoded \
                     under representation code {:?}",
                    spec.name,
                    spec.sample,
                    binding.code,
                )));
            }
            if binding.element_count() != spec.element_count() {
                return Err(Error::validation(format!(
                    "channel {:?} has dimension {:?}; column {:?} has shape {:?}",
                    binding.channel.name, binding.dimension, spec.name, spec.shape,
                )));
            }
        }
        Ok(())
    }

    /// Builds the record body for one row.
    pub(crate) fn row_body(&self, frame_number: u32, row: &Row) -> Result<Vec<u8>> {
        let mut body = Vec::new();
        codec::put_obname(&mut body, &self.frame)?;
        codec::put_uvari(&mut body, frame_number);
        for (binding, cell) in self.bindings.iter().zip(row.cells()) {
            cell.encode(binding.code, &mut body)?;
        }
        Ok(body)
    }

    /// Returns a lazy sequence of record bodies, one per row, with
    /// 1-based, strictly increasing frame numbers.
    pub(crate) fn record_bodies(&self) -> impl Iterator<Item = Result<Vec<u8>>> + '_ {
        let mut frame_number = 0u32;
        self.source
            .chunked_rows(self.chunk_rows)
            .flat_map(|chunk| match chunk {
                Ok(rows) => rows.into_iter().map(Ok).collect::<Vec<_>>(),
                Err(err) => vec![Err(err)],
            })
            .map(move |row| {
                let row = row?;
                frame_number += 1;
                self.row_body(frame_number, &row)
            })
    }
}

impl std::fmt::Debug for FrameStream<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameStream")
            .field("frame", &self.frame)
            .field("bindings", &self.bindings)
            .field("rows", &self.source.row_count())
            .field("chunk_rows", &self.chunk_rows)
            .finish()
    }
}

/// One no-format data record: raw bytes behind a NO-FORMAT item.
#[derive(Debug, Clone)]
pub struct NoFormatData {
    target: ObName,
    data: Vec<u8>,
}

impl NoFormatData {
    /// Creates a record carrying `data` under the named NO-FORMAT item.
    pub fn new(target_name: &str, data: Vec<u8>) -> NoFormatData {
        NoFormatData {
            target: ObName::new(target_name),
            data,
        }
    }

    /// Returns the target reference.
    pub fn target(&self) -> &ObName {
        &self.target
    }

    pub(crate) fn resolve_origin(&mut self, default: u32) {
        self.target.origin.get_or_insert(default);
    }

    /// Builds the record body, padded to the 12-byte segment minimum.
    pub(crate) fn body_bytes(&self) -> Result<Vec<u8>> {
        let mut body = Vec::new();
        codec::put_obname(&mut body, &self.target)?;
        body.extend_from_slice(&self.data);
        while body.len() < MIN_BODY_SIZE {
            body.push(PAD_BYTE);
        }
        Ok(body)
    }
}
