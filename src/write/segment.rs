//! Splitting logical records into logical record segments.
//!
//! A logical record's body rarely fits one visible record, so it is cut
//! into segments. Each segment carries a 4-byte header (total size,
//! attribute flags, record type), must total at least 16 bytes, and must
//! have an even size; odd-sized segments gain one `0x01` padding byte.
//! Because no segment body may be shorter than 12 bytes, a cut that would
//! leave a short tail shortens the current segment instead so the tail
//! comes out to exactly 12.

use bitflags::bitflags;

use crate::error::{Error, Result};
use crate::rp66::segment::{HEADER_SIZE, MIN_BODY_SIZE, PAD_BYTE};

bitflags! {
    /// The attributes byte of a logical record segment header.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SegmentAttrs: u8 {
        /// The segment belongs to an explicitly formatted logical record.
        const EFLR = 0x80;
        /// A predecessor segment of the same record exists.
        const PREDECESSOR = 0x40;
        /// A successor segment of the same record exists.
        const SUCCESSOR = 0x20;
        /// The record is encrypted. Never set by this crate.
        const ENCRYPTED = 0x10;
        /// An encryption protocol field follows the header. Never set.
        const ENCRYPTION_PROTOCOL = 0x08;
        /// A checksum trails the body. Never set.
        const CHECKSUM = 0x04;
        /// A trailing length field ends the segment. Never set.
        const TRAILING_LENGTH = 0x02;
        /// One padding byte was appended to even out the size.
        const PADDING = 0x01;
    }
}

/// The bytes of one logical record, ready to be segmented.
#[derive(Debug, Clone)]
pub struct LogicalRecord {
    body: Vec<u8>,
    record_type: u8,
    is_eflr: bool,
}

impl LogicalRecord {
    /// Wraps a record body with its type code and family.
    pub fn new(body: Vec<u8>, record_type: u8, is_eflr: bool) -> LogicalRecord {
        LogicalRecord {
            body,
            record_type,
            is_eflr,
        }
    }

    /// Returns the body length.
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Returns true when the body is empty.
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Returns a lazy sequence of segments whose bodies are at most
    /// `max_body` bytes and concatenate back to the record body.
    ///
    /// Fails when the record is shorter than the 12-byte minimum or when
    /// `max_body` cannot accommodate a legal split: the shortening rule
    /// must never push a segment body under 12 bytes.
    pub fn segments(&self, max_body: usize) -> Result<Segments<'_>> {
        let len = self.body.len();
        if len < MIN_BODY_SIZE {
            return Err(Error::segmentation(format!(
                "logical record body of {len} bytes is shorter than the \
                 {MIN_BODY_SIZE}-byte minimum"
            )));
        }
        if max_body < MIN_BODY_SIZE {
            return Err(Error::segmentation(format!(
                "maximum segment body of {max_body} bytes is shorter than the \
                 {MIN_BODY_SIZE}-byte minimum"
            )));
        }
        if len > max_body {
            // The only adjustment happens when the final remainder is in
            // 1..12: the previous segment gives up (12 - remainder) bytes.
            let remainder = len % max_body;
            if remainder > 0 && remainder < MIN_BODY_SIZE && max_body < 2 * MIN_BODY_SIZE - remainder
            {
                return Err(Error::segmentation(format!(
                    "cannot split a {len}-byte record into segment bodies of \
                     at most {max_body} bytes without one shorter than \
                     {MIN_BODY_SIZE}"
                )));
            }
        }
        Ok(Segments {
            record: self,
            max_body,
            pos: 0,
        })
    }
}

/// Iterator over the segments of one logical record.
#[derive(Debug)]
pub struct Segments<'a> {
    record: &'a LogicalRecord,
    max_body: usize,
    pos: usize,
}

impl<'a> Iterator for Segments<'a> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Vec<u8>> {
        let body = &self.record.body;
        if self.pos >= body.len() {
            return None;
        }

        let remaining = body.len() - self.pos;
        let mut take = remaining.min(self.max_body);
        let tail = remaining - take;
        if tail > 0 && tail < MIN_BODY_SIZE {
            take -= MIN_BODY_SIZE - tail;
        }

        let mut attrs = SegmentAttrs::empty();
        if self.record.is_eflr {
            attrs |= SegmentAttrs::EFLR;
        }
        if self.pos > 0 {
            attrs |= SegmentAttrs::PREDECESSOR;
        }
        if self.pos + take < body.len() {
            attrs |= SegmentAttrs::SUCCESSOR;
        }

        let mut size = HEADER_SIZE + take;
        let padded = size % 2 == 1;
        if padded {
            size += 1;
            attrs |= SegmentAttrs::PADDING;
        }

        let mut segment = Vec::with_capacity(size);
        segment.extend_from_slice(&(size as u16).to_be_bytes());
        segment.push(attrs.bits());
        segment.push(self.record.record_type);
        segment.extend_from_slice(&body[self.pos..self.pos + take]);
        if padded {
            segment.push(PAD_BYTE);
        }

        self.pos += take;
        Some(segment)
    }
}
