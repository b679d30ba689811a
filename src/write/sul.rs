//! The Storage Unit Label.
//!
//! Eighty ASCII bytes preceding everything else in a DLIS file: sequence
//! number, DLIS version, storage unit structure, maximum record length,
//! and the storage set identifier. Unlike logical records, the label is
//! written as-is, not wrapped in a visible record.

use crate::codec::ascii_field;
use crate::error::{Error, Result};
use crate::rp66::{sul, visible_record};

/// The Storage Unit Label of a DLIS file.
#[derive(Debug, Clone)]
pub struct StorageUnitLabel {
    sequence_number: u32,
    set_identifier: String,
    max_record_length: u32,
}

impl StorageUnitLabel {
    /// Creates a label.
    ///
    /// The identifier must be ASCII and at most 60 characters; the maximum
    /// record length must be even and within `20..=16384`.
    pub fn new(
        set_identifier: impl Into<String>,
        sequence_number: u32,
        max_record_length: u32,
    ) -> Result<StorageUnitLabel> {
        let set_identifier = set_identifier.into();
        if !set_identifier.is_ascii() || set_identifier.len() > sul::SET_IDENTIFIER_WIDTH {
            return Err(Error::validation(format!(
                "storage set identifier must be ASCII and at most {} characters; got {:?}",
                sul::SET_IDENTIFIER_WIDTH,
                set_identifier,
            )));
        }
        if sequence_number > 9999 {
            return Err(Error::validation(format!(
                "storage unit sequence number {sequence_number} does not fit \
                 its {}-character field",
                sul::SEQUENCE_NUMBER_WIDTH,
            )));
        }
        if !(visible_record::MIN_LENGTH..=visible_record::MAX_LENGTH).contains(&max_record_length)
        {
            return Err(Error::validation(format!(
                "maximum record length must be within {}..={}; got {max_record_length}",
                visible_record::MIN_LENGTH,
                visible_record::MAX_LENGTH,
            )));
        }
        if max_record_length % 2 != 0 {
            return Err(Error::validation(format!(
                "maximum record length must be even; got {max_record_length}"
            )));
        }
        Ok(StorageUnitLabel {
            sequence_number,
            set_identifier,
            max_record_length,
        })
    }

    /// Returns the maximum record length the label declares.
    pub fn max_record_length(&self) -> u32 {
        self.max_record_length
    }

    /// Builds the 80 label bytes.
    pub fn bytes(&self) -> Result<Vec<u8>> {
        let mut buf = String::with_capacity(sul::SIZE);
        buf.push_str(&ascii_field(
            &self.sequence_number.to_string(),
            sul::SEQUENCE_NUMBER_WIDTH,
            false,
        )?);
        buf.push_str(&ascii_field(sul::VERSION, sul::VERSION_WIDTH, true)?);
        buf.push_str(&ascii_field(sul::STRUCTURE, sul::STRUCTURE_WIDTH, false)?);
        buf.push_str(&ascii_field(
            &self.max_record_length.to_string(),
            sul::MAX_RECORD_LENGTH_WIDTH,
            false,
        )?);
        buf.push_str(&ascii_field(
            &self.set_identifier,
            sul::SET_IDENTIFIER_WIDTH,
            true,
        )?);
        debug_assert_eq!(buf.len(), sul::SIZE);
        Ok(buf.into_bytes())
    }
}
