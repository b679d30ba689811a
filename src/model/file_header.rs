//! The FILE-HEADER logical record.
//!
//! Every logical file starts with a FILE-HEADER EFLR whose template is
//! fixed by the standard: a SEQUENCE-NUMBER and an ID, both ASCII, written
//! as fixed-width fields. Its sole item is named "0".

use crate::codec::{self, ObName};
use crate::error::{Error, Result};
use crate::rp66::{self, attr, component, eflr_type, reprcode};

const SEQUENCE_NUMBER_WIDTH: usize = 20;
const ID_WIDTH: usize = rp66::FILE_HEADER_ID_MAX_LEN;

/// The FILE-HEADER record of a logical file.
#[derive(Debug, Clone)]
pub struct FileHeader {
    id: String,
    sequence_number: u32,
    origin_reference: Option<u32>,
}

impl FileHeader {
    /// Creates a file header with the given identifier and sequence
    /// number. The identifier must be ASCII and at most 65 characters.
    pub fn new(id: impl Into<String>, sequence_number: u32) -> Result<FileHeader> {
        let id = id.into();
        if !id.is_ascii() {
            return Err(Error::validation(format!(
                "file header identifier must be ASCII; got {id:?}"
            )));
        }
        if id.len() > ID_WIDTH {
            return Err(Error::validation(format!(
                "file header identifier cannot exceed {ID_WIDTH} characters"
            )));
        }
        Ok(FileHeader {
            id,
            sequence_number,
            origin_reference: None,
        })
    }

    /// Returns the identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the sequence number.
    pub fn sequence_number(&self) -> u32 {
        self.sequence_number
    }

    pub(crate) fn resolve_origin(&mut self, default: u32) {
        self.origin_reference.get_or_insert(default);
    }

    /// Returns the logical record type code.
    pub(crate) fn record_type(&self) -> u8 {
        eflr_type::FHLR
    }

    /// Builds the logical record body with the fixed template and the
    /// fixed-width attribute values.
    pub(crate) fn body_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();

        buf.push(component::SET);
        codec::put_ident(&mut buf, "FILE-HEADER")?;

        // Template: both attributes declare label and representation code.
        for label in ["SEQUENCE-NUMBER", "ID"] {
            buf.push(attr::ROLE | attr::LABEL | attr::REPRESENTATION_CODE);
            codec::put_ident(&mut buf, label)?;
            buf.push(reprcode::ASCII);
        }

        buf.push(component::OBJECT);
        let name = ObName {
            origin: self.origin_reference,
            copy: 0,
            name: "0".into(),
        };
        codec::put_obname(&mut buf, &name)?;

        buf.push(attr::ROLE | attr::VALUE);
        let sequence = codec::ascii_field(
            &self.sequence_number.to_string(),
            SEQUENCE_NUMBER_WIDTH,
            false,
        )?;
        codec::put_ascii(&mut buf, &sequence)?;

        buf.push(attr::ROLE | attr::VALUE);
        let id = codec::ascii_field(&self.id, ID_WIDTH, true)?;
        codec::put_ascii(&mut buf, &id)?;

        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_limits() {
        assert!(FileHeader::new("X".repeat(65), 1).is_ok());
        assert!(FileHeader::new("X".repeat(66), 1).is_err());
        assert!(FileHeader::new("café", 1).is_err());
    }

    #[test]
    fn body_layout() {
        let mut fh = FileHeader::new("FILE", 8).unwrap();
        fh.resolve_origin(1);
        let body = fh.body_bytes().unwrap();

        let mut expected = vec![0xF0, 11];
        expected.extend_from_slice(b"FILE-HEADER");
        expected.extend_from_slice(&[0x34, 15]);
        expected.extend_from_slice(b"SEQUENCE-NUMBER");
        expected.push(20);
        expected.extend_from_slice(&[0x34, 2]);
        expected.extend_from_slice(b"ID");
        expected.push(20);
        expected.extend_from_slice(&[0x70, 0x01, 0x00, 0x01, b'0']);
        expected.extend_from_slice(&[0x21, 20]);
        expected.extend_from_slice(format!("{:>20}", 8).as_bytes());
        expected.extend_from_slice(&[0x21, 65]);
        expected.extend_from_slice(format!("{:<65}", "FILE").as_bytes());
        assert_eq!(body, expected);
    }

    #[test]
    fn unresolved_origin_fails() {
        let fh = FileHeader::new("FILE", 1).unwrap();
        assert!(fh.body_bytes().is_err());
    }
}
