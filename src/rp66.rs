//! RP66 V1 on-disk definitions.
//!
//! This module collects the raw constants of the RP66 V1 standard: the
//! representation-code tags, logical record type codes, component descriptor
//! bytes, segment attribute bits, and the fixed geometry of the Storage Unit
//! Label and visible records.
//!
//! See <http://w3.energistics.org/rp66/v1/Toc/main.html>.

/// Representation code tags (RP66 V1 Appendix B).
pub mod reprcode {
    /// Two-byte low-precision floating point.
    pub const FSHORT: u8 = 1;
    /// IEEE single-precision floating point.
    pub const FSINGL: u8 = 2;
    /// Validated single-precision floating point.
    pub const FSING1: u8 = 3;
    /// Two-way validated single-precision floating point.
    pub const FSING2: u8 = 4;
    /// IBM System/360 single-precision floating point.
    pub const ISINGL: u8 = 5;
    /// VAX single-precision floating point.
    pub const VSINGL: u8 = 6;
    /// IEEE double-precision floating point.
    pub const FDOUBL: u8 = 7;
    /// Validated double-precision floating point.
    pub const FDOUB1: u8 = 8;
    /// Two-way validated double-precision floating point.
    pub const FDOUB2: u8 = 9;
    /// Single-precision complex.
    pub const CSINGL: u8 = 10;
    /// Double-precision complex.
    pub const CDOUBL: u8 = 11;
    /// Signed 1-byte integer.
    pub const SSHORT: u8 = 12;
    /// Signed 2-byte integer.
    pub const SNORM: u8 = 13;
    /// Signed 4-byte integer.
    pub const SLONG: u8 = 14;
    /// Unsigned 1-byte integer.
    pub const USHORT: u8 = 15;
    /// Unsigned 2-byte integer.
    pub const UNORM: u8 = 16;
    /// Unsigned 4-byte integer.
    pub const ULONG: u8 = 17;
    /// Variable-length unsigned integer (1, 2, or 4 bytes).
    pub const UVARI: u8 = 18;
    /// Variable-length identifier, at most 255 ASCII characters.
    pub const IDENT: u8 = 19;
    /// Variable-length ASCII string.
    pub const ASCII: u8 = 20;
    /// Date and time.
    pub const DTIME: u8 = 21;
    /// Origin reference. Enumerated by the standard; this crate never
    /// encodes it.
    pub const ORIGIN: u8 = 22;
    /// Object name: origin reference, copy number, identifier.
    pub const OBNAME: u8 = 23;
    /// Object reference: set type plus object name.
    pub const OBJREF: u8 = 24;
    /// Attribute reference. Enumerated by the standard; this crate never
    /// encodes it.
    pub const ATTREF: u8 = 25;
    /// Boolean status, 0 or 1.
    pub const STATUS: u8 = 26;
    /// Arbitrary units expression; encoded like IDENT with a restricted
    /// character set.
    pub const UNITS: u8 = 27;
}

/// Logical record type codes for explicitly formatted logical records
/// (RP66 V1 Appendix A.2).
pub mod eflr_type {
    /// File header.
    pub const FHLR: u8 = 0;
    /// Origin.
    pub const OLR: u8 = 1;
    /// Coordinate axis.
    pub const AXIS: u8 = 2;
    /// Channel.
    pub const CHANNL: u8 = 3;
    /// Frame.
    pub const FRAME: u8 = 4;
    /// Static data: parameters, equipment, calibrations, and the like.
    pub const STATIC: u8 = 5;
    /// Textual data: messages and comments.
    pub const SCRIPT: u8 = 6;
    /// Update data.
    pub const UPDATE: u8 = 7;
    /// Unformatted data identifier.
    pub const UDI: u8 = 8;
    /// Long name.
    pub const LNAME: u8 = 9;
    /// Specification.
    pub const SPEC: u8 = 10;
    /// Dictionary.
    pub const DICT: u8 = 11;
}

/// Logical record type codes for indirectly formatted logical records
/// (RP66 V1 Appendix A.3).
pub mod iflr_type {
    /// Frame data.
    pub const FDATA: u8 = 0;
    /// Unformatted ("no-format") data.
    pub const NOFMT: u8 = 1;
}

/// Component descriptor bytes (RP66 V1 section 3.2.2).
///
/// The high three bits of a component descriptor select the role; the low
/// five bits are role-specific format flags. Attribute components build
/// their descriptor from [`attr`] bits instead.
pub mod component {
    /// Set component without a set name.
    pub const SET: u8 = 0xF0;
    /// Set component followed by a set name.
    pub const SET_WITH_NAME: u8 = 0xF8;
    /// Object (item) component, followed by the item's OBNAME.
    pub const OBJECT: u8 = 0x70;
    /// Attribute component with no parts present; used for attributes whose
    /// value is absent in a particular item.
    pub const ABSENT_ATTRIBUTE: u8 = 0x00;
}

/// Attribute component descriptor bits (RP66 V1 section 3.2.2.1).
///
/// An attribute descriptor is `0b001x_xxxx` where the low five bits flag
/// which parts follow: label, count, representation code, units, value.
pub mod attr {
    /// Role bits identifying an attribute component.
    pub const ROLE: u8 = 0x20;
    /// A label follows.
    pub const LABEL: u8 = 0x10;
    /// A count (UVARI) follows.
    pub const COUNT: u8 = 0x08;
    /// A representation code (USHORT) follows.
    pub const REPRESENTATION_CODE: u8 = 0x04;
    /// A units expression (IDENT) follows.
    pub const UNITS: u8 = 0x02;
    /// Value bytes follow.
    pub const VALUE: u8 = 0x01;
}

/// UVARI packing offsets (RP66 V1 Appendix B.18).
///
/// A UVARI value under 128 packs as one byte. Otherwise the value is packed
/// with a two-bit length prefix by adding the offset to the raw value and
/// emitting the sum big-endian.
pub mod uvari {
    /// Largest value that packs as a single byte.
    pub const ONE_BYTE_MAX: u32 = 127;
    /// Offset for the two-byte form: prefix bits `10`.
    pub const UNORM_OFFSET: u32 = 0x8000;
    /// Largest value that packs as two bytes.
    pub const TWO_BYTE_MAX: u32 = 16383;
    /// Offset for the four-byte form: prefix bits `11`.
    pub const ULONG_OFFSET: u32 = 0xC000_0000;
    /// Largest encodable UVARI value.
    pub const MAX: u32 = u32::MAX - ULONG_OFFSET;
}

/// Logical record segment geometry (RP66 V1 section 2.2.2.1).
pub mod segment {
    /// Size of a segment header: length, attributes, record type.
    pub const HEADER_SIZE: usize = 4;
    /// Minimum number of body bytes in a segment.
    pub const MIN_BODY_SIZE: usize = 12;
    /// Minimum total segment size.
    pub const MIN_SIZE: usize = HEADER_SIZE + MIN_BODY_SIZE;
    /// The padding byte appended when a segment would otherwise have an odd
    /// number of bytes.
    pub const PAD_BYTE: u8 = 0x01;
}

/// Visible record geometry (RP66 V1 section 2.3.6).
pub mod visible_record {
    /// Size of a visible record header: length plus format version.
    pub const HEADER_SIZE: usize = 4;
    /// The fixed format version bytes, `0xFF 0x01`.
    pub const FORMAT_VERSION: [u8; 2] = [0xFF, 0x01];
    /// Minimum visible record length: a header plus one minimum segment.
    pub const MIN_LENGTH: u32 = 20;
    /// Maximum visible record length.
    pub const MAX_LENGTH: u32 = 16384;
}

/// Storage Unit Label geometry (RP66 V1 section 2.3.2).
pub mod sul {
    /// Total size of the label.
    pub const SIZE: usize = 80;
    /// Width of the storage unit sequence number field.
    pub const SEQUENCE_NUMBER_WIDTH: usize = 4;
    /// Width of the DLIS version field.
    pub const VERSION_WIDTH: usize = 5;
    /// Width of the storage unit structure field.
    pub const STRUCTURE_WIDTH: usize = 6;
    /// Width of the maximum record length field.
    pub const MAX_RECORD_LENGTH_WIDTH: usize = 5;
    /// Width of the storage set identifier field.
    pub const SET_IDENTIFIER_WIDTH: usize = 60;
    /// The DLIS version this crate writes.
    pub const VERSION: &str = "V1.00";
    /// The only storage unit structure defined by RP66 V1.
    pub const STRUCTURE: &str = "RECORD";
}

/// Maximum length of an IDENT string.
pub const IDENT_MAX_LEN: usize = 255;

/// Maximum length of the FILE-HEADER identifier.
pub const FILE_HEADER_ID_MAX_LEN: usize = 65;
