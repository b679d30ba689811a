//! Representation-code codec.
//!
//! RP66 V1 defines a small set of primitive on-wire types called
//! representation codes. This module converts typed scalar values to their
//! big-endian byte form, infers a suitable code from a value when the
//! logical model does not pin one down, and provides the few decoders the
//! crate needs to check its own output.
//!
//! The validated and complex float codes (FSING1, FSING2, FDOUB1, FDOUB2,
//! CSINGL, CDOUBL) take their components as consecutive values; encoding a
//! list of scalars under one of them produces the same bytes as packing the
//! tuple at once.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::error::{Error, Result};
use crate::rp66::{self, uvari};

/// An RP66 V1 representation code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReprCode {
    /// Two-byte low-precision floating point, carried as a signed short.
    Fshort,
    /// IEEE single-precision floating point.
    Fsingl,
    /// Validated single-precision floating point.
    Fsing1,
    /// Two-way validated single-precision floating point.
    Fsing2,
    /// IBM System/360 single-precision floating point, carried as a raw
    /// 4-byte pattern.
    Isingl,
    /// VAX single-precision floating point, carried as a raw 4-byte
    /// pattern.
    Vsingl,
    /// IEEE double-precision floating point.
    Fdoubl,
    /// Validated double-precision floating point.
    Fdoub1,
    /// Two-way validated double-precision floating point.
    Fdoub2,
    /// Single-precision complex.
    Csingl,
    /// Double-precision complex.
    Cdoubl,
    /// Signed 1-byte integer.
    Sshort,
    /// Signed 2-byte integer.
    Snorm,
    /// Signed 4-byte integer.
    Slong,
    /// Unsigned 1-byte integer.
    Ushort,
    /// Unsigned 2-byte integer.
    Unorm,
    /// Unsigned 4-byte integer.
    Ulong,
    /// Variable-length unsigned integer.
    Uvari,
    /// Identifier string, at most 255 ASCII characters.
    Ident,
    /// ASCII string of arbitrary length.
    Ascii,
    /// Date and time.
    Dtime,
    /// Origin reference. No encoder is defined.
    Origin,
    /// Object name.
    Obname,
    /// Object reference.
    Objref,
    /// Attribute reference. No encoder is defined.
    Attref,
    /// Boolean status.
    Status,
    /// Units expression.
    Units,
}

impl ReprCode {
    /// Returns the integer tag of this code.
    pub fn tag(self) -> u8 {
        use crate::rp66::reprcode::*;
        match self {
            ReprCode::Fshort => FSHORT,
            ReprCode::Fsingl => FSINGL,
            ReprCode::Fsing1 => FSING1,
            ReprCode::Fsing2 => FSING2,
            ReprCode::Isingl => ISINGL,
            ReprCode::Vsingl => VSINGL,
            ReprCode::Fdoubl => FDOUBL,
            ReprCode::Fdoub1 => FDOUB1,
            ReprCode::Fdoub2 => FDOUB2,
            ReprCode::Csingl => CSINGL,
            ReprCode::Cdoubl => CDOUBL,
            ReprCode::Sshort => SSHORT,
            ReprCode::Snorm => SNORM,
            ReprCode::Slong => SLONG,
            ReprCode::Ushort => USHORT,
            ReprCode::Unorm => UNORM,
            ReprCode::Ulong => ULONG,
            ReprCode::Uvari => UVARI,
            ReprCode::Ident => IDENT,
            ReprCode::Ascii => ASCII,
            ReprCode::Dtime => DTIME,
            ReprCode::Origin => ORIGIN,
            ReprCode::Obname => OBNAME,
            ReprCode::Objref => OBJREF,
            ReprCode::Attref => ATTREF,
            ReprCode::Status => STATUS,
            ReprCode::Units => UNITS,
        }
    }

    /// Returns the code with the given integer tag.
    pub fn from_tag(tag: u8) -> Option<ReprCode> {
        use crate::rp66::reprcode::*;
        Some(match tag {
            FSHORT => ReprCode::Fshort,
            FSINGL => ReprCode::Fsingl,
            FSING1 => ReprCode::Fsing1,
            FSING2 => ReprCode::Fsing2,
            ISINGL => ReprCode::Isingl,
            VSINGL => ReprCode::Vsingl,
            FDOUBL => ReprCode::Fdoubl,
            FDOUB1 => ReprCode::Fdoub1,
            FDOUB2 => ReprCode::Fdoub2,
            CSINGL => ReprCode::Csingl,
            CDOUBL => ReprCode::Cdoubl,
            SSHORT => ReprCode::Sshort,
            SNORM => ReprCode::Snorm,
            SLONG => ReprCode::Slong,
            USHORT => ReprCode::Ushort,
            UNORM => ReprCode::Unorm,
            ULONG => ReprCode::Ulong,
            UVARI => ReprCode::Uvari,
            IDENT => ReprCode::Ident,
            ASCII => ReprCode::Ascii,
            DTIME => ReprCode::Dtime,
            ORIGIN => ReprCode::Origin,
            OBNAME => ReprCode::Obname,
            OBJREF => ReprCode::Objref,
            ATTREF => ReprCode::Attref,
            STATUS => ReprCode::Status,
            UNITS => ReprCode::Units,
            _ => return None,
        })
    }

    /// Returns true for the floating-point codes.
    pub fn is_float(self) -> bool {
        matches!(
            self,
            ReprCode::Fshort
                | ReprCode::Fsingl
                | ReprCode::Fsing1
                | ReprCode::Fsing2
                | ReprCode::Isingl
                | ReprCode::Vsingl
                | ReprCode::Fdoubl
                | ReprCode::Fdoub1
                | ReprCode::Fdoub2
                | ReprCode::Csingl
                | ReprCode::Cdoubl
        )
    }

    /// Returns true for the fixed-width integer codes and UVARI.
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            ReprCode::Sshort
                | ReprCode::Snorm
                | ReprCode::Slong
                | ReprCode::Ushort
                | ReprCode::Unorm
                | ReprCode::Ulong
                | ReprCode::Uvari
        )
    }

    /// Returns true for any numeric code.
    pub fn is_numeric(self) -> bool {
        self.is_float() || self.is_integer()
    }
}

/// The on-wire identifier of an EFLR item.
///
/// An OBNAME encodes as `UVARI(origin) ‖ USHORT(copy) ‖ IDENT(name)`. The
/// origin reference may be left unresolved while the model is being built;
/// the driver fills in the defining origin's file set number before
/// emission.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObName {
    /// Origin reference, or `None` to inherit the default at write time.
    pub origin: Option<u32>,
    /// Copy number distinguishing items with colliding names.
    pub copy: u8,
    /// The item name.
    pub name: String,
}

impl ObName {
    /// Creates a reference to the named item with an unresolved origin and
    /// copy number 0.
    pub fn new(name: impl Into<String>) -> ObName {
        ObName {
            origin: None,
            copy: 0,
            name: name.into(),
        }
    }

    /// Sets the origin reference.
    pub fn with_origin(mut self, origin: u32) -> ObName {
        self.origin = Some(origin);
        self
    }

    /// Sets the copy number.
    pub fn with_copy(mut self, copy: u8) -> ObName {
        self.copy = copy;
        self
    }
}

/// The on-wire reference to an EFLR item in a named set type.
///
/// Encodes as `IDENT(set_type) ‖ OBNAME`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjRef {
    /// The set type of the referenced item, e.g. `CHANNEL`.
    pub set_type: String,
    /// The referenced item.
    pub name: ObName,
}

/// A typed scalar value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// A boolean, encoded under STATUS.
    Bool(bool),
    /// A signed integer, encoded under any integer code it fits.
    Int(i64),
    /// A single-precision float.
    F32(f32),
    /// A double-precision float.
    F64(f64),
    /// A text value.
    Str(String),
    /// A date and time.
    DateTime(NaiveDateTime),
    /// A reference to an item.
    Name(ObName),
    /// A reference to an item qualified by its set type.
    Ref(ObjRef),
}

impl Scalar {
    fn kind(&self) -> &'static str {
        match self {
            Scalar::Bool(_) => "boolean",
            Scalar::Int(_) => "integer",
            Scalar::F32(_) | Scalar::F64(_) => "float",
            Scalar::Str(_) => "string",
            Scalar::DateTime(_) => "date-time",
            Scalar::Name(_) => "object name",
            Scalar::Ref(_) => "object reference",
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match *self {
            Scalar::Int(v) => Some(v as f64),
            Scalar::F32(v) => Some(v.into()),
            Scalar::F64(v) => Some(v),
            _ => None,
        }
    }

    fn as_int(&self) -> Option<i64> {
        match *self {
            Scalar::Int(v) => Some(v),
            Scalar::Bool(v) => Some(v.into()),
            _ => None,
        }
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Scalar {
        Scalar::Bool(v)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Scalar {
        Scalar::Int(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Scalar {
        Scalar::Int(v.into())
    }
}

impl From<u32> for Scalar {
    fn from(v: u32) -> Scalar {
        Scalar::Int(v.into())
    }
}

impl From<f32> for Scalar {
    fn from(v: f32) -> Scalar {
        Scalar::F32(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Scalar {
        Scalar::F64(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Scalar {
        Scalar::Str(v.into())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Scalar {
        Scalar::Str(v)
    }
}

impl From<NaiveDateTime> for Scalar {
    fn from(v: NaiveDateTime) -> Scalar {
        Scalar::DateTime(v)
    }
}

impl From<ObName> for Scalar {
    fn from(v: ObName) -> Scalar {
        Scalar::Name(v)
    }
}

impl From<ObjRef> for Scalar {
    fn from(v: ObjRef) -> Scalar {
        Scalar::Ref(v)
    }
}

/// Determines the narrowest representation code suitable for a value.
///
/// Returns `None` when no code matches, e.g. for an integer wider than 32
/// bits; the attribute encoder turns that into an error.
pub fn infer(value: &Scalar) -> Option<ReprCode> {
    match *value {
        Scalar::Bool(_) => Some(ReprCode::Status),
        Scalar::Int(v) => {
            if (0..=0xFF).contains(&v) {
                Some(ReprCode::Ushort)
            } else if (-0x8000..=0x7FFF).contains(&v) {
                Some(ReprCode::Snorm)
            } else if (0..=0xFFFF_FFFF).contains(&v) {
                Some(ReprCode::Ulong)
            } else {
                None
            }
        }
        Scalar::F32(_) => Some(ReprCode::Fsingl),
        Scalar::F64(_) => Some(ReprCode::Fdoubl),
        Scalar::Str(_) => Some(ReprCode::Ascii),
        Scalar::DateTime(_) => Some(ReprCode::Dtime),
        Scalar::Name(_) => Some(ReprCode::Obname),
        Scalar::Ref(_) => Some(ReprCode::Objref),
    }
}

/// Encodes a scalar under the given representation code, appending the
/// bytes to `buf`.
pub fn encode(code: ReprCode, value: &Scalar, buf: &mut Vec<u8>) -> Result<()> {
    match code {
        ReprCode::Fshort => {
            let v = int_in_range(code, value, i16::MIN.into(), i16::MAX.into())? as i16;
            buf.extend_from_slice(&v.to_be_bytes());
        }
        ReprCode::Fsingl | ReprCode::Fsing1 | ReprCode::Fsing2 | ReprCode::Csingl => {
            let v = float_value(code, value)? as f32;
            buf.extend_from_slice(&v.to_be_bytes());
        }
        ReprCode::Fdoubl | ReprCode::Fdoub1 | ReprCode::Fdoub2 | ReprCode::Cdoubl => {
            let v = float_value(code, value)?;
            buf.extend_from_slice(&v.to_be_bytes());
        }
        ReprCode::Isingl | ReprCode::Vsingl => {
            let v = int_in_range(code, value, i32::MIN.into(), i32::MAX.into())? as i32;
            buf.extend_from_slice(&v.to_be_bytes());
        }
        ReprCode::Sshort => {
            let v = int_in_range(code, value, i8::MIN.into(), i8::MAX.into())? as i8;
            buf.extend_from_slice(&v.to_be_bytes());
        }
        ReprCode::Snorm => {
            let v = int_in_range(code, value, i16::MIN.into(), i16::MAX.into())? as i16;
            buf.extend_from_slice(&v.to_be_bytes());
        }
        ReprCode::Slong => {
            let v = int_in_range(code, value, i32::MIN.into(), i32::MAX.into())? as i32;
            buf.extend_from_slice(&v.to_be_bytes());
        }
        ReprCode::Ushort => {
            let v = int_in_range(code, value, 0, u8::MAX.into())? as u8;
            buf.push(v);
        }
        ReprCode::Unorm => {
            let v = int_in_range(code, value, 0, u16::MAX.into())? as u16;
            buf.extend_from_slice(&v.to_be_bytes());
        }
        ReprCode::Ulong => {
            let v = int_in_range(code, value, 0, u32::MAX.into())? as u32;
            buf.extend_from_slice(&v.to_be_bytes());
        }
        ReprCode::Uvari => {
            let v = int_in_range(code, value, 0, uvari::MAX.into())? as u32;
            put_uvari(buf, v);
        }
        ReprCode::Ident => {
            let s = str_value(code, value)?;
            put_ident(buf, s)?;
        }
        ReprCode::Ascii => {
            let s = str_value(code, value)?;
            put_ascii(buf, s)?;
        }
        ReprCode::Units => {
            let s = str_value(code, value)?;
            put_units(buf, s)?;
        }
        ReprCode::Dtime => match value {
            Scalar::DateTime(dt) => put_dtime(buf, dt)?,
            _ => return Err(mismatch(code, value)),
        },
        ReprCode::Obname => match value {
            Scalar::Name(name) => put_obname(buf, name)?,
            _ => return Err(mismatch(code, value)),
        },
        ReprCode::Objref => match value {
            Scalar::Ref(r) => put_objref(buf, r)?,
            _ => return Err(mismatch(code, value)),
        },
        ReprCode::Status => {
            let v = match *value {
                Scalar::Bool(b) => b as u8,
                Scalar::Int(0) => 0,
                Scalar::Int(1) => 1,
                _ => {
                    return Err(Error::encoding(format!(
                        "STATUS must be 0 or 1; got {value:?}"
                    )))
                }
            };
            buf.push(v);
        }
        ReprCode::Origin | ReprCode::Attref => {
            return Err(Error::encoding(format!(
                "representation code {code:?} has no encoder"
            )));
        }
    }
    Ok(())
}

fn mismatch(code: ReprCode, value: &Scalar) -> Error {
    Error::encoding(format!(
        "cannot encode {} value under representation code {:?}",
        value.kind(),
        code,
    ))
}

fn int_in_range(code: ReprCode, value: &Scalar, min: i64, max: i64) -> Result<i64> {
    let v = value.as_int().ok_or_else(|| mismatch(code, value))?;
    if v < min || v > max {
        return Err(Error::encoding(format!(
            "value {v} out of range [{min}, {max}] for representation code {code:?}"
        )));
    }
    Ok(v)
}

fn float_value(code: ReprCode, value: &Scalar) -> Result<f64> {
    value.as_f64().ok_or_else(|| mismatch(code, value))
}

fn str_value<'a>(code: ReprCode, value: &'a Scalar) -> Result<&'a str> {
    match value {
        Scalar::Str(s) => Ok(s),
        _ => Err(mismatch(code, value)),
    }
}

/// Appends a UVARI. The value must not exceed [`uvari::MAX`].
pub fn put_uvari(buf: &mut Vec<u8>, value: u32) {
    debug_assert!(value <= uvari::MAX);
    if value <= uvari::ONE_BYTE_MAX {
        buf.push(value as u8);
    } else if value <= uvari::TWO_BYTE_MAX {
        buf.extend_from_slice(&((value + uvari::UNORM_OFFSET) as u16).to_be_bytes());
    } else {
        buf.extend_from_slice(&(value + uvari::ULONG_OFFSET).to_be_bytes());
    }
}

/// Appends an IDENT: a 1-byte length followed by at most 255 ASCII bytes.
pub fn put_ident(buf: &mut Vec<u8>, s: &str) -> Result<()> {
    if !s.is_ascii() {
        return Err(Error::encoding(format!("IDENT must be ASCII; got {s:?}")));
    }
    if s.len() > rp66::IDENT_MAX_LEN {
        return Err(Error::encoding(format!(
            "IDENT longer than {} bytes: {s:?}",
            rp66::IDENT_MAX_LEN,
        )));
    }
    buf.push(s.len() as u8);
    buf.extend_from_slice(s.as_bytes());
    Ok(())
}

/// Appends an ASCII string: a UVARI length followed by the bytes.
pub fn put_ascii(buf: &mut Vec<u8>, s: &str) -> Result<()> {
    if !s.is_ascii() {
        return Err(Error::encoding(format!("ASCII must be ASCII; got {s:?}")));
    }
    if s.len() as u64 > uvari::MAX.into() {
        return Err(Error::encoding("ASCII value too long for a UVARI length"));
    }
    put_uvari(buf, s.len() as u32);
    buf.extend_from_slice(s.as_bytes());
    Ok(())
}

/// Returns true when `s` satisfies the UNITS character-class restriction:
/// letters, digits, blank, hyphen, dot, slash, and parentheses.
pub fn valid_units(s: &str) -> bool {
    s.chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '.' | '/' | '(' | ')'))
}

/// Appends a UNITS expression, encoded like IDENT after validating the
/// character class.
pub fn put_units(buf: &mut Vec<u8>, s: &str) -> Result<()> {
    if !valid_units(s) {
        return Err(Error::encoding(format!(
            "units {s:?} contain characters outside the RP66 V1 units character set"
        )));
    }
    put_ident(buf, s)
}

/// Appends a DTIME: year since 1900, time zone and month, day, hour,
/// minute, second, milliseconds. The time zone is always local standard.
pub fn put_dtime(buf: &mut Vec<u8>, dt: &NaiveDateTime) -> Result<()> {
    let year = dt.year();
    if !(1900..=2155).contains(&year) {
        return Err(Error::encoding(format!(
            "DTIME year {year} outside the encodable range 1900..=2155"
        )));
    }
    let time_zone = 0u8;
    buf.push((year - 1900) as u8);
    buf.push((time_zone << 4) | dt.month() as u8);
    buf.push(dt.day() as u8);
    buf.push(dt.hour() as u8);
    buf.push(dt.minute() as u8);
    buf.push(dt.second() as u8);
    let millis = (dt.and_utc().timestamp_subsec_millis()).min(999) as u16;
    buf.extend_from_slice(&millis.to_be_bytes());
    Ok(())
}

/// Appends an OBNAME. The origin reference must have been resolved.
pub fn put_obname(buf: &mut Vec<u8>, name: &ObName) -> Result<()> {
    let origin = name.origin.ok_or_else(|| {
        Error::encoding(format!(
            "unresolved origin reference in OBNAME of {:?}",
            name.name,
        ))
    })?;
    if origin > uvari::MAX {
        return Err(Error::encoding(format!(
            "origin reference {origin} exceeds the UVARI maximum"
        )));
    }
    put_uvari(buf, origin);
    buf.push(name.copy);
    put_ident(buf, &name.name)
}

/// Appends an OBJREF: the set type as IDENT, then the OBNAME.
pub fn put_objref(buf: &mut Vec<u8>, r: &ObjRef) -> Result<()> {
    put_ident(buf, &r.set_type)?;
    put_obname(buf, &r.name)
}

/// Pads an ASCII string to a fixed-width field with spaces, on the right
/// when left-justified and on the left otherwise.
pub(crate) fn ascii_field(value: &str, width: usize, left_justified: bool) -> Result<String> {
    if !value.is_ascii() {
        return Err(Error::encoding(format!(
            "fixed-width field value must be ASCII; got {value:?}"
        )));
    }
    if value.len() > width {
        return Err(Error::encoding(format!(
            "value {value:?} does not fit in a {width}-character field"
        )));
    }
    Ok(if left_justified {
        format!("{value:<width$}")
    } else {
        format!("{value:>width$}")
    })
}

/// Decodes a UVARI from the front of `bytes`, returning the value and the
/// number of bytes consumed.
pub fn decode_uvari(bytes: &[u8]) -> Result<(u32, usize)> {
    let first = *bytes
        .first()
        .ok_or_else(|| Error::encoding("empty UVARI"))?;
    match first >> 6 {
        0b00 | 0b01 => Ok((first.into(), 1)),
        0b10 => {
            let raw: [u8; 2] = bytes
                .get(..2)
                .and_then(|b| b.try_into().ok())
                .ok_or_else(|| Error::encoding("truncated two-byte UVARI"))?;
            Ok(((u16::from_be_bytes(raw) as u32) - uvari::UNORM_OFFSET, 2))
        }
        _ => {
            let raw: [u8; 4] = bytes
                .get(..4)
                .and_then(|b| b.try_into().ok())
                .ok_or_else(|| Error::encoding("truncated four-byte UVARI"))?;
            Ok((u32::from_be_bytes(raw) - uvari::ULONG_OFFSET, 4))
        }
    }
}

/// Decodes a DTIME.
pub fn decode_dtime(bytes: &[u8; 8]) -> Result<NaiveDateTime> {
    let millis = u16::from_be_bytes([bytes[6], bytes[7]]);
    NaiveDate::from_ymd_opt(
        1900 + i32::from(bytes[0]),
        (bytes[1] & 0x0F).into(),
        bytes[2].into(),
    )
    .and_then(|d| {
        d.and_hms_milli_opt(
            bytes[3].into(),
            bytes[4].into(),
            bytes[5].into(),
            millis.into(),
        )
    })
    .ok_or_else(|| Error::encoding("DTIME bytes do not describe a calendar date"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(code: ReprCode, value: impl Into<Scalar>) -> Vec<u8> {
        let mut buf = Vec::new();
        encode(code, &value.into(), &mut buf).unwrap();
        buf
    }

    #[test]
    fn uvari_lengths_and_prefixes() {
        let cases: [(u32, usize, u8); 6] = [
            (0, 1, 0b00),
            (127, 1, 0b00),
            (128, 2, 0b10),
            (16383, 2, 0b10),
            (16384, 4, 0b11),
            (3_000_000_000, 4, 0b11),
        ];
        for (value, len, prefix) in cases {
            let mut buf = Vec::new();
            put_uvari(&mut buf, value);
            assert_eq!(buf.len(), len, "length of UVARI({value})");
            assert_eq!(buf[0] >> 6 & prefix_mask(len), prefix, "prefix of UVARI({value})");
            let (decoded, consumed) = decode_uvari(&buf).unwrap();
            assert_eq!((decoded, consumed), (value, len));
        }
    }

    fn prefix_mask(len: usize) -> u8 {
        // One-byte values only pin the high bit; longer forms pin both.
        if len == 1 {
            0b10
        } else {
            0b11
        }
    }

    #[test]
    fn uvari_round_trip_extremes() {
        for value in [0, 1, 127, 128, 16383, 16384, 1 << 29, uvari::MAX] {
            let mut buf = Vec::new();
            put_uvari(&mut buf, value);
            assert_eq!(decode_uvari(&buf).unwrap().0, value);
        }
    }

    #[test]
    fn dtime_example_from_the_standard() {
        // 9:20:15.62 PM, April 19, 1987.
        let dt = NaiveDate::from_ymd_opt(1987, 4, 19)
            .unwrap()
            .and_hms_milli_opt(21, 20, 15, 620)
            .unwrap();
        let bytes = encoded(ReprCode::Dtime, dt);
        assert_eq!(bytes, [0x57, 0x14, 0x13, 0x15, 0x14, 0x0F, 0x02, 0x6C]);
        assert_eq!(decode_dtime(&bytes.try_into().unwrap()).unwrap(), dt);
    }

    #[test]
    fn dtime_year_out_of_range() {
        let dt = NaiveDate::from_ymd_opt(2156, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert!(encode(ReprCode::Dtime, &dt.into(), &mut Vec::new()).is_err());
    }

    #[test]
    fn obname_bytes() {
        let name = ObName::new("A").with_origin(1);
        assert_eq!(encoded(ReprCode::Obname, name), [0x01, 0x00, 0x01, b'A']);
    }

    #[test]
    fn obname_requires_resolved_origin() {
        let name = ObName::new("A");
        assert!(encode(ReprCode::Obname, &name.into(), &mut Vec::new()).is_err());
    }

    #[test]
    fn objref_bytes() {
        let r = ObjRef {
            set_type: "CHANNEL".into(),
            name: ObName::new("C").with_origin(2),
        };
        let mut expected = vec![7];
        expected.extend_from_slice(b"CHANNEL");
        expected.extend_from_slice(&[0x02, 0x00, 0x01, b'C']);
        assert_eq!(encoded(ReprCode::Objref, r), expected);
    }

    #[test]
    fn status_accepts_only_zero_and_one() {
        assert_eq!(encoded(ReprCode::Status, true), [1]);
        assert_eq!(encoded(ReprCode::Status, 0i64), [0]);
        assert!(encode(ReprCode::Status, &Scalar::Int(2), &mut Vec::new()).is_err());
    }

    #[test]
    fn ident_limits() {
        assert_eq!(encoded(ReprCode::Ident, "TIME"), [4, b'T', b'I', b'M', b'E']);
        let long = "X".repeat(256);
        assert!(put_ident(&mut Vec::new(), &long).is_err());
        assert!(put_ident(&mut Vec::new(), "café").is_err());
    }

    #[test]
    fn ascii_uses_uvari_length() {
        let s = "y".repeat(200);
        let bytes = encoded(ReprCode::Ascii, s.as_str());
        // 200 > 127, so the length takes the two-byte form.
        assert_eq!(&bytes[..2], &(200u16 + 0x8000).to_be_bytes());
        assert_eq!(bytes.len(), 202);
    }

    #[test]
    fn units_character_class() {
        assert!(valid_units("m/s"));
        assert!(valid_units("ohm (m)"));
        assert!(!valid_units("µs"));
        assert!(!valid_units("m,s"));
        assert!(put_units(&mut Vec::new(), "m,s").is_err());
    }

    #[test]
    fn fixed_width_integers() {
        assert_eq!(encoded(ReprCode::Ushort, 255i64), [0xFF]);
        assert_eq!(encoded(ReprCode::Snorm, -2i64), [0xFF, 0xFE]);
        assert_eq!(encoded(ReprCode::Ulong, 0x01020304i64), [1, 2, 3, 4]);
        assert!(encode(ReprCode::Ushort, &Scalar::Int(256), &mut Vec::new()).is_err());
        assert!(encode(ReprCode::Snorm, &Scalar::Int(0x8000), &mut Vec::new()).is_err());
    }

    #[test]
    fn floats() {
        assert_eq!(encoded(ReprCode::Fdoubl, 1.0f64), 1.0f64.to_be_bytes());
        assert_eq!(encoded(ReprCode::Fsingl, 2.5f64), 2.5f32.to_be_bytes());
        // Integer values may be widened to floats.
        assert_eq!(encoded(ReprCode::Fdoubl, 3i64), 3.0f64.to_be_bytes());
    }

    #[test]
    fn unencodable_codes() {
        assert!(encode(ReprCode::Origin, &Scalar::Int(1), &mut Vec::new()).is_err());
        assert!(encode(ReprCode::Attref, &Scalar::Int(1), &mut Vec::new()).is_err());
    }

    #[test]
    fn inference() {
        assert_eq!(infer(&Scalar::Bool(true)), Some(ReprCode::Status));
        assert_eq!(infer(&Scalar::Int(7)), Some(ReprCode::Ushort));
        assert_eq!(infer(&Scalar::Int(-5)), Some(ReprCode::Snorm));
        assert_eq!(infer(&Scalar::Int(100_000)), Some(ReprCode::Ulong));
        assert_eq!(infer(&Scalar::Int(1 << 40)), None);
        assert_eq!(infer(&Scalar::F32(0.0)), Some(ReprCode::Fsingl));
        assert_eq!(infer(&Scalar::F64(0.0)), Some(ReprCode::Fdoubl));
        assert_eq!(infer(&Scalar::Str("x".into())), Some(ReprCode::Ascii));
        assert_eq!(
            infer(&Scalar::Name(ObName::new("A"))),
            Some(ReprCode::Obname)
        );
    }

    #[test]
    fn tags_round_trip() {
        for tag in 1..=27 {
            let code = ReprCode::from_tag(tag).unwrap();
            assert_eq!(code.tag(), tag);
        }
        assert_eq!(ReprCode::from_tag(0), None);
        assert_eq!(ReprCode::from_tag(28), None);
    }
}
