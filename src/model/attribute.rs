//! The attribute model and its two byte encodings.
//!
//! An attribute contributes to two regions of a set body: one template row
//! shared by all items of the set, and one value row per item. Both start
//! with a characteristics byte whose low five bits flag which parts follow
//! (label, count, representation code, units, value).

use chrono::NaiveDateTime;

use crate::codec::{self, ObName, ObjRef, ReprCode, Scalar};
use crate::error::{Error, Result};
use crate::model::catalog::{AttrSpec, ValueKind};
use crate::rp66::attr;

/// The value of an attribute: a scalar, a flat list, or a nested list for
/// multidimensional attributes.
#[derive(Debug, Clone, PartialEq)]
pub enum Values {
    /// A single value.
    Scalar(Scalar),
    /// A flat list of values.
    Vector(Vec<Scalar>),
    /// A nested list of values, flattened row-major on encoding.
    Matrix(Vec<Vec<Scalar>>),
}

impl Values {
    /// Builds a nested-list value.
    pub fn matrix<T: Into<Scalar>>(rows: Vec<Vec<T>>) -> Values {
        Values::Matrix(
            rows.into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        )
    }

    /// Returns the number of leaf values.
    pub fn count(&self) -> usize {
        match self {
            Values::Scalar(_) => 1,
            Values::Vector(v) => v.len(),
            Values::Matrix(rows) => rows.iter().map(Vec::len).sum(),
        }
    }

    /// Iterates over the leaf values in row-major order.
    pub fn flattened(&self) -> impl Iterator<Item = &Scalar> {
        // A small dispatch enum keeps the iterator allocation-free.
        match self {
            Values::Scalar(s) => Flat::Scalar(std::iter::once(s)),
            Values::Vector(v) => Flat::Vector(v.iter()),
            Values::Matrix(rows) => Flat::Matrix(rows.iter().flatten()),
        }
    }

    fn first(&self) -> Option<&Scalar> {
        self.flattened().next()
    }

    fn is_list(&self) -> bool {
        !matches!(self, Values::Scalar(_))
    }

    fn is_nested(&self) -> bool {
        matches!(self, Values::Matrix(_))
    }

    pub(crate) fn scalars_mut(&mut self) -> impl Iterator<Item = &mut Scalar> {
        match self {
            Values::Scalar(s) => Flat::Scalar(std::iter::once(s)),
            Values::Vector(v) => Flat::Vector(v.iter_mut()),
            Values::Matrix(rows) => Flat::Matrix(rows.iter_mut().flatten()),
        }
    }
}

enum Flat<S, V, M> {
    Scalar(S),
    Vector(V),
    Matrix(M),
}

impl<T, S, V, M> Iterator for Flat<S, V, M>
where
    S: Iterator<Item = T>,
    V: Iterator<Item = T>,
    M: Iterator<Item = T>,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        match self {
            Flat::Scalar(it) => it.next(),
            Flat::Vector(it) => it.next(),
            Flat::Matrix(it) => it.next(),
        }
    }
}

impl From<Scalar> for Values {
    fn from(v: Scalar) -> Values {
        Values::Scalar(v)
    }
}

impl<T: Into<Scalar>> From<Vec<T>> for Values {
    fn from(v: Vec<T>) -> Values {
        Values::Vector(v.into_iter().map(Into::into).collect())
    }
}

macro_rules! scalar_values_from {
    ($($ty:ty),* $(,)?) => {
        $(impl From<$ty> for Values {
            fn from(v: $ty) -> Values {
                Values::Scalar(v.into())
            }
        })*
    };
}

scalar_values_from!(bool, i32, i64, u32, f32, f64, &str, String, NaiveDateTime, ObName, ObjRef);

/// A typed RP66 V1 attribute.
///
/// Labels are normalized the way the file expects them: uppercased, with
/// underscores replaced by dashes.
#[derive(Debug, Clone)]
pub struct Attribute {
    label: String,
    code: Option<ReprCode>,
    units: Option<String>,
    value: Option<Values>,
    multivalued: bool,
    multidimensional: bool,
}

/// Normalizes an attribute label: leading and trailing underscores are
/// stripped, the rest is uppercased with underscores turned into dashes.
pub fn normalize_label(label: &str) -> String {
    label
        .trim_matches('_')
        .to_ascii_uppercase()
        .replace('_', "-")
}

impl Attribute {
    /// Creates an attribute with the given label and no value.
    pub fn new(label: &str) -> Attribute {
        Attribute {
            label: normalize_label(label),
            code: None,
            units: None,
            value: None,
            multivalued: false,
            multidimensional: false,
        }
    }

    pub(crate) fn from_spec(spec: &AttrSpec) -> Attribute {
        Attribute {
            label: spec.label.into(),
            code: spec.code,
            units: None,
            value: None,
            multivalued: spec.multivalued,
            multidimensional: spec.multidimensional,
        }
    }

    /// Returns the normalized label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the explicitly assigned representation code, if any.
    pub fn code(&self) -> Option<ReprCode> {
        self.code
    }

    /// Assigns a representation code.
    pub fn set_code(&mut self, code: ReprCode) {
        self.code = Some(code);
    }

    /// Returns the units expression, if any.
    pub fn units(&self) -> Option<&str> {
        self.units.as_deref()
    }

    /// Assigns a units expression, validating the character class.
    pub fn set_units(&mut self, units: &str) -> Result<()> {
        if !codec::valid_units(units) {
            return Err(Error::validation(format!(
                "units {units:?} of attribute {} contain characters outside \
                 the RP66 V1 units character set",
                self.label,
            )));
        }
        self.units = Some(units.into());
        Ok(())
    }

    /// Returns the value, if set.
    pub fn value(&self) -> Option<&Values> {
        self.value.as_ref()
    }

    /// Assigns a value.
    pub fn set_value(&mut self, value: impl Into<Values>) {
        let value = value.into();
        if value.is_list() {
            self.multivalued = true;
        }
        if value.is_nested() {
            self.multidimensional = true;
        }
        self.value = Some(value);
    }

    pub(crate) fn value_mut(&mut self) -> Option<&mut Values> {
        self.value.as_mut()
    }

    /// Returns the number of values, or `None` when no value is set.
    pub fn count(&self) -> Option<usize> {
        self.value.as_ref().map(Values::count)
    }

    /// Returns the representation code the value bytes will use: the
    /// explicit code if one was assigned, otherwise the code inferred from
    /// the first value.
    pub fn resolved_code(&self) -> Option<ReprCode> {
        self.code.or_else(|| {
            self.value
                .as_ref()
                .and_then(Values::first)
                .and_then(codec::infer)
        })
    }

    /// Appends this attribute's template row: the characteristics byte and
    /// the label.
    pub fn template_bytes(&self, buf: &mut Vec<u8>) -> Result<()> {
        if self.label.is_empty() {
            buf.push(attr::ROLE);
            return Ok(());
        }
        buf.push(attr::ROLE | attr::LABEL);
        codec::put_ident(buf, &self.label)
    }

    /// Appends this attribute's value row for one item: the characteristics
    /// byte followed by the present parts in count, representation code,
    /// units, value order.
    ///
    /// A single-value attribute omits the count; the reader defaults it
    /// to 1.
    pub fn body_bytes(&self, buf: &mut Vec<u8>) -> Result<()> {
        let mut descriptor = attr::ROLE;
        let mut parts = Vec::new();

        if let Some(count) = self.count() {
            if count != 1 {
                descriptor |= attr::COUNT;
                codec::put_uvari(&mut parts, count as u32);
            }
        }

        let code = self.resolved_code();
        if let Some(code) = code {
            descriptor |= attr::REPRESENTATION_CODE;
            parts.push(code.tag());
        }

        if let Some(units) = &self.units {
            descriptor |= attr::UNITS;
            codec::put_units(&mut parts, units)?;
        }

        if let Some(value) = &self.value {
            descriptor |= attr::VALUE;
            let code = code.ok_or_else(|| {
                Error::encoding(format!(
                    "cannot determine a representation code for attribute {} \
                     from value {value:?}",
                    self.label,
                ))
            })?;
            for scalar in value.flattened() {
                codec::encode(code, scalar, &mut parts)?;
            }
        }

        buf.push(descriptor);
        buf.extend_from_slice(&parts);
        Ok(())
    }

    /// Fills in the catalog's default representation code when none was
    /// assigned explicitly.
    pub(crate) fn apply_defaults(&mut self, spec: &AttrSpec) {
        if self.code.is_none() {
            self.code = spec.code;
        }
    }

    /// Validates this attribute against its catalog entry.
    pub(crate) fn validate(&self, spec: &AttrSpec) -> Result<()> {
        let value = match &self.value {
            Some(value) => value,
            None => return Ok(()),
        };

        if value.is_list() && !spec.multivalued {
            return Err(Error::validation(format!(
                "attribute {} takes a single value, not a list",
                self.label,
            )));
        }
        if value.is_nested() && !spec.multidimensional {
            return Err(Error::validation(format!(
                "attribute {} cannot take nested values",
                self.label,
            )));
        }
        if value.count() == 0 {
            return Err(Error::validation(format!(
                "attribute {} has an empty value list",
                self.label,
            )));
        }

        for scalar in value.flattened() {
            check_kind(&self.label, spec.kind, scalar)?;
        }

        if let Some(code) = self.code {
            for scalar in value.flattened() {
                if !code_accepts(code, scalar) {
                    return Err(Error::validation(format!(
                        "representation code {code:?} of attribute {} is \
                         incompatible with value {scalar:?}",
                        self.label,
                    )));
                }
            }
        }
        Ok(())
    }
}

fn check_kind(label: &str, kind: ValueKind, scalar: &Scalar) -> Result<()> {
    let ok = match kind {
        ValueKind::Numeric => matches!(scalar, Scalar::Int(_) | Scalar::F32(_) | Scalar::F64(_)),
        ValueKind::Integer => matches!(scalar, Scalar::Int(_)),
        ValueKind::Text => matches!(scalar, Scalar::Str(_)),
        ValueKind::UnitsText => match scalar {
            Scalar::Str(s) => codec::valid_units(s),
            _ => false,
        },
        ValueKind::Reference => matches!(scalar, Scalar::Name(_)),
        ValueKind::ObjReference => matches!(scalar, Scalar::Ref(_)),
        ValueKind::ReferenceOrText => matches!(scalar, Scalar::Name(_) | Scalar::Str(_)),
        ValueKind::DateTime => matches!(scalar, Scalar::DateTime(_)),
        ValueKind::DateTimeOrNumeric => matches!(
            scalar,
            Scalar::DateTime(_) | Scalar::Int(_) | Scalar::F32(_) | Scalar::F64(_)
        ),
        ValueKind::Status => matches!(scalar, Scalar::Bool(_) | Scalar::Int(0) | Scalar::Int(1)),
        ValueKind::Any => true,
    };
    if ok {
        Ok(())
    } else {
        Err(Error::validation(format!(
            "attribute {label} does not accept {scalar:?}"
        )))
    }
}

fn code_accepts(code: ReprCode, scalar: &Scalar) -> bool {
    match scalar {
        Scalar::Bool(_) => code == ReprCode::Status || code.is_integer(),
        Scalar::Int(_) => code.is_numeric() || code == ReprCode::Status,
        Scalar::F32(_) | Scalar::F64(_) => code.is_float(),
        Scalar::Str(_) => matches!(code, ReprCode::Ascii | ReprCode::Ident | ReprCode::Units),
        Scalar::DateTime(_) => code == ReprCode::Dtime,
        Scalar::Name(_) => code == ReprCode::Obname,
        Scalar::Ref(_) => code == ReprCode::Objref,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_normalization() {
        assert_eq!(normalize_label("index_type"), "INDEX-TYPE");
        assert_eq!(normalize_label("_type"), "TYPE");
        assert_eq!(normalize_label("CHANNELS"), "CHANNELS");
    }

    #[test]
    fn template_row_with_label() {
        let attr = Attribute::new("index_type");
        let mut buf = Vec::new();
        attr.template_bytes(&mut buf).unwrap();
        let mut expected = vec![0x30, 10];
        expected.extend_from_slice(b"INDEX-TYPE");
        assert_eq!(buf, expected);
    }

    #[test]
    fn body_row_scalar_with_inferred_code() {
        let mut attr = Attribute::new("SPACING");
        attr.set_value(0.5f64);
        let mut buf = Vec::new();
        attr.body_bytes(&mut buf).unwrap();
        // Representation code and value present; count omitted for a
        // single value.
        let mut expected = vec![0x25, ReprCode::Fdoubl.tag()];
        expected.extend_from_slice(&0.5f64.to_be_bytes());
        assert_eq!(buf, expected);
    }

    #[test]
    fn body_row_list_with_count_and_units() {
        let mut attr = Attribute::new("DIMENSION");
        attr.set_code(ReprCode::Uvari);
        attr.set_units("m").unwrap();
        attr.set_value(vec![10i64, 20i64]);
        let mut buf = Vec::new();
        attr.body_bytes(&mut buf).unwrap();
        assert_eq!(
            buf,
            [0x2F, 2, ReprCode::Uvari.tag(), 1, b'm', 10, 20],
        );
    }

    #[test]
    fn body_row_single_element_list_omits_count() {
        let mut attr = Attribute::new("DIMENSION");
        attr.set_code(ReprCode::Uvari);
        attr.set_value(vec![1i64]);
        let mut buf = Vec::new();
        attr.body_bytes(&mut buf).unwrap();
        assert_eq!(buf, [0x25, ReprCode::Uvari.tag(), 1]);
    }

    #[test]
    fn matrix_values_flatten_row_major() {
        let mut attr = Attribute::new("VALUES");
        attr.set_code(ReprCode::Ushort);
        attr.set_value(Values::matrix(vec![vec![1i64, 2], vec![3, 4]]));
        let mut buf = Vec::new();
        attr.body_bytes(&mut buf).unwrap();
        assert_eq!(buf, [0x2D, 4, ReprCode::Ushort.tag(), 1, 2, 3, 4]);
    }

    #[test]
    fn value_without_code_fails_to_encode() {
        let mut attr = Attribute::new("VALUES");
        attr.set_value(9_999_999_999_999i64);
        assert!(attr.body_bytes(&mut Vec::new()).is_err());
    }

    #[test]
    fn validation_against_catalog() {
        use crate::model::SetKind;

        let spec = SetKind::Channel.attribute("DIMENSION").unwrap();
        let mut attr = Attribute::from_spec(spec);
        attr.set_value(vec![1i64, 2i64]);
        attr.validate(spec).unwrap();

        let mut attr = Attribute::from_spec(spec);
        attr.set_value("not a number");
        assert!(attr.validate(spec).is_err());

        let spec = SetKind::Frame.attribute("DESCRIPTION").unwrap();
        let mut attr = Attribute::from_spec(spec);
        attr.set_value(vec!["a", "b"]);
        assert!(attr.validate(spec).is_err(), "list on a scalar attribute");
    }

    #[test]
    fn invalid_units_rejected() {
        let mut attr = Attribute::new("UNITS");
        assert!(attr.set_units("m,s").is_err());
        assert!(attr.set_units("m/s").is_ok());
    }
}
