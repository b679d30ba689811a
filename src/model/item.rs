//! The EFLR item (row) model.

use indexmap::IndexMap;

use crate::codec::{self, ObName, Scalar};
use crate::error::{Error, Result};
use crate::model::attribute::{normalize_label, Attribute, Values};
use crate::model::catalog::AttrSpec;
use crate::rp66::component;

/// One row of an EFLR set.
///
/// An item is keyed by `(origin_reference, copy_number, name)` within its
/// set. The origin reference is usually left unset and inherited from the
/// defining origin when the file is written. Attributes are kept in
/// insertion order; emission order is fixed by the set kind's catalog.
#[derive(Debug, Clone)]
pub struct Item {
    name: String,
    origin_reference: Option<u32>,
    copy_number: u8,
    attributes: IndexMap<String, Attribute>,
}

impl Item {
    /// Creates an item with the given name, no origin reference, and copy
    /// number 0.
    pub fn new(name: impl Into<String>) -> Item {
        Item {
            name: name.into(),
            origin_reference: None,
            copy_number: 0,
            attributes: IndexMap::new(),
        }
    }

    /// Sets an explicit origin reference.
    pub fn with_origin(mut self, origin: u32) -> Item {
        self.origin_reference = Some(origin);
        self
    }

    /// Sets the copy number.
    pub fn with_copy(mut self, copy: u8) -> Item {
        self.copy_number = copy;
        self
    }

    /// Returns the item name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the origin reference, if resolved.
    pub fn origin_reference(&self) -> Option<u32> {
        self.origin_reference
    }

    /// Returns the copy number.
    pub fn copy_number(&self) -> u8 {
        self.copy_number
    }

    /// Returns an on-wire reference to this item.
    pub fn reference(&self) -> ObName {
        ObName {
            origin: self.origin_reference,
            copy: self.copy_number,
            name: self.name.clone(),
        }
    }

    /// Sets the value of the named attribute, creating the attribute if
    /// needed. The label is normalized.
    pub fn set(&mut self, label: &str, value: impl Into<Values>) -> &mut Attribute {
        let attr = self.attribute_entry(label);
        attr.set_value(value);
        attr
    }

    /// Sets the units of the named attribute.
    pub fn set_units(&mut self, label: &str, units: &str) -> Result<()> {
        self.attribute_entry(label).set_units(units)
    }

    /// Sets the representation code of the named attribute.
    pub fn set_code(&mut self, label: &str, code: codec::ReprCode) {
        self.attribute_entry(label).set_code(code);
    }

    fn attribute_entry(&mut self, label: &str) -> &mut Attribute {
        let label = normalize_label(label);
        self.attributes
            .entry(label.clone())
            .or_insert_with(|| Attribute::new(&label))
    }

    /// Returns the named attribute, if set. The label is normalized before
    /// the lookup.
    pub fn attribute(&self, label: &str) -> Option<&Attribute> {
        self.attributes.get(&normalize_label(label))
    }

    /// Iterates over the attributes in insertion order.
    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.values()
    }

    /// Validates the item's attributes against a kind catalog: every label
    /// must be known and every value must satisfy its entry.
    pub(crate) fn validate(&self, catalog: &[AttrSpec], set_type: &str) -> Result<()> {
        if self.name.len() > crate::rp66::IDENT_MAX_LEN || !self.name.is_ascii() {
            return Err(Error::validation(format!(
                "item name {:?} is not a valid IDENT",
                self.name,
            )));
        }
        for (label, attr) in &self.attributes {
            let spec = catalog
                .iter()
                .find(|spec| spec.label == label)
                .ok_or_else(|| {
                    Error::validation(format!(
                        "{set_type} items have no attribute {label:?}"
                    ))
                })?;
            attr.validate(spec)?;
        }
        Ok(())
    }

    /// Fills in the catalog's default representation codes on attributes
    /// without an explicit one.
    pub(crate) fn apply_catalog_defaults(&mut self, catalog: &[AttrSpec]) {
        for (label, attr) in self.attributes.iter_mut() {
            if let Some(spec) = catalog.iter().find(|spec| spec.label == label) {
                attr.apply_defaults(spec);
            }
        }
    }

    /// Fills in unresolved origin references — the item's own and those of
    /// any object-name values — with the default.
    pub(crate) fn resolve_origin(&mut self, default: u32) {
        self.origin_reference.get_or_insert(default);
        for attr in self.attributes.values_mut() {
            if let Some(values) = attr.value_mut() {
                for scalar in values.scalars_mut() {
                    match scalar {
                        Scalar::Name(name) => {
                            name.origin.get_or_insert(default);
                        }
                        Scalar::Ref(r) => {
                            r.name.origin.get_or_insert(default);
                        }
                        _ => {}
                    }
                }
            }
        }
    }

    /// Appends the item's body: the object component, the OBNAME, and one
    /// value row per catalog position (a null byte for absent values).
    pub(crate) fn body_bytes(&self, catalog: &[AttrSpec], buf: &mut Vec<u8>) -> Result<()> {
        buf.push(component::OBJECT);
        codec::put_obname(buf, &self.reference())?;
        for spec in catalog {
            match self.attributes.get(spec.label) {
                Some(attr) if attr.value().is_some() => attr.body_bytes(buf)?,
                _ => buf.push(component::ABSENT_ATTRIBUTE),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SetKind;

    #[test]
    fn set_normalizes_labels() {
        let mut item = Item::new("Z1");
        item.set("index_type", "TIME");
        assert!(item.attribute("INDEX-TYPE").is_some());
        assert!(item.attribute("index_type").is_some());
    }

    #[test]
    fn unknown_attribute_fails_validation() {
        let mut item = Item::new("Z1");
        item.set("NOT-A-ZONE-THING", 1i64);
        let err = item.validate(SetKind::Zone.attributes(), "ZONE");
        assert!(err.is_err());
    }

    #[test]
    fn body_emits_null_for_absent_attributes() {
        let mut item = Item::new("Z").with_origin(1);
        item.set("DOMAIN", "TIME");
        item.apply_catalog_defaults(SetKind::Zone.attributes());
        let mut buf = Vec::new();
        item.body_bytes(SetKind::Zone.attributes(), &mut buf).unwrap();
        // Object component, OBNAME, then four attribute positions:
        // DESCRIPTION absent, DOMAIN present, MAXIMUM/MINIMUM absent.
        let mut expected = vec![0x70, 0x01, 0x00, 0x01, b'Z'];
        expected.push(0x00);
        expected.extend_from_slice(&[0x25, 19, 4]);
        expected.extend_from_slice(b"TIME");
        expected.extend_from_slice(&[0x00, 0x00]);
        assert_eq!(buf, expected);
    }

    #[test]
    fn origin_resolution_reaches_reference_values() {
        let mut item = Item::new("F");
        item.set("CHANNELS", vec![ObName::new("C")]);
        item.resolve_origin(42);
        assert_eq!(item.origin_reference(), Some(42));
        match item.attribute("CHANNELS").unwrap().value().unwrap() {
            Values::Vector(v) => match &v[0] {
                Scalar::Name(name) => assert_eq!(name.origin, Some(42)),
                other => panic!("unexpected scalar {other:?}"),
            },
            other => panic!("unexpected values {other:?}"),
        }
    }
}
