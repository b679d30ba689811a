//! The EFLR set (table) model.

use indexmap::IndexMap;

use crate::codec;
use crate::error::{Error, Result};
use crate::model::catalog::SetKind;
use crate::model::item::Item;
use crate::rp66::component;

/// The key of an item within a set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemKey {
    /// Origin reference, `None` while unresolved.
    pub origin: Option<u32>,
    /// Copy number.
    pub copy: u8,
    /// Item name.
    pub name: String,
}

/// One EFLR set: a table of same-kind items emitted as a single logical
/// record.
///
/// Items keep their insertion order. Multiple sets of the same kind may
/// coexist in a logical file when their set names differ.
#[derive(Debug, Clone)]
pub struct Set {
    kind: SetKind,
    name: Option<String>,
    items: IndexMap<ItemKey, Item>,
}

impl Set {
    /// Creates an empty set of the given kind, optionally named.
    pub fn new(kind: SetKind, name: Option<&str>) -> Set {
        Set {
            kind,
            name: name.map(Into::into),
            items: IndexMap::new(),
        }
    }

    /// Returns the kind of this set.
    pub fn kind(&self) -> SetKind {
        self.kind
    }

    /// Returns the set name, if any.
    pub fn set_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true when the set holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Validates an item against this set's catalog and appends it.
    ///
    /// Fails when the item's `(origin, copy, name)` key collides with an
    /// existing item, when it carries an attribute the kind does not
    /// define, or when an attribute value fails validation.
    pub fn add_item(&mut self, mut item: Item) -> Result<()> {
        let catalog = self.kind.attributes();
        item.validate(catalog, self.kind.set_type())?;
        item.apply_catalog_defaults(catalog);

        let key = ItemKey {
            origin: item.origin_reference(),
            copy: item.copy_number(),
            name: item.name().into(),
        };
        if self.items.contains_key(&key) {
            return Err(Error::validation(format!(
                "duplicate {} item {:?} (origin {:?}, copy {})",
                self.kind.set_type(),
                key.name,
                key.origin,
                key.copy,
            )));
        }
        self.items.insert(key, item);
        Ok(())
    }

    /// Returns the first item with the given name.
    pub fn item(&self, name: &str) -> Option<&Item> {
        self.items.values().find(|item| item.name() == name)
    }

    /// Iterates over the items in insertion order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub(crate) fn items_mut(&mut self) -> impl Iterator<Item = &mut Item> {
        self.items.values_mut()
    }

    /// Fills in unresolved origin references on all items.
    pub(crate) fn resolve_origin(&mut self, default: u32) {
        for item in self.items.values_mut() {
            item.resolve_origin(default);
        }
    }

    /// Returns the logical record type code of this set.
    pub(crate) fn record_type(&self) -> u8 {
        self.kind.record_type()
    }

    /// Builds the logical record body: the set component, the attribute
    /// template, and the concatenated item bodies.
    pub(crate) fn body_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();

        match &self.name {
            Some(name) => {
                buf.push(component::SET_WITH_NAME);
                codec::put_ident(&mut buf, self.kind.set_type())?;
                codec::put_ident(&mut buf, name)?;
            }
            None => {
                buf.push(component::SET);
                codec::put_ident(&mut buf, self.kind.set_type())?;
            }
        }

        let catalog = self.kind.attributes();
        for spec in catalog {
            buf.push(crate::rp66::attr::ROLE | crate::rp66::attr::LABEL);
            codec::put_ident(&mut buf, spec.label)?;
        }

        for item in self.items.values() {
            item.body_bytes(catalog, &mut buf)?;
        }
        Ok(buf)
    }
}
