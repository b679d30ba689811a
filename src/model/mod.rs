//! The logical model: attributes, items, sets, and the attribute catalog.
//!
//! An EFLR *set* is a table of same-kind *items*; each item is a row of
//! typed *attributes*. The [`catalog`] fixes, per set kind, the attribute
//! labels, their order, their default representation codes, and the value
//! classes they accept. Items reference one another by
//! [`ObName`](crate::codec::ObName); references may leave their origin
//! unresolved until the file is written.

mod attribute;
mod catalog;
mod file_header;
mod item;
mod set;

pub use self::attribute::{normalize_label, Attribute, Values};
pub use self::catalog::{AttrSpec, SetKind, ValueKind, FRAME_INDEX_TYPES};
pub use self::file_header::FileHeader;
pub use self::item::Item;
pub use self::set::{ItemKey, Set};

pub use crate::codec::{ObName, ObjRef};
