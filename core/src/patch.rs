//! Tri-state field wrapper for partial updates.
//!
//! # Design
//! A plain `Option<T>` cannot tell "the caller left this field out" apart
//! from "the caller sent `null`". Update requests need both: an absent
//! field is left untouched, an explicit `null` clears a nullable column.
//! `Patch<T>` keeps the three states distinct on the wire and in memory.
//!
//! Fields of this type must be annotated with `#[serde(default)]` so that a
//! missing key deserializes to `Patch::Absent`, and with
//! `#[serde(skip_serializing_if = "Patch::is_absent")]` so that the key is
//! omitted again when serializing.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A field in a partial update: absent, explicitly null, or a value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    /// The field was not supplied. Leave the stored value alone.
    #[default]
    Absent,
    /// The field was supplied as `null`.
    Null,
    /// The field was supplied with a value.
    Value(T),
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    /// Collapse to the value that should be stored, or `None` when the field
    /// was not supplied.
    ///
    /// `Some(None)` means "store NULL", `Some(Some(v))` means "store `v`".
    pub fn into_option(self) -> Option<Option<T>> {
        match self {
            Patch::Absent => None,
            Patch::Null => Some(None),
            Patch::Value(v) => Some(Some(v)),
        }
    }

    pub fn as_ref(&self) -> Patch<&T> {
        match self {
            Patch::Absent => Patch::Absent,
            Patch::Null => Patch::Null,
            Patch::Value(v) => Patch::Value(v),
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    /// `None` becomes an explicit null, not an absent field.
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        }
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Only reached when the key is present; `#[serde(default)]` covers
        // the missing-key case.
        Ok(Option::<T>::deserialize(deserializer)?.into())
    }
}

impl<T> Serialize for Patch<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Patch::Value(v) => serializer.serialize_some(v),
            Patch::Absent | Patch::Null => serializer.serialize_none(),
        }
    }
}
