//! Record descriptors: what a bindable struct exposes to the plan builder.

use std::any::{Any, TypeId};
use std::str::FromStr;

/// Error reported by a [`DecodeText`] implementation.
pub type DecodeError = Box<dyn std::error::Error + Send + Sync>;

/// Writes one field of a concrete record instance.
pub enum Slot<R> {
    /// Hands out the field itself; the plan decides how to fill it.
    Value(fn(&mut R) -> &mut dyn Any),
    /// The field decodes itself from the matched text.
    Decode(fn(&mut R, &[u8]) -> Result<(), DecodeError>),
}

impl<R> Clone for Slot<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for Slot<R> {}

impl<R> std::fmt::Debug for Slot<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Slot::Value(_) => f.write_str("Slot::Value"),
            Slot::Decode(_) => f.write_str("Slot::Decode"),
        }
    }
}

/// One field of a record type, in declaration order.
#[derive(Debug)]
pub struct FieldDescriptor<R> {
    /// Rust field name.
    pub name: &'static str,
    /// Capture label that binds to this field.
    pub label: &'static str,
    /// Invisible fields never enter a binding plan.
    pub visible: bool,
    pub type_name: &'static str,
    pub type_id: TypeId,
    pub slot: Slot<R>,
}

impl<R> FieldDescriptor<R> {
    /// Describes a field filled by the built-in conversions.
    pub fn value<T: Any>(name: &'static str, slot: fn(&mut R) -> &mut dyn Any) -> Self {
        Self {
            name,
            label: name,
            visible: true,
            type_name: std::any::type_name::<T>(),
            type_id: TypeId::of::<T>(),
            slot: Slot::Value(slot),
        }
    }

    /// Describes a field that decodes itself from text.
    pub fn decode<T: Any>(
        name: &'static str,
        slot: fn(&mut R, &[u8]) -> Result<(), DecodeError>,
    ) -> Self {
        Self {
            name,
            label: name,
            visible: true,
            type_name: std::any::type_name::<T>(),
            type_id: TypeId::of::<T>(),
            slot: Slot::Decode(slot),
        }
    }

    pub fn label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

/// A struct whose fields can be bound from named captures.
///
/// Usually implemented with `#[derive(Record)]`.
pub trait Record: 'static {
    fn fields() -> Vec<FieldDescriptor<Self>>
    where
        Self: Sized;
}

/// Decodes matched text into an existing value.
pub trait DecodeText {
    fn decode_text(&mut self, text: &[u8]) -> Result<(), DecodeError>;
}

/// Replaces `*value` with `T` parsed from `text`.
///
/// Used by `#[capbind(from_str)]` fields.
pub fn decode_from_str<T>(value: &mut T, text: &[u8]) -> Result<(), DecodeError>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let text = std::str::from_utf8(text)?;
    *value = text.parse()?;
    Ok(())
}
