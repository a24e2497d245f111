//! Binding plans: how each capture label of a record type is converted and stored.

use crate::record::{Record, Slot};
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionStrategy {
    /// The field decodes itself from the matched text.
    TextDecodable,
    /// Matched bytes copied into a fresh `Vec<u8>`.
    RawBytes,
    StringCopy,
    /// Base-10 signed integer of the given bit width.
    SignedInteger(u32),
    /// Base-10 unsigned integer of the given bit width.
    UnsignedInteger(u32),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("field '{field}' has unsupported type {type_name}")]
    UnsupportedFieldType {
        field: &'static str,
        type_name: &'static str,
    },
    #[error("capture label '{label}' is claimed by both '{first}' and '{second}'")]
    DuplicateLabel {
        label: &'static str,
        first: &'static str,
        second: &'static str,
    },
}

/// How one field is filled.
pub struct FieldPlan<R> {
    pub field: &'static str,
    pub type_name: &'static str,
    pub slot: Slot<R>,
    pub strategy: ConversionStrategy,
}

impl<R> fmt::Debug for FieldPlan<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldPlan")
            .field("field", &self.field)
            .field("type_name", &self.type_name)
            .field("strategy", &self.strategy)
            .finish()
    }
}

/// The capture labels of a record type, each mapped to a field and a conversion.
///
/// Built once per type and shared read-only afterwards.
pub struct BindingPlan<R> {
    record: &'static str,
    by_label: HashMap<&'static str, FieldPlan<R>>,
}

impl<R> fmt::Debug for BindingPlan<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingPlan")
            .field("record", &self.record)
            .field("fields", &self.by_label)
            .finish()
    }
}

impl<R: Record> BindingPlan<R> {
    pub fn build() -> Result<Self, PlanError> {
        let record = std::any::type_name::<R>();
        let mut by_label: HashMap<&'static str, FieldPlan<R>> = HashMap::new();

        for field in R::fields() {
            if !field.visible {
                continue;
            }

            let strategy = match field.slot {
                Slot::Decode(_) => ConversionStrategy::TextDecodable,
                Slot::Value(_) => {
                    classify(field.type_id).ok_or(PlanError::UnsupportedFieldType {
                        field: field.name,
                        type_name: field.type_name,
                    })?
                }
            };

            if let Some(existing) = by_label.get(field.label) {
                return Err(PlanError::DuplicateLabel {
                    label: field.label,
                    first: existing.field,
                    second: field.name,
                });
            }

            by_label.insert(
                field.label,
                FieldPlan {
                    field: field.name,
                    type_name: field.type_name,
                    slot: field.slot,
                    strategy,
                },
            );
        }

        tracing::debug!(record, fields = by_label.len(), "built binding plan");

        Ok(Self { record, by_label })
    }
}

impl<R> BindingPlan<R> {
    pub fn get(&self, label: &str) -> Option<&FieldPlan<R>> {
        self.by_label.get(label)
    }

    pub fn record(&self) -> &'static str {
        self.record
    }

    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.by_label.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.by_label.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_label.is_empty()
    }
}

fn classify(type_id: TypeId) -> Option<ConversionStrategy> {
    use ConversionStrategy::*;

    let table = [
        (TypeId::of::<Vec<u8>>(), RawBytes),
        (TypeId::of::<String>(), StringCopy),
        (TypeId::of::<i8>(), SignedInteger(8)),
        (TypeId::of::<i16>(), SignedInteger(16)),
        (TypeId::of::<i32>(), SignedInteger(32)),
        (TypeId::of::<i64>(), SignedInteger(64)),
        (TypeId::of::<isize>(), SignedInteger(isize::BITS)),
        (TypeId::of::<u8>(), UnsignedInteger(8)),
        (TypeId::of::<u16>(), UnsignedInteger(16)),
        (TypeId::of::<u32>(), UnsignedInteger(32)),
        (TypeId::of::<u64>(), UnsignedInteger(64)),
        (TypeId::of::<usize>(), UnsignedInteger(usize::BITS)),
    ];

    table
        .into_iter()
        .find(|(id, _)| *id == type_id)
        .map(|(_, strategy)| strategy)
}
