//! Applying binding plans to pattern matches.

use crate::cache::PlanCache;
use crate::matcher::Matcher;
use crate::plan::{BindingPlan, ConversionStrategy, FieldPlan, PlanError};
use crate::ranges::{signed_bounds, unsigned_max};
use crate::record::{DecodeError, Record, Slot};
use std::any::Any;
use std::fmt;
use std::num::IntErrorKind;
use std::sync::{Arc, OnceLock};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegerKind {
    Signed,
    Unsigned,
}

impl fmt::Display for IntegerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegerKind::Signed => f.write_str("signed integer"),
            IntegerKind::Unsigned => f.write_str("unsigned integer"),
        }
    }
}

#[derive(Error, Debug)]
pub enum BindError {
    #[error("pattern did not match input")]
    NoMatch,
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error("no target field for capture group '{label}'")]
    UnmappedCapture { label: String },
    #[error("field '{field}' does not hold a {type_name}")]
    InvalidTarget {
        field: &'static str,
        type_name: &'static str,
    },
    #[error("capture '{label}' could not be decoded: {source}")]
    ConversionFailed {
        label: String,
        #[source]
        source: DecodeError,
    },
    #[error("capture '{label}' is not valid UTF-8")]
    InvalidText {
        label: String,
        #[source]
        source: std::str::Utf8Error,
    },
    #[error("cannot parse {text:?} as {kind} for capture '{label}'")]
    InvalidInteger {
        label: String,
        text: String,
        kind: IntegerKind,
    },
    #[error("cannot represent {value} as a {width}-bit {kind} for capture '{label}'")]
    OutOfRange {
        label: String,
        value: String,
        width: u32,
        kind: IntegerKind,
    },
}

/// Binds named captures into records, caching one plan per record type.
#[derive(Debug, Default)]
pub struct Binder {
    cache: PlanCache,
}

impl Binder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cache(&self) -> &PlanCache {
        &self.cache
    }

    /// The binding plan for `R`, built on first use.
    pub fn plan<R: Record>(&self) -> Result<Arc<BindingPlan<R>>, PlanError> {
        self.cache.get_or_build::<R>()
    }

    /// Matches `pattern` against `input` and stores each named capture in the
    /// field of `target` with the same label.
    ///
    /// On error, fields written before the failing capture keep their new
    /// values. A pattern that does not match leaves `target` untouched.
    pub fn parse<R, M>(
        &self,
        input: &[u8],
        target: &mut R,
        pattern: &M,
    ) -> Result<(), BindError>
    where
        R: Record,
        M: Matcher + ?Sized,
    {
        let Some(captures) = pattern.captures(input) else {
            return Err(BindError::NoMatch);
        };
        let plan = self.plan::<R>()?;
        let names = pattern.capture_names();

        for (label, text) in names.iter().zip(captures).skip(1) {
            if label.is_empty() {
                continue;
            }
            let Some(field) = plan.get(label) else {
                return Err(BindError::UnmappedCapture {
                    label: label.to_string(),
                });
            };
            // An optional group that took no part in the match binds as empty text.
            apply(field, label, text.unwrap_or_default(), target)?;
            tracing::trace!(label, field = field.field, "bound capture");
        }

        Ok(())
    }

    /// Like [`Binder::parse`], but panics instead of returning an error.
    #[track_caller]
    pub fn must_parse<R, M>(&self, input: &[u8], target: &mut R, pattern: &M)
    where
        R: Record,
        M: Matcher + ?Sized,
    {
        if let Err(e) = self.parse(input, target, pattern) {
            panic!("capbind: {e}");
        }
    }
}

static GLOBAL: OnceLock<Binder> = OnceLock::new();

/// The process-wide binder used by [`parse`] and [`must_parse`].
pub fn global() -> &'static Binder {
    GLOBAL.get_or_init(Binder::new)
}

/// [`Binder::parse`] on the process-wide binder.
pub fn parse<R, M>(input: &[u8], target: &mut R, pattern: &M) -> Result<(), BindError>
where
    R: Record,
    M: Matcher + ?Sized,
{
    global().parse(input, target, pattern)
}

/// [`Binder::must_parse`] on the process-wide binder.
#[track_caller]
pub fn must_parse<R, M>(input: &[u8], target: &mut R, pattern: &M)
where
    R: Record,
    M: Matcher + ?Sized,
{
    global().must_parse(input, target, pattern)
}

fn apply<R>(
    field: &FieldPlan<R>,
    label: &str,
    text: &[u8],
    target: &mut R,
) -> Result<(), BindError> {
    let invalid_target = || BindError::InvalidTarget {
        field: field.field,
        type_name: field.type_name,
    };

    let slot = match (field.strategy, field.slot) {
        (ConversionStrategy::TextDecodable, Slot::Decode(decode)) => {
            return decode(target, text).map_err(|source| BindError::ConversionFailed {
                label: label.to_string(),
                source,
            });
        }
        (ConversionStrategy::TextDecodable, Slot::Value(_)) | (_, Slot::Decode(_)) => {
            return Err(invalid_target());
        }
        (_, Slot::Value(slot)) => slot(target),
    };

    let stored = match field.strategy {
        ConversionStrategy::RawBytes => store(slot, text.to_vec()),
        ConversionStrategy::StringCopy => {
            let text = std::str::from_utf8(text).map_err(|source| BindError::InvalidText {
                label: label.to_string(),
                source,
            })?;
            store(slot, text.to_owned())
        }
        ConversionStrategy::SignedInteger(width) => {
            let (min, max) = signed_bounds(width).ok_or_else(invalid_target)?;
            let n = parse_integer::<i128>(label, text, width, IntegerKind::Signed)?;
            if n < min || n > max {
                return Err(out_of_range(label, n, width, IntegerKind::Signed));
            }
            store_signed(slot, n)
        }
        ConversionStrategy::UnsignedInteger(width) => {
            let max = unsigned_max(width).ok_or_else(invalid_target)?;
            let n = parse_integer::<u128>(label, text, width, IntegerKind::Unsigned)?;
            if n > max {
                return Err(out_of_range(label, n, width, IntegerKind::Unsigned));
            }
            store_unsigned(slot, n)
        }
        ConversionStrategy::TextDecodable => false,
    };

    if stored {
        Ok(())
    } else {
        Err(invalid_target())
    }
}

fn parse_integer<N>(
    label: &str,
    text: &[u8],
    width: u32,
    kind: IntegerKind,
) -> Result<N, BindError>
where
    N: std::str::FromStr<Err = std::num::ParseIntError>,
{
    let invalid = || BindError::InvalidInteger {
        label: label.to_string(),
        text: String::from_utf8_lossy(text).into_owned(),
        kind,
    };

    let s = std::str::from_utf8(text).map_err(|_| invalid())?;
    if kind == IntegerKind::Unsigned && s.starts_with('+') {
        return Err(invalid());
    }
    s.parse::<N>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            out_of_range(label, s, width, kind)
        }
        _ => invalid(),
    })
}

fn out_of_range(
    label: &str,
    value: impl fmt::Display,
    width: u32,
    kind: IntegerKind,
) -> BindError {
    BindError::OutOfRange {
        label: label.to_string(),
        value: value.to_string(),
        width,
        kind,
    }
}

fn store<T: Any>(slot: &mut dyn Any, value: T) -> bool {
    match slot.downcast_mut::<T>() {
        Some(field) => {
            *field = value;
            true
        }
        None => false,
    }
}

fn store_int<T, N>(slot: &mut dyn Any, n: N) -> bool
where
    T: Any + TryFrom<N>,
{
    match (slot.downcast_mut::<T>(), T::try_from(n)) {
        (Some(field), Ok(n)) => {
            *field = n;
            true
        }
        _ => false,
    }
}

fn store_signed(slot: &mut dyn Any, n: i128) -> bool {
    store_int::<i8, _>(slot, n)
        || store_int::<i16, _>(slot, n)
        || store_int::<i32, _>(slot, n)
        || store_int::<i64, _>(slot, n)
        || store_int::<isize, _>(slot, n)
}

fn store_unsigned(slot: &mut dyn Any, n: u128) -> bool {
    store_int::<u8, _>(slot, n)
        || store_int::<u16, _>(slot, n)
        || store_int::<u32, _>(slot, n)
        || store_int::<u64, _>(slot, n)
        || store_int::<usize, _>(slot, n)
}
