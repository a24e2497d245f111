//! Bind named regex captures into typed struct fields.
//!
//! Each public field of a `#[derive(Record)]` struct is filled from the
//! capture group with the same name. Strings, byte vectors and all fixed-width
//! integers are converted directly; other types opt in with
//! `#[capbind(decode)]` ([`DecodeText`]) or `#[capbind(from_str)]`
//! ([`std::str::FromStr`]).
//!
//! Meant for quick extraction from log lines, REPL input and puzzle inputs.
//!
//! # Example
//!
//! ```
//! use capbind::{BindError, Record};
//! use regex::bytes::Regex;
//!
//! #[derive(Debug, Default, Record)]
//! struct Person {
//!     pub name: String,
//!     pub age: u8,
//! }
//!
//! let re = Regex::new(r"^\{(?P<name>[\w ]+),\s+(?P<age>\d+)\}$").unwrap();
//!
//! let mut person = Person::default();
//! capbind::parse(b"{Alice Smith, 44}", &mut person, &re).unwrap();
//! assert_eq!(person.name, "Alice Smith");
//! assert_eq!(person.age, 44);
//!
//! // 300 does not fit in a u8
//! assert!(matches!(
//!     capbind::parse(b"{Bob, 300}", &mut person, &re),
//!     Err(BindError::OutOfRange { .. })
//! ));
//! ```

mod bind;
mod cache;
mod matcher;
mod plan;
mod ranges;
mod record;

pub use bind::{global, must_parse, parse, BindError, Binder, IntegerKind};
pub use cache::PlanCache;
pub use capbind_derive::Record;
pub use matcher::Matcher;
pub use plan::{BindingPlan, ConversionStrategy, FieldPlan, PlanError};
pub use record::{decode_from_str, DecodeError, DecodeText, FieldDescriptor, Record, Slot};
