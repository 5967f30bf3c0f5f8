//! Schema-driven binary encoding for structured objects.
//!
//! Domain types implement [`Container`], declaring an ordered schema of
//! [`FieldCodec`]s.  The encoding is the concatenation of every field in
//! schema order, with no tags, padding or headers; decoding requires the same
//! schema.  [`HashableContainer`]s additionally carry a cryptographic hash of
//! their own encoding, and reject decoded data whose hash does not match.
#![no_std]

#[cfg(any(feature = "std", test))]
extern crate std;

extern crate alloc;

/// Internal Macros
#[macro_use]
mod macros;

pub mod codec;
mod container;
pub mod crypto;
mod error;
pub mod length;
pub mod schema;
mod util;
pub mod value;

pub use self::{
  codec::FieldCodec,
  container::{Container, HashableContainer},
  error::FlexErr,
  schema::MAX_DECODE_DEPTH,
  value::{Fields, Value},
};
