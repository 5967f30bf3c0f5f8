//! Field codecs: the encode/decode contract for one field of a schema.
//!
//! Every field of a [`Container`]'s schema is described by a [`FieldCodec`],
//! built with one of the `const fn` constructors below.  The set of wire
//! shapes is closed:
//!
//! | constructor                     | wire shape                                   |
//! |---------------------------------|----------------------------------------------|
//! | [`FieldCodec::fixed_uint`]      | exactly `width` big-endian bytes             |
//! | [`FieldCodec::big_uint`]        | 1-byte length, then minimal big-endian bytes |
//! | [`FieldCodec::bool`]            | 1 byte, `0` or `1`                           |
//! | [`FieldCodec::enumeration`]     | like `fixed_uint`, value from a closed set   |
//! | [`FieldCodec::array`]           | count prefix, then nested containers         |
//! | [`FieldCodec::custom_array`]    | count prefix, then caller-encoded elements   |
//! | [`FieldCodec::nested`]          | a nested container, inline                   |
//! | [`FieldCodec::custom`]          | raw bytes: fixed, prefixed or unbounded      |
//! | [`FieldCodec::text`]            | unbounded length, then UTF-8                 |
//! | [`FieldCodec::digest`]          | a fixed-width cryptographic hash             |
//!
//! Nothing on the wire identifies a field or its type; a decoder must already
//! know the exact schema.
//!
//! [`Container`]: crate::Container
mod array;
mod boolean;
mod custom;
mod nested;
mod numeric;

pub use self::{
  array::element,
  custom::{decode_utf8, encode_utf8, Transform},
};
pub(crate) use self::{nested::ObjectCodec, numeric::*};

use crate::{
  crypto::CryptographicHash,
  length::{decode_length, encode_length},
  value::Value,
  Container, FlexErr,
};
use alloc::vec::Vec;
use core::fmt::{Debug, Formatter};
use smallvec::SmallVec;

/// The ordered byte chunks produced by encoding a single field.
pub type Chunks = SmallVec<Vec<u8>, 2>;

/// Caller-supplied element encoder for [`FieldCodec::custom_array`].
pub type ElementEncodeFn = fn(&Value) -> Result<Vec<u8>, FlexErr>;

/// Caller-supplied element decoder for [`FieldCodec::custom_array`].
///
/// Returns the element and the number of bytes it occupied.
pub type ElementDecodeFn = fn(&[u8]) -> Result<(Value, usize), FlexErr>;

/// How the element count of an array is written.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LengthPrefix {
  /// A big-endian count of exactly this many bytes.
  Fixed(usize),
  /// The self-terminating count encoding of [`crate::length`].
  Unbounded,
}

/// How the payload length of a [`FieldCodec::custom`] field is determined.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LengthDiscipline {
  /// The payload is always exactly this many bytes, with no prefix.
  Fixed(usize),
  /// The payload is preceded by a big-endian length of this many bytes.
  Prefixed(usize),
  /// The payload is preceded by a self-terminating length.
  Unbounded,
}

#[derive(Copy, Clone)]
pub(crate) enum CodecKind {
  FixedUint {
    width: usize,
  },
  BigUint,
  Bool,
  Enum {
    width:   usize,
    allowed: &'static [u128],
  },
  Array {
    prefix:  LengthPrefix,
    element: ObjectCodec,
  },
  CustomArray {
    prefix: LengthPrefix,
    encode: ElementEncodeFn,
    decode: ElementDecodeFn,
  },
  Nested(ObjectCodec),
  Custom {
    length:    LengthDiscipline,
    transform: Option<Transform>,
  },
}

/// The codec for a single schema field.
#[derive(Copy, Clone)]
pub struct FieldCodec {
  key:         &'static str,
  hash_remove: bool,
  kind:        CodecKind,
}

impl FieldCodec {
  const fn new(key: &'static str, kind: CodecKind) -> Self {
    FieldCodec {
      key,
      hash_remove: false,
      kind,
    }
  }

  /// An unsigned integer of exactly `width` big-endian bytes (1 to 16).
  pub const fn fixed_uint(key: &'static str, width: usize) -> Self {
    assert!(width >= 1 && width <= MAX_UINT_WIDTH);
    Self::new(key, CodecKind::FixedUint { width })
  }

  /// An unsigned integer with a 1-byte length prefix and the minimal number
  /// of big-endian value bytes.
  pub const fn big_uint(key: &'static str) -> Self {
    Self::new(key, CodecKind::BigUint)
  }

  /// A boolean stored as a single `0` or `1` byte.
  pub const fn bool(key: &'static str) -> Self {
    Self::new(key, CodecKind::Bool)
  }

  /// A `width`-byte unsigned integer restricted to the values in `allowed`.
  ///
  /// Byte-valid values outside of `allowed` fail to decode.
  pub const fn enumeration(
    key: &'static str,
    width: usize,
    allowed: &'static [u128],
  ) -> Self {
    assert!(width >= 1 && width <= MAX_UINT_WIDTH);
    Self::new(key, CodecKind::Enum { width, allowed })
  }

  /// A count-prefixed array of nested `T` containers.
  pub const fn array<T: Container>(
    key: &'static str,
    prefix: LengthPrefix,
  ) -> Self {
    check_prefix(prefix);
    Self::new(key, CodecKind::Array {
      prefix,
      element: ObjectCodec::of::<T>(),
    })
  }

  /// A count-prefixed array whose elements are encoded by caller-supplied
  /// functions.  See [`element`] for ready-made element functions.
  pub const fn custom_array(
    key: &'static str,
    prefix: LengthPrefix,
    encode: ElementEncodeFn,
    decode: ElementDecodeFn,
  ) -> Self {
    check_prefix(prefix);
    Self::new(key, CodecKind::CustomArray {
      prefix,
      encode,
      decode,
    })
  }

  /// A nested `T` container, encoded inline.
  pub const fn nested<T: Container>(key: &'static str) -> Self {
    Self::new(key, CodecKind::Nested(ObjectCodec::of::<T>()))
  }

  /// Raw bytes ([`Value::Bytes`]) with the given length discipline.
  pub const fn custom(key: &'static str, length: LengthDiscipline) -> Self {
    check_discipline(length);
    Self::new(key, CodecKind::Custom {
      length,
      transform: None,
    })
  }

  /// Like [`FieldCodec::custom`], with the value converted to and from bytes
  /// by `transform`.
  pub const fn custom_with(
    key: &'static str,
    length: LengthDiscipline,
    transform: Transform,
  ) -> Self {
    check_discipline(length);
    Self::new(key, CodecKind::Custom {
      length,
      transform: Some(transform),
    })
  }

  /// A UTF-8 string with an unbounded length prefix.
  pub const fn text(key: &'static str) -> Self {
    Self::custom_with(key, LengthDiscipline::Unbounded, Transform::UTF8)
  }

  /// A digest of the hash type `H`, stored as [`Value::Bytes`].
  pub const fn digest<H: CryptographicHash>(key: &'static str) -> Self {
    Self::custom(key, LengthDiscipline::Fixed(H::HASH_LEN))
  }

  /// Marks this field as excluded from the hash-input encoding.
  pub const fn hash_remove(mut self) -> Self {
    self.hash_remove = true;
    self
  }

  pub fn key(&self) -> &'static str {
    self.key
  }

  pub fn is_hash_remove(&self) -> bool {
    self.hash_remove
  }

  /// Encodes `value` into the ordered chunks of this field's wire form.
  pub fn encode(&self, value: &Value) -> Result<Chunks, FlexErr> {
    match &self.kind {
      CodecKind::FixedUint { width } => encode_fixed_uint(value, *width),
      CodecKind::BigUint => encode_big_uint(value),
      CodecKind::Bool => boolean::encode_bool(value),
      CodecKind::Enum { width, allowed } => {
        encode_enum(value, *width, allowed)
      },
      CodecKind::Array { prefix, element } => {
        array::encode_array(value, *prefix, |item| element.encode(item))
      },
      CodecKind::CustomArray { prefix, encode, .. } => {
        array::encode_array(value, *prefix, *encode)
      },
      CodecKind::Nested(object) => {
        let mut chunks = Chunks::new();
        chunks.push(object.encode(value)?);
        Ok(chunks)
      },
      CodecKind::Custom { length, transform } => {
        custom::encode_custom(value, *length, transform.as_ref())
      },
    }
  }

  /// Decodes this field from the start of `source`.
  ///
  /// Returns the value and the number of bytes it occupied; bytes after the
  /// field are ignored.
  pub fn decode(&self, source: &[u8]) -> Result<(Value, usize), FlexErr> {
    self.decode_at_depth(source, 0)
  }

  /// As [`FieldCodec::decode`], for a field of a container nested `depth`
  /// levels deep.
  pub(crate) fn decode_at_depth(
    &self,
    source: &[u8],
    depth: usize,
  ) -> Result<(Value, usize), FlexErr> {
    match &self.kind {
      CodecKind::FixedUint { width } => decode_fixed_uint(source, *width),
      CodecKind::BigUint => decode_big_uint(source),
      CodecKind::Bool => boolean::decode_bool(source),
      CodecKind::Enum { width, allowed } => {
        decode_enum(source, *width, allowed)
      },
      CodecKind::Array { prefix, element } => {
        array::decode_array(source, *prefix, |rest| {
          element.decode(rest, depth + 1)
        })
      },
      CodecKind::CustomArray { prefix, decode, .. } => {
        array::decode_array(source, *prefix, *decode)
      },
      CodecKind::Nested(object) => object.decode(source, depth + 1),
      CodecKind::Custom { length, transform } => {
        custom::decode_custom(source, *length, transform.as_ref())
      },
    }
  }
}

impl Debug for FieldCodec {
  fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
    let kind = match &self.kind {
      CodecKind::FixedUint { .. } => "FixedUint",
      CodecKind::BigUint => "BigUint",
      CodecKind::Bool => "Bool",
      CodecKind::Enum { .. } => "Enum",
      CodecKind::Array { .. } => "Array",
      CodecKind::CustomArray { .. } => "CustomArray",
      CodecKind::Nested(_) => "Nested",
      CodecKind::Custom { .. } => "Custom",
    };
    let mut df = f.debug_struct("FieldCodec");
    df.field("key", &self.key);
    df.field("kind", &kind);
    df.field("hash_remove", &self.hash_remove);
    df.finish()
  }
}

const fn check_prefix(prefix: LengthPrefix) {
  if let LengthPrefix::Fixed(width) = prefix {
    assert!(width >= 1 && width <= MAX_UINT_WIDTH);
  }
}

const fn check_discipline(length: LengthDiscipline) {
  if let LengthDiscipline::Prefixed(width) = length {
    assert!(width >= 1 && width <= MAX_UINT_WIDTH);
  }
}

/// Writes a count or length prefix.
pub(crate) fn encode_prefix(
  count: usize,
  prefix: LengthPrefix,
) -> Result<Vec<u8>, FlexErr> {
  match prefix {
    LengthPrefix::Fixed(width) => uint_to_be(count as u128, width)
      .map_err(|_| FlexErr::PrefixOverflow {
        len:          count,
        prefix_width: width,
      }),
    LengthPrefix::Unbounded => Ok(encode_length(count)),
  }
}

/// Reads a count or length prefix, returning the count and the prefix length.
pub(crate) fn decode_prefix(
  source: &[u8],
  prefix: LengthPrefix,
) -> Result<(usize, usize), FlexErr> {
  match prefix {
    LengthPrefix::Fixed(width) => {
      let bytes = take_bytes!(source, width);
      let count = usize::try_from(be_to_uint(bytes)?)?;
      Ok((count, width))
    },
    LengthPrefix::Unbounded => decode_length(source),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::crypto::Sha2Hash;
  use alloc::vec;

  #[test]
  fn hash_remove_builder() {
    const HASH: FieldCodec =
      FieldCodec::digest::<Sha2Hash>("hash").hash_remove();
    assert_eq!(HASH.key(), "hash");
    assert!(HASH.is_hash_remove());
    assert!(!FieldCodec::bool("flag").is_hash_remove());
  }

  #[test]
  fn prefixes() {
    assert_eq!(encode_prefix(3, LengthPrefix::Fixed(2)), Ok(vec![0, 3]));
    assert_eq!(
      encode_prefix(256, LengthPrefix::Fixed(1)),
      Err(FlexErr::PrefixOverflow {
        len:          256,
        prefix_width: 1,
      })
    );
    assert_eq!(
      encode_prefix(15, LengthPrefix::Unbounded),
      Ok(vec![0x01, 0x0F])
    );

    assert_eq!(decode_prefix(&[0, 3, 9], LengthPrefix::Fixed(2)), Ok((3, 2)));
    assert_eq!(
      decode_prefix(&[0], LengthPrefix::Fixed(2)),
      Err(FlexErr::OutOfBounds {
        index:  2,
        length: 1,
      })
    );
    assert_eq!(decode_prefix(&[0xEF, 0], LengthPrefix::Unbounded), Ok((14, 1)));
  }

  #[test]
  fn debug_names_the_variant() {
    let codec = FieldCodec::text("name");
    assert_eq!(
      std::format!("{:?}", codec),
      "FieldCodec { key: \"name\", kind: \"Custom\", hash_remove: false }"
    );
  }
}
