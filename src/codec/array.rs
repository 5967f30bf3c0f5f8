//! Count-prefixed arrays.
//!
//! An array is its element count, written with a [`LengthPrefix`], followed by
//! each element in order.  The element codec is either a nested container
//! ([`FieldCodec::array`]) or a pair of caller-supplied functions
//! ([`FieldCodec::custom_array`]).
//!
//! [`FieldCodec::array`]: super::FieldCodec::array
//! [`FieldCodec::custom_array`]: super::FieldCodec::custom_array
use super::{decode_prefix, encode_prefix, Chunks, LengthPrefix};
use crate::{value::Value, FlexErr};
use alloc::vec::Vec;

pub(crate) fn encode_array<F>(
  value: &Value,
  prefix: LengthPrefix,
  mut encode: F,
) -> Result<Chunks, FlexErr>
where
  F: FnMut(&Value) -> Result<Vec<u8>, FlexErr>,
{
  let items = match value {
    Value::Array(items) => items,
    other => {
      return Err(err!(debug, FlexErr::UnexpectedValue {
        expected: "Array",
        observed: other.kind(),
      }))
    },
  };

  let count = encode_prefix(items.len(), prefix)?;
  let mut body = Vec::new();
  for item in items {
    body.extend(encode(item)?);
  }
  Ok(Chunks::from_iter([count, body]))
}

/// Elements may encode to zero bytes, so the count is not checked against the
/// remaining input. Only the preallocation is bounded by it.
pub(crate) fn decode_array<F>(
  source: &[u8],
  prefix: LengthPrefix,
  mut decode: F,
) -> Result<(Value, usize), FlexErr>
where
  F: FnMut(&[u8]) -> Result<(Value, usize), FlexErr>,
{
  let (count, mut offset) = decode_prefix(source, prefix)?;
  let remaining = source.len() - offset;

  let mut items = Vec::with_capacity(count.min(remaining));
  for _ in 0..count {
    let (item, consumed) = decode(&source[offset..])?;
    offset += consumed;
    if offset > source.len() {
      return Err(err!(debug, FlexErr::OutOfBounds {
        index:  offset,
        length: source.len(),
      }));
    }
    items.push(item);
  }
  Ok((Value::Array(items), offset))
}

/// Element functions for [`FieldCodec::custom_array`] over primitive values.
///
/// ```
/// use flexbuf::codec::{element, FieldCodec, LengthPrefix};
///
/// const TAGS: FieldCodec = FieldCodec::custom_array(
///   "tags",
///   LengthPrefix::Fixed(1),
///   element::encode_text,
///   element::decode_text,
/// );
/// ```
///
/// [`FieldCodec::custom_array`]: super::FieldCodec::custom_array
pub mod element {
  use crate::{
    codec::{
      boolean, custom, decode_fixed_uint, encode_big_uint as big_uint_chunks,
      expect_uint, numeric, uint_to_be, LengthDiscipline, Transform,
    },
    value::Value,
    FlexErr,
  };
  use alloc::vec::Vec;

  macro_rules! fixed_elements {
    ($($width:literal => $encode:ident, $decode:ident;)*) => {
      $(
        #[doc = concat!("Encodes a ", $width, "-byte integer element.")]
        pub fn $encode(value: &Value) -> Result<Vec<u8>, FlexErr> {
          uint_to_be(expect_uint(value)?, $width)
        }

        #[doc = concat!("Decodes a ", $width, "-byte integer element.")]
        pub fn $decode(source: &[u8]) -> Result<(Value, usize), FlexErr> {
          decode_fixed_uint(source, $width)
        }
      )*
    };
  }

  fixed_elements! {
    1 => encode_u8, decode_u8;
    2 => encode_u16, decode_u16;
    4 => encode_u32, decode_u32;
    8 => encode_u64, decode_u64;
  }

  pub fn encode_big_uint(value: &Value) -> Result<Vec<u8>, FlexErr> {
    Ok(big_uint_chunks(value)?.into_iter().flatten().collect())
  }

  pub fn decode_big_uint(source: &[u8]) -> Result<(Value, usize), FlexErr> {
    numeric::decode_big_uint(source)
  }

  pub fn encode_bool(value: &Value) -> Result<Vec<u8>, FlexErr> {
    Ok(boolean::encode_bool(value)?.into_iter().flatten().collect())
  }

  pub fn decode_bool(source: &[u8]) -> Result<(Value, usize), FlexErr> {
    boolean::decode_bool(source)
  }

  /// Text elements carry their own unbounded length prefix.
  pub fn encode_text(value: &Value) -> Result<Vec<u8>, FlexErr> {
    let chunks = custom::encode_custom(
      value,
      LengthDiscipline::Unbounded,
      Some(&Transform::UTF8),
    )?;
    Ok(chunks.into_iter().flatten().collect())
  }

  pub fn decode_text(source: &[u8]) -> Result<(Value, usize), FlexErr> {
    custom::decode_custom(
      source,
      LengthDiscipline::Unbounded,
      Some(&Transform::UTF8),
    )
  }
}

#[cfg(test)]
mod tests {
  use super::element;
  use crate::{
    codec::{FieldCodec, LengthPrefix},
    util::init_test_logger,
    value::Value,
    FlexErr,
  };
  use alloc::{string::String, vec, vec::Vec};

  const WEIGHTS: FieldCodec = FieldCodec::custom_array(
    "weights",
    LengthPrefix::Fixed(2),
    element::encode_u16,
    element::decode_u16,
  );

  const TAGS: FieldCodec = FieldCodec::custom_array(
    "tags",
    LengthPrefix::Unbounded,
    element::encode_text,
    element::decode_text,
  );

  fn flat(codec: &FieldCodec, value: &Value) -> Result<Vec<u8>, FlexErr> {
    Ok(codec.encode(value)?.into_iter().flatten().collect())
  }

  #[test]
  fn fixed_width_elements() {
    let value = Value::array([1u16, 0x0203]);
    let encoded = flat(&WEIGHTS, &value).unwrap();
    assert_eq!(encoded, vec![0, 2, 0, 1, 2, 3]);

    let (decoded, consumed) = WEIGHTS.decode(&encoded).unwrap();
    assert_eq!(consumed, 6);
    match decoded {
      Value::Array(items) => {
        let items: Vec<_> = items.iter().map(Value::as_uint).collect();
        assert_eq!(items, vec![Some(1), Some(0x0203)]);
      },
      other => panic!("not an array: {:?}", other),
    }
  }

  #[test]
  fn variable_width_elements() {
    let value = Value::array(["", "a", "sedan"]);
    let encoded = flat(&TAGS, &value).unwrap();
    assert_eq!(
      encoded,
      vec![0x3F, 0x0F, 0x1F, b'a', 0x5F, b's', b'e', b'd', b'a', b'n']
    );

    let (decoded, consumed) = TAGS.decode(&encoded).unwrap();
    assert_eq!(consumed, encoded.len());
    let decoded: Vec<String> = match decoded {
      Value::Array(items) => items
        .into_iter()
        .filter_map(|item| match item {
          Value::Text(t) => Some(t),
          _ => None,
        })
        .collect(),
      other => panic!("not an array: {:?}", other),
    };
    assert_eq!(decoded, vec!["", "a", "sedan"]);
  }

  #[test]
  fn empty_array() {
    let encoded = flat(&TAGS, &Value::Array(vec![])).unwrap();
    assert_eq!(encoded, vec![0x0F]);
    assert_eq!(TAGS.decode(&encoded).unwrap().1, 1);
  }

  #[test]
  fn count_larger_than_input() {
    init_test_logger();
    // Claims 0xFFFF elements with only two bytes left: the first element
    // decodes and the second runs out of input.
    assert_eq!(
      WEIGHTS.decode(&[0xFF, 0xFF, 0x00, 0x01]).unwrap_err(),
      FlexErr::OutOfBounds {
        index:  2,
        length: 0,
      }
    );
    // Plausible count, truncated elements.
    assert_eq!(
      WEIGHTS.decode(&[0x00, 0x02, 0x00, 0x01, 0x00]).unwrap_err(),
      FlexErr::OutOfBounds {
        index:  2,
        length: 1,
      }
    );
  }

  #[test]
  fn zero_width_elements() {
    init_test_logger();
    fn encode_marker(value: &Value) -> Result<Vec<u8>, FlexErr> {
      match value {
        Value::Bool(true) => Ok(Vec::new()),
        _ => Err(FlexErr::TransformFailed),
      }
    }
    fn decode_marker(_: &[u8]) -> Result<(Value, usize), FlexErr> {
      Ok((Value::Bool(true), 0))
    }
    let codec = FieldCodec::custom_array(
      "markers",
      LengthPrefix::Unbounded,
      encode_marker,
      decode_marker,
    );

    let encoded = flat(&codec, &Value::array([true, true, true])).unwrap();
    assert_eq!(encoded, vec![0x3F]);
    let (decoded, consumed) = codec.decode(&encoded).unwrap();
    assert_eq!(consumed, 1);
    match decoded {
      Value::Array(items) => {
        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|item| matches!(item, Value::Bool(true))));
      },
      other => panic!("not an array: {:?}", other),
    }
  }

  #[test]
  fn element_errors_propagate() {
    init_test_logger();
    let value = Value::array([Value::from(1u32), Value::Bool(true)]);
    assert_eq!(
      flat(&WEIGHTS, &value),
      Err(FlexErr::UnexpectedValue {
        expected: "Uint",
        observed: "Bool",
      })
    );
    assert!(flat(&WEIGHTS, &Value::from(3u8)).is_err());
  }

  #[test]
  fn count_prefix_overflow() {
    init_test_logger();
    let codec = FieldCodec::custom_array(
      "flags",
      LengthPrefix::Fixed(1),
      element::encode_bool,
      element::decode_bool,
    );
    let value = Value::array(vec![true; 256]);
    assert_eq!(
      flat(&codec, &value),
      Err(FlexErr::PrefixOverflow {
        len:          256,
        prefix_width: 1,
      })
    );
  }
}
