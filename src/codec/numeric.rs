//! Fixed-width, variable-width and enumerated unsigned integers.
//!
//! All integers are big-endian.  Values are carried as [`Value::Uint`], so the
//! widest integer any of these codecs can hold is a `u128`.
use super::Chunks;
use crate::{value::Value, FlexErr};
use alloc::vec::Vec;

/// The widest fixed integer, in bytes.
pub(crate) const MAX_UINT_WIDTH: usize = 16;

/// The number of bytes needed to hold `value`, with zero needing none.
pub(crate) fn significant_len(value: u128) -> usize {
  (128 - value.leading_zeros() as usize).div_ceil(8)
}

/// Writes `value` as exactly `width` big-endian bytes.
pub(crate) fn uint_to_be(
  value: u128,
  width: usize,
) -> Result<Vec<u8>, FlexErr> {
  let needed = significant_len(value);
  if needed > width {
    return Err(err!(debug, FlexErr::IntOverflow { value, width }));
  }
  let bytes = value.to_be_bytes();
  let mut target = Vec::with_capacity(width);
  target.resize(width - needed, 0u8);
  target.extend_from_slice(&bytes[MAX_UINT_WIDTH - needed..]);
  Ok(target)
}

/// Reads big-endian bytes as an integer.
///
/// Leading zero bytes are ignored; anything wider than a `u128` is rejected.
pub(crate) fn be_to_uint(bytes: &[u8]) -> Result<u128, FlexErr> {
  let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
  let significant = &bytes[first..];
  if significant.len() > MAX_UINT_WIDTH {
    return Err(err!(debug, FlexErr::IntTooWide(significant.len())));
  }
  Ok(
    significant
      .iter()
      .fold(0u128, |acc, byte| (acc << 8) | *byte as u128),
  )
}

pub(crate) fn expect_uint(value: &Value) -> Result<u128, FlexErr> {
  value.as_uint().ok_or_else(|| {
    err!(debug, FlexErr::UnexpectedValue {
      expected: "Uint",
      observed: value.kind(),
    })
  })
}

pub(crate) fn encode_fixed_uint(
  value: &Value,
  width: usize,
) -> Result<Chunks, FlexErr> {
  let value = expect_uint(value)?;
  Ok(Chunks::from_iter([uint_to_be(value, width)?]))
}

pub(crate) fn decode_fixed_uint(
  source: &[u8],
  width: usize,
) -> Result<(Value, usize), FlexErr> {
  let bytes = take_bytes!(source, width);
  Ok((Value::Uint(be_to_uint(bytes)?), width))
}

/// A 1-byte length, then the minimal big-endian bytes of the value.
///
/// Zero has an empty payload, so it encodes as the single byte `0x00`.
pub(crate) fn encode_big_uint(value: &Value) -> Result<Chunks, FlexErr> {
  let value = expect_uint(value)?;
  let len = significant_len(value);
  let bytes = value.to_be_bytes();
  Ok(Chunks::from_iter([
    Vec::from([len as u8]),
    Vec::from(&bytes[MAX_UINT_WIDTH - len..]),
  ]))
}

pub(crate) fn decode_big_uint(
  source: &[u8],
) -> Result<(Value, usize), FlexErr> {
  let len = take_bytes!(source, 1)[0] as usize;
  let bytes = take_bytes!(&source[1..], len);
  Ok((Value::Uint(be_to_uint(bytes)?), 1 + len))
}

pub(crate) fn encode_enum(
  value: &Value,
  width: usize,
  allowed: &[u128],
) -> Result<Chunks, FlexErr> {
  let value = expect_uint(value)?;
  if !allowed.contains(&value) {
    return Err(err!(debug, FlexErr::NotInSet(value)));
  }
  Ok(Chunks::from_iter([uint_to_be(value, width)?]))
}

pub(crate) fn decode_enum(
  source: &[u8],
  width: usize,
  allowed: &[u128],
) -> Result<(Value, usize), FlexErr> {
  let value = be_to_uint(take_bytes!(source, width))?;
  if !allowed.contains(&value) {
    return Err(err!(debug, FlexErr::NotInSet(value)));
  }
  Ok((Value::Uint(value), width))
}
