use super::Chunks;
use crate::{value::Value, FlexErr};
use alloc::vec::Vec;

/// Booleans are a single byte, `1` for `true` and `0` for `false`.
pub(crate) fn encode_bool(value: &Value) -> Result<Chunks, FlexErr> {
  match value {
    Value::Bool(v) => Ok(Chunks::from_iter([Vec::from([*v as u8])])),
    other => Err(err!(debug, FlexErr::UnexpectedValue {
      expected: "Bool",
      observed: other.kind(),
    })),
  }
}

/// Only `0` and `1` are accepted.
///
/// Decoding is stricter than a truthiness check: any other byte fails with
/// [`FlexErr::IllegalBool`] rather than reading as `false`, so every accepted
/// encoding is the one [`encode_bool`] would produce.
pub(crate) fn decode_bool(source: &[u8]) -> Result<(Value, usize), FlexErr> {
  match take_bytes!(source, 1)[0] {
    0 => Ok((Value::Bool(false), 1)),
    1 => Ok((Value::Bool(true), 1)),
    byte => Err(err!(debug, FlexErr::IllegalBool(byte))),
  }
}
