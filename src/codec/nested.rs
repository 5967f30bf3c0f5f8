//! Nested containers, as fields and as array elements.
use crate::{container::decode_container, value::Value, Container, FlexErr};
use alloc::vec::Vec;
use core::any::type_name;

/// The monomorphized encode and decode functions of one container type.
#[derive(Copy, Clone)]
pub(crate) struct ObjectCodec {
  encode: fn(&Value) -> Result<Vec<u8>, FlexErr>,
  decode: fn(&[u8], usize) -> Result<(Value, usize), FlexErr>,
}

impl ObjectCodec {
  pub(crate) const fn of<T: Container>() -> Self {
    ObjectCodec {
      encode: encode_object::<T>,
      decode: decode_object::<T>,
    }
  }

  pub(crate) fn encode(&self, value: &Value) -> Result<Vec<u8>, FlexErr> {
    (self.encode)(value)
  }

  /// Decodes a container nested `depth` levels below the outermost one.
  pub(crate) fn decode(
    &self,
    source: &[u8],
    depth: usize,
  ) -> Result<(Value, usize), FlexErr> {
    (self.decode)(source, depth)
  }
}

/// Nested containers are always encoded in full, including any of their
/// hash-removed fields.
fn encode_object<T: Container>(value: &Value) -> Result<Vec<u8>, FlexErr> {
  let object = match value {
    Value::Object(object) => object.as_ref(),
    other => {
      return Err(err!(debug, FlexErr::UnexpectedValue {
        expected: "Object",
        observed: other.kind(),
      }))
    },
  };
  let object = object.as_any().downcast_ref::<T>().ok_or_else(|| {
    err!(debug, FlexErr::WrongObjectType {
      expected: type_name::<T>(),
      observed: object.type_name(),
    })
  })?;
  object.encode_to_bytes(false)
}

/// Nested containers decode leniently: they stop after their last field.
fn decode_object<T: Container>(
  source: &[u8],
  depth: usize,
) -> Result<(Value, usize), FlexErr> {
  let (object, consumed) = decode_container::<T>(source, true, depth)?;
  Ok((Value::object(object), consumed))
}
