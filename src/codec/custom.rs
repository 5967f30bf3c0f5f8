//! Raw byte payloads, optionally converted by a caller-supplied [`Transform`].
use super::{
  decode_prefix, encode_prefix, Chunks, LengthDiscipline, LengthPrefix,
};
use crate::{value::Value, FlexErr};
use alloc::{string::String, vec::Vec};

/// A pair of functions converting a field value to and from its payload.
///
/// The payload length is handled by the codec's [`LengthDiscipline`]; the
/// decoder is handed exactly the payload bytes.
#[derive(Copy, Clone, Debug)]
pub struct Transform {
  pub encode: fn(&Value) -> Result<Vec<u8>, FlexErr>,
  pub decode: fn(&[u8]) -> Result<Value, FlexErr>,
}

impl Transform {
  /// [`Value::Text`] as UTF-8 bytes.
  pub const UTF8: Transform = Transform {
    encode: encode_utf8,
    decode: decode_utf8,
  };
}

/// Encodes a [`Value::Text`] as its UTF-8 bytes.
pub fn encode_utf8(value: &Value) -> Result<Vec<u8>, FlexErr> {
  match value {
    Value::Text(text) => Ok(Vec::from(text.as_bytes())),
    other => Err(err!(debug, FlexErr::UnexpectedValue {
      expected: "Text",
      observed: other.kind(),
    })),
  }
}

/// Decodes UTF-8 bytes into a [`Value::Text`].
pub fn decode_utf8(bytes: &[u8]) -> Result<Value, FlexErr> {
  let text = core::str::from_utf8(bytes).map_err(|e| err!(debug, e))?;
  Ok(Value::Text(String::from(text)))
}

pub(crate) fn encode_custom(
  value: &Value,
  length: LengthDiscipline,
  transform: Option<&Transform>,
) -> Result<Chunks, FlexErr> {
  let payload = match transform {
    Some(transform) => (transform.encode)(value)?,
    None => match value {
      Value::Bytes(bytes) => bytes.clone(),
      other => {
        return Err(err!(debug, FlexErr::UnexpectedValue {
          expected: "Bytes",
          observed: other.kind(),
        }))
      },
    },
  };

  let prefix = match length {
    LengthDiscipline::Fixed(width) if payload.len() != width => {
      return Err(err!(debug, FlexErr::FixedWidthMismatch {
        expected: width,
        observed: payload.len(),
      }));
    },
    LengthDiscipline::Fixed(_) => return Ok(Chunks::from_iter([payload])),
    LengthDiscipline::Prefixed(width) => {
      encode_prefix(payload.len(), LengthPrefix::Fixed(width))?
    },
    LengthDiscipline::Unbounded => {
      encode_prefix(payload.len(), LengthPrefix::Unbounded)?
    },
  };
  Ok(Chunks::from_iter([prefix, payload]))
}

pub(crate) fn decode_custom(
  source: &[u8],
  length: LengthDiscipline,
  transform: Option<&Transform>,
) -> Result<(Value, usize), FlexErr> {
  let (len, offset) = match length {
    LengthDiscipline::Fixed(width) => (width, 0),
    LengthDiscipline::Prefixed(width) => {
      decode_prefix(source, LengthPrefix::Fixed(width))?
    },
    LengthDiscipline::Unbounded => {
      decode_prefix(source, LengthPrefix::Unbounded)?
    },
  };
  let payload = take_bytes!(&source[offset..], len);
  let value = match transform {
    Some(transform) => (transform.decode)(payload)?,
    None => Value::Bytes(Vec::from(payload)),
  };
  Ok((value, offset + len))
}

#[cfg(test)]
mod tests {
  use crate::{
    codec::{FieldCodec, LengthDiscipline, Transform},
    crypto::{CryptographicHash, Sha2Hash},
    util::init_test_logger,
    value::Value,
    FlexErr,
  };
  use alloc::{vec, vec::Vec};

  fn flat(codec: &FieldCodec, value: &Value) -> Result<Vec<u8>, FlexErr> {
    Ok(codec.encode(value)?.into_iter().flatten().collect())
  }

  #[test]
  fn fixed_payload() {
    init_test_logger();
    let codec = FieldCodec::custom("tag", LengthDiscipline::Fixed(3));
    let value = Value::Bytes(vec![7, 8, 9]);
    assert_eq!(flat(&codec, &value), Ok(vec![7, 8, 9]));
    assert_eq!(
      flat(&codec, &Value::Bytes(vec![1])),
      Err(FlexErr::FixedWidthMismatch {
        expected: 3,
        observed: 1,
      })
    );

    let (decoded, consumed) = codec.decode(&[7, 8, 9, 10]).unwrap();
    assert_eq!(decoded.as_bytes(), Some(&[7u8, 8, 9][..]));
    assert_eq!(consumed, 3);
  }

  #[test]
  fn prefixed_payload() {
    init_test_logger();
    let codec = FieldCodec::custom("blob", LengthDiscipline::Prefixed(1));
    let value = Value::Bytes(vec![0xAA; 5]);
    let encoded = flat(&codec, &value).unwrap();
    assert_eq!(encoded, vec![5, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA]);
    assert_eq!(codec.decode(&encoded).unwrap().1, 6);

    assert_eq!(
      flat(&codec, &Value::Bytes(vec![0; 256])),
      Err(FlexErr::PrefixOverflow {
        len:          256,
        prefix_width: 1,
      })
    );
    assert!(codec.decode(&[5, 0xAA]).is_err());
  }

  #[test]
  fn unbounded_payload() {
    let codec = FieldCodec::custom("blob", LengthDiscipline::Unbounded);
    let value = Value::Bytes(vec![1; 15]);
    let encoded = flat(&codec, &value).unwrap();
    assert_eq!(&encoded[..2], &[0x01, 0x0F]);
    assert_eq!(encoded.len(), 17);

    let (decoded, consumed) = codec.decode(&encoded).unwrap();
    assert_eq!(decoded.as_bytes(), Some(&[1u8; 15][..]));
    assert_eq!(consumed, 17);
  }

  #[test]
  fn text() {
    init_test_logger();
    let codec = FieldCodec::text("name");
    let encoded = flat(&codec, &Value::from("Zoë")).unwrap();
    assert_eq!(encoded, vec![0x4F, b'Z', b'o', 0xC3, 0xAB]);

    let (decoded, consumed) = codec.decode(&encoded).unwrap();
    assert!(matches!(decoded, Value::Text(ref t) if t == "Zoë"));
    assert_eq!(consumed, 5);

    assert_eq!(
      codec.decode(&[0x2F, 0xC3, 0x28]).unwrap_err(),
      FlexErr::InvalidUtf8
    );
    assert!(flat(&codec, &Value::Bytes(vec![])).is_err());
  }

  #[test]
  fn custom_transform() {
    init_test_logger();
    // A single hex digit, stored as its numeric value.
    fn encode(value: &Value) -> Result<Vec<u8>, FlexErr> {
      match value {
        Value::Text(t) if t.len() == 1 => u8::from_str_radix(t, 16)
          .map(|d| vec![d])
          .map_err(|_| FlexErr::TransformFailed),
        _ => Err(FlexErr::TransformFailed),
      }
    }
    fn decode(bytes: &[u8]) -> Result<Value, FlexErr> {
      match bytes {
        [d] if *d < 16 => Ok(Value::Text(alloc::format!("{:x}", d))),
        _ => Err(FlexErr::TransformFailed),
      }
    }
    const DIGIT: Transform = Transform { encode, decode };
    let codec =
      FieldCodec::custom_with("digit", LengthDiscipline::Fixed(1), DIGIT);

    assert_eq!(flat(&codec, &Value::from("c")), Ok(vec![12]));
    assert_eq!(flat(&codec, &Value::from("x")), Err(FlexErr::TransformFailed));
    let (decoded, _) = codec.decode(&[12]).unwrap();
    assert!(matches!(decoded, Value::Text(ref t) if t == "c"));
    assert_eq!(codec.decode(&[16]).unwrap_err(), FlexErr::TransformFailed);
  }

  #[test]
  fn digest() {
    let codec = FieldCodec::digest::<Sha2Hash>("hash");
    let hash = Sha2Hash::new(b"car");
    let encoded = flat(&codec, &Value::from(hash)).unwrap();
    assert_eq!(encoded, hash.hash_bytes());
    assert!(codec.decode(&encoded[..31]).is_err());
  }
}
