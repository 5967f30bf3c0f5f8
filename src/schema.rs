//! The schema interpreter.
//!
//! A schema is an ordered slice of [`FieldCodec`]s.  Encoding concatenates the
//! chunks of every field in schema order; decoding walks the same order,
//! handing each codec the bytes that follow the previous field.
use crate::{codec::FieldCodec, value::Fields, FlexErr};
use alloc::{boxed::Box, vec::Vec};

/// How many containers or arrays deep a decode may nest before it is
/// abandoned.
pub const MAX_DECODE_DEPTH: usize = 64;

/// Encodes `fields` according to `schema`.
///
/// With `for_hash` set, fields whose codec is marked `hash_remove` are left
/// out, producing the input of a container's hash.
pub fn encode(
  fields: &Fields,
  schema: &[FieldCodec],
  for_hash: bool,
) -> Result<Vec<u8>, FlexErr> {
  let mut target = Vec::new();
  for codec in schema {
    if for_hash && codec.is_hash_remove() {
      continue;
    }
    let key = codec.key();
    let chunks = match fields.get(key) {
      Some(value) => codec.encode(value),
      None => Err(err!(debug, FlexErr::MissingField(key))),
    }
    .map_err(|cause| FlexErr::EncodeField {
      key,
      cause: Box::new(cause),
    })?;
    for chunk in chunks {
      target.extend(chunk);
    }
  }
  Ok(target)
}

/// Decodes the fields of `schema` from the start of `source`.
///
/// With `with_length` set, bytes after the last field are ignored and the
/// number of bytes consumed is returned.  Otherwise the fields must account
/// for the whole of `source`.
///
/// `depth` counts the containers enclosing this one; see
/// [`MAX_DECODE_DEPTH`].
pub fn decode(
  source: &[u8],
  schema: &[FieldCodec],
  with_length: bool,
  depth: usize,
) -> Result<(Fields, usize), FlexErr> {
  if depth > MAX_DECODE_DEPTH {
    return Err(err!(debug, FlexErr::DepthExceeded(depth)));
  }

  let mut fields = Fields::new();
  let mut offset = 0usize;
  for codec in schema {
    let key = codec.key();
    let (value, consumed) = codec
      .decode_at_depth(&source[offset..], depth)
      .map_err(|cause| FlexErr::DecodeField {
        key,
        cause: Box::new(cause),
      })?;
    fields.insert(key, value);
    offset += consumed;
  }

  if !with_length && offset != source.len() {
    return Err(err!(trace, FlexErr::LengthMismatch {
      consumed: offset,
      length:   source.len(),
    }));
  }
  Ok((fields, offset))
}
