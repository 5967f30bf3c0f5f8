use crate::{
  codec::FieldCodec,
  crypto::CryptographicHash,
  schema,
  util::LogErr,
  value::Fields,
  FlexErr,
};
use alloc::{string::String, vec::Vec};
use core::{any::type_name, fmt::Debug};
use log::Level;

/// Domain types with a fixed, ordered binary schema.
///
/// An implementation names its fields in [`Container::SCHEMA`] and converts
/// itself to and from a [`Fields`] map.  Everything else is provided.
///
/// ```
/// use flexbuf::{Container, FieldCodec, Fields};
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Reading {
///   timestamp: u64,
///   valid:     bool,
/// }
///
/// impl Container for Reading {
///   const SCHEMA: &'static [FieldCodec] = &[
///     FieldCodec::big_uint("timestamp"),
///     FieldCodec::bool("valid"),
///   ];
///
///   fn to_fields(&self) -> Fields {
///     Fields::new()
///       .with("timestamp", self.timestamp)
///       .with("valid", self.valid)
///   }
///
///   fn from_fields(mut fields: Fields) -> Option<Self> {
///     Some(Reading {
///       timestamp: fields.take("timestamp")?,
///       valid:     fields.take("valid")?,
///     })
///   }
/// }
///
/// let reading = Reading { timestamp: 12345, valid: true };
/// let bytes = reading.to_bytes().unwrap();
/// assert_eq!(bytes, [0x02, 0x30, 0x39, 0x01]);
/// assert_eq!(Reading::from_decoded(&bytes), Some(reading));
/// ```
pub trait Container: Clone + Debug + Send + Sync + Sized + 'static {
  /// The fields of this type, in wire order.
  const SCHEMA: &'static [FieldCodec];

  /// Collects this instance's field values, keyed as in [`Self::SCHEMA`].
  fn to_fields(&self) -> Fields;

  /// The reconstruction hook.
  ///
  /// Builds an instance from decoded fields.  Returning `None` rejects the
  /// decoded data, which then fails to decode as if it were malformed.
  fn from_fields(fields: Fields) -> Option<Self>;

  /// Encodes this instance, leaving out `hash_remove` fields if `for_hash` is
  /// set.
  ///
  /// Encoding only fails when [`Container::to_fields`] produces values that
  /// do not fit the schema.
  fn encode_to_bytes(&self, for_hash: bool) -> Result<Vec<u8>, FlexErr> {
    schema::encode(&self.to_fields(), Self::SCHEMA, for_hash)
  }

  /// The full encoding of this instance.
  fn to_bytes(&self) -> Result<Vec<u8>, FlexErr> {
    self.encode_to_bytes(false)
  }

  /// The full encoding of this instance, as lowercase hex.
  fn encode_to_hex(&self) -> Result<String, FlexErr> {
    Ok(hex::encode(self.to_bytes()?))
  }

  /// Decodes an instance, keeping the reason for any failure.
  ///
  /// Without `with_length` the whole of `source` must be consumed.  The
  /// returned length is the number of bytes the instance occupied.
  fn try_from_decoded(
    source: &[u8],
    with_length: bool,
  ) -> Result<(Self, usize), FlexErr> {
    decode_container(source, with_length, 0)
  }

  /// Decodes an instance that occupies exactly the whole of `source`.
  fn from_decoded(source: &[u8]) -> Option<Self> {
    Self::try_from_decoded(source, false)
      .log_err(Level::Debug)
      .ok()
      .map(|(object, _)| object)
  }

  /// Decodes an instance from the start of `source`, returning it with the
  /// number of bytes it occupied.
  fn from_decoded_with_len(source: &[u8]) -> Option<(Self, usize)> {
    Self::try_from_decoded(source, true).log_err(Level::Debug).ok()
  }

  /// Decodes an instance from a hex string.
  fn from_hex(source: &str) -> Option<Self> {
    let bytes = hex::decode(source)
      .map_err(FlexErr::from)
      .log_err(Level::Debug)
      .ok()?;
    Self::from_decoded(&bytes)
  }
}

/// Containers that carry a hash of their own contents.
///
/// The hash is stored in a `hash_remove` field, so that it is part of the full
/// encoding but not of the hash input.  A typical [`Container::from_fields`]
/// rebuilds the instance and then rejects it unless
/// [`HashableContainer::validate_hash`] accepts the hash it was carrying.
pub trait HashableContainer: Container {
  type Hash: CryptographicHash;

  /// Hashes the encoding of this instance without its `hash_remove` fields.
  fn calculate_hash(&self) -> Result<Self::Hash, FlexErr> {
    Ok(Self::Hash::new(&self.encode_to_bytes(true)?))
  }

  /// Checks `expected` against a freshly calculated hash.
  ///
  /// Any failure to calculate the hash counts as a mismatch.
  fn validate_hash(&self, expected: &Self::Hash) -> bool {
    match self.calculate_hash().log_err(Level::Debug) {
      Ok(hash) if hash == *expected => true,
      Ok(_) => {
        log::debug!("{}: {}", Self::Hash::NAME, FlexErr::HashMismatch);
        false
      },
      Err(_) => false,
    }
  }
}

/// Decodes a `T` nested `depth` containers deep, then runs its reconstruction
/// hook.
pub(crate) fn decode_container<T: Container>(
  source: &[u8],
  with_length: bool,
  depth: usize,
) -> Result<(T, usize), FlexErr> {
  let (fields, consumed) =
    schema::decode(source, T::SCHEMA, with_length, depth)?;
  match T::from_fields(fields) {
    Some(object) => Ok((object, consumed)),
    None => Err(err!(debug, FlexErr::Rejected(type_name::<T>()))),
  }
}
