//! Contains the flexbuf-internal interface to cryptographic hashing functions.

use crate::{
  util::debug::ShortHexDump,
  value::{FromValue, Value},
};
use alloc::vec::Vec;
use core::fmt::{Debug, Formatter};

macro_rules! hash_impls {
  ($hash_name:ident, $hash_len:expr, $context_name:ident) => {
    impl $crate::crypto::CryptographicHash for $hash_name {
      type Context = $context_name;

      const HASH_LEN: usize = $hash_len;
      const NAME: &'static str = stringify!($hash_name);

      fn from_hash_bytes(hash_bytes: &[u8]) -> Option<Self> {
        let hash_bytes: [u8; $hash_len] = hash_bytes.try_into().ok()?;
        Some($hash_name(hash_bytes))
      }

      fn hash_bytes(&self) -> &[u8] {
        &self.0[..]
      }
    }

    /// The default value is all zeroes.
    impl core::default::Default for $hash_name {
      fn default() -> Self {
        Self([0u8; $hash_len])
      }
    }

    impl core::convert::AsRef<[u8]> for $hash_name {
      fn as_ref(&self) -> &[u8] {
        &self.0[..]
      }
    }

    impl core::fmt::Debug for $hash_name {
      fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
          f,
          "{}({})",
          stringify!($hash_name),
          &ShortHexDump(&self.0[..], 128)
        )
      }
    }

    impl core::fmt::Display for $hash_name {
      fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&ShortHexDump(&self.0[..], 128), f)
      }
    }

    impl From<$hash_name> for Value {
      fn from(hash: $hash_name) -> Self {
        Value::Bytes(Vec::from(&hash.0[..]))
      }
    }

    impl FromValue for $hash_name {
      fn from_value(value: Value) -> Option<Self> {
        match value {
          Value::Bytes(bytes) => {
            <$hash_name as CryptographicHash>::from_hash_bytes(&bytes)
          },
          _ => None,
        }
      }
    }
  };
}

/// flexbuf trait for cryptographic hash functions.
pub trait CryptographicHash:
  Copy + Default + Eq + Debug + AsRef<[u8]> + Send + Sync + 'static
{
  /// The length of the hash produced by the function, in bytes.
  const HASH_LEN: usize;

  /// A human readable name of the hash type, used in diagnostics.
  const NAME: &'static str;

  /// The type used for generating more hashes of this type.
  type Context: HashContext<Output = Self>;

  /// Calculate a new hash of this type from the byte slice provided.
  ///
  /// Note that, if you need to include more than just a single byte slice,
  /// you'll need to use this type's hash context instead.
  fn new(bytes: &[u8]) -> Self {
    let mut context = <Self as CryptographicHash>::Context::new();
    context.update(bytes);
    context.finish()
  }

  /// The raw hash bytes.
  fn hash_bytes(&self) -> &[u8];

  /// Create a new hash from a slice of bytes.
  ///
  /// Returns `None` unless the slice is exactly [`Self::HASH_LEN`] bytes long.
  fn from_hash_bytes(hash_bytes: &[u8]) -> Option<Self>;
}

/// An internal trait for cryptographic hash contexts.
pub trait HashContext {
  /// The type of output returned by this hash context
  type Output;

  /// Creates a new context
  fn new() -> Self;

  /// Update the context with additional data
  fn update(&mut self, bytes: &[u8]);

  /// Complete the calculation and return the hash value
  fn finish(self) -> Self::Output;
}

/// The length of a SHA-2 256 byte hash value, in bytes (=32)
pub const SHA2_256_DIGEST_BYTES: usize = 32;

/// A SHA-2 256-bit hash value
#[derive(Clone, Copy, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub struct Sha2Hash(pub [u8; SHA2_256_DIGEST_BYTES]);

/// A context for calculating a SHA-2 256-bit hash
pub struct Sha2Context(::sha2::Sha256);

impl HashContext for Sha2Context {
  type Output = Sha2Hash;

  fn new() -> Self {
    use ::sha2::Digest;
    Sha2Context(::sha2::Sha256::new())
  }

  fn update(&mut self, bytes: &[u8]) {
    use ::sha2::Digest;
    self.0.update(bytes);
  }

  fn finish(self) -> Self::Output {
    use ::sha2::Digest;
    let output = self.0.finalize();
    let mut hash_bytes = [0u8; SHA2_256_DIGEST_BYTES];
    hash_bytes.copy_from_slice(output.as_slice());
    Sha2Hash(hash_bytes)
  }
}

hash_impls!(Sha2Hash, SHA2_256_DIGEST_BYTES, Sha2Context);

#[cfg(feature = "blake3")]
pub use self::blake3::*;

#[cfg(feature = "blake3")]
mod blake3 {
  use super::*;

  /// The length of a Blake3 256-bit hash value, in bytes
  pub const BLAKE3_DIGEST_BYTES: usize = 32;

  /// A Blake3 256-bit hash value
  #[derive(Clone, Copy, Hash, PartialEq, PartialOrd, Eq, Ord)]
  #[repr(transparent)]
  pub struct Blake3Hash(pub [u8; BLAKE3_DIGEST_BYTES]);

  /// A context for calculating a Blake3 256-bit hash
  pub struct Blake3Context(::blake3::Hasher);

  impl HashContext for Blake3Context {
    type Output = Blake3Hash;

    fn new() -> Self {
      Blake3Context(::blake3::Hasher::new())
    }

    fn update(&mut self, bytes: &[u8]) {
      self.0.update(bytes);
    }

    fn finish(self) -> Self::Output {
      let hash = self.0.finalize();
      Blake3Hash(hash.into())
    }
  }

  hash_impls!(Blake3Hash, BLAKE3_DIGEST_BYTES, Blake3Context);
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn sha2_known_digest() {
    // SHA-256("abc")
    let hash = Sha2Hash::new(b"abc");
    assert_eq!(
      hex::encode(hash.hash_bytes()),
      "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
  }

  #[test]
  fn incremental_context_matches_one_shot() {
    let mut context = Sha2Context::new();
    context.update(b"hunter");
    context.update(b"2");
    assert_eq!(context.finish(), Sha2Hash::new(b"hunter2"));
  }

  #[test]
  fn from_hash_bytes_requires_exact_length() {
    assert!(Sha2Hash::from_hash_bytes(&[0u8; 31]).is_none());
    assert!(Sha2Hash::from_hash_bytes(&[0u8; 33]).is_none());
    let hash = Sha2Hash::from_hash_bytes(&[7u8; 32]).unwrap();
    assert_eq!(hash.as_ref(), &[7u8; 32][..]);
  }

  #[test]
  fn value_conversion() {
    let hash = Sha2Hash::new(b"hunter2");
    let value = Value::from(hash);
    assert_eq!(Sha2Hash::from_value(value), Some(hash));
    assert_eq!(Sha2Hash::from_value(Value::Bool(true)), None);
  }

  #[test]
  fn hash_names() {
    assert_eq!(Sha2Hash::NAME, "Sha2Hash");
    #[cfg(feature = "blake3")]
    assert_eq!(Blake3Hash::NAME, "Blake3Hash");
  }

  #[cfg(feature = "blake3")]
  #[test]
  fn blake3_differs_from_sha2() {
    let b = Blake3Hash::new(b"hunter2");
    let s = Sha2Hash::new(b"hunter2");
    assert_ne!(b.hash_bytes(), s.hash_bytes());
    assert_eq!(b.hash_bytes().len(), Blake3Hash::HASH_LEN);
  }
}
