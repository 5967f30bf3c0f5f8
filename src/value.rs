//! The dynamically typed values carried between field codecs and containers.
//!
//! A [`Fields`] map is what the schema interpreter produces when decoding and
//! consumes when encoding.  Domain types convert to and from it in
//! [`Container::to_fields`] and [`Container::from_fields`].
//!
//! [`Container::to_fields`]: crate::Container::to_fields
//! [`Container::from_fields`]: crate::Container::from_fields
use crate::util::debug::BytesDump;
use alloc::{
  boxed::Box,
  collections::BTreeMap,
  string::{String, ToString},
  vec::Vec,
};
use core::{
  any::{type_name, Any},
  fmt::{Debug, Formatter},
};

/// A single field value.
pub enum Value {
  Bool(bool),
  /// Fixed-width, variable-width and enumerated integers.
  Uint(u128),
  /// Raw payloads of custom codecs, including digests.
  Bytes(Vec<u8>),
  Text(String),
  Array(Vec<Value>),
  /// A nested container instance.
  Object(Box<dyn Object>),
}

impl Value {
  /// Wraps a nested container.
  pub fn object<T: Object>(object: T) -> Self {
    Value::Object(Box::new(object))
  }

  /// Wraps a slice of nested containers as an array value.
  pub fn objects<T: Object + Clone>(objects: &[T]) -> Self {
    Value::Array(objects.iter().cloned().map(Value::object).collect())
  }

  /// Converts every item into a value, forming an array value.
  pub fn array<I>(items: I) -> Self
  where
    I: IntoIterator,
    I::Item: Into<Value>,
  {
    Value::Array(items.into_iter().map(Into::into).collect())
  }

  /// The name of the variant, used in diagnostics.
  pub fn kind(&self) -> &'static str {
    match self {
      Value::Bool(_) => "Bool",
      Value::Uint(_) => "Uint",
      Value::Bytes(_) => "Bytes",
      Value::Text(_) => "Text",
      Value::Array(_) => "Array",
      Value::Object(_) => "Object",
    }
  }

  pub fn as_uint(&self) -> Option<u128> {
    match self {
      Value::Uint(value) => Some(*value),
      _ => None,
    }
  }

  pub fn as_bytes(&self) -> Option<&[u8]> {
    match self {
      Value::Bytes(bytes) => Some(bytes),
      _ => None,
    }
  }

  pub fn as_object(&self) -> Option<&dyn Object> {
    match self {
      Value::Object(object) => Some(object.as_ref()),
      _ => None,
    }
  }
}

impl Clone for Value {
  fn clone(&self) -> Self {
    match self {
      Value::Bool(v) => Value::Bool(*v),
      Value::Uint(v) => Value::Uint(*v),
      Value::Bytes(v) => Value::Bytes(v.clone()),
      Value::Text(v) => Value::Text(v.clone()),
      Value::Array(v) => Value::Array(v.clone()),
      Value::Object(v) => Value::Object((**v).clone_object()),
    }
  }
}

impl Debug for Value {
  fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
    match self {
      Value::Bool(v) => Debug::fmt(v, f),
      Value::Uint(v) => Debug::fmt(v, f),
      Value::Bytes(v) => Debug::fmt(&BytesDump(v), f),
      Value::Text(v) => Debug::fmt(v, f),
      Value::Array(v) => f.debug_list().entries(v.iter()).finish(),
      Value::Object(v) => Debug::fmt(v, f),
    }
  }
}

/// A type-erased nested container, as stored in [`Value::Object`].
///
/// Implemented for every `'static` type that is `Clone + Debug + Send + Sync`.
pub trait Object: Any + Debug + Send + Sync {
  fn as_any(&self) -> &dyn Any;
  fn into_any(self: Box<Self>) -> Box<dyn Any>;
  fn clone_object(&self) -> Box<dyn Object>;
  fn type_name(&self) -> &'static str;
}

impl<T> Object for T
where
  T: Any + Clone + Debug + Send + Sync,
{
  fn as_any(&self) -> &dyn Any {
    self
  }

  fn into_any(self: Box<Self>) -> Box<dyn Any> {
    self
  }

  fn clone_object(&self) -> Box<dyn Object> {
    Box::new(self.clone())
  }

  fn type_name(&self) -> &'static str {
    type_name::<T>()
  }
}

/// Conversion out of a [`Value`], returning `None` on a kind mismatch.
pub trait FromValue: Sized {
  fn from_value(value: Value) -> Option<Self>;
}

impl FromValue for Value {
  fn from_value(value: Value) -> Option<Self> {
    Some(value)
  }
}

impl FromValue for bool {
  fn from_value(value: Value) -> Option<Self> {
    match value {
      Value::Bool(v) => Some(v),
      _ => None,
    }
  }
}

impl FromValue for String {
  fn from_value(value: Value) -> Option<Self> {
    match value {
      Value::Text(v) => Some(v),
      _ => None,
    }
  }
}

impl FromValue for Vec<u8> {
  fn from_value(value: Value) -> Option<Self> {
    match value {
      Value::Bytes(v) => Some(v),
      _ => None,
    }
  }
}

impl<const N: usize> FromValue for [u8; N] {
  fn from_value(value: Value) -> Option<Self> {
    match value {
      Value::Bytes(v) => v.try_into().ok(),
      _ => None,
    }
  }
}

impl From<String> for Value {
  fn from(v: String) -> Self {
    Value::Text(v)
  }
}

impl From<&str> for Value {
  fn from(v: &str) -> Self {
    Value::Text(v.to_string())
  }
}

impl From<bool> for Value {
  fn from(v: bool) -> Self {
    Value::Bool(v)
  }
}

impl From<Vec<u8>> for Value {
  fn from(v: Vec<u8>) -> Self {
    Value::Bytes(v)
  }
}

impl From<&[u8]> for Value {
  fn from(v: &[u8]) -> Self {
    Value::Bytes(Vec::from(v))
  }
}

impl<const N: usize> From<[u8; N]> for Value {
  fn from(v: [u8; N]) -> Self {
    Value::Bytes(Vec::from(&v[..]))
  }
}

macro_rules! uint_value {
  ($($prim:ident),*) => {
    $(
      impl From<$prim> for Value {
        fn from(v: $prim) -> Self {
          Value::Uint(v as u128)
        }
      }

      impl FromValue for $prim {
        fn from_value(value: Value) -> Option<Self> {
          match value {
            Value::Uint(v) => $prim::try_from(v).ok(),
            _ => None,
          }
        }
      }
    )*
  };
}

uint_value!(u8, u16, u32, u64, u128, usize);

/// The key to value mapping of one container's fields.
///
/// Keys are the `&'static str` keys of the container's schema.
#[derive(Clone, Default)]
pub struct Fields(BTreeMap<&'static str, Value>);

impl Fields {
  pub fn new() -> Self {
    Fields(BTreeMap::new())
  }

  /// Builder-style insertion, for use in [`Container::to_fields`].
  ///
  /// [`Container::to_fields`]: crate::Container::to_fields
  pub fn with(mut self, key: &'static str, value: impl Into<Value>) -> Self {
    self.insert(key, value.into());
    self
  }

  /// Inserts a value, returning any value previously stored under `key`.
  pub fn insert(&mut self, key: &'static str, value: Value) -> Option<Value> {
    self.0.insert(key, value)
  }

  pub fn get(&self, key: &str) -> Option<&Value> {
    self.0.get(key)
  }

  /// Removes the value stored under `key`.
  pub fn remove(&mut self, key: &str) -> Option<Value> {
    self.0.remove(key)
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// Removes and converts the value stored under `key`.
  ///
  /// Returns `None` if the key is missing or holds a different kind of value.
  pub fn take<T: FromValue>(&mut self, key: &str) -> Option<T> {
    T::from_value(self.remove(key)?)
  }

  /// Removes an array value and converts each of its items.
  pub fn take_array<T: FromValue>(&mut self, key: &str) -> Option<Vec<T>> {
    match self.remove(key)? {
      Value::Array(items) => items.into_iter().map(T::from_value).collect(),
      _ => None,
    }
  }

  /// Removes a nested container of type `T`.
  pub fn take_object<T: Any>(&mut self, key: &str) -> Option<T> {
    downcast_object(self.remove(key)?)
  }

  /// Removes an array of nested containers of type `T`.
  pub fn take_objects<T: Any>(&mut self, key: &str) -> Option<Vec<T>> {
    match self.remove(key)? {
      Value::Array(items) => items.into_iter().map(downcast_object).collect(),
      _ => None,
    }
  }

  pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> + '_ {
    self.0.iter().map(|(key, value)| (*key, value))
  }
}

impl Debug for Fields {
  fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
    f.debug_map().entries(self.iter()).finish()
  }
}

fn downcast_object<T: Any>(value: Value) -> Option<T> {
  match value {
    Value::Object(object) => object.into_any().downcast::<T>().ok().map(|b| *b),
    _ => None,
  }
}
