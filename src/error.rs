use alloc::{boxed::Box, string::FromUtf8Error};
use core::{
  fmt::{Debug, Display, Formatter},
  num::TryFromIntError,
  str::Utf8Error,
};

/// Errors produced while encoding or decoding containers.
///
/// Decoding errors are only visible through [`Container::try_from_decoded`];
/// the regular decoding API collapses all of them into `None`.
///
/// [`Container::try_from_decoded`]: crate::Container::try_from_decoded
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlexErr {
  /// Fewer bytes were available than a codec needed.
  OutOfBounds {
    index:  usize,
    length: usize,
  },

  /// Strict decoding finished without consuming exactly the whole buffer.
  ///
  /// Covers both trailing bytes and truncated input.
  LengthMismatch {
    consumed: usize,
    length:   usize,
  },

  /// A fixed-width value did not have the required number of bytes.
  FixedWidthMismatch {
    expected: usize,
    observed: usize,
  },

  /// An integer does not fit in the number of bytes available to encode it.
  IntOverflow {
    value: u128,
    width: usize,
  },

  /// A decoded integer has more significant bytes than a `u128` can hold.
  IntTooWide(usize),

  /// A boolean byte was neither `0` nor `1`.
  IllegalBool(u8),

  /// An enumerated value was not in the allowed set.
  NotInSet(u128),

  /// A payload is longer than its length prefix can express.
  PrefixOverflow {
    len:          usize,
    prefix_width: usize,
  },

  /// An unbounded length prefix had no terminator nibble.
  LengthTerminatorMissing,

  /// An unbounded length prefix describes a count larger than `usize::MAX`.
  LengthOverflow,

  /// Nested containers or arrays were deeper than [`MAX_DECODE_DEPTH`].
  ///
  /// [`MAX_DECODE_DEPTH`]: crate::MAX_DECODE_DEPTH
  DepthExceeded(usize),

  /// A field codec was handed a value of the wrong kind.
  UnexpectedValue {
    expected: &'static str,
    observed: &'static str,
  },

  /// A nested value was a container of some other type.
  WrongObjectType {
    expected: &'static str,
    observed: &'static str,
  },

  /// A value was missing from the field map during encoding.
  MissingField(&'static str),

  /// Encoding the named field failed.
  EncodeField {
    key:   &'static str,
    cause: Box<FlexErr>,
  },

  /// Decoding the named field failed.
  DecodeField {
    key:   &'static str,
    cause: Box<FlexErr>,
  },

  /// A caller-supplied transform function refused a value.
  TransformFailed,

  /// Bytes were not valid UTF-8.
  InvalidUtf8,

  /// A string was not valid hexadecimal.
  InvalidHex,

  /// An overflow occurred during a checked integer type conversion.
  IntConversionOverflow,

  /// The reconstruction hook of the target type refused the decoded fields.
  Rejected(&'static str),

  /// Data did not match an expected hash.
  ///
  /// This should typically be caused by corrupt (or malicious) data.
  HashMismatch,
}

impl FlexErr {
  /// The innermost error, looking through field context.
  pub fn root_cause(&self) -> &FlexErr {
    match self {
      FlexErr::EncodeField { cause, .. }
      | FlexErr::DecodeField { cause, .. } => cause.root_cause(),
      other => other,
    }
  }
}

impl Display for FlexErr {
  fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
    Debug::fmt(self, f)
  }
}

#[cfg(feature = "std")]
impl std::error::Error for FlexErr {}

impl From<Utf8Error> for FlexErr {
  fn from(_src: Utf8Error) -> Self {
    FlexErr::InvalidUtf8
  }
}

impl From<FromUtf8Error> for FlexErr {
  fn from(_src: FromUtf8Error) -> Self {
    FlexErr::InvalidUtf8
  }
}

impl From<TryFromIntError> for FlexErr {
  fn from(_value: TryFromIntError) -> Self {
    FlexErr::IntConversionOverflow
  }
}

impl From<hex::FromHexError> for FlexErr {
  fn from(_value: hex::FromHexError) -> Self {
    FlexErr::InvalidHex
  }
}
