//! The unbounded, self-terminating count encoding.
//!
//! A count is written as its base-15 digits, most significant first, one digit
//! per nibble, followed by a terminator nibble of `0xF`.  Since no digit can
//! be `0xF`, the first `0xF` nibble always ends the count.  If the number of
//! nibbles is odd, a leading `0x0` nibble pads the encoding to whole bytes.
//!
//! | count | nibbles      | bytes          |
//! |-------|--------------|----------------|
//! | 0     | `0 F`        | `0F`           |
//! | 14    | `E F`        | `EF`           |
//! | 15    | `0 1 0 F`    | `01 0F`        |
//! | 255   | `1 2 0 F`    | `12 0F`        |
use crate::{util::OkOrLog, FlexErr};
use alloc::vec::Vec;

const TERMINATOR: u8 = 0xF;
const RADIX: usize = 15;

/// Encodes `count` as an unbounded length prefix.
pub fn encode_length(count: usize) -> Vec<u8> {
  // Base-15 digits, least significant first.
  let mut digits = Vec::with_capacity(16);
  let mut remaining = count;
  loop {
    digits.push((remaining % RADIX) as u8);
    remaining /= RADIX;
    if remaining == 0 {
      break;
    }
  }

  let mut nibbles = Vec::with_capacity(digits.len() + 2);
  if (digits.len() + 1) % 2 != 0 {
    nibbles.push(0);
  }
  nibbles.extend(digits.iter().rev());
  nibbles.push(TERMINATOR);

  nibbles.chunks_exact(2).map(|pair| (pair[0] << 4) | pair[1]).collect()
}

/// Decodes an unbounded length prefix from the start of `source`.
///
/// Returns the count and the number of bytes the prefix occupied.  Any bytes
/// after the terminator are left untouched.
pub fn decode_length(source: &[u8]) -> Result<(usize, usize), FlexErr> {
  let mut count = 0usize;
  let nibbles = source.iter().flat_map(|byte| [byte >> 4, byte & 0x0F]);

  for (index, nibble) in nibbles.enumerate() {
    if nibble == TERMINATOR {
      // `index` digits precede the terminator.
      return Ok((count, (index + 1).div_ceil(2)));
    }
    count = count
      .checked_mul(RADIX)
      .and_then(|c| c.checked_add(nibble as usize))
      .ok_or_log(log::Level::Debug, FlexErr::LengthOverflow)?;
  }

  Err(err!(debug, FlexErr::LengthTerminatorMissing))
}

/// The number of bytes [`encode_length`] produces for `count`.
pub fn encoded_length_len(count: usize) -> usize {
  let mut digits = 1usize;
  let mut remaining = count / RADIX;
  while remaining > 0 {
    digits += 1;
    remaining /= RADIX;
  }
  (digits + 1).div_ceil(2)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::util::init_test_logger;
  use alloc::vec;
  use rand::{Rng, SeedableRng};
  use rand_chacha::ChaCha20Rng;

  #[test]
  fn zero_is_a_single_terminated_byte() {
    assert_eq!(encode_length(0), vec![0x0F]);
    assert_eq!(decode_length(&[0x0F]), Ok((0, 1)));
  }

  #[test]
  fn known_encodings() {
    assert_eq!(encode_length(14), vec![0xEF]);
    assert_eq!(encode_length(15), vec![0x01, 0x0F]);
    assert_eq!(encode_length(99), vec![0x06, 0x9F]);
    assert_eq!(encode_length(255), vec![0x12, 0x0F]);
    assert_eq!(encode_length(224), vec![0x0E, 0xEF]);
    assert_eq!(encode_length(225), vec![0x10, 0x0F]);
  }

  #[test]
  fn round_trip_is_minimal() {
    init_test_logger();
    let mut rng = ChaCha20Rng::from_seed([0x42; 32]);
    let edges = [0usize, 1, 14, 15, 16, 224, 225, 3374, 3375, usize::MAX];
    let randoms = (0..200).map(|_| rng.gen::<usize>() >> rng.gen_range(0..64));

    for count in edges.into_iter().chain(randoms) {
      let encoded = encode_length(count);
      assert_eq!(encoded.len(), encoded_length_len(count), "count {count}");
      assert_eq!(decode_length(&encoded), Ok((count, encoded.len())));
    }
  }

  #[test]
  fn encoded_len_grows_every_other_digit() {
    let widths = [(0, 1), (14, 1), (15, 2), (3374, 2), (3375, 3)];
    for (count, len) in widths {
      assert_eq!(encoded_length_len(count), len, "count {count}");
    }
  }

  #[test]
  fn concatenated_counts() {
    let mut buf = encode_length(4000);
    let first_len = buf.len();
    buf.extend(encode_length(7));

    let (first, offset) = decode_length(&buf).unwrap();
    assert_eq!((first, offset), (4000, first_len));
    assert_eq!(decode_length(&buf[offset..]), Ok((7, 1)));
  }

  #[test]
  fn trailing_bytes_are_ignored() {
    assert_eq!(decode_length(&[0xEF, 0xFF, 0x12]), Ok((14, 1)));
  }

  #[test]
  fn terminator_in_high_nibble() {
    // Not produced by the encoder, but scanning stops at the first 0xF nibble.
    assert_eq!(decode_length(&[0x12, 0xF0]), Ok((17, 2)));
    assert_eq!(decode_length(&[0xF3]), Ok((0, 1)));
  }

  #[test]
  fn missing_terminator() {
    init_test_logger();
    assert_eq!(decode_length(&[]), Err(FlexErr::LengthTerminatorMissing));
    assert_eq!(
      decode_length(&[0x12, 0x34]),
      Err(FlexErr::LengthTerminatorMissing)
    );
  }

  #[test]
  fn overflow() {
    init_test_logger();
    let buf = [0xEEu8; 40];
    assert_eq!(decode_length(&buf), Err(FlexErr::LengthOverflow));
  }
}
