/// A macro wrapper for returning an [`Result::Err`] that allows logging of
/// errors.
///
/// Specifically, in debug build mode, before an `Err` is returned a call is
/// made to the `log` macro named by `$level`, describing the error and where
/// it was created.  With the `backtrace` feature enabled, the stack backtrace
/// is logged at the same level.
///
/// Usage:  `err!(trace, U) -> U`.
macro_rules! err {
  ($level:ident, $error:expr) => {{
    let error = $error;

    #[cfg(debug_assertions)]
    {
      ::log::$level!("{}:{}: {:?}", file!(), line!(), &error);
      #[cfg(feature = "backtrace")]
      {
        let bt = backtrace::Backtrace::new();
        ::log::$level!("{:?}", bt);
      }
    }

    error
  }};
}

/// Returns [`FlexErr::OutOfBounds`] from the enclosing function if fewer than
/// `$num_bytes` bytes are available in `$buf`.
///
/// Evaluates to the slice `$buf[..$num_bytes]` otherwise.
///
/// [`FlexErr::OutOfBounds`]: crate::FlexErr::OutOfBounds
macro_rules! take_bytes {
  ($buf:expr, $num_bytes:expr) => {{
    let buf: &[u8] = $buf;
    let needed: usize = $num_bytes;
    match buf.get(..needed) {
      Some(bytes) => bytes,
      None => {
        return Err(err!(
          trace,
          $crate::FlexErr::OutOfBounds {
            index:  needed,
            length: buf.len(),
          }
        ))
      },
    }
  }};
}
