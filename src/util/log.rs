use core::fmt::Debug;
use log::{Level, STATIC_MAX_LEVEL};

/// When enabling backtraces, the number of stack frames to log.
#[cfg(feature = "backtrace")]
const SHORT_BACKTRACE_LOG_FRAMES: usize = 2;

/// Utility trait for error reporting, primarily used with [`Option`].
///
/// This provides an alternative to `Option`'s `ok_or()` and `ok_or_else()`,
/// so that the error is reported at the point it is generated rather than
/// wherever it is eventually caught.  Catching and reporting errors further up
/// the call stack frequently does not provide enough information to be useful
/// for debugging purposes.
pub(crate) trait OkOrLog<O, E>: Sized
where
  E: Debug,
{
  fn ok_or_log(self, level: Level, error: E) -> Result<O, E>;
}

impl<O, E> OkOrLog<O, E> for Option<O>
where
  E: Debug,
{
  #[inline(always)]
  fn ok_or_log(self, level: Level, error: E) -> Result<O, E> {
    match self {
      Some(value) => Ok(value),
      None => {
        log::log!(level, "{:?}", error);
        Err(error)
      },
    }
  }
}

/// Logs the error of a [`Result`] (if any) without otherwise changing it.
///
/// Used where an error is about to be discarded, e.g. when decoding failures
/// are collapsed to `None`.
pub(crate) trait LogErr<O, E>
where
  E: Debug,
{
  fn log_err(self, level: Level) -> Result<O, E>;
}

impl<O, E> LogErr<O, E> for Result<O, E>
where
  E: Debug,
{
  #[inline(always)]
  fn log_err(self, level: Level) -> Result<O, E> {
    match self {
      Ok(value) => Ok(value),
      Err(error) => {
        // Const comparison allows dead code elimination.
        if level <= STATIC_MAX_LEVEL {
          log::log!(level, "{:?}", error);
          #[cfg(feature = "backtrace")]
          {
            let mut bt = backtrace::Backtrace::new_unresolved();
            bt.resolve();
            for frame in
              bt.frames().iter().skip(1).take(SHORT_BACKTRACE_LOG_FRAMES)
            {
              log::trace!("{frame:?}");
            }
          }
        }
        Err(error)
      },
    }
  }
}
