//! Misc non-public utility code for the flexbuf crate itself.
pub(crate) mod debug;
mod log;

#[cfg(test)]
mod test;

#[cfg(test)]
pub(crate) use self::test::*;
pub(crate) use self::log::*;
