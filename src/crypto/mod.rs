//! Cryptographic hashing used by [`HashableContainer`]s.
//!
//! Note that flexbuf itself does not contain any cryptographic code, but does
//! have its own internal API to those functions so that containers can choose
//! the digest they embed.
//!
//! [`HashableContainer`]: crate::HashableContainer
mod hash;

pub use self::hash::*;
