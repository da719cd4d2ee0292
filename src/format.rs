//! # R Serialization Format Constants
//!
//! Wire-level constants for R serialization format **version 2**, native
//! binary (`"B\n"`) variant, as implemented by R's `src/main/serialize.c`
//! and documented in the *R Internals* manual ("Serialization Formats").
//! Format version 2 has been emitted by every R release since 2.4.0 and is
//! readable by every release since 2.3.0, which makes it the safest target
//! for external producers.
//!
//! Every serialized item starts with a 32-bit *flags* word:
//!
//! ```text
//! bits  0..7   SEXP type tag (REALSXP, STRSXP, ...)
//! bit   8      object bit        (unused here)
//! bit   9      has-attributes bit
//! bit   10     has-tag bit       (pairlist nodes)
//! bits  12..   GP "levels" bits  (character encoding for CHARSXP)
//! ```
//!
//! All multi-byte fields are written in the host's native byte order; that
//! is exactly what distinguishes the `"B\n"` stream from the portable
//! `"X\n"` (XDR) variant, which this crate deliberately does not produce.

/// Stream magic for the native binary variant (`"X\n"` would be XDR).
pub const FORMAT_MAGIC: &[u8; 2] = b"B\n";

/// Serialization format version emitted by this crate.
pub const FORMAT_VERSION: i32 = 2;

/// Version of R this writer claims compatibility with (R 3.5.0).
pub const WRITER_VERSION: i32 = pack_r_version(3, 5, 0);

/// Minimum R version able to read a version-2 stream (R 2.3.0).
pub const MIN_READER_VERSION: i32 = pack_r_version(2, 3, 0);

/// Total size of the stream prelude written by the header writer:
/// 2-byte magic plus five 4-byte integers.
pub const HEADER_LEN: usize = 22;

/// Per-item overhead of a serialized vector block: flags word plus length.
pub const VECTOR_OVERHEAD: usize = 8;

/// SEXP type tag for a symbol.
pub const SYMSXP: i32 = 1;

/// SEXP type tag for a pairlist node.
pub const LISTSXP: i32 = 2;

/// SEXP type tag for an internal character string.
pub const CHARSXP: i32 = 9;

/// SEXP type tag for an integer vector.
pub const INTSXP: i32 = 13;

/// SEXP type tag for a double (numeric) vector.
pub const REALSXP: i32 = 14;

/// SEXP type tag for a character vector.
pub const STRSXP: i32 = 16;

/// SEXP type tag for a generic list (what R calls a `list(...)`).
pub const VECSXP: i32 = 19;

/// Pseudo-tag standing in for R's `NULL`, used to terminate pairlists.
pub const NILVALUE: i32 = 254;

/// Flags bit marking an item as carrying an attribute pairlist.
pub const HAS_ATTR: i32 = 1 << 9;

/// Flags bit marking a pairlist node as carrying a tag (its name symbol).
pub const HAS_TAG: i32 = 1 << 10;

/// GP levels bit declaring a CHARSXP's bytes to be ASCII.
pub const ASCII_LEVELS: i32 = 64;

/// Flags word opening the top-level list: `VECSXP | HAS_ATTR` (`0x213`).
/// The attribute bit announces the trailing names block.
pub const LIST_FLAGS: i32 = VECSXP | HAS_ATTR;

/// Flags word for every character element: `CHARSXP` with the ASCII levels
/// bit shifted into position (`0x40009`), matching what R itself writes for
/// ASCII string data.
pub const CHARSXP_FLAGS: i32 = CHARSXP | (ASCII_LEVELS << 12);

/// Flags word for the attribute pairlist node: `LISTSXP | HAS_TAG` (`0x402`).
pub const ATTR_PAIRLIST_FLAGS: i32 = LISTSXP | HAS_TAG;

/// Symbol name tagging the names attribute.
pub const NAMES_SYMBOL: &[u8] = b"names";

/// Packs an R version triple the way R's `R_Version` macro does.
const fn pack_r_version(major: i32, minor: i32, patch: i32) -> i32 {
    (major << 16) | (minor << 8) | patch
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_packing() {
        assert_eq!(WRITER_VERSION, 0x030500);
        assert_eq!(MIN_READER_VERSION, 0x020300);
    }

    #[test]
    fn test_packed_flag_words() {
        // Reference values taken from hex dumps of R's own serialize() output.
        assert_eq!(LIST_FLAGS, 0x213);
        assert_eq!(CHARSXP_FLAGS, 0x40009);
        assert_eq!(ATTR_PAIRLIST_FLAGS, 0x402);
    }

    #[test]
    fn test_header_len_matches_prelude() {
        assert_eq!(HEADER_LEN, FORMAT_MAGIC.len() + 5 * 4);
    }
}
