//! # Binary Vector Encoders
//!
//! The core write operations: a stream prelude, one encoder per vector
//! element type, and the trailing names block. Together they produce a byte
//! stream that R's `unserialize()` reads back as a named `list()` of atomic
//! vectors, which is a data frame's columns, essentially.
//!
//! ## Design Principles
//!
//! 1. **Stateless calls**: every function is one self-contained write over a
//!    borrowed sink. Nothing is buffered or remembered between calls, so the
//!    call sequence *is* the object structure (see the crate docs for the
//!    required order). The [`ObjectWriter`](crate::object_writer::ObjectWriter)
//!    wrapper enforces that order for callers who want it checked.
//!
//! 2. **Native byte order**: doubles and integers go out as their in-memory
//!    representation. The portable XDR variant is out of scope; there is no
//!    byte swapping anywhere.
//!
//! 3. **Fail fast**: arguments are validated before the first byte goes out,
//!    and an I/O failure aborts the call immediately. There is no retry and
//!    no rollback: after an [`EncodeError::Io`] the sink may hold a
//!    partially written element, and that is the caller's signal to abandon
//!    the object.
//!
//! Each function returns the exact number of bytes written, which is a pure
//! function of its arguments (see the per-function docs).

use std::io::Write;

use byteorder::{NativeEndian, WriteBytesExt};
use log::trace;

use crate::format::{
    ATTR_PAIRLIST_FLAGS, CHARSXP_FLAGS, FORMAT_MAGIC, FORMAT_VERSION, HEADER_LEN, INTSXP,
    LIST_FLAGS, MIN_READER_VERSION, NAMES_SYMBOL, NILVALUE, REALSXP, STRSXP, SYMSXP,
    VECTOR_OVERHEAD, WRITER_VERSION,
};

/// Errors that can occur while encoding
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// The underlying sink refused or truncated a write
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Element count (or string byte length) does not fit the wire format
    #[error("vector of {len} elements exceeds the format's i32 length field")]
    TooLong {
        /// Number of elements (or bytes, for a single string) that overflowed
        len: usize,
    },
}

/// Converts a slice length to the format's 32-bit length field.
///
/// Rejects anything past `i32::MAX` up front so that oversized input never
/// produces a truncated length word mid-stream.
fn vector_length(len: usize) -> Result<i32, EncodeError> {
    i32::try_from(len).map_err(|_| EncodeError::TooLong { len })
}

/// Writes the stream prelude declaring a list of `length` attributes.
///
/// The output is always [`HEADER_LEN`] (22) bytes: the `"B\n"` magic, three
/// version integers, and the flags/length pair opening the top-level list.
/// The declared `length` is a protocol invariant: the caller must follow up
/// with exactly that many vector writes and a names write of the same
/// cardinality. This function does not track the promise.
pub fn write_header<W: Write>(sink: &mut W, length: usize) -> Result<usize, EncodeError> {
    let length = vector_length(length)?;

    sink.write_all(FORMAT_MAGIC)?;
    sink.write_i32::<NativeEndian>(FORMAT_VERSION)?;
    sink.write_i32::<NativeEndian>(WRITER_VERSION)?;
    sink.write_i32::<NativeEndian>(MIN_READER_VERSION)?;
    sink.write_i32::<NativeEndian>(LIST_FLAGS)?;
    sink.write_i32::<NativeEndian>(length)?;

    trace!("header: list of {} attributes", length);
    Ok(HEADER_LEN)
}

/// Writes one double (numeric) vector: REALSXP tag, element count, then the
/// raw IEEE-754 payload.
///
/// Byte count is `8 + 8 * values.len()`. NaN payloads and signed zeros pass
/// through bit-for-bit.
pub fn write_doubles<W: Write>(sink: &mut W, values: &[f64]) -> Result<usize, EncodeError> {
    let length = vector_length(values.len())?;

    sink.write_i32::<NativeEndian>(REALSXP)?;
    sink.write_i32::<NativeEndian>(length)?;
    for &value in values {
        sink.write_f64::<NativeEndian>(value)?;
    }

    trace!("doubles: {} elements", values.len());
    Ok(VECTOR_OVERHEAD + 8 * values.len())
}

/// Writes one integer vector: INTSXP tag, element count, then the raw
/// 32-bit payload.
///
/// Byte count is `8 + 4 * values.len()`. Note that `i32::MIN` is R's
/// `NA_integer_` sentinel; passing it through encodes an NA, which is
/// occasionally exactly what the caller wants.
pub fn write_ints<W: Write>(sink: &mut W, values: &[i32]) -> Result<usize, EncodeError> {
    let length = vector_length(values.len())?;

    sink.write_i32::<NativeEndian>(INTSXP)?;
    sink.write_i32::<NativeEndian>(length)?;
    for &value in values {
        sink.write_i32::<NativeEndian>(value)?;
    }

    trace!("ints: {} elements", values.len());
    Ok(VECTOR_OVERHEAD + 4 * values.len())
}

/// Writes one character vector: STRSXP tag, element count, then one CHARSXP
/// (flags, byte length, raw bytes) per element.
///
/// Element byte lengths come from the slices themselves; the buffer is
/// never scanned for terminators, so embedded NUL bytes are preserved.
/// Empty strings are legal elements. Byte count is
/// `8 + sum(8 + s.len() for s in strings)`.
pub fn write_strings<W, S>(sink: &mut W, strings: &[S]) -> Result<usize, EncodeError>
where
    W: Write,
    S: AsRef<[u8]>,
{
    let length = vector_length(strings.len())?;
    // Validate every element length before the first byte goes out.
    for s in strings {
        vector_length(s.as_ref().len())?;
    }

    let mut written = VECTOR_OVERHEAD;
    sink.write_i32::<NativeEndian>(STRSXP)?;
    sink.write_i32::<NativeEndian>(length)?;
    for s in strings {
        written += write_charsxp(sink, s.as_ref())?;
    }

    trace!("strings: {} elements, {} bytes", strings.len(), written);
    Ok(written)
}

/// Writes the names block, closing the attribute list the header opened.
///
/// Mechanically this is the attribute pairlist node, the `names` symbol,
/// the labels as a character vector, and the NILVALUE terminator. The
/// caller must supply exactly as many names as it declared to
/// [`write_header`]; a mismatch is not detected here and produces a stream
/// that `unserialize()` will reject or mislabel.
pub fn write_names<W, S>(sink: &mut W, names: &[S]) -> Result<usize, EncodeError>
where
    W: Write,
    S: AsRef<[u8]>,
{
    vector_length(names.len())?;
    for s in names {
        vector_length(s.as_ref().len())?;
    }

    let mut written = 0usize;

    // Attribute pairlist node tagged with the `names` symbol.
    sink.write_i32::<NativeEndian>(ATTR_PAIRLIST_FLAGS)?;
    sink.write_i32::<NativeEndian>(SYMSXP)?;
    written += 8;
    written += write_charsxp(sink, NAMES_SYMBOL)?;

    // CAR: the labels themselves.
    written += write_strings(sink, names)?;

    // CDR: NULL terminates the attribute list.
    sink.write_i32::<NativeEndian>(NILVALUE)?;
    written += 4;

    trace!("names: {} labels, {} bytes", names.len(), written);
    Ok(written)
}

/// Writes a single CHARSXP item: flags, byte length, raw bytes.
fn write_charsxp<W: Write>(sink: &mut W, bytes: &[u8]) -> Result<usize, EncodeError> {
    let length = vector_length(bytes.len())?;

    sink.write_i32::<NativeEndian>(CHARSXP_FLAGS)?;
    sink.write_i32::<NativeEndian>(length)?;
    sink.write_all(bytes)?;

    Ok(VECTOR_OVERHEAD + bytes.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Write};

    #[test]
    fn test_header_is_fixed_size() {
        for length in [0usize, 1, 3, 1_000_000] {
            let mut out = Vec::new();
            let written = write_header(&mut out, length).unwrap();
            assert_eq!(written, HEADER_LEN);
            assert_eq!(out.len(), HEADER_LEN);
        }
    }

    #[test]
    fn test_header_is_deterministic() {
        let mut first = Vec::new();
        let mut second = Vec::new();
        write_header(&mut first, 3).unwrap();
        write_header(&mut second, 3).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_header_layout() {
        let mut out = Vec::new();
        write_header(&mut out, 2).unwrap();

        assert_eq!(&out[..2], b"B\n");
        assert_eq!(out[2..6], 2i32.to_ne_bytes());
        assert_eq!(out[6..10], 0x030500i32.to_ne_bytes());
        assert_eq!(out[10..14], 0x020300i32.to_ne_bytes());
        assert_eq!(out[14..18], 0x213i32.to_ne_bytes());
        assert_eq!(out[18..22], 2i32.to_ne_bytes());
    }

    #[test]
    fn test_doubles_layout_and_count() {
        let values = [1.5f64, -0.0, f64::NAN];
        let mut out = Vec::new();
        let written = write_doubles(&mut out, &values).unwrap();

        assert_eq!(written, 8 + 8 * values.len());
        assert_eq!(out.len(), written);
        assert_eq!(out[0..4], 14i32.to_ne_bytes());
        assert_eq!(out[4..8], 3i32.to_ne_bytes());
        // Bit-for-bit payload, NaN included.
        assert_eq!(out[8..16], 1.5f64.to_ne_bytes());
        assert_eq!(out[16..24], (-0.0f64).to_ne_bytes());
        assert_eq!(out[24..32], f64::NAN.to_ne_bytes());
    }

    #[test]
    fn test_ints_layout_and_count() {
        let values = [7, -1, i32::MIN];
        let mut out = Vec::new();
        let written = write_ints(&mut out, &values).unwrap();

        assert_eq!(written, 8 + 4 * values.len());
        assert_eq!(out[0..4], 13i32.to_ne_bytes());
        assert_eq!(out[4..8], 3i32.to_ne_bytes());
        assert_eq!(out[8..12], 7i32.to_ne_bytes());
        assert_eq!(out[16..20], i32::MIN.to_ne_bytes());
    }

    #[test]
    fn test_empty_vectors() {
        let mut out = Vec::new();
        assert_eq!(write_doubles(&mut out, &[]).unwrap(), 8);
        assert_eq!(write_ints(&mut out, &[]).unwrap(), 8);
        assert_eq!(write_strings::<_, &str>(&mut out, &[]).unwrap(), 8);
        assert_eq!(out.len(), 24);
    }

    #[test]
    fn test_strings_byte_count_formula() {
        let strings = ["alpha", "", "b"];
        let mut out = Vec::new();
        let written = write_strings(&mut out, &strings).unwrap();

        let expected: usize = 8 + strings.iter().map(|s| 8 + s.len()).sum::<usize>();
        assert_eq!(written, expected);
        assert_eq!(out.len(), expected);
    }

    #[test]
    fn test_empty_string_is_one_element() {
        let mut out = Vec::new();
        let written = write_strings(&mut out, &[""]).unwrap();

        assert_eq!(written, 8 + 8);
        assert_eq!(out[4..8], 1i32.to_ne_bytes());
        assert_eq!(out[8..12], 0x40009i32.to_ne_bytes());
        assert_eq!(out[12..16], 0i32.to_ne_bytes());
    }

    #[test]
    fn test_strings_preserve_embedded_nul() {
        let mut out = Vec::new();
        let written = write_strings(&mut out, &[&b"a\0b"[..]]).unwrap();

        assert_eq!(written, 8 + 8 + 3);
        assert_eq!(&out[16..19], b"a\0b");
    }

    #[test]
    fn test_names_layout() {
        let mut out = Vec::new();
        let written = write_names(&mut out, &["x", "y"]).unwrap();

        // Pairlist node + symbol.
        assert_eq!(out[0..4], 0x402i32.to_ne_bytes());
        assert_eq!(out[4..8], 1i32.to_ne_bytes());
        // CHARSXP "names".
        assert_eq!(out[8..12], 0x40009i32.to_ne_bytes());
        assert_eq!(out[12..16], 5i32.to_ne_bytes());
        assert_eq!(&out[16..21], b"names");
        // STRSXP of labels, then the NILVALUE terminator.
        assert_eq!(out[21..25], 16i32.to_ne_bytes());
        assert_eq!(&out[written - 4..], &254i32.to_ne_bytes());
        assert_eq!(out.len(), written);
    }

    #[test]
    fn test_names_byte_count_formula() {
        let names = ["mpg", "cyl", "disp"];
        let mut out = Vec::new();
        let written = write_names(&mut out, &names).unwrap();

        // pairlist node (8) + "names" charsxp (13) + strsxp + nil (4)
        let strsxp: usize = 8 + names.iter().map(|s| 8 + s.len()).sum::<usize>();
        assert_eq!(written, 8 + 13 + strsxp + 4);
    }

    /// Sink that accepts `capacity` bytes and then fails every write.
    struct BrokenSink {
        accepted: Vec<u8>,
        capacity: usize,
        writes_after_failure: usize,
        failed: bool,
    }

    impl BrokenSink {
        fn new(capacity: usize) -> Self {
            Self {
                accepted: Vec::new(),
                capacity,
                writes_after_failure: 0,
                failed: false,
            }
        }
    }

    impl Write for BrokenSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.failed {
                self.writes_after_failure += 1;
            }
            if self.accepted.len() + buf.len() > self.capacity {
                self.failed = true;
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink broke"));
            }
            self.accepted.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_broken_sink_fails_without_retry() {
        let mut sink = BrokenSink::new(10);
        let err = write_doubles(&mut sink, &[1.0, 2.0, 3.0]).unwrap_err();

        assert!(matches!(err, EncodeError::Io(_)));
        // Fail fast: the failing write is attempted once, never repeated.
        assert_eq!(sink.writes_after_failure, 0);
        assert!(sink.accepted.len() <= 10);
    }

    #[test]
    fn test_closed_sink_writes_nothing_more() {
        let mut sink = BrokenSink::new(0);
        assert!(write_header(&mut sink, 1).is_err());
        assert!(write_ints(&mut sink, &[1]).is_err());
        assert!(sink.accepted.is_empty());
    }
}
