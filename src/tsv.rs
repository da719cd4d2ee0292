//! # TSV Fallback Writer
//!
//! A plain-text escape hatch for clients that do not want the binary
//! object: a decimal line count, a newline, then the caller's buffer
//! verbatim. The two paths never mix on one logical object: a response is
//! either a serialized R list or a TSV payload.
//!
//! The buffer is passed through untouched: `nlines` is trusted caller
//! metadata, not derived by scanning for newlines. That zero-parse contract
//! is deliberate; a caller that miscounts ships a malformed payload, and
//! the tests document exactly that.

use std::io::Write;

use log::trace;

use crate::encoder::EncodeError;

/// Writes a line-count header followed by `buf` verbatim.
///
/// The header is `nlines` in decimal plus a newline. When `nlines` is zero
/// the buffer is skipped entirely and the output is exactly `b"0\n"`; an
/// empty result set has no body.
pub fn write_tsv<W: Write>(sink: &mut W, buf: &[u8], nlines: u64) -> Result<usize, EncodeError> {
    let header = format!("{}\n", nlines);
    sink.write_all(header.as_bytes())?;
    if nlines == 0 {
        trace!("tsv: empty result set");
        return Ok(header.len());
    }

    sink.write_all(buf)?;
    trace!("tsv: {} lines, {} bytes", nlines, header.len() + buf.len());
    Ok(header.len() + buf.len())
}
