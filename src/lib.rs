//! # rserial - Micro R Serialization Encoder
//!
//! `rserial` emits a small subset of R's native binary serialization format
//! (the `serialize()`/`unserialize()` wire format) so that columnar data
//! (vectors of doubles, integers, or byte strings, with attribute names)
//! can be streamed to any byte sink without an R runtime in the process.
//! The typical consumer is a server handing query results to an R client,
//! or a batch job producing objects that `unserialize()` loads directly.
//!
//! ## Key Properties
//!
//! - **Pinned wire format**: R serialization format version 2, native
//!   binary (`"B\n"`) variant, readable by every R release since 2.3.0.
//!   Constants live in [`format`] with the layout documented there.
//!
//! - **Native byte order**: payloads are the in-memory representation of
//!   the host. The portable XDR variant is deliberately not supported.
//!
//! - **Stateless core**: each write operation is one self-contained call
//!   over a borrowed `io::Write` sink; ordering is a caller contract. An
//!   opt-in [`object_writer::ObjectWriter`] enforces the contract for
//!   callers who prefer checked construction.
//!
//! - **TSV fallback**: a parallel plain-text path ([`tsv::write_tsv`]) for
//!   clients that want formatted lines instead of a binary object.
//!
//! ## Quick Start
//!
//! ```rust
//! use rserial::encoder::{write_header, write_doubles, write_strings, write_names};
//!
//! // A two-column object: one numeric vector, one character vector.
//! let mut out: Vec<u8> = Vec::new();
//! write_header(&mut out, 2)?;
//! write_doubles(&mut out, &[21.0, 22.8, 18.7])?;
//! write_strings(&mut out, &["Mazda", "Datsun", "Hornet"])?;
//! write_names(&mut out, &["mpg", "model"])?;
//!
//! // `out` now unserializes in R as: list(mpg = c(21, 22.8, 18.7), ...)
//! # Ok::<(), rserial::encoder::EncodeError>(())
//! ```
//!
//! Or with the guarded writer, which rejects the call sequences the wire
//! format cannot represent:
//!
//! ```rust
//! use rserial::object_writer::ObjectWriter;
//!
//! let mut out: Vec<u8> = Vec::new();
//! let mut writer = ObjectWriter::new(&mut out, 2)?;
//! writer.write_ints(&[1, 2, 3])?;
//! writer.write_strings(&["a", "b", "c"])?;
//! let stats = writer.finish(&["id", "label"])?;
//! assert_eq!(stats.bytes_written, out.len());
//! # Ok::<(), rserial::object_writer::ObjectError>(())
//! ```
//!
//! ## Wire Layout
//!
//! | block   | contents                                              |
//! |---------|-------------------------------------------------------|
//! | header  | `"B\n"`, format version, R versions, list tag + count |
//! | vector  | type tag, element count, native-endian payload        |
//! | strings | type tag, count, per-element (tag, byte length, bytes)|
//! | names   | attribute pairlist, `names` symbol, labels, NULL      |
//!
//! The header declares how many vectors follow; every vector write consumes
//! one slot and the names block closes the object. The stateless API does
//! not police that sequence; see [`object_writer`] for the layer that does.
//!
//! ## Failure Model
//!
//! Fail fast, at most one attempt per call: argument problems are caught
//! before the first byte goes out, I/O errors abort the call immediately,
//! and nothing is retried or rolled back. After an I/O error the sink may
//! hold a partially written element; the caller owns the sink and decides
//! whether to abandon it.
//!
//! ## What This Crate Is Not
//!
//! No decoding (test suites carry their own minimal reader), no XDR, no
//! compression, no R types beyond the three vector kinds plus names, and no
//! CLI or configuration surface: the embedding program owns process
//! concerns, including the choice of `log` backend.

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod encoder;
pub mod format;
pub mod object_writer;
pub mod tsv;

/// Re-export commonly used items for convenience
pub mod prelude {
    pub use crate::encoder::{
        write_doubles, write_header, write_ints, write_names, write_strings, EncodeError,
    };
    pub use crate::format::{FORMAT_VERSION, HEADER_LEN};
    pub use crate::object_writer::{ObjectError, ObjectStats, ObjectWriter};
    pub use crate::tsv::write_tsv;
}
