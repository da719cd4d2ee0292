//! # Guarded Object Writer
//!
//! The low-level encoders in [`crate::encoder`] trust the caller to uphold
//! the protocol: one header, exactly the declared number of vectors, then a
//! names block of the same cardinality. Nothing checks that promise, and a
//! broken sequence is not an error, it is a corrupt object that only fails
//! on the R side.
//!
//! [`ObjectWriter`] is the opt-in guarded layer: it owns the sink, writes
//! the header up front, counts column slots, and refuses the transitions
//! the wire format cannot represent. Callers that want the original
//! permissive contract simply keep using the free functions.

use std::io::Write;

use log::{debug, warn};

use crate::encoder::{self, EncodeError};

/// Errors that can occur in the guarded writer, beyond encoding itself
#[derive(Debug, thiserror::Error)]
pub enum ObjectError {
    /// The underlying encode operation failed
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// A vector write arrived after every declared slot was filled
    #[error("object declared {declared} columns, all slots already written")]
    TooManyColumns {
        /// Column count declared at construction
        declared: usize,
    },

    /// `finish` was called before every declared slot was filled
    #[error("object declared {declared} columns but only {written} were written")]
    MissingColumns {
        /// Column count declared at construction
        declared: usize,
        /// Columns actually written
        written: usize,
    },

    /// The name count passed to `finish` differs from the declared columns
    #[error("object has {declared} columns but {names} names were supplied")]
    NameCountMismatch {
        /// Column count declared at construction
        declared: usize,
        /// Number of names passed to `finish`
        names: usize,
    },
}

/// Summary returned by [`ObjectWriter::finish`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectStats {
    /// Number of column vectors written
    pub columns_written: usize,
    /// Total bytes emitted, header and names block included
    pub bytes_written: usize,
}

/// State-machine wrapper enforcing the header/vectors/names protocol.
///
/// ```
/// use rserial::object_writer::ObjectWriter;
///
/// let mut out: Vec<u8> = Vec::new();
/// let mut writer = ObjectWriter::new(&mut out, 2)?;
/// writer.write_doubles(&[1.0, 2.0, 3.0])?;
/// writer.write_strings(&["a", "b", "c"])?;
/// let stats = writer.finish(&["value", "label"])?;
/// assert_eq!(stats.columns_written, 2);
/// # Ok::<(), rserial::object_writer::ObjectError>(())
/// ```
pub struct ObjectWriter<W: Write> {
    sink: W,
    declared: usize,
    columns_written: usize,
    bytes_written: usize,
    finished: bool,
}

impl<W: Write> ObjectWriter<W> {
    /// Creates a writer for an object of `columns` named vectors and writes
    /// the stream prelude immediately.
    pub fn new(mut sink: W, columns: usize) -> Result<Self, ObjectError> {
        let bytes_written = encoder::write_header(&mut sink, columns)?;
        debug!("object opened: {} column slots", columns);

        Ok(Self {
            sink,
            declared: columns,
            columns_written: 0,
            bytes_written,
            finished: false,
        })
    }

    /// Writes one double column into the next slot.
    pub fn write_doubles(&mut self, values: &[f64]) -> Result<(), ObjectError> {
        self.claim_slot()?;
        self.bytes_written += encoder::write_doubles(&mut self.sink, values)?;
        Ok(())
    }

    /// Writes one integer column into the next slot.
    pub fn write_ints(&mut self, values: &[i32]) -> Result<(), ObjectError> {
        self.claim_slot()?;
        self.bytes_written += encoder::write_ints(&mut self.sink, values)?;
        Ok(())
    }

    /// Writes one string column into the next slot.
    pub fn write_strings<S: AsRef<[u8]>>(&mut self, strings: &[S]) -> Result<(), ObjectError> {
        self.claim_slot()?;
        self.bytes_written += encoder::write_strings(&mut self.sink, strings)?;
        Ok(())
    }

    /// Number of column slots still unwritten.
    pub fn remaining_columns(&self) -> usize {
        self.declared - self.columns_written
    }

    /// Writes the names block and closes the object.
    ///
    /// Fails if any column slot is still empty or if the name count differs
    /// from the declared column count, the two mistakes the permissive
    /// low-level API lets through.
    pub fn finish<S: AsRef<[u8]>>(mut self, names: &[S]) -> Result<ObjectStats, ObjectError> {
        if self.columns_written != self.declared {
            return Err(ObjectError::MissingColumns {
                declared: self.declared,
                written: self.columns_written,
            });
        }
        if names.len() != self.declared {
            return Err(ObjectError::NameCountMismatch {
                declared: self.declared,
                names: names.len(),
            });
        }

        self.bytes_written += encoder::write_names(&mut self.sink, names)?;
        self.finished = true;
        debug!(
            "object closed: {} columns, {} bytes",
            self.columns_written, self.bytes_written
        );

        Ok(ObjectStats {
            columns_written: self.columns_written,
            bytes_written: self.bytes_written,
        })
    }

    fn claim_slot(&mut self) -> Result<(), ObjectError> {
        if self.columns_written == self.declared {
            return Err(ObjectError::TooManyColumns {
                declared: self.declared,
            });
        }
        self.columns_written += 1;
        Ok(())
    }
}

impl<W: Write> Drop for ObjectWriter<W> {
    fn drop(&mut self) {
        // A dropped writer leaves a headerful of promises unfulfilled on
        // the sink; the stream is unusable past this point.
        if !self.finished {
            warn!(
                "object writer dropped unfinished: {}/{} columns, stream is truncated",
                self.columns_written, self.declared
            );
        }
    }
}
