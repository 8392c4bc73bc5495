use alloc::collections::TryReserveError;
use core::fmt;

/// Error type for the fallible operations of [`HybridVec`](crate::HybridVec).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A checked access used an index `>= len`.
    OutOfRange {
        /// The requested index.
        index: usize,
        /// The length of the vector at the time of the access.
        len: usize,
    },
    /// The required capacity overflowed `usize`.
    CapacityOverflow,
    /// The allocator could not provide a heap buffer.
    AllocFailed(TryReserveError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::OutOfRange { .. } => f.write_str("The index is out of range"),
            Error::CapacityOverflow => f.write_str("capacity overflow"),
            Error::AllocFailed(err) => write!(f, "allocation failed: {err}"),
        }
    }
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Error::AllocFailed(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TryReserveError> for Error {
    #[inline]
    fn from(err: TryReserveError) -> Self {
        Error::AllocFailed(err)
    }
}

/// Unwrap the result of an allocating operation the way `Vec` does.
#[inline]
#[track_caller]
pub(crate) fn infallible<T>(result: Result<T, Error>) -> T {
    match result {
        Ok(value) => value,
        Err(Error::CapacityOverflow) => panic!("capacity overflow"),
        Err(err) => panic!("{err}"),
    }
}
