use crate::Error;

/// Resolve a `RangeBounds` against `len` into a `(start, end)` pair.
///
/// # Panics
/// Panics if `start > end` or `end > len`.
#[inline(always)]
pub(crate) fn split_range_bound(
    src: &impl core::ops::RangeBounds<usize>,
    len: usize,
) -> (usize, usize) {
    let start = match src.start_bound() {
        core::ops::Bound::Included(&i) => i,
        core::ops::Bound::Excluded(&i) => i + 1,
        core::ops::Bound::Unbounded => 0,
    };

    let end = match src.end_bound() {
        core::ops::Bound::Included(&i) => i + 1,
        core::ops::Bound::Excluded(&i) => i,
        core::ops::Bound::Unbounded => len,
    };

    assert!(start <= end, "range start should be <= range end");
    assert!(end <= len, "range end should be <= len");
    (start, end)
}

/// Capacity of a freshly allocated heap buffer that must hold `required` elements.
///
/// This is `floor(1.5 * required)`, computed as `required + required / 2`.
#[inline]
pub(crate) const fn grown_capacity(required: usize) -> Result<usize, Error> {
    match required.checked_add(required >> 1) {
        Some(capacity) => Ok(capacity),
        None => Err(Error::CapacityOverflow),
    }
}

/// `len + additional`, or [`Error::CapacityOverflow`].
#[inline]
pub(crate) const fn required_len(len: usize, additional: usize) -> Result<usize, Error> {
    match len.checked_add(additional) {
        Some(required) => Ok(required),
        None => Err(Error::CapacityOverflow),
    }
}

/// Emit a `log::trace!` record for a storage transition.
///
/// Expands to nothing unless the `log` feature is enabled.
macro_rules! trace_transition {
    ($($arg:tt)+) => {
        #[cfg(feature = "log")]
        {
            ::log::trace!(target: "hybridvec", $($arg)+);
        }
    };
}

pub(crate) use trace_transition;
