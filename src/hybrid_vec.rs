use alloc::{boxed::Box, vec::Vec};
use core::{fmt, iter::FusedIterator};

use crate::error::infallible;
use crate::inline_vec::{self, InlineVec};
use crate::utils::{grown_capacity, required_len, split_range_bound, trace_transition};
use crate::{DEFAULT_INLINE_CAPACITY, Error};

/// The active storage of a [`HybridVec`].
///
/// Exactly one variant is live at a time; mode transitions replace the variant.
enum Storage<T, const N: usize> {
    Inline(InlineVec<T, N>),
    /// `capacity` is the size assigned by the growth rule.
    /// The `Vec` allocation is always at least that large.
    Heap { vec: Vec<T>, capacity: usize },
}

/// A vector that keeps up to `N` elements inline and spills to the heap beyond that.
///
/// While `len() <= N` the elements normally live in a fixed array embedded in the
/// value itself, so no allocation takes place. The first insertion that would
/// exceed `N` *promotes* the vector: a heap buffer is allocated and the elements
/// are moved into it. Any removal that brings the length back to `N` or below
/// *demotes* it again, moving the elements back inline and releasing the buffer.
///
/// Every heap buffer is sized `floor(1.5 * m)`, where `m` is the number of
/// elements the triggering operation needs room for.
///
/// Most methods mirror [`Vec`]; slice methods are available through [`Deref`](core::ops::Deref).
///
/// # Example
///
/// ```
/// use hybridvec::HybridVec;
///
/// let mut vec: HybridVec<i32, 4> = HybridVec::new();
/// vec.extend([0, 1, 2, 3]);
/// assert!(vec.is_inline());
/// assert_eq!(vec.capacity(), 4);
///
/// // One more element promotes to the heap with capacity floor(1.5 * 5).
/// vec.push(4);
/// assert!(!vec.is_inline());
/// assert_eq!(vec.capacity(), 7);
///
/// // Shrinking back to 4 or fewer elements demotes immediately.
/// vec.pop();
/// assert!(vec.is_inline());
/// assert_eq!(vec, [0, 1, 2, 3]);
/// ```
pub struct HybridVec<T, const N: usize = { DEFAULT_INLINE_CAPACITY }>(Storage<T, N>);

/// Creates a [`HybridVec`] containing the arguments.
///
/// The syntax is similar to [`vec!`](https://doc.rust-lang.org/std/macro.vec.html).
/// If the elements do not fit inline, heap storage is used.
///
/// # Examples
///
/// ```
/// # use hybridvec::{hybridvec, HybridVec};
/// let vec: HybridVec<String, 10> = hybridvec![];
/// let vec: HybridVec<i64, 10> = hybridvec![1; 5]; // Need to support Clone.
/// let vec: HybridVec<_, 10> = hybridvec![1, 2, 3, 4];
/// ```
#[macro_export]
macro_rules! hybridvec {
    [] => { $crate::HybridVec::new() };
    [$elem:expr; $n:expr] => { $crate::HybridVec::from_elem($elem, $n) };
    [$($item:expr),+ $(,)?] => { $crate::HybridVec::from([ $($item),+ ]) };
}

impl<T, const N: usize> HybridVec<T, N> {
    /// Constructs a new, empty `HybridVec` in inline mode.
    ///
    /// No memory is allocated. The inline buffer is part of the value, so `N`
    /// should stay small enough to live comfortably on the stack.
    ///
    /// # Examples
    ///
    /// ```
    /// # use hybridvec::HybridVec;
    /// let vec: HybridVec<i32, 8> = HybridVec::new();
    /// assert!(vec.is_inline());
    /// assert_eq!(vec.capacity(), 8);
    /// ```
    #[inline]
    pub const fn new() -> Self {
        Self(Storage::Inline(InlineVec::new()))
    }

    /// Constructs a new, empty `HybridVec` able to hold `capacity` elements
    /// without further allocation.
    ///
    /// If `capacity <= N` this is [`new`](HybridVec::new). Otherwise a heap
    /// buffer of `floor(1.5 * capacity)` is allocated up front.
    ///
    /// # Examples
    ///
    /// ```
    /// # use hybridvec::HybridVec;
    /// let vec: HybridVec<i32, 4> = HybridVec::with_capacity(3);
    /// assert!(vec.is_inline());
    ///
    /// let vec: HybridVec<i32, 4> = HybridVec::with_capacity(10);
    /// assert!(!vec.is_inline());
    /// assert_eq!(vec.capacity(), 15);
    /// ```
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut vec = Self::new();
        vec.reserve(capacity);
        vec
    }

    /// Returns `true` if the elements are stored inline.
    #[inline(always)]
    pub const fn is_inline(&self) -> bool {
        match &self.0 {
            Storage::Inline(_) => true,
            Storage::Heap { .. } => false,
        }
    }

    /// Returns the number of elements in the vector.
    #[inline]
    pub const fn len(&self) -> usize {
        match &self.0 {
            Storage::Inline(vec) => vec.len(),
            Storage::Heap { vec, .. } => vec.len(),
        }
    }

    /// Returns `true` if the vector contains no elements.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of elements the active storage can hold.
    ///
    /// This is `N` in inline mode and the size of the heap buffer in heap mode.
    #[inline]
    pub const fn capacity(&self) -> usize {
        match &self.0 {
            Storage::Inline(_) => N,
            Storage::Heap { capacity, .. } => *capacity,
        }
    }

    /// Returns a raw pointer to the active buffer.
    ///
    /// Any operation that may reallocate or switch storage mode invalidates it.
    #[inline]
    pub const fn as_ptr(&self) -> *const T {
        match &self.0 {
            Storage::Inline(vec) => vec.as_ptr(),
            Storage::Heap { vec, .. } => vec.as_ptr(),
        }
    }

    /// Returns a raw mutable pointer to the active buffer.
    ///
    /// Any operation that may reallocate or switch storage mode invalidates it.
    #[inline]
    pub const fn as_mut_ptr(&mut self) -> *mut T {
        match &mut self.0 {
            Storage::Inline(vec) => vec.as_mut_ptr(),
            Storage::Heap { vec, .. } => vec.as_mut_ptr(),
        }
    }

    /// Extracts a slice containing the entire vector.
    #[inline]
    pub const fn as_slice(&self) -> &[T] {
        match &self.0 {
            Storage::Inline(vec) => vec.as_slice(),
            Storage::Heap { vec, .. } => vec.as_slice(),
        }
    }

    /// Extracts a mutable slice of the entire vector.
    #[inline]
    pub const fn as_mut_slice(&mut self) -> &mut [T] {
        match &mut self.0 {
            Storage::Inline(vec) => vec.as_mut_slice(),
            Storage::Heap { vec, .. } => vec.as_mut_slice(),
        }
    }

    /// Returns a reference to the element at `index`.
    ///
    /// This is the bounds-checked accessor; use indexing or [`get`](slice::get)
    /// for the unchecked-by-contract fast path.
    ///
    /// # Errors
    /// [`Error::OutOfRange`] if `index >= len`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use hybridvec::{hybridvec, HybridVec, Error};
    /// let vec: HybridVec<_, 4> = hybridvec![1, 2, 3];
    /// assert_eq!(vec.at(1), Ok(&2));
    ///
    /// let err = vec.at(10).unwrap_err();
    /// assert_eq!(err, Error::OutOfRange { index: 10, len: 3 });
    /// assert_eq!(err.to_string(), "The index is out of range");
    /// ```
    #[inline]
    pub fn at(&self, index: usize) -> Result<&T, Error> {
        let len = self.len();
        self.as_slice()
            .get(index)
            .ok_or(Error::OutOfRange { index, len })
    }

    /// Returns a mutable reference to the element at `index`.
    ///
    /// # Errors
    /// [`Error::OutOfRange`] if `index >= len`.
    #[inline]
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, Error> {
        let len = self.len();
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(Error::OutOfRange { index, len })
    }

    /// Makes room for `additional` more elements.
    ///
    /// Promotes to the heap or reallocates when `len + additional` exceeds the
    /// current capacity; the new buffer holds `floor(1.5 * (len + additional))`.
    /// The allocation is attempted before any element moves, so on error the
    /// vector is unchanged.
    fn try_grow_for(&mut self, additional: usize) -> Result<(), Error> {
        let len = self.len();
        let required = required_len(len, additional)?;

        match &mut self.0 {
            Storage::Inline(inline) => {
                if required <= N {
                    return Ok(());
                }
                let capacity = grown_capacity(required)?;
                let vec = inline.try_into_vec_with_capacity(capacity)?;
                trace_transition!("promote to heap: len={} capacity={}", len, capacity);
                self.0 = Storage::Heap { vec, capacity };
            }
            Storage::Heap { vec, capacity } => {
                if required <= *capacity {
                    return Ok(());
                }
                let new_capacity = grown_capacity(required)?;
                vec.try_reserve_exact(new_capacity - len)?;
                trace_transition!(
                    "reallocate heap: len={} capacity={} -> {}",
                    len,
                    *capacity,
                    new_capacity
                );
                *capacity = new_capacity;
            }
        }
        Ok(())
    }

    /// Moves the elements back inline if the vector is on the heap and fits in `N`.
    #[inline]
    fn demote_if_fits(&mut self) {
        if let Storage::Heap { vec, .. } = &mut self.0 {
            if vec.len() <= N {
                trace_transition!("demote to inline: len={}", vec.len());
                // SAFETY: `len <= N`.
                self.0 = Storage::Inline(unsafe { InlineVec::take_from_vec(vec) });
            }
        }
    }

    /// Reserves capacity for at least `additional` more elements.
    ///
    /// If `len + additional` exceeds the current capacity, a buffer of
    /// `floor(1.5 * (len + additional))` is allocated, promoting to the heap if
    /// necessary. This never shrinks or demotes.
    ///
    /// # Panics
    /// Panics if the new capacity overflows or the allocation fails.
    ///
    /// # Examples
    ///
    /// ```
    /// # use hybridvec::{hybridvec, HybridVec};
    /// let mut vec: HybridVec<i32, 8> = hybridvec![1];
    /// vec.reserve(5);
    /// assert!(vec.is_inline());
    ///
    /// vec.reserve(9);
    /// assert!(!vec.is_inline());
    /// assert_eq!(vec.capacity(), 15);
    /// ```
    #[inline]
    pub fn reserve(&mut self, additional: usize) {
        infallible(self.try_grow_for(additional))
    }

    /// Fallible version of [`reserve`](HybridVec::reserve).
    ///
    /// # Errors
    /// [`Error::CapacityOverflow`] or [`Error::AllocFailed`]; the vector is left unchanged.
    #[inline]
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), Error> {
        self.try_grow_for(additional)
    }

    /// Appends an element to the back of the vector.
    ///
    /// If the active storage is full, the vector is promoted (or its heap
    /// buffer reallocated) to `floor(1.5 * (len + 1))` first.
    ///
    /// # Panics
    /// Panics if the new capacity overflows or the allocation fails.
    ///
    /// # Examples
    ///
    /// ```
    /// # use hybridvec::{hybridvec, HybridVec};
    /// let mut vec: HybridVec<_, 2> = hybridvec![1, 2];
    /// vec.push(3);
    /// assert_eq!(vec, [1, 2, 3]);
    /// assert_eq!(vec.capacity(), 4);
    /// ```
    #[inline]
    pub fn push(&mut self, value: T) {
        infallible(self.try_push(value))
    }

    /// Fallible version of [`push`](HybridVec::push).
    ///
    /// # Errors
    /// [`Error::CapacityOverflow`] or [`Error::AllocFailed`]; the vector is
    /// left unchanged and `value` is dropped.
    pub fn try_push(&mut self, value: T) -> Result<(), Error> {
        self.try_grow_for(1)?;
        match &mut self.0 {
            Storage::Inline(vec) => vec.push(value),
            Storage::Heap { vec, .. } => vec.push(value),
        }
        Ok(())
    }

    /// Removes the last element and returns it, or `None` if the vector is empty.
    ///
    /// Demotes to inline storage if the remaining elements fit.
    ///
    /// # Examples
    ///
    /// ```
    /// # use hybridvec::{hybridvec, HybridVec};
    /// let mut vec: HybridVec<_, 2> = hybridvec![1, 2, 3];
    /// assert!(!vec.is_inline());
    /// assert_eq!(vec.pop(), Some(3));
    /// assert!(vec.is_inline());
    /// ```
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        let value = match &mut self.0 {
            Storage::Inline(vec) => vec.pop(),
            Storage::Heap { vec, .. } => vec.pop(),
        };
        if value.is_some() {
            self.demote_if_fits();
        }
        value
    }

    /// Inserts an element before position `index`, shifting the tail right,
    /// and returns `index`.
    ///
    /// Inserting at `len` appends.
    ///
    /// # Panics
    /// Panics if `index > len`, the new capacity overflows or the allocation fails.
    ///
    /// # Examples
    ///
    /// ```
    /// # use hybridvec::{hybridvec, HybridVec};
    /// let mut vec: HybridVec<_, 4> = hybridvec![1, 2, 3];
    /// let pos = vec.insert(2, 99);
    /// assert_eq!(pos, 2);
    /// assert_eq!(vec, [1, 2, 99, 3]);
    /// assert!(vec.is_inline());
    ///
    /// vec.insert(4, 100);
    /// assert!(!vec.is_inline());
    /// ```
    #[inline]
    pub fn insert(&mut self, index: usize, element: T) -> usize {
        infallible(self.try_insert(index, element))
    }

    /// Fallible version of [`insert`](HybridVec::insert).
    ///
    /// # Panics
    /// Panics if `index > len`.
    ///
    /// # Errors
    /// [`Error::CapacityOverflow`] or [`Error::AllocFailed`]; the vector is left unchanged.
    pub fn try_insert(&mut self, index: usize, element: T) -> Result<usize, Error> {
        assert!(index <= self.len(), "insertion index should be <= len");

        self.try_grow_for(1)?;
        match &mut self.0 {
            Storage::Inline(vec) => vec.insert(index, element),
            Storage::Heap { vec, .. } => vec.insert(index, element),
        }
        Ok(index)
    }

    /// Inserts a run of elements before position `index`, preserving their
    /// order, and returns `index`.
    ///
    /// The iterator is consumed once. When its `size_hint` is exact, at most
    /// that many items are taken; otherwise the run is collected first so its
    /// length is known. If the run does not fit the active storage, a single
    /// buffer of `floor(1.5 * (len + count))` is allocated before anything moves.
    /// An empty run leaves the vector untouched.
    ///
    /// # Panics
    /// Panics if `index > len`, the new capacity overflows or the allocation fails.
    ///
    /// # Examples
    ///
    /// ```
    /// # use hybridvec::{hybridvec, HybridVec};
    /// let mut vec: HybridVec<_, 4> = hybridvec![1, 5];
    /// vec.insert_many(1, [2, 3, 4]);
    /// assert_eq!(vec, [1, 2, 3, 4, 5]);
    /// assert_eq!(vec.capacity(), 7);
    ///
    /// vec.insert_many(0, (10..20).filter(|x| x % 5 == 0));
    /// assert_eq!(vec, [10, 15, 1, 2, 3, 4, 5]);
    /// ```
    #[inline]
    pub fn insert_many<I: IntoIterator<Item = T>>(&mut self, index: usize, iterable: I) -> usize {
        infallible(self.try_insert_many(index, iterable))
    }

    /// Fallible version of [`insert_many`](HybridVec::insert_many).
    ///
    /// # Panics
    /// Panics if `index > len`.
    ///
    /// # Errors
    /// [`Error::CapacityOverflow`] or [`Error::AllocFailed`]; the vector is left unchanged.
    pub fn try_insert_many<I: IntoIterator<Item = T>>(
        &mut self,
        index: usize,
        iterable: I,
    ) -> Result<usize, Error> {
        assert!(index <= self.len(), "insertion index should be <= len");

        let iter = iterable.into_iter();
        match iter.size_hint() {
            (lower, Some(upper)) if lower == upper => self.insert_counted(index, iter, lower),
            _ => {
                let run: Vec<T> = iter.collect();
                let count = run.len();
                self.insert_counted(index, run.into_iter(), count)
            }
        }
    }

    /// Inserts at most `count` items of `iter` before `index`.
    fn insert_counted<I: Iterator<Item = T>>(
        &mut self,
        index: usize,
        iter: I,
        count: usize,
    ) -> Result<usize, Error> {
        if count == 0 {
            return Ok(index);
        }

        let old_len = self.len();
        self.try_grow_for(count)?;
        match &mut self.0 {
            Storage::Inline(vec) => {
                for item in iter.take(count) {
                    vec.push(item);
                }
            }
            Storage::Heap { vec, .. } => vec.extend(iter.take(count)),
        }

        // Appended at the tail, rotate the run into place.
        let inserted = self.len() - old_len;
        self.as_mut_slice()[index..].rotate_right(inserted);
        Ok(index)
    }

    /// Removes the element at `index` and returns the position of the element
    /// that now occupies it (equal to `len()` if the last element was erased).
    ///
    /// Erasing from an empty vector is a no-op returning `0`.
    /// Demotes to inline storage if the remaining elements fit.
    ///
    /// # Panics
    /// Panics if the vector is not empty and `index >= len`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use hybridvec::{hybridvec, HybridVec};
    /// let mut vec: HybridVec<_, 4> = hybridvec![1, 99, 3];
    /// assert_eq!(vec.erase(1), 1);
    /// assert_eq!(vec, [1, 3]);
    ///
    /// assert_eq!(vec.erase(1), 1);
    /// assert_eq!(vec.len(), 1);
    /// ```
    #[inline]
    pub fn erase(&mut self, index: usize) -> usize {
        if self.is_empty() {
            return 0;
        }
        drop(self.remove(index));
        index
    }

    /// Removes the elements in `range`, shifting the tail left, and returns the
    /// start of the range.
    ///
    /// Erasing from an empty vector is a no-op returning `0`; an empty range
    /// is a no-op returning its start.
    /// Demotes to inline storage if the remaining elements fit.
    ///
    /// # Panics
    /// Panics if the vector is not empty and the range is decreasing or ends past `len`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use hybridvec::{hybridvec, HybridVec};
    /// let mut vec: HybridVec<_, 4> = hybridvec![0, 1, 2, 3, 4, 5];
    /// assert!(!vec.is_inline());
    ///
    /// assert_eq!(vec.erase_range(1..4), 1);
    /// assert_eq!(vec, [0, 4, 5]);
    /// assert!(vec.is_inline());
    /// ```
    pub fn erase_range<R: core::ops::RangeBounds<usize>>(&mut self, range: R) -> usize {
        let len = self.len();
        if len == 0 {
            return 0;
        }

        let (start, end) = split_range_bound(&range, len);
        match &mut self.0 {
            Storage::Inline(vec) => vec.remove_range(start, end),
            Storage::Heap { vec, .. } => {
                vec.drain(start..end);
            }
        }
        self.demote_if_fits();
        start
    }

    /// Removes and returns the element at `index`, shifting the tail left.
    ///
    /// Demotes to inline storage if the remaining elements fit.
    ///
    /// # Panics
    /// Panics if `index >= len`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use hybridvec::{hybridvec, HybridVec};
    /// let mut v: HybridVec<_, 4> = hybridvec!['a', 'b', 'c'];
    /// assert_eq!(v.remove(1), 'b');
    /// assert_eq!(v, ['a', 'c']);
    /// ```
    pub fn remove(&mut self, index: usize) -> T {
        let value = match &mut self.0 {
            Storage::Inline(vec) => vec.remove(index),
            Storage::Heap { vec, .. } => {
                assert!(index < vec.len(), "removal index should be < len");
                vec.remove(index)
            }
        };
        self.demote_if_fits();
        value
    }

    /// Removes an element and returns it, replacing it with the last element.
    ///
    /// This does not preserve ordering but is O(1) apart from a possible demotion.
    ///
    /// # Panics
    /// Panics if `index >= len`.
    pub fn swap_remove(&mut self, index: usize) -> T {
        let len = self.len();
        assert!(index < len, "removal index should be < len");

        self.as_mut_slice().swap(index, len - 1);
        match self.pop() {
            Some(value) => value,
            None => unreachable!(),
        }
    }

    /// Shortens the vector to `len` elements, dropping the rest.
    ///
    /// Has no effect if `len` is greater or equal to the current length.
    /// Demotes to inline storage if the remaining elements fit.
    #[inline]
    pub fn truncate(&mut self, len: usize) {
        match &mut self.0 {
            Storage::Inline(vec) => vec.truncate(len),
            Storage::Heap { vec, .. } => vec.truncate(len),
        }
        self.demote_if_fits();
    }

    /// Retains only the elements specified by the predicate.
    ///
    /// Demotes to inline storage if the remaining elements fit.
    ///
    /// # Examples
    ///
    /// ```
    /// # use hybridvec::{hybridvec, HybridVec};
    /// let mut vec: HybridVec<_, 4> = hybridvec![1, 2, 3, 4, 5, 6];
    /// vec.retain(|x| *x % 2 == 0);
    /// assert_eq!(vec, [2, 4, 6]);
    /// assert!(vec.is_inline());
    /// ```
    #[inline]
    pub fn retain<F: FnMut(&T) -> bool>(&mut self, mut f: F) {
        self.retain_mut(|v| f(v));
    }

    /// Retains only the elements specified by the predicate, passing a mutable reference to it.
    pub fn retain_mut<F: FnMut(&mut T) -> bool>(&mut self, f: F) {
        match &mut self.0 {
            Storage::Inline(vec) => vec.retain_mut(f),
            Storage::Heap { vec, .. } => vec.retain_mut(f),
        }
        self.demote_if_fits();
    }

    /// Removes all elements and returns to inline storage, releasing any heap buffer.
    ///
    /// # Examples
    ///
    /// ```
    /// # use hybridvec::{hybridvec, HybridVec};
    /// let mut vec: HybridVec<_, 2> = hybridvec![1, 2, 3];
    /// vec.clear();
    /// assert!(vec.is_empty());
    /// assert!(vec.is_inline());
    /// assert_eq!(vec.capacity(), 2);
    /// ```
    #[inline]
    pub fn clear(&mut self) {
        match &mut self.0 {
            Storage::Inline(vec) => vec.clear(),
            Storage::Heap { .. } => {
                trace_transition!("clear releases heap buffer");
                self.0 = Storage::Inline(InlineVec::new());
            }
        }
    }

    /// Converts into a [`Vec`].
    ///
    /// Inline data is moved into an exactly sized allocation; heap data is
    /// returned without reallocating.
    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        match self.0 {
            Storage::Inline(mut vec) => {
                let len = vec.len();
                infallible(vec.try_into_vec_with_capacity(len))
            }
            Storage::Heap { vec, .. } => vec,
        }
    }

    /// Converts into [`Box<[T]>`](Box).
    #[inline]
    pub fn into_boxed_slice(self) -> Box<[T]> {
        self.into_vec().into_boxed_slice()
    }
}

impl<T: Clone, const N: usize> HybridVec<T, N> {
    /// Creates a `HybridVec` with `num` copies of `elem`.
    ///
    /// If `num > N` a heap buffer of `floor(1.5 * num)` is allocated.
    ///
    /// # Examples
    /// ```
    /// # use hybridvec::HybridVec;
    /// let vec: HybridVec<i32, 5> = HybridVec::from_elem(1, 4);
    /// assert_eq!(vec, [1, 1, 1, 1]);
    /// assert!(vec.is_inline());
    ///
    /// let vec: HybridVec<i32, 5> = HybridVec::from_elem(1, 6);
    /// assert_eq!(vec.capacity(), 9);
    /// ```
    pub fn from_elem(elem: T, num: usize) -> Self {
        let mut vec = Self::with_capacity(num);
        vec.resize(num, elem);
        vec
    }

    /// Creates a `HybridVec` by cloning the elements of `slice`.
    #[inline]
    pub fn from_slice(slice: &[T]) -> Self {
        let mut vec = Self::new();
        vec.extend_from_slice(slice);
        vec
    }

    /// Clones and inserts all elements of `slice` before position `index`.
    ///
    /// # Panics
    /// Panics if `index > len`, the new capacity overflows or the allocation fails.
    #[inline]
    pub fn insert_from_slice(&mut self, index: usize, slice: &[T]) -> usize {
        self.insert_many(index, slice.iter().cloned())
    }

    /// Clones and appends all elements of `other`.
    ///
    /// # Examples
    /// ```
    /// # use hybridvec::{hybridvec, HybridVec};
    /// let mut vec: HybridVec<_, 5> = hybridvec![1];
    /// vec.extend_from_slice(&[2, 3, 4]);
    /// assert_eq!(vec, [1, 2, 3, 4]);
    /// ```
    #[inline]
    pub fn extend_from_slice(&mut self, other: &[T]) {
        self.insert_many(self.len(), other.iter().cloned());
    }

    /// Resizes the vector so that `len` equals `new_len`.
    ///
    /// Growing fills with clones of `value` and may promote; shrinking
    /// truncates and may demote.
    ///
    /// # Examples
    ///
    /// ```
    /// # use hybridvec::{hybridvec, HybridVec};
    /// let mut vec: HybridVec<_, 2> = hybridvec!["hello"];
    /// vec.resize(3, "world");
    /// assert_eq!(vec, ["hello", "world", "world"]);
    /// assert!(!vec.is_inline());
    ///
    /// vec.resize(1, "_");
    /// assert_eq!(vec, ["hello"]);
    /// assert!(vec.is_inline());
    /// ```
    pub fn resize(&mut self, new_len: usize, value: T) {
        let len = self.len();
        if new_len <= len {
            self.truncate(new_len);
            return;
        }

        self.reserve(new_len - len);
        for _ in len + 1..new_len {
            self.push(value.clone());
        }
        self.push(value);
    }
}

impl<T: Clone, const N: usize> Clone for Storage<T, N> {
    fn clone(&self) -> Self {
        match self {
            Storage::Inline(vec) => Storage::Inline(vec.clone()),
            Storage::Heap { vec, capacity } => {
                let mut cloned = Vec::with_capacity(*capacity);
                cloned.extend_from_slice(vec);
                Storage::Heap {
                    vec: cloned,
                    capacity: *capacity,
                }
            }
        }
    }
}

impl<T, const N: usize> Default for HybridVec<T, N> {
    /// Equivalent to [`HybridVec::new`].
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, const N: usize> Clone for HybridVec<T, N> {
    /// Deep-copies the active storage, keeping the storage mode and capacity.
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }

    /// Releases any heap buffer of `self`, then deep-copies `source`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use hybridvec::{hybridvec, HybridVec};
    /// let source: HybridVec<_, 2> = hybridvec![1];
    /// let mut target: HybridVec<_, 2> = hybridvec![4, 5, 6];
    /// target.clone_from(&source);
    /// assert_eq!(target, [1]);
    /// assert!(target.is_inline());
    /// ```
    fn clone_from(&mut self, source: &Self) {
        self.clear();
        if let (Storage::Inline(dst), Storage::Inline(src)) = (&mut self.0, &source.0) {
            for item in src.as_slice() {
                dst.push(item.clone());
            }
            return;
        }
        *self = source.clone();
    }
}

impl<T, const N: usize> Extend<T> for HybridVec<T, N> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (hint, _) = iter.size_hint();
        self.reserve(hint);
        for item in iter {
            self.push(item);
        }
    }
}

impl<'a, T: 'a + Clone, const N: usize> Extend<&'a T> for HybridVec<T, N> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().cloned());
    }
}

impl<T, const N: usize> FromIterator<T> for HybridVec<T, N> {
    /// Collects the items in order.
    ///
    /// When the iterator reports an exact length beyond `N`, a single buffer of
    /// `floor(1.5 * len)` is allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// # use hybridvec::HybridVec;
    /// let vec: HybridVec<i32, 4> = (0..10).collect();
    /// assert_eq!(vec.capacity(), 15);
    /// assert!(vec.iter().copied().eq(0..10));
    /// ```
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut vec = Self::new();
        vec.extend(iter);
        vec
    }
}

impl<T, const N: usize, const P: usize> From<[T; P]> for HybridVec<T, N> {
    fn from(value: [T; P]) -> Self {
        value.into_iter().collect()
    }
}

impl<T: Clone, const N: usize> From<&[T]> for HybridVec<T, N> {
    #[inline]
    fn from(value: &[T]) -> Self {
        Self::from_slice(value)
    }
}

impl<T: Clone, const N: usize, const P: usize> From<&[T; P]> for HybridVec<T, N> {
    #[inline]
    fn from(value: &[T; P]) -> Self {
        Self::from_slice(value)
    }
}

impl<T, const N: usize> From<Vec<T>> for HybridVec<T, N> {
    /// Takes the elements of `value`.
    ///
    /// If they fit in `N` they are moved inline and the `Vec` is released.
    /// Otherwise the `Vec` allocation is kept and grown to `floor(1.5 * len)`.
    fn from(mut value: Vec<T>) -> Self {
        let len = value.len();
        if len <= N {
            // SAFETY: `len <= N`.
            return Self(Storage::Inline(unsafe { InlineVec::take_from_vec(&mut value) }));
        }

        let capacity = infallible(grown_capacity(len));
        value.reserve_exact(capacity - len);
        Self(Storage::Heap { vec: value, capacity })
    }
}

impl<T, const N: usize> From<HybridVec<T, N>> for Vec<T> {
    #[inline]
    fn from(value: HybridVec<T, N>) -> Self {
        value.into_vec()
    }
}

impl<T, const N: usize> core::ops::Deref for HybridVec<T, N> {
    type Target = [T];
    #[inline]
    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T, const N: usize> core::ops::DerefMut for HybridVec<T, N> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<T: fmt::Debug, const N: usize> fmt::Debug for HybridVec<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_slice(), f)
    }
}

impl<T, const N: usize> AsRef<[T]> for HybridVec<T, N> {
    #[inline]
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, const N: usize> AsMut<[T]> for HybridVec<T, N> {
    #[inline]
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, const N: usize> core::borrow::Borrow<[T]> for HybridVec<T, N> {
    #[inline]
    fn borrow(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, const N: usize> core::borrow::BorrowMut<[T]> for HybridVec<T, N> {
    #[inline]
    fn borrow_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: core::hash::Hash, const N: usize> core::hash::Hash for HybridVec<T, N> {
    #[inline]
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        core::hash::Hash::hash(self.as_slice(), state);
    }
}

impl<T, I: core::slice::SliceIndex<[T]>, const N: usize> core::ops::Index<I> for HybridVec<T, N> {
    type Output = I::Output;
    #[inline]
    fn index(&self, index: I) -> &Self::Output {
        core::ops::Index::index(self.as_slice(), index)
    }
}

impl<T, I: core::slice::SliceIndex<[T]>, const N: usize> core::ops::IndexMut<I>
    for HybridVec<T, N>
{
    #[inline]
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        core::ops::IndexMut::index_mut(self.as_mut_slice(), index)
    }
}

impl<T: Ord, const N: usize> Ord for HybridVec<T, N> {
    #[inline]
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        Ord::cmp(self.as_slice(), other.as_slice())
    }
}

impl<T: PartialOrd, const N: usize> PartialOrd for HybridVec<T, N> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        PartialOrd::partial_cmp(self.as_slice(), other.as_slice())
    }
}

impl<T: Eq, const N: usize> Eq for HybridVec<T, N> {}

impl<T, U, const N: usize, const M: usize> PartialEq<HybridVec<U, M>> for HybridVec<T, N>
where
    T: PartialEq<U>,
{
    /// Element-wise equality, independent of either side's storage mode.
    #[inline]
    fn eq(&self, other: &HybridVec<U, M>) -> bool {
        PartialEq::eq(self.as_slice(), other.as_slice())
    }
}

impl<T, U, const N: usize> PartialEq<[U]> for HybridVec<T, N>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &[U]) -> bool {
        PartialEq::eq(self.as_slice(), other)
    }
}

impl<T, U, const N: usize> PartialEq<&[U]> for HybridVec<T, N>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &&[U]) -> bool {
        PartialEq::eq(self.as_slice(), *other)
    }
}

impl<T, U, const N: usize, const P: usize> PartialEq<[U; P]> for HybridVec<T, N>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &[U; P]) -> bool {
        PartialEq::eq(self.as_slice(), other.as_slice())
    }
}

impl<T, U, const N: usize, const P: usize> PartialEq<&[U; P]> for HybridVec<T, N>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &&[U; P]) -> bool {
        PartialEq::eq(self.as_slice(), other.as_slice())
    }
}

impl<T, U, const N: usize> PartialEq<Vec<U>> for HybridVec<T, N>
where
    T: PartialEq<U>,
{
    #[inline]
    fn eq(&self, other: &Vec<U>) -> bool {
        PartialEq::eq(self.as_slice(), other.as_slice())
    }
}

impl<'a, T, const N: usize> IntoIterator for &'a HybridVec<T, N> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;
    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T, const N: usize> IntoIterator for &'a mut HybridVec<T, N> {
    type Item = &'a mut T;
    type IntoIter = core::slice::IterMut<'a, T>;
    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}

impl<T, const N: usize> IntoIterator for HybridVec<T, N> {
    type Item = T;
    type IntoIter = IntoIter<T, N>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        match self.0 {
            Storage::Inline(vec) => IntoIter(IntoIterInner::Inline(vec.into_iter())),
            Storage::Heap { vec, .. } => IntoIter(IntoIterInner::Heap(vec.into_iter())),
        }
    }
}

/// An iterator that consumes a [`HybridVec`] and yields its items by value.
///
/// # Examples
///
/// ```
/// # use hybridvec::{hybridvec, HybridVec};
/// let vec: HybridVec<_, 2> = hybridvec!["1", "2", "3"];
/// let mut iter = vec.into_iter();
///
/// assert_eq!(iter.next_back(), Some("3"));
/// assert_eq!(iter.collect::<Vec<_>>(), ["1", "2"]);
/// ```
pub struct IntoIter<T, const N: usize>(IntoIterInner<T, N>);

enum IntoIterInner<T, const N: usize> {
    Inline(inline_vec::IntoIter<T, N>),
    Heap(alloc::vec::IntoIter<T>),
}

impl<T, const N: usize> IntoIter<T, N> {
    /// Returns the remaining items as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        match &self.0 {
            IntoIterInner::Inline(iter) => iter.as_slice(),
            IntoIterInner::Heap(iter) => iter.as_slice(),
        }
    }

    /// Returns the remaining items as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        match &mut self.0 {
            IntoIterInner::Inline(iter) => iter.as_mut_slice(),
            IntoIterInner::Heap(iter) => iter.as_mut_slice(),
        }
    }
}

impl<T, const N: usize> Iterator for IntoIter<T, N> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.0 {
            IntoIterInner::Inline(iter) => iter.next(),
            IntoIterInner::Heap(iter) => iter.next(),
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.0 {
            IntoIterInner::Inline(iter) => iter.size_hint(),
            IntoIterInner::Heap(iter) => iter.size_hint(),
        }
    }
}

impl<T, const N: usize> DoubleEndedIterator for IntoIter<T, N> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        match &mut self.0 {
            IntoIterInner::Inline(iter) => iter.next_back(),
            IntoIterInner::Heap(iter) => iter.next_back(),
        }
    }
}

impl<T, const N: usize> ExactSizeIterator for IntoIter<T, N> {}

impl<T, const N: usize> FusedIterator for IntoIter<T, N> {}

impl<T: Clone, const N: usize> Clone for IntoIter<T, N> {
    fn clone(&self) -> Self {
        match &self.0 {
            IntoIterInner::Inline(iter) => IntoIter(IntoIterInner::Inline(iter.clone())),
            IntoIterInner::Heap(iter) => IntoIter(IntoIterInner::Heap(iter.clone())),
        }
    }
}

impl<T: fmt::Debug, const N: usize> fmt::Debug for IntoIter<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::{format, rc::Rc, string::String, vec};
    use rand::{Rng, SeedableRng, rngs::StdRng};

    fn assert_mode_invariant<T, const N: usize>(v: &HybridVec<T, N>) {
        if v.is_inline() {
            assert!(v.len() <= N);
            assert_eq!(v.capacity(), N);
        } else {
            assert!(v.capacity() >= v.len());
        }
    }

    #[test]
    fn push_promotes_then_pop_demotes() {
        let mut v: HybridVec<i32, 4> = HybridVec::new();
        for i in 0..4 {
            v.push(i);
            assert_mode_invariant(&v);
        }
        assert_eq!(v.len(), 4);
        assert!(v.is_inline());
        assert_eq!(v.capacity(), 4);

        v.push(4);
        assert_eq!(v.len(), 5);
        assert!(!v.is_inline());
        assert_eq!(v.capacity(), 7);

        v.pop();
        assert!(v.is_inline());
        v.pop();
        assert_eq!(v, [0, 1, 2]);
        assert!(v.is_inline());
        assert_eq!(v.capacity(), 4);
    }

    #[test]
    fn heap_reallocation_follows_growth_rule() {
        let mut v: HybridVec<u32, 2> = HybridVec::new();
        let mut last_capacity = v.capacity();
        for i in 0..100 {
            v.push(i);
            if v.capacity() != last_capacity {
                let len = v.len();
                assert_eq!(v.capacity(), len + len / 2);
                last_capacity = v.capacity();
            }
        }
        assert!(v.iter().copied().eq(0..100));
    }

    #[test]
    fn zero_inline_capacity() {
        let mut v: HybridVec<i32, 0> = HybridVec::new();
        assert_eq!(v.capacity(), 0);
        v.push(1);
        assert!(!v.is_inline());
        assert_eq!(v.capacity(), 1);
        v.push(2);
        assert_eq!(v.capacity(), 3);
        v.clear();
        assert!(v.is_inline());
        assert_eq!(v.pop(), None);
    }

    #[test]
    fn insert_positions() {
        let mut v: HybridVec<i32, 4> = hybridvec![1, 2, 3];
        assert_eq!(v.insert(2, 99), 2);
        assert_eq!(v, [1, 2, 99, 3]);
        assert!(v.is_inline());

        assert_eq!(v.insert(0, 0), 0);
        assert_eq!(v, [0, 1, 2, 99, 3]);
        assert_eq!(v.capacity(), 7);

        let end = v.len();
        assert_eq!(v.insert(end, 7), end);
        assert_eq!(v.last(), Some(&7));
    }

    #[test]
    #[should_panic(expected = "insertion index should be <= len")]
    fn insert_past_end() {
        let mut v: HybridVec<i32, 4> = hybridvec![1];
        v.insert(2, 0);
    }

    #[test]
    fn insert_many_layout() {
        let mut v: HybridVec<i32, 4> = hybridvec![1, 2];
        assert_eq!(v.insert_many(1, [10, 11]), 1);
        assert_eq!(v, [1, 10, 11, 2]);
        assert!(v.is_inline());

        assert_eq!(v.insert_many(2, vec![20, 21, 22]), 2);
        assert_eq!(v, [1, 10, 20, 21, 22, 11, 2]);
        assert_eq!(v.capacity(), 10);

        assert_eq!(v.insert_many(3, core::iter::empty()), 3);
        assert_eq!(v.len(), 7);

        let end = v.len();
        v.insert_from_slice(end, &[30, 31, 32, 33]);
        assert_eq!(v, [1, 10, 20, 21, 22, 11, 2, 30, 31, 32, 33]);
        assert_eq!(v.capacity(), 16);
    }

    #[test]
    fn insert_many_unsized_runs() {
        let mut v: HybridVec<i32, 4> = hybridvec![1, 2];
        v.insert_many(1, (10..20).filter(|x| x % 5 == 0));
        assert_eq!(v, [1, 10, 15, 2]);
        assert!(v.is_inline());
        assert_mode_invariant(&v);

        v.insert_many(2, (0..30).filter(|x| x % 10 == 0));
        assert_eq!(v, [1, 10, 0, 10, 20, 15, 2]);
        assert_eq!(v.capacity(), 10);

        v.insert_many(7, (0..100).filter(|x| x % 25 == 0));
        assert_eq!(v.len(), 11);
        assert_eq!(v.capacity(), 16);
        assert_eq!(&v[7..], [0, 25, 50, 75]);

        assert_eq!(v.insert_many(3, (0..5).filter(|_| false)), 3);
        assert_eq!(v.len(), 11);
        assert_eq!(v.capacity(), 16);
    }

    #[test]
    fn pop_on_empty_keeps_storage() {
        let mut v: HybridVec<i32, 4> = HybridVec::with_capacity(10);
        assert!(!v.is_inline());
        assert_eq!(v.capacity(), 15);
        assert_mode_invariant(&v);

        assert_eq!(v.pop(), None);
        assert!(!v.is_inline());
        assert_eq!(v.capacity(), 15);

        v.push(1);
        assert_eq!(v.pop(), Some(1));
        assert!(v.is_inline());
        assert_eq!(v.capacity(), 4);
    }

    #[test]
    fn erase_returns_following_position() {
        let mut v: HybridVec<i32, 4> = hybridvec![1, 99, 3];
        assert_eq!(v.erase(1), 1);
        assert_eq!(v, [1, 3]);
        assert_eq!(v[1], 3);

        assert_eq!(v.erase(1), 1);
        assert_eq!(v.len(), 1);

        v.clear();
        assert_eq!(v.erase(5), 0);
        assert_eq!(v.erase_range(2..9), 0);
    }

    #[test]
    fn erase_range_demotes() {
        let mut v: HybridVec<i32, 4> = (0..10).collect();
        assert!(!v.is_inline());

        assert_eq!(v.erase_range(2..2), 2);
        assert_eq!(v.len(), 10);

        assert_eq!(v.erase_range(..3), 0);
        assert_eq!(v, [3, 4, 5, 6, 7, 8, 9]);
        assert!(!v.is_inline());

        assert_eq!(v.erase_range(4..), 4);
        assert_eq!(v, [3, 4, 5, 6]);
        assert!(v.is_inline());
        assert_eq!(v.capacity(), 4);

        assert_eq!(v.erase_range(1..=2), 1);
        assert_eq!(v, [3, 6]);
    }

    #[test]
    fn removals_demote() {
        let mut v: HybridVec<i32, 3> = (0..5).collect();
        assert_eq!(v.remove(0), 0);
        assert!(!v.is_inline());
        assert_eq!(v.swap_remove(0), 1);
        assert_eq!(v, [4, 2, 3]);
        assert!(v.is_inline());

        let mut v: HybridVec<i32, 3> = (0..5).collect();
        v.truncate(3);
        assert!(v.is_inline());

        let mut v: HybridVec<i32, 3> = (0..5).collect();
        v.retain(|x| *x != 2);
        assert!(!v.is_inline());
        v.retain_mut(|x| {
            *x += 1;
            *x > 2
        });
        assert_eq!(v, [4, 5]);
        assert!(v.is_inline());
    }

    #[test]
    fn checked_access() {
        let mut v: HybridVec<i32, 4> = hybridvec![1, 2, 3];
        assert_eq!(v.at(0), Ok(&1));
        assert_eq!(v.at(3), Err(Error::OutOfRange { index: 3, len: 3 }));
        assert_eq!(
            format!("{}", v.at(10).unwrap_err()),
            "The index is out of range"
        );

        *v.at_mut(2).unwrap() = 30;
        assert_eq!(v, [1, 2, 30]);
        assert!(v.at_mut(3).is_err());
    }

    #[test]
    fn clear_is_idempotent() {
        let mut v: HybridVec<i32, 2> = HybridVec::new();
        v.clear();
        assert!(v.is_empty());
        assert!(v.is_inline());

        v.extend([1, 2, 3]);
        v.clear();
        v.clear();
        assert!(v.is_empty());
        assert!(v.is_inline());
        assert_eq!(v.capacity(), 2);
    }

    #[test]
    fn equality_ignores_storage_mode() {
        let mut heap: HybridVec<i32, 2> = hybridvec![1, 2, 3];
        let inline: HybridVec<i32, 8> = hybridvec![1, 2, 3];
        assert!(!heap.is_inline());
        assert!(inline.is_inline());
        assert_eq!(heap, inline);
        assert_eq!(inline, heap);
        assert_eq!(heap, heap.clone());

        heap.push(4);
        assert_ne!(heap, inline);
        assert_eq!(heap, vec![1, 2, 3, 4]);
    }

    #[test]
    fn clone_keeps_mode_and_capacity() {
        let mut v: HybridVec<String, 2> = HybridVec::new();
        for i in 0..5 {
            v.push(format!("{i}"));
        }
        let c = v.clone();
        assert_eq!(c, v);
        assert_eq!(c.capacity(), v.capacity());
        assert!(!c.is_inline());
        assert_ne!(c.as_ptr(), v.as_ptr());

        let small: HybridVec<String, 2> = hybridvec![String::from("a")];
        let mut target = c.clone();
        target.clone_from(&small);
        assert_eq!(target, small);
        assert!(target.is_inline());

        let mut target: HybridVec<String, 2> = HybridVec::new();
        target.clone_from(&v);
        assert_eq!(target, v);
        assert_eq!(target.capacity(), v.capacity());
    }

    #[test]
    fn constructors() {
        let v: HybridVec<i32, 4> = HybridVec::from_elem(7, 3);
        assert_eq!(v, [7, 7, 7]);
        assert!(v.is_inline());

        let v: HybridVec<i32, 4> = hybridvec![7; 6];
        assert_eq!(v.capacity(), 9);

        let v: HybridVec<i32, 4> = HybridVec::from_slice(&[1, 2, 3, 4, 5]);
        assert_eq!(v.capacity(), 7);

        let v: HybridVec<i32, 4> = vec![1, 2].into();
        assert!(v.is_inline());

        let v: HybridVec<i32, 4> = vec![1, 2, 3, 4, 5, 6].into();
        assert_eq!(v.capacity(), 9);
        assert_eq!(v.into_vec(), [1, 2, 3, 4, 5, 6]);

        let v: HybridVec<i32> = HybridVec::new();
        assert_eq!(v.capacity(), 16);
    }

    #[test]
    fn range_round_trip() {
        let source = [5, 3, 8, 1, 9, 2, 7];
        let v: HybridVec<i32, 4> = source.iter().copied().collect();
        assert!(v.iter().eq(source.iter()));
        assert!(v.iter().rev().eq(source.iter().rev()));

        let owned: Vec<i32> = v.into_iter().collect();
        assert_eq!(owned, source);
    }

    #[test]
    fn drops_every_element_once() {
        let marker = Rc::new(());
        {
            let mut v: HybridVec<Rc<()>, 3> = HybridVec::new();
            for _ in 0..10 {
                v.push(marker.clone());
            }
            v.erase_range(1..8);
            assert_eq!(Rc::strong_count(&marker), 4);
            v.insert_many(1, vec![marker.clone(), marker.clone()]);
            assert_eq!(Rc::strong_count(&marker), 6);

            let mut iter = v.into_iter();
            iter.next();
        }
        assert_eq!(Rc::strong_count(&marker), 1);
    }

    #[test]
    fn try_reserve_reports_overflow() {
        let mut v: HybridVec<u8, 4> = hybridvec![1, 2];
        assert_eq!(v.try_reserve(usize::MAX), Err(Error::CapacityOverflow));
        assert_eq!(v, [1, 2]);
        assert!(v.is_inline());

        let err = v.try_reserve(usize::MAX / 2).unwrap_err();
        assert!(matches!(err, Error::AllocFailed(_)));
        assert_eq!(v, [1, 2]);
        assert!(v.is_inline());
    }

    /// Random operation sequences checked against `Vec`.
    #[test]
    fn matches_vec_model() {
        let mut rng = StdRng::seed_from_u64(0x5eed_1e55);
        let mut v: HybridVec<u32, 4> = HybridVec::new();
        let mut model: Vec<u32> = Vec::new();

        for step in 0..5000u32 {
            let before = (v.is_inline(), v.capacity());
            match rng.random_range(0..8) {
                0 | 1 => {
                    v.push(step);
                    model.push(step);
                }
                2 => assert_eq!(v.pop(), model.pop()),
                3 => {
                    let index = rng.random_range(0..=model.len());
                    v.insert(index, step);
                    model.insert(index, step);
                }
                4 if !model.is_empty() => {
                    let index = rng.random_range(0..model.len());
                    assert_eq!(v.erase(index), index);
                    model.remove(index);
                }
                5 if !model.is_empty() => {
                    let start = rng.random_range(0..model.len());
                    let end = rng.random_range(start..=model.len());
                    assert_eq!(v.erase_range(start..end), start);
                    model.drain(start..end);
                }
                6 => {
                    let index = rng.random_range(0..=model.len());
                    let run: Vec<u32> = (0..rng.random_range(0..6)).map(|i| step + i).collect();
                    v.insert_many(index, run.iter().copied());
                    model.splice(index..index, run);
                }
                7 if rng.random_bool(0.05) => {
                    v.clear();
                    model.clear();
                }
                _ => {}
            }

            assert_eq!(v, model);
            assert_mode_invariant(&v);
            let after = (v.is_inline(), v.capacity());
            if !v.is_inline() && after != before {
                let len = v.len();
                assert_eq!(v.capacity(), len + len / 2);
            }
        }
    }
}
