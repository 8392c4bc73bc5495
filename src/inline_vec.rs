use alloc::vec::Vec;
use core::{
    fmt,
    iter::FusedIterator,
    mem::{ManuallyDrop, MaybeUninit},
    ptr,
};

use crate::Error;

/// Fixed-capacity storage embedded in the owning value.
///
/// This is the inline mode of [`HybridVec`](crate::HybridVec): up to `N`
/// elements live in `data`, the first `len` of which are initialized.
pub(crate) struct InlineVec<T, const N: usize> {
    data: [MaybeUninit<T>; N],
    len: usize,
}

unsafe impl<T, const N: usize> Send for InlineVec<T, N> where T: Send {}
unsafe impl<T, const N: usize> Sync for InlineVec<T, N> where T: Sync {}

impl<T, const N: usize> Drop for InlineVec<T, N> {
    // Slots are `MaybeUninit`, live elements must be dropped by hand.
    fn drop(&mut self) {
        if self.len > 0 {
            // SAFETY: the first `len` slots are initialized.
            unsafe {
                ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.as_mut_ptr(), self.len));
            }
        }
    }
}

impl<T, const N: usize> InlineVec<T, N> {
    #[inline]
    pub(crate) const fn new() -> Self {
        Self {
            // SAFETY: an array of `MaybeUninit` needs no initialization.
            data: unsafe { MaybeUninit::<[MaybeUninit<T>; N]>::uninit().assume_init() },
            len: 0,
        }
    }

    #[inline(always)]
    pub(crate) const fn as_ptr(&self) -> *const T {
        &raw const self.data as *const T
    }

    #[inline(always)]
    pub(crate) const fn as_mut_ptr(&mut self) -> *mut T {
        &raw mut self.data as *mut T
    }

    #[inline(always)]
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) const fn as_slice(&self) -> &[T] {
        // SAFETY: the first `len` slots are initialized.
        unsafe { core::slice::from_raw_parts(self.as_ptr(), self.len) }
    }

    #[inline]
    pub(crate) const fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: the first `len` slots are initialized.
        unsafe { core::slice::from_raw_parts_mut(self.as_mut_ptr(), self.len) }
    }

    /// Append `value`.
    ///
    /// # Panics
    /// Panics if the buffer is full.
    #[inline(always)]
    pub(crate) fn push(&mut self, value: T) {
        let len = self.len;
        assert!(len < N, "inline capacity exceeded during `push`");

        // SAFETY: `len < N`, the slot is in bounds and uninitialized.
        unsafe {
            ptr::write(self.as_mut_ptr().add(len), value);
        }
        self.len = len + 1;
    }

    #[inline]
    pub(crate) const fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            None
        } else {
            self.len -= 1;
            // SAFETY: the slot at the old `len - 1` is initialized and now logically removed.
            unsafe { Some(ptr::read(self.as_ptr().add(self.len))) }
        }
    }

    /// Insert `element` before `index`, shifting the tail right.
    ///
    /// # Panics
    /// Panics if `index > len` or the buffer is full.
    #[inline]
    pub(crate) fn insert(&mut self, index: usize, element: T) {
        assert!(index <= self.len, "insertion index should be <= len");
        assert!(self.len < N, "inline capacity exceeded during `insert`");

        // SAFETY: `index <= len < N`, shifting the tail by one stays in bounds.
        unsafe {
            let ptr = self.as_mut_ptr().add(index);
            if index < self.len {
                ptr::copy(ptr, ptr.add(1), self.len - index);
            }
            ptr::write(ptr, element);
        }
        self.len += 1;
    }

    /// Remove the element at `index`, shifting the tail left.
    ///
    /// # Panics
    /// Panics if `index >= len`.
    #[inline]
    pub(crate) const fn remove(&mut self, index: usize) -> T {
        assert!(index < self.len, "removal index should be < len");

        // SAFETY: `index < len`, the element is read out once and the gap closed.
        unsafe {
            let ptr = self.as_mut_ptr().add(index);
            let value = ptr::read(ptr);
            ptr::copy(ptr.add(1), ptr, self.len - index - 1);
            self.len -= 1;
            value
        }
    }

    /// Drop the elements in `start..end` and close the gap.
    ///
    /// The caller has validated `start <= end <= len`.
    pub(crate) fn remove_range(&mut self, start: usize, end: usize) {
        debug_assert!(start <= end && end <= self.len);
        if start == end {
            return;
        }
        let old_len = self.len;
        // Shrink first so a panicking destructor cannot cause a double drop.
        self.len = start;
        // SAFETY: `start..end` are initialized and dropped exactly once,
        // then the initialized tail `end..old_len` is moved down to `start`.
        unsafe {
            let base = self.as_mut_ptr();
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(base.add(start), end - start));
            ptr::copy(base.add(end), base.add(start), old_len - end);
        }
        self.len = old_len - (end - start);
    }

    /// Keep only the elements for which `f` returns `true`, preserving order.
    pub(crate) fn retain_mut<F: FnMut(&mut T) -> bool>(&mut self, mut f: F) {
        let len = self.len;
        // Leak rather than double drop if `f` panics.
        self.len = 0;

        let base = self.as_mut_ptr();
        let mut kept = 0usize;
        for index in 0..len {
            // SAFETY: every slot in `0..len` is visited once; kept elements are
            // moved down into slots already vacated.
            unsafe {
                let cur = base.add(index);
                if f(&mut *cur) {
                    if kept != index {
                        ptr::copy_nonoverlapping(cur, base.add(kept), 1);
                    }
                    kept += 1;
                } else {
                    ptr::drop_in_place(cur);
                }
            }
        }
        self.len = kept;
    }

    #[inline]
    pub(crate) fn truncate(&mut self, len: usize) {
        if self.len > len {
            let old_len = self.len;
            self.len = len;
            // SAFETY: `len..old_len` are initialized and no longer reachable.
            unsafe {
                ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                    self.as_mut_ptr().add(len),
                    old_len - len,
                ))
            }
        }
    }

    #[inline]
    pub(crate) fn clear(&mut self) {
        self.truncate(0);
    }

    /// Move every element of `vec` into a new inline buffer, leaving `vec` empty.
    ///
    /// # Safety
    /// `vec.len() <= N`.
    #[inline]
    pub(crate) unsafe fn take_from_vec(vec: &mut Vec<T>) -> Self {
        let len = vec.len();
        debug_assert!(len <= N);

        let mut inline = Self::new();
        // SAFETY: `len <= N`; ownership moves bitwise and `vec` forgets its elements.
        unsafe {
            ptr::copy_nonoverlapping(vec.as_ptr(), inline.as_mut_ptr(), len);
            vec.set_len(0);
        }
        inline.len = len;
        inline
    }

    /// Move every element into a new [`Vec`] with room for `capacity` elements,
    /// leaving `self` empty.
    ///
    /// The allocation happens before anything is moved, so on error `self` is untouched.
    pub(crate) fn try_into_vec_with_capacity(&mut self, capacity: usize) -> Result<Vec<T>, Error> {
        let capacity = capacity.max(self.len);
        let mut vec: Vec<T> = Vec::new();
        vec.try_reserve_exact(capacity)?;

        // SAFETY: `vec` has room for `len` elements; ownership moves bitwise.
        unsafe {
            ptr::copy_nonoverlapping(self.as_ptr(), vec.as_mut_ptr(), self.len);
            vec.set_len(self.len);
        }
        self.len = 0;
        Ok(vec)
    }
}

impl<T: Clone, const N: usize> Clone for InlineVec<T, N> {
    fn clone(&self) -> Self {
        let mut vec = Self::new();
        for item in self.as_slice() {
            vec.push(item.clone());
        }
        vec
    }
}

impl<T: fmt::Debug, const N: usize> fmt::Debug for InlineVec<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_slice(), f)
    }
}

/// An iterator that moves elements out of an [`InlineVec`].
pub(crate) struct IntoIter<T, const N: usize> {
    vec: ManuallyDrop<InlineVec<T, N>>,
    index: usize,
}

impl<T, const N: usize> IntoIterator for InlineVec<T, N> {
    type Item = T;
    type IntoIter = IntoIter<T, N>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            vec: ManuallyDrop::new(self),
            index: 0,
        }
    }
}

impl<T, const N: usize> IntoIter<T, N> {
    #[inline]
    pub(crate) fn as_slice(&self) -> &[T] {
        &self.vec.as_slice()[self.index..]
    }

    #[inline]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        let index = self.index;
        &mut self.vec.as_mut_slice()[index..]
    }
}

impl<T, const N: usize> Iterator for IntoIter<T, N> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.index < self.vec.len {
            self.index += 1;
            // SAFETY: each slot in `index..len` is read at most once.
            unsafe { Some(ptr::read(self.vec.as_ptr().add(self.index - 1))) }
        } else {
            None
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let v = self.vec.len - self.index;
        (v, Some(v))
    }
}

impl<T, const N: usize> DoubleEndedIterator for IntoIter<T, N> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.index < self.vec.len {
            self.vec.len -= 1;
            // SAFETY: the slot at the new `len` is initialized and read once.
            unsafe { Some(ptr::read(self.vec.as_ptr().add(self.vec.len))) }
        } else {
            None
        }
    }
}

impl<T, const N: usize> ExactSizeIterator for IntoIter<T, N> {}

impl<T, const N: usize> FusedIterator for IntoIter<T, N> {}

impl<T, const N: usize> Drop for IntoIter<T, N> {
    fn drop(&mut self) {
        if self.index < self.vec.len {
            // SAFETY: `index..len` have not been yielded yet.
            unsafe {
                ptr::drop_in_place(core::slice::from_raw_parts_mut(
                    self.vec.as_mut_ptr().add(self.index),
                    self.vec.len - self.index,
                ));
            }
        }
    }
}

impl<T: Clone, const N: usize> Clone for IntoIter<T, N> {
    fn clone(&self) -> Self {
        let mut vec = InlineVec::new();
        for item in self.as_slice() {
            vec.push(item.clone());
        }
        vec.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::{rc::Rc, vec};

    #[test]
    fn push_insert_remove() {
        let mut v: InlineVec<i32, 4> = InlineVec::new();
        v.push(1);
        v.push(3);
        v.insert(1, 2);
        assert_eq!(v.as_slice(), [1, 2, 3]);
        assert_eq!(v.remove(0), 1);
        assert_eq!(v.as_slice(), [2, 3]);
        assert_eq!(v.pop(), Some(3));
        assert_eq!(v.pop(), Some(2));
        assert_eq!(v.pop(), None);
    }

    #[test]
    #[should_panic(expected = "inline capacity exceeded during `push`")]
    fn push_past_capacity() {
        let mut v: InlineVec<i32, 1> = InlineVec::new();
        v.push(1);
        v.push(2);
    }

    #[test]
    fn remove_range_drops_exactly_once() {
        let marker = Rc::new(());
        let mut v: InlineVec<Rc<()>, 6> = InlineVec::new();
        for _ in 0..6 {
            v.push(marker.clone());
        }
        v.remove_range(1, 4);
        assert_eq!(v.len(), 3);
        assert_eq!(Rc::strong_count(&marker), 4);
        drop(v);
        assert_eq!(Rc::strong_count(&marker), 1);
    }

    #[test]
    fn retain_keeps_order() {
        let mut v: InlineVec<i32, 6> = InlineVec::new();
        for i in 0..6 {
            v.push(i);
        }
        v.retain_mut(|x| *x % 2 == 1);
        assert_eq!(v.as_slice(), [1, 3, 5]);
    }

    #[test]
    fn vec_round_trip() {
        let mut src = vec![1, 2, 3];
        let mut v: InlineVec<i32, 3> = unsafe { InlineVec::take_from_vec(&mut src) };
        assert!(src.is_empty());
        assert_eq!(v.len(), 3);

        let out = v.try_into_vec_with_capacity(7).unwrap();
        assert_eq!(out, [1, 2, 3]);
        assert!(out.capacity() >= 7);
        assert_eq!(v.len(), 0);
    }

    #[test]
    fn into_iter_partial_drop() {
        let marker = Rc::new(());
        let mut v: InlineVec<Rc<()>, 4> = InlineVec::new();
        for _ in 0..4 {
            v.push(marker.clone());
        }
        let mut iter = v.into_iter();
        let first = iter.next();
        let last = iter.next_back();
        assert_eq!(iter.len(), 2);
        drop(iter);
        assert_eq!(Rc::strong_count(&marker), 3);
        drop((first, last));
        assert_eq!(Rc::strong_count(&marker), 1);
    }
}
