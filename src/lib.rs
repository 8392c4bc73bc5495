//! ## Intro
//!
//! A vector that stores small collections inline and spills to the heap when needed.
//!
//! [`HybridVec<T, N>`] keeps up to `N` elements in a fixed array embedded in the
//! value. The first insertion beyond `N` promotes it to a heap buffer; any removal
//! that brings the length back to `N` or below demotes it again and releases
//! the buffer. Heap buffers are always sized `floor(1.5 * m)`, where `m` is the
//! number of elements the operation needs room for.
//!
//! ```
//! # use hybridvec::{HybridVec, hybridvec};
//! let mut vec: HybridVec<i32, 4> = hybridvec![1, 2, 3];
//! assert!(vec.is_inline());
//!
//! // Beyond the inline capacity the data moves to the heap.
//! vec.extend([4, 5, 6]);
//! assert!(!vec.is_inline());
//! assert_eq!(vec.capacity(), 9);
//!
//! // And back once it fits again.
//! vec.truncate(4);
//! assert!(vec.is_inline());
//! ```
//!
//! Positions are plain indices: [`insert`](HybridVec::insert),
//! [`erase`](HybridVec::erase) and [`erase_range`](HybridVec::erase_range)
//! return the index of the affected position, which stays meaningful across
//! storage transitions.
//!
//! ## Comparison
//!
//! | Feature | HybridVec | SmallVec | Vec |
//! |---------|-----------|----------|-----|
//! | Inline storage | ✓ | ✓ | ✗ |
//! | Returns to inline on shrink | ✓ | ✗ | - |
//! | Growth factor | 1.5 | 2 | 2 |
//!
//! ### Alias
//!
//! - [`MiniHybridVec<T>`] = `HybridVec<T, 8>`
//! - `HybridVec<T>` uses [`DEFAULT_INLINE_CAPACITY`] elements inline.
//!
//! ## `no_std` support
//!
//! This crate requires only `core` and `alloc`.
//!
//! ## Optional features
//!
//! ### `std`
//!
//! Implements [`std::io::Write`] for `HybridVec<u8, N>`.
//!
//! ### `serde`
//!
//! Implements `Serialize` and `Deserialize` for [`HybridVec`], as a plain sequence.
//!
//! ### `log`
//!
//! Emits a `trace` record with target `hybridvec` for every promotion,
//! reallocation and demotion.
//!
//! [`std::io::Write`]: https://doc.rust-lang.org/std/io/trait.Write.html
#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod error;
mod inline_vec;
mod utils;

pub mod hybrid_vec;

#[cfg(feature = "serde")]
mod serde;

#[cfg(feature = "std")]
mod std_io;

#[doc(inline)]
pub use error::Error;
#[doc(inline)]
pub use hybrid_vec::HybridVec;

/// Inline capacity of [`HybridVec<T>`] when none is given.
pub const DEFAULT_INLINE_CAPACITY: usize = 16;

/// A `HybridVec` with an inline capacity of 8 elements.
///
/// # Examples
///
/// ```
/// # use hybridvec::MiniHybridVec;
/// let mut vec: MiniHybridVec<i32> = MiniHybridVec::new();
/// vec.extend([1, 2, 3]);
/// assert!(vec.is_inline());
///
/// vec.extend([4, 5, 6, 7, 8, 9]);
/// assert!(!vec.is_inline());
/// assert_eq!(vec.len(), 9);
/// ```
pub type MiniHybridVec<T> = HybridVec<T, 8>;
