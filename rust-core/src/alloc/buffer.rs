//! Owned, aligned sample buffer
//!
//! Blocks are aligned to [`ALIGNMENT`](block::ALIGNMENT) bytes, or to the element type's own
//! alignment when that is larger.
//!
//! Dropping the buffer releases its block, so a buffer bound in a scope is
//! released on every exit path, including early returns through `?`.

use std::fmt;
use std::mem;
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;
use std::slice;

use super::block::{self, alignment_for, AllocStrategy};
use super::AllocError;

/// Contiguous aligned array of `len` elements
pub struct AlignedBuffer<T: Copy + Default> {
    ptr: NonNull<T>,
    len: usize,
    strategy: AllocStrategy,
}

// SAFETY: the buffer uniquely owns its block, like a Vec<T>
unsafe impl<T: Copy + Default + Send> Send for AlignedBuffer<T> {}
unsafe impl<T: Copy + Default + Sync> Sync for AlignedBuffer<T> {}

impl<T: Copy + Default> AlignedBuffer<T> {
    const ALIGN: usize = alignment_for::<T>();

    /// Allocate `count` elements with the native strategy.
    ///
    /// Contents are unspecified.
    pub fn allocate(count: usize) -> Result<Self, AllocError> {
        Self::allocate_with(count, AllocStrategy::Native)
    }

    /// Allocate `count` elements, all set to `T::default()`.
    pub fn allocate_and_zero(count: usize) -> Result<Self, AllocError> {
        Self::allocate_and_zero_with(count, AllocStrategy::Native)
    }

    /// Allocate `count` elements using an explicit strategy.
    pub fn allocate_with(count: usize, strategy: AllocStrategy) -> Result<Self, AllocError> {
        let bytes = Self::byte_len(count)?;
        let raw = block::allocate(bytes, Self::ALIGN, strategy)?;
        let ptr = raw.cast::<T>();

        // Elements are always initialised so the slice views stay sound;
        // callers of the non-zeroing variants must not rely on the values.
        unsafe {
            for i in 0..count {
                ptr.as_ptr().add(i).write(T::default());
            }
        }

        Ok(Self {
            ptr,
            len: count,
            strategy,
        })
    }

    /// Allocate `count` default elements using an explicit strategy.
    pub fn allocate_and_zero_with(count: usize, strategy: AllocStrategy) -> Result<Self, AllocError> {
        let mut buf = Self::allocate_with(count, strategy)?;
        buf.fill(T::default());
        Ok(buf)
    }

    /// Allocate a buffer holding a copy of `values`.
    pub fn from_slice(values: &[T]) -> Result<Self, AllocError> {
        let mut buf = Self::allocate(values.len())?;
        buf.copy_from_slice(values);
        Ok(buf)
    }

    /// Resize to `count` elements, preserving the first `min(len, count)`.
    ///
    /// Elements past the old length are unspecified. On failure the
    /// buffer is left untouched.
    pub fn reallocate(&mut self, count: usize) -> Result<(), AllocError> {
        let mut fresh = Self::allocate_with(count, self.strategy)?;
        let keep = self.len.min(count);
        fresh[..keep].copy_from_slice(&self[..keep]);
        *self = fresh;
        Ok(())
    }

    /// Resize, preserving old contents and zeroing only the added elements.
    pub fn reallocate_and_zero_extension(&mut self, count: usize) -> Result<(), AllocError> {
        let old = self.len;
        self.reallocate(count)?;
        if count > old {
            self[old..].fill(T::default());
        }
        Ok(())
    }

    /// Resize and zero every element.
    pub fn reallocate_and_zero(&mut self, count: usize) -> Result<(), AllocError> {
        self.reallocate(count)?;
        self.fill(T::default());
        Ok(())
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the buffer holds no elements
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Allocation strategy this buffer was created with
    pub fn strategy(&self) -> AllocStrategy {
        self.strategy
    }

    /// Check the start address against [`ALIGNMENT`](block::ALIGNMENT) and the alignment of `T`
    pub fn is_aligned(&self) -> bool {
        self.ptr.as_ptr() as usize % Self::ALIGN == 0
    }

    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    fn byte_len(count: usize) -> Result<usize, AllocError> {
        count
            .checked_mul(mem::size_of::<T>())
            .filter(|&bytes| bytes <= isize::MAX as usize - 2 * Self::ALIGN)
            .ok_or(AllocError::CapacityOverflow {
                count,
                element_size: mem::size_of::<T>(),
            })
    }
}

impl<T: Copy + Default> Drop for AlignedBuffer<T> {
    fn drop(&mut self) {
        let bytes = self.len * mem::size_of::<T>();
        // SAFETY: ptr came from block::allocate with these parameters
        unsafe { block::release(self.ptr.cast::<u8>(), bytes, Self::ALIGN, self.strategy) };
    }
}

impl<T: Copy + Default> Deref for AlignedBuffer<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T: Copy + Default> DerefMut for AlignedBuffer<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<T: Copy + Default> AsRef<[T]> for AlignedBuffer<T> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: Copy + Default> AsMut<[T]> for AlignedBuffer<T> {
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: Copy + Default + fmt::Debug> fmt::Debug for AlignedBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlignedBuffer")
            .field("len", &self.len)
            .field("strategy", &self.strategy)
            .field("data", &self.as_slice())
            .finish()
    }
}
