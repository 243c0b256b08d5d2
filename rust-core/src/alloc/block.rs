//! Raw aligned memory blocks
//!
//! Two ways of obtaining a block aligned to at least [`ALIGNMENT`] bytes:
//!
//! * [`AllocStrategy::Native`] asks the global allocator for the alignment
//!   directly.
//! * [`AllocStrategy::HeaderPrefixed`] over-allocates with only word
//!   alignment, hand-aligns the returned address, and stores a
//!   [`BlockHeader`] immediately before it. The header records the true
//!   block start and size, so the block can be released from the aligned
//!   pointer alone.
//!
//! Invariant for header-prefixed blocks: for every aligned pointer `p`
//! returned by [`allocate`], `p - size_of::<BlockHeader>()` holds a header
//! whose `start <= p - size_of::<BlockHeader>()` and whose
//! `start + size >= p + bytes`.

use std::alloc::{alloc, dealloc, Layout};
use std::mem;
use std::ptr::NonNull;

use super::AllocError;

/// Minimum byte alignment of every block
pub const ALIGNMENT: usize = 32;

/// Block alignment for elements of type `T`: [`ALIGNMENT`], or more for
/// over-aligned types
pub const fn alignment_for<T>() -> usize {
    let align = mem::align_of::<T>();
    if align > ALIGNMENT {
        align
    } else {
        ALIGNMENT
    }
}

/// How an aligned block is obtained from the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AllocStrategy {
    /// Platform aligned allocation
    #[default]
    Native,

    /// Over-allocate and stash the true block start ahead of the aligned address
    HeaderPrefixed,
}

/// Bookkeeping stored just before a header-prefixed aligned address
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct BlockHeader {
    /// Start of the underlying allocation
    pub start: *mut u8,

    /// Total size of the underlying allocation in bytes
    pub size: usize,
}

const HEADER_SIZE: usize = mem::size_of::<BlockHeader>();
const HEADER_ALIGN: usize = mem::align_of::<BlockHeader>();

/// Allocate `bytes` bytes aligned to `align`.
///
/// `align` must be a power of two no smaller than [`ALIGNMENT`].
/// Zero-byte requests still return a unique, releasable block.
pub fn allocate(bytes: usize, align: usize, strategy: AllocStrategy) -> Result<NonNull<u8>, AllocError> {
    if !align.is_power_of_two() || align < ALIGNMENT {
        return Err(AllocError::InvalidAlignment { align });
    }
    match strategy {
        AllocStrategy::Native => allocate_native(bytes, align),
        AllocStrategy::HeaderPrefixed => allocate_prefixed(bytes, align),
    }
}

/// Release a block obtained from [`allocate`].
///
/// # Safety
/// `ptr` must have come from [`allocate`] with the same `bytes`, `align`
/// and `strategy`, and must not have been released already.
pub unsafe fn release(ptr: NonNull<u8>, bytes: usize, align: usize, strategy: AllocStrategy) {
    match strategy {
        AllocStrategy::Native => {
            let layout = Layout::from_size_align_unchecked(bytes.max(1), align);
            dealloc(ptr.as_ptr(), layout);
        }
        AllocStrategy::HeaderPrefixed => {
            let header = read_header(ptr);
            let layout = Layout::from_size_align_unchecked(header.size, HEADER_ALIGN);
            dealloc(header.start, layout);
        }
    }
}

/// Read the header stored ahead of a header-prefixed block.
///
/// # Safety
/// `ptr` must be a live block allocated with [`AllocStrategy::HeaderPrefixed`].
pub unsafe fn read_header(ptr: NonNull<u8>) -> BlockHeader {
    ptr.as_ptr()
        .sub(HEADER_SIZE)
        .cast::<BlockHeader>()
        .read()
}

fn allocate_native(bytes: usize, align: usize) -> Result<NonNull<u8>, AllocError> {
    let layout = Layout::from_size_align(bytes.max(1), align)
        .map_err(|_| AllocError::OutOfMemory { bytes })?;
    // SAFETY: layout has non-zero size
    let ptr = unsafe { alloc(layout) };
    NonNull::new(ptr).ok_or(AllocError::OutOfMemory { bytes })
}

fn allocate_prefixed(bytes: usize, align: usize) -> Result<NonNull<u8>, AllocError> {
    let total = bytes
        .checked_add(HEADER_SIZE + align)
        .ok_or(AllocError::OutOfMemory { bytes })?;
    let layout = Layout::from_size_align(total, HEADER_ALIGN)
        .map_err(|_| AllocError::OutOfMemory { bytes })?;

    // SAFETY: layout has non-zero size
    let start = unsafe { alloc(layout) };
    if start.is_null() {
        return Err(AllocError::OutOfMemory { bytes });
    }

    // Smallest offset that leaves room for the header and lands on the boundary.
    // start is HEADER_ALIGN-aligned, so offset <= HEADER_SIZE + align - HEADER_ALIGN.
    let misalignment = (start as usize + HEADER_SIZE) % align;
    let offset = HEADER_SIZE + (align - misalignment) % align;

    // SAFETY: offset + bytes <= total, and the header slot is HEADER_ALIGN-aligned
    // because both the aligned address and HEADER_SIZE are multiples of it.
    unsafe {
        let aligned = start.add(offset);
        aligned
            .sub(HEADER_SIZE)
            .cast::<BlockHeader>()
            .write(BlockHeader { start, size: total });
        Ok(NonNull::new_unchecked(aligned))
    }
}
