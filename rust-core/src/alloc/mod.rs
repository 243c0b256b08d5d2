//! Aligned buffer allocation
//!
//! Every buffer handed out here starts on a 32-byte boundary, or on the
//! element type's own alignment when that is wider.

pub mod block;
pub mod buffer;
pub mod channels;

pub use block::{alignment_for, AllocStrategy, ALIGNMENT};
pub use buffer::AlignedBuffer;
pub use channels::ChannelSet;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocError {
    #[error("Out of memory allocating {bytes} bytes")]
    OutOfMemory { bytes: usize },

    #[error("Buffer of {count} elements of {element_size} bytes overflows the address space")]
    CapacityOverflow { count: usize, element_size: usize },

    #[error("Alignment of {align} bytes is not a power of two of at least 32")]
    InvalidAlignment { align: usize },
}

/// Allocate an aligned buffer of `count` elements.
///
/// Contents are unspecified; use [`allocate_and_zero`] when they matter.
pub fn allocate<T: Copy + Default>(count: usize) -> Result<AlignedBuffer<T>, AllocError> {
    AlignedBuffer::allocate(count)
}

/// Allocate an aligned buffer of `count` default (zero) elements.
pub fn allocate_and_zero<T: Copy + Default>(count: usize) -> Result<AlignedBuffer<T>, AllocError> {
    AlignedBuffer::allocate_and_zero(count)
}

/// Release a buffer. Passing `None` is a no-op.
pub fn deallocate<T: Copy + Default>(buffer: Option<AlignedBuffer<T>>) {
    drop(buffer);
}

/// Resize a buffer, preserving the first `min(old, new)` elements.
///
/// A `None` buffer behaves like a fresh allocation.
pub fn reallocate<T: Copy + Default>(
    buffer: Option<AlignedBuffer<T>>,
    count: usize,
) -> Result<AlignedBuffer<T>, AllocError> {
    match buffer {
        Some(mut buf) => {
            buf.reallocate(count)?;
            Ok(buf)
        }
        None => AlignedBuffer::allocate(count),
    }
}

/// Resize a buffer, preserving old contents and zeroing only the added tail.
pub fn reallocate_and_zero_extension<T: Copy + Default>(
    buffer: Option<AlignedBuffer<T>>,
    count: usize,
) -> Result<AlignedBuffer<T>, AllocError> {
    match buffer {
        Some(mut buf) => {
            buf.reallocate_and_zero_extension(count)?;
            Ok(buf)
        }
        None => AlignedBuffer::allocate_and_zero(count),
    }
}

/// Resize a buffer and zero all of its contents.
pub fn reallocate_and_zero<T: Copy + Default>(
    buffer: Option<AlignedBuffer<T>>,
    count: usize,
) -> Result<AlignedBuffer<T>, AllocError> {
    match buffer {
        Some(mut buf) => {
            buf.reallocate_and_zero(count)?;
            Ok(buf)
        }
        None => AlignedBuffer::allocate_and_zero(count),
    }
}

/// Allocate `channels` aligned buffers of `count` elements each.
pub fn allocate_channels<T: Copy + Default>(
    channels: usize,
    count: usize,
) -> Result<ChannelSet<T>, AllocError> {
    ChannelSet::allocate(channels, count)
}

/// Allocate `channels` zeroed aligned buffers of `count` elements each.
pub fn allocate_and_zero_channels<T: Copy + Default>(
    channels: usize,
    count: usize,
) -> Result<ChannelSet<T>, AllocError> {
    ChannelSet::allocate_and_zero(channels, count)
}

/// Release a channel set. Passing `None` is a no-op.
pub fn deallocate_channels<T: Copy + Default>(set: Option<ChannelSet<T>>) {
    drop(set);
}

/// Resize a channel set, preserving overlapping channels and elements.
pub fn reallocate_channels<T: Copy + Default>(
    set: Option<ChannelSet<T>>,
    channels: usize,
    count: usize,
) -> Result<ChannelSet<T>, AllocError> {
    match set {
        Some(mut set) => {
            set.reallocate(channels, count)?;
            Ok(set)
        }
        None => ChannelSet::allocate(channels, count),
    }
}

/// Resize a channel set, zeroing everything not carried over.
pub fn reallocate_and_zero_extend_channels<T: Copy + Default>(
    set: Option<ChannelSet<T>>,
    channels: usize,
    count: usize,
) -> Result<ChannelSet<T>, AllocError> {
    match set {
        Some(mut set) => {
            set.reallocate_and_zero_extend(channels, count)?;
            Ok(set)
        }
        None => ChannelSet::allocate_and_zero(channels, count),
    }
}
