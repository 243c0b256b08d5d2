//! Multi-channel buffer sets
//!
//! One aligned buffer per channel, indexed by an ordinary (unaligned) Vec.
//! Every channel always has the same length.

use std::ops::{Deref, Index, IndexMut};

use super::buffer::AlignedBuffer;
use super::AllocError;

/// Set of equally sized aligned channel buffers
#[derive(Debug)]
pub struct ChannelSet<T: Copy + Default> {
    channels: Vec<AlignedBuffer<T>>,
    count: usize,
}

impl<T: Copy + Default> ChannelSet<T> {
    /// Allocate `channels` buffers of `count` elements (contents unspecified)
    pub fn allocate(channels: usize, count: usize) -> Result<Self, AllocError> {
        let buffers = (0..channels)
            .map(|_| AlignedBuffer::allocate(count))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            channels: buffers,
            count,
        })
    }

    /// Allocate `channels` zeroed buffers of `count` elements
    pub fn allocate_and_zero(channels: usize, count: usize) -> Result<Self, AllocError> {
        let buffers = (0..channels)
            .map(|_| AlignedBuffer::allocate_and_zero(count))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            channels: buffers,
            count,
        })
    }

    /// Resize to `channels` × `count`, copying the overlapping region.
    ///
    /// Anything outside the overlap is unspecified. On failure the set is
    /// left untouched.
    pub fn reallocate(&mut self, channels: usize, count: usize) -> Result<(), AllocError> {
        let fresh = Self::allocate(channels, count)?;
        self.replace_with(fresh);
        Ok(())
    }

    /// Resize to `channels` × `count`, zeroing everything outside the overlap.
    pub fn reallocate_and_zero_extend(&mut self, channels: usize, count: usize) -> Result<(), AllocError> {
        let fresh = Self::allocate_and_zero(channels, count)?;
        self.replace_with(fresh);
        Ok(())
    }

    fn replace_with(&mut self, mut fresh: Self) {
        let keep = self.count.min(fresh.count);
        for (dst, src) in fresh.channels.iter_mut().zip(self.channels.iter()) {
            dst[..keep].copy_from_slice(&src[..keep]);
        }
        *self = fresh;
    }

    /// Number of channels
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Number of elements in each channel
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn channel(&self, c: usize) -> &[T] {
        &self.channels[c]
    }

    pub fn channel_mut(&mut self, c: usize) -> &mut [T] {
        &mut self.channels[c]
    }

    /// Borrow every channel as a slice
    pub fn as_slices(&self) -> Vec<&[T]> {
        self.channels.iter().map(|c| c.as_slice()).collect()
    }

    /// Mutably borrow every channel as a slice
    pub fn as_mut_slices(&mut self) -> Vec<&mut [T]> {
        self.channels.iter_mut().map(|c| c.as_mut_slice()).collect()
    }
}

impl<T: Copy + Default> Deref for ChannelSet<T> {
    type Target = [AlignedBuffer<T>];

    fn deref(&self) -> &Self::Target {
        &self.channels
    }
}

impl<T: Copy + Default> Index<usize> for ChannelSet<T> {
    type Output = [T];

    fn index(&self, c: usize) -> &[T] {
        self.channel(c)
    }
}

impl<T: Copy + Default> IndexMut<usize> for ChannelSet<T> {
    fn index_mut(&mut self, c: usize) -> &mut [T] {
        self.channel_mut(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channels_equal_length_and_aligned() {
        let set = ChannelSet::<f32>::allocate(4, 37).unwrap();
        assert_eq!(set.channel_count(), 4);
        for ch in set.iter() {
            assert_eq!(ch.len(), 37);
            assert!(ch.is_aligned());
        }
    }

    #[test]
    fn test_reallocate_copies_overlap() {
        let mut set = ChannelSet::<f64>::allocate_and_zero(2, 3).unwrap();
        set[0].copy_from_slice(&[1.0, 2.0, 3.0]);
        set[1].copy_from_slice(&[4.0, 5.0, 6.0]);

        set.reallocate_and_zero_extend(3, 5).unwrap();
        assert_eq!(set.channel_count(), 3);
        assert_eq!(&set[0], &[1.0, 2.0, 3.0, 0.0, 0.0]);
        assert_eq!(&set[1], &[4.0, 5.0, 6.0, 0.0, 0.0]);
        assert_eq!(&set[2], &[0.0; 5]);
    }

    #[test]
    fn test_reallocate_shrinks() {
        let mut set = ChannelSet::<i32>::allocate(3, 4).unwrap();
        for c in 0..3 {
            set[c].copy_from_slice(&[c as i32; 4]);
        }

        set.reallocate(2, 2).unwrap();
        assert_eq!(set.count(), 2);
        assert_eq!(set.as_slices(), vec![&[0, 0][..], &[1, 1][..]]);
    }
}
