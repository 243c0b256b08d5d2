//! Multi-channel layout operations: interleave, deinterleave, fftshift and
//! the channel-set variants of the elementwise ops

use num_traits::{AsPrimitive, Float};

use super::ops::{v_add, v_add_with_gain, v_convert, v_copy, v_sum, v_zero};
use super::Sample;

/// Zip `channels.len()` channels of `count` elements into `dst`:
/// `dst[i * C + c] = src[c][i]`.
///
/// # Panics
/// If `dst` is shorter than `C * count` or any channel shorter than `count`.
pub fn v_interleave<T, S>(dst: &mut [T], src: &[S], count: usize)
where
    T: Sample,
    S: AsRef<[T]>,
{
    match src.len() {
        0 => {}
        1 => v_copy(&mut dst[..count], &src[0].as_ref()[..count]),
        2 => {
            let (left, right) = (&src[0].as_ref()[..count], &src[1].as_ref()[..count]);
            for ((frame, &l), &r) in dst[..2 * count].chunks_exact_mut(2).zip(left).zip(right) {
                frame[0] = l;
                frame[1] = r;
            }
        }
        channels => {
            let dst = &mut dst[..channels * count];
            for (c, channel) in src.iter().enumerate() {
                for (i, &x) in channel.as_ref()[..count].iter().enumerate() {
                    dst[i * channels + c] = x;
                }
            }
        }
    }
}

/// Unzip `src` into `dst.len()` channels of `count` elements; the exact
/// inverse of [`v_interleave`].
///
/// # Panics
/// If `src` is shorter than `C * count` or any channel shorter than `count`.
pub fn v_deinterleave<T, D>(dst: &mut [D], src: &[T], count: usize)
where
    T: Sample,
    D: AsMut<[T]>,
{
    match dst.len() {
        0 => {}
        1 => v_copy(&mut dst[0].as_mut()[..count], &src[..count]),
        2 => {
            let (first, rest) = dst.split_at_mut(1);
            let left = &mut first[0].as_mut()[..count];
            let right = &mut rest[0].as_mut()[..count];
            for ((frame, l), r) in src[..2 * count].chunks_exact(2).zip(left).zip(right) {
                *l = frame[0];
                *r = frame[1];
            }
        }
        channels => {
            let src = &src[..channels * count];
            for (c, channel) in dst.iter_mut().enumerate() {
                for (i, x) in channel.as_mut()[..count].iter_mut().enumerate() {
                    *x = src[i * channels + c];
                }
            }
        }
    }
}

/// Swap the two halves of `buf` in place: `new[i] = old[i + len / 2]`.
///
/// For odd lengths the halves are `len / 2` long and the final element
/// stays where it is, so applying the shift twice is only an identity on
/// even lengths.
pub fn v_fftshift<T: Sample>(buf: &mut [T]) {
    let half = buf.len() / 2;
    let (front, back) = buf.split_at_mut(half);
    front.swap_with_slice(&mut back[..half]);
}

/// Zero every channel
pub fn v_zero_channels<T, D>(dst: &mut [D])
where
    T: Sample,
    D: AsMut<[T]>,
{
    for channel in dst.iter_mut() {
        v_zero(channel.as_mut());
    }
}

/// Copy each source channel into the matching destination channel
pub fn v_copy_channels<T, D, S>(dst: &mut [D], src: &[S])
where
    T: Sample,
    D: AsMut<[T]>,
    S: AsRef<[T]>,
{
    for (d, s) in dst.iter_mut().zip(src) {
        v_copy(d.as_mut(), s.as_ref());
    }
}

/// Channel-wise [`v_convert`]
pub fn v_convert_channels<S, T, D, C>(dst: &mut [D], src: &[C])
where
    S: Sample + AsPrimitive<T>,
    T: Sample,
    D: AsMut<[T]>,
    C: AsRef<[S]>,
{
    for (d, s) in dst.iter_mut().zip(src) {
        v_convert(d.as_mut(), s.as_ref());
    }
}

/// Channel-wise [`v_add`]
pub fn v_add_channels<T, D, S>(dst: &mut [D], src: &[S])
where
    T: Sample,
    D: AsMut<[T]>,
    S: AsRef<[T]>,
{
    for (d, s) in dst.iter_mut().zip(src) {
        v_add(d.as_mut(), s.as_ref());
    }
}

/// Channel-wise [`v_add_with_gain`]
pub fn v_add_channels_with_gain<T, D, S>(dst: &mut [D], src: &[S], gain: T)
where
    T: Sample,
    D: AsMut<[T]>,
    S: AsRef<[T]>,
{
    for (d, s) in dst.iter_mut().zip(src) {
        v_add_with_gain(d.as_mut(), s.as_ref(), gain);
    }
}

/// Single mean over the first `count` elements of every channel (not one
/// per channel).
///
/// # Panics
/// If any channel is shorter than `count`.
pub fn v_mean_channels<T, S>(src: &[S], count: usize) -> T
where
    T: Sample + Float,
    S: AsRef<[T]>,
{
    let total = src
        .iter()
        .fold(T::zero(), |acc, c| acc + v_sum(&c.as_ref()[..count]));
    match T::from(src.len() * count) {
        Some(n) => total / n,
        None => T::nan(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alloc::ChannelSet;

    #[test]
    fn test_interleave_stereo() {
        let left = [1, 2, 3];
        let right = [10, 20, 30];
        let mut out = [0; 6];
        v_interleave(&mut out, &[&left[..], &right[..]], 3);
        assert_eq!(out, [1, 10, 2, 20, 3, 30]);
    }

    #[test]
    fn test_interleave_general_channels() {
        let src = vec![vec![1.0f32, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]];
        let mut out = vec![0.0; 6];
        v_interleave(&mut out, &src, 2);
        assert_eq!(out, vec![1.0, 3.0, 5.0, 2.0, 4.0, 6.0]);
    }

    #[test]
    fn test_roundtrip_channel_counts() {
        for channels in 1..=5 {
            let count = 7;
            let src: Vec<Vec<f64>> = (0..channels)
                .map(|c| (0..count).map(|i| (c * 100 + i) as f64).collect())
                .collect();

            let mut packed = vec![0.0; channels * count];
            v_interleave(&mut packed, &src, count);

            let mut back = vec![vec![0.0; count]; channels];
            v_deinterleave(&mut back, &packed, count);
            assert_eq!(back, src, "channel count {}", channels);
        }
    }

    #[test]
    fn test_interleave_from_channel_set() {
        let mut set = ChannelSet::<f64>::allocate(2, 4).unwrap();
        set[0].copy_from_slice(&[1.0, 2.0, 3.0, 4.0]);
        set[1].copy_from_slice(&[-1.0, -2.0, -3.0, -4.0]);

        let mut packed = vec![0.0; 8];
        v_interleave(&mut packed, &set, 4);
        assert_eq!(packed[..4], [1.0, -1.0, 2.0, -2.0]);

        let mut other = ChannelSet::<f64>::allocate_and_zero(2, 4).unwrap();
        v_deinterleave(&mut other.as_mut_slices(), &packed, 4);
        assert_eq!(other.as_slices(), set.as_slices());
    }

    #[test]
    fn test_fftshift_even() {
        let mut buf = [0, 1, 2, 3, 4, 5];
        v_fftshift(&mut buf);
        assert_eq!(buf, [3, 4, 5, 0, 1, 2]);
        v_fftshift(&mut buf);
        assert_eq!(buf, [0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_fftshift_odd_leaves_last_element() {
        let mut buf = [0, 1, 2, 3, 4];
        v_fftshift(&mut buf);
        assert_eq!(buf, [2, 3, 0, 1, 4]);
    }

    #[test]
    fn test_channel_ops() {
        let mut dst = vec![vec![1.0f64; 3], vec![2.0; 3]];
        let src = vec![vec![1.0f64, 2.0, 3.0], vec![4.0, 5.0, 6.0]];

        v_add_channels(&mut dst, &src);
        assert_eq!(dst[1], vec![6.0, 7.0, 8.0]);

        v_add_channels_with_gain(&mut dst, &src, -1.0);
        assert_eq!(dst, vec![vec![1.0; 3], vec![2.0; 3]]);

        v_copy_channels(&mut dst, &src);
        assert_eq!(dst, src);

        let mut narrow = vec![vec![0.0f32; 3]; 2];
        v_convert_channels(&mut narrow, &src);
        assert_eq!(narrow[1], vec![4.0, 5.0, 6.0]);

        v_zero_channels(&mut dst);
        assert!(dst.iter().flatten().all(|&x| x == 0.0));
    }

    #[test]
    fn test_mean_channels_is_single_scalar() {
        let src = vec![vec![1.0f64, 3.0], vec![5.0, 7.0]];
        assert_eq!(v_mean_channels(&src, 2), 4.0);
    }

    #[test]
    fn test_mean_channels_weights_every_element() {
        let src = vec![vec![1.0f64, 9.0, 9.0], vec![3.0, 3.0, 3.0]];
        assert_eq!(v_mean_channels(&src, 3), 14.0 / 3.0);

        // Only the first `count` elements of each channel are counted
        assert_eq!(v_mean_channels(&src, 1), 2.0);
    }

    #[test]
    #[should_panic]
    fn test_mean_channels_short_channel_panics() {
        let src = vec![vec![1.0f64], vec![3.0, 3.0, 3.0]];
        v_mean_channels(&src, 3);
    }
}
