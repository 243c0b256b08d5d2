//! Spectral Transform Core - aligned buffers, vector math and real FFT
//!
//! * [`alloc`] - 32-byte aligned buffers and channel sets
//! * [`vector`] - elementwise kernels with runtime-selected SIMD paths
//! * [`complex`] - complex algebra and cartesian/polar conversion
//! * [`spectrum`] - the [`Fft`] façade over pluggable engines
//!
//! Python bindings are built with the `python` feature.

// Suppress PyO3 non-local impl warnings (harmless macro-generated code)
#![allow(non_local_definitions)]

pub mod alloc;
pub mod complex;
pub mod spectrum;
pub mod vector;

#[cfg(feature = "python")]
pub mod python_bindings;

pub use alloc::{AlignedBuffer, AllocError, ChannelSet};
pub use complex::PhaseEstimator;
pub use spectrum::{Fft, FftConfig, FftError, Registry};
