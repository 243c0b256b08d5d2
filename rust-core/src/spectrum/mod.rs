//! Real-signal spectral transforms
//!
//! [`Fft`] is the entry point. Engines are looked up by name in a
//! [`Registry`]; two are built in, `"realfft"` and `"rustfft"`.

pub mod complex_engine;
pub mod engine;
pub mod error;
pub mod fft;
pub mod real_engine;
pub mod registry;

pub use engine::{Engine, EngineFactory, Precision, Precisions};
pub use error::FftError;
pub use fft::{Fft, FftConfig, FftSample, CEPSTRAL_FLOOR};
pub use registry::{default_implementation, implementations, set_default_implementation, Registry};
