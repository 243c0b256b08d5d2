//! Transform error kinds

use thiserror::Error;

use crate::alloc::AllocError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FftError {
    #[error("Argument `{argument}` needs at least {required} elements, got {actual}")]
    NullArgument {
        argument: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("Transform size {0} is not a positive power of two")]
    InvalidSize(usize),

    #[error("Unknown transform implementation \"{0}\"")]
    InvalidImplementation(String),

    #[error("Transform engine failure: {0}")]
    InternalError(String),
}

impl From<AllocError> for FftError {
    fn from(err: AllocError) -> Self {
        FftError::InternalError(err.to_string())
    }
}

/// Fail with [`FftError::NullArgument`] unless `buf` holds `required` elements
pub(crate) fn require<T>(argument: &'static str, buf: &[T], required: usize) -> Result<(), FftError> {
    if buf.len() < required || buf.is_empty() {
        return Err(FftError::NullArgument {
            argument,
            required,
            actual: buf.len(),
        });
    }
    Ok(())
}
