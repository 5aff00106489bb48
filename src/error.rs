//! Crate-wide error type

use thiserror::Error;

use crate::output::OutputError;
use crate::profile::ProfileError;
use crate::render::{RenderError, SizeError, UnknownRenderKind};

/// A request argument that failed validation. Always raised before any I/O.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParameterError {
    #[error("Missing username parameter")]
    MissingIdentifier,
    #[error(transparent)]
    Size(#[from] SizeError),
    #[error(transparent)]
    Kind(#[from] UnknownRenderKind),
}

/// Everything that can go wrong between an identifier and a PNG.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    InvalidParameter(#[from] ParameterError),
    /// Name lookup or profile request failed
    #[error(transparent)]
    Resolution(ProfileError),
    /// The profile exists but has no skin
    #[error("Skin not found")]
    SkinNotFound,
    /// Texture download failed
    #[error("failed to fetch skin texture: {0}")]
    Fetch(ProfileError),
    #[error(transparent)]
    Render(#[from] RenderError),
    /// Writing the finished image failed
    #[error("failed to write output: {0}")]
    Output(#[from] OutputError),
}

impl Error {
    pub fn is_skin_not_found(&self) -> bool {
        matches!(self, Error::SkinNotFound)
    }

    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, Error::InvalidParameter(_))
    }
}

impl From<SizeError> for Error {
    fn from(err: SizeError) -> Self {
        Error::InvalidParameter(err.into())
    }
}

impl From<UnknownRenderKind> for Error {
    fn from(err: UnknownRenderKind) -> Self {
        Error::InvalidParameter(err.into())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
