use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid camera intrinsics: {0}")]
    InvalidIntrinsics(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Depth map is {actual:?} (w, h), session expects {expected:?}")]
    DepthMapShape {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Depth buffer holds {actual} samples, expected {expected}")]
    DepthBufferLength { expected: usize, actual: usize },

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Toml Error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
