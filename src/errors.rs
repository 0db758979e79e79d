use thiserror::Error;

pub type Result<T> = std::result::Result<T, AboutError>;

#[derive(Error, Debug)]
pub enum AboutError {
    #[error("Payload of {len} bytes does not fit into any QR code version")]
    EncodingCapacityExceeded { len: usize },
    #[error("QR encoding error: {0}")]
    Encoding(String),
    #[error("Parsing error")]
    Parse,
    #[error("Unknown profile field: {0}")]
    UnknownField(String),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<serde_json::Error> for AboutError {
    fn from(_: serde_json::Error) -> Self {
        Self::Parse
    }
}
