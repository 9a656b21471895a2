use alloc::string::String;
use enough::StopReason;

/// Errors from QOI decoding and encoding.
///
/// Every variant is fatal and is reported before any output is produced.
/// A chunk stream that ends early is not an error (see [`crate::decode`]).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum QoiError {
    #[error("input too short: {len} bytes, need at least header and end marker")]
    ShortInput { len: usize },

    #[error("illegal file magic: {found:02x?}")]
    MagicMismatch { found: [u8; 4] },

    #[error("illegal width: {0}")]
    IllegalWidth(u32),

    #[error("illegal height: {0}")]
    IllegalHeight(u32),

    #[error("illegal number of channels: {0}")]
    IllegalChannels(u8),

    #[error("illegal color space: {0:#04x}")]
    IllegalColorSpace(u8),

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for QoiError {
    fn from(r: StopReason) -> Self {
        QoiError::Cancelled(r)
    }
}
