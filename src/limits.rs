use crate::error::QoiError;

/// Caps on header dimensions and buffer sizes.
///
/// Decode checks the header's width and height before touching the chunk
/// stream and `max_memory_bytes` against the RGBA8 output buffer. Encode
/// checks the requested dimensions and the worst-case stream size
/// (one tag byte plus one byte per channel for every pixel). All fields
/// default to `None` (no limit).
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Maximum pixel count (width * height).
    pub max_pixels: Option<u64>,
    /// Maximum bytes for the pixel buffer (decode) or worst-case stream buffer (encode).
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    /// Reject a header whose width, height or pixel count exceeds a set cap.
    pub(crate) fn check(&self, width: u32, height: u32) -> Result<(), QoiError> {
        let pixels = u64::from(width) * u64::from(height);
        cap("width", u64::from(width), self.max_width)?;
        cap("height", u64::from(height), self.max_height)?;
        cap("pixel count", pixels, self.max_pixels)
    }

    /// Reject a buffer of `bytes` above `max_memory_bytes`.
    pub(crate) fn check_memory(&self, bytes: usize) -> Result<(), QoiError> {
        cap("buffer bytes", bytes as u64, self.max_memory_bytes)
    }
}

fn cap(what: &str, value: u64, max: Option<u64>) -> Result<(), QoiError> {
    match max {
        Some(max) if value > max => Err(QoiError::LimitExceeded(alloc::format!(
            "{what} {value} exceeds limit {max}"
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unlimited() {
        let limits = Limits::default();
        assert!(limits.check(u32::MAX, u32::MAX).is_ok());
        assert!(limits.check_memory(usize::MAX).is_ok());
    }

    #[test]
    fn pixel_and_memory_limits() {
        let limits = Limits {
            max_pixels: Some(100),
            max_memory_bytes: Some(400),
            ..Default::default()
        };
        assert!(limits.check(10, 10).is_ok());
        assert!(matches!(
            limits.check(11, 10),
            Err(QoiError::LimitExceeded(_))
        ));
        assert!(limits.check_memory(400).is_ok());
        assert!(limits.check_memory(401).is_err());
    }

    #[test]
    fn width_checked_before_height() {
        let limits = Limits {
            max_width: Some(8),
            max_height: Some(8),
            ..Default::default()
        };
        match limits.check(9, 9) {
            Err(QoiError::LimitExceeded(msg)) => assert_eq!(msg, "width 9 exceeds limit 8"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
