//! Frame types.

use std::fmt;

/// Frame type tag carried in the third header byte.
///
/// Unrecognised tags are kept as [`FrameType::Unknown`] so a stream can skip
/// them without losing framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameType {
    /// One serialized note (`0x01`).
    Record,
    /// Informational text (`0x02`).
    Info,
    /// Error text (`0x03`).
    Error,
    /// End of the record stream (`0xFF`).
    EndOfStream,
    /// Any other tag.
    Unknown(u8),
}

impl FrameType {
    /// Returns the wire tag.
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Record => 0x01,
            Self::Info => 0x02,
            Self::Error => 0x03,
            Self::EndOfStream => 0xFF,
            Self::Unknown(tag) => tag,
        }
    }

    /// Returns true for tags in the frame type registry.
    pub fn is_known(self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl From<u8> for FrameType {
    fn from(tag: u8) -> Self {
        match tag {
            0x01 => Self::Record,
            0x02 => Self::Info,
            0x03 => Self::Error,
            0xFF => Self::EndOfStream,
            other => Self::Unknown(other),
        }
    }
}

impl From<FrameType> for u8 {
    fn from(frame_type: FrameType) -> Self {
        frame_type.as_u8()
    }
}

impl fmt::Display for FrameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Record => f.write_str("record"),
            Self::Info => f.write_str("info"),
            Self::Error => f.write_str("error"),
            Self::EndOfStream => f.write_str("end-of-stream"),
            Self::Unknown(tag) => write!(f, "unknown(0x{tag:02x})"),
        }
    }
}

/// A decoded frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Frame type.
    pub frame_type: FrameType,
    /// Payload text.
    pub payload: String,
}

impl Frame {
    /// Creates a frame.
    pub fn new(frame_type: impl Into<FrameType>, payload: impl Into<String>) -> Self {
        Self {
            frame_type: frame_type.into(),
            payload: payload.into(),
        }
    }

    /// Length of the payload on the wire.
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_tags() {
        assert_eq!(FrameType::from(0x01), FrameType::Record);
        assert_eq!(FrameType::from(0x02), FrameType::Info);
        assert_eq!(FrameType::from(0x03), FrameType::Error);
        assert_eq!(FrameType::from(0xFF), FrameType::EndOfStream);
        assert_eq!(FrameType::from(0x7A), FrameType::Unknown(0x7A));
    }

    #[test]
    fn every_tag_converts_back() {
        for tag in 0..=u8::MAX {
            assert_eq!(u8::from(FrameType::from(tag)), tag);
        }
    }

    #[test]
    fn display_names() {
        assert_eq!(FrameType::Record.to_string(), "record");
        assert_eq!(FrameType::Unknown(0x0a).to_string(), "unknown(0x0a)");
        assert!(!FrameType::Unknown(4).is_known());
        assert!(FrameType::EndOfStream.is_known());
    }
}
