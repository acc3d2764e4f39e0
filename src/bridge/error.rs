use core::fmt;

use super::attribute::Uuid;

/// ATT error: attribute value length is invalid for the operation
pub const ATT_ERR_INVALID_ATTR_VALUE_LEN: u8 = 0x0D;
/// ATT error: attribute cannot be written
pub const ATT_ERR_WRITE_NOT_PERMITTED: u8 = 0x03;
/// ATT error: request could not be completed for an unlikely reason
pub const ATT_ERR_UNLIKELY: u8 = 0x0E;

/// Error returned by the control bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeError {
    /// Write payload does not match the fixed width of the attribute
    Length { expected: usize, actual: usize },
    /// Handle was never registered with the bridge
    UnknownAttribute(u16),
    /// Write to a read-only attribute
    ReadOnly(u16),
    /// Registration of an attribute that is not part of the LED service
    UnknownUuid(Uuid),
}

impl AttributeError {
    /// Protocol level error code the dispatcher should answer with
    pub const fn att_error_code(&self) -> u8 {
        match self {
            Self::Length { .. } => ATT_ERR_INVALID_ATTR_VALUE_LEN,
            Self::ReadOnly(_) => ATT_ERR_WRITE_NOT_PERMITTED,
            Self::UnknownAttribute(_) | Self::UnknownUuid(_) => ATT_ERR_UNLIKELY,
        }
    }
}

impl fmt::Display for AttributeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Length { expected, actual } => {
                write!(f, "expected {} bytes, got {}", expected, actual)
            }
            Self::UnknownAttribute(handle) => write!(f, "unknown attribute handle {}", handle),
            Self::ReadOnly(handle) => write!(f, "attribute handle {} is read-only", handle),
            Self::UnknownUuid(uuid) => write!(f, "unknown attribute uuid {}", uuid),
        }
    }
}
