//! Standard (11-bit) and extended (29-bit) CAN identifiers, with conversion
//! to and from the [`embedded_can`] identifier types.
use crate::error::FrameError;
use embedded_can::{ExtendedId, Id, StandardId};

/// Largest standard identifier (11 bits).
pub const STANDARD_ID_MAX: u16 = 0x7FF;
/// Largest extended identifier (29 bits).
pub const EXTENDED_ID_MAX: u32 = 0x1FFF_FFFF;

//==================================================================================CAN_ID
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Validated CAN identifier. The width is part of the value.
pub enum CanId {
    Standard(u16),
    Extended(u32),
}

impl CanId {
    /// Builds an 11-bit identifier, rejecting values above [`STANDARD_ID_MAX`].
    pub fn standard(raw: u16) -> Result<Self, FrameError> {
        if raw > STANDARD_ID_MAX {
            return Err(FrameError::IdOutOfRange { raw: raw as u32 });
        }
        Ok(CanId::Standard(raw))
    }

    /// Builds a 29-bit identifier, rejecting values above [`EXTENDED_ID_MAX`].
    pub fn extended(raw: u32) -> Result<Self, FrameError> {
        if raw > EXTENDED_ID_MAX {
            return Err(FrameError::IdOutOfRange { raw });
        }
        Ok(CanId::Extended(raw))
    }

    /// Re-checks the range of an identifier built directly from its variants.
    pub fn validated(self) -> Result<Self, FrameError> {
        match self {
            CanId::Standard(raw) => CanId::standard(raw),
            CanId::Extended(raw) => CanId::extended(raw),
        }
    }

    /// Raw identifier bits, without the width information.
    pub fn raw(&self) -> u32 {
        match self {
            CanId::Standard(id) => *id as u32,
            CanId::Extended(id) => *id,
        }
    }

    /// True for 29-bit identifiers.
    pub fn is_extended(&self) -> bool {
        matches!(self, CanId::Extended(_))
    }
}

impl From<CanId> for Id {
    fn from(id: CanId) -> Self {
        // Out-of-range variants saturate; frames only ever hold validated ids.
        match id {
            CanId::Standard(raw) => Id::Standard(StandardId::new(raw).unwrap_or(StandardId::MAX)),
            CanId::Extended(raw) => Id::Extended(ExtendedId::new(raw).unwrap_or(ExtendedId::MAX)),
        }
    }
}

impl From<Id> for CanId {
    fn from(id: Id) -> Self {
        match id {
            Id::Standard(id) => CanId::Standard(id.as_raw()),
            Id::Extended(id) => CanId::Extended(id.as_raw()),
        }
    }
}

impl From<StandardId> for CanId {
    fn from(id: StandardId) -> Self {
        CanId::Standard(id.as_raw())
    }
}

impl From<ExtendedId> for CanId {
    fn from(id: ExtendedId) -> Self {
        CanId::Extended(id.as_raw())
    }
}
