//! In-memory representation of a classic CAN frame as it travels through the
//! receive queue and the transmit channel.
use crate::error::FrameError;
use crate::transport::can_id::CanId;
use bitflags::bitflags;
use embedded_can::Id;

/// Classic CAN payload capacity.
pub const MAX_DATA_LEN: usize = 8;

bitflags! {
    /// Frame format flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FrameFlags: u8 {
        /// 29-bit identifier.
        const EXTENDED = 0b01;
        /// Remote transmission request; the frame carries no payload.
        const REMOTE = 0b10;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for FrameFlags {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "FrameFlags({=u8:#x})", self.bits())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// One bus message. Fixed size, copied by value in and out of the queue.
///
/// Fields are private: a frame is validated once, on construction, and never
/// changes afterwards.
pub struct CanFrame {
    /// Raw 11- or 29-bit identifier; the width lives in `flags`.
    id: u32,
    /// Data length code (0 to 8).
    dlc: u8,
    /// Payload buffer. Bytes past `dlc` are zero.
    data: [u8; MAX_DATA_LEN],
    flags: FrameFlags,
}

impl Default for CanFrame {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl CanFrame {
    /// Zero-length data frame with standard identifier 0. Handy to initialise
    /// receive storage: `[CanFrame::EMPTY; N]`.
    pub const EMPTY: CanFrame = CanFrame {
        id: 0,
        dlc: 0,
        data: [0; MAX_DATA_LEN],
        flags: FrameFlags::empty(),
    };

    /// Data frame carrying `data` (at most eight bytes).
    pub fn new(id: impl Into<CanId>, data: &[u8]) -> Result<Self, FrameError> {
        if data.len() > MAX_DATA_LEN {
            return Err(FrameError::PayloadTooLong { len: data.len() });
        }
        let id = id.into().validated()?;
        let mut payload = [0u8; MAX_DATA_LEN];
        payload[..data.len()].copy_from_slice(data);

        Ok(Self {
            id: id.raw(),
            dlc: data.len() as u8,
            data: payload,
            flags: Self::id_flags(&id),
        })
    }

    /// Remote frame requesting `dlc` bytes.
    pub fn new_remote(id: impl Into<CanId>, dlc: usize) -> Result<Self, FrameError> {
        if dlc > MAX_DATA_LEN {
            return Err(FrameError::InvalidDlc { dlc });
        }
        let id = id.into().validated()?;
        Ok(Self {
            id: id.raw(),
            dlc: dlc as u8,
            data: [0; MAX_DATA_LEN],
            flags: Self::id_flags(&id) | FrameFlags::REMOTE,
        })
    }

    fn id_flags(id: &CanId) -> FrameFlags {
        if id.is_extended() {
            FrameFlags::EXTENDED
        } else {
            FrameFlags::empty()
        }
    }

    /// Identifier with its width.
    pub fn id(&self) -> CanId {
        if self.flags.contains(FrameFlags::EXTENDED) {
            CanId::Extended(self.id)
        } else {
            CanId::Standard(self.id as u16)
        }
    }

    /// Raw identifier bits.
    #[inline]
    pub fn raw_id(&self) -> u32 {
        self.id
    }

    #[inline]
    pub fn dlc(&self) -> usize {
        self.dlc as usize
    }

    /// Valid payload bytes. Empty for remote frames.
    pub fn data(&self) -> &[u8] {
        if self.is_remote() {
            &[]
        } else {
            &self.data[..self.dlc as usize]
        }
    }

    #[inline]
    pub fn flags(&self) -> FrameFlags {
        self.flags
    }

    #[inline]
    pub fn is_extended(&self) -> bool {
        self.flags.contains(FrameFlags::EXTENDED)
    }

    #[inline]
    pub fn is_remote(&self) -> bool {
        self.flags.contains(FrameFlags::REMOTE)
    }
}

impl embedded_can::Frame for CanFrame {
    fn new(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
        let id: CanId = id.into().into();
        CanFrame::new(id, data).ok()
    }

    fn new_remote(id: impl Into<Id>, dlc: usize) -> Option<Self> {
        let id: CanId = id.into().into();
        CanFrame::new_remote(id, dlc).ok()
    }

    fn is_extended(&self) -> bool {
        CanFrame::is_extended(self)
    }

    fn is_remote_frame(&self) -> bool {
        CanFrame::is_remote(self)
    }

    fn id(&self) -> Id {
        CanFrame::id(self).into()
    }

    fn dlc(&self) -> usize {
        CanFrame::dlc(self)
    }

    fn data(&self) -> &[u8] {
        CanFrame::data(self)
    }
}
