//! Shared value types passed between the driver core and the port layer:
//! the requested bit rate and the lifecycle state of a driver context.

//==================================================================================BITRATE
/// Nominal bus bit rate requested at `init`.
///
/// The core never interprets this value; the port layer derives its bit timing
/// (prescaler, segments, sample point) from it. The associated constants cover
/// the CiA 301 recommended rates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Bitrate(u32);

impl Bitrate {
    pub const RATE_1M: Bitrate = Bitrate(1_000_000);
    pub const RATE_800K: Bitrate = Bitrate(800_000);
    pub const RATE_500K: Bitrate = Bitrate(500_000);
    pub const RATE_250K: Bitrate = Bitrate(250_000);
    pub const RATE_125K: Bitrate = Bitrate(125_000);
    pub const RATE_50K: Bitrate = Bitrate(50_000);
    pub const RATE_20K: Bitrate = Bitrate(20_000);
    pub const RATE_10K: Bitrate = Bitrate(10_000);

    /// Arbitrary rate in bits per second. Validation is up to the port layer.
    pub const fn from_bps(bits_per_second: u32) -> Self {
        Self(bits_per_second)
    }

    /// Rate in bits per second.
    #[inline]
    pub const fn bits_per_second(&self) -> u32 {
        self.0
    }
}

impl From<u32> for Bitrate {
    fn from(bits_per_second: u32) -> Self {
        Self(bits_per_second)
    }
}

//==================================================================================LIFECYCLE
/// Lifecycle of a driver context.
///
/// ```text
/// init ──► Initialized ──start──► Started ◄──start/stop──► Stopped
/// ```
///
/// There is no "uninitialized" value: a context only exists once `init`
/// succeeded. Reading and writing are only accepted in [`LifecycleState::Started`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LifecycleState {
    /// Port layer configured, reception and transmission not enabled yet.
    Initialized,
    /// Interrupts enabled; the data path is usable.
    Started,
    /// Interrupts disabled; the context can be started again.
    Stopped,
}

impl LifecycleState {
    /// Whether `read`/`write` are accepted in this state.
    #[inline]
    pub const fn is_running(&self) -> bool {
        matches!(self, LifecycleState::Started)
    }
}
