//! NTP timestamps and the decoded timetag.
//!
//! Bundles carry a 64-bit NTP timestamp on the wire ([`NtpTime`]): seconds
//! since 1900-01-01 in the high 32 bits, a binary fraction of a second in the
//! low 32 bits. Decoded messages carry a [`Timetag`]: seconds since the Unix
//! epoch plus microseconds, which is what callbacks are ordered by.
//!
//! # Example
//!
//! ```
//! use oscwire::protocol::{NtpTime, Timetag};
//!
//! assert_eq!(NtpTime::IMMEDIATE.to_timetag(), Timetag::ZERO);
//!
//! let t = NtpTime::from_parts(2_208_988_800 + 10, 0x8000_0000);
//! assert_eq!(t.to_timetag(), Timetag::new(10, 500_000));
//! ```

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Seconds between the NTP epoch (1900) and the Unix epoch (1970).
pub const NTP_UNIX_OFFSET: u64 = 2_208_988_800;

/// Raw 64-bit NTP timestamp as carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NtpTime(pub u64);

impl NtpTime {
    /// Reserved value meaning "execute immediately" (seconds 0, fraction 1).
    pub const IMMEDIATE: NtpTime = NtpTime(1);

    /// Build from the seconds and fraction halves.
    #[inline]
    pub fn from_parts(seconds: u32, fraction: u32) -> Self {
        NtpTime(((seconds as u64) << 32) | fraction as u64)
    }

    /// Current wall-clock time.
    pub fn now() -> Self {
        SystemTime::now().into()
    }

    /// Seconds since 1900 (high 32 bits).
    #[inline]
    pub fn seconds(&self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Fraction of a second in units of 2^-32 s (low 32 bits).
    #[inline]
    pub fn fraction(&self) -> u32 {
        self.0 as u32
    }

    /// Check for the reserved "immediate" value.
    #[inline]
    pub fn is_immediate(&self) -> bool {
        *self == Self::IMMEDIATE
    }

    /// Encode as 8 Big Endian bytes.
    #[inline]
    pub fn to_be_bytes(&self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    /// Decode from 8 Big Endian bytes.
    #[inline]
    pub fn from_be_bytes(bytes: [u8; 8]) -> Self {
        NtpTime(u64::from_be_bytes(bytes))
    }

    /// Convert to a Unix-based timetag.
    ///
    /// The immediate value maps to [`Timetag::ZERO`] without epoch arithmetic.
    /// Times before 1970 yield negative seconds.
    pub fn to_timetag(&self) -> Timetag {
        if self.is_immediate() {
            return Timetag::ZERO;
        }
        let micros = ((self.fraction() as u64 * 1_000_000) >> 32) as u32;
        Timetag {
            seconds: self.seconds() as i64 - NTP_UNIX_OFFSET as i64,
            micros,
        }
    }
}

impl Default for NtpTime {
    fn default() -> Self {
        Self::IMMEDIATE
    }
}

impl From<SystemTime> for NtpTime {
    fn from(time: SystemTime) -> Self {
        let since_unix = time.duration_since(UNIX_EPOCH).unwrap_or(Duration::ZERO);
        let seconds = (since_unix.as_secs() + NTP_UNIX_OFFSET) as u32;
        let fraction = ((since_unix.subsec_micros() as u64) << 32) / 1_000_000;
        NtpTime::from_parts(seconds, fraction as u32)
    }
}

/// Effective execution time of a decoded message.
///
/// Ordered by seconds, then microseconds. [`Timetag::ZERO`] means
/// "immediate" and sorts before every real time after 1970.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Timetag {
    /// Seconds since the Unix epoch.
    pub seconds: i64,
    /// Microseconds within the second (0..1_000_000).
    pub micros: u32,
}

impl Timetag {
    /// The "immediate" timetag.
    pub const ZERO: Timetag = Timetag {
        seconds: 0,
        micros: 0,
    };

    /// Create a new timetag.
    #[inline]
    pub fn new(seconds: i64, micros: u32) -> Self {
        Self { seconds, micros }
    }

    /// Check for the "immediate" timetag.
    #[inline]
    pub fn is_immediate(&self) -> bool {
        *self == Self::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_immediate_maps_to_zero() {
        assert_eq!(NtpTime::IMMEDIATE.seconds(), 0);
        assert_eq!(NtpTime::IMMEDIATE.fraction(), 1);
        assert!(NtpTime::IMMEDIATE.to_timetag().is_immediate());
        assert_eq!(NtpTime::default(), NtpTime::IMMEDIATE);
    }

    #[test]
    fn test_parts_roundtrip() {
        let t = NtpTime::from_parts(0x0102_0304, 0x0506_0708);
        assert_eq!(t.seconds(), 0x0102_0304);
        assert_eq!(t.fraction(), 0x0506_0708);
        assert_eq!(t.to_be_bytes(), [1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(NtpTime::from_be_bytes(t.to_be_bytes()), t);
    }

    #[test]
    fn test_epoch_offset_and_fraction_scale() {
        let t = NtpTime::from_parts(NTP_UNIX_OFFSET as u32, 0);
        assert_eq!(t.to_timetag(), Timetag::new(0, 0));

        let t = NtpTime::from_parts(NTP_UNIX_OFFSET as u32 + 100, 0x4000_0000);
        assert_eq!(t.to_timetag(), Timetag::new(100, 250_000));

        let t = NtpTime::from_parts(NTP_UNIX_OFFSET as u32 + 1, u32::MAX);
        assert_eq!(t.to_timetag(), Timetag::new(1, 999_999));
    }

    #[test]
    fn test_before_unix_epoch_is_negative() {
        let t = NtpTime::from_parts(NTP_UNIX_OFFSET as u32 - 5, 0);
        assert_eq!(t.to_timetag().seconds, -5);
    }

    #[test]
    fn test_from_system_time() {
        let time = UNIX_EPOCH + Duration::new(1_000, 500_000_000);
        let t = NtpTime::from(time);
        assert_eq!(t.seconds() as u64, 1_000 + NTP_UNIX_OFFSET);
        assert_eq!(t.to_timetag(), Timetag::new(1_000, 500_000));
    }

    #[test]
    fn test_now_is_after_2020() {
        let tag = NtpTime::now().to_timetag();
        assert!(tag.seconds > 1_577_836_800);
    }

    #[test]
    fn test_timetag_ordering() {
        let a = Timetag::new(10, 999_999);
        let b = Timetag::new(11, 0);
        let c = Timetag::new(11, 1);
        assert!(Timetag::ZERO < a);
        assert!(a < b);
        assert!(b < c);
    }
}
