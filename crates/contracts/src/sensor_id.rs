//! SensorId - Process-unique sensor identifier
//!
//! Assigned once by the manager when a sensor is bound. The zero value is
//! reserved as the "unbound" sentinel.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque sensor identifier.
///
/// Cheap to copy. Every bound sensor carries a non-zero value; `SensorId::NONE`
/// marks a sensor that has not been bound to a manager yet.
///
/// # Examples
/// ```
/// use contracts::{SensorId, NO_SENSOR};
///
/// let id = SensorId::from_raw(7);
/// assert!(id.is_bound());
/// assert!(!NO_SENSOR.is_bound());
/// assert_eq!(id.get(), 7);
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SensorId(u64);

/// Sentinel identifier of an unbound sensor.
pub const NO_SENSOR: SensorId = SensorId::NONE;

impl SensorId {
    /// The reserved "unbound" value.
    pub const NONE: SensorId = SensorId(0);

    /// Wrap a raw value. Zero yields the sentinel.
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// True for any value other than the sentinel.
    #[inline]
    pub const fn is_bound(self) -> bool {
        self.0 != 0
    }
}

impl From<SensorId> for u64 {
    #[inline]
    fn from(id: SensorId) -> Self {
        id.0
    }
}

impl fmt::Display for SensorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_bound() {
            write!(f, "{}", self.0)
        } else {
            write!(f, "<unbound>")
        }
    }
}

impl fmt::Debug for SensorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SensorId({})", self.0)
    }
}
