//! Entity port — the capability an integration's sensor exposes to the host.

use coinflip_domain::device_class::BinarySensorDeviceClass;

/// A binary sensor the host can read and poll.
///
/// Reads are side-effect free. [`update`](Self::update) is the only
/// mutation; the host calls it on its own cadence and reads the
/// attributes once it returns.
pub trait BinarySensorEntity: Send {
    /// Display name.
    fn name(&self) -> &str;

    /// Stable identity across restarts, if the integration has one.
    fn unique_id(&self) -> Option<&str> {
        None
    }

    fn device_class(&self) -> Option<BinarySensorDeviceClass> {
        None
    }

    /// Current reading; `None` until the sensor has produced one.
    fn is_on(&self) -> Option<bool>;

    /// Refresh the reading. Must not block.
    fn update(&mut self);
}
