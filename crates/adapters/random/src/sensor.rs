//! The random binary sensor entity.

use rand::rngs::SmallRng;

use coinflip_app::ports::BinarySensorEntity;
use coinflip_domain::device_class::BinarySensorDeviceClass;

use crate::config::RandomBinarySensorConfig;
use crate::source::{BitSource, RngBitSource};

/// A binary sensor whose state is a fresh coin flip on every refresh.
///
/// The state is `None` until the first [`refresh`](Self::refresh) and
/// `Some(_)` from then on. Name, device class and unique id never change
/// after construction.
#[derive(Debug)]
pub struct RandomBinarySensor<S = RngBitSource<SmallRng>> {
    name: String,
    device_class: Option<BinarySensorDeviceClass>,
    unique_id: Option<String>,
    is_on: Option<bool>,
    source: S,
}

impl RandomBinarySensor {
    /// Build a sensor flipping coins from an entropy-seeded [`SmallRng`].
    #[must_use]
    pub fn new(config: RandomBinarySensorConfig, unique_id: Option<String>) -> Self {
        Self::with_source(config, unique_id, RngBitSource::from_entropy())
    }
}

impl<S: BitSource> RandomBinarySensor<S> {
    #[must_use]
    pub fn with_source(
        config: RandomBinarySensorConfig,
        unique_id: Option<String>,
        source: S,
    ) -> Self {
        Self {
            name: config.name,
            device_class: config.device_class,
            unique_id,
            is_on: None,
            source,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn is_on(&self) -> Option<bool> {
        self.is_on
    }

    #[must_use]
    pub fn device_class(&self) -> Option<BinarySensorDeviceClass> {
        self.device_class
    }

    #[must_use]
    pub fn unique_id(&self) -> Option<&str> {
        self.unique_id.as_deref()
    }

    /// Draw one bit and make it the new state.
    pub fn refresh(&mut self) {
        self.is_on = Some(self.source.next_bit());
    }
}

impl<S: BitSource> BinarySensorEntity for RandomBinarySensor<S> {
    fn name(&self) -> &str {
        RandomBinarySensor::name(self)
    }

    fn unique_id(&self) -> Option<&str> {
        RandomBinarySensor::unique_id(self)
    }

    fn device_class(&self) -> Option<BinarySensorDeviceClass> {
        RandomBinarySensor::device_class(self)
    }

    fn is_on(&self) -> Option<bool> {
        RandomBinarySensor::is_on(self)
    }

    fn update(&mut self) {
        self.refresh();
    }
}
