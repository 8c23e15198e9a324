// Copyright (C) 2023, Alex Badics
// This file is part of hmd-orientation
// Licensed under the MIT license. See LICENSE file in the project root for details.

//! The HMD SDK as seen by the session: runtime, device enumeration, devices and
//! the sensor fusion object. See [`Sdk`].
//!
//! Handles follow the SDK's ownership rules: devices are plain values that
//! are released when dropped, sensors are reference counted ([`Rc`]) because
//! both the session and the fusion filter hold on to them.

use std::rc::Rc;

use nalgebra::UnitQuaternion;

use crate::{HmdInfo, Profile, Result};

/// Entry point of an HMD SDK backend.
pub trait Sdk {
    /// Motion sensor type of this SDK
    type Sensor: SensorDevice;
    /// Device manager type of this SDK
    type Manager: DeviceManager<Sensor = Self::Sensor>;
    /// Sensor fusion type of this SDK. It can only be attached to sensors of the same SDK.
    type Fusion: SensorFusion<Sensor = Self::Sensor>;

    /// Initialize the SDK runtime. Only called through [`System::new`].
    fn init(&mut self) -> Result<()>;

    /// Tear down the SDK runtime. Only called when the [`System`] guard is dropped.
    fn shutdown(&mut self);

    /// Create a device manager, used for enumerating devices
    fn create_device_manager(&mut self) -> Self::Manager;

    /// Create a fresh sensor fusion filter, not attached to anything
    fn create_sensor_fusion(&mut self) -> Self::Fusion;
}

/// Enumerates and opens devices. Dropping it releases the manager.
pub trait DeviceManager {
    /// Motion sensor type returned by the enumeration
    type Sensor: SensorDevice;
    /// HMD type returned by the enumeration
    type Hmd: HmdDevice<Sensor = Self::Sensor>;

    /// Open the first HMD found, if any
    fn create_hmd_device(&mut self) -> Option<Self::Hmd>;

    /// Open the first standalone motion sensor found, if any
    fn create_sensor_device(&mut self) -> Option<Rc<Self::Sensor>>;
}

/// An opened head-mounted display
pub trait HmdDevice {
    /// Motion sensor type built into the HMD
    type Sensor: SensorDevice;

    /// Display and lens parameters. `None` if the device could not report them.
    fn device_info(&self) -> Option<HmdInfo>;

    /// The motion sensor built into the HMD, if it could be opened
    fn sensor(&mut self) -> Option<Rc<Self::Sensor>>;

    /// The current user profile, if one is configured
    fn profile(&self) -> Option<Profile>;
}

/// Identification of a motion sensor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SensorInfo {
    /// Product name, e.g. "Tracker DK"
    pub product_name: String,
    /// Manufacturer name
    pub manufacturer: String,
    /// Serial number of the unit
    pub serial_number: String,
}

/// An opened motion sensor
pub trait SensorDevice {
    /// Identification strings of the sensor
    fn info(&self) -> SensorInfo;
}

/// Orientation estimator fed by a motion sensor
pub trait SensorFusion {
    /// Motion sensor type this filter can be attached to
    type Sensor: SensorDevice;

    /// Start consuming samples from `sensor`. Replaces any previously attached sensor.
    fn attach_to_sensor(&mut self, sensor: Rc<Self::Sensor>);

    /// Enable or disable latency prediction of the reported orientation
    fn set_prediction_enabled(&mut self, enabled: bool);

    /// Current orientation estimate. Identity if nothing was attached.
    fn orientation(&mut self) -> UnitQuaternion<f32>;
}

/// Scoped SDK runtime. Initializes the SDK on creation and shuts it down when dropped,
/// so the runtime is torn down on every exit path.
pub struct System<S: Sdk> {
    sdk: S,
}

impl<S: Sdk> System<S> {
    /// Initialize the runtime of `sdk`
    pub fn new(mut sdk: S) -> Result<Self> {
        sdk.init()?;
        log::debug!("SDK runtime initialized");
        Ok(Self { sdk })
    }

    /// The initialized SDK
    pub fn sdk(&mut self) -> &mut S {
        &mut self.sdk
    }
}

impl<S: Sdk> Drop for System<S> {
    fn drop(&mut self) {
        self.sdk.shutdown();
        log::debug!("SDK runtime shut down");
    }
}
