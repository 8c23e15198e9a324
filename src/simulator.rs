// Copyright (C) 2023, Alex Badics
// This file is part of hmd-orientation
// Licensed under the MIT license. See LICENSE file in the project root for details.

//! Software HMD SDK. See [`SimulatedSdk`]
//!
//! Reports a configurable set of devices, and a sensor whose "fused" orientation
//! follows a scripted head motion ([`HeadMotion`]). Useful for running the whole
//! session without any hardware.

use std::{
    rc::Rc,
    time::{Duration, Instant},
};

use nalgebra::UnitQuaternion;

use crate::{
    euler::from_euler_angles, DeviceManager, EulerOrder, HmdDevice, HmdInfo, Profile, Result,
    Sdk, SensorDevice, SensorFusion, SensorInfo,
};

/// How far ahead the simulated filter looks when prediction is enabled
pub const PREDICTION_DELTA: Duration = Duration::from_millis(30);

const DEFAULT_PROFILE_JSON: &str = r#"{
    "Oculus Profile Version": 1.0,
    "CurrentProfile": "Default",
    "Profile": [
        {"Name": "Default", "Gender": "Unspecified", "PlayerHeight": 1.778, "IPD": 0.064}
    ]
}"#;

/// Scripted orientation of the simulated head
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeadMotion {
    /// Looking straight ahead, forever
    Still,
    /// Sinusoidal yaw, pitch and roll around straight ahead.
    /// Pitch runs at twice, roll at three times the yaw frequency.
    Sweep {
        /// Yaw amplitude in radians
        yaw: f32,
        /// Pitch amplitude in radians
        pitch: f32,
        /// Roll amplitude in radians
        roll: f32,
        /// Time of a full yaw cycle
        period: Duration,
    },
}

impl HeadMotion {
    /// A slow look around: ±60° yaw, ±15° pitch, ±5° roll over 8 seconds
    pub fn look_around() -> Self {
        HeadMotion::Sweep {
            yaw: 60f32.to_radians(),
            pitch: 15f32.to_radians(),
            roll: 5f32.to_radians(),
            period: Duration::from_secs(8),
        }
    }

    /// Yaw, pitch and roll (radians) at `t` after the start of the motion
    pub fn angles_at(&self, t: Duration) -> (f32, f32, f32) {
        match *self {
            HeadMotion::Still => (0.0, 0.0, 0.0),
            HeadMotion::Sweep {
                yaw,
                pitch,
                roll,
                period,
            } => {
                let phase = std::f32::consts::TAU * t.as_secs_f32() / period.as_secs_f32();
                (
                    yaw * phase.sin(),
                    pitch * (2.0 * phase).sin(),
                    roll * (3.0 * phase).sin(),
                )
            }
        }
    }

    /// Orientation at `t` after the start of the motion
    pub fn orientation_at(&self, t: Duration) -> UnitQuaternion<f32> {
        let (yaw, pitch, roll) = self.angles_at(t);
        from_euler_angles(EulerOrder::Yxz, yaw, pitch, roll)
    }
}

#[derive(Debug, Clone)]
struct SimulatedHmd {
    info: Option<HmdInfo>,
    sensor: bool,
    profile_json: Option<String>,
}

/// Simulated SDK. Build it with [`SimulatedSdk::new`] or [`SimulatedSdk::empty`],
/// then adjust it with the `with_*` methods.
#[derive(Debug, Clone)]
pub struct SimulatedSdk {
    hmd: Option<SimulatedHmd>,
    standalone_sensor: bool,
    motion: HeadMotion,
    running: bool,
}

impl SimulatedSdk {
    /// A DK1-class HMD with a built-in sensor and a default user profile, looking around
    pub fn new() -> Self {
        Self {
            hmd: Some(SimulatedHmd {
                info: Some(Self::dk1_info()),
                sensor: true,
                profile_json: Some(DEFAULT_PROFILE_JSON.into()),
            }),
            standalone_sensor: false,
            motion: HeadMotion::look_around(),
            running: false,
        }
    }

    /// Nothing connected at all
    pub fn empty() -> Self {
        Self {
            hmd: None,
            standalone_sensor: false,
            motion: HeadMotion::Still,
            running: false,
        }
    }

    /// Display parameters reported by the default simulated HMD
    pub fn dk1_info() -> HmdInfo {
        HmdInfo {
            display_device_name: "RiftDK1".into(),
            product_name: "Oculus Rift DK1".into(),
            manufacturer: "Oculus VR".into(),
            version: 0,
            ..HmdInfo::fallback()
        }
    }

    /// Connect an HMD. `info: None` makes it fail to report its parameters.
    pub fn with_hmd(mut self, info: Option<HmdInfo>) -> Self {
        let hmd = self.hmd.get_or_insert(SimulatedHmd {
            info: None,
            sensor: true,
            profile_json: None,
        });
        hmd.info = info;
        self
    }

    /// Disconnect the HMD
    pub fn without_hmd(mut self) -> Self {
        self.hmd = None;
        self
    }

    /// Whether the HMD has a working built-in sensor. No effect without an HMD.
    pub fn with_hmd_sensor(mut self, sensor: bool) -> Self {
        if let Some(hmd) = &mut self.hmd {
            hmd.sensor = sensor;
        }
        self
    }

    /// Profile file contents served by the HMD, in the SDK's JSON profile format.
    /// No effect without an HMD.
    pub fn with_profile_json(mut self, json: Option<&str>) -> Self {
        if let Some(hmd) = &mut self.hmd {
            hmd.profile_json = json.map(Into::into);
        }
        self
    }

    /// Connect a standalone motion sensor
    pub fn with_standalone_sensor(mut self) -> Self {
        self.standalone_sensor = true;
        self
    }

    /// Set the head motion followed by every simulated sensor
    pub fn with_motion(mut self, motion: HeadMotion) -> Self {
        self.motion = motion;
        self
    }
}

impl Default for SimulatedSdk {
    fn default() -> Self {
        Self::new()
    }
}

impl Sdk for SimulatedSdk {
    type Sensor = SimulatedSensor;
    type Manager = SimulatedDeviceManager;
    type Fusion = SimulatedFusion;

    fn init(&mut self) -> Result<()> {
        if self.running {
            return Err("Simulated SDK already initialized".into());
        }
        self.running = true;
        Ok(())
    }

    fn shutdown(&mut self) {
        self.running = false;
    }

    fn create_device_manager(&mut self) -> SimulatedDeviceManager {
        SimulatedDeviceManager {
            hmd: self.hmd.clone(),
            standalone_sensor: self.standalone_sensor,
            motion: self.motion,
        }
    }

    fn create_sensor_fusion(&mut self) -> SimulatedFusion {
        SimulatedFusion {
            sensor: None,
            prediction: false,
        }
    }
}

/// Device manager of [`SimulatedSdk`]
pub struct SimulatedDeviceManager {
    hmd: Option<SimulatedHmd>,
    standalone_sensor: bool,
    motion: HeadMotion,
}

impl DeviceManager for SimulatedDeviceManager {
    type Sensor = SimulatedSensor;
    type Hmd = SimulatedHmdDevice;

    fn create_hmd_device(&mut self) -> Option<SimulatedHmdDevice> {
        let hmd = self.hmd.clone()?;
        Some(SimulatedHmdDevice {
            hmd,
            motion: self.motion,
        })
    }

    fn create_sensor_device(&mut self) -> Option<Rc<SimulatedSensor>> {
        self.standalone_sensor
            .then(|| Rc::new(SimulatedSensor::new("Tracker DK", self.motion)))
    }
}

/// HMD of [`SimulatedSdk`]
pub struct SimulatedHmdDevice {
    hmd: SimulatedHmd,
    motion: HeadMotion,
}

impl HmdDevice for SimulatedHmdDevice {
    type Sensor = SimulatedSensor;

    fn device_info(&self) -> Option<HmdInfo> {
        self.hmd.info.clone()
    }

    fn sensor(&mut self) -> Option<Rc<SimulatedSensor>> {
        self.hmd
            .sensor
            .then(|| Rc::new(SimulatedSensor::new("Tracker DK1", self.motion)))
    }

    fn profile(&self) -> Option<Profile> {
        let json = self.hmd.profile_json.as_deref()?;
        match Profile::from_json(json) {
            Ok(profile) => Some(profile),
            Err(e) => {
                log::warn!("Ignoring user profile: {e}");
                None
            }
        }
    }
}

impl Drop for SimulatedHmdDevice {
    fn drop(&mut self) {
        log::debug!("Simulated HMD released");
    }
}

/// Motion sensor of [`SimulatedSdk`]. Its clock starts when it is opened.
pub struct SimulatedSensor {
    product_name: &'static str,
    motion: HeadMotion,
    start: Instant,
}

impl SimulatedSensor {
    fn new(product_name: &'static str, motion: HeadMotion) -> Self {
        Self {
            product_name,
            motion,
            start: Instant::now(),
        }
    }

    /// True orientation of the sensor `ahead` of now
    pub fn orientation_ahead(&self, ahead: Duration) -> UnitQuaternion<f32> {
        self.motion.orientation_at(self.start.elapsed() + ahead)
    }
}

impl SensorDevice for SimulatedSensor {
    fn info(&self) -> SensorInfo {
        SensorInfo {
            product_name: self.product_name.into(),
            manufacturer: "Oculus VR".into(),
            serial_number: "SIM00000001".into(),
        }
    }
}

/// Sensor fusion of [`SimulatedSdk`]. Reports the scripted orientation of the attached
/// sensor, [`PREDICTION_DELTA`] ahead if prediction is enabled.
pub struct SimulatedFusion {
    sensor: Option<Rc<SimulatedSensor>>,
    prediction: bool,
}

impl SensorFusion for SimulatedFusion {
    type Sensor = SimulatedSensor;

    fn attach_to_sensor(&mut self, sensor: Rc<SimulatedSensor>) {
        self.sensor = Some(sensor);
    }

    fn set_prediction_enabled(&mut self, enabled: bool) {
        self.prediction = enabled;
    }

    fn orientation(&mut self) -> UnitQuaternion<f32> {
        let ahead = if self.prediction {
            PREDICTION_DELTA
        } else {
            Duration::ZERO
        };
        self.sensor
            .as_ref()
            .map_or_else(UnitQuaternion::identity, |sensor| {
                sensor.orientation_ahead(ahead)
            })
    }
}
