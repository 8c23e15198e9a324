// Copyright (C) 2023, Alex Badics
// This file is part of hmd-orientation
// Licensed under the MIT license. See LICENSE file in the project root for details.

//! The HMD session: device discovery, parameter dump and orientation polling.
//! See [`Session`]

use std::{io::Write, rc::Rc, time::Duration};

use log::{debug, info, trace};

use crate::{
    euler_angles, rad_to_degree, terminal::Terminal, DeviceInfo, DeviceManager, EulerOrder,
    HmdDevice, Result, Sdk, SensorDevice, SensorFusion, System,
};

/// Time between two orientation readouts of [`Session::run_loop`]
pub const POLL_INTERVAL: Duration = Duration::from_millis(200);

const SEPARATOR: &str = "--------------------------";

/// A sensor and the fusion filter attached to it. They come and go together.
struct Tracking<S, F> {
    sensor: Rc<S>,
    fusion: F,
}

/// One session with the HMD SDK.
///
/// Creating it initializes the SDK, finds the devices and sets up sensor fusion.
/// Nothing in the discovery is fatal: a missing HMD means fallback parameters,
/// a missing sensor means [`Session::run_loop`] does nothing.
pub struct Session<S: Sdk, T: Terminal> {
    tracking: Option<Tracking<S::Sensor, S::Fusion>>,
    info: DeviceInfo,
    terminal: T,
    closed: bool,
    // Must stay the last field: the runtime outlives every handle
    system: System<S>,
}

impl<S: Sdk, T: Terminal> Session<S, T> {
    /// Initialize `sdk`, discover the devices and print what was found to `terminal`.
    pub fn new(sdk: S, mut terminal: T) -> Result<Self> {
        writeln!(terminal, "{SEPARATOR}")?;
        let mut system = System::new(sdk)?;

        let mut manager = system.sdk().create_device_manager();
        let mut hmd_info = None;
        let sensor = match manager.create_hmd_device() {
            Some(mut hmd) => {
                writeln!(terminal, " [x] HMD Found")?;
                info!("HMD found");
                hmd_info = hmd.device_info();
                let sensor = hmd.sensor();
                if let Some(profile) = hmd.profile() {
                    // Not used for anything yet
                    let eye_height = profile.eye_height();
                    debug!("Profile {:?}: eye height {eye_height}m", profile.name);
                }
                sensor
            }
            None => {
                writeln!(terminal, " [ ] HMD Not Found")?;
                info!("HMD not found, looking for a standalone sensor");
                manager.create_sensor_device()
            }
        };
        drop(manager);

        let info = DeviceInfo::from_device(hmd_info);
        if !info.is_loaded() {
            info!("Using fallback HMD parameters");
        }

        let tracking = match sensor {
            Some(sensor) => {
                writeln!(terminal, " [x] Sensor Found")?;
                debug!("Sensor: {:?}", sensor.info());
                let mut fusion = system.sdk().create_sensor_fusion();
                fusion.attach_to_sensor(Rc::clone(&sensor));
                fusion.set_prediction_enabled(true);
                Some(Tracking { sensor, fusion })
            }
            None => {
                writeln!(terminal, " [ ] Sensor Not Found")?;
                info!("Sensor not found, orientation will not be available");
                None
            }
        };

        writeln!(terminal, "{SEPARATOR}")?;
        Ok(Self {
            tracking,
            info,
            terminal,
            closed: false,
            system,
        })
    }

    /// The display parameters in use
    pub fn info(&self) -> &DeviceInfo {
        &self.info
    }

    /// `true` if a sensor is attached and [`Session::run_loop`] will report orientation
    pub fn has_sensor(&self) -> bool {
        self.tracking.is_some()
    }

    /// The terminal the session writes to
    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    /// Print the display parameters, then wait for the user to press ENTER.
    pub fn output(&mut self) -> Result<()> {
        write!(self.terminal, "{}", self.info.info())?;
        writeln!(self.terminal, "{SEPARATOR}")?;
        writeln!(self.terminal)?;
        writeln!(self.terminal, " Press ENTER to continue")?;
        self.terminal.wait_for_enter()?;
        Ok(())
    }

    /// Print yaw, pitch and roll every [`POLL_INTERVAL`] until a key is pressed.
    /// Returns immediately without a sensor.
    ///
    /// Returns the number of readouts printed.
    pub fn run_loop(&mut self) -> Result<usize> {
        let mut readouts = 0;
        if self.tracking.is_some() {
            // Console input is line buffered, the key only arrives with ENTER
            writeln!(self.terminal, " Press ENTER to stop")?;
        }
        while let Some(tracking) = self.tracking.as_mut() {
            let orientation = tracking.fusion.orientation();
            let (yaw, pitch, roll) = euler_angles(&orientation, EulerOrder::Yxz);
            trace!("Orientation: {orientation}");
            writeln!(
                self.terminal,
                " Yaw: {:.2}, Pitch: {:.2}, Roll: {:.2}",
                degrees(yaw),
                degrees(pitch),
                degrees(roll)
            )?;
            readouts += 1;

            self.terminal.sleep(POLL_INTERVAL);
            if self.terminal.key_pressed() {
                break;
            }
        }
        Ok(readouts)
    }

    /// Release the sensor and destroy the fusion filter. The SDK runtime itself is
    /// shut down when the session is dropped. Calling it again does nothing.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        if let Some(Tracking { sensor, fusion }) = self.tracking.take() {
            drop(sensor);
            drop(fusion);
            debug!("Sensor released");
        }
        writeln!(self.terminal, "{SEPARATOR}")?;
        self.terminal.flush()?;
        Ok(())
    }
}

impl<S: Sdk, T: Terminal> Drop for Session<S, T> {
    fn drop(&mut self) {
        // Nowhere to report a broken console from here
        let _ = self.close();
    }
}

/// Degrees rounded to the two printed decimals. Anything that would print as
/// `-0.00` becomes `0.00`.
fn degrees(rad: f32) -> f32 {
    (rad_to_degree(rad) * 100.0).round() / 100.0 + 0.0
}
