// Copyright (C) 2023, Alex Badics
// This file is part of hmd-orientation
// Licensed under the MIT license. See LICENSE file in the project root for details.
#![warn(missing_docs)]
//! hmd-orientation is a minimal session controller for head-mounted displays.
//! It asks an HMD SDK for the display parameters, prints them, then streams
//! the fused head orientation as yaw/pitch/roll until a key is pressed.
//!
//! The SDK itself (device enumeration, sensor fusion, prediction) sits behind the
//! traits in [`device`]. The [`simulator`] module provides a software backend,
//! so everything runs without hardware.
//!
//! Example usage:
//! ```no_run
//! use hmd_orientation::{simulator::SimulatedSdk, terminal::StdTerminal, Session};
//!
//! let mut session = Session::new(SimulatedSdk::new(), StdTerminal::new()).unwrap();
//! session.output().unwrap();
//! session.run_loop().unwrap();
//! ```
//!
//! When no HMD is connected, [`HmdInfo::fallback`] stands in for the real
//! display parameters, and without a sensor the loop simply does nothing.

use std::fmt::Display;

pub mod device;
pub mod euler;
pub mod hmd_info;
#[cfg(test)]
mod mock;
pub mod profile;
pub mod session;
pub mod simulator;
pub mod terminal;

pub use device::{DeviceManager, HmdDevice, Sdk, SensorDevice, SensorFusion, SensorInfo, System};
pub use euler::{euler_angles, rad_to_degree, Axis, EulerOrder};
pub use hmd_info::{DeviceInfo, HmdInfo};
pub use profile::{Gender, Profile};
pub use session::{Session, POLL_INTERVAL};

/// Possible errors resulting from `hmd-orientation` API calls
#[derive(Debug)]
pub enum Error {
    /// Console I/O failed. See [`std::io::Error`] for specifics
    Io(std::io::Error),
    /// A user profile could not be parsed
    Profile(&'static str),
    /// Other fatal error, usually a problem with the SDK backend.
    Other(&'static str),
}

/// Result type used by the crate
pub type Result<T> = std::result::Result<T, Error>;

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::Profile(s) => write!(f, "Invalid profile: {s}"),
            Error::Other(s) => f.write_str(s),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<&'static str> for Error {
    fn from(e: &'static str) -> Self {
        Error::Other(e)
    }
}
