// Copyright (C) 2023, Alex Badics
// This file is part of hmd-orientation
// Licensed under the MIT license. See LICENSE file in the project root for details.

//! Display and lens parameters of an HMD. See [`HmdInfo`] and [`DeviceInfo`]

use std::fmt::Display;

/// Display geometry, lens distortion and identification of an HMD.
/// Distances are in meters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HmdInfo {
    /// Name of the display device as seen by the OS
    pub display_device_name: String,
    /// Product name, e.g. "Oculus Rift DK1"
    pub product_name: String,
    /// Manufacturer name
    pub manufacturer: String,
    /// Firmware/hardware version
    pub version: u32,
    /// Horizontal resolution of the whole screen, in pixels
    pub h_resolution: u32,
    /// Vertical resolution of the whole screen, in pixels
    pub v_resolution: u32,
    /// Physical width of the screen
    pub h_screen_size: f32,
    /// Physical height of the screen
    pub v_screen_size: f32,
    /// Vertical position of the lens centers on the screen
    pub v_screen_center: f32,
    /// Distance from the eye to the screen
    pub eye_to_screen_distance: f32,
    /// Distance between the centers of the lenses
    pub lens_separation_distance: f32,
    /// Distance between the pupils of the user
    pub interpupillary_distance: f32,
    /// Radial distortion coefficients, k0 to k3
    pub distortion_k: [f32; 4],
    /// Chromatic aberration coefficients
    pub chroma_ab_correction: [f32; 4],
    /// Horizontal position of the HMD screen on the desktop
    pub desktop_x: i32,
    /// Vertical position of the HMD screen on the desktop
    pub desktop_y: i32,
}

impl HmdInfo {
    /// Parameters of a DK1-class HMD without any identification strings.
    /// Used when no HMD could be queried.
    pub fn fallback() -> Self {
        Self {
            display_device_name: String::new(),
            product_name: String::new(),
            manufacturer: String::new(),
            version: 0,
            h_resolution: 1280,
            v_resolution: 800,
            h_screen_size: 0.14976,
            v_screen_size: 0.0936,
            v_screen_center: 0.0468,
            eye_to_screen_distance: 0.041,
            lens_separation_distance: 0.0635,
            interpupillary_distance: 0.064,
            distortion_k: [1.0, 0.22, 0.24, 0.0],
            chroma_ab_correction: [0.996, -0.004, 1.014, 0.0],
            desktop_x: 0,
            desktop_y: 0,
        }
    }
}

/// Prints one ` Name: value` line per field, in a fixed order.
impl Display for HmdInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, " DisplayDeviceName: {}", self.display_device_name)?;
        writeln!(f, " ProductName: {}", self.product_name)?;
        writeln!(f, " Manufacturer: {}", self.manufacturer)?;
        writeln!(f, " Version: {}", self.version)?;
        writeln!(f, " HResolution: {}", self.h_resolution)?;
        writeln!(f, " VResolution: {}", self.v_resolution)?;
        writeln!(f, " HScreenSize: {}", self.h_screen_size)?;
        writeln!(f, " VScreenSize: {}", self.v_screen_size)?;
        writeln!(f, " VScreenCenter: {}", self.v_screen_center)?;
        writeln!(f, " EyeToScreenDistance: {}", self.eye_to_screen_distance)?;
        writeln!(f, " LensSeparationDistance: {}", self.lens_separation_distance)?;
        writeln!(f, " InterpupillaryDistance: {}", self.interpupillary_distance)?;
        for (i, k) in self.distortion_k.iter().enumerate() {
            writeln!(f, " DistortionK[{i}]: {k}")?;
        }
        for (i, c) in self.chroma_ab_correction.iter().enumerate() {
            writeln!(f, " ChromaAbCorrection[{i}]: {c}")?;
        }
        writeln!(f, " DesktopX: {}", self.desktop_x)?;
        writeln!(f, " DesktopY: {}", self.desktop_y)
    }
}

/// Where the session's [`HmdInfo`] came from
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceInfo {
    /// Read from a connected HMD
    Loaded(HmdInfo),
    /// Made up from [`HmdInfo::fallback`], because no HMD reported its parameters
    Synthesized(HmdInfo),
}

impl DeviceInfo {
    /// Use `info` if the device reported it, the fallback parameters otherwise
    pub fn from_device(info: Option<HmdInfo>) -> Self {
        match info {
            Some(info) => DeviceInfo::Loaded(info),
            None => DeviceInfo::Synthesized(HmdInfo::fallback()),
        }
    }

    /// The parameters, regardless of their origin
    pub fn info(&self) -> &HmdInfo {
        match self {
            DeviceInfo::Loaded(info) | DeviceInfo::Synthesized(info) => info,
        }
    }

    /// `true` if the parameters came from a real device
    pub fn is_loaded(&self) -> bool {
        matches!(self, DeviceInfo::Loaded(_))
    }
}
