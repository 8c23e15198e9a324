// Copyright (C) 2023, Alex Badics
// This file is part of hmd-orientation
// Licensed under the MIT license. See LICENSE file in the project root for details.

//! Test doubles: an SDK that reports exactly what it is told to and counts every call,
//! and a terminal with a scripted keyboard.

use std::{cell::RefCell, io, rc::Rc, time::Duration};

use nalgebra::UnitQuaternion;

use crate::{
    terminal::Terminal, DeviceManager, Error, HmdDevice, HmdInfo, Profile, Result, Sdk,
    SensorDevice, SensorFusion, SensorInfo,
};

#[derive(Debug, Default)]
pub struct MockStats {
    pub inits: usize,
    pub shutdowns: usize,
    pub managers_alive: usize,
    pub hmds_alive: usize,
    pub sensors_alive: usize,
    pub fusions_alive: usize,
    pub fusions_created: usize,
    pub standalone_sensor_lookups: usize,
    pub profiles_read: usize,
    pub prediction_enabled: bool,
    pub fusion_queries: usize,
    pub handles_alive_at_shutdown: usize,
}

type Stats = Rc<RefCell<MockStats>>;

#[derive(Debug, Clone, Default)]
pub struct MockHmd {
    pub info: Option<HmdInfo>,
    pub sensor: bool,
    pub profile: Option<Profile>,
}

#[derive(Default)]
pub struct MockSdk {
    pub hmd: Option<MockHmd>,
    pub standalone_sensor: bool,
    /// Reported one after the other, the last one repeats. Identity if empty.
    pub orientations: Vec<UnitQuaternion<f32>>,
    pub fail_init: bool,
    pub stats: Stats,
}

impl MockSdk {
    pub fn stats(&self) -> Stats {
        Rc::clone(&self.stats)
    }
}

impl Sdk for MockSdk {
    type Sensor = MockSensor;
    type Manager = MockManager;
    type Fusion = MockFusion;

    fn init(&mut self) -> Result<()> {
        if self.fail_init {
            return Err(Error::Other("Init failed"));
        }
        self.stats.borrow_mut().inits += 1;
        Ok(())
    }

    fn shutdown(&mut self) {
        let mut stats = self.stats.borrow_mut();
        stats.shutdowns += 1;
        stats.handles_alive_at_shutdown =
            stats.managers_alive + stats.hmds_alive + stats.sensors_alive + stats.fusions_alive;
    }

    fn create_device_manager(&mut self) -> MockManager {
        self.stats.borrow_mut().managers_alive += 1;
        MockManager {
            hmd: self.hmd.clone(),
            standalone_sensor: self.standalone_sensor,
            stats: self.stats(),
        }
    }

    fn create_sensor_fusion(&mut self) -> MockFusion {
        let mut stats = self.stats.borrow_mut();
        stats.fusions_created += 1;
        stats.fusions_alive += 1;
        MockFusion {
            sensor: None,
            orientations: self.orientations.clone(),
            queries: 0,
            stats: self.stats(),
        }
    }
}

pub struct MockManager {
    hmd: Option<MockHmd>,
    standalone_sensor: bool,
    stats: Stats,
}

impl DeviceManager for MockManager {
    type Sensor = MockSensor;
    type Hmd = MockHmdDevice;

    fn create_hmd_device(&mut self) -> Option<MockHmdDevice> {
        let config = self.hmd.clone()?;
        self.stats.borrow_mut().hmds_alive += 1;
        Some(MockHmdDevice {
            config,
            stats: Rc::clone(&self.stats),
        })
    }

    fn create_sensor_device(&mut self) -> Option<Rc<MockSensor>> {
        self.stats.borrow_mut().standalone_sensor_lookups += 1;
        self.standalone_sensor
            .then(|| MockSensor::new(Rc::clone(&self.stats)))
    }
}

impl Drop for MockManager {
    fn drop(&mut self) {
        self.stats.borrow_mut().managers_alive -= 1;
    }
}

pub struct MockHmdDevice {
    config: MockHmd,
    stats: Stats,
}

impl HmdDevice for MockHmdDevice {
    type Sensor = MockSensor;

    fn device_info(&self) -> Option<HmdInfo> {
        self.config.info.clone()
    }

    fn sensor(&mut self) -> Option<Rc<MockSensor>> {
        self.config
            .sensor
            .then(|| MockSensor::new(Rc::clone(&self.stats)))
    }

    fn profile(&self) -> Option<Profile> {
        self.stats.borrow_mut().profiles_read += 1;
        self.config.profile.clone()
    }
}

impl Drop for MockHmdDevice {
    fn drop(&mut self) {
        self.stats.borrow_mut().hmds_alive -= 1;
    }
}

pub struct MockSensor {
    stats: Stats,
}

impl MockSensor {
    fn new(stats: Stats) -> Rc<Self> {
        stats.borrow_mut().sensors_alive += 1;
        Rc::new(Self { stats })
    }
}

impl SensorDevice for MockSensor {
    fn info(&self) -> SensorInfo {
        SensorInfo {
            product_name: "Mock Tracker".into(),
            manufacturer: "Mock".into(),
            serial_number: "0000".into(),
        }
    }
}

impl Drop for MockSensor {
    fn drop(&mut self) {
        self.stats.borrow_mut().sensors_alive -= 1;
    }
}

pub struct MockFusion {
    sensor: Option<Rc<MockSensor>>,
    orientations: Vec<UnitQuaternion<f32>>,
    queries: usize,
    stats: Stats,
}

impl SensorFusion for MockFusion {
    type Sensor = MockSensor;

    fn attach_to_sensor(&mut self, sensor: Rc<MockSensor>) {
        self.sensor = Some(sensor);
    }

    fn set_prediction_enabled(&mut self, enabled: bool) {
        self.stats.borrow_mut().prediction_enabled = enabled;
    }

    fn orientation(&mut self) -> UnitQuaternion<f32> {
        self.stats.borrow_mut().fusion_queries += 1;
        let result = self
            .orientations
            .get(self.queries)
            .or(self.orientations.last())
            .copied()
            .unwrap_or_else(UnitQuaternion::identity);
        self.queries += 1;
        result
    }
}

impl Drop for MockFusion {
    fn drop(&mut self) {
        // Release the sensor first, like the real thing would
        self.sensor = None;
        self.stats.borrow_mut().fusions_alive -= 1;
    }
}

#[derive(Debug, Default)]
struct TerminalState {
    output: Vec<u8>,
    fail_after_lines: Option<usize>,
    key_at_poll: Option<usize>,
    key_polls: usize,
    enter_waits: usize,
    sleeps: Vec<Duration>,
}

/// Terminal with a shared, inspectable state. Clones see the same state.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTerminal {
    state: Rc<RefCell<TerminalState>>,
}

impl ScriptedTerminal {
    /// A key is reported on the `poll`th call of `key_pressed` (1-based)
    pub fn with_key_at_poll(poll: usize) -> Self {
        let result = Self::default();
        result.state.borrow_mut().key_at_poll = Some(poll);
        result
    }

    /// Writes fail once `lines` full lines went out
    pub fn failing_after_lines(lines: usize) -> Self {
        let result = Self::default();
        result.state.borrow_mut().fail_after_lines = Some(lines);
        result
    }

    pub fn output(&self) -> String {
        String::from_utf8(self.state.borrow().output.clone()).unwrap()
    }

    pub fn key_polls(&self) -> usize {
        self.state.borrow().key_polls
    }

    pub fn enter_waits(&self) -> usize {
        self.state.borrow().enter_waits
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.state.borrow().sleeps.clone()
    }
}

impl io::Write for ScriptedTerminal {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.state.borrow_mut();
        if let Some(limit) = state.fail_after_lines {
            if state.output.iter().filter(|b| **b == b'\n').count() >= limit {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "scripted failure"));
            }
        }
        state.output.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Terminal for ScriptedTerminal {
    fn wait_for_enter(&mut self) -> io::Result<()> {
        self.state.borrow_mut().enter_waits += 1;
        Ok(())
    }

    fn key_pressed(&mut self) -> bool {
        let mut state = self.state.borrow_mut();
        state.key_polls += 1;
        state.key_at_poll.map_or(false, |poll| state.key_polls >= poll)
    }

    fn sleep(&mut self, duration: Duration) {
        self.state.borrow_mut().sleeps.push(duration);
    }
}
