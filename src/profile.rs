// Copyright (C) 2023, Alex Badics
// This file is part of hmd-orientation
// Licensed under the MIT license. See LICENSE file in the project root for details.

//! User profile, as stored by the SDK in its JSON profile file. See [`Profile`]

use std::collections::HashMap;

use tinyjson::JsonValue;

use crate::{Error, Result};

const EYE_TO_HEADTOP_RATIO: f32 = 0.44538;
const MALE_AVG_HEAD_HEIGHT: f32 = 0.232;
const FEMALE_AVG_HEAD_HEIGHT: f32 = 0.218;

/// Gender setting of a profile. Only used for estimating the head size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Gender {
    /// Not set
    #[default]
    Unspecified,
    /// Male
    Male,
    /// Female
    Female,
}

/// Body measurements of the user. Distances are in meters.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    /// Profile name
    pub name: String,
    /// See [`Gender`]
    pub gender: Gender,
    /// Standing height of the user
    pub player_height: f32,
    /// Interpupillary distance of the user
    pub ipd: f32,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: String::new(),
            gender: Gender::Unspecified,
            player_height: 1.778,
            ipd: 0.064,
        }
    }
}

impl Profile {
    /// Height of the eyes from the floor, estimated from the player height
    /// and an average head size.
    pub fn eye_height(&self) -> f32 {
        let head_height = match self.gender {
            Gender::Female => FEMALE_AVG_HEAD_HEIGHT,
            _ => MALE_AVG_HEAD_HEIGHT,
        };
        self.player_height - EYE_TO_HEADTOP_RATIO * head_height
    }

    /// Parse the current profile out of an SDK profile file.
    ///
    /// The profile named by `CurrentProfile` is used, or the first one if that is missing.
    /// Fields missing from the entry keep their [`Default`] values.
    pub fn from_json(json: &str) -> Result<Self> {
        let root: JsonValue = json
            .parse()
            .map_err(|_| Error::Profile("JSON parse error"))?;
        let root = root
            .get::<HashMap<String, JsonValue>>()
            .ok_or(Error::Profile("Root is not an object"))?;
        let profiles = root
            .get("Profile")
            .and_then(|p| p.get::<Vec<JsonValue>>())
            .ok_or(Error::Profile("No profile list"))?;
        let current = root
            .get("CurrentProfile")
            .and_then(|c| c.get::<String>());

        let entries: Vec<&HashMap<String, JsonValue>> = profiles
            .iter()
            .filter_map(|p| p.get::<HashMap<String, JsonValue>>())
            .collect();
        let entry = current
            .and_then(|current| {
                entries
                    .iter()
                    .find(|p| p.get("Name").and_then(|n| n.get::<String>()) == Some(current))
            })
            .or_else(|| entries.first())
            .ok_or(Error::Profile("Profile list is empty"))?;

        Self::from_entry(entry)
    }

    fn from_entry(entry: &HashMap<String, JsonValue>) -> Result<Self> {
        let mut result = Self::default();
        if let Some(name) = entry.get("Name") {
            result.name = name
                .get::<String>()
                .ok_or(Error::Profile("Name is not a string"))?
                .clone();
        }
        if let Some(gender) = entry.get("Gender") {
            result.gender = match gender
                .get::<String>()
                .ok_or(Error::Profile("Gender is not a string"))?
                .as_str()
            {
                "Male" => Gender::Male,
                "Female" => Gender::Female,
                _ => Gender::Unspecified,
            };
        }
        if let Some(height) = entry.get("PlayerHeight") {
            result.player_height = Self::parse_float(height)?;
        }
        if let Some(ipd) = entry.get("IPD") {
            result.ipd = Self::parse_float(ipd)?;
        }
        Ok(result)
    }

    fn parse_float(json: &JsonValue) -> Result<f32> {
        Ok(*json
            .get::<f64>()
            .ok_or(Error::Profile("Json value is not a float"))? as f32)
    }
}
