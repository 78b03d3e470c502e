//! Supported engine versions.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An engine version whose memreport grammar is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EngineVersion {
    /// Unreal Engine 4.27
    #[serde(rename = "4.27")]
    Ue4_27,
    /// Unreal Engine 5.1
    #[serde(rename = "5.1")]
    Ue5_1,
    /// Unreal Engine 5.3
    #[serde(rename = "5.3")]
    Ue5_3,
}

/// How the configuration for a version is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pipeline {
    /// A single structured document already shaped as sections and tables.
    Legacy,
    /// An ini base-settings document plus one pattern resource per section.
    Modern,
}

impl EngineVersion {
    /// All supported versions, oldest first.
    pub const ALL: [EngineVersion; 3] = [
        EngineVersion::Ue4_27,
        EngineVersion::Ue5_1,
        EngineVersion::Ue5_3,
    ];

    /// The version tag (e.g., "5.1").
    pub fn tag(self) -> &'static str {
        match self {
            EngineVersion::Ue4_27 => "4.27",
            EngineVersion::Ue5_1 => "5.1",
            EngineVersion::Ue5_3 => "5.3",
        }
    }

    /// Resource folder holding this version's configuration.
    pub fn family(self) -> &'static str {
        match self {
            EngineVersion::Ue4_27 => "ue4",
            EngineVersion::Ue5_1 => "ue5.1",
            EngineVersion::Ue5_3 => "ue5.3",
        }
    }

    /// Resolution pipeline for this version.
    pub fn pipeline(self) -> Pipeline {
        match self {
            EngineVersion::Ue4_27 => Pipeline::Legacy,
            EngineVersion::Ue5_1 | EngineVersion::Ue5_3 => Pipeline::Modern,
        }
    }

    /// Path of the legacy sections document.
    pub fn sections_path(self) -> String {
        format!("{}/sections.json", self.family())
    }

    /// Path of the ini base-settings document.
    pub fn settings_path(self) -> String {
        format!("{}/memreport.ini", self.family())
    }

    /// Path of the pattern manifest.
    pub fn manifest_path(self) -> String {
        manifest_path(self.family())
    }

    /// Path of a single table pattern resource.
    pub fn pattern_path(self, pattern_id: &str) -> String {
        format!("{}/patterns/{}.json", self.family(), pattern_id)
    }
}

/// Path of the pattern manifest for a version family.
pub fn manifest_path(family: &str) -> String {
    format!("{}/patterns/manifest.txt", family)
}

impl fmt::Display for EngineVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for EngineVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        let tag = tag
            .strip_prefix("ue")
            .or_else(|| tag.strip_prefix("UE"))
            .unwrap_or(tag);
        match tag {
            "4.27" | "4" => Ok(EngineVersion::Ue4_27),
            "5.1" => Ok(EngineVersion::Ue5_1),
            "5.3" => Ok(EngineVersion::Ue5_3),
            _ => Err(Error::UnsupportedVersion(s.to_string())),
        }
    }
}
