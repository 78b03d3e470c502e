//! Engine version detection from report content.

use crate::error::Result;
use crate::model::EngineVersion;
use std::path::Path;

/// Keyword families that only appear with the newer renderer.
const RENDERER_MARKERS: [&str; 2] = ["Nanite", "Lumen"];

/// Markers exclusive to the newest supported version.
const NEWEST_MARKERS: [&str; 3] = [
    // console dump command
    "rhi.DumpResourceMemory",
    // stat group
    "STATGROUP_RHITransientMemory",
    // streaming diagnostic command
    "ListStreamableMeshes",
];

/// Build environment tag carried by every engine 5 build.
const UE5_ENVIRONMENT_TAG: &str = "++UE5+";

/// Detect the engine version that produced a report.
///
/// Never fails: content without any recognizable marker is assumed to come
/// from the oldest supported version.
///
/// # Example
/// ```
/// use memreport::{detect_version, EngineVersion};
///
/// let text = "MemReport: Begin command \"r.Nanite.Stats\"";
/// assert_eq!(detect_version(text), EngineVersion::Ue5_1);
/// ```
pub fn detect_version(text: &str) -> EngineVersion {
    if has_renderer_markers(text) {
        if NEWEST_MARKERS.iter().any(|m| text.contains(m)) {
            return EngineVersion::Ue5_3;
        }
        return EngineVersion::Ue5_1;
    }

    if text.contains(UE5_ENVIRONMENT_TAG) {
        return EngineVersion::Ue5_1;
    }

    EngineVersion::Ue4_27
}

/// Detect the engine version of a report file.
///
/// # Returns
/// * `Err(Error::Io)` if the file cannot be read
pub fn detect_version_from_path<P: AsRef<Path>>(path: P) -> Result<EngineVersion> {
    let bytes = std::fs::read(path)?;
    Ok(detect_version(&String::from_utf8_lossy(&bytes)))
}

fn has_renderer_markers(text: &str) -> bool {
    RENDERER_MARKERS.iter().any(|m| text.contains(m))
}
