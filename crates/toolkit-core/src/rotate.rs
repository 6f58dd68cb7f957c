//! Page rotation

use crate::document::{effective_rotation, load_pdf, normalize_rotation, page_dict_mut, save_pdf};
use crate::error::{Result, ToolkitError};
use lopdf::Object;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

/// Rotation magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum RotationAngle {
    Deg90,
    Deg180,
    Deg270,
}

impl RotationAngle {
    pub fn degrees(self) -> i64 {
        match self {
            RotationAngle::Deg90 => 90,
            RotationAngle::Deg180 => 180,
            RotationAngle::Deg270 => 270,
        }
    }
}

impl TryFrom<i64> for RotationAngle {
    type Error = ToolkitError;

    fn try_from(degrees: i64) -> Result<Self> {
        match degrees {
            90 => Ok(RotationAngle::Deg90),
            180 => Ok(RotationAngle::Deg180),
            270 => Ok(RotationAngle::Deg270),
            other => Err(ToolkitError::InvalidRotation(other)),
        }
    }
}

impl From<RotationAngle> for i64 {
    fn from(angle: RotationAngle) -> Self {
        angle.degrees()
    }
}

/// Which way to turn: right is clockwise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationDirection {
    Left,
    Right,
}

impl RotationDirection {
    /// Apply the direction's sign to a magnitude
    pub fn signed(self, angle: RotationAngle) -> i64 {
        match self {
            RotationDirection::Right => angle.degrees(),
            RotationDirection::Left => -angle.degrees(),
        }
    }
}

impl FromStr for RotationDirection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "right" => Ok(RotationDirection::Right),
            "left" => Ok(RotationDirection::Left),
            other => Err(format!("Unknown direction '{}'. Use 'left' or 'right'", other)),
        }
    }
}

impl fmt::Display for RotationDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RotationDirection::Left => write!(f, "left"),
            RotationDirection::Right => write!(f, "right"),
        }
    }
}

/// Result of a rotation
#[derive(Debug, Clone)]
pub struct RotateOutput {
    pub bytes: Vec<u8>,
    /// Always the document's page count
    pub pages_rotated: u32,
}

/// Rotate every page by `angle` in `direction`.
///
/// Each page gets `(current + delta) mod 360`, where `current` includes any
/// rotation inherited from the page tree.
pub fn rotate_pdf(
    bytes: &[u8],
    angle: RotationAngle,
    direction: RotationDirection,
) -> Result<RotateOutput> {
    let mut doc = load_pdf(bytes)?;
    let delta = direction.signed(angle);

    let page_ids: Vec<_> = doc.get_pages().into_values().collect();

    for &page_id in &page_ids {
        let current = effective_rotation(&doc, page_id);
        let rotated = normalize_rotation(current + delta);
        page_dict_mut(&mut doc, page_id)?.set("Rotate", Object::Integer(rotated));
        debug!(page = ?page_id, from = current, to = rotated, "rotated page");
    }

    let bytes = save_pdf(&mut doc)?;
    let pages_rotated = page_ids.len() as u32;

    info!(pages = pages_rotated, degrees = angle.degrees(), %direction, "rotation complete");

    Ok(RotateOutput {
        bytes,
        pages_rotated,
    })
}
