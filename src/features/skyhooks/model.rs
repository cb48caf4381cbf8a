//! Skyhook timer types and input validation

use chrono::{DateTime, Utc};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use super::error::{Result, SkyhookError};

/// Accent of skyhook replies
pub const SKYHOOK_COLOR: u32 = 0xfe42bb;

const MAX_SYSTEM_LEN: usize = 20;

static SYSTEM_NAME: OnceLock<Regex> = OnceLock::new();

fn system_name() -> &'static Regex {
    SYSTEM_NAME.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9 \-]+$").expect("system name pattern is valid")
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoonType {
    Lava,
    Ice,
}

impl FromStr for MoonType {
    type Err = SkyhookError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "l" | "lava" => Ok(MoonType::Lava),
            "i" | "ice" => Ok(MoonType::Ice),
            _ => Err(SkyhookError::InvalidMoonType(s.to_string())),
        }
    }
}

impl fmt::Display for MoonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoonType::Lava => write!(f, "Lava"),
            MoonType::Ice => write!(f, "Ice"),
        }
    }
}

/// Trim and uppercase a system name, rejecting anything but letters, digits, spaces and hyphens
pub fn normalize_system(input: &str) -> Result<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_SYSTEM_LEN || !system_name().is_match(trimmed) {
        return Err(SkyhookError::InvalidSystem(input.to_string()));
    }
    Ok(trimmed.to_uppercase())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skyhook {
    pub id: i64,
    pub guild_id: String,
    pub system: String,
    pub moon_type: MoonType,
    /// When the skyhook becomes vulnerable
    pub due_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSkyhook {
    pub guild_id: String,
    pub system: String,
    pub moon_type: MoonType,
    pub due_at: DateTime<Utc>,
}
