//! Source data consumed (read-only) by the dump pipeline.
//!
//! References between objects are `Option<ObjectId>` handles into
//! [`ObjectRegistry`](crate::registry::ObjectRegistry); `None` and stale handles
//! both count as "absent".

use anyhow::{anyhow, Result};
use glam::DVec3;
use std::fmt;

use crate::registry::ObjectId;
use crate::transform::{Transform, WorldPose};

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color (alpha = 255).
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// "RRGGBBAA", uppercase.
    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
    }

    /// Parse "RRGGBB" or "RRGGBBAA", with or without a leading '#'.
    pub fn from_hex(s: &str) -> Result<Self> {
        let hx = s.trim();
        let hx = hx.strip_prefix('#').unwrap_or(hx);
        if !hx.is_ascii() || (hx.len() != 6 && hx.len() != 8) {
            return Err(anyhow!("color must be RRGGBB or RRGGBBAA, got '{}'", s));
        }
        let byte = |i: usize| {
            u8::from_str_radix(&hx[i..i + 2], 16)
                .map_err(|e| anyhow!("bad color '{}': {}", s, e))
        };
        let a = if hx.len() == 8 { byte(6)? } else { 255 };
        Ok(Self::new(byte(0)?, byte(2)?, byte(4)?, a))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// One palette entry -> map area binding, with its pixel bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorAreaPair {
    pub map_area: Option<ObjectId>,
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

/// The dumped resource: palette-indexed area texture and its world mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct MapAreaTexture {
    pub color_palette: Vec<Color>,
    pub color_to_area: Vec<ColorAreaPair>,
    /// Raw texel data (one palette index per byte).
    pub area_data: Vec<u8>,
    pub capture_actor: Option<ObjectId>,
    pub fog_of_war_texture: Option<ObjectId>,
    pub data_width: i32,
    pub upper_left_world: DVec3,
    pub world_to_map_scale: f64,
    pub cached_game_state: Option<ObjectId>,
}

impl Default for MapAreaTexture {
    fn default() -> Self {
        Self {
            color_palette: Vec::new(),
            color_to_area: Vec::new(),
            area_data: Vec::new(),
            capture_actor: None,
            fog_of_war_texture: None,
            data_width: 0,
            upper_left_world: DVec3::ZERO,
            world_to_map_scale: 1.0,
            cached_game_state: None,
        }
    }
}

/// World-placed capture viewpoint.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CaptureActor {
    /// World transform of the actor (root).
    pub transform: Transform,
    pub capture_component: Option<CaptureComponent>,
}

/// Scene capture component attached to a [`CaptureActor`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CaptureComponent {
    /// Parent-local transform.
    pub relative: Transform,
}

impl CaptureComponent {
    pub fn world_pose(&self, owner: &Transform) -> WorldPose {
        owner.compose(&self.relative)
    }
}
