//! Canonical numeric encoding of geometric primitives.
//!
//! Field order is part of the dump format:
//!   XY         -> [x, y]
//!   vector     -> [x, y, z]
//!   rotator    -> [roll, pitch, yaw]
//!   quaternion -> [w, x, y, z]
//!
//! Values pass through untouched (NaN/Inf included).

use glam::{DQuat, DVec3};

use crate::transform::Rotator;

pub fn encode_xy<T: Copy>(x: T, y: T) -> [T; 2] {
    [x, y]
}

pub fn encode_vector3(v: DVec3) -> [f64; 3] {
    [v.x, v.y, v.z]
}

pub fn encode_euler(r: &Rotator) -> [f64; 3] {
    [r.roll, r.pitch, r.yaw]
}

pub fn encode_quat(q: DQuat) -> [f64; 4] {
    [q.w, q.x, q.y, q.z]
}
