//! Transform math for capture actors/components.
//!
//! Coordinate convention (left-handed, Z up):
//! - X = forward, Y = right, Z = up;
//! - Rotator angles are in degrees: pitch about Y, yaw about Z, roll about X.
//!
//! Quaternions are stored as glam `DQuat` (x, y, z, w). Rotating a vector by a
//! quaternion is plain q·v·q*, so glam's `mul_vec3` matches the convention above
//! as long as the quaternion is produced by [`Rotator::to_quat`].

use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};

/// Порог сингулярности (gimbal lock) при переводе кватерниона в ротатор.
const SINGULARITY_THRESHOLD: f64 = 0.4999995;

/// Euler rotation in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rotator {
    #[serde(default)]
    pub pitch: f64,
    #[serde(default)]
    pub yaw: f64,
    #[serde(default)]
    pub roll: f64,
}

impl Rotator {
    pub const ZERO: Rotator = Rotator { pitch: 0.0, yaw: 0.0, roll: 0.0 };

    pub fn new(pitch: f64, yaw: f64, roll: f64) -> Self {
        Self { pitch, yaw, roll }
    }

    pub fn to_quat(&self) -> DQuat {
        let (sp, cp) = (self.pitch.to_radians() * 0.5).sin_cos();
        let (sy, cy) = (self.yaw.to_radians() * 0.5).sin_cos();
        let (sr, cr) = (self.roll.to_radians() * 0.5).sin_cos();

        DQuat::from_xyzw(
            cr * sp * sy - sr * cp * cy,
            -cr * sp * cy - sr * cp * sy,
            cr * cp * sy - sr * sp * cy,
            cr * cp * cy + sr * sp * sy,
        )
    }

    /// Inverse of [`Rotator::to_quat`]. Yaw always comes from atan2; near +-90
    /// degrees pitch the pitch is clamped and roll is derived from that yaw.
    pub fn from_quat(q: DQuat) -> Self {
        let test = q.z * q.x - q.w * q.y;
        let yaw_y = 2.0 * (q.w * q.z + q.x * q.y);
        let yaw_x = 1.0 - 2.0 * (q.y * q.y + q.z * q.z);
        let yaw = yaw_y.atan2(yaw_x).to_degrees();

        if test < -SINGULARITY_THRESHOLD {
            let roll = normalize_axis(-yaw - 2.0 * q.x.atan2(q.w).to_degrees());
            Rotator::new(-90.0, yaw, roll)
        } else if test > SINGULARITY_THRESHOLD {
            let roll = normalize_axis(yaw - 2.0 * q.x.atan2(q.w).to_degrees());
            Rotator::new(90.0, yaw, roll)
        } else {
            let pitch = (2.0 * test).asin().to_degrees();
            let roll = (-2.0 * (q.w * q.x + q.y * q.z))
                .atan2(1.0 - 2.0 * (q.x * q.x + q.y * q.y))
                .to_degrees();
            Rotator::new(pitch, yaw, roll)
        }
    }
}

/// Clamp an angle into (-180, 180].
pub fn normalize_axis(angle: f64) -> f64 {
    let mut a = angle % 360.0;
    if a > 180.0 {
        a -= 360.0;
    } else if a <= -180.0 {
        a += 360.0;
    }
    a
}

/// Location + rotation + scale. The rotator is the source of truth; the
/// quaternion and basis vectors are derived on demand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    #[serde(default = "zero_vec")]
    pub location: DVec3,
    #[serde(default)]
    pub rotation: Rotator,
    #[serde(default = "unit_scale")]
    pub scale: DVec3,
}

fn zero_vec() -> DVec3 {
    DVec3::ZERO
}
fn unit_scale() -> DVec3 {
    DVec3::ONE
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        location: DVec3::ZERO,
        rotation: Rotator::ZERO,
        scale: DVec3::ONE,
    };

    pub fn new(location: DVec3, rotation: Rotator) -> Self {
        Self {
            location,
            rotation,
            scale: DVec3::ONE,
        }
    }

    pub fn quat(&self) -> DQuat {
        self.rotation.to_quat()
    }

    pub fn forward(&self) -> DVec3 {
        self.quat().mul_vec3(DVec3::X)
    }

    pub fn right(&self) -> DVec3 {
        self.quat().mul_vec3(DVec3::Y)
    }

    pub fn up(&self) -> DVec3 {
        self.quat().mul_vec3(DVec3::Z)
    }

    /// World pose of a child whose parent-local transform is `relative`.
    ///
    /// location = parent.location + parent.rot * (parent.scale * relative.location)
    /// rotation = parent.rot * relative.rot
    /// scale    = parent.scale * relative.scale
    pub fn compose(&self, relative: &Transform) -> WorldPose {
        let parent_q = self.quat();
        WorldPose {
            location: self.location + parent_q.mul_vec3(self.scale * relative.location),
            rotation: (parent_q * relative.quat()).normalize(),
            scale: self.scale * relative.scale,
        }
    }
}

/// Композиция трансформов. Ориентация хранится кватернионом: обратный перевод
/// в ротатор теряет точность у полюсов, поэтому базис и Quat берутся отсюда.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldPose {
    pub location: DVec3,
    pub rotation: DQuat,
    pub scale: DVec3,
}

impl WorldPose {
    pub fn rotator(&self) -> Rotator {
        Rotator::from_quat(self.rotation)
    }

    pub fn forward(&self) -> DVec3 {
        self.rotation.mul_vec3(DVec3::X)
    }

    pub fn right(&self) -> DVec3 {
        self.rotation.mul_vec3(DVec3::Y)
    }

    pub fn up(&self) -> DVec3 {
        self.rotation.mul_vec3(DVec3::Z)
    }
}
