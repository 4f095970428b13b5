use glam::{Affine3A, EulerRot, Quat, Vec3};

/// One component of a [`Transform`].
///
/// Each channel has its own composition rule between a node and its parent:
///
/// | Channel    | `absolute`            | `relative`            |
/// |------------|-----------------------|-----------------------|
/// | `Position` | `relative + parent`   | `absolute - parent`   |
/// | `Rotation` | `relative + parent`   | `absolute - parent`   |
/// | `Scale`    | `relative * parent`   | `absolute / parent`   |
///
/// Rotation is a vector of Euler angles in degrees, composed additively with
/// no wraparound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Position,
    Rotation,
    Scale,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Position, Channel::Rotation, Channel::Scale];

    /// Combines a parent-relative value with the parent's absolute value.
    #[inline]
    #[must_use]
    pub fn compose(self, relative: Vec3, parent: Vec3) -> Vec3 {
        match self {
            Channel::Position | Channel::Rotation => relative + parent,
            Channel::Scale => relative * parent,
        }
    }

    /// Recovers the parent-relative value from an absolute one.
    ///
    /// For [`Channel::Scale`] every parent component must be non-zero.
    #[inline]
    #[must_use]
    pub fn relative(self, absolute: Vec3, parent: Vec3) -> Vec3 {
        match self {
            Channel::Position | Channel::Rotation => absolute - parent,
            Channel::Scale => absolute / parent,
        }
    }
}

/// Absolute (world-space) transform of a node.
///
/// The values are stored directly; the parent-relative transform is always
/// derived from them and the parent's values, never cached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles in degrees, XYZ order.
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    #[must_use]
    pub fn new() -> Self {
        Self::IDENTITY
    }

    #[inline]
    #[must_use]
    pub fn get(&self, channel: Channel) -> Vec3 {
        match channel {
            Channel::Position => self.position,
            Channel::Rotation => self.rotation,
            Channel::Scale => self.scale,
        }
    }

    #[inline]
    pub fn set(&mut self, channel: Channel, value: Vec3) {
        match channel {
            Channel::Position => self.position = value,
            Channel::Rotation => self.rotation = value,
            Channel::Scale => self.scale = value,
        }
    }

    /// Relative value of `channel` against the absolute transform of a parent.
    /// `None` means the node is a root: relative equals absolute.
    #[inline]
    #[must_use]
    pub fn relative(&self, channel: Channel, parent: Option<&Transform>) -> Vec3 {
        let value = self.get(channel);
        match parent {
            Some(parent) => channel.relative(value, parent.get(channel)),
            None => value,
        }
    }

    /// The rotation as a quaternion.
    #[must_use]
    pub fn rotation_quat(&self) -> Quat {
        Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x.to_radians(),
            self.rotation.y.to_radians(),
            self.rotation.z.to_radians(),
        )
    }

    /// World matrix for rendering and picking.
    #[must_use]
    pub fn world_matrix(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.scale, self.rotation_quat(), self.position)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_inverts_relative() {
        let parent = Vec3::new(2.0, 4.0, 8.0);
        let absolute = Vec3::new(6.0, 12.0, 16.0);
        for channel in Channel::ALL {
            let rel = channel.relative(absolute, parent);
            assert_eq!(channel.compose(rel, parent), absolute, "{channel:?}");
        }
    }

    #[test]
    fn scale_is_multiplicative() {
        assert_eq!(Channel::Scale.relative(Vec3::new(4.0, 6.0, 8.0), Vec3::new(2.0, 3.0, 4.0)), Vec3::splat(2.0));
        assert_eq!(Channel::Position.relative(Vec3::new(4.0, 6.0, 8.0), Vec3::new(2.0, 3.0, 4.0)), Vec3::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn root_relative_is_absolute() {
        let t = Transform {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Vec3::new(10.0, 0.0, 0.0),
            scale: Vec3::splat(3.0),
        };
        for channel in Channel::ALL {
            assert_eq!(t.relative(channel, None), t.get(channel));
        }
    }

    #[test]
    fn world_matrix_identity() {
        let m = Transform::IDENTITY.world_matrix();
        assert!(m.abs_diff_eq(Affine3A::IDENTITY, 1e-6));
    }
}
