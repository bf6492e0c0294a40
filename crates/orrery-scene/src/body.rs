//! The closed set of scene nodes and their per-frame transforms.

use std::ops::{Index, IndexMut};

use crate::orbit::Transform;

/// A node of the scene whose transform is tracked every frame.
///
/// `FreeAnchor` is not a celestial body: it is the point the camera occupies
/// while orbiting freely, and it only ever serves as an eye position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Body {
    FreeAnchor,
    Sun,
    Earth,
    Moon,
}

impl Body {
    /// Every node, in storage order.
    pub const ALL: [Body; 4] = [Body::FreeAnchor, Body::Sun, Body::Earth, Body::Moon];

    /// The bodies that are rendered and can be looked at.
    pub const CELESTIAL: [Body; 3] = [Body::Sun, Body::Earth, Body::Moon];

    /// Slot of this node in a [`BodyTransforms`] table.
    pub const fn index(self) -> usize {
        match self {
            Body::FreeAnchor => 0,
            Body::Sun => 1,
            Body::Earth => 2,
            Body::Moon => 3,
        }
    }

    /// Whether this node is a rendered body rather than the camera anchor.
    pub const fn is_celestial(self) -> bool {
        !matches!(self, Body::FreeAnchor)
    }

    /// Lowercase display name, used for labels and logs.
    pub const fn name(self) -> &'static str {
        match self {
            Body::FreeAnchor => "free-anchor",
            Body::Sun => "sun",
            Body::Earth => "earth",
            Body::Moon => "moon",
        }
    }
}

/// Fixed-size table of transforms keyed by [`Body`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyTransforms([Transform; 4]);

impl BodyTransforms {
    /// All nodes at the world origin with unit scale.
    pub const fn identity() -> Self {
        Self([Transform::IDENTITY; 4])
    }

    /// World-space position of a node's local origin.
    pub fn origin(&self, body: Body) -> glam::Vec3 {
        self[body].origin()
    }
}

impl Default for BodyTransforms {
    fn default() -> Self {
        Self::identity()
    }
}

impl Index<Body> for BodyTransforms {
    type Output = Transform;

    fn index(&self, body: Body) -> &Transform {
        &self.0[body.index()]
    }
}

impl IndexMut<Body> for BodyTransforms {
    fn index_mut(&mut self, body: Body) -> &mut Transform {
        &mut self.0[body.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_indices_are_unique_and_dense() {
        let mut seen = [false; 4];
        for body in Body::ALL {
            assert!(!seen[body.index()], "{body:?} shares a slot");
            seen[body.index()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_free_anchor_is_not_celestial() {
        assert!(!Body::FreeAnchor.is_celestial());
        assert!(Body::CELESTIAL.iter().all(|b| b.is_celestial()));
    }

    #[test]
    fn test_index_mut_updates_single_slot() {
        let mut transforms = BodyTransforms::identity();
        transforms[Body::Moon].translation = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(transforms.origin(Body::Moon), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(transforms.origin(Body::Earth), Vec3::ZERO);
    }
}
