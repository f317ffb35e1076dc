use std::fmt;

use super::*;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub positions: [Point3; 3],
}

impl Triangle {
    #[inline]
    pub const fn new(a: Point3, b: Point3, c: Point3) -> Self {
        Self {
            positions: [a, b, c],
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(&self.positions)
    }
}

/// Handle into a mesh's triangle list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TriangleId(u32);

impl TriangleId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TriangleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
