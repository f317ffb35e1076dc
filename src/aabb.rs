use super::*;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    extents: [Point3; 2],
}

impl Aabb {
    /// An inverted box that any `extend` or `merged` replaces.
    #[inline]
    pub fn new() -> Self {
        Self {
            extents: [
                na::Vector3::repeat(f32::MAX).into(),
                na::Vector3::repeat(-f32::MAX).into(),
            ],
        }
    }

    #[inline]
    pub fn from_min_max(min: &Point3, max: &Point3) -> Self {
        Self {
            extents: [*min, *max],
        }
    }

    pub fn from_points<'a, Iter>(points: Iter) -> Self
    where
        Iter: IntoIterator<Item = &'a Point3>,
    {
        let mut aabb = Self::new();
        for point in points {
            aabb.extend(point);
        }
        aabb
    }

    #[inline]
    pub fn min(&self) -> Point3 {
        self.extents[0]
    }

    #[inline]
    pub fn max(&self) -> Point3 {
        self.extents[1]
    }

    #[inline]
    pub fn extents(&self) -> Vec3 {
        self.max() - self.min()
    }

    /// True until at least one point has been added.
    #[inline]
    pub fn is_empty(&self) -> bool {
        (0..3).any(|axis| self.min()[axis] > self.max()[axis])
    }

    pub fn contains(&self, point: &Point3) -> bool {
        (0..3).all(|axis| self.min()[axis] <= point[axis] && point[axis] <= self.max()[axis])
    }

    pub fn extend(&mut self, point: &Point3) {
        self.extents[0] = self.min().coords.inf(&point.coords).into();
        self.extents[1] = self.max().coords.sup(&point.coords).into();
    }

    pub fn merged(&self, other: &Aabb) -> Self {
        Self {
            extents: [self.min().inf(&other.min()), self.max().sup(&other.max())],
        }
    }

    /// Slab test. Returns the parametric `(t_enter, t_exit)` interval clipped
    /// to `[t_min, t_max]`, or `None` when the ray misses.
    pub fn hit(&self, ray: &Ray, t_min: f32, t_max: f32) -> Option<(f32, f32)> {
        if self.is_empty() {
            return None;
        }

        let origin = ray.origin();
        let dir = ray.dir();
        let mut t_enter = t_min;
        let mut t_exit = t_max;
        for axis in 0..3 {
            let lo = self.min()[axis];
            let hi = self.max()[axis];

            // Parallel to the slab: either always inside or never.
            if dir[axis] == 0.0 {
                if origin[axis] < lo || origin[axis] > hi {
                    return None;
                }
                continue;
            }

            let inv_dir = 1.0 / dir[axis];
            let mut t0 = (lo - origin[axis]) * inv_dir;
            let mut t1 = (hi - origin[axis]) * inv_dir;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_enter = t_enter.max(t0);
            t_exit = t_exit.min(t1);
            if t_enter > t_exit {
                return None;
            }
        }
        Some((t_enter, t_exit))
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::new()
    }
}
