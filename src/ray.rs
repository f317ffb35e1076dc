use super::*;

/// A half-line from `origin` along `dir`.
///
/// `dir` is stored as given. Consumers that assume unit length call
/// [`Ray::normalized`] first.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    origin: Point3,
    dir: Vec3,
}

impl Ray {
    #[inline]
    pub const fn new(origin: Point3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    #[inline]
    pub const fn origin(&self) -> Point3 {
        self.origin
    }

    #[inline]
    pub const fn dir(&self) -> Vec3 {
        self.dir
    }

    #[inline]
    pub fn at(&self, t: f32) -> Point3 {
        self.origin + t * self.dir
    }

    #[inline]
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self::new(self.origin, self.dir.normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_ulps_eq;

    #[test]
    fn test_at() {
        let ray = Ray::new(Point3::new(1.0, 2.0, 3.0), vector![0.0, 0.0, 2.0]);
        let p = ray.at(1.5);
        assert_ulps_eq!(p.x, 1.0);
        assert_ulps_eq!(p.y, 2.0);
        assert_ulps_eq!(p.z, 6.0);
    }

    #[test]
    fn test_normalized() {
        let ray = Ray::new(Point3::origin(), vector![3.0, 0.0, 4.0]).normalized();
        assert_ulps_eq!(ray.dir().norm(), 1.0, max_ulps = 1);
        assert_ulps_eq!(ray.dir().x, 0.6, max_ulps = 1);
        assert_ulps_eq!(ray.dir().z, 0.8, max_ulps = 1);
    }
}
