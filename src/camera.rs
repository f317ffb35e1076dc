use super::*;

/// Canonical world-up the camera basis is derived from.
pub const WORLD_UP: Vec3 = Y_AXIS;

// Below this, `cross(WORLD_UP, dir)` has no usable direction.
const PARALLEL_EPSILON: f32 = 1e-6;

/// Orthonormal `up`/`right` pair for a view direction rolled by a tilt angle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Basis {
    up: Vec3,
    right: Vec3,
}

impl Basis {
    /// `right` is `cross(WORLD_UP, dir)` and `up` is `cross(dir, right)`,
    /// both rolled by `tilt_deg` degrees around `dir`.
    pub fn new(dir: &Normal, tilt_deg: f32) -> Result<Self> {
        ensure!(tilt_deg.is_finite(), "Camera tilt must be finite, got {tilt_deg}");

        let view = dir.into_inner();
        let right = WORLD_UP.cross(&view);
        let right_norm = right.norm();
        ensure!(
            right_norm > PARALLEL_EPSILON,
            "View direction {view:?} is parallel to world up, camera basis is undefined"
        );
        let right = right / right_norm;
        let up = view.cross(&right);

        let rotation = na::Rotation3::from_axis_angle(dir, tilt_deg.to_radians());
        Ok(Self {
            up: rotation * up,
            right: rotation * right,
        })
    }

    #[inline]
    pub fn up(&self) -> Vec3 {
        self.up
    }

    #[inline]
    pub fn right(&self) -> Vec3 {
        self.right
    }
}

/// Pinhole camera looking along a ray at an image plane `distance` away.
///
/// `width` and `height` are the image plane extents. The basis is computed
/// once in [`Camera::new`] and cannot change afterwards.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    ray: Ray,
    distance: f32,
    width: f32,
    height: f32,
    tilt: f32,
    basis: Basis,
}

impl Camera {
    pub fn new(ray: Ray, distance: f32, width: f32, height: f32, tilt: f32) -> Result<Self> {
        // Validation.
        ensure!(
            is_finite_vector(&ray.dir()) && is_finite_vector(&ray.origin().coords),
            "Camera ray must be finite, got {ray:?}"
        );
        for (name, value) in [("distance", distance), ("width", width), ("height", height)] {
            ensure!(
                value.is_finite() && value > 0.0,
                "Camera {name} must be positive, got {value}"
            );
        }
        let Some(dir) = na::Unit::try_new(ray.dir(), f32::EPSILON) else {
            bail!("Camera direction must be non-zero, got {:?}", ray.dir());
        };

        let basis = Basis::new(&dir, tilt)?;
        let camera = Self {
            ray: ray.normalized(),
            distance,
            width,
            height,
            tilt,
            basis,
        };
        debug!(
            "Created camera at {:?} looking along {:?}, up={:?}, right={:?}",
            camera.ray.origin(),
            camera.ray.dir(),
            camera.up(),
            camera.right()
        );
        Ok(camera)
    }

    /// View ray with a unit direction.
    #[inline]
    pub fn ray(&self) -> &Ray {
        &self.ray
    }

    #[inline]
    pub fn distance(&self) -> f32 {
        self.distance
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    #[inline]
    pub fn tilt(&self) -> f32 {
        self.tilt
    }

    #[inline]
    pub fn up(&self) -> Vec3 {
        self.basis.up()
    }

    #[inline]
    pub fn right(&self) -> Vec3 {
        self.basis.right()
    }

    #[inline]
    pub fn image_plane_center(&self) -> Point3 {
        self.ray.at(self.distance)
    }

    /// Ray from the camera origin through viewport position `(x, y)`, where
    /// `[-1, 1]` spans the image plane. The direction is not normalized.
    /// The viewport keeps its full `width` at any pitch since `right` is unit
    /// length.
    pub fn ray_from_viewport(&self, x: f32, y: f32) -> Ray {
        let center = self.image_plane_center();
        let target = center
            + self.right() * (x * self.width / 2.0)
            + self.up() * (y * self.height / 2.0);
        Ray::new(self.ray.origin(), target - self.ray.origin())
    }

    /// Clip-space transform matching [`Camera::ray_from_viewport`].
    ///
    /// NDC x follows `right`, NDC y is flipped so that -1 is the top row, and
    /// depth maps `[znear, zfar]` to `[0, 1]`.
    pub fn clip_from_world(&self, znear: f32, zfar: f32) -> Result<Mat4> {
        ensure!(
            znear > 0.0 && zfar > znear && zfar.is_finite(),
            "Invalid depth range {znear}..{zfar}"
        );

        let origin = self.ray.origin().coords;
        let (r, u, d) = (self.right(), self.up(), self.ray.dir());
        let sx = 2.0 * self.distance / self.width;
        let sy = -2.0 * self.distance / self.height;
        let a = zfar / (zfar - znear);
        let b = -zfar * znear / (zfar - znear);

        #[rustfmt::skip]
        let clip_from_world = Mat4::new(
            sx * r.x, sx * r.y, sx * r.z, -sx * r.dot(&origin),
            sy * u.x, sy * u.y, sy * u.z, -sy * u.dot(&origin),
            a * d.x,  a * d.y,  a * d.z,  -a * d.dot(&origin) + b,
            d.x,      d.y,      d.z,      -d.dot(&origin),
        );
        Ok(clip_from_world)
    }

    /// Projects a world point to integer pixel coordinates on a
    /// `width` x `height` raster.
    pub fn project_point(&self, point: &Point3, clip_from_world: &Mat4) -> Result<Point2i> {
        project(point, clip_from_world, (self.width, self.height))
    }

    /// Like [`Camera::project_point`] but onto a raster of `size` pixels.
    pub fn project_point_to(
        &self,
        point: &Point3,
        clip_from_world: &Mat4,
        size: (u32, u32),
    ) -> Result<Point2i> {
        project(point, clip_from_world, (size.0 as f32, size.1 as f32))
    }
}

fn project(point: &Point3, clip_from_world: &Mat4, (w, h): (f32, f32)) -> Result<Point2i> {
    let ndc = project_ndc(point, clip_from_world)?;

    // NDC -1..1 -> 0..extent, truncated.
    let x = (ndc.x * 0.5 + 0.5) * w;
    let y = (ndc.y * 0.5 + 0.5) * h;
    Ok(Point2i::new(x as i32, y as i32))
}

/// Normalized device coordinates of a world point.
pub fn project_ndc(point: &Point3, clip_from_world: &Mat4) -> Result<Vec3> {
    let clip = clip_from_world * point.to_homogeneous();
    ensure!(
        clip.w.abs() > f32::EPSILON,
        "Point {point:?} projects to w={}, perspective divide is undefined",
        clip.w
    );
    let ndc = clip.xyz() / clip.w;
    ensure!(is_finite_vector(&ndc), "Point {point:?} projects to {ndc:?}");
    Ok(ndc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_ulps_eq};

    const EPSILON: f32 = 1e-5;

    fn camera(dir: Vec3, tilt: f32) -> Camera {
        let ray = Ray::new(Point3::new(1.0, 2.0, 3.0), dir);
        Camera::new(ray, 2.0, 4.0, 3.0, tilt).unwrap()
    }

    fn directions() -> Vec<Vec3> {
        vec![
            Z_AXIS,
            -Z_AXIS,
            X_AXIS,
            vector![1.0, 0.0, -1.0],
            vector![1.0, 1.0, 1.0],
            vector![-0.3, -0.8, 0.2],
        ]
    }

    fn assert_orthonormal(camera: &Camera) {
        let d = camera.ray().dir();
        assert_abs_diff_eq!(camera.up().dot(&d), 0.0, epsilon = EPSILON);
        assert_abs_diff_eq!(camera.right().dot(&d), 0.0, epsilon = EPSILON);
        assert_abs_diff_eq!(camera.up().dot(&camera.right()), 0.0, epsilon = EPSILON);
        assert_abs_diff_eq!(camera.up().norm(), 1.0, epsilon = EPSILON);
        assert_abs_diff_eq!(camera.right().norm(), 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_basis_without_tilt() {
        let camera = camera(Z_AXIS, 0.0);
        assert_abs_diff_eq!(camera.up(), Y_AXIS, epsilon = EPSILON);
        assert_abs_diff_eq!(camera.right(), X_AXIS, epsilon = EPSILON);

        let camera = self::camera(-Z_AXIS, 0.0);
        assert_abs_diff_eq!(camera.up(), Y_AXIS, epsilon = EPSILON);
        assert_abs_diff_eq!(camera.right(), -X_AXIS, epsilon = EPSILON);

        for dir in directions() {
            assert_orthonormal(&self::camera(dir, 0.0));
        }
    }

    #[test]
    fn test_basis_with_tilt() {
        let camera = camera(Z_AXIS, 90.0);
        assert_abs_diff_eq!(camera.up(), -X_AXIS, epsilon = EPSILON);
        assert_abs_diff_eq!(camera.right(), Y_AXIS, epsilon = EPSILON);

        for dir in directions() {
            for tilt in [-45.0, 30.0, 180.0, 725.0] {
                assert_orthonormal(&self::camera(dir, tilt));
            }
        }
    }

    #[test]
    fn test_tilt_is_a_roll() {
        // A full turn brings the basis back.
        let a = camera(vector![1.0, 1.0, 1.0], 10.0);
        let b = camera(vector![1.0, 1.0, 1.0], 370.0);
        assert_abs_diff_eq!(a.up(), b.up(), epsilon = EPSILON);
        assert_abs_diff_eq!(a.right(), b.right(), epsilon = EPSILON);
    }

    #[test]
    fn test_direction_is_normalized() {
        let camera = camera(vector![0.0, 0.0, 10.0], 0.0);
        assert_ulps_eq!(camera.ray().dir().norm(), 1.0);
        let center = camera.image_plane_center();
        assert_abs_diff_eq!(center, Point3::new(1.0, 2.0, 5.0), epsilon = EPSILON);
    }

    #[test]
    fn test_degenerate_inputs() {
        let origin = Point3::origin();
        assert!(Camera::new(Ray::new(origin, Y_AXIS), 1.0, 1.0, 1.0, 0.0).is_err());
        assert!(Camera::new(Ray::new(origin, -Y_AXIS), 1.0, 1.0, 1.0, 0.0).is_err());
        assert!(Camera::new(Ray::new(origin, Vec3::zeros()), 1.0, 1.0, 1.0, 0.0).is_err());
        assert!(Camera::new(Ray::new(origin, Z_AXIS), 0.0, 1.0, 1.0, 0.0).is_err());
        assert!(Camera::new(Ray::new(origin, Z_AXIS), 1.0, -1.0, 1.0, 0.0).is_err());
        assert!(Camera::new(Ray::new(origin, Z_AXIS), 1.0, 1.0, f32::NAN, 0.0).is_err());
        assert!(Camera::new(Ray::new(origin, Z_AXIS), 1.0, 1.0, 1.0, f32::INFINITY).is_err());
        assert!(Camera::new(Ray::new(origin, Z_AXIS), 1.0, 1.0, 1.0, 0.0).is_ok());
    }

    #[test]
    fn test_center_ray() {
        for dir in directions() {
            let camera = camera(dir, 33.0);
            let ray = camera.ray_from_viewport(0.0, 0.0);
            assert_eq!(ray.origin(), camera.ray().origin());
            let expected = camera.ray().origin() + camera.distance() * camera.ray().dir();
            assert_abs_diff_eq!(ray.at(1.0), expected, epsilon = EPSILON);
        }
    }

    #[test]
    fn test_viewport_corners() {
        let camera = camera(Z_AXIS, 0.0);
        let ray = camera.ray_from_viewport(1.0, 1.0);
        assert_abs_diff_eq!(ray.dir(), vector![2.0, 1.5, 2.0], epsilon = EPSILON);
        let ray = camera.ray_from_viewport(-1.0, 0.0);
        assert_abs_diff_eq!(ray.dir(), vector![-2.0, 0.0, 2.0], epsilon = EPSILON);

        // Outside the nominal frame is allowed.
        let ray = camera.ray_from_viewport(2.0, -3.0);
        assert_abs_diff_eq!(ray.dir(), vector![4.0, -4.5, 2.0], epsilon = EPSILON);
    }

    #[test]
    fn test_viewport_linearity() {
        for dir in directions() {
            let camera = camera(dir, -20.0);
            let center = camera.ray_from_viewport(0.0, 0.0).at(1.0);
            let offset_x = camera.ray_from_viewport(1.0, 0.0).at(1.0) - center;
            let offset_y = camera.ray_from_viewport(0.0, 1.0).at(1.0) - center;
            for (x, y) in [(0.5, 0.25), (-0.75, 0.9), (1.5, -2.0)] {
                let target = camera.ray_from_viewport(x, y).at(1.0);
                let expected = center + x * offset_x + y * offset_y;
                assert_abs_diff_eq!(target, expected, epsilon = EPSILON);
            }
        }
    }

    #[test]
    fn test_project_center() {
        let camera = Camera::new(Ray::new(Point3::origin(), Z_AXIS), 1.0, 64.0, 48.0, 0.0);
        let camera = camera.unwrap();
        let clip_from_world = camera.clip_from_world(0.1, 100.0).unwrap();
        let pixel = camera
            .project_point(&Point3::new(0.0, 0.0, 10.0), &clip_from_world)
            .unwrap();
        assert_eq!(pixel, Point2i::new(32, 24));
    }

    #[test]
    fn test_project_depth_range() {
        let camera = camera(X_AXIS, 0.0);
        let clip_from_world = camera.clip_from_world(0.5, 10.0).unwrap();
        let depth = |t: f32| {
            let clip = clip_from_world * camera.ray().at(t).to_homogeneous();
            clip.z / clip.w
        };
        assert_abs_diff_eq!(depth(0.5), 0.0, epsilon = EPSILON);
        assert_abs_diff_eq!(depth(10.0), 1.0, epsilon = EPSILON);
        assert!(camera.clip_from_world(0.0, 10.0).is_err());
        assert!(camera.clip_from_world(1.0, 1.0).is_err());
    }

    #[test]
    fn test_project_zero_w() {
        let camera = camera(Z_AXIS, 0.0);
        let clip_from_world = camera.clip_from_world(0.1, 100.0).unwrap();

        // Points on the camera plane have w = 0.
        let point = camera.ray().origin() + X_AXIS;
        assert!(camera.project_point(&point, &clip_from_world).is_err());
        assert!(camera.project_point(&point, &Mat4::zeros()).is_err());
    }

    #[test]
    fn test_project_inverts_viewport_rays() {
        let size = (64_u32, 48_u32);
        let canvas = Canvas::new(size.0, size.1);
        for dir in directions() {
            let camera = camera(dir, 15.0);
            let clip_from_world = camera.clip_from_world(0.1, 100.0).unwrap();
            for (px, py) in [(0, 0), (63, 47), (10, 30), (32, 24), (5, 40)] {
                let ndc = canvas.normalized_coordinates(px, py);
                let target = camera.ray_from_viewport(ndc.x, ndc.y).at(1.0);
                let pixel = camera
                    .project_point_to(&target, &clip_from_world, size)
                    .unwrap();
                assert_eq!(pixel, Point2i::new(px as i32, py as i32), "dir={dir:?}");
            }
        }
    }

    #[test]
    fn test_project_point_uses_camera_extent() {
        let ray = Ray::new(Point3::origin(), Z_AXIS);
        let camera = Camera::new(ray, 1.0, 64.0, 48.0, 0.0).unwrap();
        let clip_from_world = camera.clip_from_world(0.1, 100.0).unwrap();
        let canvas = Canvas::new(64, 48);
        let ndc = canvas.normalized_coordinates(3, 7);
        let target = camera.ray_from_viewport(ndc.x, ndc.y).at(1.0);
        let pixel = camera.project_point(&target, &clip_from_world).unwrap();
        assert_eq!(pixel, Point2i::new(3, 7));
    }
}
