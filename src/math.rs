use super::*;

//
// Linear algebra
//

pub use na::vector;

pub type Vec3 = na::Vector3<f32>;

pub type Mat4 = na::Matrix4<f32>;

pub type Point2 = na::Point2<f32>;
pub type Point2i = na::Point2<i32>;
pub type Point3 = na::Point3<f32>;

pub type Normal = na::UnitVector3<f32>;

pub const X_AXIS: Vec3 = vector![1.0, 0.0, 0.0];
pub const Y_AXIS: Vec3 = vector![0.0, 1.0, 0.0];
pub const Z_AXIS: Vec3 = vector![0.0, 0.0, 1.0];

#[inline]
pub fn is_finite_vector(v: &Vec3) -> bool {
    v.iter().all(|c| c.is_finite())
}

//
// Interpolation
//

pub fn lerp_scalar<T: num::Float>(a: T, b: T, t: T) -> T {
    a * (T::one() - t) + b * t
}

//
// Tests
//

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_ulps_eq;

    #[test]
    fn test_lerp_scalar() {
        assert_ulps_eq!(lerp_scalar(0.0, 1.0, 0.0), 0.0, max_ulps = 1);
        assert_ulps_eq!(lerp_scalar(0.0, 1.0, 0.5), 0.5, max_ulps = 1);
        assert_ulps_eq!(lerp_scalar(0.0, 1.0, 1.0), 1.0, max_ulps = 1);
    }

    #[test]
    fn test_is_finite_vector() {
        assert!(is_finite_vector(&X_AXIS));
        assert!(!is_finite_vector(&vector![f32::NAN, 0.0, 0.0]));
        assert!(!is_finite_vector(&vector![0.0, f32::INFINITY, 0.0]));
    }
}
