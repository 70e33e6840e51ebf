use nalgebra as na;
use num_traits::Float;

/// Pulls `value` toward 1 by `weight`: `weight + value * (1 - weight)`.
#[inline]
pub fn damp_toward_one<F: Float>(value: F, weight: F) -> F {
    weight + value * (F::one() - weight)
}

/// Affine map taking the three `src` points onto the three `dst` points.
///
/// Returned as a homogeneous 3x3 matrix with last row `[0, 0, 1]`. `None` when
/// the source points are collinear.
pub fn affine_from_points(
    src: &[na::Point2<f64>; 3],
    dst: &[na::Point2<f64>; 3],
) -> Option<na::Matrix3<f64>> {
    let s = na::Matrix3::new(
        src[0].x, src[1].x, src[2].x, //
        src[0].y, src[1].y, src[2].y, //
        1.0, 1.0, 1.0,
    );
    let d = na::Matrix3::new(
        dst[0].x, dst[1].x, dst[2].x, //
        dst[0].y, dst[1].y, dst[2].y, //
        1.0, 1.0, 1.0,
    );

    Some(d * s.try_inverse()?)
}

#[inline]
pub fn transform_point(m: &na::Matrix3<f64>, p: na::Point2<f64>) -> na::Point2<f64> {
    let v = m * na::Vector3::new(p.x, p.y, 1.0);

    na::Point2::new(v.x, v.y)
}
