//! Mirror reflection and Snell refraction about a unit surface normal.

use crate::Vec3;

/// Reflect a vector about a unit normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit direction through a surface with the given index of refraction.
///
/// The side is chosen from the sign of `-v·n`: a negative value means the ray
/// travels along the normal, i.e. leaves the material, and the index ratio is
/// `ior`; otherwise the ray enters and the ratio is `1 / ior`.
///
/// Returns `None` on total internal reflection or if the result is not a number.
pub fn refract(v: Vec3, n: Vec3, ior: f32) -> Option<Vec3> {
    let cos_in = -v.dot(n);
    let sin_in = (1.0 - cos_in * cos_in).max(0.0).sqrt();

    let (ratio, normal, cos_in) = if cos_in < 0.0 {
        (ior, -n, -cos_in)
    } else {
        (1.0 / ior, n, cos_in)
    };

    let sin_out = sin_in * ratio;
    if sin_out > 1.0 {
        return None;
    }
    let cos_out = (1.0 - sin_out * sin_out).sqrt();

    let refracted = v * ratio + normal * (ratio * cos_in - cos_out);
    if refracted.is_nan() {
        return None;
    }
    Some(refracted)
}
