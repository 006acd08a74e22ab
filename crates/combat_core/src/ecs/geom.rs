//! Small geometry helpers reusable by systems.

use glam::Vec3;

/// True when the segment `[p0, p1]` passes within `radius` of `center`.
#[inline]
pub fn segment_hits_sphere(p0: Vec3, p1: Vec3, center: Vec3, radius: f32) -> bool {
    let d = p1 - p0;
    let m = p0 - center;
    let a = d.dot(d);
    if a <= 1e-12 {
        return m.length_squared() <= radius * radius;
    }
    let t = (-(m.dot(d)) / a).clamp(0.0, 1.0);
    let c = p0 + d * t;
    (c - center).length_squared() <= radius * radius
}

/// Parametric `t` in `[0, 1]` at which the segment first enters the sphere,
/// or `None` when it never does. A segment starting inside enters at 0.
#[inline]
pub fn segment_sphere_enter_t(p0: Vec3, p1: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let d = p1 - p0;
    let m = p0 - center;
    let a = d.dot(d);
    let c = m.length_squared() - radius * radius;
    if c <= 0.0 {
        return Some(0.0);
    }
    if a <= 1e-12 {
        return None;
    }
    let b = m.dot(d);
    if b > 0.0 {
        // moving away
        return None;
    }
    let disc = b * b - a * c;
    if disc < 0.0 {
        return None;
    }
    let t = (-b - disc.sqrt()) / a;
    (0.0..=1.0).contains(&t).then_some(t)
}

/// Parametric `t` in `[0, 1]` at which a segment first enters an axis-aligned
/// box. Returns `None` when no intersection occurs.
#[inline]
pub fn segment_aabb_enter_t(p0: Vec3, p1: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let d = p1 - p0;
    let mut tmin = 0.0f32;
    let mut tmax = 1.0f32;
    for i in 0..3 {
        let s = p0[i];
        let dir = d[i];
        let minb = min[i];
        let maxb = max[i];
        if dir.abs() < 1e-6 {
            if s < minb || s > maxb {
                return None;
            }
        } else {
            let inv = 1.0 / dir;
            let mut t0 = (minb - s) * inv;
            let mut t1 = (maxb - s) * inv;
            if t0 > t1 {
                core::mem::swap(&mut t0, &mut t1);
            }
            tmin = tmin.max(t0);
            tmax = tmax.min(t1);
            if tmin > tmax {
                return None;
            }
        }
    }
    Some(tmin)
}
