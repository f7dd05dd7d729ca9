//! Small fixed-size vector helpers shared by the kernel double and the engine.

pub type Vec3 = [f64; 3];
pub type Point2 = [f64; 2];

pub fn add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

pub fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub fn scale(v: Vec3, s: f64) -> Vec3 {
    [v[0] * s, v[1] * s, v[2] * s]
}

pub fn dot(a: Vec3, b: Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub fn cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

pub fn length(v: Vec3) -> f64 {
    dot(v, v).sqrt()
}

/// Unit vector along `v`, or `None` for a (near) zero vector.
pub fn normalize(v: Vec3) -> Option<Vec3> {
    let len = length(v);
    if len > 1e-12 {
        Some(scale(v, 1.0 / len))
    } else {
        None
    }
}

/// Point at `angle` radians on a circle of `radius` around `center`.
pub fn polar(center: Point2, radius: f64, angle: f64) -> Point2 {
    [
        center[0] + radius * angle.cos(),
        center[1] + radius * angle.sin(),
    ]
}

pub fn distance2(a: Point2, b: Point2) -> f64 {
    ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_of_x_and_y_is_z() {
        assert_eq!(cross([1.0, 0.0, 0.0], [0.0, 1.0, 0.0]), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn normalize_rejects_zero() {
        assert!(normalize([0.0, 0.0, 0.0]).is_none());
        let n = normalize([0.0, 3.0, 4.0]).unwrap();
        assert!((length(n) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn polar_quarter_turn() {
        let p = polar([1.0, 1.0], 2.0, std::f64::consts::FRAC_PI_2);
        assert!((p[0] - 1.0).abs() < 1e-12);
        assert!((p[1] - 3.0).abs() < 1e-12);
    }
}
