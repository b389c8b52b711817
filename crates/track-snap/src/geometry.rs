use crate::types::Point;

/// Rotate a point around the origin by the given angle in degrees
/// (counter-clockwise for positive angles).
pub fn rotate_point(point: Point, degrees: f64) -> Point {
    let rad = degrees.to_radians();
    let (sin_a, cos_a) = rad.sin_cos();
    Point::new(
        point.x * cos_a - point.y * sin_a,
        point.x * sin_a + point.y * cos_a,
    )
}

/// Euclidean distance between two points.
pub fn distance(p1: Point, p2: Point) -> f64 {
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    (dx * dx + dy * dy).sqrt()
}

/// Reduce an angle in degrees to [0, 360).
pub fn normalize_angle(degrees: f64) -> f64 {
    let a = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs,
    // and yields -0.0 for negative multiples of 360
    if a >= 360.0 || a == 0.0 {
        0.0
    } else {
        a
    }
}
