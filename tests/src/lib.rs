//! Cross-crate tests and shared fixtures for the benchmarks.

use gingerbread::geom::CubicBezierSegment;
use gingerbread::math::{point, Point};

#[cfg(test)]
mod pipeline;

pub static TOLERANCES: [f64; 10] = [0.01, 0.025, 0.05, 0.075, 0.1, 0.15, 0.2, 0.25, 0.5, 1.0];

/// Path data exercising every command, relative forms and degenerate arcs.
pub static PATHS: &[&str] = &[
    "M0 0 L10 0 L10 10 Z",
    "m 10 10 h 20 v 10 h -20 z m 5 5 l 1 1",
    "M 10 80 C 40 10, 65 10, 95 80 S 150 150, 180 80",
    "M 10 80 Q 52.5 10, 95 80 T 180 80 t 20 0",
    "M 6 10 A 6 4 10 1 0 14 10 a 6 4 10 0 1 -8 0 z",
    "M 0 0 A 0 5 0 0 1 10 10 A 5 5 0 0 1 10 10 A 1 1 0 0 0 30 30",
    "M 300,200 h -150 a 150,150 0 1,0 150,-150 z",
    "M 1e2.5 l.5.5 2e-1,3 Z l 4 4",
];

pub fn generate_bezier_curves() -> Vec<CubicBezierSegment<f64>> {
    let mut curves = Vec::new();
    for i in 0..100 {
        let k = i as f64;
        curves.push(CubicBezierSegment {
            from: point(k, 0.0),
            ctrl1: point(k + 40.0, -20.0 * (k * 0.1).sin()),
            ctrl2: point(k * 2.0, 100.0 + k),
            to: point(k * 3.0 + 10.0, 50.0 * (k * 0.2).cos()),
        });
    }

    curves
}

pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len2 = ab.square_length();
    if len2 == 0.0 {
        return (p - a).length();
    }
    let t = ((p - a).dot(ab) / len2).max(0.0).min(1.0);
    (p - (a + ab * t)).length()
}

pub fn assert_points_eq(a: Point, b: Point, epsilon: f64) {
    assert!((a - b).length() <= epsilon, "{:?} != {:?}", a, b);
}

#[test]
fn generated_curves_stay_within_tolerance() {
    for curve in generate_bezier_curves().iter().step_by(7) {
        for &tolerance in &[1.0, 0.25, 0.01] {
            let points: Vec<Point> = curve.flattened(tolerance).collect();
            assert_eq!(points.first(), Some(&curve.from));
            assert_eq!(points.last(), Some(&curve.to));

            // Distance from dense samples of the curve to the polyline.
            let n = 1000;
            for i in 0..=n {
                let p = curve.sample(i as f64 / n as f64);
                let d = points
                    .windows(2)
                    .map(|edge| distance_to_segment(p, edge[0], edge[1]))
                    .fold(std::f64::INFINITY, f64::min);
                assert!(d <= tolerance + 1e-9, "{} > {}", d, tolerance);
            }
        }
    }
}
