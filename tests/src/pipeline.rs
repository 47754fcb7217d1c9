use gingerbread::geom::{Angle, ArcFlags, CubicBezierSegment, SvgArc};
use gingerbread::math::{point, vector, Point};
use gingerbread::path::{absolutize, normalize, reduce, CanonicalSegment, PathData, Segment};
use gingerbread::svg::shapes::{Circle, Ellipse, Polyline, Rect};
use gingerbread::svg::{to_paths, Contour, Geometry, Node};

use crate::{assert_points_eq, distance_to_segment, PATHS};

#[test]
fn parse_simple_path() {
    let path = PathData::parse("M0 0 L10 0 L10 10 Z");
    assert_eq!(
        path.as_slice(),
        &[
            Segment::MoveTo {
                abs: true,
                to: point(0.0, 0.0)
            },
            Segment::LineTo {
                abs: true,
                to: point(10.0, 0.0)
            },
            Segment::LineTo {
                abs: true,
                to: point(10.0, 10.0)
            },
            Segment::Close,
        ]
    );

    assert_eq!(PathData::parse("M1,1 2,2 3,3").to_string(), "M 1 1 L 2 2 L 3 3");
    assert!(PathData::parse("L1 1").is_empty());
}

#[test]
fn quadratic_to_cubic() {
    let path = reduce(&PathData::parse("M0 0 Q5 10 10 0"));
    let values = path.as_slice()[1].values();
    let rounded: Vec<f64> = values.iter().map(|v| (v * 100.0).round() / 100.0).collect();
    assert_eq!(rounded, vec![3.33, 6.67, 6.67, 6.67, 10.0, 0.0]);
}

#[test]
fn normalization_properties() {
    for src in PATHS {
        let path = PathData::parse(src);
        assert!(!path.is_empty(), "{}", src);

        let absolute = absolutize(&path);
        assert!(absolute.is_absolute());
        assert_eq!(absolutize(&absolute), absolute, "{}", src);

        let reduced = reduce(&path);
        assert!(reduced.is_canonical(), "{}", src);
        assert_eq!(reduce(&reduced), reduced, "{}", src);
        assert_eq!(reduce(&absolute), reduced, "{}", src);

        assert_eq!(normalize(&path).to_path_data(), reduced);
    }
}

#[test]
fn serialized_path_round_trips() {
    for src in PATHS {
        let canonical = normalize(&PathData::parse(src)).to_path_data();
        assert_eq!(PathData::parse(&canonical.to_string()), canonical, "{}", src);
    }
}

#[test]
fn arc_endpoints_are_preserved() {
    let arcs = [
        ((0.0, 0.0), (10.0, 10.0), (5.0, 5.0), 0.0, false, true),
        ((0.0, 0.0), (10.0, 10.0), (5.0, 5.0), 0.0, true, true),
        ((0.0, 0.0), (10.0, 10.0), (5.0, 5.0), 0.0, true, false),
        ((6.0, 10.0), (14.0, 10.0), (6.0, 4.0), 10.0, true, false),
        ((300.0, 200.0), (150.0, 200.0), (150.0, 150.0), 0.0, true, false),
        ((-3.5, 2.25), (17.0, -40.0), (3.0, 70.0), -145.0, false, false),
        ((1e-3, 0.0), (0.0, 1e-3), (1e-3, 1e-3), 45.0, true, true),
    ];

    for &(from, to, radii, rotation, large_arc, sweep) in &arcs {
        let arc = SvgArc {
            from: point(from.0, from.1),
            to: point(to.0, to.1),
            radii: vector(radii.0, radii.1),
            x_rotation: Angle::degrees(rotation),
            flags: ArcFlags { large_arc, sweep },
        };

        let curves = arc.to_cubic_beziers();
        assert!(!curves.is_empty() && curves.len() <= 3);
        assert_points_eq(curves[0].from, arc.from, 1e-9);
        assert_points_eq(curves[curves.len() - 1].to, arc.to, 1e-9);
    }
}

#[test]
fn flattened_curves_stay_within_tolerance() {
    let curve = CubicBezierSegment {
        from: point(10.0, 80.0),
        ctrl1: point(40.0, 10.0),
        ctrl2: point(65.0, 10.0),
        to: point(95.0, 80.0),
    };

    for &tolerance in &[1.0, 0.25, 0.01] {
        let points: Vec<Point> = curve.flattened(tolerance).collect();
        assert_eq!(points.first(), Some(&curve.from));
        assert_eq!(points.last(), Some(&curve.to));

        // Distance from dense samples of the curve to the polyline.
        let n = 2000;
        for i in 0..=n {
            let p = curve.sample(i as f64 / n as f64);
            let d = points
                .windows(2)
                .map(|edge| distance_to_segment(p, edge[0], edge[1]))
                .fold(std::f64::INFINITY, f64::min);
            assert!(d <= tolerance + 1e-9, "{} > {}", d, tolerance);
        }
    }

    let root = Node::shape(Geometry::path(
        "M 10 80 C 40 10, 65 10, 95 80 S 150 150, 180 80",
    ));
    let contours: Vec<Contour> = to_paths(&root).collect();
    assert_eq!(contours.len(), 1);

    let contour = &contours[0];
    assert_eq!(contour.first(), Some(point(10.0, 80.0)));
    assert_eq!(contour.last(), Some(point(180.0, 80.0)));
    assert!(!contour.closed);
    assert!(contour.len() > 10);
}

#[test]
fn circle_shape() {
    let circle = Circle::new(0.0, 0.0, 5.0).path_data();
    assert_eq!(
        circle.first(),
        Some(&Segment::MoveTo {
            abs: true,
            to: point(5.0, 0.0)
        })
    );
    let arcs = circle
        .iter()
        .filter(|segment| segment.command() == 'A')
        .count();
    assert_eq!(arcs, 4);

    let canonical = normalize(&circle);
    let cubics = canonical
        .iter()
        .filter(|segment| matches!(segment, CanonicalSegment::CubicTo { .. }))
        .count();
    assert_eq!(cubics, 4);
}

#[test]
fn group_of_rect_and_circle() {
    let root = Node::group(vec![
        Node::shape(Rect::new(10.0, 10.0, 30.0, 20.0)),
        Node::shape(Circle::new(100.0, 100.0, 10.0)),
    ]);

    let contours: Vec<Contour> = to_paths(&root).collect();
    assert_eq!(contours.len(), 2);
    assert_eq!(contours[0].first(), Some(point(10.0, 10.0)));
    assert_eq!(contours[1].first(), Some(point(110.0, 100.0)));
    assert!(contours.iter().all(|contour| contour.closed));
}

#[test]
fn document_order() {
    let root = Node::group(vec![
        Node::shape(Polyline::parse("0,0 1,1")),
        Node::group(vec![
            Node::shape(Ellipse::new(0.0, 0.0, 2.0, 1.0)),
            Node::shape(Geometry::path("M 7 7 l 1 0 M 8 8 l 1 0")),
        ]),
        Node::shape(Rect::new(3.0, 3.0, 1.0, 1.0).with_radii(Some(0.25), Some(0.25))),
    ]);

    let firsts: Vec<Point> = to_paths(&root)
        .map(|contour| contour.first().unwrap())
        .collect();

    assert_eq!(
        firsts,
        vec![
            point(0.0, 0.0),
            point(2.0, 0.0),
            point(7.0, 7.0),
            point(8.0, 8.0),
            point(3.25, 3.0),
        ]
    );
}

#[test]
fn non_finite_input_never_stalls() {
    let root = Node::group(vec![
        Node::shape(Geometry::path("M0 0 C 1e200 0 0 0 1 1")),
        Node::shape(Geometry::path("M0 0 A5 5 0 0 1 1e400 0")),
        Node::shape(Geometry::path("M1e308 0 a5 5 0 0 1 1e308 0")),
    ]);

    let contours: Vec<Contour> = to_paths(&root).collect();
    assert_eq!(contours.len(), 3);
    assert_eq!(contours[0].points, vec![point(0.0, 0.0), point(1.0, 1.0)]);
    assert_eq!(contours[1].points, vec![point(0.0, 0.0)]);
    assert_eq!(contours[2].len(), 2);
}
