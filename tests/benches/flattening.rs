extern crate gingerbread;
extern crate gingerbread_tests;
#[macro_use]
extern crate criterion;

use criterion::{BenchmarkId, Criterion};
use gingerbread::path::{normalize, PathData};
use gingerbread::svg::shapes::{Circle, Rect};
use gingerbread::svg::{to_paths_with_options, FlattenOptions, Node};
use gingerbread_tests::{generate_bezier_curves, TOLERANCES};

static PATH: &str = "M 10 80 C 40 10, 65 10, 95 80 S 150 150, 180 80 \
    Q 200 20 240 80 T 300 80 A 30 50 15 1 0 360 120 a 25 25 0 0 1 -50 25 Z \
    m 400 0 h 20 v 20 h -20 z";

fn cubic_flatten(c: &mut Criterion) {
    let curves = generate_bezier_curves();
    let mut g = c.benchmark_group("cubic");
    for tol in &TOLERANCES {
        g.bench_with_input(BenchmarkId::new("uniform", tol), tol, |b, tol| {
            b.iter(|| {
                for curve in &curves {
                    for p in curve.flattened(*tol) {
                        std::hint::black_box(p);
                    }
                }
            })
        });
    }
}

fn parse_and_normalize(c: &mut Criterion) {
    c.bench_function("normalize", |b| {
        b.iter(|| std::hint::black_box(normalize(&PathData::parse(PATH))))
    });
}

fn shape_tree(c: &mut Criterion) {
    let mut shapes = Vec::new();
    for i in 0..50 {
        let k = i as f64 * 10.0;
        shapes.push(Node::shape(
            Rect::new(k, k, 30.0, 20.0).with_radii(Some(4.0), None),
        ));
        shapes.push(Node::shape(Circle::new(k, 0.0, 8.0)));
        shapes.push(Node::shape(gingerbread::svg::Geometry::path(PATH)));
    }
    let root = Node::group(shapes);

    let mut g = c.benchmark_group("to_paths");
    for tol in &TOLERANCES {
        let options = FlattenOptions::tolerance(*tol);
        g.bench_with_input(BenchmarkId::new("cached", tol), &options, |b, options| {
            b.iter(|| {
                for contour in to_paths_with_options(&root, options) {
                    std::hint::black_box(contour);
                }
            })
        });
    }
}

criterion_group!(flatten, cubic_flatten, shape_tree);
criterion_group!(normalization, parse_and_normalize);
criterion_main!(flatten, normalization);
