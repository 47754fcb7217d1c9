use crate::parser;
use crate::Segment;

use std::fmt;
use std::iter::FromIterator;
use std::slice;

/// An ordered sequence of path segments.
///
/// An empty sequence is valid path data.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct PathData {
    segments: Vec<Segment>,
}

impl PathData {
    pub fn new() -> Self {
        PathData {
            segments: Vec::new(),
        }
    }

    pub fn with_capacity(cap: usize) -> Self {
        PathData {
            segments: Vec::with_capacity(cap),
        }
    }

    /// Parses SVG path syntax, keeping the longest valid prefix of the input.
    ///
    /// See [`parser::parse`].
    pub fn parse(src: &str) -> Self {
        parser::parse(src)
    }

    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    pub fn iter(&self) -> slice::Iter<Segment> {
        self.segments.iter()
    }

    pub fn as_slice(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn first(&self) -> Option<&Segment> {
        self.segments.first()
    }

    /// Whether every segment is an absolute move-to, line-to or cubic bézier, or a close.
    pub fn is_canonical(&self) -> bool {
        self.segments.iter().all(Segment::is_canonical)
    }

    /// Whether no segment uses a relative command.
    pub fn is_absolute(&self) -> bool {
        self.segments.iter().all(|segment| !segment.is_relative())
    }
}

impl From<Vec<Segment>> for PathData {
    fn from(segments: Vec<Segment>) -> Self {
        PathData { segments }
    }
}

impl FromIterator<Segment> for PathData {
    fn from_iter<T: IntoIterator<Item = Segment>>(iter: T) -> Self {
        PathData {
            segments: iter.into_iter().collect(),
        }
    }
}

impl Extend<Segment> for PathData {
    fn extend<T: IntoIterator<Item = Segment>>(&mut self, iter: T) {
        self.segments.extend(iter);
    }
}

impl IntoIterator for PathData {
    type Item = Segment;
    type IntoIter = std::vec::IntoIter<Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.into_iter()
    }
}

impl<'l> IntoIterator for &'l PathData {
    type Item = &'l Segment;
    type IntoIter = slice::Iter<'l, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

/// Serializes to path syntax: each segment's command letter followed by its
/// space-separated values, segments separated by spaces.
///
/// The output parses back to the same path data as long as every value is finite.
impl fmt::Display for PathData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut segments = self.segments.iter();
        if let Some(first) = segments.next() {
            write!(f, "{}", first)?;
        }
        for segment in segments {
            write!(f, " {}", segment)?;
        }

        Ok(())
    }
}

#[cfg(test)]
use crate::math::point;

#[test]
fn serialize() {
    let path: PathData = vec![
        Segment::MoveTo {
            abs: true,
            to: point(0.0, 0.0),
        },
        Segment::LineTo {
            abs: true,
            to: point(10.0, 0.0),
        },
        Segment::Close,
    ]
    .into();

    assert_eq!(path.to_string(), "M 0 0 L 10 0 Z");
    assert!(path.is_canonical());
    assert_eq!(PathData::new().to_string(), "");
}

#[test]
fn serialized_path_parses_back() {
    let path = PathData::parse("m1.5 2 l.25-3e2 a4 5 15 1 0 6 7 z");
    assert_eq!(path.len(), 4);
    assert!(!path.is_absolute());

    let text = path.to_string();
    assert_eq!(text, "m 1.5 2 l 0.25 -300 a 4 5 15 1 0 6 7 Z");
    assert_eq!(PathData::parse(&text), path);
}

#[test]
fn extreme_values_parse_back() {
    let path = PathData::parse("M 1e308 -1e-300 L 5e-324 0 L -1.7976931348623157e308 2");
    assert_eq!(path.len(), 3);
    assert_eq!(PathData::parse(&path.to_string()), path);
}
