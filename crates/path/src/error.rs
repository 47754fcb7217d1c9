use thiserror::Error;

/// Errors produced when path data doesn't have the expected form.
///
/// Unlike parse errors these point at a bug in the code that produced the path data
/// rather than at malformed input.
#[non_exhaustive]
#[derive(Error, Clone, Debug, PartialEq)]
pub enum PathError {
    #[error("Segment {index}: {command:?} is not a canonical segment.")]
    NonCanonicalSegment { index: usize, command: char },
}
