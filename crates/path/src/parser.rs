//! A lenient parser for the SVG path syntax.
//!
//! Parsing stops at the first segment that can't be read and the segments parsed
//! before it are kept. [`parse`] only returns that prefix, [`PathParser::parse_prefix`]
//! also reports why parsing stopped.

use crate::geom::ArcFlags;
use crate::math::{point, vector, Point};
use crate::{PathData, Segment};

use log::{debug, trace};
use thiserror::Error;

/// The reason parsing stopped before the end of the input.
///
/// `position` is the byte offset of the segment that failed to parse.
#[non_exhaustive]
#[derive(Error, Clone, Debug, PartialEq)]
pub enum ParseError {
    #[error("Position {position}: Invalid command {command:?}.")]
    Command { command: char, position: usize },
    #[error("Position {position}: Expected move-to command, got {command:?}.")]
    MissingMoveTo { command: char, position: usize },
    #[error("Position {position}: Expected number.")]
    Number { position: usize },
    #[error("Position {position}: Expected flag (0/1), got {src:?}.")]
    Flag { src: char, position: usize },
    #[error("Position {position}: Unexpected end of input in {command:?} command.")]
    UnexpectedEnd { command: char, position: usize },
}

/// Parses SVG path syntax into path data.
///
/// This never fails: malformed input yields the segments that were successfully
/// parsed before the first invalid one, and input that doesn't start with a move-to
/// command yields empty path data.
pub fn parse(src: &str) -> PathData {
    PathParser::new().parse(src)
}

/// Parses a list of numbers separated by whitespace and/or commas, stopping at the
/// first invalid number.
///
/// Numbers follow the same grammar as path data parameters.
pub fn parse_numbers(src: &str) -> Vec<f64> {
    let mut parser = PathParser::new();
    let mut source = Source::new(src);
    let mut numbers = Vec::new();

    source.skip_whitespace();
    while !source.is_finished() {
        match parser.parse_number(&mut source) {
            Ok(value) => numbers.push(value),
            Err(err) => {
                debug!("number list parsing stopped: {}", err);
                break;
            }
        }
    }

    numbers
}

// A cursor over the input, keeping track of the byte offset.
//
// The path grammar is made of ASCII characters only, so the input is read byte
// by byte. Anything else is invalid input.
struct Source<'l> {
    text: &'l str,
    position: usize,
}

impl<'l> Source<'l> {
    fn new(text: &'l str) -> Self {
        Source { text, position: 0 }
    }

    fn current(&self) -> Option<u8> {
        self.text.as_bytes().get(self.position).copied()
    }

    fn peek(&self, offset: usize) -> Option<u8> {
        self.text.as_bytes().get(self.position + offset).copied()
    }

    // The full character at the cursor, for error reporting.
    fn current_char(&self) -> Option<char> {
        self.text.get(self.position..).and_then(|s| s.chars().next())
    }

    fn is_finished(&self) -> bool {
        self.position >= self.text.len()
    }

    fn advance_one(&mut self) {
        if !self.is_finished() {
            self.position += 1;
        }
    }

    fn skip_whitespace(&mut self) {
        while self.current().map_or(false, is_space) {
            self.advance_one();
        }
    }

    // Whitespace with at most one comma in it.
    fn skip_whitespace_or_delimiter(&mut self) {
        match self.current() {
            Some(b',') => {}
            Some(c) if is_space(c) => {}
            _ => return,
        }

        self.skip_whitespace();
        if self.current() == Some(b',') {
            self.advance_one();
            self.skip_whitespace();
        }
    }
}

fn is_space(c: u8) -> bool {
    match c {
        b' ' | b'\n' | b'\t' | b'\r' | 0x0C => true,
        _ => false,
    }
}

fn is_command(c: char) -> bool {
    match c {
        'M' | 'm' | 'L' | 'l' | 'H' | 'h' | 'V' | 'v' | 'C' | 'c' | 'S' | 's' | 'Q' | 'q'
        | 'T' | 't' | 'A' | 'a' | 'Z' | 'z' => true,
        _ => false,
    }
}

/// A context object for parsing path data.
///
/// The parser keeps a few buffers around so that it can be reused for several inputs.
#[derive(Debug, Default)]
pub struct PathParser {
    float_buffer: String,
    prev_command: Option<char>,
    // The segment being parsed, for error reporting.
    command: char,
    segment_start: usize,
}

impl PathParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses path data, keeping the longest valid prefix of the input.
    pub fn parse(&mut self, src: &str) -> PathData {
        self.parse_prefix(src).0
    }

    /// Parses path data, returning the longest valid prefix of the input along with
    /// the error that stopped the parser, if any.
    pub fn parse_prefix(&mut self, src: &str) -> (PathData, Option<ParseError>) {
        self.prev_command = None;

        let mut source = Source::new(src);
        let mut output = PathData::new();

        source.skip_whitespace();

        if let Some(c) = source.current_char() {
            if c != 'M' && c != 'm' {
                let err = ParseError::MissingMoveTo {
                    command: c,
                    position: source.position,
                };
                debug!("path data parsing stopped: {}", err);
                return (output, Some(err));
            }
        }

        while !source.is_finished() {
            match self.parse_segment(&mut source) {
                Ok(segment) => {
                    trace!("parsed {:?}", segment);
                    output.push(segment);
                }
                Err(err) => {
                    debug!(
                        "path data parsing stopped after {} segments: {}",
                        output.len(),
                        err
                    );
                    return (output, Some(err));
                }
            }
        }

        (output, None)
    }

    fn parse_segment(&mut self, src: &mut Source) -> Result<Segment, ParseError> {
        self.segment_start = src.position;

        let c = src.current_char().unwrap_or(' ');
        let command = if is_command(c) {
            src.advance_one();
            // Close has a single form.
            if c == 'z' {
                'Z'
            } else {
                c
            }
        } else {
            // Additional parameter groups repeat the previous command.
            let starts_number = c == '+' || c == '-' || c == '.' || c.is_ascii_digit();
            match self.prev_command {
                Some('M') if starts_number => 'L',
                Some('m') if starts_number => 'l',
                Some(prev) if starts_number && prev != 'Z' => prev,
                _ => {
                    return Err(ParseError::Command {
                        command: c,
                        position: self.segment_start,
                    });
                }
            }
        };

        self.prev_command = Some(command);
        self.command = command;

        let abs = command.is_ascii_uppercase();

        let segment = match command.to_ascii_uppercase() {
            'M' => Segment::MoveTo {
                abs,
                to: self.parse_point(src)?,
            },
            'L' => Segment::LineTo {
                abs,
                to: self.parse_point(src)?,
            },
            'H' => Segment::HorizTo {
                abs,
                x: self.parse_number(src)?,
            },
            'V' => Segment::VertTo {
                abs,
                y: self.parse_number(src)?,
            },
            'C' => {
                let ctrl1 = self.parse_point(src)?;
                let ctrl2 = self.parse_point(src)?;
                let to = self.parse_point(src)?;
                Segment::CubicTo {
                    abs,
                    ctrl1,
                    ctrl2,
                    to,
                }
            }
            'S' => {
                let ctrl2 = self.parse_point(src)?;
                let to = self.parse_point(src)?;
                Segment::SmoothCubicTo { abs, ctrl2, to }
            }
            'Q' => {
                let ctrl = self.parse_point(src)?;
                let to = self.parse_point(src)?;
                Segment::QuadTo { abs, ctrl, to }
            }
            'T' => Segment::SmoothQuadTo {
                abs,
                to: self.parse_point(src)?,
            },
            'A' => {
                let rx = self.parse_number(src)?;
                let ry = self.parse_number(src)?;
                let x_rotation = self.parse_number(src)?;
                let large_arc = self.parse_flag(src)?;
                let sweep = self.parse_flag(src)?;
                let to = self.parse_point(src)?;
                Segment::ArcTo {
                    abs,
                    radii: vector(rx, ry),
                    x_rotation,
                    flags: ArcFlags { large_arc, sweep },
                    to,
                }
            }
            _ => {
                src.skip_whitespace();
                Segment::Close
            }
        };

        Ok(segment)
    }

    fn parse_point(&mut self, src: &mut Source) -> Result<Point, ParseError> {
        let x = self.parse_number(src)?;
        let y = self.parse_number(src)?;

        Ok(point(x, y))
    }

    fn parse_number(&mut self, src: &mut Source) -> Result<f64, ParseError> {
        self.float_buffer.clear();

        src.skip_whitespace();

        match src.current() {
            Some(b'+') => src.advance_one(),
            Some(b'-') => {
                self.float_buffer.push('-');
                src.advance_one();
            }
            _ => {}
        }

        match src.current() {
            Some(c) if c.is_ascii_digit() || c == b'.' => {}
            Some(_) => return Err(self.number_error()),
            None => return Err(self.unexpected_end()),
        }

        self.read_digits(src);

        if src.current() == Some(b'.') {
            self.float_buffer.push('.');
            src.advance_one();
            self.expect_digit(src)?;
            self.read_digits(src);
        }

        // An `e` followed by `x` or `m` is the start of a unit, not an exponent.
        let has_exponent = match (src.current(), src.peek(1)) {
            (Some(b'e'), Some(next)) | (Some(b'E'), Some(next)) => next != b'x' && next != b'm',
            _ => false,
        };

        if has_exponent {
            self.float_buffer.push('e');
            src.advance_one();

            match src.current() {
                Some(b'+') => src.advance_one(),
                Some(b'-') => {
                    self.float_buffer.push('-');
                    src.advance_one();
                }
                _ => {}
            }

            self.expect_digit(src)?;
            self.read_digits(src);
        }

        let value = self
            .float_buffer
            .parse::<f64>()
            .map_err(|_| self.number_error())?;

        // Out of range literals such as `1e400` parse as infinity.
        if !value.is_finite() {
            return Err(self.number_error());
        }

        src.skip_whitespace_or_delimiter();

        Ok(value)
    }

    fn read_digits(&mut self, src: &mut Source) {
        while let Some(c) = src.current() {
            if !c.is_ascii_digit() {
                break;
            }
            self.float_buffer.push(c as char);
            src.advance_one();
        }
    }

    fn expect_digit(&self, src: &Source) -> Result<(), ParseError> {
        match src.current() {
            Some(c) if c.is_ascii_digit() => Ok(()),
            Some(_) => Err(self.number_error()),
            None => Err(self.unexpected_end()),
        }
    }

    fn parse_flag(&mut self, src: &mut Source) -> Result<bool, ParseError> {
        let flag = match src.current() {
            Some(b'0') => false,
            Some(b'1') => true,
            Some(_) => {
                return Err(ParseError::Flag {
                    src: src.current_char().unwrap_or(' '),
                    position: self.segment_start,
                });
            }
            None => return Err(self.unexpected_end()),
        };

        src.advance_one();
        src.skip_whitespace_or_delimiter();

        Ok(flag)
    }

    fn number_error(&self) -> ParseError {
        ParseError::Number {
            position: self.segment_start,
        }
    }

    fn unexpected_end(&self) -> ParseError {
        ParseError::UnexpectedEnd {
            command: self.command,
            position: self.segment_start,
        }
    }
}

#[cfg(test)]
fn move_to(x: f64, y: f64) -> Segment {
    Segment::MoveTo {
        abs: true,
        to: point(x, y),
    }
}

#[cfg(test)]
fn line_to(x: f64, y: f64) -> Segment {
    Segment::LineTo {
        abs: true,
        to: point(x, y),
    }
}

#[test]
fn empty() {
    let mut parser = PathParser::new();
    assert_eq!(parser.parse_prefix(""), (PathData::new(), None));
    assert_eq!(parser.parse_prefix(" \n\t"), (PathData::new(), None));
}

#[test]
fn simple_square() {
    let path = parse("M0 0 L10 0 L10 10 Z");
    assert_eq!(
        path.as_slice(),
        &[
            move_to(0.0, 0.0),
            line_to(10.0, 0.0),
            line_to(10.0, 10.0),
            Segment::Close
        ]
    );
}

#[test]
fn implicit_polyline() {
    let path = parse("M1,1 2,2 3,3");
    assert_eq!(
        path.as_slice(),
        &[move_to(1.0, 1.0), line_to(2.0, 2.0), line_to(3.0, 3.0)]
    );

    let path = parse("m1 1 2 2");
    assert_eq!(
        path.as_slice(),
        &[
            Segment::MoveTo {
                abs: false,
                to: point(1.0, 1.0)
            },
            Segment::LineTo {
                abs: false,
                to: point(2.0, 2.0)
            },
        ]
    );

    // Repeated curve parameters.
    let path = parse("M0 0 Q1 1 2 2 3 3 4 4");
    assert_eq!(path.len(), 3);
    assert_eq!(path.as_slice()[2].command(), 'Q');
}

#[test]
fn missing_move_to() {
    let mut parser = PathParser::new();
    let (path, err) = parser.parse_prefix("L1 1");
    assert!(path.is_empty());
    assert_eq!(
        err,
        Some(ParseError::MissingMoveTo {
            command: 'L',
            position: 0
        })
    );

    assert!(parse("  10 10").is_empty());
}

#[test]
fn close() {
    let path = parse("M0 0 L1 1 z m 2 2 l 1 0 Z");
    assert_eq!(path.len(), 6);
    assert_eq!(path.as_slice()[2], Segment::Close);
    assert_eq!(path.as_slice()[5], Segment::Close);

    // Parameters can't follow a close command.
    let mut parser = PathParser::new();
    let (path, err) = parser.parse_prefix("M0 0 L1 1 Z 2 2");
    assert_eq!(path.len(), 3);
    assert_eq!(
        err,
        Some(ParseError::Command {
            command: '2',
            position: 12
        })
    );
}

#[test]
fn invalid_command() {
    let mut parser = PathParser::new();
    let (path, err) = parser.parse_prefix("M 0 0 x 1 1");
    assert_eq!(path.as_slice(), &[move_to(0.0, 0.0)]);
    assert_eq!(
        err,
        Some(ParseError::Command {
            command: 'x',
            position: 6
        })
    );
}

#[test]
fn numbers() {
    // Per SVG spec, this is equivalent to "M 0.6 0.5".
    assert_eq!(parse("M 0.6.5").as_slice(), &[move_to(0.6, 0.5)]);
    assert_eq!(parse("M1e-2-1E3").as_slice(), &[move_to(0.01, -1000.0)]);
    assert_eq!(parse("M+1 -.5").as_slice(), &[move_to(1.0, -0.5)]);
    assert_eq!(parse("M 1e+2,2").as_slice(), &[move_to(100.0, 2.0)]);
    assert_eq!(parse("M 1e-9 0").as_slice(), &[move_to(1e-9, 0.0)]);
    assert_eq!(parse("M -1e11 0").as_slice(), &[move_to(-1e11, 0.0)]);
}

#[test]
fn exponent_before_unit() {
    // `1em` reads as the number 1 followed by garbage.
    let mut parser = PathParser::new();
    let (path, err) = parser.parse_prefix("M 0 1em");
    assert_eq!(path.as_slice(), &[move_to(0.0, 1.0)]);
    assert_eq!(
        err,
        Some(ParseError::Command {
            command: 'e',
            position: 5
        })
    );

    let (path, _) = parser.parse_prefix("M 0 1ex");
    assert_eq!(path.as_slice(), &[move_to(0.0, 1.0)]);
}

#[test]
fn bad_numbers() {
    let mut parser = PathParser::new();
    let mut bad_number = |src: &str| match parser.parse_prefix(src) {
        (path, Some(ParseError::Number { .. })) => path.is_empty(),
        other => {
            println!("{:?}", other);
            false
        }
    };

    assert!(bad_number("M 0 --1"));
    assert!(bad_number("M 0 1ee2"));
    assert!(bad_number("M 0 1e--1"));
    assert!(bad_number("M 0 *2"));
    assert!(bad_number("M 0 e"));
    assert!(bad_number("M 0 1. 2"));
    assert!(bad_number("M 0 1.,2"));
    assert!(bad_number("M 0 .x"));
    assert!(bad_number("M 0 ,,1"));
    assert!(bad_number("M 0 1e400"));
    assert!(bad_number("M -1e309 0"));
}

#[test]
fn out_of_range_numbers() {
    let mut parser = PathParser::new();
    let (path, err) = parser.parse_prefix("M0 0 A5 5 0 0 1 1e400 0");
    assert_eq!(path.as_slice(), &[move_to(0.0, 0.0)]);
    assert_eq!(err, Some(ParseError::Number { position: 5 }));

    // Large but finite values are kept.
    assert_eq!(parse("M 1e308 0").as_slice(), &[move_to(1e308, 0.0)]);
    assert_eq!(parse_numbers("1 2 1e999 3"), vec![1.0, 2.0]);
}

#[test]
fn unexpected_end() {
    let mut parser = PathParser::new();
    let (path, err) = parser.parse_prefix("M 0 0 L 10");
    assert_eq!(path.as_slice(), &[move_to(0.0, 0.0)]);
    assert_eq!(
        err,
        Some(ParseError::UnexpectedEnd {
            command: 'L',
            position: 6
        })
    );

    let (_, err) = parser.parse_prefix("M 0 0 c 1 1 2 2 3 3 4 4 5 5 6");
    assert_eq!(
        err,
        Some(ParseError::UnexpectedEnd {
            command: 'c',
            position: 20
        })
    );
}

#[test]
fn arc_flags() {
    let path = parse("M0 0a5,5 0 1110 10");
    assert_eq!(
        path.as_slice()[1],
        Segment::ArcTo {
            abs: false,
            radii: vector(5.0, 5.0),
            x_rotation: 0.0,
            flags: ArcFlags {
                large_arc: true,
                sweep: true
            },
            to: point(10.0, 10.0),
        }
    );

    let mut parser = PathParser::new();
    let (path, err) = parser.parse_prefix("M0 0 A 5 5 0 2 1 10 10");
    assert_eq!(path.len(), 1);
    assert_eq!(
        err,
        Some(ParseError::Flag {
            src: '2',
            position: 5
        })
    );
}

#[test]
fn parser_is_reusable() {
    let mut parser = PathParser::new();
    assert_eq!(parser.parse("M0 0 1 1").len(), 2);
    // The implicit command of the previous input doesn't leak.
    assert!(parser.parse("1 1").is_empty());
    assert_eq!(parser.parse("M0 0 h 5 v 5").len(), 3);
}

#[test]
fn number_lists() {
    assert_eq!(parse_numbers("1,2 3\n4 -5-6"), vec![1.0, 2.0, 3.0, 4.0, -5.0, -6.0]);
    assert_eq!(parse_numbers(" 10 , 20 x 30"), vec![10.0, 20.0]);
    assert!(parse_numbers("").is_empty());
}
