use gingerbread::path::PathData;
use gingerbread::svg::FlattenOptions;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid tolerance {0:?}, expected a positive number")]
    InvalidTolerance(String),
    #[error("the input has no path data")]
    EmptyInput,
}

pub struct NormalizeCmd {
    pub path: PathData,
    pub output: Box<dyn io::Write>,
    /// Only resolve relative segments instead of producing the canonical form.
    pub absolute_only: bool,
}

pub struct FlattenCmd {
    pub path: PathData,
    pub output: Box<dyn io::Write>,
    pub options: FlattenOptions,
    pub count: bool,
}
