extern crate clap;
extern crate gingerbread;

mod commands;
mod flatten;
mod normalize;

use clap::*;
use commands::*;
use gingerbread::path::PathData;
use gingerbread::svg::FlattenOptions;

use log::debug;
use std::fs::File;
use std::io::prelude::*;
use std::io::{self, stdin, stdout};
use std::process;
use std::result::Result;

fn main() {
    env_logger::init();

    let matches = App::new("Gingerbread command-line interface")
        .version("0.1")
        .author("Gingerbread contributors")
        .about("SVG path data normalization and flattening")
        .subcommand(
            SubCommand::with_name("normalize")
                .about("Converts path data to absolute move-to, line-to, cubic-to and close segments")
                .arg(
                    Arg::with_name("ABSOLUTE")
                        .short("a")
                        .long("absolute")
                        .help("Only converts relative segments to absolute ones"),
                ),
        )
        .subcommand(
            SubCommand::with_name("flatten")
                .about("Flattens path data into polygonal contours")
                .arg(
                    Arg::with_name("TOLERANCE")
                        .short("t")
                        .long("tolerance")
                        .help("Sets the tolerance threshold (0.25 by default)")
                        .value_name("TOLERANCE")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("COUNT")
                        .short("c")
                        .long("count")
                        .help("Prints the number of vertices and contours"),
                ),
        )
        .arg(
            Arg::with_name("PATH")
                .value_name("PATH")
                .help("SVG path data, read from the input file or stdin if omitted")
                .takes_value(true)
                .required(false),
        )
        .arg(
            Arg::with_name("INPUT")
                .help("Sets the input file to use")
                .short("i")
                .long("input")
                .value_name("FILE")
                .takes_value(true)
                .required(false),
        )
        .arg(
            Arg::with_name("OUTPUT")
                .help("Sets the output file to use")
                .value_name("FILE")
                .short("o")
                .long("output")
                .takes_value(true)
                .required(false),
        )
        .get_matches();

    if let Err(e) = run(&matches) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<(), CliError> {
    let path = read_path(matches)?;
    let output = open_output(matches)?;

    if let Some(normalize_matches) = matches.subcommand_matches("normalize") {
        let cmd = NormalizeCmd {
            path,
            output,
            absolute_only: normalize_matches.is_present("ABSOLUTE"),
        };

        normalize::normalize(cmd)
    } else if let Some(flatten_matches) = matches.subcommand_matches("flatten") {
        let cmd = FlattenCmd {
            path,
            output,
            options: get_options(flatten_matches)?,
            count: flatten_matches.is_present("COUNT"),
        };

        flatten::flatten(cmd)
    } else {
        // Without a subcommand, print the parsed path data back.
        let mut output = output;
        writeln!(&mut *output, "{}", path)?;
        Ok(())
    }
}

fn read_path(matches: &ArgMatches) -> Result<PathData, CliError> {
    let mut input_buffer = matches.value_of("PATH").unwrap_or("").to_string();

    if let Some(input_file) = matches.value_of("INPUT") {
        File::open(input_file)?.read_to_string(&mut input_buffer)?;
    } else if input_buffer.is_empty() {
        stdin().read_to_string(&mut input_buffer)?;
    }

    debug!("read {} bytes of path data", input_buffer.len());

    let path = PathData::parse(&input_buffer);
    if path.is_empty() {
        return Err(CliError::EmptyInput);
    }

    Ok(path)
}

fn open_output(matches: &ArgMatches) -> Result<Box<dyn io::Write>, CliError> {
    Ok(match matches.value_of("OUTPUT") {
        Some(output_file) => Box::new(File::create(output_file)?),
        None => Box::new(stdout()),
    })
}

fn get_options(matches: &ArgMatches) -> Result<FlattenOptions, CliError> {
    let tolerance = match matches.value_of("TOLERANCE") {
        Some(tolerance_str) => match tolerance_str.parse::<f64>() {
            Ok(tolerance) if tolerance > 0.0 => tolerance,
            _ => return Err(CliError::InvalidTolerance(tolerance_str.to_string())),
        },
        None => FlattenOptions::DEFAULT_TOLERANCE,
    };

    Ok(FlattenOptions::tolerance(tolerance))
}
