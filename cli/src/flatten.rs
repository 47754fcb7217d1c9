use crate::commands::{CliError, FlattenCmd};
use gingerbread::svg::{to_paths_with_options, Node};

use log::info;
use std::io::Write;

pub fn flatten(mut cmd: FlattenCmd) -> Result<(), CliError> {
    let root = Node::shape(cmd.path);
    let contours = to_paths_with_options(&root, &cmd.options);

    if cmd.count {
        let mut num_paths = 0;
        let mut num_vertices = 0;
        for contour in contours {
            num_paths += 1;
            num_vertices += contour.len();
        }

        writeln!(&mut *cmd.output, "vertices: {}", num_vertices)?;
        writeln!(&mut *cmd.output, "paths: {}", num_paths)?;

        return Ok(());
    }

    let mut num_paths = 0;
    for contour in contours {
        let mut points = contour.points.iter();
        if let Some(p) = points.next() {
            write!(&mut *cmd.output, "M {} {} ", p.x, p.y)?;
        }
        for p in points {
            write!(&mut *cmd.output, "L {} {} ", p.x, p.y)?;
        }
        if contour.closed {
            write!(&mut *cmd.output, "Z ")?;
        }
        num_paths += 1;
    }
    writeln!(&mut *cmd.output)?;

    info!("flattened {} contours", num_paths);

    Ok(())
}
