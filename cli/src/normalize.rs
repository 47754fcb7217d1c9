use crate::commands::{CliError, NormalizeCmd};
use gingerbread::path::{absolutize, normalize as normalize_path};
use std::io::Write;

pub fn normalize(mut cmd: NormalizeCmd) -> Result<(), CliError> {
    if cmd.absolute_only {
        writeln!(&mut *cmd.output, "{}", absolutize(&cmd.path))?;
    } else {
        writeln!(&mut *cmd.output, "{}", normalize_path(&cmd.path))?;
    }

    Ok(())
}
