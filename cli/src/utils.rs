use std::fs::{self, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;

use crate::error::{Error, Result};

/// Path that selects stdin instead of a file.
pub(crate) const STDIN: &str = "-";

/// Read input from a file, or from stdin when `file` is `-`
pub(crate) fn read_input(file: &str) -> Result<Vec<u8>> {
    if file == STDIN {
        let mut buffer = Vec::new();
        io::stdin().read_to_end(&mut buffer)?;
        return Ok(buffer);
    }
    Ok(fs::read(file)?)
}

/// Writes `text` followed by a newline to `output`, or to stdout when no
/// path is given. Files are created owner-readable only on unix.
pub(crate) fn write_output(output: Option<&Path>, text: &str) -> Result<()> {
    match output {
        Some(path) => {
            let mut options = OpenOptions::new();
            options.write(true).create(true).truncate(true);
            #[cfg(unix)]
            {
                use std::os::unix::fs::OpenOptionsExt;
                options.mode(0o600);
            }
            let mut file = options.open(path)?;
            writeln!(file, "{}", text)?;
            tracing::info!(path = %path.display(), "wrote key");
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", text)?;
        }
    }
    Ok(())
}

pub(crate) fn password(value: Option<String>) -> Result<String> {
    value.ok_or(Error::MissingPassword)
}
