pub mod capacity;
pub mod hide;
pub mod reveal;

use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use crate::{CliError, CliResult};

pub(crate) fn read_file(path: &Path) -> CliResult<Vec<u8>> {
    fs::read(path).map_err(|source| CliError::ReadError {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn write_file(path: &Path, data: &[u8]) -> CliResult<()> {
    fs::write(path, data).map_err(|source| CliError::WriteError {
        path: path.to_path_buf(),
        source,
    })
}

/// Like [`read_file`], with `-` standing for stdin.
pub(crate) fn read_input(path: &Path) -> CliResult<Vec<u8>> {
    if path != Path::new("-") {
        return read_file(path);
    }
    let mut data = Vec::new();
    std::io::stdin()
        .lock()
        .read_to_end(&mut data)
        .map_err(CliError::StdinError)?;
    Ok(data)
}

/// Write to the file at `path`, or to stdout without one.
pub(crate) fn write_output(path: Option<&Path>, data: &[u8]) -> CliResult<()> {
    match path {
        Some(path) => write_file(path, data),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(data)
                .and_then(|_| stdout.flush())
                .map_err(CliError::StdoutError)
        }
    }
}

pub(crate) fn open_image(path: &Path) -> CliResult<image::DynamicImage> {
    let bytes = read_file(path)?;
    Ok(image::load_from_memory(&bytes)?)
}
