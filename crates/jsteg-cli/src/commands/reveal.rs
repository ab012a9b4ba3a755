use std::path::PathBuf;

use clap::Args;

use super::{read_file, write_output};
use crate::framing::unframe;
use crate::CliResult;

/// Reveals data hidden in a JPEG image
#[derive(Args, Debug)]
pub struct RevealArgs {
    /// Source JPEG that contains secret data
    #[arg(
        short = 'i',
        long = "in",
        value_name = "media source file",
        required = true
    )]
    pub media: PathBuf,

    /// Revealed data will be stored as binary file, stdout when omitted
    #[arg(short = 'o', long = "out", value_name = "output file")]
    pub output_file: Option<PathBuf>,
}

impl RevealArgs {
    pub fn run(self) -> CliResult<()> {
        let jpeg = read_file(&self.media)?;
        let revealed = jsteg::reveal(jpeg.as_slice())?;
        let payload = unframe(&revealed)?;
        log::info!("revealed {} bytes", payload.len());

        write_output(self.output_file.as_deref(), payload)
    }
}
