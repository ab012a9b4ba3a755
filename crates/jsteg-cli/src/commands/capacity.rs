use std::path::PathBuf;

use clap::Args;
use jsteg::Options;

use super::read_file;
use crate::framing::max_payload;
use crate::CliResult;

/// Shows how much data an image can carry
#[derive(Args, Debug)]
pub struct CapacityArgs {
    /// Carrier image in any format the image crate can read
    #[arg(short = 'i', long = "in", value_name = "media file", required = true)]
    pub media: PathBuf,

    /// JPEG quality the image would be encoded with
    #[arg(
        short,
        long,
        value_name = "1-100",
        default_value_t = jsteg::DEFAULT_QUALITY,
        value_parser = clap::value_parser!(u8).range(1..=100)
    )]
    pub quality: u8,
}

impl CapacityArgs {
    pub fn run(self) -> CliResult<()> {
        let bytes = read_file(&self.media)?;
        let image = image::load_from_memory(&bytes)?;
        let options = Options::default().with_quality(self.quality);

        let bits = jsteg::capacity(&image, Some(&options))?;
        println!("capacity at quality {}: {bits} bits", self.quality);
        println!("largest payload: {} bytes", max_payload(bits));

        if bytes.starts_with(&[0xFF, 0xD8]) {
            match jsteg::jpeg_capacity(bytes.as_slice()) {
                Ok(present) => println!("eligible coefficients in file: {present}"),
                Err(e) => log::warn!("cannot count coefficients of {}: {e}", self.media.display()),
            }
        }
        Ok(())
    }
}
