use std::path::PathBuf;

use clap::Args;
use jsteg::Options;

use super::{open_image, read_input, write_output};
use crate::framing::frame;
use crate::CliResult;

/// Hides data in a JPEG image
#[derive(Args, Debug)]
pub struct HideArgs {
    /// Carrier image in any format the image crate can read, used readonly.
    #[arg(short = 'i', long = "in", value_name = "media file", required = true)]
    pub media: PathBuf,

    /// Final JPEG image will be stored as file, stdout when omitted
    #[arg(short = 'o', long = "out", value_name = "output image file")]
    pub write_to_file: Option<PathBuf>,

    /// File to hide in the image, `-` reads from stdin
    #[arg(
        short = 'd',
        long = "data",
        value_name = "data file",
        required_unless_present = "message",
        conflicts_with = "message"
    )]
    pub data_file: Option<PathBuf>,

    /// A text message that will be hidden
    #[arg(short, long, value_name = "text message")]
    pub message: Option<String>,

    /// JPEG quality of the output image
    #[arg(
        short,
        long,
        value_name = "1-100",
        default_value_t = jsteg::DEFAULT_QUALITY,
        value_parser = clap::value_parser!(u8).range(1..=100)
    )]
    pub quality: u8,

    /// MCUs between restart markers, 0 for none
    #[arg(long, value_name = "MCUs", default_value_t = 0)]
    pub restart_interval: u16,
}

impl HideArgs {
    pub fn run(self) -> CliResult<()> {
        let image = open_image(&self.media)?;
        let payload = match (&self.data_file, self.message) {
            (Some(path), _) => read_input(path)?,
            (None, Some(message)) => message.into_bytes(),
            (None, None) => Vec::new(),
        };
        let framed = frame(&payload)?;

        let options = Options::default()
            .with_quality(self.quality)
            .with_restart_interval(self.restart_interval);

        let mut jpeg = Vec::new();
        jsteg::hide(&mut jpeg, &image, &framed, Some(&options))?;
        write_output(self.write_to_file.as_deref(), &jpeg)?;

        log::info!("hid {} bytes in a {} byte JPEG", payload.len(), jpeg.len());
        Ok(())
    }
}
