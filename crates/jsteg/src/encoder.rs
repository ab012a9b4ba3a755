//! Hide: encode an image as a baseline JPEG with the payload in its
//! luminance coefficients.

use std::io::Write;

use image::DynamicImage;

use crate::error::{JstegError, Result};
use crate::jpeg::bitio::BitWriter;
use crate::jpeg::entropy::{encode_scan, observe_scan, BlockCache};
use crate::jpeg::header::{write_header, Component, Frame, FrameKind, JpegHeader, Scan, ScanComponent};
use crate::jpeg::tables::TableStore;
use crate::jpeg::transform::{is_grayscale, PlanarImage};
use crate::jpeg::Marker;
use crate::options::Options;
use crate::payload::{CapacityCounter, PayloadPacker};

/// Encode `image` as a baseline JPEG carrying `payload` and write it to `sink`.
///
/// The capacity of the image is counted before anything is encoded; a
/// payload that does not fit fails with [`JstegError::TooSmall`]. The file is
/// assembled in memory and written with a single `write_all`, so nothing
/// reaches the sink when hiding fails.
pub fn hide<W: Write>(
    mut sink: W,
    image: &DynamicImage,
    payload: &[u8],
    options: Option<&Options>,
) -> Result<()> {
    let options = options.copied().unwrap_or_default();
    let (header, planar) = prepare(image, &options)?;
    let blocks = BlockCache::new(&header, &planar);

    let mut counter = CapacityCounter::new();
    observe_scan(&header, &blocks, &mut counter);
    let required = payload.len().saturating_mul(8);
    let available = counter.bits();
    log::debug!(
        "hiding {} bytes in {}x{} image, capacity {available} bits",
        payload.len(),
        header.frame.width,
        header.frame.height
    );
    if required > available {
        return Err(JstegError::TooSmall {
            required,
            available,
        });
    }

    let mut output = Vec::new();
    write_header(&mut output, &header)?;
    let mut writer = BitWriter::with_buffer(output);
    let mut packer = PayloadPacker::new(payload);
    encode_scan(&mut writer, &header, &blocks, &mut packer)?;
    writer.write_marker(Marker::EOI);
    let output = writer.into_bytes();

    log::debug!(
        "wrote {} payload bits into {} eligible coefficients, {} bytes total",
        packer.bits_written(),
        packer.eligible(),
        output.len()
    );
    sink.write_all(&output)?;
    Ok(())
}

/// Number of payload bits [`hide`] can store in `image` with `options`.
pub fn capacity(image: &DynamicImage, options: Option<&Options>) -> Result<usize> {
    let options = options.copied().unwrap_or_default();
    let (header, planar) = prepare(image, &options)?;

    let mut counter = CapacityCounter::new();
    observe_scan(&header, &planar, &mut counter);
    Ok(counter.bits())
}

fn prepare(image: &DynamicImage, options: &Options) -> Result<(JpegHeader, PlanarImage)> {
    let header = frame_header(image, options)?;
    let planar = PlanarImage::from_image(image, &header.tables)?;
    Ok((header, planar))
}

/// Headers of the frame `image` is encoded into.
///
/// Grayscale images get a single component; everything else is YCbCr with
/// 2x2 subsampled chroma.
pub fn frame_header(image: &DynamicImage, options: &Options) -> Result<JpegHeader> {
    let invalid = || JstegError::InvalidImage {
        width: image.width(),
        height: image.height(),
    };
    let width = u16::try_from(image.width()).map_err(|_| invalid())?;
    let height = u16::try_from(image.height()).map_err(|_| invalid())?;
    if width == 0 || height == 0 {
        return Err(invalid());
    }

    let color = !is_grayscale(image);
    let (components, scan) = if color {
        (
            vec![
                Component { id: 1, h: 2, v: 2, quant_selector: 0 },
                Component { id: 2, h: 1, v: 1, quant_selector: 1 },
                Component { id: 3, h: 1, v: 1, quant_selector: 1 },
            ],
            vec![
                ScanComponent { component_index: 0, dc_selector: 0, ac_selector: 0 },
                ScanComponent { component_index: 1, dc_selector: 1, ac_selector: 1 },
                ScanComponent { component_index: 2, dc_selector: 1, ac_selector: 1 },
            ],
        )
    } else {
        (
            vec![Component { id: 1, h: 1, v: 1, quant_selector: 0 }],
            vec![ScanComponent { component_index: 0, dc_selector: 0, ac_selector: 0 }],
        )
    };

    Ok(JpegHeader {
        frame: Frame {
            kind: FrameKind::Baseline,
            width,
            height,
            components,
        },
        tables: TableStore::standard(options.quality, color),
        scan: Scan { components: scan },
        restart_interval: options.restart_interval,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, RgbImage};

    #[test]
    fn test_frame_header_for_gray() {
        let image = DynamicImage::ImageLuma8(GrayImage::new(10, 20));
        let header = frame_header(&image, &Options::default()).unwrap();
        assert_eq!(header.frame.components.len(), 1);
        assert_eq!((header.frame.width, header.frame.height), (10, 20));
        assert!(header.tables.quant[1].is_none());
    }

    #[test]
    fn test_frame_header_for_color() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(10, 20));
        let options = Options::default().with_restart_interval(2);
        let header = frame_header(&image, &options).unwrap();
        assert_eq!(header.frame.components.len(), 3);
        assert_eq!(header.frame.h_max(), 2);
        assert_eq!(header.restart_interval, 2);
    }

    #[test]
    fn test_oversized_image_is_invalid() {
        let image = DynamicImage::ImageLuma8(GrayImage::new(70_000, 1));
        assert!(matches!(
            frame_header(&image, &Options::default()),
            Err(JstegError::InvalidImage { width: 70_000, height: 1 })
        ));
    }

    #[test]
    fn test_empty_payload_fits_anywhere() {
        let image = DynamicImage::ImageLuma8(GrayImage::new(1, 1));
        let mut out = Vec::new();
        hide(&mut out, &image, &[], None).unwrap();
        assert_eq!(&out[..2], &[0xFF, 0xD8]);
        assert_eq!(&out[out.len() - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_flat_image_has_no_capacity() {
        let image = DynamicImage::ImageLuma8(GrayImage::from_pixel(32, 32, image::Luma([90])));
        assert_eq!(capacity(&image, None).unwrap(), 0);

        let mut out = Vec::new();
        let err = hide(&mut out, &image, b"x", None).unwrap_err();
        assert!(matches!(err, JstegError::TooSmall { required: 8, available: 0 }));
        assert!(out.is_empty());
    }
}
