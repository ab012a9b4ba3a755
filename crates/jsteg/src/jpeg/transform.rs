//! Pixels to quantized coefficient blocks.
//!
//! The image is converted once into component planes (Y, or Y/Cb/Cr with
//! 2x2 subsampled chroma); blocks are transformed lazily while the scan is
//! walked.

use std::sync::OnceLock;

use image::DynamicImage;

use super::entropy::{Block, BlockSource};
use super::tables::{TableStore, ZIGZAG_TO_NATURAL};
use crate::error::{JstegError, Result};

/// `COSINE[u][x] = cos((2*x + 1) * u * PI / 16)`
static COSINE: OnceLock<[[f64; 8]; 8]> = OnceLock::new();

fn cosine_table() -> &'static [[f64; 8]; 8] {
    COSINE.get_or_init(|| {
        let mut table = [[0.0f64; 8]; 8];
        for (u, row) in table.iter_mut().enumerate() {
            for (x, value) in row.iter_mut().enumerate() {
                *value = ((2 * x + 1) as f64 * u as f64 * std::f64::consts::PI / 16.0).cos();
            }
        }
        table
    })
}

/// C(0) = 1/sqrt(8), C(u>0) = 1/2.
#[inline]
fn norm(u: usize) -> f64 {
    if u == 0 {
        std::f64::consts::FRAC_1_SQRT_2 / 2.0
    } else {
        0.5
    }
}

/// Largest quantized AC magnitude representable in baseline coding.
const MAX_AC: i32 = 1023;

/// Forward 8x8 DCT of level-shifted samples, natural order.
pub fn forward_dct(samples: &[u8; 64]) -> [f64; 64] {
    let cos = cosine_table();

    let mut shifted = [0.0f64; 64];
    for (s, &p) in shifted.iter_mut().zip(samples) {
        *s = p as f64 - 128.0;
    }

    // rows
    let mut temp = [0.0f64; 64];
    for row in 0..8 {
        for u in 0..8 {
            let mut sum = 0.0;
            for x in 0..8 {
                sum += shifted[row * 8 + x] * cos[u][x];
            }
            temp[row * 8 + u] = norm(u) * sum;
        }
    }

    // columns
    let mut coeffs = [0.0f64; 64];
    for col in 0..8 {
        for v in 0..8 {
            let mut sum = 0.0;
            for y in 0..8 {
                sum += temp[y * 8 + col] * cos[v][y];
            }
            coeffs[v * 8 + col] = norm(v) * sum;
        }
    }
    coeffs
}

/// Quantize natural-order coefficients with a zigzag-order table and
/// reorder the result to zigzag.
pub fn quantize(coeffs: &[f64; 64], quant: &[u16; 64]) -> Block {
    let mut block = [0i32; 64];
    for (zz, &nat) in ZIGZAG_TO_NATURAL.iter().enumerate() {
        // f64::round rounds half away from zero
        let q = (coeffs[nat] / quant[zz] as f64).round() as i32;
        block[zz] = if zz == 0 { q } else { q.clamp(-MAX_AC, MAX_AC) };
    }
    block
}

/// JFIF RGB to YCbCr.
pub fn rgb_to_ycbcr(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let (r, g, b) = (r as f64, g as f64, b as f64);
    let y = 0.299 * r + 0.587 * g + 0.114 * b;
    let cb = 128.0 - 0.168736 * r - 0.331264 * g + 0.5 * b;
    let cr = 128.0 + 0.5 * r - 0.418688 * g - 0.081312 * b;
    (to_sample(y), to_sample(cb), to_sample(cr))
}

#[inline]
fn to_sample(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// One component of the image at its own resolution.
#[derive(Debug, Clone)]
pub struct Plane {
    width: usize,
    height: usize,
    samples: Vec<u8>,
}

impl Plane {
    fn new(width: usize, height: usize, samples: Vec<u8>) -> Self {
        debug_assert_eq!(samples.len(), width * height);
        Plane {
            width,
            height,
            samples,
        }
    }

    /// Sample at (x, y); coordinates past the edge repeat the last column or row.
    #[inline]
    pub fn sample(&self, x: usize, y: usize) -> u8 {
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        self.samples[y * self.width + x]
    }

    /// The 8x8 samples of block (bx, by).
    pub fn block(&self, bx: usize, by: usize) -> [u8; 64] {
        let mut out = [0u8; 64];
        for (i, value) in out.iter_mut().enumerate() {
            *value = self.sample(bx * 8 + i % 8, by * 8 + i / 8);
        }
        out
    }

    /// Half-resolution plane, each sample the rounded mean of a 2x2 square.
    fn subsample(&self) -> Plane {
        let width = self.width.div_ceil(2);
        let height = self.height.div_ceil(2);
        let mut samples = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let sum = self.sample(2 * x, 2 * y) as u32
                    + self.sample(2 * x + 1, 2 * y) as u32
                    + self.sample(2 * x, 2 * y + 1) as u32
                    + self.sample(2 * x + 1, 2 * y + 1) as u32;
                samples.push(((sum + 2) / 4) as u8);
            }
        }
        Plane::new(width, height, samples)
    }
}

/// Component planes plus the quantization table of each component.
#[derive(Debug, Clone)]
pub struct PlanarImage {
    planes: Vec<Plane>,
    quant: Vec<[u16; 64]>,
}

impl PlanarImage {
    /// Split `image` into Y or Y/Cb/Cr planes.
    ///
    /// Grayscale variants keep a single luminance plane; everything else is
    /// converted to RGB first.
    pub fn from_image(image: &DynamicImage, tables: &TableStore) -> Result<Self> {
        let (width, height) = (image.width() as usize, image.height() as usize);
        if width == 0 || height == 0 {
            return Err(JstegError::InvalidImage {
                width: image.width(),
                height: image.height(),
            });
        }

        let planes = if is_grayscale(image) {
            vec![Plane::new(width, height, image.to_luma8().into_raw())]
        } else {
            let rgb = image.to_rgb8();
            let mut y = Vec::with_capacity(width * height);
            let mut cb = Vec::with_capacity(width * height);
            let mut cr = Vec::with_capacity(width * height);
            for pixel in rgb.pixels() {
                let [r, g, b] = pixel.0;
                let (ly, lcb, lcr) = rgb_to_ycbcr(r, g, b);
                y.push(ly);
                cb.push(lcb);
                cr.push(lcr);
            }
            vec![
                Plane::new(width, height, y),
                Plane::new(width, height, cb).subsample(),
                Plane::new(width, height, cr).subsample(),
            ]
        };

        let selectors: &[usize] = if planes.len() == 1 { &[0] } else { &[0, 1, 1] };
        let mut quant = Vec::with_capacity(selectors.len());
        for &selector in selectors {
            let table = tables.quant[selector]
                .as_ref()
                .ok_or_else(|| JstegError::format(format!("missing quantization table {selector}")))?;
            quant.push(table.values);
        }

        Ok(PlanarImage { planes, quant })
    }

    #[cfg(test)]
    fn components(&self) -> usize {
        self.planes.len()
    }
}

impl BlockSource for PlanarImage {
    fn block(&self, component: usize, bx: usize, by: usize) -> Block {
        let samples = self.planes[component].block(bx, by);
        quantize(&forward_dct(&samples), &self.quant[component])
    }
}

/// Whether the image is encoded with a single luminance component.
pub fn is_grayscale(image: &DynamicImage) -> bool {
    matches!(
        image,
        DynamicImage::ImageLuma8(_)
            | DynamicImage::ImageLumaA8(_)
            | DynamicImage::ImageLuma16(_)
            | DynamicImage::ImageLumaA16(_)
    )
}
