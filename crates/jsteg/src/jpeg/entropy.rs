//! Baseline entropy coding of the single interleaved scan.
//!
//! Encoding and decoding walk the MCU grid in the same order and call a
//! [`CoefficientHook`] for every non-zero AC coefficient, so anything a hook
//! does on the way out can be observed by a hook on the way back in.

use super::bitio::{BitReader, BitWriter};
use super::header::{Frame, JpegHeader};
use super::huffman::{HuffmanDecoder, HuffmanEncoder};
use super::tables::TableClass;
use crate::error::{JstegError, Result};

/// Quantized coefficients of one 8x8 block in zigzag order.
pub type Block = [i32; 64];

/// Largest DC difference category in 8-bit baseline coding.
const MAX_DC_CATEGORY: u8 = 11;

/// Largest AC category in 8-bit baseline coding.
const MAX_AC_CATEGORY: u8 = 10;

/// End of block.
const EOB: u8 = 0x00;

/// Run of sixteen zeros.
const ZRL: u8 = 0xF0;

/// Observes, and on encode may rewrite, the non-zero AC coefficients.
pub trait CoefficientHook {
    /// Called with the frame component index and the coefficient value.
    ///
    /// On encode the returned value is emitted in place of `value`. On
    /// decode the value has already been read and the return value is
    /// ignored by the engine.
    fn on_ac(&mut self, component: usize, value: i32) -> i32;
}

/// Hook that leaves every coefficient as it is.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassThrough;

impl CoefficientHook for PassThrough {
    #[inline]
    fn on_ac(&mut self, _component: usize, value: i32) -> i32 {
        value
    }
}

/// Produces the quantized blocks of a frame being encoded.
pub trait BlockSource {
    /// Block at block column `bx` and block row `by` of a frame component.
    fn block(&self, component: usize, bx: usize, by: usize) -> Block;
}

/// Magnitude category: number of bits needed for `|value|`.
#[inline]
pub fn category(value: i32) -> u8 {
    (32 - value.unsigned_abs().leading_zeros()) as u8
}

/// Position of one block in the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockPos {
    /// Index into the scan components (table and predictor slot).
    pub slot: usize,
    /// Index into the frame components.
    pub component: usize,
    pub bx: usize,
    pub by: usize,
}

/// MCU grid of a frame with a single scan covering all components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McuLayout {
    pub mcus_x: usize,
    pub mcus_y: usize,
    /// (frame component index, h, v) per scan component.
    units: Vec<(usize, usize, usize)>,
}

impl McuLayout {
    pub fn new(header: &JpegHeader) -> Self {
        let frame: &Frame = &header.frame;
        let width = frame.width as usize;
        let height = frame.height as usize;

        if header.scan.components.len() == 1 {
            // non-interleaved: one block per MCU over the component grid
            let index = header.scan.components[0].component_index;
            let component = &frame.components[index];
            let comp_width = (width * component.h as usize).div_ceil(frame.h_max() as usize);
            let comp_height = (height * component.v as usize).div_ceil(frame.v_max() as usize);
            return McuLayout {
                mcus_x: comp_width.div_ceil(8),
                mcus_y: comp_height.div_ceil(8),
                units: vec![(index, 1, 1)],
            };
        }

        let units = header
            .scan
            .components
            .iter()
            .map(|sc| {
                let c = &frame.components[sc.component_index];
                (sc.component_index, c.h as usize, c.v as usize)
            })
            .collect();

        McuLayout {
            mcus_x: width.div_ceil(8 * frame.h_max() as usize),
            mcus_y: height.div_ceil(8 * frame.v_max() as usize),
            units,
        }
    }

    pub fn total_mcus(&self) -> usize {
        self.mcus_x * self.mcus_y
    }

    /// Number of blocks in one MCU.
    pub fn blocks_per_mcu(&self) -> usize {
        self.units.iter().map(|&(_, h, v)| h * v).sum()
    }

    /// Blocks of MCU `mcu` in coding order.
    pub fn mcu_blocks(&self, mcu: usize) -> impl Iterator<Item = BlockPos> + '_ {
        let mx = mcu % self.mcus_x;
        let my = mcu / self.mcus_x;

        self.units
            .iter()
            .enumerate()
            .flat_map(move |(slot, &(component, h, v))| {
                (0..v).flat_map(move |y| {
                    (0..h).map(move |x| BlockPos {
                        slot,
                        component,
                        bx: mx * h + x,
                        by: my * v + y,
                    })
                })
            })
    }
}

/// Quantized blocks of every scan component, taken from a source once.
///
/// Hiding walks the blocks twice, once to count capacity and once to
/// encode; the cache keeps the forward transform to a single run.
#[derive(Debug, Clone)]
pub struct BlockCache {
    /// Per frame component: blocks per row and the blocks in row order.
    grids: Vec<Option<(usize, Vec<Block>)>>,
}

impl BlockCache {
    pub fn new<S: BlockSource + ?Sized>(header: &JpegHeader, source: &S) -> Self {
        let layout = McuLayout::new(header);
        let mut grids = vec![None; header.frame.components.len()];
        for &(component, h, v) in &layout.units {
            let columns = layout.mcus_x * h;
            let rows = layout.mcus_y * v;
            let mut blocks = Vec::with_capacity(columns * rows);
            for by in 0..rows {
                for bx in 0..columns {
                    blocks.push(source.block(component, bx, by));
                }
            }
            grids[component] = Some((columns, blocks));
        }
        BlockCache { grids }
    }
}

impl BlockSource for BlockCache {
    fn block(&self, component: usize, bx: usize, by: usize) -> Block {
        match &self.grids[component] {
            Some((columns, blocks)) => blocks[by * columns + bx],
            None => [0; 64],
        }
    }
}

/// Restart bookkeeping shared by both directions.
struct RestartState {
    interval: usize,
    next_marker: u8,
}

impl RestartState {
    fn new(interval: u16) -> Self {
        RestartState {
            interval: interval as usize,
            next_marker: 0,
        }
    }

    /// The RST index due in front of MCU `mcu`, if any.
    fn due(&mut self, mcu: usize) -> Option<u8> {
        if self.interval == 0 || mcu == 0 || mcu % self.interval != 0 {
            return None;
        }
        let n = self.next_marker;
        self.next_marker = (n + 1) & 7;
        Some(n)
    }
}

/// Entropy-code every block of `source` into `writer`.
pub fn encode_scan<S, H>(
    writer: &mut BitWriter,
    header: &JpegHeader,
    source: &S,
    hook: &mut H,
) -> Result<()>
where
    S: BlockSource + ?Sized,
    H: CoefficientHook + ?Sized,
{
    let layout = McuLayout::new(header);
    let mut encoders = Vec::with_capacity(header.scan.components.len());
    for sc in &header.scan.components {
        let dc = header
            .tables
            .huffman(TableClass::Dc, sc.dc_selector)
            .ok_or_else(|| JstegError::format("missing DC Huffman table"))?;
        let ac = header
            .tables
            .huffman(TableClass::Ac, sc.ac_selector)
            .ok_or_else(|| JstegError::format("missing AC Huffman table"))?;
        encoders.push((HuffmanEncoder::from_table(dc)?, HuffmanEncoder::from_table(ac)?));
    }

    let mut predictors = vec![0i32; encoders.len()];
    let mut restarts = RestartState::new(header.restart_interval);

    for mcu in 0..layout.total_mcus() {
        if let Some(n) = restarts.due(mcu) {
            writer.restart(n);
            predictors.fill(0);
        }

        for pos in layout.mcu_blocks(mcu) {
            let mut block = source.block(pos.component, pos.bx, pos.by);
            let (dc, ac) = &encoders[pos.slot];
            encode_block(writer, &mut block, pos.component, dc, ac, &mut predictors[pos.slot], hook)?;
        }
    }

    log::debug!(
        "encoded {} MCUs of {} blocks, output at {} bytes",
        layout.total_mcus(),
        layout.blocks_per_mcu(),
        writer.len()
    );
    Ok(())
}

/// Walk the blocks of `source` in scan order and show every non-zero AC
/// coefficient to `hook`, without producing any output.
pub fn observe_scan<S, H>(header: &JpegHeader, source: &S, hook: &mut H)
where
    S: BlockSource + ?Sized,
    H: CoefficientHook + ?Sized,
{
    let layout = McuLayout::new(header);
    for mcu in 0..layout.total_mcus() {
        for pos in layout.mcu_blocks(mcu) {
            let block = source.block(pos.component, pos.bx, pos.by);
            for &value in block[1..].iter().filter(|&&v| v != 0) {
                hook.on_ac(pos.component, value);
            }
        }
    }
}

/// Encode a single block, AC coefficients passing through `hook` first.
fn encode_block<H: CoefficientHook + ?Sized>(
    writer: &mut BitWriter,
    block: &mut Block,
    component: usize,
    dc_encoder: &HuffmanEncoder,
    ac_encoder: &HuffmanEncoder,
    dc_predictor: &mut i32,
    hook: &mut H,
) -> Result<()> {
    for coeff in block[1..].iter_mut().filter(|v| **v != 0) {
        *coeff = hook.on_ac(component, *coeff);
    }

    let dc_diff = block[0] - *dc_predictor;
    *dc_predictor = block[0];
    let dc_size = category(dc_diff);
    if dc_size > MAX_DC_CATEGORY {
        return Err(JstegError::format("excessive DC component"));
    }
    writer.write_huffman(dc_size, dc_encoder)?;
    writer.write_bits(magnitude_bits(dc_diff), dc_size);

    let mut zero_run = 0u8;
    for (k, &coeff) in block.iter().enumerate().skip(1) {
        if coeff == 0 {
            zero_run += 1;
            continue;
        }

        while zero_run >= 16 {
            writer.write_huffman(ZRL, ac_encoder)?;
            zero_run -= 16;
        }

        let size = category(coeff);
        if size > MAX_AC_CATEGORY {
            return Err(JstegError::format(format!("AC coefficient {coeff} out of range")));
        }
        writer.write_huffman((zero_run << 4) | size, ac_encoder)?;
        writer.write_bits(magnitude_bits(coeff), size);
        log::trace!("AC[{k}]: coeff={coeff}, run={zero_run}, size={size}");
        zero_run = 0;
    }

    if zero_run > 0 {
        writer.write_huffman(EOB, ac_encoder)?;
    }

    Ok(())
}

/// Low bits of the magnitude field: the value itself when positive,
/// one's complement of `|value|` when negative.
#[inline]
fn magnitude_bits(value: i32) -> u32 {
    if value < 0 {
        (value - 1) as u32
    } else {
        value as u32
    }
}

/// Decode the scan starting at `data`, the bytes following the SOS header.
///
/// Returns the number of bytes consumed.
pub fn decode_scan<H>(data: &[u8], header: &JpegHeader, hook: &mut H) -> Result<usize>
where
    H: CoefficientHook + ?Sized,
{
    let layout = McuLayout::new(header);
    let mut decoders = Vec::with_capacity(header.scan.components.len());
    for sc in &header.scan.components {
        let dc = header
            .tables
            .huffman(TableClass::Dc, sc.dc_selector)
            .ok_or_else(|| JstegError::format("missing DC Huffman table"))?;
        let ac = header
            .tables
            .huffman(TableClass::Ac, sc.ac_selector)
            .ok_or_else(|| JstegError::format("missing AC Huffman table"))?;
        decoders.push((HuffmanDecoder::from_table(dc)?, HuffmanDecoder::from_table(ac)?));
    }

    let mut reader = BitReader::new(data);
    let mut predictors = vec![0i32; decoders.len()];
    let mut restarts = RestartState::new(header.restart_interval);

    for mcu in 0..layout.total_mcus() {
        if let Some(n) = restarts.due(mcu) {
            reader.restart(n)?;
            predictors.fill(0);
        }

        for pos in layout.mcu_blocks(mcu) {
            let (dc, ac) = &decoders[pos.slot];
            decode_block(&mut reader, pos.component, dc, ac, &mut predictors[pos.slot], hook)?;
        }
    }

    log::debug!(
        "decoded {} MCUs from {} bytes of scan data",
        layout.total_mcus(),
        reader.position()
    );
    Ok(reader.position())
}

fn decode_block<H: CoefficientHook + ?Sized>(
    reader: &mut BitReader<'_>,
    component: usize,
    dc_decoder: &HuffmanDecoder,
    ac_decoder: &HuffmanDecoder,
    dc_predictor: &mut i32,
    hook: &mut H,
) -> Result<()> {
    let dc_size = dc_decoder.decode(reader)?;
    if dc_size > MAX_DC_CATEGORY {
        return Err(JstegError::format("excessive DC component"));
    }
    *dc_predictor = dc_predictor.wrapping_add(reader.receive_extend(dc_size)?);

    let mut k = 1;
    while k < 64 {
        let symbol = ac_decoder.decode(reader)?;
        let run = (symbol >> 4) as usize;
        let size = symbol & 0x0F;

        if size == 0 {
            if symbol == ZRL {
                if k + 16 > 64 {
                    return Err(JstegError::format("bad AC run length"));
                }
                k += 16;
                continue;
            }
            // EOB
            break;
        }
        if size > MAX_AC_CATEGORY {
            return Err(JstegError::format(format!("bad AC category {size}")));
        }

        k += run;
        if k > 63 {
            return Err(JstegError::format("bad AC run length"));
        }
        let value = reader.receive_extend(size)?;
        log::trace!("AC[{k}]: coeff={value}, run={run}, size={size}");
        hook.on_ac(component, value);
        k += 1;
    }

    Ok(())
}
