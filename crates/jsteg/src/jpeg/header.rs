//! Marker segment parsing and writing.
//!
//! Parsing stops at the first SOS and validates everything the entropy
//! pass relies on before a single block is decoded: frame type, sampling
//! factors, table selectors and scan parameters.

use super::marker::{sof_description, Marker};
use super::tables::{HuffmanTable, QuantizationTable, TableClass, TableStore};
use crate::error::{JstegError, Result};

/// Maximum number of components in a frame.
const MAX_COMPONENTS: usize = 4;

/// Maximum table selector in any frame.
const MAX_TABLE_SELECTOR: u8 = 3;

/// Maximum table selector in a baseline (SOF0) frame.
const MAX_BASELINE_SELECTOR: u8 = 1;

/// Largest sum of h*v over the components of an interleaved scan.
const MAX_BLOCKS_PER_MCU: usize = 10;

/// Sequential coding variant of the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// SOF0.
    Baseline,
    /// SOF1, Huffman coded.
    ExtendedSequential,
}

/// Frame component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    /// Component identifier.
    pub id: u8,
    /// Horizontal sampling factor.
    pub h: u8,
    /// Vertical sampling factor.
    pub v: u8,
    /// Quantization table selector.
    pub quant_selector: u8,
}

/// Frame header (SOF).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub kind: FrameKind,
    pub width: u16,
    pub height: u16,
    pub components: Vec<Component>,
}

impl Frame {
    pub fn is_baseline(&self) -> bool {
        self.kind == FrameKind::Baseline
    }

    pub fn h_max(&self) -> u8 {
        self.components.iter().map(|c| c.h).max().unwrap_or(1)
    }

    pub fn v_max(&self) -> u8 {
        self.components.iter().map(|c| c.v).max().unwrap_or(1)
    }
}

/// One component of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanComponent {
    /// Index into [`Frame::components`].
    pub component_index: usize,
    pub dc_selector: u8,
    pub ac_selector: u8,
}

/// Scan header (SOS).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scan {
    pub components: Vec<ScanComponent>,
}

/// Everything in front of the entropy-coded segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JpegHeader {
    pub frame: Frame,
    pub tables: TableStore,
    pub scan: Scan,
    /// MCUs between restart markers, 0 when restarts are disabled.
    pub restart_interval: u16,
}

/// Parse the header of a JPEG file.
///
/// Returns the header and the offset of the first entropy-coded byte.
pub fn read_header(data: &[u8]) -> Result<(JpegHeader, usize)> {
    let mut cursor = Cursor { data, pos: 0 };

    if cursor.take(2).ok() != Some(&[0xFF, 0xD8][..]) {
        return Err(JstegError::format("missing SOI marker"));
    }

    let mut frame: Option<Frame> = None;
    let mut tables = TableStore::default();
    let mut restart_interval = 0u16;

    loop {
        let marker = cursor.read_marker()?;
        log::trace!("marker {marker:?} at offset {}", cursor.pos - 2);

        if !marker.has_length() {
            match marker {
                Marker::EOI => return Err(JstegError::format("missing SOS marker")),
                // stray RST or TEM markers carry no data
                _ => continue,
            }
        }

        let segment = cursor.read_segment()?;
        match marker {
            Marker::SOF(n @ (0 | 1)) => {
                if frame.is_some() {
                    return Err(JstegError::format("multiple SOF markers"));
                }
                let kind = if n == 0 {
                    FrameKind::Baseline
                } else {
                    FrameKind::ExtendedSequential
                };
                frame = Some(parse_sof(kind, segment)?);
            }
            Marker::SOF(n) => return Err(JstegError::unsupported(sof_description(n))),
            Marker::DAC => return Err(JstegError::unsupported("arithmetic coding")),
            Marker::DQT => parse_dqt(segment, &mut tables)?,
            Marker::DHT => parse_dht(segment, &mut tables)?,
            Marker::DRI => {
                if segment.len() != 2 {
                    return Err(JstegError::format("DRI has wrong length"));
                }
                restart_interval = u16::from_be_bytes([segment[0], segment[1]]);
            }
            Marker::SOS => {
                let frame = frame.ok_or_else(|| JstegError::format("missing SOF marker"))?;
                if frame.is_baseline() {
                    check_baseline_tables(&tables)?;
                }
                let scan = parse_sos(segment, &frame, &tables)?;
                let header = JpegHeader {
                    frame,
                    tables,
                    scan,
                    restart_interval,
                };
                return Ok((header, cursor.pos));
            }
            // APPn, COM and anything else we do not need
            _ => {}
        }
    }
}

/// Byte cursor over the marker segments.
struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let bytes = self
            .data
            .get(self.pos..self.pos + n)
            .ok_or_else(|| JstegError::format("unexpected end of file"))?;
        self.pos += n;
        Ok(bytes)
    }

    fn byte(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    /// Read the next marker, skipping fill bytes.
    fn read_marker(&mut self) -> Result<Marker> {
        if self.byte()? != 0xFF {
            return Err(JstegError::format("expected marker"));
        }
        let mut code = self.byte()?;
        while code == 0xFF {
            code = self.byte()?;
        }
        Marker::from_u8(code)
            .ok_or_else(|| JstegError::format(format!("invalid marker byte 0x{code:02X}")))
    }

    /// Read a segment body (length field excluded).
    fn read_segment(&mut self) -> Result<&'a [u8]> {
        let len = self.take(2)?;
        let length = u16::from_be_bytes([len[0], len[1]]) as usize;
        if length < 2 {
            return Err(JstegError::format("segment length too small"));
        }
        self.take(length - 2)
    }
}

fn parse_sof(kind: FrameKind, data: &[u8]) -> Result<Frame> {
    if data.len() < 6 {
        return Err(JstegError::format("SOF segment too short"));
    }

    let precision = data[0];
    let height = u16::from_be_bytes([data[1], data[2]]);
    let width = u16::from_be_bytes([data[3], data[4]]);
    let count = data[5] as usize;

    if data.len() != 6 + 3 * count {
        return Err(JstegError::format("SOF has wrong length"));
    }
    if precision != 8 {
        return Err(JstegError::unsupported(format!("{precision}-bit precision")));
    }
    if height == 0 {
        return Err(JstegError::unsupported("DNL marker"));
    }
    if width == 0 {
        return Err(JstegError::format("zero image width"));
    }
    if count == 0 || count > MAX_COMPONENTS {
        return Err(JstegError::unsupported(format!("{count} color components")));
    }

    let mut components: Vec<Component> = Vec::with_capacity(count);
    for spec in data[6..].chunks_exact(3) {
        let component = Component {
            id: spec[0],
            h: spec[1] >> 4,
            v: spec[1] & 0x0F,
            quant_selector: spec[2],
        };

        if components.iter().any(|c| c.id == component.id) {
            return Err(JstegError::format("repeated component identifier"));
        }
        if !(1..=4).contains(&component.h) || !(1..=4).contains(&component.v) {
            return Err(JstegError::unsupported(format!(
                "sampling factors {}x{}",
                component.h, component.v
            )));
        }
        if component.quant_selector > MAX_TABLE_SELECTOR {
            return Err(JstegError::format("bad Tq value"));
        }
        components.push(component);
    }

    Ok(Frame {
        kind,
        width,
        height,
        components,
    })
}

fn parse_dqt(data: &[u8], tables: &mut TableStore) -> Result<()> {
    let mut pos = 0;

    while pos < data.len() {
        let precision = data[pos] >> 4;
        let id = data[pos] & 0x0F;
        pos += 1;

        if id > MAX_TABLE_SELECTOR {
            return Err(JstegError::format("bad Tq value"));
        }

        let mut values = [0u16; 64];
        match precision {
            0 => {
                let body = data
                    .get(pos..pos + 64)
                    .ok_or_else(|| JstegError::format("DQT has wrong length"))?;
                for (value, &b) in values.iter_mut().zip(body) {
                    *value = b as u16;
                }
                pos += 64;
            }
            1 => {
                let body = data
                    .get(pos..pos + 128)
                    .ok_or_else(|| JstegError::format("DQT has wrong length"))?;
                for (value, pair) in values.iter_mut().zip(body.chunks_exact(2)) {
                    *value = u16::from_be_bytes([pair[0], pair[1]]);
                }
                pos += 128;
            }
            _ => return Err(JstegError::format("bad Pq value")),
        }

        tables.quant[id as usize] = Some(QuantizationTable { precision, values });
    }

    Ok(())
}

fn parse_dht(data: &[u8], tables: &mut TableStore) -> Result<()> {
    let mut pos = 0;

    while pos < data.len() {
        let class = match data[pos] >> 4 {
            0 => TableClass::Dc,
            1 => TableClass::Ac,
            _ => return Err(JstegError::format("bad Tc value")),
        };
        let id = data[pos] & 0x0F;
        pos += 1;

        check_selector(id, false, "Th")?;

        let mut code_lengths = [0u8; 16];
        code_lengths.copy_from_slice(
            data.get(pos..pos + 16)
                .ok_or_else(|| JstegError::format("DHT has wrong length"))?,
        );
        pos += 16;

        let total: usize = code_lengths.iter().map(|&n| n as usize).sum();
        if total == 0 || total > 256 {
            return Err(JstegError::format("bad Huffman table size"));
        }
        if class == TableClass::Dc && total > 16 {
            return Err(JstegError::format("bad DC Huffman table size"));
        }

        let values = data
            .get(pos..pos + total)
            .ok_or_else(|| JstegError::format("DHT has wrong length"))?
            .to_vec();
        pos += total;

        let table = HuffmanTable {
            code_lengths,
            values,
        };
        // reject tables whose code lengths do not form a prefix code
        super::huffman::HuffmanDecoder::from_table(&table)?;
        tables.set_huffman(class, id, table);
    }

    Ok(())
}

/// Selectors above 3 do not exist in any sequential mode; baseline
/// frames are further limited to 0 and 1.
fn check_selector(selector: u8, baseline: bool, name: &str) -> Result<()> {
    if selector > MAX_TABLE_SELECTOR {
        return Err(JstegError::unsupported(format!("{name} table selector {selector}")));
    }
    if selector > MAX_BASELINE_SELECTOR && baseline {
        return Err(JstegError::format(format!("bad {name} value")));
    }
    Ok(())
}

/// Tables may precede the SOF, so the baseline limits on them are
/// checked once the whole header up to SOS has been seen.
fn check_baseline_tables(tables: &TableStore) -> Result<()> {
    if tables.quant.iter().flatten().any(|t| t.precision != 0) {
        return Err(JstegError::format("bad Pq value"));
    }
    for slots in [&tables.dc, &tables.ac] {
        for (id, table) in slots.iter().enumerate() {
            if table.is_some() {
                check_selector(id as u8, true, "Th")?;
            }
        }
    }
    Ok(())
}

fn parse_sos(data: &[u8], frame: &Frame, tables: &TableStore) -> Result<Scan> {
    let n = data.len();
    let frame_count = frame.components.len();
    if n < 6 || n > 4 + 2 * frame_count || n % 2 != 0 {
        return Err(JstegError::format("SOS has wrong length"));
    }

    let count = data[0] as usize;
    if n != 4 + 2 * count {
        return Err(JstegError::format(
            "SOS length inconsistent with number of components",
        ));
    }

    let mut components: Vec<ScanComponent> = Vec::with_capacity(count);
    let mut total_hv = 0usize;
    for spec in data[1..1 + 2 * count].chunks_exact(2) {
        let component_index = frame
            .components
            .iter()
            .position(|c| c.id == spec[0])
            .ok_or_else(|| JstegError::format("unknown component selector"))?;
        if components
            .iter()
            .any(|c| c.component_index == component_index)
        {
            return Err(JstegError::format("repeated component selector"));
        }

        let dc_selector = spec[1] >> 4;
        let ac_selector = spec[1] & 0x0F;
        check_selector(dc_selector, frame.is_baseline(), "Td")?;
        check_selector(ac_selector, frame.is_baseline(), "Ta")?;
        if tables.huffman(TableClass::Dc, dc_selector).is_none() {
            return Err(JstegError::format(format!(
                "missing DC Huffman table {dc_selector}"
            )));
        }
        if tables.huffman(TableClass::Ac, ac_selector).is_none() {
            return Err(JstegError::format(format!(
                "missing AC Huffman table {ac_selector}"
            )));
        }

        let component = &frame.components[component_index];
        total_hv += component.h as usize * component.v as usize;
        components.push(ScanComponent {
            component_index,
            dc_selector,
            ac_selector,
        });
    }

    if count > 1 && total_hv > MAX_BLOCKS_PER_MCU {
        return Err(JstegError::unsupported("total sampling factors too large"));
    }

    let tail = &data[1 + 2 * count..];
    let (ss, se, ah, al) = (tail[0], tail[1], tail[2] >> 4, tail[2] & 0x0F);
    if ss != 0 || se != 63 || ah != 0 || al != 0 {
        return Err(JstegError::unsupported(
            "spectral selection or successive approximation",
        ));
    }
    if count != frame_count {
        return Err(JstegError::unsupported("multi-scan sequential image"));
    }

    Ok(Scan { components })
}

/// Append the headers of a baseline JPEG: SOI, DQT, SOF0, DHT, DRI and SOS.
///
/// Tables are written as stored, one segment per table.
pub fn write_header(output: &mut Vec<u8>, header: &JpegHeader) -> Result<()> {
    let frame = &header.frame;
    write_marker(output, Marker::SOI);

    for (id, table) in header.tables.quant.iter().enumerate() {
        let Some(table) = table else { continue };
        let mut body = Vec::with_capacity(1 + 128);
        body.push((table.precision << 4) | id as u8);
        for &value in &table.values {
            if table.precision == 0 {
                body.push(value as u8);
            } else {
                body.extend_from_slice(&value.to_be_bytes());
            }
        }
        write_segment(output, Marker::DQT, &body)?;
    }

    let sof = if frame.is_baseline() { 0 } else { 1 };
    let mut body = Vec::with_capacity(6 + 3 * frame.components.len());
    body.push(8);
    body.extend_from_slice(&frame.height.to_be_bytes());
    body.extend_from_slice(&frame.width.to_be_bytes());
    body.push(frame.components.len() as u8);
    for component in &frame.components {
        body.push(component.id);
        body.push((component.h << 4) | component.v);
        body.push(component.quant_selector);
    }
    write_segment(output, Marker::SOF(sof), &body)?;

    for (class, slots) in [
        (TableClass::Dc, &header.tables.dc),
        (TableClass::Ac, &header.tables.ac),
    ] {
        for (id, table) in slots.iter().enumerate() {
            let Some(table) = table else { continue };
            let mut body = Vec::with_capacity(17 + table.values.len());
            body.push(((class as u8) << 4) | id as u8);
            body.extend_from_slice(&table.code_lengths);
            body.extend_from_slice(&table.values);
            write_segment(output, Marker::DHT, &body)?;
        }
    }

    if header.restart_interval > 0 {
        write_segment(output, Marker::DRI, &header.restart_interval.to_be_bytes())?;
    }

    let mut body = Vec::with_capacity(4 + 2 * header.scan.components.len());
    body.push(header.scan.components.len() as u8);
    for sc in &header.scan.components {
        body.push(frame.components[sc.component_index].id);
        body.push((sc.dc_selector << 4) | sc.ac_selector);
    }
    // Ss = 0, Se = 63, Ah = Al = 0
    body.extend_from_slice(&[0, 63, 0]);
    write_segment(output, Marker::SOS, &body)
}

fn write_marker(output: &mut Vec<u8>, marker: Marker) {
    output.push(0xFF);
    output.push(marker.to_u8());
}

fn write_segment(output: &mut Vec<u8>, marker: Marker, body: &[u8]) -> Result<()> {
    let length = u16::try_from(body.len() + 2)
        .map_err(|_| JstegError::format(format!("{marker:?} segment too long")))?;
    write_marker(output, marker);
    output.extend_from_slice(&length.to_be_bytes());
    output.extend_from_slice(body);
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Header of a 16x16 color image, 4:2:0, standard tables.
    pub(crate) fn color_header(restart_interval: u16) -> JpegHeader {
        JpegHeader {
            frame: Frame {
                kind: FrameKind::Baseline,
                width: 16,
                height: 16,
                components: vec![
                    Component { id: 1, h: 2, v: 2, quant_selector: 0 },
                    Component { id: 2, h: 1, v: 1, quant_selector: 1 },
                    Component { id: 3, h: 1, v: 1, quant_selector: 1 },
                ],
            },
            tables: TableStore::standard(75, true),
            scan: Scan {
                components: vec![
                    ScanComponent { component_index: 0, dc_selector: 0, ac_selector: 0 },
                    ScanComponent { component_index: 1, dc_selector: 1, ac_selector: 1 },
                    ScanComponent { component_index: 2, dc_selector: 1, ac_selector: 1 },
                ],
            },
            restart_interval,
        }
    }

    fn written(header: &JpegHeader) -> Vec<u8> {
        let mut out = Vec::new();
        write_header(&mut out, header).unwrap();
        out
    }

    /// Patch the first occurrence of `marker` in a written header.
    fn patch_segment(data: &mut [u8], marker: u8, offset: usize, value: u8) {
        let at = data
            .windows(2)
            .position(|w| w == [0xFF, marker])
            .expect("marker present");
        data[at + 4 + offset] = value;
    }

    #[test]
    fn test_written_header_reads_back() {
        let header = color_header(4);
        let data = written(&header);

        let (parsed, offset) = read_header(&data).unwrap();
        assert_eq!(parsed, header);
        assert_eq!(offset, data.len());
    }

    #[test]
    fn test_missing_soi() {
        let err = read_header(&[0x00, 0x00, 0xFF, 0xD9]).unwrap_err();
        assert!(matches!(err, JstegError::Format(_)));
    }

    #[test]
    fn test_progressive_frame_is_unsupported() {
        let mut data = written(&color_header(0));
        let at = data.windows(2).position(|w| w == [0xFF, 0xC0]).unwrap();
        data[at + 1] = 0xC2;

        match read_header(&data) {
            Err(JstegError::Unsupported(feature)) => assert_eq!(feature, "progressive mode"),
            other => panic!("expected Unsupported, got {other:?}"),
        }
    }

    #[test]
    fn test_arithmetic_frame_is_unsupported() {
        let mut data = written(&color_header(0));
        let at = data.windows(2).position(|w| w == [0xFF, 0xC0]).unwrap();
        data[at + 1] = 0xC9;
        assert!(matches!(read_header(&data), Err(JstegError::Unsupported(_))));
    }

    #[test]
    fn test_table_selector_above_three_is_unsupported() {
        let mut header = color_header(0);
        header.frame.kind = FrameKind::ExtendedSequential;
        let mut data = written(&header);
        // first DHT: class/id byte follows the length
        patch_segment(&mut data, 0xC4, 0, 0x14);
        assert!(matches!(read_header(&data), Err(JstegError::Unsupported(_))));
    }

    #[test]
    fn test_baseline_selector_two_is_format_error() {
        let mut data = written(&color_header(0));
        patch_segment(&mut data, 0xC4, 0, 0x02);
        assert!(matches!(read_header(&data), Err(JstegError::Format(_))));
    }

    #[test]
    fn test_excessive_sampling_is_unsupported() {
        let mut header = color_header(0);
        header.frame.components[0].h = 4;
        header.frame.components[0].v = 3;
        let data = written(&header);
        match read_header(&data) {
            Err(JstegError::Unsupported(feature)) => {
                assert_eq!(feature, "total sampling factors too large")
            }
            other => panic!("expected Unsupported, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_component_selector() {
        let mut data = written(&color_header(0));
        // first scan component id
        patch_segment(&mut data, 0xDA, 1, 9);
        assert!(matches!(read_header(&data), Err(JstegError::Format(_))));
    }

    #[test]
    fn test_repeated_component_selector() {
        let mut data = written(&color_header(0));
        // second scan component refers to the first one again
        patch_segment(&mut data, 0xDA, 3, 1);
        match read_header(&data) {
            Err(JstegError::Format(reason)) => assert_eq!(reason, "repeated component selector"),
            other => panic!("expected Format error, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_dri_length() {
        let mut data = written(&color_header(8));
        let at = data.windows(2).position(|w| w == [0xFF, 0xDD]).unwrap();
        data[at + 3] = 5;
        assert!(read_header(&data).is_err());
    }

    #[test]
    fn test_spectral_selection_is_unsupported() {
        let mut data = written(&color_header(0));
        let len = data.len();
        // Se is the second to last byte of SOS
        data[len - 2] = 5;
        assert!(matches!(read_header(&data), Err(JstegError::Unsupported(_))));
    }

    #[test]
    fn test_eoi_before_scan() {
        let data = [0xFF, 0xD8, 0xFF, 0xFE, 0x00, 0x04, b'h', b'i', 0xFF, 0xD9];
        match read_header(&data) {
            Err(JstegError::Format(reason)) => assert_eq!(reason, "missing SOS marker"),
            other => panic!("expected Format error, got {other:?}"),
        }
    }

    fn expect_format(data: &[u8], expected: &str) {
        match read_header(data) {
            Err(JstegError::Format(reason)) => assert_eq!(reason, expected),
            other => panic!("expected Format error {expected:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_wide_quantization_table_before_baseline_frame() {
        let mut header = color_header(0);
        header.tables.quant[0].as_mut().unwrap().precision = 1;
        let data = written(&header);
        // DQT is written ahead of SOF0
        let dqt = data.windows(2).position(|w| w == [0xFF, 0xDB]).unwrap();
        let sof = data.windows(2).position(|w| w == [0xFF, 0xC0]).unwrap();
        assert!(dqt < sof);
        expect_format(&data, "bad Pq value");

        header.frame.kind = FrameKind::ExtendedSequential;
        let (parsed, _) = read_header(&written(&header)).unwrap();
        assert_eq!(parsed.tables.quant[0].as_ref().unwrap().precision, 1);
    }

    #[test]
    fn test_baseline_rejects_unused_huffman_slot_two() {
        let mut header = color_header(0);
        header.tables.ac[2] = Some(HuffmanTable::ac_luminance());
        expect_format(&written(&header), "bad Th value");

        header.frame.kind = FrameKind::ExtendedSequential;
        assert!(read_header(&written(&header)).is_ok());
    }

    #[test]
    fn test_multiple_sof_markers() {
        let mut data = written(&color_header(0));
        let at = data.windows(2).position(|w| w == [0xFF, 0xC0]).unwrap();
        let length = u16::from_be_bytes([data[at + 2], data[at + 3]]) as usize;
        let sof = data[at..at + 2 + length].to_vec();
        data.splice(at..at, sof);
        expect_format(&data, "multiple SOF markers");
    }

    #[test]
    fn test_bad_huffman_table_class() {
        let mut data = written(&color_header(0));
        patch_segment(&mut data, 0xC4, 0, 0x20);
        expect_format(&data, "bad Tc value");
    }

    #[test]
    fn test_dc_table_with_more_than_16_codes() {
        let mut data = written(&color_header(0));
        // first DHT is the luminance DC table; add five codes of length 10
        patch_segment(&mut data, 0xC4, 1 + 9, 5);
        expect_format(&data, "bad DC Huffman table size");
    }

    #[test]
    fn test_missing_huffman_table() {
        let mut header = color_header(0);
        header.tables.dc[1] = None;
        expect_format(&written(&header), "missing DC Huffman table 1");
    }

    #[test]
    fn test_twelve_bit_precision_is_unsupported() {
        let mut data = written(&color_header(0));
        patch_segment(&mut data, 0xC0, 0, 12);
        match read_header(&data) {
            Err(JstegError::Unsupported(feature)) => assert_eq!(feature, "12-bit precision"),
            other => panic!("expected Unsupported, got {other:?}"),
        }
    }

    #[test]
    fn test_scan_without_every_component_is_unsupported() {
        let mut header = color_header(0);
        header.scan.components.truncate(1);
        match read_header(&written(&header)) {
            Err(JstegError::Unsupported(feature)) => {
                assert_eq!(feature, "multi-scan sequential image")
            }
            other => panic!("expected Unsupported, got {other:?}"),
        }
    }

    #[test]
    fn test_truncated_segment() {
        let data = written(&color_header(0));
        assert!(matches!(
            read_header(&data[..40]),
            Err(JstegError::Format(_))
        ));
    }
}
