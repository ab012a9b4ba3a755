//! Baseline JPEG codec with a coefficient hook.
//!
//! The codec knows nothing about hiding data: it parses and writes marker
//! segments, transforms pixels into quantized blocks and entropy-codes them,
//! handing every non-zero AC coefficient to a [`CoefficientHook`] on the way.

pub mod bitio;
pub mod entropy;
pub mod header;
pub mod huffman;
pub mod marker;
pub mod tables;
pub mod transform;

pub use entropy::{category, CoefficientHook, McuLayout, PassThrough};
pub use header::{read_header, write_header, Component, Frame, FrameKind, JpegHeader, Scan, ScanComponent};
pub use marker::Marker;
pub use tables::{HuffmanTable, QuantizationTable, TableStore};
