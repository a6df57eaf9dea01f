//! File-level helpers behind the `arcoder` command.
//!
//! The core stream does not record the original length. Files written by
//! this tool prepend it as a little-endian `u32`.

use std::fs;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use arcoder_core::{decode_bytes, encode_bytes, CoderError};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use thiserror::Error;
use tracing::{info, warn};

/// Size of the length prefix written in front of the compressed stream.
pub const FRAME_HEADER_LEN: usize = 4;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Coder error: {0}")]
    Coder(#[from] CoderError),
    #[error("Frame error: {0}")]
    Frame(String),
}

pub type ToolResult<T> = Result<T, ToolError>;

/// Compresses `source` and prefixes the original length.
pub fn compress_frame(source: &[u8]) -> ToolResult<Vec<u8>> {
    let original_len = u32::try_from(source.len()).map_err(|_| {
        ToolError::Frame(format!("input of {} bytes exceeds the 4 GiB limit", source.len()))
    })?;
    let payload = encode_bytes(source)?;
    let mut frame = Vec::with_capacity(FRAME_HEADER_LEN + payload.len());
    frame.write_u32::<LittleEndian>(original_len)?;
    frame.write_all(&payload)?;
    Ok(frame)
}

/// Reads the length prefix and decodes the payload after it.
pub fn decompress_frame(frame: &[u8]) -> ToolResult<Vec<u8>> {
    if frame.len() < FRAME_HEADER_LEN {
        return Err(ToolError::Frame(format!(
            "frame of {} bytes is shorter than its header",
            frame.len()
        )));
    }
    let mut cursor = Cursor::new(frame);
    let original_len = cursor.read_u32::<LittleEndian>()?;
    let mut payload = Vec::new();
    cursor.read_to_end(&mut payload)?;
    Ok(decode_bytes(&payload, original_len)?)
}

pub fn compress_file(input: &Path, output: &Path) -> ToolResult<()> {
    let source = fs::read(input)?;
    let frame = compress_frame(&source)?;
    fs::write(output, &frame)?;
    info!(input = %input.display(), original = source.len(), compressed = frame.len(), "compressed");
    Ok(())
}

pub fn decompress_file(input: &Path, output: &Path) -> ToolResult<()> {
    let frame = fs::read(input)?;
    let decoded = decompress_frame(&frame)?;
    fs::write(output, &decoded)?;
    info!(input = %input.display(), decoded = decoded.len(), "decompressed");
    Ok(())
}

/// Outcome of benchmarking one file.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchReport {
    pub path: PathBuf,
    pub original_len: usize,
    pub compressed_len: usize,
    pub encode_micros: u128,
    pub decode_micros: u128,
    /// `(index, decoded, expected)` for every differing byte.
    pub mismatches: Vec<(usize, u8, u8)>,
}

impl BenchReport {
    /// Compressed size over original size; 0 for empty input.
    pub fn ratio(&self) -> f64 {
        if self.original_len == 0 {
            0.0
        } else {
            self.compressed_len as f64 / self.original_len as f64
        }
    }

    /// Table row in the `|path|ratio|encode_us|decode_us|` layout.
    pub fn row(&self) -> String {
        format!(
            "|{}|{:.6}|{}|{}|",
            self.path.display(),
            self.ratio(),
            self.encode_micros,
            self.decode_micros
        )
    }
}

/// Encodes and decodes `source`, timing both directions and comparing the
/// result byte for byte.
pub fn bench_bytes(path: &Path, source: &[u8]) -> ToolResult<BenchReport> {
    let original_len = u32::try_from(source.len())
        .map_err(|_| ToolError::Frame(format!("{} exceeds the 4 GiB limit", path.display())))?;

    let start = Instant::now();
    let encoded = encode_bytes(source)?;
    let encode_micros = start.elapsed().as_micros();

    let start = Instant::now();
    let decoded = decode_bytes(&encoded, original_len)?;
    let decode_micros = start.elapsed().as_micros();

    let mismatches = decoded
        .iter()
        .zip(source)
        .enumerate()
        .filter(|(_, (got, expected))| got != expected)
        .map(|(index, (&got, &expected))| (index, got, expected))
        .collect();

    Ok(BenchReport {
        path: path.to_path_buf(),
        original_len: source.len(),
        compressed_len: encoded.len(),
        encode_micros,
        decode_micros,
        mismatches,
    })
}

/// Benchmarks every readable file in `paths`, printing one row per file.
/// Unreadable files are skipped with a warning.
pub fn bench_files<W: Write>(paths: &[PathBuf], out: &mut W) -> ToolResult<Vec<BenchReport>> {
    writeln!(out, "Range Coder")?;
    writeln!(out, "-------------------------------------------")?;
    let mut reports = Vec::with_capacity(paths.len());
    for path in paths {
        let source = match fs::read(path) {
            Ok(source) => source,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping unreadable file");
                continue;
            }
        };
        let report = bench_bytes(path, &source)?;
        writeln!(out, "{}", report.row())?;
        for (index, got, expected) in &report.mismatches {
            writeln!(out, "[{}] {} != {}", index, got, expected)?;
        }
        reports.push(report);
    }
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_roundtrip() {
        let source = b"framed payload, framed payload";
        let frame = compress_frame(source).unwrap();
        assert_eq!(&frame[..4], &(source.len() as u32).to_le_bytes());
        assert_eq!(decompress_frame(&frame).unwrap(), source);
    }

    #[test]
    fn test_short_frame_rejected() {
        assert!(matches!(decompress_frame(&[1, 0]), Err(ToolError::Frame(_))));
    }

    #[test]
    fn test_frame_without_payload_is_coder_error() {
        let err = decompress_frame(&[0, 0, 0, 0]).unwrap_err();
        assert!(matches!(err, ToolError::Coder(_)));
    }

    #[test]
    fn test_bench_report_row() {
        let report = bench_bytes(Path::new("mem"), &[5u8; 1000]).unwrap();
        assert!(report.mismatches.is_empty());
        assert!(report.ratio() < 0.1);
        assert!(report.row().starts_with("|mem|0."));
    }
}
