//! Tabular export of the full (non-downsampled) window.
//!
//! The CSV layout is a `t,y` header followed by one `<timestamp_ms>,<value>`
//! row per sample in buffer order, rows separated by `\n` with no trailing
//! newline. Values use Rust's shortest round-trip float formatting, so
//! [`parse_csv`] reproduces the encoded samples exactly.

use std::io::Write;
use std::path::Path;

use log::info;

use super::sample::Sample;
use crate::error::{Result, TelemetryError};

pub const CSV_HEADER: &str = "t,y";

/// Serialise `samples` into CSV bytes.
pub fn encode_csv(samples: &[Sample]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(CSV_HEADER.len() + samples.len() * 24);
    // Writing into a Vec cannot fail.
    let _ = write_csv(&mut buf, samples);
    buf
}

pub fn write_csv<W: Write>(mut w: W, samples: &[Sample]) -> std::io::Result<()> {
    w.write_all(CSV_HEADER.as_bytes())?;
    for s in samples {
        write!(w, "\n{},{}", s.timestamp_ms, s.value)?;
    }
    w.flush()
}

pub fn save_csv_path<P: AsRef<Path>>(path: P, samples: &[Sample]) -> Result<()> {
    let path = path.as_ref();
    let f = std::fs::File::create(path)?;
    write_csv(std::io::BufWriter::new(f), samples)?;
    info!("exported {} samples to {}", samples.len(), path.display());
    Ok(())
}

/// Parse CSV produced by [`encode_csv`]. A trailing newline and `\r\n` line
/// endings are tolerated.
pub fn parse_csv(bytes: &[u8]) -> Result<Vec<Sample>> {
    let text = std::str::from_utf8(bytes).map_err(|e| TelemetryError::Csv {
        line: 1,
        reason: e.to_string(),
    })?;
    let mut lines = text.lines();
    match lines.next() {
        Some(h) if h.trim_end() == CSV_HEADER => {}
        other => {
            return Err(TelemetryError::Csv {
                line: 1,
                reason: format!("expected header `{CSV_HEADER}`, found {other:?}"),
            })
        }
    }
    let mut out = Vec::new();
    for (idx, line) in lines.enumerate() {
        let line_no = idx + 2;
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        let bad = |reason: String| TelemetryError::Csv {
            line: line_no,
            reason,
        };
        let (t, y) = line
            .split_once(',')
            .ok_or_else(|| bad("expected two columns".to_string()))?;
        let timestamp_ms = t
            .parse::<i64>()
            .map_err(|e| bad(format!("timestamp: {e}")))?;
        let value = y.parse::<f64>().map_err(|e| bad(format!("value: {e}")))?;
        out.push(Sample::new(timestamp_ms, value));
    }
    Ok(out)
}

#[cfg(feature = "parquet")]
pub fn save_parquet_path<P: AsRef<Path>>(path: P, samples: &[Sample]) -> Result<()> {
    use arrow_array::{Float64Array, Int64Array, RecordBatch};
    use arrow_schema::{DataType, Field, Schema};
    use parquet::arrow::arrow_writer::ArrowWriter;
    use parquet::errors::ParquetError;
    use parquet::file::properties::WriterProperties;
    use std::sync::Arc;

    let ts_col: Vec<i64> = samples.iter().map(|s| s.timestamp_ms).collect();
    let val_col: Vec<f64> = samples.iter().map(|s| s.value).collect();
    let schema = Arc::new(Schema::new(vec![
        Field::new("t", DataType::Int64, false),
        Field::new("y", DataType::Float64, false),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(ts_col)) as _,
            Arc::new(Float64Array::from(val_col)) as _,
        ],
    )
    .map_err(ParquetError::from)?;
    let file = std::fs::File::create(path.as_ref())?;
    let props = WriterProperties::builder().build();
    let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
    writer.write(&batch)?;
    writer.close()?;
    info!(
        "exported {} samples to {}",
        samples.len(),
        path.as_ref().display()
    );
    Ok(())
}
