use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use arrow::json::LineDelimitedWriter;
use arrow::record_batch::RecordBatch;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use parquet::arrow::ArrowWriter;
use serde::Serialize;

use super::model::LoadedSplit;

pub const INFO_FILE: &str = "dataset_info.json";
pub const CSV_FILE: &str = "dataset.csv";
pub const JSON_FILE: &str = "dataset.json";
pub const PARQUET_FILE: &str = "dataset.parquet";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Write a split to `dir` as descriptor + CSV + JSON lines + Parquet.
///
/// The directory and descriptor are required; a failure there aborts. Each
/// data format is attempted independently and a failure is returned as a
/// warning line instead of an error.
pub fn save_split(split: &LoadedSplit, dir: &Path) -> Result<Vec<String>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating directory {}", dir.display()))?;

    write_info(split, &dir.join(INFO_FILE))?;

    let mut warnings = Vec::new();
    let formats: [(&str, fn(&LoadedSplit, &Path) -> Result<()>); 3] = [
        (CSV_FILE, write_csv),
        (JSON_FILE, write_json_lines),
        (PARQUET_FILE, write_parquet),
    ];
    for (name, write) in formats {
        let path = dir.join(name);
        if let Err(e) = write(split, &path) {
            log::warn!("Failed to save {}: {e:#}", path.display());
            warnings.push(format!("{name}: {e:#}"));
        }
    }

    log::info!(
        "Saved {} rows of {}[{}] to {}",
        split.num_rows(),
        split.dataset,
        split.split,
        dir.display()
    );
    Ok(warnings)
}

// ---------------------------------------------------------------------------
// Descriptor
// ---------------------------------------------------------------------------

fn write_info(split: &LoadedSplit, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(BufWriter::new(file), formatter);
    split
        .info()
        .serialize(&mut ser)
        .with_context(|| format!("writing {}", path.display()))?;
    ser.into_inner()
        .flush()
        .with_context(|| format!("flushing {}", path.display()))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV: header row, one line per record, nested values via Arrow display
// ---------------------------------------------------------------------------

fn write_csv(split: &LoadedSplit, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("opening CSV")?;
    writer
        .write_record(split.schema.fields().iter().map(|f| f.name().as_str()))
        .context("writing CSV header")?;

    let options = FormatOptions::default();
    for batch in &split.batches {
        write_csv_batch(&mut writer, batch, &options)?;
    }

    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_csv_batch(
    writer: &mut csv::Writer<File>,
    batch: &RecordBatch,
    options: &FormatOptions,
) -> Result<()> {
    let formatters = batch
        .columns()
        .iter()
        .map(|col| ArrayFormatter::try_new(col.as_ref(), options))
        .collect::<Result<Vec<_>, _>>()
        .context("preparing CSV formatters")?;

    for row in 0..batch.num_rows() {
        let record = formatters
            .iter()
            .map(|f| f.value(row).try_to_string())
            .collect::<Result<Vec<String>, _>>()
            .with_context(|| format!("formatting CSV row {row}"))?;
        writer
            .write_record(&record)
            .with_context(|| format!("writing CSV row {row}"))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// JSON lines and Parquet
// ---------------------------------------------------------------------------

fn write_json_lines(split: &LoadedSplit, path: &Path) -> Result<()> {
    let file = File::create(path).context("creating JSON file")?;
    let mut writer = LineDelimitedWriter::new(BufWriter::new(file));
    let batches: Vec<&RecordBatch> = split.batches.iter().collect();
    writer.write_batches(&batches).context("writing JSON rows")?;
    writer.finish().context("finishing JSON file")?;
    Ok(())
}

fn write_parquet(split: &LoadedSplit, path: &Path) -> Result<()> {
    let file = File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, split.schema.clone(), None)
        .context("creating parquet writer")?;
    for batch in &split.batches {
        writer.write(batch).context("writing parquet batch")?;
    }
    writer.close().context("closing parquet writer")?;
    Ok(())
}
