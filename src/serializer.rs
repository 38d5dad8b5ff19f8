//! JSON and CSV batch files.
//!
//! The CSV `context` column holds the JSON text of the context object rather
//! than one column per field. Downstream loaders depend on that layout.

use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::config::OutputFormat;
use crate::entry::{LogContext, LogEntry};
use crate::error::{SimError, SimResult};

pub const CSV_COLUMNS: [&str; 5] = ["timestamp", "service", "level", "message", "context"];

impl OutputFormat {
    pub fn write(&self, entries: &[LogEntry], path: &Path) -> SimResult<()> {
        match self {
            OutputFormat::Json => write_json(entries, path),
            OutputFormat::Csv => write_csv(entries, path),
        }
    }
}

fn ensure_parent(path: &Path) -> SimResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

pub fn write_json(entries: &[LogEntry], path: &Path) -> SimResult<()> {
    ensure_parent(path)?;
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut out, entries)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

pub fn write_csv(entries: &[LogEntry], path: &Path) -> SimResult<()> {
    ensure_parent(path)?;
    let body = render_csv(entries)?;
    let mut out = BufWriter::new(File::create(path)?);
    out.write_all(body.as_bytes())?;
    out.flush()?;
    Ok(())
}

pub fn render_csv(entries: &[LogEntry]) -> SimResult<String> {
    let mut out = String::new();
    push_row(&mut out, &CSV_COLUMNS);
    for entry in entries {
        let context = entry.context().to_flat_json()?;
        push_row(
            &mut out,
            &[
                entry.timestamp(),
                entry.service(),
                entry.level().as_str(),
                entry.message(),
                &context,
            ],
        );
    }
    Ok(out)
}

fn push_row(out: &mut String, fields: &[&str]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&escape_field(field));
    }
    out.push_str("\r\n");
}

/// Quote only when the field needs it; embedded quotes are doubled.
pub fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Split CSV text into records. Handles quoted fields spanning separators,
/// doubled quotes and both `\n` and `\r\n` line endings.
pub fn parse_csv(text: &str) -> Result<Vec<Vec<String>>, String> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            _ => field.push(c),
        }
    }
    if in_quotes {
        return Err("unterminated quoted field".to_string());
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }
    Ok(records)
}

pub fn read_json(path: &Path) -> SimResult<Vec<LogEntry>> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

pub fn read_csv(path: &Path) -> SimResult<Vec<LogEntry>> {
    let text = fs::read_to_string(path)?;
    let malformed = |reason: String| SimError::MalformedCsv {
        path: path.to_path_buf(),
        reason,
    };

    let mut records = parse_csv(&text).map_err(malformed)?.into_iter();
    let header = records
        .next()
        .ok_or_else(|| malformed("missing header".to_string()))?;
    if header != CSV_COLUMNS {
        return Err(malformed(format!("unexpected header {:?}", header)));
    }

    let mut entries = Vec::new();
    for (i, row) in records.enumerate() {
        let [timestamp, service, level, message, context]: [String; 5] = row
            .try_into()
            .map_err(|r: Vec<String>| malformed(format!("row {}: {} fields", i + 1, r.len())))?;
        let level = level
            .parse()
            .map_err(|e| malformed(format!("row {}: {}", i + 1, e)))?;
        let context: LogContext = serde_json::from_str(&context)
            .map_err(|e| malformed(format!("row {}: context: {}", i + 1, e)))?;
        entries.push(LogEntry::new(timestamp, service, level, message, context));
    }
    Ok(entries)
}

pub fn read_batch(format: OutputFormat, path: &Path) -> SimResult<Vec<LogEntry>> {
    match format {
        OutputFormat::Json => read_json(path),
        OutputFormat::Csv => read_csv(path),
    }
}

pub fn file_sha256(path: &Path) -> SimResult<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}
