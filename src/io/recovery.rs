use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::io::storage::atomic_write;

/// Size past which the oldest entries are dropped on the next append (1 MB).
const MAX_LOG_SIZE: u64 = 1_048_576;

/// Default number of days before entries are prunable.
pub const PRUNE_AGE_DAYS: i64 = 30;

/// Header written at the top of a new recovery log.
const FILE_HEADER: &str = "\
<!-- ticklist recovery log: data the app could not load or save.
     View with: tick recovery
     Safe to delete. -->

---
";

/// Separator between timestamp and category in an entry header.
const HEADER_SEP: &str = " | ";

/// Category of a recovery entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryCategory {
    /// A persisted value that could not be parsed and was replaced
    Malformed,
    /// A write that failed; the body holds what should have been saved
    Write,
}

impl fmt::Display for RecoveryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryCategory::Malformed => write!(f, "malformed"),
            RecoveryCategory::Write => write!(f, "write"),
        }
    }
}

impl RecoveryCategory {
    pub fn parse_category(s: &str) -> Option<Self> {
        match s {
            "malformed" => Some(RecoveryCategory::Malformed),
            "write" => Some(RecoveryCategory::Write),
            _ => None,
        }
    }
}

/// A single entry in the recovery log.
#[derive(Debug, Clone)]
pub struct RecoveryEntry {
    pub timestamp: DateTime<Utc>,
    pub category: RecoveryCategory,
    pub description: String,
    pub fields: Vec<(String, String)>,
    pub body: String,
}

/// Return the path to the recovery log file.
pub fn recovery_log_path(data_dir: &Path) -> PathBuf {
    data_dir.join(".recovery.log")
}

impl RecoveryEntry {
    /// Entry for a stored value that could not be parsed
    pub fn malformed(key: &str, error: &str, raw: &str) -> Self {
        RecoveryEntry {
            timestamp: Utc::now(),
            category: RecoveryCategory::Malformed,
            description: format!("discarded unreadable {}", key),
            fields: vec![
                ("Key".to_string(), key.to_string()),
                ("Error".to_string(), error.to_string()),
            ],
            body: raw.to_string(),
        }
    }

    /// Entry for a value that could not be written
    pub fn failed_write(key: &str, error: &str, value: &str) -> Self {
        RecoveryEntry {
            timestamp: Utc::now(),
            category: RecoveryCategory::Write,
            description: format!("could not save {}", key),
            fields: vec![
                ("Key".to_string(), key.to_string()),
                ("Error".to_string(), error.to_string()),
            ],
            body: value.to_string(),
        }
    }

    /// Format this entry as a markdown block for the recovery log.
    fn to_markdown(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!(
            "## {}{}{}: {}\n",
            self.timestamp
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            HEADER_SEP,
            self.category,
            self.description,
        ));
        out.push('\n');

        for (key, value) in &self.fields {
            out.push_str(&format!("{}: {}\n", key, value));
        }

        if !self.body.is_empty() {
            out.push('\n');
            out.push_str("```text\n");
            out.push_str(&self.body);
            if !self.body.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("```\n");
        }

        out.push('\n');
        out.push_str("---\n");
        out
    }

    /// Format as human-readable markdown for display.
    pub fn to_display_markdown(&self) -> String {
        self.to_markdown()
    }

    /// Serialize to JSON value for `tick recovery --json`.
    pub fn to_json(&self) -> serde_json::Value {
        let fields: serde_json::Map<String, serde_json::Value> = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect();

        serde_json::json!({
            "timestamp": self.timestamp.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            "category": self.category.to_string(),
            "description": self.description,
            "fields": fields,
            "body": self.body,
        })
    }
}

// ---------------------------------------------------------------------------
// Appending
// ---------------------------------------------------------------------------

/// Append a recovery entry to the log. Failures are logged, never returned.
pub fn log_recovery(data_dir: &Path, entry: RecoveryEntry) {
    let category = entry.category;
    if let Err(e) = log_recovery_inner(data_dir, entry) {
        log::warn!(
            "event=recovery_append module=recovery status=error category={} error={}",
            category,
            e
        );
    }
}

fn log_recovery_inner(data_dir: &Path, entry: RecoveryEntry) -> io::Result<()> {
    let path = recovery_log_path(data_dir);

    if let Ok(meta) = fs::metadata(&path)
        && meta.len() > MAX_LOG_SIZE
    {
        let content = fs::read_to_string(&path)?;
        atomic_write(&path, trim_to_size(&content, MAX_LOG_SIZE as usize / 2).as_bytes())?;
    }

    let needs_header = fs::metadata(&path).map_or(true, |m| m.len() == 0);
    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    if needs_header {
        file.write_all(FILE_HEADER.as_bytes())?;
    }
    file.write_all(entry.to_markdown().as_bytes())?;
    Ok(())
}

/// Drop whole entries, oldest first, until the content fits in `max_len`.
fn trim_to_size(content: &str, max_len: usize) -> String {
    let (header, body) = split_header(content);
    let mut blocks = split_blocks(body);
    while !blocks.is_empty() && header.len() + blocks.iter().map(|b| b.len()).sum::<usize>() > max_len
    {
        blocks.remove(0);
    }
    let mut out = header.to_string();
    for block in blocks {
        out.push_str(&block);
    }
    out
}

/// Split the file header (through the first `---` line) from the entries.
fn split_header(content: &str) -> (&str, &str) {
    if !content.starts_with("<!--") {
        return ("", content);
    }
    match content.find("\n---\n") {
        Some(pos) => content.split_at(pos + "\n---\n".len()),
        None => ("", content),
    }
}

/// Split entry text into raw blocks, each starting at an `## ` header line.
/// Header-like lines inside a fenced body belong to that body.
fn split_blocks(body: &str) -> Vec<String> {
    let mut blocks: Vec<String> = Vec::new();
    let mut in_code_block = false;
    for line in body.lines() {
        if in_code_block {
            if line == "```" {
                in_code_block = false;
            }
        } else if line.starts_with("```") {
            in_code_block = true;
        }
        if (!in_code_block && line.starts_with("## ")) || blocks.is_empty() {
            blocks.push(String::new());
        }
        if let Some(last) = blocks.last_mut() {
            last.push_str(line);
            last.push('\n');
        }
    }
    blocks
}

// ---------------------------------------------------------------------------
// Reading entries
// ---------------------------------------------------------------------------

/// Read recovery entries, most recent first.
pub fn read_recovery_entries(data_dir: &Path, limit: Option<usize>) -> Vec<RecoveryEntry> {
    let content = match fs::read_to_string(recovery_log_path(data_dir)) {
        Ok(c) => c,
        Err(_) => return Vec::new(),
    };

    let mut entries = parse_entries(&content);
    if let Some(n) = limit {
        let skip = entries.len().saturating_sub(n);
        entries.drain(..skip);
    }
    entries.reverse();
    entries
}

/// Parse all entries from the log content, oldest first.
fn parse_entries(content: &str) -> Vec<RecoveryEntry> {
    let (_, body) = split_header(content);
    split_blocks(body)
        .iter()
        .filter_map(|block| parse_block(block))
        .collect()
}

fn parse_block(block: &str) -> Option<RecoveryEntry> {
    let mut lines = block.lines();
    let header = lines.next()?.strip_prefix("## ")?;
    let (timestamp, category, description) = parse_entry_header(header)?;

    let mut fields = Vec::new();
    let mut body_lines: Vec<&str> = Vec::new();
    let mut in_code_block = false;

    for line in lines {
        if in_code_block {
            if line == "```" {
                in_code_block = false;
            } else {
                body_lines.push(line);
            }
            continue;
        }
        if line == "---" {
            break;
        }
        if line.starts_with("```") {
            in_code_block = true;
            continue;
        }
        if let Some((key, value)) = line.trim().split_once(": ") {
            fields.push((key.to_string(), value.to_string()));
        }
    }

    Some(RecoveryEntry {
        timestamp,
        category,
        description,
        fields,
        body: body_lines.join("\n"),
    })
}

/// Parse an entry header: `<timestamp> | <category>: <description>`
fn parse_entry_header(header: &str) -> Option<(DateTime<Utc>, RecoveryCategory, String)> {
    let (timestamp_str, rest) = header.split_once(HEADER_SEP)?;
    let timestamp = DateTime::parse_from_rfc3339(timestamp_str)
        .ok()?
        .with_timezone(&Utc);
    let (category_str, description) = rest.split_once(": ")?;
    let category = RecoveryCategory::parse_category(category_str)?;
    Some((timestamp, category, description.to_string()))
}

// ---------------------------------------------------------------------------
// Pruning
// ---------------------------------------------------------------------------

/// Remove entries older than `PRUNE_AGE_DAYS` (or all of them).
/// Returns the number of entries removed.
pub fn prune_recovery(data_dir: &Path, all: bool) -> io::Result<usize> {
    let path = recovery_log_path(data_dir);
    if !path.exists() {
        return Ok(0);
    }
    let content = fs::read_to_string(&path)?;
    let (header, body) = split_header(&content);
    let blocks = split_blocks(body);
    let before = blocks.len();

    let cutoff = Utc::now() - chrono::Duration::days(PRUNE_AGE_DAYS);
    let kept: Vec<&String> = blocks
        .iter()
        .filter(|block| {
            !all && parse_block(block).is_some_and(|entry| entry.timestamp >= cutoff)
        })
        .collect();

    let header = if header.is_empty() { FILE_HEADER } else { header };
    let mut out = header.to_string();
    for block in &kept {
        out.push_str(block);
    }
    atomic_write(&path, out.as_bytes())?;
    Ok(before - kept.len())
}
