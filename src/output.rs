//! Rendering of search results
//!
//! Line mode prints one path per line and nothing else, so it can be piped.
//! Table, CSV and JSON carry the size and modification time as well.

use std::io::Write;
use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Local, SecondsFormat};
use serde::{Deserialize, Serialize};

use crate::errors::FindResult;
use crate::finder::size::human_size;
use crate::finder::{Collected, FileEntry, SearchReport};

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One path per line
    #[default]
    Lines,
    /// Aligned columns with a title
    Table,
    /// `path,size,modified` rows with a header
    Csv,
    /// Array of `{path, size, modified}` objects
    Json,
}

/// How paths are printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PathStyle {
    /// Relative to the search root
    #[default]
    Relative,
    /// Absolute path of the entry
    Absolute,
}

/// One result row as written to CSV and JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub path: String,
    pub size: u64,
    pub modified: String,
}

/// Renders a [`SearchReport`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Formatter {
    format: OutputFormat,
    path_style: PathStyle,
}

impl Formatter {
    pub fn new(format: OutputFormat, path_style: PathStyle) -> Self {
        Self { format, path_style }
    }

    /// Write the report to `out`. A count-only report is a single integer
    /// whatever the format.
    pub fn write<W: Write>(&self, report: &SearchReport, out: &mut W) -> FindResult<()> {
        let entries = match &report.collected {
            Collected::Count(count) => {
                writeln!(out, "{count}")?;
                return Ok(());
            }
            Collected::Entries(entries) => entries,
        };

        match self.format {
            OutputFormat::Lines => self.write_lines(entries, &report.root, out),
            OutputFormat::Table => self.write_table(entries, &report.root, out),
            OutputFormat::Csv => self.write_csv(entries, &report.root, out),
            OutputFormat::Json => self.write_json(entries, &report.root, out),
        }
    }

    fn display_path(&self, entry: &FileEntry, root: &Path) -> String {
        match self.path_style {
            PathStyle::Absolute => entry.path().display().to_string(),
            PathStyle::Relative => entry.relative_to(root).display().to_string(),
        }
    }

    fn record(&self, entry: &FileEntry, root: &Path) -> Record {
        Record {
            path: self.display_path(entry, root),
            size: entry.size(),
            modified: iso_timestamp(entry.modified()),
        }
    }

    fn write_lines<W: Write>(&self, entries: &[FileEntry], root: &Path, out: &mut W) -> FindResult<()> {
        for entry in entries {
            writeln!(out, "{}", self.display_path(entry, root))?;
        }
        Ok(())
    }

    fn write_table<W: Write>(&self, entries: &[FileEntry], root: &Path, out: &mut W) -> FindResult<()> {
        let rows: Vec<(String, String, String)> = entries
            .iter()
            .map(|entry| {
                (
                    self.display_path(entry, root),
                    human_size(entry.size()),
                    table_timestamp(entry.modified()),
                )
            })
            .collect();

        let index_width = rows.len().to_string().len().max(1);
        let path_width = rows.iter().map(|r| r.0.chars().count()).max().unwrap_or(0).max(4);
        let size_width = rows.iter().map(|r| r.1.len()).max().unwrap_or(0).max(4);

        writeln!(out, "Matches in {}", root.display())?;
        writeln!(
            out,
            "{:>iw$}  {:<pw$}  {:>sw$}  Modified",
            "#",
            "Path",
            "Size",
            iw = index_width,
            pw = path_width,
            sw = size_width
        )?;
        writeln!(
            out,
            "{}",
            "-".repeat(index_width + path_width + size_width + 6 + "Modified".len().max(19))
        )?;
        for (i, (path, size, modified)) in rows.iter().enumerate() {
            writeln!(
                out,
                "{:>iw$}  {:<pw$}  {:>sw$}  {}",
                i + 1,
                path,
                size,
                modified,
                iw = index_width,
                pw = path_width,
                sw = size_width
            )?;
        }
        Ok(())
    }

    fn write_csv<W: Write>(&self, entries: &[FileEntry], root: &Path, out: &mut W) -> FindResult<()> {
        let mut wtr = csv::Writer::from_writer(out);
        if entries.is_empty() {
            wtr.write_record(["path", "size", "modified"])?;
        }
        for entry in entries {
            wtr.serialize(self.record(entry, root))?;
        }
        wtr.flush()?;
        Ok(())
    }

    fn write_json<W: Write>(&self, entries: &[FileEntry], root: &Path, out: &mut W) -> FindResult<()> {
        let records: Vec<Record> = entries.iter().map(|entry| self.record(entry, root)).collect();
        serde_json::to_writer_pretty(&mut *out, &records)?;
        writeln!(out)?;
        Ok(())
    }
}

/// RFC 3339 local time with second precision
pub fn iso_timestamp(time: SystemTime) -> String {
    DateTime::<Local>::from(time).to_rfc3339_opts(SecondsFormat::Secs, false)
}

fn table_timestamp(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finder::CollectStats;
    use std::path::PathBuf;
    use std::time::{Duration, UNIX_EPOCH};

    fn report(collected: Collected) -> SearchReport {
        SearchReport {
            root: PathBuf::from("/data"),
            collected,
            stats: CollectStats::default(),
        }
    }

    fn sample() -> Collected {
        let root = Path::new("/data");
        let modified = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        Collected::Entries(vec![
            FileEntry::new(root.join("docs/a,b.txt"), root, 2048, modified),
            FileEntry::new(root.join("z.bin"), root, 7, modified),
        ])
    }

    fn render(formatter: Formatter, collected: Collected) -> String {
        let mut out = Vec::new();
        formatter.write(&report(collected), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_lines_relative_and_absolute() {
        let text = render(Formatter::default(), sample());
        assert_eq!(text, "docs/a,b.txt\nz.bin\n");

        let text = render(
            Formatter::new(OutputFormat::Lines, PathStyle::Absolute),
            sample(),
        );
        assert_eq!(text, "/data/docs/a,b.txt\n/data/z.bin\n");
    }

    #[test]
    fn test_count_only_ignores_format() {
        for format in [OutputFormat::Lines, OutputFormat::Table, OutputFormat::Csv, OutputFormat::Json] {
            let text = render(Formatter::new(format, PathStyle::Relative), Collected::Count(42));
            assert_eq!(text, "42\n");
        }
    }

    #[test]
    fn test_csv_header_and_quoting() {
        let text = render(Formatter::new(OutputFormat::Csv, PathStyle::Relative), sample());
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("path,size,modified"));
        assert!(lines.next().unwrap().starts_with("\"docs/a,b.txt\",2048,"));
        assert!(lines.next().unwrap().starts_with("z.bin,7,"));
    }

    #[test]
    fn test_csv_empty_still_has_header() {
        let text = render(
            Formatter::new(OutputFormat::Csv, PathStyle::Relative),
            Collected::Entries(Vec::new()),
        );
        assert_eq!(text, "path,size,modified\n");
    }

    #[test]
    fn test_json_records() {
        let text = render(Formatter::new(OutputFormat::Json, PathStyle::Relative), sample());
        let records: Vec<Record> = serde_json::from_str(&text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].path, "docs/a,b.txt");
        assert_eq!(records[0].size, 2048);
        assert!(chrono::DateTime::parse_from_rfc3339(&records[0].modified).is_ok());
    }

    #[test]
    fn test_json_empty_array() {
        let text = render(
            Formatter::new(OutputFormat::Json, PathStyle::Relative),
            Collected::Entries(Vec::new()),
        );
        assert_eq!(text.trim(), "[]");
    }

    #[test]
    fn test_table_layout() {
        let text = render(Formatter::new(OutputFormat::Table, PathStyle::Relative), sample());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Matches in /data");
        assert!(lines[1].contains("Path") && lines[1].contains("Size"));
        assert!(lines[3].starts_with("1  docs/a,b.txt"));
        assert!(lines[3].contains("2.0KB"));
        assert!(lines[4].contains("7B"));
    }

    #[test]
    fn test_iso_timestamp_parses() {
        let stamp = iso_timestamp(UNIX_EPOCH + Duration::from_secs(86_400));
        let parsed = chrono::DateTime::parse_from_rfc3339(&stamp).unwrap();
        assert_eq!(parsed.timestamp(), 86_400);
    }
}
