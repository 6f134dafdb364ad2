// src/report.rs
// =============================================================================
// Renders link records for humans (a small block per link) or for machines
// (one pretty-printed JSON object per link).
//
// Both sinks write each record as soon as it arrives and flush, so results
// show up while slower links are still being retried.
// =============================================================================

use std::io::{self, Write};

use crate::checker::{LinkRecord, RecordSink};

// Prints the file header, skipped in JSON mode to keep stdout parseable
pub fn print_filepath<W: Write>(writer: &mut W, filepath: &str, as_json: bool) -> io::Result<()> {
    if !as_json {
        write!(writer, "Filepath: {filepath}\n\n")?;
    }
    Ok(())
}

/// Human-readable output, one block per record.
pub struct TableSink<W> {
    writer: W,
}

impl<W: Write> TableSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> RecordSink for TableSink<W> {
    fn deliver(&mut self, record: &LinkRecord) -> io::Result<()> {
        // 0 means no response ever came back; show a dash instead
        let status = match record.status_code {
            0 => "-".to_string(),
            code => code.to_string(),
        };
        let message = if record.message.is_empty() {
            "-"
        } else {
            record.message.as_str()
        };

        writeln!(self.writer, "- Location   : {}", record.location)?;
        writeln!(self.writer, "  Status Code: {status}")?;
        writeln!(self.writer, "  OK         : {}", record.ok)?;
        writeln!(self.writer, "  Message    : {message}")?;
        writeln!(self.writer, "  Attempt    : {}", record.attempt)?;
        writeln!(self.writer)?;
        self.writer.flush()
    }
}

/// JSON output, one pretty-printed object per record.
pub struct JsonSink<W> {
    writer: W,
}

impl<W: Write> JsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> RecordSink for JsonSink<W> {
    fn deliver(&mut self, record: &LinkRecord) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, record)?;
        writeln!(self.writer)?;
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(status_code: u16, ok: bool, message: &str) -> LinkRecord {
        LinkRecord {
            location: "https://example.com/docs".to_string(),
            status_code,
            ok,
            message: message.to_string(),
            attempt: 1,
        }
    }

    #[test]
    fn test_table_output() {
        let mut sink = TableSink::new(Vec::new());
        sink.deliver(&record(200, true, "OK")).unwrap();

        let output = String::from_utf8(sink.writer).unwrap();
        assert_eq!(
            output,
            "- Location   : https://example.com/docs\n\
             \x20 Status Code: 200\n\
             \x20 OK         : true\n\
             \x20 Message    : OK\n\
             \x20 Attempt    : 1\n\n"
        );
    }

    #[test]
    fn test_table_output_without_response() {
        let mut sink = TableSink::new(Vec::new());
        sink.deliver(&record(0, false, "")).unwrap();

        let output = String::from_utf8(sink.writer).unwrap();
        assert!(output.contains("  Status Code: -\n"));
        assert!(output.contains("  Message    : -\n"));
        assert!(output.contains("  OK         : false\n"));
    }

    #[test]
    fn test_json_output_is_one_object_per_record() {
        let mut sink = JsonSink::new(Vec::new());
        sink.deliver(&record(404, false, "Not Found")).unwrap();
        sink.deliver(&record(200, true, "OK")).unwrap();

        let output = String::from_utf8(sink.writer).unwrap();
        let values: Vec<serde_json::Value> = serde_json::Deserializer::from_str(&output)
            .into_iter::<serde_json::Value>()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0]["statusCode"], 404);
        assert_eq!(values[0]["message"], "Not Found");
        assert_eq!(values[1]["ok"], true);
    }

    #[test]
    fn test_filepath_header_skipped_for_json() {
        let mut out = Vec::new();
        print_filepath(&mut out, "README.md", true).unwrap();
        assert!(out.is_empty());

        print_filepath(&mut out, "README.md", false).unwrap();
        assert_eq!(out, b"Filepath: README.md\n\n");
    }
}
