use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::{SourceError, UplinkLine, UplinkSource};

/// Reads uplink lines from a JSON-lines file on disk.
pub struct JsonLinesFileSource {
    reader: BufReader<File>,
    line_no: u64,
}

impl JsonLinesFileSource {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        Ok(Self {
            reader: BufReader::new(file),
            line_no: 0,
        })
    }
}

impl UplinkSource for JsonLinesFileSource {
    fn next_line(&mut self) -> Result<Option<UplinkLine>, SourceError> {
        let mut raw = Vec::new();
        let read = self.reader.read_until(b'\n', &mut raw)?;
        if read == 0 {
            return Ok(None);
        }
        self.line_no += 1;
        // invalid UTF-8 becomes U+FFFD; the parser rejects the line later
        let text = String::from_utf8_lossy(&raw);
        Ok(Some(UplinkLine {
            line_no: self.line_no,
            text: text.trim_end_matches(['\r', '\n']).to_string(),
        }))
    }
}

/// Serves uplink lines from an in-memory string, e.g. an HTTP response body.
pub struct TextSource<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
}

impl<'a> TextSource<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().enumerate(),
        }
    }
}

impl UplinkSource for TextSource<'_> {
    fn next_line(&mut self) -> Result<Option<UplinkLine>, SourceError> {
        Ok(self.lines.next().map(|(idx, line)| UplinkLine {
            line_no: idx as u64 + 1,
            text: line.to_string(),
        }))
    }
}
