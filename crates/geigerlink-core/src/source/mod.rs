mod jsonl;

pub use jsonl::{JsonLinesFileSource, TextSource};

use thiserror::Error;

/// One raw line of a JSON-lines uplink export.
#[derive(Debug, Clone)]
pub struct UplinkLine {
    /// 1-based line number in the input.
    pub line_no: u64,
    pub text: String,
}

pub trait UplinkSource {
    fn next_line(&mut self) -> Result<Option<UplinkLine>, SourceError>;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
