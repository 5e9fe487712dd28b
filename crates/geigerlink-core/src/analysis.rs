use std::path::Path;

use thiserror::Error;
use tracing::{info, warn};

use crate::source::{JsonLinesFileSource, SourceError, TextSource, UplinkLine, UplinkSource};
use crate::uplink::parse_uplink_line;
use crate::{UplinkReport, make_stub_report};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

/// Build an uplink report from a TTN storage export on disk.
///
/// A missing or unreadable file is reported as `AnalysisError::Io`; failures
/// while reading lines come back as `AnalysisError::Source`.
pub fn analyze_uplink_file(path: &Path) -> Result<UplinkReport, AnalysisError> {
    let bytes = path.metadata()?.len();
    let source = JsonLinesFileSource::open(path)?;
    analyze_source(&path.display().to_string(), bytes, source)
}

/// Build an uplink report from an in-memory storage export.
///
/// # Examples
/// ```
/// use geigerlink_core::analyze_uplink_text;
///
/// let text = r#"{"result":{"received_at":"2021-03-05T12:00:00Z","uplink_message":{"frm_payload":"EAAAAAEA"}}}
/// garbage
/// "#;
/// let report = analyze_uplink_text("response", text)?;
/// assert_eq!(report.records.len(), 1);
/// assert_eq!(report.skipped, 1);
/// # Ok::<(), geigerlink_core::AnalysisError>(())
/// ```
pub fn analyze_uplink_text(label: &str, text: &str) -> Result<UplinkReport, AnalysisError> {
    analyze_source(label, text.len() as u64, TextSource::new(text))
}

pub fn analyze_source<S: UplinkSource>(
    label: &str,
    bytes: u64,
    mut source: S,
) -> Result<UplinkReport, AnalysisError> {
    let mut report = make_stub_report(label, bytes);

    while let Some(UplinkLine { line_no, text }) = source.next_line()? {
        match parse_uplink_line(&text) {
            Ok(Some(record)) => {
                if report
                    .latest_received_at
                    .is_none_or(|latest| latest < record.received_at)
                {
                    report.latest_received_at = Some(record.received_at);
                }
                report.records.push(record);
            }
            Ok(None) => {}
            Err(err) => {
                warn!(line = line_no, error = %err, "skipping uplink line");
                report.skipped += 1;
            }
        }
    }

    // stable: equal timestamps keep input order
    report.records.sort_by_key(|record| record.received_at);
    info!(
        input = label,
        records = report.records.len(),
        skipped = report.skipped,
        "uplink analysis complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::analyze_uplink_text;

    fn line(received_at: &str, frm_payload: &str) -> String {
        format!(
            r#"{{"result":{{"received_at":"{received_at}","uplink_message":{{"f_port":1,"frm_payload":"{frm_payload}"}}}}}}"#
        )
    }

    #[test]
    fn records_are_sorted_by_reception_time() {
        let text = [
            line("2021-03-05T12:00:10Z", "AQAAAAEA"),
            line("2021-03-05T12:00:00.15Z", "AgAAAAEA"),
            line("2021-03-05T12:00:00.1Z", "AwAAAAEA"),
        ]
        .join("\n");
        let report = analyze_uplink_text("mem", &text).unwrap();
        let cpms: Vec<_> = report.records.iter().map(|r| r.reading.cpm).collect();
        assert_eq!(cpms, vec![Some(3), Some(2), Some(1)]);
        assert_eq!(
            report.latest_received_at,
            Some(datetime!(2021-03-05 12:00:10 UTC))
        );
    }

    #[test]
    fn equal_timestamps_keep_input_order() {
        let text = [
            line("2021-03-05T12:00:00Z", "AgAAAAEA"),
            line("2021-03-05T12:00:00Z", "AQAAAAEA"),
        ]
        .join("\n");
        let report = analyze_uplink_text("mem", &text).unwrap();
        assert_eq!(report.records[0].reading.cpm, Some(2));
        assert_eq!(report.records[1].reading.cpm, Some(1));
    }

    #[test]
    fn unusable_lines_are_counted() {
        let text = format!(
            "\n{}\n{{}}\nnot json\n{}\n",
            line("2021-03-05T12:00:00Z", "AQAAAAEA"),
            line("2021-03-05T12:00:00Z", "AQAA"),
        );
        let report = analyze_uplink_text("mem", &text).unwrap();
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.skipped, 3);
        assert_eq!(report.input.path, "mem");
    }

    #[test]
    fn empty_input_yields_empty_report() {
        let report = analyze_uplink_text("mem", "").unwrap();
        assert!(report.records.is_empty());
        assert_eq!(report.skipped, 0);
        assert!(report.latest_received_at.is_none());
    }
}
