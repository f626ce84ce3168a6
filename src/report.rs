//! Test results: the report shown after each test and the CSV / JSON
//! export printed when the program ends.

use std::fmt::Write as _;
use std::io::Write;
use std::time::Duration;

use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::Serialize;

use crate::error::TtResult;
use crate::mistakes::Mistake;
use crate::typer::SessionOutcome;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestResult {
    pub wpm: u32,
    pub cpm: u32,
    pub accuracy: f64,
    /// Unix time in seconds.
    pub timestamp: i64,
    pub mistakes: Vec<Mistake>,
}

impl TestResult {
    pub fn from_outcome(outcome: &SessionOutcome, at: DateTime<Utc>) -> Self {
        Self {
            wpm: outcome.wpm(),
            cpm: outcome.cpm(),
            accuracy: outcome.accuracy(),
            timestamp: at.timestamp(),
            mistakes: outcome.mistakes.clone(),
        }
    }
}

/// Results of every completed test of this run of the program.
#[derive(Debug, Clone, Default)]
pub struct Results {
    results: Vec<TestResult>,
}

impl Results {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: TestResult) {
        self.results.push(result);
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TestResult> {
        self.results.iter()
    }

    /// One `test,wpm,cpm,accuracy,timestamp` record per result, each
    /// followed by a `mistake,word,typed` record per mistake.
    pub fn write_csv<W: Write>(&self, out: W) -> TtResult<()> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_writer(out);

        for result in &self.results {
            writer.write_record([
                "test".to_string(),
                result.wpm.to_string(),
                result.cpm.to_string(),
                format!("{:.2}", result.accuracy),
                result.timestamp.to_string(),
            ])?;
            for mistake in &result.mistakes {
                writer.write_record(["mistake", mistake.word.as_str(), mistake.typed.as_str()])?;
            }
        }

        writer.flush()?;
        Ok(())
    }

    /// All results as a JSON array.
    pub fn write_json<W: Write>(&self, out: W) -> TtResult<()> {
        serde_json::to_writer(out, &self.results)?;
        Ok(())
    }
}

/// What goes on the report screen besides the result itself.
#[derive(Debug, Clone, Default)]
pub struct ReportContext<'a> {
    /// Shown only for single-segment tests.
    pub attribution: Option<&'a str>,
    /// Where the text came from, see [`crate::source::SegmentSource::info`].
    pub source_info: Option<&'a str>,
    pub tests_completed: usize,
}

/// Text of the report screen.
pub fn report_text(result: &TestResult, outcome: &SessionOutcome, context: &ReportContext<'_>) -> String {
    let mut text = format!(
        "WPM: {:>9}\nCPM: {:>9}\nAccuracy:  {:.2}%",
        result.wpm, result.cpm, result.accuracy
    );

    if !result.mistakes.is_empty() {
        let words = result.mistakes.iter().map(|m| m.word.as_str()).join(", ");
        let _ = write!(text, "\nMistakes:    {words}");
    }
    if let Some(attribution) = context.attribution.filter(|a| !a.is_empty()) {
        let _ = write!(text, "\n\nAttribution: {attribution}");
    }
    if let Some(info) = context.source_info {
        let _ = write!(text, "\n{info}");
    }

    let _ = write!(
        text,
        "\n\nTests completed : {}\nCharacters      : {}\nDuration        : {}\n\nPress ESC to continue.",
        context.tests_completed,
        outcome.correct + outcome.errors,
        format_duration(outcome.duration),
    );
    text
}

fn format_duration(duration: Duration) -> String {
    format!("{:.2?}", duration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typer::ReturnCode;
    use chrono::TimeZone;

    fn outcome() -> SessionOutcome {
        SessionOutcome {
            errors: 10,
            correct: 240,
            duration: Duration::from_secs(60),
            return_code: ReturnCode::Completed,
            mistakes: vec![Mistake::new("cat", "cot"), Mistake::new("a,b", "a\"b")],
        }
    }

    fn result() -> TestResult {
        let at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        TestResult::from_outcome(&outcome(), at)
    }

    #[test]
    fn result_from_outcome() {
        let result = result();
        assert_eq!(result.cpm, 240);
        assert_eq!(result.wpm, 48);
        assert_eq!(result.accuracy, 96.0);
        assert_eq!(result.timestamp, 1_700_000_000);
    }

    #[test]
    fn zero_duration_gives_zero_rates() {
        let outcome = SessionOutcome::default();
        let result = TestResult::from_outcome(&outcome, Utc::now());
        assert_eq!((result.wpm, result.cpm), (0, 0));
        assert_eq!(result.accuracy, 0.0);
    }

    #[test]
    fn csv_export() {
        let mut results = Results::new();
        results.record(result());
        let mut out = Vec::new();
        results.write_csv(&mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "test,48,240,96.00,1700000000\nmistake,cat,cot\nmistake,\"a,b\",\"a\"\"b\"\n"
        );
    }

    #[test]
    fn json_export_always_has_mistake_array() {
        let mut results = Results::new();
        let mut clean = result();
        clean.mistakes.clear();
        results.record(clean);
        let mut out = Vec::new();
        results.write_json(&mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            r#"[{"wpm":48,"cpm":240,"accuracy":96.0,"timestamp":1700000000,"mistakes":[]}]"#
        );
    }

    #[test]
    fn empty_results_export_nothing() {
        let results = Results::new();
        let mut csv = Vec::new();
        results.write_csv(&mut csv).unwrap();
        assert!(csv.is_empty());

        let mut json = Vec::new();
        results.write_json(&mut json).unwrap();
        assert_eq!(json, b"[]");
    }

    #[test]
    fn report_lists_everything() {
        let context = ReportContext {
            attribution: Some("Someone"),
            source_info: Some("\nParagraph: 2/9\n\nFile: book.txt"),
            tests_completed: 3,
        };
        let text = report_text(&result(), &outcome(), &context);

        assert!(text.starts_with("WPM:        48\nCPM:       240\nAccuracy:  96.00%"));
        assert!(text.contains("Mistakes:    cat, a,b"));
        assert!(text.contains("Attribution: Someone"));
        assert!(text.contains("Paragraph: 2/9"));
        assert!(text.contains("Tests completed : 3"));
        assert!(text.contains("Characters      : 250"));
        assert!(text.contains("Duration        : 60.00s"));
        assert!(text.ends_with("Press ESC to continue."));
    }

    #[test]
    fn report_skips_empty_sections() {
        let mut clean = result();
        clean.mistakes.clear();
        let text = report_text(&clean, &outcome(), &ReportContext::default());
        assert!(!text.contains("Mistakes"));
        assert!(!text.contains("Attribution"));
    }
}
