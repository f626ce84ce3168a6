use chrono::Utc;
use ratatui::backend::Backend;

use crate::error::TtResult;
use crate::report::{report_text, ReportContext, Results, TestResult};
use crate::runtime::{Action, TtEvent, TtEventSource};
use crate::source::{Segment, SegmentSource};
use crate::store::{save_mistakes, FileStore};
use crate::text::{reflow, reflow_width};
use crate::typer::{ReturnCode, SessionOutcome, Typer};
use crate::ui::report::ReportView;

/// Default maximum line length when reflowing text.
pub const MAX_LINE_LENGTH: usize = 540;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppOptions {
    /// Type the text exactly as the source produced it, without reflowing.
    pub raw: bool,
    pub max_line_length: usize,
    /// Stop after the first completed test.
    pub oneshot: bool,
    pub no_report: bool,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            raw: false,
            max_line_length: MAX_LINE_LENGTH,
            oneshot: false,
            no_report: false,
        }
    }
}

/// How the program should end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exit {
    pub code: i32,
    /// Printed to stdout once the terminal is restored.
    pub message: Option<String>,
}

impl Exit {
    fn code(code: i32) -> Self {
        Self { code, message: None }
    }
}

/// Walks through the tests of a source, keeping every batch fetched so far
/// so the user can go back to earlier ones.
pub struct App<S: SegmentSource> {
    source: S,
    options: AppOptions,
    results: Results,
    store: Option<FileStore>,
    batches: Vec<Option<Vec<Segment>>>,
    index: usize,
}

impl<S: SegmentSource> App<S> {
    pub fn new(source: S, options: AppOptions) -> Self {
        Self {
            source,
            options,
            results: Results::new(),
            store: None,
            batches: Vec::new(),
            index: 0,
        }
    }

    /// Append the mistakes of every completed test to `store`.
    pub fn with_store(mut self, store: FileStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn results(&self) -> &Results {
        &self.results
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn run<B: Backend, E: TtEventSource>(&mut self, typer: &mut Typer<B, E>) -> TtResult<Exit> {
        loop {
            if self.index >= self.batches.len() {
                // a batch with nothing to type would complete without a key press
                let batch = self.source.next_batch()?.filter(|batch| has_text(batch));
                self.batches.push(batch);
            }

            let Some(batch) = self.batches[self.index].clone() else {
                tracing::info!(index = self.index, "source exhausted");
                return Ok(Exit {
                    code: 0,
                    message: Some(format!("No text found on index {}", self.index)),
                });
            };

            let batch = if self.options.raw {
                batch
            } else {
                let width = reflow_width(self.options.max_line_length, typer.terminal().size()?.width.into());
                batch
                    .into_iter()
                    .map(|segment| Segment {
                        text: reflow(&segment.text, width),
                        ..segment
                    })
                    .collect()
            };

            let outcome = typer.start(&batch)?;
            tracing::debug!(index = self.index, return_code = %outcome.return_code, "test ended");

            match outcome.return_code {
                ReturnCode::Completed => {
                    if !self.complete(typer, &batch, &outcome)? {
                        return Ok(Exit::code(1));
                    }
                    if self.options.oneshot {
                        return Ok(Exit::code(0));
                    }
                    self.index += 1;
                }
                ReturnCode::NavigatedNext => self.index += 1,
                ReturnCode::NavigatedPrevious => self.index = self.index.saturating_sub(1),
                // rerun the same test, rewrapped for the new size if need be
                ReturnCode::EscapedOut | ReturnCode::ResizeRestarted => {}
                ReturnCode::Interrupted => return Ok(Exit::code(1)),
            }
        }
    }

    /// Record a completed test and show its report. Returns `false` when the
    /// user interrupted from the report screen.
    fn complete<B: Backend, E: TtEventSource>(
        &mut self,
        typer: &mut Typer<B, E>,
        batch: &[Segment],
        outcome: &SessionOutcome,
    ) -> TtResult<bool> {
        let result = TestResult::from_outcome(outcome, Utc::now());
        self.results.record(result.clone());

        if let Some(store) = &self.store {
            if !outcome.mistakes.is_empty() {
                if let Err(err) = save_mistakes(store, &outcome.mistakes) {
                    tracing::warn!(%err, "failed to save mistakes");
                }
            }
        }

        if self.options.no_report {
            return Ok(true);
        }

        let info = self.source.info();
        let context = ReportContext {
            attribution: match batch {
                [single] => Some(single.attribution.as_str()),
                _ => None,
            },
            source_info: info.as_deref(),
            tests_completed: self.results.len(),
        };
        let text = report_text(&result, outcome, &context);
        show_report(typer, &text)
    }
}

fn has_text(batch: &[Segment]) -> bool {
    batch
        .iter()
        .any(|segment| segment.text.chars().any(|c| !c.is_whitespace()))
}

/// Show `text` until Esc (`true`) or Ctrl-C (`false`) is pressed.
fn show_report<B: Backend, E: TtEventSource>(typer: &mut Typer<B, E>, text: &str) -> TtResult<bool> {
    let view = ReportView {
        text,
        style: typer.styles().default,
    };

    loop {
        typer.terminal_mut().draw(|frame| frame.render_widget(&view, frame.area()))?;

        match typer.events().recv() {
            None => return Ok(false),
            Some(TtEvent::Key(key)) => match Action::from_key(&key) {
                Some(Action::Escape) => return Ok(true),
                Some(Action::Interrupt) => return Ok(false),
                _ => {}
            },
            Some(TtEvent::Resize) | Some(TtEvent::Tick(_)) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Theme;
    use crate::runtime::TestEventSource;
    use crate::session::SessionConfig;
    use crate::source::{DataMode, DataSource, WordSource};
    use crate::ui::{Highlight, Styles};
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};

    /// Serves the given batches, then runs dry.
    struct Scripted(std::vec::IntoIter<Vec<Segment>>);

    impl Scripted {
        fn new(texts: &[&str]) -> Self {
            let batches: Vec<Vec<Segment>> = texts
                .iter()
                .enumerate()
                .map(|(i, t)| vec![Segment::new(*t, "", i as i64)])
                .collect();
            Self(batches.into_iter())
        }
    }

    impl SegmentSource for Scripted {
        fn next_batch(&mut self) -> TtResult<Option<Vec<Segment>>> {
            Ok(self.0.next())
        }
    }

    fn typer() -> Typer<TestBackend, TestEventSource> {
        let terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        let styles = Styles::new(&Theme::default(), true, Highlight::Both);
        Typer::new(terminal, TestEventSource::new(), SessionConfig::default(), styles)
    }

    fn quiet() -> AppOptions {
        AppOptions {
            no_report: true,
            ..AppOptions::default()
        }
    }

    #[test]
    fn completes_every_batch_then_reports_exhaustion() {
        let mut typer = typer();
        let mut app = App::new(Scripted::new(&["ab", "cd"]), quiet());
        typer.events().type_str("abcd");

        let exit = app.run(&mut typer).unwrap();
        assert_eq!(exit.code, 0);
        assert_eq!(exit.message.as_deref(), Some("No text found on index 2"));
        assert_eq!(app.results().len(), 2);
    }

    #[test]
    fn oneshot_stops_after_first_test() {
        let mut typer = typer();
        let options = AppOptions {
            oneshot: true,
            ..quiet()
        };
        let mut app = App::new(Scripted::new(&["ab", "cd"]), options);
        typer.events().type_str("ab");

        assert_eq!(app.run(&mut typer).unwrap(), Exit::code(0));
        assert_eq!(app.results().len(), 1);
    }

    #[test]
    fn interrupt_exits_with_failure() {
        let mut typer = typer();
        let mut app = App::new(Scripted::new(&["ab"]), quiet());
        typer.events().key_with(KeyCode::Char('c'), KeyModifiers::CONTROL);

        assert_eq!(app.run(&mut typer).unwrap(), Exit::code(1));
        assert!(app.results().is_empty());
    }

    #[test]
    fn navigation_moves_between_cached_batches() {
        let mut typer = typer();
        let options = AppOptions {
            oneshot: true,
            ..quiet()
        };
        let mut app = App::new(Scripted::new(&["ab", "cd"]), options);
        let events = typer.events();
        events.key(KeyCode::Right);
        events.key(KeyCode::Left);
        events.key(KeyCode::Left);
        events.type_str("ab");

        assert_eq!(app.run(&mut typer).unwrap(), Exit::code(0));
        assert_eq!(app.index(), 0);
        assert_eq!(app.batches.len(), 2);
    }

    #[test]
    fn escape_reruns_the_same_test() {
        let mut typer = typer();
        let options = AppOptions {
            oneshot: true,
            ..quiet()
        };
        let mut app = App::new(Scripted::new(&["ab", "cd"]), options);
        typer.events().type_str("a");
        typer.events().key(KeyCode::Esc);
        typer.events().type_str("ab");

        assert_eq!(app.run(&mut typer).unwrap(), Exit::code(0));
        assert_eq!(app.batches.len(), 1);
        assert_eq!(app.results().iter().next().map(|r| r.accuracy), Some(100.0));
    }

    #[test]
    fn report_waits_for_escape() {
        let mut typer = typer();
        let options = AppOptions {
            oneshot: true,
            ..AppOptions::default()
        };
        let mut app = App::new(Scripted::new(&["ab"]), options);
        typer.events().type_str("ab");
        typer.events().type_str("zz");
        typer.events().key(KeyCode::Esc);

        assert_eq!(app.run(&mut typer).unwrap(), Exit::code(0));
    }

    #[test]
    fn interrupt_on_report_exits_with_failure() {
        let mut typer = typer();
        let mut app = App::new(Scripted::new(&["ab", "cd"]), AppOptions::default());
        typer.events().type_str("ab");
        typer.events().key_with(KeyCode::Char('c'), KeyModifiers::CONTROL);

        assert_eq!(app.run(&mut typer).unwrap(), Exit::code(1));
        assert_eq!(app.results().len(), 1);
    }

    #[test]
    fn mistakes_are_saved_to_the_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::with_path(dir.path());
        let mut typer = typer();
        let options = AppOptions {
            oneshot: true,
            ..quiet()
        };
        let mut app = App::new(Scripted::new(&["cat"]), options).with_store(store.clone());
        typer.events().type_str("cot");

        app.run(&mut typer).unwrap();
        let saved: Vec<crate::mistakes::Mistake> = store.read(crate::store::MISTAKE_DB).unwrap();
        assert_eq!(saved, vec![crate::mistakes::Mistake::new("cat", "cot")]);
    }

    #[test]
    fn text_is_reflowed_unless_raw() {
        let mut typer = typer();
        let options = AppOptions {
            oneshot: true,
            ..quiet()
        };
        let mut app = App::new(Scripted::new(&["a   b"]), options);
        typer.events().type_str("a b");
        assert_eq!(app.run(&mut typer).unwrap(), Exit::code(0));
    }

    #[test]
    fn blank_input_ends_without_running_a_test() {
        let mut typer = typer();
        let mut app = App::new(DataSource::new(b"\n", DataMode::Paragraphs), quiet());

        let exit = app.run(&mut typer).unwrap();
        assert_eq!(exit.code, 0);
        assert_eq!(exit.message.as_deref(), Some("No text found on index 0"));
        assert!(app.results().is_empty());
    }

    #[test]
    fn whitespace_only_raw_input_ends_without_running_a_test() {
        let mut typer = typer();
        let options = AppOptions {
            raw: true,
            ..quiet()
        };
        let mut app = App::new(DataSource::new(b" \n\n  ", DataMode::Raw), options);

        assert_eq!(app.run(&mut typer).unwrap().code, 0);
        assert!(app.results().is_empty());
    }

    #[test]
    fn empty_word_groups_end_without_running_a_test() {
        let mut typer = typer();
        let source = WordSource::new(vec!["word".to_string()], 0, 2).unwrap();
        let mut app = App::new(source, quiet());

        assert_eq!(app.run(&mut typer).unwrap().code, 0);
        assert!(app.results().is_empty());
    }
}
