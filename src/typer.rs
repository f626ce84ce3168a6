use std::time::{Duration, Instant};

use ratatui::{backend::Backend, layout::Rect, Terminal};

use crate::error::TtResult;
use crate::mistakes::Mistake;
use crate::runtime::{Action, RunId, Ticker, TtEvent, TtEventSource};
use crate::session::{SessionConfig, SessionState};
use crate::source::Segment;
use crate::stats::{self, Statistics};
use crate::typing_policy::{apply, Edit};
use crate::ui::{Styles, TextLayout, TypingView};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::Display)]
pub enum ReturnCode {
    /// Every character was reached, or the time ran out.
    #[default]
    Completed,
    /// Ctrl-C; the whole program should stop.
    Interrupted,
    EscapedOut,
    NavigatedNext,
    NavigatedPrevious,
    /// The terminal changed size; the caller reruns the text from scratch.
    ResizeRestarted,
}

/// Counts of one run, or the sum over the runs of a test.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionOutcome {
    pub errors: usize,
    pub correct: usize,
    pub duration: Duration,
    pub return_code: ReturnCode,
    pub mistakes: Vec<Mistake>,
}

impl SessionOutcome {
    fn completed(stats: Statistics) -> Self {
        Self {
            errors: stats.errors,
            correct: stats.correct,
            duration: stats.duration,
            return_code: ReturnCode::Completed,
            mistakes: stats.mistakes,
        }
    }

    /// A run that ended without statistics.
    fn ended(return_code: ReturnCode) -> Self {
        Self {
            return_code,
            ..Self::default()
        }
    }

    /// Add a later run to this total. The latest return code wins.
    pub fn absorb(&mut self, other: SessionOutcome) {
        self.errors += other.errors;
        self.correct += other.correct;
        self.duration += other.duration;
        self.return_code = other.return_code;
        self.mistakes.extend(other.mistakes);
    }

    pub fn is_completed(&self) -> bool {
        self.return_code == ReturnCode::Completed
    }

    pub fn wpm(&self) -> u32 {
        stats::wpm(self.correct, self.duration)
    }

    pub fn cpm(&self) -> u32 {
        stats::cpm(self.correct, self.duration)
    }

    pub fn accuracy(&self) -> f64 {
        stats::accuracy(self.correct, self.errors)
    }
}

/// Runs typing tests on a terminal, one segment at a time.
pub struct Typer<B: Backend, E: TtEventSource> {
    terminal: Terminal<B>,
    events: E,
    config: SessionConfig,
    styles: Styles,
    next_run: u64,
}

impl<B: Backend, E: TtEventSource> Typer<B, E> {
    pub fn new(terminal: Terminal<B>, events: E, config: SessionConfig, styles: Styles) -> Self {
        Self {
            terminal,
            events,
            config,
            styles,
            next_run: 0,
        }
    }

    pub fn styles(&self) -> &Styles {
        &self.styles
    }

    pub fn events(&self) -> &E {
        &self.events
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }

    /// Type `segments` back to back as one test.
    ///
    /// The clock of the first segment starts with the first key press, later
    /// segments start right away. The time limit covers the whole test. Any
    /// run that does not complete ends the test with its return code.
    pub fn start(&mut self, segments: &[Segment]) -> TtResult<SessionOutcome> {
        let mut total = SessionOutcome::default();
        let mut time_left = self.config.time_limit;

        for (i, segment) in segments.iter().enumerate() {
            let outcome = self.run_segment(&segment.text, time_left, i > 0, &segment.attribution)?;
            let duration = outcome.duration;
            total.absorb(outcome);

            if let Some(left) = time_left.as_mut() {
                *left = left.saturating_sub(duration);
                if left.is_zero() {
                    break;
                }
            }
            if !total.is_completed() {
                break;
            }
        }

        tracing::info!(
            return_code = %total.return_code,
            correct = total.correct,
            errors = total.errors,
            duration_ms = total.duration.as_millis() as u64,
            "test finished"
        );
        Ok(total)
    }

    /// Run one segment until it reaches a terminal state.
    pub fn run_segment(
        &mut self,
        text: &str,
        time_limit: Option<Duration>,
        start_immediately: bool,
        attribution: &str,
    ) -> TtResult<SessionOutcome> {
        let run = RunId(self.next_run);
        self.next_run += 1;

        let mut state = SessionState::new(text);
        if start_immediately {
            state.start(Instant::now());
        }
        if state.is_complete() {
            return Ok(self.finish(&state));
        }

        let size = self.terminal.size()?;
        let layout = TextLayout::centered(text, Rect::new(0, 0, size.width, size.height));

        // cancelled and joined when dropped, before the next run can start
        let _ticker = Ticker::spawn(self.events.waker(), self.config.tick_interval, run)?;
        tracing::debug!(run = run.0, chars = state.len(), ?time_limit, "segment started");

        self.terminal.clear()?;
        loop {
            self.draw(&state, layout, attribution, time_limit)?;

            let Some(event) = self.events.recv() else {
                tracing::warn!(run = run.0, "event source closed");
                return Ok(SessionOutcome::ended(ReturnCode::Interrupted));
            };

            match event {
                TtEvent::Resize => return Ok(SessionOutcome::ended(ReturnCode::ResizeRestarted)),
                TtEvent::Tick(id) if id != run => {
                    tracing::trace!(run = run.0, stale = id.0, "ignoring stale tick");
                }
                TtEvent::Tick(_) => {
                    let timed_out = time_limit
                        .is_some_and(|limit| state.has_started() && state.elapsed(Instant::now()) >= limit);
                    if timed_out {
                        tracing::debug!(run = run.0, "time limit reached");
                        return Ok(self.finish(&state));
                    }
                }
                TtEvent::Key(key) => {
                    let Some(action) = Action::from_key(&key) else {
                        continue;
                    };
                    if action != Action::Redraw {
                        state.start(Instant::now());
                    }

                    let edit = match action {
                        Action::Interrupt => return Ok(SessionOutcome::ended(ReturnCode::Interrupted)),
                        Action::Escape => return Ok(SessionOutcome::ended(ReturnCode::EscapedOut)),
                        Action::Next => return Ok(SessionOutcome::ended(ReturnCode::NavigatedNext)),
                        Action::Previous => return Ok(SessionOutcome::ended(ReturnCode::NavigatedPrevious)),
                        Action::Redraw => {
                            self.terminal.clear()?;
                            continue;
                        }
                        Action::Type(c) => Edit::Write(c),
                        Action::Confirm => Edit::SkipWord,
                        Action::Backspace => Edit::Backspace,
                        Action::DeleteWord => Edit::DeleteWord,
                    };
                    apply(&mut state, edit, &self.config);

                    if state.is_complete() {
                        return Ok(self.finish(&state));
                    }
                }
            }
        }
    }

    fn finish(&self, state: &SessionState) -> SessionOutcome {
        SessionOutcome::completed(stats::calculate(state, self.config.reader_mode, Instant::now()))
    }

    fn draw(
        &mut self,
        state: &SessionState,
        layout: TextLayout,
        attribution: &str,
        time_limit: Option<Duration>,
    ) -> TtResult<()> {
        let view = TypingView {
            state,
            layout,
            attribution,
            time_limit,
            show_wpm: self.config.show_wpm,
            reader_mode: self.config.reader_mode,
            styles: &self.styles,
            now: Instant::now(),
        };

        self.terminal.draw(|frame| {
            let area = frame.area();
            frame.render_widget(&view, area);
            if let Some(position) = view.cursor(area) {
                frame.set_cursor_position(position);
            }
        })?;
        Ok(())
    }
}
