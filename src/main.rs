use clap::Parser;
use crossterm::{
    cursor::SetCursorStyle,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    io::{self, Read, Stdout},
    path::PathBuf,
    process,
    time::Duration,
};

use tt::{
    app::{App, AppOptions, MAX_LINE_LENGTH},
    config::Theme,
    logging,
    report::Results,
    resources::{self, ResourceKind},
    runtime::CrosstermEventSource,
    session::{SessionConfig, TICK_INTERVAL},
    source::{DataMode, DataSource, FileSource, QuoteSource, SegmentSource, WordSource},
    store::FileStore,
    typer::Typer,
    ui::{Highlight, Styles},
    TtResult,
};

const DEFAULT_WORD_LIST: &str = "1000en";

/// a terminal typing test
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "tt",
    version,
    about,
    long_about = "Type words, quotes, files or piped text in the terminal and get WPM, accuracy and the words you got wrong."
)]
pub struct Cli {
    /// file to type, one paragraph per test, resuming where the last run stopped
    file: Option<PathBuf>,

    /// number of words which constitute a group
    #[clap(short = 'n', value_name = "GROUPSZ", default_value_t = 50)]
    group_size: usize,

    /// number of groups which constitute a test
    #[clap(short = 'g', value_name = "NGROUPS", default_value_t = 1)]
    groups: usize,

    /// word list from which words are randomly drawn
    #[clap(long, value_name = "WORDFILE")]
    words: Option<String>,

    /// JSON file of quotes ([{"text": "foo", "attribution": "bar"}]) to draw from
    #[clap(long, value_name = "QUOTEFILE")]
    quotes: Option<String>,

    /// paragraph of the file to start at; 0 resets the progress
    #[clap(long, value_name = "PARAGRAPH")]
    start: Option<usize>,

    /// maximum line length in characters, ignored with --raw
    #[clap(short = 'w', value_name = "WIDTH", default_value_t = MAX_LINE_LENGTH)]
    max_line_length: usize,

    /// end the test after this many seconds
    #[clap(short = 't', value_name = "SECONDS")]
    time_limit: Option<u64>,

    /// display WPM whilst typing
    #[clap(long = "showwpm")]
    show_wpm: bool,

    /// skipped text is left out of mistakes and enter skips from anywhere in a word
    #[clap(long)]
    reader_mode: bool,

    /// disable word skipping with enter
    #[clap(long = "noskip")]
    no_skip: bool,

    /// disable the backspace key
    #[clap(long = "nobackspace")]
    no_backspace: bool,

    /// use the terminal's own colours
    #[clap(long = "notheme")]
    no_theme: bool,

    /// theme name or file
    #[clap(long, default_value = "default")]
    theme: String,

    /// keep the terminal's cursor shape
    #[clap(long = "blockcursor")]
    block_cursor: bool,

    /// embolden typed text
    #[clap(long)]
    bold: bool,

    /// disable current and next word highlighting
    #[clap(long = "nohighlight")]
    no_highlight: bool,

    /// only highlight the current word
    #[clap(long)]
    highlight1: bool,

    /// only highlight the next word
    #[clap(long)]
    highlight2: bool,

    /// exit after a single test
    #[clap(long)]
    oneshot: bool,

    /// don't show a report at the end of a test
    #[clap(long = "noreport")]
    no_report: bool,

    /// print results as [type],[wpm],[cpm],[accuracy],[timestamp] records
    #[clap(long)]
    csv: bool,

    /// print results as JSON
    #[clap(long)]
    json: bool,

    /// don't reflow piped text or show it one paragraph at a time
    #[clap(long)]
    raw: bool,

    /// treat each piped paragraph as a self contained test
    #[clap(long)]
    multi: bool,

    /// list the built in resources of a type
    #[clap(long, value_enum, value_name = "TYPE")]
    list: Option<ResourceKind>,
}

impl Cli {
    fn session_config(&self) -> SessionConfig {
        SessionConfig {
            reader_mode: self.reader_mode,
            show_wpm: self.show_wpm,
            disable_backspace: self.no_backspace,
            no_skip: self.no_skip,
            time_limit: self.time_limit.map(Duration::from_secs),
            tick_interval: TICK_INTERVAL,
        }
    }

    fn app_options(&self) -> AppOptions {
        AppOptions {
            raw: self.raw,
            max_line_length: self.max_line_length,
            oneshot: self.oneshot,
            no_report: self.no_report,
        }
    }

    fn data_mode(&self) -> DataMode {
        if self.raw {
            DataMode::Raw
        } else if self.multi {
            DataMode::Multi
        } else {
            DataMode::Paragraphs
        }
    }

    fn styles(&self) -> TtResult<Styles> {
        let highlight = Highlight::from_flags(self.no_highlight, self.highlight1, self.highlight2);
        if self.no_theme {
            Ok(Styles::new(&Theme::default(), true, highlight))
        } else {
            Ok(Styles::new(&Theme::load(&self.theme)?, self.bold, highlight))
        }
    }

    /// Words, quotes, piped text, a file, or the default word list, in that
    /// order of precedence.
    fn source(&self, stdin_is_tty: bool) -> TtResult<Box<dyn SegmentSource>> {
        if let Some(words) = &self.words {
            return Ok(Box::new(WordSource::load(words, self.group_size, self.groups)?));
        }
        if let Some(quotes) = &self.quotes {
            return Ok(Box::new(QuoteSource::load(quotes)?));
        }
        if !stdin_is_tty {
            let mut data = Vec::new();
            io::stdin().read_to_end(&mut data)?;
            return Ok(Box::new(DataSource::new(&data, self.data_mode())));
        }
        if let Some(file) = &self.file {
            return Ok(Box::new(FileSource::open(file, self.start, FileStore::new())?));
        }
        Ok(Box::new(WordSource::load(
            DEFAULT_WORD_LIST,
            self.group_size,
            self.groups,
        )?))
    }
}

fn main() {
    let cli = Cli::parse();
    let _log_guard = logging::init();

    match run(&cli) {
        Ok(code) => process::exit(code),
        Err(err) => {
            tracing::error!(%err, "exiting");
            eprintln!("ERROR: {err}");
            process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> TtResult<i32> {
    if let Some(kind) = cli.list {
        for name in resources::list(kind) {
            println!("{name}");
        }
        return Ok(0);
    }

    // everything that can fail on bad input fails before the screen is taken
    let source = cli.source(io::stdin().is_tty())?;
    let styles = cli.styles()?;
    let events = CrosstermEventSource::new()?;

    let terminal = setup_terminal(cli.block_cursor)?;
    let mut typer = Typer::new(terminal, events, cli.session_config(), styles);
    let mut app = App::new(source, cli.app_options()).with_store(FileStore::new());

    let exit = app.run(&mut typer);
    restore_terminal(typer.terminal_mut(), cli.block_cursor)?;
    let exit = exit?;

    if let Some(message) = &exit.message {
        println!("{message}");
    }
    export(app.results(), cli)?;
    Ok(exit.code)
}

fn setup_terminal(block_cursor: bool) -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    if !block_cursor {
        execute!(stdout, SetCursorStyle::BlinkingBar)?;
    }

    Terminal::new(CrosstermBackend::new(stdout))
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>, block_cursor: bool) -> io::Result<()> {
    disable_raw_mode()?;
    if !block_cursor {
        // the shape the user had cannot be queried, assume a block
        execute!(terminal.backend_mut(), SetCursorStyle::SteadyBlock)?;
    }
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}

fn export(results: &Results, cli: &Cli) -> TtResult<()> {
    if cli.json {
        results.write_json(io::stdout().lock())?;
    }
    if cli.csv {
        results.write_csv(io::stdout().lock())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tt::TtError;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["tt"]);

        assert_eq!(cli.group_size, 50);
        assert_eq!(cli.groups, 1);
        assert_eq!(cli.max_line_length, 540);
        assert_eq!(cli.time_limit, None);
        assert_eq!(cli.theme, "default");
        assert_eq!(cli.file, None);
        assert!(!cli.reader_mode);
        assert!(cli.list.is_none());
    }

    #[test]
    fn test_cli_word_mode() {
        let cli = Cli::parse_from(["tt", "-n", "10", "-g", "3", "--words", "1000en"]);
        assert_eq!(cli.group_size, 10);
        assert_eq!(cli.groups, 3);
        assert_eq!(cli.words.as_deref(), Some("1000en"));
    }

    #[test]
    fn test_cli_file_mode() {
        let cli = Cli::parse_from(["tt", "--start", "0", "book.txt"]);
        assert_eq!(cli.start, Some(0));
        assert_eq!(cli.file, Some(PathBuf::from("book.txt")));
    }

    #[test]
    fn test_cli_list() {
        let cli = Cli::parse_from(["tt", "--list", "themes"]);
        assert_eq!(cli.list, Some(ResourceKind::Themes));
        assert!(Cli::try_parse_from(["tt", "--list", "fonts"]).is_err());
    }

    #[test]
    fn test_session_config_from_flags() {
        let cli = Cli::parse_from(["tt", "-t", "30", "--showwpm", "--nobackspace", "--noskip", "--reader-mode"]);
        let config = cli.session_config();

        assert_eq!(config.time_limit, Some(Duration::from_secs(30)));
        assert!(config.show_wpm);
        assert!(config.disable_backspace);
        assert!(config.no_skip);
        assert!(config.reader_mode);
        assert_eq!(config.tick_interval, TICK_INTERVAL);
    }

    #[test]
    fn test_app_options_from_flags() {
        let cli = Cli::parse_from(["tt", "--raw", "--oneshot", "--noreport", "-w", "80"]);
        let options = cli.app_options();

        assert!(options.raw);
        assert!(options.oneshot);
        assert!(options.no_report);
        assert_eq!(options.max_line_length, 80);
    }

    #[test]
    fn test_data_mode_precedence() {
        assert_eq!(Cli::parse_from(["tt"]).data_mode(), DataMode::Paragraphs);
        assert_eq!(Cli::parse_from(["tt", "--multi"]).data_mode(), DataMode::Multi);
        assert_eq!(Cli::parse_from(["tt", "--raw", "--multi"]).data_mode(), DataMode::Raw);
    }

    #[test]
    fn test_unknown_theme_is_an_error() {
        let cli = Cli::parse_from(["tt", "--theme", "no-such-theme"]);
        assert_matches!(cli.styles(), Err(TtError::InvalidTheme(_)));
    }

    #[test]
    fn test_notheme_skips_theme_lookup() {
        let cli = Cli::parse_from(["tt", "--notheme", "--theme", "no-such-theme"]);
        assert!(cli.styles().is_ok());
    }

    #[test]
    fn test_words_take_precedence_over_file() {
        let cli = Cli::parse_from(["tt", "--words", "1000en", "missing-file.txt"]);
        assert!(cli.source(true).is_ok());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let cli = Cli::parse_from(["tt", "definitely/missing/file.txt"]);
        assert_matches!(cli.source(true).err(), Some(TtError::ReadSource { .. }));
    }
}
