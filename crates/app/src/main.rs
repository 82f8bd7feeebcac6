use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use match_core::model::{
    Difficulty, ListId, ParseOptionError, QuizMode, SessionSetup, SessionToken,
};
use match_core::session::POINTS_PER_PAIR;
use match_core::{GameSignal, HintRequest, HintTicket};
use services::{
    ChatHintProvider, Clock, GameConfig, GameService, HintProvider, ReportStatus, ResultReporter,
    fetch_hint, load_catalog,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod board;

const FRAME: Duration = Duration::from_millis(50);

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidOption(ParseOptionError),
    InvalidSeed { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidOption(err) => write!(f, "{err}"),
            ArgsError::InvalidSeed { raw } => write!(f, "invalid --seed value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

impl From<ParseOptionError> for ArgsError {
    fn from(err: ParseOptionError) -> Self {
        Self::InvalidOption(err)
    }
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!(
        "  cargo run -p app -- --name <student> --class <class> [--list a|b|c|d] \
         [--mode translation|definition] [--difficulty easy|medium|hard] [--seed <n>] \
         [--catalog <path>]"
    );
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --list a --mode translation --difficulty easy");
    eprintln!();
    eprintln!("Commands while playing:");
    eprintln!("  <n>     flip card n");
    eprintln!("  hint    ask for a hint");
    eprintln!("  board   redraw the board");
    eprintln!("  new     deal a new game with the same options");
    eprintln!("  quit    leave");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  VOCAB_HINT_API_KEY, VOCAB_HINT_BASE_URL, VOCAB_HINT_MODEL,");
    eprintln!("  VOCAB_HINT_TIMEOUT_SECS, VOCAB_RESULT_URL, VOCAB_CATALOG, RUST_LOG");
}

struct Args {
    setup: SessionSetup,
    seed: Option<u64>,
    catalog: Option<PathBuf>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut name = String::new();
        let mut class = String::new();
        let mut list = ListId::ListA;
        let mut mode = QuizMode::default();
        let mut difficulty = Difficulty::Easy;
        let mut seed = None;
        let mut catalog = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--name" => name = require_value(args, "--name")?,
                "--class" => class = require_value(args, "--class")?,
                "--list" => list = require_value(args, "--list")?.parse()?,
                "--mode" => mode = require_value(args, "--mode")?.parse()?,
                "--difficulty" => difficulty = require_value(args, "--difficulty")?.parse()?,
                "--seed" => {
                    let value = require_value(args, "--seed")?;
                    let parsed: u64 = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidSeed { raw: value.clone() })?;
                    seed = Some(parsed);
                }
                "--catalog" => catalog = Some(PathBuf::from(require_value(args, "--catalog")?)),
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            setup: SessionSetup::new(name, class, list, mode, difficulty),
            seed,
            catalog,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Flip(usize),
    Hint,
    Board,
    New,
    Quit,
}

impl Command {
    /// Card numbers are 1-based on screen.
    fn from_line(line: &str) -> Option<Self> {
        let line = line.trim();
        if let Ok(number) = line.parse::<usize>() {
            return number.checked_sub(1).map(Self::Flip);
        }
        match line.to_ascii_lowercase().as_str() {
            "hint" | "h" => Some(Self::Hint),
            "board" | "b" | "" => Some(Self::Board),
            "new" | "n" => Some(Self::New),
            "quit" | "q" | "exit" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Results of background work, fed back into the game loop.
enum Outcome {
    Hint { request: HintRequest, text: String },
    Report {
        token: SessionToken,
        status: ReportStatus,
    },
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    init_tracing();
    let config = GameConfig::from_env()?;

    let catalog_path = args.catalog.or(config.catalog_path);
    let catalog = Arc::new(load_catalog(catalog_path.as_deref())?);
    let mut game = GameService::new(catalog, Clock::system())
        .with_reporter(ResultReporter::from_url(config.result_url));
    if let Some(seed) = args.seed {
        game = game.with_seed(seed);
    }
    let provider: Arc<dyn HintProvider> = Arc::new(ChatHintProvider::new(config.hint));
    let hint_timeout = config.hint_timeout;

    game.start(args.setup.clone())?;
    print!("{}", board::render(&game));

    let (tx, mut rx) = mpsc::unbounded_channel::<Outcome>();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut frame = tokio::time::interval(FRAME);
    let mut last_frame = Instant::now();
    let mut redraw = false;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match Command::from_line(&line) {
                    Some(Command::Flip(position)) => {
                        if !game.request_flip(position) {
                            println!("Card {} cannot be flipped now.", position + 1);
                        }
                    }
                    Some(Command::Hint) => match game.request_hint() {
                        HintTicket::Skipped => println!("No hint available right now."),
                        HintTicket::Fetch(request) => {
                            let provider = Arc::clone(&provider);
                            let tx = tx.clone();
                            tokio::spawn(async move {
                                let text =
                                    fetch_hint(provider.as_ref(), &request, hint_timeout).await;
                                let _ = tx.send(Outcome::Hint { request, text });
                            });
                            redraw = true;
                        }
                    },
                    Some(Command::Board) => redraw = true,
                    Some(Command::New) => {
                        game.start(args.setup.clone())?;
                        redraw = true;
                    }
                    Some(Command::Quit) => break,
                    None => println!("Type a card number, hint, board, new or quit."),
                }
            }
            _ = frame.tick() => {
                let now = Instant::now();
                game.advance(now - last_frame);
                last_frame = now;
            }
            Some(outcome) = rx.recv() => match outcome {
                Outcome::Hint { request, text } => {
                    game.finish_hint(&request, &text);
                }
                Outcome::Report { token, status } => {
                    game.record_report(token, status);
                    if game.session().token() == Some(token) {
                        println!("{}", game.report_status().label());
                    }
                }
            },
        }

        for signal in game.take_signals() {
            redraw = true;
            match signal {
                GameSignal::Mismatched => println!("Not a pair."),
                GameSignal::Matched(entry_id) => match game.word_family(&entry_id) {
                    Some(family) => println!("Match! +{POINTS_PER_PAIR}  Word family: {family}"),
                    None => println!("Match! +{POINTS_PER_PAIR}"),
                },
                GameSignal::Completed(summary) => {
                    if let Some(job) = game.dispatch_report(summary) {
                        let tx = tx.clone();
                        let token = job.token();
                        tokio::spawn(async move {
                            let status = job.run().await;
                            let _ = tx.send(Outcome::Report { token, status });
                        });
                    }
                }
                GameSignal::HintReady(_) | GameSignal::Flipped(_) => {}
            }
        }

        if redraw {
            print!("{}", board::render(&game));
            redraw = false;
        }
    }

    info!("leaving");
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
