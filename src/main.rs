use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
#[cfg(not(feature = "network"))]
use tracing::warn;
use tracing::debug;
#[cfg(feature = "network")]
use tracing::info;
use tracing_subscriber::EnvFilter;

use paratype::config::Config;
use paratype::corpus::{
    CorpusChooser, CorpusError, CorpusService, CorpusWorker, FixedText, ParagraphSource,
};
use paratype::session::{TypingSession, WordOutcome, check_word};
use paratype::store::RecordStore;

#[derive(Parser)]
#[command(name = "paratype", version, about = "Typing practice over a rotating corpus of sample files")]
struct Cli {
    #[arg(short, long, help = "Config file (default: <config dir>/paratype/config.toml)")]
    config: Option<PathBuf>,

    #[arg(short, long, help = "Directory of sample files to rotate through")]
    samples: Option<PathBuf>,

    #[arg(short, long, help = "Record file holding rotation progress")]
    records: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the next chunk of the corpus and print it
    Next,
    /// Show per-file rotation progress
    Status,
    /// Type paragraphs word by word, one line of input at a time
    Practice {
        #[arg(short, long, help = "Practice on this text instead of the corpus")]
        text: Option<String>,
    },
    /// Write the effective configuration to the config file
    InitConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let mut config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {err:#}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(samples) = cli.samples {
        config.sample_dir = samples;
    }
    if let Some(records) = cli.records {
        config.record_path = records;
    }

    init_logging(&config);

    match run(cli.command, &config, &config_path) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(command: Command, config: &Config, config_path: &Path) -> Result<ExitCode> {
    match command {
        Command::Next => cmd_next(config),
        Command::Status => cmd_status(config),
        Command::Practice { text } => cmd_practice(config, text),
        Command::InitConfig => {
            config.save_to(config_path)?;
            println!("wrote {}", config_path.display());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn open_service(config: &Config) -> Result<CorpusService> {
    let chooser = CorpusChooser::new(&config.sample_dir).with_chunk_lines(config.chunk_lines);
    let store = RecordStore::new(&config.record_path);
    CorpusService::open(chooser, store)
        .with_context(|| format!("opening records {}", config.record_path.display()))
}

fn cmd_next(config: &Config) -> Result<ExitCode> {
    let mut service = open_service(config)?;
    match service.next_chunk() {
        Ok(chunk) => {
            print!("{chunk}");
            if !chunk.ends_with('\n') {
                println!();
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(CorpusError::Exhausted) => {
            eprintln!("every sample file has been served");
            Ok(ExitCode::from(2))
        }
        Err(e) => Err(e.into()),
    }
}

fn cmd_status(config: &Config) -> Result<ExitCode> {
    let store = RecordStore::new(&config.record_path);
    let corpus = store.load()?;
    if corpus.records.is_empty() {
        println!("no files served yet");
        return Ok(ExitCode::SUCCESS);
    }

    let width = corpus
        .records
        .iter()
        .map(|r| r.file.len())
        .max()
        .unwrap_or(0);
    for record in &corpus.records {
        let state = if record.finished { "finished" } else { "active" };
        let served = record
            .last_served
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<width$}  line {:>6}  {:<8}  {}",
            record.file, record.line, state, served
        );
    }
    println!(
        "{} of {} files finished",
        corpus.finished_count(),
        corpus.records.len()
    );
    Ok(ExitCode::SUCCESS)
}

fn paragraph_source(config: &Config, text: Option<String>) -> Result<Box<dyn ParagraphSource>> {
    if let Some(text) = text {
        return Ok(Box::new(FixedText::new(text)));
    }
    if let Some(remote) = remote_source(config)? {
        return Ok(remote);
    }

    let (_worker, handle) = CorpusWorker::spawn(open_service(config)?);
    Ok(Box::new(handle))
}

#[cfg(feature = "network")]
fn remote_source(config: &Config) -> Result<Option<Box<dyn ParagraphSource>>> {
    let Some(url) = &config.source_url else {
        return Ok(None);
    };
    info!(%url, "using remote paragraph source");
    let source: Box<dyn ParagraphSource> =
        Box::new(paratype::corpus::remote::RemoteSource::new(url.clone())?);
    Ok(Some(source))
}

#[cfg(not(feature = "network"))]
fn remote_source(config: &Config) -> Result<Option<Box<dyn ParagraphSource>>> {
    if let Some(url) = &config.source_url {
        warn!(%url, "built without network support, ignoring source_url");
    }
    Ok(None)
}

fn cmd_practice(config: &Config, text: Option<String>) -> Result<ExitCode> {
    let mut source = paragraph_source(config, text)?;
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut stdout = io::stdout();
    let mut session = TypingSession::default();

    loop {
        if let Err(e) = session.init(source.as_mut()) {
            if e.is_exhausted() {
                println!("nothing left to practice");
                return Ok(ExitCode::SUCCESS);
            }
            return Err(e.into());
        }
        if session.word_count() == 0 {
            debug!("skipping paragraph without words");
            continue;
        }

        println!("{}\n", session.paragraph());
        let started = Instant::now();

        while !session.is_done() {
            let current = session.current_word().unwrap_or_default();
            let marker = if session.is_mistyped() { "!" } else { ">" };
            write!(
                stdout,
                "[{}/{}] {marker} {current}: ",
                session.count_done_words() + 1,
                session.word_count()
            )?;
            stdout.flush()?;

            let Some(line) = lines.next() else {
                println!();
                return Ok(ExitCode::SUCCESS);
            };
            let line = line?;

            for typed in line.split_whitespace() {
                match check_word(&mut session, typed) {
                    WordOutcome::Advanced | WordOutcome::Partial => {}
                    WordOutcome::Mistyped => {
                        println!("  mistyped {typed:?}");
                        break;
                    }
                    WordOutcome::Completed | WordOutcome::Inactive => break,
                }
            }
        }

        let chars = session.chars_upto_current()
            + session.current_word().map_or(0, |w| w.chars().count());
        let minutes = started.elapsed().as_secs_f64() / 60.0;
        let wpm = if minutes > 0.0 {
            (chars as f64 / 5.0) / minutes
        } else {
            0.0
        };
        println!("\ndone: {} words, {wpm:.1} wpm\n", session.word_count());
    }
}
