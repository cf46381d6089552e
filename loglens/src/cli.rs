//! loglens-cli - headless log analysis client
//!
//! Runs the same upload, question and export workflows as the TUI, one after
//! another, and prints the results.
//!
//! Uses XDG Base Directory specification for file locations:
//! - Config: $XDG_CONFIG_HOME/loglens/config.toml (~/.config/loglens/config.toml)
//! - Logs: $XDG_STATE_HOME/loglens/ (~/.local/state/loglens/)

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use loglens_core::format::{insight_lines, message_lines};
use loglens_core::{Config, HttpAnalysisService, Notice, NoticeLevel, Session};

#[derive(Parser)]
#[command(name = "loglens-cli")]
#[command(about = "Analyze a log file, ask questions, and export a report")]
#[command(version)]
struct Args {
    /// Verbose output (writes the log file)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Upload a log file and print its analysis
    Analyze {
        /// Log file to upload
        file: PathBuf,

        /// Question to ask after the upload (repeatable, asked in order)
        #[arg(short, long = "ask")]
        questions: Vec<String>,

        /// Export a report when done
        #[arg(short, long)]
        export: bool,

        /// Directory for the exported report (default: from config)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Show the resolved configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = Config::load().context("failed to load configuration")?;

    // Initialize logging if verbose
    let _log_guard = if args.verbose {
        Some(loglens_core::logging::init(&config.logging).context("failed to initialize logging")?)
    } else {
        None
    };

    match args.command {
        Command::Analyze {
            file,
            questions,
            export,
            out,
        } => {
            if out.is_some() {
                config.export.download_dir = out;
            }
            cmd_analyze(&config, file, &questions, export).await
        }
        Command::Config => cmd_config(&config),
    }
}

fn print_notices(notices: &[Notice]) {
    for notice in notices {
        match notice.level {
            NoticeLevel::Info => println!("{}", notice.message),
            NoticeLevel::Error => eprintln!("error: {}", notice.message),
        }
    }
}

fn has_error(notices: &[Notice]) -> bool {
    notices.iter().any(|n| n.level == NoticeLevel::Error)
}

async fn cmd_analyze(
    config: &Config,
    file: PathBuf,
    questions: &[String],
    export: bool,
) -> Result<()> {
    let service = HttpAnalysisService::new(&config.service)
        .context("failed to create analysis service client")?;
    let mut session = Session::new(Arc::new(service), config);

    session.select_file(file);
    if let Some(notice) = session.upload() {
        print_notices(&[notice]);
        bail!("upload did not start");
    }
    let notices = session.settle().await;
    print_notices(&notices);

    let Some(model) = session.state().insights() else {
        bail!("upload failed");
    };
    println!();
    for line in insight_lines(model) {
        println!("{}", line);
    }

    for question in questions {
        session.set_pending_question(question.as_str());
        if !session.submit_question() {
            eprintln!("skipping blank question");
            continue;
        }

        let before = session.state().conversation().len();
        let notices = session.settle().await;
        println!();
        println!("Q: {}", question);
        if session.state().conversation().len() > before {
            if let Some(answer) = session.state().conversation().last() {
                for line in message_lines(answer) {
                    println!("{}", line);
                }
            }
        }
        print_notices(&notices);
    }

    if export {
        session.export();
        let notices = session.settle().await;
        println!();
        print_notices(&notices);
        if has_error(&notices) {
            bail!("report export failed");
        }
    }

    Ok(())
}

fn cmd_config(config: &Config) -> Result<()> {
    println!("loglens Configuration");
    println!("=====================");
    println!();
    println!("Config file:     {}", Config::config_path().display());
    println!("Log dir:         {}", Config::state_dir().display());
    println!();
    println!("Service URL:     {}", config.service.base_url);
    println!("Timeout:         {}s", config.service.timeout_secs);
    println!("Wrapper key:     {}", config.service.wrapper_key);
    println!();
    println!("Download dir:    {}", config.export.download_dir().display());
    println!(
        "Fallback name:   {}_report.{}",
        config.export.fallback_name, config.export.extension
    );
    println!("Log level:       {}", config.logging.level);

    Ok(())
}
