//! sanetap CLI - block rendering and Singer stream extraction

use std::fs;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;

use sanetap::{
    blocks_from_json, render, JsonSource, RenderOptions, RenderStats, State, StreamKind, Tap,
    TapConfig,
};

#[derive(Parser)]
#[command(name = "sanetap")]
#[command(version)]
#[command(about = "Render node block content to Markdown and emit Singer streams", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render JSON lists of block groups (or node rows) to Markdown
    #[command(alias = "md")]
    Render {
        /// Input JSON files, rendered in order
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Print rendering statistics (totalled over all inputs) to stderr
        #[arg(long)]
        stats: bool,

        /// Base URL for stored file keys
        #[arg(long, value_name = "URL", env = "SANETAP_FILE_BASE_URL")]
        file_base_url: Option<String>,
    },

    /// Emit SCHEMA, RECORD and STATE messages for the configured streams
    Sync {
        /// Tap config file
        #[arg(short, long, value_name = "FILE")]
        config: PathBuf,

        /// JSON dump of query rows keyed by stream name
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// State file with bookmarks from a previous run
        #[arg(short, long, value_name = "FILE")]
        state: Option<PathBuf>,
    },

    /// List available streams
    Streams,

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Render {
            inputs,
            output,
            stats,
            file_base_url,
        }) => cmd_render(&inputs, output.as_deref(), stats, file_base_url),
        Some(Commands::Sync {
            config,
            input,
            state,
        }) => cmd_sync(&config, &input, state.as_deref()),
        Some(Commands::Streams) => {
            cmd_streams();
            Ok(())
        }
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: sanetap <COMMAND>".yellow());
            println!("       sanetap --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_render(
    inputs: &[PathBuf],
    output: Option<&Path>,
    stats: bool,
    file_base_url: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = RenderOptions::new();
    if let Some(url) = file_base_url {
        options = options.with_file_base_url(url);
    }

    let mut documents = Vec::with_capacity(inputs.len());
    let mut total = RenderStats::new();
    for input in inputs {
        let data = fs::read_to_string(input)?;
        let groups = blocks_from_json(&data)?;
        let result = render::to_markdown_with_stats(&groups, &options)?;
        log::debug!("{}: {} blocks", input.display(), result.stats.block_count());
        total.merge(&result.stats);
        documents.push(result.content);
    }
    let content = documents.join("\n\n");

    if let Some(path) = output {
        fs::write(path, &content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }

    if stats {
        let s = &total;
        eprintln!();
        eprintln!("{}", "Render Statistics".cyan().bold());
        eprintln!("{}", "─".repeat(40).dimmed());
        eprintln!("{}: {}", "Groups".bold(), s.group_count);
        eprintln!("{}: {}", "Empty groups".bold(), s.empty_group_count);
        eprintln!("{}: {}", "Headings".bold(), s.heading_count);
        eprintln!("{}: {}", "List items".bold(), s.list_item_count);
        eprintln!("{}: {}", "Text".bold(), s.text_count);
        eprintln!("{}: {}", "Images".bold(), s.image_count);
        eprintln!("{}: {}", "Links".bold(), s.link_count);
        eprintln!("{}: {}", "Characters".bold(), s.char_count);
    }

    Ok(())
}

fn cmd_sync(
    config: &Path,
    input: &Path,
    state: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = TapConfig::from_file(config)?;
    log::debug!("loaded config: {:?}", config);
    if let Some(target) = config.connection_target() {
        log::info!("rows for {} read from {}", target, input.display());
    }

    let state = match state {
        Some(path) => State::from_file(path)?,
        None => State::new(),
    };

    let mut source = JsonSource::from_file(input)?;
    let mut tap = Tap::with_state(config, state);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let summaries = tap.run(&mut source, &mut out)?;

    for summary in summaries {
        eprintln!(
            "{} {}: {} records, {} skipped",
            "Synced".green(),
            summary.stream,
            summary.emitted,
            summary.skipped
        );
    }

    Ok(())
}

fn cmd_streams() {
    println!("{}", "Streams".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for kind in StreamKind::ALL {
        println!(
            "{} {}",
            kind.name().bold(),
            format!("(replication key: {})", kind.replication_key()).dimmed()
        );
    }
}

fn cmd_version() {
    println!("{} {}", "sanetap".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Node content extraction to Singer streams");
    println!();
    println!("License: MIT");
}
