mod config;
mod source;

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use belote_protocol::messages::Message;
use belote_protocol::record::{FrameOutcome, Record, SessionDecoder};
use belote_state::stream::StateTracker;

use crate::config::ReplayConfig;

/// Offline analyzer for recorded VIP Belote WebSocket traffic.
#[derive(Debug, Parser)]
#[command(
    name = "belote-replay",
    author,
    version,
    about = "Decode a recorded frame log into messages and table states"
)]
struct Cli {
    /// Frame log to replay (JSON Lines: direction, ts, payload).
    #[arg(value_name = "FRAME_LOG")]
    input: PathBuf,

    /// Optional YAML configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Only print records from this namespace.
    #[arg(long, value_name = "NAMESPACE")]
    namespace: Option<String>,

    /// Player id to reconstruct the table from.
    #[arg(long, value_name = "PLAYER_ID")]
    self_player_id: Option<String>,

    /// Fold game messages into table states and print each change.
    #[arg(long)]
    states: bool,

    /// Write one record file per namespace into this directory.
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ReplayConfig::from_path(path)?,
        None => ReplayConfig::default(),
    };
    if cli.namespace.is_some() {
        config.namespace = cli.namespace.clone();
    }
    if cli.self_player_id.is_some() {
        config.self_player_id = cli.self_player_id.clone();
    }
    if cli.output_dir.is_some() {
        config.output_dir = cli.output_dir.clone();
    }
    config.states |= cli.states;
    config.validate()?;

    let frames = source::read_frame_log(&cli.input)?;
    let records = decode_frames(&frames)?;
    tracing::info!(
        frames = frames.len(),
        records = records.len(),
        "frame log decoded"
    );

    for record in &records {
        if let Some(namespace) = &config.namespace {
            if &record.namespace != namespace {
                continue;
            }
        }
        println!(
            "{}\t{}\t{:?}",
            record.direction, record.namespace, record.message
        );
    }

    if let Some(dir) = &config.output_dir {
        write_namespace_files(dir, &records)?;
    }

    if config.states {
        let self_player_id = config
            .self_player_id
            .clone()
            .context("folding states requires --self-player-id (or self_player_id in the config)")?;
        print_states(&self_player_id, &records)?;
    }

    Ok(())
}

fn decode_frames(frames: &[source::FrameRow]) -> anyhow::Result<Vec<Record>> {
    let mut decoder = SessionDecoder::new();
    let mut records = Vec::new();
    for frame in frames {
        let outcome = decoder
            .decode_frame(frame.direction, frame.ts, &frame.payload)
            .with_context(|| format!("decoding frame captured at {}", frame.ts))?;
        if let FrameOutcome::Record(record) = outcome {
            records.push(record);
        }
    }
    Ok(records)
}

fn print_states(self_player_id: &str, records: &[Record]) -> anyhow::Result<()> {
    let mut tracker = StateTracker::new(self_player_id);
    for record in records {
        if let Message::Game(game) = &record.message {
            let changed = tracker
                .advance(game)
                .with_context(|| format!("applying game message captured at {}", record.timestamp_ms))?;
            if let Some(state) = changed {
                println!("--- {} ms ---", record.timestamp_ms);
                println!("{state}");
            }
        }
    }
    Ok(())
}

fn write_namespace_files(dir: &Path, records: &[Record]) -> anyhow::Result<()> {
    let mut by_namespace: BTreeMap<&str, Vec<&Record>> = BTreeMap::new();
    for record in records {
        by_namespace
            .entry(record.namespace.as_str())
            .or_default()
            .push(record);
    }

    fs::create_dir_all(dir)
        .with_context(|| format!("creating output directory {}", dir.display()))?;
    for (namespace, records) in by_namespace {
        let path = dir.join(format!("{}.txt", sanitize_namespace(namespace)));
        let mut file = fs::File::create(&path)
            .with_context(|| format!("creating record file {}", path.display()))?;
        for record in records {
            writeln!(
                file,
                "{}\t{}\t{:?}",
                record.direction, record.namespace, record.message
            )?;
        }
        tracing::debug!(namespace, path = %path.display(), "wrote namespace records");
    }
    Ok(())
}

fn sanitize_namespace(namespace: &str) -> String {
    if namespace == "/" {
        return "default".to_owned();
    }
    namespace.trim_start_matches('/').replace('/', "_")
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::sanitize_namespace;

    #[test]
    fn root_namespace_maps_to_default() {
        assert_eq!(sanitize_namespace("/"), "default");
        assert_eq!(sanitize_namespace("/game"), "game");
        assert_eq!(sanitize_namespace("/a/b"), "a_b");
    }
}
