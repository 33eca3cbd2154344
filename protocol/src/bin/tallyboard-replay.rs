// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Free & Fair
// See LICENSE.md for details

//! Replays a file of board messages, one JSON envelope per line, through a
//! fresh bulletin board and prints every emitted message to stdout.
//!
//! Lines of type `ballot.add` carry a ballot and go to the ballot box;
//! every other line is submitted to the board. A line that fails is logged
//! and the replay continues.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tallyboard::{BulletinBoard, Config, Message, MessageType, OutboundMessage, RistrettoElectionGuard};

#[derive(Parser, Debug)]
#[command(name = "tallyboard-replay", about = "Replay board messages from a JSON lines file")]
struct Args {
    /// TOML configuration file; defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the cast tally as a `tally.cast` message after the replay
    #[arg(long)]
    print_tally: bool,

    /// JSON lines file of message envelopes
    messages: PathBuf,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => Config::default(),
    };

    let crypto = RistrettoElectionGuard::from(&config.cryptography);
    let mut board = BulletinBoard::new(crypto, config.board);

    let file = File::open(&args.messages)
        .with_context(|| format!("opening {}", args.messages.display()))?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut lines = 0usize;
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("reading {}", args.messages.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        lines += 1;
        let line_number = index + 1;

        match replay_line(&mut board, &line) {
            Ok(Some(outbound)) => print(&mut out, &outbound)?,
            Ok(None) => {}
            Err(err) => warn!(line = line_number, error = %err, "message failed"),
        }
    }

    if args.print_tally {
        let tally = board.get_tally_cast().context("exporting the cast tally")?;
        print(&mut out, &tally)?;
    }

    info!(lines, phase = %board.phase(), "replay finished");
    Ok(())
}

fn replay_line(
    board: &mut BulletinBoard<RistrettoElectionGuard>,
    line: &str,
) -> Result<Option<OutboundMessage>, tallyboard::Error> {
    let message: Message =
        serde_json::from_str(line).map_err(tallyboard::Error::MalformedEnvelope)?;
    if message.message_type == MessageType::BallotAdd.as_ref() {
        board.add_ballot(&message.content)?;
        return Ok(None);
    }
    board.submit(&message)
}

fn print(out: &mut impl Write, outbound: &OutboundMessage) -> Result<()> {
    serde_json::to_writer(&mut *out, outbound)?;
    writeln!(out)?;
    Ok(())
}
