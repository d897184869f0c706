//! `watch` command
//!
//! Polls an export file and the settings file. Each change to the export
//! starts a fresh extraction on a worker thread; only the newest one is
//! applied. Settings changes recompute from the current snapshot.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, SystemTime};

use chrono::Local;
use clap::Args;
use tracing::{debug, warn};

use crate::display::format_results;
use crate::error::SplitResult;
use crate::services::{Extraction, ExtractionTicket, ImportService, Session, SettingsService};

/// Arguments for `watch`
#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Transaction export to watch (CSV or JSON)
    pub input: PathBuf,

    /// Polling interval in milliseconds
    #[arg(long, default_value = "1000")]
    pub interval_ms: u64,

    /// Stop after printing this many updates
    #[arg(long)]
    pub max_updates: Option<usize>,
}

type ExtractionResult = (ExtractionTicket, SplitResult<Extraction>);

fn modified_at(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

fn spawn_extraction(
    path: PathBuf,
    ticket: ExtractionTicket,
    tx: mpsc::Sender<ExtractionResult>,
) {
    thread::spawn(move || {
        let result = ImportService::new().import_file(&path);
        // The receiver only goes away when the command is exiting
        let _ = tx.send((ticket, result));
    });
}

/// Handle `watch`
pub fn handle_watch_command(
    settings_service: &SettingsService,
    args: WatchArgs,
) -> SplitResult<()> {
    let interval = Duration::from_millis(args.interval_ms.max(10));
    let source = args.input.display().to_string();
    let (tx, rx) = mpsc::channel::<ExtractionResult>();

    let mut session = Session::new();
    let mut input_seen: Option<SystemTime> = None;
    let mut settings_seen = modified_at(settings_service.settings_path());
    let mut updates = 0usize;

    eprintln!("Watching {} (Ctrl-C to stop)", source);

    loop {
        let input_modified = modified_at(&args.input);
        if input_modified.is_some() && input_modified != input_seen {
            input_seen = input_modified;
            let ticket = session.begin_extraction();
            debug!(generation = ticket.generation(), "input changed, extracting");
            spawn_extraction(args.input.clone(), ticket, tx.clone());
        }

        let mut changed = false;

        let settings_modified = modified_at(settings_service.settings_path());
        if settings_modified != settings_seen {
            settings_seen = settings_modified;
            changed = session.snapshot().is_some();
        }

        match rx.recv_timeout(interval) {
            Ok((ticket, Ok(extraction))) => {
                changed |= session.commit(ticket, source.as_str(), extraction.transactions);
            }
            Ok((ticket, Err(e))) => {
                warn!(generation = ticket.generation(), "extraction failed: {}", e);
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        if !changed {
            continue;
        }

        let settings = settings_service.load()?;
        if let Some(results) = session.results(&settings) {
            println!("── {} ──", Local::now().format("%Y-%m-%d %H:%M:%S"));
            print!("{}", format_results(&results, &settings.partner_name));
            println!();
            updates += 1;
        }

        if args.max_updates.is_some_and(|max| updates >= max) {
            break;
        }
    }

    Ok(())
}
