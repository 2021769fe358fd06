//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `blockpad_core` linkage.
//! - Drive one session end to end: SQLite local store, in-process remote
//!   store, a few edits, then shutdown.
//!
//! Usage: `blockpad_cli [--db PATH] [--log-dir ABS_DIR] [--log-level LEVEL]`

use blockpad_core::{
    BlockKind, EditorInput, MemoryRemoteStore, Session, SessionConfig, SessionEvent,
    SqliteLocalStore, SystemClock,
};
use clap::Parser;
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(version, about = "Blockpad core smoke run", long_about = None)]
struct Cli {
    /// SQLite file backing the local store (defaults to the temp dir)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Absolute directory for rotating log files; logging is off without it
    #[arg(long)]
    log_dir: Option<String>,

    #[arg(long, default_value = blockpad_core::default_log_level())]
    log_level: String,
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(log_dir) = &cli.log_dir {
        blockpad_core::init_logging(&cli.log_level, log_dir)?;
    }

    let db_path = cli
        .db
        .unwrap_or_else(|| std::env::temp_dir().join("blockpad-cli.sqlite3"));
    let local = SqliteLocalStore::open(&db_path)?;
    let mut session = Session::start(
        SessionConfig::default(),
        Box::new(SystemClock),
        MemoryRemoteStore::new(),
        local,
    );
    session.tick();

    let page_id = session.create_page();
    session.rename_page(page_id, "CLI smoke test")?;
    let first = session
        .page(page_id)
        .and_then(|page| page.blocks.first())
        .map(|block| block.id)
        .ok_or("new page has no blocks")?;
    session.handle_input(EditorInput::Text {
        block_id: first,
        content: "- ".to_string(),
        cursor: 2,
    })?;
    session.set_content(first, "first item")?;
    session.insert_block_after(page_id, Some(first), BlockKind::Checkbox, "check the output")?;

    for event in session.drain_events() {
        if let SessionEvent::Notice(notice) = event {
            println!("notice level={:?} message={}", notice.level, notice.message);
        }
    }
    for page in session.workspace().pages() {
        println!(
            "page id={} icon={} title={:?} blocks={}",
            page.id,
            page.icon,
            page.title,
            page.blocks.len()
        );
    }

    let (remote, _local) = session.shutdown();
    println!("remote documents={}", remote.documents("pages").len());
    info!("event=cli_smoke module=cli status=ok db={}", db_path.display());
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    println!("blockpad_core ping={}", blockpad_core::ping());
    println!("blockpad_core version={}", blockpad_core::core_version());

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("blockpad_cli failed: {err}");
            ExitCode::FAILURE
        }
    }
}
