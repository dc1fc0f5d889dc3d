use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::error::Error;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use thinkers::core::config::{self, CliOverrides, SessionBackend};
use thinkers::core::dispatch::Dispatcher;
use thinkers::core::navigator::Navigator;
use thinkers::core::session::{self, FileSessionStore, MemorySessionStore, SessionStore};
use thinkers::core::store::ContentStore;
use thinkers::tui::{self, Launch};

#[derive(Parser)]
#[command(name = "thinkers", about = "Browse thinkers' biographies and glossaries")]
struct Args {
    /// Content store (JSON)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Characters per biography page
    #[arg(short, long)]
    budget: Option<usize>,

    /// Where session state is kept
    #[arg(long, value_enum)]
    sessions: Option<SessionBackend>,

    /// Session ID to resume (new session if omitted)
    #[arg(long)]
    session: Option<String>,

    /// Button identifier to open after start, e.g. `thinker:kant`
    #[arg(long)]
    open: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to thinkers.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("thinkers.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("Ignoring config file: {e}");
        config::ThinkersConfig::default()
    });
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            data_file: args.data,
            page_budget: args.budget,
            session_backend: args.sessions,
        },
    );
    log::info!("Thinkers starting up with {:?}", resolved);

    // A store we can't read is fatal: never serve a partial catalog
    let store = ContentStore::load(&resolved.data_file).map_err(|e| {
        log::error!("Failed to load {}: {e}", resolved.data_file.display());
        format!("{}: {e}", resolved.data_file.display())
    })?;

    let sessions: Arc<dyn SessionStore> = match resolved.session_backend {
        SessionBackend::Memory => Arc::new(MemorySessionStore::new()),
        SessionBackend::File => Arc::new(FileSessionStore::new(&resolved.sessions_dir)?),
    };

    let navigator = Navigator::new(Arc::new(store), resolved.page_budget);
    let dispatcher = Arc::new(Dispatcher::new(navigator, sessions));

    let resume = args.session.is_some();
    let session_id = args.session.unwrap_or_else(session::new_session_id);
    log::info!("Session {session_id} (resume: {resume})");

    tui::run(
        dispatcher,
        session_id.clone(),
        Launch {
            resume,
            open: args.open,
        },
    )
    .await?;

    // Only file-backed sessions are worth resuming
    if resolved.session_backend == SessionBackend::File {
        println!("Resume with: thinkers --sessions file --session {session_id}");
    }
    Ok(())
}
