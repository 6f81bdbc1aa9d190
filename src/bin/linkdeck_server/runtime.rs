use std::net::SocketAddr;

use clap::Parser;

use linkdeck::logging::{self, LogTarget};
use linkdeck::model::default_entries;
use linkdeck::normalize::denormalize;

use super::*;

/// Tree path the client app reads its links from.
const DEFAULT_TREE_PATH: &str = "urls";

#[derive(Parser)]
#[command(name = "linkdeck-server")]
#[command(about = "Linkdeck tree server (development)", long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: SocketAddr,

    /// Write bound address to this file (dev/test convenience)
    #[arg(long)]
    addr_file: Option<PathBuf>,

    /// Directory holding tree.json
    #[arg(long, default_value = "./linkdeck-data")]
    data_dir: PathBuf,

    /// Store the factory entries under `urls` when nothing is stored there yet
    #[arg(long)]
    seed_defaults: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

pub(super) async fn run() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose, LogTarget::Stderr)?;

    std::fs::create_dir_all(&args.data_dir)
        .with_context(|| format!("create data dir {}", args.data_dir.display()))?;

    let mut tree = load_tree_from_disk(&args.data_dir).context("load tree from disk")?;
    if args.seed_defaults && !tree.nodes.contains_key(DEFAULT_TREE_PATH) {
        tree.put(DEFAULT_TREE_PATH, denormalize(&default_entries()), now_ts());
        persist_tree(&args.data_dir, &tree).context("persist seeded tree")?;
        tracing::info!(path = DEFAULT_TREE_PATH, "seeded factory entries");
    }

    let (changes, _) = watch::channel(tree.revision);
    let state = Arc::new(AppState {
        data_dir: args.data_dir.clone(),
        tree: RwLock::new(tree),
        changes,
    });
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("bind {}", args.addr))?;

    let local_addr = listener.local_addr().context("read listener local addr")?;
    eprintln!("linkdeck-server listening on {}", local_addr);

    if let Some(addr_file) = &args.addr_file {
        std::fs::write(addr_file, local_addr.to_string())
            .with_context(|| format!("write addr file {}", addr_file.display()))?;
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
