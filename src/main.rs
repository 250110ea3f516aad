//! Service entrypoint: config, logging, store, router, serve.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use plank::{routes, ProjectStore, Server};

#[derive(Parser, Debug)]
#[command(name = "plank", about = "A minimal in-memory project-tracker HTTP service")]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "PLANK_ADDR", default_value = "0.0.0.0:3333")]
    addr: String,
}

#[tokio::main]
async fn main() -> Result<(), plank::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    let store = ProjectStore::shared();
    let app = routes::router(store);

    Server::bind(&args.addr).serve(app).await
}
