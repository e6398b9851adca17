use clap::Parser;
use toc_tree::server::{serve, ServerArgs};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = ServerArgs::parse();
    if let Err(e) = serve(args).await {
        tracing::error!(error = %e, "toc-server failed");
        std::process::exit(1);
    }
}
