//! Game Server Binary
//!
//! Runs the HTTP server hosting the two-player game.
//! Serves WebSocket connections for real-time play on BIND_ADDR
//! (default 0.0.0.0:3000).

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    xoxo_core::log();
    xoxo_core::kys();
    xoxo_server::run().await
}
