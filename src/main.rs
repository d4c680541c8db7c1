//! DriveLedger diagnostics API server binary.

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    driveledger_api::server::run().await
}
