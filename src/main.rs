use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    asyncllm::cli::run_cli().await
}
