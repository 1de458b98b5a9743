use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    litpack_cli::main_entry().await
}
