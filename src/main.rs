#[tokio::main]
async fn main() -> anyhow::Result<()> {
  shelfsync::entrypoint().await
}
