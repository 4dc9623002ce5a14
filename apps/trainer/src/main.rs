#[tokio::main]
async fn main() -> anyhow::Result<()> {
    vocab_trainer::run().await
}
