use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    sport_search::run().await
}
