use dotenv::dotenv;
use promptgate::{Gateway, GatewayConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let gateway = Gateway::new(GatewayConfig::default());
    let answer = gateway
        .complete("Share a fun fact about Rust programming.")
        .await?;

    println!("Assistant:\n{answer}");
    Ok(())
}
