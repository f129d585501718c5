use std::io;

use mandrill::{API_KEY_ENV, MandrillClient};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = MandrillClient::new();
    client.load_default_api_key().map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{API_KEY_ENV} environment variable is required"),
        )
    })?;

    let response = client
        .call(json!({ "type": "users", "call": "ping" }))
        .await?;
    println!("ping: {}", response.as_raw().unwrap_or_default());

    Ok(())
}
