use std::io;

use mandrill::{API_KEY_ENV, MandrillClient};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let api_key = std::env::var(API_KEY_ENV).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{API_KEY_ENV} environment variable is required"),
        )
    })?;
    let from = std::env::var("MANDRILL_FROM").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "MANDRILL_FROM environment variable is required",
        )
    })?;
    let to = std::env::var("MANDRILL_TO").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "MANDRILL_TO environment variable is required",
        )
    })?;

    let client = MandrillClient::new();
    let response = client
        .call(json!({
            "type": "messages",
            "call": "send",
            "key": api_key,
            "message": {
                "html": "<h1>example html</h1>",
                "text": "example text",
                "subject": "example subject",
                "from_email": from,
                "from_name": "example from_name",
                "to": [{ "email": to }],
                "track_opens": true,
                "track_clicks": true,
                "auto_text": true,
                "tags": ["test", "example"]
            }
        }))
        .await?;

    println!("{}", serde_json::to_string_pretty(&response.into_json())?);

    Ok(())
}
