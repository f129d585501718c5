use std::io;

use mandrill::{API_KEY_ENV, MandrillClient, UserInfo};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let api_key = std::env::var(API_KEY_ENV).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{API_KEY_ENV} environment variable is required"),
        )
    })?;

    let client = MandrillClient::builder()
        .api_key(api_key)
        .verbose(std::env::var_os("MANDRILL_VERBOSE").is_some())
        .build()?;
    let response = client
        .call(json!({ "type": "users", "call": "info" }))
        .await?;
    let info: UserInfo = response.deserialize()?;

    println!(
        "username: {}, reputation: {}, hourly_quota: {}",
        info.username, info.reputation, info.hourly_quota
    );

    Ok(())
}
