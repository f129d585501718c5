use std::io;

use mandrill::{API_KEY_ENV, MandrillClient};
use serde_json::{Map, json};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let api_key = std::env::var(API_KEY_ENV).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{API_KEY_ENV} environment variable is required"),
        )
    })?;
    let query = std::env::var("MANDRILL_QUERY").unwrap_or_else(|_| "example".to_owned());

    let client = MandrillClient::new();
    client.set_api_key(api_key)?;

    let mut params = Map::new();
    params.insert("query".to_owned(), json!(query));
    params.insert("date_from".to_owned(), json!("2011-01-01"));
    params.insert("date_to".to_owned(), json!("2012-12-31"));
    params.insert("tags".to_owned(), json!(["example"]));
    params.insert("limit".to_owned(), json!(42));

    let response = client.invoke("messages", "search", params).await?;
    println!("{}", serde_json::to_string_pretty(&response.into_json())?);

    Ok(())
}
