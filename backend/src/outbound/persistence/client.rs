//! Store client construction.

use mongodb::{Client, Database};

/// Connect to the document store and select the catalog database.
///
/// Connection establishment is lazy in the driver; a bad address
/// surfaces as a server-selection failure on the first query rather
/// than here.
///
/// # Errors
/// Returns the driver error when the URI cannot be parsed.
pub async fn connect(uri: &str, database: &str) -> Result<Database, mongodb::error::Error> {
    let client = Client::with_uri_str(uri).await?;
    Ok(client.database(database))
}
