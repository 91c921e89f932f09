//! Identity resolution
//!
//! The follows endpoint only accepts numeric ids, so handles must be resolved
//! through `/users?login=<handle>` first.

use serde::Deserialize;
use tracing::debug;

use crate::api::{ApiResult, HelixClient};

/// One record from the `/users` endpoint. Only the id is needed here.
#[derive(Debug, Clone, Deserialize)]
struct UserRecord {
    id: String,
}

/// Maps handles to the API's internal numeric identifiers.
pub struct Resolver<'a> {
    client: &'a HelixClient,
}

impl<'a> Resolver<'a> {
    /// Create a resolver over an existing client.
    pub fn new(client: &'a HelixClient) -> Self {
        Self { client }
    }

    /// Resolve `handle` to its numeric id, or `None` for deleted/banned
    /// accounts and rejected queries.
    ///
    /// Embedded spaces are stripped before querying - handles may contain
    /// them but the API rejects them. Never retries beyond what the client
    /// already does.
    pub async fn resolve(&self, handle: &str) -> ApiResult<Option<u64>> {
        let login = handle.replace(' ', "");
        let params = [("login", login)];
        let envelope = self.client.get::<UserRecord>("/users", &params).await?;

        let Some(records) = envelope.records() else {
            debug!(handle = %handle, "Handle did not resolve to an id");
            return Ok(None);
        };

        // A login matches at most one account; take the first record.
        match records[0].id.parse::<u64>() {
            Ok(id) => Ok(Some(id)),
            Err(_) => {
                debug!(handle = %handle, id = %records[0].id, "Non-numeric id in response");
                Ok(None)
            }
        }
    }
}
