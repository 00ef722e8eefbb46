// Tag endpoints

use tracing::debug;

use crate::client::PhotoServerClient;
use crate::error::Error;
use crate::types::{ListParams, Tag};

impl PhotoServerClient {
    /// List every tag known to the server.
    ///
    /// `GET /tags/all`
    pub async fn list_tags(&self) -> Result<Vec<Tag>, Error> {
        debug!("listing tags");
        self.get_list("tags/all", &ListParams::new()).await
    }
}
