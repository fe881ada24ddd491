// Tag endpoints

use tracing::debug;

use crate::error::Error;
use crate::rest::Rest;
use crate::transport::Transport;
use crate::types::Tag;

pub struct TagService<T> {
    rest: Rest<T>,
}

impl<T: Transport> TagService<T> {
    pub(crate) fn new(rest: Rest<T>) -> Self {
        Self { rest }
    }

    /// All tags visible to the account.
    ///
    /// `GET /tags`
    pub async fn list(&self) -> Result<Vec<Tag>, Error> {
        let url = self.rest.endpoint(&["tags"])?;
        debug!("listing tags");
        self.rest.get(url).await
    }
}
