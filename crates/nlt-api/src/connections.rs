// Connection endpoints
//
// A connection pairs a forwarding target (URL + auth header) with a filter
// selecting which device messages are forwarded to it.

use tracing::debug;

use crate::error::Error;
use crate::rest::Rest;
use crate::transport::Transport;
use crate::types::{ConnectionPage, ConnectionRequest, DeleteResponse};

const DELETED_MESSAGE: &str = "Connection deleted.";

pub struct ConnectionService<T> {
    rest: Rest<T>,
}

impl<T: Transport> ConnectionService<T> {
    pub(crate) fn new(rest: Rest<T>) -> Self {
        Self { rest }
    }

    /// `GET /connections`
    pub async fn list(&self) -> Result<ConnectionPage, Error> {
        let url = self.rest.endpoint(&["connections"])?;
        debug!("listing connections");
        self.rest.get(url).await
    }

    /// `POST /connections`
    pub async fn create(&self, req: &ConnectionRequest) -> Result<ConnectionRequest, Error> {
        let url = self.rest.endpoint(&["connections"])?;
        debug!(url = %req.connection.url, "creating connection");
        self.rest.post(url, req).await
    }

    /// `PATCH /connections/{id}`, where `id` is `req.connection.id`.
    pub async fn update(&self, req: &ConnectionRequest) -> Result<ConnectionRequest, Error> {
        let id = req.connection.id.to_string();
        let url = self.rest.endpoint(&["connections", &id])?;
        debug!(id = req.connection.id, "updating connection");
        self.rest.patch(url, req).await
    }

    /// `DELETE /connections/{id}`
    pub async fn delete(&self, id: i64) -> Result<(), Error> {
        let url = self.rest.endpoint(&["connections", &id.to_string()])?;
        debug!(id, "deleting connection");

        let resp: DeleteResponse = self.rest.delete(url).await?;
        match resp.message.as_deref() {
            Some(DELETED_MESSAGE) => Ok(()),
            other => Err(Error::Rejected {
                message: format!("unexpected response: {}", other.unwrap_or_default()),
            }),
        }
    }
}
