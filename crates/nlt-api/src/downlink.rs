// Downlink scheduling
//
// The vendor exposes downlink submission as a GET carrying a JSON body.

use reqwest::Method;
use tracing::debug;

use crate::error::{self, Error};
use crate::rest::{self, Rest};
use crate::transport::Transport;
use crate::types::{DownlinkRequest, DownlinkResponse};

pub struct DownlinkService<T> {
    rest: Rest<T>,
}

impl<T: Transport> DownlinkService<T> {
    pub(crate) fn new(rest: Rest<T>) -> Self {
        Self { rest }
    }

    /// Queue `req` for delivery to `dev_eui`.
    ///
    /// `GET /messages/{dev_eui}/send-downlink-claim`
    pub async fn send(
        &self,
        dev_eui: &str,
        req: &DownlinkRequest,
    ) -> Result<DownlinkResponse, Error> {
        let url = self
            .rest
            .endpoint(&["messages", dev_eui, "send-downlink-claim"])?;
        debug!(dev_eui, port = req.port, confirmed = req.confirmed, "sending downlink");

        let resp = self
            .rest
            .send(Method::GET, url, Some(rest::to_body(req)?))
            .await?;
        rest::decode(resp, error::translate)
    }
}
