// Message history
//
// `GET /messages/{dev_eui}` filtered by message type and a date window.

use chrono::NaiveDateTime;
use tracing::debug;

use crate::error::Error;
use crate::rest::Rest;
use crate::transport::Transport;
use crate::types::Messages;

/// Date format expected by the `initial_date` / `final_date` parameters.
const FILTER_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Query for [`MessageService::list`].
///
/// Dates are sent at minute precision in the account's local time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageFilter {
    /// e.g. `uplink` or `downlink`.
    pub message_type: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl MessageFilter {
    pub fn new(message_type: impl Into<String>, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            message_type: message_type.into(),
            start,
            end,
        }
    }

    /// Query parameters in the order the vendor documents them.
    pub fn query_pairs(&self) -> [(&'static str, String); 3] {
        [
            ("message_type", self.message_type.clone()),
            (
                "initial_date",
                self.start.format(FILTER_DATE_FORMAT).to_string(),
            ),
            ("final_date", self.end.format(FILTER_DATE_FORMAT).to_string()),
        ]
    }
}

pub struct MessageService<T> {
    rest: Rest<T>,
}

impl<T: Transport> MessageService<T> {
    pub(crate) fn new(rest: Rest<T>) -> Self {
        Self { rest }
    }

    /// `GET /messages/{dev_eui}?message_type=..&initial_date=..&final_date=..`
    pub async fn list(&self, dev_eui: &str, filter: &MessageFilter) -> Result<Messages, Error> {
        let mut url = self.rest.endpoint(&["messages", dev_eui])?;
        url.query_pairs_mut().extend_pairs(filter.query_pairs());
        debug!(dev_eui, message_type = %filter.message_type, "listing messages");
        self.rest.get(url).await
    }
}
