// Device endpoints
//
// Provisioning (create/update/delete), lookup, and activation toggling
// under `/devices`.

use reqwest::Method;
use serde_json::json;
use tracing::debug;

use crate::error::{self, Error};
use crate::rest::{self, Rest};
use crate::transport::Transport;
use crate::types::{DeleteResponse, Device, DeviceCreateRequest};

/// Page requested by [`DeviceService::list`].
const LIST_OFFSET: u32 = 0;
const LIST_LIMIT: u32 = 100;

const DELETED_MESSAGE: &str = "The device was deleted";

pub struct DeviceService<T> {
    rest: Rest<T>,
}

impl<T: Transport> DeviceService<T> {
    pub(crate) fn new(rest: Rest<T>) -> Self {
        Self { rest }
    }

    /// First page of devices (offset 0, limit 100).
    ///
    /// `GET /devices?offset=0&limit=100`
    pub async fn list(&self) -> Result<Vec<Device>, Error> {
        let mut url = self.rest.endpoint(&["devices"])?;
        url.query_pairs_mut()
            .append_pair("offset", &LIST_OFFSET.to_string())
            .append_pair("limit", &LIST_LIMIT.to_string());
        debug!("listing devices");
        self.rest.get(url).await
    }

    /// `GET /devices/{id}`
    pub async fn find(&self, device_id: &str) -> Result<Device, Error> {
        let url = self.rest.endpoint(&["devices", device_id])?;
        self.rest.get(url).await
    }

    /// `POST /devices/create-device`
    ///
    /// A rejected payload (400 or 422) fails with [`Error::DeviceValidation`].
    pub async fn create(&self, device: &DeviceCreateRequest) -> Result<Device, Error> {
        let url = self.rest.endpoint(&["devices", "create-device"])?;
        debug!(dev_eui = %device.dev_eui, "creating device");
        let resp = self
            .rest
            .send(Method::POST, url, Some(rest::to_body(device)?))
            .await?;
        rest::decode(resp, error::translate_device)
    }

    /// `PATCH /devices/{dev_eui}` with the full device as body.
    pub async fn update(&self, device: &Device) -> Result<Device, Error> {
        let url = self.rest.endpoint(&["devices", &device.dev_eui])?;
        debug!(dev_eui = %device.dev_eui, "updating device");
        let resp = self
            .rest
            .send(Method::PATCH, url, Some(rest::to_body(device)?))
            .await?;
        rest::decode(resp, error::translate_device)
    }

    /// `POST /devices/{id}/activation` with `{"is_active": true}`
    pub async fn activate(&self, device_id: &str) -> Result<(), Error> {
        self.set_active(device_id, true).await
    }

    /// `POST /devices/{id}/activation` with `{"is_active": false}`
    pub async fn deactivate(&self, device_id: &str) -> Result<(), Error> {
        self.set_active(device_id, false).await
    }

    async fn set_active(&self, device_id: &str, active: bool) -> Result<(), Error> {
        let url = self.rest.endpoint(&["devices", device_id, "activation"])?;
        debug!(device_id, active, "changing device activation");

        let device: Device = self.rest.post(url, &json!({ "is_active": active })).await?;
        match device.detail {
            Some(detail) if !detail.is_empty() => Err(Error::Rejected {
                message: format!(
                    "{} device {device_id}: {detail}",
                    if active { "activating" } else { "deactivating" }
                ),
            }),
            _ => Ok(()),
        }
    }

    /// `DELETE /devices/{id}`
    ///
    /// The vendor confirms with a fixed message; anything else is
    /// reported as [`Error::Rejected`].
    pub async fn delete(&self, device_id: &str) -> Result<(), Error> {
        let url = self.rest.endpoint(&["devices", device_id])?;
        debug!(device_id, "deleting device");

        let resp: DeleteResponse = self.rest.delete(url).await?;
        match resp.message.as_deref() {
            Some(DELETED_MESSAGE) => Ok(()),
            other => Err(Error::Rejected {
                message: format!("deleting device {device_id}: {}", other.unwrap_or_default()),
            }),
        }
    }
}
