//! Request and response types for the NLT LoRaWAN API.
//!
//! Field names are the vendor's snake_case JSON keys. The API is loose about
//! field presence and `null`, so response fields lean on `#[serde(default)]`
//! and `Option`.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};

/// LoRaWAN band used by the vendor's network.
pub const BAND_LA915_928A: &str = "LA915-928A";

/// Network-server-side payload encryption.
pub const ENCRYPTION_NS: &str = "NS";

/// Decode `null` as the type's default instead of failing.
fn nullable<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}

// ── Auth ─────────────────────────────────────────────────────────────

/// Successful `POST /token` body.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub access_token: SecretString,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub user_type: i32,
}

// ── Device enums ─────────────────────────────────────────────────────

/// Join procedure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activation {
    #[default]
    #[serde(rename = "OTAA")]
    Otaa,
    #[serde(rename = "ABP")]
    Abp,
    /// Any value this client does not know.
    #[serde(other)]
    Unknown,
}

/// LoRaWAN device class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceClass {
    #[default]
    A,
    B,
    C,
    #[serde(other)]
    Unknown,
}

/// Adaptive data rate mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdrMode {
    #[default]
    On,
    Off,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adr {
    pub mode: AdrMode,
}

/// First receive window delay, in seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rx1 {
    pub delay: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geolocation {
    #[serde(default)]
    pub lat: Option<String>,
    #[serde(default)]
    pub lng: Option<String>,
}

// ── Device ───────────────────────────────────────────────────────────

/// A provisioned device as returned by `/devices`.
///
/// Also used as the `PATCH /devices/{dev_eui}` body; response-only fields
/// are skipped when empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Device {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub dev_eui: String,
    #[serde(default, deserialize_with = "nullable")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub activation: Activation,
    #[serde(default, deserialize_with = "nullable")]
    pub adr: Adr,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_eui: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appskey: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub band: String,
    #[serde(default, deserialize_with = "nullable")]
    pub counters_size: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_addr: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub dev_class: DeviceClass,
    #[serde(default, deserialize_with = "nullable")]
    pub encryption: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nwkskey: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub rx1: Rx1,
    #[serde(default, deserialize_with = "nullable")]
    pub strict_counter: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_id: Option<i64>,
    #[serde(default, deserialize_with = "nullable")]
    pub block_downlink: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub block_uplink: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub counter_down: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub counter_up: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geolocation: Option<Geolocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_join: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deactivated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Set by the vendor when an activation change was refused.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Set by the vendor on delete.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `POST /devices/create-device` body.
///
/// Session and application keys are omitted when unset: OTAA devices carry
/// `app_key`, ABP devices carry `dev_addr`, `nwkskey` and `appskey`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceCreateRequest {
    pub tags: Vec<String>,
    pub activation: Activation,
    pub adr: Adr,
    pub app_eui: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appskey: Option<String>,
    pub band: String,
    pub counters_size: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_addr: Option<String>,
    pub dev_class: DeviceClass,
    pub encryption: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nwkskey: Option<String>,
    pub rx1: Rx1,
    pub strict_counter: bool,
    pub device_type: String,
    pub contract_id: i64,
    pub dev_eui: String,
    pub block_downlink: bool,
    pub block_uplink: bool,
}

impl DeviceCreateRequest {
    /// OTAA device on the vendor's default band, class A, ADR on.
    pub fn otaa(
        dev_eui: impl Into<String>,
        app_eui: impl Into<String>,
        app_key: impl Into<String>,
        contract_id: i64,
    ) -> Self {
        Self {
            tags: Vec::new(),
            activation: Activation::Otaa,
            adr: Adr::default(),
            app_eui: app_eui.into(),
            app_key: Some(app_key.into()),
            appskey: None,
            band: BAND_LA915_928A.into(),
            counters_size: 4,
            dev_addr: None,
            dev_class: DeviceClass::A,
            encryption: ENCRYPTION_NS.into(),
            nwkskey: None,
            rx1: Rx1 { delay: 1 },
            strict_counter: false,
            device_type: String::new(),
            contract_id,
            dev_eui: dev_eui.into(),
            block_downlink: false,
            block_uplink: false,
        }
    }
}

/// `{ "message": "..." }` echoed by delete endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DeleteResponse {
    #[serde(default)]
    pub message: Option<String>,
}

// ── Tags ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub client_id: i64,
}

// ── Messages ─────────────────────────────────────────────────────────

/// Routing metadata shared by uplinks and downlinks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageMeta {
    pub network: Option<String>,
    pub packet_hash: Option<String>,
    pub application: Option<String>,
    pub device_addr: Option<String>,
    pub time: f64,
    pub device: Option<String>,
    pub packet_id: Option<String>,
    pub gateway: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modulation {
    pub bandwidth: i64,
    pub coderate: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub spreading: i32,
    pub inverted: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Gps {
    pub lat: f64,
    pub lng: f64,
    pub alt: f64,
}

/// Gateway receive conditions for an uplink.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UplinkHardware {
    pub status: i32,
    pub chain: i32,
    pub tmst: i64,
    pub snr: f64,
    pub rssi: i32,
    pub channel: i32,
    pub gps: Option<Gps>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UplinkRadio {
    pub gps_time: Option<i64>,
    pub hardware: UplinkHardware,
    pub datarate: i32,
    pub modulation: Modulation,
    pub delay: f64,
    pub time: f64,
    pub freq: f64,
    pub size: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UplinkParams {
    pub payload: String,
    pub port: i32,
    pub duplicate: bool,
    pub radio: UplinkRadio,
    pub counter_up: i64,
    pub rx_time: f64,
    pub encrypted_payload: Option<String>,
}

/// One stored device message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Message {
    #[serde(rename = "type")]
    pub kind: String,
    pub meta: MessageMeta,
    pub params: UplinkParams,
    pub insert_time: Option<String>,
}

/// `GET /messages/{dev_eui}` body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Messages {
    #[serde(default, deserialize_with = "nullable")]
    pub messages: Vec<Message>,
}

// ── Downlink ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownlinkRequest {
    /// Hex-encoded application payload.
    pub payload: String,
    pub port: u8,
    pub confirmed: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownlinkHardware {
    pub immediately: bool,
    pub chain: i32,
    pub power: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownlinkRadio {
    pub modulation: Modulation,
    pub hardware: DownlinkHardware,
    pub freq: f64,
    pub time: f64,
    pub datr: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownlinkParams {
    pub payload: String,
    pub radio: DownlinkRadio,
    pub counter_down: i64,
    pub port: i32,
    pub encrypted_payload: Option<String>,
}

/// The queued downlink as scheduled by the network server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownlinkResponse {
    #[serde(rename = "type")]
    pub kind: String,
    pub meta: MessageMeta,
    pub params: DownlinkParams,
}

// ── Connections ──────────────────────────────────────────────────────

/// Where matching messages are forwarded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionModel {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub auth_header: Option<String>,
    #[serde(default)]
    pub connection_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Which messages a connection forwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterModel {
    #[serde(default)]
    pub id: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub applications: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub devices: Vec<String>,
    #[serde(default)]
    pub duplicate: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub gateways: Vec<String>,
    #[serde(default)]
    pub lora: bool,
    #[serde(default)]
    pub radio: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub types: Vec<String>,
    #[serde(default)]
    pub with_tags: bool,
    #[serde(default)]
    pub is_disabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// One row of `GET /connections`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionEntry {
    #[serde(rename = "ConnectionModel")]
    pub connection: ConnectionModel,
    #[serde(rename = "FilterModel")]
    pub filter: FilterModel,
}

/// `GET /connections` body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionPage {
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub offset: i64,
    #[serde(default)]
    pub limit: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub data: Vec<ConnectionEntry>,
}

/// Create/update body, echoed back by the vendor on success.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionRequest {
    #[serde(rename = "connections")]
    pub connection: ConnectionModel,
    #[serde(rename = "filters")]
    pub filter: FilterModel,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn device_tolerates_nulls_and_missing_fields() {
        let device: Device = serde_json::from_value(json!({
            "dev_eui": "70b3d57ed0000001",
            "tags": null,
            "app_key": null,
            "activation": "ABP",
            "dev_class": "C",
            "adr": { "mode": "off" },
            "geolocation": { "lat": "-23.5", "lng": null }
        }))
        .unwrap();

        assert_eq!(device.dev_eui, "70b3d57ed0000001");
        assert!(device.tags.is_empty());
        assert_eq!(device.app_key, None);
        assert_eq!(device.activation, Activation::Abp);
        assert_eq!(device.dev_class, DeviceClass::C);
        assert_eq!(device.adr.mode, AdrMode::Off);
        assert_eq!(device.geolocation.unwrap().lat.as_deref(), Some("-23.5"));
    }

    #[test]
    fn unexpected_enum_values_do_not_break_a_device_list() {
        let devices: Vec<Device> = serde_json::from_value(json!([
            { "dev_eui": "70b3d57ed0000001", "activation": "", "dev_class": "c", "adr": { "mode": "auto" } },
            { "dev_eui": "70b3d57ed0000002", "activation": "OTAA", "dev_class": "A" }
        ]))
        .unwrap();

        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].activation, Activation::Unknown);
        assert_eq!(devices[0].dev_class, DeviceClass::Unknown);
        assert_eq!(devices[0].adr.mode, AdrMode::Unknown);
        assert_eq!(devices[1].activation, Activation::Otaa);

        // Still printable; the vendor rejects it if sent back.
        let value = serde_json::to_value(&devices[0]).unwrap();
        assert_eq!(value["activation"], "Unknown");
        assert_eq!(value["adr"]["mode"], "unknown");
    }

    #[test]
    fn create_request_omits_unset_keys() {
        let req = DeviceCreateRequest::otaa("70b3d57ed0000001", "70b3d57ed0000000", "00112233", 7);
        let value = serde_json::to_value(&req).unwrap();

        assert_eq!(value["activation"], "OTAA");
        assert_eq!(value["adr"]["mode"], "on");
        assert_eq!(value["band"], BAND_LA915_928A);
        assert_eq!(value["app_key"], "00112233");
        assert!(value.get("nwkskey").is_none());
        assert!(value.get("dev_addr").is_none());
    }

    #[test]
    fn device_update_body_skips_response_only_fields() {
        let device = Device {
            dev_eui: "70b3d57ed0000001".into(),
            ..Device::default()
        };
        let value = serde_json::to_value(&device).unwrap();
        assert!(value.get("detail").is_none());
        assert!(value.get("message").is_none());
        assert!(value.get("id").is_none());
        assert_eq!(value["dev_class"], "A");
    }

    #[test]
    fn connection_entry_uses_vendor_keys() {
        let page: ConnectionPage = serde_json::from_value(json!({
            "total": 1, "offset": 0, "limit": 100,
            "data": [{
                "ConnectionModel": {
                    "id": 9, "url": "https://hooks.example.com/lora",
                    "auth_header": "Token abc", "connection_type": "HTTP",
                    "description": "ingest", "created_at": "2023-03-01T12:00:00Z"
                },
                "FilterModel": {
                    "id": 4, "devices": ["70b3d57ed0000001"], "types": ["uplink"],
                    "applications": null, "lora": true
                }
            }]
        }))
        .unwrap();

        let entry = &page.data[0];
        assert_eq!(entry.connection.id, 9);
        assert_eq!(entry.connection.connection_type, "HTTP");
        assert!(entry.connection.created_at.is_some());
        assert_eq!(entry.filter.devices, vec!["70b3d57ed0000001".to_owned()]);
        assert!(entry.filter.applications.is_empty());
        assert!(entry.filter.lora);
    }

    #[test]
    fn auth_response_keeps_token_secret() {
        let resp: AuthResponse = serde_json::from_value(json!({
            "access_token": "eyJhbGciOi",
            "token_type": "bearer",
            "user_type": 2
        }))
        .unwrap();
        assert_eq!(resp.token_type, "bearer");
        assert!(!format!("{resp:?}").contains("eyJhbGciOi"));
    }
}
