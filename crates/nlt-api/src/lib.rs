// nlt-api: Async Rust client for the NLT LoRaWAN device-management API

pub mod auth;
pub mod client;
pub mod config;
pub mod connections;
pub mod credentials;
pub mod devices;
pub mod downlink;
pub mod error;
pub mod messages;
mod rest;
pub mod tags;
pub mod transport;
pub mod types;

pub use auth::AuthService;
pub use client::Client;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use connections::ConnectionService;
pub use credentials::Credentials;
pub use devices::DeviceService;
pub use downlink::DownlinkService;
pub use error::Error;
pub use messages::{MessageFilter, MessageService};
pub use tags::TagService;
pub use transport::{HttpTransport, RawResponse, Transport, TransportConfig, TransportRequest};
