// ── Client facade ──
//
// Owns the credential store, the transport, and one service per API
// resource. With auto-login enabled it logs in during construction and
// keeps the token fresh from a background task until `stop()` or drop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::auth::AuthService;
use crate::config::ClientConfig;
use crate::connections::ConnectionService;
use crate::credentials::Credentials;
use crate::devices::DeviceService;
use crate::downlink::DownlinkService;
use crate::error::Error;
use crate::messages::MessageService;
use crate::rest::Rest;
use crate::tags::TagService;
use crate::transport::{HttpTransport, Transport, TransportConfig};

/// Entry point for the NLT API.
///
/// Every service reads the bearer token from the same [`Credentials`], so a
/// login through [`auth()`](Self::auth), or a background refresh, is seen by
/// all subsequent calls.
pub struct Client<T = HttpTransport> {
    config: ClientConfig,
    creds: Arc<Credentials>,
    auth: Arc<AuthService<T>>,
    devices: DeviceService<T>,
    connections: ConnectionService<T>,
    messages: MessageService<T>,
    tags: TagService<T>,
    downlink: DownlinkService<T>,
    cancel: CancellationToken,
    refresher: Mutex<Option<JoinHandle<()>>>,
}

impl Client<HttpTransport> {
    /// Build a client over HTTP.
    ///
    /// Fails with [`Error::Validation`] before any network activity when the
    /// email or password is empty. With auto-login enabled, the first login
    /// must succeed for construction to succeed.
    pub async fn new(config: ClientConfig, credentials: Credentials) -> Result<Self, Error> {
        credentials.validate()?;
        let transport = HttpTransport::new(&TransportConfig {
            timeout: config.timeout,
        })?;
        Self::with_transport(config, credentials, transport).await
    }
}

impl<T: Transport> Client<T> {
    /// Build a client over any [`Transport`].
    pub async fn with_transport(
        config: ClientConfig,
        credentials: Credentials,
        transport: T,
    ) -> Result<Self, Error> {
        credentials.validate()?;

        let creds = Arc::new(credentials);
        let rest = Rest::new(
            Arc::new(transport),
            Arc::clone(&creds),
            config.base_url.clone(),
            config.max_retries,
        );

        let client = Self {
            auth: Arc::new(AuthService::new(rest.clone())),
            devices: DeviceService::new(rest.clone()),
            connections: ConnectionService::new(rest.clone()),
            messages: MessageService::new(rest.clone()),
            tags: TagService::new(rest.clone()),
            downlink: DownlinkService::new(rest),
            creds,
            config,
            cancel: CancellationToken::new(),
            refresher: Mutex::new(None),
        };

        if client.creds.auto_login() {
            client.start_auto_login().await?;
        }

        Ok(client)
    }

    /// Log in once, then spawn the periodic re-login.
    async fn start_auto_login(&self) -> Result<(), Error> {
        if self.config.refresh_interval.is_zero() {
            return Err(Error::Validation {
                message: "refresh interval must be greater than zero".into(),
            });
        }
        self.auth.refresh().await?;

        let handle = tokio::spawn(refresh_task(
            Arc::clone(&self.auth),
            self.config.refresh_interval,
            self.cancel.clone(),
        ));
        *self.refresher.lock().await = Some(handle);

        info!(
            interval_secs = self.config.refresh_interval.as_secs(),
            "auto-login active"
        );
        Ok(())
    }

    // ── Services ─────────────────────────────────────────────────────

    pub fn auth(&self) -> &AuthService<T> {
        &self.auth
    }

    pub fn devices(&self) -> &DeviceService<T> {
        &self.devices
    }

    pub fn connections(&self) -> &ConnectionService<T> {
        &self.connections
    }

    pub fn messages(&self) -> &MessageService<T> {
        &self.messages
    }

    pub fn tags(&self) -> &TagService<T> {
        &self.tags
    }

    pub fn downlink(&self) -> &DownlinkService<T> {
        &self.downlink
    }

    // ── State ────────────────────────────────────────────────────────

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The shared credential store.
    pub fn credentials(&self) -> &Arc<Credentials> {
        &self.creds
    }

    /// `true` while the background refresher is running.
    pub async fn is_refreshing(&self) -> bool {
        self.refresher
            .lock()
            .await
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }

    /// Stop the background refresher and wait for it to exit.
    ///
    /// Idempotent. Calls already in flight on other tasks are not affected.
    pub async fn stop(&self) {
        self.cancel.cancel();

        // Release the lock before joining so `is_refreshing` never waits on it.
        let handle = self.refresher.lock().await.take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!(error = %e, "token refresher ended abnormally");
            }
        }

        info!("client stopped");
    }
}

impl<T> Drop for Client<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Re-login every `period` until cancelled.
///
/// A failed login is logged and the previous token stays in place until the
/// next successful tick.
async fn refresh_task<T: Transport>(
    auth: Arc<AuthService<T>>,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                debug!("refreshing token");
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    result = auth.refresh() => match result {
                        Ok(_) => info!("token refreshed"),
                        Err(e) => warn!(error = %e, "scheduled login failed, keeping previous token"),
                    },
                }
            }
        }
    }

    debug!("token refresher exiting");
}
