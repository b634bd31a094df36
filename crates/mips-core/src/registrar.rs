//! # Callback Registrar
//!
//! Tells MIPS where to deliver Instant Merchant Notifications for this
//! deployment and records the outcome on the settings record.
//!
//! ```text
//! ┌──────────────┐  load   ┌───────────────┐
//! │  Registrar   │────────▶│ SettingsStore │
//! │              │◀────────│               │
//! │              │  save   └───────────────┘
//! │              │ (only on "success")
//! │              │  POST {base}/IMN_CALLBACK_ARCH
//! │              │────────▶┌───────────────┐
//! └──────────────┘         │ GatewayClient │
//!                          └───────────────┘
//! ```

use crate::checkout::CheckoutRenderContext;
use crate::environment::{GatewayEnvironment, GatewayUrls};
use crate::error::{MipsError, MipsResult};
use crate::payment::PaymentRequest;
use crate::settings::{Credentials, MipsSettings};
use crate::store::SharedSettingsStore;
use crate::site::SiteAddress;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Outbound MIPS API.
///
/// The HTTP implementation lives in `mips-gateway`; tests substitute fakes.
#[async_trait]
pub trait GatewayClient: Send + Sync {
    /// POST `{"crypted_callback": ...}` to `endpoint`.
    ///
    /// Must return `Ok(())` only when the gateway answers with a 2xx status
    /// and a body that is exactly `success`.
    async fn register_callback(
        &self,
        endpoint: &str,
        credentials: &Credentials,
        crypted_callback: &str,
    ) -> MipsResult<()>;

    /// Create a payment request and describe the outcome for the
    /// checkout-result page.
    async fn create_payment_request(
        &self,
        endpoint: &str,
        settings: &MipsSettings,
        request: &PaymentRequest,
    ) -> MipsResult<CheckoutRenderContext>;

    /// Provider name (for logging)
    fn provider_name(&self) -> &'static str {
        "mips"
    }
}

/// Type alias for a shared gateway client (dynamic dispatch)
pub type SharedGatewayClient = Arc<dyn GatewayClient>;

/// Successful registration
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationReceipt {
    pub attempt_id: Uuid,
    pub environment: GatewayEnvironment,
    pub callback_url: String,
    pub registered_at: DateTime<Utc>,
}

/// Registers the IMN callback and flips `is_callback_registered`
pub struct CallbackRegistrar {
    client: SharedGatewayClient,
    store: SharedSettingsStore,
    urls: GatewayUrls,
    in_flight: AtomicBool,
}

impl CallbackRegistrar {
    pub fn new(client: SharedGatewayClient, store: SharedSettingsStore, urls: GatewayUrls) -> Self {
        Self {
            client,
            store,
            urls,
            in_flight: AtomicBool::new(false),
        }
    }

    /// True while a registration request is outstanding
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn urls(&self) -> &GatewayUrls {
        &self.urls
    }

    /// Register `site`'s callback URL with the gateway.
    ///
    /// On failure the settings record is left untouched and the error is
    /// returned. A second call while one is running fails with
    /// [`MipsError::RegistrationInFlight`].
    #[instrument(skip(self, site), fields(site = %site))]
    pub async fn register(&self, site: &SiteAddress) -> MipsResult<RegistrationReceipt> {
        let _guard = InFlightGuard::acquire(&self.in_flight)?;

        let settings = self.store.load().await?;
        let environment = settings.environment();
        let endpoint = self.urls.callback_registration_url(environment);
        let callback_url = site.imn_callback_url();
        let attempt_id = Uuid::new_v4();

        info!(
            %attempt_id,
            %environment,
            provider = self.client.provider_name(),
            "Registering IMN callback: endpoint={}, callback={}",
            endpoint,
            callback_url
        );

        if let Err(e) = self
            .client
            .register_callback(&endpoint, &settings.credentials(), &callback_url)
            .await
        {
            warn!(%attempt_id, kind = e.kind(), "IMN callback registration failed: {}", e);
            return Err(e);
        }

        // Reload so edits made during the call survive
        let mut settings = self.store.load().await?;
        let registered_at = Utc::now();
        settings.is_callback_registered = true;
        settings.callback_registered_at = Some(registered_at);
        self.store.save(&settings).await?;

        info!(%attempt_id, "IMN callback registered");

        Ok(RegistrationReceipt {
            attempt_id,
            environment,
            callback_url,
            registered_at,
        })
    }
}

/// Held for the duration of one registration
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> MipsResult<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| MipsError::RegistrationInFlight)?;
        Ok(Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
