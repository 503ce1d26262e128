use std::sync::Arc;

use tokio::sync::broadcast;

use crate::engine::catalog::ConsentStatus;
use crate::engine::events::StorefrontEvent;
use crate::engine::storage::StorageArea;

/// Storage key under which the consent decision is persisted.
pub const CONSENT_KEY: &str = "cookie_consent_status";

/// The user's cookie-consent decision.
///
/// Unlike the other stores this one keeps no in-memory copy; the decision
/// is read through to the backing [`StorageArea`] every time, so multiple
/// stores over the same area always agree. A missing or unrecognized
/// persisted value reads as [`ConsentStatus::Unset`].
pub struct ConsentStore {
    area: Arc<dyn StorageArea>,
    event_tx: broadcast::Sender<StorefrontEvent>,
}

impl ConsentStore {
    pub fn new(area: Arc<dyn StorageArea>, event_tx: broadcast::Sender<StorefrontEvent>) -> Self {
        Self { area, event_tx }
    }

    /// Returns the persisted decision.
    pub fn status(&self) -> ConsentStatus {
        let Some(raw) = self.area.get_item(CONSENT_KEY) else {
            return ConsentStatus::Unset;
        };

        match ConsentStatus::from_stored(&raw) {
            Some(status) => status,
            None => {
                log::warn!("Unrecognized consent value {raw:?}; treating as unset");
                ConsentStatus::Unset
            }
        }
    }

    /// `true` when no decision has been recorded; the banner should show.
    pub fn needs_decision(&self) -> bool {
        self.status() == ConsentStatus::Unset
    }

    pub fn accept(&self) {
        self.record(ConsentStatus::Accepted);
    }

    pub fn decline(&self) {
        self.record(ConsentStatus::Declined);
    }

    /// Forgets the decision; the banner shows again next time.
    pub fn reset(&self) {
        if let Err(e) = self.area.remove_item(CONSENT_KEY) {
            log::warn!("Failed to clear consent decision: {e}");
            return;
        }

        let _ = self.event_tx.send(StorefrontEvent::ConsentChanged {
            status: ConsentStatus::Unset,
        });
    }

    fn record(&self, status: ConsentStatus) {
        let Some(literal) = status.stored_literal() else {
            return;
        };

        if let Err(e) = self.area.set_item(CONSENT_KEY, literal) {
            log::warn!("Failed to persist consent decision: {e}");
            return;
        }

        let _ = self.event_tx.send(StorefrontEvent::ConsentChanged { status });
    }
}

impl std::fmt::Debug for ConsentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsentStore")
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}
