use std::sync::Arc;
use tracing::info;

use super::errors::KennelResult;
use crate::storage::SettingsStorage;

const WAITLIST_ENABLED: &str = "waitlist_enabled";

/// Site-wide settings editable from the admin dashboard
#[derive(Clone)]
pub struct SettingsService {
    settings: Arc<dyn SettingsStorage>,
}

impl SettingsService {
    pub fn new(settings: Arc<dyn SettingsStorage>) -> Self {
        Self { settings }
    }

    /// Whether the public waitlist accepts new registrations. Open until an admin closes it.
    pub async fn waitlist_enabled(&self) -> KennelResult<bool> {
        let value = self.settings.get_setting(WAITLIST_ENABLED).await?;
        Ok(value.map(|v| v == "true").unwrap_or(true))
    }

    pub async fn set_waitlist_enabled(&self, enabled: bool) -> KennelResult<()> {
        info!("Setting waitlist_enabled={}", enabled);
        self.settings
            .put_setting(WAITLIST_ENABLED, if enabled { "true" } else { "false" })
            .await?;
        Ok(())
    }

    /// Flip the waitlist setting and return the new value
    pub async fn toggle_waitlist(&self) -> KennelResult<bool> {
        let enabled = !self.waitlist_enabled().await?;
        self.set_waitlist_enabled(enabled).await?;
        Ok(enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{DbConnection, SettingsRepository};

    #[tokio::test]
    async fn test_waitlist_defaults_open_and_toggles() {
        let db = DbConnection::init_test().await.unwrap();
        let service = SettingsService::new(Arc::new(SettingsRepository::new(db)));

        assert!(service.waitlist_enabled().await.unwrap());
        assert!(!service.toggle_waitlist().await.unwrap());
        assert!(!service.waitlist_enabled().await.unwrap());
        assert!(service.toggle_waitlist().await.unwrap());
    }
}
