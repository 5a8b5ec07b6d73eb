//! Site settings sections.

use serde_json::json;

use beatstore_core::session::Caller;
use beatstore_core::settings::{SettingsSection, ShopSettings};
use beatstore_db::models::settings::SettingsDocument;
use beatstore_db::repositories::SettingsRepo;
use beatstore_events::{event_types, PlatformEvent};

use crate::context::ServiceContext;
use crate::error::{invalid, ServiceResult};

pub struct SettingsService;

impl SettingsService {
    /// Storefront settings are public: the shop reads its hero text and
    /// toggles from them.
    pub async fn shop(ctx: &ServiceContext) -> ServiceResult<ShopSettings> {
        Ok(SettingsRepo::get::<ShopSettings>(ctx.store()).await?.section)
    }

    pub async fn get<T: SettingsSection>(ctx: &ServiceContext, caller: &Caller) -> ServiceResult<SettingsDocument<T>> {
        caller.require_admin("read settings")?;
        Ok(SettingsRepo::get::<T>(ctx.store()).await?)
    }

    pub async fn save<T: SettingsSection>(
        ctx: &ServiceContext,
        caller: &Caller,
        section: T,
    ) -> ServiceResult<SettingsDocument<T>> {
        caller.require_admin("change settings")?;
        section.validate().map_err(invalid)?;
        let saved = SettingsRepo::save(ctx.store(), &section, &caller.user_id).await?;

        tracing::info!(section = T::KEY, user_id = %caller.user_id, "Settings saved");
        ctx.publish(
            PlatformEvent::new(event_types::SETTINGS_UPDATED)
                .with_source("settings", T::KEY)
                .with_actor(caller.user_id.clone())
                .with_payload(json!({ "section": T::KEY })),
        );
        Ok(saved)
    }
}
