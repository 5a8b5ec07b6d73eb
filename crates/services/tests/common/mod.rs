#![allow(dead_code)]

use std::sync::Arc;

use beatstore_core::roles::Role;
use beatstore_core::session::Caller;
use beatstore_core::status::BeatStatus;
use beatstore_db::models::beat::{Beat, CreateBeat};
use beatstore_db::models::user::NewUser;
use beatstore_db::repositories::UserRepo;
use beatstore_db::{DocumentStore, MemoryDocumentStore};
use beatstore_events::EventBus;
use beatstore_services::{BeatService, ServiceContext};

pub fn context() -> ServiceContext {
    let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
    ServiceContext::new(store, Arc::new(EventBus::default()))
}

pub fn admin() -> Caller {
    Caller::new("admin-1", "admin@example.com", Role::Admin).with_display_name("Jay Admin")
}

pub fn artist() -> Caller {
    Caller::new("artist-1", "artist@example.com", Role::Artist).with_display_name("MC Artist")
}

pub fn customer() -> Caller {
    Caller::new("user-1", "fan@example.com", Role::User).with_display_name("Fan")
}

pub fn other_customer() -> Caller {
    Caller::new("user-2", "other@example.com", Role::User)
}

/// Store a profile document for `caller`.
pub async fn register(ctx: &ServiceContext, caller: &Caller) {
    UserRepo::create(
        ctx.store(),
        &caller.user_id,
        &NewUser {
            email: caller.email.clone(),
            display_name: caller.display_name.clone(),
            photo_url: None,
            role: caller.role,
        },
    )
    .await
    .unwrap();
}

pub fn beat_input(title: &str, price: f64, status: BeatStatus) -> CreateBeat {
    CreateBeat {
        title: title.to_string(),
        artist: "JR".to_string(),
        bpm: 140,
        key: "Am".to_string(),
        genre: "trap".to_string(),
        tags: vec!["dark".to_string()],
        price,
        audio_url: None,
        artwork_url: None,
        featured: false,
        trending: false,
        status: Some(status),
    }
}

pub async fn published_beat(ctx: &ServiceContext, title: &str, price: f64) -> Beat {
    BeatService::create(ctx, &admin(), beat_input(title, price, BeatStatus::Published))
        .await
        .unwrap()
}
