mod common;

use assert_matches::assert_matches;

use beatstore_core::catalog::CatalogSort;
use beatstore_core::error::CoreError;
use beatstore_core::status::BeatStatus;
use beatstore_db::models::beat::{BeatFilter, UpdateBeat};
use beatstore_db::repositories::BeatCounter;
use beatstore_events::event_types;
use beatstore_services::beats::{BrowseParams, PageParams};
use beatstore_services::{BeatService, ServiceError};

use common::*;

#[tokio::test]
async fn only_admins_write_beats() {
    let ctx = context();
    for caller in [artist(), customer()] {
        let err = BeatService::create(&ctx, &caller, beat_input("A", 29.0, BeatStatus::Draft))
            .await
            .unwrap_err();
        assert_matches!(err, ServiceError::Core(CoreError::Forbidden(_)));
    }
    let err = BeatService::delete(&ctx, &customer(), "missing").await.unwrap_err();
    assert_matches!(err, ServiceError::Core(CoreError::Forbidden(_)));
}

#[tokio::test]
async fn create_derives_tier_prices_and_announces() {
    let ctx = context();
    let mut events = ctx.events.subscribe();
    let beat = published_beat(&ctx, "Night Drive", 29.0).await;
    assert_eq!(beat.licenses.basic.price, 29.0);
    assert_eq!(beat.licenses.premium.price, 43.5);
    assert_eq!(beat.licenses.exclusive.price, 87.0);

    assert_eq!(events.recv().await.unwrap().event_type, event_types::BEAT_CREATED);
    assert_eq!(events.recv().await.unwrap().event_type, event_types::BEAT_PUBLISHED);
}

#[tokio::test]
async fn invalid_beats_are_rejected() {
    let ctx = context();
    let mut input = beat_input("A", -1.0, BeatStatus::Draft);
    assert_matches!(
        BeatService::create(&ctx, &admin(), input.clone()).await,
        Err(ServiceError::Core(CoreError::Validation(_)))
    );
    input.price = 10.0;
    input.bpm = 5;
    assert_matches!(
        BeatService::create(&ctx, &admin(), input).await,
        Err(ServiceError::Core(CoreError::Validation(_)))
    );
}

#[tokio::test]
async fn drafts_are_hidden_from_the_public() {
    let ctx = context();
    let draft = BeatService::create(&ctx, &admin(), beat_input("Draft", 20.0, BeatStatus::Draft))
        .await
        .unwrap();
    published_beat(&ctx, "Live", 20.0).await;

    assert_matches!(
        BeatService::get(&ctx, None, &draft.id).await,
        Err(ServiceError::Core(CoreError::NotFound { .. }))
    );
    assert!(BeatService::get(&ctx, Some(&admin()), &draft.id).await.is_ok());

    let public = BeatService::list(&ctx, Some(&customer()), BeatFilter::default(), &PageParams::default())
        .await
        .unwrap();
    assert_eq!(public.len(), 1);
    let all = BeatService::list(&ctx, Some(&admin()), BeatFilter::default(), &PageParams::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn price_change_reprices_tiers() {
    let ctx = context();
    let beat = published_beat(&ctx, "A", 20.0).await;
    let update = UpdateBeat {
        price: Some(39.0),
        ..Default::default()
    };
    let updated = BeatService::update(&ctx, &admin(), &beat.id, update).await.unwrap();
    assert_eq!(updated.licenses.premium.price, 58.5);
    assert_eq!(updated.last_updated_by.as_deref(), Some("admin-1"));
}

#[tokio::test]
async fn browse_searches_and_sorts_published() {
    let ctx = context();
    published_beat(&ctx, "Cheap Dark", 10.0).await;
    published_beat(&ctx, "Pricey Dark", 90.0).await;
    let mut sunny = beat_input("Sunny", 50.0, BeatStatus::Published);
    sunny.tags = vec!["chill".to_string()];
    BeatService::create(&ctx, &admin(), sunny).await.unwrap();

    let params = BrowseParams {
        search: Some("dark".into()),
        genre: None,
        sort: CatalogSort::PriceHigh,
    };
    let found = BeatService::browse(&ctx, &params).await.unwrap();
    let titles: Vec<&str> = found.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, ["Pricey Dark", "Cheap Dark"]);

    assert_eq!(BeatService::genres(&ctx).await.unwrap(), ["trap"]);
}

#[tokio::test]
async fn counters_and_missing_beats() {
    let ctx = context();
    let beat = published_beat(&ctx, "A", 20.0).await;
    BeatService::increment(&ctx, &beat.id, BeatCounter::Plays).await.unwrap();
    BeatService::increment(&ctx, &beat.id, BeatCounter::Plays).await.unwrap();
    let beat = BeatService::get(&ctx, None, &beat.id).await.unwrap();
    assert_eq!(beat.plays, 2);

    assert_matches!(
        BeatService::increment(&ctx, "missing", BeatCounter::Likes).await,
        Err(ServiceError::Core(CoreError::NotFound { .. }))
    );
}

#[tokio::test]
async fn public_subscription_sees_publishing() {
    let ctx = context();
    let mut sub = BeatService::subscribe(&ctx, None, BeatFilter::default()).await.unwrap();
    assert!(sub.current().documents.is_empty());

    published_beat(&ctx, "A", 20.0).await;
    let mut latest = sub.current();
    while latest.documents.is_empty() {
        latest = sub.changed().await.unwrap();
    }
    assert_eq!(latest.documents.len(), 1);
    assert_eq!(latest.documents[0].data["status"], "published");
}
