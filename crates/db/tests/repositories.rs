//! Repository behaviour over the in-process store.

use std::collections::BTreeMap;
use std::sync::Arc;

use beatstore_core::cart::CartItem;
use beatstore_core::pricing::LicenseTier;
use beatstore_core::roles::Role;
use beatstore_core::settings::ShopSettings;
use beatstore_core::status::{BeatStatus, ContentStatus, ContentType, OrderStatus};
use beatstore_db::models::beat::{BeatFilter, BeatLicenses, CreateBeat, UpdateBeat};
use beatstore_db::models::content::CreateContent;
use beatstore_db::models::order::{NewOrder, OrderListParams};
use beatstore_db::models::support_message::NewSupportMessage;
use beatstore_db::models::user::{NewUser, UpdateProfile};
use beatstore_db::repositories::{
    BeatCounter, BeatRepo, ContentRepo, OrderRepo, SettingsRepo, SupportMessageRepo, UserRepo,
};
use beatstore_db::MemoryDocumentStore;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_beat(title: &str, status: BeatStatus, featured: bool, trending: bool) -> CreateBeat {
    CreateBeat {
        title: title.to_string(),
        artist: "Jay".to_string(),
        bpm: 140,
        key: "C#m".to_string(),
        genre: "trap".to_string(),
        tags: vec!["dark".to_string()],
        price: 29.0,
        audio_url: None,
        artwork_url: None,
        featured,
        trending,
        status: Some(status),
    }
}

fn new_order(number: &str, customer: &str, status: OrderStatus, total: f64) -> NewOrder {
    NewOrder {
        order_number: number.to_string(),
        customer_id: customer.to_string(),
        customer_email: format!("{customer}@example.com"),
        customer_name: None,
        items: vec![CartItem::priced("b1", "Night Drive", total, LicenseTier::Basic)],
        subtotal: total,
        total,
        status,
        payment_method: Some("card".to_string()),
    }
}

// ---------------------------------------------------------------------------
// Beats
// ---------------------------------------------------------------------------

#[tokio::test]
async fn beat_create_zeroes_counters_and_records_author() {
    let store = MemoryDocumentStore::new();
    let licenses = BeatLicenses::derive(29.0, None);
    let beat = BeatRepo::create(&store, &new_beat("A", BeatStatus::Draft, false, false), &licenses, "admin-1")
        .await
        .unwrap();
    assert_eq!((beat.plays, beat.downloads, beat.likes), (0, 0, 0));
    assert_eq!(beat.created_by.as_deref(), Some("admin-1"));
    assert_eq!(beat.last_updated_by.as_deref(), Some("admin-1"));
    assert_eq!(beat.licenses.premium.price, 43.5);
}

#[tokio::test]
async fn featured_and_trending_only_show_published() {
    let store = MemoryDocumentStore::new();
    let licenses = BeatLicenses::derive(29.0, None);
    for (title, status, featured, trending) in [
        ("pub-feat", BeatStatus::Published, true, true),
        ("draft-feat", BeatStatus::Draft, true, true),
        ("pub-plain", BeatStatus::Published, false, false),
    ] {
        BeatRepo::create(&store, &new_beat(title, status, featured, trending), &licenses, "a")
            .await
            .unwrap();
    }
    let featured = BeatRepo::featured(&store, 6).await.unwrap();
    assert_eq!(featured.len(), 1);
    assert_eq!(featured[0].title, "pub-feat");
    let trending = BeatRepo::trending(&store, 10).await.unwrap();
    assert_eq!(trending.len(), 1);
    assert_eq!(BeatRepo::list_published(&store).await.unwrap().len(), 2);
}

#[tokio::test]
async fn trending_orders_by_plays() {
    let store = MemoryDocumentStore::new();
    let licenses = BeatLicenses::derive(10.0, None);
    let low = BeatRepo::create(&store, &new_beat("low", BeatStatus::Published, false, true), &licenses, "a")
        .await
        .unwrap();
    let high = BeatRepo::create(&store, &new_beat("high", BeatStatus::Published, false, true), &licenses, "a")
        .await
        .unwrap();
    BeatRepo::increment(&store, &high.id, BeatCounter::Plays, 7).await.unwrap();
    BeatRepo::increment(&store, &low.id, BeatCounter::Plays, 2).await.unwrap();
    let trending = BeatRepo::trending(&store, 10).await.unwrap();
    let titles: Vec<&str> = trending.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, ["high", "low"]);
}

#[tokio::test]
async fn beat_update_applies_only_given_fields() {
    let store = MemoryDocumentStore::new();
    let licenses = BeatLicenses::derive(29.0, None);
    let beat = BeatRepo::create(&store, &new_beat("A", BeatStatus::Draft, false, false), &licenses, "a")
        .await
        .unwrap();
    let patch = UpdateBeat {
        title: Some("B".into()),
        price: Some(40.0),
        ..Default::default()
    };
    let repriced = BeatLicenses::derive(40.0, Some(&beat.licenses));
    let updated = BeatRepo::update(&store, &beat.id, &patch, Some(&repriced), "editor")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.title, "B");
    assert_eq!(updated.genre, "trap");
    assert_eq!(updated.licenses.exclusive.price, 120.0);
    assert_eq!(updated.last_updated_by.as_deref(), Some("editor"));
    assert_eq!(updated.created_by.as_deref(), Some("a"));
}

#[tokio::test]
async fn beat_listing_pages_with_cursor() {
    let store = MemoryDocumentStore::new();
    let licenses = BeatLicenses::derive(29.0, None);
    for i in 0..5 {
        BeatRepo::create(&store, &new_beat(&format!("b{i}"), BeatStatus::Published, false, false), &licenses, "a")
            .await
            .unwrap();
    }
    let filter = BeatFilter::default();
    let first = BeatRepo::list(&store, &filter, Some(2), None).await.unwrap();
    assert_eq!(first[0].title, "b4");
    let second = BeatRepo::list(&store, &filter, Some(2), Some(&first[1].id)).await.unwrap();
    let titles: Vec<&str> = second.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, ["b2", "b1"]);
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

#[tokio::test]
async fn order_lookup_by_number_and_customer() {
    let store = MemoryDocumentStore::new();
    OrderRepo::create(&store, &new_order("JR-2024-00001", "c1", OrderStatus::Pending, 29.0))
        .await
        .unwrap();
    OrderRepo::create(&store, &new_order("JR-2024-00002", "c2", OrderStatus::Completed, 43.5))
        .await
        .unwrap();
    let found = OrderRepo::find_by_number(&store, "JR-2024-00002").await.unwrap().unwrap();
    assert_eq!(found.customer_id, "c2");
    assert!(OrderRepo::number_exists(&store, "JR-2024-00001").await.unwrap());
    assert!(!OrderRepo::number_exists(&store, "JR-2024-99999").await.unwrap());
    assert_eq!(OrderRepo::list_by_customer(&store, "c1").await.unwrap().len(), 1);
}

#[tokio::test]
async fn order_numbers_are_reserved_once() {
    let store = Arc::new(MemoryDocumentStore::new());
    let claims: Vec<_> = (0..8)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move { OrderRepo::reserve_number(store.as_ref(), "JR-2024-00042").await.unwrap() })
        })
        .collect();
    let mut won = 0;
    for claim in claims {
        if claim.await.unwrap() {
            won += 1;
        }
    }
    assert_eq!(won, 1);

    OrderRepo::create(store.as_ref(), &new_order("JR-2024-00007", "c", OrderStatus::Pending, 10.0))
        .await
        .unwrap();
    assert!(!OrderRepo::reserve_number(store.as_ref(), "JR-2024-00007").await.unwrap());
    assert!(OrderRepo::reserve_number(store.as_ref(), "JR-2024-00008").await.unwrap());
}

#[tokio::test]
async fn order_list_sorts_by_whitelisted_field() {
    let store = MemoryDocumentStore::new();
    for (n, total) in [("JR-2024-00001", 10.0), ("JR-2024-00002", 30.0), ("JR-2024-00003", 20.0)] {
        OrderRepo::create(&store, &new_order(n, "c", OrderStatus::Pending, total)).await.unwrap();
    }
    let params = OrderListParams {
        order_by: Some("total".into()),
        direction: Some(beatstore_db::Direction::Asc),
        ..Default::default()
    };
    let totals: Vec<f64> = OrderRepo::list(&store, &params).await.unwrap().iter().map(|o| o.total).collect();
    assert_eq!(totals, [10.0, 20.0, 30.0]);

    let params = OrderListParams {
        order_by: Some("customerEmail; DROP".into()),
        limit: Some(1),
        ..Default::default()
    };
    let newest = OrderRepo::list(&store, &params).await.unwrap();
    assert_eq!(newest[0].order_number, "JR-2024-00003");
}

#[tokio::test]
async fn download_links_merge() {
    let store = MemoryDocumentStore::new();
    let order = OrderRepo::create(&store, &new_order("JR-2024-00001", "c", OrderStatus::Completed, 29.0))
        .await
        .unwrap();
    let first = BTreeMap::from([("b1".to_string(), "https://cdn/b1.zip".to_string())]);
    let second = BTreeMap::from([("b2".to_string(), "https://cdn/b2.zip".to_string())]);
    OrderRepo::add_download_links(&store, &order.id, &first).await.unwrap();
    let merged = OrderRepo::add_download_links(&store, &order.id, &second).await.unwrap().unwrap();
    assert_eq!(merged.download_links.len(), 2);
    assert!(OrderRepo::add_download_links(&store, "missing", &first).await.unwrap().is_none());
}

#[tokio::test]
async fn status_update_stamps_completion() {
    let store = MemoryDocumentStore::new();
    let order = OrderRepo::create(&store, &new_order("JR-2024-00001", "c", OrderStatus::Pending, 29.0))
        .await
        .unwrap();
    let updated = OrderRepo::update_status(
        &store,
        &order.id,
        OrderStatus::Completed,
        Some("paid by card"),
        Some("2024-05-01T10:00:00.000000Z"),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.status, OrderStatus::Completed);
    assert_eq!(updated.admin_note.as_deref(), Some("paid by card"));
    assert!(updated.completed_at.is_some());
}

// ---------------------------------------------------------------------------
// Content, users, chat, settings
// ---------------------------------------------------------------------------

#[tokio::test]
async fn content_by_slug_and_published_order() {
    let store = MemoryDocumentStore::new();
    let input = |title: &str| CreateContent {
        content_type: ContentType::Blog,
        status: None,
        title: title.to_string(),
        slug: None,
        excerpt: None,
        body: "body".to_string(),
        category: None,
        tags: vec![],
        cover_image_url: None,
        featured: false,
        scheduled_for: None,
    };
    ContentRepo::create(&store, &input("Old"), "old", ContentStatus::Published, "a", "Admin", Some("2024-01-01T00:00:00.000000Z"))
        .await
        .unwrap();
    ContentRepo::create(&store, &input("New"), "new", ContentStatus::Published, "a", "Admin", Some("2024-06-01T00:00:00.000000Z"))
        .await
        .unwrap();
    ContentRepo::create(&store, &input("Draft"), "draft", ContentStatus::Draft, "a", "Admin", None)
        .await
        .unwrap();

    let found = ContentRepo::find_by_slug(&store, "old").await.unwrap().unwrap();
    assert_eq!(found.title, "Old");
    assert_eq!(found.views, 0);
    let published = ContentRepo::published(&store, None, None).await.unwrap();
    let titles: Vec<&str> = published.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, ["New", "Old"]);
}

#[tokio::test]
async fn user_profile_round_trip() {
    let store = MemoryDocumentStore::new();
    let user = UserRepo::create(
        &store,
        "u1",
        &NewUser {
            email: "u1@example.com".into(),
            display_name: None,
            photo_url: None,
            role: Role::User,
        },
    )
    .await
    .unwrap();
    assert_eq!(user.id, "u1");
    let updated = UserRepo::update_profile(
        &store,
        "u1",
        &UpdateProfile {
            display_name: Some("Jay".into()),
            photo_url: None,
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.display_name.as_deref(), Some("Jay"));
    let promoted = UserRepo::update_role(&store, "u1", Role::Artist).await.unwrap().unwrap();
    assert_eq!(promoted.role, Role::Artist);
    assert_eq!(UserRepo::list(&store, Some(Role::Artist)).await.unwrap().len(), 1);
}

#[tokio::test]
async fn support_thread_excludes_other_users() {
    let store = MemoryDocumentStore::new();
    let message = |sender: &str, role: Role, recipient: Option<&str>, text: &str| NewSupportMessage {
        sender_id: sender.to_string(),
        sender_name: sender.to_string(),
        sender_email: format!("{sender}@example.com"),
        sender_role: role,
        recipient_id: recipient.map(str::to_string),
        message: text.to_string(),
    };
    SupportMessageRepo::create(&store, &message("c1", Role::User, None, "hello")).await.unwrap();
    SupportMessageRepo::create(&store, &message("c2", Role::User, None, "other")).await.unwrap();
    SupportMessageRepo::create(&store, &message("adm", Role::Admin, Some("c1"), "hi c1")).await.unwrap();

    let thread = SupportMessageRepo::thread(&store, "c1").await.unwrap();
    let texts: Vec<&str> = thread.iter().map(|m| m.message.as_str()).collect();
    assert_eq!(texts, ["hello", "hi c1"]);
    assert_eq!(SupportMessageRepo::list_all(&store).await.unwrap().len(), 3);
}

#[tokio::test]
async fn settings_default_until_saved() {
    let store = MemoryDocumentStore::new();
    let unsaved = SettingsRepo::get::<ShopSettings>(&store).await.unwrap();
    assert!(unsaved.updated_at.is_none());
    assert_eq!(unsaved.section.currency, "EUR");

    let shop = ShopSettings {
        store_name: "JR Beats".into(),
        ..Default::default()
    };
    let saved = SettingsRepo::save(&store, &shop, "admin-1").await.unwrap();
    assert_eq!(saved.updated_by.as_deref(), Some("admin-1"));
    let loaded = SettingsRepo::get::<ShopSettings>(&store).await.unwrap();
    assert_eq!(loaded.section.store_name, "JR Beats");
    assert!(loaded.updated_at.is_some());
}
