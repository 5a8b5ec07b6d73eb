mod common;

use assert_matches::assert_matches;

use beatstore_core::error::CoreError;
use beatstore_core::roles::Role;
use beatstore_core::settings::{NotificationSettings, ShopSettings};
use beatstore_core::status::{ContentStatus, ContentType};
use beatstore_db::models::content::{CreateContent, UpdateContent};
use beatstore_db::models::support_message::SendMessage;
use beatstore_db::models::user::UpdateProfile;
use beatstore_db::repositories::BeatCounter;
use beatstore_services::{
    AnalyticsService, BeatService, ChatService, ContentService, ServiceError, SettingsService,
    UserService,
};

use common::*;

fn article(title: &str, status: ContentStatus) -> CreateContent {
    CreateContent {
        content_type: ContentType::Blog,
        status: Some(status),
        title: title.to_string(),
        slug: None,
        excerpt: None,
        body: "Body".to_string(),
        category: None,
        tags: Vec::new(),
        cover_image_url: None,
        featured: false,
        scheduled_for: None,
    }
}

fn message(text: &str, recipient: Option<&str>) -> SendMessage {
    SendMessage {
        message: text.to_string(),
        recipient_id: recipient.map(str::to_string),
    }
}

#[tokio::test]
async fn content_slugs_are_unique() {
    let ctx = context();
    let first = ContentService::create(&ctx, &admin(), article("Hello World", ContentStatus::Draft))
        .await
        .unwrap();
    assert_eq!(first.slug, "hello-world");
    assert!(first.published_at.is_none());

    assert_matches!(
        ContentService::create(&ctx, &admin(), article("Hello, world!", ContentStatus::Draft)).await,
        Err(ServiceError::Core(CoreError::Conflict(_)))
    );
}

#[tokio::test]
async fn titles_without_ascii_still_get_a_slug() {
    let ctx = context();
    let first = ContentService::create(&ctx, &admin(), article("日本語ビート", ContentStatus::Published))
        .await
        .unwrap();
    assert!(first.slug.starts_with("content-"), "{}", first.slug);
    assert_eq!(first.title, "日本語ビート");

    let second = ContentService::create(&ctx, &admin(), article("!!!", ContentStatus::Draft))
        .await
        .unwrap();
    assert_ne!(first.slug, second.slug);

    let found = ContentService::get_by_slug(&ctx, None, &first.slug).await.unwrap();
    assert_eq!(found.id, first.id);
}

#[tokio::test]
async fn publishing_stamps_published_at_once() {
    let ctx = context();
    let draft = ContentService::create(&ctx, &admin(), article("Tape Notes", ContentStatus::Draft))
        .await
        .unwrap();
    assert_matches!(
        ContentService::get_by_slug(&ctx, None, "tape-notes").await,
        Err(ServiceError::Core(CoreError::NotFound { .. }))
    );

    let publish = UpdateContent {
        status: Some(ContentStatus::Published),
        ..Default::default()
    };
    let published = ContentService::update(&ctx, &admin(), &draft.id, publish.clone())
        .await
        .unwrap();
    let stamped = published.published_at.unwrap();

    let retitled = UpdateContent {
        title: Some("Tape Notes, Revised".into()),
        ..publish
    };
    let again = ContentService::update(&ctx, &admin(), &draft.id, retitled).await.unwrap();
    assert_eq!(again.published_at, Some(stamped));

    let public = ContentService::get_by_slug(&ctx, None, "tape-notes").await.unwrap();
    assert_eq!(public.author_name, "Jay Admin");
    assert_eq!(ContentService::published(&ctx, None, None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn admin_replies_need_a_known_recipient() {
    let ctx = context();
    register(&ctx, &customer()).await;

    let question = ChatService::send(&ctx, &customer(), message("  where is my beat?  ", Some("admin-1")))
        .await
        .unwrap();
    assert_eq!(question.message, "where is my beat?");
    assert!(question.recipient_id.is_none());

    assert_matches!(
        ChatService::send(&ctx, &admin(), message("hi", None)).await,
        Err(ServiceError::Core(CoreError::Validation(_)))
    );
    assert_matches!(
        ChatService::send(&ctx, &admin(), message("hi", Some("ghost"))).await,
        Err(ServiceError::Core(CoreError::NotFound { .. }))
    );

    let reply = ChatService::send(&ctx, &admin(), message("on its way", Some("user-1")))
        .await
        .unwrap();
    assert_eq!(reply.sender_name, "Jay Admin");

    let thread = ChatService::thread(&ctx, &customer(), "user-1").await.unwrap();
    let texts: Vec<&str> = thread.iter().map(|m| m.message.as_str()).collect();
    assert_eq!(texts, ["where is my beat?", "on its way"]);

    assert_matches!(
        ChatService::thread(&ctx, &other_customer(), "user-1").await,
        Err(ServiceError::Core(CoreError::Forbidden(_)))
    );
}

#[tokio::test]
async fn inbox_groups_by_sender() {
    let ctx = context();
    ChatService::send(&ctx, &customer(), message("one", None)).await.unwrap();
    ChatService::send(&ctx, &customer(), message("two", None)).await.unwrap();
    ChatService::send(&ctx, &artist(), message("collab?", None)).await.unwrap();

    let inbox = ChatService::conversations(&ctx, &admin(), None, None).await.unwrap();
    assert_eq!(inbox.len(), 2);
    assert_eq!(inbox[0].user_id, "artist-1");
    assert_eq!(inbox[1].message_count, 2);
    assert_eq!(inbox[1].last_message, "two");

    let artists = ChatService::conversations(&ctx, &admin(), Some(Role::Artist), None)
        .await
        .unwrap();
    assert_eq!(artists.len(), 1);

    assert_matches!(
        ChatService::conversations(&ctx, &customer(), None, None).await,
        Err(ServiceError::Core(CoreError::Forbidden(_)))
    );
}

#[tokio::test]
async fn settings_are_validated_and_guarded() {
    let ctx = context();
    assert_eq!(SettingsService::shop(&ctx).await.unwrap(), ShopSettings::default());

    let bad = ShopSettings {
        currency: "XYZ".into(),
        ..Default::default()
    };
    assert_matches!(
        SettingsService::save(&ctx, &admin(), bad).await,
        Err(ServiceError::Core(CoreError::Validation(_)))
    );

    let shop = ShopSettings {
        store_name: "JR Beats".into(),
        ..Default::default()
    };
    let saved = SettingsService::save(&ctx, &admin(), shop).await.unwrap();
    assert_eq!(saved.updated_by.as_deref(), Some("admin-1"));
    assert_eq!(SettingsService::shop(&ctx).await.unwrap().store_name, "JR Beats");

    assert_matches!(
        SettingsService::get::<NotificationSettings>(&ctx, &customer()).await,
        Err(ServiceError::Core(CoreError::Forbidden(_)))
    );
    assert_matches!(
        SettingsService::save(&ctx, &artist(), ShopSettings::default()).await,
        Err(ServiceError::Core(CoreError::Forbidden(_)))
    );
}

#[tokio::test]
async fn profiles_and_roles() {
    let ctx = context();
    register(&ctx, &admin()).await;
    register(&ctx, &customer()).await;

    let update = UpdateProfile {
        display_name: Some("Big Fan".into()),
        photo_url: None,
    };
    let user = UserService::update_profile(&ctx, &customer(), "user-1", update.clone())
        .await
        .unwrap();
    assert_eq!(user.display_name.as_deref(), Some("Big Fan"));
    assert_matches!(
        UserService::update_profile(&ctx, &other_customer(), "user-1", update).await,
        Err(ServiceError::Core(CoreError::Forbidden(_)))
    );

    let promoted = UserService::update_role(&ctx, &admin(), "user-1", Role::Artist).await.unwrap();
    assert_eq!(promoted.role, Role::Artist);
    assert_matches!(
        UserService::update_role(&ctx, &admin(), "admin-1", Role::User).await,
        Err(ServiceError::Core(CoreError::Conflict(_)))
    );
    assert_eq!(UserService::list(&ctx, &admin(), Some(Role::Artist)).await.unwrap().len(), 1);
}

#[tokio::test]
async fn analytics_ranks_beats_by_plays() {
    let ctx = context();
    let quiet = published_beat(&ctx, "Quiet", 10.0).await;
    let loud = published_beat(&ctx, "Loud", 10.0).await;
    for _ in 0..3 {
        BeatService::increment(&ctx, &loud.id, BeatCounter::Plays).await.unwrap();
    }
    BeatService::increment(&ctx, &quiet.id, BeatCounter::Plays).await.unwrap();

    let overview = AnalyticsService::overview(&ctx, &admin()).await.unwrap();
    assert_eq!(overview.engagement.total_beats, 2);
    assert_eq!(overview.engagement.total_plays, 4);
    assert_eq!(overview.top_beats[0].title, "Loud");
    assert!(overview.recent_orders.is_empty());

    assert_matches!(
        AnalyticsService::overview(&ctx, &artist()).await,
        Err(ServiceError::Core(CoreError::Forbidden(_)))
    );
}
