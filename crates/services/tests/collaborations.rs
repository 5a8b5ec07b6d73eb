mod common;

use assert_matches::assert_matches;

use beatstore_core::error::CoreError;
use beatstore_core::roles::Role;
use beatstore_core::status::{CollaborationStatus, CollaborationType, PaymentStatus, RequestStatus};
use beatstore_db::models::artist_request::CreateArtistRoleRequest;
use beatstore_db::models::collab_request::{CreateCollabRequest, ReviewRequest};
use beatstore_db::models::collaboration::CreateCollaboration;
use beatstore_db::repositories::UserRepo;
use beatstore_services::{
    ArtistRoleRequestService, CollabRequestService, CollaborationService, ServiceError,
};

use common::*;

fn booking(title: &str, budget: f64) -> CreateCollaboration {
    CreateCollaboration {
        title: title.to_string(),
        collaboration_type: CollaborationType::MusicVideo,
        description: None,
        client_name: "Label".to_string(),
        client_email: "label@example.com".to_string(),
        assigned_to: None,
        budget,
        status: None,
        start_date: None,
        deadline: None,
        notes: None,
    }
}

fn collab_request(title: &str) -> CreateCollabRequest {
    CreateCollabRequest {
        title: title.to_string(),
        collaboration_type: CollaborationType::StudioSession,
        description: "Two days in the studio".to_string(),
        budget: Some(500.0),
        preferred_start_date: Some("2026-11-01".to_string()),
        message: Some("Let's work".to_string()),
    }
}

fn application(name: &str) -> CreateArtistRoleRequest {
    CreateArtistRoleRequest {
        artist_name: name.to_string(),
        region: None,
        city: Some("Antwerp".to_string()),
        roles: vec!["rapper".to_string()],
        instagram: None,
        spotify: None,
        additional_info: None,
    }
}

#[tokio::test]
async fn pipeline_moves_forward_and_stamps_end_date() {
    let ctx = context();
    let collab = CollaborationService::create(&ctx, &admin(), booking("Video", 1000.0))
        .await
        .unwrap();
    assert_eq!(collab.status, CollaborationStatus::Inquiry);
    assert_eq!(collab.payment_status, PaymentStatus::Unpaid);

    let signed = CollaborationService::transition(&ctx, &admin(), &collab.id, CollaborationStatus::Signed)
        .await
        .unwrap();
    assert!(signed.end_date.is_none());

    assert_matches!(
        CollaborationService::transition(&ctx, &admin(), &collab.id, CollaborationStatus::Negotiating).await,
        Err(ServiceError::Core(CoreError::Validation(_)))
    );
    assert_matches!(
        CollaborationService::transition(&ctx, &admin(), &collab.id, CollaborationStatus::Signed).await,
        Err(ServiceError::Core(CoreError::Conflict(_)))
    );

    let done = CollaborationService::transition(&ctx, &admin(), &collab.id, CollaborationStatus::Completed)
        .await
        .unwrap();
    assert_eq!(done.end_date.as_deref().map(str::len), Some(10));
    assert_matches!(
        CollaborationService::transition(&ctx, &admin(), &collab.id, CollaborationStatus::Cancelled).await,
        Err(ServiceError::Core(CoreError::Conflict(_)))
    );
}

#[tokio::test]
async fn payments_accumulate() {
    let ctx = context();
    let collab = CollaborationService::create(&ctx, &admin(), booking("Show", 1000.0))
        .await
        .unwrap();
    let partial = CollaborationService::record_payment(&ctx, &admin(), &collab.id, 400.0)
        .await
        .unwrap();
    assert_eq!(partial.paid_amount, 400.0);
    assert_eq!(partial.payment_status, PaymentStatus::Partial);

    let paid = CollaborationService::record_payment(&ctx, &admin(), &collab.id, 600.0)
        .await
        .unwrap();
    assert_eq!(paid.payment_status, PaymentStatus::Paid);

    assert_matches!(
        CollaborationService::record_payment(&ctx, &admin(), &collab.id, 0.0).await,
        Err(ServiceError::Core(CoreError::Validation(_)))
    );

    let stats = CollaborationService::stats(&ctx, &admin()).await.unwrap();
    assert_eq!(stats.total, 1);
    assert_eq!(stats.total_revenue, 1000.0);
}

#[tokio::test]
async fn cancelled_collaborations_refuse_payments() {
    let ctx = context();
    let collab = CollaborationService::create(&ctx, &admin(), booking("Gig", 300.0))
        .await
        .unwrap();
    CollaborationService::transition(&ctx, &admin(), &collab.id, CollaborationStatus::Cancelled)
        .await
        .unwrap();
    assert_matches!(
        CollaborationService::record_payment(&ctx, &admin(), &collab.id, 50.0).await,
        Err(ServiceError::Core(CoreError::Conflict(_)))
    );
}

#[tokio::test]
async fn artists_see_only_their_collaborations() {
    let ctx = context();
    let mut mine = booking("Mine", 100.0);
    mine.assigned_to = Some("artist-1".to_string());
    let mine = CollaborationService::create(&ctx, &admin(), mine).await.unwrap();
    let other = CollaborationService::create(&ctx, &admin(), booking("Other", 100.0))
        .await
        .unwrap();

    let listed = CollaborationService::list_for_artist(&ctx, &artist()).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, mine.id);

    assert!(CollaborationService::get(&ctx, &artist(), &mine.id).await.is_ok());
    assert_matches!(
        CollaborationService::get(&ctx, &artist(), &other.id).await,
        Err(ServiceError::Core(CoreError::NotFound { .. }))
    );
    assert_matches!(
        CollaborationService::list_for_artist(&ctx, &customer()).await,
        Err(ServiceError::Core(CoreError::Forbidden(_)))
    );
}

#[tokio::test]
async fn approving_a_collab_request_opens_a_collaboration() {
    let ctx = context();
    assert_matches!(
        CollabRequestService::submit(&ctx, &customer(), collab_request("Nope")).await,
        Err(ServiceError::Core(CoreError::Forbidden(_)))
    );

    let request = CollabRequestService::submit(&ctx, &artist(), collab_request("Session"))
        .await
        .unwrap();
    assert_eq!(request.status, RequestStatus::Pending);
    assert_eq!(request.artist_name, "MC Artist");

    let approved = CollabRequestService::approve(
        &ctx,
        &admin(),
        &request.id,
        ReviewRequest {
            note: Some("See you there".into()),
        },
    )
    .await
    .unwrap();
    assert_eq!(approved.request.status, RequestStatus::Approved);
    assert_eq!(approved.request.collaboration_id.as_deref(), Some(approved.collaboration.id.as_str()));
    assert_eq!(approved.collaboration.status, CollaborationStatus::Inquiry);
    assert_eq!(approved.collaboration.assigned_to.as_deref(), Some("artist-1"));
    assert_eq!(approved.collaboration.budget, 500.0);
    assert_eq!(approved.collaboration.request_id.as_deref(), Some(request.id.as_str()));

    assert_matches!(
        CollabRequestService::reject(&ctx, &admin(), &request.id, ReviewRequest::default()).await,
        Err(ServiceError::Core(CoreError::Conflict(_)))
    );
    let mine = CollabRequestService::list_mine(&ctx, &artist()).await.unwrap();
    assert_eq!(mine.len(), 1);
}

#[tokio::test]
async fn approving_an_application_promotes_the_user() {
    let ctx = context();
    register(&ctx, &customer()).await;

    let request = ArtistRoleRequestService::submit(&ctx, &customer(), application("Fanboy"))
        .await
        .unwrap();
    assert_matches!(
        ArtistRoleRequestService::submit(&ctx, &customer(), application("Again")).await,
        Err(ServiceError::Core(CoreError::Conflict(_)))
    );
    assert_matches!(
        ArtistRoleRequestService::submit(&ctx, &artist(), application("Artist")).await,
        Err(ServiceError::Core(CoreError::Forbidden(_)))
    );

    let reviewed = ArtistRoleRequestService::approve(&ctx, &admin(), &request.id, ReviewRequest::default())
        .await
        .unwrap();
    assert_eq!(reviewed.status, RequestStatus::Approved);
    assert_eq!(reviewed.reviewed_by.as_deref(), Some("admin-1"));

    let user = UserRepo::find_by_id(ctx.store(), "user-1").await.unwrap().unwrap();
    assert_eq!(user.role, Role::Artist);
}

#[tokio::test]
async fn rejected_application_keeps_role() {
    let ctx = context();
    register(&ctx, &customer()).await;
    let request = ArtistRoleRequestService::submit(&ctx, &customer(), application("Fanboy"))
        .await
        .unwrap();
    ArtistRoleRequestService::reject(
        &ctx,
        &admin(),
        &request.id,
        ReviewRequest {
            note: Some("Not yet".into()),
        },
    )
    .await
    .unwrap();

    let user = UserRepo::find_by_id(ctx.store(), "user-1").await.unwrap().unwrap();
    assert_eq!(user.role, Role::User);
    let mine = ArtistRoleRequestService::list_mine(&ctx, &customer()).await.unwrap();
    assert_eq!(mine[0].review_note.as_deref(), Some("Not yet"));
}
