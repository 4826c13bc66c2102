//! Integration tests for the publish orchestrator
//!
//! Exercises the full orchestration flow against a scratch database and
//! the mock publishing provider: validation, account resolution, media
//! staging degradation, fan-out submission, and persistence.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tempfile::TempDir;

use libbrandcast::caption::FALLBACK_CAPTION;
use libbrandcast::error::ProviderError;
use libbrandcast::provider::mock::{connected, MockProbes, MockProvider};
use libbrandcast::retry::RetryPolicy;
use libbrandcast::{
    BrandcastError, ContentItem, ContentStatus, ContentType, Database, Platform,
    PublishOrchestrator, PublishRequest, ScheduleStatus,
};

async fn test_db() -> (Arc<Database>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let db = Database::new(db_path.to_str().unwrap()).await.unwrap();
    (Arc::new(db), temp_dir)
}

fn fast_policy() -> RetryPolicy {
    RetryPolicy::new(2, Duration::from_millis(5))
}

fn orchestrator(db: Arc<Database>, provider: MockProvider) -> (PublishOrchestrator, MockProbes) {
    let probes = provider.probes();
    let orchestrator =
        PublishOrchestrator::with_staging_policy(db, Arc::new(provider), fast_policy());
    (orchestrator, probes)
}

async fn approved_item(db: &Database, client_id: &str) -> ContentItem {
    let mut item = ContentItem::new(client_id, ContentType::ImagePost);
    item.caption = "Launch week".to_string();
    item.hashtags = "#launch".to_string();
    item.call_to_action = "Learn more".to_string();
    db.create_content(&item).await.unwrap();

    item.submit_for_review().unwrap();
    item.approve("reviewer@example.com").unwrap();
    db.update_content(&item).await.unwrap();
    item
}

fn request(item: &ContentItem, platforms: Vec<Platform>) -> PublishRequest {
    PublishRequest {
        content_id: item.id.clone(),
        client_id: item.client_id.clone(),
        platforms,
        scheduled_at: None,
    }
}

#[tokio::test]
async fn test_empty_platforms_is_validation_error_with_no_writes() {
    let (db, _tmp) = test_db().await;
    let item = approved_item(&db, "client-1").await;
    let (orchestrator, _probes) = orchestrator(
        Arc::clone(&db),
        MockProvider::with_accounts(vec![connected("instagram", "acct-ig")]),
    );

    let result = orchestrator.schedule_post(&request(&item, vec![])).await;

    assert!(matches!(result, Err(BrandcastError::InvalidInput(_))));
    assert!(db.list_schedule_entries(&item.id).await.unwrap().is_empty());
    let reloaded = db.get_content(&item.id, "client-1").await.unwrap().unwrap();
    assert_eq!(reloaded.status, ContentStatus::Approved);
}

#[tokio::test]
async fn test_blank_ids_are_validation_errors() {
    let (db, _tmp) = test_db().await;
    let (orchestrator, _probes) = orchestrator(
        Arc::clone(&db),
        MockProvider::with_accounts(vec![connected("instagram", "acct-ig")]),
    );

    let result = orchestrator
        .schedule_post(&PublishRequest {
            content_id: "  ".to_string(),
            client_id: "client-1".to_string(),
            platforms: vec![Platform::Instagram],
            scheduled_at: None,
        })
        .await;

    assert!(matches!(result, Err(BrandcastError::InvalidInput(_))));
}

#[tokio::test]
async fn test_missing_content_is_not_found() {
    let (db, _tmp) = test_db().await;
    let (orchestrator, _probes) = orchestrator(
        Arc::clone(&db),
        MockProvider::with_accounts(vec![connected("instagram", "acct-ig")]),
    );

    let result = orchestrator
        .schedule_post(&PublishRequest {
            content_id: "no-such-content".to_string(),
            client_id: "client-1".to_string(),
            platforms: vec![Platform::Instagram],
            scheduled_at: None,
        })
        .await;

    assert!(matches!(result, Err(BrandcastError::NotFound(_))));
}

#[tokio::test]
async fn test_zero_resolvable_accounts_is_a_complete_noop() {
    let (db, _tmp) = test_db().await;
    let item = approved_item(&db, "client-1").await;
    let (orchestrator, probes) = orchestrator(
        Arc::clone(&db),
        MockProvider::with_accounts(vec![connected("instagram", "acct-ig")]),
    );

    let result = orchestrator
        .schedule_post(&request(&item, vec![Platform::Tiktok, Platform::Youtube]))
        .await;

    match result {
        Err(BrandcastError::NoConnectedAccounts { requested }) => {
            assert_eq!(requested, vec![Platform::Tiktok, Platform::Youtube]);
        }
        other => panic!("Expected NoConnectedAccounts, got {:?}", other.map(|_| ())),
    }

    // Nothing was submitted and nothing was written.
    assert!(probes.submissions().is_empty());
    assert!(db.list_schedule_entries(&item.id).await.unwrap().is_empty());
    let reloaded = db.get_content(&item.id, "client-1").await.unwrap().unwrap();
    assert_eq!(reloaded.status, ContentStatus::Approved);
}

#[tokio::test]
async fn test_provider_unavailable_aborts_whole_call() {
    let (db, _tmp) = test_db().await;
    let item = approved_item(&db, "client-1").await;
    let (orchestrator, probes) = orchestrator(Arc::clone(&db), MockProvider::failing_listing());

    let result = orchestrator
        .schedule_post(&request(&item, vec![Platform::Instagram]))
        .await;

    assert!(matches!(
        result,
        Err(BrandcastError::Provider(ProviderError::Unavailable(_)))
    ));
    assert!(probes.submissions().is_empty());
    assert!(db.list_schedule_entries(&item.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_partial_resolution_publishes_to_resolved_platform_only() {
    let (db, _tmp) = test_db().await;
    let item = approved_item(&db, "client-1").await;
    let (orchestrator, probes) = orchestrator(
        Arc::clone(&db),
        MockProvider::with_accounts(vec![connected("instagram", "acct-ig")]),
    );

    let receipt = orchestrator
        .schedule_post(&request(&item, vec![Platform::Instagram, Platform::Tiktok]))
        .await
        .unwrap();

    assert_eq!(receipt.platforms, vec![Platform::Instagram]);

    // The fan-out submission carries only the resolved account id.
    let submissions = probes.submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].account_ids, vec!["acct-ig".to_string()]);

    // Only the resolved platform gets a schedule entry.
    let entries = db.list_schedule_entries(&item.id).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].platform, Platform::Instagram);

    // Content status still advances.
    let reloaded = db.get_content(&item.id, "client-1").await.unwrap().unwrap();
    assert_eq!(reloaded.status, ContentStatus::Posted);
}

#[tokio::test]
async fn test_future_schedule_starts_queued_and_scheduled() {
    let (db, _tmp) = test_db().await;
    let item = approved_item(&db, "client-1").await;
    let (orchestrator, _probes) = orchestrator(
        Arc::clone(&db),
        MockProvider::with_accounts(vec![
            connected("instagram", "acct-ig"),
            connected("facebook", "acct-fb"),
        ]),
    );

    let at = Utc::now() + chrono::Duration::hours(2);
    let receipt = orchestrator
        .schedule_post(&PublishRequest {
            content_id: item.id.clone(),
            client_id: item.client_id.clone(),
            platforms: vec![Platform::Instagram, Platform::Facebook],
            scheduled_at: Some(at),
        })
        .await
        .unwrap();

    assert_eq!(receipt.content_status, ContentStatus::Scheduled);

    let entries = db.list_schedule_entries(&item.id).await.unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.status == ScheduleStatus::Queued));
    assert!(entries.iter().all(|e| e.scheduled_at == Some(at.timestamp())));

    let reloaded = db.get_content(&item.id, "client-1").await.unwrap().unwrap();
    assert_eq!(reloaded.status, ContentStatus::Scheduled);
}

#[tokio::test]
async fn test_immediate_publish_starts_posting_and_posted() {
    let (db, _tmp) = test_db().await;
    let item = approved_item(&db, "client-1").await;
    let (orchestrator, _probes) = orchestrator(
        Arc::clone(&db),
        MockProvider::with_accounts(vec![connected("facebook", "acct-fb")]),
    );

    let receipt = orchestrator
        .schedule_post(&request(&item, vec![Platform::Facebook]))
        .await
        .unwrap();

    assert_eq!(receipt.content_status, ContentStatus::Posted);

    let entries = db.list_schedule_entries(&item.id).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].status, ScheduleStatus::Posting);
    assert_eq!(entries[0].scheduled_at, None);
}

#[tokio::test]
async fn test_entries_share_provider_post_id_across_platforms() {
    let (db, _tmp) = test_db().await;
    let item = approved_item(&db, "client-1").await;
    let (orchestrator, probes) = orchestrator(
        Arc::clone(&db),
        MockProvider::with_accounts(vec![
            connected("instagram", "acct-ig"),
            connected("facebook", "acct-fb"),
            connected("twitter", "acct-x"),
        ]),
    );

    let receipt = orchestrator
        .schedule_post(&request(
            &item,
            vec![Platform::Instagram, Platform::Facebook, Platform::X],
        ))
        .await
        .unwrap();

    let entries = db.list_schedule_entries(&item.id).await.unwrap();
    assert_eq!(entries.len(), 3);
    assert!(entries
        .iter()
        .all(|e| e.provider_post_id == receipt.provider_post_id));

    // One logical submission carrying all three account ids.
    let submissions = probes.submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].account_ids.len(), 3);
}

#[tokio::test]
async fn test_media_partial_staging_failure_drops_failed_urls() {
    let (db, _tmp) = test_db().await;

    let mut item = ContentItem::new("client-1", ContentType::Carousel);
    item.caption = "Three images".to_string();
    item.primary_media_url = Some("https://cdn.example.com/1.jpg".to_string());
    item.media_urls = vec![
        "https://cdn.example.com/2.jpg".to_string(),
        "https://cdn.example.com/3.jpg".to_string(),
    ];
    db.create_content(&item).await.unwrap();

    let provider = MockProvider::with_accounts(vec![connected("instagram", "acct-ig")])
        .with_staging_failures(&[
            "https://cdn.example.com/1.jpg",
            "https://cdn.example.com/3.jpg",
        ]);
    let (orchestrator, probes) = orchestrator(Arc::clone(&db), provider);

    let receipt = orchestrator
        .schedule_post(&request(&item, vec![Platform::Instagram]))
        .await
        .unwrap();

    assert!(!receipt.provider_post_id.is_empty());
    assert_eq!(
        probes.staged_urls(),
        vec!["https://cdn.example.com/2.jpg".to_string()]
    );

    let submissions = probes.submissions();
    assert_eq!(submissions[0].media.len(), 1);
}

#[tokio::test]
async fn test_all_media_staging_fails_still_publishes_without_media() {
    let (db, _tmp) = test_db().await;

    let mut item = ContentItem::new("client-1", ContentType::ImagePost);
    item.caption = "Caption only".to_string();
    item.primary_media_url = Some("https://cdn.example.com/1.jpg".to_string());
    item.media_urls = vec![
        "https://cdn.example.com/2.jpg".to_string(),
        "https://cdn.example.com/3.jpg".to_string(),
    ];
    db.create_content(&item).await.unwrap();

    let provider = MockProvider::with_accounts(vec![connected("instagram", "acct-ig")])
        .with_staging_failures(&[
            "https://cdn.example.com/1.jpg",
            "https://cdn.example.com/2.jpg",
            "https://cdn.example.com/3.jpg",
        ]);
    let (orchestrator, probes) = orchestrator(Arc::clone(&db), provider);

    let result = orchestrator
        .schedule_post(&request(&item, vec![Platform::Instagram]))
        .await;

    assert!(result.is_ok(), "caption-only post should still proceed");
    let submissions = probes.submissions();
    assert_eq!(submissions.len(), 1);
    assert!(submissions[0].media.is_empty());
}

#[tokio::test]
async fn test_submission_carries_composed_caption() {
    let (db, _tmp) = test_db().await;
    let item = approved_item(&db, "client-1").await;
    let (orchestrator, probes) = orchestrator(
        Arc::clone(&db),
        MockProvider::with_accounts(vec![connected("instagram", "acct-ig")]),
    );

    orchestrator
        .schedule_post(&request(&item, vec![Platform::Instagram]))
        .await
        .unwrap();

    let submissions = probes.submissions();
    assert_eq!(
        submissions[0].caption,
        "Launch week\n\n#launch\n\nLearn more"
    );
    assert_eq!(submissions[0].external_ref, item.id);
}

#[tokio::test]
async fn test_empty_content_falls_back_to_default_caption() {
    let (db, _tmp) = test_db().await;

    let item = ContentItem::new("client-1", ContentType::Text);
    db.create_content(&item).await.unwrap();

    let (orchestrator, probes) = orchestrator(
        Arc::clone(&db),
        MockProvider::with_accounts(vec![connected("instagram", "acct-ig")]),
    );

    orchestrator
        .schedule_post(&request(&item, vec![Platform::Instagram]))
        .await
        .unwrap();

    let submissions = probes.submissions();
    assert_eq!(submissions[0].caption, FALLBACK_CAPTION);
    assert!(!submissions[0].caption.is_empty());
}

#[tokio::test]
async fn test_submission_failure_persists_nothing() {
    let (db, _tmp) = test_db().await;
    let item = approved_item(&db, "client-1").await;
    let (orchestrator, _probes) = orchestrator(
        Arc::clone(&db),
        MockProvider::failing_submission(vec![connected("instagram", "acct-ig")]),
    );

    let result = orchestrator
        .schedule_post(&request(&item, vec![Platform::Instagram]))
        .await;

    assert!(matches!(
        result,
        Err(BrandcastError::Provider(ProviderError::Submission(_)))
    ));
    assert!(db.list_schedule_entries(&item.id).await.unwrap().is_empty());
    let reloaded = db.get_content(&item.id, "client-1").await.unwrap().unwrap();
    assert_eq!(reloaded.status, ContentStatus::Approved);
}

#[tokio::test]
async fn test_resubmission_is_not_idempotent() {
    let (db, _tmp) = test_db().await;
    let item = approved_item(&db, "client-1").await;
    let (orchestrator, _probes) = orchestrator(
        Arc::clone(&db),
        MockProvider::with_accounts(vec![connected("instagram", "acct-ig")]),
    );

    let first = orchestrator
        .schedule_post(&request(&item, vec![Platform::Instagram]))
        .await
        .unwrap();
    let second = orchestrator
        .schedule_post(&request(&item, vec![Platform::Instagram]))
        .await
        .unwrap();

    // Two distinct fan-out posts, two independent sets of entries.
    assert_ne!(first.provider_post_id, second.provider_post_id);

    let entries = db.list_schedule_entries(&item.id).await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_ne!(entries[0].provider_post_id, entries[1].provider_post_id);
}
