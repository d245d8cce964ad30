//! Unit tests for the coordinator: routing, failure replies, and tab observation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use learning_assistant::managers::tab_manager::PageChannel;
use learning_assistant::services::content_service::{CannedContentService, ContentService};
use learning_assistant::services::coordinator::Coordinator;
use learning_assistant::types::artifacts::{
    ExportFormat, ExportReceipt, QuizArtifact, QuizCount, SummaryArtifact,
};
use learning_assistant::types::config::{AssistantConfig, HostConfig};
use learning_assistant::types::errors::{DeliveryError, ServiceError};
use learning_assistant::types::messages::{
    CoordinatorRequest, CoordinatorResponse, Delivery, PageMessage, PageResponse, ResponseData,
};
use learning_assistant::types::settings::Language;
use learning_assistant::types::tab::{LoadStatus, TabUpdate};
use learning_assistant::types::video::VideoId;
use tokio::time::Instant;

fn video() -> VideoId {
    VideoId::new("abc123")
}

fn summary_request() -> CoordinatorRequest {
    CoordinatorRequest::GenerateSummary {
        video_id: video(),
        language: Language::Auto,
    }
}

/// Service whose handlers fail in configurable ways.
struct FaultyService {
    calls: AtomicUsize,
}

#[async_trait]
impl ContentService for FaultyService {
    async fn summarize(&self, _video: &VideoId, _language: Language) -> Result<SummaryArtifact, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        panic!("summarizer crashed");
    }

    async fn generate_quiz(&self, _video: &VideoId, _count: QuizCount) -> Result<QuizArtifact, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ServiceError::Unavailable("quiz backend down".into()))
    }

    async fn export_notes(&self, _video: &VideoId, _format: ExportFormat) -> Result<ExportReceipt, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ServiceError::InvalidRequest("bad format".into()))
    }

    async fn generate_comments(&self, _video: &VideoId, refresh: bool) -> Result<Vec<String>, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if refresh {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(vec!["slow".into()])
        } else {
            Ok(vec!["fast".into()])
        }
    }
}

fn faulty() -> (Coordinator, Arc<FaultyService>) {
    let service = Arc::new(FaultyService {
        calls: AtomicUsize::new(0),
    });
    let coordinator = Coordinator::new(service.clone(), HostConfig::default());
    (coordinator, service)
}

/// Records what the coordinator sends to tabs.
#[derive(Default)]
struct RecordingChannel {
    sent: Vec<(String, PageMessage)>,
    missing_receiver: bool,
}

impl PageChannel for RecordingChannel {
    fn send_to_tab(&mut self, tab_id: &str, message: PageMessage) -> Result<PageResponse, DeliveryError> {
        if self.missing_receiver {
            return Err(DeliveryError::NoReceiver(tab_id.to_string()));
        }
        self.sent.push((tab_id.to_string(), message));
        Ok(PageResponse::Success)
    }
}

fn loaded(url: &str) -> TabUpdate {
    TabUpdate {
        status: LoadStatus::Complete,
        url: Some(url.to_string()),
    }
}

// --- routing ---

#[tokio::test(start_paused = true)]
async fn test_summary_arrives_after_canned_delay() {
    let coordinator = Coordinator::canned(&AssistantConfig::default());
    let started = Instant::now();

    let response = coordinator.request(summary_request()).await;
    assert!(started.elapsed() >= Duration::from_millis(2000));
    match response {
        CoordinatorResponse::Success(ResponseData::Summary(summary)) => {
            assert_eq!(summary.title, "Understanding YouTube API Integration");
            assert_eq!(summary.language, "English");
            assert_eq!(summary.key_points.len(), 5);
        }
        other => panic!("unexpected response: {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_quiz_honours_count() {
    let coordinator = Coordinator::canned(&AssistantConfig::default());
    let request = CoordinatorRequest::GenerateQuiz {
        video_id: video(),
        count: QuizCount::try_from(20).unwrap(),
    };
    match coordinator.request(request).await {
        CoordinatorResponse::Success(ResponseData::Quiz(quiz)) => {
            assert_eq!(quiz.questions.len(), 20);
            assert!(quiz.validate().is_ok());
        }
        other => panic!("unexpected response: {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_export_returns_configured_download_url() {
    let mut config = AssistantConfig::default();
    config.links.download_url = "https://downloads.test/notes".into();
    let coordinator = Coordinator::canned(&config);

    let request = CoordinatorRequest::ExportNotes {
        video_id: video(),
        format: ExportFormat::Pdf,
    };
    assert_eq!(
        coordinator.request(request).await,
        CoordinatorResponse::Success(ResponseData::Export(ExportReceipt {
            format: ExportFormat::Pdf,
            download_url: "https://downloads.test/notes".into(),
        }))
    );
}

#[tokio::test(start_paused = true)]
async fn test_comment_refresh_returns_other_set() {
    let coordinator = Coordinator::canned(&AssistantConfig::default());
    let first = coordinator
        .request(CoordinatorRequest::GenerateComments {
            video_id: video(),
            refresh: false,
        })
        .await;
    let more = coordinator
        .request(CoordinatorRequest::GenerateComments {
            video_id: video(),
            refresh: true,
        })
        .await;
    assert_eq!(
        first,
        CoordinatorResponse::Success(ResponseData::Comments(CannedContentService::comments(false)))
    );
    assert_eq!(
        more,
        CoordinatorResponse::Success(ResponseData::Comments(CannedContentService::comments(true)))
    );
    assert_ne!(first, more);
    assert_eq!(coordinator.dispatched_count(), 2);
}

#[tokio::test]
async fn test_coordinator_stores_nothing_between_requests() {
    let (coordinator, service) = faulty();
    for _ in 0..3 {
        coordinator
            .request(CoordinatorRequest::GenerateComments {
                video_id: video(),
                refresh: false,
            })
            .await;
    }
    assert_eq!(service.calls.load(Ordering::SeqCst), 3);
}

// --- failures ---

#[tokio::test]
async fn test_panicking_handler_yields_single_error_reply() {
    let (coordinator, service) = faulty();
    let response = coordinator.request(summary_request()).await;
    assert_eq!(
        response,
        CoordinatorResponse::Error("Failed to generate summary".into())
    );
    assert_eq!(service.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_service_errors_map_to_action_messages() {
    let (coordinator, _) = faulty();
    let quiz = coordinator
        .request(CoordinatorRequest::GenerateQuiz {
            video_id: video(),
            count: QuizCount::default(),
        })
        .await;
    let export = coordinator
        .request(CoordinatorRequest::ExportNotes {
            video_id: video(),
            format: ExportFormat::Docx,
        })
        .await;
    assert_eq!(quiz, CoordinatorResponse::Error("Failed to generate quiz".into()));
    assert_eq!(export, CoordinatorResponse::Error("Failed to export notes".into()));
}

#[tokio::test]
async fn test_coordinator_survives_handler_panic() {
    let (coordinator, _) = faulty();
    let _ = coordinator.request(summary_request()).await;
    let after = coordinator
        .request(CoordinatorRequest::GenerateComments {
            video_id: video(),
            refresh: false,
        })
        .await;
    assert!(after.is_success());
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_requests_reply_independently() {
    let (coordinator, _) = faulty();
    let slow = coordinator.dispatch(CoordinatorRequest::GenerateComments {
        video_id: video(),
        refresh: true,
    });
    let fast = coordinator.dispatch(CoordinatorRequest::GenerateComments {
        video_id: video(),
        refresh: false,
    });
    assert_ne!(slow.request_id(), fast.request_id());

    let fast_reply = fast.wait().await;
    assert_eq!(
        fast_reply,
        CoordinatorResponse::Success(ResponseData::Comments(vec!["fast".into()]))
    );
    let slow_reply = slow.wait().await;
    assert_eq!(
        slow_reply,
        CoordinatorResponse::Success(ResponseData::Comments(vec!["slow".into()]))
    );
}

#[tokio::test(start_paused = true)]
async fn test_dropped_reply_handle_is_harmless() {
    let coordinator = Coordinator::canned(&AssistantConfig::default());
    drop(coordinator.dispatch(summary_request()));
    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert!(coordinator.request(summary_request()).await.is_success());
}

// --- tab observation ---

#[test]
fn test_completed_watch_page_gets_reload_notice() {
    let coordinator = Coordinator::canned(&AssistantConfig::default());
    let mut channel = RecordingChannel::default();

    let delivery = coordinator.on_tab_updated(
        &mut channel,
        "tab-1",
        &loaded("https://www.youtube.com/watch?v=abc123"),
    );
    assert_eq!(delivery, Some(Delivery::Delivered));
    assert_eq!(channel.sent, vec![("tab-1".to_string(), PageMessage::PageReloaded)]);
}

#[test]
fn test_loading_and_foreign_pages_are_ignored() {
    let coordinator = Coordinator::canned(&AssistantConfig::default());
    let mut channel = RecordingChannel::default();

    let loading = TabUpdate {
        status: LoadStatus::Loading,
        url: Some("https://www.youtube.com/watch?v=abc123".into()),
    };
    assert_eq!(coordinator.on_tab_updated(&mut channel, "t", &loading), None);
    assert_eq!(
        coordinator.on_tab_updated(&mut channel, "t", &loaded("https://example.com/watch?v=1")),
        None
    );
    assert_eq!(
        coordinator.on_tab_updated(&mut channel, "t", &loaded("https://www.youtube.com/feed")),
        None
    );
    let no_url = TabUpdate {
        status: LoadStatus::Complete,
        url: None,
    };
    assert_eq!(coordinator.on_tab_updated(&mut channel, "t", &no_url), None);
    assert!(channel.sent.is_empty());
}

#[test]
fn test_missing_receiver_is_ignored_not_fatal() {
    let coordinator = Coordinator::canned(&AssistantConfig::default());
    let mut channel = RecordingChannel {
        missing_receiver: true,
        ..Default::default()
    };
    let delivery = coordinator.on_tab_updated(
        &mut channel,
        "tab-9",
        &loaded("https://m.youtube.com/watch?v=abc123"),
    );
    assert_eq!(
        delivery,
        Some(Delivery::Ignored(DeliveryError::NoReceiver("tab-9".into())))
    );
}
