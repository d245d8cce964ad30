//! Property-based tests for the per-video artifact cache.
//!
//! Entries for different videos never interfere, the last write for a video
//! wins, and a summary write never disturbs the quiz entry for the same video.

use std::collections::{BTreeSet, HashMap};

use learning_assistant::database::KvStore;
use learning_assistant::managers::artifact_cache::{ArtifactCache, ArtifactCacheTrait};
use learning_assistant::services::content_service::CannedContentService;
use learning_assistant::types::artifacts::{QuizCount, SummaryArtifact};
use learning_assistant::types::settings::Language;
use learning_assistant::types::video::VideoId;
use proptest::prelude::*;

/// Video ids including characters that are wildcards in SQL patterns.
fn arb_video_id() -> impl Strategy<Value = VideoId> {
    "[A-Za-z0-9_%-]{1,11}".prop_map(VideoId::new)
}

fn summary_titled(title: &str) -> SummaryArtifact {
    SummaryArtifact {
        title: title.to_string(),
        ..CannedContentService::summary(Language::Auto)
    }
}

#[derive(Debug, Clone)]
enum CacheOp {
    PutSummary(VideoId, String),
    PutQuiz(VideoId, u32),
}

fn arb_ops() -> impl Strategy<Value = Vec<CacheOp>> {
    prop::collection::vec(
        prop_oneof![
            (arb_video_id(), "[a-z ]{1,20}").prop_map(|(v, t)| CacheOp::PutSummary(v, t)),
            (arb_video_id(), prop_oneof![Just(5u32), Just(10), Just(15), Just(20)])
                .prop_map(|(v, n)| CacheOp::PutQuiz(v, n)),
        ],
        1..30,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(25))]

    #[test]
    fn cache_matches_last_write_per_video(ops in arb_ops()) {
        let store = KvStore::in_memory().unwrap();
        let cache = ArtifactCache::new(&store);
        let mut summaries: HashMap<VideoId, String> = HashMap::new();
        let mut quizzes: HashMap<VideoId, u32> = HashMap::new();

        for op in &ops {
            match op {
                CacheOp::PutSummary(video, title) => {
                    cache.put_summary(video, &summary_titled(title)).unwrap();
                    summaries.insert(video.clone(), title.clone());
                }
                CacheOp::PutQuiz(video, n) => {
                    let quiz = CannedContentService::quiz(QuizCount::try_from(*n).unwrap());
                    cache.put_quiz(video, &quiz).unwrap();
                    quizzes.insert(video.clone(), *n);
                }
            }
        }

        for (video, title) in &summaries {
            let cached = cache.get_summary(video).unwrap().unwrap();
            prop_assert_eq!(&cached.title, title);
        }
        for (video, n) in &quizzes {
            let cached = cache.get_quiz(video).unwrap().unwrap();
            prop_assert_eq!(cached.questions.len(), *n as usize);
        }

        let expected: BTreeSet<VideoId> = summaries.keys().chain(quizzes.keys()).cloned().collect();
        let listed = cache.cached_videos().unwrap();
        prop_assert_eq!(listed, expected.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn unseen_video_has_no_artifacts(seen in arb_video_id(), other in arb_video_id()) {
        prop_assume!(seen != other);
        let store = KvStore::in_memory().unwrap();
        let cache = ArtifactCache::new(&store);
        cache.put_summary(&seen, &summary_titled("t")).unwrap();
        cache.put_quiz(&seen, &CannedContentService::quiz(QuizCount::default())).unwrap();

        prop_assert!(cache.get_summary(&other).unwrap().is_none());
        prop_assert!(cache.get_quiz(&other).unwrap().is_none());
    }
}
