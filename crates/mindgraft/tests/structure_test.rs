use mindgraft::structure::structure_with_fallback_using;
use mindgraft::{
    MindgraftConfig, Preprocessor, RetryPolicy, Sleeper, StructureError, TopicSource,
    TopicStructurer,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::json;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::time::Duration;

struct Scripted {
    replies: RefCell<VecDeque<Result<String, StructureError>>>,
    calls: Cell<u32>,
    last_timeout: Cell<Option<Duration>>,
}

impl Scripted {
    fn new(replies: Vec<Result<String, StructureError>>) -> Self {
        Self {
            replies: RefCell::new(replies.into()),
            calls: Cell::new(0),
            last_timeout: Cell::new(None),
        }
    }
}

impl TopicStructurer for Scripted {
    fn request(&self, _text: &str, timeout: Duration) -> Result<String, StructureError> {
        self.calls.set(self.calls.get() + 1);
        self.last_timeout.set(Some(timeout));
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(StructureError::Unavailable("script exhausted".to_string())))
    }
}

#[derive(Default)]
struct RecordingSleeper {
    slept: RefCell<Vec<Duration>>,
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.slept.borrow_mut().push(duration);
    }
}

const TEXT: &str = "Graph Layout is hard. Graph Drawing includes layering, such as Graph Layers.";

fn reply() -> String {
    "Sure:\n[{\"title\": \"Layout\", \"subtopics\": [{\"title\": \"Ranking\"}]}]".to_string()
}

#[test]
fn first_answer_wins() {
    let service = Scripted::new(vec![Ok(reply())]);
    let sleeper = RecordingSleeper::default();
    let out = structure_with_fallback_using(
        TEXT,
        &service,
        &RetryPolicy::default(),
        &Preprocessor::new(),
        &sleeper,
        &mut StdRng::seed_from_u64(7),
    );
    assert_eq!(out.source, TopicSource::Structurer { attempts: 1 });
    assert_eq!(out.topics[0].title, "Layout");
    assert!(sleeper.slept.borrow().is_empty());
    assert_eq!(service.last_timeout.get(), Some(Duration::from_secs(30)));
}

#[test]
fn failures_and_bad_replies_are_retried_with_bounded_jitter() {
    let service = Scripted::new(vec![
        Err(StructureError::Timeout(Duration::from_secs(30))),
        Ok("I cannot help with that.".to_string()),
        Ok(reply()),
    ]);
    let sleeper = RecordingSleeper::default();
    let policy = RetryPolicy::default();
    let out = structure_with_fallback_using(
        TEXT,
        &service,
        &policy,
        &Preprocessor::new(),
        &sleeper,
        &mut StdRng::seed_from_u64(7),
    );
    assert_eq!(out.source, TopicSource::Structurer { attempts: 3 });
    assert_eq!(service.calls.get(), 3);

    let slept = sleeper.slept.borrow();
    assert_eq!(slept.len(), 2);
    assert!(slept[0] <= Duration::from_millis(500));
    assert!(slept[1] <= Duration::from_millis(1000));
}

#[test]
fn exhausted_service_falls_back_to_local_heuristics() {
    let service = Scripted::new(Vec::new());
    let sleeper = RecordingSleeper::default();
    let preprocessor = Preprocessor::new();
    let out = structure_with_fallback_using(
        TEXT,
        &service,
        &RetryPolicy::default(),
        &preprocessor,
        &sleeper,
        &mut StdRng::seed_from_u64(1),
    );
    assert_eq!(out.source, TopicSource::LocalHeuristic);
    assert_eq!(out.topics, preprocessor.build_hierarchy_from_text(TEXT));
    assert!(!out.topics.is_empty());
    assert_eq!(service.calls.get(), 3);
    assert_eq!(sleeper.slept.borrow().len(), 2);
}

#[test]
fn backoff_doubles_up_to_the_cap() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.backoff_cap(0), Duration::from_millis(500));
    assert_eq!(policy.backoff_cap(1), Duration::from_millis(1000));
    assert_eq!(policy.backoff_cap(4), Duration::from_millis(8000));
    assert_eq!(policy.backoff_cap(5), Duration::from_millis(8000));
    assert_eq!(policy.backoff_cap(40), Duration::from_millis(8000));

    let mut rng = StdRng::seed_from_u64(42);
    for attempt in 0..6 {
        assert!(policy.delay(attempt, &mut rng) <= policy.backoff_cap(attempt));
    }
}

#[test]
fn retry_policy_reads_config() {
    let mut config = MindgraftConfig::defaults();
    config.set_value("retry.attempts", json!(0));
    config.set_value("retry.baseDelayMs", json!(10));
    config.set_value("retry.timeoutSecs", json!(5));
    let policy = RetryPolicy::from_config(&config);
    assert_eq!(policy.attempts, 3);
    assert_eq!(policy.base_delay, Duration::from_millis(10));
    assert_eq!(policy.max_delay, Duration::from_millis(8000));
    assert_eq!(policy.timeout, Duration::from_secs(5));
}
