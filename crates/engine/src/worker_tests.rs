use super::*;
use crate::fetcher::{FetchError, FetchedArticle, Fetcher};
use crate::feed::RssFeedGenerator;
use echocast_core::{new_job_id, new_queue_id, FakeClock, JobInput, JobStatus, JobTicket};
use echocast_providers::{FakeLlmProvider, FakeTtsProvider, LlmProvider, Registry, TtsProvider};
use echocast_storage::{DataRoot, EpisodeCatalog, JobStatusStore, QueueStore};
use tempfile::tempdir;

struct FakeFetcher;

#[async_trait::async_trait]
impl Fetcher for FakeFetcher {
    async fn fetch(&self, _url: &str) -> Result<FetchedArticle, FetchError> {
        Ok(FetchedArticle { title: "Article".to_string(), content: "Body text.".to_string() })
    }
}

fn worker(root: DataRoot, clock: FakeClock, tts: Arc<dyn TtsProvider>) -> Worker<FakeClock> {
    let deps = PipelineDeps {
        root: root.clone(),
        queue: QueueStore::new(root.clone()),
        job_status: JobStatusStore::new(root.clone()),
        episodes: EpisodeCatalog::new(root.clone()),
        llm_registry: Arc::new(Registry::new_unchecked(vec![
            Arc::new(FakeLlmProvider::healthy("alpha")) as Arc<dyn LlmProvider>
        ])),
        tts_registry: Arc::new(Registry::new_unchecked(vec![tts])),
        fetcher: Arc::new(FakeFetcher),
        webhook: None,
        prompt_template: None,
        clock,
    };
    Worker::new(deps, Arc::new(RssFeedGenerator { base_url: "https://cast.example".to_string() }))
}

fn enqueue(worker: &Worker<FakeClock>, user_id: &str) -> String {
    let clock = &worker.deps.clock;
    let job_id = new_job_id();
    let queue_id = new_queue_id(clock);
    let ticket = JobTicket::new(queue_id, job_id.clone(), user_id, JobInput::Url("https://example.test/a".to_string()), true, 3, clock.now_utc());
    let status = JobStatus::new_pending(&job_id, user_id, ticket.input.as_url().map(str::to_string), clock);
    worker.deps.job_status.save(&status).unwrap();
    worker.deps.queue.add(&ticket).unwrap();
    job_id
}

#[tokio::test]
async fn drain_once_processes_all_pending_and_writes_feed_for_succeeding_user() {
    let dir = tempdir().unwrap();
    let root = DataRoot::new(dir.path());
    let w = worker(root.clone(), FakeClock::new(), Arc::new(FakeTtsProvider::healthy("beta")));
    enqueue(&w, "alice");
    enqueue(&w, "alice");

    let processed = w.drain_once().await.unwrap();
    assert_eq!(processed, 2);
    assert!(root.feed_path("alice").exists());
    assert!(w.deps.queue.list_pending().unwrap().is_empty());
}

#[tokio::test]
async fn drain_once_skips_feed_regeneration_for_a_user_whose_only_ticket_failed() {
    let dir = tempdir().unwrap();
    let root = DataRoot::new(dir.path());
    let failing_tts = Arc::new(FakeTtsProvider::healthy("beta"));
    failing_tts.set_failing(true);
    let w = worker(root.clone(), FakeClock::new(), failing_tts);
    enqueue(&w, "bob");

    w.drain_once().await.unwrap();
    assert!(!root.feed_path("bob").exists());
}

#[tokio::test]
async fn drain_once_fails_fast_when_lock_already_held() {
    let dir = tempdir().unwrap();
    let root = DataRoot::new(dir.path());
    let lock_path = root.worker_lock_path();
    let _held = crate::lock::WorkerLock::try_acquire(&lock_path).unwrap().unwrap();

    let w = worker(root, FakeClock::new(), Arc::new(FakeTtsProvider::healthy("beta")));
    let err = w.drain_once().await.unwrap_err();
    assert!(matches!(err, EngineError::LockHeld));
}
