use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::answers::AnswerSet;
use super::engine::evaluate;
use super::narrative::{NarrativeError, NarrativeGenerator, NarrativeRequest, NARRATIVE_FALLBACK};
use super::store::{SubmissionId, SubmissionRecord, SubmissionStore};

type Published = Arc<RwLock<SessionRegistry>>;

const DEFAULT_NARRATIVE_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_REGISTRY_CAPACITY: usize = 1024;

/// Submissions published by this process, evicting the oldest beyond `capacity`.
#[derive(Debug)]
struct SessionRegistry {
    records: HashMap<SubmissionId, SubmissionRecord>,
    order: VecDeque<SubmissionId>,
    capacity: usize,
}

impl SessionRegistry {
    fn new(capacity: usize) -> Self {
        Self {
            records: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    fn insert(&mut self, record: SubmissionRecord) -> Option<SubmissionId> {
        let id = record.id;
        if self.records.insert(id, record).is_none() {
            self.order.push_back(id);
        }

        if self.order.len() <= self.capacity {
            return None;
        }
        let evicted = self.order.pop_front()?;
        self.records.remove(&evicted);
        Some(evicted)
    }

    fn get(&self, id: &SubmissionId) -> Option<&SubmissionRecord> {
        self.records.get(id)
    }

    fn get_mut(&mut self, id: &SubmissionId) -> Option<&mut SubmissionRecord> {
        self.records.get_mut(id)
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

/// Service composing the decision engine, narrative generator, and store.
///
/// A submission is published as soon as the engine returns. The narrative and
/// the store write happen afterwards and never affect the decision.
pub struct AssessmentService<S: ?Sized, N: ?Sized> {
    store: Arc<S>,
    narrator: Arc<N>,
    published: Published,
    narrative_timeout: Duration,
    admin_password: Option<String>,
}

impl<S, N> AssessmentService<S, N>
where
    S: SubmissionStore + ?Sized + 'static,
    N: NarrativeGenerator + ?Sized + 'static,
{
    pub fn new(store: Arc<S>, narrator: Arc<N>) -> Self {
        Self {
            store,
            narrator,
            published: Arc::new(RwLock::new(SessionRegistry::new(DEFAULT_REGISTRY_CAPACITY))),
            narrative_timeout: DEFAULT_NARRATIVE_TIMEOUT,
            admin_password: None,
        }
    }

    pub fn with_narrative_timeout(mut self, timeout: Duration) -> Self {
        self.narrative_timeout = timeout;
        self
    }

    /// Caps how many published submissions stay available to [`get`](Self::get).
    pub fn with_registry_capacity(self, capacity: usize) -> Self {
        Self {
            published: Arc::new(RwLock::new(SessionRegistry::new(capacity))),
            ..self
        }
    }

    /// Requires this password for history reads. `None` leaves history open.
    pub fn with_admin_password(mut self, password: Option<String>) -> Self {
        self.admin_password = password;
        self
    }

    /// Evaluate and publish a submission, explaining and saving it in the background.
    pub async fn submit(&self, answers: AnswerSet) -> SubmissionRecord {
        let record = self.publish(answers).await;

        tokio::spawn(enrich(
            self.store.clone(),
            self.narrator.clone(),
            self.published.clone(),
            self.narrative_timeout,
            record.clone(),
        ));

        record
    }

    /// Same as [`submit`](Self::submit) but waits for the narrative and the store write.
    pub async fn submit_and_wait(&self, answers: AnswerSet) -> SubmissionRecord {
        let record = self.publish(answers).await;

        enrich(
            self.store.clone(),
            self.narrator.clone(),
            self.published.clone(),
            self.narrative_timeout,
            record,
        )
        .await
    }

    /// Current state of a submission published by this process.
    pub async fn get(&self, id: &SubmissionId) -> Option<SubmissionRecord> {
        self.published.read().await.get(id).cloned()
    }

    /// Number of submissions currently held in the session registry.
    pub async fn published_count(&self) -> usize {
        self.published.read().await.len()
    }

    /// Stored submissions, newest first. Errors and missing stores yield an empty list.
    pub async fn history(&self) -> Vec<SubmissionRecord> {
        if !self.store.is_configured() {
            return Vec::new();
        }

        match self.store.fetch_all().await {
            Ok(records) => records,
            Err(err) => {
                warn!(error = %err, "submission history unavailable");
                Vec::new()
            }
        }
    }

    pub fn authorize_history(&self, provided: Option<&str>) -> bool {
        match &self.admin_password {
            Some(password) => provided == Some(password.as_str()),
            None => true,
        }
    }

    async fn publish(&self, answers: AnswerSet) -> SubmissionRecord {
        let result = evaluate(&answers);
        let record = SubmissionRecord::new(answers, result);

        info!(
            submission_id = %record.id,
            decision = %record.result.decision,
            score = record.result.score,
            hard_blocker = record.result.hard_blocker.is_some(),
            "assessment evaluated"
        );

        if let Some(evicted) = self.published.write().await.insert(record.clone()) {
            debug!(submission_id = %evicted, "evicted oldest submission from session registry");
        }
        record
    }
}

async fn enrich<S, N>(
    store: Arc<S>,
    narrator: Arc<N>,
    published: Published,
    timeout: Duration,
    mut record: SubmissionRecord,
) -> SubmissionRecord
where
    S: SubmissionStore + ?Sized,
    N: NarrativeGenerator + ?Sized,
{
    let narrative = explain(narrator.as_ref(), &record, timeout).await;
    record.narrative = Some(narrative);

    if let Some(entry) = published.write().await.get_mut(&record.id) {
        entry.narrative = record.narrative.clone();
    }

    save(store.as_ref(), &record).await;
    record
}

/// Generates the narrative text, substituting [`NARRATIVE_FALLBACK`] on failure.
pub async fn explain<N>(narrator: &N, record: &SubmissionRecord, timeout: Duration) -> String
where
    N: NarrativeGenerator + ?Sized,
{
    let request = NarrativeRequest::new(&record.answers, &record.result);
    let outcome = match tokio::time::timeout(timeout, narrator.generate(&request)).await {
        Ok(outcome) => outcome,
        Err(_) => Err(NarrativeError::Timeout(timeout.as_secs())),
    };

    match outcome {
        Ok(text) => text,
        Err(err) => {
            warn!(submission_id = %record.id, error = %err, "narrative generation failed");
            NARRATIVE_FALLBACK.to_string()
        }
    }
}

/// Best-effort persistence. Returns whether the record was stored.
pub async fn save<S>(store: &S, record: &SubmissionRecord) -> bool
where
    S: SubmissionStore + ?Sized,
{
    if !store.is_configured() {
        debug!(submission_id = %record.id, "no submission store configured; skipping save");
        return false;
    }

    match store.save(record).await {
        Ok(()) => true,
        Err(err) => {
            warn!(submission_id = %record.id, error = %err, "failed to persist submission");
            false
        }
    }
}
