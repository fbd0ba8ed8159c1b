use crate::actors::latency::SimulatedLatency;
use crate::actors::messages::{
    ClassifierMessage, RemoteFailure, RemoteOutcome, RemotePayload, ResolvedContent,
};
use crate::actors::remote::HttpRemoteClassifier;
use crate::actors::traits::{LatencySimulator, RemoteClassifier};
use crate::brain::{HeuristicClassifier, KeywordLexicon, ResponseSelector};
use crate::config::ClassifierConfig;
use crate::error::AppError;
use crate::models::{Attachment, BatchItem, ClassificationRequest, ClassificationResult};
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{timeout, Duration, Instant};
use tracing::{debug, error, info, info_span, instrument, warn, Instrument};

/// Extra room granted to the actor reply on top of the worst-case request time.
const REPLY_SLACK: Duration = Duration::from_secs(5);

/// Orchestrator wired with the production collaborators.
pub type ProductionOrchestrator =
    ClassificationOrchestrator<HttpRemoteClassifier, SimulatedLatency>;

/// The dual-path classification engine.
///
/// Tries the remote service once, and on any failure substitutes the local
/// heuristic result. Remote failures never reach the caller.
pub struct ClassificationOrchestrator<R, L>
where
    R: RemoteClassifier,
    L: LatencySimulator,
{
    remote: Arc<R>,
    latency: Arc<L>,
    heuristic: Arc<HeuristicClassifier>,
    remote_timeout: Duration,
}

impl ProductionOrchestrator {
    /// Builds the orchestrator described by `config`.
    pub fn from_config(config: &ClassifierConfig) -> Result<Self, AppError> {
        let remote = match config.api_url.as_deref() {
            Some(url) => HttpRemoteClassifier::new(url, config.remote_timeout())?,
            None => {
                info!("No classification service configured, using the local heuristic only");
                HttpRemoteClassifier::disabled()
            }
        };

        let latency = match config.latency_range() {
            Some((min, max)) => SimulatedLatency::new(min, max, config.rng_seed),
            None => SimulatedLatency::disabled(),
        };

        let heuristic = HeuristicClassifier::with_parts(
            Arc::new(KeywordLexicon::default()),
            Arc::new(ResponseSelector::default()),
            config.rng_seed,
        );

        Ok(Self::new(
            Arc::new(remote),
            Arc::new(latency),
            Arc::new(heuristic),
            config.remote_timeout(),
        ))
    }
}

impl<R, L> ClassificationOrchestrator<R, L>
where
    R: RemoteClassifier,
    L: LatencySimulator,
{
    pub fn new(
        remote: Arc<R>,
        latency: Arc<L>,
        heuristic: Arc<HeuristicClassifier>,
        remote_timeout: Duration,
    ) -> Self {
        Self {
            remote,
            latency,
            heuristic,
            remote_timeout,
        }
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn heuristic(&self) -> &HeuristicClassifier {
        &self.heuristic
    }

    /// Longest a request can take once its content is resolved: the remote
    /// bound plus the padding.
    pub fn worst_case_latency(&self) -> Duration {
        self.remote_timeout + self.latency.max_pause()
    }

    /// Classifies one request.
    ///
    /// Fails only with [`AppError::InvalidRequest`] when there is nothing to
    /// classify, or with [`AppError::TemplateExhaustion`] on a broken template set.
    #[instrument(skip(self, request), fields(request_id = %request.id))]
    pub async fn classify(
        &self,
        request: ClassificationRequest,
    ) -> Result<ClassificationResult, AppError> {
        let received = Instant::now();
        let content = resolve_content(&request).await?;
        self.classify_content(content, received, true).await
    }

    /// Classifies plain-text emails one after the other.
    ///
    /// Items are independent: an empty entry yields an error item and the rest
    /// of the batch carries on. Local results are not padded with simulated latency.
    #[instrument(skip(self, texts), fields(size = texts.len()))]
    pub async fn classify_batch(&self, texts: Vec<String>) -> Vec<BatchItem> {
        let this = self;
        futures::stream::iter(texts.into_iter().enumerate())
            .then(move |(index, text)| async move {
                let received = Instant::now();
                let request = ClassificationRequest::from_text(text);
                let outcome = match resolve_content(&request).await {
                    Ok(content) => this.classify_content(content, received, false).await,
                    Err(e) => Err(e),
                };
                match outcome {
                    Ok(result) => BatchItem {
                        index,
                        result: Some(result),
                        error: None,
                    },
                    Err(e) => BatchItem {
                        index,
                        result: None,
                        error: Some(e.to_string()),
                    },
                }
            })
            .collect()
            .await
    }

    /// Runs the dual path on resolved content. `received` marks when the
    /// request arrived; fallback processing time is measured from it.
    pub async fn classify_content(
        &self,
        content: ResolvedContent,
        received: Instant,
        pad_latency: bool,
    ) -> Result<ClassificationResult, AppError> {
        let failure = match self.attempt_remote(&content.payload).await {
            RemoteOutcome::Success(response) => match response.into_result() {
                Ok(result) => {
                    info!(
                        category = %result.category,
                        confidence = result.confidence,
                        "Classified by remote service"
                    );
                    return Ok(result);
                }
                Err(failure) => failure,
            },
            RemoteOutcome::Failure(failure) => failure,
        };

        if failure == RemoteFailure::NotConfigured {
            debug!("Remote path disabled, computing locally");
        } else {
            warn!(
                reason = %failure,
                "Remote classification failed, falling back to local heuristic"
            );
        }

        let mut result = self.heuristic.classify(&content.text)?;
        if pad_latency {
            self.latency.pause().await;
        }
        result.processing_time = received.elapsed().as_secs_f64();

        info!(
            category = %result.category,
            confidence = result.confidence,
            "Classified by local heuristic"
        );
        Ok(result)
    }

    /// Exactly one attempt, bounded by the remote timeout.
    async fn attempt_remote(&self, payload: &RemotePayload) -> RemoteOutcome {
        match timeout(self.remote_timeout, self.remote.classify_remote(payload)).await {
            Ok(outcome) => outcome,
            Err(_) => RemoteOutcome::Failure(RemoteFailure::Timeout(self.remote_timeout)),
        }
    }
}

/// Resolves what a request asks to classify.
///
/// Attachment text wins when it is readable and non-blank, the plain text comes
/// next. Whitespace-only content counts as missing. Extraction runs on the
/// blocking pool.
pub async fn resolve_content(request: &ClassificationRequest) -> Result<ResolvedContent, AppError> {
    if let Some(attachment) = &request.attachment {
        match extract_off_runtime(attachment).await {
            Ok(text) if !text.trim().is_empty() => {
                return Ok(ResolvedContent {
                    text,
                    payload: RemotePayload::File {
                        file_name: attachment.file_name.clone(),
                        mime_type: attachment.mime_type().to_string(),
                        data: attachment.data.clone(),
                    },
                });
            }
            Ok(_) => warn!(file = %attachment.file_name, "Attachment contains no text"),
            Err(e) => warn!(
                file = %attachment.file_name,
                error = %e,
                "Attachment text could not be extracted"
            ),
        }
    }

    match &request.text {
        Some(text) if !text.trim().is_empty() => Ok(ResolvedContent {
            text: text.clone(),
            payload: RemotePayload::Text(text.clone()),
        }),
        _ => Err(AppError::InvalidRequest(
            "request has neither text nor an attachment with readable content".to_string(),
        )),
    }
}

async fn extract_off_runtime(attachment: &Attachment) -> Result<String, AppError> {
    let attachment = attachment.clone();
    tokio::task::spawn_blocking(move || attachment.extract_text())
        .await
        .map_err(|e| AppError::Internal(format!("Extraction task failed: {}", e)))?
}

/// A handle to the classifier actor.
///
/// This is the caller-facing entry point. Content is resolved on the caller's
/// side, then the runner task that owns the orchestrator answers each request
/// on its own task.
#[derive(Clone)]
pub struct ClassifierHandle {
    sender: mpsc::Sender<ClassifierMessage>,
    reply_timeout: Duration,
}

impl ClassifierHandle {
    /// Spawns the runner for `orchestrator` and returns a handle to it.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new<R, L>(orchestrator: ClassificationOrchestrator<R, L>) -> Self
    where
        R: RemoteClassifier,
        L: LatencySimulator,
    {
        let (sender, receiver) = mpsc::channel(32);
        let reply_timeout = orchestrator.worst_case_latency() + REPLY_SLACK;
        let runner = ClassifierRunner {
            receiver,
            orchestrator: Arc::new(orchestrator),
        };
        tokio::spawn(async move { runner.run().await });
        Self {
            sender,
            reply_timeout,
        }
    }

    /// Spawns a production classifier described by `config`.
    pub fn from_config(config: &ClassifierConfig) -> Result<Self, AppError> {
        Ok(Self::new(ProductionOrchestrator::from_config(config)?))
    }

    /// Classifies one email.
    ///
    /// The reply timeout only starts once the content is resolved, so a slow
    /// attachment never turns into a timeout.
    #[instrument(skip(self, request), fields(request_id = %request.id))]
    pub async fn classify(
        &self,
        request: ClassificationRequest,
    ) -> Result<ClassificationResult, AppError> {
        let received = Instant::now();
        let content = resolve_content(&request).await?;

        let (send, recv) = oneshot::channel();
        let msg = ClassifierMessage::Classify {
            request_id: request.id,
            content,
            received,
            responder: send,
        };
        self.sender
            .send(msg)
            .await
            .map_err(|e| AppError::Actor(e.to_string()))?;
        timeout(self.reply_timeout, recv)
            .await?
            .map_err(|e| AppError::Actor(e.to_string()))?
    }

    /// Classifies several plain-text emails in order.
    pub async fn classify_batch(&self, texts: Vec<String>) -> Result<Vec<BatchItem>, AppError> {
        let budget = self.reply_timeout * (texts.len().max(1) as u32);
        let (send, recv) = oneshot::channel();
        let msg = ClassifierMessage::ClassifyBatch {
            texts,
            responder: send,
        };
        self.sender
            .send(msg)
            .await
            .map_err(|e| AppError::Actor(e.to_string()))?;
        timeout(budget, recv)
            .await?
            .map_err(|e| AppError::Actor(e.to_string()))
    }

    /// Stops the runner. Requests already dispatched still complete.
    pub async fn shutdown(&self) -> Result<(), AppError> {
        self.sender
            .send(ClassifierMessage::Shutdown)
            .await
            .map_err(|e| AppError::Actor(e.to_string()))
    }
}

// --- Actor Runner ---
struct ClassifierRunner<R, L>
where
    R: RemoteClassifier,
    L: LatencySimulator,
{
    receiver: mpsc::Receiver<ClassifierMessage>,
    orchestrator: Arc<ClassificationOrchestrator<R, L>>,
}

impl<R, L> ClassifierRunner<R, L>
where
    R: RemoteClassifier,
    L: LatencySimulator,
{
    async fn run(mut self) {
        info!("Classifier started");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ClassifierMessage::Classify {
                    request_id,
                    content,
                    received,
                    responder,
                } => {
                    let orchestrator = self.orchestrator.clone();
                    let span = info_span!("classify", request_id = %request_id);
                    tokio::spawn(
                        async move {
                            let result = orchestrator
                                .classify_content(content, received, true)
                                .await;
                            if let Err(e) = &result {
                                error!("Error classifying email: {}", e);
                            }
                            let _ = responder.send(result);
                        }
                        .instrument(span),
                    );
                }
                ClassifierMessage::ClassifyBatch { texts, responder } => {
                    let orchestrator = self.orchestrator.clone();
                    tokio::spawn(async move {
                        let items = orchestrator.classify_batch(texts).await;
                        let _ = responder.send(items);
                    });
                }
                ClassifierMessage::Shutdown => {
                    info!("Classifier shutting down...");
                    break;
                }
            }
        }
        info!("Classifier stopped");
    }
}
