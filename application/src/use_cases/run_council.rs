//! Run Council use case
//!
//! Orchestrates the full three-stage council flow: every member answers
//! the question (collect), every member ranks the anonymized answers
//! (rank), and the chairman synthesizes a final decision (synthesize).
//!
//! Stages are strict barriers: stage N+1 never starts before stage N's
//! fan-out has fully settled. A failed member is excluded, never fatal -
//! the only run-level failure is every member failing stage 1.

use crate::ports::llm_gateway::LlmGateway;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::generate_title::GenerateTitleUseCase;
use council_domain::{
    CouncilEvent, CouncilMetadata, CouncilOutcome, CouncilRoster, Message, ModelReply, ModelSpec,
    PromptTemplate, Stage, Stage1Result, Stage2Result, aggregate_rankings, assign_labels,
    parse_ranking, ALL_FAILED_SENTINEL, SYNTHESIS_FAILED_SENTINEL,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Errors that can occur during council execution
///
/// Deliberately small: per-model failures degrade the result instead of
/// surfacing here, and even total stage-1 failure is reported through the
/// outcome rather than as an `Err`.
#[derive(Error, Debug)]
pub enum RunCouncilError {
    #[error("No council members configured")]
    NoMembers,
}

/// Timeouts governing one council run
#[derive(Debug, Clone, Copy)]
pub struct ExecutionParams {
    /// Per-call timeout for stage fan-out and synthesis
    pub request_timeout: Duration,
    /// Timeout for the best-effort title task
    pub title_timeout: Duration,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(180),
            title_timeout: Duration::from_secs(30),
        }
    }
}

/// Lazy, ordered, single-pass stream of [`CouncilEvent`]s from one run.
///
/// Events arrive in real time as the stages complete; the stream is not
/// replayable. Terminates after `Complete` or `Error`.
pub struct CouncilStream {
    receiver: mpsc::Receiver<CouncilEvent>,
}

impl CouncilStream {
    pub fn new(receiver: mpsc::Receiver<CouncilEvent>) -> Self {
        Self { receiver }
    }

    /// Receive the next event, or `None` once the stream has ended.
    pub async fn recv(&mut self) -> Option<CouncilEvent> {
        self.receiver.recv().await
    }

    /// Drain the stream into a vec. Intended for tests and batch callers.
    pub async fn collect_events(mut self) -> Vec<CouncilEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.receiver.recv().await {
            let terminal = event.is_terminal();
            events.push(event);
            if terminal {
                break;
            }
        }
        events
    }
}

/// Use case for running a full council deliberation
pub struct RunCouncilUseCase<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    roster: Arc<CouncilRoster>,
    params: ExecutionParams,
}

impl<G: LlmGateway + 'static> Clone for RunCouncilUseCase<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            roster: Arc::clone(&self.roster),
            params: self.params,
        }
    }
}

impl<G: LlmGateway + 'static> RunCouncilUseCase<G> {
    pub fn new(gateway: Arc<G>, roster: CouncilRoster) -> Self {
        Self {
            gateway,
            roster: Arc::new(roster),
            params: ExecutionParams::default(),
        }
    }

    pub fn with_params(mut self, params: ExecutionParams) -> Self {
        self.params = params;
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, query: &str) -> Result<CouncilOutcome, RunCouncilError> {
        self.execute_with_progress(query, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        query: &str,
        progress: &dyn ProgressNotifier,
    ) -> Result<CouncilOutcome, RunCouncilError> {
        if self.roster.members.is_empty() {
            return Err(RunCouncilError::NoMembers);
        }

        info!(
            "Starting council with {} members",
            self.roster.members.len()
        );

        // Stage 1: Collect
        let stage1 = self.stage_collect(query, progress).await;
        if stage1.is_empty() {
            warn!("All council members failed to respond");
            return Ok(CouncilOutcome::total_failure());
        }

        // Stage 2: Rank
        let (stage2, metadata) = self.stage_rank(query, &stage1, progress).await;

        // Stage 3: Synthesize
        let stage3 = self.stage_synthesize(query, &stage1, &stage2, progress).await;

        Ok(CouncilOutcome::new(stage1, stage2, stage3, metadata))
    }

    /// Execute the use case as an event stream.
    ///
    /// When `generate_title` is true (first message of a conversation), a
    /// best-effort title task is spawned up front, runs concurrently with
    /// the three stages, and is joined after stage 3 so `TitleComplete`
    /// always lands between `Stage3Complete` and `Complete`.
    pub fn execute_streaming(&self, query: impl Into<String>, generate_title: bool) -> CouncilStream {
        let (tx, rx) = mpsc::channel(16);
        let this = self.clone();
        let query = query.into();

        tokio::spawn(async move {
            if let Err(e) = this.stream_run(&query, generate_title, &tx).await {
                let _ = tx.send(CouncilEvent::error(e.to_string())).await;
            }
        });

        CouncilStream::new(rx)
    }

    async fn stream_run(
        &self,
        query: &str,
        generate_title: bool,
        tx: &mpsc::Sender<CouncilEvent>,
    ) -> Result<(), RunCouncilError> {
        if self.roster.members.is_empty() {
            return Err(RunCouncilError::NoMembers);
        }

        let title_task = generate_title.then(|| {
            let title_use_case = GenerateTitleUseCase::new(
                Arc::clone(&self.gateway),
                self.roster.title_model.clone(),
                self.params.title_timeout,
            );
            let query = query.to_string();
            tokio::spawn(async move { title_use_case.execute(&query).await })
        });

        if !emit(tx, CouncilEvent::Stage1Start).await {
            return Ok(());
        }
        let stage1 = self.stage_collect(query, &NoProgress).await;
        if stage1.is_empty() {
            // Stage1Complete is never reached; the run terminates as failed.
            if let Some(task) = title_task {
                task.abort();
            }
            emit(tx, CouncilEvent::error(ALL_FAILED_SENTINEL)).await;
            return Ok(());
        }
        if !emit(tx, CouncilEvent::Stage1Complete { data: stage1.clone() }).await {
            return Ok(());
        }

        if !emit(tx, CouncilEvent::Stage2Start).await {
            return Ok(());
        }
        let (stage2, metadata) = self.stage_rank(query, &stage1, &NoProgress).await;
        let stage2_event = CouncilEvent::Stage2Complete {
            data: stage2.clone(),
            metadata: metadata.clone(),
        };
        if !emit(tx, stage2_event).await {
            return Ok(());
        }

        if !emit(tx, CouncilEvent::Stage3Start).await {
            return Ok(());
        }
        let stage3 = self
            .stage_synthesize(query, &stage1, &stage2, &NoProgress)
            .await;
        if !emit(tx, CouncilEvent::Stage3Complete { data: stage3 }).await {
            return Ok(());
        }

        // Join point for the concurrent title task: always before Complete.
        if let Some(task) = title_task {
            let title = task.await.unwrap_or_else(|e| {
                warn!("Title task panicked: {}", e);
                council_domain::TITLE_FALLBACK.to_string()
            });
            if !emit(tx, CouncilEvent::title_complete(title)).await {
                return Ok(());
            }
        }

        emit(tx, CouncilEvent::Complete).await;
        Ok(())
    }

    /// Fan one prompt out to all targets and wait for every call to settle.
    ///
    /// Failed or timed-out calls are logged and excluded from the mapping;
    /// they never short-circuit their siblings. Wall-clock latency equals
    /// the slowest target's latency, bounded by the per-call timeout.
    async fn dispatch_all(
        &self,
        stage: Stage,
        targets: &[ModelSpec],
        messages: &[Message],
        progress: &dyn ProgressNotifier,
    ) -> HashMap<String, ModelReply> {
        progress.on_stage_start(stage, targets.len());

        let mut join_set = JoinSet::new();

        for spec in targets {
            let gateway = Arc::clone(&self.gateway);
            let spec = spec.clone();
            let messages = messages.to_vec();
            let timeout = self.params.request_timeout;

            join_set.spawn(async move {
                let result = gateway.complete(&spec, &messages, timeout).await;
                (spec.name, result)
            });
        }

        let mut replies = HashMap::new();

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((name, Ok(reply))) => {
                    debug!("Model {} responded", name);
                    progress.on_model_complete(stage, &name, true);
                    replies.insert(name, reply);
                }
                Ok((name, Err(e))) => {
                    warn!("Model {} failed: {}", name, e);
                    progress.on_model_complete(stage, &name, false);
                }
                Err(e) => {
                    warn!("Task join error: {}", e);
                }
            }
        }

        progress.on_stage_complete(stage);
        replies
    }

    /// Stage 1: every member answers the question.
    ///
    /// Results follow roster declaration order regardless of completion
    /// order; members absent from the reply mapping are skipped.
    async fn stage_collect(
        &self,
        query: &str,
        progress: &dyn ProgressNotifier,
    ) -> Vec<Stage1Result> {
        info!("Stage 1: Collect Responses");

        let messages = vec![
            Message::system(PromptTemplate::council_system()),
            Message::user(query),
        ];

        let mut replies = self
            .dispatch_all(Stage::Collect, &self.roster.members, &messages, progress)
            .await;

        self.roster
            .members
            .iter()
            .filter_map(|member| {
                replies
                    .remove(&member.name)
                    .map(|reply| Stage1Result::new(&member.name, reply.content, reply.usage))
            })
            .collect()
    }

    /// Stage 2: every member ranks the anonymized stage-1 answers.
    async fn stage_rank(
        &self,
        query: &str,
        stage1: &[Stage1Result],
        progress: &dyn ProgressNotifier,
    ) -> (Vec<Stage2Result>, CouncilMetadata) {
        info!("Stage 2: Peer Ranking");

        let labels = assign_labels(stage1);
        let label_to_model: HashMap<String, String> = labels.iter().cloned().collect();

        let labeled_responses: Vec<(String, String)> = labels
            .iter()
            .zip(stage1)
            .map(|((label, _), result)| (label.clone(), result.response.clone()))
            .collect();

        // Identical user-only prompt for every member; no system message.
        let prompt = PromptTemplate::ranking_prompt(query, &labeled_responses);
        let messages = vec![Message::user(prompt)];

        let mut replies = self
            .dispatch_all(Stage::Rank, &self.roster.members, &messages, progress)
            .await;

        let stage2: Vec<Stage2Result> = self
            .roster
            .members
            .iter()
            .filter_map(|member| {
                replies.remove(&member.name).map(|reply| {
                    let parsed = parse_ranking(&reply.content, labels.len());
                    Stage2Result::new(&member.name, reply.content, parsed)
                })
            })
            .collect();

        let aggregate = aggregate_rankings(&stage2, &label_to_model);

        (
            stage2,
            CouncilMetadata {
                label_to_model,
                aggregate_rankings: aggregate,
            },
        )
    }

    /// Stage 3: the chairman synthesizes the final decision.
    ///
    /// Chairman failure degrades to a sentinel string; it never aborts
    /// the run.
    async fn stage_synthesize(
        &self,
        query: &str,
        stage1: &[Stage1Result],
        stage2: &[Stage2Result],
        progress: &dyn ProgressNotifier,
    ) -> String {
        info!("Stage 3: Synthesis via {}", self.roster.chairman.name);
        progress.on_stage_start(Stage::Synthesize, 1);

        let responses: Vec<(String, String)> = stage1
            .iter()
            .map(|r| (r.model.clone(), r.response.clone()))
            .collect();
        let rankings: Vec<(String, String)> = stage2
            .iter()
            .map(|r| (r.model.clone(), r.ranking.clone()))
            .collect();

        let messages = vec![
            Message::system(PromptTemplate::chairman_system()),
            Message::user(PromptTemplate::synthesis_prompt(query, &responses, &rankings)),
        ];

        let result = self
            .gateway
            .complete(&self.roster.chairman, &messages, self.params.request_timeout)
            .await;

        let (stage3, success) = match result {
            Ok(reply) => (reply.content, true),
            Err(e) => {
                warn!("Chairman {} failed: {}", self.roster.chairman.name, e);
                (SYNTHESIS_FAILED_SENTINEL.to_string(), false)
            }
        };

        progress.on_model_complete(Stage::Synthesize, &self.roster.chairman.name, success);
        progress.on_stage_complete(Stage::Synthesize);
        stage3
    }
}

/// Send one event, returning false if the consumer went away.
async fn emit(tx: &mpsc::Sender<CouncilEvent>, event: CouncilEvent) -> bool {
    tx.send(event).await.is_ok()
}
