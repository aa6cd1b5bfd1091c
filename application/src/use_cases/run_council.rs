//! Run Council use case
//!
//! Orchestrates the full three-stage deliberation: concurrent opinion
//! gathering with a quorum gate, anonymized cross-review, and chairman
//! synthesis. Stages are strictly sequential; within a stage all calls run
//! concurrently and the stage waits for every outcome before aggregating.

use crate::ports::chat_gateway::{ChatGateway, ChatMessage, ChatRequest};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::transport::{CallOutcome, RetryPolicy, call_with_retry};
use chrono::Utc;
use council_domain::{
    AnonymizedBundle, CouncilAnswer, CouncilReview, CouncilRoster, Phase, PromptTemplate, Question,
    RunError, RunReport, Synthesis, parse_synthesis,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Errors that can abort a deliberation run
///
/// A quorum shortfall is the only point where a per-councilor failure
/// becomes fatal; every other failure mode degrades into the report.
#[derive(Error, Debug)]
pub enum RunCouncilError {
    #[error("No councilors configured")]
    EmptyRoster,

    #[error("Only {succeeded} councilor(s) succeeded - minimum {required} required")]
    QuorumNotReached {
        succeeded: usize,
        required: usize,
        failures: Vec<RunError>,
    },
}

/// Tunable execution parameters for one run
#[derive(Debug, Clone)]
pub struct CouncilPolicy {
    /// Minimum successful opinions required to continue
    pub min_quorum: usize,
    /// Retry budget and backoff for every transport call
    pub retry: RetryPolicy,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for CouncilPolicy {
    fn default() -> Self {
        Self {
            min_quorum: 2,
            retry: RetryPolicy::default(),
            max_tokens: 1500,
            temperature: 0.7,
        }
    }
}

/// Input for the RunCouncil use case
#[derive(Debug, Clone)]
pub struct RunCouncilInput {
    /// The question to deliberate on
    pub question: Question,
    /// Councilors plus chairman, statically configured
    pub roster: CouncilRoster,
    /// Whether to run the cross-review stage
    pub enable_review: bool,
    pub policy: CouncilPolicy,
    /// Fixed seed for the anonymization shuffle (deterministic tests)
    pub seed: Option<u64>,
}

impl RunCouncilInput {
    pub fn new(question: impl Into<Question>, roster: CouncilRoster) -> Self {
        Self {
            question: question.into(),
            roster,
            enable_review: true,
            policy: CouncilPolicy::default(),
            seed: None,
        }
    }

    /// Fast mode: skip the cross-review stage entirely
    pub fn without_review(mut self) -> Self {
        self.enable_review = false;
        self
    }

    pub fn with_policy(mut self, policy: CouncilPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Use case for running a full deliberation
pub struct RunCouncilUseCase<G: ChatGateway + 'static> {
    gateway: Arc<G>,
}

impl<G: ChatGateway + 'static> RunCouncilUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RunCouncilInput) -> Result<RunReport, RunCouncilError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunCouncilInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<RunReport, RunCouncilError> {
        if input.roster.councilors.is_empty() {
            return Err(RunCouncilError::EmptyRoster);
        }

        info!(
            "Convening the council with {} councilors",
            input.roster.councilors.len()
        );

        let started_at = Utc::now();
        let t0 = Instant::now();
        let mut errors: Vec<RunError> = Vec::new();

        // Stage 1: first opinions, gated by quorum
        let (answers, stage1_failures) = self.stage_opinions(&input, progress).await;
        errors.extend(stage1_failures.iter().cloned());

        if answers.len() < input.policy.min_quorum {
            return Err(RunCouncilError::QuorumNotReached {
                succeeded: answers.len(),
                required: input.policy.min_quorum,
                failures: stage1_failures,
            });
        }

        // Stage 2: anonymized cross-review (optional, never fatal)
        let reviews = if input.enable_review {
            let (reviews, stage2_failures) = self.stage_reviews(&input, &answers, progress).await;
            errors.extend(stage2_failures);
            reviews
        } else {
            debug!("Skipping review stage (fast mode)");
            Vec::new()
        };

        // Stage 3: chairman synthesis (degrades, never fatal)
        let synthesis = self
            .stage_synthesis(&input, &answers, &reviews, progress)
            .await;

        Ok(RunReport::new(
            input.question.content(),
            synthesis,
            &answers,
            &reviews,
            input.roster.chairman.label.clone(),
            input.roster.labels(),
            !input.enable_review,
            started_at,
            t0.elapsed().as_secs_f64(),
            errors,
        ))
    }

    /// Stage 1: ask every councilor the question in parallel
    async fn stage_opinions(
        &self,
        input: &RunCouncilInput,
        progress: &dyn ProgressNotifier,
    ) -> (Vec<CouncilAnswer>, Vec<RunError>) {
        info!("Stage 1: Gathering first opinions");
        progress.on_phase_start(&Phase::Opinions, input.roster.councilors.len());

        let mut join_set = JoinSet::new();

        for councilor in &input.roster.councilors {
            let gateway = Arc::clone(&self.gateway);
            let councilor = councilor.clone();
            let retry = input.policy.retry.clone();
            let request = ChatRequest::new(
                councilor.model.clone(),
                vec![
                    ChatMessage::system(PromptTemplate::opinion_system()),
                    ChatMessage::user(PromptTemplate::opinion_query(input.question.content())),
                ],
            )
            .with_max_tokens(input.policy.max_tokens)
            .with_temperature(input.policy.temperature);

            join_set.spawn(async move {
                let outcome =
                    call_with_retry(gateway.as_ref(), request, &councilor.label, &retry).await;
                (councilor, outcome)
            });
        }

        let mut answers = Vec::new();
        let mut failures = Vec::new();

        while let Some(result) = join_set.join_next().await {
            match result {
                Ok((councilor, CallOutcome::Success { text })) => {
                    info!("{} answered", councilor.label);
                    progress.on_task_complete(&Phase::Opinions, &councilor.label, true);
                    answers.push(CouncilAnswer::new(councilor, text));
                }
                Ok((councilor, CallOutcome::Failure { reason, .. })) => {
                    warn!("{} failed: {reason}", councilor.label);
                    progress.on_task_complete(&Phase::Opinions, &councilor.label, false);
                    failures.push(RunError::new(councilor.label, reason));
                }
                Err(e) => {
                    warn!("Task join error: {e}");
                }
            }
        }

        // Gather order is nondeterministic; restore roster order
        answers.sort_by_key(|a| input.roster.position(&a.councilor.id));
        failures.sort_by_key(|f| {
            input
                .roster
                .councilors
                .iter()
                .position(|c| c.label == f.source)
                .unwrap_or(usize::MAX)
        });

        progress.on_phase_complete(&Phase::Opinions);
        (answers, failures)
    }

    /// Stage 2: each surviving councilor reviews the others anonymously
    async fn stage_reviews(
        &self,
        input: &RunCouncilInput,
        answers: &[CouncilAnswer],
        progress: &dyn ProgressNotifier,
    ) -> (Vec<CouncilReview>, Vec<RunError>) {
        info!("Stage 2: Cross-reviewing");
        progress.on_phase_start(&Phase::Reviews, answers.len());

        // Bundles are built sequentially from one RNG before the fan-out so
        // a fixed seed yields a reproducible set of permutations, and each
        // reviewer gets an independent shuffle.
        let mut rng = match input.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut join_set = JoinSet::new();

        for answer in answers {
            let bundle = AnonymizedBundle::build(answers, &answer.councilor.id, &mut rng);
            if bundle.is_empty() {
                continue;
            }

            let gateway = Arc::clone(&self.gateway);
            let reviewer = answer.councilor.clone();
            let retry = input.policy.retry.clone();
            let request = ChatRequest::new(
                reviewer.model.clone(),
                vec![
                    ChatMessage::system(PromptTemplate::review_system()),
                    ChatMessage::user(PromptTemplate::review_prompt(
                        input.question.content(),
                        &bundle,
                    )),
                ],
            )
            .with_max_tokens(input.policy.max_tokens)
            .with_temperature(input.policy.temperature);

            join_set.spawn(async move {
                let outcome =
                    call_with_retry(gateway.as_ref(), request, &reviewer.label, &retry).await;
                (reviewer, outcome)
            });
        }

        let mut reviews = Vec::new();
        let mut failures = Vec::new();

        while let Some(result) = join_set.join_next().await {
            match result {
                Ok((reviewer, CallOutcome::Success { text })) => {
                    info!("{} reviewed", reviewer.label);
                    progress.on_task_complete(&Phase::Reviews, &reviewer.label, true);
                    reviews.push(CouncilReview::new(reviewer, text));
                }
                Ok((reviewer, CallOutcome::Failure { reason, .. })) => {
                    warn!("{} review failed: {reason}", reviewer.label);
                    progress.on_task_complete(&Phase::Reviews, &reviewer.label, false);
                    failures.push(RunError::new(reviewer.label, reason));
                }
                Err(e) => {
                    warn!("Task join error: {e}");
                }
            }
        }

        reviews.sort_by_key(|r| input.roster.position(&r.reviewer.id));

        progress.on_phase_complete(&Phase::Reviews);
        (reviews, failures)
    }

    /// Stage 3: the chairman synthesizes everything into a structured verdict
    async fn stage_synthesis(
        &self,
        input: &RunCouncilInput,
        answers: &[CouncilAnswer],
        reviews: &[CouncilReview],
        progress: &dyn ProgressNotifier,
    ) -> Synthesis {
        info!("Stage 3: Chairman synthesizing");
        progress.on_phase_start(&Phase::Synthesis, 1);

        let chairman = &input.roster.chairman;
        let request = ChatRequest::new(
            chairman.model.clone(),
            vec![
                ChatMessage::system(PromptTemplate::synthesis_system()),
                ChatMessage::user(PromptTemplate::synthesis_prompt(
                    input.question.content(),
                    answers,
                    reviews,
                )),
            ],
        )
        .with_max_tokens(input.policy.max_tokens)
        .with_temperature(input.policy.temperature);

        let outcome = call_with_retry(
            self.gateway.as_ref(),
            request,
            &chairman.label,
            &input.policy.retry,
        )
        .await;

        let synthesis = match outcome {
            CallOutcome::Failure { reason, .. } => {
                warn!("Chairman call failed: {reason}");
                progress.on_task_complete(&Phase::Synthesis, &chairman.label, false);
                Synthesis::failed_chairman(&reason)
            }
            CallOutcome::Success { text } => {
                debug!("Chairman raw response length: {} chars", text.len());
                let parsed = parse_synthesis(&text);
                if parsed.is_degraded() {
                    warn!("Chairman reply was not valid JSON, using raw text fallback");
                }
                progress.on_task_complete(&Phase::Synthesis, &chairman.label, true);
                parsed.into_synthesis()
            }
        };

        progress.on_phase_complete(&Phase::Synthesis);
        synthesis
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::chat_gateway::GatewayError;
    use async_trait::async_trait;
    use council_domain::{Chairman, Confidence, Councilor};
    use std::collections::HashSet;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const CHAIRMAN_MODEL: &str = "chair/model";

    /// Gateway that answers per model and records every request
    struct CouncilGateway {
        calls: AtomicUsize,
        fail_models: HashSet<String>,
        chairman_reply: String,
        requests: Mutex<Vec<(String, String)>>,
    }

    impl CouncilGateway {
        fn new(fail_models: &[&str], chairman_reply: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_models: fail_models.iter().map(|m| m.to_string()).collect(),
                chairman_reply: chairman_reply.to_string(),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn review_requests_for(&self, model: &str) -> Vec<String> {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .filter(|(m, body)| m == model && body.contains("other advisors"))
                .map(|(_, body)| body.clone())
                .collect()
        }
    }

    #[async_trait]
    impl ChatGateway for CouncilGateway {
        async fn complete(&self, request: ChatRequest) -> Result<String, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let model = request.model.to_string();
            let user_content = request
                .messages
                .iter()
                .rev()
                .find(|m| matches!(m.role, crate::ports::chat_gateway::Role::User))
                .map(|m| m.content.clone())
                .unwrap_or_default();
            self.requests.lock().unwrap().push((model.clone(), user_content));

            if self.fail_models.contains(&model) {
                return Err(GatewayError::ServerError {
                    status: 500,
                    retry_after: None,
                });
            }
            if model == CHAIRMAN_MODEL {
                return Ok(self.chairman_reply.clone());
            }
            Ok(format!("answer from {model}"))
        }
    }

    fn roster() -> CouncilRoster {
        CouncilRoster::new(
            vec![
                Councilor::new("one", "m/one", "Model One", "Reasoner"),
                Councilor::new("two", "m/two", "Model Two", "Knowledge"),
                Councilor::new("three", "m/three", "Model Three", "Structuralist"),
                Councilor::new("four", "m/four", "Model Four", "Generalist"),
            ],
            Chairman::new("chair", CHAIRMAN_MODEL, "The Chairman"),
        )
        .unwrap()
    }

    fn fast_policy() -> CouncilPolicy {
        CouncilPolicy {
            retry: RetryPolicy::immediate(0),
            ..CouncilPolicy::default()
        }
    }

    const CHAIRMAN_JSON: &str = r#"{
        "summary": "The council agrees.",
        "key_points": ["shared direction"],
        "success_criteria": [],
        "risks": [{"risk": "scope creep", "severity": "medium", "mitigation": "timebox"}],
        "disagreements": [],
        "confidence": "high",
        "confidence_note": "strong alignment"
    }"#;

    fn input(gateway_roster: CouncilRoster) -> RunCouncilInput {
        RunCouncilInput::new("Should we ship?", gateway_roster)
            .with_policy(fast_policy())
            .with_seed(42)
    }

    #[tokio::test]
    async fn test_scenario_all_succeed_with_reviews() {
        let gateway = Arc::new(CouncilGateway::new(&[], CHAIRMAN_JSON));
        let use_case = RunCouncilUseCase::new(Arc::clone(&gateway));

        let report = use_case.execute(input(roster())).await.unwrap();

        // 4 opinions + 4 reviews + 1 synthesis
        assert_eq!(gateway.calls(), 9);
        assert_eq!(report.individual_answers.len(), 4);
        assert_eq!(report.peer_reviews.len(), 4);
        assert!(!report.stage2_skipped);
        assert!(report.errors.is_empty());
        assert_eq!(report.synthesis.summary, "The council agrees.");
        assert_eq!(report.synthesis.confidence, Confidence::High);
        assert_eq!(report.chairman, "The Chairman");
        assert_eq!(report.council.len(), 4);
        // Roster order is preserved regardless of completion order
        assert_eq!(report.individual_answers[0].model, "Model One");
        assert_eq!(report.individual_answers[3].model, "Model Four");
    }

    #[tokio::test]
    async fn test_scenario_fast_mode_skips_reviews() {
        let gateway = Arc::new(CouncilGateway::new(&[], CHAIRMAN_JSON));
        let use_case = RunCouncilUseCase::new(Arc::clone(&gateway));

        let report = use_case
            .execute(input(roster()).without_review())
            .await
            .unwrap();

        // 4 opinions + 1 synthesis, no review calls at all
        assert_eq!(gateway.calls(), 5);
        assert!(report.peer_reviews.is_empty());
        assert!(report.stage2_skipped);
    }

    #[tokio::test]
    async fn test_scenario_one_failure_proceeds_above_quorum() {
        let gateway = Arc::new(CouncilGateway::new(&["m/two"], CHAIRMAN_JSON));
        let use_case = RunCouncilUseCase::new(Arc::clone(&gateway));

        let report = use_case.execute(input(roster())).await.unwrap();

        assert_eq!(report.individual_answers.len(), 3);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].source, "Model Two");
        assert!(report.errors[0].reason.contains("HTTP 500"));
        // 4 opinions + 3 reviews + 1 synthesis
        assert_eq!(gateway.calls(), 8);
        // The failed councilor stays in the configured council listing
        assert_eq!(report.council.len(), 4);
    }

    #[tokio::test]
    async fn test_scenario_quorum_failure_aborts_before_reviews() {
        let gateway = Arc::new(CouncilGateway::new(
            &["m/one", "m/two", "m/three"],
            CHAIRMAN_JSON,
        ));
        let use_case = RunCouncilUseCase::new(Arc::clone(&gateway));

        let err = use_case.execute(input(roster())).await.unwrap_err();

        match err {
            RunCouncilError::QuorumNotReached {
                succeeded,
                required,
                failures,
            } => {
                assert_eq!(succeeded, 1);
                assert_eq!(required, 2);
                assert_eq!(failures.len(), 3);
            }
            other => panic!("unexpected error: {other}"),
        }
        // Only the 4 opinion calls happened; no review or synthesis work
        assert_eq!(gateway.calls(), 4);
    }

    #[tokio::test]
    async fn test_exactly_quorum_proceeds() {
        let gateway = Arc::new(CouncilGateway::new(&["m/one", "m/four"], CHAIRMAN_JSON));
        let use_case = RunCouncilUseCase::new(Arc::clone(&gateway));

        let report = use_case.execute(input(roster())).await.unwrap();

        assert_eq!(report.individual_answers.len(), 2);
        assert_eq!(report.errors.len(), 2);
    }

    #[tokio::test]
    async fn test_reviewers_never_see_their_own_answer() {
        let gateway = Arc::new(CouncilGateway::new(&[], CHAIRMAN_JSON));
        let use_case = RunCouncilUseCase::new(Arc::clone(&gateway));

        use_case.execute(input(roster())).await.unwrap();

        for model in ["m/one", "m/two", "m/three", "m/four"] {
            let reviews = gateway.review_requests_for(model);
            assert_eq!(reviews.len(), 1, "expected one review request for {model}");
            assert!(
                !reviews[0].contains(&format!("answer from {model}")),
                "{model} saw its own answer"
            );
            // Real labels must not leak into the anonymized bundle section
            for label in ["Model One", "Model Two", "Model Three", "Model Four"] {
                assert!(
                    !reviews[0].contains(&format!("**{label}:**")),
                    "real label {label} leaked into review prompt"
                );
            }
        }
    }

    #[tokio::test]
    async fn test_chairman_failure_degrades_gracefully() {
        let gateway = Arc::new(CouncilGateway::new(&[CHAIRMAN_MODEL], CHAIRMAN_JSON));
        let use_case = RunCouncilUseCase::new(Arc::clone(&gateway));

        let report = use_case.execute(input(roster())).await.unwrap();

        assert!(report.synthesis.summary.contains("Chairman failed to respond"));
        assert_eq!(report.synthesis.confidence, Confidence::Unknown);
        assert_eq!(report.synthesis.confidence_note, "Chairman call failed.");
        assert!(report.synthesis.risks.is_empty());
    }

    #[tokio::test]
    async fn test_unparseable_chairman_reply_falls_back_to_raw_text() {
        let gateway = Arc::new(CouncilGateway::new(&[], "I refuse to emit JSON."));
        let use_case = RunCouncilUseCase::new(Arc::clone(&gateway));

        let report = use_case
            .execute(input(roster()).without_review())
            .await
            .unwrap();

        assert_eq!(report.synthesis.summary, "I refuse to emit JSON.");
        assert_eq!(
            report.synthesis.confidence_note,
            "Chairman response could not be parsed as JSON."
        );
    }

    #[tokio::test]
    async fn test_empty_roster_is_rejected() {
        let gateway = Arc::new(CouncilGateway::new(&[], CHAIRMAN_JSON));
        let use_case = RunCouncilUseCase::new(Arc::clone(&gateway));

        let mut bad = input(roster());
        bad.roster.councilors.clear();
        let err = use_case.execute(bad).await.unwrap_err();
        assert!(matches!(err, RunCouncilError::EmptyRoster));
    }
}
