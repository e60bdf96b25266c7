//! Pipeline and session tests against a counting provider double.
//!
//! The double recognizes which step sent a prompt, can be told to fail a
//! step, and records the peak number of concurrent calls.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use interviewer_core::error::ProviderError;
use interviewer_core::gate::GenerationSettings;
use interviewer_core::traits::{GenerateRequest, GenerateResponse, LlmProvider, ModelInfo, TokenUsage};
use interviewer_core::{EngineConfig, EvalError, EvaluationEngine, InterviewService, Stage};

const STAR_ANSWER: &str = "Last spring our team was three weeks from launching a customer \
portal when load testing showed page loads above eight seconds. As the backend lead I was \
responsible for getting response times under one second before the release date without \
cutting features. I profiled the slowest endpoints, found that the account summary page ran \
a separate query for every linked record, and rewrote it as two batched queries backed by a \
new composite index. I also added a short-lived cache for reference data and set up a \
dashboard so the whole team could watch latency during each deploy. I paired with a junior \
developer on the caching work so the knowledge would not sit with one person. Within ten \
days median load time dropped from eight seconds to six hundred milliseconds, we launched on \
schedule, and support tickets about slowness fell by seventy percent in the first month. The \
experience taught me to measure before optimizing and to share performance ownership with \
the whole team rather than treating it as a last-minute task for one engineer.";

#[derive(Default)]
struct CountingProvider {
    delay: Duration,
    fail_synthesis: AtomicBool,
    fail_coherence: AtomicBool,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    structural_calls: AtomicUsize,
    coherence_calls: AtomicUsize,
    synthesis_calls: AtomicUsize,
}

impl CountingProvider {
    fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Default::default()
        }
    }

    fn total_calls(&self) -> usize {
        self.structural_calls.load(Ordering::SeqCst)
            + self.coherence_calls.load(Ordering::SeqCst)
            + self.synthesis_calls.load(Ordering::SeqCst)
    }

    fn peak(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmProvider for CountingProvider {
    fn name(&self) -> &str {
        "counting"
    }

    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let content = if request.prompt.contains("<final report>") {
            self.synthesis_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_synthesis.load(Ordering::SeqCst) {
                return Err(ProviderError::ApiError {
                    status: 500,
                    message: "upstream exploded".into(),
                }
                .into());
            }
            format!("Final report\n{}", request.prompt)
        } else if request.prompt.contains("STAR technique") {
            self.structural_calls.fetch_add(1, Ordering::SeqCst);
            "Score: 8/10\nEvaluation: clear situation and result".to_string()
        } else {
            self.coherence_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_coherence.load(Ordering::SeqCst) {
                return Err(ProviderError::NetworkError("connection reset".into()).into());
            }
            "Score: 7/10\nEvaluation: logical flow".to_string()
        };

        Ok(GenerateResponse {
            content,
            model: request.model.clone(),
            token_usage: TokenUsage::default(),
            latency_ms: self.delay.as_millis() as u64,
        })
    }

    fn available_models(&self) -> Vec<ModelInfo> {
        vec![]
    }
}

fn config(gate_capacity: usize) -> EngineConfig {
    EngineConfig {
        gate_capacity,
        generation: GenerationSettings {
            model: "counting-model".into(),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn service(provider: &Arc<CountingProvider>) -> InterviewService {
    InterviewService::from_provider(provider.clone(), config(1))
}

#[tokio::test]
async fn end_to_end_single_answer() {
    let provider = Arc::new(CountingProvider::default());
    let service = service(&provider);

    let session = service.start_session();
    let report = service
        .submit_answer(&session, "Describe a challenge", STAR_ANSWER, 100)
        .await
        .unwrap();
    assert!(!report.trim().is_empty());

    let records = service.end_session(&session).unwrap();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.elapsed_seconds, 100);
    assert_eq!(record.evaluations.timing.score, 10);
    assert_eq!(record.question, "Describe a challenge");
    assert_eq!(record.answer, STAR_ANSWER);
    assert_eq!(record.final_report, report);
    assert!(record.evaluations.structural.contains("8/10"));
    assert!(record.evaluations.coherence.contains("7/10"));
    assert_eq!(provider.total_calls(), 3);
}

#[tokio::test]
async fn synthesis_sees_every_verdict() {
    let provider = Arc::new(CountingProvider::default());
    let engine = EvaluationEngine::new(provider.clone(), config(1));

    let record = engine
        .evaluate_full_answer("Describe a challenge", STAR_ANSWER, 135)
        .await
        .unwrap();

    // The double echoes the synthesis prompt back as the report.
    assert!(record.final_report.contains("clear situation and result"));
    assert!(record.final_report.contains("logical flow"));
    assert!(record
        .final_report
        .contains("4/10 - pacing outside optimal range"));
    assert_eq!(provider.synthesis_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn records_accumulate_in_submission_order() {
    let provider = Arc::new(CountingProvider::default());
    let service = service(&provider);
    let session = service.start_session();

    for (i, secs) in [95_i64, 60, 130].into_iter().enumerate() {
        service
            .submit_answer(&session, &format!("Question {i}"), STAR_ANSWER, secs)
            .await
            .unwrap();
    }

    let records = service.end_session(&session).unwrap();
    let questions: Vec<_> = records.iter().map(|r| r.question.as_str()).collect();
    assert_eq!(questions, ["Question 0", "Question 1", "Question 2"]);
    let scores: Vec<_> = records.iter().map(|r| r.evaluations.timing.score).collect();
    assert_eq!(scores, [10, 1, 5]);
}

#[tokio::test]
async fn synthesis_failure_appends_nothing() {
    let provider = Arc::new(CountingProvider::default());
    provider.fail_synthesis.store(true, Ordering::SeqCst);
    let service = service(&provider);
    let session = service.start_session();

    let err = service
        .submit_answer(&session, "Describe a challenge", STAR_ANSWER, 100)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        EvalError::GenerationFailure {
            stage: Stage::Synthesis,
            ..
        }
    ));
    assert!(!err.is_client_error());
    assert!(!err.public_message().contains("upstream exploded"));
    assert_eq!(provider.structural_calls.load(Ordering::SeqCst), 1);
    assert_eq!(provider.coherence_calls.load(Ordering::SeqCst), 1);

    // The session is still usable once the provider recovers.
    provider.fail_synthesis.store(false, Ordering::SeqCst);
    service
        .submit_answer(&session, "Describe a success", STAR_ANSWER, 100)
        .await
        .unwrap();

    let records = service.end_session(&session).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].question, "Describe a success");
}

#[tokio::test]
async fn evaluator_failure_skips_synthesis() {
    let provider = Arc::new(CountingProvider::default());
    provider.fail_coherence.store(true, Ordering::SeqCst);
    let engine = EvaluationEngine::new(provider.clone(), config(1));

    let err = engine
        .evaluate_full_answer("Describe a challenge", STAR_ANSWER, 100)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        EvalError::GenerationFailure {
            stage: Stage::Coherence,
            ..
        }
    ));
    assert!(matches!(
        err.provider_error(),
        Some(ProviderError::NetworkError(_))
    ));
    assert_eq!(provider.synthesis_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn gate_serializes_concurrent_evaluations() {
    let provider = Arc::new(CountingProvider::with_delay(Duration::from_millis(50)));
    let engine = EvaluationEngine::new(provider.clone(), config(1));

    let (a, b) = tokio::join!(
        engine.evaluate_full_answer("Q1", STAR_ANSWER, 100),
        engine.evaluate_full_answer("Q2", STAR_ANSWER, 100)
    );
    a.unwrap();
    b.unwrap();

    assert_eq!(provider.total_calls(), 6);
    assert_eq!(provider.peak(), 1);
}

#[tokio::test(start_paused = true)]
async fn wider_gate_admits_parallel_evaluators() {
    let provider = Arc::new(CountingProvider::with_delay(Duration::from_millis(50)));
    let engine = EvaluationEngine::new(provider.clone(), config(2));

    let (a, b) = tokio::join!(
        engine.evaluate_full_answer("Q1", STAR_ANSWER, 100),
        engine.evaluate_full_answer("Q2", STAR_ANSWER, 100)
    );
    a.unwrap();
    b.unwrap();

    assert_eq!(provider.peak(), 2);
    assert_eq!(engine.gate().available_permits(), 2);
}

#[tokio::test]
async fn unknown_session_spends_no_generation() {
    let provider = Arc::new(CountingProvider::default());
    let service = service(&provider);

    let session = service.start_session();
    service.end_session(&session).unwrap();

    let err = service
        .submit_answer(&session, "Describe a challenge", STAR_ANSWER, 100)
        .await
        .unwrap_err();
    assert!(matches!(err, EvalError::UnknownSession(id) if id == session));
    assert!(matches!(
        service.end_session(&session),
        Err(EvalError::UnknownSession(_))
    ));
    assert_eq!(provider.total_calls(), 0);
}

#[tokio::test]
async fn invalid_input_spends_no_generation() {
    let provider = Arc::new(CountingProvider::default());
    let service = service(&provider);
    let session = service.start_session();

    let negative = service
        .submit_answer(&session, "Describe a challenge", STAR_ANSWER, -5)
        .await
        .unwrap_err();
    assert!(matches!(negative, EvalError::InvalidInput(_)));

    let blank = service
        .submit_answer(&session, "Describe a challenge", "  ", 100)
        .await
        .unwrap_err();
    assert!(matches!(blank, EvalError::InvalidInput(_)));

    assert_eq!(provider.total_calls(), 0);
    assert!(service.end_session(&session).unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn session_ended_mid_evaluation_discards_record() {
    let provider = Arc::new(CountingProvider::with_delay(Duration::from_millis(50)));
    let service = service(&provider);
    let session = service.start_session();

    let (submitted, ended) = tokio::join!(
        service.submit_answer(&session, "Describe a challenge", STAR_ANSWER, 100),
        async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            service.end_session(&session)
        }
    );

    assert!(ended.unwrap().is_empty());
    assert!(matches!(submitted, Err(EvalError::UnknownSession(_))));
    assert!(service.sessions().is_empty());
}
