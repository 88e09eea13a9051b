use sketch_studio::gen::{
    GeminiClient, GenerationController, GenerationEvent, PromptTemplate, RequestState,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Client wired to a port nothing listens on, so every request fails fast
/// without touching the network.
fn unreachable_client() -> Arc<GeminiClient> {
    let client = GeminiClient::new(
        "test-key".to_string(),
        "test-model".to_string(),
        Some(Duration::from_secs(5)),
    )
    .expect("client builds")
    .with_base_url("http://127.0.0.1:9");
    Arc::new(client)
}

fn poll_until_event(controller: &mut GenerationController) -> GenerationEvent {
    let deadline = Instant::now() + Duration::from_secs(30);
    loop {
        if let Some(event) = controller.poll() {
            return event;
        }
        assert!(Instant::now() < deadline, "no event before deadline");
        std::thread::sleep(Duration::from_millis(10));
    }
}

#[test]
fn empty_prompt_never_leaves_idle() {
    let mut controller = GenerationController::new(unreachable_client(), PromptTemplate::default());

    assert!(!controller.submit("", None));
    assert!(!controller.submit("   \n\t", Some("QUJD".to_string())));

    assert_eq!(controller.state(), RequestState::Idle);
    assert!(controller.poll().is_none());
}

#[test]
fn failed_request_reports_error_and_returns_to_idle() {
    let mut controller = GenerationController::new(unreachable_client(), PromptTemplate::default());

    assert!(controller.submit("add a sun", Some("QUJD".to_string())));
    assert_eq!(controller.state(), RequestState::Submitting);

    match poll_until_event(&mut controller) {
        GenerationEvent::Failed { error } => assert!(!error.is_empty()),
        GenerationEvent::Completed { .. } => panic!("request against a dead port succeeded"),
    }
    assert_eq!(controller.state(), RequestState::Idle);
}

#[test]
fn second_submit_while_in_flight_is_rejected() {
    let mut controller = GenerationController::new(unreachable_client(), PromptTemplate::default());

    assert!(controller.submit("first", None));
    assert!(!controller.submit("second", None));
    assert_eq!(controller.state(), RequestState::Submitting);

    // Drain the first request; afterwards submitting works again.
    let _ = poll_until_event(&mut controller);
    assert!(controller.submit("third", None));
    let _ = poll_until_event(&mut controller);
}
