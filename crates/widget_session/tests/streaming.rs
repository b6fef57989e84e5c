mod support;

use std::sync::Arc;

use session_client::{ClientError, SessionApi};
use widget_core::{MessageRole, WidgetConfig};
use widget_session::{AutoConfirm, ChatWidget, LogReporter, SubmitOutcome};
use widget_storage::MemoryStorage;

use support::{completion, token, StubApi};

fn widget_with(api: &Arc<StubApi>) -> ChatWidget {
    let config = WidgetConfig::with_endpoint("http://localhost:5000", "bot-guid");
    ChatWidget::new(
        config,
        Arc::clone(api) as Arc<dyn SessionApi>,
        Arc::new(MemoryStorage::new()),
        Arc::new(AutoConfirm),
        Arc::new(LogReporter),
    )
}

async fn attached_widget(api: &Arc<StubApi>) -> ChatWidget {
    let widget = widget_with(api);
    widget.store().set_session_guid("s1").await;
    widget.store().set_user_guid("visitor").await;
    widget
}

#[tokio::test]
async fn completed_exchange_reconciles_both_guids() {
    let api = Arc::new(StubApi::new());
    api.push_answer(vec![
        Ok(token("Hi")),
        Ok(token(" there")),
        Ok(completion("b1", "u1")),
    ]);
    let widget = attached_widget(&api).await;

    let outcome = widget.submit_question("Hello").await;
    assert_eq!(outcome, SubmitOutcome::Completed);

    let messages = widget.store().messages().await;
    assert_eq!(messages.len(), 2);

    assert_eq!(messages[0].role, MessageRole::User);
    assert_eq!(messages[0].guid, "u1");
    assert_eq!(messages[0].content, "Hello");
    assert!(!messages[0].provisional);

    assert_eq!(messages[1].role, MessageRole::Bot);
    assert_eq!(messages[1].guid, "b1");
    assert_eq!(messages[1].content, "Hi there");
    assert!(!messages[1].provisional);

    assert!(!widget.store().is_streaming().await);
    assert!(widget.store().track_inactivity().await);
    assert!(widget.store().has_feedback_timer().await);
}

#[tokio::test]
async fn blank_input_is_rejected() {
    let api = Arc::new(StubApi::new());
    let widget = attached_widget(&api).await;

    assert_eq!(widget.submit_question("   ").await, SubmitOutcome::Rejected);
    assert_eq!(widget.store().message_count().await, 0);
    assert_eq!(*api.answer_calls.lock().unwrap(), 0);
}

#[tokio::test]
async fn concurrent_submission_is_rejected() {
    let api = Arc::new(StubApi::new());
    api.push_pending_answer();
    let widget = Arc::new(attached_widget(&api).await);

    let first = {
        let widget = Arc::clone(&widget);
        tokio::spawn(async move { widget.submit_question("first").await })
    };
    tokio::task::yield_now().await;
    assert!(widget.store().is_streaming().await);

    assert_eq!(
        widget.submit_question("second").await,
        SubmitOutcome::Rejected
    );
    assert_eq!(*api.answer_calls.lock().unwrap(), 1);

    widget.cancel_exchange().await;
    assert_eq!(first.await.unwrap(), SubmitOutcome::Aborted);
}

#[tokio::test]
async fn cancellation_rolls_back_silently() {
    let api = Arc::new(StubApi::new());
    api.push_pending_answer();
    let widget = Arc::new(attached_widget(&api).await);

    let pending = {
        let widget = Arc::clone(&widget);
        tokio::spawn(async move { widget.submit_question("never mind").await })
    };
    tokio::task::yield_now().await;
    widget.cancel_exchange().await;

    assert_eq!(pending.await.unwrap(), SubmitOutcome::Aborted);
    assert_eq!(widget.store().message_count().await, 0);
    assert!(widget.store().error_message().await.is_empty());
    assert!(!widget.store().is_streaming().await);
}

#[tokio::test]
async fn request_failure_removes_provisional_user_message() {
    let api = Arc::new(StubApi::new());
    api.push_failing_answer();
    let widget = attached_widget(&api).await;

    assert_eq!(widget.submit_question("Hello").await, SubmitOutcome::Failed);
    assert_eq!(widget.store().message_count().await, 0);
    assert!(!widget.store().error_message().await.is_empty());
    assert!(!widget.store().is_streaming().await);
}

#[tokio::test]
async fn malformed_event_before_tokens_rolls_back() {
    let api = Arc::new(StubApi::new());
    api.push_answer(vec![Err(ClientError::MalformedEvent(
        "{\"unexpected\":true}".to_string(),
    ))]);
    let widget = attached_widget(&api).await;

    assert_eq!(widget.submit_question("Hello").await, SubmitOutcome::Failed);
    assert_eq!(widget.store().message_count().await, 0);
    assert!(!widget.store().error_message().await.is_empty());
}

#[tokio::test]
async fn partial_answer_survives_stream_failure() {
    let api = Arc::new(StubApi::new());
    api.push_answer(vec![
        Ok(token("Partial")),
        Err(ClientError::Stream("connection reset".to_string())),
    ]);
    let widget = attached_widget(&api).await;

    assert_eq!(widget.submit_question("Hello").await, SubmitOutcome::Failed);

    // The question and the half-delivered answer both stay on screen.
    let messages = widget.store().messages().await;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].content, "Hello");
    assert_eq!(messages[1].content, "Partial");
    assert!(messages[1].provisional);
    assert!(!widget.store().error_message().await.is_empty());
    assert!(!widget.store().track_inactivity().await);
}

#[tokio::test]
async fn stream_closing_without_completion_fails() {
    let api = Arc::new(StubApi::new());
    api.push_answer(vec![Ok(token("Hi"))]);
    let widget = attached_widget(&api).await;

    assert_eq!(widget.submit_question("Hello").await, SubmitOutcome::Failed);
    assert!(!widget.store().error_message().await.is_empty());
    assert!(!widget.store().is_streaming().await);
}

#[tokio::test]
async fn new_submission_clears_previous_error() {
    let api = Arc::new(StubApi::new());
    api.push_failing_answer();
    api.push_answer(vec![Ok(token("Hi")), Ok(completion("b1", "u1"))]);
    let widget = attached_widget(&api).await;

    assert_eq!(widget.submit_question("first").await, SubmitOutcome::Failed);
    assert!(!widget.store().error_message().await.is_empty());

    assert_eq!(
        widget.submit_question("second").await,
        SubmitOutcome::Completed
    );
    assert!(widget.store().error_message().await.is_empty());
}
