use std::sync::Arc;

use pchat::prelude::*;
use pcompletion::{
    Choice, ChoiceMessage, ClientConfig, CompletionError, CompletionResponse, FunctionCallRequest,
    RetryingClient, ScriptedBackend, Usage, WireRole,
};
use pfunctions::{FunctionRegistry, FunctionRuntime, FunctionSchema, PropertySchema};
use serde_json::json;

fn text_response(content: &str) -> CompletionResponse {
    CompletionResponse {
        choices: vec![Choice {
            message: ChoiceMessage {
                content: Some(content.to_string()),
                function_call: None,
            },
            finish_reason: "stop".to_string(),
        }],
        usage: Usage {
            total_tokens: 20,
            prompt_tokens: 15,
            completion_tokens: 5,
        },
        model: "pm-4".to_string(),
    }
}

fn function_call_response(name: &str, arguments: &str) -> CompletionResponse {
    CompletionResponse {
        choices: vec![Choice {
            message: ChoiceMessage {
                content: None,
                function_call: Some(FunctionCallRequest {
                    name: name.to_string(),
                    arguments: arguments.to_string(),
                }),
            },
            finish_reason: "function_call".to_string(),
        }],
        usage: Usage {
            total_tokens: 12,
            prompt_tokens: 10,
            completion_tokens: 2,
        },
        model: "pm-4".to_string(),
    }
}

fn time_registry() -> FunctionRegistry {
    let mut registry = FunctionRegistry::new();
    registry
        .register_sync(
            FunctionSchema::new("get_current_time", "Returns the current time")
                .property("zone", PropertySchema::string()),
            |_args| Ok(json!("12:00")),
        )
        .expect("registration should succeed");
    registry
}

fn orchestrator_with(
    backend: Arc<ScriptedBackend>,
    registry: FunctionRegistry,
) -> ChatOrchestrator {
    let client = RetryingClient::new(backend, ClientConfig::new("pm-4"))
        .expect("config should validate");
    let runtime = FunctionRuntime::new(Arc::new(registry));

    ChatOrchestrator::builder(client, runtime)
        .system_prompt("You are a helpful assistant.")
        .build()
}

#[tokio::test]
async fn function_call_turn_preserves_wire_ordering() {
    let backend = Arc::new(ScriptedBackend::new(vec![
        Ok(function_call_response("get_current_time", "{}")),
        Ok(text_response("It is noon")),
    ]));
    let orchestrator = orchestrator_with(backend.clone(), time_registry());

    let outcome = orchestrator
        .process_message("What time is it?", TurnOptions::default())
        .await;

    assert!(outcome.success);
    assert_eq!(outcome.message, "It is noon");

    let messages = orchestrator.messages().await;
    let tail = &messages[messages.len() - 4..];

    assert_eq!(tail[0].role, Role::User);
    assert_eq!(tail[0].content, "What time is it?");

    assert_eq!(tail[1].role, Role::Assistant);
    assert!(tail[1].content.is_empty());
    assert_eq!(
        tail[1].function_call.as_ref().map(|c| c.name.as_str()),
        Some("get_current_time")
    );

    assert_eq!(tail[2].role, Role::Function);
    assert_eq!(tail[2].name.as_deref(), Some("get_current_time"));
    assert_eq!(tail[2].content, "12:00");

    assert_eq!(tail[3].role, Role::Assistant);
    assert_eq!(tail[3].content, "It is noon");

    // The second request must echo the function-call round back on the wire.
    let requests = backend.recorded_requests();
    assert_eq!(requests.len(), 2);
    let echoed = &requests[1].messages;
    assert_eq!(echoed[echoed.len() - 1].role, WireRole::Function);
    assert!(echoed[echoed.len() - 2].function_call.is_some());
}

#[tokio::test]
async fn schemas_are_advertised_on_every_request() {
    let backend = Arc::new(ScriptedBackend::new(vec![
        Ok(function_call_response("get_current_time", "{}")),
        Ok(text_response("done")),
    ]));
    let orchestrator = orchestrator_with(backend.clone(), time_registry());

    let _ = orchestrator
        .process_message("What time is it?", TurnOptions::default())
        .await;

    for request in backend.recorded_requests() {
        assert_eq!(request.functions.len(), 1);
        assert_eq!(request.functions[0].name, "get_current_time");
        assert_eq!(request.function_call_mode, "auto");
    }
}

#[tokio::test]
async fn malformed_arguments_degrade_to_a_function_error_message() {
    let backend = Arc::new(ScriptedBackend::new(vec![
        Ok(function_call_response("get_current_time", "{not json")),
        Ok(text_response("Sorry, something went wrong.")),
    ]));
    let orchestrator = orchestrator_with(backend.clone(), time_registry());

    let outcome = orchestrator
        .process_message("What time is it?", TurnOptions::default())
        .await;

    // The parse failure stays inside the loop; the turn still succeeds.
    assert!(outcome.success);
    assert_eq!(outcome.message, "Sorry, something went wrong.");

    let messages = orchestrator.messages().await;
    let function_message = messages
        .iter()
        .find(|m| m.role == Role::Function)
        .expect("function message should be recorded");
    assert!(function_message.content.starts_with("Error (validation_error):"));
    assert_eq!(backend.recorded_requests().len(), 2);
}

#[tokio::test]
async fn unknown_function_results_are_reported_to_the_model() {
    let backend = Arc::new(ScriptedBackend::new(vec![
        Ok(function_call_response("launch_rockets", "{}")),
        Ok(text_response("I cannot do that.")),
    ]));
    let orchestrator = orchestrator_with(backend, time_registry());

    let outcome = orchestrator
        .process_message("Launch the rockets", TurnOptions::default())
        .await;

    assert!(outcome.success);

    let messages = orchestrator.messages().await;
    let function_message = messages
        .iter()
        .find(|m| m.role == Role::Function)
        .expect("function message should be recorded");
    assert!(function_message.content.starts_with("Error (not_found):"));
}

#[tokio::test]
async fn round_cap_stops_an_adversarial_model() {
    let scripted: Vec<_> = (0..10)
        .map(|_| Ok(function_call_response("get_current_time", "{}")))
        .collect();
    let backend = Arc::new(ScriptedBackend::new(scripted));

    let client = RetryingClient::new(backend.clone(), ClientConfig::new("pm-4"))
        .expect("config should validate");
    let runtime = FunctionRuntime::new(Arc::new(time_registry()));
    let orchestrator = ChatOrchestrator::builder(client, runtime)
        .policy(ChatPolicy::default().with_max_function_rounds(3))
        .build();

    let outcome = orchestrator
        .process_message("What time is it?", TurnOptions::default())
        .await;

    assert!(!outcome.success);
    assert_eq!(
        outcome.error.expect("error should be present").kind,
        ChatErrorKind::TooManyFunctionCalls
    );

    // 1 initial + 3 in-loop completions; the cap prevents a fifth.
    assert_eq!(backend.recorded_requests().len(), 4);

    let messages = orchestrator.messages().await;
    let last = messages.last().expect("transcript should not be empty");
    assert_eq!(last.role, Role::Assistant);
    assert!(last.content.starts_with("Error:"));
}

#[tokio::test]
async fn empty_input_fails_without_touching_the_transcript() {
    let backend = Arc::new(ScriptedBackend::new(Vec::new()));
    let orchestrator = orchestrator_with(backend.clone(), time_registry());

    let outcome = orchestrator.process_message("   ", TurnOptions::default()).await;

    assert!(!outcome.success);
    assert_eq!(
        outcome.error.expect("error should be present").kind,
        ChatErrorKind::InvalidInput
    );
    assert_eq!(orchestrator.messages().await.len(), 1);
    assert!(backend.recorded_requests().is_empty());
}

#[tokio::test]
async fn terminal_completion_errors_leave_the_conversation_usable() {
    let backend = Arc::new(ScriptedBackend::new(vec![
        Err(CompletionError::auth("invalid key")),
        Ok(text_response("recovered")),
    ]));
    let orchestrator = orchestrator_with(backend, time_registry());

    let failed = orchestrator
        .process_message("hello?", TurnOptions::default())
        .await;
    assert!(!failed.success);
    assert_eq!(
        failed.error.expect("error should be present").kind,
        ChatErrorKind::Processing
    );

    // The failure is recorded as assistant context.
    let messages = orchestrator.messages().await;
    assert!(messages.last().expect("transcript should not be empty").content.starts_with("Error:"));

    // The next turn proceeds normally on the same transcript.
    let recovered = orchestrator
        .process_message("still there?", TurnOptions::default())
        .await;
    assert!(recovered.success);
    assert_eq!(recovered.message, "recovered");
}

#[tokio::test]
async fn single_turn_requests_omit_prior_history() {
    let backend = Arc::new(ScriptedBackend::new(vec![
        Ok(text_response("first")),
        Ok(text_response("second")),
    ]));
    let orchestrator = orchestrator_with(backend.clone(), time_registry());

    let _ = orchestrator
        .process_message("first question", TurnOptions::default())
        .await;
    let _ = orchestrator
        .process_message("second question", TurnOptions::default().single_turn())
        .await;

    let requests = backend.recorded_requests();
    assert_eq!(requests.len(), 2);

    let single = &requests[1].messages;
    assert_eq!(single.len(), 2);
    assert_eq!(single[0].role, WireRole::System);
    assert_eq!(single[1].content, "second question");
}

#[tokio::test]
async fn count_trimming_keeps_the_original_system_message() {
    let backend = Arc::new(ScriptedBackend::new(Vec::new()));
    let orchestrator = orchestrator_with(backend, FunctionRegistry::new());

    for index in 0..25 {
        orchestrator
            .add_message(Role::User, &format!("question {index}"))
            .await
            .expect("append should succeed");
        orchestrator
            .add_message(Role::Assistant, &format!("answer {index}"))
            .await
            .expect("append should succeed");
    }

    orchestrator
        .add_message(Role::User, "one more")
        .await
        .expect("append should succeed");

    let messages = orchestrator.messages().await;
    assert_eq!(messages.len(), 20);
    assert_eq!(messages[0].role, Role::System);
    assert_eq!(messages[0].content, "You are a helpful assistant.");
    assert_eq!(messages.last().expect("transcript should not be empty").content, "one more");
}

#[tokio::test]
async fn concurrent_turns_serialize_on_one_conversation() {
    let backend = Arc::new(ScriptedBackend::new(vec![
        Ok(text_response("first answer")),
        Ok(text_response("second answer")),
    ]));
    let orchestrator = Arc::new(orchestrator_with(backend, time_registry()));

    let first = {
        let orchestrator = Arc::clone(&orchestrator);
        tokio::spawn(async move {
            orchestrator
                .process_message("first question", TurnOptions::default())
                .await
        })
    };
    let second = {
        let orchestrator = Arc::clone(&orchestrator);
        tokio::spawn(async move {
            orchestrator
                .process_message("second question", TurnOptions::default())
                .await
        })
    };

    assert!(first.await.expect("task should finish").success);
    assert!(second.await.expect("task should finish").success);

    // Whole turns never interleave: each user message is directly followed
    // by its assistant reply.
    let messages = orchestrator.messages().await;
    assert_eq!(messages.len(), 5);
    assert_eq!(messages[1].role, Role::User);
    assert_eq!(messages[2].role, Role::Assistant);
    assert_eq!(messages[3].role, Role::User);
    assert_eq!(messages[4].role, Role::Assistant);
}

#[tokio::test]
async fn token_budget_trims_the_request_but_not_the_transcript() {
    let backend = Arc::new(ScriptedBackend::new(vec![
        Ok(text_response("first")),
        Ok(text_response("second")),
    ]));
    let orchestrator = orchestrator_with(backend.clone(), time_registry());

    let _ = orchestrator
        .process_message("a much longer opening question about the weather", TurnOptions::default())
        .await;
    let _ = orchestrator
        .process_message(
            "short follow-up",
            TurnOptions::default().with_token_budget(40),
        )
        .await;

    let requests = backend.recorded_requests();
    let budgeted = &requests[1].messages;

    // System message survives; older history is squeezed out first.
    assert_eq!(budgeted[0].role, WireRole::System);
    assert!(budgeted.len() < 4);
    assert_eq!(
        budgeted.last().expect("request should not be empty").content,
        "short follow-up"
    );

    // The stored transcript itself is untouched by request budgeting.
    assert_eq!(orchestrator.messages().await.len(), 5);
}

#[tokio::test]
async fn stats_and_export_reflect_the_transcript() {
    let backend = Arc::new(ScriptedBackend::new(vec![Ok(text_response("hello"))]));
    let orchestrator = orchestrator_with(backend, time_registry());

    let _ = orchestrator.process_message("hi", TurnOptions::default()).await;

    let stats = orchestrator.stats().await;
    assert_eq!(stats.user_messages, 1);
    assert_eq!(stats.assistant_messages, 1);
    assert_eq!(stats.system_messages, 1);
    assert!(stats.estimated_tokens > 0);

    let export = orchestrator.export(false).await;
    assert_eq!(export.messages.len(), 2);
    assert_eq!(export.model_config.model, "pm-4");

    orchestrator.clear_history().await;
    assert_eq!(orchestrator.messages().await.len(), 1);
}
