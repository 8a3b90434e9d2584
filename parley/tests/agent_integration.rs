use std::sync::Arc;

use parley::prelude::*;
use serde_json::json;

fn text_response(content: &str) -> CompletionResponse {
    CompletionResponse {
        choices: vec![pcompletion::Choice {
            message: pcompletion::ChoiceMessage {
                content: Some(content.to_string()),
                function_call: None,
            },
            finish_reason: "stop".to_string(),
        }],
        usage: Usage {
            total_tokens: 18,
            prompt_tokens: 14,
            completion_tokens: 4,
        },
        model: "pm-4".to_string(),
    }
}

fn function_call_response(name: &str, arguments: &str) -> CompletionResponse {
    CompletionResponse {
        choices: vec![pcompletion::Choice {
            message: pcompletion::ChoiceMessage {
                content: None,
                function_call: Some(FunctionCallRequest {
                    name: name.to_string(),
                    arguments: arguments.to_string(),
                }),
            },
            finish_reason: "function_call".to_string(),
        }],
        usage: Usage {
            total_tokens: 9,
            prompt_tokens: 8,
            completion_tokens: 1,
        },
        model: "pm-4".to_string(),
    }
}

/// Ordinary value-returning functions, registered the same way any
/// user-supplied function would be.
fn demo_registry() -> FunctionRegistry {
    let mut registry = FunctionRegistry::new();

    registry
        .register_sync(
            FunctionSchema::new("get_current_time", "Returns the current time in a zone")
                .property("zone", PropertySchema::string()),
            |_args| Ok(json!("12:00")),
        )
        .expect("time registration should succeed");

    registry
        .register_sync(
            FunctionSchema::new("add", "Adds two numbers")
                .property("a", PropertySchema::number())
                .property("b", PropertySchema::number())
                .required(["a", "b"]),
            |args| {
                let a = args.get("a").and_then(|v| v.as_f64()).unwrap_or(0.0);
                let b = args.get("b").and_then(|v| v.as_f64()).unwrap_or(0.0);
                Ok(json!(a + b))
            },
        )
        .expect("math registration should succeed");

    registry
}

#[tokio::test]
async fn agent_runs_two_function_rounds_then_answers() {
    let backend = Arc::new(ScriptedBackend::new(vec![
        Ok(function_call_response("get_current_time", "{\"zone\":\"UTC\"}")),
        Ok(function_call_response("add", "{\"a\":2,\"b\":3}")),
        Ok(text_response("It is noon, and 2 + 3 = 5.")),
    ]));

    let agent = AgentBuilder::new(backend.clone(), ClientConfig::new("pm-4"))
        .registry(demo_registry())
        .system_prompt("You are a helpful assistant.")
        .build()
        .expect("agent should build");

    let outcome = agent
        .process_message("What time is it, and what is 2+3?", TurnOptions::default())
        .await;

    assert!(outcome.success);
    assert_eq!(outcome.message, "It is noon, and 2 + 3 = 5.");
    assert_eq!(outcome.finish_reason, Some(FinishReason::Stop));

    let messages = agent.messages().await;
    let function_results: Vec<&Message> = messages
        .iter()
        .filter(|m| m.role == Role::Function)
        .collect();

    assert_eq!(function_results.len(), 2);
    assert_eq!(function_results[0].name.as_deref(), Some("get_current_time"));
    assert_eq!(function_results[0].content, "12:00");
    assert_eq!(function_results[1].name.as_deref(), Some("add"));
    assert_eq!(function_results[1].content, "5.0");

    // Both functions stay advertised across all three requests.
    for request in backend.recorded_requests() {
        let names: Vec<&str> = request.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["get_current_time", "add"]);
    }
}

#[tokio::test]
async fn transient_failures_inside_a_turn_are_retried_away() {
    let backend = Arc::new(ScriptedBackend::new(vec![
        Err(CompletionError::server("hiccup")),
        Ok(function_call_response("get_current_time", "{}")),
        Err(CompletionError::rate_limit("busy")),
        Ok(text_response("It is noon.")),
    ]));

    let agent = AgentBuilder::new(backend.clone(), ClientConfig::new("pm-4"))
        .registry(demo_registry())
        .retry_policy(RetryPolicy {
            max_retries: 3,
            base_delay: std::time::Duration::from_millis(1),
            max_jitter: std::time::Duration::from_millis(1),
        })
        .build()
        .expect("agent should build");

    let outcome = agent
        .process_message("What time is it?", TurnOptions::default())
        .await;

    assert!(outcome.success);
    assert_eq!(outcome.message, "It is noon.");
    assert_eq!(backend.recorded_requests().len(), 4);
}

#[tokio::test]
async fn validation_failures_reach_the_model_as_context() {
    let backend = Arc::new(ScriptedBackend::new(vec![
        Ok(function_call_response("add", "{\"a\":2}")),
        Ok(text_response("I need both numbers.")),
    ]));

    let agent = AgentBuilder::new(backend, ClientConfig::new("pm-4"))
        .registry(demo_registry())
        .build()
        .expect("agent should build");

    let outcome = agent.process_message("Add 2 and...", TurnOptions::default()).await;

    assert!(outcome.success);

    let messages = agent.messages().await;
    let failure = messages
        .iter()
        .find(|m| m.role == Role::Function)
        .expect("function message should be recorded");
    assert!(failure.content.starts_with("Error (validation_error):"));
    assert!(failure.content.contains("b"));
}

#[tokio::test]
async fn export_round_trips_through_json() {
    let backend = Arc::new(ScriptedBackend::new(vec![Ok(text_response("hello"))]));
    let agent = AgentBuilder::new(backend, ClientConfig::new("pm-4"))
        .conversation_id("conv-42")
        .build()
        .expect("agent should build");

    let _ = agent.process_message("hi", TurnOptions::default()).await;

    let export = agent.export(true).await;
    let serialized = serde_json::to_string(&export).expect("export should serialize");
    let parsed: ConversationExport =
        serde_json::from_str(&serialized).expect("export should deserialize");

    assert_eq!(parsed.conversation_id, "conv-42");
    assert_eq!(parsed.messages.len(), export.messages.len());
    assert_eq!(parsed.model_config.model, "pm-4");
    assert_eq!(parsed.stats.user_messages, 1);
}
