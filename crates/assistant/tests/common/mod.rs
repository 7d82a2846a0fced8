//! Common test utilities for integration tests.

use assistant::{Agent, Dispatcher, Router};
use conversation_store::Transcript;
use llm_client::LlmClient;
use std::sync::Arc;
use std::time::Duration;
use tools::{ToolExecutor, Toolset};
use wiremock::MockServer;

pub const ROUTING_MODEL: &str = "routing-model";
pub const TOOL_MODEL: &str = "tool-model";
pub const GENERAL_MODEL: &str = "general-model";

/// Start a mock chat completion server.
pub async fn mock_llm_server() -> MockServer {
    MockServer::start().await
}

/// Create a chat client configured for a mock server.
pub fn test_llm_client(mock_server: &MockServer) -> LlmClient {
    LlmClient::new(
        "test-api-key",
        mock_server.uri(),
        ROUTING_MODEL,
        Duration::from_secs(5),
    )
    .unwrap()
}

/// Agent over the basic toolset talking to `mock_server`.
pub fn test_agent(mock_server: &MockServer) -> Agent {
    let client = Arc::new(test_llm_client(mock_server));
    let registry = Arc::new(Toolset::Basic.registry());
    let executor = Arc::new(ToolExecutor::new(registry.clone()));

    Agent::new(
        Router::new(client.clone(), registry, ROUTING_MODEL),
        Dispatcher::new(client, executor, TOOL_MODEL, GENERAL_MODEL),
        Transcript::new(),
    )
}

/// Chat completion body carrying plain text.
pub fn text_completion(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "created": 1677652288,
        "model": "test-model",
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": content
            },
            "finish_reason": "stop"
        }]
    })
}

/// Chat completion body requesting one tool call.
pub fn tool_call_completion(id: &str, name: &str, arguments: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-456",
        "object": "chat.completion",
        "created": 1677652288,
        "model": "test-model",
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": id,
                    "type": "function",
                    "function": { "name": name, "arguments": arguments }
                }]
            },
            "finish_reason": "tool_calls"
        }]
    })
}
