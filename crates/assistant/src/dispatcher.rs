//! Answer a query with the one tool the router picked, or with no tool.

use llm_client::{
    ChatBackend, CompletionRequest, FunctionDefinitionApi, LlmError, Message,
    ToolCall as ApiToolCall, ToolDefinition as ApiToolDefinition,
};
use std::sync::Arc;
use tools::{FunctionCall, ToolCall, ToolDefinition, ToolExecutor};
use tracing::{debug, info, instrument, warn};

const GENERAL_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

const TOOL_MAX_TOKENS: u32 = 4096;

pub struct Dispatcher {
    backend: Arc<dyn ChatBackend>,
    executor: Arc<ToolExecutor>,
    tool_model: String,
    general_model: String,
}

impl Dispatcher {
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        executor: Arc<ToolExecutor>,
        tool_model: impl Into<String>,
        general_model: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            executor,
            tool_model: tool_model.into(),
            general_model: general_model.into(),
        }
    }

    /// Answer `query` offering the model only the tool behind `route`.
    ///
    /// Tool calls naming any other function are ignored. When nothing is
    /// executed the model's direct text is the answer, and an empty direct
    /// text falls through to [`Dispatcher::answer_general`].
    #[instrument(skip(self, query), fields(model = %self.tool_model))]
    pub async fn answer_with_tool(&self, query: &str, route: &str) -> Result<String, LlmError> {
        let Some(tool) = self.executor.registry().get_by_route(route) else {
            warn!(route, "Route has no registered tool, answering without tools");
            return self.answer_general(query).await;
        };

        let mut messages = vec![
            Message::system(format!(
                "You are an AI assistant that can use the {} tool to help users.",
                route
            )),
            Message::user(query),
        ];

        let request = CompletionRequest::new(messages.clone())
            .model(&self.tool_model)
            .max_tokens(TOOL_MAX_TOKENS)
            .tools(vec![to_api_definition(tool.definition())]);
        let response = self.backend.complete(request).await?;

        let calls: Vec<ApiToolCall> = response
            .requested_calls()
            .unwrap_or_default()
            .iter()
            .filter(|call| call.function.name == tool.name())
            .cloned()
            .collect();

        if calls.is_empty() {
            if response.requested_calls().is_some() {
                warn!(tool = tool.name(), "Model called an unoffered tool, ignoring");
            }
            return match response.content.filter(|text| !text.trim().is_empty()) {
                Some(text) => Ok(text),
                None => {
                    debug!("Empty direct reply, answering without tools");
                    self.answer_general(query).await
                }
            };
        }

        messages.push(Message::assistant_with_tool_calls(
            response.content,
            calls.clone(),
        ));
        for call in &calls {
            let result = self.executor.execute(&to_tool_call(call)).await;
            messages.push(Message::tool_result(
                result.tool_call_id,
                &call.function.name,
                result.content,
            ));
        }
        info!(tool = tool.name(), calls = calls.len(), "Tool results collected");

        let request = CompletionRequest::new(messages).model(&self.tool_model);
        let answer = self.backend.complete(request).await?;
        answer
            .content
            .filter(|text| !text.trim().is_empty())
            .ok_or(LlmError::EmptyResponse)
    }

    /// Answer `query` with the general model and no tools.
    #[instrument(skip(self, query), fields(model = %self.general_model))]
    pub async fn answer_general(&self, query: &str) -> Result<String, LlmError> {
        let request = CompletionRequest::new(vec![
            Message::system(GENERAL_SYSTEM_PROMPT),
            Message::user(query),
        ])
        .model(&self.general_model);

        let response = self.backend.complete(request).await?;
        response
            .content
            .filter(|text| !text.trim().is_empty())
            .ok_or(LlmError::EmptyResponse)
    }
}

fn to_api_definition(definition: ToolDefinition) -> ApiToolDefinition {
    ApiToolDefinition {
        tool_type: definition.tool_type,
        function: FunctionDefinitionApi {
            name: definition.function.name,
            description: definition.function.description,
            parameters: definition.function.parameters,
        },
    }
}

fn to_tool_call(call: &ApiToolCall) -> ToolCall {
    ToolCall {
        id: call.id.clone(),
        call_type: call.call_type.clone(),
        function: FunctionCall {
            name: call.function.name.clone(),
            arguments: call.function.arguments.clone(),
        },
    }
}
