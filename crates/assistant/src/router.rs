//! First model call: pick one tool for a query, or none.

use llm_client::{ChatBackend, CompletionRequest, LlmError, Message};
use regex::Regex;
use std::fmt;
use std::sync::{Arc, LazyLock};
use tools::ToolRegistry;
use tracing::{debug, info, instrument};

const ROUTER_SYSTEM_PROMPT: &str =
    "You are a routing assistant. Determine the appropriate tool based on the user query.";

const ROUTER_MAX_TOKENS: u32 = 20;

static TOOL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)TOOL:\s*(\w+)").expect("route pattern is valid"));

/// Routing decision for one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Registered route key, as the registry spells it.
    Tool(String),
    None,
    /// Processing failed before an answer was produced.
    Error,
}

impl Route {
    /// Label recorded on the conversation turn.
    pub fn as_str(&self) -> &str {
        match self {
            Route::Tool(route) => route.as_str(),
            Route::None => conversation_store::NO_ROUTE,
            Route::Error => conversation_store::ERROR_ROUTE,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct Router {
    backend: Arc<dyn ChatBackend>,
    registry: Arc<ToolRegistry>,
    model: String,
}

impl Router {
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        registry: Arc<ToolRegistry>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            registry,
            model: model.into(),
        }
    }

    /// Ask the routing model which tool, if any, answers `query`.
    ///
    /// Only a transport failure is an error; anything the model says that
    /// does not name a registered route means [`Route::None`].
    #[instrument(skip(self, query), fields(model = %self.model))]
    pub async fn route(&self, query: &str) -> Result<Route, LlmError> {
        let request = CompletionRequest::new(vec![
            Message::system(ROUTER_SYSTEM_PROMPT),
            Message::user(routing_prompt(&self.registry, query)),
        ])
        .model(&self.model)
        .max_tokens(ROUTER_MAX_TOKENS);

        let response = self.backend.complete(request).await?;
        let reply = response.content.unwrap_or_default();
        debug!(reply = %reply.trim(), "Routing reply");

        let route = parse_route(&reply, &self.registry);
        info!(route = %route, "Query routed");
        Ok(route)
    }
}

/// Prompt listing every enabled tool as `ROUTE - description`.
pub fn routing_prompt(registry: &ToolRegistry, query: &str) -> String {
    let tools_list = registry
        .enabled_tools()
        .map(|tool| {
            format!(
                "{} - {}",
                tool.route().to_uppercase(),
                tool.definition().function.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Given the following user query, determine which tool is needed to answer it.\n\
         Available tools:\n\
         {tools_list}\n\n\
         If no tools are needed, respond with 'NO TOOL'.\n\n\
         User query: {query}\n\n\
         Response format: TOOL: [TOOLNAME]"
    )
}

/// Map a routing reply onto a registered route.
pub fn parse_route(reply: &str, registry: &ToolRegistry) -> Route {
    TOOL_PATTERN
        .captures(reply)
        .and_then(|caps| caps.get(1))
        .and_then(|name| registry.get_by_route(name.as_str()))
        .map(|tool| Route::Tool(tool.route().to_string()))
        .unwrap_or(Route::None)
}
