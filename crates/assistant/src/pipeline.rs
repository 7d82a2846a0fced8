//! Query pipeline: route, answer, record.

use crate::dispatcher::Dispatcher;
use crate::error::AppResult;
use crate::router::{Route, Router};
use async_trait::async_trait;
use conversation_store::{ConversationTurn, Transcript};
use llm_client::{ChatBackend, ChatResponseWithTools, CompletionRequest, LlmError};
use tokio::sync::Mutex;
use tracing::{error, info, instrument};

/// Routes each query, answers it and appends exactly one turn to the
/// transcript. Queries are processed one at a time.
pub struct Agent {
    router: Router,
    dispatcher: Dispatcher,
    transcript: Transcript,
    in_flight: Mutex<()>,
}

impl Agent {
    pub fn new(router: Router, dispatcher: Dispatcher, transcript: Transcript) -> Self {
        Self {
            router,
            dispatcher,
            transcript,
            in_flight: Mutex::new(()),
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Process one query. Never fails: errors become a turn routed to
    /// `"error"` carrying the message.
    #[instrument(skip(self, query))]
    pub async fn process_query(&self, query: &str) -> ConversationTurn {
        let _guard = self.in_flight.lock().await;

        let turn = match self.answer(query).await {
            Ok((route, response)) => ConversationTurn::answered(query, route.as_str(), response),
            Err(e) => {
                error!(error = %e, "Query failed");
                ConversationTurn::failed(query, e.to_string())
            }
        };

        let index = self.transcript.append(turn.clone()).await;
        info!(index, route = %turn.route, "Query processed");
        turn
    }

    async fn answer(&self, query: &str) -> AppResult<(Route, String)> {
        let route = self.router.route(query).await?;
        let response = match &route {
            Route::Tool(key) => self.dispatcher.answer_with_tool(query, key).await?,
            Route::None | Route::Error => self.dispatcher.answer_general(query).await?,
        };
        Ok((route, response))
    }
}

/// Stands in for the chat client when no API key is configured, so that
/// each query records the missing key instead of the process refusing to
/// start.
pub struct UnconfiguredBackend;

#[async_trait]
impl ChatBackend for UnconfiguredBackend {
    async fn complete(
        &self,
        _request: CompletionRequest,
    ) -> Result<ChatResponseWithTools, LlmError> {
        Err(LlmError::MissingApiKey)
    }
}
