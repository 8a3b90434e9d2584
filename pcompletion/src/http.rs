//! Reqwest-based HTTP backend for the completion endpoint contract.

use reqwest::{Client, Response};

use crate::{
    CompletionBackend, CompletionError, CompletionFuture, CompletionRequest, CompletionResponse,
    classify_status,
};

#[derive(Debug, Clone)]
pub struct HttpCompletionBackend {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpCompletionBackend {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/completions", self.base_url.trim_end_matches('/'))
    }

    async fn parse_error(response: Response) -> CompletionError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = extract_error_message(&body)
            .unwrap_or_else(|| format!("completion request failed with status {status}"));

        classify_status(status, message)
    }
}

impl CompletionBackend for HttpCompletionBackend {
    fn complete<'a>(
        &'a self,
        request: CompletionRequest,
    ) -> CompletionFuture<'a, Result<CompletionResponse, CompletionError>> {
        Box::pin(async move {
            let mut builder = self.client.post(self.endpoint()).json(&request);
            if let Some(api_key) = &self.api_key {
                builder = builder.bearer_auth(api_key);
            }

            let response = builder.send().await.map_err(|err| {
                if err.is_timeout() || err.is_connect() {
                    CompletionError::network(err.to_string())
                } else {
                    CompletionError::other(err.to_string())
                }
            })?;

            if !response.status().is_success() {
                return Err(Self::parse_error(response).await);
            }

            response
                .json::<CompletionResponse>()
                .await
                .map_err(|err| CompletionError::other(format!("malformed response body: {err}")))
        })
    }
}

fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .and_then(|error| error.get("message"))
        .and_then(|message| message.as_str())
        .map(ToString::to_string)
}
