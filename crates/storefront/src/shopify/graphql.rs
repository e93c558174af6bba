//! GraphQL transport shared by the Storefront and Admin API clients.
//!
//! Operations are declared with [`graphql_operation!`], which implements
//! [`graphql_client::GraphQLQuery`] for a marker struct over a static query
//! document and hand-written `Variables` / `ResponseData` types. Execution
//! goes through [`GraphQLTransport::execute`], which maps HTTP status, rate
//! limiting and GraphQL `errors` into [`ShopifyError`].

use std::time::Duration;

use graphql_client::{GraphQLQuery, PathFragment, Response};
use secrecy::{ExposeSecret, SecretString};

use super::{GraphQLError, GraphQLErrorLocation, ShopifyError};

/// Declare a GraphQL operation over a static document.
///
/// The operation name sent to Shopify is the marker struct's name, so it
/// must match the `query`/`mutation` name inside the document.
macro_rules! graphql_operation {
    ($(#[$meta:meta])* $name:ident, $module:ident, $document:expr) => {
        $(#[$meta])*
        pub struct $name;

        impl graphql_client::GraphQLQuery for $name {
            type Variables = $module::Variables;
            type ResponseData = $module::ResponseData;

            fn build_query(
                variables: Self::Variables,
            ) -> graphql_client::QueryBody<Self::Variables> {
                graphql_client::QueryBody {
                    variables,
                    query: $document,
                    operation_name: stringify!($name),
                }
            }
        }
    };
}

pub(crate) use graphql_operation;

/// Maximum number of response body characters written to logs.
const LOG_BODY_LIMIT: usize = 500;

/// HTTP client bound to one GraphQL endpoint and access token.
#[derive(Clone)]
pub struct GraphQLTransport {
    client: reqwest::Client,
    endpoint: String,
    auth_header: &'static str,
    access_token: SecretString,
}

impl GraphQLTransport {
    /// Build a transport with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(
        endpoint: String,
        auth_header: &'static str,
        access_token: SecretString,
        timeout: Duration,
    ) -> Result<Self, ShopifyError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("orchard-storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            auth_header,
            access_token,
        })
    }

    /// The endpoint this transport posts to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Execute a GraphQL operation.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::RateLimited`] on HTTP 429, a
    /// [`ShopifyError::GraphQL`] for non-success statuses and GraphQL-level
    /// errors, and [`ShopifyError::Parse`] if the body is not a GraphQL
    /// response for `Q`.
    pub async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, ShopifyError> {
        let request_body = Q::build_query(variables);

        let response = self
            .client
            .post(&self.endpoint)
            .header(self.auth_header, self.access_token.expose_secret())
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ShopifyError::RateLimited(retry_after));
        }

        // Read as text first so parse failures can be logged with the body
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                operation = request_body.operation_name,
                body = %truncate(&response_text, LOG_BODY_LIMIT),
                "Shopify API returned non-success status"
            );
            return Err(ShopifyError::GraphQL(vec![GraphQLError::message(format!(
                "HTTP {status}: {}",
                truncate(&response_text, 200)
            ))]));
        }

        let response: Response<Q::ResponseData> = match serde_json::from_str(&response_text) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    operation = request_body.operation_name,
                    body = %truncate(&response_text, LOG_BODY_LIMIT),
                    "Failed to parse Shopify GraphQL response"
                );
                return Err(ShopifyError::Parse(e));
            }
        };

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            tracing::debug!(errors = ?errors, "GraphQL errors in response");
            return Err(ShopifyError::GraphQL(
                errors.into_iter().map(convert_error).collect(),
            ));
        }

        response.data.ok_or_else(|| {
            tracing::error!(
                operation = request_body.operation_name,
                body = %truncate(&response_text, LOG_BODY_LIMIT),
                "Shopify GraphQL response has no data and no errors"
            );
            ShopifyError::GraphQL(vec![GraphQLError::message("No data in response")])
        })
    }
}

fn convert_error(error: graphql_client::Error) -> GraphQLError {
    GraphQLError {
        message: error.message,
        locations: error.locations.map_or_else(Vec::new, |locations| {
            locations
                .into_iter()
                .map(|l| GraphQLErrorLocation {
                    line: i64::from(l.line),
                    column: i64::from(l.column),
                })
                .collect()
        }),
        path: error.path.map_or_else(Vec::new, |path| {
            path.into_iter()
                .map(|fragment| match fragment {
                    PathFragment::Key(s) => serde_json::Value::String(s),
                    PathFragment::Index(i) => serde_json::Value::Number(i.into()),
                })
                .collect()
        }),
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
