//! HTTP guarantee gateway.

use crate::config::GuaranteeApiConfig;
use crate::error::{Result, RoomsError};
use crate::providers::GuaranteeGateway;
use crate::types::PaymentGuarantee;
use futures::future::BoxFuture;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use std::time::Duration;

/// Guarantee gateway backed by the payment system's balances API.
///
/// - `GET {base}/balances/guarantees/{id}` fetches a guarantee
/// - `POST {base}/balances/guarantees/{id}/claim` claims it
///
/// The id is always a single percent-encoded path segment.
#[derive(Clone)]
pub struct HttpGuaranteeGateway {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpGuaranteeGateway {
    /// Create a new gateway whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an upstream error if `base_url` is not an absolute URL that
    /// can carry a path, or if the HTTP client cannot be built.
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| RoomsError::upstream("parse guarantee API URL", e))?;
        if base_url.cannot_be_a_base() {
            return Err(RoomsError::upstream(
                "parse guarantee API URL",
                format!("{base_url} cannot carry a path"),
            ));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RoomsError::upstream("build guarantee API client", e))?;

        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    /// Create a gateway from application configuration.
    ///
    /// # Errors
    ///
    /// See [`HttpGuaranteeGateway::new`].
    pub fn from_config(config: &GuaranteeApiConfig) -> Result<Self> {
        Self::new(
            &config.base_url,
            config.token.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn guarantee_url(&self, guarantee_id: &str, action: Option<&str>) -> Result<Url> {
        // Dot segments would be resolved away by the server.
        if matches!(guarantee_id, "" | "." | "..") {
            return Err(RoomsError::not_found("guarantee", guarantee_id));
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                RoomsError::upstream("build guarantee URL", "base URL cannot carry a path")
            })?
            .pop_if_empty()
            .extend(["balances", "guarantees", guarantee_id])
            .extend(action);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

/// Map a non-success status to the error taxonomy.
async fn status_error(context: &str, guarantee_id: &str, response: reqwest::Response) -> RoomsError {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return RoomsError::not_found("guarantee", guarantee_id);
    }
    let body = response.text().await.unwrap_or_default();
    RoomsError::upstream(context, format!("HTTP {}: {body}", status.as_u16()))
}

impl GuaranteeGateway for HttpGuaranteeGateway {
    fn fetch<'a>(&'a self, guarantee_id: &'a str) -> BoxFuture<'a, Result<PaymentGuarantee>> {
        Box::pin(async move {
            let url = self.guarantee_url(guarantee_id, None)?;
            let response = self
                .authorize(self.client.get(url))
                .send()
                .await
                .map_err(|e| RoomsError::upstream("fetch guarantee", e))?;

            if !response.status().is_success() {
                return Err(status_error("fetch guarantee", guarantee_id, response).await);
            }

            let mut guarantee = response
                .json::<PaymentGuarantee>()
                .await
                .map_err(|e| RoomsError::upstream("decode guarantee", e))?;
            if guarantee.guarantee_id.is_empty() {
                guarantee.guarantee_id = guarantee_id.to_string();
            }
            Ok(guarantee)
        })
    }

    fn claim<'a>(&'a self, guarantee_id: &'a str) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let url = self.guarantee_url(guarantee_id, Some("claim"))?;
            let response = self
                .authorize(self.client.post(url))
                .send()
                .await
                .map_err(|e| RoomsError::upstream("claim guarantee", e))?;

            if !response.status().is_success() {
                return Err(status_error("claim guarantee", guarantee_id, response).await);
            }
            Ok(())
        })
    }
}
