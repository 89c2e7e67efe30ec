//! The single outbound HTTP call, behind a trait so the forecast client can be
//! exercised without a network.

use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use reqwest::Client;

use crate::error::ForecastError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub user_agent: String,
    /// Bounds both connecting and the whole round trip.
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

#[async_trait]
pub trait HttpTransport: Send + Sync + Debug {
    async fn get(&self, request: &HttpRequest) -> Result<HttpResponse, ForecastError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReqwestTransport;

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, request: &HttpRequest) -> Result<HttpResponse, ForecastError> {
        // connect_timeout only exists on the builder, so each call gets a
        // client carrying the caller's deadline.
        let http = Client::builder()
            .connect_timeout(request.timeout)
            .timeout(request.timeout)
            .user_agent(request.user_agent.as_str())
            .build()
            .map_err(ForecastError::transport)?;

        let res = http
            .get(&request.url)
            .query(&request.query)
            .send()
            .await
            .map_err(ForecastError::transport)?;

        let status = res.status().as_u16();
        let body = res.text().await.map_err(ForecastError::transport)?;

        Ok(HttpResponse { status, body })
    }
}
