//! HTTP-клиент сервиса прогнозов.
//!
//! Один запрос на вызов: без повторов, без таймаута, без отмены.

use std::future::Future;

use serde::de::DeserializeOwned;

use crate::{
    error::{Result, RiskError},
    model::{BatchResult, BorrowerRecord, PredictionResult},
};

pub const PREDICT_PATH: &str = "/predict";
pub const PREDICT_BATCH_PATH: &str = "/predict_batch";
pub const HEALTH_PATH: &str = "/health";
pub const MODEL_INFO_PATH: &str = "/model_info";

/// Сырой ответ: статус и тело как текст.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Транспортный слой. Ошибка соединения возвращается как `RiskError::Network`.
pub trait Transport {
    fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> impl Future<Output = Result<HttpReply>> + Send;

    fn get(&self, path: &str) -> impl Future<Output = Result<HttpReply>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    async fn finish(resp: reqwest::Response) -> Result<HttpReply> {
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| RiskError::Network(e.to_string()))?;
        tracing::debug!(status, bytes = body.len(), "response received");
        Ok(HttpReply { status, body })
    }
}

impl Transport for HttpTransport {
    async fn post_json(&self, path: &str, body: &serde_json::Value) -> Result<HttpReply> {
        let url = self.url(path);
        tracing::info!(%url, "POST");
        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| RiskError::Network(e.to_string()))?;
        Self::finish(resp).await
    }

    async fn get(&self, path: &str) -> Result<HttpReply> {
        let url = self.url(path);
        tracing::info!(%url, "GET");
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RiskError::Network(e.to_string()))?;
        Self::finish(resp).await
    }
}

pub fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Сообщение для пользователя: `message`, затем строковый `detail`, иначе код статуса.
pub fn server_error(status: u16, body: &str) -> RiskError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            ["message", "detail"]
                .iter()
                .find_map(|k| v.get(*k).and_then(|m| m.as_str()).map(str::to_string))
        })
        .unwrap_or_else(|| format!("Server error: {status}"));
    RiskError::Server { status, message }
}

fn decode_reply<T: DeserializeOwned>(reply: HttpReply) -> Result<T> {
    if !reply.is_success() {
        let err = server_error(reply.status, &reply.body);
        tracing::warn!(status = reply.status, error = %err, "prediction service returned an error");
        return Err(err);
    }
    serde_json::from_str(&reply.body).map_err(|e| RiskError::Decode(e.to_string()))
}

fn ensure_complete(record: &BorrowerRecord) -> Result<()> {
    let missing = record.missing_fields();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(RiskError::MissingColumns(missing))
    }
}

#[derive(Debug, Clone)]
pub struct PredictionClient<T> {
    transport: T,
}

impl PredictionClient<HttpTransport> {
    pub fn http(base_url: impl Into<String>) -> Self {
        Self::new(HttpTransport::new(base_url))
    }
}

impl<T: Transport> PredictionClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn predict_one(&self, record: &BorrowerRecord) -> Result<PredictionResult> {
        ensure_complete(record)?;
        let body = serde_json::to_value(record.required_only())?;
        let reply = self.transport.post_json(PREDICT_PATH, &body).await?;
        let result: PredictionResult = decode_reply(reply)?;
        tracing::info!(probability = result.default_probability, "single prediction completed");
        Ok(result)
    }

    /// Пустой вход отклоняется до сети.
    pub async fn predict_batch(&self, records: &[BorrowerRecord]) -> Result<BatchResult> {
        if records.is_empty() {
            return Err(RiskError::NoData);
        }
        for rec in records {
            ensure_complete(rec)?;
        }

        let projected: Vec<BorrowerRecord> = records.iter().map(BorrowerRecord::required_only).collect();
        let body = serde_json::to_value(projected)?;
        let reply = self.transport.post_json(PREDICT_BATCH_PATH, &body).await?;
        let batch: BatchResult = decode_reply(reply)?;
        if batch.len() != records.len() {
            tracing::warn!(sent = records.len(), received = batch.len(), "batch size mismatch");
            return Err(RiskError::Decode(format!(
                "expected {} predictions, got {}",
                records.len(),
                batch.len()
            )));
        }
        tracing::info!(predictions = batch.len(), "batch prediction completed");
        Ok(batch)
    }

    pub async fn health(&self) -> Result<serde_json::Value> {
        decode_reply(self.transport.get(HEALTH_PATH).await?)
    }

    pub async fn model_info(&self) -> Result<serde_json::Value> {
        decode_reply(self.transport.get(MODEL_INFO_PATH).await?)
    }
}
