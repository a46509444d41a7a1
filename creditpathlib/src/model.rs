//! Доменные модели: запись заёмщика на входе и ответы сервиса прогнозов.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::fields::REQUIRED_FIELDS;

/// Значение одного атрибута: число для числовых полей, строка для категорий.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Number(_) => None,
        }
    }
}

/// Один заёмщик. В JSON уходит плоским объектом `{"person_age": 30, ...}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BorrowerRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl BorrowerRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(FieldValue::as_number)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    /// Обязательные поля, которых нет в записи, в порядке `REQUIRED_FIELDS`.
    pub fn missing_fields(&self) -> Vec<String> {
        REQUIRED_FIELDS
            .iter()
            .filter(|f| !self.fields.contains_key(**f))
            .map(|f| f.to_string())
            .collect()
    }

    /// Только десять обязательных полей: ровно то, что уходит в запрос.
    pub fn required_only(&self) -> BorrowerRecord {
        let fields = self
            .fields
            .iter()
            .filter(|(k, _)| REQUIRED_FIELDS.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        BorrowerRecord { fields }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Категория риска. Сервер присылает ровно одну из трёх меток.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    #[serde(rename = "Low Risk")]
    Low,
    #[serde(rename = "Medium Risk")]
    Medium,
    #[serde(rename = "High Risk")]
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub action: String,
    pub priority: String,
    pub timeline: String,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub next_steps: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorrowerSummary {
    pub age: f64,
    pub annual_income: f64,
    pub loan_amount: f64,
    pub credit_score: f64,
    #[serde(default)]
    pub employment_experience: Option<f64>,
    #[serde(default)]
    pub credit_history_length: Option<f64>,
    #[serde(default)]
    pub loan_to_income_ratio: Option<f64>,
    #[serde(default)]
    pub home_ownership: Option<String>,
    #[serde(default)]
    pub loan_intent: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub default_probability: f64,
    #[serde(default)]
    pub risk_level: Option<RiskTier>,
    #[serde(default)]
    pub threshold_range: Option<String>,
    pub recommendation: Recommendation,
    pub borrower_summary: BorrowerSummary,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Ответ `/predict_batch`; порядок `predictions` совпадает с порядком входа.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub predictions: Vec<PredictionResult>,
    #[serde(default)]
    pub total_predictions: Option<usize>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl BatchResult {
    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }
}
