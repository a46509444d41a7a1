//! Единый тип ошибок публичного API.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RiskError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    /// Нет файла, неверное расширение и прочее, что отсекается до разбора.
    #[error("{0}")]
    InvalidInput(String),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Invalid numeric input{} in column '{column}': '{value}'", row_suffix(.row))]
    InvalidNumber {
        row: Option<usize>,
        column: String,
        value: String,
    },

    #[error("No data to submit")]
    NoData,

    #[error("A submission is already in progress")]
    Busy,

    #[error("Network error: {0}")]
    Network(String),

    /// Ответ не 2xx; `message` показывается пользователю как есть.
    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    Decode(String),
}

fn row_suffix(row: &Option<usize>) -> String {
    match row {
        Some(r) => format!(" at row {r}"),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, RiskError>;
