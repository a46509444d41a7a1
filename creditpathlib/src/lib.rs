//! creditpathlib — клиент сервиса прогноза дефолта по кредиту: разбор CSV,
//! маппинг полей, HTTP-вызовы, подготовка результатов к показу.

pub mod client;
pub mod config;
pub mod error;
pub mod fields;
pub mod model;
pub mod render;
pub mod session;
pub mod traits;

pub mod formats {
    pub mod csv;
    pub mod json;
}
