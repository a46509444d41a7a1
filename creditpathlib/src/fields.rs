//! Маппинг сырых строковых пар (форма, CSV) в `BorrowerRecord`.

use crate::{
    error::{Result, RiskError},
    model::{BorrowerRecord, FieldValue},
};

/// Десять полей, без которых сервис не принимает заёмщика.
pub const REQUIRED_FIELDS: [&str; 10] = [
    "person_age",
    "person_income",
    "person_emp_exp",
    "person_home_ownership",
    "loan_amnt",
    "loan_int_rate",
    "loan_intent",
    "credit_score",
    "cb_person_cred_hist_length",
    "previous_loan_defaults_on_file",
];

pub const NUMERIC_FIELDS: [&str; 7] = [
    "person_age",
    "person_income",
    "person_emp_exp",
    "loan_amnt",
    "loan_int_rate",
    "credit_score",
    "cb_person_cred_hist_length",
];

/// Короткие имена полей одиночной формы -> канонические имена.
pub const FORM_ALIASES: &[(&str, &str)] = &[
    ("age", "person_age"),
    ("income", "person_income"),
    ("emp_exp", "person_emp_exp"),
    ("experience", "person_emp_exp"),
    ("home_ownership", "person_home_ownership"),
    ("loan_amount", "loan_amnt"),
    ("interest_rate", "loan_int_rate"),
    ("loan_purpose", "loan_intent"),
    ("purpose", "loan_intent"),
    ("credit_history", "cb_person_cred_hist_length"),
    ("credit_history_length", "cb_person_cred_hist_length"),
    ("previous_defaults", "previous_loan_defaults_on_file"),
];

/// Неизвестные имена возвращаются как есть.
pub fn canonical_name(name: &str) -> &str {
    FORM_ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(name)
}

pub fn map_fields<'a, I>(pairs: I, numeric: &[&str]) -> Result<BorrowerRecord>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    map_pairs(None, pairs, numeric)
}

/// То же, что `map_fields`, но ошибка помечается номером строки данных (с 1).
pub fn map_row<'a, I>(row: usize, pairs: I, numeric: &[&str]) -> Result<BorrowerRecord>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    map_pairs(Some(row), pairs, numeric)
}

fn map_pairs<'a, I>(row: Option<usize>, pairs: I, numeric: &[&str]) -> Result<BorrowerRecord>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut rec = BorrowerRecord::new();
    for (name, raw) in pairs {
        let raw = raw.trim();
        let value = if numeric.contains(&name) {
            FieldValue::Number(parse_number(row, name, raw)?)
        } else {
            FieldValue::Text(raw.to_string())
        };
        rec.insert(name, value);
    }
    Ok(rec)
}

fn parse_number(row: Option<usize>, column: &str, raw: &str) -> Result<f64> {
    match raw.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(RiskError::InvalidNumber {
            row,
            column: column.to_string(),
            value: raw.to_string(),
        }),
    }
}

/// Поля одиночной формы: алиасы, числовое приведение, ровно десять известных полей.
pub fn map_form_fields<'a, I>(pairs: I) -> Result<BorrowerRecord>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut canonical = Vec::new();
    for (name, value) in pairs {
        let name = canonical_name(name.trim());
        if !REQUIRED_FIELDS.contains(&name) {
            return Err(RiskError::InvalidInput(format!("Unknown borrower field: '{name}'")));
        }
        canonical.push((name, value));
    }
    let rec = map_fields(canonical, &NUMERIC_FIELDS)?;

    let missing = rec.missing_fields();
    if !missing.is_empty() {
        return Err(RiskError::MissingColumns(missing));
    }
    Ok(rec)
}
