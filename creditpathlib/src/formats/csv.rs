//! CSV загрузки и выгрузки.
//!
//! Вход: строка заголовка с десятью обязательными колонками в любом порядке,
//! дальше строки данных. Поля режутся по позиции заголовка, кавычки по краям
//! снимаются. Выход: фиксированный заголовок из девяти колонок, числа без
//! кавычек, текст в двойных кавычках.

use crate::{
    error::{Result, RiskError},
    fields::{map_row, NUMERIC_FIELDS, REQUIRED_FIELDS},
    model::{BorrowerRecord, PredictionResult},
    render::{display_tier, percent},
};
use chrono::NaiveDateTime;
use csv::{QuoteStyle, ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use std::io::{BufRead, Write};

pub const EXPORT_HEADER: &str =
    "Index,Age,Income,Loan Amount,Credit Score,Default Probability,Risk Level,Recommended Action,Priority";

pub struct Csv;

impl Csv {
    pub fn decode(text: &str) -> Result<Vec<BorrowerRecord>> {
        if text.lines().filter(|l| !l.trim().is_empty()).count() < 2 {
            return Err(RiskError::MalformedInput(
                "CSV file must contain a header row and at least one data row".into(),
            ));
        }

        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());
        let mut rows = rdr.records();

        let header: Vec<String> = loop {
            match rows.next() {
                Some(rec) => {
                    let rec = rec?;
                    if !is_blank(&rec) {
                        break rec.iter().map(|h| clean(h).to_string()).collect();
                    }
                }
                None => return Err(RiskError::MalformedInput("CSV header row is missing".into())),
            }
        };

        let missing: Vec<String> = REQUIRED_FIELDS
            .iter()
            .filter(|f| !header.iter().any(|h| h == *f))
            .map(|f| f.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(RiskError::MissingColumns(missing));
        }

        let mut out = Vec::new();
        for rec in rows {
            let rec = rec?;
            if is_blank(&rec) {
                continue;
            }
            let pairs = header
                .iter()
                .enumerate()
                .filter(|(_, name)| REQUIRED_FIELDS.contains(&name.as_str()))
                .map(|(i, name)| (name.as_str(), clean(rec.get(i).unwrap_or(""))));
            out.push(map_row(out.len() + 1, pairs, &NUMERIC_FIELDS)?);
        }

        if out.is_empty() {
            return Err(RiskError::MalformedInput("CSV file contains no data rows".into()));
        }
        tracing::debug!(rows = out.len(), "decoded borrower CSV");
        Ok(out)
    }

    pub fn encode(results: &[PredictionResult]) -> Result<String> {
        let mut buf = Vec::new();
        <Csv as crate::traits::WriteFormat>::write(&mut buf, results)?;
        String::from_utf8(buf).map_err(|e| RiskError::MalformedInput(format!("export is not UTF-8: {e}")))
    }
}

fn is_blank(rec: &StringRecord) -> bool {
    rec.iter().all(|f| f.trim().is_empty())
}

/// Текстовые колонки выгрузки кавычатся всегда, независимо от содержимого.
fn quoted(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

fn clean(field: &str) -> &str {
    field.trim().trim_matches('"').trim()
}

impl crate::traits::ReadFormat for Csv {
    fn read<R: BufRead>(mut r: R) -> Result<Vec<BorrowerRecord>> {
        let mut text = String::new();
        r.read_to_string(&mut text)?;
        Csv::decode(&text)
    }
}

impl crate::traits::WriteFormat for Csv {
    fn write<W: Write>(mut w: W, results: &[PredictionResult]) -> Result<()> {
        w.write_all(EXPORT_HEADER.as_bytes())?;
        w.write_all(b"\n")?;

        let mut wrt = WriterBuilder::new()
            .has_headers(false)
            .quote_style(QuoteStyle::Never)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(&mut w);

        for (i, r) in results.iter().enumerate() {
            let s = &r.borrower_summary;
            wrt.write_record([
                (i + 1).to_string(),
                s.age.to_string(),
                s.annual_income.to_string(),
                s.loan_amount.to_string(),
                s.credit_score.to_string(),
                quoted(&percent(r.default_probability)),
                quoted(display_tier(r).label()),
                quoted(&r.recommendation.action),
                quoted(&r.recommendation.priority),
            ])?;
        }
        wrt.flush()?;
        Ok(())
    }
}

/// Имя файла выгрузки с меткой времени генерации.
pub fn export_file_name(generated_at: NaiveDateTime) -> String {
    format!("loan_predictions_{}.csv", generated_at.format("%Y%m%d_%H%M%S"))
}
