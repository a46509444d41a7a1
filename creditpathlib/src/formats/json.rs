//! JSON: массив заёмщиков на входе, массив результатов на выходе.

use crate::{
    error::{Result, RiskError},
    fields::NUMERIC_FIELDS,
    model::{BorrowerRecord, FieldValue, PredictionResult},
};
use std::io::{BufRead, Write};

pub struct Json;

impl crate::traits::ReadFormat for Json {
    fn read<R: BufRead>(r: R) -> Result<Vec<BorrowerRecord>> {
        let records: Vec<BorrowerRecord> = serde_json::from_reader(r)?;
        if records.is_empty() {
            return Err(RiskError::MalformedInput("JSON input contains no borrowers".into()));
        }

        for (i, rec) in records.iter().enumerate() {
            let missing = rec.missing_fields();
            if !missing.is_empty() {
                return Err(RiskError::MissingColumns(missing));
            }
            for name in NUMERIC_FIELDS {
                if let Some(FieldValue::Text(value)) = rec.get(name) {
                    return Err(RiskError::InvalidNumber {
                        row: Some(i + 1),
                        column: name.to_string(),
                        value: value.clone(),
                    });
                }
            }
        }
        Ok(records)
    }
}

impl crate::traits::WriteFormat for Json {
    fn write<W: Write>(mut w: W, results: &[PredictionResult]) -> Result<()> {
        serde_json::to_writer_pretty(&mut w, results)?;
        w.write_all(b"\n")?;
        Ok(())
    }
}
