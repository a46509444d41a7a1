//! Унифицированные трэйты чтения/записи на основе std::io::{BufRead, Write}.

use crate::{
    error::Result,
    model::{BorrowerRecord, PredictionResult},
};
use std::io::{BufRead, Write};

/// Чтение заёмщиков из загруженного файла.
pub trait ReadFormat {
    fn read<R: BufRead>(r: R) -> Result<Vec<BorrowerRecord>>;
}

/// Выгрузка результатов прогноза.
pub trait WriteFormat {
    fn write<W: Write>(w: W, results: &[PredictionResult]) -> Result<()>;
}

pub trait Format: ReadFormat + WriteFormat {}
impl<T: ReadFormat + WriteFormat> Format for T {}
