//! Состояние сеанса: последний пакет результатов и блокировка повторной отправки.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::{
    error::{Result, RiskError},
    formats::csv::Csv,
    model::BatchResult,
    traits::WriteFormat,
};

/// Последний полученный пакет. Каждый новый пакет заменяет предыдущий целиком.
#[derive(Debug, Default)]
pub struct ResultsBuffer {
    current: Option<BatchResult>,
}

impl ResultsBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, batch: BatchResult) {
        self.current = Some(batch);
    }

    pub fn current(&self) -> Option<&BatchResult> {
        self.current.as_ref()
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn export<W: Write>(&self, w: W) -> Result<()> {
        match &self.current {
            Some(batch) if !batch.is_empty() => Csv::write(w, &batch.predictions),
            _ => Err(RiskError::NoData),
        }
    }
}

/// Аналог заблокированной кнопки отправки: одна отправка за раз.
#[derive(Debug, Default)]
pub struct SubmitGate {
    busy: AtomicBool,
}

impl SubmitGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_begin(&self) -> Result<SubmitGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| RiskError::Busy)?;
        Ok(SubmitGuard { gate: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

#[must_use]
#[derive(Debug)]
pub struct SubmitGuard<'a> {
    gate: &'a SubmitGate,
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.gate.busy.store(false, Ordering::Release);
    }
}
