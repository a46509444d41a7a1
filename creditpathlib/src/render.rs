//! Превращение ответов сервиса в то, что показывается пользователю.
//!
//! Метка риска от сервера главнее; пороги 0.30 / 0.60 применяются только
//! когда метки в ответе нет.

use crate::model::{BatchResult, PredictionResult, RiskTier};
use std::fmt::Write as _;

pub const HIGH_THRESHOLD: f64 = 0.60;
pub const MEDIUM_THRESHOLD: f64 = 0.30;

impl RiskTier {
    /// Нижние границы включительно: 0.30 это Medium, 0.60 это High.
    pub fn from_probability(p: f64) -> Self {
        if p >= HIGH_THRESHOLD {
            RiskTier::High
        } else if p >= MEDIUM_THRESHOLD {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskTier::Low => "Low Risk",
            RiskTier::Medium => "Medium Risk",
            RiskTier::High => "High Risk",
        }
    }

    pub fn short(self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Medium => "medium",
            RiskTier::High => "high",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            RiskTier::Low => "#28a745",
            RiskTier::Medium => "#ffc107",
            RiskTier::High => "#dc3545",
        }
    }
}

pub fn display_tier(result: &PredictionResult) -> RiskTier {
    result
        .risk_level
        .unwrap_or_else(|| RiskTier::from_probability(result.default_probability))
}

#[derive(Debug, Clone)]
pub struct Formatter {
    pub currency_symbol: String,
}

impl Default for Formatter {
    fn default() -> Self {
        Self { currency_symbol: "₹".into() }
    }
}

impl Formatter {
    pub fn new(currency_symbol: impl Into<String>) -> Self {
        Self { currency_symbol: currency_symbol.into() }
    }

    /// `1234567.4` -> `₹1,234,567`
    pub fn currency(&self, amount: f64) -> String {
        let rounded = amount.round();
        let sign = if rounded < 0.0 { "-" } else { "" };
        format!("{sign}{}{}", self.currency_symbol, group_thousands(rounded.abs() as u64))
    }

    pub fn percent(&self, p: f64) -> String {
        percent(p)
    }
}

/// `0.8234` -> `82.34%`
pub fn percent(p: f64) -> String {
    format!("{:.2}%", p * 100.0)
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub tier: RiskTier,
    pub label: &'static str,
    pub color: &'static str,
    pub probability: String,
    pub action: String,
    pub priority: String,
    pub timeline: String,
    pub next_steps: Vec<String>,
    pub summary: Vec<(&'static str, String)>,
}

impl ResultView {
    pub fn from_result(result: &PredictionResult, fmt: &Formatter) -> Self {
        let tier = display_tier(result);
        let rec = &result.recommendation;
        let s = &result.borrower_summary;
        Self {
            tier,
            label: tier.label(),
            color: tier.color(),
            probability: fmt.percent(result.default_probability),
            action: rec.action.clone(),
            priority: rec.priority.clone(),
            timeline: rec.timeline.clone(),
            next_steps: rec.next_steps.clone(),
            summary: vec![
                ("Age", format!("{} years", s.age)),
                ("Annual Income", fmt.currency(s.annual_income)),
                ("Loan Amount", fmt.currency(s.loan_amount)),
                ("Credit Score", format!("{}", s.credit_score)),
            ],
        }
    }
}

/// Сводка по пакету. Считаются метки сервера, пересчёт по порогам только при их отсутствии.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchSummary {
    pub total: usize,
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub average_probability: f64,
    pub max_probability: f64,
    pub high_risk_share: f64,
}

impl BatchSummary {
    pub fn from_results(results: &[PredictionResult]) -> Self {
        let mut summary = BatchSummary { total: results.len(), ..Default::default() };
        if results.is_empty() {
            return summary;
        }

        let mut sum = 0.0;
        for r in results {
            match display_tier(r) {
                RiskTier::Low => summary.low += 1,
                RiskTier::Medium => summary.medium += 1,
                RiskTier::High => summary.high += 1,
            }
            sum += r.default_probability;
            summary.max_probability = summary.max_probability.max(r.default_probability);
        }
        summary.average_probability = sum / results.len() as f64;
        summary.high_risk_share = summary.high as f64 * 100.0 / results.len() as f64;
        summary
    }
}

pub fn render_single(view: &ResultView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Risk level:          {} ({})", view.label, view.color);
    let _ = writeln!(out, "Default probability: {}", view.probability);
    let _ = writeln!(out, "Recommended action:  {}", view.action);
    let _ = writeln!(out, "Priority:            {}", view.priority);
    let _ = writeln!(out, "Timeline:            {}", view.timeline);
    if !view.next_steps.is_empty() {
        let _ = writeln!(out, "Next steps:");
        for (i, step) in view.next_steps.iter().enumerate() {
            let _ = writeln!(out, "  {}. {step}", i + 1);
        }
    }
    let _ = writeln!(out, "Borrower:");
    for (name, value) in &view.summary {
        let _ = writeln!(out, "  {name}: {value}");
    }
    out
}

pub fn render_batch(batch: &BatchResult, summary: &BatchSummary, fmt: &Formatter) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>4}  {:>5}  {:>14}  {:>14}  {:>6}  {:>8}  {:<11}  {:<8}",
        "#", "Age", "Income", "Loan", "Score", "Prob", "Risk", "Priority"
    );
    for (i, r) in batch.predictions.iter().enumerate() {
        let s = &r.borrower_summary;
        let _ = writeln!(
            out,
            "{:>4}  {:>5}  {:>14}  {:>14}  {:>6}  {:>8}  {:<11}  {:<8}",
            i + 1,
            s.age,
            fmt.currency(s.annual_income),
            fmt.currency(s.loan_amount),
            s.credit_score,
            fmt.percent(r.default_probability),
            display_tier(r).label(),
            r.recommendation.priority,
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Total borrowers:     {}", summary.total);
    let _ = writeln!(out, "High risk:           {}", summary.high);
    let _ = writeln!(out, "Medium risk:         {}", summary.medium);
    let _ = writeln!(out, "Low risk:            {}", summary.low);
    let _ = writeln!(out, "Average probability: {}", fmt.percent(summary.average_probability));
    let _ = writeln!(out, "Highest probability: {}", fmt.percent(summary.max_probability));
    let _ = writeln!(out, "High-risk share:     {:.1}%", summary.high_risk_share);
    out
}
