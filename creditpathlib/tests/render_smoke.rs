use creditpathlib::{
    model::{BatchResult, PredictionResult, RiskTier},
    render::{display_tier, render_batch, render_single, BatchSummary, Formatter, ResultView},
};

fn result(p: f64, label: Option<&str>) -> PredictionResult {
    let mut v = serde_json::json!({
        "default_probability": p,
        "recommendation": {
            "action": "Make personalized call to discuss the loan",
            "priority": "Medium",
            "timeline": "Within 3-5 business days",
            "next_steps": ["Schedule personalized call with borrower", "Offer flexible payment options if needed"]
        },
        "borrower_summary": {"age": 30, "annual_income": 500000.0, "loan_amount": 150000.0, "credit_score": 650}
    });
    if let Some(l) = label {
        v["risk_level"] = l.into();
    }
    serde_json::from_value(v).unwrap()
}

#[test]
fn thresholds_have_closed_lower_bounds() {
    assert_eq!(RiskTier::from_probability(0.82), RiskTier::High);
    assert_eq!(RiskTier::from_probability(0.45), RiskTier::Medium);
    assert_eq!(RiskTier::from_probability(0.10), RiskTier::Low);
    assert_eq!(RiskTier::from_probability(0.30), RiskTier::Medium);
    assert_eq!(RiskTier::from_probability(0.60), RiskTier::High);
    assert_eq!(RiskTier::from_probability(0.2999), RiskTier::Low);
    assert_eq!(RiskTier::from_probability(0.82).short(), "high");
}

#[test]
fn server_label_wins_over_thresholds() {
    assert_eq!(display_tier(&result(0.45, Some("Low Risk"))), RiskTier::Low);
    assert_eq!(display_tier(&result(0.45, None)), RiskTier::Medium);
}

#[test]
fn view_formats_probability_and_money() {
    let fmt = Formatter::default();
    let view = ResultView::from_result(&result(0.8234, None), &fmt);
    assert_eq!(view.tier, RiskTier::High);
    assert_eq!(view.label, "High Risk");
    assert_eq!(view.color, "#dc3545");
    assert_eq!(view.probability, "82.34%");
    assert_eq!(view.summary[1], ("Annual Income", "₹500,000".to_string()));

    let text = render_single(&view);
    assert!(text.contains("High Risk"));
    assert!(text.contains("  2. Offer flexible payment options if needed"));
}

#[test]
fn currency_grouping() {
    let fmt = Formatter::new("$");
    assert_eq!(fmt.currency(0.0), "$0");
    assert_eq!(fmt.currency(999.4), "$999");
    assert_eq!(fmt.currency(1000.0), "$1,000");
    assert_eq!(fmt.currency(1234567.6), "$1,234,568");
    assert_eq!(fmt.currency(-2500.0), "-$2,500");
}

#[test]
fn batch_summary_counts_server_labels() {
    let results = vec![
        result(0.9, Some("High Risk")),
        result(0.7, Some("Medium Risk")),
        result(0.1, Some("Low Risk")),
        result(0.65, None),
    ];
    let s = BatchSummary::from_results(&results);
    assert_eq!(s.total, 4);
    assert_eq!((s.high, s.medium, s.low), (2, 1, 1));
    assert!((s.average_probability - 0.5875).abs() < 1e-9);
    assert!((s.max_probability - 0.9).abs() < 1e-9);
    assert!((s.high_risk_share - 50.0).abs() < 1e-9);

    let batch = BatchResult { predictions: results, ..Default::default() };
    let table = render_batch(&batch, &s, &Formatter::default());
    assert_eq!(table.lines().filter(|l| l.contains("₹500,000")).count(), 4);
    assert!(table.contains("High-risk share:     50.0%"));
}

#[test]
fn empty_batch_summary_is_zero() {
    let s = BatchSummary::from_results(&[]);
    assert_eq!(s, BatchSummary::default());
}
