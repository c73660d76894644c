mod rules;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::Receipt;

/// Individual scoring rules, listed in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringRule {
    RetailerName,
    RoundDollarTotal,
    QuarterMultipleTotal,
    ItemPairs,
    ItemDescriptions,
    OddPurchaseDay,
    AfternoonPurchase,
}

impl ScoringRule {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::RetailerName,
            Self::RoundDollarTotal,
            Self::QuarterMultipleTotal,
            Self::ItemPairs,
            Self::ItemDescriptions,
            Self::OddPurchaseDay,
            Self::AfternoonPurchase,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::RetailerName => "retailer_name",
            Self::RoundDollarTotal => "round_dollar_total",
            Self::QuarterMultipleTotal => "quarter_multiple_total",
            Self::ItemPairs => "item_pairs",
            Self::ItemDescriptions => "item_descriptions",
            Self::OddPurchaseDay => "odd_purchase_day",
            Self::AfternoonPurchase => "afternoon_purchase",
        }
    }
}

/// Points awarded by a single rule, with a human readable audit note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub rule: ScoringRule,
    pub points: u64,
    pub notes: String,
}

/// Full scoring trail for a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub components: Vec<ScoreComponent>,
    pub total: u64,
}

impl ScoreBreakdown {
    pub fn points_for(&self, rule: ScoringRule) -> u64 {
        self.components
            .iter()
            .filter(|component| component.rule == rule)
            .map(|component| component.points)
            .sum()
    }
}

/// Only a malformed receipt total aborts scoring; every other field degrades to zero points.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoreError {
    #[error("receipt total '{total}' is not a decimal amount")]
    InvalidTotal { total: String },
}

/// Hook invoked after each rule contributes to the running score.
pub trait RuleObserver {
    fn observe(&mut self, component: &ScoreComponent);
}

impl<F> RuleObserver for F
where
    F: FnMut(&ScoreComponent),
{
    fn observe(&mut self, component: &ScoreComponent) {
        self(component)
    }
}

/// Emits one debug event per rule, carrying the running total.
#[derive(Debug, Default)]
pub struct TracingObserver {
    running_total: u64,
}

impl RuleObserver for TracingObserver {
    fn observe(&mut self, component: &ScoreComponent) {
        self.running_total = self.running_total.saturating_add(component.points);
        debug!(
            rule = component.rule.label(),
            points = component.points,
            running_total = self.running_total,
            notes = %component.notes,
            "scoring rule applied"
        );
    }
}

/// Stateless engine applying the receipt scoring rules.
#[derive(Debug, Clone, Copy)]
pub struct ScoringEngine {
    trace_rules: bool,
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ScoringEngine {
    pub fn new(trace_rules: bool) -> Self {
        Self { trace_rules }
    }

    pub fn score(&self, receipt: &Receipt) -> Result<u64, ScoreError> {
        self.breakdown(receipt).map(|breakdown| breakdown.total)
    }

    pub fn breakdown(&self, receipt: &Receipt) -> Result<ScoreBreakdown, ScoreError> {
        if self.trace_rules {
            let mut observer = TracingObserver::default();
            let breakdown = rules::score_receipt(receipt, &mut observer)?;
            debug!(total = breakdown.total, "receipt scored");
            Ok(breakdown)
        } else {
            self.breakdown_with(receipt, &mut |_: &ScoreComponent| {})
        }
    }

    /// Score with a caller supplied observer instead of the tracing hook.
    pub fn breakdown_with(
        &self,
        receipt: &Receipt,
        observer: &mut dyn RuleObserver,
    ) -> Result<ScoreBreakdown, ScoreError> {
        rules::score_receipt(receipt, observer)
    }
}

/// Score a receipt with the default engine.
pub fn score(receipt: &Receipt) -> Result<u64, ScoreError> {
    ScoringEngine::default().score(receipt)
}
