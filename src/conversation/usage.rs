//! Per-role usage accounting.
//!
//! Each role keeps an ordered report: a running total cost plus one entry per
//! model in the order models were first used. A file is charged the sum,
//! across roles, of each role's first entry.

use serde::Serialize;

use crate::ai::TokenUsage;

/// Usage of one model by one role
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelUsage {
    pub model: String,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
    pub cost: f64,
}

/// Ordered usage report for one role
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UsageReport {
    pub total_cost: f64,
    pub models: Vec<ModelUsage>,
}

impl UsageReport {
    /// Add one model call to the report
    pub fn record(&mut self, model: &str, usage: &TokenUsage, cost: f64) {
        self.total_cost += cost;

        let entry = match self.models.iter_mut().position(|m| m.model == model) {
            Some(idx) => &mut self.models[idx],
            None => {
                self.models.push(ModelUsage {
                    model: model.to_string(),
                    prompt_tokens: 0,
                    completion_tokens: 0,
                    total_tokens: 0,
                    cost: 0.0,
                });
                let last = self.models.len() - 1;
                &mut self.models[last]
            }
        };

        entry.prompt_tokens += u64::from(usage.input_tokens);
        entry.completion_tokens += u64::from(usage.output_tokens);
        entry.total_tokens += u64::from(usage.total());
        entry.cost += cost;
    }

    pub fn first_entry(&self) -> Option<&ModelUsage> {
        self.models.first()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

/// Tokens and cost charged to a file: sum of every role's first entry
pub fn file_totals<'a>(reports: impl IntoIterator<Item = &'a UsageReport>) -> (u64, f64) {
    reports
        .into_iter()
        .filter_map(UsageReport::first_entry)
        .fold((0, 0.0), |(tokens, cost), entry| {
            (tokens + entry.total_tokens, cost + entry.cost)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_accumulates_per_model() {
        let mut report = UsageReport::default();
        report.record("gpt-4o", &TokenUsage::from_openai(100, 20), 0.01);
        report.record("gpt-4o", &TokenUsage::from_openai(50, 10), 0.005);

        assert_eq!(report.models.len(), 1);
        let entry = report.first_entry().unwrap();
        assert_eq!(entry.prompt_tokens, 150);
        assert_eq!(entry.completion_tokens, 30);
        assert_eq!(entry.total_tokens, 180);
        assert!((report.total_cost - 0.015).abs() < 1e-12);
    }

    #[test]
    fn test_file_totals_use_first_entry_only() {
        let mut manager = UsageReport::default();
        manager.record("gpt-4o", &TokenUsage::from_openai(100, 0), 0.25);
        manager.record("gpt-4o-mini", &TokenUsage::from_openai(1000, 0), 1.0);

        let mut coder = UsageReport::default();
        coder.record("gpt-4o", &TokenUsage::from_openai(30, 20), 0.5);

        let (tokens, cost) = file_totals([&manager, &coder]);
        assert_eq!(tokens, 150);
        assert!((cost - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_file_totals_empty_reports_are_zero() {
        let empty = UsageReport::default();
        assert!(empty.is_empty());
        assert_eq!(file_totals([&empty, &empty]), (0, 0.0));
    }
}
