//! Model pricing used to turn token usage into an estimated USD cost.

use std::collections::BTreeMap;

use tracing::warn;

use super::TokenUsage;
use crate::config::ModelPricing;

/// Per-model prices, matched exactly or by the longest model-name prefix
#[derive(Debug, Clone, Default)]
pub struct PricingTable {
    prices: BTreeMap<String, ModelPricing>,
}

impl PricingTable {
    pub fn new(prices: BTreeMap<String, ModelPricing>) -> Self {
        Self { prices }
    }

    /// Price entry for `model`
    pub fn lookup(&self, model: &str) -> Option<&ModelPricing> {
        if let Some(price) = self.prices.get(model) {
            return Some(price);
        }
        self.prices
            .iter()
            .filter(|(name, _)| model.starts_with(name.as_str()))
            .max_by_key(|(name, _)| name.len())
            .map(|(_, price)| price)
    }

    /// Estimated cost of `usage` on `model`; zero when the model is not priced
    pub fn cost(&self, model: &str, usage: &TokenUsage) -> f64 {
        match self.lookup(model) {
            Some(price) => {
                usage.input_tokens as f64 / 1000.0 * price.prompt_per_1k
                    + usage.output_tokens as f64 / 1000.0 * price.completion_per_1k
            }
            None => {
                warn!("No pricing configured for model '{}', cost recorded as 0", model);
                0.0
            }
        }
    }
}
