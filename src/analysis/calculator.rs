use crate::analysis::traits::DealAnalyzer;
use crate::analysis::types::{DealAnalysisInput, DealMetrics, Roi};
use crate::error::Result;
use async_trait::async_trait;
use tracing::debug;

/// Derive deal metrics from a scenario.
///
/// Expects non-negative inputs but does not clamp them; validate with
/// [`DealAnalysisInput::validate`] first. A zero total investment yields
/// [`Roi::Undefined`].
pub fn calculate(input: &DealAnalysisInput) -> DealMetrics {
    let total_investment = input.purchase_price + input.rehab_cost + input.holding_costs;
    let potential_profit = input.arv - total_investment;
    DealMetrics {
        total_investment,
        potential_profit,
        roi: roi_for(potential_profit, total_investment),
    }
}

pub(crate) fn roi_for(potential_profit: f64, total_investment: f64) -> Roi {
    if total_investment > 0.0 {
        Roi::Percent(potential_profit / total_investment * 100.0)
    } else {
        Roi::Undefined
    }
}

/// In-process analyzer
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalAnalyzer;

impl LocalAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DealAnalyzer for LocalAnalyzer {
    async fn analyze(&self, input: &DealAnalysisInput) -> Result<DealMetrics> {
        let metrics = calculate(input);
        debug!(
            total = metrics.total_investment,
            profit = metrics.potential_profit,
            roi = ?metrics.roi.percent(),
            "Calculated deal metrics locally"
        );
        Ok(metrics)
    }

    fn engine_name(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_typical_flip() {
        let metrics = calculate(&DealAnalysisInput::new(100_000.0, 20_000.0, 180_000.0, 5_000.0));
        assert_eq!(metrics.total_investment, 125_000.0);
        assert_eq!(metrics.potential_profit, 55_000.0);
        let roi = metrics.roi.percent().unwrap();
        assert!((roi - 44.0).abs() < EPSILON);
        assert_eq!(metrics.roi.to_string(), "44.00%");
    }

    #[test]
    fn test_zero_investment_is_undefined() {
        let metrics = calculate(&DealAnalysisInput::default());
        assert_eq!(metrics.total_investment, 0.0);
        assert_eq!(metrics.potential_profit, 0.0);
        assert!(metrics.roi.is_undefined());
        assert_ne!(metrics.roi, Roi::Percent(0.0));
        assert_eq!(metrics.roi.to_string(), "n/a");
    }

    #[test]
    fn test_zero_investment_with_arv_is_still_undefined() {
        let metrics = calculate(&DealAnalysisInput::new(0.0, 0.0, 50_000.0, 0.0));
        assert_eq!(metrics.potential_profit, 50_000.0);
        assert!(metrics.roi.is_undefined());
    }

    #[test]
    fn test_loss_gives_negative_roi() {
        let metrics = calculate(&DealAnalysisInput::new(200_000.0, 50_000.0, 200_000.0, 0.0));
        assert_eq!(metrics.potential_profit, -50_000.0);
        let roi = metrics.roi.percent().unwrap();
        assert!((roi - -20.0).abs() < EPSILON);
    }

    #[test]
    fn test_formula_over_a_spread_of_inputs() {
        let amounts = [0.0, 1.0, 999.99, 12_345.67, 250_000.0];
        for &p in &amounts {
            for &r in &amounts {
                for &a in &amounts {
                    for &h in &amounts {
                        let metrics = calculate(&DealAnalysisInput::new(p, r, a, h));
                        let total = p + r + h;
                        match metrics.roi {
                            Roi::Percent(roi) => {
                                assert!(total > 0.0);
                                let expected = (a - total) / total * 100.0;
                                assert!((roi - expected).abs() < EPSILON * expected.abs().max(1.0));
                            }
                            Roi::Undefined => assert_eq!(total, 0.0),
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_same_input_same_output() {
        let input = DealAnalysisInput::new(87_500.0, 12_250.5, 140_000.0, 3_333.33);
        assert_eq!(calculate(&input), calculate(&input));
    }

    #[test]
    fn test_negative_inputs_are_not_clamped() {
        let metrics = calculate(&DealAnalysisInput::new(-10.0, 0.0, 0.0, 0.0));
        assert_eq!(metrics.total_investment, -10.0);
        assert!(metrics.roi.is_undefined());
    }

    #[tokio::test]
    async fn test_local_analyzer_matches_calculate() {
        let input = DealAnalysisInput::new(100_000.0, 20_000.0, 180_000.0, 5_000.0);
        let metrics = LocalAnalyzer::new().analyze(&input).await.unwrap();
        assert_eq!(metrics, calculate(&input));
    }
}
