#![allow(clippy::format_push_string)]

use crate::runner::RunSummary;
use chrono::{TimeZone, Utc};
use tick_oracle_core::{Direction, Prediction};

const RULE: &str = "═══════════════════════════════════════════════════════════════\n";
const THIN_RULE: &str = "───────────────────────────────────────────────────────────────\n";

pub struct ReportFormatter;

impl ReportFormatter {
    /// Renders a run summary as a plain-text report.
    #[must_use]
    pub fn format(summary: &RunSummary) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str(RULE);
        output.push_str(&format!("              PREDICTION RUN: {}\n", summary.symbol));
        output.push_str(RULE);
        output.push('\n');

        output.push_str("Feed\n");
        output.push_str(THIN_RULE);
        output.push_str(&format!("Start:                 {}\n", timestamp(summary.first_tick_ms)));
        output.push_str(&format!("End:                   {}\n", timestamp(summary.last_tick_ms)));
        output.push_str(&format!("Ticks Processed:       {}\n", summary.ticks_processed));
        if summary.ticks_dropped > 0 {
            output.push_str(&format!("Ticks Dropped:         {}\n", summary.ticks_dropped));
        }
        if let (Some(first), Some(last)) = (summary.first_price, summary.last_price) {
            output.push_str(&format!("Price:                 {first:.4} -> {last:.4}\n"));
        }
        output.push('\n');

        let stats = &summary.stats;
        output.push_str("Predictions\n");
        output.push_str(THIN_RULE);
        output.push_str(&format!("Issued:                {}\n", summary.predictions_made));
        output.push_str(&format!("Resolved:              {}\n", summary.predictions_resolved));
        output.push_str(&format!("Pending at End:        {}\n", summary.pending_at_end));
        if stats.total_predictions > 0 {
            output.push_str(&format!("Accuracy:              {:.2}%\n", stats.accuracy));
            output.push_str(&format!("Recent Accuracy:       {:.2}%\n", stats.recent_accuracy));
        } else {
            output.push_str("Accuracy:              N/A (nothing resolved)\n");
        }
        output.push_str(&format!(
            "Streak:                {} (best {})\n",
            stats.current_streak, stats.best_streak
        ));
        for direction in Direction::ALL {
            let d = stats.per_direction.get(direction);
            if d.total > 0 {
                output.push_str(&format!(
                    "  {:<5}                {}/{} ({:.1}%)\n",
                    direction.to_string(),
                    d.correct,
                    d.total,
                    d.accuracy
                ));
            }
        }
        output.push('\n');

        let state = &summary.final_state;
        output.push_str("Learning State\n");
        output.push_str(THIN_RULE);
        output.push_str(&format!("Confidence Multiplier: {:.3}\n", state.confidence_multiplier));
        output.push_str(&format!("Adaptive Horizon:      {}ms\n", state.adaptive_horizon_ms));
        output.push_str(&format!("Momentum Bias:         {:+.3}\n", state.momentum_bias));
        output.push_str(&format!("Volatility Regime:     {}\n", state.volatility_state));
        output.push_str(&format!(
            "Composite Score:       {:.2} ({:+.2})\n",
            state.multi_level.composite_score, state.multi_level.composite_trend
        ));
        output.push_str(&format!(
            "Calibration Error:     {:.2}\n",
            state.multi_level.confidence_calibration
        ));
        output.push('\n');

        if !summary.recent.is_empty() {
            output.push_str("Recent Predictions\n");
            output.push_str(THIN_RULE);
            for prediction in &summary.recent {
                output.push_str(&Self::format_prediction(prediction));
                output.push('\n');
            }
            output.push('\n');
        }

        output.push_str(RULE);

        if summary.predictions_made == 0 {
            output.push_str("\nNo predictions were issued during this run.\n");
            output.push_str("    The feed may be shorter than min_ticks_for_prediction.\n\n");
        }

        output
    }

    /// One-line description of a prediction.
    #[must_use]
    pub fn format_prediction(prediction: &Prediction) -> String {
        let outcome = match (prediction.resolved, prediction.actual_direction) {
            (true, Some(actual)) => {
                let mark = if prediction.was_correct == Some(true) { "hit" } else { "miss" };
                let composite = prediction
                    .accuracy_levels
                    .map_or(0.0, |levels| levels.composite);
                format!("{mark:<4} actual={actual:<4} composite={composite:.1}")
            }
            _ => "pending".to_string(),
        };

        format!(
            "{} {:<4} conf={:.1} h={}ms @ {:.4} -> {:.4}  {}",
            timestamp(Some(prediction.created_at_ms)),
            prediction.predicted_direction.to_string(),
            prediction.confidence,
            prediction.horizon_ms,
            prediction.price_at_creation,
            prediction.target_price,
            outcome
        )
    }
}

fn timestamp(ms: Option<i64>) -> String {
    ms.and_then(|ms| Utc.timestamp_millis_opt(ms).single())
        .map_or_else(|| "N/A".to_string(), |dt| dt.format("%Y-%m-%d %H:%M:%S%.3f UTC").to_string())
}
