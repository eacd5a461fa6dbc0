//! Text rendering of results, history and tips

use std::fmt;

use crate::advisor::Advice;
use crate::error::AdvisoryError;
use crate::factors::FactorRow;
use crate::models::FootprintRecord;

const BAR_WIDTH: usize = 30;

/// A record rendered against the monthly target
pub struct FootprintSummary<'a> {
    pub record: &'a FootprintRecord,
    pub target_kg: f64,
}

impl fmt::Display for FootprintSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.record.total();

        writeln!(f, "=== Monthly Carbon Footprint ===")?;
        writeln!(f, "Date:   {}", self.record.date())?;
        writeln!(f, "Total:  {:.2} kg CO2e", total)?;

        // differences that print as 0.00 count as on target
        let delta = total - self.target_kg;
        let position = if (delta.abs() * 100.0).round() == 0.0 {
            "at target".to_string()
        } else if delta > 0.0 {
            format!("{:.2} kg above target", delta)
        } else {
            format!("{:.2} kg below target", -delta)
        };
        writeln!(f, "Target: {:.2} kg CO2e ({})", self.target_kg, position)?;
        writeln!(f)?;

        writeln!(f, "Breakdown:")?;
        for (category, kg) in self.record.breakdown().iter() {
            let share = if total > 0.0 { kg / total } else { 0.0 };
            let filled = (share * BAR_WIDTH as f64).round() as usize;
            writeln!(
                f,
                "  {:<15} {:>10.2} kg {:>6.1}%  {}",
                category.label(),
                kg,
                share * 100.0,
                "#".repeat(filled.min(BAR_WIDTH))
            )?;
        }

        Ok(())
    }
}

/// History table sorted by date, with a trend line once there is enough data
pub fn format_history(records: &[FootprintRecord]) -> String {
    if records.is_empty() {
        return "No history yet. Calculate your first footprint to start tracking.\n".to_string();
    }

    let mut sorted: Vec<&FootprintRecord> = records.iter().collect();
    sorted.sort_by_key(|r| r.date());

    let mut output = String::new();
    output.push_str(&format!("{:<12} {:>18}\n", "Date", "Monthly CO2e (kg)"));
    output.push_str(&format!("{}\n", "-".repeat(31)));
    for record in &sorted {
        output.push_str(&format!("{:<12} {:>18.2}\n", record.date(), record.total()));
    }

    match (sorted.first(), sorted.last()) {
        (Some(first), Some(last)) if sorted.len() > 1 => {
            let change = last.total() - first.total();
            output.push_str(&format!("\nChange since {}: {:+.2} kg", first.date(), change));
            if first.total() > 0.0 {
                output.push_str(&format!(" ({:+.1}%)", change / first.total() * 100.0));
            }
            output.push('\n');
        }
        _ => {
            output.push_str("\nCalculate a few more times to see your progress trend.\n");
        }
    }

    output
}

/// User-facing text for a tip request outcome
pub fn advice_message(outcome: &Result<Advice, AdvisoryError>) -> String {
    match outcome {
        Ok(Advice::Tips(text)) => text.clone(),
        Ok(Advice::NoSuggestionsNeeded) => {
            "No specific categories to work on: your footprint is zero. Keep it up!".to_string()
        }
        Err(AdvisoryError::NotConfigured) => {
            "Tips unavailable: set CARBON_TRACKER_GEMINI_API_KEY to enable them.".to_string()
        }
        Err(AdvisoryError::ContentNotFound) => {
            "The tip service answered without any suggestions. Try again later.".to_string()
        }
        Err(AdvisoryError::Transport { failure, message }) => {
            format!("Warning: could not reach the tip service ({failure}): {message}")
        }
    }
}

/// Emission factor table listing
pub fn format_factors(rows: &[FactorRow]) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "{:<15} {:<18} {:>12}\n",
        "Category", "Variant", "kg CO2e"
    ));
    output.push_str(&format!("{}\n", "-".repeat(47)));
    for row in rows {
        output.push_str(&format!(
            "{:<15} {:<18} {:>7.2}/{}\n",
            row.category.label(),
            row.variant,
            row.coefficient,
            row.unit
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportFailure;
    use crate::factors::EmissionFactors;
    use crate::models::Breakdown;
    use chrono::NaiveDate;

    fn record(day: u32, breakdown: Breakdown) -> FootprintRecord {
        FootprintRecord::new(NaiveDate::from_ymd_opt(2026, 4, day).unwrap(), breakdown)
    }

    #[test]
    fn summary_shows_target_and_every_category() {
        let rec = record(
            2,
            Breakdown {
                transportation: 150.0,
                electricity: 0.0,
                diet: 75.0,
                waste: 0.0,
            },
        );
        let text = FootprintSummary {
            record: &rec,
            target_kg: 500.0,
        }
        .to_string();

        assert!(text.contains("Total:  225.00 kg CO2e"));
        assert!(text.contains("275.00 kg below target"));
        for label in ["Transportation", "Electricity", "Diet", "Waste"] {
            assert!(text.contains(label), "missing {label}");
        }
        assert!(text.contains("66.7%"));
    }

    #[test]
    fn summary_says_at_target_when_total_matches() {
        let rec = record(
            3,
            Breakdown {
                transportation: 100.0,
                electricity: 0.0,
                diet: 0.0,
                waste: 0.0,
            },
        );
        let text = FootprintSummary {
            record: &rec,
            target_kg: 100.0,
        }
        .to_string();

        assert!(text.contains("Target: 100.00 kg CO2e (at target)"));
        assert!(!text.contains("below target"));
        assert!(!text.contains("above target"));

        let over = FootprintSummary {
            record: &rec,
            target_kg: 90.0,
        }
        .to_string();
        assert!(over.contains("(10.00 kg above target)"));
    }

    #[test]
    fn summary_of_zero_footprint_has_no_bars() {
        let rec = record(2, Breakdown::default());
        let text = FootprintSummary {
            record: &rec,
            target_kg: 100.0,
        }
        .to_string();
        assert!(!text.contains('#'));
        assert!(text.contains("0.0%"));
    }

    #[test]
    fn history_is_sorted_and_trended() {
        let records = vec![
            record(20, Breakdown { waste: 80.0, ..Default::default() }),
            record(5, Breakdown { waste: 100.0, ..Default::default() }),
        ];
        let text = format_history(&records);

        let first = text.find("2026-04-05").unwrap();
        let second = text.find("2026-04-20").unwrap();
        assert!(first < second);
        assert!(text.contains("Change since 2026-04-05: -20.00 kg (-20.0%)"));
    }

    #[test]
    fn short_history_asks_for_more_data() {
        assert!(format_history(&[]).starts_with("No history yet"));
        let one = format_history(&[record(1, Breakdown::default())]);
        assert!(one.contains("Calculate a few more times"));
    }

    #[test]
    fn every_advisory_outcome_has_a_message() {
        assert_eq!(advice_message(&Ok(Advice::Tips("- walk".into()))), "- walk");
        assert!(advice_message(&Ok(Advice::NoSuggestionsNeeded)).contains("zero"));
        assert!(advice_message(&Err(AdvisoryError::ContentNotFound)).contains("without any suggestions"));
        let transport = AdvisoryError::Transport {
            failure: TransportFailure::Status(503),
            message: "unavailable".into(),
        };
        assert!(advice_message(&Err(transport)).starts_with("Warning: could not reach the tip service (HTTP status 503)"));
    }

    #[test]
    fn factor_listing_has_all_rows() {
        let text = format_factors(&EmissionFactors::default().rows());
        assert_eq!(text.lines().count(), 2 + 11);
        assert!(text.contains("gasoline_car"));
        assert!(text.contains("0.23/kWh"));
    }
}
