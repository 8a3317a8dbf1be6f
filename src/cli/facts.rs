//! Narrative one-liners shown under a calculation.

use super::ui::format_amount;
use crate::core::Outcome;

/// Builds the fun facts for an outcome, amounts in `currency`.
pub fn fun_facts(outcome: &Outcome, currency: &str) -> Vec<String> {
    let total = outcome.total_return_percent;
    let (adverb, wording) = if total > 0.0 {
        ("a whopping ", "gain")
    } else {
        ("", "loss")
    };

    let mut facts = vec![
        format!(
            "🎯 Held for {} years, your {} position comes to {:.2} shares.",
            outcome.years_elapsed, outcome.symbol, outcome.shares
        ),
        format!(
            "💰 The initial {} {currency} turned into {} {currency}.",
            format_amount(outcome.initial_secondary),
            format_amount(outcome.current_secondary)
        ),
        format!("📈 That is {adverb}{:.1}% {wording}.", total.abs()),
        format!(
            "🌟 The annualized return was {:+.1}%.",
            outcome.annual_return_percent
        ),
        format!(
            "💱 The exchange rate moved {:+.1}% over the period.",
            outcome.exchange_change_percent
        ),
    ];

    if total > 1000.0 {
        facts.push("🚀 Incredible! That is more than a 1000% return!".to_string());
    } else if total > 500.0 {
        facts.push("🎉 What an investment! More than five times the money!".to_string());
    } else if total > 100.0 {
        facts.push("👏 A great pick!".to_string());
    }

    facts
}
