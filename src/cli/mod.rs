//! Terminal presentation for the calculation engine.

pub mod calculate;
pub mod compare;
pub mod facts;
pub mod history;
pub mod instruments;
pub mod setup;
pub mod ui;

use crate::core::ReferenceData;

/// Maps user input to a known symbol, accepting lowercase input for datasets
/// that use uppercase tickers. Unknown symbols pass through unchanged so the
/// engine can report them.
pub fn resolve_symbol(store: &ReferenceData, input: &str) -> String {
    let trimmed = input.trim();
    if store.instrument(trimmed).is_some() {
        return trimmed.to_string();
    }
    let upper = trimmed.to_uppercase();
    if store.instrument(&upper).is_some() {
        upper
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reference::sample_dataset;

    #[test]
    fn resolves_case_insensitively() {
        let store = ReferenceData::new(sample_dataset()).unwrap();
        assert_eq!(resolve_symbol(&store, "AAPL"), "AAPL");
        assert_eq!(resolve_symbol(&store, " aapl "), "AAPL");
        assert_eq!(resolve_symbol(&store, "nope"), "nope");
    }
}
