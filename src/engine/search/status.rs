use std::fmt;

/// Lifecycle phase of a searcher.
///
/// Transitions:
/// - `Idle -> Debouncing` on the first text input,
/// - `Debouncing -> Fetching` when the input settles,
/// - `Fetching -> Settled` or `Fetching -> Errored` when the fetch resolves,
/// - any phase back to `Debouncing` on new text input,
/// - any phase back to `Idle` when the whole filter empties.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum SearchPhase {
    /// Empty filter; nothing fetched, nothing displayed.
    #[default]
    Idle,
    /// Text input is waiting out the settle window.
    Debouncing,
    /// A catalog fetch is in flight.
    Fetching,
    /// The last fetch was applied.
    Settled,
    /// The last fetch failed; results are empty until the filter changes.
    Errored,
}

/// What a search surface should tell the user right now.
///
/// This is the single outward report of the pipeline: surfaces render the
/// [`Display`](fmt::Display) form verbatim and never interpret errors
/// themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SearchStatus {
    /// No search has run yet. Distinct from a search with zero results.
    #[default]
    NotSearched,
    /// A fetch is under way.
    Searching,
    /// The last search found this many items (always > 0).
    Found(usize),
    /// The last search completed and matched nothing.
    NoResults,
    /// The last search failed.
    Failed,
}

impl fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchStatus::NotSearched => write!(f, "Type to search"),
            SearchStatus::Searching => write!(f, "Searching..."),
            SearchStatus::Found(1) => write!(f, "1 result found"),
            SearchStatus::Found(n) => write!(f, "{n} results found"),
            SearchStatus::NoResults => write!(f, "No results found"),
            SearchStatus::Failed => write!(f, "Search failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_idle_and_not_searched() {
        assert_eq!(SearchPhase::default(), SearchPhase::Idle);
        assert_eq!(SearchStatus::default(), SearchStatus::NotSearched);
    }

    #[test]
    fn status_text_pluralizes() {
        assert_eq!(SearchStatus::Found(1).to_string(), "1 result found");
        assert_eq!(SearchStatus::Found(12).to_string(), "12 results found");
    }

    #[test]
    fn zero_results_and_not_searched_read_differently() {
        assert_ne!(
            SearchStatus::NoResults.to_string(),
            SearchStatus::NotSearched.to_string()
        );
    }
}
