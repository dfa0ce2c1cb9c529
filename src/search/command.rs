//! Search commands: lazy producers of `index:line` matches.

use crate::error::Result;
use crate::search::candidates::Candidates;

/// Produces display lines for a query, handing each one to `on_match` as soon
/// as it is found, in discovery order. Returns once the producer is exhausted
/// or `on_match` fails.
pub trait SearchCommand {
    fn run(&mut self, query: &str, on_match: &mut dyn FnMut(&str) -> Result<()>) -> Result<()>;
}

/// Scans a [`Candidates`] store with the token filter.
#[derive(Debug, Clone)]
pub struct CandidateSearch {
    candidates: Candidates,
    max_results: Option<usize>,
}

impl CandidateSearch {
    pub fn new(candidates: Candidates) -> Self {
        Self {
            candidates,
            max_results: None,
        }
    }

    /// Stop after `limit` matches. `None` scans the whole store.
    pub fn with_max_results(mut self, limit: Option<usize>) -> Self {
        self.max_results = limit;
        self
    }
}

impl SearchCommand for CandidateSearch {
    fn run(&mut self, query: &str, on_match: &mut dyn FnMut(&str) -> Result<()>) -> Result<()> {
        let limit = self.max_results.unwrap_or(usize::MAX);
        if limit == 0 {
            return Ok(());
        }

        let mut emitted = 0usize;
        let mut failure = None;
        self.candidates.each_by_filter(query, |index, candidate| {
            let line = format!("{index}:{}", candidate.to_line());
            if let Err(err) = on_match(&line) {
                failure = Some(err);
                return false;
            }
            emitted += 1;
            emitted < limit
        });

        tracing::debug!(query, emitted, "search finished");
        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Replays a fixed list of lines; handy for driving a Screen without a store.
#[derive(Debug, Clone, Default)]
pub struct StaticSearch {
    lines: Vec<String>,
    queries: Vec<String>,
}

impl StaticSearch {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            queries: Vec::new(),
        }
    }

    /// Queries received so far, oldest first.
    pub fn queries(&self) -> &[String] {
        &self.queries
    }
}

impl SearchCommand for StaticSearch {
    fn run(&mut self, query: &str, on_match: &mut dyn FnMut(&str) -> Result<()>) -> Result<()> {
        self.queries.push(query.to_string());
        for line in &self.lines {
            on_match(line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{CandidateSearch, SearchCommand, StaticSearch};
    use crate::error::Error;
    use crate::search::candidates::{Candidate, Candidates};
    use crate::search::source::SourceName;

    fn candidates() -> Candidates {
        let store = Candidates::new();
        let source = SourceName::new("sheet.txt");
        for (idx, text) in ["apple", "banana", "apricot", "cherry"].iter().enumerate() {
            store.push(Candidate::new(source.clone(), idx + 1, *text));
        }
        store
    }

    fn collect(search: &mut dyn SearchCommand, query: &str) -> Vec<String> {
        let mut lines = Vec::new();
        search
            .run(query, &mut |line| {
                lines.push(line.to_string());
                Ok(())
            })
            .expect("search ran");
        lines
    }

    #[test]
    fn emits_index_prefixed_lines_in_store_order() {
        let mut search = CandidateSearch::new(candidates());
        assert_eq!(
            collect(&mut search, "ap"),
            vec!["0:sheet.txt:1:apple", "2:sheet.txt:3:apricot"]
        );
    }

    #[test]
    fn max_results_bounds_the_scan() {
        let mut search = CandidateSearch::new(candidates()).with_max_results(Some(1));
        assert_eq!(collect(&mut search, ""), vec!["0:sheet.txt:1:apple"]);

        let mut none = CandidateSearch::new(candidates()).with_max_results(Some(0));
        assert!(collect(&mut none, "").is_empty());
    }

    #[test]
    fn callback_error_stops_and_propagates() {
        let mut search = CandidateSearch::new(candidates());
        let mut calls = 0;
        let result = search.run("", &mut |_| {
            calls += 1;
            Err(Error::Search("sink closed".to_string()))
        });
        assert!(matches!(result, Err(Error::Search(_))));
        assert_eq!(calls, 1);
    }

    #[test]
    fn static_search_records_queries() {
        let mut search = StaticSearch::new(["0:foo", "1:bar"]);
        assert_eq!(collect(&mut search, "fo"), vec!["0:foo", "1:bar"]);
        assert_eq!(search.queries(), ["fo".to_string()]);
    }
}
