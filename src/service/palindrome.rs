use std::sync::Arc;

use log::{debug, info, warn};

use super::{
    dto::{
        LongestPairResponse, PalindromeCheckRequest, PalindromeCheckResponse, PalindromeRequest,
        PalindromeResponse, PalindromeServiceStatistics,
    },
    metrics::ServiceMetrics,
    stats::{round_to, PairCounters, StatsTracker, Stopwatch},
};
use crate::{
    core::AlgoError,
    engine::palindrome::{find_pairs, is_palindrome, longest_pair, summarize},
};

pub const PAIRS_SERVICE_NAME: &str = "palindrome_pairs";
pub const CHECK_SERVICE_NAME: &str = "palindrome_check";
pub const LONGEST_SERVICE_NAME: &str = "palindrome_longest";
pub const BATCH_SERVICE_NAME: &str = "palindrome_batch";

/// Tracked wrapper around the palindrome pair engine.
///
/// Pair searches are the tracked calls: each one adds to the call count,
/// cumulative time, pairs found and words processed. Single-text checks and
/// longest-pair searches report their own timing but are not tracked.
pub struct PalindromeService {
    stats: StatsTracker<PairCounters>,
    metrics: Arc<ServiceMetrics>,
}

impl PalindromeService {
    pub fn new(metrics: Arc<ServiceMetrics>) -> Self {
        info!("PalindromeService initialized");
        Self {
            stats: StatsTracker::new(),
            metrics,
        }
    }

    pub fn find_palindrome_pairs(&self, request: &PalindromeRequest) -> PalindromeResponse {
        let words = &request.words;
        info!(
            "Starting palindrome pairs calculation for {} words",
            words.len()
        );

        let stopwatch = Stopwatch::start();
        let pairs = find_pairs(words);
        let statistics = summarize(words, &pairs);
        let elapsed_ms = stopwatch.elapsed_ms();

        self.stats.record(
            elapsed_ms,
            PairCounters {
                pairs_found: pairs.len() as u64,
                words_processed: words.len() as u64,
            },
        );
        self.metrics.observe_success(PAIRS_SERVICE_NAME, elapsed_ms);

        info!(
            "Palindrome pairs calculation completed successfully. Found {} pairs, Execution time: {elapsed_ms:.3}ms",
            pairs.len()
        );

        PalindromeResponse {
            word_count: words.len(),
            pairs_count: pairs.len(),
            pairs,
            execution_time_ms: round_to(elapsed_ms, 3),
            statistics,
        }
    }

    pub fn check_palindrome(&self, request: &PalindromeCheckRequest) -> PalindromeCheckResponse {
        debug!("Checking if text is palindrome: '{}'", request.text);

        let stopwatch = Stopwatch::start();
        let result = is_palindrome(&request.text);
        let elapsed_ms = stopwatch.elapsed_ms();

        self.metrics.observe_success(CHECK_SERVICE_NAME, elapsed_ms);
        debug!("Palindrome check completed: {result}, Execution time: {elapsed_ms:.3}ms");

        PalindromeCheckResponse {
            text: request.text.clone(),
            is_palindrome: result,
            execution_time_ms: round_to(elapsed_ms, 3),
        }
    }

    pub fn find_longest_palindrome_pair(&self, request: &PalindromeRequest) -> LongestPairResponse {
        let words = &request.words;
        info!("Finding longest palindrome pair from {} words", words.len());

        let stopwatch = Stopwatch::start();
        let longest = longest_pair(words);
        let elapsed_ms = stopwatch.elapsed_ms();

        self.metrics
            .observe_success(LONGEST_SERVICE_NAME, elapsed_ms);

        let response = match longest {
            None => LongestPairResponse {
                found: false,
                message: Some("No palindrome pairs found".to_string()),
                indices: None,
                words: None,
                palindrome: None,
                length: None,
                execution_time_ms: round_to(elapsed_ms, 3),
            },
            Some(pair) => {
                let first = words[pair.index1].clone();
                let second = words[pair.index2].clone();
                LongestPairResponse {
                    found: true,
                    message: None,
                    indices: Some([pair.index1, pair.index2]),
                    palindrome: Some(format!("{first}{second}")),
                    words: Some([first, second]),
                    length: Some(pair.length),
                    execution_time_ms: round_to(elapsed_ms, 3),
                }
            }
        };

        info!(
            "Longest palindrome pair search completed. Found: {}, Execution time: {elapsed_ms:.3}ms",
            response.found
        );
        response
    }

    /// Counts a request for `operation` rejected before it reached the engine.
    pub fn reject(&self, operation: &str, err: AlgoError) -> AlgoError {
        warn!("Palindrome request rejected: {err}");
        self.metrics.observe_error(operation);
        err
    }

    pub fn get_statistics(&self) -> PalindromeServiceStatistics {
        let snap = self.stats.snapshot();
        PalindromeServiceStatistics {
            total_calls: snap.total_calls,
            total_execution_time_ms: round_to(snap.total_execution_time_ms, 3),
            average_execution_time_ms: round_to(snap.average_execution_time_ms(), 3),
            total_pairs_found: snap.extra.pairs_found,
            total_words_processed: snap.extra.words_processed,
            average_pairs_per_call: round_to(snap.per_call(snap.extra.pairs_found as f64), 2),
            average_words_per_call: round_to(snap.per_call(snap.extra.words_processed as f64), 2),
            service_status: "active",
        }
    }

    pub fn reset_statistics(&self) {
        self.stats.reset();
        info!("Palindrome service statistics reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::metrics::OUTCOME_ERROR;

    fn service() -> PalindromeService {
        PalindromeService::new(Arc::new(ServiceMetrics::new().unwrap()))
    }

    fn words(list: &[&str]) -> PalindromeRequest {
        PalindromeRequest {
            words: list.iter().map(|w| w.to_string()).collect(),
        }
    }

    #[test]
    fn test_find_palindrome_pairs() {
        let svc = service();
        let resp = svc.find_palindrome_pairs(&words(&["lls", "s", "sssll"]));
        assert_eq!(resp.word_count, 3);
        assert_eq!(resp.pairs_count, 2);
        assert_eq!(resp.statistics.palindrome_pairs_count, 2);
        assert!(resp.statistics.has_palindromes);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["pairs"], serde_json::json!([[0, 2], [1, 0]]));
    }

    #[test]
    fn test_statistics_accumulate() {
        let svc = service();
        svc.find_palindrome_pairs(&words(&["race", "car"]));
        svc.find_palindrome_pairs(&words(&["abc", "def", "ghi"]));
        let stats = svc.get_statistics();
        assert_eq!(stats.total_calls, 2);
        assert_eq!(stats.total_pairs_found, 1);
        assert_eq!(stats.total_words_processed, 5);
        assert_eq!(stats.average_pairs_per_call, 0.5);
        assert_eq!(stats.average_words_per_call, 2.5);
    }

    #[test]
    fn test_untracked_operations() {
        let svc = service();
        let check = svc.check_palindrome(&PalindromeCheckRequest {
            text: "racecar".to_string(),
        });
        assert!(check.is_palindrome);
        assert_eq!(check.text, "racecar");
        svc.find_longest_palindrome_pair(&words(&["ab", "ba"]));
        assert_eq!(svc.get_statistics().total_calls, 0);
    }

    #[test]
    fn test_longest_found() {
        let svc = service();
        let resp = svc.find_longest_palindrome_pair(&words(&["race", "car", "da", "d"]));
        assert!(resp.found);
        assert_eq!(resp.indices, Some([0, 1]));
        assert_eq!(resp.palindrome.as_deref(), Some("racecar"));
        assert_eq!(resp.length, Some(7));
        assert_eq!(
            resp.words,
            Some(["race".to_string(), "car".to_string()])
        );
    }

    #[test]
    fn test_longest_not_found() {
        let svc = service();
        let resp = svc.find_longest_palindrome_pair(&words(&["abc", "xyz"]));
        assert!(!resp.found);
        assert_eq!(resp.message.as_deref(), Some("No palindrome pairs found"));
        assert!(resp.indices.is_none());
    }

    #[test]
    fn test_reset_statistics() {
        let svc = service();
        svc.find_palindrome_pairs(&words(&["a", "a"]));
        svc.reset_statistics();
        let stats = svc.get_statistics();
        assert_eq!(stats.total_calls, 0);
        assert_eq!(stats.total_pairs_found, 0);
        assert_eq!(stats.average_pairs_per_call, 0.0);
    }

    #[test]
    fn test_rejection_counts_as_error() {
        let svc = service();
        let err = svc.reject(
            CHECK_SERVICE_NAME,
            AlgoError::PalindromeOperation("Input must be a string".to_string()),
        );
        assert!(matches!(err, AlgoError::PalindromeOperation(_)));
        assert_eq!(svc.metrics.call_count(CHECK_SERVICE_NAME, OUTCOME_ERROR), 1);
        assert_eq!(svc.metrics.call_count(PAIRS_SERVICE_NAME, OUTCOME_ERROR), 0);
        assert_eq!(svc.get_statistics().total_calls, 0);
    }
}
