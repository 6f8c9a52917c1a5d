//! Batch endpoints: plain loops over the single-item tracked calls.
//!
//! Each item is parsed and executed independently; a failing item is reported
//! in place and does not stop the rest of the batch. Results keep input order.

use log::{info, warn};
use serde_json::Value as JsonValue;

use super::{
    dto::{
        BatchOutcome, MedianBatchItem, MedianBatchResponse, MedianRequest,
        PalindromeBatchItem, PalindromeBatchResponse, PalindromeCheckRequest,
        PalindromeOperationResult, PalindromeRequest, ResultEnvelope,
    },
    median::MedianService,
    palindrome::{
        PalindromeService, BATCH_SERVICE_NAME, CHECK_SERVICE_NAME, LONGEST_SERVICE_NAME,
        PAIRS_SERVICE_NAME,
    },
};
use crate::core::{AlgoError, AlgoResult};

/// Error code reported when a batch exceeds its configured limit.
pub const BATCH_SIZE_ERROR: &str = "BATCH_SIZE_ERROR";

/// Rejected batch envelope: either a malformed body or too many items.
#[derive(Debug)]
pub enum BatchRejection {
    Invalid(AlgoError),
    TooLarge { limit: usize, noun: &'static str },
}

impl BatchRejection {
    pub fn message(&self) -> String {
        match self {
            BatchRejection::Invalid(e) => e.message(),
            BatchRejection::TooLarge { limit, noun } => {
                format!("Batch size cannot exceed {limit} {noun}")
            }
        }
    }
}

fn batch_items<'a>(
    body: &'a JsonValue,
    field: &str,
    limit: usize,
    noun: &'static str,
) -> Result<&'a Vec<JsonValue>, BatchRejection> {
    let items = body
        .get(field)
        .and_then(JsonValue::as_array)
        .ok_or_else(|| {
            BatchRejection::Invalid(AlgoError::validation(
                field,
                format!("Request must contain '{field}' array"),
            ))
        })?;

    if items.len() > limit {
        warn!("Rejected batch of {} {noun}, limit is {limit}", items.len());
        return Err(BatchRejection::TooLarge { limit, noun });
    }
    Ok(items)
}

pub fn run_median_batch(
    service: &MedianService,
    body: &JsonValue,
    limit: usize,
) -> Result<MedianBatchResponse, BatchRejection> {
    let calculations = batch_items(body, "calculations", limit, "calculations")?;
    info!("Processing median batch of {} calculations", calculations.len());

    let results: Vec<MedianBatchItem> = calculations
        .iter()
        .enumerate()
        .map(|(index, calc)| MedianBatchItem {
            index,
            outcome: BatchOutcome::from_result(
                MedianRequest::from_json(calc)
                    .map_err(|e| service.reject(e))
                    .and_then(|req| service.calculate_median(&req)),
            ),
        })
        .collect();

    let successful = results.iter().filter(|r| r.outcome.is_success()).count();
    Ok(MedianBatchResponse {
        total_calculations: results.len(),
        successful_calculations: successful,
        failed_calculations: results.len() - successful,
        results,
    })
}

pub fn run_palindrome_batch(
    service: &PalindromeService,
    body: &JsonValue,
    limit: usize,
) -> Result<PalindromeBatchResponse, BatchRejection> {
    let operations = batch_items(body, "operations", limit, "operations")?;
    info!("Processing palindrome batch of {} operations", operations.len());

    let results: Vec<PalindromeBatchItem> = operations
        .iter()
        .enumerate()
        .map(|(index, op)| {
            let op_type = op
                .get("type")
                .and_then(JsonValue::as_str)
                .map(str::to_string);
            let outcome = BatchOutcome::from_result(
                run_operation(service, op, op_type.as_deref())
                    .map(|result| ResultEnvelope { result }),
            );
            PalindromeBatchItem {
                index,
                op_type,
                outcome,
            }
        })
        .collect();

    let successful = results.iter().filter(|r| r.outcome.is_success()).count();
    Ok(PalindromeBatchResponse {
        total_operations: results.len(),
        successful_operations: successful,
        failed_operations: results.len() - successful,
        results,
    })
}

fn run_operation(
    service: &PalindromeService,
    op: &JsonValue,
    op_type: Option<&str>,
) -> AlgoResult<PalindromeOperationResult> {
    let op = op.as_object().ok_or_else(|| {
        service.reject(
            BATCH_SERVICE_NAME,
            AlgoError::validation_unscoped("Operation must be a JSON object"),
        )
    })?;

    match op_type {
        Some("pairs") => {
            let req = PalindromeRequest::from_operation(op)
                .map_err(|e| service.reject(PAIRS_SERVICE_NAME, e))?;
            Ok(PalindromeOperationResult::Pairs(
                service.find_palindrome_pairs(&req),
            ))
        }
        Some("check") => {
            let req = PalindromeCheckRequest::from_operation(op)
                .map_err(|e| service.reject(CHECK_SERVICE_NAME, e))?;
            Ok(PalindromeOperationResult::Check(service.check_palindrome(&req)))
        }
        Some("longest") => {
            let req = PalindromeRequest::from_operation(op)
                .map_err(|e| service.reject(LONGEST_SERVICE_NAME, e))?;
            Ok(PalindromeOperationResult::Longest(
                service.find_longest_palindrome_pair(&req),
            ))
        }
        other => Err(service.reject(
            BATCH_SERVICE_NAME,
            AlgoError::validation(
                "type",
                format!("Unknown operation type: {}", other.unwrap_or("null")),
            ),
        )),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::service::metrics::{ServiceMetrics, OUTCOME_ERROR};

    fn metrics() -> Arc<ServiceMetrics> {
        Arc::new(ServiceMetrics::new().unwrap())
    }

    #[test]
    fn test_median_batch_mixed() {
        let svc = MedianService::new(metrics());
        let body = json!({"calculations": [
            {"nums1": [1, 3], "nums2": [2, 4]},
            {"nums1": [3, 1], "nums2": []},
            {"nums1": [1, 2]},
        ]});
        let resp = run_median_batch(&svc, &body, 100).unwrap();
        assert_eq!(resp.total_calculations, 3);
        assert_eq!(resp.successful_calculations, 1);
        assert_eq!(resp.failed_calculations, 2);

        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["results"][0]["median"], 2.5);
        assert_eq!(value["results"][1]["error_type"], "ArrayOperationError");
        assert_eq!(value["results"][2]["error_type"], "ValidationError");
        assert_eq!(svc.get_statistics().total_calls, 1);
    }

    #[test]
    fn test_median_batch_missing_array() {
        let svc = MedianService::new(metrics());
        let err = run_median_batch(&svc, &json!({"calc": []}), 100).unwrap_err();
        assert!(matches!(err, BatchRejection::Invalid(AlgoError::Validation { .. })));
        assert_eq!(err.message(), "Request must contain 'calculations' array");
    }

    #[test]
    fn test_median_batch_limit() {
        let svc = MedianService::new(metrics());
        let calcs: Vec<_> = (0..3).map(|_| json!({"nums1": [1], "nums2": [2]})).collect();
        let err = run_median_batch(&svc, &json!({ "calculations": calcs }), 2).unwrap_err();
        assert_eq!(err.message(), "Batch size cannot exceed 2 calculations");
        assert_eq!(svc.get_statistics().total_calls, 0);
    }

    #[test]
    fn test_palindrome_batch() {
        let svc = PalindromeService::new(metrics());
        let body = json!({"operations": [
            {"type": "pairs", "words": ["abc", "cba"]},
            {"type": "check", "text": "racecar"},
            {"type": "longest", "words": ["ab", "ba", "xyz"]},
            {"type": "reverse", "text": "abc"},
            {"type": "pairs", "words": ["a", 2]},
        ]});
        let resp = run_palindrome_batch(&svc, &body, 50).unwrap();
        assert_eq!(resp.total_operations, 5);
        assert_eq!(resp.successful_operations, 3);
        assert_eq!(resp.failed_operations, 2);

        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["results"][0]["type"], "pairs");
        assert_eq!(value["results"][0]["status"], "success");
        assert_eq!(value["results"][0]["result"]["pairs_count"], 2);
        assert_eq!(value["results"][1]["result"]["is_palindrome"], true);
        assert_eq!(value["results"][2]["result"]["palindrome"], "abba");
        assert_eq!(value["results"][3]["error_type"], "ValidationError");
        assert_eq!(
            value["results"][3]["error_message"],
            "Unknown operation type: reverse"
        );
        assert_eq!(value["results"][4]["error_type"], "PalindromeOperationError");
    }

    #[test]
    fn test_palindrome_batch_limit() {
        let svc = PalindromeService::new(metrics());
        let ops: Vec<_> = (0..4).map(|_| json!({"type": "check", "text": "a"})).collect();
        let err = run_palindrome_batch(&svc, &json!({ "operations": ops }), 3).unwrap_err();
        assert!(matches!(err, BatchRejection::TooLarge { limit: 3, .. }));
    }

    #[test]
    fn test_batch_failures_reach_error_metric() {
        let metrics = metrics();

        let median = MedianService::new(metrics.clone());
        let body = json!({"calculations": [
            {"nums1": [1]},
            {"nums1": [], "nums2": []},
        ]});
        run_median_batch(&median, &body, 100).unwrap();
        assert_eq!(metrics.call_count("median", OUTCOME_ERROR), 2);

        let palindrome = PalindromeService::new(metrics.clone());
        let body = json!({"operations": [
            {"type": "pairs", "words": ["a", 2]},
            {"type": "reverse"},
            {"type": "check", "text": "aa"},
        ]});
        run_palindrome_batch(&palindrome, &body, 50).unwrap();
        assert_eq!(metrics.call_count(PAIRS_SERVICE_NAME, OUTCOME_ERROR), 1);
        assert_eq!(metrics.call_count(BATCH_SERVICE_NAME, OUTCOME_ERROR), 1);
        assert_eq!(metrics.call_count(CHECK_SERVICE_NAME, OUTCOME_ERROR), 0);
    }
}
