//! Typed requests and responses for the tracked services.
//!
//! Requests are built from a decoded JSON body through an explicit, fallible
//! parse step. Shape problems (missing field, wrong container type) are
//! field-scoped validation errors; bad elements inside a list fail with the
//! operation error of the engine that would have rejected them.

use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use crate::{
    array_error,
    core::{AlgoError, AlgoResult},
    engine::palindrome::{PalindromePair, PalindromeStatistics},
    palindrome_error,
};

fn as_object(value: &JsonValue) -> AlgoResult<&Map<String, JsonValue>> {
    value
        .as_object()
        .ok_or_else(|| AlgoError::validation_unscoped("Request data must be a JSON object"))
}

fn required<'a>(obj: &'a Map<String, JsonValue>, field: &str) -> AlgoResult<&'a JsonValue> {
    obj.get(field).ok_or_else(|| {
        AlgoError::validation(field, format!("Missing required field '{field}'"))
    })
}

fn required_list<'a>(
    obj: &'a Map<String, JsonValue>,
    field: &str,
) -> AlgoResult<&'a Vec<JsonValue>> {
    required(obj, field)?
        .as_array()
        .ok_or_else(|| AlgoError::validation(field, format!("Field '{field}' must be a list")))
}

/// JSON type name used in element error messages.
fn json_type(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

fn numeric_list(items: &[JsonValue], field: &str) -> AlgoResult<Vec<f64>> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            item.as_f64().ok_or_else(|| {
                array_error!(
                    "Array '{}' contains invalid value at index {}: {}. Only integers and floats are allowed.",
                    field,
                    index,
                    item
                )
            })
        })
        .collect()
}

fn string_list(items: &[JsonValue]) -> AlgoResult<Vec<String>> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| match item {
            JsonValue::String(s) => Ok(s.clone()),
            other => Err(palindrome_error!(
                "All items must be strings. Item at index {} is {}",
                index,
                json_type(other)
            )),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct MedianRequest {
    pub nums1: Vec<f64>,
    pub nums2: Vec<f64>,
}

impl MedianRequest {
    pub fn from_json(value: &JsonValue) -> AlgoResult<Self> {
        let obj = as_object(value)?;
        let nums1 = required_list(obj, "nums1")?;
        let nums2 = required_list(obj, "nums2")?;
        Ok(Self {
            nums1: numeric_list(nums1, "nums1")?,
            nums2: numeric_list(nums2, "nums2")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MedianResponse {
    pub median: f64,
    pub array1_size: usize,
    pub array2_size: usize,
    pub total_elements: usize,
    pub execution_time_ms: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PalindromeRequest {
    pub words: Vec<String>,
}

impl PalindromeRequest {
    pub fn from_json(value: &JsonValue) -> AlgoResult<Self> {
        let obj = as_object(value)?;
        let words = required_list(obj, "words")?;
        Ok(Self {
            words: string_list(words)?,
        })
    }

    /// Batch operations default a missing `words` to an empty list.
    pub fn from_operation(op: &Map<String, JsonValue>) -> AlgoResult<Self> {
        match op.get("words") {
            None => Ok(Self { words: Vec::new() }),
            Some(JsonValue::Array(items)) => Ok(Self {
                words: string_list(items)?,
            }),
            Some(_) => Err(AlgoError::validation("words", "Field 'words' must be a list")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PalindromeCheckRequest {
    pub text: String,
}

impl PalindromeCheckRequest {
    pub fn from_json(value: &JsonValue) -> AlgoResult<Self> {
        let obj = as_object(value)?;
        Self::from_text_value(required(obj, "text")?)
    }

    /// Batch operations default a missing `text` to the empty string.
    pub fn from_operation(op: &Map<String, JsonValue>) -> AlgoResult<Self> {
        match op.get("text") {
            None => Ok(Self {
                text: String::new(),
            }),
            Some(value) => Self::from_text_value(value),
        }
    }

    fn from_text_value(value: &JsonValue) -> AlgoResult<Self> {
        match value {
            JsonValue::String(text) => Ok(Self { text: text.clone() }),
            _ => Err(palindrome_error!("Input must be a string")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PalindromeResponse {
    pub pairs: Vec<PalindromePair>,
    pub word_count: usize,
    pub pairs_count: usize,
    pub execution_time_ms: f64,
    pub statistics: PalindromeStatistics,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PalindromeCheckResponse {
    pub text: String,
    pub is_palindrome: bool,
    pub execution_time_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongestPairResponse {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indices: Option<[usize; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub words: Option<[String; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub palindrome: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    pub execution_time_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MedianServiceStatistics {
    pub total_calls: u64,
    pub total_execution_time_ms: f64,
    pub average_execution_time_ms: f64,
    pub service_status: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PalindromeServiceStatistics {
    pub total_calls: u64,
    pub total_execution_time_ms: f64,
    pub average_execution_time_ms: f64,
    pub total_pairs_found: u64,
    pub total_words_processed: u64,
    pub average_pairs_per_call: f64,
    pub average_words_per_call: f64,
    pub service_status: &'static str,
}

/// Per-item outcome in a batch response, flattened next to the item index.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BatchOutcome<T> {
    Success(T),
    Error {
        error_message: String,
        error_type: &'static str,
    },
}

impl<T> BatchOutcome<T> {
    pub fn from_result(result: AlgoResult<T>) -> Self {
        match result {
            Ok(value) => BatchOutcome::Success(value),
            Err(e) => BatchOutcome::Error {
                error_message: e.message(),
                error_type: e.type_name(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, BatchOutcome::Success(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MedianBatchItem {
    pub index: usize,
    #[serde(flatten)]
    pub outcome: BatchOutcome<MedianResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MedianBatchResponse {
    pub results: Vec<MedianBatchItem>,
    pub total_calculations: usize,
    pub successful_calculations: usize,
    pub failed_calculations: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PalindromeOperationResult {
    Pairs(PalindromeResponse),
    Check(PalindromeCheckResponse),
    Longest(LongestPairResponse),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultEnvelope<T> {
    pub result: T,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PalindromeBatchItem {
    pub index: usize,
    #[serde(rename = "type")]
    pub op_type: Option<String>,
    #[serde(flatten)]
    pub outcome: BatchOutcome<ResultEnvelope<PalindromeOperationResult>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PalindromeBatchResponse {
    pub results: Vec<PalindromeBatchItem>,
    pub total_operations: usize,
    pub successful_operations: usize,
    pub failed_operations: usize,
}
