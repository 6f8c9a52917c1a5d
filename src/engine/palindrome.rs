//! Palindrome pair discovery.
//!
//! Pairs are found by testing every ordered index pair `(i, j)`, `i != j`,
//! which costs O(n²·k) for n words of average length k. Comparison is exact
//! on `char`s: no case folding, whitespace stripping or Unicode normalization.

use std::collections::HashSet;

use log::debug;
use serde::Serialize;

/// Maximum number of example pairs carried in [`PalindromeStatistics`].
pub const MAX_EXAMPLES: usize = 5;

/// Ordered index pair whose words, concatenated in order, form a palindrome.
///
/// Serializes as a two-element array `[i, j]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PalindromePair(pub usize, pub usize);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairExample {
    pub indices: (usize, usize),
    pub words: (String, String),
    pub palindrome: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PalindromeStatistics {
    pub total_words: usize,
    pub palindrome_pairs_count: usize,
    pub unique_words_in_pairs: usize,
    pub examples: Vec<PairExample>,
    pub has_palindromes: bool,
}

/// The pair with the longest concatenation, measured in chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongestPair {
    pub index1: usize,
    pub index2: usize,
    pub length: usize,
}

/// Two-pointer palindrome test over `s`.
pub fn is_palindrome(s: &str) -> bool {
    is_mirrored(s.chars())
}

/// Tests `first + second` without allocating the concatenation.
fn concat_is_palindrome(first: &str, second: &str) -> bool {
    is_mirrored(first.chars().chain(second.chars()))
}

fn is_mirrored<I>(mut chars: I) -> bool
where
    I: DoubleEndedIterator<Item = char>,
{
    loop {
        match (chars.next(), chars.next_back()) {
            (Some(front), Some(back)) if front != back => return false,
            (Some(_), Some(_)) => continue,
            _ => return true,
        }
    }
}

/// Finds every ordered pair `(i, j)`, `i != j`, where `words[i] + words[j]`
/// is a palindrome. Pairs come back in discovery order: `i` ascending in the
/// outer loop, `j` ascending in the inner loop.
pub fn find_pairs<S: AsRef<str>>(words: &[S]) -> Vec<PalindromePair> {
    debug!("Finding palindrome pairs for {} words", words.len());

    if words.len() < 2 {
        debug!("Less than 2 words provided, returning empty result");
        return Vec::new();
    }

    let mut pairs = Vec::new();
    for (i, first) in words.iter().enumerate() {
        for (j, second) in words.iter().enumerate() {
            if i != j && concat_is_palindrome(first.as_ref(), second.as_ref()) {
                pairs.push(PalindromePair(i, j));
            }
        }
    }

    debug!("Found {} palindrome pairs", pairs.len());
    pairs
}

/// Aggregate statistics over all pairs in `words`. One-shot form of
/// [`summarize`] for callers that have not run [`find_pairs`] yet.
pub fn statistics<S: AsRef<str>>(words: &[S]) -> PalindromeStatistics {
    let pairs = find_pairs(words);
    summarize(words, &pairs)
}

/// Builds statistics from pairs already produced by [`find_pairs`] for the
/// same `words`.
pub fn summarize<S: AsRef<str>>(words: &[S], pairs: &[PalindromePair]) -> PalindromeStatistics {
    let unique: HashSet<usize> = pairs.iter().flat_map(|p| [p.0, p.1]).collect();

    let examples = pairs
        .iter()
        .take(MAX_EXAMPLES)
        .map(|&PalindromePair(i, j)| {
            let (first, second) = (words[i].as_ref(), words[j].as_ref());
            PairExample {
                indices: (i, j),
                words: (first.to_string(), second.to_string()),
                palindrome: format!("{first}{second}"),
            }
        })
        .collect();

    PalindromeStatistics {
        total_words: words.len(),
        palindrome_pairs_count: pairs.len(),
        unique_words_in_pairs: unique.len(),
        examples,
        has_palindromes: !pairs.is_empty(),
    }
}

/// Finds the pair whose concatenation is longest. Ties keep the pair
/// discovered first.
pub fn longest_pair<S: AsRef<str>>(words: &[S]) -> Option<LongestPair> {
    let mut best: Option<LongestPair> = None;

    for PalindromePair(i, j) in find_pairs(words) {
        let length = words[i].as_ref().chars().count() + words[j].as_ref().chars().count();
        if best.map_or(true, |b| length > b.length) {
            best = Some(LongestPair {
                index1: i,
                index2: j,
                length,
            });
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;

    #[test]
    fn test_is_palindrome() {
        assert!(is_palindrome(""));
        assert!(is_palindrome("a"));
        assert!(is_palindrome("racecar"));
        assert!(is_palindrome("abba"));
        assert!(!is_palindrome("hello"));
        assert!(!is_palindrome("Aa"));
        assert!(!is_palindrome("a a "));
        assert!(is_palindrome("été"));
        assert!(!is_palindrome("ab"));
    }

    #[test]
    fn test_is_palindrome_reverse_invariant() {
        for s in ["", "x", "ab", "aba", "abca", "lls", "sssll", "ñaña"] {
            let reversed: String = s.chars().rev().collect();
            assert_eq!(is_palindrome(s), is_palindrome(&reversed), "{s}");
        }
    }

    #[test]
    fn test_race_car() {
        let pairs = find_pairs(&["race", "car"]);
        assert!(pairs.contains(&PalindromePair(0, 1)));
        assert!(!pairs.contains(&PalindromePair(1, 0)));
    }

    #[test]
    fn test_no_pairs() {
        assert!(find_pairs(&["abc", "def", "ghi"]).is_empty());
    }

    #[test]
    fn test_fewer_than_two_words() {
        let empty: [&str; 0] = [];
        assert!(find_pairs(&empty).is_empty());
        assert!(find_pairs(&["a"]).is_empty());
    }

    #[test]
    fn test_discovery_order() {
        let words = ["abcd", "dcba", "lls", "s", "sssll"];
        assert_eq!(
            find_pairs(&words),
            vec![
                PalindromePair(0, 1),
                PalindromePair(1, 0),
                PalindromePair(2, 4),
                PalindromePair(3, 2),
            ]
        );
    }

    #[test]
    fn test_empty_string_pairs_with_palindromes() {
        let pairs = find_pairs(&["a", ""]);
        assert_eq!(pairs, vec![PalindromePair(0, 1), PalindromePair(1, 0)]);
    }

    #[test]
    fn test_duplicates_pair_with_each_other() {
        let pairs = find_pairs(&["ab", "ab", "ba"]);
        assert_eq!(
            pairs,
            vec![
                PalindromePair(0, 2),
                PalindromePair(1, 2),
                PalindromePair(2, 0),
                PalindromePair(2, 1),
            ]
        );
    }

    #[test]
    fn test_pairs_match_definition() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let n = rng.gen_range(0..7);
            let words: Vec<String> = (0..n)
                .map(|_| {
                    let len = rng.gen_range(0..4);
                    (0..len).map(|_| ['a', 'b'][rng.gen_range(0..2)]).collect()
                })
                .collect();
            let pairs = find_pairs(&words);
            for i in 0..n {
                for j in 0..n {
                    let expected =
                        i != j && is_palindrome(&format!("{}{}", words[i], words[j]));
                    assert_eq!(
                        pairs.contains(&PalindromePair(i, j)),
                        expected,
                        "words={words:?} i={i} j={j}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_longest_pair() {
        assert_eq!(
            longest_pair(&["race", "car", "da", "d"]),
            Some(LongestPair {
                index1: 0,
                index2: 1,
                length: 7
            })
        );
        assert_eq!(longest_pair(&["abc", "def"]), None);
    }

    #[test]
    fn test_longest_pair_tie_keeps_first() {
        // (0, 1) "abba" and (1, 0) "baab" tie at length 4
        assert_eq!(
            longest_pair(&["ab", "ba"]),
            Some(LongestPair {
                index1: 0,
                index2: 1,
                length: 4
            })
        );
    }

    #[test]
    fn test_statistics() {
        let stats = statistics(&["lls", "s", "sssll", "xyz"]);
        assert_eq!(stats.total_words, 4);
        assert_eq!(stats.palindrome_pairs_count, 2);
        assert_eq!(stats.unique_words_in_pairs, 3);
        assert!(stats.has_palindromes);
        assert_eq!(stats.examples.len(), 2);
        assert_eq!(stats.examples[0].indices, (0, 2));
        assert_eq!(stats.examples[0].palindrome, "llssssll");
        assert_eq!(stats.examples[1].words, ("s".to_string(), "lls".to_string()));
    }

    #[test]
    fn test_statistics_caps_examples() {
        let words = ["a", "a", "a", "a"];
        let stats = statistics(&words);
        assert_eq!(stats.palindrome_pairs_count, 12);
        assert_eq!(stats.examples.len(), MAX_EXAMPLES);
        assert_eq!(stats.unique_words_in_pairs, 4);
    }

    #[test]
    fn test_statistics_without_pairs() {
        let stats = statistics(&["abc"]);
        assert_eq!(stats.total_words, 1);
        assert!(!stats.has_palindromes);
        assert!(stats.examples.is_empty());
    }

    #[test]
    fn test_pair_serializes_as_array() {
        let json = serde_json::to_string(&PalindromePair(2, 0)).unwrap();
        assert_eq!(json, "[2,0]");
    }
}
