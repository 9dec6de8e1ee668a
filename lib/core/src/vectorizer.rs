//! Text to sparse term-count vectors over a fixed vocabulary.

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use crate::{Error, Result, SparseVector};

/// Maps free text into the corpus feature space
pub trait Vectorizer: Send + Sync {
    fn transform(&self, text: &str) -> SparseVector;

    /// Width of every vector `transform` returns
    fn n_features(&self) -> usize;
}

/// Stop word handling
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum StopWords {
    #[default]
    None,
    /// Built-in English list
    English,
    Custom(Vec<String>),
}

impl StopWords {
    fn to_set(&self) -> AHashSet<String> {
        match self {
            StopWords::None => AHashSet::new(),
            StopWords::English => ENGLISH_STOP_WORDS.iter().map(|w| w.to_string()).collect(),
            StopWords::Custom(words) => words.iter().map(|w| w.to_lowercase()).collect(),
        }
    }
}

/// Serialized form of a [`CountVectorizer`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VectorizerParams {
    /// term -> column
    pub vocabulary: BTreeMap<String, u32>,
    #[serde(default = "default_lowercase")]
    pub lowercase: bool,
    #[serde(default)]
    pub stop_words: StopWords,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default)]
    pub binary: bool,
}

fn default_lowercase() -> bool {
    true
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

impl VectorizerParams {
    /// Parameters with default options for the given vocabulary
    pub fn new<I, S>(vocabulary: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        Self {
            vocabulary: vocabulary.into_iter().map(|(t, c)| (t.into(), c)).collect(),
            lowercase: default_lowercase(),
            stop_words: StopWords::None,
            ngram_range: default_ngram_range(),
            binary: false,
        }
    }

    #[must_use]
    pub fn with_stop_words(mut self, stop_words: StopWords) -> Self {
        self.stop_words = stop_words;
        self
    }

    #[must_use]
    pub fn with_ngram_range(mut self, min_n: usize, max_n: usize) -> Self {
        self.ngram_range = (min_n, max_n);
        self
    }

    #[must_use]
    pub fn with_binary(mut self, binary: bool) -> Self {
        self.binary = binary;
        self
    }

    #[must_use]
    pub fn with_lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }
}

/// Bag-of-words term counter.
///
/// The vocabulary is supplied pre-built; columns must be exactly
/// `0..vocabulary.len()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "VectorizerParams", into = "VectorizerParams")]
pub struct CountVectorizer {
    vocabulary: AHashMap<String, u32>,
    stop_set: AHashSet<String>,
    params: VectorizerParams,
}

impl CountVectorizer {
    pub fn from_params(params: VectorizerParams) -> Result<Self> {
        let (min_n, max_n) = params.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(Error::InvalidVectorizer(format!(
                "invalid ngram range ({}, {})",
                min_n, max_n
            )));
        }

        let mut columns: Vec<u32> = params.vocabulary.values().copied().collect();
        columns.sort_unstable();
        if let Some((expected, &actual)) = columns
            .iter()
            .enumerate()
            .find(|&(i, &c)| c as usize != i)
        {
            return Err(Error::InvalidVectorizer(format!(
                "vocabulary columns must be 0..{} without gaps; found {} where {} was expected",
                columns.len(),
                actual,
                expected
            )));
        }

        Ok(Self {
            vocabulary: params
                .vocabulary
                .iter()
                .map(|(t, &c)| (t.clone(), c))
                .collect(),
            stop_set: params.stop_words.to_set(),
            params,
        })
    }

    /// Vocabulary with columns assigned in the given order
    pub fn from_terms<S: AsRef<str>>(terms: &[S]) -> Result<Self> {
        let vocabulary = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.as_ref().to_string(), i as u32));
        Self::from_params(VectorizerParams::new(vocabulary))
    }

    #[inline]
    #[must_use]
    pub fn params(&self) -> &VectorizerParams {
        &self.params
    }

    /// Column of a term, if it is in the vocabulary
    #[inline]
    pub fn column(&self, term: &str) -> Option<u32> {
        self.vocabulary.get(term).copied()
    }

    /// Split text into tokens: maximal runs of alphanumerics or `_`,
    /// at least two characters long, stop words removed.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let text = if self.params.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|s| s.chars().count() > 1)
            .filter(|s| !self.stop_set.contains(*s))
            .map(|s| s.to_string())
            .collect()
    }

    /// Tokens plus the configured n-grams, joined by single spaces
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let tokens = self.tokenize(text);
        let (min_n, max_n) = self.params.ngram_range;
        if min_n == 1 && max_n == 1 {
            return tokens;
        }

        let mut terms = Vec::new();
        for n in min_n..=max_n.min(tokens.len()) {
            terms.extend(tokens.windows(n).map(|w| w.join(" ")));
        }
        terms
    }
}

impl Vectorizer for CountVectorizer {
    fn transform(&self, text: &str) -> SparseVector {
        let mut counts: AHashMap<u32, f32> = AHashMap::new();
        for term in self.analyze(text) {
            if let Some(col) = self.column(&term) {
                *counts.entry(col).or_insert(0.0) += 1.0;
            }
        }
        if self.params.binary {
            counts.values_mut().for_each(|v| *v = 1.0);
        }

        let dim = self.n_features();
        let mut pairs: Vec<(u32, f32)> = counts.into_iter().collect();
        pairs.sort_by_key(|&(c, _)| c);
        // columns come from the validated vocabulary, so every index fits
        SparseVector::from_pairs(dim, pairs).unwrap_or_else(|_| SparseVector::zeros(dim))
    }

    #[inline]
    fn n_features(&self) -> usize {
        self.vocabulary.len()
    }
}

impl TryFrom<VectorizerParams> for CountVectorizer {
    type Error = Error;

    fn try_from(params: VectorizerParams) -> Result<Self> {
        Self::from_params(params)
    }
}

impl From<CountVectorizer> for VectorizerParams {
    fn from(v: CountVectorizer) -> Self {
        v.params
    }
}

/// English stop words as used by common count vectorizers
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst",
    "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone", "anything", "anyway",
    "anywhere", "are", "around", "as", "at", "back", "be", "became", "because", "become",
    "becomes", "becoming", "been", "before", "beforehand", "behind", "being", "below", "beside",
    "besides", "between", "beyond", "bill", "both", "bottom", "but", "by", "call", "can", "cannot",
    "cant", "co", "con", "could", "couldnt", "cry", "de", "describe", "detail", "do", "done",
    "down", "due", "during", "each", "eg", "eight", "either", "eleven", "else", "elsewhere",
    "empty", "enough", "etc", "even", "ever", "every", "everyone", "everything", "everywhere",
    "except", "few", "fifteen", "fifty", "fill", "find", "fire", "first", "five", "for", "former",
    "formerly", "forty", "found", "four", "from", "front", "full", "further", "get", "give", "go",
    "had", "has", "hasnt", "have", "he", "hence", "her", "here", "hereafter", "hereby", "herein",
    "hereupon", "hers", "herself", "him", "himself", "his", "how", "however", "hundred", "i", "ie",
    "if", "in", "inc", "indeed", "interest", "into", "is", "it", "its", "itself", "keep", "last",
    "latter", "latterly", "least", "less", "ltd", "made", "many", "may", "me", "meanwhile",
    "might", "mill", "mine", "more", "moreover", "most", "mostly", "move", "much", "must", "my",
    "myself", "name", "namely", "neither", "never", "nevertheless", "next", "nine", "no", "nobody",
    "none", "noone", "nor", "not", "nothing", "now", "nowhere", "of", "off", "often", "on", "once",
    "one", "only", "onto", "or", "other", "others", "otherwise", "our", "ours", "ourselves", "out",
    "over", "own", "part", "per", "perhaps", "please", "put", "rather", "re", "same", "see",
    "seem", "seemed", "seeming", "seems", "serious", "several", "she", "should", "show", "side",
    "since", "sincere", "six", "sixty", "so", "some", "somehow", "someone", "something",
    "sometime", "sometimes", "somewhere", "still", "such", "system", "take", "ten", "than",
    "that", "the", "their", "them", "themselves", "then", "thence", "there", "thereafter",
    "thereby", "therefore", "therein", "thereupon", "these", "they", "thick", "thin", "third",
    "this", "those", "though", "three", "through", "throughout", "thru", "thus", "to", "together",
    "too", "top", "toward", "towards", "twelve", "twenty", "two", "un", "under", "until", "up",
    "upon", "us", "very", "via", "was", "we", "well", "were", "what", "whatever", "when", "whence",
    "whenever", "where", "whereafter", "whereas", "whereby", "wherein", "whereupon", "wherever",
    "whether", "which", "while", "whither", "who", "whoever", "whole", "whom", "whose", "why",
    "will", "with", "within", "without", "would", "yet", "you", "your", "yours", "yourself",
    "yourselves",
];
