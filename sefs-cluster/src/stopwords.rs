//! Fixed English stopword list used by the namer's keyword-frequency
//! fallback (§4.5). Deliberately small and common-word only.

pub const STOPWORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "can", "had", "her", "was", "one",
    "our", "out", "day", "get", "has", "him", "his", "how", "man", "new", "now", "old", "see",
    "two", "way", "who", "boy", "did", "its", "let", "put", "say", "she", "too", "use", "with",
    "that", "this", "from", "they", "have", "more", "will", "your", "what", "when", "where",
    "which", "about", "into", "than", "then", "them", "these", "those", "such", "also", "been",
    "being", "does", "each", "only", "some", "over", "after", "under",
];

pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(&token)
}
