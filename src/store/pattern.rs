use crate::core::{Result, StoreError};
use lru::LruCache;
use regex::Regex;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

const REGEX_CACHE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(200) {
    Some(capacity) => capacity,
    None => panic!("regex cache capacity must be non-zero"),
};

lazy_static::lazy_static! {
    static ref REGEX_LRU_CACHE: Arc<Mutex<LruCache<String, Arc<Regex>>>> =
        Arc::new(Mutex::new(LruCache::new(REGEX_CACHE_CAPACITY)));
}

/// Escapes `%`, `_` and `\` so that `literal` only ever matches itself.
pub fn escape_like(literal: &str) -> String {
    let mut escaped = String::with_capacity(literal.len());
    for c in literal.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// LIKE pattern matching any text that contains `literal`.
pub fn contains_pattern(literal: &str) -> String {
    format!("%{}%", escape_like(literal))
}

/// Translate a LIKE pattern into an anchored regular expression.
#[inline]
fn like_to_regex(pattern: &str) -> String {
    let mut regex = String::with_capacity(pattern.len() + 2);
    regex.push('^');

    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '%' => regex.push_str(".*"),
            '_' => regex.push('.'),
            '\\' => match chars.next() {
                Some(escaped) => regex.push_str(&regex::escape(&escaped.to_string())),
                None => regex.push_str(&regex::escape("\\")),
            },
            c => regex.push_str(&regex::escape(&c.to_string())),
        }
    }

    regex.push('$');
    regex
}

/// Answers simple patterns without building a regex.
///
/// Only patterns free of escapes qualify; anything else goes through the
/// cached regex path.
#[inline]
fn fast_path_like(text: &str, pattern: &str, case_sensitive: bool) -> Option<bool> {
    if pattern.contains('\\') || pattern.contains('_') {
        return None;
    }

    let eq = |a: &str, b: &str| {
        if case_sensitive {
            a == b
        } else {
            a.eq_ignore_ascii_case(b)
        }
    };
    let fold = |s: &str| {
        if case_sensitive {
            s.to_string()
        } else {
            s.to_lowercase()
        }
    };

    match pattern.matches('%').count() {
        0 => Some(eq(text, pattern)),
        1 if pattern.ends_with('%') => {
            let prefix = &pattern[..pattern.len() - 1];
            Some(fold(text).starts_with(&fold(prefix)))
        }
        1 if pattern.starts_with('%') => Some(fold(text).ends_with(&fold(&pattern[1..]))),
        2 if pattern.len() >= 2 && pattern.starts_with('%') && pattern.ends_with('%') => {
            let substring = &pattern[1..pattern.len() - 1];
            Some(fold(text).contains(&fold(substring)))
        }
        _ => None,
    }
}

fn get_or_compile_regex(pattern: &str, case_sensitive: bool) -> Result<Arc<Regex>> {
    let cache_key = if case_sensitive {
        format!("s:{pattern}")
    } else {
        format!("i:{pattern}")
    };

    if let Some(regex) = REGEX_LRU_CACHE.lock()?.get(&cache_key) {
        return Ok(Arc::clone(regex));
    }

    let compiled = regex::RegexBuilder::new(&like_to_regex(pattern))
        .case_insensitive(!case_sensitive)
        .build()
        .map_err(|e| StoreError::InvalidPattern(format!("{pattern}: {e}")))?;
    let compiled = Arc::new(compiled);

    REGEX_LRU_CACHE
        .lock()?
        .put(cache_key, Arc::clone(&compiled));

    Ok(compiled)
}

/// Evaluate `text LIKE pattern`.
#[inline]
pub fn eval_like(text: &str, pattern: &str, case_sensitive: bool) -> Result<bool> {
    if let Some(result) = fast_path_like(text, pattern, case_sensitive) {
        return Ok(result);
    }

    let regex = get_or_compile_regex(pattern, case_sensitive)?;
    Ok(regex.is_match(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_matches_substrings_case_sensitively() {
        let pattern = contains_pattern("ar");
        assert!(eval_like("Ragnar", &pattern, true).unwrap());
        assert!(!eval_like("RAGNAR", &pattern, true).unwrap());
        assert!(eval_like("RAGNAR", &pattern, false).unwrap());
    }

    #[test]
    fn wildcards_in_the_needle_are_literal() {
        let pattern = contains_pattern("a_b");
        assert!(eval_like("xa_by", &pattern, true).unwrap());
        assert!(!eval_like("xacby", &pattern, true).unwrap());

        let pattern = contains_pattern("50%");
        assert!(eval_like("only 50% done", &pattern, true).unwrap());
        assert!(!eval_like("only 500 done", &pattern, true).unwrap());
    }

    #[test]
    fn backslash_in_the_needle_is_literal() {
        let pattern = contains_pattern(r"a\b");
        assert!(eval_like(r"xa\by", &pattern, true).unwrap());
        assert!(!eval_like("xaby", &pattern, true).unwrap());
    }

    #[test]
    fn regex_metacharacters_are_escaped() {
        let pattern = contains_pattern("(.*)");
        assert!(eval_like("x(.*)y", &pattern, true).unwrap());
        assert!(!eval_like("anything", &pattern, true).unwrap());
    }

    #[test]
    fn empty_needle_matches_everything() {
        assert!(eval_like("", &contains_pattern(""), true).unwrap());
        assert!(eval_like("Ragnar", &contains_pattern(""), true).unwrap());
    }

    #[test]
    fn prefix_suffix_and_single_char_patterns() {
        assert!(eval_like("Ragnar", "Rag%", true).unwrap());
        assert!(eval_like("Ragnar", "%nar", true).unwrap());
        assert!(eval_like("Ragnar", "R_gnar", true).unwrap());
        assert!(!eval_like("Ragnar", "R_nar", true).unwrap());
        assert!(eval_like("Ragnar", "Ragnar", true).unwrap());
    }

    #[test]
    fn multibyte_text_is_handled() {
        let pattern = contains_pattern("жи");
        assert!(eval_like("Ёжик", &pattern, true).unwrap());
    }
}
