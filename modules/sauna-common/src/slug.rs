//! Human-readable URL segments for sauna names.
//!
//! Slugs are lossy: diacritics fold to ASCII and punctuation is dropped, so a
//! slug cannot be turned back into a name. Lookups go the other way instead:
//! the slug becomes a search term and [`resolve`] picks the first stored name
//! that plausibly matches it.

/// Fold the Swedish vowels onto their ASCII base letters.
fn fold(ch: char) -> char {
    match ch {
        'å' | 'ä' => 'a',
        'ö' => 'o',
        other => other,
    }
}

/// `Hellasgården Bastu` → `hellasgarden-bastu`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.to_lowercase().chars().map(fold) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            slug.push(ch);
        } else if (ch == '-' || ch.is_whitespace()) && !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// `hellasgarden-bastu` → `hellasgarden bastu`.
pub fn slug_to_search_term(slug: &str) -> String {
    slug.replace('-', " ").to_lowercase()
}

/// Reduce a stored name to lowercase ASCII words separated by single spaces.
/// Unlike [`slugify`], hyphens are dropped rather than kept as separators.
pub fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_space = false;
    for ch in name.to_lowercase().chars().map(fold) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(ch);
        } else if ch.is_whitespace() {
            pending_space = true;
        }
    }
    out
}

fn is_match(normalized: &str, term: &str) -> bool {
    normalized.contains(term)
        || term.contains(normalized)
        || normalized.split(' ').any(|word| term.contains(word))
}

/// First candidate whose normalized name contains the term, is contained in
/// it, or shares a word with it. Input order decides ties.
pub fn resolve<'a, S: AsRef<str>>(term: &str, candidates: &'a [S]) -> Option<&'a S> {
    find_match(term, candidates, |c| c.as_ref())
}

/// [`resolve`] over arbitrary records.
pub fn find_match<'a, T>(term: &str, items: &'a [T], name_of: impl Fn(&T) -> &str) -> Option<&'a T> {
    let term = term.to_lowercase();
    let term = term.trim();
    items
        .iter()
        .find(|item| is_match(&normalize_name(name_of(*item)), term))
}

/// Resolve a URL slug against `items`.
pub fn find_by_slug<'a, T>(slug: &str, items: &'a [T], name_of: impl Fn(&T) -> &str) -> Option<&'a T> {
    find_match(&slug_to_search_term(slug), items, name_of)
}
