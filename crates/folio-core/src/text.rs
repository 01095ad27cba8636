//! Text helpers shared by the content entities: slugs, word counts, tags.

/// Words read per minute when estimating reading time.
pub const WORDS_PER_MINUTE: usize = 200;

const MAX_SLUG_LEN: usize = 128;

/// Convert text into a URL-safe slug.
///
/// Lowercases, replaces every non-alphanumeric run with a single hyphen and
/// trims hyphens from both ends. Long slugs are cut at a hyphen boundary.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    if slug.len() > MAX_SLUG_LEN {
        // Pure ASCII, so any index is a char boundary.
        let truncated = &slug[..MAX_SLUG_LEN];
        return match truncated.rfind('-') {
            Some(cut) => truncated[..cut].to_string(),
            None => truncated.to_string(),
        };
    }

    slug
}

/// Count the words of a body, ignoring anything inside HTML tags.
pub fn word_count(content: &str) -> usize {
    let mut visible = String::with_capacity(content.len());
    let mut in_tag = false;

    for c in content.chars() {
        match c {
            '<' => {
                in_tag = true;
                visible.push(' ');
            }
            '>' if in_tag => in_tag = false,
            _ if !in_tag => visible.push(c),
            _ => {}
        }
    }

    visible.split_whitespace().count()
}

/// Estimated reading time in whole minutes, never less than one.
pub fn reading_time(content: &str) -> i32 {
    let minutes = word_count(content).div_ceil(WORDS_PER_MINUTE).max(1);
    i32::try_from(minutes).unwrap_or(i32::MAX)
}

/// Trim tags, drop empty ones and remove duplicates keeping the first
/// occurrence.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}
