//! Editorial content rules: slugs, publishing and scheduling.

use std::sync::LazyLock;

use regex::Regex;

use crate::status::ContentStatus;
use crate::types::Timestamp;

pub const MAX_SLUG_LENGTH: usize = 120;
pub const MAX_TITLE_LENGTH: usize = 200;
pub const MAX_EXCERPT_LENGTH: usize = 500;

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid regex"));

/// Derive a URL slug from a title.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug.truncate(MAX_SLUG_LENGTH);
    slug.trim_end_matches('-').to_string()
}

/// Prefix of the slug used when a title has no ASCII letters or digits.
pub const FALLBACK_SLUG_PREFIX: &str = "content";

const FALLBACK_SUFFIX_LENGTH: usize = 8;

/// Slug for new content titled `title`. Titles that slugify to nothing get
/// `content-<suffix>`, where the suffix is the tail of `unique`, lowercased
/// and filtered down to ASCII letters and digits.
pub fn derive_slug(title: &str, unique: &str) -> String {
    let slug = slugify(title);
    if !slug.is_empty() {
        return slug;
    }
    let tail: Vec<char> = unique
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();
    let suffix: String = tail[tail.len().saturating_sub(FALLBACK_SUFFIX_LENGTH)..]
        .iter()
        .collect();
    if suffix.is_empty() {
        FALLBACK_SLUG_PREFIX.to_string()
    } else {
        format!("{FALLBACK_SLUG_PREFIX}-{suffix}")
    }
}

pub fn validate_slug(slug: &str) -> Result<(), String> {
    if slug.len() > MAX_SLUG_LENGTH {
        return Err(format!("Slug must not exceed {MAX_SLUG_LENGTH} characters"));
    }
    if !SLUG_RE.is_match(slug) {
        return Err(format!(
            "Invalid slug '{slug}'. Use lowercase letters, digits and single dashes"
        ));
    }
    Ok(())
}

pub fn validate_title(title: &str) -> Result<(), String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err("Title must not be empty".to_string());
    }
    if trimmed.chars().count() > MAX_TITLE_LENGTH {
        return Err(format!("Title must not exceed {MAX_TITLE_LENGTH} characters"));
    }
    Ok(())
}

pub fn validate_excerpt(excerpt: &str) -> Result<(), String> {
    if excerpt.chars().count() > MAX_EXCERPT_LENGTH {
        return Err(format!(
            "Excerpt must not exceed {MAX_EXCERPT_LENGTH} characters"
        ));
    }
    Ok(())
}

/// Whether a write moving content to `status` should stamp `publishedAt`.
pub fn stamps_published_at(status: Option<ContentStatus>, already_published_at: bool) -> bool {
    status == Some(ContentStatus::Published) && !already_published_at
}

/// Scheduled content needs a publish time in the future.
pub fn validate_schedule(
    status: ContentStatus,
    scheduled_for: Option<Timestamp>,
    now: Timestamp,
) -> Result<(), String> {
    if status != ContentStatus::Scheduled {
        return Ok(());
    }
    match scheduled_for {
        None => Err("Scheduled content requires a scheduledFor time".to_string()),
        Some(at) if at <= now => Err("scheduledFor must be in the future".to_string()),
        Some(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("How I Made  'Night Drive'!"), "how-i-made-night-drive");
        assert_eq!(slugify("  --Hello--World--  "), "hello-world");
        assert_eq!(slugify("Beat Tape #3"), "beat-tape-3");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn slugify_output_validates() {
        for title in ["Studio Diary, Part 2", "NEWS: Tour 2025", "a"] {
            assert!(validate_slug(&slugify(title)).is_ok(), "{title}");
        }
    }

    #[test]
    fn titles_without_ascii_get_a_fallback_slug() {
        let slug = derive_slug("日本語ビート", "0192f0c4a1b27c3d8e9f00112233abcd");
        assert_eq!(slug, "content-2233abcd");
        assert!(validate_slug(&slug).is_ok());

        assert!(validate_slug(&derive_slug("!!!", "ID-42")).is_ok());
        assert_eq!(derive_slug("!!!", ""), "content");
        assert_eq!(derive_slug("Night Drive", "ignored"), "night-drive");
    }

    #[test]
    fn slug_validation() {
        assert!(validate_slug("bad--slug").is_err());
        assert!(validate_slug("Upper").is_err());
        assert!(validate_slug("-lead").is_err());
        assert!(validate_slug("").is_err());
        assert!(validate_slug(&"a".repeat(MAX_SLUG_LENGTH + 1)).is_err());
    }

    #[test]
    fn publishing_stamps_once() {
        assert!(stamps_published_at(Some(ContentStatus::Published), false));
        assert!(!stamps_published_at(Some(ContentStatus::Published), true));
        assert!(!stamps_published_at(Some(ContentStatus::Draft), false));
        assert!(!stamps_published_at(None, false));
    }

    #[test]
    fn schedule_requires_future_time() {
        let now = chrono::Utc::now();
        let later = now + chrono::Duration::hours(1);
        assert!(validate_schedule(ContentStatus::Draft, None, now).is_ok());
        assert!(validate_schedule(ContentStatus::Scheduled, None, now).is_err());
        assert!(validate_schedule(ContentStatus::Scheduled, Some(now), now).is_err());
        assert!(validate_schedule(ContentStatus::Scheduled, Some(later), now).is_ok());
    }

    #[test]
    fn title_and_excerpt_limits() {
        assert!(validate_title("").is_err());
        assert!(validate_title("Hello").is_ok());
        assert!(validate_excerpt(&"x".repeat(MAX_EXCERPT_LENGTH)).is_ok());
        assert!(validate_excerpt(&"x".repeat(MAX_EXCERPT_LENGTH + 1)).is_err());
    }
}
