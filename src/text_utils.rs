use chrono::{DateTime, Local, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;

/// Date format used by the `date` field of a post, e.g. `March 04, 2021`
pub const POST_DATE_FORMAT: &str = "%B %d, %Y";

/// Format used when dates are displayed to readers
pub const DISPLAY_DATE_FORMAT: &str = "%a, %d %b %Y";

pub fn parse_post_date(buf: &str) -> Result<NaiveDate, String> {
    match NaiveDate::parse_from_str(buf.trim(), POST_DATE_FORMAT) {
        Ok(date) => Ok(date),
        Err(e) => Err(format!("Unable to parse date '{}' as 'Month DD, YYYY': {}", buf, e)),
    }
}

pub fn format_date(date: &NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

pub fn format_date_time(date_time: &DateTime<Local>) -> (String, String) {
    let date = date_time.format(DISPLAY_DATE_FORMAT).to_string();
    let time = date_time.format("%H:%M:%S").to_string();
    (date, time)
}

/// Turns a title into a url-safe slug: `Hello, World! (2021)` becomes `hello-world-2021`.
///
/// Non-ascii characters are transliterated first, so `Ábaco` becomes `abaco`.
pub fn slugify(title: &str) -> String {
    let ascii = unidecode::unidecode(title).to_ascii_lowercase();

    ascii.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Approximate count of words in a post body, ignoring markup and punctuation.
pub fn count_words(text: &str) -> usize {
    lazy_static! {
        static ref HTML_TAG_REGEX: Regex = Regex::new(r"<[^>]*>").unwrap();
    }

    let without_tags = HTML_TAG_REGEX.replace_all(text, " ");
    let without_punctuation: String = without_tags.chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    without_punctuation.split_whitespace().count()
}

/// Splits the `tags` front-matter value (`"Python, Web"`) into lowercase tags.
pub fn split_tags(tags_str: &str) -> Vec<String> {
    tags_str.to_lowercase()
        .split(", ")
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
        .map(|tag| tag.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_post_date() {
        let date = parse_post_date("March 04, 2021").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2021, 3, 4).unwrap());
        assert_eq!(format_date(&date), "Thu, 04 Mar 2021");

        let date = parse_post_date("  December 25, 2019 ").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2019, 12, 25).unwrap());
    }

    #[test]
    fn test_parse_post_date_invalid() {
        assert!(parse_post_date("2021-03-04").is_err());
        assert!(parse_post_date("Smarch 04, 2021").is_err());
        assert!(parse_post_date("").is_err());
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello, World! — 2021"), "hello-world-2021");
        assert_eq!(slugify("Post title of mine ábaco - dir2"), "post-title-of-mine-abaco-dir2");
        assert_eq!(slugify("  Rust   & Python  "), "rust-python");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_count_words() {
        assert_eq!(count_words("One two three"), 3);
        assert_eq!(count_words("<p>Hello, <strong>world</strong>!</p>"), 2);
        assert_eq!(count_words("It's a -- test."), 3);
        assert_eq!(count_words(""), 0);
    }

    #[test]
    fn test_split_tags() {
        assert_eq!(split_tags("Python, Web"), ["python", "web"]);
        assert_eq!(split_tags("rust"), ["rust"]);
        assert!(split_tags("").is_empty());
    }
}
