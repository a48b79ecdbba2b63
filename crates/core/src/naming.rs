//! Filename conventions: slide image ordering and output video naming.

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// First run of ASCII digits in a filename.
static FIRST_NUMBER_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

/// Sort key for slide image filenames: the first embedded number, or 0.
///
/// `slide_2.png` sorts before `slide_10.png`. Numbers too large for `u64`
/// saturate rather than fall back to 0.
pub fn natural_sort_key(filename: &str) -> u64 {
    FIRST_NUMBER_REGEX
        .find(filename)
        .map(|m| m.as_str().parse::<u64>().unwrap_or(u64::MAX))
        .unwrap_or(0)
}

/// Sort filenames by their natural sort key. Ties keep their relative order.
pub fn sort_naturally<S: AsRef<str>>(names: &mut [S]) {
    names.sort_by_key(|n| natural_sort_key(n.as_ref()));
}

/// Output video filename for a source document: `<stem><suffix>.mp4`.
///
/// # Examples
/// ```
/// use slidecast_core::naming::output_video_name;
///
/// assert_eq!(
///     output_video_name("decks/test-ppt.pptx", "_WITH_AZURE_AUDIO"),
///     "test-ppt_WITH_AZURE_AUDIO.mp4"
/// );
/// ```
pub fn output_video_name(document: impl AsRef<Path>, suffix: &str) -> String {
    let stem = document
        .as_ref()
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");

    format!("{}{}.mp4", stem, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_natural_sort_key() {
        assert_eq!(natural_sort_key("slide_2.png"), 2);
        assert_eq!(natural_sort_key("Slide10.PNG"), 10);
        assert_eq!(natural_sort_key("slide_3_v2.png"), 3);
        assert_eq!(natural_sort_key("cover.png"), 0);
    }

    #[test]
    fn test_sort_naturally_orders_numerically() {
        let mut names = vec!["slide_10.png", "slide_2.png", "slide_1.png", "slide_21.png"];
        sort_naturally(&mut names);
        assert_eq!(
            names,
            vec!["slide_1.png", "slide_2.png", "slide_10.png", "slide_21.png"]
        );
    }

    #[test]
    fn test_sort_naturally_digitless_first() {
        let mut names = vec!["slide_1.png", "title.png"];
        sort_naturally(&mut names);
        assert_eq!(names, vec!["title.png", "slide_1.png"]);
    }

    #[test]
    fn test_output_video_name() {
        assert_eq!(
            output_video_name("content_maintenance_process.pptx", "_WITH_AZURE_AUDIO"),
            "content_maintenance_process_WITH_AZURE_AUDIO.mp4"
        );
        assert_eq!(output_video_name("presentation.ppt", ""), "presentation.mp4");
    }
}
