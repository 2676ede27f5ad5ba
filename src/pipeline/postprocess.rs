//! Post-processing: reduce OCR markdown to plain running text.
//!
//! The provider returns markdown with headings, emphasis, inline HTML and
//! references to images it cropped out of the page. Callers want the words
//! only, so this module applies six cheap regex rules that strip the markup
//! and flatten the result to a single line.
//!
//! ## Rule Order
//!
//! Tags go first so a tag inside an image reference cannot hide it from the
//! image rule. Heading markers are stripped while line starts still exist,
//! i.e. before whitespace is collapsed.

use crate::pipeline::ocr::OcrPage;
use once_cell::sync::Lazy;
use regex::Regex;

/// Separator placed between page texts before cleanup.
pub const PAGE_SEPARATOR: &str = "\n\n";

/// Concatenate the markdown of every page that has some, separated by a
/// blank line.
pub fn join_pages(pages: &[OcrPage]) -> String {
    pages
        .iter()
        .filter_map(|p| p.markdown.as_deref())
        .filter(|md| !md.is_empty())
        .collect::<Vec<_>>()
        .join(PAGE_SEPARATOR)
}

/// Clean OCR markdown down to plain text.
///
/// Rules (applied in order):
/// 1. Remove HTML/markup tags
/// 2. Remove markdown image references (`![alt](src)`)
/// 3. Remove leading heading markers on every line
/// 4. Remove bold/italic markers (`*`, `**`, `_`, `__`)
/// 5. Replace slashes and their surrounding whitespace with one space
/// 6. Collapse whitespace runs to one space and trim
///
/// One pass can expose new matches (`*# a` becomes `# a`), so the pass is
/// repeated until the text stops changing. A pass never grows the text and
/// only deletes characters or turns them into spaces, so this terminates.
/// The result is therefore idempotent: `clean_text(clean_text(s)) == clean_text(s)`.
pub fn clean_text(input: &str) -> String {
    let mut current = clean_pass(input);
    loop {
        let next = clean_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

static RE_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static RE_IMAGES: Lazy<Regex> = Lazy::new(|| Regex::new(r"!\[.*?\]\(.*?\)").unwrap());
static RE_HEADINGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^#+\s*").unwrap());
static RE_EMPHASIS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*{1,2}|_{1,2}").unwrap());
static RE_SLASHES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*/\s*").unwrap());
static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

fn clean_pass(input: &str) -> String {
    let s = RE_TAGS.replace_all(input, "");
    let s = RE_IMAGES.replace_all(&s, "");
    let s = RE_HEADINGS.replace_all(&s, "");
    let s = RE_EMPHASIS.replace_all(&s, "");
    let s = RE_SLASHES.replace_all(&s, " ");
    let s = RE_WHITESPACE.replace_all(&s, " ");
    s.trim().to_string()
}

/// `true` when a page's markdown is nothing but an image reference.
pub fn is_image_reference(markdown: &str) -> bool {
    markdown.starts_with("![") && markdown.ends_with(')')
}
