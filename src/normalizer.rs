use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// Body text used when no source in the document yields a single word.
pub const NO_BODY_TEXT: &str = "No meaningful body text found.";

/// Elements whose content never reaches the output.
const NOISE_TAGS: [&str; 5] = ["script", "style", "nav", "footer", "header"];

/// Sentence fragments of this many characters or fewer are dropped.
const MIN_SENTENCE_CHARS: usize = 20;

pub struct Normalizer {
    whitespace_regex: Regex,
    word_regex: Regex,
    paragraph_selector: Selector,
}

impl Normalizer {
    pub fn new() -> Self {
        Normalizer {
            whitespace_regex: Regex::new(r"\s+").expect("static whitespace pattern"),
            word_regex: Regex::new(r"\w+").expect("static word pattern"),
            paragraph_selector: Selector::parse("p").expect("static paragraph selector"),
        }
    }

    /// Cleans raw HTML or text into prose: noise elements are removed,
    /// whitespace is collapsed and only sentences longer than 20 characters
    /// survive. Returns an empty string when nothing survives.
    pub fn normalize(&self, raw: &str) -> String {
        let fragment = Html::parse_fragment(raw);
        let text = visible_text(fragment.root_element(), "");
        self.filter_sentences(&text)
    }

    fn filter_sentences(&self, text: &str) -> String {
        let collapsed = self.whitespace_regex.replace_all(text, " ");

        let sentences: Vec<&str> = collapsed
            .trim()
            .split('.')
            .map(str::trim)
            .filter(|s| s.chars().count() > MIN_SENTENCE_CHARS)
            .collect();

        if sentences.is_empty() {
            return String::new();
        }
        format!("{}.", sentences.join(". "))
    }

    pub fn has_words(&self, text: &str) -> bool {
        self.word_regex.is_match(text)
    }

    /// Returns `text` if it contains a word. Otherwise tries every paragraph
    /// in the document, then the whole document, and finally gives up with
    /// [`NO_BODY_TEXT`].
    pub fn ensure_body_has_words(&self, document: &Html, text: String) -> String {
        if self.has_words(&text) {
            return text;
        }

        let paragraphs = document
            .select(&self.paragraph_selector)
            .map(|p| visible_text(p, ""))
            .collect::<Vec<_>>()
            .join(" ");
        let cleaned = self.normalize(&paragraphs);
        if self.has_words(&cleaned) {
            return cleaned;
        }

        let whole = visible_text(document.root_element(), " ");
        let cleaned = self.normalize(&whole);
        if self.has_words(&cleaned) {
            return cleaned;
        }

        NO_BODY_TEXT.to_string()
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Text content of `element`, skipping anything nested in a noise element.
/// Text nodes are joined with `separator`.
pub fn visible_text(element: ElementRef<'_>, separator: &str) -> String {
    if NOISE_TAGS.contains(&element.value().name()) {
        return String::new();
    }

    let root_id = element.id();
    let mut pieces: Vec<&str> = Vec::new();

    for node in element.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .ancestors()
            .take_while(|a| a.id() != root_id)
            .filter_map(|a| a.value().as_element())
            .any(|el| NOISE_TAGS.contains(&el.name()));
        if !hidden {
            pieces.push(text);
        }
    }

    pieces.join(separator)
}
