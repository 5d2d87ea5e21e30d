use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use super::{Transcript, TranscriptLine};

static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1.card-title").expect("valid title selector"));
static AUTHOR_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"a[data-ph-capture-attribute-element="author-link"]"#).expect("valid author selector")
});
static SEGMENT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.transcript-segment").expect("valid segment selector"));

const TITLE_FALLBACK: &str = "Title not found";
const AUTHOR_FALLBACK: &str = "Author not found";

/// Extract title, author and segments from a transcript page.
///
/// Segments keep document order. A `data-start` attribute that does not parse as a
/// number leaves the segment untimed.
pub fn parse_transcript_page(html: &str) -> Transcript {
    let document = Html::parse_document(html);

    let title = first_text(&document, &TITLE_SELECTOR).unwrap_or_else(|| TITLE_FALLBACK.to_string());
    let author = first_text(&document, &AUTHOR_SELECTOR).unwrap_or_else(|| AUTHOR_FALLBACK.to_string());

    let lines = document
        .select(&SEGMENT_SELECTOR)
        .map(|segment| TranscriptLine {
            start: segment
                .value()
                .attr("data-start")
                .and_then(|raw| raw.trim().parse::<f64>().ok())
                .filter(|seconds| seconds.is_finite()),
            text: element_text(&segment),
        })
        .collect();

    Transcript { title, author, lines }
}

fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document.select(selector).next().map(|element| element_text(&element))
}

fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <div class="card">
            <h1 class="card-title text-xl"> Learning Rust in 10 minutes </h1>
            <a href="/channel/x" data-ph-capture-attribute-element="author-link">
              Ferris Channel
            </a>
            <div id="transcript">
              <span class="transcript-segment" data-start="0.0">Hello and welcome</span>
              <span class="transcript-segment" data-start="65.4"> to the <b>borrow</b> checker </span>
              <span class="transcript-segment">no timestamp here</span>
              <span class="transcript-segment" data-start="soon">odd attribute</span>
              <span class="other">ignored</span>
            </div>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_parses_title_author_and_segments() {
        let transcript = parse_transcript_page(PAGE);
        assert_eq!(transcript.title, "Learning Rust in 10 minutes");
        assert_eq!(transcript.author, "Ferris Channel");
        assert_eq!(transcript.lines.len(), 4);
        assert_eq!(transcript.lines[0].start, Some(0.0));
        assert_eq!(transcript.lines[1].text, "to the borrow checker");
        assert_eq!(transcript.lines[2].start, None);
        assert_eq!(transcript.lines[3].start, None);
        assert_eq!(
            transcript.body(),
            "[00:00] Hello and welcome\n[01:05] to the borrow checker\nno timestamp here\nodd attribute\n"
        );
    }

    #[test]
    fn test_missing_elements_use_fallbacks() {
        let transcript = parse_transcript_page("<html><body><p>Nothing to see</p></body></html>");
        assert_eq!(transcript.title, "Title not found");
        assert_eq!(transcript.author, "Author not found");
        assert!(transcript.lines.is_empty());
        assert_eq!(transcript.body(), "No transcript found for this video.");
    }
}
