//! "See on page" links using URL text fragments (`#:~:text=`).

use percent_encoding::{
    AsciiSet,
    CONTROLS,
    utf8_percent_encode,
};

use crate::text::page_link_path;

/// Visible label of every location link.
pub const LOCATION_LABEL: &str = "See on page";

/// Words kept at each end of a long phrase.
const HIGHLIGHT_WORDS: usize = 3;

/// Characters escaped inside a text directive. `,` and `-` are directive syntax.
const TEXT_FRAGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b',')
    .add(b'-')
    .add(b'<')
    .add(b'>')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

fn encode(text: &str) -> String {
    utf8_percent_encode(text, TEXT_FRAGMENT_ENCODE_SET).to_string()
}

/// Builds `[See on page](<base><page>#:~:text=...)` for a cleaned phrase.
///
/// Phrases of more than six words highlight a range from their first three to
/// their last three words; shorter phrases highlight the whole phrase.
#[must_use]
pub fn build_location_link(phrase: &str, page: &str, base_url: &str) -> String {
    let page_path = page_link_path(page);
    let words: Vec<&str> = phrase.split_whitespace().collect();

    if words.is_empty() {
        return format!("[{LOCATION_LABEL}]({base_url}{page_path})");
    }

    let target = if words.len() > HIGHLIGHT_WORDS * 2 {
        let start = words.iter().take(HIGHLIGHT_WORDS).copied().collect::<Vec<_>>().join(" ");
        let end = words
            .iter()
            .skip(words.len() - HIGHLIGHT_WORDS)
            .copied()
            .collect::<Vec<_>>()
            .join(" ");
        format!("{},{}", encode(&start), encode(&end))
    } else {
        encode(&words.join(" "))
    };

    format!("[{LOCATION_LABEL}]({base_url}{page_path}#:~:text={target})")
}
