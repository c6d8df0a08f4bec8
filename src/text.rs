//! Text normalisation shared by labels, diff annotations, location links and
//! translation lookups.

pub mod markdown;
pub mod page;
pub mod slug;

pub use markdown::{
    clean_comment,
    clean_phrase,
    html_to_markdown,
    truncate_label,
};
pub use page::{
    content_file_name,
    page_link_path,
    translation_file_stem,
};
pub use slug::text_id;
