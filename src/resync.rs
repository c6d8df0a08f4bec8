//! Resynchronisation of content documents with the translation files.

pub mod document;
pub mod page;

pub use document::{
    CONTENT_BLOCKS_KEY,
    ContentDocument,
    DocumentError,
};
pub use page::{
    PageTranslations,
    ResyncOutcome,
    lookup_translations,
    resynchronize_page,
};
