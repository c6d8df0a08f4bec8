//! Editor comments attached to each translation input: what changed in the
//! source text, and where the text lives on the page.

pub mod diff;
pub mod location;

pub use diff::{
    ChangeKind,
    DiffPart,
    describe_change,
    diff_words,
};
pub use location::{
    LOCATION_LABEL,
    build_location_link,
};
