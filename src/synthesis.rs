//! Generation of the editable translation files, one per page and locale.

pub mod generator;
pub mod input_config;
pub mod record;

pub use generator::{
    RecordTarget,
    TRANSLATED_GROUP,
    UNTRANSLATED_GROUP,
    record_file_name,
    synthesize_record,
};
pub use input_config::{
    InputSource,
    build_input_config,
};
pub use record::{
    EditorOptions,
    ExistingRecord,
    InputConfig,
    InputContext,
    InputType,
    TranslationFile,
};
