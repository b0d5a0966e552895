pub mod source_document;
pub mod format_codes;
pub mod conf;

pub use source_document::{
    SourceDocument, Section, SourceParagraph, SourceRun, SourceBorders, LineSpacingDescriptor
};
pub use format_codes::{JustificationCode, UnderlineCode, VerticalCode, BorderCode};
pub use conf::{ConvertConf, MarginPreset, IndentationPolicy, ListStyleBinding, FontSizePolicy};
