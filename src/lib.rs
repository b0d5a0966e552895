pub mod models;
pub mod utils;
pub mod parser;
pub mod docx;
pub mod office;
pub mod api;

pub use models::{
    SourceDocument,
    Section,
    SourceParagraph,
    SourceRun,
    ConvertConf,
    MarginPreset,
    IndentationPolicy,
    ListStyleBinding,
    FontSizePolicy
};

pub use parser::{
    DocParser,
    DocParseError,
    parse_doc
};

pub use docx::{
    DocConverter,
    DocxError,
    DocxResult,
    ContentClass,
    ContentClassifier,
    HeuristicClassifier,
    generate_docx
};

pub use api::{
    ConversionError,
    ConversionResult,
    ConversionReport,
    convert_with_conf,
    convert_with_report,
    convert_base64,
    convert_base64_async,
    convert_base64_external,
    export_to_docx
};

/// 将 Word 97-2003 文档转换为 .docx
///
/// # Arguments
///
/// * `bytes` - .doc 文件内容
///
/// # Returns
///
/// .docx 文件内容
pub fn convert(bytes: &[u8]) -> ConversionResult<Vec<u8>> {
    convert_with_conf(bytes, &ConvertConf::default())
}
