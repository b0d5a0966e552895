pub mod adapter;
pub mod classifier;
pub mod docx_maker;

// 从 docx_maker 导出
pub use docx_maker::{
    generate_docx, init_doc, DocConverter, DocxError, DocxResult, ListTreatment,
};

// 从 classifier 导出
pub use classifier::{ContentClass, ContentClassifier, HeuristicClassifier};

// 从 adapter 导出
pub use adapter::{
    AlignmentType, DocxAdapterError, DocxAdapterResult, LineRuleType, RunEffects, RunProps,
    UnderlineType, VerticalPosition,
};

// 从 adapter::docx 导出
pub use adapter::docx::{
    Document, NumberingRef, PageMargin, Paragraph, ParagraphBorders, ParagraphIndent,
    ParagraphSpacing, TextRun,
};
