//! DOCX 生成模块
//!
//! 遍历旧版文档的 节 → 段落 → 文本块，依次执行段落映射、列表/项目符号分类和文本块格式化

use log::{debug, info};
use thiserror::Error;

use crate::docx::adapter::docx::{
    Document, PageMargin, Paragraph, ParagraphBorders, ParagraphIndent, ParagraphSpacing, TextRun,
};
use crate::docx::adapter::{
    AlignmentType, DocxAdapterError, LineRuleType, RunEffects, RunProps, UnderlineType,
    VerticalPosition,
};
use crate::docx::classifier::{ContentClass, ContentClassifier, HeuristicClassifier};
use crate::models::{
    ConvertConf, FontSizePolicy, IndentationPolicy, ListStyleBinding, SourceDocument,
    SourceParagraph, SourceRun,
};
use crate::utils::{convert_inches_to_twip, format_hex_color, strip_bullet_prefix, DocConstants};

/// DOCX导出错误类型
#[derive(Error, Debug)]
pub enum DocxError {
    #[error("IO错误: {0}")]
    IoError(#[from] std::io::Error),

    #[error("DOCX生成错误: {0}")]
    DocxError(#[from] docx_rs::DocxError),

    #[error("适配器错误: {0}")]
    AdapterError(#[from] DocxAdapterError),

    #[error("无效的配置: {0}")]
    InvalidConfig(String),

    #[error("无法转换的内容: {0}")]
    InvalidContent(String),
}

/// DOCX导出结果
pub type DocxResult<T> = Result<T, DocxError>;

/// 列表/项目符号分类结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListTreatment {
    /// 以 "►" 或 ">" 开头的段落
    BulletLine,
    /// 带列表层级的段落
    ListItem(usize),
    None,
}

/// 初始化文档：空文档加上页面边距
pub fn init_doc(conf: &ConvertConf) -> DocxResult<Document> {
    let mut doc = Document::new();
    doc.set_page_margin(PageMargin::uniform(conf.margin_preset.twips()))?;
    Ok(doc)
}

/// 转换引擎，不在两次转换之间保留任何状态
#[derive(Debug, Clone)]
pub struct DocConverter<C: ContentClassifier = HeuristicClassifier> {
    conf: ConvertConf,
    classifier: C,
}

impl DocConverter<HeuristicClassifier> {
    pub fn new(conf: ConvertConf) -> Self {
        Self::with_classifier(conf, HeuristicClassifier)
    }
}

impl Default for DocConverter<HeuristicClassifier> {
    fn default() -> Self {
        Self::new(ConvertConf::default())
    }
}

impl<C: ContentClassifier> DocConverter<C> {
    /// 使用自定义的内容分类策略
    pub fn with_classifier(conf: ConvertConf, classifier: C) -> Self {
        DocConverter { conf, classifier }
    }

    pub fn conf(&self) -> &ConvertConf {
        &self.conf
    }

    /// 构建目标文档，每个源段落恰好对应一个目标段落
    pub fn build(&self, source: &SourceDocument) -> DocxResult<Document> {
        let mut doc = init_doc(&self.conf)?;
        for (section_idx, section) in source.sections.iter().enumerate() {
            debug!(
                "【build】第 {} 节, {} 个段落",
                section_idx,
                section.paragraphs.len()
            );
            for paragraph in &section.paragraphs {
                doc.add_paragraph(self.convert_paragraph(paragraph)?);
            }
        }
        info!(
            "【build】生成 {} 个段落 (源文档 {} 节)",
            doc.paragraphs().len(),
            source.sections.len()
        );
        Ok(doc)
    }

    /// 构建并打包为 .docx 字节
    pub fn convert(&self, source: &SourceDocument) -> DocxResult<Vec<u8>> {
        Ok(self.build(source)?.to_bytes()?)
    }

    /// 段落映射 → 列表分类 → 文本块格式化
    pub fn convert_paragraph(&self, source: &SourceParagraph) -> DocxResult<Paragraph> {
        let mut target = Paragraph::new();
        self.map_paragraph(source, &mut target);
        let treatment = self.classify_list(source, &mut target);
        self.format_runs(source, treatment == ListTreatment::BulletLine, &mut target)?;
        Ok(target)
    }

    /// 对齐、间距、行距、缩进和边框
    pub fn map_paragraph(&self, source: &SourceParagraph, target: &mut Paragraph) {
        target.align(AlignmentType::from_legacy_code(source.justification));

        let mut spacing = ParagraphSpacing::new()
            .before(source.spacing_before)
            .after(source.spacing_after);
        if source.line_spacing.is_some() {
            spacing = spacing
                .line(DocConstants::LINE_SPACING_115)
                .line_rule(LineRuleType::Auto);
        }
        target.spacing(spacing);

        let indent = match self.conf.indentation_policy {
            IndentationPolicy::PreserveAll => ParagraphIndent {
                left: Some(source.indent_left),
                right: Some(source.indent_right),
                first_line: Some(source.indent_first_line),
            },
            IndentationPolicy::ResetThenOverridePositive => ParagraphIndent {
                left: Some(source.indent_left.max(0)),
                right: Some(source.indent_right.max(0)),
                // 负值为悬挂缩进，同样保留
                first_line: Some(source.indent_first_line),
            },
        };
        target.indent_full(indent);

        target.borders = ParagraphBorders {
            top: source.borders.top.is_present(),
            bottom: source.borders.bottom.is_present(),
            left: source.borders.left.is_present(),
            right: source.borders.right.is_present(),
        };
    }

    /// 项目符号行优先于列表层级
    pub fn classify_list(&self, source: &SourceParagraph, target: &mut Paragraph) -> ListTreatment {
        let text = source.text();
        if self.classifier.classify_paragraph(&text) == ContentClass::BulletGlyph {
            target.indent(convert_inches_to_twip(0.25));
            debug!("【classify_list】项目符号行: {:?}", text);
            return ListTreatment::BulletLine;
        }

        if source.list_level < 0 {
            return ListTreatment::None;
        }

        let level = source.list_level as usize;
        target.numbering(DocConstants::LIST_NUMBERING_ID, level);
        if level > 0 {
            target.indent(convert_inches_to_twip(0.5) * (level as i32 + 1));
        }
        let style = match (self.conf.list_style_binding, level == 0) {
            (ListStyleBinding::ParagraphAtTop, true) | (ListStyleBinding::BulletAtTop, false) => {
                DocConstants::LIST_PARAGRAPH_STYLE
            }
            _ => DocConstants::LIST_BULLET_STYLE,
        };
        target.style(style);
        debug!("【classify_list】列表项: 层级 {}, 样式 {}", level, style);
        ListTreatment::ListItem(level)
    }

    /// 逐个文本块生成目标文本块，空白文本块被跳过
    pub fn format_runs(&self, source: &SourceParagraph, bullet: bool, target: &mut Paragraph) -> DocxResult<()> {
        let mut first = true;
        for run in &source.runs {
            if run.text.trim().is_empty() {
                continue;
            }
            check_text(&run.text)?;

            if bullet && first {
                target.add_text_run(self.bullet_glyph_run());
                let remainder = strip_bullet_prefix(&run.text);
                target.add_text_run(TextRun::with_props(remainder, self.general_props(run)));
            } else if self.classifier.classify_run(&run.text) == ContentClass::EmailLike {
                target.add_text_run(TextRun::with_props(&run.text, self.email_props()));
            } else {
                target.add_text_run(TextRun::with_props(&run.text, self.general_props(run)));
            }
            first = false;
        }
        Ok(())
    }

    fn bullet_glyph_run(&self) -> TextRun {
        TextRun::with_props(
            DocConstants::BULLET_TEXT,
            RunProps::new()
                .font(&self.conf.bullet_font)
                .size(self.conf.bullet_size),
        )
    }

    /// 邮件地址：强制单下划线、蓝色、固定字体与字号
    fn email_props(&self) -> RunProps {
        RunProps::new()
            .underline(UnderlineType::Single)
            .color(DocConstants::EMAIL_COLOR)
            .font(&self.conf.email_font)
            .size(self.conf.email_size)
    }

    fn general_props(&self, run: &SourceRun) -> RunProps {
        let size = match self.conf.font_size_policy {
            FontSizePolicy::HalfToWhole => (run.font_size / 2) as usize,
            FontSizePolicy::RawHalfPoints => run.font_size as usize,
        };
        let font = run
            .font_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.conf.fallback_font);

        let mut props = RunProps::new().size(size).font(font);
        props.bold = Some(run.bold);
        props.italic = Some(run.italic);
        props.strike = Some(run.strike);
        if run.underline != 0 {
            props.underline = Some(UnderlineType::from_legacy_code(run.underline));
        }
        props.color = format_hex_color(run.color);
        props.vertical = VerticalPosition::from_legacy_code(run.sub_super_script);
        props.effects = RunEffects {
            kerning: (run.kerning != 0).then_some(run.kerning),
            ..RunEffects::default()
        };
        if self.conf.surface_effects {
            props.effects.emboss = run.emboss;
            props.effects.imprint = run.imprint;
            props.effects.shadow = run.shadow;
        }
        props
    }
}

// XML 中不允许出现的控制字符
fn check_text(text: &str) -> DocxResult<()> {
    // XML 1.0 不允许的字符
    match text.chars().find(|&c| c < '\u{20}' && !matches!(c, '\t' | '\n' | '\r')) {
        Some(c) => Err(DocxError::InvalidContent(format!(
            "文本块包含控制字符 U+{:04X}",
            c as u32
        ))),
        None => Ok(()),
    }
}

/// 生成 .docx 字节
pub fn generate_docx(source: &SourceDocument, conf: &ConvertConf) -> DocxResult<Vec<u8>> {
    DocConverter::new(conf.clone()).convert(source)
}
