//! Docx 命名空间
//!
//! 目标文档、段落与文本块，以及它们到 docx-rs 的转换

use super::*;
use crate::utils::DocConstants;
use base64;
use docx_rs;
use log::debug;
use std::io::Cursor;
use std::path::Path;

/// 段落间距
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParagraphSpacing {
    pub before: Option<u32>,
    pub after: Option<u32>,
    pub line: Option<i32>,
    pub line_rule: Option<LineRuleType>,
}

impl ParagraphSpacing {
    /// 创建新的段落间距
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置段前间距（twips）
    pub fn before(mut self, before: u32) -> Self {
        self.before = Some(before);
        self
    }

    /// 设置段后间距（twips）
    pub fn after(mut self, after: u32) -> Self {
        self.after = Some(after);
        self
    }

    /// 设置行间距（240 = 单倍）
    pub fn line(mut self, line: i32) -> Self {
        self.line = Some(line);
        self
    }

    /// 设置行间距规则
    pub fn line_rule(mut self, line_rule: LineRuleType) -> Self {
        self.line_rule = Some(line_rule);
        self
    }

    /// 转换为 docx-rs 的 LineSpacing
    pub fn to_docx_line_spacing(&self) -> docx_rs::LineSpacing {
        let mut spacing = docx_rs::LineSpacing::new();

        if let Some(before) = self.before {
            spacing = spacing.before(before);
        }

        if let Some(after) = self.after {
            spacing = spacing.after(after);
        }

        if let Some(line) = self.line {
            debug!(
                "【适配器日志】设置行距: {} ({:.2}倍单倍行距)",
                line,
                line as f32 / 240.0
            );
            spacing = spacing.line(line);
        }

        if let Some(line_rule) = self.line_rule {
            spacing = spacing.line_rule(line_rule.to_docx_line_spacing_type());
        }

        spacing
    }
}

/// 段落缩进 (twip)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParagraphIndent {
    pub left: Option<i32>,
    pub right: Option<i32>,
    /// 正值为首行缩进，负值为悬挂缩进
    pub first_line: Option<i32>,
}

impl ParagraphIndent {
    /// 创建新的段落缩进
    pub fn new() -> Self {
        Self::default()
    }

    fn special_indent(&self) -> Option<docx_rs::SpecialIndentType> {
        match self.first_line {
            Some(v) if v > 0 => Some(docx_rs::SpecialIndentType::FirstLine(v)),
            Some(v) if v < 0 => Some(docx_rs::SpecialIndentType::Hanging(-v)),
            _ => None,
        }
    }
}

/// 段落四边是否有单线边框
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParagraphBorders {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl ParagraphBorders {
    pub fn any(&self) -> bool {
        self.top || self.bottom || self.left || self.right
    }

    /// 转换为 docx-rs 的 ParagraphBorders
    pub fn to_docx_borders(&self) -> docx_rs::ParagraphBorders {
        let mut borders = docx_rs::ParagraphBorders::with_empty();
        let edges = [
            (self.top, docx_rs::ParagraphBorderPosition::Top),
            (self.bottom, docx_rs::ParagraphBorderPosition::Bottom),
            (self.left, docx_rs::ParagraphBorderPosition::Left),
            (self.right, docx_rs::ParagraphBorderPosition::Right),
        ];
        for (present, position) in edges {
            if present {
                borders = borders.set(
                    docx_rs::ParagraphBorder::new(position).val(docx_rs::BorderType::Single),
                );
            }
        }
        borders
    }
}

/// 页面边距 (twip)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMargin {
    pub right: i32,
    pub gutter: i32,
}

impl PageMargin {
    /// 右边距与装订线使用同一个值
    pub fn uniform(value: i32) -> Self {
        Self {
            right: value,
            gutter: value,
        }
    }
}

/// 编号引用
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberingRef {
    pub id: usize,
    pub level: usize,
}

/// 文档
#[derive(Debug, Clone, Default)]
pub struct Document {
    paragraphs: Vec<Paragraph>,
    page_margin: Option<PageMargin>,
}

impl Document {
    /// 创建新的文档
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置页面边距，只能在添加段落之前设置一次
    pub fn set_page_margin(&mut self, margin: PageMargin) -> DocxAdapterResult<()> {
        if self.page_margin.is_some() {
            return Err(DocxAdapterError::InvalidConfig("页面边距已经设置".to_string()));
        }
        if !self.paragraphs.is_empty() {
            return Err(DocxAdapterError::InvalidConfig(
                "页面边距必须在添加段落之前设置".to_string(),
            ));
        }
        self.page_margin = Some(margin);
        Ok(())
    }

    pub fn page_margin(&self) -> Option<PageMargin> {
        self.page_margin
    }

    /// 添加段落
    pub fn add_paragraph(&mut self, paragraph: Paragraph) -> &mut Self {
        self.paragraphs.push(paragraph);
        self
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    fn uses_numbering(&self) -> bool {
        self.paragraphs.iter().any(|p| p.numbering.is_some())
    }

    /// 创建 docx-rs 文档
    pub fn create_document(&self) -> docx_rs::Docx {
        let mut docx = docx_rs::Docx::new();

        if let Some(margin) = &self.page_margin {
            docx = docx.page_margin(
                docx_rs::PageMargin::new()
                    .right(margin.right)
                    .gutter(margin.gutter),
            );
            debug!(
                "【create_document】已应用页面边距: right={}, gutter={}",
                margin.right, margin.gutter
            );
        }

        docx = add_list_styles(docx);

        if self.uses_numbering() {
            let id = DocConstants::LIST_NUMBERING_ID;
            docx = docx
                .add_abstract_numbering(bullet_abstract_numbering(id))
                .add_numbering(docx_rs::Numbering::new(id, id));
        }

        for paragraph in &self.paragraphs {
            docx = docx.add_paragraph(paragraph.to_docx_paragraph());
        }

        docx
    }

    /// 按文档顺序列出每个文本块的文字效果
    fn run_effects(&self) -> Vec<RunEffects> {
        self.paragraphs
            .iter()
            .flat_map(|p| p.runs.iter().map(|r| r.props.effects))
            .collect()
    }

    /// 打包为 .docx 字节
    pub fn to_bytes(&self) -> DocxAdapterResult<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        self.create_document()
            .build()
            .pack(&mut cursor)
            .map_err(|e| DocxAdapterError::DocxError(docx_rs::DocxError::ZipError(e)))?;
        let bytes = cursor.into_inner();

        let effects = self.run_effects();
        if effects.iter().all(|e| e.is_empty()) {
            return Ok(bytes);
        }
        run_effects::apply(&bytes, &effects)
    }

    /// 保存文档
    pub fn save<P: AsRef<Path>>(&self, filepath: P) -> DocxAdapterResult<()> {
        std::fs::write(filepath, self.to_bytes()?)?;
        Ok(())
    }

    /// 获取 Base64 编码的文档
    pub fn to_base64(&self) -> DocxAdapterResult<String> {
        Ok(base64::encode(self.to_bytes()?))
    }
}

/// 列表使用的段落样式
fn add_list_styles(docx: docx_rs::Docx) -> docx_rs::Docx {
    let mut list_paragraph =
        docx_rs::Style::new(DocConstants::LIST_PARAGRAPH_STYLE, docx_rs::StyleType::Paragraph)
            .name("List Paragraph");
    list_paragraph.paragraph_property =
        docx_rs::ParagraphProperty::new().indent(Some(720), None, None, None);

    let list_bullet =
        docx_rs::Style::new(DocConstants::LIST_BULLET_STYLE, docx_rs::StyleType::Paragraph)
            .name("List Bullet");

    docx.add_style(list_paragraph).add_style(list_bullet)
}

/// 九级项目符号编号定义
fn bullet_abstract_numbering(id: usize) -> docx_rs::AbstractNumbering {
    let mut numbering = docx_rs::AbstractNumbering::new(id);
    for level in 0..9usize {
        let glyph = if level % 2 == 0 { "•" } else { "o" };
        let left = 720 * (level as i32 + 1);
        numbering = numbering.add_level(
            docx_rs::Level::new(
                level,
                docx_rs::Start::new(1),
                docx_rs::NumberFormat::new("bullet"),
                docx_rs::LevelText::new(glyph),
                docx_rs::LevelJc::new("left"),
            )
            .indent(Some(left), Some(docx_rs::SpecialIndentType::Hanging(360)), None, None),
        );
    }
    numbering
}

/// 段落
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    pub runs: Vec<TextRun>,
    pub alignment: Option<AlignmentType>,
    pub spacing: Option<ParagraphSpacing>,
    pub indent: Option<ParagraphIndent>,
    pub borders: ParagraphBorders,
    pub numbering: Option<NumberingRef>,
    pub style: Option<String>,
}

impl Paragraph {
    /// 创建新的段落
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加文本运行
    pub fn add_text_run(&mut self, run: TextRun) -> &mut Self {
        self.runs.push(run);
        self
    }

    pub fn align(&mut self, alignment: AlignmentType) -> &mut Self {
        self.alignment = Some(alignment);
        self
    }

    pub fn spacing(&mut self, spacing: ParagraphSpacing) -> &mut Self {
        self.spacing = Some(spacing);
        self
    }

    pub fn indent_full(&mut self, indent: ParagraphIndent) -> &mut Self {
        self.indent = Some(indent);
        self
    }

    /// 只修改左缩进
    pub fn indent(&mut self, left_indent: i32) -> &mut Self {
        let mut indent = self.indent.unwrap_or_default();
        indent.left = Some(left_indent);
        self.indent = Some(indent);
        self
    }

    pub fn numbering(&mut self, id: usize, level: usize) -> &mut Self {
        self.numbering = Some(NumberingRef { id, level });
        self
    }

    pub fn style(&mut self, style: &str) -> &mut Self {
        self.style = Some(style.to_string());
        self
    }

    /// 段落全文
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// 转换为 docx-rs 的 Paragraph
    pub fn to_docx_paragraph(&self) -> docx_rs::Paragraph {
        let mut paragraph = docx_rs::Paragraph::new();

        if let Some(style) = &self.style {
            paragraph = paragraph.style(style);
        }

        if let Some(alignment) = &self.alignment {
            paragraph = paragraph.align(alignment.to_docx_alignment());
        }

        if let Some(spacing) = &self.spacing {
            paragraph = paragraph.line_spacing(spacing.to_docx_line_spacing());
        }

        if let Some(indent) = &self.indent {
            paragraph = paragraph.indent(indent.left, indent.special_indent(), indent.right, None);
        }

        if let Some(numbering) = &self.numbering {
            paragraph = paragraph.numbering(
                docx_rs::NumberingId::new(numbering.id),
                docx_rs::IndentLevel::new(numbering.level),
            );
        }

        if self.borders.any() {
            paragraph = paragraph.set_borders(self.borders.to_docx_borders());
        }

        for run in &self.runs {
            paragraph = paragraph.add_run(run.to_docx_run());
        }

        paragraph
    }
}

/// 文本运行
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub props: RunProps,
}

impl TextRun {
    /// 创建新的文本运行
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            props: RunProps::default(),
        }
    }

    /// 使用指定的属性创建新的文本运行
    pub fn with_props(text: &str, props: RunProps) -> Self {
        Self {
            text: text.to_string(),
            props,
        }
    }

    /// 转换为 docx-rs 的 Run，制表符与换行转换为对应的子元素
    pub fn to_docx_run(&self) -> docx_rs::Run {
        let mut run = docx_rs::Run::new();
        run.run_property = self.props.to_run_property();

        for (i, line) in self.text.split('\n').enumerate() {
            if i > 0 {
                run = run.add_break(docx_rs::BreakType::TextWrapping);
            }
            for (j, segment) in line.split('\t').enumerate() {
                if j > 0 {
                    run = run.add_tab();
                }
                if !segment.is_empty() {
                    run = run.add_text(segment);
                }
            }
        }

        run
    }
}
