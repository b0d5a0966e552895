use serde::{Deserialize, Serialize};
use crate::models::format_codes::BorderCode;

/// 旧版文档 (解析结果)
///
/// 文档 → 节 → 段落 → 文本块 构成一棵严格的所有权树
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceDocument {
    pub sections: Vec<Section>,
}

impl SourceDocument {
    /// 创建空文档
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建只包含一个节的文档
    pub fn with_paragraphs(paragraphs: Vec<SourceParagraph>) -> Self {
        SourceDocument {
            sections: vec![Section { paragraphs }],
        }
    }

    /// 按节、段落顺序遍历全部段落
    pub fn paragraphs(&self) -> impl Iterator<Item = &SourceParagraph> {
        self.sections.iter().flat_map(|s| s.paragraphs.iter())
    }

    /// 段落总数
    pub fn paragraph_count(&self) -> usize {
        self.sections.iter().map(|s| s.paragraphs.len()).sum()
    }

    /// 文本块总数
    pub fn run_count(&self) -> usize {
        self.paragraphs().map(|p| p.runs.len()).sum()
    }
}

/// 节
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Section {
    pub paragraphs: Vec<SourceParagraph>,
}

impl Section {
    pub fn new() -> Self {
        Self::default()
    }
}

/// 行距描述 (sprmPDyaLine)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSpacingDescriptor {
    /// 行距值
    pub line: i16,
    /// 是否为多倍行距
    pub multiple: bool,
}

/// 段落四边的边框类型
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceBorders {
    pub top: BorderCode,
    pub bottom: BorderCode,
    pub left: BorderCode,
    pub right: BorderCode,
}

/// 源段落
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceParagraph {
    /// 对齐代码 (0 = 未设置, 1 左, 2 居中, 3 右, 4 两端)
    pub justification: i32,
    /// 段前间距 (twip)
    pub spacing_before: u32,
    /// 段后间距 (twip)
    pub spacing_after: u32,
    /// 左缩进 (twip)
    pub indent_left: i32,
    /// 右缩进 (twip)
    pub indent_right: i32,
    /// 首行缩进 (twip)，负值为悬挂缩进
    pub indent_first_line: i32,
    /// 列表层级，-1 表示不是列表项
    pub list_level: i32,
    pub borders: SourceBorders,
    pub line_spacing: Option<LineSpacingDescriptor>,
    pub runs: Vec<SourceRun>,
}

impl Default for SourceParagraph {
    fn default() -> Self {
        SourceParagraph {
            justification: 0,
            spacing_before: 0,
            spacing_after: 0,
            indent_left: 0,
            indent_right: 0,
            indent_first_line: 0,
            list_level: -1,
            borders: SourceBorders::default(),
            line_spacing: None,
            runs: Vec::new(),
        }
    }
}

impl SourceParagraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加文本块
    pub fn add_run(mut self, run: SourceRun) -> Self {
        self.runs.push(run);
        self
    }

    /// 设置对齐代码
    pub fn justification(mut self, code: i32) -> Self {
        self.justification = code;
        self
    }

    /// 设置列表层级
    pub fn list_level(mut self, level: i32) -> Self {
        self.list_level = level;
        self
    }

    /// 段落全文，即各文本块文本按顺序拼接
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// 是否为列表项
    pub fn is_list_item(&self) -> bool {
        self.list_level >= 0
    }
}

/// 源文本块 (格式一致的连续字符)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub strike: bool,
    /// 下划线代码 (0 = 无, 1-7 对应不同样式)
    pub underline: i32,
    /// 颜色 0xRRGGBB，-1 表示未指定
    pub color: i32,
    pub font_name: Option<String>,
    /// 字号 (半磅)
    pub font_size: u32,
    /// 上下标 (0 = 基线, 1 = 下标, 2 = 上标)
    pub sub_super_script: i32,
    /// 字距调整 (0 = 无)
    pub kerning: i32,
    pub emboss: bool,
    pub imprint: bool,
    pub shadow: bool,
}

impl SourceRun {
    /// 创建默认格式的文本块 (10 磅，无颜色)
    pub fn new(text: &str) -> Self {
        SourceRun {
            text: text.to_string(),
            bold: false,
            italic: false,
            strike: false,
            underline: 0,
            color: -1,
            font_name: None,
            font_size: 20,
            sub_super_script: 0,
            kerning: 0,
            emboss: false,
            imprint: false,
            shadow: false,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn size(mut self, half_points: u32) -> Self {
        self.font_size = half_points;
        self
    }

    pub fn color(mut self, color: i32) -> Self {
        self.color = color;
        self
    }

    pub fn font(mut self, name: &str) -> Self {
        self.font_name = Some(name.to_string());
        self
    }

    pub fn underline(mut self, code: i32) -> Self {
        self.underline = code;
        self
    }
}
