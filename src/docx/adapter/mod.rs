//! Docx 适配器模块
//!
//! 目标文档模型与 docx-rs 之间的转换层

use docx_rs;
use thiserror::Error;

/// 下划线类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnderlineType {
    /// 单线下划线
    Single,
    /// 双线下划线
    Double,
    /// 点线下划线
    Dotted,
    /// 虚线下划线
    Dash,
    /// 仅文字下划线
    Words,
    /// 粗线下划线
    Thick,
    /// 波浪线下划线
    Wave,
    /// 无下划线
    None,
}

impl UnderlineType {
    /// 旧版下划线代码转换为下划线类型，未知代码为 None
    pub fn from_legacy_code(code: i32) -> Self {
        use crate::models::UnderlineCode;
        match UnderlineCode::from_code(code) {
            UnderlineCode::Single => UnderlineType::Single,
            UnderlineCode::Double => UnderlineType::Double,
            UnderlineCode::Dotted => UnderlineType::Dotted,
            UnderlineCode::Dash => UnderlineType::Dash,
            UnderlineCode::Words => UnderlineType::Words,
            UnderlineCode::Thick => UnderlineType::Thick,
            UnderlineCode::Wave => UnderlineType::Wave,
            UnderlineCode::None | UnderlineCode::Unknown(_) => UnderlineType::None,
        }
    }

    /// w:u 的取值
    pub fn to_docx_value(&self) -> Option<&'static str> {
        match self {
            UnderlineType::Single => Some("single"),
            UnderlineType::Double => Some("double"),
            UnderlineType::Dotted => Some("dotted"),
            UnderlineType::Dash => Some("dash"),
            UnderlineType::Words => Some("words"),
            UnderlineType::Thick => Some("thick"),
            UnderlineType::Wave => Some("wave"),
            UnderlineType::None => None,
        }
    }
}

/// 对齐方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentType {
    /// 左对齐
    Left,
    /// 居中对齐
    Center,
    /// 右对齐
    Right,
    /// 两端对齐
    Justify,
}

impl AlignmentType {
    /// 旧版对齐代码转换为对齐方式，未设置或未知代码均为左对齐
    pub fn from_legacy_code(code: i32) -> Self {
        use crate::models::JustificationCode;
        match JustificationCode::from_code(code) {
            JustificationCode::Center => AlignmentType::Center,
            JustificationCode::Right => AlignmentType::Right,
            JustificationCode::Justified => AlignmentType::Justify,
            JustificationCode::Left | JustificationCode::Absent | JustificationCode::Unknown(_) => {
                AlignmentType::Left
            }
        }
    }

    /// 转换为 docx-rs 的 AlignmentType
    pub fn to_docx_alignment(&self) -> docx_rs::AlignmentType {
        match self {
            AlignmentType::Left => docx_rs::AlignmentType::Left,
            AlignmentType::Center => docx_rs::AlignmentType::Center,
            AlignmentType::Right => docx_rs::AlignmentType::Right,
            AlignmentType::Justify => docx_rs::AlignmentType::Justified,
        }
    }
}

/// 行规则类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRuleType {
    /// 自动值 (按倍数)
    Auto,
}

impl LineRuleType {
    /// 转换为 docx-rs 的 LineSpacingType
    pub fn to_docx_line_spacing_type(&self) -> docx_rs::LineSpacingType {
        match self {
            LineRuleType::Auto => docx_rs::LineSpacingType::Auto,
        }
    }
}

/// 垂直位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalPosition {
    Subscript,
    Superscript,
}

impl VerticalPosition {
    /// 旧版上下标代码转换，基线返回 None
    pub fn from_legacy_code(code: i32) -> Option<Self> {
        use crate::models::VerticalCode;
        match VerticalCode::from_code(code) {
            VerticalCode::Subscript => Some(VerticalPosition::Subscript),
            VerticalCode::Superscript => Some(VerticalPosition::Superscript),
            VerticalCode::Baseline => None,
        }
    }

    pub fn to_docx_vert_align(&self) -> docx_rs::VertAlignType {
        match self {
            VerticalPosition::Subscript => docx_rs::VertAlignType::SubScript,
            VerticalPosition::Superscript => docx_rs::VertAlignType::SuperScript,
        }
    }
}

/// DOCX适配器错误
#[derive(Error, Debug)]
pub enum DocxAdapterError {
    #[error("IO错误: {0}")]
    IoError(#[from] std::io::Error),

    #[error("DOCX生成错误: {0}")]
    DocxError(#[from] docx_rs::DocxError),

    #[error("ZIP错误: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("文档包内容无效: {0}")]
    MalformedPart(String),

    #[error("无效的配置: {0}")]
    InvalidConfig(String),
}

/// DOCX适配器结果
pub type DocxAdapterResult<T> = Result<T, DocxAdapterError>;

/// docx-rs 不支持的文字效果，打包后写入 document.xml
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunEffects {
    pub kerning: Option<i32>,
    pub emboss: bool,
    pub imprint: bool,
    pub shadow: bool,
}

impl RunEffects {
    pub fn is_empty(&self) -> bool {
        self.kerning.is_none() && !self.emboss && !self.imprint && !self.shadow
    }
}

/// 运行属性
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunProps {
    /// 字号 (磅)
    pub size: Option<usize>,
    pub font: Option<String>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub strike: Option<bool>,
    pub underline: Option<UnderlineType>,
    /// 6 位十六进制颜色
    pub color: Option<String>,
    pub vertical: Option<VerticalPosition>,
    pub effects: RunEffects,
}

impl RunProps {
    /// 创建新的运行属性
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置字体大小
    pub fn size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    /// 设置字体
    pub fn font(mut self, font: &str) -> Self {
        self.font = Some(font.to_string());
        self
    }

    /// 设置粗体
    pub fn bold(mut self) -> Self {
        self.bold = Some(true);
        self
    }

    /// 设置斜体
    pub fn italic(mut self) -> Self {
        self.italic = Some(true);
        self
    }

    pub fn strike(mut self) -> Self {
        self.strike = Some(true);
        self
    }

    /// 设置下划线
    pub fn underline(mut self, underline: UnderlineType) -> Self {
        self.underline = Some(underline);
        self
    }

    /// 设置颜色
    pub fn color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    /// 设置上下标
    pub fn vertical(mut self, vertical: VerticalPosition) -> Self {
        self.vertical = Some(vertical);
        self
    }

    /// 转换为 docx-rs 的 RunProperty
    pub fn to_run_property(&self) -> docx_rs::RunProperty {
        let mut property = docx_rs::RunProperty::new();

        if let Some(size) = self.size {
            // w:sz 的单位是半磅
            property = property.size(size * 2);
        }

        if let Some(font) = &self.font {
            let run_fonts = docx_rs::RunFonts::new()
                .east_asia(font)
                .ascii(font)
                .hi_ansi(font)
                .cs(font);
            property = property.fonts(run_fonts);
        }

        if let Some(true) = self.bold {
            property = property.bold();
        }

        if let Some(true) = self.italic {
            property = property.italic();
        }

        if let Some(true) = self.strike {
            property = property.strike();
        }

        if let Some(value) = self.underline.and_then(|u| u.to_docx_value()) {
            property = property.underline(value);
        }

        if let Some(color) = &self.color {
            property = property.color(color);
        }

        if let Some(vertical) = &self.vertical {
            property = property.vert_align(vertical.to_docx_vert_align());
        }

        property
    }
}

/// 导出 docx 子模块
pub mod docx;
pub mod run_effects;
