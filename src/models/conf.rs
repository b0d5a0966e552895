use serde::{Deserialize, Serialize};

/// 页边距预设 (单位: twip)
///
/// 右边距与装订线使用同一个值
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginPreset {
    /// 100 twip
    Wide,
    /// 10 twip (历史版本)
    Narrow,
}

impl MarginPreset {
    pub fn twips(&self) -> i32 {
        match self {
            MarginPreset::Wide => 100,
            MarginPreset::Narrow => 10,
        }
    }
}

/// 缩进策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndentationPolicy {
    /// 原样复制左/右/首行缩进，包括 0 和负值
    PreserveAll,
    /// 先全部归零，左/右缩进只在大于 0 时覆盖，首行缩进在非 0 时覆盖
    ResetThenOverridePositive,
}

/// 列表样式与层级的绑定方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListStyleBinding {
    /// 第 0 层使用 ListParagraph，更深层使用 ListBullet
    ParagraphAtTop,
    /// 第 0 层使用 ListBullet，更深层使用 ListParagraph (历史版本)
    BulletAtTop,
}

/// 字号换算策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontSizePolicy {
    /// 半磅整除 2 得到磅 (截断)
    HalfToWhole,
    /// 直接使用半磅数值 (历史版本)
    RawHalfPoints,
}

/// 转换配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConf {
    pub margin_preset: MarginPreset,
    pub indentation_policy: IndentationPolicy,
    pub list_style_binding: ListStyleBinding,
    pub font_size_policy: FontSizePolicy,
    /// 是否输出浮凸/阴文/阴影效果
    pub surface_effects: bool,
    /// 文本块没有字体时使用的字体
    pub fallback_font: String,
    /// 项目符号字形的字体
    pub bullet_font: String,
    /// 项目符号字形的字号 (磅)
    pub bullet_size: usize,
    /// 邮件地址文本的字体
    pub email_font: String,
    /// 邮件地址文本的字号 (磅)
    pub email_size: usize,
}

impl Default for ConvertConf {
    fn default() -> Self {
        ConvertConf {
            margin_preset: MarginPreset::Wide,
            indentation_policy: IndentationPolicy::PreserveAll,
            list_style_binding: ListStyleBinding::ParagraphAtTop,
            font_size_policy: FontSizePolicy::HalfToWhole,
            surface_effects: true,
            fallback_font: "Calibri".to_string(),
            bullet_font: "Segoe UI Symbol".to_string(),
            bullet_size: 8,
            email_font: "Calibri".to_string(),
            email_size: 11,
        }
    }
}

impl ConvertConf {
    /// 从 JSON 文本读取配置，未给出的字段使用默认值
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
