//! 旧版文档中的数值格式代码
//!
//! 每个代码都转换为带有 "未知" 分支的枚举，而不是直接比较数值

use serde::{Deserialize, Serialize};

/// 段落对齐代码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JustificationCode {
    /// 0: 未设置
    Absent,
    Left,
    Center,
    Right,
    Justified,
    Unknown(i32),
}

impl JustificationCode {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => JustificationCode::Absent,
            1 => JustificationCode::Left,
            2 => JustificationCode::Center,
            3 => JustificationCode::Right,
            4 => JustificationCode::Justified,
            other => JustificationCode::Unknown(other),
        }
    }
}

/// 下划线代码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnderlineCode {
    None,
    Single,
    Double,
    Dotted,
    Dash,
    Words,
    Thick,
    Wave,
    Unknown(i32),
}

impl UnderlineCode {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => UnderlineCode::None,
            1 => UnderlineCode::Single,
            2 => UnderlineCode::Double,
            3 => UnderlineCode::Dotted,
            4 => UnderlineCode::Dash,
            5 => UnderlineCode::Words,
            6 => UnderlineCode::Thick,
            7 => UnderlineCode::Wave,
            other => UnderlineCode::Unknown(other),
        }
    }

    /// 将 Word 二进制格式的 kul 值转换为下划线代码
    pub fn from_kul(kul: u8) -> i32 {
        match kul {
            0 => 0,
            1 => 1,
            3 => 2,
            4 | 20 => 3,
            7 | 9 | 10 | 23 | 25 | 26 | 39 | 55 => 4,
            2 => 5,
            6 => 6,
            11 | 27 | 43 => 7,
            // 5 为隐藏下划线
            5 => 0,
            _ => 1,
        }
    }
}

/// 上下标代码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalCode {
    Baseline,
    Subscript,
    Superscript,
}

impl VerticalCode {
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => VerticalCode::Subscript,
            2 => VerticalCode::Superscript,
            _ => VerticalCode::Baseline,
        }
    }

    /// 将 Word 二进制格式的 iss 值 (1 上标, 2 下标) 转换为代码
    pub fn from_iss(iss: u8) -> i32 {
        match iss {
            1 => 2,
            2 => 1,
            _ => 0,
        }
    }
}

/// 边框类型代码 (brcType)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BorderCode {
    #[default]
    None,
    Single,
    Thick,
    Double,
    Hairline,
    Dotted,
    Dashed,
    Other(u8),
}

impl BorderCode {
    pub fn from_brc_type(brc_type: u8) -> Self {
        match brc_type {
            // 0xFF 为 "nil" 边框
            0 | 0xFF => BorderCode::None,
            1 => BorderCode::Single,
            2 => BorderCode::Thick,
            3 => BorderCode::Double,
            5 => BorderCode::Hairline,
            6 => BorderCode::Dotted,
            7 | 8 | 22 => BorderCode::Dashed,
            other => BorderCode::Other(other),
        }
    }

    /// 是否声明了非默认边框
    pub fn is_present(&self) -> bool {
        !matches!(self, BorderCode::None)
    }
}
