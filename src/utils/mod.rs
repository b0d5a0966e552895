pub mod doc_constants;

pub use doc_constants::{DocConstants, BASE64_REGEX, WHITESPACE_REGEX};

/// 颜色转换为 6 位大写十六进制，-1 (未指定颜色) 返回 None
pub fn format_hex_color(color: i32) -> Option<String> {
    if color == -1 {
        return None;
    }
    Some(format!("{:06X}", color & 0x00FF_FFFF))
}

/// 去掉开头空白后，文本是否以项目符号字形开头
pub fn starts_with_bullet(text: &str) -> bool {
    text.trim_start()
        .starts_with(|c: char| DocConstants::BULLET_GLYPHS.contains(&c))
}

/// 去掉开头的项目符号字形及其后的空白
pub fn strip_bullet_prefix(text: &str) -> &str {
    text.trim_start()
        .trim_start_matches(|c: char| DocConstants::BULLET_GLYPHS.contains(&c))
        .trim_start()
}

/// 将英寸转换为 twip
pub fn convert_inches_to_twip(inches: f32) -> i32 {
    (inches * DocConstants::TWIPS_PER_INCH as f32) as i32
}
