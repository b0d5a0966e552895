use lazy_static::lazy_static;
use regex::Regex;

pub struct DocConstants;

impl DocConstants {
    /// 项目符号行的起始字形
    pub const BULLET_GLYPHS: [char; 2] = ['►', '>'];
    /// 输出时使用的项目符号文本
    pub const BULLET_TEXT: &'static str = "► ";
    /// 邮件地址文本的颜色
    pub const EMAIL_COLOR: &'static str = "0000FF";
    /// 每英寸 twip 数
    pub const TWIPS_PER_INCH: i32 = 1440;
    /// 1.15 倍行距 (240 = 单倍)
    pub const LINE_SPACING_115: i32 = 276;
    /// 所有列表段落共用的编号定义 id
    pub const LIST_NUMBERING_ID: usize = 1;
    /// 列表样式
    pub const LIST_PARAGRAPH_STYLE: &'static str = "ListParagraph";
    pub const LIST_BULLET_STYLE: &'static str = "ListBullet";
}

lazy_static! {
    // 传输编码字母表
    pub static ref BASE64_REGEX: Regex = Regex::new(r"^[A-Za-z0-9+/]*={0,2}$").unwrap();
    pub static ref WHITESPACE_REGEX: Regex = Regex::new(r"\s+").unwrap();
}
