//! Word 97-2003 二进制文档 (.doc) 解析模块

pub mod doc_parser;
pub mod fib;
pub mod piece_table;
pub mod fkp;
pub mod sprm;
pub mod font_table;
pub mod stylesheet;
pub mod text_processor;

use thiserror::Error;

pub use doc_parser::{DocParser, parse_doc};
pub use fib::Fib;
pub use piece_table::{Piece, PieceTable};
pub use stylesheet::{StyleDefinition, StyleKind, StyleSheet};
pub use text_processor::{CharClass, FieldTracker};

/// 文档解析错误
#[derive(Error, Debug)]
pub enum DocParseError {
    #[error("IO错误: {0}")]
    IoError(#[from] std::io::Error),

    #[error("不是有效的 OLE 复合文档: {0}")]
    NotCompoundFile(String),

    #[error("缺少数据流: {0}")]
    MissingStream(String),

    #[error("文件签名无效: 0x{0:04X}")]
    BadSignature(u16),

    #[error("不支持的文件版本: nFib = 0x{0:04X}")]
    UnsupportedVersion(u16),

    #[error("不支持加密文档")]
    Encrypted,

    #[error("数据结构被截断: {0}")]
    Truncated(String),

    #[error("数据结构无效: {0}")]
    Invalid(String),
}

/// 文档解析结果
pub type DocParseResult<T> = Result<T, DocParseError>;

pub(crate) fn slice_at<'a>(data: &'a [u8], offset: usize, len: usize, what: &str) -> DocParseResult<&'a [u8]> {
    offset
        .checked_add(len)
        .and_then(|end| data.get(offset..end))
        .ok_or_else(|| DocParseError::Truncated(format!("{} (偏移 {}, 长度 {})", what, offset, len)))
}

pub(crate) fn read_u8(data: &[u8], offset: usize, what: &str) -> DocParseResult<u8> {
    Ok(slice_at(data, offset, 1, what)?[0])
}

pub(crate) fn read_u16(data: &[u8], offset: usize, what: &str) -> DocParseResult<u16> {
    let b = slice_at(data, offset, 2, what)?;
    Ok(u16::from_le_bytes([b[0], b[1]]))
}

pub(crate) fn read_i16(data: &[u8], offset: usize, what: &str) -> DocParseResult<i16> {
    Ok(read_u16(data, offset, what)? as i16)
}

pub(crate) fn read_u32(data: &[u8], offset: usize, what: &str) -> DocParseResult<u32> {
    let b = slice_at(data, offset, 4, what)?;
    Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}
