use encoding_rs::WINDOWS_1252;
use log::warn;

use super::{read_i16, read_u32, slice_at, DocParseError, DocParseResult};

const FC_COMPRESSED: u32 = 0x4000_0000;

/// 文本片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub cp_start: u32,
    pub cp_end: u32,
    /// 片段在 WordDocument 流中的字节偏移
    pub fc: u32,
    /// 8 位压缩文本 (Windows-1252)
    pub compressed: bool,
}

impl Piece {
    fn bytes_per_char(&self) -> u32 {
        if self.compressed {
            1
        } else {
            2
        }
    }

    /// 片段内某个字符位置的文件偏移
    pub fn fc_for_cp(&self, cp: u32) -> u32 {
        self.fc + (cp - self.cp_start) * self.bytes_per_char()
    }
}

/// 带文件偏移的字符 (UTF-16 码元)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocChar {
    pub unit: u16,
    pub fc: u32,
}

/// 片段表
#[derive(Debug, Clone, Default)]
pub struct PieceTable {
    pieces: Vec<Piece>,
}

impl PieceTable {
    /// 从表格流中的 Clx 结构解析片段表
    pub fn parse(table_stream: &[u8], fc_clx: u32, lcb_clx: u32) -> DocParseResult<Self> {
        let clx = slice_at(table_stream, fc_clx as usize, lcb_clx as usize, "Clx")?;
        let mut pos = 0usize;
        while pos < clx.len() {
            match clx[pos] {
                // Prc: 跳过属性修改
                0x01 => {
                    let cb = read_i16(clx, pos + 1, "Prc cbGrpprl")?;
                    if cb < 0 {
                        return Err(DocParseError::Invalid(format!("Prc 长度为负: {}", cb)));
                    }
                    pos += 3 + cb as usize;
                }
                // Pcdt
                0x02 => {
                    let lcb = read_u32(clx, pos + 1, "Pcdt lcb")? as usize;
                    let plc = slice_at(clx, pos + 5, lcb, "PlcPcd")?;
                    return Self::parse_plc_pcd(plc);
                }
                other => {
                    return Err(DocParseError::Invalid(format!("未知的 Clx 类型: 0x{:02X}", other)));
                }
            }
        }
        Err(DocParseError::Invalid("Clx 中没有片段表".to_string()))
    }

    fn parse_plc_pcd(plc: &[u8]) -> DocParseResult<Self> {
        if plc.len() < 16 {
            return Err(DocParseError::Truncated("PlcPcd".to_string()));
        }
        let count = (plc.len() - 4) / 12;
        let pcd_base = (count + 1) * 4;
        let mut pieces = Vec::with_capacity(count);
        for i in 0..count {
            let cp_start = read_u32(plc, i * 4, "PlcPcd CP")?;
            let cp_end = read_u32(plc, (i + 1) * 4, "PlcPcd CP")?;
            let raw_fc = read_u32(plc, pcd_base + i * 8 + 2, "Pcd fc")?;
            let compressed = raw_fc & FC_COMPRESSED != 0;
            let fc = if compressed {
                (raw_fc & !FC_COMPRESSED) / 2
            } else {
                raw_fc
            };
            if cp_end < cp_start {
                return Err(DocParseError::Invalid(format!("片段 {} 的字符位置倒序", i)));
            }
            pieces.push(Piece {
                cp_start,
                cp_end,
                fc,
                compressed,
            });
        }
        Ok(PieceTable { pieces })
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// 读取 [0, cp_limit) 范围内的字符
    pub fn read_chars(&self, word_stream: &[u8], cp_limit: u32) -> DocParseResult<Vec<DocChar>> {
        // 每个字符至少占一个字节
        let mut chars = Vec::with_capacity(cp_limit.min(word_stream.len() as u32) as usize);
        for piece in &self.pieces {
            if piece.cp_start >= cp_limit {
                break;
            }
            let end = piece.cp_end.min(cp_limit);
            let count = (end - piece.cp_start) as usize;
            let byte_len = count * piece.bytes_per_char() as usize;
            let bytes = match slice_at(word_stream, piece.fc as usize, byte_len, "文本片段") {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!("【read_chars】片段 {}..{} 超出数据流: {}", piece.cp_start, end, e);
                    return Err(e);
                }
            };
            if piece.compressed {
                let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
                for (i, ch) in text.chars().enumerate() {
                    chars.push(DocChar {
                        unit: ch as u32 as u16,
                        fc: piece.fc_for_cp(piece.cp_start + i as u32),
                    });
                }
            } else {
                for i in 0..count {
                    let unit = u16::from_le_bytes([bytes[i * 2], bytes[i * 2 + 1]]);
                    chars.push(DocChar {
                        unit,
                        fc: piece.fc_for_cp(piece.cp_start + i as u32),
                    });
                }
            }
        }
        if (chars.len() as u32) < cp_limit {
            warn!("【read_chars】片段表只覆盖 {} 个字符，正文长度为 {}", chars.len(), cp_limit);
        }
        Ok(chars)
    }
}
