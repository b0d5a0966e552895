use log::warn;

use super::{read_u16, read_u8, slice_at, DocParseResult};

// FFN 中名称之前的固定部分
const FFN_NAME_OFFSET: usize = 40;

/// 字体表 (SttbfFfn)
#[derive(Debug, Clone, Default)]
pub struct FontTable {
    names: Vec<String>,
}

impl FontTable {
    pub fn parse(table_stream: &[u8], fc: u32, lcb: u32) -> DocParseResult<Self> {
        let data = slice_at(table_stream, fc as usize, lcb as usize, "SttbfFfn")?;
        let count = read_u16(data, 0, "SttbfFfn cData")? as usize;
        let mut names = Vec::with_capacity(count);
        let mut pos = 4usize;
        for i in 0..count {
            let size = read_u8(data, pos, "FFN cbFfnM1")? as usize + 1;
            let ffn = match slice_at(data, pos, size, "FFN") {
                Ok(ffn) => ffn,
                Err(e) => {
                    warn!("【FontTable::parse】第 {} 个字体记录被截断: {}", i, e);
                    break;
                }
            };
            names.push(ffn_name(ffn));
            pos += size;
        }
        Ok(FontTable { names })
    }

    pub fn from_names(names: Vec<String>) -> Self {
        FontTable { names }
    }

    /// 按索引取字体名称，越界时返回 None
    pub fn name(&self, index: u16) -> Option<&str> {
        self.names
            .get(index as usize)
            .map(|s| s.as_str())
            .filter(|s| !s.is_empty())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn ffn_name(ffn: &[u8]) -> String {
    let units: Vec<u16> = ffn
        .get(FFN_NAME_OFFSET..)
        .unwrap_or(&[])
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .take_while(|&u| u != 0)
        .collect();
    String::from_utf16_lossy(&units)
}
