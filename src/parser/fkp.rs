use log::warn;

use super::{read_u16, read_u32, read_u8, slice_at, DocParseResult};

const PAGE_SIZE: usize = 512;
const PN_MASK: u32 = 0x003F_FFFF;
const BX_PAPX_SIZE: usize = 13;

/// 格式化磁盘页 (FKP) 的种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FkpKind {
    Chpx,
    Papx,
}

/// FKP 中的一条属性记录，覆盖 [fc_start, fc_end)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FkpEntry {
    pub fc_start: u32,
    pub fc_end: u32,
    /// 段落样式索引，仅 PAPX 有效
    pub istd: u16,
    pub grpprl: Vec<u8>,
}

/// 按文件偏移排序的属性记录
#[derive(Debug, Clone, Default)]
pub struct FkpTable {
    entries: Vec<FkpEntry>,
}

impl FkpTable {
    /// 通过 PlcfBte 读取全部 FKP 页
    ///
    /// 单个损坏的页面只记录警告并跳过
    pub fn parse(kind: FkpKind, word_stream: &[u8], table_stream: &[u8], fc: u32, lcb: u32) -> DocParseResult<Self> {
        let plc = slice_at(table_stream, fc as usize, lcb as usize, "PlcfBte")?;
        if plc.len() < 4 {
            return Ok(FkpTable::default());
        }
        let count = (plc.len() - 4) / 8;
        let pn_base = (count + 1) * 4;

        let mut entries = Vec::new();
        for i in 0..count {
            let pn = read_u32(plc, pn_base + i * 4, "PlcfBte pn")? & PN_MASK;
            let offset = pn as usize * PAGE_SIZE;
            let page = match slice_at(word_stream, offset, PAGE_SIZE, "FKP 页") {
                Ok(page) => page,
                Err(e) => {
                    warn!("【FkpTable::parse】跳过 {:?} 页 {}: {}", kind, pn, e);
                    continue;
                }
            };
            match read_page(kind, page) {
                Ok(mut page_entries) => entries.append(&mut page_entries),
                Err(e) => warn!("【FkpTable::parse】{:?} 页 {} 无效: {}", kind, pn, e),
            }
        }
        entries.sort_by_key(|e| e.fc_start);
        Ok(FkpTable { entries })
    }

    pub fn entries(&self) -> &[FkpEntry] {
        &self.entries
    }

    /// 查找覆盖指定文件偏移的记录下标
    pub fn position(&self, fc: u32) -> Option<usize> {
        let idx = self.entries.partition_point(|e| e.fc_start <= fc);
        if idx == 0 {
            return None;
        }
        let entry = &self.entries[idx - 1];
        if fc < entry.fc_end {
            Some(idx - 1)
        } else {
            None
        }
    }

    /// 查找覆盖指定文件偏移的记录
    pub fn find(&self, fc: u32) -> Option<&FkpEntry> {
        self.position(fc).map(|i| &self.entries[i])
    }
}

fn read_page(kind: FkpKind, page: &[u8]) -> DocParseResult<Vec<FkpEntry>> {
    let crun = read_u8(page, PAGE_SIZE - 1, "FKP crun")? as usize;
    let rgb_base = (crun + 1) * 4;
    let mut entries = Vec::with_capacity(crun);

    for i in 0..crun {
        let fc_start = read_u32(page, i * 4, "FKP rgfc")?;
        let fc_end = read_u32(page, (i + 1) * 4, "FKP rgfc")?;
        let entry = match kind {
            FkpKind::Chpx => {
                let b = read_u8(page, rgb_base + i, "CHPX 偏移")? as usize * 2;
                if b == 0 {
                    FkpEntry { fc_start, fc_end, istd: 0, grpprl: Vec::new() }
                } else {
                    let cb = read_u8(page, b, "CHPX cb")? as usize;
                    let grpprl = slice_at(page, b + 1, cb, "CHPX grpprl")?.to_vec();
                    FkpEntry { fc_start, fc_end, istd: 0, grpprl }
                }
            }
            FkpKind::Papx => {
                let b = read_u8(page, rgb_base + i * BX_PAPX_SIZE, "PAPX 偏移")? as usize * 2;
                if b == 0 {
                    FkpEntry { fc_start, fc_end, istd: 0, grpprl: Vec::new() }
                } else {
                    let cb = read_u8(page, b, "PAPX cb")? as usize;
                    let (start, len) = if cb != 0 {
                        (b + 1, cb * 2 - 1)
                    } else {
                        (b + 2, read_u8(page, b + 1, "PAPX cb'")? as usize * 2)
                    };
                    let data = slice_at(page, start, len, "PAPX grpprl")?;
                    let istd = read_u16(data, 0, "PAPX istd")?;
                    FkpEntry { fc_start, fc_end, istd, grpprl: data[2..].to_vec() }
                }
            }
        };
        entries.push(entry);
    }
    Ok(entries)
}
