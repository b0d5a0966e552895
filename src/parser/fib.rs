use super::{read_u16, read_u32, DocParseError, DocParseResult};

/// Word 文档签名
pub const WORD_IDENT: u16 = 0xA5EC;
/// Word 97 的 nFib
pub const NFIB_WORD97: u16 = 0x00C1;

const FLAG_ENCRYPTED: u16 = 0x0100;
const FLAG_WHICH_TABLE: u16 = 0x0200;

/// FibRgFcLcb 中用到的索引
pub mod fc_index {
    pub const STSHF: usize = 1;
    pub const PLCF_SED: usize = 6;
    pub const PLCF_BTE_CHPX: usize = 12;
    pub const PLCF_BTE_PAPX: usize = 13;
    pub const STTBF_FFN: usize = 15;
    pub const CLX: usize = 33;
}

/// 文件信息块 (FIB)
#[derive(Debug, Clone)]
pub struct Fib {
    pub n_fib: u16,
    pub encrypted: bool,
    /// true 时使用 1Table 流
    pub use_table1: bool,
    /// 正文字符数
    pub ccp_text: u32,
    fc_lcb: Vec<(u32, u32)>,
}

impl Fib {
    /// 从 WordDocument 流解析 FIB
    pub fn parse(word_stream: &[u8]) -> DocParseResult<Self> {
        let ident = read_u16(word_stream, 0, "FIB wIdent")?;
        if ident != WORD_IDENT {
            return Err(DocParseError::BadSignature(ident));
        }
        let n_fib = read_u16(word_stream, 2, "FIB nFib")?;
        if n_fib < NFIB_WORD97 {
            return Err(DocParseError::UnsupportedVersion(n_fib));
        }
        let flags = read_u16(word_stream, 0x0A, "FIB flags")?;

        let mut pos = 32usize;
        let csw = read_u16(word_stream, pos, "FIB csw")? as usize;
        pos += 2 + csw * 2;
        let cslw = read_u16(word_stream, pos, "FIB cslw")? as usize;
        let rg_lw = pos + 2;
        let ccp_text = if cslw > 3 {
            read_u32(word_stream, rg_lw + 3 * 4, "FIB ccpText")?
        } else {
            return Err(DocParseError::Invalid(format!("FibRgLw 过短: {}", cslw)));
        };
        if ccp_text as usize > word_stream.len() {
            return Err(DocParseError::Invalid(format!(
                "正文长度 {} 超出 WordDocument 流 ({} 字节)",
                ccp_text,
                word_stream.len()
            )));
        }
        pos = rg_lw + cslw * 4;
        let cb_rg_fc_lcb = read_u16(word_stream, pos, "FIB cbRgFcLcb")? as usize;
        pos += 2;

        let mut fc_lcb = Vec::with_capacity(cb_rg_fc_lcb);
        for i in 0..cb_rg_fc_lcb {
            let offset = pos + i * 8;
            let fc = read_u32(word_stream, offset, "FibRgFcLcb")?;
            let lcb = read_u32(word_stream, offset + 4, "FibRgFcLcb")?;
            fc_lcb.push((fc, lcb));
        }

        Ok(Fib {
            n_fib,
            encrypted: flags & FLAG_ENCRYPTED != 0,
            use_table1: flags & FLAG_WHICH_TABLE != 0,
            ccp_text,
            fc_lcb,
        })
    }

    /// 表格流名称
    pub fn table_stream_name(&self) -> &'static str {
        if self.use_table1 {
            "1Table"
        } else {
            "0Table"
        }
    }

    /// 指定索引的 (fc, lcb)，lcb 为 0 时返回 None
    pub fn fc_lcb(&self, index: usize) -> Option<(u32, u32)> {
        self.fc_lcb
            .get(index)
            .copied()
            .filter(|&(_, lcb)| lcb > 0)
    }
}
