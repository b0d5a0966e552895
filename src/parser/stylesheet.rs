//! 样式表 (STSH) 与 basedOn 链的解析

use log::{debug, warn};

use super::sprm::{char_style, CharProps, ParagraphProps};
use super::{read_u16, slice_at, DocParseResult};

/// 没有基础样式
const ISTD_NIL: u16 = 0x0FFF;
/// Normal 样式
const ISTD_NORMAL: u16 = 0;

/// 样式类型 (stk)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleKind {
    Paragraph,
    Character,
    /// 表格与列表样式，不参与属性计算
    Other,
}

impl StyleKind {
    fn from_stk(stk: u16) -> Self {
        match stk {
            1 => StyleKind::Paragraph,
            2 => StyleKind::Character,
            _ => StyleKind::Other,
        }
    }
}

/// 单个样式定义 (STD)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleDefinition {
    pub name: String,
    pub kind: StyleKind,
    pub based_on: Option<u16>,
    /// 段落属性修改，仅段落样式有
    pub papx: Vec<u8>,
    pub chpx: Vec<u8>,
}

/// 样式表
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    styles: Vec<Option<StyleDefinition>>,
    default_font: Option<u16>,
}

impl StyleSheet {
    /// 从表格流读取 STSH
    ///
    /// 单个损坏的样式只记录警告，按空样式处理
    pub fn parse(table_stream: &[u8], fc: u32, lcb: u32) -> DocParseResult<Self> {
        let data = slice_at(table_stream, fc as usize, lcb as usize, "STSH")?;
        let cb_stshi = read_u16(data, 0, "STSH cbStshi")? as usize;
        let stshi = slice_at(data, 2, cb_stshi, "Stshi")?;
        let cstd = read_u16(stshi, 0, "Stshi cstd")? as usize;
        let cb_std_base = read_u16(stshi, 2, "Stshi cbSTDBaseInFile")? as usize;
        // rgftcStandardChpStsh[0]: 默认 ASCII 字体
        let default_font = read_u16(stshi, 12, "Stshi ftcAsci").ok();

        let mut styles = Vec::with_capacity(cstd.min(data.len() / 2));
        let mut pos = 2 + cb_stshi;
        for istd in 0..cstd {
            let cb_std = read_u16(data, pos, "LPStd cbStd")? as usize;
            pos += 2;
            if cb_std == 0 {
                styles.push(None);
                continue;
            }
            let std = slice_at(data, pos, cb_std, "STD")?;
            pos += cb_std;
            match parse_std(std, cb_std_base) {
                Ok(style) => styles.push(Some(style)),
                Err(e) => {
                    warn!("【StyleSheet::parse】样式 {} 无效: {}", istd, e);
                    styles.push(None);
                }
            }
        }
        debug!("【StyleSheet::parse】读取 {} 个样式", styles.iter().flatten().count());
        Ok(StyleSheet { styles, default_font })
    }

    pub fn style(&self, istd: u16) -> Option<&StyleDefinition> {
        self.styles.get(istd as usize).and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// 文档默认的字符属性
    pub fn default_char_props(&self) -> CharProps {
        CharProps {
            font_index: self.default_font,
            ..CharProps::default()
        }
    }

    /// 段落样式解析后的段落属性与字符属性，未知样式按 Normal 处理
    pub fn paragraph_props(&self, istd: u16) -> (ParagraphProps, CharProps) {
        let mut chain = self.chain(istd, StyleKind::Paragraph);
        if chain.is_empty() && istd != ISTD_NORMAL {
            debug!("【StyleSheet::paragraph_props】段落样式 {} 不存在，使用 Normal", istd);
            chain = self.chain(ISTD_NORMAL, StyleKind::Paragraph);
        }
        let mut pap = ParagraphProps::default();
        let mut chp = self.default_char_props();
        for style in chain {
            pap.apply(&style.papx);
            chp.apply(&style.chpx);
        }
        (pap, chp)
    }

    /// 在段落样式的字符属性上依次应用字符样式与直接格式
    pub fn run_props(&self, paragraph_chp: &CharProps, grpprl: &[u8]) -> CharProps {
        let mut chp = paragraph_chp.clone();
        if let Some(istd) = char_style(grpprl) {
            for style in self.chain(istd, StyleKind::Character) {
                chp.apply(&style.chpx);
            }
        }
        chp.apply(grpprl);
        chp
    }

    /// 从最顶层的基础样式开始排列
    fn chain(&self, istd: u16, kind: StyleKind) -> Vec<&StyleDefinition> {
        let mut chain = Vec::new();
        let mut next = Some(istd);
        while let Some(current) = next {
            let Some(style) = self.style(current).filter(|s| s.kind == kind) else {
                break;
            };
            if chain.len() >= self.styles.len() {
                warn!("【StyleSheet::chain】样式 {} 的 basedOn 链存在循环", istd);
                break;
            }
            chain.push(style);
            next = style.based_on;
        }
        chain.reverse();
        chain
    }
}

fn parse_std(std: &[u8], cb_std_base: usize) -> DocParseResult<StyleDefinition> {
    let kind_and_base = read_u16(std, 2, "Stdf stk")?;
    let kind = StyleKind::from_stk(kind_and_base & 0x000F);
    let based_on = Some(kind_and_base >> 4).filter(|&istd| istd != ISTD_NIL);
    let cupx = (read_u16(std, 4, "Stdf cupx")? & 0x000F) as usize;

    let mut pos = cb_std_base;
    let cch = read_u16(std, pos, "Xstz cch")? as usize;
    let units: Vec<u16> = slice_at(std, pos + 2, cch * 2, "Xstz")?
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .collect();
    let name = String::from_utf16_lossy(&units);
    pos += 2 + cch * 2 + 2;

    let mut upxs = Vec::with_capacity(cupx);
    for _ in 0..cupx {
        // 每个 UPX 从偶数偏移开始
        pos += pos % 2;
        let cb_upx = read_u16(std, pos, "LPUpx cbUpx")? as usize;
        upxs.push(slice_at(std, pos + 2, cb_upx, "UPX")?);
        pos += 2 + cb_upx;
    }

    let (papx, chpx) = match (kind, upxs.as_slice()) {
        // UpxPapx 以段落样式索引开头
        (StyleKind::Paragraph, [papx, chpx, ..]) => (papx.get(2..).unwrap_or(&[]).to_vec(), chpx.to_vec()),
        (StyleKind::Paragraph, [papx]) => (papx.get(2..).unwrap_or(&[]).to_vec(), Vec::new()),
        (StyleKind::Character, [chpx, ..]) => (Vec::new(), chpx.to_vec()),
        _ => (Vec::new(), Vec::new()),
    };
    Ok(StyleDefinition {
        name,
        kind,
        based_on,
        papx,
        chpx,
    })
}
