//! 属性修改记录 (sprm) 的遍历与应用

use log::debug;

use crate::models::format_codes::{BorderCode, UnderlineCode, VerticalCode};
use crate::models::{LineSpacingDescriptor, SourceBorders};

/// sprm 操作码
pub mod opcode {
    pub const P_JC80: u16 = 0x2403;
    pub const P_JC: u16 = 0x2461;
    pub const P_DXA_RIGHT80: u16 = 0x840E;
    pub const P_DXA_LEFT80: u16 = 0x840F;
    pub const P_DXA_LEFT1_80: u16 = 0x8411;
    pub const P_DXA_RIGHT: u16 = 0x845D;
    pub const P_DXA_LEFT: u16 = 0x845E;
    pub const P_DXA_LEFT1: u16 = 0x8460;
    pub const P_DYA_LINE: u16 = 0x6412;
    pub const P_DYA_BEFORE: u16 = 0xA413;
    pub const P_DYA_AFTER: u16 = 0xA414;
    pub const P_ILVL: u16 = 0x260A;
    pub const P_ILFO: u16 = 0x460B;
    pub const P_CHG_TABS: u16 = 0xC615;
    pub const P_BRC_TOP80: u16 = 0x6424;
    pub const P_BRC_LEFT80: u16 = 0x6425;
    pub const P_BRC_BOTTOM80: u16 = 0x6426;
    pub const P_BRC_RIGHT80: u16 = 0x6427;
    pub const P_BRC_TOP: u16 = 0xC64E;
    pub const P_BRC_LEFT: u16 = 0xC64F;
    pub const P_BRC_BOTTOM: u16 = 0xC650;
    pub const P_BRC_RIGHT: u16 = 0xC651;
    pub const T_DEF_TABLE: u16 = 0xD608;

    pub const C_F_BOLD: u16 = 0x0835;
    pub const C_F_ITALIC: u16 = 0x0836;
    pub const C_F_STRIKE: u16 = 0x0837;
    pub const C_F_SHADOW: u16 = 0x0839;
    pub const C_F_IMPRINT: u16 = 0x0854;
    pub const C_F_EMBOSS: u16 = 0x0858;
    pub const C_KUL: u16 = 0x2A3E;
    pub const C_ICO: u16 = 0x2A42;
    pub const C_HPS: u16 = 0x4A43;
    pub const C_ISS: u16 = 0x2A48;
    pub const C_HPS_KERN: u16 = 0x484B;
    pub const C_RG_FTC0: u16 = 0x4A4F;
    pub const C_CV: u16 = 0x6870;
    pub const C_ISTD: u16 = 0x4A30;
}

/// 单条 sprm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprm<'a> {
    pub opcode: u16,
    pub operand: &'a [u8],
}

impl<'a> Sprm<'a> {
    fn byte(&self, i: usize) -> Option<u8> {
        self.operand.get(i).copied()
    }

    fn u16(&self) -> Option<u16> {
        match self.operand {
            [a, b, ..] => Some(u16::from_le_bytes([*a, *b])),
            _ => None,
        }
    }

    fn i16(&self) -> Option<i16> {
        self.u16().map(|v| v as i16)
    }
}

/// grpprl 遍历器，遇到不完整的记录时停止
pub struct SprmIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SprmIter<'a> {
    pub fn new(grpprl: &'a [u8]) -> Self {
        SprmIter { data: grpprl, pos: 0 }
    }

    /// 返回 (操作数起始位置, 操作数长度)
    fn operand_span(&self, opcode: u16, at: usize) -> Option<(usize, usize)> {
        let data = self.data;
        match (opcode >> 13) & 0x7 {
            0 | 1 => Some((at, 1)),
            2 | 4 | 5 => Some((at, 2)),
            3 => Some((at, 4)),
            7 => Some((at, 3)),
            _ => {
                if opcode == opcode::T_DEF_TABLE {
                    let cb = u16::from_le_bytes([*data.get(at)?, *data.get(at + 1)?]) as usize;
                    Some((at + 2, cb.saturating_sub(1)))
                } else if opcode == opcode::P_CHG_TABS && *data.get(at)? == 0xFF {
                    // PChgTabsDelClose + PChgTabsAdd
                    let del = *data.get(at + 1)? as usize;
                    let add_at = at + 2 + del * 4;
                    let add = *data.get(add_at)? as usize;
                    Some((at + 1, 1 + del * 4 + 1 + add * 3))
                } else {
                    Some((at + 1, *data.get(at)? as usize))
                }
            }
        }
    }
}

impl<'a> Iterator for SprmIter<'a> {
    type Item = Sprm<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let head = self.data.get(self.pos..self.pos + 2)?;
        let opcode = u16::from_le_bytes([head[0], head[1]]);
        let (start, len) = self.operand_span(opcode, self.pos + 2)?;
        let operand = self.data.get(start..start + len)?;
        self.pos = start + len;
        Some(Sprm { opcode, operand })
    }
}

/// 解析后的段落属性
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParagraphProps {
    /// jc + 1，0 表示未设置
    pub justification: i32,
    pub spacing_before: u32,
    pub spacing_after: u32,
    pub indent_left: i32,
    pub indent_right: i32,
    pub indent_first_line: i32,
    pub ilvl: u8,
    pub ilfo: u16,
    pub borders: SourceBorders,
    pub line_spacing: Option<LineSpacingDescriptor>,
}

impl ParagraphProps {
    pub fn from_grpprl(grpprl: &[u8]) -> Self {
        let mut props = ParagraphProps::default();
        props.apply(grpprl);
        props
    }

    /// 依次应用 grpprl 中的 sprm
    pub fn apply(&mut self, grpprl: &[u8]) {
        for sprm in SprmIter::new(grpprl) {
            match sprm.opcode {
                opcode::P_JC80 | opcode::P_JC => {
                    if let Some(jc) = sprm.byte(0) {
                        self.justification = jc as i32 + 1;
                    }
                }
                opcode::P_DXA_LEFT80 | opcode::P_DXA_LEFT => {
                    self.indent_left = sprm.i16().map_or(self.indent_left, i32::from);
                }
                opcode::P_DXA_RIGHT80 | opcode::P_DXA_RIGHT => {
                    self.indent_right = sprm.i16().map_or(self.indent_right, i32::from);
                }
                opcode::P_DXA_LEFT1_80 | opcode::P_DXA_LEFT1 => {
                    self.indent_first_line = sprm.i16().map_or(self.indent_first_line, i32::from);
                }
                opcode::P_DYA_BEFORE => {
                    self.spacing_before = sprm.u16().map_or(self.spacing_before, u32::from);
                }
                opcode::P_DYA_AFTER => {
                    self.spacing_after = sprm.u16().map_or(self.spacing_after, u32::from);
                }
                opcode::P_DYA_LINE => {
                    if let [a, b, c, d] = sprm.operand {
                        self.line_spacing = Some(LineSpacingDescriptor {
                            line: i16::from_le_bytes([*a, *b]),
                            multiple: i16::from_le_bytes([*c, *d]) != 0,
                        });
                    }
                }
                opcode::P_ILVL => self.ilvl = sprm.byte(0).unwrap_or(0),
                opcode::P_ILFO => self.ilfo = sprm.u16().unwrap_or(0),
                opcode::P_BRC_TOP80 => self.borders.top = brc80_type(&sprm),
                opcode::P_BRC_LEFT80 => self.borders.left = brc80_type(&sprm),
                opcode::P_BRC_BOTTOM80 => self.borders.bottom = brc80_type(&sprm),
                opcode::P_BRC_RIGHT80 => self.borders.right = brc80_type(&sprm),
                opcode::P_BRC_TOP => self.borders.top = brc_type(&sprm),
                opcode::P_BRC_LEFT => self.borders.left = brc_type(&sprm),
                opcode::P_BRC_BOTTOM => self.borders.bottom = brc_type(&sprm),
                opcode::P_BRC_RIGHT => self.borders.right = brc_type(&sprm),
                _ => {}
            }
        }
    }

    /// 列表层级，未关联列表时为 -1
    pub fn list_level(&self) -> i32 {
        if self.ilfo == 0 {
            -1
        } else {
            self.ilvl.min(8) as i32
        }
    }
}

fn brc80_type(sprm: &Sprm) -> BorderCode {
    if sprm.operand == [0xFF, 0xFF, 0xFF, 0xFF] {
        return BorderCode::None;
    }
    BorderCode::from_brc_type(sprm.byte(1).unwrap_or(0))
}

fn brc_type(sprm: &Sprm) -> BorderCode {
    BorderCode::from_brc_type(sprm.byte(5).unwrap_or(0))
}

/// 解析后的字符属性
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharProps {
    pub bold: bool,
    pub italic: bool,
    pub strike: bool,
    pub underline: i32,
    pub color: i32,
    pub font_index: Option<u16>,
    /// 半磅
    pub font_size: u32,
    pub vertical: i32,
    pub kerning: i32,
    pub emboss: bool,
    pub imprint: bool,
    pub shadow: bool,
}

impl Default for CharProps {
    fn default() -> Self {
        CharProps {
            bold: false,
            italic: false,
            strike: false,
            underline: 0,
            color: -1,
            font_index: None,
            font_size: 20,
            vertical: 0,
            kerning: 0,
            emboss: false,
            imprint: false,
            shadow: false,
        }
    }
}

impl CharProps {
    pub fn from_grpprl(grpprl: &[u8]) -> Self {
        let mut props = CharProps::default();
        props.apply(grpprl);
        props
    }

    /// 依次应用 grpprl，开关类 sprm 相对应用前的 (样式) 值取值
    pub fn apply(&mut self, grpprl: &[u8]) {
        let base = self.clone();
        for sprm in SprmIter::new(grpprl) {
            match sprm.opcode {
                opcode::C_F_BOLD => self.bold = toggle(&sprm, base.bold),
                opcode::C_F_ITALIC => self.italic = toggle(&sprm, base.italic),
                opcode::C_F_STRIKE => self.strike = toggle(&sprm, base.strike),
                opcode::C_F_SHADOW => self.shadow = toggle(&sprm, base.shadow),
                opcode::C_F_IMPRINT => self.imprint = toggle(&sprm, base.imprint),
                opcode::C_F_EMBOSS => self.emboss = toggle(&sprm, base.emboss),
                opcode::C_KUL => self.underline = UnderlineCode::from_kul(sprm.byte(0).unwrap_or(0)),
                opcode::C_ICO => self.color = ico_color(sprm.byte(0).unwrap_or(0)),
                opcode::C_CV => {
                    if let [r, g, b, flag] = sprm.operand {
                        self.color = if *flag == 0xFF {
                            -1
                        } else {
                            ((*r as i32) << 16) | ((*g as i32) << 8) | *b as i32
                        };
                    }
                }
                opcode::C_HPS => self.font_size = sprm.u16().map_or(self.font_size, u32::from),
                opcode::C_ISS => self.vertical = VerticalCode::from_iss(sprm.byte(0).unwrap_or(0)),
                opcode::C_HPS_KERN => self.kerning = sprm.i16().map_or(self.kerning, i32::from),
                opcode::C_RG_FTC0 => self.font_index = sprm.u16(),
                // 字符样式由样式表处理
                opcode::C_ISTD => {}
                other => debug!("【CharProps::apply】忽略 sprm 0x{:04X}", other),
            }
        }
    }
}

// 0x80 取样式值，0x81 取其反值
fn toggle(sprm: &Sprm, style_value: bool) -> bool {
    match sprm.byte(0) {
        Some(0x00) => false,
        Some(0x01) => true,
        Some(0x81) => !style_value,
        _ => style_value,
    }
}

/// grpprl 中引用的字符样式
pub fn char_style(grpprl: &[u8]) -> Option<u16> {
    SprmIter::new(grpprl)
        .filter(|sprm| sprm.opcode == opcode::C_ISTD)
        .last()
        .and_then(|sprm| sprm.u16())
}

/// ico 调色板
fn ico_color(ico: u8) -> i32 {
    match ico {
        1 => 0x000000,
        2 => 0x0000FF,
        3 => 0x00FFFF,
        4 => 0x00FF00,
        5 => 0xFF00FF,
        6 => 0xFF0000,
        7 => 0xFFFF00,
        8 => 0xFFFFFF,
        9 => 0x000080,
        10 => 0x008080,
        11 => 0x008000,
        12 => 0x800080,
        13 => 0x800000,
        14 => 0x808000,
        15 => 0x808080,
        16 => 0xC0C0C0,
        _ => -1,
    }
}
