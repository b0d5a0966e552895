//! 正文字符分类与域代码处理

/// 正文中单个 UTF-16 码元的分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// 普通字符 (制表符也原样保留)
    Text(char),
    /// 段落标记 0x0D
    ParagraphMark,
    /// 单元格/行结束标记 0x07
    CellMark,
    /// 分页符或分节符 0x0C
    PageOrSectionBreak,
    /// 换行符 0x0B
    LineBreak,
    /// 域开始 0x13
    FieldBegin,
    /// 域分隔 0x14
    FieldSeparator,
    /// 域结束 0x15
    FieldEnd,
    /// 代理对的高位
    HighSurrogate(u16),
    /// 代理对的低位
    LowSurrogate(u16),
    /// 丢弃的控制字符
    Ignored,
}

impl CharClass {
    pub fn classify(unit: u16) -> Self {
        match unit {
            0x0D => CharClass::ParagraphMark,
            0x07 => CharClass::CellMark,
            0x0C => CharClass::PageOrSectionBreak,
            0x0B => CharClass::LineBreak,
            0x13 => CharClass::FieldBegin,
            0x14 => CharClass::FieldSeparator,
            0x15 => CharClass::FieldEnd,
            0x1E => CharClass::Text('\u{2011}'),
            0x09 => CharClass::Text('\t'),
            0xD800..=0xDBFF => CharClass::HighSurrogate(unit),
            0xDC00..=0xDFFF => CharClass::LowSurrogate(unit),
            // 可选连字符、对象锚点等
            0x00..=0x1F => CharClass::Ignored,
            // DEL 与 C1 控制字符
            0x7F..=0x9F => CharClass::Ignored,
            _ => char::from_u32(unit as u32).map_or(CharClass::Ignored, CharClass::Text),
        }
    }

    /// 是否结束当前段落
    pub fn ends_paragraph(&self) -> bool {
        matches!(self, CharClass::ParagraphMark | CharClass::CellMark)
    }
}

/// 域嵌套状态：域代码部分被丢弃，域结果部分保留
#[derive(Debug, Default)]
pub struct FieldTracker {
    // true 表示仍在域代码部分
    stack: Vec<bool>,
}

impl FieldTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 处理域标记字符，返回 true 表示该字符已被消费
    pub fn handle(&mut self, class: CharClass) -> bool {
        match class {
            CharClass::FieldBegin => {
                self.stack.push(true);
                true
            }
            CharClass::FieldSeparator => {
                if let Some(top) = self.stack.last_mut() {
                    *top = false;
                }
                true
            }
            CharClass::FieldEnd => {
                self.stack.pop();
                true
            }
            _ => false,
        }
    }

    /// 当前字符是否位于某个域代码中
    pub fn in_instruction(&self) -> bool {
        self.stack.iter().any(|&instr| instr)
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

/// 合并代理对
pub fn combine_surrogates(high: u16, low: u16) -> Option<char> {
    char::decode_utf16([high, low]).next().and_then(|r| r.ok())
}
