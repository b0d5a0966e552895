use std::io::{Cursor, Read};

use cfb::CompoundFile;
use log::{debug, info, warn};

use super::fib::{fc_index, Fib};
use super::fkp::{FkpKind, FkpTable};
use super::font_table::FontTable;
use super::piece_table::PieceTable;
use super::sprm::CharProps;
use super::stylesheet::StyleSheet;
use super::text_processor::{combine_surrogates, CharClass, FieldTracker};
use super::{read_u32, slice_at, DocParseError, DocParseResult};
use crate::models::{Section, SourceDocument, SourceParagraph, SourceRun};

const WORD_STREAM: &str = "WordDocument";

/// 解析 .doc 文件内容
pub fn parse_doc(bytes: &[u8]) -> DocParseResult<SourceDocument> {
    DocParser::open(bytes)?.parse()
}

/// Word 97-2003 文档解析器
pub struct DocParser {
    fib: Fib,
    word_stream: Vec<u8>,
    table_stream: Vec<u8>,
}

/// 正在收集字符的段落，文本块按 CHPX 记录分组
#[derive(Default)]
struct PendingParagraph {
    runs: Vec<(Option<usize>, String)>,
}

impl PendingParagraph {
    fn push(&mut self, ch: char, chpx: Option<usize>) {
        match self.runs.last_mut() {
            Some((last, text)) if *last == chpx => text.push(ch),
            _ => self.runs.push((chpx, ch.to_string())),
        }
    }

    fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

impl DocParser {
    /// 打开复合文档并读取 FIB 与表格流
    pub fn open(bytes: &[u8]) -> DocParseResult<Self> {
        let mut cfb = CompoundFile::open(Cursor::new(bytes))
            .map_err(|e| DocParseError::NotCompoundFile(e.to_string()))?;
        let word_stream = read_stream(&mut cfb, WORD_STREAM)?;
        let fib = Fib::parse(&word_stream)?;
        if fib.encrypted {
            return Err(DocParseError::Encrypted);
        }
        let table_stream = read_stream(&mut cfb, fib.table_stream_name())?;
        debug!(
            "【DocParser::open】nFib=0x{:04X}, 正文 {} 个字符, 表格流 {}",
            fib.n_fib,
            fib.ccp_text,
            fib.table_stream_name()
        );
        Ok(DocParser {
            fib,
            word_stream,
            table_stream,
        })
    }

    /// 解析出 节 → 段落 → 文本块 树
    pub fn parse(&self) -> DocParseResult<SourceDocument> {
        let (fc_clx, lcb_clx) = self
            .fib
            .fc_lcb(fc_index::CLX)
            .ok_or_else(|| DocParseError::Invalid("缺少 Clx".to_string()))?;
        let pieces = PieceTable::parse(&self.table_stream, fc_clx, lcb_clx)?;
        let chars = pieces.read_chars(&self.word_stream, self.fib.ccp_text)?;

        let chpx = self.fkp_table(FkpKind::Chpx, fc_index::PLCF_BTE_CHPX)?;
        let papx = self.fkp_table(FkpKind::Papx, fc_index::PLCF_BTE_PAPX)?;
        let fonts = self.font_table();
        let styles = self.style_sheet();
        let layers = Layers {
            chpx: &chpx,
            papx: &papx,
            styles: &styles,
            fonts: &fonts,
        };
        let section_ends = self.section_ends()?;

        let mut doc = SourceDocument::new();
        let mut section = Section::new();
        let mut next_section = 0usize;
        let mut pending = PendingParagraph::default();
        let mut fields = FieldTracker::new();
        let mut high_surrogate: Option<u16> = None;
        let mut last_was_cell_mark = false;

        for (cp, ch) in chars.iter().enumerate() {
            let cp = cp as u32;
            let class = CharClass::classify(ch.unit);
            let at_section_end = section_ends
                .get(next_section)
                .map_or(false, |&end| cp + 1 >= end);

            let ends_paragraph = class.ends_paragraph()
                || (class == CharClass::PageOrSectionBreak && at_section_end);
            if ends_paragraph {
                // 行结束标记紧跟在最后一个单元格标记之后
                let row_mark = class == CharClass::CellMark && last_was_cell_mark && pending.is_empty();
                last_was_cell_mark = class == CharClass::CellMark;
                if !row_mark {
                    let paragraph = finish_paragraph(&mut pending, &layers, ch.fc);
                    section.paragraphs.push(paragraph);
                }
                high_surrogate = None;

                if at_section_end && next_section + 1 < section_ends.len() {
                    debug!("【DocParser::parse】第 {} 节结束于 CP {}", doc.sections.len(), cp);
                    doc.sections.push(std::mem::take(&mut section));
                    while next_section + 1 < section_ends.len() && cp + 1 >= section_ends[next_section] {
                        next_section += 1;
                    }
                }
                continue;
            }
            last_was_cell_mark = false;

            if fields.handle(class) || fields.in_instruction() {
                continue;
            }

            let run = chpx.position(ch.fc);
            match class {
                CharClass::Text(c) => pending.push(c, run),
                CharClass::LineBreak => pending.push('\n', run),
                CharClass::HighSurrogate(unit) => high_surrogate = Some(unit),
                CharClass::LowSurrogate(unit) => {
                    match high_surrogate.take().and_then(|high| combine_surrogates(high, unit)) {
                        Some(c) => pending.push(c, run),
                        None => warn!("【DocParser::parse】CP {} 处的代理对不完整", cp),
                    }
                }
                // 节内的分页符不产生段落
                _ => {}
            }
        }

        if !pending.is_empty() {
            let last_fc = chars.last().map_or(0, |c| c.fc);
            let paragraph = finish_paragraph(&mut pending, &layers, last_fc);
            section.paragraphs.push(paragraph);
        }
        if !section.paragraphs.is_empty() || doc.sections.is_empty() {
            doc.sections.push(section);
        }

        info!(
            "【DocParser::parse】解析完成: {} 节, {} 段落, {} 文本块",
            doc.sections.len(),
            doc.paragraph_count(),
            doc.run_count()
        );
        Ok(doc)
    }

    fn fkp_table(&self, kind: FkpKind, index: usize) -> DocParseResult<FkpTable> {
        match self.fib.fc_lcb(index) {
            Some((fc, lcb)) => FkpTable::parse(kind, &self.word_stream, &self.table_stream, fc, lcb),
            None => Ok(FkpTable::default()),
        }
    }

    fn font_table(&self) -> FontTable {
        let Some((fc, lcb)) = self.fib.fc_lcb(fc_index::STTBF_FFN) else {
            return FontTable::default();
        };
        FontTable::parse(&self.table_stream, fc, lcb).unwrap_or_else(|e| {
            warn!("【DocParser::font_table】字体表无效，使用默认字体: {}", e);
            FontTable::default()
        })
    }

    fn style_sheet(&self) -> StyleSheet {
        let Some((fc, lcb)) = self.fib.fc_lcb(fc_index::STSHF) else {
            return StyleSheet::default();
        };
        StyleSheet::parse(&self.table_stream, fc, lcb).unwrap_or_else(|e| {
            warn!("【DocParser::style_sheet】样式表无效，使用默认格式: {}", e);
            StyleSheet::default()
        })
    }

    /// 每个节结束处的 CP，没有节表时整个正文为一节
    fn section_ends(&self) -> DocParseResult<Vec<u32>> {
        let Some((fc, lcb)) = self.fib.fc_lcb(fc_index::PLCF_SED) else {
            return Ok(vec![self.fib.ccp_text]);
        };
        let plc = slice_at(&self.table_stream, fc as usize, lcb as usize, "PlcfSed")?;
        let count = plc.len().saturating_sub(4) / 16;
        let mut ends = Vec::with_capacity(count);
        for i in 1..=count {
            ends.push(read_u32(plc, i * 4, "PlcfSed CP")?);
        }
        if ends.is_empty() {
            ends.push(self.fib.ccp_text);
        }
        Ok(ends)
    }
}

/// 计算属性时用到的各层格式数据
struct Layers<'a> {
    chpx: &'a FkpTable,
    papx: &'a FkpTable,
    styles: &'a StyleSheet,
    fonts: &'a FontTable,
}

/// 段落样式 → 段落直接格式，段落样式的字符属性 → 字符样式 → 文本块直接格式
fn finish_paragraph(pending: &mut PendingParagraph, layers: &Layers, mark_fc: u32) -> SourceParagraph {
    let (istd, grpprl) = layers
        .papx
        .find(mark_fc)
        .map_or((0, &[][..]), |entry| (entry.istd, entry.grpprl.as_slice()));
    let (mut props, style_chp) = layers.styles.paragraph_props(istd);
    props.apply(grpprl);

    // 解析后格式相同的相邻文本块合并
    let mut resolved: Vec<(CharProps, String)> = Vec::new();
    for (chpx, text) in std::mem::take(&mut pending.runs) {
        let direct = chpx
            .and_then(|i| layers.chpx.entries().get(i))
            .map_or(&[][..], |entry| entry.grpprl.as_slice());
        let chp = layers.styles.run_props(&style_chp, direct);
        match resolved.last_mut() {
            Some((last, merged)) if *last == chp => merged.push_str(&text),
            _ => resolved.push((chp, text)),
        }
    }
    let runs = resolved
        .into_iter()
        .map(|(chp, text)| to_source_run(&chp, text, layers.fonts))
        .collect();

    SourceParagraph {
        justification: props.justification,
        spacing_before: props.spacing_before,
        spacing_after: props.spacing_after,
        indent_left: props.indent_left,
        indent_right: props.indent_right,
        indent_first_line: props.indent_first_line,
        list_level: props.list_level(),
        borders: props.borders,
        line_spacing: props.line_spacing,
        runs,
    }
}

fn read_stream(cfb: &mut CompoundFile<Cursor<&[u8]>>, name: &str) -> DocParseResult<Vec<u8>> {
    let path = format!("/{}", name);
    if !cfb.is_stream(&path) {
        return Err(DocParseError::MissingStream(name.to_string()));
    }
    let mut stream = cfb.open_stream(&path)?;
    let mut data = Vec::new();
    stream.read_to_end(&mut data)?;
    Ok(data)
}

fn to_source_run(props: &CharProps, text: String, fonts: &FontTable) -> SourceRun {
    let font_name = props.font_index.and_then(|index| {
        let name = fonts.name(index);
        if name.is_none() {
            warn!("【to_source_run】字体索引 {} 超出字体表 ({} 项)", index, fonts.len());
        }
        name.map(str::to_string)
    });
    SourceRun {
        text,
        bold: props.bold,
        italic: props.italic,
        strike: props.strike,
        underline: props.underline,
        color: props.color,
        font_name,
        font_size: props.font_size,
        sub_super_script: props.vertical,
        kerning: props.kerning,
        emboss: props.emboss,
        imprint: props.imprint,
        shadow: props.shadow,
    }
}
