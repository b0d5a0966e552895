//! 测试用的 Word 97 文档生成器
//!
//! 在内存中写出 WordDocument 与 1Table 两个数据流，再用 cfb 打包为复合文档

#![allow(dead_code)]

use std::io::{Cursor, Read, Write};

use doc2docx_rust::parser::sprm::opcode;

const TEXT_FC: usize = 1024;
const PAGE_SIZE: usize = 512;

/// 单个 sprm 的字节
pub fn sprm(op: u16, operand: &[u8]) -> Vec<u8> {
    let mut bytes = op.to_le_bytes().to_vec();
    bytes.extend_from_slice(operand);
    bytes
}

pub fn bold() -> Vec<u8> {
    sprm(opcode::C_F_BOLD, &[1])
}

pub fn italic() -> Vec<u8> {
    sprm(opcode::C_F_ITALIC, &[1])
}

pub fn font_size(half_points: u16) -> Vec<u8> {
    sprm(opcode::C_HPS, &half_points.to_le_bytes())
}

pub fn rgb(r: u8, g: u8, b: u8) -> Vec<u8> {
    sprm(opcode::C_CV, &[r, g, b, 0])
}

pub fn font(index: u16) -> Vec<u8> {
    sprm(opcode::C_RG_FTC0, &index.to_le_bytes())
}

pub fn justification(jc: u8) -> Vec<u8> {
    sprm(opcode::P_JC, &[jc])
}

pub fn char_style(istd: u16) -> Vec<u8> {
    sprm(opcode::C_ISTD, &istd.to_le_bytes())
}

pub fn list(ilvl: u8, ilfo: u16) -> Vec<u8> {
    let mut bytes = sprm(opcode::P_ILVL, &[ilvl]);
    bytes.extend(sprm(opcode::P_ILFO, &ilfo.to_le_bytes()));
    bytes
}

/// 测试段落: 段落属性与若干文本块
#[derive(Debug, Clone, Default)]
pub struct ParagraphSpec {
    istd: u16,
    papx: Vec<u8>,
    runs: Vec<(String, Vec<u8>)>,
}

impl ParagraphSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// 段落样式索引
    pub fn style(mut self, istd: u16) -> Self {
        self.istd = istd;
        self
    }

    pub fn props(mut self, grpprl: Vec<u8>) -> Self {
        self.papx.extend(grpprl);
        self
    }

    pub fn run(mut self, text: &str, grpprl: Vec<u8>) -> Self {
        self.runs.push((text.to_string(), grpprl));
        self
    }

    pub fn text(self, text: &str) -> Self {
        self.run(text, Vec::new())
    }
}

/// 样式表中的一个样式，istd 为其在列表中的下标
#[derive(Debug, Clone)]
pub struct StyleSpec {
    name: String,
    paragraph: bool,
    based_on: Option<u16>,
    papx: Vec<u8>,
    chpx: Vec<u8>,
}

impl StyleSpec {
    pub fn paragraph(name: &str) -> Self {
        StyleSpec {
            name: name.to_string(),
            paragraph: true,
            based_on: None,
            papx: Vec::new(),
            chpx: Vec::new(),
        }
    }

    pub fn character(name: &str) -> Self {
        StyleSpec {
            paragraph: false,
            ..Self::paragraph(name)
        }
    }

    pub fn based_on(mut self, istd: u16) -> Self {
        self.based_on = Some(istd);
        self
    }

    pub fn papx(mut self, grpprl: Vec<u8>) -> Self {
        self.papx.extend(grpprl);
        self
    }

    pub fn chpx(mut self, grpprl: Vec<u8>) -> Self {
        self.chpx.extend(grpprl);
        self
    }

    fn encode(&self, istd: u16) -> Vec<u8> {
        let mut std = vec![0u8; 10];
        let stk: u16 = if self.paragraph { 1 } else { 2 };
        put_u16(&mut std, 2, stk | self.based_on.unwrap_or(0x0FFF) << 4);
        put_u16(&mut std, 4, if self.paragraph { 2 } else { 1 });
        let name: Vec<u16> = self.name.encode_utf16().collect();
        std.extend_from_slice(&(name.len() as u16).to_le_bytes());
        for unit in name.iter().chain(std::iter::once(&0)) {
            std.extend_from_slice(&unit.to_le_bytes());
        }
        let mut upxs = Vec::new();
        if self.paragraph {
            let mut papx = istd.to_le_bytes().to_vec();
            papx.extend_from_slice(&self.papx);
            upxs.push(papx);
        }
        upxs.push(self.chpx.clone());
        for upx in upxs {
            if std.len() % 2 == 1 {
                std.push(0);
            }
            std.extend_from_slice(&(upx.len() as u16).to_le_bytes());
            std.extend(upx);
        }
        std
    }
}

/// 测试文档生成器
#[derive(Debug, Clone)]
pub struct DocBuilder {
    sections: Vec<Vec<ParagraphSpec>>,
    fonts: Vec<String>,
    styles: Vec<StyleSpec>,
    compressed: bool,
    flags: u16,
    ccp_text: Option<u32>,
}

impl Default for DocBuilder {
    fn default() -> Self {
        DocBuilder {
            sections: vec![Vec::new()],
            fonts: Vec::new(),
            styles: Vec::new(),
            compressed: false,
            flags: 0x0200,
            ccp_text: None,
        }
    }
}

// FKP 页中的一条记录
struct FkpRun {
    fc_start: usize,
    fc_end: usize,
    istd: u16,
    grpprl: Vec<u8>,
}

impl DocBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn font(mut self, name: &str) -> Self {
        self.fonts.push(name.to_string());
        self
    }

    /// 追加样式，第一个样式为 Normal
    pub fn style(mut self, style: StyleSpec) -> Self {
        self.styles.push(style);
        self
    }

    /// 覆盖 FIB 中记录的正文长度
    pub fn claimed_text_length(mut self, ccp_text: u32) -> Self {
        self.ccp_text = Some(ccp_text);
        self
    }

    pub fn paragraph(mut self, paragraph: ParagraphSpec) -> Self {
        if let Some(section) = self.sections.last_mut() {
            section.push(paragraph);
        }
        self
    }

    pub fn section_break(mut self) -> Self {
        self.sections.push(Vec::new());
        self
    }

    /// 正文使用 8 位压缩片段
    pub fn compressed(mut self) -> Self {
        self.compressed = true;
        self
    }

    pub fn encrypted(mut self) -> Self {
        self.flags |= 0x0100;
        self
    }

    fn encode(&self, text: &str) -> Vec<u8> {
        if self.compressed {
            let (bytes, _, _) = encoding_rs::WINDOWS_1252.encode(text);
            bytes.into_owned()
        } else {
            text.encode_utf16().flat_map(|u| u.to_le_bytes()).collect()
        }
    }

    fn char_width(&self) -> usize {
        if self.compressed {
            1
        } else {
            2
        }
    }

    pub fn build(&self) -> Vec<u8> {
        let width = self.char_width();
        let mut text = Vec::new();
        let mut chpx = Vec::new();
        let mut papx = Vec::new();
        let mut section_ends = Vec::new();

        let section_count = self.sections.len();
        for (s, section) in self.sections.iter().enumerate() {
            for (p, paragraph) in section.iter().enumerate() {
                let paragraph_start = TEXT_FC + text.len();
                for (run_text, grpprl) in &paragraph.runs {
                    let start = TEXT_FC + text.len();
                    text.extend(self.encode(run_text));
                    chpx.push(FkpRun { fc_start: start, fc_end: TEXT_FC + text.len(), istd: 0, grpprl: grpprl.clone() });
                }
                let last_in_section = p + 1 == section.len();
                let mark = if last_in_section && s + 1 < section_count { "\u{0C}" } else { "\r" };
                let mark_start = TEXT_FC + text.len();
                text.extend(self.encode(mark));
                chpx.push(FkpRun { fc_start: mark_start, fc_end: TEXT_FC + text.len(), istd: 0, grpprl: Vec::new() });
                papx.push(FkpRun {
                    fc_start: paragraph_start,
                    fc_end: TEXT_FC + text.len(),
                    istd: paragraph.istd,
                    grpprl: paragraph.papx.clone(),
                });
            }
            section_ends.push((text.len() / width) as u32);
        }
        let ccp_text = (text.len() / width) as u32;

        let mut word = vec![0u8; TEXT_FC];
        word.extend_from_slice(&text);
        let chpx_pn = pad_to_page(&mut word);
        word.extend(chpx_page(&chpx));
        let papx_pn = pad_to_page(&mut word);
        word.extend(papx_page(&papx));

        let mut table = Vec::new();
        let clx = append(&mut table, self.clx(ccp_text));
        let bte_chpx = append(&mut table, plcf_bte(&chpx, chpx_pn));
        let bte_papx = append(&mut table, plcf_bte(&papx, papx_pn));
        let ffn = if self.fonts.is_empty() { (0, 0) } else { append(&mut table, sttbf_ffn(&self.fonts)) };
        let sed = append(&mut table, plcf_sed(&section_ends));
        let stsh = if self.styles.is_empty() { (0, 0) } else { append(&mut table, self.stsh()) };

        let claimed = self.ccp_text.unwrap_or(ccp_text);
        self.write_fib(
            &mut word,
            claimed,
            &[(33, clx), (12, bte_chpx), (13, bte_papx), (15, ffn), (6, sed), (1, stsh)],
        );
        compound_file(&[("WordDocument", &word), ("1Table", &table)])
    }

    fn clx(&self, ccp_text: u32) -> Vec<u8> {
        let mut plc = Vec::new();
        plc.extend_from_slice(&0u32.to_le_bytes());
        plc.extend_from_slice(&ccp_text.to_le_bytes());
        let raw_fc = if self.compressed {
            ((TEXT_FC * 2) as u32) | 0x4000_0000
        } else {
            TEXT_FC as u32
        };
        plc.extend_from_slice(&[0, 0]);
        plc.extend_from_slice(&raw_fc.to_le_bytes());
        plc.extend_from_slice(&[0, 0]);

        let mut clx = vec![0x02];
        clx.extend_from_slice(&(plc.len() as u32).to_le_bytes());
        clx.extend(plc);
        clx
    }

    fn stsh(&self) -> Vec<u8> {
        let mut stshi = vec![0u8; 18];
        put_u16(&mut stshi, 0, self.styles.len() as u16);
        put_u16(&mut stshi, 2, 10);
        let mut data = (stshi.len() as u16).to_le_bytes().to_vec();
        data.extend(stshi);
        for (istd, style) in self.styles.iter().enumerate() {
            let std = style.encode(istd as u16);
            data.extend_from_slice(&(std.len() as u16).to_le_bytes());
            data.extend(std);
        }
        data
    }

    fn write_fib(&self, word: &mut [u8], ccp_text: u32, pairs: &[(usize, (u32, u32))]) {
        put_u16(word, 0, 0xA5EC);
        put_u16(word, 2, 0x00C1);
        put_u16(word, 0x0A, self.flags);
        put_u16(word, 32, 14);
        put_u16(word, 62, 22);
        put_u32(word, 76, ccp_text);
        put_u16(word, 152, 34);
        for &(index, (fc, lcb)) in pairs {
            put_u32(word, 154 + index * 8, fc);
            put_u32(word, 154 + index * 8 + 4, lcb);
        }
    }
}

fn put_u16(data: &mut [u8], offset: usize, value: u16) {
    data[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

fn put_u32(data: &mut [u8], offset: usize, value: u32) {
    data[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

fn append(table: &mut Vec<u8>, part: Vec<u8>) -> (u32, u32) {
    let fc = table.len() as u32;
    let lcb = part.len() as u32;
    table.extend(part);
    (fc, lcb)
}

fn pad_to_page(word: &mut Vec<u8>) -> u32 {
    let pages = (word.len() + PAGE_SIZE - 1) / PAGE_SIZE;
    word.resize(pages * PAGE_SIZE, 0);
    pages as u32
}

// 属性数据从页尾向前按 2 字节对齐存放
fn place(page: &mut [u8], tail: &mut usize, bytes: &[u8]) -> u8 {
    let offset = (*tail - bytes.len()) & !1;
    page[offset..offset + bytes.len()].copy_from_slice(bytes);
    *tail = offset;
    (offset / 2) as u8
}

fn write_rgfc(page: &mut [u8], runs: &[FkpRun]) {
    for (i, run) in runs.iter().enumerate() {
        put_u32(page, i * 4, run.fc_start as u32);
    }
    if let Some(last) = runs.last() {
        put_u32(page, runs.len() * 4, last.fc_end as u32);
    }
    page[PAGE_SIZE - 1] = runs.len() as u8;
}

fn chpx_page(runs: &[FkpRun]) -> Vec<u8> {
    let mut page = vec![0u8; PAGE_SIZE];
    write_rgfc(&mut page, runs);
    let rgb = (runs.len() + 1) * 4;
    let mut tail = PAGE_SIZE - 1;
    for (i, run) in runs.iter().enumerate() {
        if run.grpprl.is_empty() {
            continue;
        }
        let mut chpx = vec![run.grpprl.len() as u8];
        chpx.extend_from_slice(&run.grpprl);
        page[rgb + i] = place(&mut page, &mut tail, &chpx);
    }
    page
}

fn papx_page(runs: &[FkpRun]) -> Vec<u8> {
    let mut page = vec![0u8; PAGE_SIZE];
    write_rgfc(&mut page, runs);
    let rgbx = (runs.len() + 1) * 4;
    let mut tail = PAGE_SIZE - 1;
    for (i, run) in runs.iter().enumerate() {
        let words = (2 + run.grpprl.len() + 1) / 2;
        let mut papx = vec![0, words as u8];
        papx.extend_from_slice(&run.istd.to_le_bytes());
        papx.extend_from_slice(&run.grpprl);
        papx.resize(2 + words * 2, 0);
        page[rgbx + i * 13] = place(&mut page, &mut tail, &papx);
    }
    page
}

fn plcf_bte(runs: &[FkpRun], pn: u32) -> Vec<u8> {
    let first = runs.first().map_or(TEXT_FC, |r| r.fc_start) as u32;
    let last = runs.last().map_or(TEXT_FC, |r| r.fc_end) as u32;
    let mut plc = Vec::new();
    plc.extend_from_slice(&first.to_le_bytes());
    plc.extend_from_slice(&last.to_le_bytes());
    plc.extend_from_slice(&pn.to_le_bytes());
    plc
}

fn sttbf_ffn(fonts: &[String]) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(&(fonts.len() as u16).to_le_bytes());
    data.extend_from_slice(&[0, 0]);
    for name in fonts {
        let mut ffn = vec![0u8; 40];
        for unit in name.encode_utf16().chain(std::iter::once(0)) {
            ffn.extend_from_slice(&unit.to_le_bytes());
        }
        ffn[0] = (ffn.len() - 1) as u8;
        data.extend(ffn);
    }
    data
}

fn plcf_sed(ends: &[u32]) -> Vec<u8> {
    let mut plc = Vec::new();
    plc.extend_from_slice(&0u32.to_le_bytes());
    for end in ends {
        plc.extend_from_slice(&end.to_le_bytes());
    }
    plc.extend(vec![0u8; ends.len() * 12]);
    plc
}

/// 写出 OLE 复合文档
pub fn compound_file(streams: &[(&str, &[u8])]) -> Vec<u8> {
    let mut file = cfb::CompoundFile::create(Cursor::new(Vec::new())).unwrap();
    for (name, data) in streams {
        let mut stream = file.create_stream(format!("/{}", name)).unwrap();
        stream.write_all(data).unwrap();
        stream.flush().unwrap();
    }
    file.flush().unwrap();
    file.into_inner().into_inner()
}

/// 读取 .docx 包中的 word/document.xml
pub fn document_xml(docx: &[u8]) -> String {
    part_xml(docx, "word/document.xml")
}

pub fn part_xml(docx: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(docx)).unwrap();
    let mut xml = String::new();
    archive.by_name(name).unwrap().read_to_string(&mut xml).unwrap();
    xml
}

/// document.xml 中的段落数量
pub fn paragraph_count(xml: &str) -> usize {
    xml.matches("<w:p>").count() + xml.matches("<w:p ").count()
}
