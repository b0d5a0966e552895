//! 打包后补写 docx-rs 不支持的文字效果 (w:kern, w:emboss, w:imprint, w:shadow)
//!
//! document.xml 中第 k 个 `<w:r>` 对应文档顺序中的第 k 个文本块

use std::io::{Cursor, Read, Write};

use log::debug;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::{DocxAdapterError, DocxAdapterResult, RunEffects};

const DOCUMENT_PART: &str = "word/document.xml";
const RUN_OPEN: &str = "<w:r>";
const RUN_CLOSE: &str = "</w:r>";

/// 重写文档包中的 document.xml
pub fn apply(package: &[u8], effects: &[RunEffects]) -> DocxAdapterResult<Vec<u8>> {
    let mut archive = ZipArchive::new(Cursor::new(package))?;

    let mut document_xml = String::new();
    archive.by_name(DOCUMENT_PART)?.read_to_string(&mut document_xml)?;
    let patched = patch_document_xml(&document_xml, effects)?;

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        let name = file.name().to_string();
        writer.start_file(name.clone(), options)?;
        if name == DOCUMENT_PART {
            writer.write_all(patched.as_bytes())?;
        } else {
            let mut buf = Vec::new();
            file.read_to_end(&mut buf)?;
            writer.write_all(&buf)?;
        }
    }
    Ok(writer.finish()?.into_inner())
}

/// 在对应文本块的 w:rPr 中追加效果元素
pub fn patch_document_xml(xml: &str, effects: &[RunEffects]) -> DocxAdapterResult<String> {
    let mut output = String::with_capacity(xml.len() + effects.len() * 16);
    let mut rest = xml;
    let mut index = 0usize;
    let mut patched = 0usize;

    while let Some(start) = rest.find(RUN_OPEN) {
        let (head, tail) = rest.split_at(start + RUN_OPEN.len());
        output.push_str(head);
        let end = tail
            .find(RUN_CLOSE)
            .ok_or_else(|| DocxAdapterError::MalformedPart(format!("第 {} 个 w:r 没有结束标签", index)))?;
        let (body, after) = tail.split_at(end);
        match effects.get(index) {
            Some(run_effects) if !run_effects.is_empty() => {
                output.push_str(&patch_run_body(body, run_effects));
                patched += 1;
            }
            _ => output.push_str(body),
        }
        rest = after;
        index += 1;
    }
    output.push_str(rest);

    if effects.iter().skip(index).any(|e| !e.is_empty()) {
        return Err(DocxAdapterError::MalformedPart(format!(
            "document.xml 中只有 {} 个文本块，需要 {} 个",
            index,
            effects.len()
        )));
    }
    debug!("【patch_document_xml】{} 个文本块写入了文字效果", patched);
    Ok(output)
}

fn patch_run_body(body: &str, effects: &RunEffects) -> String {
    let extra = effects_xml(effects);
    if let Some(pos) = body.find("</w:rPr>") {
        let mut out = String::with_capacity(body.len() + extra.len());
        out.push_str(&body[..pos]);
        out.push_str(&extra);
        out.push_str(&body[pos..]);
        return out;
    }
    for empty in ["<w:rPr />", "<w:rPr/>"] {
        if body.contains(empty) {
            return body.replacen(empty, &format!("<w:rPr>{}</w:rPr>", extra), 1);
        }
    }
    format!("<w:rPr>{}</w:rPr>{}", extra, body)
}

fn effects_xml(effects: &RunEffects) -> String {
    let mut xml = String::new();
    if effects.shadow {
        xml.push_str("<w:shadow />");
    }
    if effects.emboss {
        xml.push_str("<w:emboss />");
    }
    if effects.imprint {
        xml.push_str("<w:imprint />");
    }
    if let Some(kern) = effects.kerning {
        xml.push_str(&format!("<w:kern w:val=\"{}\" />", kern));
    }
    xml
}
