mod common;

use common::*;
use doc2docx_rust::parser::sprm::opcode;
use doc2docx_rust::{
    convert, convert_with_conf, convert_with_report, parse_doc, ConversionError, ConvertConf, DocParseError,
};

fn hello_doc() -> Vec<u8> {
    DocBuilder::new()
        .paragraph(
            ParagraphSpec::new()
                .props(justification(1))
                .run("Hello", [bold(), font_size(24)].concat()),
        )
        .build()
}

#[test]
fn parses_runs_and_paragraph_properties() {
    let bytes = DocBuilder::new()
        .font("Times New Roman")
        .font("Arial")
        .paragraph(
            ParagraphSpec::new()
                .props(justification(3))
                .run("Hello ", [bold(), font_size(24)].concat())
                .run("world", [italic(), font(1), rgb(0, 255, 0)].concat()),
        )
        .build();

    let doc = parse_doc(&bytes).unwrap();
    assert_eq!(doc.sections.len(), 1);
    let paragraph = &doc.sections[0].paragraphs[0];
    assert_eq!(paragraph.justification, 4);
    assert_eq!(paragraph.list_level, -1);
    assert_eq!(paragraph.runs.len(), 2);

    let hello = &paragraph.runs[0];
    assert_eq!(hello.text, "Hello ");
    assert!(hello.bold);
    assert_eq!(hello.font_size, 24);
    assert_eq!(hello.color, -1);

    let world = &paragraph.runs[1];
    assert_eq!(world.text, "world");
    assert!(world.italic && !world.bold);
    assert_eq!(world.font_name.as_deref(), Some("Arial"));
    assert_eq!(world.color, 0x00FF00);
    assert_eq!(world.font_size, 20);
}

#[test]
fn adjacent_runs_with_equal_formatting_are_merged() {
    let bytes = DocBuilder::new()
        .paragraph(ParagraphSpec::new().run("one ", bold()).run("two", bold()))
        .build();
    let doc = parse_doc(&bytes).unwrap();
    let runs = &doc.sections[0].paragraphs[0].runs;
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].text, "one two");
}

#[test]
fn sections_split_at_section_marks() {
    let bytes = DocBuilder::new()
        .paragraph(ParagraphSpec::new().text("first"))
        .paragraph(ParagraphSpec::new().text("second"))
        .section_break()
        .paragraph(ParagraphSpec::new().text("third"))
        .build();
    let doc = parse_doc(&bytes).unwrap();
    assert_eq!(doc.sections.len(), 2);
    let texts: Vec<String> = doc.paragraphs().map(|p| p.text()).collect();
    assert_eq!(texts, vec!["first", "second", "third"]);
    assert_eq!(doc.sections[1].paragraphs.len(), 1);
}

#[test]
fn list_levels_need_a_list_reference() {
    let bytes = DocBuilder::new()
        .paragraph(ParagraphSpec::new().props(list(2, 1)).text("nested"))
        .paragraph(ParagraphSpec::new().props(list(3, 0)).text("detached"))
        .build();
    let doc = parse_doc(&bytes).unwrap();
    let levels: Vec<i32> = doc.paragraphs().map(|p| p.list_level).collect();
    assert_eq!(levels, vec![2, -1]);
}

#[test]
fn field_instructions_are_dropped() {
    let bytes = DocBuilder::new()
        .paragraph(ParagraphSpec::new().text("See \u{13} HYPERLINK \"http://x\" \u{14}site\u{15} now"))
        .build();
    let doc = parse_doc(&bytes).unwrap();
    assert_eq!(doc.sections[0].paragraphs[0].text(), "See site now");
}

#[test]
fn line_breaks_and_tabs_survive() {
    let bytes = DocBuilder::new()
        .paragraph(ParagraphSpec::new().text("a\u{0B}b\tc"))
        .build();
    let doc = parse_doc(&bytes).unwrap();
    assert_eq!(doc.sections[0].paragraphs[0].text(), "a\nb\tc");
}

#[test]
fn compressed_text_is_windows_1252() {
    let bytes = DocBuilder::new()
        .compressed()
        .paragraph(ParagraphSpec::new().run("café €5", bold()))
        .build();
    let doc = parse_doc(&bytes).unwrap();
    let run = &doc.sections[0].paragraphs[0].runs[0];
    assert_eq!(run.text, "café €5");
    assert!(run.bold);
}

#[test]
fn encrypted_documents_are_rejected() {
    let bytes = DocBuilder::new()
        .encrypted()
        .paragraph(ParagraphSpec::new().text("secret"))
        .build();
    assert!(matches!(parse_doc(&bytes), Err(DocParseError::Encrypted)));
}

#[test]
fn text_length_beyond_the_stream_is_a_parse_failure() {
    let bytes = DocBuilder::new()
        .claimed_text_length(0xFFFF_FFF0)
        .paragraph(ParagraphSpec::new().text("short"))
        .build();
    assert!(matches!(parse_doc(&bytes), Err(DocParseError::Invalid(_))));
    let err = convert(&bytes).unwrap_err();
    assert!(matches!(err, ConversionError::ParseFailure(_)));
    assert!(err.is_client_error());
}

#[test]
fn delete_and_c1_characters_are_dropped() {
    let bytes = DocBuilder::new()
        .paragraph(ParagraphSpec::new().text("price\u{7F}list\u{85}"))
        .build();
    let xml = document_xml(&convert(&bytes).unwrap());
    assert!(xml.contains(">pricelist<"));

    // Windows-1252 中 0x81 解码为 U+0081
    let bytes = DocBuilder::new()
        .compressed()
        .paragraph(ParagraphSpec::new().text("a\u{81}b"))
        .build();
    let doc = parse_doc(&bytes).unwrap();
    assert_eq!(doc.sections[0].paragraphs[0].text(), "ab");
    assert!(convert(&bytes).is_ok());
}

#[test]
fn normal_style_supplies_default_run_formatting() {
    let bytes = DocBuilder::new()
        .font("Cambria")
        .font("Georgia")
        .style(StyleSpec::paragraph("Normal").chpx([font_size(24), font(1)].concat()))
        .paragraph(ParagraphSpec::new().text("plain"))
        .build();

    let doc = parse_doc(&bytes).unwrap();
    let run = &doc.sections[0].paragraphs[0].runs[0];
    assert_eq!(run.font_size, 24);
    assert_eq!(run.font_name.as_deref(), Some("Georgia"));

    let xml = document_xml(&convert(&bytes).unwrap());
    assert!(xml.contains("w:sz w:val=\"24\""));
    assert!(xml.contains("Georgia"));
}

#[test]
fn paragraph_and_character_styles_resolve_through_based_on() {
    let bytes = DocBuilder::new()
        .font("Times New Roman")
        .style(StyleSpec::paragraph("Normal").chpx(font_size(22)))
        .style(
            StyleSpec::paragraph("heading 1")
                .based_on(0)
                .papx(justification(1))
                .chpx(bold()),
        )
        .style(StyleSpec::paragraph("List Bullet").based_on(0).papx(list(0, 1)))
        .style(StyleSpec::character("Emphasis").chpx(italic()))
        .paragraph(
            ParagraphSpec::new()
                .style(1)
                .text("Title ")
                .run("plain", sprm(opcode::C_F_BOLD, &[0x81])),
        )
        .paragraph(ParagraphSpec::new().style(2).run("item", char_style(3)))
        .build();

    let doc = parse_doc(&bytes).unwrap();
    let heading = &doc.sections[0].paragraphs[0];
    assert_eq!(heading.justification, 2);
    assert!(heading.runs[0].bold);
    assert_eq!(heading.runs[0].font_size, 22);
    assert_eq!(heading.runs[0].font_name.as_deref(), Some("Times New Roman"));
    // 0x81 相对样式值取反
    assert!(!heading.runs[1].bold);

    let item = &doc.sections[0].paragraphs[1];
    assert_eq!(item.list_level, 0);
    assert!(item.runs[0].italic);
    assert!(!item.runs[0].bold);

    let xml = document_xml(&convert(&bytes).unwrap());
    assert!(xml.contains("w:jc w:val=\"center\""));
    assert!(xml.contains("w:numId w:val=\"1\""));
}

#[test]
fn hello_converts_to_centered_bold_run() {
    let xml = document_xml(&convert(&hello_doc()).unwrap());
    assert_eq!(paragraph_count(&xml), 1);
    assert!(xml.contains("Hello"));
    assert!(xml.contains("w:jc w:val=\"center\""));
    assert!(xml.contains("<w:b />"));
    assert!(xml.contains("w:sz w:val=\"24\""));
    assert!(!xml.contains("w:color"));
}

#[test]
fn paragraph_count_is_preserved() {
    let bytes = DocBuilder::new()
        .paragraph(ParagraphSpec::new().text("one"))
        .paragraph(ParagraphSpec::new())
        .section_break()
        .paragraph(ParagraphSpec::new().text("three"))
        .paragraph(ParagraphSpec::new().text("   "))
        .build();
    let (docx, report) = convert_with_report(&bytes, &ConvertConf::default()).unwrap();
    assert_eq!(report.sections, 2);
    assert_eq!(report.paragraphs, 4);
    assert_eq!(report.output_paragraphs, 4);
    assert_eq!(paragraph_count(&document_xml(&docx)), 4);

    let xml = document_xml(&docx);
    let one = xml.find(">one<").unwrap();
    let three = xml.find(">three<").unwrap();
    assert!(one < three);
}

#[test]
fn bullet_and_email_runs() {
    let bytes = DocBuilder::new()
        .paragraph(ParagraphSpec::new().text("► Contact us"))
        .paragraph(ParagraphSpec::new().run("jane@example.com", [bold(), rgb(255, 0, 0)].concat()))
        .build();
    let xml = document_xml(&convert(&bytes).unwrap());
    assert!(xml.contains("Segoe UI Symbol"));
    assert!(xml.contains(">Contact us<"));
    assert!(xml.contains("jane@example.com"));
    assert!(xml.contains("w:color w:val=\"0000FF\""));
    assert!(xml.contains("w:u w:val=\"single\""));
    assert!(!xml.contains("FF0000"));
}

#[test]
fn list_items_get_numbering_and_styles() {
    let bytes = DocBuilder::new()
        .paragraph(ParagraphSpec::new().props(list(0, 1)).text("top"))
        .paragraph(ParagraphSpec::new().props(list(1, 1)).text("nested"))
        .build();
    let docx = convert(&bytes).unwrap();
    let xml = document_xml(&docx);
    assert!(xml.contains("w:numId w:val=\"1\""));
    assert!(xml.contains("w:ilvl w:val=\"1\""));
    assert!(xml.contains("ListParagraph"));
    assert!(xml.contains("ListBullet"));
    assert!(part_xml(&docx, "word/numbering.xml").contains("w:abstractNum"));
}

#[test]
fn surface_effects_follow_configuration() {
    let emboss = sprm(opcode::C_F_EMBOSS, &[1]);
    let kern = sprm(opcode::C_HPS_KERN, &24u16.to_le_bytes());
    let bytes = DocBuilder::new()
        .paragraph(ParagraphSpec::new().run("raised", [emboss, kern].concat()).text(" plain"))
        .build();

    let xml = document_xml(&convert(&bytes).unwrap());
    assert!(xml.contains("<w:emboss />"));
    assert!(xml.contains("<w:kern w:val=\"24\" />"));

    let conf = ConvertConf {
        surface_effects: false,
        ..ConvertConf::default()
    };
    let xml = document_xml(&convert_with_conf(&bytes, &conf).unwrap());
    assert!(!xml.contains("w:emboss"));
    assert!(xml.contains("<w:kern w:val=\"24\" />"));
}

#[test]
fn margin_preset_reaches_the_package() {
    let conf = ConvertConf::from_json(r#"{"margin_preset":"narrow"}"#).unwrap();
    let xml = document_xml(&convert_with_conf(&hello_doc(), &conf).unwrap());
    assert!(xml.contains("w:right=\"10\""));
    assert!(xml.contains("w:gutter=\"10\""));
}
