//! 对外 API
//!
//! 传输编码校验、解码、解析、映射和打包，以及可选的外部转换路径

use std::fs;
use std::path::Path;
use std::time::Instant;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::docx::{DocConverter, DocxError};
use crate::models::ConvertConf;
use crate::office::{self, ExternalConverter, OfficeError, SocketOfficeConverter};
use crate::parser::{parse_doc, DocParseError};
use crate::utils::{BASE64_REGEX, WHITESPACE_REGEX};

/// 转换错误
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("输入无效: {0}")]
    InvalidInput(String),

    #[error("解码失败: {0}")]
    DecodeFailure(String),

    #[error("文档解析失败: {0}")]
    ParseFailure(String),

    #[error("转换失败: {0}")]
    UnexpectedFailure(String),

    #[error("外部转换失败: {0}")]
    ExternalFailure(String),
}

impl ConversionError {
    /// 是否属于调用方的错误
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ConversionError::InvalidInput(_)
                | ConversionError::DecodeFailure(_)
                | ConversionError::ParseFailure(_)
        )
    }
}

impl From<DocParseError> for ConversionError {
    fn from(e: DocParseError) -> Self {
        ConversionError::ParseFailure(e.to_string())
    }
}

impl From<DocxError> for ConversionError {
    fn from(e: DocxError) -> Self {
        ConversionError::UnexpectedFailure(e.to_string())
    }
}

impl From<base64::DecodeError> for ConversionError {
    fn from(e: base64::DecodeError) -> Self {
        ConversionError::DecodeFailure(e.to_string())
    }
}

impl From<OfficeError> for ConversionError {
    fn from(e: OfficeError) -> Self {
        ConversionError::ExternalFailure(e.to_string())
    }
}

pub type ConversionResult<T> = Result<T, ConversionError>;

/// 一次转换的统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionReport {
    pub sections: usize,
    pub paragraphs: usize,
    pub runs: usize,
    pub output_paragraphs: usize,
    pub output_bytes: usize,
    pub elapsed_ms: u64,
}

/// 校验并解码传输编码的文档
pub fn decode_payload(payload: Option<&str>) -> ConversionResult<Vec<u8>> {
    let payload = match payload {
        Some(p) if !p.trim().is_empty() => p,
        _ => return Err(ConversionError::InvalidInput("输入不能为空".to_string())),
    };

    let compact = WHITESPACE_REGEX.replace_all(payload, "");
    if !BASE64_REGEX.is_match(&compact) {
        return Err(ConversionError::InvalidInput("不是有效的 Base64 格式".to_string()));
    }

    let bytes = base64::decode(compact.as_bytes())?;
    debug!("【decode_payload】解码得到 {} 字节", bytes.len());
    Ok(bytes)
}

/// 将 .doc 字节转换为 .docx 字节
pub fn convert_with_conf(bytes: &[u8], conf: &ConvertConf) -> ConversionResult<Vec<u8>> {
    Ok(convert_with_report(bytes, conf)?.0)
}

/// 转换并返回统计
pub fn convert_with_report(
    bytes: &[u8],
    conf: &ConvertConf,
) -> ConversionResult<(Vec<u8>, ConversionReport)> {
    let started = Instant::now();
    let source = parse_doc(bytes)?;
    let document = DocConverter::new(conf.clone()).build(&source)?;
    let output = document.to_bytes().map_err(DocxError::from)?;

    let report = ConversionReport {
        sections: source.sections.len(),
        paragraphs: source.paragraph_count(),
        runs: source.run_count(),
        output_paragraphs: document.paragraphs().len(),
        output_bytes: output.len(),
        elapsed_ms: started.elapsed().as_millis() as u64,
    };
    info!(
        "【convert_with_report】{} 个段落, {} 个文本块, 输出 {} 字节, 耗时 {}ms",
        report.paragraphs, report.runs, report.output_bytes, report.elapsed_ms
    );
    Ok((output, report))
}

/// Base64 输入，Base64 输出
pub fn convert_base64(payload: Option<&str>) -> ConversionResult<String> {
    convert_base64_with_conf(payload, &ConvertConf::default())
}

pub fn convert_base64_with_conf(payload: Option<&str>, conf: &ConvertConf) -> ConversionResult<String> {
    let bytes = decode_payload(payload)?;
    let output = convert_with_conf(&bytes, conf)?;
    Ok(base64::encode(output))
}

/// 在阻塞线程池中执行 Base64 转换
pub async fn convert_base64_async(payload: String) -> ConversionResult<String> {
    tokio::task::spawn_blocking(move || convert_base64(Some(&payload)))
        .await
        .map_err(|e| ConversionError::UnexpectedFailure(format!("转换任务异常结束: {}", e)))?
}

/// 文件到文件的转换
pub async fn export_to_docx<P: AsRef<Path>, Q: AsRef<Path>>(
    input_path: P,
    output_path: Q,
    conf: &ConvertConf,
) -> ConversionResult<ConversionReport> {
    let bytes = tokio::fs::read(input_path.as_ref())
        .await
        .map_err(|e| ConversionError::InvalidInput(format!("无法读取输入文件: {}", e)))?;

    let conf = conf.clone();
    let (output, report) = tokio::task::spawn_blocking(move || convert_with_report(&bytes, &conf))
        .await
        .map_err(|e| ConversionError::UnexpectedFailure(format!("转换任务异常结束: {}", e)))??;

    tokio::fs::write(output_path.as_ref(), output)
        .await
        .map_err(|e| ConversionError::UnexpectedFailure(format!("无法写入输出文件: {}", e)))?;
    Ok(report)
}

/// 通过本地办公套件转换整个文档
pub fn convert_base64_external(payload: Option<&str>) -> ConversionResult<String> {
    convert_base64_external_with(
        payload,
        &SocketOfficeConverter::default(),
        office::DEFAULT_HOST,
        office::DEFAULT_PORT,
    )
}

/// 使用指定的外部转换器，临时文件在返回前删除
pub fn convert_base64_external_with<E: ExternalConverter>(
    payload: Option<&str>,
    converter: &E,
    host: &str,
    port: u16,
) -> ConversionResult<String> {
    let bytes = decode_payload(payload)?;

    let scratch_error = |e: std::io::Error| ConversionError::UnexpectedFailure(format!("临时文件错误: {}", e));
    let input = tempfile::Builder::new()
        .prefix("input")
        .suffix(".doc")
        .tempfile()
        .map_err(scratch_error)?;
    let output = tempfile::Builder::new()
        .prefix("output")
        .suffix(".docx")
        .tempfile()
        .map_err(scratch_error)?;
    fs::write(input.path(), &bytes).map_err(scratch_error)?;

    office::run_external(converter, host, port, input.path(), output.path())?;

    let converted = fs::read(output.path()).map_err(scratch_error)?;
    if converted.is_empty() {
        return Err(ConversionError::ExternalFailure("外部转换没有输出内容".to_string()));
    }
    Ok(base64::encode(converted))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_inputs_are_invalid() {
        for payload in [None, Some(""), Some("   "), Some("\n\t")] {
            assert!(matches!(
                convert_base64(payload),
                Err(ConversionError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn alphabet_is_checked_after_whitespace_is_stripped() {
        assert!(matches!(
            decode_payload(Some("QU JD\nRA==")),
            Ok(bytes) if bytes == b"ABCD"
        ));
        assert!(matches!(
            decode_payload(Some("QUJD*A==")),
            Err(ConversionError::InvalidInput(_))
        ));
    }

    #[test]
    fn bad_lengths_fail_to_decode() {
        for payload in ["A", "AAAAA"] {
            assert!(matches!(
                decode_payload(Some(payload)),
                Err(ConversionError::DecodeFailure(_))
            ));
        }
    }

    #[test]
    fn non_documents_fail_to_parse() {
        let err = convert_base64(Some("AAECAwQFBgc=")).unwrap_err();
        assert!(matches!(err, ConversionError::ParseFailure(_)));
        assert!(err.is_client_error());
    }

    #[test]
    fn error_categories() {
        assert!(!ConversionError::UnexpectedFailure(String::new()).is_client_error());
        assert!(!ConversionError::ExternalFailure(String::new()).is_client_error());
        assert!(ConversionError::DecodeFailure(String::new()).is_client_error());
    }
}
