use clap::Parser;
use doc2docx_rust::api::{convert_with_report, decode_payload, export_to_docx};
use doc2docx_rust::{ConversionError, ConversionReport, ConvertConf};
use std::fs;
use std::path::{Path, PathBuf};

/// 将 Word 97-2003 (.doc) 文档转换为 .docx
#[derive(Parser, Debug)]
#[command(name = "doc2docx", version, about)]
struct Cli {
    /// 输入文件
    input: PathBuf,

    /// 输出文件 (默认与输入同名, 扩展名为 .docx)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON 配置文件
    #[arg(long)]
    config: Option<PathBuf>,

    /// 输入为 Base64 文本，输出同样写为 Base64 文本
    #[arg(long)]
    base64: bool,

    /// 以 JSON 打印转换统计
    #[arg(long)]
    report: bool,
}

fn load_conf(path: Option<&Path>) -> Result<ConvertConf, ConversionError> {
    let Some(path) = path else {
        return Ok(ConvertConf::default());
    };
    let text = fs::read_to_string(path)
        .map_err(|e| ConversionError::InvalidInput(format!("无法读取配置文件 {}: {}", path.display(), e)))?;
    ConvertConf::from_json(&text)
        .map_err(|e| ConversionError::InvalidInput(format!("配置文件格式错误: {}", e)))
}

fn convert_base64_file(input: &Path, output: &Path, conf: &ConvertConf) -> Result<ConversionReport, ConversionError> {
    let text = fs::read_to_string(input)
        .map_err(|e| ConversionError::InvalidInput(format!("无法读取输入文件: {}", e)))?;
    let bytes = decode_payload(Some(&text))?;
    let (docx, report) = convert_with_report(&bytes, conf)?;
    fs::write(output, base64::encode(docx))
        .map_err(|e| ConversionError::UnexpectedFailure(format!("无法写入输出文件: {}", e)))?;
    Ok(report)
}

async fn run(cli: &Cli) -> Result<ConversionReport, ConversionError> {
    let conf = load_conf(cli.config.as_deref())?;
    let output = cli.output.clone().unwrap_or_else(|| {
        let extension = if cli.base64 { "docx.b64" } else { "docx" };
        cli.input.with_extension(extension)
    });

    let report = if cli.base64 {
        convert_base64_file(&cli.input, &output, &conf)?
    } else {
        export_to_docx(&cli.input, &output, &conf).await?
    };
    println!("转换完成: {}", output.display());
    Ok(report)
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match run(&cli).await {
        Ok(report) => {
            println!("段落数量: {}", report.paragraphs);
            println!("文本块数量: {}", report.runs);
            println!("耗时: {}ms", report.elapsed_ms);
            if cli.report {
                match serde_json::to_string_pretty(&report) {
                    Ok(json) => println!("{}", json),
                    Err(e) => eprintln!("无法输出统计: {}", e),
                }
            }
        }
        Err(e) => {
            eprintln!("转换失败: {}", e);
            std::process::exit(if e.is_client_error() { 2 } else { 1 });
        }
    }
}
