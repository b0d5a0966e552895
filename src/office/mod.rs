//! 外部办公套件转换
//!
//! 整个文档交给本地监听的 LibreOffice/OpenOffice 处理，不经过段落与文本块映射

use std::fs;
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use log::{debug, info, warn};
use thiserror::Error;

/// 外部转换默认地址
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8100;

/// 外部转换错误
#[derive(Error, Debug)]
pub enum OfficeError {
    #[error("IO错误: {0}")]
    IoError(#[from] std::io::Error),

    #[error("无法连接到 {0}: {1}")]
    ConnectFailed(String, String),

    #[error("转换进程失败: {0}")]
    ProcessFailed(String),

    #[error("转换结果不存在: {0}")]
    MissingOutput(String),
}

pub type OfficeResult<T> = Result<T, OfficeError>;

/// 整文档转换器: 连接 → 转换 → 断开
pub trait ExternalConverter {
    type Handle;

    fn connect(&self, host: &str, port: u16) -> OfficeResult<Self::Handle>;

    fn convert(&self, handle: &Self::Handle, input: &Path, output: &Path) -> OfficeResult<()>;

    fn disconnect(&self, handle: Self::Handle) -> OfficeResult<()>;
}

/// 与办公套件监听端口之间的连接
#[derive(Debug)]
pub struct OfficeConnection {
    stream: TcpStream,
    addr: SocketAddr,
}

impl OfficeConnection {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

/// 通过 soffice 命令行进行转换，连接用于确认监听进程可用
#[derive(Debug, Clone)]
pub struct SocketOfficeConverter {
    program: PathBuf,
    timeout: Duration,
}

impl Default for SocketOfficeConverter {
    fn default() -> Self {
        Self::new("soffice")
    }
}

impl SocketOfficeConverter {
    pub fn new<P: Into<PathBuf>>(program: P) -> Self {
        SocketOfficeConverter {
            program: program.into(),
            timeout: Duration::from_secs(5),
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl ExternalConverter for SocketOfficeConverter {
    type Handle = OfficeConnection;

    fn connect(&self, host: &str, port: u16) -> OfficeResult<OfficeConnection> {
        let target = format!("{}:{}", host, port);
        let addrs = (host, port)
            .to_socket_addrs()
            .map_err(|e| OfficeError::ConnectFailed(target.clone(), e.to_string()))?;

        let mut last_error = String::from("没有可用的地址");
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, self.timeout) {
                Ok(stream) => {
                    debug!("【connect】已连接 {}", addr);
                    return Ok(OfficeConnection { stream, addr });
                }
                Err(e) => last_error = e.to_string(),
            }
        }
        Err(OfficeError::ConnectFailed(target, last_error))
    }

    fn convert(&self, _handle: &OfficeConnection, input: &Path, output: &Path) -> OfficeResult<()> {
        let scratch = tempfile::tempdir()?;
        let result = Command::new(&self.program)
            .args(["--headless", "--convert-to", "docx", "--outdir"])
            .arg(scratch.path())
            .arg(input)
            .output()
            .map_err(|e| OfficeError::ProcessFailed(format!("无法启动 {}: {}", self.program.display(), e)))?;

        if !result.status.success() {
            return Err(OfficeError::ProcessFailed(format!(
                "{}: {}",
                result.status,
                String::from_utf8_lossy(&result.stderr).trim()
            )));
        }

        let produced = converted_path(scratch.path(), input);
        if !produced.exists() {
            return Err(OfficeError::MissingOutput(produced.display().to_string()));
        }
        // 临时目录可能与目标不在同一文件系统
        fs::copy(&produced, output)?;
        info!("【convert】外部转换完成: {}", output.display());
        Ok(())
    }

    fn disconnect(&self, handle: OfficeConnection) -> OfficeResult<()> {
        match handle.stream.shutdown(Shutdown::Both) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotConnected => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// soffice 输出文件名: 输入文件名换成 .docx 扩展名
pub fn converted_path(outdir: &Path, input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default();
    outdir.join(Path::new(stem).with_extension("docx"))
}

/// 完整执行一次外部转换，无论转换是否成功都会断开连接
pub fn run_external<E: ExternalConverter>(
    converter: &E,
    host: &str,
    port: u16,
    input: &Path,
    output: &Path,
) -> OfficeResult<()> {
    let handle = converter.connect(host, port)?;
    let result = converter.convert(&handle, input, output);
    if let Err(e) = converter.disconnect(handle) {
        warn!("【run_external】断开连接失败: {}", e);
    }
    result
}
