//! 服务 CLI 分发：`run`、`doctor`、`version`、`help`。

use anyhow::anyhow;
use serde_json::json;

use crate::config::{GateConfig, ServiceSpec};

/// CLI 分发结果。
#[derive(Debug, PartialEq, Eq)]
pub enum CliDispatch {
    /// 继续进入服务主循环。
    Run,
    /// 命令已处理完成，主程序应退出。
    Exit,
}

/// 解析并执行服务 CLI。
pub fn dispatch(args: &[String], service: ServiceSpec) -> anyhow::Result<CliDispatch> {
    let Some(first) = args.first() else {
        return Ok(CliDispatch::Run);
    };

    let cmd = first.trim();
    if cmd.is_empty() || cmd == "run" {
        return Ok(CliDispatch::Run);
    }

    match cmd {
        "-h" | "--help" | "help" => {
            print_root_help(service);
            Ok(CliDispatch::Exit)
        }
        "doctor" => {
            let format = parse_doctor_format(&args[1..])?;
            let config = GateConfig::from_env(service)?;
            println!("{}", render_doctor(&config, format));
            Ok(CliDispatch::Exit)
        }
        "version" => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(CliDispatch::Exit)
        }
        other => Err(anyhow!(
            "unknown command: {other}; run `{} --help` for usage",
            service.binary
        )),
    }
}

/// `doctor` 输出格式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoctorFormat {
    Text,
    Json,
}

/// 解析 doctor 的 `--format` 参数。
fn parse_doctor_format(args: &[String]) -> anyhow::Result<DoctorFormat> {
    if args.is_empty() {
        return Ok(DoctorFormat::Text);
    }
    if args.len() == 2 && args[0] == "--format" {
        return match args[1].as_str() {
            "text" => Ok(DoctorFormat::Text),
            "json" => Ok(DoctorFormat::Json),
            other => Err(anyhow!("unsupported doctor format: {other}")),
        };
    }
    Err(anyhow!("usage: doctor [--format text|json]"))
}

/// 渲染解析后的配置；签名密钥只输出来源。
fn render_doctor(config: &GateConfig, format: DoctorFormat) -> String {
    let ttl_min = config.token_ttl.as_secs() / 60;
    match format {
        DoctorFormat::Text => [
            format!("service: {}", config.service.name),
            format!("addr: {}", config.addr),
            format!("data-dir: {}", config.data_dir.display()),
            format!("accounts-collection: {}", config.service.accounts_key),
            format!("signing-key-source: {}", config.signing_key_source.as_str()),
            format!("token-ttl-min: {ttl_min}"),
            format!("token-url: {}", config.token_url),
        ]
        .join("\n"),
        DoctorFormat::Json => {
            let payload = json!({
                "service": config.service.name,
                "addr": config.addr,
                "dataDir": config.data_dir.display().to_string(),
                "accountsCollection": config.service.accounts_key,
                "signingKeySource": config.signing_key_source.as_str(),
                "tokenTtlMin": ttl_min,
                "tokenUrl": config.token_url,
            });
            serde_json::to_string_pretty(&payload).unwrap_or_else(|_| "{}".to_string())
        }
    }
}

/// 打印 root help。
fn print_root_help(service: ServiceSpec) {
    let bin = service.binary;
    println!("{bin} usage:");
    println!("  {bin} run");
    println!("  {bin} doctor [--format text|json]");
    println!("  {bin} version");
    println!();
    println!("environment:");
    for suffix in ["ADDR", "DATA_DIR", "SECRET_KEY", "TOKEN_TTL_MIN", "TOKEN_URL"] {
        println!("  {}_{suffix}", service.env_prefix);
    }
}
