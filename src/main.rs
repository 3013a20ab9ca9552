// 数字规范化命令行工具
//
// 用法: number-normalizer [--json] [--llm] [--config PATH] [--init-config] [TEXT...]
// 没有 TEXT 时逐行读取 stdin
use anyhow::Result;
use std::io::BufRead;
use std::path::PathBuf;

use number_normalizer_lib::config::{AppConfig, LocatorKind};
use number_normalizer_lib::{init_logging, LlmPhraseLocator, NormalizationResult, NumberNormalizer};

struct CliArgs {
    json: bool,
    llm: bool,
    init_config: bool,
    config_path: Option<PathBuf>,
    text: Vec<String>,
}

fn parse_args() -> Result<CliArgs> {
    let mut args = CliArgs {
        json: false,
        llm: false,
        init_config: false,
        config_path: None,
        text: Vec::new(),
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--json" => args.json = true,
            "--llm" => args.llm = true,
            "--init-config" => args.init_config = true,
            "--config" => {
                let path = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config 需要一个路径参数"))?;
                args.config_path = Some(PathBuf::from(path));
            }
            "-h" | "--help" => {
                println!("用法: number-normalizer [--json] [--llm] [--config PATH] [--init-config] [TEXT...]");
                std::process::exit(0);
            }
            _ => args.text.push(arg),
        }
    }

    Ok(args)
}

/// 按配置选择定位器，处理一行文本
struct Runner {
    normalizer: NumberNormalizer,
    llm: Option<LlmPhraseLocator>,
    json: bool,
}

impl Runner {
    async fn run(&self, text: &str) -> Result<()> {
        let result = match &self.llm {
            Some(locator) => {
                let phrases = locator.locate(text).await?;
                self.normalizer.apply_phrases(text, &phrases)
            }
            None => self.normalizer.normalize(text)?,
        };
        self.print(&result)
    }

    fn print(&self, result: &NormalizationResult) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string(result)?);
        } else {
            println!("{}", result.text);
            for skipped in &result.skipped {
                eprintln!("跳过 {:?}: {}", skipped.text, skipped.reason);
            }
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let args = parse_args()?;

    if args.init_config {
        let config = AppConfig::new();
        let path = match &args.config_path {
            Some(path) => {
                config.save_to(path)?;
                path.clone()
            }
            None => {
                config.save()?;
                AppConfig::config_path()?
            }
        };
        println!("已写入默认配置: {}", path.display());
        return Ok(());
    }

    let config = match &args.config_path {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    let use_llm = args.llm || config.locator.kind == LocatorKind::Llm;
    if use_llm && config.llm.api_key.is_empty() {
        anyhow::bail!(
            "LLM 定位需要 API Key（配置 llm.api_key 或环境变量 {}）",
            number_normalizer_lib::config::API_KEY_ENV
        );
    }

    let runner = Runner {
        normalizer: NumberNormalizer::from_config(&config.locator)?,
        llm: use_llm.then(|| LlmPhraseLocator::new(&config.llm)),
        json: args.json || config.output.json,
    };

    if !args.text.is_empty() {
        return runner.run(&args.text.join(" ")).await;
    }

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if let Err(e) = runner.run(&line).await {
            // 单行失败不影响后续输入
            tracing::error!("处理失败: {}", e);
            println!("{}", line);
        }
    }

    Ok(())
}
