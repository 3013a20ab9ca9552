//! Number Normalizer
//!
//! 把自由文本中拼写出来的英文数字短语（"three hundred"）替换为阿拉伯数字（"300"）。
//! 核心是一个小型 WFST 框架：按量级构建转换器，组合成整条短语的线性链，再解码出最优输出。

pub mod config;
pub mod error;
pub mod itn;
pub mod openai_client;
pub mod wfst;

use lazy_static::lazy_static;

pub use error::{NormalizeError, NormalizeResult};
pub use itn::{LlmPhraseLocator, NormalizationResult, NumberNormalizer, PatternLocator, PhraseLocator};

/// 初始化日志系统
///
/// 输出到 stderr，级别取自 RUST_LOG（默认 warn）。可以安全地多次调用。
pub fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // 使用 try_init() 代替 init()，避免重复初始化时 panic
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

lazy_static! {
    /// 默认引擎：英文注册表 + 内置词表定位器，首次使用时构建
    static ref DEFAULT_NORMALIZER: NormalizeResult<NumberNormalizer> = NumberNormalizer::english();
}

/// 用共享的默认引擎规范化文本
///
/// 定位失败或引擎构建失败时返回原文。
pub fn normalize(text: &str) -> String {
    let result = match DEFAULT_NORMALIZER.as_ref() {
        Ok(normalizer) => normalizer.normalize_text(text),
        Err(e) => Err(e.clone()),
    };
    match result {
        Ok(normalized) => normalized,
        Err(e) => {
            tracing::warn!("规范化失败，返回原文: {}", e);
            text.to_string()
        }
    }
}
