// src/error.rs
//
// 数字规范化错误类型
//
// 所有错误都只作用于单个短语或单次调用，不存在进程级致命错误

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NormalizeError {
    // 短语错误
    #[error("Unrecognized number word: {word}")]
    UnrecognizedWord { word: String },

    #[error("Nothing to compose: phrase produced no transducers")]
    EmptyComposition,

    // 注册表错误
    #[error("No transducer registered for category: {category}")]
    UnknownCategory { category: String },

    // 解码错误
    #[error("Automaton is not a linear chain at state {state}")]
    NonLinearAutomaton { state: usize },

    // 定位器错误
    #[error("Phrase locator failed: {0}")]
    LocatorFailure(String),
}

impl NormalizeError {
    /// 是否只影响单个短语（其余短语可以继续处理）
    pub fn is_phrase_scoped(&self) -> bool {
        !matches!(self, NormalizeError::LocatorFailure(_))
    }
}

impl From<anyhow::Error> for NormalizeError {
    fn from(err: anyhow::Error) -> Self {
        NormalizeError::LocatorFailure(err.to_string())
    }
}

pub type NormalizeResult<T> = Result<T, NormalizeError>;
