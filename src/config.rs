// src/config.rs

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 覆盖 `llm.api_key` 的环境变量
pub const API_KEY_ENV: &str = "NUMBER_NORMALIZER_API_KEY";

// ============================================================================
// 短语定位配置
// ============================================================================

/// 短语定位器类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LocatorKind {
    /// 内置词表匹配（默认，离线）
    #[default]
    Pattern,
    /// OpenAI 兼容模型抽取
    Llm,
}

/// 短语定位配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocatorConfig {
    #[serde(default)]
    pub kind: LocatorKind,
    /// 是否对拼错的数字词做纠错（默认关闭）
    #[serde(default)]
    pub fuzzy_correction: bool,
    /// 额外的数字词（只影响定位，未注册的词仍会被跳过）
    #[serde(default)]
    pub extra_words: Vec<String>,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            kind: LocatorKind::default(),
            fuzzy_correction: false,
            extra_words: Vec::new(),
        }
    }
}

// ============================================================================
// LLM 配置
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_extraction_prompt")]
    pub system_prompt: String,
}

fn default_llm_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_extraction_prompt() -> String {
    "Extract every spelled-out number phrase (for example \"four thousand five hundred\") \
     from the user's sentence. Reply with only a JSON array of strings, each copied \
     verbatim from the sentence, in order of appearance. Reply [] if there are none."
        .to_string()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: default_llm_endpoint(),
            api_key: String::new(),
            model: default_llm_model(),
            system_prompt: default_extraction_prompt(),
        }
    }
}

impl LlmConfig {
    /// 配置里没有 API Key 时从环境变量读取
    pub fn resolve_api_key(&mut self) {
        if self.api_key.is_empty() {
            if let Ok(key) = std::env::var(API_KEY_ENV) {
                self.api_key = key.trim().to_string();
            }
        }
    }
}

// ============================================================================
// 输出配置
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// 输出完整 JSON 结果而不是纯文本
    #[serde(default)]
    pub json: bool,
}

// ============================================================================
// 应用配置
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub locator: LocatorConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| anyhow::anyhow!("无法获取配置目录"))?;
        Ok(config_dir.join("NumberNormalizer").join("config.json"))
    }

    /// 从默认路径加载，文件不存在时使用默认配置
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        tracing::info!("尝试从以下路径加载配置: {:?}", path);

        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str(&content)
                .map_err(|e| anyhow::anyhow!("配置解析失败 {:?}: {}", path, e))?
        } else {
            tracing::info!("配置文件不存在，使用默认配置");
            AppConfig::new()
        };

        config.llm.resolve_api_key();
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        self.save_to(&path)
    }

    /// 原子写入：先写临时文件，再替换
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        tracing::info!("保存配置到: {:?}", path);

        let temp_path = path.with_extension("json.tmp");
        let backup_path = path.with_extension("json.bak");

        std::fs::write(&temp_path, &content).map_err(|e| {
            tracing::error!("写入临时文件失败: {}", e);
            e
        })?;

        // 旧文件先移到 .bak，替换成功后再删除
        if path.exists() {
            std::fs::rename(path, &backup_path)?;
        }
        if let Err(e) = std::fs::rename(&temp_path, path) {
            tracing::error!("替换配置文件失败: {}", e);
            if backup_path.exists() {
                let _ = std::fs::rename(&backup_path, path);
            }
            return Err(e.into());
        }
        if backup_path.exists() {
            let _ = std::fs::remove_file(&backup_path);
        }

        Ok(())
    }
}
