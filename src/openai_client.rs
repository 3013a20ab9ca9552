// src/openai_client.rs
//
// 通用 OpenAI 兼容 API 客户端
//
// 供基于 LLM 的短语定位器使用，支持所有 OpenAI 兼容的 API 服务
// （如 OpenAI、Gemini 的 OpenAI 兼容端点、DeepSeek 等）

use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

// ============================================================================
// 消息类型定义
// ============================================================================

/// LLM 消息角色
#[derive(Debug, Clone)]
pub enum Role {
    System,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
        }
    }
}

/// LLM 消息
#[derive(Debug, Clone)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

// ============================================================================
// 聊天选项
// ============================================================================

/// 聊天请求参数
#[derive(Debug, Clone)]
pub struct ChatOptions {
    /// 最大生成 token 数
    pub max_tokens: u32,
    /// 温度参数（0.0-1.0，越低越确定）
    pub temperature: f64,
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self {
            max_tokens: 1024,
            temperature: 0.3,
        }
    }
}

impl ChatOptions {
    /// 用于短语抽取的参数（零温度，输出只是一个 JSON 数组）
    pub fn for_extraction() -> Self {
        Self {
            max_tokens: 512,
            temperature: 0.0,
        }
    }
}

// ============================================================================
// 客户端配置
// ============================================================================

/// OpenAI 兼容 API 客户端配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiClientConfig {
    /// API 端点 (如 https://api.openai.com/v1/chat/completions)
    pub endpoint: String,
    /// API Key
    pub api_key: String,
    /// 模型名称
    pub model: String,
}

impl OpenAiClientConfig {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

// ============================================================================
// OpenAI 客户端
// ============================================================================

/// 通用 OpenAI 兼容 API 客户端
#[derive(Clone)]
pub struct OpenAiClient {
    config: OpenAiClientConfig,
    client: Client,
}

impl OpenAiClient {
    /// 创建新的客户端实例
    pub fn new(config: OpenAiClientConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { config, client }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// 通用聊天方法
    ///
    /// # Arguments
    /// * `messages` - 消息列表（通常是 system + user）
    /// * `options` - 聊天参数
    pub async fn chat(&self, messages: &[Message], options: ChatOptions) -> Result<String> {
        if messages.is_empty() {
            return Ok(String::new());
        }

        let request_body = Self::build_request(&self.config.model, messages, &options);

        tracing::info!(
            "OpenAI 请求: endpoint={}, model={}, max_tokens={}, temperature={}",
            self.config.endpoint,
            self.config.model,
            options.max_tokens,
            options.temperature
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI API 请求失败 ({}): {}", status, text);
        }

        let payload: Value = response.json().await?;
        Self::extract_content(&payload)
    }

    /// 简化的单轮对话方法
    pub async fn chat_simple(
        &self,
        system_prompt: &str,
        user_message: &str,
        options: ChatOptions,
    ) -> Result<String> {
        let messages = vec![Message::system(system_prompt), Message::user(user_message)];
        self.chat(&messages, options).await
    }

    fn build_request(model: &str, messages: &[Message], options: &ChatOptions) -> Value {
        let messages_json: Vec<Value> = messages
            .iter()
            .map(|m| {
                serde_json::json!({
                    "role": m.role.as_str(),
                    "content": m.content
                })
            })
            .collect();

        serde_json::json!({
            "model": model,
            "messages": messages_json,
            "max_tokens": options.max_tokens,
            "temperature": options.temperature
        })
    }

    /// 解析 OpenAI 格式的响应
    fn extract_content(payload: &Value) -> Result<String> {
        let content = payload["choices"]
            .as_array()
            .and_then(|arr| arr.first())
            .and_then(|choice| choice["message"]["content"].as_str())
            .ok_or_else(|| anyhow::anyhow!("OpenAI API 返回格式不可解析: {:?}", payload))?;

        Ok(content.trim().to_string())
    }
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_creation() {
        let sys = Message::system("test system");
        assert!(matches!(sys.role, Role::System));
        assert_eq!(sys.content, "test system");

        let user = Message::user("test user");
        assert!(matches!(user.role, Role::User));
    }

    #[test]
    fn test_extraction_options() {
        let opts = ChatOptions::for_extraction();
        assert_eq!(opts.max_tokens, 512);
        assert_eq!(opts.temperature, 0.0);
    }

    #[test]
    fn test_build_request() {
        let body = OpenAiClient::build_request(
            "gpt-4o-mini",
            &[Message::system("s"), Message::user("u")],
            &ChatOptions::for_extraction(),
        );
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["max_tokens"], 512);
    }

    #[test]
    fn test_extract_content() {
        let payload = serde_json::json!({
            "choices": [{ "message": { "content": "  [\"three hundred\"]\n" } }]
        });
        assert_eq!(
            OpenAiClient::extract_content(&payload).unwrap(),
            "[\"three hundred\"]"
        );
        assert!(OpenAiClient::extract_content(&serde_json::json!({})).is_err());
    }
}
