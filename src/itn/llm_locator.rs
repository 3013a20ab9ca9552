//! 基于 LLM 的短语定位
//!
//! 让 OpenAI 兼容的模型列出句子里的数字词短语（JSON 字符串数组），
//! 再按顺序把每个短语映射回原文中的字节偏移。

use crate::config::LlmConfig;
use crate::error::{NormalizeError, NormalizeResult};
use crate::itn::locator::fold_word;
use crate::itn::types::{LocatedPhrase, PhraseCategory};
use crate::openai_client::{ChatOptions, OpenAiClient, OpenAiClientConfig};

/// LLM 短语定位器
#[derive(Clone)]
pub struct LlmPhraseLocator {
    client: OpenAiClient,
    system_prompt: String,
}

impl LlmPhraseLocator {
    pub fn new(config: &LlmConfig) -> Self {
        let client = OpenAiClient::new(OpenAiClientConfig::new(
            &config.endpoint,
            &config.api_key,
            &config.model,
        ));
        Self {
            client,
            system_prompt: config.system_prompt.clone(),
        }
    }

    /// 定位数字短语
    ///
    /// 网络或解析失败返回 `LocatorFailure`
    pub async fn locate(&self, text: &str) -> NormalizeResult<Vec<LocatedPhrase>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        tracing::info!("LLM 定位数字短语, model={}", self.client.model());
        let reply = self
            .client
            .chat_simple(&self.system_prompt, text, ChatOptions::for_extraction())
            .await?;

        let phrases = parse_phrase_list(&reply)?;
        Ok(anchor_phrases(text, &phrases))
    }
}

/// 解析模型回复中的 JSON 字符串数组（允许包在 ``` 代码块里）
pub fn parse_phrase_list(reply: &str) -> NormalizeResult<Vec<String>> {
    let mut body = reply.trim();
    if let Some(rest) = body.strip_prefix("```") {
        // 去掉 ```json 这一行和结尾的 ```
        body = rest.split_once('\n').map(|(_, b)| b).unwrap_or("");
        body = body.trim_end().strip_suffix("```").unwrap_or(body).trim();
    }

    serde_json::from_str::<Vec<String>>(body).map_err(|e| {
        NormalizeError::LocatorFailure(format!("无法解析模型回复 ({}): {}", e, reply))
    })
}

/// 把短语按顺序映射回原文
///
/// 整词、忽略 ASCII 大小写匹配；找不到的短语丢弃并记录警告。
pub fn anchor_phrases(text: &str, phrases: &[String]) -> Vec<LocatedPhrase> {
    // ASCII 小写不改变字节长度，偏移可直接用于原文
    let haystack = text.to_ascii_lowercase();
    let mut cursor = 0;
    let mut located = Vec::new();

    for phrase in phrases {
        let needle = phrase.trim().to_ascii_lowercase();
        if needle.is_empty() {
            continue;
        }

        let Some(start) = find_word(&haystack, &needle, cursor) else {
            tracing::warn!("模型返回的短语不在原文中: {}", phrase);
            continue;
        };
        let end = start + needle.len();

        let words: Vec<String> = text[start..end]
            .split(|c: char| c.is_whitespace() || c == '-')
            .filter(|w| !w.is_empty())
            .map(fold_word)
            .collect();

        located.push(LocatedPhrase {
            text: text[start..end].to_string(),
            start,
            end,
            words,
            category: PhraseCategory::Num,
        });
        cursor = end;
    }

    located
}

/// 从 `from` 开始查找整词出现的位置
fn find_word(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    haystack[from..]
        .match_indices(needle)
        .map(|(pos, _)| from + pos)
        .find(|&start| {
            let before = haystack[..start].chars().next_back();
            let after = haystack[start + needle.len()..].chars().next();
            !before.is_some_and(char::is_alphabetic) && !after.is_some_and(char::is_alphabetic)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_array() {
        let phrases = parse_phrase_list(r#"["four thousand", "two"]"#).unwrap();
        assert_eq!(phrases, vec!["four thousand", "two"]);
    }

    #[test]
    fn test_parse_fenced_array() {
        let reply = "```json\n[\"three hundred\"]\n```";
        assert_eq!(parse_phrase_list(reply).unwrap(), vec!["three hundred"]);
        assert!(parse_phrase_list("```\n[]\n```").unwrap().is_empty());
    }

    #[test]
    fn test_parse_failure_is_locator_failure() {
        let err = parse_phrase_list("Sure! The numbers are three and four.").unwrap_err();
        assert!(matches!(err, NormalizeError::LocatorFailure(_)));
    }

    #[test]
    fn test_anchor_in_order() {
        let text = "Two cats, then two hundred dogs";
        let located = anchor_phrases(text, &["two".to_string(), "two hundred".to_string()]);
        assert_eq!(located.len(), 2);
        assert_eq!(located[0].text, "Two");
        assert_eq!(located[0].words, vec!["two"]);
        assert_eq!(located[1].start, 15);
        assert_eq!(located[1].words, vec!["two", "hundred"]);
    }

    #[test]
    fn test_anchor_whole_words_and_missing() {
        let text = "someone has one apple";
        let located = anchor_phrases(text, &["one".to_string(), "nine".to_string()]);
        assert_eq!(located.len(), 1);
        assert_eq!(located[0].start, 12);
    }
}
