//! ITN 分词器
//!
//! 将输入文本分割为：字母词、数字、空白、符号

/// Token 类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    /// 字母序列
    Word,
    /// 阿拉伯数字序列
    Digits,
    /// 空白符序列
    Whitespace,
    /// 标点/符号（每个字符单独成 token）
    Symbol,
}

/// Token
#[derive(Debug, Clone)]
pub struct Token {
    pub text: String,
    pub token_type: TokenType,
    /// 在原文中的起始字节偏移
    pub start: usize,
    /// 在原文中的结束字节偏移（不含）
    pub end: usize,
}

impl Token {
    pub fn is_word(&self) -> bool {
        self.token_type == TokenType::Word
    }
}

/// 分词器
pub struct Tokenizer;

impl Tokenizer {
    /// 分词
    ///
    /// 按字符类型将文本分割为 Token 序列，相邻同类字符合并（符号除外）
    pub fn tokenize(text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut current_type: Option<TokenType> = None;
        let mut current_start = 0;

        for (idx, ch) in text.char_indices() {
            let char_type = Self::classify_char(ch);

            if let Some(ct) = current_type {
                if ct == char_type && ct != TokenType::Symbol {
                    continue;
                }
                // 类型切换，保存当前 token
                tokens.push(Token {
                    text: text[current_start..idx].to_string(),
                    token_type: ct,
                    start: current_start,
                    end: idx,
                });
            }
            current_start = idx;
            current_type = Some(char_type);
        }

        // 处理最后一个 token
        if let Some(ct) = current_type {
            tokens.push(Token {
                text: text[current_start..].to_string(),
                token_type: ct,
                start: current_start,
                end: text.len(),
            });
        }

        tokens
    }

    /// 字符分类
    fn classify_char(ch: char) -> TokenType {
        if ch.is_alphabetic() {
            TokenType::Word
        } else if ch.is_ascii_digit() {
            TokenType::Digits
        } else if ch.is_whitespace() {
            TokenType::Whitespace
        } else {
            TokenType::Symbol
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_sentence() {
        let tokens = Tokenizer::tokenize("I have five apples.");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["I", " ", "have", " ", "five", " ", "apples", "."]);
        assert_eq!(tokens[4].token_type, TokenType::Word);
        assert_eq!(&"I have five apples."[tokens[4].start..tokens[4].end], "five");
        assert_eq!(tokens[7].token_type, TokenType::Symbol);
    }

    #[test]
    fn test_tokenize_hyphen_and_digits() {
        let tokens = Tokenizer::tokenize("twenty-two 42");
        assert_eq!(tokens[0].text, "twenty");
        assert_eq!(tokens[1].text, "-");
        assert_eq!(tokens[1].token_type, TokenType::Symbol);
        assert_eq!(tokens[4].text, "42");
        assert_eq!(tokens[4].token_type, TokenType::Digits);
    }

    #[test]
    fn test_symbols_are_single_chars() {
        let tokens = Tokenizer::tokenize("?!");
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn test_multibyte_offsets() {
        let text = "ｆｉｖｅ dollars";
        let tokens = Tokenizer::tokenize(text);
        assert_eq!(tokens[0].text, "ｆｉｖｅ");
        assert_eq!(tokens[0].end, "ｆｉｖｅ".len());
        assert_eq!(&text[tokens[2].start..tokens[2].end], "dollars");
    }

    #[test]
    fn test_empty() {
        assert!(Tokenizer::tokenize("").is_empty());
    }
}
