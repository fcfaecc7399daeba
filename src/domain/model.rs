use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// 推薦可選的三個國家
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Country {
    #[serde(rename = "Costa Rica")]
    CostaRica,
    Panama,
    Belize,
}

impl Country {
    pub const ALL: [Country; 3] = [Country::CostaRica, Country::Panama, Country::Belize];

    pub fn name(&self) -> &'static str {
        match self {
            Country::CostaRica => "Costa Rica",
            Country::Panama => "Panama",
            Country::Belize => "Belize",
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub country: Country,
    pub score: u8,
    pub reasons: Vec<String>,
    pub cities: Vec<City>,
}

/// 問卷答案：任意鍵值，只讀取 `destinations` 與 `relocationType`
#[derive(Debug, Clone, PartialEq)]
pub struct Answers(Value);

impl Default for Answers {
    fn default() -> Self {
        Self(Value::Object(Map::new()))
    }
}

impl Answers {
    pub fn new(value: Value) -> Self {
        match value {
            Value::Null => Self::default(),
            other => Self(other),
        }
    }

    /// 從請求 body 取出 `answers`，缺少時為空物件
    pub fn from_body(body: &Value) -> Self {
        Self::new(body.get("answers").cloned().unwrap_or(Value::Null))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// 單一值正規化為一個元素的清單；缺少時為空清單
    pub fn destinations(&self) -> Vec<String> {
        match self.0.get("destinations") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items.iter().filter_map(value_text).collect(),
            Some(single) => value_text(single).into_iter().collect(),
        }
    }

    pub fn relocation_type(&self) -> Option<String> {
        self.0.get("relocationType").and_then(value_text)
    }

    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.0)
    }
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// 一次請求的成功結果
#[derive(Debug, Clone, PartialEq)]
pub enum Advice {
    /// 沒有憑證時本地計算的推薦
    Fallback(Recommendation),
    /// 上游回覆中解析出的 JSON 物件，原樣轉發
    Relayed(Value),
    /// 上游回覆無法解析時的原始文字
    RawText(String),
}

impl Advice {
    pub fn into_json(self) -> Value {
        match self {
            Advice::Fallback(recommendation) => {
                serde_json::to_value(recommendation).unwrap_or_else(|_| Value::Object(Map::new()))
            }
            Advice::Relayed(value) => value,
            Advice::RawText(text) => serde_json::json!({ "text": text }),
        }
    }
}
