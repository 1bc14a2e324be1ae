use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::utils::error::PatternError;

/// 發票範例共用的稅率 (18%)
pub const TAX_RATE: f64 = 0.18;

#[derive(Debug, Clone, PartialEq)]
pub struct Invoice {
    pub customer_name: String,
    pub amount: f64,
    pub is_locked: bool,
}

impl Invoice {
    pub fn new(customer_name: impl Into<String>, amount: f64) -> Self {
        Self {
            customer_name: customer_name.into(),
            amount,
            is_locked: false,
        }
    }

    pub fn locked(customer_name: impl Into<String>, amount: f64) -> Self {
        Self {
            is_locked: true,
            ..Self::new(customer_name, amount)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Solid,
    Creational,
    Behavioral,
    Structural,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Solid,
        Category::Creational,
        Category::Behavioral,
        Category::Structural,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Solid => "solid",
            Category::Creational => "creational",
            Category::Behavioral => "behavioral",
            Category::Structural => "structural",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PatternError::InvalidConfigValueError {
                field: "category".to_string(),
                value: s.to_string(),
                reason: "Valid categories: solid, creational, behavioral, structural".to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Violated,
    Followed,
}

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::Violated, Variant::Followed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Violated => "violated",
            Variant::Followed => "followed",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variant::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PatternError::InvalidConfigValueError {
                field: "variant".to_string(),
                value: s.to_string(),
                reason: "Valid variants: violated, followed".to_string(),
            })
    }
}

/// 範例執行時輸出的文字紀錄，取代直接 print
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    lines: Vec<String>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, text: impl Into<String>) {
        self.lines.push(text.into());
    }

    pub fn blank(&mut self) {
        self.lines.push(String::new());
    }

    pub fn rule(&mut self, ch: char, width: usize) {
        self.lines.push(ch.to_string().repeat(width));
    }

    /// 標題區塊：上下各一條 60 字元的分隔線
    pub fn banner(&mut self, title: impl Into<String>) {
        self.rule('=', 60);
        self.line(title);
        self.rule('=', 60);
    }

    pub fn section(&mut self, title: impl Into<String>) {
        self.blank();
        self.line(title);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.contains(needle))
    }

    pub fn count_matching(&self, needle: &str) -> usize {
        self.lines.iter().filter(|l| l.contains(needle)).count()
    }

    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// 以 id + variant 指向目錄中的一個範例
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExampleKey {
    pub id: String,
    pub variant: Variant,
}

impl ExampleKey {
    pub fn new(id: impl Into<String>, variant: Variant) -> Self {
        Self {
            id: id.into(),
            variant,
        }
    }
}

impl fmt::Display for ExampleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.id, self.variant)
    }
}

/// 篩選條件；空清單代表不限制
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub ids: Vec<String>,
    pub categories: Vec<Category>,
    pub variants: Vec<Variant>,
}

impl Selection {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn matches(&self, id: &str, category: Category, variant: Variant) -> bool {
        (self.ids.is_empty() || self.ids.iter().any(|i| i == id))
            && (self.categories.is_empty() || self.categories.contains(&category))
            && (self.variants.is_empty() || self.variants.contains(&variant))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "error", rename_all = "lowercase")]
pub enum ExampleOutcome {
    Completed,
    Failed(String),
}

impl ExampleOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, ExampleOutcome::Completed)
    }
}

/// 單一範例的執行結果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExampleResult {
    pub id: String,
    pub title: String,
    pub category: Category,
    pub variant: Variant,
    pub outcome: ExampleOutcome,
    pub transcript: Transcript,
    #[serde(with = "duration_millis")]
    pub duration: Duration,
}

impl ExampleResult {
    /// 輸出檔名，例如 `strategy_followed.txt`
    pub fn file_stem(&self) -> String {
        format!("{}_{}", self.id, self.variant)
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let millis = u64::deserialize(d)?;
        Ok(Duration::from_millis(millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_and_variant_parse() {
        assert_eq!("Behavioral".parse::<Category>().unwrap(), Category::Behavioral);
        assert_eq!(" followed ".parse::<Variant>().unwrap(), Variant::Followed);
        assert!("gof".parse::<Category>().is_err());
        assert!("fixed".parse::<Variant>().is_err());
    }

    #[test]
    fn test_selection_matches() {
        let all = Selection::all();
        assert!(all.matches("state", Category::Behavioral, Variant::Violated));

        let selection = Selection {
            ids: vec![],
            categories: vec![Category::Solid],
            variants: vec![Variant::Followed],
        };
        assert!(selection.matches("lsp", Category::Solid, Variant::Followed));
        assert!(!selection.matches("lsp", Category::Solid, Variant::Violated));
        assert!(!selection.matches("builder", Category::Creational, Variant::Followed));
    }

    #[test]
    fn test_transcript_banner_and_search() {
        let mut out = Transcript::new();
        out.banner("TITLE");
        out.line("Payment Type: PayPal");

        assert_eq!(out.len(), 4);
        assert_eq!(out.lines()[0], "=".repeat(60));
        assert!(out.contains("PayPal"));
        assert_eq!(out.count_matching("="), 2);
        assert!(out.to_text().contains("TITLE\n"));
    }

    #[test]
    fn test_example_result_serializes_outcome() {
        let result = ExampleResult {
            id: "srp".to_string(),
            title: "Single Responsibility".to_string(),
            category: Category::Solid,
            variant: Variant::Violated,
            outcome: ExampleOutcome::Failed("boom".to_string()),
            transcript: Transcript::new(),
            duration: Duration::from_millis(12),
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["category"], "solid");
        assert_eq!(json["outcome"]["status"], "failed");
        assert_eq!(json["outcome"]["error"], "boom");
        assert_eq!(json["duration"], 12);
        assert_eq!(result.file_stem(), "srp_violated");
    }
}
