use crate::constants::{KEYWORD_RESULT_CAP, SEMANTIC_RESULT_CAP};
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};

/// Document attribute selector for keyword searches
///
/// Industry and Products also match the derived token-list fields so that a
/// single product term hits records whose free-text field lists several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    Name,
    Ticker,
    Industry,
    Products,
}

impl SearchField {
    /// Underlying document attributes queried for this selector
    pub fn document_fields(&self) -> &'static [&'static str] {
        match self {
            SearchField::Name => &["회사명"],
            SearchField::Ticker => &["종목코드"],
            SearchField::Industry => &["업종", "업종_리스트"],
            SearchField::Products => &["주요제품", "주요제품_리스트"],
        }
    }
}

/// Normalized search request, dispatched by variant
///
/// Keyword mode matches the selected field(s) exactly as typed; semantic mode
/// ignores field selection and goes through the embedding model. Routing on
/// the variant (rather than on a UI label string) is what makes both paths
/// reachable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum SearchQuery {
    Keyword { field: SearchField, text: String },
    Semantic { text: String },
}

impl SearchQuery {
    /// Raw query text
    pub fn text(&self) -> &str {
        match self {
            SearchQuery::Keyword { text, .. } => text,
            SearchQuery::Semantic { text } => text,
        }
    }

    /// Maximum number of hits requested from the engine
    pub fn result_cap(&self) -> usize {
        match self {
            SearchQuery::Keyword { .. } => KEYWORD_RESULT_CAP,
            SearchQuery::Semantic { .. } => SEMANTIC_RESULT_CAP,
        }
    }

    /// Reject empty or whitespace-only query text before any request is made
    pub fn validate(&self) -> Result<()> {
        if self.text().trim().is_empty() {
            return Err(AppError::InvalidInput("query text is empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_mapping() {
        assert_eq!(SearchField::Name.document_fields(), &["회사명"]);
        assert_eq!(SearchField::Ticker.document_fields(), &["종목코드"]);
        assert_eq!(
            SearchField::Industry.document_fields(),
            &["업종", "업종_리스트"]
        );
        assert_eq!(
            SearchField::Products.document_fields(),
            &["주요제품", "주요제품_리스트"]
        );
    }

    #[test]
    fn test_tagged_dispatch_deserialization() {
        let q: SearchQuery = serde_json::from_str(
            r#"{"mode": "keyword", "field": "name", "text": "삼성전자"}"#,
        )
        .unwrap();
        assert!(matches!(
            q,
            SearchQuery::Keyword {
                field: SearchField::Name,
                ..
            }
        ));
        assert_eq!(q.result_cap(), 100);

        let q: SearchQuery =
            serde_json::from_str(r#"{"mode": "semantic", "text": "전기차 배터리 관련주"}"#)
                .unwrap();
        assert!(matches!(q, SearchQuery::Semantic { .. }));
        assert_eq!(q.result_cap(), 50);
    }

    #[test]
    fn test_empty_text_rejected() {
        let q = SearchQuery::Semantic {
            text: "   ".to_string(),
        };
        assert!(q.validate().is_err());

        let q = SearchQuery::Keyword {
            field: SearchField::Ticker,
            text: "005930".to_string(),
        };
        assert!(q.validate().is_ok());
    }
}
