//! PayClose HTTP client.
//!
//! Async reqwest client for the closing endpoints: concept catalog,
//! suggestion feed, classification batches. Wire DTOs stay in this module;
//! everything crossing the crate boundary is an engine type.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use payclose_engine::{Catalog, Category, CommitRecord, Concept, ConceptKey, SuggestionRecord};

use crate::auth::{load_auth, AuthCredentials};

/// PayClose API client.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    api_base: String,
    token: String,
}

/// Error type for API operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// No auth credentials configured
    NotAuthenticated,
    /// Network error
    Network(String),
    /// HTTP error with status code
    Http(u16, String),
    /// Server returned a validation error (4xx with message)
    Validation(String),
    /// JSON parsing error
    Parse(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::NotAuthenticated => write!(f, "Not authenticated to PayClose"),
            ApiError::Network(msg) => write!(f, "Network error: {}", msg),
            ApiError::Http(code, msg) => write!(f, "HTTP {}: {}", code, msg),
            ApiError::Validation(msg) => write!(f, "{}", msg),
            ApiError::Parse(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// Account info from /api/v1/me.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub email: String,
    pub name: Option<String>,
}

// ── Wire shapes ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConceptDto {
    pub header: String,
    pub occurrence: u32,
    pub display_name: String,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub is_duplicate: bool,
}

impl From<ConceptDto> for Concept {
    fn from(dto: ConceptDto) -> Self {
        Concept {
            key: ConceptKey::new(dto.header, dto.occurrence),
            display_name: dto.display_name,
            server_category: dto.category,
            suggestion: None,
            is_duplicate: dto.is_duplicate,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConceptsResponse {
    concepts: Vec<ConceptDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionDto {
    pub header: String,
    pub occurrence: u32,
    pub category: Category,
    pub frequency: u32,
}

impl From<SuggestionDto> for SuggestionRecord {
    fn from(dto: SuggestionDto) -> Self {
        SuggestionRecord {
            key: ConceptKey::new(dto.header, dto.occurrence),
            category: dto.category,
            frequency: dto.frequency,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SuggestionsResponse {
    suggestions: Vec<SuggestionDto>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassificationDto {
    pub header: String,
    pub occurrence: u32,
    pub category: Category,
}

impl From<&CommitRecord> for ClassificationDto {
    fn from(record: &CommitRecord) -> Self {
        ClassificationDto {
            header: record.key.header.clone(),
            occurrence: record.key.occurrence,
            category: record.category,
        }
    }
}

#[derive(Debug, Serialize)]
struct PersistRequest {
    classifications: Vec<ClassificationDto>,
}

// ── Client ──────────────────────────────────────────────────────────

impl ApiClient {
    /// Create a new client using saved auth credentials.
    pub fn from_saved_auth() -> Result<Self, ApiError> {
        let creds = load_auth().ok_or(ApiError::NotAuthenticated)?;
        Ok(Self::new(creds))
    }

    /// Create a new client with explicit credentials.
    pub fn new(creds: AuthCredentials) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(format!("payclose/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            api_base: creds.api_base,
            token: creds.token,
        }
    }

    /// Verify the current token and get account info.
    /// GET /api/v1/me
    pub async fn verify_token(&self) -> Result<UserInfo, ApiError> {
        let url = format!("{}/api/v1/me", self.api_base);
        let response = self.get(&url).await?;
        response
            .json::<UserInfo>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// Fetch the concept catalog of a closing.
    /// GET /api/v1/closings/:id/concepts
    pub async fn fetch_concepts(&self, closing_id: &str) -> Result<Vec<Concept>, ApiError> {
        let url = format!("{}/api/v1/closings/{}/concepts", self.api_base, closing_id);
        let response = self.get(&url).await?;
        let parsed = response
            .json::<ConceptsResponse>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;
        Ok(parsed.concepts.into_iter().map(Concept::from).collect())
    }

    /// Fetch classification suggestions for a closing.
    /// GET /api/v1/closings/:id/suggestions
    pub async fn fetch_suggestions(
        &self,
        closing_id: &str,
    ) -> Result<Vec<SuggestionRecord>, ApiError> {
        let url = format!(
            "{}/api/v1/closings/{}/suggestions",
            self.api_base, closing_id
        );
        let response = self.get(&url).await?;
        let parsed = response
            .json::<SuggestionsResponse>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;
        Ok(parsed.suggestions.into_iter().map(SuggestionRecord::from).collect())
    }

    /// Fetch concepts and suggestions and assemble a ready-to-load catalog.
    pub async fn load_catalog(&self, closing_id: &str) -> Result<Catalog, ApiError> {
        let concepts = self.fetch_concepts(closing_id).await?;
        let suggestions = self.fetch_suggestions(closing_id).await?;
        build_catalog(concepts, suggestions)
    }

    /// Persist one classification batch.
    /// POST /api/v1/closings/:id/classifications
    pub async fn persist_batch(
        &self,
        closing_id: &str,
        records: &[CommitRecord],
    ) -> Result<(), ApiError> {
        let url = format!(
            "{}/api/v1/closings/{}/classifications",
            self.api_base, closing_id
        );
        let request = PersistRequest {
            classifications: records.iter().map(ClassificationDto::from).collect(),
        };
        self.post_json(&url, &request).await?;
        Ok(())
    }

    // ── Internal helpers ────────────────────────────────────────────

    async fn get(&self, url: &str) -> Result<reqwest::Response, ApiError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Self::check_status(response).await
    }

    async fn post_json<T: Serialize>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<reqwest::Response, ApiError> {
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Self::check_status(response).await
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            if status == 422 || status == 400 {
                return Err(ApiError::Validation(body));
            }
            return Err(ApiError::Http(status, body));
        }
        Ok(response)
    }
}

fn build_catalog(
    concepts: Vec<Concept>,
    suggestions: Vec<SuggestionRecord>,
) -> Result<Catalog, ApiError> {
    let mut catalog = Catalog::new(concepts).map_err(|e| ApiError::Parse(e.to_string()))?;
    catalog.merge_suggestions(suggestions);
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concepts_response_parse() {
        let json = r#"{
            "concepts": [
                {
                    "header": "Base Salary",
                    "occurrence": 1,
                    "display_name": "Base Salary",
                    "category": "taxable_earning",
                    "is_duplicate": false
                },
                {
                    "header": "Bonus",
                    "occurrence": 2,
                    "display_name": "Bonus",
                    "is_duplicate": true
                }
            ]
        }"#;

        let parsed: ConceptsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.concepts.len(), 2);

        let salary = Concept::from(parsed.concepts[0].clone());
        assert_eq!(salary.key, ConceptKey::new("Base Salary", 1));
        assert_eq!(salary.server_category, Some(Category::TaxableEarning));
        assert!(salary.suggestion.is_none());

        // Absent category field means unclassified.
        let bonus = Concept::from(parsed.concepts[1].clone());
        assert_eq!(bonus.key, ConceptKey::new("Bonus", 2));
        assert_eq!(bonus.server_category, None);
        assert!(bonus.is_duplicate);
    }

    #[test]
    fn test_suggestions_response_parse() {
        let json = r#"{
            "suggestions": [
                {"header": "Union Fee", "occurrence": 1, "category": "other_deduction", "frequency": 17}
            ]
        }"#;

        let parsed: SuggestionsResponse = serde_json::from_str(json).unwrap();
        let record = SuggestionRecord::from(parsed.suggestions[0].clone());
        assert_eq!(record.key, ConceptKey::new("Union Fee", 1));
        assert_eq!(record.category, Category::OtherDeduction);
        assert_eq!(record.frequency, 17);
    }

    #[test]
    fn test_persist_request_shape() {
        let records = vec![
            CommitRecord {
                key: ConceptKey::new("Bonus", 2),
                category: Category::TaxableEarning,
            },
            CommitRecord {
                key: ConceptKey::new("Union Fee", 1),
                category: Category::OtherDeduction,
            },
        ];
        let request = PersistRequest {
            classifications: records.iter().map(ClassificationDto::from).collect(),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["classifications"][0]["header"], "Bonus");
        assert_eq!(json["classifications"][0]["occurrence"], 2);
        assert_eq!(json["classifications"][0]["category"], "taxable_earning");
        assert_eq!(json["classifications"][1]["category"], "other_deduction");
    }

    #[test]
    fn test_build_catalog_merges_suggestions() {
        let concepts = vec![
            Concept::new(ConceptKey::new("Bonus", 1), "Bonus"),
            Concept::new(ConceptKey::new("Union Fee", 1), "Union Fee"),
        ];
        let suggestions = vec![SuggestionRecord {
            key: ConceptKey::new("Bonus", 1),
            category: Category::TaxableEarning,
            frequency: 9,
        }];

        let catalog = build_catalog(concepts, suggestions).unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog
            .get(&ConceptKey::new("Bonus", 1))
            .unwrap()
            .suggestion
            .is_some());
    }

    #[test]
    fn test_build_catalog_rejects_duplicate_keys() {
        let concepts = vec![
            Concept::new(ConceptKey::new("Bonus", 1), "Bonus"),
            Concept::new(ConceptKey::new("Bonus", 1), "Bonus"),
        ];

        let err = build_catalog(concepts, vec![]).unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
    }
}
