//! Skills API endpoints

use crate::client::ApiService;
use crate::endpoints::{resource_path, Ack, Created};
use crate::error::ApiResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Skills grouped by category name
pub type GroupedSkills = BTreeMap<String, Vec<Skill>>;

/// Skills API interface
#[derive(Clone)]
pub struct SkillsApi {
    client: ApiService,
}

impl SkillsApi {
    /// Create a new skills API interface
    pub(crate) fn new(client: ApiService) -> Self {
        Self { client }
    }

    /// List skills in the shape selected by `grouped`.
    ///
    /// GET /skills?grouped={true|false}
    ///
    /// The returned variant always matches the flag; a reply in the other
    /// shape fails to decode and is reported as an error.
    pub async fn list(&self, grouped: bool) -> ApiResult<SkillListing> {
        if grouped {
            self.list_grouped().await.map(SkillListing::Grouped)
        } else {
            self.list_flat().await.map(SkillListing::Flat)
        }
    }

    /// List skills keyed by category
    pub async fn list_grouped(&self) -> ApiResult<GroupedSkills> {
        let response: SkillsEnvelope<GroupedSkills> = self
            .client
            .get_with_query("skills", &[("grouped", "true".to_string())])
            .await?;
        Ok(response.skills)
    }

    /// List skills as a flat sequence
    pub async fn list_flat(&self) -> ApiResult<Vec<Skill>> {
        let response: SkillsEnvelope<Vec<Skill>> = self
            .client
            .get_with_query("skills", &[("grouped", "false".to_string())])
            .await?;
        Ok(response.skills)
    }

    /// Get a single skill by ID
    ///
    /// GET /skills/{id}
    pub async fn get(&self, id: &str) -> ApiResult<Skill> {
        self.client.get(&resource_path("skills", id, None)).await
    }

    /// Create a skill
    ///
    /// POST /skills
    pub async fn create(&self, skill: &SkillDraft) -> ApiResult<Created> {
        self.client.post("skills", skill).await
    }

    /// Update fields of a skill
    ///
    /// PUT /skills/{id}
    pub async fn update(&self, id: &str, changes: &SkillUpdate) -> ApiResult<Ack> {
        self.client.put(&resource_path("skills", id, None), changes).await
    }

    /// Delete a skill
    ///
    /// DELETE /skills/{id}
    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        self.client.delete(&resource_path("skills", id, None)).await
    }

    /// Insert several skills in one request.
    ///
    /// POST /skills/batch
    ///
    /// The server inserts all of them or none; nothing is retried here.
    pub async fn create_batch(&self, skills: &[SkillDraft]) -> ApiResult<BatchCreated> {
        self.client
            .post("skills/batch", &BatchRequest { skills })
            .await
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Skill level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Proficiency {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
    /// A level this client does not know about
    #[serde(other)]
    Unknown,
}

impl Proficiency {
    /// All levels accepted by the server, lowest first
    pub const LEVELS: [Self; 4] = [
        Self::Beginner,
        Self::Intermediate,
        Self::Advanced,
        Self::Expert,
    ];

    /// Parse a level name, ignoring case
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::LEVELS
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(value.trim()))
    }

    /// Name as sent on the wire
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
            Self::Expert => "Expert",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Proficiency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Skill entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub category: String,
    pub proficiency: Proficiency,
}

/// New skill; carries no id or creation timestamp
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillDraft {
    pub name: String,
    pub category: String,
    pub proficiency: Proficiency,
}

impl SkillDraft {
    /// Create a draft
    pub fn new(name: impl Into<String>, category: impl Into<String>, proficiency: Proficiency) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            proficiency,
        }
    }
}

/// Partial skill update; only set fields are sent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proficiency: Option<Proficiency>,
}

/// Skills in the shape requested from [`SkillsApi::list`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkillListing {
    /// Keyed by category name
    Grouped(GroupedSkills),
    /// Flat sequence
    Flat(Vec<Skill>),
}

impl SkillListing {
    /// Whether this is the grouped shape
    #[must_use]
    pub fn is_grouped(&self) -> bool {
        matches!(self, Self::Grouped(_))
    }

    /// Total number of skills
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Grouped(groups) => groups.values().map(Vec::len).sum(),
            Self::Flat(skills) => skills.len(),
        }
    }

    /// Whether there are no skills
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Response to a batch insert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchCreated {
    #[serde(default)]
    pub message: String,
    /// Number of skills inserted
    pub count: usize,
}

#[derive(Deserialize)]
struct SkillsEnvelope<T> {
    skills: T,
}

#[derive(Serialize)]
struct BatchRequest<'a> {
    skills: &'a [SkillDraft],
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::test_client;
    use crate::error::ErrorKind;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn grouped_body() -> serde_json::Value {
        json!({
            "skills": {
                "Backend": [
                    {"id": "s1", "name": "Python", "category": "Backend", "proficiency": "Expert"}
                ],
                "Frontend": [
                    {"id": "s2", "name": "React", "category": "Frontend", "proficiency": "Advanced"},
                    {"id": "s3", "name": "CSS", "category": "Frontend", "proficiency": "Intermediate"}
                ]
            }
        })
    }

    fn flat_body() -> serde_json::Value {
        json!({
            "skills": [
                {"id": "s1", "name": "Python", "category": "Backend", "proficiency": "Expert"},
                {"id": "s2", "name": "React", "category": "Frontend", "proficiency": "Advanced"}
            ]
        })
    }

    async fn skills_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/skills"))
            .and(query_param("grouped", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(grouped_body()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/skills"))
            .and(query_param("grouped", "false"))
            .respond_with(ResponseTemplate::new(200).set_body_json(flat_body()))
            .mount(&server)
            .await;
        server
    }

    #[test]
    fn test_proficiency_parse() {
        assert_eq!(Proficiency::parse("expert"), Some(Proficiency::Expert));
        assert_eq!(Proficiency::parse(" Beginner "), Some(Proficiency::Beginner));
        assert_eq!(Proficiency::parse("guru"), None);
    }

    #[test]
    fn test_unknown_proficiency_deserializes() {
        let skill: Skill = serde_json::from_value(json!({
            "id": "s9", "name": "Go", "category": "Backend", "proficiency": "Novice"
        }))
        .unwrap();
        assert_eq!(skill.proficiency, Proficiency::Unknown);
    }

    #[tokio::test]
    async fn test_grouped_flag_selects_map() {
        let server = skills_server().await;
        let client = test_client(&server);

        let listing = client.skills().list(true).await.unwrap();
        let SkillListing::Grouped(groups) = listing else {
            panic!("expected grouped skills");
        };
        assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["Backend", "Frontend"]);
        assert_eq!(groups["Frontend"].len(), 2);
    }

    #[tokio::test]
    async fn test_flat_flag_selects_sequence() {
        let server = skills_server().await;
        let client = test_client(&server);

        let listing = client.skills().list(false).await.unwrap();
        assert!(!listing.is_grouped());
        assert_eq!(listing.len(), 2);
    }

    #[tokio::test]
    async fn test_wrong_shape_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/skills"))
            .respond_with(ResponseTemplate::new(200).set_body_json(flat_body()))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client.skills().list(true).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Request);
    }

    #[tokio::test]
    async fn test_batch_create() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/skills/batch"))
            .and(body_json(json!({
                "skills": [
                    {"name": "React", "category": "Frontend", "proficiency": "Advanced"},
                    {"name": "Python", "category": "Backend", "proficiency": "Expert"}
                ]
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "message": "Successfully created 2 skills",
                "count": 2
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let created = client
            .skills()
            .create_batch(&[
                SkillDraft::new("React", "Frontend", Proficiency::Advanced),
                SkillDraft::new("Python", "Backend", Proficiency::Expert),
            ])
            .await
            .unwrap();
        assert_eq!(created.count, 2);
    }

    #[tokio::test]
    async fn test_skill_crud() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/skills"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "message": "Skill created successfully",
                "id": "s4"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/skills/s4"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "s4", "name": "Rust", "category": "Backend", "proficiency": "Beginner"
            })))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/skills/s4"))
            .and(body_json(json!({"proficiency": "Intermediate"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"message": "Skill updated successfully"})),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/skills/s4"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Skill not found"})))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let created = client
            .skills()
            .create(&SkillDraft::new("Rust", "Backend", Proficiency::Beginner))
            .await
            .unwrap();
        let skill = client.skills().get(&created.id).await.unwrap();
        assert_eq!(skill.proficiency, Proficiency::Beginner);

        let update = SkillUpdate {
            proficiency: Some(Proficiency::Intermediate),
            ..SkillUpdate::default()
        };
        client.skills().update(&skill.id, &update).await.unwrap();

        let err = client.skills().delete(&skill.id).await.unwrap_err();
        assert_eq!(err.status, 404);
    }
}
