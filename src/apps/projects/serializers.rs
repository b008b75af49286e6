//! Request payloads and their validation.
//!
//! Identity and lineage never come from the client: author, project and
//! creation time are server-assigned, so the payload types simply do not
//! carry those fields. Update payloads are all-optional; an absent field
//! keeps its stored value.

use serde::Deserialize;

use softdesk_core::{Error, Result};

pub const PROJECT_TYPES: [&str; 4] = ["back-end", "front-end", "iOS", "Android"];
pub const ISSUE_TAGS: [&str; 3] = ["BUG", "TASK", "UPGRADE"];
pub const ISSUE_PRIORITIES: [&str; 3] = ["LOW", "MEDIUM", "HIGH"];
pub const ISSUE_STATUSES: [&str; 3] = ["TODO", "IN_PROGRESS", "DONE"];

fn not_blank(field: &str, value: &str) -> Result<()> {
	if value.trim().is_empty() {
		return Err(Error::InvalidInput(format!(
			"This field may not be blank: {field}."
		)));
	}
	Ok(())
}

fn choice(field: &str, value: &str, allowed: &[&str]) -> Result<()> {
	if !allowed.contains(&value) {
		return Err(Error::InvalidInput(format!(
			"\"{value}\" is not a valid choice for {field}."
		)));
	}
	Ok(())
}

#[derive(Debug, Deserialize)]
pub struct ProjectCreate {
	pub title: String,
	pub description: String,
	#[serde(rename = "type")]
	pub project_type: String,
}

impl ProjectCreate {
	pub fn validate(&self) -> Result<()> {
		not_blank("title", &self.title)?;
		not_blank("description", &self.description)?;
		choice("type", &self.project_type, &PROJECT_TYPES)
	}
}

#[derive(Debug, Deserialize)]
pub struct ProjectUpdate {
	pub title: Option<String>,
	pub description: Option<String>,
	#[serde(rename = "type")]
	pub project_type: Option<String>,
}

impl ProjectUpdate {
	pub fn validate(&self) -> Result<()> {
		if let Some(title) = &self.title {
			not_blank("title", title)?;
		}
		if let Some(description) = &self.description {
			not_blank("description", description)?;
		}
		if let Some(project_type) = &self.project_type {
			choice("type", project_type, &PROJECT_TYPES)?;
		}
		Ok(())
	}
}

/// The permission level is not client-assignable: added contributors are
/// always members, so the payload has no permission field and one supplied
/// anyway is ignored.
#[derive(Debug, Deserialize)]
pub struct ContributorCreate {
	pub user_id: i64,
	pub role: String,
}

impl ContributorCreate {
	pub fn validate(&self) -> Result<()> {
		not_blank("role", &self.role)
	}
}

#[derive(Debug, Deserialize)]
pub struct IssueCreate {
	pub title: String,
	pub desc: Option<String>,
	pub tag: String,
	pub priority: String,
	pub status: String,
	pub assignee_user_id: Option<i64>,
}

impl IssueCreate {
	pub fn validate(&self) -> Result<()> {
		not_blank("title", &self.title)?;
		choice("tag", &self.tag, &ISSUE_TAGS)?;
		choice("priority", &self.priority, &ISSUE_PRIORITIES)?;
		choice("status", &self.status, &ISSUE_STATUSES)
	}
}

#[derive(Debug, Deserialize)]
pub struct IssueUpdate {
	pub title: Option<String>,
	pub desc: Option<String>,
	pub tag: Option<String>,
	pub priority: Option<String>,
	pub status: Option<String>,
	pub assignee_user_id: Option<i64>,
}

impl IssueUpdate {
	pub fn validate(&self) -> Result<()> {
		if let Some(title) = &self.title {
			not_blank("title", title)?;
		}
		if let Some(tag) = &self.tag {
			choice("tag", tag, &ISSUE_TAGS)?;
		}
		if let Some(priority) = &self.priority {
			choice("priority", priority, &ISSUE_PRIORITIES)?;
		}
		if let Some(status) = &self.status {
			choice("status", status, &ISSUE_STATUSES)?;
		}
		Ok(())
	}
}

#[derive(Debug, Deserialize)]
pub struct CommentCreate {
	pub description: String,
}

impl CommentCreate {
	pub fn validate(&self) -> Result<()> {
		not_blank("description", &self.description)
	}
}

#[derive(Debug, Deserialize)]
pub struct CommentUpdate {
	pub description: Option<String>,
}

impl CommentUpdate {
	pub fn validate(&self) -> Result<()> {
		if let Some(description) = &self.description {
			not_blank("description", description)?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	#[rstest]
	#[case::back_end("back-end", true)]
	#[case::front_end("front-end", true)]
	#[case::ios("iOS", true)]
	#[case::android("Android", true)]
	#[case::wrong_case("ios", false)]
	#[case::unknown("desktop", false)]
	fn test_project_type_vocabulary(#[case] value: &str, #[case] ok: bool) {
		let payload = ProjectCreate {
			title: "api".to_string(),
			description: "backend api".to_string(),
			project_type: value.to_string(),
		};
		assert_eq!(payload.validate().is_ok(), ok);
	}

	#[rstest]
	fn test_project_create_rejects_blank_title() {
		let payload = ProjectCreate {
			title: " ".to_string(),
			description: "backend api".to_string(),
			project_type: "back-end".to_string(),
		};
		assert!(matches!(payload.validate(), Err(Error::InvalidInput(_))));
	}

	#[rstest]
	fn test_project_create_renames_type_field() {
		let payload: ProjectCreate =
			serde_json::from_str(r#"{"title": "api", "description": "d", "type": "iOS"}"#)
				.unwrap();
		assert_eq!(payload.project_type, "iOS");
		assert!(payload.validate().is_ok());
	}

	#[rstest]
	fn test_project_update_validates_only_present_fields() {
		let empty: ProjectUpdate = serde_json::from_str("{}").unwrap();
		assert!(empty.validate().is_ok());

		let bad_type: ProjectUpdate = serde_json::from_str(r#"{"type": "desktop"}"#).unwrap();
		assert!(matches!(bad_type.validate(), Err(Error::InvalidInput(_))));
	}

	#[rstest]
	#[case::tag(r#"{"title": "t", "tag": "FEATURE", "priority": "LOW", "status": "TODO"}"#)]
	#[case::priority(r#"{"title": "t", "tag": "BUG", "priority": "URGENT", "status": "TODO"}"#)]
	#[case::status(r#"{"title": "t", "tag": "BUG", "priority": "LOW", "status": "CLOSED"}"#)]
	fn test_issue_create_rejects_unknown_vocabulary(#[case] body: &str) {
		let payload: IssueCreate = serde_json::from_str(body).unwrap();
		assert!(matches!(payload.validate(), Err(Error::InvalidInput(_))));
	}

	#[rstest]
	fn test_issue_create_without_optional_fields() {
		let payload: IssueCreate = serde_json::from_str(
			r#"{"title": "crash", "tag": "BUG", "priority": "HIGH", "status": "TODO"}"#,
		)
		.unwrap();
		assert!(payload.validate().is_ok());
		assert!(payload.desc.is_none());
		assert!(payload.assignee_user_id.is_none());
	}

	#[rstest]
	fn test_contributor_create_ignores_client_permission() {
		let payload: ContributorCreate = serde_json::from_str(
			r#"{"user_id": 3, "role": "dev", "permission": "owner"}"#,
		)
		.unwrap();
		assert!(payload.validate().is_ok());
		assert_eq!(payload.user_id, 3);
	}

	#[rstest]
	fn test_comment_update_allows_empty_payload() {
		let payload: CommentUpdate = serde_json::from_str("{}").unwrap();
		assert!(payload.validate().is_ok());

		let blank: CommentUpdate = serde_json::from_str(r#"{"description": ""}"#).unwrap();
		assert!(matches!(blank.validate(), Err(Error::InvalidInput(_))));
	}
}
