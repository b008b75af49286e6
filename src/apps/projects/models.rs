use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use softdesk_core::Result;
use softdesk_db::Database;

/// Contributor permission level, stored as lowercase text.
///
/// The project author's row is `Owner` and is never removable; every row
/// added afterwards is `Member`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Permission {
	Owner,
	Member,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Project {
	pub id: i64,
	pub title: String,
	pub description: String,
	#[serde(rename = "type")]
	#[sqlx(rename = "type")]
	pub project_type: String,
	pub author_user_id: i64,
}

impl Project {
	pub async fn by_id(db: &Database, id: i64) -> Result<Option<Project>> {
		let project = sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = ?")
			.bind(id)
			.fetch_optional(db.pool())
			.await?;
		Ok(project)
	}

	pub async fn list_all(db: &Database) -> Result<Vec<Project>> {
		let projects = sqlx::query_as::<_, Project>("SELECT * FROM projects ORDER BY id")
			.fetch_all(db.pool())
			.await?;
		Ok(projects)
	}

	/// Projects where the user holds a contributor row.
	pub async fn list_for_user(db: &Database, user_id: i64) -> Result<Vec<Project>> {
		let projects = sqlx::query_as::<_, Project>(
			"SELECT p.* FROM projects p
			 JOIN contributors c ON c.project_id = p.id
			 WHERE c.user_id = ?
			 ORDER BY p.id",
		)
		.bind(user_id)
		.fetch_all(db.pool())
		.await?;
		Ok(projects)
	}

	/// Inserts the project and its author's owner contributor row in one
	/// transaction. Either both rows exist afterwards or neither does.
	pub async fn create_with_owner(
		db: &Database,
		title: &str,
		description: &str,
		project_type: &str,
		author_user_id: i64,
	) -> Result<Project> {
		let mut tx = db.begin().await?;
		let id = sqlx::query_scalar::<_, i64>(
			"INSERT INTO projects (title, description, type, author_user_id)
			 VALUES (?, ?, ?, ?)
			 RETURNING id",
		)
		.bind(title)
		.bind(description)
		.bind(project_type)
		.bind(author_user_id)
		.fetch_one(&mut *tx)
		.await?;
		sqlx::query(
			"INSERT INTO contributors (user_id, project_id, permission, role)
			 VALUES (?, ?, ?, ?)",
		)
		.bind(author_user_id)
		.bind(id)
		.bind(Permission::Owner)
		.bind("author")
		.execute(&mut *tx)
		.await?;
		tx.commit().await?;
		Ok(Project {
			id,
			title: title.to_string(),
			description: description.to_string(),
			project_type: project_type.to_string(),
			author_user_id,
		})
	}

	/// Partial update: `None` fields keep their stored value.
	pub async fn update(
		db: &Database,
		id: i64,
		title: Option<&str>,
		description: Option<&str>,
		project_type: Option<&str>,
	) -> Result<Option<Project>> {
		let project = sqlx::query_as::<_, Project>(
			"UPDATE projects SET
				title = COALESCE(?, title),
				description = COALESCE(?, description),
				type = COALESCE(?, type)
			 WHERE id = ?
			 RETURNING *",
		)
		.bind(title)
		.bind(description)
		.bind(project_type)
		.bind(id)
		.fetch_optional(db.pool())
		.await?;
		Ok(project)
	}

	/// Contributors and issues (and their comments) cascade.
	pub async fn delete(db: &Database, id: i64) -> Result<()> {
		sqlx::query("DELETE FROM projects WHERE id = ?")
			.bind(id)
			.execute(db.pool())
			.await?;
		Ok(())
	}
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Contributor {
	pub id: i64,
	pub user_id: i64,
	pub project_id: i64,
	pub permission: Permission,
	pub role: String,
}

impl Contributor {
	/// The membership lookup: one row per (user, project) pair.
	pub async fn for_user_project(
		db: &Database,
		user_id: i64,
		project_id: i64,
	) -> Result<Option<Contributor>> {
		let contributor = sqlx::query_as::<_, Contributor>(
			"SELECT * FROM contributors WHERE user_id = ? AND project_id = ?",
		)
		.bind(user_id)
		.bind(project_id)
		.fetch_optional(db.pool())
		.await?;
		Ok(contributor)
	}

	pub async fn list_for_project(db: &Database, project_id: i64) -> Result<Vec<Contributor>> {
		let contributors = sqlx::query_as::<_, Contributor>(
			"SELECT * FROM contributors WHERE project_id = ? ORDER BY id",
		)
		.bind(project_id)
		.fetch_all(db.pool())
		.await?;
		Ok(contributors)
	}

	pub async fn insert(
		db: &Database,
		user_id: i64,
		project_id: i64,
		permission: Permission,
		role: &str,
	) -> Result<Contributor> {
		let id = sqlx::query_scalar::<_, i64>(
			"INSERT INTO contributors (user_id, project_id, permission, role)
			 VALUES (?, ?, ?, ?)
			 RETURNING id",
		)
		.bind(user_id)
		.bind(project_id)
		.bind(permission)
		.bind(role)
		.fetch_one(db.pool())
		.await?;
		Ok(Contributor {
			id,
			user_id,
			project_id,
			permission,
			role: role.to_string(),
		})
	}

	pub async fn delete(db: &Database, id: i64) -> Result<()> {
		sqlx::query("DELETE FROM contributors WHERE id = ?")
			.bind(id)
			.execute(db.pool())
			.await?;
		Ok(())
	}
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Issue {
	pub id: i64,
	pub title: String,
	pub desc: Option<String>,
	pub tag: String,
	pub priority: String,
	pub status: String,
	pub project_id: i64,
	pub author_user_id: i64,
	pub assignee_user_id: i64,
	pub created_time: DateTime<Utc>,
}

impl Issue {
	/// Lookup filtered on both id and project: an issue that exists under a
	/// different project is not found for this path.
	pub async fn by_id_in_project(
		db: &Database,
		id: i64,
		project_id: i64,
	) -> Result<Option<Issue>> {
		let issue =
			sqlx::query_as::<_, Issue>("SELECT * FROM issues WHERE id = ? AND project_id = ?")
				.bind(id)
				.bind(project_id)
				.fetch_optional(db.pool())
				.await?;
		Ok(issue)
	}

	pub async fn list_for_project(db: &Database, project_id: i64) -> Result<Vec<Issue>> {
		let issues =
			sqlx::query_as::<_, Issue>("SELECT * FROM issues WHERE project_id = ? ORDER BY id")
				.bind(project_id)
				.fetch_all(db.pool())
				.await?;
		Ok(issues)
	}

	#[allow(clippy::too_many_arguments)]
	pub async fn insert(
		db: &Database,
		project_id: i64,
		author_user_id: i64,
		assignee_user_id: i64,
		title: &str,
		desc: Option<&str>,
		tag: &str,
		priority: &str,
		status: &str,
	) -> Result<Issue> {
		let created_time = Utc::now();
		let id = sqlx::query_scalar::<_, i64>(
			r#"INSERT INTO issues
				(title, "desc", tag, priority, status, project_id, author_user_id, assignee_user_id, created_time)
			 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
			 RETURNING id"#,
		)
		.bind(title)
		.bind(desc)
		.bind(tag)
		.bind(priority)
		.bind(status)
		.bind(project_id)
		.bind(author_user_id)
		.bind(assignee_user_id)
		.bind(created_time)
		.fetch_one(db.pool())
		.await?;
		Ok(Issue {
			id,
			title: title.to_string(),
			desc: desc.map(str::to_string),
			tag: tag.to_string(),
			priority: priority.to_string(),
			status: status.to_string(),
			project_id,
			author_user_id,
			assignee_user_id,
			created_time,
		})
	}

	/// Partial update: `None` fields keep their stored value. Author,
	/// project and creation time are not updatable.
	#[allow(clippy::too_many_arguments)]
	pub async fn update(
		db: &Database,
		id: i64,
		title: Option<&str>,
		desc: Option<&str>,
		tag: Option<&str>,
		priority: Option<&str>,
		status: Option<&str>,
		assignee_user_id: Option<i64>,
	) -> Result<Option<Issue>> {
		let issue = sqlx::query_as::<_, Issue>(
			r#"UPDATE issues SET
				title = COALESCE(?, title),
				"desc" = COALESCE(?, "desc"),
				tag = COALESCE(?, tag),
				priority = COALESCE(?, priority),
				status = COALESCE(?, status),
				assignee_user_id = COALESCE(?, assignee_user_id)
			 WHERE id = ?
			 RETURNING *"#,
		)
		.bind(title)
		.bind(desc)
		.bind(tag)
		.bind(priority)
		.bind(status)
		.bind(assignee_user_id)
		.bind(id)
		.fetch_optional(db.pool())
		.await?;
		Ok(issue)
	}

	/// Comments cascade.
	pub async fn delete(db: &Database, id: i64) -> Result<()> {
		sqlx::query("DELETE FROM issues WHERE id = ?")
			.bind(id)
			.execute(db.pool())
			.await?;
		Ok(())
	}
}

/// `project_id` is resolved through the owning issue at load time so the
/// permission checks can treat comments like any other project resource;
/// it is not part of the wire shape.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Comment {
	pub id: i64,
	pub description: String,
	pub author_user_id: i64,
	pub issue_id: i64,
	#[serde(skip_serializing)]
	pub project_id: i64,
	pub created_time: DateTime<Utc>,
}

impl Comment {
	pub async fn by_id_in_issue(db: &Database, id: i64, issue_id: i64) -> Result<Option<Comment>> {
		let comment = sqlx::query_as::<_, Comment>(
			"SELECT c.id, c.description, c.author_user_id, c.issue_id, i.project_id, c.created_time
			 FROM comments c
			 JOIN issues i ON i.id = c.issue_id
			 WHERE c.id = ? AND c.issue_id = ?",
		)
		.bind(id)
		.bind(issue_id)
		.fetch_optional(db.pool())
		.await?;
		Ok(comment)
	}

	pub async fn list_for_issue(db: &Database, issue_id: i64) -> Result<Vec<Comment>> {
		let comments = sqlx::query_as::<_, Comment>(
			"SELECT c.id, c.description, c.author_user_id, c.issue_id, i.project_id, c.created_time
			 FROM comments c
			 JOIN issues i ON i.id = c.issue_id
			 WHERE c.issue_id = ?
			 ORDER BY c.id",
		)
		.bind(issue_id)
		.fetch_all(db.pool())
		.await?;
		Ok(comments)
	}

	pub async fn insert(
		db: &Database,
		issue_id: i64,
		project_id: i64,
		author_user_id: i64,
		description: &str,
	) -> Result<Comment> {
		let created_time = Utc::now();
		let id = sqlx::query_scalar::<_, i64>(
			"INSERT INTO comments (description, author_user_id, issue_id, created_time)
			 VALUES (?, ?, ?, ?)
			 RETURNING id",
		)
		.bind(description)
		.bind(author_user_id)
		.bind(issue_id)
		.bind(created_time)
		.fetch_one(db.pool())
		.await?;
		Ok(Comment {
			id,
			description: description.to_string(),
			author_user_id,
			issue_id,
			project_id,
			created_time,
		})
	}

	/// Partial update: `None` keeps the stored description.
	pub async fn update(
		db: &Database,
		id: i64,
		issue_id: i64,
		description: Option<&str>,
	) -> Result<Option<Comment>> {
		let result = sqlx::query(
			"UPDATE comments SET description = COALESCE(?, description)
			 WHERE id = ? AND issue_id = ?",
		)
		.bind(description)
		.bind(id)
		.bind(issue_id)
		.execute(db.pool())
		.await?;
		if result.rows_affected() == 0 {
			return Ok(None);
		}
		Self::by_id_in_issue(db, id, issue_id).await
	}

	pub async fn delete(db: &Database, id: i64) -> Result<()> {
		sqlx::query("DELETE FROM comments WHERE id = ?")
			.bind(id)
			.execute(db.pool())
			.await?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use crate::test_utils::{create_user, test_db};

	use super::*;

	#[tokio::test]
	async fn test_create_with_owner_is_atomic() {
		let db = test_db().await;
		let author = create_user(&db, "alice").await;

		let project = Project::create_with_owner(&db, "api", "backend api", "back-end", author.id)
			.await
			.unwrap();

		let owner = Contributor::for_user_project(&db, author.id, project.id)
			.await
			.unwrap()
			.unwrap();
		assert_eq!(owner.permission, Permission::Owner);
		assert_eq!(owner.role, "author");

		let contributors = Contributor::list_for_project(&db, project.id).await.unwrap();
		assert_eq!(contributors.len(), 1);
	}

	#[tokio::test]
	async fn test_create_with_owner_rolls_back_on_failure() {
		let db = test_db().await;
		// No such user: the owner row insert violates its foreign key, so
		// the project insert must not survive either.
		let result = Project::create_with_owner(&db, "api", "backend api", "back-end", 999).await;
		assert!(result.is_err());

		let projects = Project::list_all(&db).await.unwrap();
		assert!(projects.is_empty());
	}

	#[tokio::test]
	async fn test_list_for_user_filters_by_membership() {
		let db = test_db().await;
		let alice = create_user(&db, "alice").await;
		let bob = create_user(&db, "bob").await;

		let p1 = Project::create_with_owner(&db, "one", "d", "back-end", alice.id)
			.await
			.unwrap();
		Project::create_with_owner(&db, "two", "d", "front-end", bob.id)
			.await
			.unwrap();

		let alice_projects = Project::list_for_user(&db, alice.id).await.unwrap();
		assert_eq!(alice_projects.len(), 1);
		assert_eq!(alice_projects[0].id, p1.id);

		assert_eq!(Project::list_all(&db).await.unwrap().len(), 2);
	}

	#[tokio::test]
	async fn test_duplicate_contributor_rejected_by_store() {
		let db = test_db().await;
		let alice = create_user(&db, "alice").await;
		let bob = create_user(&db, "bob").await;
		let project = Project::create_with_owner(&db, "api", "d", "back-end", alice.id)
			.await
			.unwrap();

		Contributor::insert(&db, bob.id, project.id, Permission::Member, "dev")
			.await
			.unwrap();
		let duplicate =
			Contributor::insert(&db, bob.id, project.id, Permission::Member, "dev").await;
		assert!(duplicate.is_err());
	}

	#[tokio::test]
	async fn test_partial_update_keeps_absent_fields() {
		let db = test_db().await;
		let alice = create_user(&db, "alice").await;
		let project = Project::create_with_owner(&db, "api", "original", "back-end", alice.id)
			.await
			.unwrap();

		let updated = Project::update(&db, project.id, Some("renamed"), None, None)
			.await
			.unwrap()
			.unwrap();
		assert_eq!(updated.title, "renamed");
		assert_eq!(updated.description, "original");
		assert_eq!(updated.project_type, "back-end");

		assert!(Project::update(&db, 999, Some("x"), None, None)
			.await
			.unwrap()
			.is_none());
	}

	#[tokio::test]
	async fn test_issue_scoped_to_project() {
		let db = test_db().await;
		let alice = create_user(&db, "alice").await;
		let p1 = Project::create_with_owner(&db, "one", "d", "back-end", alice.id)
			.await
			.unwrap();
		let p2 = Project::create_with_owner(&db, "two", "d", "front-end", alice.id)
			.await
			.unwrap();

		let issue = Issue::insert(
			&db, p1.id, alice.id, alice.id, "crash", None, "BUG", "HIGH", "TODO",
		)
		.await
		.unwrap();

		assert!(Issue::by_id_in_project(&db, issue.id, p1.id)
			.await
			.unwrap()
			.is_some());
		// Same id through the wrong project resolves to nothing.
		assert!(Issue::by_id_in_project(&db, issue.id, p2.id)
			.await
			.unwrap()
			.is_none());
	}

	#[tokio::test]
	async fn test_comment_carries_owning_project() {
		let db = test_db().await;
		let alice = create_user(&db, "alice").await;
		let project = Project::create_with_owner(&db, "api", "d", "back-end", alice.id)
			.await
			.unwrap();
		let issue = Issue::insert(
			&db, project.id, alice.id, alice.id, "crash", None, "BUG", "HIGH", "TODO",
		)
		.await
		.unwrap();

		let comment = Comment::insert(&db, issue.id, project.id, alice.id, "confirmed")
			.await
			.unwrap();

		let loaded = Comment::by_id_in_issue(&db, comment.id, issue.id)
			.await
			.unwrap()
			.unwrap();
		assert_eq!(loaded.project_id, project.id);

		// The owning project stays out of the serialized shape.
		let value = serde_json::to_value(&loaded).unwrap();
		assert!(value.get("project_id").is_none());
		assert_eq!(value["description"], "confirmed");
	}

	#[tokio::test]
	async fn test_project_delete_cascades() {
		let db = test_db().await;
		let alice = create_user(&db, "alice").await;
		let project = Project::create_with_owner(&db, "api", "d", "back-end", alice.id)
			.await
			.unwrap();
		let issue = Issue::insert(
			&db, project.id, alice.id, alice.id, "crash", None, "BUG", "HIGH", "TODO",
		)
		.await
		.unwrap();
		Comment::insert(&db, issue.id, project.id, alice.id, "confirmed")
			.await
			.unwrap();

		Project::delete(&db, project.id).await.unwrap();

		assert!(Issue::list_for_project(&db, project.id)
			.await
			.unwrap()
			.is_empty());
		assert!(Comment::list_for_issue(&db, issue.id)
			.await
			.unwrap()
			.is_empty());
		assert!(Contributor::list_for_project(&db, project.id)
			.await
			.unwrap()
			.is_empty());
	}

	#[tokio::test]
	async fn test_permission_serializes_lowercase() {
		assert_eq!(
			serde_json::to_string(&Permission::Owner).unwrap(),
			"\"owner\""
		);
		assert_eq!(
			serde_json::to_string(&Permission::Member).unwrap(),
			"\"member\""
		);
	}
}
