//! Application services for the projects app.
//!
//! Every operation runs the same sequence: gate the attempt, resolve
//! ancestors from the project downwards, resolve the target inside its
//! parent, authorize against the resolved object, validate input, persist.
//! A resource reached through the wrong parent is treated as absent.

use softdesk_core::{Actor, Error, Result};
use softdesk_db::Database;

use crate::apps::accounts::models::User;

use super::models::{Comment, Contributor, Issue, Permission, Project};
use super::permissions::{Verb, can_act, can_attempt};
use super::serializers::{
	CommentCreate, CommentUpdate, ContributorCreate, IssueCreate, IssueUpdate, ProjectCreate,
	ProjectUpdate,
};

async fn get_project(db: &Database, project_id: i64) -> Result<Project> {
	Project::by_id(db, project_id)
		.await?
		.ok_or_else(|| Error::NotFound("Project doesn't exist.".to_string()))
}

async fn get_issue(db: &Database, issue_id: i64, project_id: i64) -> Result<Issue> {
	Issue::by_id_in_project(db, issue_id, project_id)
		.await?
		.ok_or_else(|| Error::NotFound("Issue doesn't exist.".to_string()))
}

async fn get_comment(db: &Database, comment_id: i64, issue_id: i64) -> Result<Comment> {
	Comment::by_id_in_issue(db, comment_id, issue_id)
		.await?
		.ok_or_else(|| Error::NotFound("Comment doesn't exist.".to_string()))
}

pub struct ProjectService {
	db: Database,
}

impl ProjectService {
	pub fn new(db: Database) -> Self {
		Self { db }
	}

	/// Members see the projects they contribute to; superusers see all.
	pub async fn list(&self, actor: &Actor) -> Result<Vec<Project>> {
		can_attempt(actor, Verb::List)?;
		if actor.is_superuser {
			Project::list_all(&self.db).await
		} else {
			Project::list_for_user(&self.db, actor.id).await
		}
	}

	pub async fn create(&self, actor: &Actor, payload: ProjectCreate) -> Result<Project> {
		can_attempt(actor, Verb::Create)?;
		payload.validate()?;
		let project = Project::create_with_owner(
			&self.db,
			&payload.title,
			&payload.description,
			&payload.project_type,
			actor.id,
		)
		.await?;
		tracing::debug!(project_id = project.id, author = actor.id, "project created");
		Ok(project)
	}

	pub async fn retrieve(&self, actor: &Actor, project_id: i64) -> Result<Project> {
		can_attempt(actor, Verb::Retrieve)?;
		let project = get_project(&self.db, project_id).await?;
		can_act(&self.db, actor, Verb::Retrieve, &project).await?;
		Ok(project)
	}

	pub async fn update(
		&self,
		actor: &Actor,
		project_id: i64,
		payload: ProjectUpdate,
	) -> Result<Project> {
		can_attempt(actor, Verb::Update)?;
		let project = get_project(&self.db, project_id).await?;
		can_act(&self.db, actor, Verb::Update, &project).await?;
		payload.validate()?;
		Project::update(
			&self.db,
			project.id,
			payload.title.as_deref(),
			payload.description.as_deref(),
			payload.project_type.as_deref(),
		)
		.await?
		.ok_or_else(|| Error::NotFound("Project doesn't exist.".to_string()))
	}

	pub async fn destroy(&self, actor: &Actor, project_id: i64) -> Result<()> {
		can_attempt(actor, Verb::Destroy)?;
		let project = get_project(&self.db, project_id).await?;
		can_act(&self.db, actor, Verb::Destroy, &project).await?;
		Project::delete(&self.db, project.id).await?;
		tracing::debug!(project_id = project.id, "project destroyed");
		Ok(())
	}
}

pub struct ContributorService {
	db: Database,
}

impl ContributorService {
	pub fn new(db: Database) -> Self {
		Self { db }
	}

	pub async fn list(&self, actor: &Actor, project_id: i64) -> Result<Vec<Contributor>> {
		can_attempt(actor, Verb::List)?;
		let project = get_project(&self.db, project_id).await?;
		can_act(&self.db, actor, Verb::List, &project).await?;
		Contributor::list_for_project(&self.db, project.id).await
	}

	pub async fn create(
		&self,
		actor: &Actor,
		project_id: i64,
		payload: ContributorCreate,
	) -> Result<Contributor> {
		can_attempt(actor, Verb::Create)?;
		let project = get_project(&self.db, project_id).await?;
		// Managing membership rewrites the project's access list, so it is
		// gated like a project mutation: author only.
		can_act(&self.db, actor, Verb::Update, &project).await?;
		payload.validate()?;
		if User::by_id(&self.db, payload.user_id).await?.is_none() {
			return Err(Error::InvalidInput("User doesn't exist.".to_string()));
		}
		if Contributor::for_user_project(&self.db, payload.user_id, project.id)
			.await?
			.is_some()
		{
			return Err(Error::Conflict(format!(
				"User {} is already a contributor of project {}.",
				payload.user_id, project.id
			)));
		}
		// Client-supplied permission levels are ignored; added rows are
		// always plain members.
		let contributor = Contributor::insert(
			&self.db,
			payload.user_id,
			project.id,
			Permission::Member,
			&payload.role,
		)
		.await?;
		tracing::debug!(
			project_id = project.id,
			user_id = contributor.user_id,
			"contributor added"
		);
		Ok(contributor)
	}

	pub async fn destroy(&self, actor: &Actor, project_id: i64, user_id: i64) -> Result<()> {
		can_attempt(actor, Verb::Destroy)?;
		let project = get_project(&self.db, project_id).await?;
		can_act(&self.db, actor, Verb::Update, &project).await?;
		let target = Contributor::for_user_project(&self.db, user_id, project.id)
			.await?
			.ok_or_else(|| {
				Error::NotFound(format!(
					"User {user_id} is not a contributor of project {}.",
					project.id
				))
			})?;
		if target.permission == Permission::Owner {
			return Err(Error::Conflict(
				"The project owner cannot be removed from contributors.".to_string(),
			));
		}
		Contributor::delete(&self.db, target.id).await?;
		tracing::debug!(project_id = project.id, user_id, "contributor removed");
		Ok(())
	}
}

pub struct IssueService {
	db: Database,
}

impl IssueService {
	pub fn new(db: Database) -> Self {
		Self { db }
	}

	pub async fn list(&self, actor: &Actor, project_id: i64) -> Result<Vec<Issue>> {
		can_attempt(actor, Verb::List)?;
		let project = get_project(&self.db, project_id).await?;
		can_act(&self.db, actor, Verb::List, &project).await?;
		Issue::list_for_project(&self.db, project.id).await
	}

	pub async fn create(
		&self,
		actor: &Actor,
		project_id: i64,
		payload: IssueCreate,
	) -> Result<Issue> {
		can_attempt(actor, Verb::Create)?;
		let project = get_project(&self.db, project_id).await?;
		can_act(&self.db, actor, Verb::Create, &project).await?;
		payload.validate()?;
		let assignee_user_id = match payload.assignee_user_id {
			Some(id) => {
				if User::by_id(&self.db, id).await?.is_none() {
					return Err(Error::InvalidInput(
						"Assignee user doesn't exist.".to_string(),
					));
				}
				id
			}
			// Unassigned issues fall to their author.
			None => actor.id,
		};
		Issue::insert(
			&self.db,
			project.id,
			actor.id,
			assignee_user_id,
			&payload.title,
			payload.desc.as_deref(),
			&payload.tag,
			&payload.priority,
			&payload.status,
		)
		.await
	}

	pub async fn update(
		&self,
		actor: &Actor,
		project_id: i64,
		issue_id: i64,
		payload: IssueUpdate,
	) -> Result<Issue> {
		can_attempt(actor, Verb::Update)?;
		let project = get_project(&self.db, project_id).await?;
		let issue = get_issue(&self.db, issue_id, project.id).await?;
		can_act(&self.db, actor, Verb::Update, &issue).await?;
		payload.validate()?;
		if let Some(id) = payload.assignee_user_id {
			if User::by_id(&self.db, id).await?.is_none() {
				return Err(Error::InvalidInput(
					"Assignee user doesn't exist.".to_string(),
				));
			}
		}
		Issue::update(
			&self.db,
			issue.id,
			payload.title.as_deref(),
			payload.desc.as_deref(),
			payload.tag.as_deref(),
			payload.priority.as_deref(),
			payload.status.as_deref(),
			payload.assignee_user_id,
		)
		.await?
		.ok_or_else(|| Error::NotFound("Issue doesn't exist.".to_string()))
	}

	pub async fn destroy(&self, actor: &Actor, project_id: i64, issue_id: i64) -> Result<()> {
		can_attempt(actor, Verb::Destroy)?;
		let project = get_project(&self.db, project_id).await?;
		let issue = get_issue(&self.db, issue_id, project.id).await?;
		can_act(&self.db, actor, Verb::Destroy, &issue).await?;
		Issue::delete(&self.db, issue.id).await
	}
}

pub struct CommentService {
	db: Database,
}

impl CommentService {
	pub fn new(db: Database) -> Self {
		Self { db }
	}

	pub async fn list(
		&self,
		actor: &Actor,
		project_id: i64,
		issue_id: i64,
	) -> Result<Vec<Comment>> {
		can_attempt(actor, Verb::List)?;
		let project = get_project(&self.db, project_id).await?;
		let issue = get_issue(&self.db, issue_id, project.id).await?;
		can_act(&self.db, actor, Verb::List, &issue).await?;
		Comment::list_for_issue(&self.db, issue.id).await
	}

	pub async fn create(
		&self,
		actor: &Actor,
		project_id: i64,
		issue_id: i64,
		payload: CommentCreate,
	) -> Result<Comment> {
		can_attempt(actor, Verb::Create)?;
		let project = get_project(&self.db, project_id).await?;
		let issue = get_issue(&self.db, issue_id, project.id).await?;
		can_act(&self.db, actor, Verb::Create, &issue).await?;
		payload.validate()?;
		Comment::insert(&self.db, issue.id, project.id, actor.id, &payload.description).await
	}

	pub async fn retrieve(
		&self,
		actor: &Actor,
		project_id: i64,
		issue_id: i64,
		comment_id: i64,
	) -> Result<Comment> {
		can_attempt(actor, Verb::Retrieve)?;
		let project = get_project(&self.db, project_id).await?;
		let issue = get_issue(&self.db, issue_id, project.id).await?;
		let comment = get_comment(&self.db, comment_id, issue.id).await?;
		can_act(&self.db, actor, Verb::Retrieve, &comment).await?;
		Ok(comment)
	}

	pub async fn update(
		&self,
		actor: &Actor,
		project_id: i64,
		issue_id: i64,
		comment_id: i64,
		payload: CommentUpdate,
	) -> Result<Comment> {
		can_attempt(actor, Verb::Update)?;
		let project = get_project(&self.db, project_id).await?;
		let issue = get_issue(&self.db, issue_id, project.id).await?;
		let comment = get_comment(&self.db, comment_id, issue.id).await?;
		can_act(&self.db, actor, Verb::Update, &comment).await?;
		payload.validate()?;
		Comment::update(&self.db, comment.id, issue.id, payload.description.as_deref())
			.await?
			.ok_or_else(|| Error::NotFound("Comment doesn't exist.".to_string()))
	}

	pub async fn destroy(
		&self,
		actor: &Actor,
		project_id: i64,
		issue_id: i64,
		comment_id: i64,
	) -> Result<()> {
		can_attempt(actor, Verb::Destroy)?;
		let project = get_project(&self.db, project_id).await?;
		let issue = get_issue(&self.db, issue_id, project.id).await?;
		let comment = get_comment(&self.db, comment_id, issue.id).await?;
		can_act(&self.db, actor, Verb::Destroy, &comment).await?;
		Comment::delete(&self.db, comment.id).await
	}
}
