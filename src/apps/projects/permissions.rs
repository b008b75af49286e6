//! Authorization over the project hierarchy.
//!
//! Every resource under a project answers two questions: which project it
//! belongs to and who authored it. [`can_act`] decides access from those two
//! answers alone, so projects, issues and comments all go through the same
//! engine. Read verbs require membership in the owning project; write verbs
//! require authorship of the resource itself.

use softdesk_core::{Actor, Error, Result};
use softdesk_db::Database;

use super::models::{Comment, Contributor, Issue, Project};

/// What the actor is trying to do to a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
	List,
	Create,
	Retrieve,
	Update,
	Destroy,
}

/// A resource that lives under a project and has an author.
pub trait ProjectScoped {
	fn project_id(&self) -> i64;
	fn author_user_id(&self) -> i64;
}

impl ProjectScoped for Project {
	// A project is its own scope root.
	fn project_id(&self) -> i64 {
		self.id
	}

	fn author_user_id(&self) -> i64 {
		self.author_user_id
	}
}

impl ProjectScoped for Issue {
	fn project_id(&self) -> i64 {
		self.project_id
	}

	fn author_user_id(&self) -> i64 {
		self.author_user_id
	}
}

impl ProjectScoped for Comment {
	fn project_id(&self) -> i64 {
		self.project_id
	}

	fn author_user_id(&self) -> i64 {
		self.author_user_id
	}
}

/// Gate run before any lookup: anonymous actors learn nothing about what
/// exists, they only ever see 401.
pub fn can_attempt(actor: &Actor, _verb: Verb) -> Result<()> {
	if !actor.is_authenticated {
		return Err(Error::Unauthenticated(
			"Authentication credentials were not provided.".to_string(),
		));
	}
	Ok(())
}

pub async fn is_contributor(db: &Database, user_id: i64, project_id: i64) -> Result<bool> {
	Ok(Contributor::for_user_project(db, user_id, project_id)
		.await?
		.is_some())
}

/// The object-level decision for an already-resolved resource.
pub async fn can_act<R: ProjectScoped>(
	db: &Database,
	actor: &Actor,
	verb: Verb,
	resource: &R,
) -> Result<()> {
	match verb {
		Verb::List | Verb::Retrieve | Verb::Create => {
			if is_contributor(db, actor.id, resource.project_id()).await? {
				Ok(())
			} else {
				Err(Error::Forbidden(
					"You are not a contributor of this project.".to_string(),
				))
			}
		}
		Verb::Update | Verb::Destroy => {
			if actor.id == resource.author_user_id() {
				Ok(())
			} else {
				Err(Error::Forbidden(
					"Only the author may modify this resource.".to_string(),
				))
			}
		}
	}
}
