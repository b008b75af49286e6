//! Views for the projects app.
//!
//! Views are deliberately thin: pull ids out of the path, hand the body to
//! the service, wrap the result in a response. Unsupported methods answer
//! 405 so route existence is never confused with resource existence.

use std::sync::Arc;

use async_trait::async_trait;

use softdesk_core::{Handler, Method, Request, Response, Result};

use super::services::{CommentService, ContributorService, IssueService, ProjectService};

/// `GET,POST /projects/`
pub struct ProjectListView {
	service: Arc<ProjectService>,
}

impl ProjectListView {
	pub fn new(service: Arc<ProjectService>) -> Self {
		Self { service }
	}
}

#[async_trait]
impl Handler for ProjectListView {
	async fn handle(&self, request: Request) -> Result<Response> {
		match request.method {
			Method::GET => {
				let projects = self.service.list(&request.actor).await?;
				Response::ok().with_json(&projects)
			}
			Method::POST => {
				let project = self
					.service
					.create(&request.actor, request.json()?)
					.await?;
				Response::created().with_json(&project)
			}
			_ => Ok(Response::method_not_allowed()),
		}
	}
}

/// `GET,PUT,DELETE /projects/{project_id}/`
pub struct ProjectDetailView {
	service: Arc<ProjectService>,
}

impl ProjectDetailView {
	pub fn new(service: Arc<ProjectService>) -> Self {
		Self { service }
	}
}

#[async_trait]
impl Handler for ProjectDetailView {
	async fn handle(&self, request: Request) -> Result<Response> {
		let project_id = request.id_param("project_id")?;
		match request.method {
			Method::GET => {
				let project = self.service.retrieve(&request.actor, project_id).await?;
				Response::ok().with_json(&project)
			}
			Method::PUT => {
				let project = self
					.service
					.update(&request.actor, project_id, request.json()?)
					.await?;
				Response::ok().with_json(&project)
			}
			Method::DELETE => {
				self.service.destroy(&request.actor, project_id).await?;
				Ok(Response::no_content())
			}
			_ => Ok(Response::method_not_allowed()),
		}
	}
}

/// `GET,POST /projects/{project_id}/users/`
pub struct ContributorListView {
	service: Arc<ContributorService>,
}

impl ContributorListView {
	pub fn new(service: Arc<ContributorService>) -> Self {
		Self { service }
	}
}

#[async_trait]
impl Handler for ContributorListView {
	async fn handle(&self, request: Request) -> Result<Response> {
		let project_id = request.id_param("project_id")?;
		match request.method {
			Method::GET => {
				let contributors = self.service.list(&request.actor, project_id).await?;
				Response::ok().with_json(&contributors)
			}
			Method::POST => {
				let contributor = self
					.service
					.create(&request.actor, project_id, request.json()?)
					.await?;
				Response::created().with_json(&contributor)
			}
			_ => Ok(Response::method_not_allowed()),
		}
	}
}

/// `DELETE /projects/{project_id}/users/{user_id}/`
///
/// Contributor rows are addressed by the member's user id, matching how
/// they were added.
pub struct ContributorDetailView {
	service: Arc<ContributorService>,
}

impl ContributorDetailView {
	pub fn new(service: Arc<ContributorService>) -> Self {
		Self { service }
	}
}

#[async_trait]
impl Handler for ContributorDetailView {
	async fn handle(&self, request: Request) -> Result<Response> {
		let project_id = request.id_param("project_id")?;
		let user_id = request.id_param("user_id")?;
		match request.method {
			Method::DELETE => {
				self.service
					.destroy(&request.actor, project_id, user_id)
					.await?;
				Ok(Response::no_content())
			}
			_ => Ok(Response::method_not_allowed()),
		}
	}
}

/// `GET,POST /projects/{project_id}/issues/`
pub struct IssueListView {
	service: Arc<IssueService>,
}

impl IssueListView {
	pub fn new(service: Arc<IssueService>) -> Self {
		Self { service }
	}
}

#[async_trait]
impl Handler for IssueListView {
	async fn handle(&self, request: Request) -> Result<Response> {
		let project_id = request.id_param("project_id")?;
		match request.method {
			Method::GET => {
				let issues = self.service.list(&request.actor, project_id).await?;
				Response::ok().with_json(&issues)
			}
			Method::POST => {
				let issue = self
					.service
					.create(&request.actor, project_id, request.json()?)
					.await?;
				Response::created().with_json(&issue)
			}
			_ => Ok(Response::method_not_allowed()),
		}
	}
}

/// `PUT,DELETE /projects/{project_id}/issues/{issue_id}/`
///
/// There is no single-issue read; issues are consumed through the list.
pub struct IssueDetailView {
	service: Arc<IssueService>,
}

impl IssueDetailView {
	pub fn new(service: Arc<IssueService>) -> Self {
		Self { service }
	}
}

#[async_trait]
impl Handler for IssueDetailView {
	async fn handle(&self, request: Request) -> Result<Response> {
		let project_id = request.id_param("project_id")?;
		let issue_id = request.id_param("issue_id")?;
		match request.method {
			Method::PUT => {
				let issue = self
					.service
					.update(&request.actor, project_id, issue_id, request.json()?)
					.await?;
				Response::ok().with_json(&issue)
			}
			Method::DELETE => {
				self.service
					.destroy(&request.actor, project_id, issue_id)
					.await?;
				Ok(Response::no_content())
			}
			_ => Ok(Response::method_not_allowed()),
		}
	}
}

/// `GET,POST /projects/{project_id}/issues/{issue_id}/comments/`
pub struct CommentListView {
	service: Arc<CommentService>,
}

impl CommentListView {
	pub fn new(service: Arc<CommentService>) -> Self {
		Self { service }
	}
}

#[async_trait]
impl Handler for CommentListView {
	async fn handle(&self, request: Request) -> Result<Response> {
		let project_id = request.id_param("project_id")?;
		let issue_id = request.id_param("issue_id")?;
		match request.method {
			Method::GET => {
				let comments = self
					.service
					.list(&request.actor, project_id, issue_id)
					.await?;
				Response::ok().with_json(&comments)
			}
			Method::POST => {
				let comment = self
					.service
					.create(&request.actor, project_id, issue_id, request.json()?)
					.await?;
				Response::created().with_json(&comment)
			}
			_ => Ok(Response::method_not_allowed()),
		}
	}
}

/// `GET,PUT,DELETE /projects/{project_id}/issues/{issue_id}/comments/{comment_id}/`
pub struct CommentDetailView {
	service: Arc<CommentService>,
}

impl CommentDetailView {
	pub fn new(service: Arc<CommentService>) -> Self {
		Self { service }
	}
}

#[async_trait]
impl Handler for CommentDetailView {
	async fn handle(&self, request: Request) -> Result<Response> {
		let project_id = request.id_param("project_id")?;
		let issue_id = request.id_param("issue_id")?;
		let comment_id = request.id_param("comment_id")?;
		match request.method {
			Method::GET => {
				let comment = self
					.service
					.retrieve(&request.actor, project_id, issue_id, comment_id)
					.await?;
				Response::ok().with_json(&comment)
			}
			Method::PUT => {
				let comment = self
					.service
					.update(&request.actor, project_id, issue_id, comment_id, request.json()?)
					.await?;
				Response::ok().with_json(&comment)
			}
			Method::DELETE => {
				self.service
					.destroy(&request.actor, project_id, issue_id, comment_id)
					.await?;
				Ok(Response::no_content())
			}
			_ => Ok(Response::method_not_allowed()),
		}
	}
}
