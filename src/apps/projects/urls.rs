//! URL patterns for the projects app.
//!
//! Everything nests under `/projects/`; contributors are addressed by user
//! id, issues and comments by their own ids.

use std::sync::Arc;

use softdesk_core::Router;
use softdesk_db::Database;

use super::services::{CommentService, ContributorService, IssueService, ProjectService};
use super::views::{
	CommentDetailView, CommentListView, ContributorDetailView, ContributorListView,
	IssueDetailView, IssueListView, ProjectDetailView, ProjectListView,
};

pub fn register(router: Router, db: Database) -> Router {
	let projects = Arc::new(ProjectService::new(db.clone()));
	let contributors = Arc::new(ContributorService::new(db.clone()));
	let issues = Arc::new(IssueService::new(db.clone()));
	let comments = Arc::new(CommentService::new(db));

	router
		.route("/projects/", Arc::new(ProjectListView::new(projects.clone())))
		.route(
			"/projects/{project_id}/",
			Arc::new(ProjectDetailView::new(projects)),
		)
		.route(
			"/projects/{project_id}/users/",
			Arc::new(ContributorListView::new(contributors.clone())),
		)
		.route(
			"/projects/{project_id}/users/{user_id}/",
			Arc::new(ContributorDetailView::new(contributors)),
		)
		.route(
			"/projects/{project_id}/issues/",
			Arc::new(IssueListView::new(issues.clone())),
		)
		.route(
			"/projects/{project_id}/issues/{issue_id}/",
			Arc::new(IssueDetailView::new(issues)),
		)
		.route(
			"/projects/{project_id}/issues/{issue_id}/comments/",
			Arc::new(CommentListView::new(comments.clone())),
		)
		.route(
			"/projects/{project_id}/issues/{issue_id}/comments/{comment_id}/",
			Arc::new(CommentDetailView::new(comments)),
		)
}
