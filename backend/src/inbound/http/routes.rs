//! Route table for the versioned API.
//!
//! Mounted under `/api/v1` by the server; tests mount it the same way so
//! extractor configuration matches production.

use actix_web::web;

use super::error::{json_config, path_config};
use super::{choices, comments, contributors, issues, projects, users};

/// Register extractor configuration and every API handler.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .service(users::login)
        .service(users::logout)
        .service(users::register_user)
        .service(users::list_users)
        .service(users::get_user)
        .service(users::replace_user)
        .service(users::patch_user)
        .service(users::delete_user)
        .service(projects::list_projects)
        .service(projects::create_project)
        .service(projects::get_project)
        .service(projects::replace_project)
        .service(projects::patch_project)
        .service(projects::delete_project)
        .service(contributors::list_contributors)
        .service(contributors::add_contributor)
        .service(contributors::remove_contributor)
        .service(issues::list_issues)
        .service(issues::create_issue)
        .service(issues::get_issue)
        .service(issues::replace_issue)
        .service(issues::patch_issue)
        .service(issues::delete_issue)
        .service(comments::list_comments)
        .service(comments::create_comment)
        .service(comments::get_comment)
        .service(comments::replace_comment)
        .service(comments::patch_comment)
        .service(comments::delete_comment)
        .service(choices::project_choices)
        .service(choices::issue_choices);
}
