//! # tr-models
//!
//! Domain models for Issue Tracker RS.
//!
//! This crate contains the entity structs that map to the tracker's tables.
//! Each persisted model implements the core traits from `tr-core`.

pub use tr_core::traits::{Entity, Id, Identifiable, Timestamped};

pub mod role;
pub mod user;
pub mod project;
pub mod issue;

pub use role::Role;
pub use user::User;
pub use project::{CreateProjectDto, EditProjectDto, Project, ProjectStatus};
pub use issue::{CreateIssueDto, Issue, IssuePriority, IssueStatus};
