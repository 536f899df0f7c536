//! Pick Service for Projects

use tr_contracts::projects::PickProjectContract;
use tr_contracts::{Contract, UserContext};
use tr_core::result::TrackerResult;
use tr_core::traits::Id;
use tr_db::{Store, UpdateProjectDto};
use tr_models::Project;

use crate::base::ServiceContext;
use crate::result::ServiceResult;

/// A developer takes an unpicked project.
///
/// The write is conditional on the picker still being unset, so two
/// developers racing for the same project produce exactly one winner.
pub struct PickProjectService<'a, U: UserContext> {
    ctx: ServiceContext<'a, U>,
}

impl<'a, U: UserContext> PickProjectService<'a, U> {
    pub fn new(user: &'a U, store: &'a Store) -> Self {
        Self {
            ctx: ServiceContext::new(user, store),
        }
    }

    pub async fn call(self, project_id: Id) -> TrackerResult<ServiceResult<Project>> {
        let outcome = self.pick(project_id).await;
        Ok(self
            .ctx
            .finish("pick_project", outcome)?
            .with_success_message("You have picked this project."))
    }

    async fn pick(&self, project_id: Id) -> TrackerResult<Project> {
        let project = self.ctx.load_project(project_id).await?;
        let contract = PickProjectContract::new(self.ctx.user);
        contract.validate(&project)?;

        let user_id = self.ctx.user_id();
        let dto = UpdateProjectDto::pick(user_id);
        contract.validate_writable(&dto.changed_attributes())?;
        let project = self.ctx.store.projects.update(project_id, dto).await?;
        tracing::info!(project_id, user_id, "Project picked");
        Ok(project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Fixture, DEV1, DEV2, QA1};
    use futures::future::join_all;
    use std::sync::Arc;
    use tr_core::error::ErrorKind;

    #[tokio::test]
    async fn test_first_developer_wins() {
        let fixture = Fixture::new();
        let project = fixture.project("P1").await;
        let (dev1, dev2) = (fixture.user(DEV1), fixture.user(DEV2));

        let first = PickProjectService::new(&dev1, &fixture.store)
            .call(project.id)
            .await
            .unwrap();
        assert!(first.is_success());
        assert_eq!(first.message(), Some("You have picked this project."));
        assert_eq!(first.result().unwrap().picked_by_id, Some(DEV1));

        let second = PickProjectService::new(&dev2, &fixture.store)
            .call(project.id)
            .await
            .unwrap();
        assert!(second.is_failure());
        assert_eq!(second.error_kind(), Some(ErrorKind::ConditionFailed));
        assert_eq!(second.message(), Some("This project has already been picked."));

        let stored = fixture.store.projects.find_by_id(project.id).await.unwrap().unwrap();
        assert_eq!(stored.picked_by_id, Some(DEV1));
    }

    #[tokio::test]
    async fn test_repick_by_same_developer_fails() {
        let fixture = Fixture::new();
        let project = fixture.project("P1").await;
        let dev1 = fixture.user(DEV1);

        PickProjectService::new(&dev1, &fixture.store)
            .call(project.id)
            .await
            .unwrap();
        let again = PickProjectService::new(&dev1, &fixture.store)
            .call(project.id)
            .await
            .unwrap();
        assert_eq!(again.error_kind(), Some(ErrorKind::ConditionFailed));
    }

    #[tokio::test]
    async fn test_non_developer_is_denied() {
        let fixture = Fixture::new();
        let project = fixture.project("P1").await;
        let qa = fixture.user(QA1);

        let result = PickProjectService::new(&qa, &fixture.store)
            .call(project.id)
            .await
            .unwrap();

        assert_eq!(result.error_kind(), Some(ErrorKind::PermissionDenied));
        let stored = fixture.store.projects.find_by_id(project.id).await.unwrap().unwrap();
        assert_eq!(stored.picked_by_id, None);
    }

    #[tokio::test]
    async fn test_unknown_project() {
        let fixture = Fixture::new();
        let dev1 = fixture.user(DEV1);

        let result = PickProjectService::new(&dev1, &fixture.store)
            .call(77)
            .await
            .unwrap();
        assert_eq!(result.error_kind(), Some(ErrorKind::NotFound));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_picks_have_one_winner() {
        let fixture = Fixture::new();
        let project_id = fixture.project("P1").await.id;
        let store = Arc::new(fixture.store.clone());

        let tasks = (0..16).map(|n| {
            let store = Arc::clone(&store);
            let developer = fixture.user(if n % 2 == 0 { DEV1 } else { DEV2 });
            tokio::spawn(async move {
                PickProjectService::new(&developer, &store)
                    .call(project_id)
                    .await
                    .unwrap()
                    .is_success()
            })
        });

        let winners = join_all(tasks)
            .await
            .into_iter()
            .filter(|joined| *joined.as_ref().unwrap())
            .count();
        assert_eq!(winners, 1);
    }
}
