//! Assignee candidates for the issue form

use tr_contracts::issues::candidate_role;
use tr_contracts::UserContext;
use tr_core::result::TrackerResult;
use tr_db::Store;
use tr_models::User;

use crate::base::ServiceContext;
use crate::result::ServiceResult;

/// Users the acting user may assign an issue to.
///
/// QA members see active Developers; everybody else sees every active user.
pub struct AssigneeCandidatesService<'a, U: UserContext> {
    ctx: ServiceContext<'a, U>,
}

impl<'a, U: UserContext> AssigneeCandidatesService<'a, U> {
    pub fn new(user: &'a U, store: &'a Store) -> Self {
        Self {
            ctx: ServiceContext::new(user, store),
        }
    }

    pub async fn call(self) -> TrackerResult<ServiceResult<Vec<User>>> {
        let outcome = self.candidates().await;
        self.ctx.finish("assignee_candidates", outcome)
    }

    pub(crate) async fn candidates(&self) -> TrackerResult<Vec<User>> {
        let role = candidate_role(self.ctx.user);
        Ok(self.ctx.store.users.active_users(role).await?)
    }
}
