//! Create and delete IAM service accounts end to end

use crate::builders::{
    new_tasks_to_create_iam_service_accounts, new_tasks_to_delete_iam_service_accounts,
};
use crate::clients::{ClientSetGetter, StackManager};
use crate::model::ClusterIamServiceAccount;
use stackctl_core::{ExecutionSettings, Result};
use stackctl_task::{report_errors, ExecutionContext, Task, TaskTree};
use std::sync::Arc;

/// Builds the service account task trees, runs them and reports the outcome
pub struct IamServiceAccountManager {
    stacks: Arc<dyn StackManager>,
    kubernetes: Option<Arc<dyn ClientSetGetter>>,
    settings: ExecutionSettings,
}

impl IamServiceAccountManager {
    pub fn new(
        stacks: Arc<dyn StackManager>,
        kubernetes: Option<Arc<dyn ClientSetGetter>>,
        settings: ExecutionSettings,
    ) -> Self {
        Self {
            stacks,
            kubernetes,
            settings,
        }
    }

    /// Create the role stacks and Kubernetes objects of `service_accounts`.
    ///
    /// With `plan` set only the plan is logged.
    pub async fn create(
        &self,
        service_accounts: Vec<ClusterIamServiceAccount>,
        plan: bool,
    ) -> Result<()> {
        let tree = new_tasks_to_create_iam_service_accounts(
            service_accounts,
            Arc::clone(&self.stacks),
            self.kubernetes.clone(),
        )
        .with_plan_mode(plan);
        self.run(tree, "creating IAM service accounts").await
    }

    /// Delete the named (`namespace/name`) service accounts and their role stacks
    pub async fn delete(&self, service_accounts: &[String], wait: bool, plan: bool) -> Result<()> {
        let tree = new_tasks_to_delete_iam_service_accounts(
            service_accounts,
            Arc::clone(&self.stacks),
            self.kubernetes.clone(),
            wait,
        )
        .await?
        .with_plan_mode(plan);
        self.run(tree, "deleting IAM service accounts").await
    }

    async fn run(&self, tree: TaskTree, subject: &str) -> Result<()> {
        if tree.is_empty() {
            tracing::info!("no IAM service accounts to process");
            return Ok(());
        }
        let ctx = ExecutionContext::from_settings(&self.settings);
        if !tree_logs_its_plan(&tree, &ctx) {
            tracing::info!("{}", tree.describe());
        }
        let errors = tree.run_all_with(&ctx).await;
        report_errors(errors, subject)
    }
}

/// A tree in plan mode logs its own plan unless the run already plans
fn tree_logs_its_plan(tree: &TaskTree, ctx: &ExecutionContext) -> bool {
    tree.plan_mode && !ctx.plan_mode()
}
