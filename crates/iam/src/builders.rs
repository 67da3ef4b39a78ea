//! Task trees for creating and deleting IAM service accounts
//!
//! Every service account gets its own sequential sub-tree (role first, then
//! the Kubernetes object) and the sub-trees fan out in parallel.

use crate::clients::{ClientSetGetter, KubernetesClient, StackManager};
use crate::model::{ClusterIamMeta, ClusterIamServiceAccount, ObjectMeta, StackSummary};
use crate::tasks::{AsyncStackTask, IamServiceAccountStackTask, KubernetesTask, StackTask};
use indexmap::IndexMap;
use parking_lot::Mutex;
use stackctl_core::{Error, Result, ResultExt};
use stackctl_task::TaskTree;
use std::sync::Arc;

/// Tree that creates the role stack and the Kubernetes object of every
/// service account.
///
/// Role creation is skipped when `attach_role_arn` is set, and the
/// Kubernetes object is skipped for role-only accounts.
pub fn new_tasks_to_create_iam_service_accounts(
    service_accounts: Vec<ClusterIamServiceAccount>,
    stacks: Arc<dyn StackManager>,
    kubernetes: Option<Arc<dyn ClientSetGetter>>,
) -> TaskTree {
    let mut tree = TaskTree::parallel();

    for mut sa in service_accounts {
        let mut sa_tasks = TaskTree::sub_tree(false);
        let name = sa.name_string();

        if let Some(role_arn) = sa.attach_role_arn.clone() {
            tracing::debug!("attachRoleARN was provided, skipping role creation");
            sa.set_role_arn(role_arn);
        }
        sa.set_managed_by_label();

        let object_meta = sa.meta.as_object_meta();
        let role_only = sa.role_only;
        let skip_role = sa.attach_role_arn.is_some();
        let shared = Arc::new(Mutex::new(sa));

        if !skip_role {
            sa_tasks.append(IamServiceAccountStackTask::new(
                format!("create IAM role for serviceaccount {name:?}"),
                Arc::clone(&shared),
                Arc::clone(&stacks),
            ));
        }

        if !role_only {
            sa_tasks.append(KubernetesTask::new(
                format!("create serviceaccount {name:?}"),
                kubernetes.clone(),
                object_meta,
                move |client: Arc<dyn KubernetesClient>, mut meta: ObjectMeta| {
                    let current = {
                        let mut sa = shared.lock();
                        sa.set_annotations();
                        sa.as_object_meta()
                    };
                    meta.annotations = current.annotations;
                    meta.labels = current.labels;
                    async move {
                        client
                            .create_or_update_service_account(&meta)
                            .await
                            .map_err(|e| {
                                Error::kubernetes(
                                    format!("serviceaccount {}/{}", meta.namespace, meta.name),
                                    format!("failed to create service account: {e}"),
                                )
                            })
                    }
                },
            ));
        }

        tree.append(sa_tasks);
    }

    tree
}

/// Tree that deletes the role stack (if any) and then the Kubernetes object
/// of every named service account.
///
/// `wait` selects deletions that block until the stack is gone.
pub async fn new_tasks_to_delete_iam_service_accounts(
    service_accounts: &[String],
    stacks: Arc<dyn StackManager>,
    kubernetes: Option<Arc<dyn ClientSetGetter>>,
    wait: bool,
) -> Result<TaskTree> {
    let role_stacks = stacks
        .describe_iam_service_account_stacks()
        .await
        .context("listing IAM service account stacks")?;
    let stacks_by_account = stacks_to_service_account_map(role_stacks);
    let mut tree = TaskTree::parallel();

    for name in service_accounts {
        let mut sa_tasks = TaskTree::sub_tree(false);

        if let Some(stack) = stacks_by_account.get(name.as_str()) {
            let info = format!("delete IAM role for serviceaccount {name:?}");
            if wait {
                sa_tasks.append(StackTask::new(info, stack.clone(), Arc::clone(&stacks)));
            } else {
                sa_tasks.append(AsyncStackTask::new(info, stack.clone(), Arc::clone(&stacks)));
            }
        }

        let meta: ClusterIamMeta = name.parse()?;
        sa_tasks.append(KubernetesTask::new(
            format!("delete serviceaccount {name:?}"),
            kubernetes.clone(),
            meta.as_object_meta(),
            |client: Arc<dyn KubernetesClient>, meta: ObjectMeta| async move {
                client.delete_service_account(&meta).await
            },
        ));
        tree.append(sa_tasks);
    }

    Ok(tree)
}

/// Names (`namespace/name`) of every service account that has a role stack
pub async fn service_accounts_with_stacks(stacks: &dyn StackManager) -> Result<Vec<String>> {
    Ok(stacks
        .describe_iam_service_account_stacks()
        .await?
        .iter()
        .filter_map(StackSummary::iam_service_account_name)
        .map(str::to_string)
        .collect())
}

fn stacks_to_service_account_map(stacks: Vec<StackSummary>) -> IndexMap<String, StackSummary> {
    stacks
        .into_iter()
        .filter_map(|stack| {
            let name = stack.iam_service_account_name()?.to_string();
            Some((name, stack))
        })
        .collect()
}
