//! Collaborators the IAM tasks drive
//!
//! Implementations live outside this crate: the stack manager talks to
//! CloudFormation, the client getter builds Kubernetes clients lazily.

use crate::model::{ClusterIamServiceAccount, ObjectMeta, StackSummary};
use async_trait::async_trait;
use stackctl_core::Result;
use std::sync::Arc;

#[cfg(test)]
use mockall::automock;

/// CloudFormation operations on role stacks
#[cfg_attr(test, automock)]
#[async_trait]
pub trait StackManager: Send + Sync {
    /// Create the role stack for a service account and wait for it.
    ///
    /// Returns the ARN of the role the stack created.
    async fn create_iam_service_account_stack(
        &self,
        service_account: &ClusterIamServiceAccount,
    ) -> Result<String>;

    /// Start deleting a stack without waiting for it
    async fn delete_stack(&self, stack: &StackSummary) -> Result<()>;

    /// Delete a stack and wait until it is gone
    async fn delete_stack_sync(&self, stack: &StackSummary) -> Result<()>;

    /// Every role stack created for a service account
    async fn describe_iam_service_account_stacks(&self) -> Result<Vec<StackSummary>>;
}

/// Lazily builds the Kubernetes client
#[cfg_attr(test, automock)]
pub trait ClientSetGetter: Send + Sync {
    fn client_set(&self) -> Result<Arc<dyn KubernetesClient>>;
}

/// Service account operations against the cluster
#[cfg_attr(test, automock)]
#[async_trait]
pub trait KubernetesClient: Send + Sync {
    /// Create the service account, or update labels and annotations if it exists
    async fn create_or_update_service_account(&self, meta: &ObjectMeta) -> Result<()>;

    /// Delete the service account; a missing one is not an error
    async fn delete_service_account(&self, meta: &ObjectMeta) -> Result<()>;
}
