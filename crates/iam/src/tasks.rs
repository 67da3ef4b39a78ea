//! Tasks backed by the stack manager and the Kubernetes client

use crate::clients::{ClientSetGetter, KubernetesClient, StackManager};
use crate::model::{ClusterIamServiceAccount, ObjectMeta, StackSummary};
use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::FutureExt;
use parking_lot::Mutex;
use stackctl_core::{Error, Result};
use stackctl_task::{Completion, ExecutionContext, Task};
use std::future::Future;
use std::sync::Arc;

type KubernetesCall =
    Box<dyn Fn(Arc<dyn KubernetesClient>, ObjectMeta) -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// Runs a call against the Kubernetes client for one object.
///
/// Fails fast when no client getter was configured, before any call.
pub struct KubernetesTask {
    info: String,
    kubernetes: Option<Arc<dyn ClientSetGetter>>,
    object_meta: ObjectMeta,
    call: KubernetesCall,
}

impl KubernetesTask {
    pub fn new<F, Fut>(
        info: impl Into<String>,
        kubernetes: Option<Arc<dyn ClientSetGetter>>,
        object_meta: ObjectMeta,
        call: F,
    ) -> Self
    where
        F: Fn(Arc<dyn KubernetesClient>, ObjectMeta) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        Self {
            info: info.into(),
            kubernetes,
            object_meta,
            call: Box::new(move |client, meta| call(client, meta).boxed()),
        }
    }
}

#[async_trait]
impl Task for KubernetesTask {
    fn describe(&self) -> String {
        self.info.clone()
    }

    async fn run(&self, _ctx: &ExecutionContext, done: Completion) -> Result<()> {
        let Some(kubernetes) = &self.kubernetes else {
            return Err(Error::missing_dependency(
                self.info.clone(),
                "Kubernetes client configuration",
            ));
        };
        let client = kubernetes.client_set()?;
        done.finish((self.call)(client, self.object_meta.clone()).await);
        Ok(())
    }
}

/// Deletes a stack and waits for the deletion to finish
pub struct StackTask {
    info: String,
    stack: StackSummary,
    stacks: Arc<dyn StackManager>,
}

impl StackTask {
    pub fn new(info: impl Into<String>, stack: StackSummary, stacks: Arc<dyn StackManager>) -> Self {
        Self {
            info: info.into(),
            stack,
            stacks,
        }
    }
}

#[async_trait]
impl Task for StackTask {
    fn describe(&self) -> String {
        self.info.clone()
    }

    async fn run(&self, _ctx: &ExecutionContext, done: Completion) -> Result<()> {
        done.finish(self.stacks.delete_stack_sync(&self.stack).await);
        Ok(())
    }
}

/// Starts deleting a stack and completes without waiting.
///
/// A failure to start the deletion is reported as a scheduling error.
pub struct AsyncStackTask {
    info: String,
    stack: StackSummary,
    stacks: Arc<dyn StackManager>,
}

impl AsyncStackTask {
    pub fn new(info: impl Into<String>, stack: StackSummary, stacks: Arc<dyn StackManager>) -> Self {
        Self {
            info: info.into(),
            stack,
            stacks,
        }
    }
}

#[async_trait]
impl Task for AsyncStackTask {
    fn describe(&self) -> String {
        self.info.clone()
    }

    async fn run(&self, _ctx: &ExecutionContext, done: Completion) -> Result<()> {
        done.succeed();
        self.stacks.delete_stack(&self.stack).await
    }
}

/// Creates the role stack for a service account and records the role ARN.
///
/// The service account is shared with the tasks that come after it in the
/// same sequential sub-tree, so they see the ARN once this task succeeded.
pub struct IamServiceAccountStackTask {
    info: String,
    service_account: Arc<Mutex<ClusterIamServiceAccount>>,
    stacks: Arc<dyn StackManager>,
}

impl IamServiceAccountStackTask {
    pub fn new(
        info: impl Into<String>,
        service_account: Arc<Mutex<ClusterIamServiceAccount>>,
        stacks: Arc<dyn StackManager>,
    ) -> Self {
        Self {
            info: info.into(),
            service_account,
            stacks,
        }
    }
}

#[async_trait]
impl Task for IamServiceAccountStackTask {
    fn describe(&self) -> String {
        self.info.clone()
    }

    async fn run(&self, _ctx: &ExecutionContext, done: Completion) -> Result<()> {
        let service_account = self.service_account.lock().clone();
        let result = self
            .stacks
            .create_iam_service_account_stack(&service_account)
            .await
            .map(|role_arn| {
                tracing::debug!(
                    service_account = %service_account.meta,
                    role_arn = %role_arn,
                    "created IAM role"
                );
                self.service_account.lock().set_role_arn(role_arn);
            });
        done.finish(result);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{MockClientSetGetter, MockKubernetesClient, MockStackManager};

    async fn outcome(task: &dyn Task) -> (Result<()>, Result<()>) {
        let (done, receiver) = Completion::channel(task.describe());
        let scheduled = task.run(&ExecutionContext::new(), done).await;
        (scheduled, receiver.wait().await)
    }

    fn delete_call(
        client: Arc<dyn KubernetesClient>,
        meta: ObjectMeta,
    ) -> impl Future<Output = Result<()>> + Send {
        async move { client.delete_service_account(&meta).await }
    }

    #[tokio::test]
    async fn test_kubernetes_task_without_client_fails_fast() {
        let task = KubernetesTask::new(
            "delete serviceaccount \"default/s3-reader\"",
            None,
            ObjectMeta::default(),
            delete_call,
        );
        let (scheduled, _) = outcome(&task).await;
        assert_eq!(
            scheduled.unwrap_err().to_string(),
            "cannot start task \"delete serviceaccount \\\"default/s3-reader\\\"\" as Kubernetes client configuration wasn't provided"
        );
    }

    #[tokio::test]
    async fn test_kubernetes_task_reports_client_set_error() {
        let mut getter = MockClientSetGetter::new();
        getter
            .expect_client_set()
            .times(1)
            .returning(|| Err(Error::kubernetes("clientset", "no kubeconfig")));
        let getter: Arc<dyn ClientSetGetter> = Arc::new(getter);

        let task = KubernetesTask::new("delete serviceaccount", Some(getter), ObjectMeta::default(), delete_call);
        let (scheduled, _) = outcome(&task).await;
        assert!(matches!(scheduled, Err(Error::Kubernetes { .. })));
    }

    #[tokio::test]
    async fn test_kubernetes_task_passes_object_meta() {
        let mut client = MockKubernetesClient::new();
        client
            .expect_delete_service_account()
            .withf(|meta| meta.namespace == "backend" && meta.name == "s3-reader")
            .times(1)
            .returning(|_| Ok(()));
        let client: Arc<dyn KubernetesClient> = Arc::new(client);

        let mut getter = MockClientSetGetter::new();
        getter
            .expect_client_set()
            .returning(move || Ok(Arc::clone(&client)));
        let getter: Arc<dyn ClientSetGetter> = Arc::new(getter);

        let meta = ObjectMeta {
            name: "s3-reader".to_string(),
            namespace: "backend".to_string(),
            ..ObjectMeta::default()
        };
        let task = KubernetesTask::new("delete serviceaccount", Some(getter), meta, delete_call);
        let (scheduled, signalled) = outcome(&task).await;
        assert!(scheduled.is_ok());
        assert!(signalled.is_ok());
    }

    #[tokio::test]
    async fn test_stack_tasks_wait_or_not() {
        let mut stacks = MockStackManager::new();
        stacks
            .expect_delete_stack_sync()
            .times(1)
            .returning(|stack| Err(Error::stack(stack.name.clone(), "DELETE_FAILED")));
        stacks
            .expect_delete_stack()
            .times(1)
            .returning(|stack| Err(Error::stack(stack.name.clone(), "access denied")));
        let stacks: Arc<dyn StackManager> = Arc::new(stacks);

        let sync = StackTask::new("delete nodegroup", StackSummary::new("ng-1"), Arc::clone(&stacks));
        let (scheduled, signalled) = outcome(&sync).await;
        assert!(scheduled.is_ok());
        assert_eq!(signalled.unwrap_err().to_string(), "stack 'ng-1': DELETE_FAILED");

        let fire_and_forget = AsyncStackTask::new("delete nodegroup", StackSummary::new("ng-2"), stacks);
        let (scheduled, signalled) = outcome(&fire_and_forget).await;
        assert_eq!(scheduled.unwrap_err().to_string(), "stack 'ng-2': access denied");
        assert!(signalled.is_ok());
    }

    #[tokio::test]
    async fn test_role_stack_task_records_role_arn() {
        let mut stacks = MockStackManager::new();
        stacks
            .expect_create_iam_service_account_stack()
            .withf(|sa| sa.name_string() == "backend/s3-reader")
            .times(1)
            .returning(|_| Ok("arn:aws:iam::123456789012:role/s3-reader".to_string()));
        let stacks: Arc<dyn StackManager> = Arc::new(stacks);

        let sa = Arc::new(Mutex::new(ClusterIamServiceAccount::new("backend", "s3-reader")));
        let task = IamServiceAccountStackTask::new("create IAM role", Arc::clone(&sa), stacks);
        let (scheduled, signalled) = outcome(&task).await;
        assert!(scheduled.is_ok());
        assert!(signalled.is_ok());
        assert_eq!(
            sa.lock().role_arn(),
            Some("arn:aws:iam::123456789012:role/s3-reader")
        );
    }
}
