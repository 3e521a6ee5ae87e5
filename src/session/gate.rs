use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

use super::{AdminPolicy, AuthError, AuthProvider, Principal};
use crate::db::ANONYMOUS_REPORTER;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionIdentity {
    pub principal: Principal,
    pub is_admin: bool,
}

/// Current identity, published on a watch channel so the report store can
/// react to sign-in and sign-out.
#[derive(Clone)]
pub struct SessionGate {
    provider: Arc<dyn AuthProvider>,
    policy: Arc<dyn AdminPolicy>,
    identity_tx: Arc<watch::Sender<Option<SessionIdentity>>>,
}

impl SessionGate {
    pub fn new(provider: Arc<dyn AuthProvider>, policy: Arc<dyn AdminPolicy>) -> Self {
        let (identity_tx, _) = watch::channel(None);
        Self {
            provider,
            policy,
            identity_tx: Arc::new(identity_tx),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<SessionIdentity>> {
        self.identity_tx.subscribe()
    }

    pub fn current(&self) -> Option<SessionIdentity> {
        self.identity_tx.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity_tx.borrow().is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.identity_tx
            .borrow()
            .as_ref()
            .map(|identity| identity.is_admin)
            .unwrap_or(false)
    }

    /// Id recorded as `reported_by` on new reports.
    pub fn reporter_id(&self) -> String {
        self.identity_tx
            .borrow()
            .as_ref()
            .map(|identity| identity.principal.uid.clone())
            .unwrap_or_else(|| ANONYMOUS_REPORTER.to_string())
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SessionIdentity, AuthError> {
        let principal = self.provider.sign_in(email, password).await?;
        Ok(self.publish(principal))
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SessionIdentity, AuthError> {
        let principal = self.provider.sign_up(email, password).await?;
        Ok(self.publish(principal))
    }

    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.provider.sign_out().await?;
        self.identity_tx.send_replace(None);
        Ok(())
    }

    fn publish(&self, principal: Principal) -> SessionIdentity {
        let identity = SessionIdentity {
            is_admin: self.policy.is_admin(&principal),
            principal,
        };
        self.identity_tx.send_replace(Some(identity.clone()));
        identity
    }
}
