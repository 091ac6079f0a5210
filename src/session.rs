// src/session.rs
//! Admin gate: loading until the session check answers, then authed or denied

use tokio_util::sync::CancellationToken;

use crate::app_log;
use crate::core::JobApiClient;
use crate::types::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessStatus {
    Loading,
    Authed,
    Denied,
}

impl AccessStatus {
    pub fn for_user(user: Option<&User>) -> Self {
        match user {
            Some(user) if user.is_admin() => AccessStatus::Authed,
            _ => AccessStatus::Denied,
        }
    }

    pub fn is_authed(&self) -> bool {
        matches!(self, AccessStatus::Authed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessStatus::Loading => "loading",
            AccessStatus::Authed => "authed",
            AccessStatus::Denied => "denied",
        }
    }
}

/// Ask the backend who holds the session and gate on the admin role.
///
/// Any failure denies access, except cancellation, which leaves the gate
/// undecided.
pub async fn check_admin_access(api: &JobApiClient, cancel: &CancellationToken) -> AccessStatus {
    match api.current_user(cancel).await {
        Ok(user) => {
            let status = AccessStatus::for_user(user.as_ref());
            if !status.is_authed() {
                app_log!(
                    info,
                    "User is not admin, role: {:?}",
                    user.as_ref().and_then(|u| u.role.as_deref())
                );
            }
            status
        }
        Err(e) if e.is_cancellation() => AccessStatus::Loading,
        Err(e) => {
            app_log!(info, "Auth check failed: {}", e);
            AccessStatus::Denied
        }
    }
}
