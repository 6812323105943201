//! Session registry: owns all live wizard sessions and brokers advisor calls.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use crate::advisor::{AdviceCategory, Advisor, OfferAnalysis, WebsitePrefill};
use crate::error::{Error, WizardError};

use super::session::{SessionView, WizardSession};

/// How often idle sessions are swept.
const PRUNE_INTERVAL: Duration = Duration::from_secs(60);

/// Advice returned to a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdviceAnswer {
    pub text: String,
    pub cached: bool,
}

/// In-memory registry of sessions. Each session sits behind its own lock so
/// one slow request never blocks another session.
pub struct SessionManager {
    sessions: RwLock<HashMap<Uuid, Arc<Mutex<WizardSession>>>>,
    advisor: Option<Arc<dyn Advisor>>,
    prefill: Option<Arc<WebsitePrefill>>,
    idle_timeout: Duration,
}

impl SessionManager {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            advisor: None,
            prefill: None,
            idle_timeout,
        }
    }

    pub fn with_advisor(mut self, advisor: Arc<dyn Advisor>) -> Self {
        self.advisor = Some(advisor);
        self
    }

    pub fn with_prefill(mut self, prefill: Arc<WebsitePrefill>) -> Self {
        self.prefill = Some(prefill);
        self
    }

    pub fn has_advisor(&self) -> bool {
        self.advisor.is_some()
    }

    /// Start a new session and return its first view.
    pub async fn create(&self) -> SessionView {
        let session = WizardSession::new();
        let view = session.view();
        self.sessions
            .write()
            .await
            .insert(session.id(), Arc::new(Mutex::new(session)));
        info!(session_id = %view.id, "Session created");
        view
    }

    async fn get(&self, id: Uuid) -> Result<Arc<Mutex<WizardSession>>, WizardError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(WizardError::SessionNotFound(id))
    }

    /// Run `f` against a session under its lock, marking it active.
    pub async fn with_session<T, F>(&self, id: Uuid, f: F) -> Result<T, WizardError>
    where
        F: FnOnce(&mut WizardSession) -> Result<T, WizardError>,
    {
        let session = self.get(id).await?;
        let mut session = session.lock().await;
        session.touch();
        f(&mut session)
    }

    pub async fn view(&self, id: Uuid) -> Result<SessionView, WizardError> {
        self.with_session(id, |s| Ok(s.view())).await
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), WizardError> {
        if self.sessions.write().await.remove(&id).is_none() {
            return Err(WizardError::SessionNotFound(id));
        }
        info!(session_id = %id, "Session removed");
        Ok(())
    }

    /// Advice for a session. Cached answers return immediately; otherwise the
    /// advisor runs with no session lock held and the answer is recorded after.
    pub async fn advise(
        &self,
        id: Uuid,
        category: AdviceCategory,
        input: &str,
    ) -> Result<AdviceAnswer, Error> {
        let advisor = self.advisor.clone().ok_or(Error::AdvisorUnavailable)?;

        let request = self
            .with_session(id, |s| Ok(s.advice_request(category, input)))
            .await?;
        let (text, cached) = request.resolve(advisor.as_ref()).await;

        if !cached {
            // The session may have been removed while the advisor ran.
            let stored = self
                .with_session(id, |s| Ok(s.record_advice(category, input, &text)))
                .await
                .unwrap_or(false);
            debug!(session_id = %id, category = %category, stored, "Advice recorded");
        }

        Ok(AdviceAnswer { text, cached })
    }

    /// Fetch `url`, analyse it, and prefill the session's business basics.
    pub async fn prefill(&self, id: Uuid, url: &str) -> Result<OfferAnalysis, Error> {
        let prefill = self.prefill.clone().ok_or(Error::AdvisorUnavailable)?;

        // Fail fast on unknown sessions before fetching anything.
        self.get(id).await?;
        let analysis = prefill.extract_business_info(url).await?;
        self.with_session(id, |s| Ok(s.apply_prefill(&analysis)))
            .await?;
        Ok(analysis)
    }

    /// Drop sessions idle longer than the timeout. Returns how many went.
    pub async fn prune_idle(&self) -> usize {
        let cutoff = match chrono::Duration::from_std(self.idle_timeout) {
            Ok(timeout) => chrono::Utc::now() - timeout,
            Err(_) => return 0,
        };

        let snapshot: Vec<_> = self
            .sessions
            .read()
            .await
            .iter()
            .map(|(id, s)| (*id, s.clone()))
            .collect();

        let mut idle = Vec::new();
        for (id, session) in snapshot {
            if session.lock().await.last_active() < cutoff {
                idle.push(id);
            }
        }

        if idle.is_empty() {
            return 0;
        }

        let mut sessions = self.sessions.write().await;
        for id in &idle {
            sessions.remove(id);
            debug!(session_id = %id, "Idle session pruned");
        }
        info!(count = idle.len(), "Pruned idle sessions");
        idle.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

/// Spawn a background task that periodically prunes idle sessions.
pub fn spawn_prune_task(manager: Arc<SessionManager>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(PRUNE_INTERVAL);
        loop {
            interval.tick().await;
            manager.prune_idle().await;
        }
    })
}
