use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};
use uuid::Uuid;

use crate::interface_adapters::gateway::SimulatedAuthGateway;
use crate::use_cases::{AuthFormController, LoginFlow};

pub type FormFlow = LoginFlow<SimulatedAuthGateway>;

// Timing applied to every form created through the HTTP surface.
#[derive(Clone, Copy, Debug)]
pub struct FormTimings {
    pub submit_delay: Duration,
    pub redirect_delay: Duration,
    /// Forms untouched for this long are closed. Zero keeps forms forever.
    pub idle_ttl: Duration,
}

struct FormEntry {
    flow: Arc<FormFlow>,
    last_seen: Instant,
}

// Application state holding one login flow per open form.
#[derive(Clone)]
pub struct AppState {
    forms: Arc<RwLock<HashMap<String, FormEntry>>>,
    pub timings: FormTimings,
}

impl AppState {
    pub fn new(timings: FormTimings) -> Self {
        Self {
            forms: Arc::new(RwLock::new(HashMap::new())),
            timings,
        }
    }

    // Opens a fresh form and returns its id.
    pub async fn open_form(&self) -> String {
        let form_id = Uuid::new_v4().to_string();
        let controller =
            AuthFormController::new(SimulatedAuthGateway::new(self.timings.submit_delay));
        let flow = Arc::new(LoginFlow::new(controller, self.timings.redirect_delay));

        let mut forms = self.forms.write().await;
        forms.insert(
            form_id.clone(),
            FormEntry {
                flow,
                last_seen: Instant::now(),
            },
        );
        form_id
    }

    /// Looks a form up and marks it as recently used.
    pub async fn form(&self, form_id: &str) -> Option<Arc<FormFlow>> {
        let mut forms = self.forms.write().await;
        let entry = forms.get_mut(form_id)?;
        entry.last_seen = Instant::now();
        Some(Arc::clone(&entry.flow))
    }

    pub async fn form_count(&self) -> usize {
        self.forms.read().await.len()
    }

    // Removes the form and tears down any work still pending on it.
    pub async fn close_form(&self, form_id: &str) -> bool {
        let removed = {
            let mut forms = self.forms.write().await;
            forms.remove(form_id)
        };
        match removed {
            Some(entry) => {
                entry.flow.shutdown();
                true
            }
            None => false,
        }
    }

    /// Closes every form idle for at least `idle_ttl` and returns how many went.
    ///
    /// A form with a submission in flight is kept until it resolves.
    pub async fn evict_idle(&self) -> usize {
        let ttl = self.timings.idle_ttl;
        if ttl.is_zero() {
            return 0;
        }

        let now = Instant::now();
        let expired: Vec<(String, Arc<FormFlow>)> = {
            let mut forms = self.forms.write().await;
            let idle: Vec<String> = forms
                .iter()
                .filter(|(_, entry)| {
                    now.duration_since(entry.last_seen) >= ttl
                        && !entry.flow.controller().is_submitting()
                })
                .map(|(form_id, _)| form_id.clone())
                .collect();
            idle.into_iter()
                .filter_map(|form_id| forms.remove(&form_id).map(|entry| (form_id, entry.flow)))
                .collect()
        };

        for (form_id, flow) in &expired {
            flow.shutdown();
            debug!(%form_id, "idle form evicted");
        }
        expired.len()
    }

    /// Spawns the background task that evicts idle forms. None when eviction is off.
    pub fn spawn_idle_sweeper(&self) -> Option<JoinHandle<()>> {
        let ttl = self.timings.idle_ttl;
        if ttl.is_zero() {
            return None;
        }

        let state = self.clone();
        let period = (ttl / 2).max(Duration::from_millis(1));
        Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let evicted = state.evict_idle().await;
                if evicted > 0 {
                    info!(evicted, "closed idle forms");
                }
            }
        }))
    }
}
