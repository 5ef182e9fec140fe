use std::sync::Arc;

use liveness_core::{SessionOrchestrator, SessionStore, VerificationClient};

use crate::auth::{CredentialGate, OperatorCredentials};
use crate::render::Renderer;

pub struct AppState {
    pub orchestrator: SessionOrchestrator,
    pub gate: Arc<CredentialGate>,
    pub renderer: Renderer,
}

impl AppState {
    pub fn new(
        client: Arc<dyn VerificationClient>,
        store: SessionStore,
        operator: OperatorCredentials,
    ) -> Result<Arc<Self>, minijinja::Error> {
        Ok(Arc::new(Self {
            orchestrator: SessionOrchestrator::new(client, store),
            gate: Arc::new(CredentialGate::new(operator)),
            renderer: Renderer::new()?,
        }))
    }

    pub fn store(&self) -> &SessionStore {
        self.orchestrator.store()
    }
}
