// Shared test doubles for the integration tests
// Author: kelexine (https://github.com/kelexine)

#![allow(dead_code)]

use futures::future::BoxFuture;
use futures::FutureExt;
use parking_lot::Mutex;
use petcare_assist::error::{AssistError, Result};
use petcare_assist::gemini::{AiProvider, ProviderRequest};
use petcare_assist::places::{Location, PetService, PlacesProvider, ServiceKind, ADDRESS_NOT_FOUND};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::oneshot;

/// Provider whose replies are released by the test, in call order.
#[derive(Default)]
pub struct ScriptedProvider {
    calls: Mutex<Vec<ProviderRequest>>,
    replies: Mutex<VecDeque<oneshot::Receiver<Result<String>>>>,
}

impl ScriptedProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a reply for the next call; it resolves when the sender fires
    pub fn script(&self) -> oneshot::Sender<Result<String>> {
        let (tx, rx) = oneshot::channel();
        self.replies.lock().push_back(rx);
        tx
    }

    /// Queue an immediate answer
    pub fn answer(&self, text: &str) {
        let _ = self.script().send(Ok(text.to_string()));
    }

    /// Queue an immediate failure
    pub fn fail(&self, error: AssistError) {
        let _ = self.script().send(Err(error));
    }

    pub fn calls(&self) -> Vec<ProviderRequest> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Yield until at least `n` calls have reached the provider
    pub async fn wait_for_calls(&self, n: usize) {
        while self.call_count() < n {
            tokio::task::yield_now().await;
        }
    }
}

impl AiProvider for ScriptedProvider {
    fn submit(&self, request: ProviderRequest) -> BoxFuture<'_, Result<String>> {
        self.calls.lock().push(request);
        let reply = self.replies.lock().pop_front();
        async move {
            match reply {
                Some(rx) => rx
                    .await
                    .unwrap_or_else(|_| Err(AssistError::Provider("reply dropped".to_string()))),
                None => Err(AssistError::Provider("no scripted reply".to_string())),
            }
        }
        .boxed()
    }
}

/// Places provider with a fixed address book
pub struct FixedPlaces {
    pub home: Location,
    pub services: Vec<PetService>,
}

impl FixedPlaces {
    pub fn new() -> Self {
        Self {
            home: Location {
                latitude: 51.5074,
                longitude: -0.1278,
                address: "London, United Kingdom".to_string(),
            },
            services: vec![PetService {
                name: "Camden Vets".to_string(),
                address: "1 High St, London".to_string(),
                distance_km: 1.2,
                phone: Some("+44 20 0000 0000".to_string()),
                url: None,
            }],
        }
    }
}

impl PlacesProvider for FixedPlaces {
    fn resolve_address<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Location>> {
        async move {
            if text.eq_ignore_ascii_case("london") {
                Ok(self.home.clone())
            } else {
                Err(AssistError::places(ADDRESS_NOT_FOUND))
            }
        }
        .boxed()
    }

    fn find_nearby(
        &self,
        _latitude: f64,
        _longitude: f64,
        kind: ServiceKind,
    ) -> BoxFuture<'_, Result<Vec<PetService>>> {
        let services = match kind {
            ServiceKind::Vet => self.services.clone(),
            _ => Vec::new(),
        };
        async move { Ok(services) }.boxed()
    }
}
