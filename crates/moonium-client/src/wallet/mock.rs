/*
[INPUT]:  Scripted accounts, chain ids and provider events
[OUTPUT]: In-process stand-ins for injected wallet providers
[POS]:    Wallet layer - test doubles for adapters and sessions
[UPDATE]: When provider traits gain methods
*/

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Notify;

use crate::http::{MooniumError, Result};

use super::provider::{
    EthereumProvider, EventHandler, ProviderEvent, ProviderEventKind, SolanaProvider,
    SubscriptionId,
};

#[derive(Default)]
struct Listeners {
    next_id: AtomicU64,
    handlers: Mutex<BTreeMap<SubscriptionId, (ProviderEventKind, EventHandler)>>,
}

impl Listeners {
    fn add(&self, kind: ProviderEventKind, handler: EventHandler) -> SubscriptionId {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        lock(&self.handlers).insert(id, (kind, handler));
        id
    }

    fn remove(&self, id: SubscriptionId) {
        lock(&self.handlers).remove(&id);
    }

    fn count(&self) -> usize {
        lock(&self.handlers).len()
    }

    fn emit(&self, event: &ProviderEvent) {
        // Handlers run outside the lock so they may re-enter the provider.
        let matching: Vec<EventHandler> = lock(&self.handlers)
            .values()
            .filter(|(kind, _)| *kind == event.kind())
            .map(|(_, handler)| Arc::clone(handler))
            .collect();
        for handler in matching {
            handler(event);
        }
    }
}

/// Scripted Metamask-like provider
pub struct MockEthereumProvider {
    is_metamask: bool,
    accounts: Mutex<Vec<String>>,
    chain_id: Mutex<String>,
    rejection: Mutex<Option<String>>,
    gate: Mutex<Option<Arc<Notify>>>,
    requests: Mutex<HashMap<String, usize>>,
    listeners: Listeners,
}

impl MockEthereumProvider {
    pub fn new(accounts: Vec<String>, chain_id: &str) -> Self {
        Self {
            is_metamask: true,
            accounts: Mutex::new(accounts),
            chain_id: Mutex::new(chain_id.to_string()),
            rejection: Mutex::new(None),
            gate: Mutex::new(None),
            requests: Mutex::new(HashMap::new()),
            listeners: Listeners::default(),
        }
    }

    /// Provider present but not identifying as Metamask
    pub fn not_metamask(mut self) -> Self {
        self.is_metamask = false;
        self
    }

    pub fn set_accounts(&self, accounts: Vec<String>) {
        *lock(&self.accounts) = accounts;
    }

    pub fn set_chain_id(&self, chain_id: &str) {
        *lock(&self.chain_id) = chain_id.to_string();
    }

    /// Make every subsequent request fail with `message`
    pub fn reject_requests(&self, message: &str) {
        *lock(&self.rejection) = Some(message.to_string());
    }

    /// Suspend `eth_requestAccounts` until `gate` is notified, like a pending user prompt
    pub fn hold_account_prompt(&self, gate: Arc<Notify>) {
        *lock(&self.gate) = Some(gate);
    }

    pub fn request_count(&self, method: &str) -> usize {
        lock(&self.requests).get(method).copied().unwrap_or(0)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.count()
    }

    pub fn emit(&self, event: ProviderEvent) {
        self.listeners.emit(&event);
    }
}

#[async_trait]
impl EthereumProvider for MockEthereumProvider {
    fn is_metamask(&self) -> bool {
        self.is_metamask
    }

    async fn request(&self, method: &str) -> Result<Value> {
        *lock(&self.requests).entry(method.to_string()).or_default() += 1;

        if method == "eth_requestAccounts" {
            let gate = lock(&self.gate).clone();
            if let Some(gate) = gate {
                gate.notified().await;
            }
        }
        if let Some(message) = lock(&self.rejection).clone() {
            return Err(MooniumError::Provider(message));
        }

        match method {
            "eth_requestAccounts" | "eth_accounts" => Ok(Value::from(lock(&self.accounts).clone())),
            "eth_chainId" => Ok(Value::from(lock(&self.chain_id).clone())),
            other => Err(MooniumError::Provider(format!("unsupported method {other}"))),
        }
    }

    fn on(&self, kind: ProviderEventKind, handler: EventHandler) -> SubscriptionId {
        self.listeners.add(kind, handler)
    }

    fn remove_listener(&self, id: SubscriptionId) {
        self.listeners.remove(id);
    }
}

/// Scripted Phantom-like provider
pub struct MockSolanaProvider {
    is_phantom: bool,
    supports_events: bool,
    public_key: Mutex<String>,
    connected: AtomicBool,
    rejection: Mutex<Option<String>>,
    listeners: Listeners,
}

impl MockSolanaProvider {
    pub fn new(public_key: &str) -> Self {
        Self {
            is_phantom: true,
            supports_events: false,
            public_key: Mutex::new(public_key.to_string()),
            connected: AtomicBool::new(false),
            rejection: Mutex::new(None),
            listeners: Listeners::default(),
        }
    }

    pub fn not_phantom(mut self) -> Self {
        self.is_phantom = false;
        self
    }

    /// Expose `accountChanged` events
    pub fn with_events(mut self) -> Self {
        self.supports_events = true;
        self
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    pub fn reject_requests(&self, message: &str) {
        *lock(&self.rejection) = Some(message.to_string());
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.count()
    }

    pub fn emit(&self, event: ProviderEvent) {
        self.listeners.emit(&event);
    }
}

#[async_trait]
impl SolanaProvider for MockSolanaProvider {
    fn is_phantom(&self) -> bool {
        self.is_phantom
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn connect(&self) -> Result<String> {
        if let Some(message) = lock(&self.rejection).clone() {
            return Err(MooniumError::Provider(message));
        }
        self.connected.store(true, Ordering::SeqCst);
        Ok(lock(&self.public_key).clone())
    }

    fn on(&self, kind: ProviderEventKind, handler: EventHandler) -> Option<SubscriptionId> {
        self.supports_events.then(|| self.listeners.add(kind, handler))
    }

    fn remove_listener(&self, id: SubscriptionId) {
        self.listeners.remove(id);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
