/*
[INPUT]:  Adapter registry, durable store, translator and notification sink
[OUTPUT]: Current wallet state, persisted wallet-info blob, single active listener
[POS]:    Wallet layer - session manager orchestrating connect/disconnect
[UPDATE]: When connect/disconnect semantics or persistence rules change
*/

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use crate::http::MooniumError;
use crate::i18n::Translator;
use crate::notify::{Notification, Notifier};
use crate::storage::KeyValueStore;
use crate::types::Blockchain;

use super::adapter::{AdapterRegistry, ListenerHandle, WalletPatcher};
use super::WalletInfo;

/// Storage key owned by the wallet session
pub const WALLET_INFO_KEY: &str = "wallet-info";

struct ActiveListener {
    blockchain: Blockchain,
    handle: ListenerHandle,
}

/// Owns the wallet state and its persisted copy.
///
/// One instance per running client; share it behind an `Arc`.
pub struct WalletSession {
    registry: AdapterRegistry,
    store: Arc<dyn KeyValueStore>,
    translator: Arc<Translator>,
    notifier: Arc<dyn Notifier>,
    state: Arc<RwLock<WalletInfo>>,
    listener: Mutex<Option<ActiveListener>>,
    epoch: AtomicU64,
}

impl WalletSession {
    /// Restore the previous session from storage without contacting any provider.
    ///
    /// A restored connected session gets its chain's listener attached.
    pub fn restore(
        registry: AdapterRegistry,
        store: Arc<dyn KeyValueStore>,
        translator: Arc<Translator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let info = load_persisted(store.as_ref());
        tracing::debug!(connected = info.is_connected(), "wallet session restored");

        let session = Self {
            registry,
            store,
            translator,
            notifier,
            state: Arc::new(RwLock::new(info)),
            listener: Mutex::new(None),
            epoch: AtomicU64::new(0),
        };
        session.sync_listener();
        session
    }

    /// Snapshot of the current state
    pub fn info(&self) -> WalletInfo {
        read(&self.state).clone()
    }

    pub fn is_connected(&self) -> bool {
        read(&self.state).is_connected()
    }

    /// Chain whose provider listener is currently attached
    pub fn active_listener(&self) -> Option<Blockchain> {
        lock(&self.listener).as_ref().map(|active| active.blockchain)
    }

    pub fn supported_blockchains(&self) -> Vec<Blockchain> {
        self.registry.supported()
    }

    /// Connect through the adapter for `blockchain`.
    ///
    /// Failures leave the state untouched and surface as a notification.
    /// A result that arrives after a newer connect/disconnect started is dropped.
    pub async fn connect(&self, blockchain: Blockchain) -> WalletInfo {
        let epoch = self.next_epoch();

        let adapter = match self.registry.get(blockchain) {
            Ok(adapter) => adapter,
            Err(err) => {
                self.report(&err);
                return self.info();
            }
        };

        match adapter.connect().await {
            Ok(info) if self.is_current(epoch) => self.replace(info),
            Ok(_) => {
                tracing::debug!(%blockchain, "discarding superseded wallet connect result");
            }
            Err(err) => {
                tracing::warn!(%blockchain, error = %err, "wallet connect failed");
                self.report(&err);
            }
        }

        self.info()
    }

    /// Disconnect locally first, then let the adapter validate.
    ///
    /// Adapter errors are only logged: the local state already reflects the
    /// user's intent.
    pub async fn disconnect(&self, blockchain: Blockchain) -> WalletInfo {
        self.next_epoch();
        self.replace(WalletInfo::Disconnected);

        let result = match self.registry.get(blockchain) {
            Ok(adapter) => adapter.disconnect().await,
            Err(err) => Err(err),
        };
        if let Err(err) = result {
            tracing::warn!(%blockchain, error = %err, "wallet adapter disconnect failed");
        }

        self.info()
    }

    /// Set the in-memory state, rewrite the persisted blob and re-home the listener.
    fn replace(&self, info: WalletInfo) {
        *write(&self.state) = info.clone();
        persist(self.store.as_ref(), &info);
        self.sync_listener();
    }

    /// Keep exactly one listener, attached to the current chain.
    fn sync_listener(&self) {
        let current = read(&self.state).blockchain();
        let mut active = lock(&self.listener);

        if active.as_ref().map(|listener| listener.blockchain) == current {
            return;
        }

        if let Some(mut previous) = active.take() {
            previous.handle.cancel();
            tracing::debug!(blockchain = %previous.blockchain, "wallet listener detached");
        }

        let Some(blockchain) = current else {
            return;
        };
        match self.registry.get(blockchain) {
            Ok(adapter) => {
                let handle = adapter.attach_listener(self.patcher());
                *active = Some(ActiveListener { blockchain, handle });
                tracing::debug!(%blockchain, "wallet listener attached");
            }
            Err(err) => tracing::warn!(%blockchain, error = %err, "cannot attach wallet listener"),
        }
    }

    fn patcher(&self) -> WalletPatcher {
        let state = Arc::clone(&self.state);
        let store = Arc::clone(&self.store);
        Arc::new(move |patch| {
            let mut guard = write(&state);
            if guard.apply(patch) {
                persist(store.as_ref(), &guard);
            }
        })
    }

    fn report(&self, err: &MooniumError) {
        self.notifier
            .notify(Notification::from_error(err, &self.translator));
    }

    fn next_epoch(&self) -> u64 {
        self.epoch.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, epoch: u64) -> bool {
        self.epoch.load(Ordering::SeqCst) == epoch
    }
}

impl std::fmt::Debug for WalletSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletSession")
            .field("info", &self.info())
            .field("active_listener", &self.active_listener())
            .finish()
    }
}

fn load_persisted(store: &dyn KeyValueStore) -> WalletInfo {
    let Some(blob) = store.get(WALLET_INFO_KEY) else {
        return WalletInfo::Disconnected;
    };
    match WalletInfo::from_persisted(&blob) {
        Ok(info) => info,
        Err(err) => {
            tracing::warn!(error = %err, "dropping unreadable wallet-info blob");
            if let Err(err) = store.remove(WALLET_INFO_KEY) {
                tracing::warn!(error = %err, "failed to remove wallet-info blob");
            }
            WalletInfo::Disconnected
        }
    }
}

/// Clear the stale blob, then store the new one only when fully populated.
fn persist(store: &dyn KeyValueStore, info: &WalletInfo) {
    if let Err(err) = store.remove(WALLET_INFO_KEY) {
        tracing::warn!(error = %err, "failed to clear wallet-info blob");
    }
    let blob = match info.to_persisted() {
        Ok(Some(blob)) => blob,
        Ok(None) => return,
        Err(err) => {
            tracing::warn!(error = %err, "failed to encode wallet-info blob");
            return;
        }
    };
    if let Err(err) = store.set(WALLET_INFO_KEY, &blob) {
        tracing::warn!(error = %err, "failed to persist wallet-info blob");
    }
}

fn read<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
