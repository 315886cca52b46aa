//! Optimistic cart store.
//!
//! Every mutation follows the same cycle: snapshot the current lines, apply
//! the change locally so the caller sees it immediately, then issue the
//! durable request. A failed or timed-out request restores the whole
//! snapshot, never a partial state. Failures are not retried; the shopper
//! re-attempts the action.
//!
//! Operations take `&self` and the line state sits behind a mutex that is
//! never held across a suspension point, so other mutations may race an
//! in-flight one. A temporary line is therefore observable (and locally
//! mutable) while its durable create is still pending.

use std::{
    future::Future,
    sync::{Mutex, PoisonError},
    time::Duration,
};

use thiserror::Error;
use tokio::time;
use tracing::warn;
use uuid::Uuid;

use crate::{
    cart::{BackendError, CartBackend, CartLine, LineKey, NewLine},
    inventory::{self, StockError},
};

/// Deadline applied to every durable request unless overridden.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(10);

/// Errors surfaced by cart store operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The stock admission check refused the requested quantity.
    #[error(transparent)]
    Stock(#[from] StockError),

    /// No line with the given key exists in the store.
    #[error("cart line not found")]
    UnknownLine,

    /// The durable request failed; the cart was restored to its
    /// pre-mutation snapshot.
    #[error("durable store failed, cart restored")]
    Backend(#[source] BackendError),

    /// The durable request outlived its deadline and was resolved the same
    /// way as a failure.
    #[error("durable store timed out after {0:?}, cart restored")]
    TimedOut(Duration),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    key: LineKey,
    line: CartLine,
}

/// The shopper's pending line items, kept in sync with a [`CartBackend`].
#[derive(Debug)]
pub struct CartStore<B> {
    backend: B,
    deadline: Duration,
    lines: Mutex<Vec<Entry>>,
}

impl<B> CartStore<B> {
    /// Create an empty store over the given backend.
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self::with_deadline(backend, DEFAULT_DEADLINE)
    }

    /// Create an empty store with a custom durable-request deadline.
    #[must_use]
    pub fn with_deadline(backend: B, deadline: Duration) -> Self {
        Self {
            backend,
            deadline,
            lines: Mutex::new(Vec::new()),
        }
    }

    /// The backend this store reconciles against.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The current lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> Vec<(LineKey, CartLine)> {
        lock(&self.lines)
            .iter()
            .map(|entry| (entry.key, entry.line.clone()))
            .collect()
    }

    /// Look up a line by key.
    #[must_use]
    pub fn get(&self, key: LineKey) -> Option<CartLine> {
        lock(&self.lines)
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.line.clone())
    }

    /// Number of lines in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.lines).len()
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock(&self.lines).is_empty()
    }

    /// Cart total: the sum of each line's captured unit price times its
    /// quantity. Never re-fetches live prices.
    #[must_use]
    pub fn total(&self) -> u64 {
        lock(&self.lines)
            .iter()
            .map(|entry| entry.line.subtotal())
            .sum()
    }

    /// Unconditional local reset. Used after a confirmed order placement,
    /// when the durable rows are already gone.
    pub fn clear(&self) {
        lock(&self.lines).clear();
    }

    /// Seed the store from durable state, replacing any local lines. Used
    /// once on load, before the first mutation.
    pub fn hydrate(&self, lines: impl IntoIterator<Item = (Uuid, CartLine)>) {
        *lock(&self.lines) = lines
            .into_iter()
            .map(|(id, line)| Entry {
                key: LineKey::Durable(id),
                line,
            })
            .collect();
    }
}

impl<B: CartBackend> CartStore<B> {
    /// Add a line to the cart.
    ///
    /// An add for a (product, variant) pair already in the cart merges into
    /// the existing line instead of creating a duplicate, checked against
    /// the prospective total. A genuinely new line is inserted under a
    /// temporary key, then swapped to its durable identity (and the
    /// server-validated quantity) once the backend acknowledges it.
    ///
    /// # Errors
    ///
    /// Returns a [`StockError`] when the quantity is inadmissible, and
    /// [`CartError::Backend`] or [`CartError::TimedOut`] when the durable
    /// create fails; in the latter cases the temporary line is removed and
    /// the cart equals its pre-mutation state.
    pub async fn add_item(&self, new: NewLine) -> Result<LineKey, CartError> {
        enum Add {
            Merge(LineKey, u32),
            Insert(LineKey, Vec<Entry>),
        }

        let action = {
            let mut lines = lock(&self.lines);

            let merge = lines
                .iter_mut()
                .find(|e| e.line.product == new.product && e.line.variant == new.variant);

            if let Some(entry) = merge {
                inventory::check_addition(entry.line.quantity, new.quantity, new.stock)?;

                // Refresh the stock observation; the captured price stays
                // as it was at first add.
                entry.line.stock = new.stock;

                let key = entry.key;
                let merged = entry.line.quantity.saturating_add(new.quantity);

                Add::Merge(key, merged)
            } else {
                inventory::check_quantity(new.quantity, new.stock)?;

                let snapshot = lines.clone();
                let temp = LineKey::Temp(Uuid::now_v7());

                lines.push(Entry {
                    key: temp,
                    line: CartLine {
                        product: new.product,
                        variant: new.variant,
                        quantity: new.quantity,
                        unit_price: new.unit_price,
                        stock: new.stock,
                    },
                });

                Add::Insert(temp, snapshot)
            }
        };

        let (temp, snapshot) = match action {
            Add::Merge(key, merged) => {
                self.update_quantity(key, merged).await?;

                return Ok(key);
            }
            Add::Insert(temp, snapshot) => (temp, snapshot),
        };

        let created = self
            .confirm_or_revert(self.backend.create_item(new), snapshot)
            .await?;

        let durable = LineKey::Durable(created.id);

        // Replace the temporary line with the server-confirmed one. The line
        // may have been removed while the create was in flight; in that case
        // there is nothing to replace.
        let mut lines = lock(&self.lines);

        if let Some(entry) = lines.iter_mut().find(|e| e.key == temp) {
            entry.key = durable;
            entry.line.quantity = created.quantity;
        }

        Ok(durable)
    }

    /// Overwrite a line's quantity.
    ///
    /// A quantity of zero is a removal request, not a rejection. Temporary
    /// lines mutate locally only; their in-flight create carries the final
    /// durable state.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownLine`] for an unknown key, a
    /// [`StockError`] when the quantity exceeds the observed stock, and
    /// [`CartError::Backend`] or [`CartError::TimedOut`] when the durable
    /// update fails; on failure the whole pre-mutation snapshot is restored.
    pub async fn update_quantity(&self, key: LineKey, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return self.remove_item(key).await;
        }

        let snapshot = {
            let mut lines = lock(&self.lines);

            let stock = lines
                .iter()
                .find(|e| e.key == key)
                .map(|e| e.line.stock)
                .ok_or(CartError::UnknownLine)?;

            inventory::check_quantity(quantity, stock)?;

            let snapshot = lines.clone();

            if let Some(entry) = lines.iter_mut().find(|e| e.key == key) {
                entry.line.quantity = quantity;
            }

            snapshot
        };

        match key {
            LineKey::Temp(_) => Ok(()),
            LineKey::Durable(id) => {
                self.confirm_or_revert(self.backend.update_item(id, quantity), snapshot)
                    .await
            }
        }
    }

    /// Remove a line from the cart.
    ///
    /// Temporary lines are removed locally only; the durable store has no
    /// record of them yet, so no network call is issued.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownLine`] for an unknown key, and
    /// [`CartError::Backend`] or [`CartError::TimedOut`] when the durable
    /// delete fails; on failure the whole pre-removal snapshot is restored.
    pub async fn remove_item(&self, key: LineKey) -> Result<(), CartError> {
        let snapshot = {
            let mut lines = lock(&self.lines);

            let index = lines
                .iter()
                .position(|e| e.key == key)
                .ok_or(CartError::UnknownLine)?;

            let snapshot = lines.clone();

            lines.remove(index);

            snapshot
        };

        match key {
            LineKey::Temp(_) => Ok(()),
            LineKey::Durable(id) => {
                self.confirm_or_revert(self.backend.delete_item(id), snapshot)
                    .await
            }
        }
    }

    /// The confirm-or-revert half of every mutation: await the durable
    /// request under the deadline, and on failure or timeout put the
    /// snapshot back.
    async fn confirm_or_revert<T>(
        &self,
        request: impl Future<Output = Result<T, BackendError>>,
        snapshot: Vec<Entry>,
    ) -> Result<T, CartError> {
        match time::timeout(self.deadline, request).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(error)) => {
                warn!("cart mutation failed, restoring snapshot: {error}");

                *lock(&self.lines) = snapshot;

                Err(CartError::Backend(error))
            }
            Err(_elapsed) => {
                warn!(
                    "cart mutation timed out after {:?}, restoring snapshot",
                    self.deadline
                );

                *lock(&self.lines) = snapshot;

                Err(CartError::TimedOut(self.deadline))
            }
        }
    }
}

fn lock(lines: &Mutex<Vec<Entry>>) -> std::sync::MutexGuard<'_, Vec<Entry>> {
    lines.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    };

    use testresult::TestResult;
    use tokio::sync::Notify;

    use crate::cart::{DurableLine, backend::MockCartBackend};

    use super::*;

    fn new_line(quantity: u32, unit_price: u64, stock: u32) -> NewLine {
        NewLine {
            product: Uuid::now_v7(),
            variant: Uuid::now_v7(),
            quantity,
            unit_price,
            stock,
        }
    }

    /// Backend whose `create_item` blocks until released, for observing the
    /// store while a create is in flight.
    struct GatedBackend {
        id: Uuid,
        release: Arc<Notify>,
        update_called: AtomicBool,
        delete_called: AtomicBool,
    }

    impl GatedBackend {
        fn new(id: Uuid, release: Arc<Notify>) -> Self {
            Self {
                id,
                release,
                update_called: AtomicBool::new(false),
                delete_called: AtomicBool::new(false),
            }
        }
    }

    #[async_trait::async_trait]
    impl CartBackend for GatedBackend {
        async fn create_item(&self, line: NewLine) -> Result<DurableLine, BackendError> {
            self.release.notified().await;

            Ok(DurableLine {
                id: self.id,
                quantity: line.quantity,
            })
        }

        async fn update_item(&self, _id: Uuid, _quantity: u32) -> Result<(), BackendError> {
            self.update_called.store(true, Ordering::SeqCst);

            Ok(())
        }

        async fn delete_item(&self, _id: Uuid) -> Result<(), BackendError> {
            self.delete_called.store(true, Ordering::SeqCst);

            Ok(())
        }
    }

    /// Poll until the store holds at least one line, bounded by a deadline.
    async fn first_line<B>(store: &CartStore<B>) -> Result<(LineKey, CartLine), time::error::Elapsed> {
        time::timeout(Duration::from_secs(1), async {
            loop {
                if let Some(entry) = store.lines().into_iter().next() {
                    return entry;
                }

                time::sleep(Duration::from_millis(1)).await;
            }
        })
        .await
    }

    #[tokio::test]
    async fn add_item_swaps_temp_key_for_durable_identity() -> TestResult {
        let durable_id = Uuid::now_v7();

        let mut backend = MockCartBackend::new();

        backend.expect_create_item().once().return_once(move |line| {
            Ok(DurableLine {
                id: durable_id,
                quantity: line.quantity,
            })
        });

        let store = CartStore::new(backend);

        let key = store.add_item(new_line(2, 10_00, 5)).await?;

        assert_eq!(key, LineKey::Durable(durable_id));
        assert!(!key.is_temp());
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(key).map(|l| l.quantity), Some(2));

        Ok(())
    }

    #[tokio::test]
    async fn add_item_adopts_server_validated_quantity() -> TestResult {
        let durable_id = Uuid::now_v7();

        let mut backend = MockCartBackend::new();

        backend.expect_create_item().once().return_once(move |_| {
            Ok(DurableLine {
                id: durable_id,
                quantity: 1,
            })
        });

        let store = CartStore::new(backend);

        let key = store.add_item(new_line(2, 10_00, 5)).await?;

        assert_eq!(
            store.get(key).map(|l| l.quantity),
            Some(1),
            "server-validated quantity wins over the optimistic one"
        );

        Ok(())
    }

    #[tokio::test]
    async fn add_item_failure_leaves_no_temp_line_behind() {
        let mut backend = MockCartBackend::new();

        backend
            .expect_create_item()
            .once()
            .return_once(|_| Err(BackendError::Unavailable));

        let store = CartStore::new(backend);

        let result = store.add_item(new_line(2, 10_00, 5)).await;

        assert!(matches!(result, Err(CartError::Backend(_))), "got {result:?}");
        assert!(store.is_empty(), "temp line must not linger after failure");
    }

    #[tokio::test]
    async fn add_item_rejects_quantity_above_stock_without_backend_call() {
        let mut backend = MockCartBackend::new();

        backend.expect_create_item().never();

        let store = CartStore::new(backend);

        let result = store.add_item(new_line(4, 10_00, 3)).await;

        assert!(
            matches!(
                result,
                Err(CartError::Stock(StockError::InsufficientStock {
                    requested: 4,
                    available: 3,
                }))
            ),
            "got {result:?}"
        );
        assert!(store.is_empty(), "rejected add must not insert");
    }

    #[tokio::test]
    async fn adding_same_variant_twice_merges_into_one_line() -> TestResult {
        let durable_id = Uuid::now_v7();

        let mut backend = MockCartBackend::new();

        backend.expect_create_item().once().return_once(move |line| {
            Ok(DurableLine {
                id: durable_id,
                quantity: line.quantity,
            })
        });

        backend
            .expect_update_item()
            .once()
            .withf(move |id, quantity| *id == durable_id && *quantity == 3)
            .return_once(|_, _| Ok(()));

        let store = CartStore::new(backend);
        let first = new_line(1, 10_00, 5);
        let second = NewLine {
            quantity: 2,
            ..first.clone()
        };

        let key_a = store.add_item(first).await?;
        let key_b = store.add_item(second).await?;

        assert_eq!(key_a, key_b, "merge must reuse the existing line");
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(key_a).map(|l| l.quantity), Some(3));

        Ok(())
    }

    #[tokio::test]
    async fn merge_rejects_when_prospective_total_exceeds_stock() -> TestResult {
        let durable_id = Uuid::now_v7();

        let mut backend = MockCartBackend::new();

        backend.expect_create_item().once().return_once(move |line| {
            Ok(DurableLine {
                id: durable_id,
                quantity: line.quantity,
            })
        });

        backend.expect_update_item().never();

        let store = CartStore::new(backend);
        let first = new_line(2, 10_00, 3);
        let second = NewLine {
            quantity: 2,
            ..first.clone()
        };

        let key = store.add_item(first).await?;
        let result = store.add_item(second).await;

        assert!(
            matches!(
                result,
                Err(CartError::Stock(StockError::InsufficientStock {
                    requested: 4,
                    available: 3,
                }))
            ),
            "got {result:?}"
        );
        assert_eq!(
            store.get(key).map(|l| l.quantity),
            Some(2),
            "rejected merge must leave the quantity unchanged"
        );

        Ok(())
    }

    #[tokio::test]
    async fn update_quantity_above_stock_is_rejected_locally() -> TestResult {
        let durable_id = Uuid::now_v7();

        let mut backend = MockCartBackend::new();

        backend.expect_create_item().once().return_once(move |line| {
            Ok(DurableLine {
                id: durable_id,
                quantity: line.quantity,
            })
        });

        backend.expect_update_item().never();

        let store = CartStore::new(backend);

        let key = store.add_item(new_line(2, 10_00, 3)).await?;
        let result = store.update_quantity(key, 5).await;

        assert!(
            matches!(
                result,
                Err(CartError::Stock(StockError::InsufficientStock {
                    requested: 5,
                    available: 3,
                }))
            ),
            "got {result:?}"
        );
        assert_eq!(store.get(key).map(|l| l.quantity), Some(2));

        Ok(())
    }

    #[tokio::test]
    async fn update_quantity_zero_is_a_removal() -> TestResult {
        let durable_id = Uuid::now_v7();

        let mut backend = MockCartBackend::new();

        backend.expect_create_item().once().return_once(move |line| {
            Ok(DurableLine {
                id: durable_id,
                quantity: line.quantity,
            })
        });

        backend
            .expect_delete_item()
            .once()
            .withf(move |id| *id == durable_id)
            .return_once(|_| Ok(()));

        backend.expect_update_item().never();

        let store = CartStore::new(backend);

        let key = store.add_item(new_line(2, 10_00, 3)).await?;

        store.update_quantity(key, 0).await?;

        assert!(store.is_empty(), "zero quantity deletes the line");

        Ok(())
    }

    #[tokio::test]
    async fn update_failure_restores_the_whole_snapshot() -> TestResult {
        let id_a = Uuid::now_v7();
        let id_b = Uuid::now_v7();

        let mut backend = MockCartBackend::new();

        let mut ids = vec![id_b, id_a];

        backend.expect_create_item().times(2).returning(move |line| {
            Ok(DurableLine {
                id: ids.pop().unwrap_or_default(),
                quantity: line.quantity,
            })
        });

        backend
            .expect_update_item()
            .once()
            .return_once(|_, _| Err(BackendError::Unavailable));

        let store = CartStore::new(backend);

        let key_a = store.add_item(new_line(2, 10_00, 5)).await?;
        let _key_b = store.add_item(new_line(1, 25_00, 5)).await?;

        let before = store.lines();

        let result = store.update_quantity(key_a, 4).await;

        assert!(matches!(result, Err(CartError::Backend(_))), "got {result:?}");
        assert_eq!(store.lines(), before, "cart must equal pre-mutation state");

        Ok(())
    }

    #[tokio::test]
    async fn temp_line_updates_locally_while_create_is_in_flight() -> TestResult {
        let durable_id = Uuid::now_v7();
        let release = Arc::new(Notify::new());
        let backend = GatedBackend::new(durable_id, Arc::clone(&release));

        let store = Arc::new(CartStore::new(backend));

        let adder = {
            let store = Arc::clone(&store);

            tokio::spawn(async move { store.add_item(new_line(2, 10_00, 5)).await })
        };

        let (key, _line) = first_line(store.as_ref()).await?;

        assert!(key.is_temp(), "line must still be under its temporary key");

        // Mutating the temp line needs no network call; there is nothing
        // durable to update yet.
        store.update_quantity(key, 3).await?;

        assert_eq!(store.get(key).map(|l| l.quantity), Some(3));
        assert!(
            !store.backend().update_called.load(Ordering::SeqCst),
            "temp update must stay local"
        );

        release.notify_one();

        let key = adder.await??;

        assert_eq!(key, LineKey::Durable(durable_id));
        assert_eq!(
            store.get(key).map(|l| l.quantity),
            Some(2),
            "server confirmation replaces the temporary line"
        );

        Ok(())
    }

    #[tokio::test]
    async fn temp_line_removal_issues_no_delete() -> TestResult {
        let durable_id = Uuid::now_v7();
        let release = Arc::new(Notify::new());
        let backend = GatedBackend::new(durable_id, Arc::clone(&release));

        let store = Arc::new(CartStore::new(backend));

        let adder = {
            let store = Arc::clone(&store);

            tokio::spawn(async move { store.add_item(new_line(2, 10_00, 5)).await })
        };

        let (key, _line) = first_line(store.as_ref()).await?;

        assert!(key.is_temp(), "line must still be under its temporary key");

        store.remove_item(key).await?;

        assert!(store.is_empty());
        assert!(
            !store.backend().delete_called.load(Ordering::SeqCst),
            "temp removal must not reach the durable store"
        );

        release.notify_one();

        adder.await??;

        assert!(
            store.is_empty(),
            "confirmation of a removed temp line must not resurrect it"
        );

        Ok(())
    }

    #[tokio::test]
    async fn remove_failure_restores_the_whole_snapshot() -> TestResult {
        let durable_id = Uuid::now_v7();

        let mut backend = MockCartBackend::new();

        backend.expect_create_item().once().return_once(move |line| {
            Ok(DurableLine {
                id: durable_id,
                quantity: line.quantity,
            })
        });

        backend
            .expect_delete_item()
            .once()
            .return_once(|_| Err(BackendError::Rejected("busy".to_string())));

        let store = CartStore::new(backend);

        let key = store.add_item(new_line(2, 10_00, 5)).await?;
        let before = store.lines();

        let result = store.remove_item(key).await;

        assert!(matches!(result, Err(CartError::Backend(_))), "got {result:?}");
        assert_eq!(store.lines(), before, "cart must equal pre-removal state");

        Ok(())
    }

    #[tokio::test]
    async fn removing_unknown_key_is_reported() {
        let mut backend = MockCartBackend::new();

        backend.expect_delete_item().never();

        let store = CartStore::new(backend);

        let result = store.remove_item(LineKey::Temp(Uuid::now_v7())).await;

        assert!(matches!(result, Err(CartError::UnknownLine)), "got {result:?}");
    }

    #[tokio::test]
    async fn stalled_backend_resolves_to_the_rollback_path() {
        struct StalledBackend;

        #[async_trait::async_trait]
        impl CartBackend for StalledBackend {
            async fn create_item(&self, _line: NewLine) -> Result<DurableLine, BackendError> {
                std::future::pending().await
            }

            async fn update_item(&self, _id: Uuid, _quantity: u32) -> Result<(), BackendError> {
                std::future::pending().await
            }

            async fn delete_item(&self, _id: Uuid) -> Result<(), BackendError> {
                std::future::pending().await
            }
        }

        let deadline = Duration::from_millis(20);
        let store = CartStore::with_deadline(StalledBackend, deadline);

        let result = store.add_item(new_line(2, 10_00, 5)).await;

        assert!(
            matches!(result, Err(CartError::TimedOut(d)) if d == deadline),
            "got {result:?}"
        );
        assert!(store.is_empty(), "timed-out create must remove the temp line");
    }

    #[tokio::test]
    async fn total_uses_captured_prices() -> TestResult {
        let mut backend = MockCartBackend::new();

        backend.expect_create_item().times(2).returning(|line| {
            Ok(DurableLine {
                id: Uuid::now_v7(),
                quantity: line.quantity,
            })
        });

        let store = CartStore::new(backend);

        store.add_item(new_line(3, 100_000, 3)).await?;
        store.add_item(new_line(2, 25_000, 5)).await?;

        assert_eq!(store.total(), 350_000);

        store.clear();

        assert!(store.is_empty());
        assert_eq!(store.total(), 0);

        Ok(())
    }
}
