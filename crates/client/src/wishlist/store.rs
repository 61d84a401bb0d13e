//! The wishlist store: single writer of [`WishlistState`].
//!
//! Every operation draws a sequence number from a per-store counter before
//! it suspends on the network. When a response arrives it is applied only if
//! its sequence number is newer than the last applied one; older responses
//! are discarded. Without this, two in-flight mutations resolving out of
//! order would let the earlier request's snapshot overwrite the later one.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tracing::{debug, warn};

use shopfront_core::ProductId;

use super::state::{WishlistItem, WishlistState};
use crate::api::ApiError;
use crate::error::add_breadcrumb;

/// Remote operations the wishlist store depends on.
///
/// Each mutation returns the full updated collection.
pub trait WishlistApi {
    /// `GET /wishlist`.
    fn fetch_wishlist(&self) -> impl Future<Output = Result<Vec<WishlistItem>, ApiError>> + Send;

    /// `POST /wishlist/add/{product_id}`.
    fn add_to_wishlist(
        &self,
        product_id: &ProductId,
    ) -> impl Future<Output = Result<Vec<WishlistItem>, ApiError>> + Send;

    /// `DELETE /wishlist/remove/{product_id}`.
    fn remove_from_wishlist(
        &self,
        product_id: &ProductId,
    ) -> impl Future<Output = Result<Vec<WishlistItem>, ApiError>> + Send;

    /// `DELETE /wishlist/clear`. Success means the list is now empty.
    fn clear_wishlist(&self) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// How an operation's response was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The server snapshot replaced `items`.
    Applied,
    /// The request failed; `error` is set and `items` kept.
    Failed,
    /// A newer response (or a sign-out) already landed; this one was dropped.
    Superseded,
}

#[derive(Debug, Clone, Copy)]
enum Operation {
    Fetch,
    Add,
    Remove,
    Clear,
}

impl Operation {
    const fn name(self) -> &'static str {
        match self {
            Self::Fetch => "fetch",
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Clear => "clear",
        }
    }

    const fn fallback_message(self) -> &'static str {
        match self {
            Self::Fetch => "Failed to load wishlist",
            Self::Add => "Failed to add to wishlist",
            Self::Remove => "Failed to remove from wishlist",
            Self::Clear => "Failed to clear wishlist",
        }
    }
}

/// Mirrors the signed-in shopper's remote wishlist.
pub struct WishlistStore<A> {
    api: A,
    state: watch::Sender<WishlistState>,
    /// Highest sequence number handed out.
    issued: AtomicU64,
    /// Sequence number of the last applied response (or sign-out).
    applied: AtomicU64,
}

impl<A: WishlistApi> WishlistStore<A> {
    /// Create an empty store backed by `api`.
    pub fn new(api: A) -> Self {
        let (state, _) = watch::channel(WishlistState::default());
        Self {
            api,
            state,
            issued: AtomicU64::new(0),
            applied: AtomicU64::new(0),
        }
    }

    /// Current wishlist snapshot.
    #[must_use]
    pub fn snapshot(&self) -> WishlistState {
        self.state.borrow().clone()
    }

    /// Subscribe to wishlist snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<WishlistState> {
        self.state.subscribe()
    }

    /// React to an authentication change: fetch on sign-in, reset on sign-out.
    pub async fn set_authenticated(&self, authenticated: bool) -> Completion {
        if authenticated {
            self.fetch().await
        } else {
            self.reset();
            Completion::Applied
        }
    }

    /// Drop all items and invalidate every in-flight request.
    pub fn reset(&self) {
        self.state.send_modify(|state| {
            let latest = self.issued.load(Ordering::SeqCst);
            self.applied.store(latest, Ordering::SeqCst);
            *state = WishlistState::default();
        });
        debug!("Wishlist reset");
    }

    /// Load the wishlist from the server.
    pub async fn fetch(&self) -> Completion {
        let seq = self.begin(Operation::Fetch, None);
        let result = self.api.fetch_wishlist().await;
        self.settle(seq, Operation::Fetch, result)
    }

    /// Add a product; the server's returned list replaces `items`.
    pub async fn add(&self, product_id: &ProductId) -> Completion {
        let seq = self.begin(Operation::Add, Some(product_id));
        let result = self.api.add_to_wishlist(product_id).await;
        self.settle(seq, Operation::Add, result)
    }

    /// Remove a product; the server's returned list replaces `items`.
    pub async fn remove(&self, product_id: &ProductId) -> Completion {
        let seq = self.begin(Operation::Remove, Some(product_id));
        let result = self.api.remove_from_wishlist(product_id).await;
        self.settle(seq, Operation::Remove, result)
    }

    /// Clear the wishlist; on success `items` becomes empty.
    pub async fn clear(&self) -> Completion {
        let seq = self.begin(Operation::Clear, None);
        let result = self.api.clear_wishlist().await.map(|()| Vec::new());
        self.settle(seq, Operation::Clear, result)
    }

    fn begin(&self, op: Operation, product_id: Option<&ProductId>) -> u64 {
        match product_id {
            Some(id) => add_breadcrumb("wishlist", op.name(), Some(&[("product_id", id.as_str())])),
            None => add_breadcrumb("wishlist", op.name(), None),
        }

        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|state| state.loading = true);
        debug!(op = op.name(), seq, "Wishlist request issued");
        seq
    }

    fn settle(
        &self,
        seq: u64,
        op: Operation,
        result: Result<Vec<WishlistItem>, ApiError>,
    ) -> Completion {
        let mut completion = Completion::Superseded;

        // The watch lock serializes the sequence check with the state write
        self.state.send_if_modified(|state| {
            if seq <= self.applied.load(Ordering::SeqCst) {
                return false;
            }
            self.applied.store(seq, Ordering::SeqCst);
            state.loading = seq < self.issued.load(Ordering::SeqCst);

            match result {
                Ok(items) => {
                    debug!(op = op.name(), seq, count = items.len(), "Wishlist updated");
                    state.items = items;
                    state.error = None;
                    completion = Completion::Applied;
                }
                Err(e) => {
                    warn!(op = op.name(), seq, error = %e, "Wishlist request failed");
                    state.error = Some(
                        e.server_message()
                            .unwrap_or_else(|| op.fallback_message())
                            .to_string(),
                    );
                    completion = Completion::Failed;
                }
            }
            true
        });

        if completion == Completion::Superseded {
            debug!(op = op.name(), seq, "Discarding stale wishlist response");
        }
        completion
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::VecDeque;
    use std::pin::Pin;
    use std::sync::Mutex;
    use std::task::Poll;

    use rust_decimal::Decimal;
    use tokio::sync::oneshot;

    use super::*;

    type Reply = Result<Vec<WishlistItem>, ApiError>;

    /// Fake API whose replies are released by the test, one per call.
    struct GatedApi {
        gates: Mutex<VecDeque<oneshot::Receiver<Reply>>>,
        calls: Mutex<Vec<String>>,
    }

    impl GatedApi {
        fn new(gates: Vec<oneshot::Receiver<Reply>>) -> Self {
            Self {
                gates: Mutex::new(gates.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Fake whose replies are all available immediately.
        fn scripted(replies: Vec<Reply>) -> Self {
            let gates = replies
                .into_iter()
                .map(|reply| {
                    let (tx, rx) = oneshot::channel();
                    tx.send(reply).unwrap();
                    rx
                })
                .collect();
            Self::new(gates)
        }

        fn next(&self, call: String) -> oneshot::Receiver<Reply> {
            self.calls.lock().unwrap().push(call);
            self.gates.lock().unwrap().pop_front().unwrap()
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    async fn released(gate: oneshot::Receiver<Reply>) -> Reply {
        gate.await
            .unwrap_or_else(|_| Err(ApiError::Parse("gate dropped".to_string())))
    }

    impl WishlistApi for GatedApi {
        async fn fetch_wishlist(&self) -> Reply {
            released(self.next("fetch".to_string())).await
        }

        async fn add_to_wishlist(&self, product_id: &ProductId) -> Reply {
            released(self.next(format!("add:{product_id}"))).await
        }

        async fn remove_from_wishlist(&self, product_id: &ProductId) -> Reply {
            released(self.next(format!("remove:{product_id}"))).await
        }

        async fn clear_wishlist(&self) -> Result<(), ApiError> {
            released(self.next("clear".to_string())).await.map(|_| ())
        }
    }

    fn item(id: &str) -> WishlistItem {
        WishlistItem {
            id: ProductId::new(id),
            name: format!("Item {id}"),
            price: Decimal::new(100, 0),
            image: String::new(),
        }
    }

    async fn poll_once<F: Future + Unpin>(fut: &mut F) -> Poll<F::Output> {
        std::future::poll_fn(|cx| Poll::Ready(Pin::new(&mut *fut).poll(cx))).await
    }

    fn network_error() -> ApiError {
        ApiError::Parse("connection reset".to_string())
    }

    #[tokio::test]
    async fn test_sign_in_fetches_and_sign_out_resets() {
        let store = WishlistStore::new(GatedApi::scripted(vec![Ok(vec![item("p1"), item("p2")])]));

        assert_eq!(store.set_authenticated(true).await, Completion::Applied);
        let state = store.snapshot();
        assert_eq!(state.items.len(), 2);
        assert!(!state.loading);
        assert_eq!(state.error, None);

        assert_eq!(store.set_authenticated(false).await, Completion::Applied);
        assert_eq!(store.snapshot(), WishlistState::default());
    }

    #[tokio::test]
    async fn test_mutations_replace_items_wholesale() {
        let api = GatedApi::scripted(vec![
            Ok(vec![item("p1")]),
            // Server returns the full list, including items this client never saw
            Ok(vec![item("p1"), item("p2"), item("p9")]),
            Ok(vec![item("p9")]),
            Ok(vec![]),
        ]);
        let store = WishlistStore::new(api);

        store.fetch().await;
        assert_eq!(store.add(&ProductId::new("p2")).await, Completion::Applied);
        assert_eq!(store.snapshot().items.len(), 3);

        assert_eq!(store.remove(&ProductId::new("p1")).await, Completion::Applied);
        assert_eq!(store.snapshot().items, vec![item("p9")]);

        assert_eq!(store.clear().await, Completion::Applied);
        assert!(store.snapshot().items.is_empty());

        assert_eq!(
            store.api.calls(),
            vec!["fetch", "add:p2", "remove:p1", "clear"]
        );
    }

    #[tokio::test]
    async fn test_add_failure_keeps_items_and_sets_error() {
        let api = GatedApi::scripted(vec![Ok(vec![item("p0")]), Err(network_error())]);
        let store = WishlistStore::new(api);
        store.fetch().await;
        let before = store.snapshot().items;

        let completion = store.add(&ProductId::new("p1")).await;

        let state = store.snapshot();
        assert_eq!(completion, Completion::Failed);
        assert_eq!(state.items, before);
        assert_eq!(state.error.as_deref(), Some("Failed to add to wishlist"));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_failure_prefers_server_message() {
        let api = GatedApi::scripted(vec![Err(ApiError::Api {
            status: 400,
            message: "Product already in wishlist".to_string(),
        })]);
        let store = WishlistStore::new(api);

        store.add(&ProductId::new("p1")).await;

        assert_eq!(
            store.snapshot().error.as_deref(),
            Some("Product already in wishlist")
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_is_stale_but_present() {
        let api = GatedApi::scripted(vec![
            Ok(vec![item("p1")]),
            Err(ApiError::Unauthorized),
            Ok(vec![item("p1"), item("p2")]),
        ]);
        let store = WishlistStore::new(api);
        store.fetch().await;

        assert_eq!(store.fetch().await, Completion::Failed);
        let state = store.snapshot();
        assert_eq!(state.items, vec![item("p1")]);
        assert_eq!(state.error.as_deref(), Some("Failed to load wishlist"));

        // The next success clears the error
        store.fetch().await;
        assert_eq!(store.snapshot().error, None);
    }

    #[tokio::test]
    async fn test_loading_is_set_while_request_is_in_flight() {
        let (tx, rx) = oneshot::channel();
        let store = WishlistStore::new(GatedApi::new(vec![rx]));
        let mut rx_state = store.subscribe();

        let mut fetch = Box::pin(store.fetch());
        assert!(poll_once(&mut fetch).await.is_pending());
        assert!(rx_state.borrow_and_update().loading);

        tx.send(Ok(vec![item("p1")])).unwrap();
        assert_eq!(fetch.await, Completion::Applied);
        assert!(!store.snapshot().loading);
    }

    #[tokio::test]
    async fn test_out_of_order_completion_keeps_latest_request() {
        let (tx_add, rx_add) = oneshot::channel();
        let (tx_remove, rx_remove) = oneshot::channel();
        let store = WishlistStore::new(GatedApi::new(vec![rx_add, rx_remove]));
        let p1 = ProductId::new("p1");

        // Rapid add-then-remove; both requests are in flight
        let mut add = Box::pin(store.add(&p1));
        let mut remove = Box::pin(store.remove(&p1));
        assert!(poll_once(&mut add).await.is_pending());
        assert!(poll_once(&mut remove).await.is_pending());

        // The later-issued remove resolves first...
        tx_remove.send(Ok(vec![])).unwrap();
        assert_eq!(remove.await, Completion::Applied);

        // ...and the earlier add's response must not resurrect p1
        tx_add.send(Ok(vec![item("p1")])).unwrap();
        assert_eq!(add.await, Completion::Superseded);

        let state = store.snapshot();
        assert!(state.items.is_empty());
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_in_order_completion_applies_both() {
        let (tx_add, rx_add) = oneshot::channel();
        let (tx_remove, rx_remove) = oneshot::channel();
        let store = WishlistStore::new(GatedApi::new(vec![rx_add, rx_remove]));
        let p1 = ProductId::new("p1");

        let mut add = Box::pin(store.add(&p1));
        let mut remove = Box::pin(store.remove(&p1));
        assert!(poll_once(&mut add).await.is_pending());
        assert!(poll_once(&mut remove).await.is_pending());

        tx_add.send(Ok(vec![item("p1")])).unwrap();
        assert_eq!(add.await, Completion::Applied);
        // The remove is still outstanding
        assert!(store.snapshot().loading);

        tx_remove.send(Ok(vec![])).unwrap();
        assert_eq!(remove.await, Completion::Applied);
        assert!(store.snapshot().items.is_empty());
        assert!(!store.snapshot().loading);
    }

    #[tokio::test]
    async fn test_stale_failure_is_discarded() {
        let (tx_first, rx_first) = oneshot::channel();
        let (tx_second, rx_second) = oneshot::channel();
        let store = WishlistStore::new(GatedApi::new(vec![rx_first, rx_second]));

        let mut first = Box::pin(store.fetch());
        let mut second = Box::pin(store.fetch());
        assert!(poll_once(&mut first).await.is_pending());
        assert!(poll_once(&mut second).await.is_pending());

        tx_second.send(Ok(vec![item("p1")])).unwrap();
        assert_eq!(second.await, Completion::Applied);

        tx_first.send(Err(network_error())).unwrap();
        assert_eq!(first.await, Completion::Superseded);
        assert_eq!(store.snapshot().error, None);
    }

    #[tokio::test]
    async fn test_sign_out_discards_in_flight_responses() {
        let (tx, rx) = oneshot::channel();
        let store = WishlistStore::new(GatedApi::new(vec![rx]));

        let mut fetch = Box::pin(store.fetch());
        assert!(poll_once(&mut fetch).await.is_pending());

        store.reset();
        tx.send(Ok(vec![item("secret")])).unwrap();

        assert_eq!(fetch.await, Completion::Superseded);
        assert_eq!(store.snapshot(), WishlistState::default());
    }
}
