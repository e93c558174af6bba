//! First-variant lookup keyed by visitor and client-side lookup instance.
//!
//! Each page widget that needs a purchasable variant id (quick-add buttons)
//! owns a lookup instance identified by a key it sends along with the
//! request. Instance keys are only unique within one page, so every
//! instance is also scoped to the visitor's session. Requests on one scoped
//! instance are sequence-tagged; when a response arrives after a newer
//! request was issued on the same instance it is dropped instead of
//! overwriting the newer result.
//!
//! Results are never shared between instances and failures are not retried.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use orchard_core::ProductRef;
use orchard_core::lookup::{LookupState, LookupTracker};
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use crate::shopify::{ShopifyError, StorefrontClient};

/// Error string exposed to the browser for any failed lookup.
pub const LOOKUP_FAILED: &str = "Failed to load product variant";

/// Instance key used when the client does not send one.
pub const DEFAULT_INSTANCE: &str = "default";

const MAX_INSTANCES: u64 = 10_000;
const INSTANCE_IDLE: Duration = Duration::from_secs(30 * 60);

/// Something that can resolve a product to its first variant id.
pub trait VariantSource: Send + Sync + 'static {
    /// Fetch the id of the first variant of `product`.
    fn first_variant_id(
        &self,
        product: &ProductRef,
    ) -> impl Future<Output = Result<String, ShopifyError>> + Send;
}

impl VariantSource for StorefrontClient {
    async fn first_variant_id(&self, product: &ProductRef) -> Result<String, ShopifyError> {
        self.get_first_variant_id(product).await
    }
}

type Slot = Arc<Mutex<LookupTracker<String>>>;

/// Per-instance variant lookups.
pub struct VariantLookup<S = StorefrontClient> {
    source: S,
    instances: Cache<String, Slot>,
}

impl<S: VariantSource> VariantLookup<S> {
    /// Create a lookup service over `source`.
    pub fn new(source: S) -> Self {
        let instances = Cache::builder()
            .max_capacity(MAX_INSTANCES)
            .time_to_idle(INSTANCE_IDLE)
            .build();

        Self { source, instances }
    }

    /// Resolve `product` on the visitor's `instance` and return its state.
    ///
    /// If another request on the same instance was issued while this one
    /// was in flight, this response is discarded and the returned state is
    /// whatever the newer request has produced so far.
    #[instrument(skip(self, scope), fields(instance = %instance, product = %product))]
    pub async fn resolve(
        &self,
        scope: &str,
        instance: &str,
        product: &ProductRef,
    ) -> LookupState<String> {
        let slot = self.slot(instance_key(scope, instance)).await;
        let ticket = slot.lock().await.begin();

        let outcome = self.source.first_variant_id(product).await.map_err(|e| {
            warn!(error = %e, "Variant lookup failed");
            LOOKUP_FAILED.to_string()
        });

        let mut tracker = slot.lock().await;
        if !tracker.complete(ticket, outcome) {
            debug!(seq = ticket.seq(), "Discarding stale variant lookup");
        }
        tracker.state().clone()
    }

    /// Current state of the visitor's `instance` without issuing a request.
    pub async fn state(&self, scope: &str, instance: &str) -> LookupState<String> {
        match self.instances.get(&instance_key(scope, instance)).await {
            Some(slot) => slot.lock().await.state().clone(),
            None => LookupState::default(),
        }
    }

    async fn slot(&self, key: String) -> Slot {
        self.instances
            .get_with(key, async { Arc::new(Mutex::new(LookupTracker::new())) })
            .await
    }
}

fn instance_key(scope: &str, instance: &str) -> String {
    format!("{scope}:{instance}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use tokio::sync::{mpsc, oneshot};

    use super::*;

    /// A source whose responses are released by the test, one handle at a time.
    struct GatedSource {
        gates: std::sync::Mutex<HashMap<String, oneshot::Receiver<Result<String, ShopifyError>>>>,
        started: mpsc::UnboundedSender<String>,
    }

    impl VariantSource for GatedSource {
        async fn first_variant_id(&self, product: &ProductRef) -> Result<String, ShopifyError> {
            let key = product.to_string();
            let gate = self
                .gates
                .lock()
                .ok()
                .and_then(|mut gates| gates.remove(&key));
            let _ = self.started.send(key.clone());
            match gate {
                Some(rx) => rx
                    .await
                    .unwrap_or_else(|_| Err(ShopifyError::NotFound(key))),
                None => Err(ShopifyError::NotFound(key)),
            }
        }
    }

    type Gates = Vec<(ProductRef, oneshot::Sender<Result<String, ShopifyError>>)>;

    fn gated(handles: &[&str]) -> (Arc<VariantLookup<GatedSource>>, Gates, mpsc::UnboundedReceiver<String>) {
        let (started_tx, started_rx) = mpsc::unbounded_channel();
        let mut receivers = HashMap::new();
        let mut senders = Vec::new();
        for handle in handles {
            let (tx, rx) = oneshot::channel();
            let product = ProductRef::Handle((*handle).to_string());
            receivers.insert(product.to_string(), rx);
            senders.push((product, tx));
        }
        let source = GatedSource {
            gates: std::sync::Mutex::new(receivers),
            started: started_tx,
        };
        (Arc::new(VariantLookup::new(source)), senders, started_rx)
    }

    #[tokio::test]
    async fn test_late_response_is_discarded() {
        let (lookup, mut gates, mut started) = gated(&["apple", "pear"]);
        let (pear, pear_tx) = gates.pop().unwrap();
        let (apple, apple_tx) = gates.pop().unwrap();

        let first = tokio::spawn({
            let lookup = Arc::clone(&lookup);
            async move { lookup.resolve("visitor", "quick-add", &apple).await }
        });
        started.recv().await.unwrap();

        let second = tokio::spawn({
            let lookup = Arc::clone(&lookup);
            async move { lookup.resolve("visitor", "quick-add", &pear).await }
        });
        started.recv().await.unwrap();

        // Newer request resolves first
        pear_tx.send(Ok("gid://shopify/ProductVariant/2".to_string())).unwrap();
        let state = second.await.unwrap();
        assert_eq!(state.value.as_deref(), Some("gid://shopify/ProductVariant/2"));
        assert!(!state.loading);

        // Older request resolves late and must not win
        apple_tx.send(Ok("gid://shopify/ProductVariant/1".to_string())).unwrap();
        let state = first.await.unwrap();
        assert_eq!(state.value.as_deref(), Some("gid://shopify/ProductVariant/2"));

        let state = lookup.state("visitor", "quick-add").await;
        assert_eq!(state.value.as_deref(), Some("gid://shopify/ProductVariant/2"));
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn test_stale_response_leaves_newer_request_loading() {
        let (lookup, mut gates, mut started) = gated(&["apple", "pear"]);
        let (pear, _pear_tx) = gates.pop().unwrap();
        let (apple, apple_tx) = gates.pop().unwrap();

        let first = tokio::spawn({
            let lookup = Arc::clone(&lookup);
            async move { lookup.resolve("visitor", "quick-add", &apple).await }
        });
        started.recv().await.unwrap();

        let _second = tokio::spawn({
            let lookup = Arc::clone(&lookup);
            async move { lookup.resolve("visitor", "quick-add", &pear).await }
        });
        started.recv().await.unwrap();

        apple_tx.send(Ok("gid://shopify/ProductVariant/1".to_string())).unwrap();
        let state = first.await.unwrap();
        assert!(state.loading);
        assert_eq!(state.value, None);
    }

    #[tokio::test]
    async fn test_failure_sets_generic_error() {
        let (lookup, mut gates, _started) = gated(&["apple"]);
        let (apple, apple_tx) = gates.pop().unwrap();
        apple_tx
            .send(Err(ShopifyError::NotFound("apple".to_string())))
            .unwrap();

        let state = lookup.resolve("visitor", "wholesale", &apple).await;
        assert_eq!(state.error.as_deref(), Some(LOOKUP_FAILED));
        assert_eq!(state.value, None);
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_instances_are_independent() {
        let (lookup, mut gates, _started) = gated(&["apple", "pear"]);
        let (pear, pear_tx) = gates.pop().unwrap();
        let (apple, apple_tx) = gates.pop().unwrap();
        apple_tx.send(Ok("variant-apple".to_string())).unwrap();
        pear_tx.send(Ok("variant-pear".to_string())).unwrap();

        lookup.resolve("visitor", "left", &apple).await;
        lookup.resolve("visitor", "right", &pear).await;

        assert_eq!(lookup.state("visitor", "left").await.value.as_deref(), Some("variant-apple"));
        assert_eq!(lookup.state("visitor", "right").await.value.as_deref(), Some("variant-pear"));
        assert_eq!(lookup.state("visitor", "unused").await, LookupState::default());
    }

    #[tokio::test]
    async fn test_visitors_sharing_an_instance_key_do_not_interfere() {
        let (lookup, mut gates, mut started) = gated(&["apple", "pear"]);
        let (pear, _pear_tx) = gates.pop().unwrap();
        let (apple, apple_tx) = gates.pop().unwrap();

        let first = tokio::spawn({
            let lookup = Arc::clone(&lookup);
            async move { lookup.resolve("alice", "card-1", &apple).await }
        });
        started.recv().await.unwrap();

        let _second = tokio::spawn({
            let lookup = Arc::clone(&lookup);
            async move { lookup.resolve("bob", "card-1", &pear).await }
        });
        started.recv().await.unwrap();

        apple_tx.send(Ok("variant-apple".to_string())).unwrap();
        let state = first.await.unwrap();
        assert_eq!(state.value.as_deref(), Some("variant-apple"));
        assert!(!state.loading);
        assert!(lookup.state("bob", "card-1").await.loading);
    }
}
