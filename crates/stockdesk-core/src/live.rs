//! Live-filtered list view
//!
//! Couples a [`ListController`] with a [`Debouncer`]: keystrokes edit a
//! draft filter set, and only the settled draft reaches the server. Sort
//! changes bypass the debouncer.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::debounce::Debouncer;
use crate::error::ClientResult;
use crate::list::{ListController, RefreshOutcome};
use crate::resource::Resource;
use crate::types::FilterSet;

pub struct LiveList<R: Resource> {
    controller: Arc<ListController<R>>,
    draft: FilterSet,
    debouncer: Debouncer<FilterSet>,
    pump: JoinHandle<()>,
}

impl<R: Resource> LiveList<R> {
    /// Must be called from within a tokio runtime.
    pub fn new(controller: Arc<ListController<R>>, quiescence: Duration) -> Self {
        let (debouncer, mut settled) = Debouncer::new(quiescence);
        let draft = controller.filters();

        let target = Arc::clone(&controller);
        let pump = tokio::spawn(async move {
            while let Some(filters) = settled.recv().await {
                log::debug!("filters settled for {}: {:?}", R::PATH, filters);
                // commits overlap; the controller's token keeps the newest
                let controller = Arc::clone(&target);
                tokio::spawn(async move {
                    let _ = controller.apply_filters(filters).await;
                });
            }
        });

        Self {
            controller,
            draft,
            debouncer,
            pump,
        }
    }

    /// Initial fetch with whatever filters the controller already holds
    pub async fn mount(&self) -> ClientResult<RefreshOutcome> {
        self.controller.mount().await
    }

    /// One edit to a filter field; the fetch waits for input to settle
    pub fn input(&mut self, field: &str, value: &str) {
        self.draft.set(field, value);
        self.debouncer.push(self.draft.clone());
    }

    pub fn clear(&mut self, field: &str) {
        self.draft.clear(field);
        self.debouncer.push(self.draft.clone());
    }

    /// Filters as typed, possibly not yet committed
    pub fn draft(&self) -> &FilterSet {
        &self.draft
    }

    /// Whether an edit is still waiting for the quiescence window
    pub fn is_settling(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Sort changes fetch immediately
    pub async fn sort_by(&self, field: &str) -> ClientResult<RefreshOutcome> {
        self.controller.sort_by(field).await
    }

    pub fn controller(&self) -> &Arc<ListController<R>> {
        &self.controller
    }
}

impl<R: Resource> Drop for LiveList<R> {
    fn drop(&mut self) {
        self.debouncer.cancel();
        self.pump.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::CollectingNotifier;
    use crate::resource::Items;
    use crate::testing::{FakeTransport, SOAP_JSON, TWO_ITEMS_JSON};
    use crate::transport::Method;
    use crate::types::FIELD_ITEM_NAME;
    use tokio::time::sleep;

    fn live(transport: &Arc<FakeTransport>) -> LiveList<Items> {
        let controller = ListController::<Items>::new(
            transport.clone(),
            Arc::new(CollectingNotifier::new()),
        );
        LiveList::new(Arc::new(controller), Duration::from_millis(1000))
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_burst_fetches_once() {
        let transport = FakeTransport::new();
        transport.reply(Method::Get, "/items?order=desc", 200, TWO_ITEMS_JSON);
        transport.reply(Method::Get, "/items?itemName=soap&order=desc", 200, SOAP_JSON);
        let mut list = live(&transport);
        list.mount().await.unwrap();

        list.input(FIELD_ITEM_NAME, "s");
        sleep(Duration::from_millis(100)).await;
        list.input(FIELD_ITEM_NAME, "so");
        sleep(Duration::from_millis(100)).await;
        list.input(FIELD_ITEM_NAME, "soap");

        sleep(Duration::from_millis(999)).await;
        assert_eq!(transport.count(Method::Get), 1);
        assert!(list.is_settling());

        sleep(Duration::from_secs(2)).await;
        assert_eq!(
            transport.log(),
            vec!["GET /items?order=desc", "GET /items?itemName=soap&order=desc"]
        );
        assert_eq!(list.controller().records().len(), 1);
        assert_eq!(list.controller().filters().get(FIELD_ITEM_NAME), Some("soap"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_commit() {
        let transport = FakeTransport::new();
        transport.reply(Method::Get, "/items?order=desc", 200, TWO_ITEMS_JSON);
        let mut list = live(&transport);
        list.mount().await.unwrap();

        list.input(FIELD_ITEM_NAME, "soap");
        sleep(Duration::from_millis(500)).await;
        drop(list);
        sleep(Duration::from_secs(3)).await;

        assert_eq!(transport.log(), vec!["GET /items?order=desc"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sort_is_not_debounced() {
        let transport = FakeTransport::new();
        transport.reply(Method::Get, "/items?sortBy=stock&order=desc", 200, "[]");
        let list = live(&transport);

        list.sort_by("stock").await.unwrap();

        assert_eq!(transport.log(), vec!["GET /items?sortBy=stock&order=desc"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cleared_field_leaves_query() {
        let transport = FakeTransport::new();
        transport.reply(Method::Get, "/items?order=desc", 200, "[]");
        let mut list = live(&transport);

        list.input(FIELD_ITEM_NAME, "kopi");
        list.clear(FIELD_ITEM_NAME);
        assert!(list.draft().is_blank());

        sleep(Duration::from_secs(2)).await;
        assert_eq!(transport.log(), vec!["GET /items?order=desc"]);
    }
}
