//! # Mock Product Source
//!
//! A scripted [`ProductSource`] for tests that exercise the catalog and the cache
//! without a network.
//!
//! Responses are queued with a fluent expectation API and handed out in order.
//! Every call is counted, so tests can assert how many remote requests a scenario
//! actually produced. A source created with [`MockProductSource::held`] parks every
//! call until [`release`](MockProductSource::release) is called, which lets a test
//! issue several requests while a fetch is still outstanding.
//!
//! ```rust,ignore
//! let source = Arc::new(MockProductSource::held());
//! source.expect_product(ProductId(5)).return_ok(product);
//!
//! // ... issue concurrent requests ...
//! source.release();
//! assert_eq!(source.product_calls(), 1);
//! source.verify();
//! ```

use crate::catalog::{CatalogError, ProductSource};
use crate::model::{Product, ProductId};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// Represents an expected call to the mock source.
enum Expectation {
    List {
        response: Result<Vec<Product>, CatalogError>,
    },
    Product {
        id: ProductId,
        response: Result<Product, CatalogError>,
    },
}

/// A product source with expectation tracking.
pub struct MockProductSource {
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
    list_calls: AtomicUsize,
    product_calls: AtomicUsize,
    gate: watch::Sender<bool>,
}

impl Default for MockProductSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProductSource {
    /// Creates a mock that answers immediately.
    pub fn new() -> Self {
        Self::with_gate(true)
    }

    /// Creates a mock that holds every call until [`release`](Self::release).
    pub fn held() -> Self {
        Self::with_gate(false)
    }

    fn with_gate(open: bool) -> Self {
        let (gate, _) = watch::channel(open);
        Self {
            expectations: Arc::new(Mutex::new(VecDeque::new())),
            list_calls: AtomicUsize::new(0),
            product_calls: AtomicUsize::new(0),
            gate,
        }
    }

    /// Lets held calls, and every later call, complete.
    pub fn release(&self) {
        self.gate.send_replace(true);
    }

    /// Expects a `fetch_products` call.
    pub fn expect_list(&self) -> ListExpectationBuilder {
        ListExpectationBuilder {
            expectations: self.expectations.clone(),
        }
    }

    /// Expects a `fetch_product` call for `id`.
    pub fn expect_product(&self, id: ProductId) -> ProductExpectationBuilder {
        ProductExpectationBuilder {
            id,
            expectations: self.expectations.clone(),
        }
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn product_calls(&self) -> usize {
        self.product_calls.load(Ordering::SeqCst)
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }

    async fn wait_for_gate(&self) {
        let mut gate = self.gate.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = gate.wait_for(|open| *open).await;
    }

    fn next_expectation(&self) -> Option<Expectation> {
        self.expectations.lock().unwrap().pop_front()
    }
}

#[async_trait]
impl ProductSource for MockProductSource {
    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_for_gate().await;

        match self.next_expectation() {
            Some(Expectation::List { response }) => response,
            _ => panic!("Unexpected fetch_products call or expectation mismatch"),
        }
    }

    async fn fetch_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.product_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_for_gate().await;

        match self.next_expectation() {
            Some(Expectation::Product {
                id: expected,
                response,
            }) if expected == id => response,
            _ => panic!("Unexpected fetch_product({id}) call or expectation mismatch"),
        }
    }
}

/// Builder for `fetch_products` expectations.
pub struct ListExpectationBuilder {
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
}

impl ListExpectationBuilder {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, products: Vec<Product>) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation::List {
            response: Ok(products),
        });
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: CatalogError) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation::List {
            response: Err(error),
        });
    }
}

/// Builder for `fetch_product` expectations.
pub struct ProductExpectationBuilder {
    id: ProductId,
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
}

impl ProductExpectationBuilder {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, product: Product) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation::Product {
            id: self.id,
            response: Ok(product),
        });
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: CatalogError) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation::Product {
            id: self.id,
            response: Err(error),
        });
    }
}
