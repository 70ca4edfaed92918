//! Single-writer sharing for stores
//!
//! Writers hold the lock for a whole event, so readers never see a
//! half-applied snapshot.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::LedgerError;
use crate::payment_request::PaymentRequestBook;
use crate::store::LedgerStore;

pub struct Shared<T> {
    inner: Arc<RwLock<T>>,
}

impl<T> Shared<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(RwLock::new(value)),
        }
    }

    pub fn read(&self) -> Result<RwLockReadGuard<'_, T>, LedgerError> {
        self.inner.read().map_err(|_| LedgerError::LockPoisoned)
    }

    pub fn write(&self) -> Result<RwLockWriteGuard<'_, T>, LedgerError> {
        self.inner.write().map_err(|_| LedgerError::LockPoisoned)
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

pub type SharedLedger = Shared<LedgerStore>;
pub type SharedPaymentRequests = Shared<PaymentRequestBook>;
