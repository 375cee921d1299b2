//! Fixed-size batching and batch filtering
//!
//! [`BatchStream`] groups a record stream into chunks of `batch_size`; the
//! final chunk may be shorter and is the natural end of the stream.
//! [`BatchFilter`] walks those chunks and yields the records that match a
//! predicate, holding at most one chunk in memory.

use crate::scan::RowStream;
use crate::table::UserTable;
use std::num::NonZeroUsize;
use trickle_core::{
    error::{Result, TrickleError},
    observe, Connector, RowsOf, UserRecord,
};

/// Records strictly older than this are kept by `batch_process`
pub const AGE_THRESHOLD: u32 = 25;

/// Upper bound on the capacity reserved up front for one batch
const MAX_PREALLOCATED: usize = 1024;

/// Batches of a full user scan
pub type UserBatches<C> = BatchStream<RowStream<RowsOf<C>>>;

/// Users older than [`AGE_THRESHOLD`], read batch by batch
pub type AdultUsers<C> = BatchFilter<UserBatches<C>, UserRecord, fn(&UserRecord) -> bool>;

/// Groups an item stream into `Vec`s of at most `batch_size` items
///
/// An error from the inner stream discards the partially built batch and
/// is yielded in its place, so a short batch always means exhaustion.
pub struct BatchStream<I> {
    items: Option<I>,
    batch_size: NonZeroUsize,
}

impl<I, T> BatchStream<I>
where
    I: Iterator<Item = Result<T>>,
{
    pub fn new(items: I, batch_size: NonZeroUsize) -> Self {
        Self {
            items: Some(items),
            batch_size,
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size.get()
    }
}

impl<I, T> Iterator for BatchStream<I>
where
    I: Iterator<Item = Result<T>>,
{
    type Item = Result<Vec<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        let items = self.items.as_mut()?;
        let size = self.batch_size.get();
        let mut batch = Vec::with_capacity(size.min(MAX_PREALLOCATED));

        while batch.len() < size {
            match items.next() {
                Some(Ok(item)) => batch.push(item),
                Some(Err(e)) => {
                    self.items = None;
                    return Some(Err(e));
                }
                None => {
                    // Release the source before handing out the tail batch
                    self.items = None;
                    break;
                }
            }
        }

        if batch.is_empty() {
            return None;
        }
        observe::record_rows_yielded("batch", batch.len());
        Some(Ok(batch))
    }
}

/// Yields the records of each batch that satisfy `predicate`
pub struct BatchFilter<B, T, P> {
    batches: B,
    current: std::vec::IntoIter<T>,
    predicate: P,
}

impl<B, T, P> BatchFilter<B, T, P>
where
    B: Iterator<Item = Result<Vec<T>>>,
    P: FnMut(&T) -> bool,
{
    pub fn new(batches: B, predicate: P) -> Self {
        Self {
            batches,
            current: Vec::new().into_iter(),
            predicate,
        }
    }
}

impl<B, T, P> Iterator for BatchFilter<B, T, P>
where
    B: Iterator<Item = Result<Vec<T>>>,
    P: FnMut(&T) -> bool,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.current.find(|item| (self.predicate)(item)) {
                return Some(Ok(item));
            }
            match self.batches.next()? {
                Ok(batch) => self.current = batch.into_iter(),
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Predicate used by `batch_process`
pub fn is_over_age_threshold(user: &UserRecord) -> bool {
    user.age > AGE_THRESHOLD
}

pub(crate) fn positive(value: usize, what: &str) -> Result<NonZeroUsize> {
    NonZeroUsize::new(value)
        .ok_or_else(|| TrickleError::InvalidArgument(format!("{} must be positive", what)))
}

impl<C: Connector> UserTable<C> {
    /// Stream the whole table as batches of `batch_size` records
    ///
    /// Runs its own full scan on its own connection. An empty table yields
    /// no batches at all.
    pub fn stream_in_batches(&self, batch_size: usize) -> Result<UserBatches<C>> {
        let batch_size = positive(batch_size, "batch size")?;
        tracing::debug!(table = self.name(), batch_size, "streaming in batches");
        Ok(BatchStream::new(self.stream()?, batch_size))
    }

    /// Stream users older than [`AGE_THRESHOLD`], reading `batch_size` rows at a time
    pub fn batch_process(&self, batch_size: usize) -> Result<AdultUsers<C>> {
        self.filter_batches(batch_size, is_over_age_threshold as fn(&UserRecord) -> bool)
    }

    /// Stream users matching `predicate`, reading `batch_size` rows at a time
    pub fn filter_batches<P>(
        &self,
        batch_size: usize,
        predicate: P,
    ) -> Result<BatchFilter<UserBatches<C>, UserRecord, P>>
    where
        P: FnMut(&UserRecord) -> bool,
    {
        Ok(BatchFilter::new(self.stream_in_batches(batch_size)?, predicate))
    }
}
