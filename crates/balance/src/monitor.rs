use crate::{AmountError, BalanceReading, Monitor};
use binding::Value;
use client::{CallError, ContractBinding};
use futures::future::{BoxFuture, FutureExt, Shared};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use thiserror::Error;
use tracing::{debug, warn};

type ReadingFuture = Shared<BoxFuture<'static, BalanceReading>>;
type Inflight = Mutex<HashMap<QueryKey, ReadingFuture>>;

/// One outstanding read per contract, session and holder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct QueryKey {
    contract: String,
    epoch: u64,
    holder: String,
}

#[derive(Error, Debug)]
enum ReadError {
    #[error(transparent)]
    Call(#[from] CallError),

    #[error(transparent)]
    Amount(#[from] AmountError),

    #[error("balanceOf returned no amount")]
    Empty,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Balance query service.
///
/// A query that arrives while an identical one is outstanding joins it instead
/// of issuing a second read. Reads run on their own task, so a caller giving
/// up does not stall the others or leave the query behind.
#[derive(Clone)]
pub struct BalanceQueryService {
    decimals: u8,
    inflight: Arc<Inflight>,
    /// Last good reading per holder, with the session epoch it was read in.
    latest: Arc<Mutex<HashMap<String, (u64, BalanceReading)>>>,
}

impl BalanceQueryService {
    pub fn new(decimals: u8) -> Self {
        Self {
            decimals,
            inflight: Arc::new(Mutex::new(HashMap::new())),
            latest: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub const fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Last successful reading for `holder`.
    pub fn latest(&self, holder: &str) -> Option<BalanceReading> {
        lock(&self.latest)
            .get(holder)
            .map(|(_, reading)| reading.clone())
    }

    /// Read the balance of `holder`; failures yield a zero reading.
    pub async fn query_balance(&self, binding: &ContractBinding, holder: &str) -> BalanceReading {
        let key = QueryKey {
            contract: binding.address().to_string(),
            epoch: binding.session().epoch(),
            holder: holder.to_string(),
        };

        let query = {
            let mut inflight = lock(&self.inflight);
            if let Some(query) = inflight.get(&key) {
                debug!(holder, "Joining in-flight balance query");
                query.clone()
            } else {
                let query = self.spawn_query(binding.clone(), key.clone());
                inflight.insert(key, query.clone());
                query
            }
        };

        query.await
    }

    /// Must be called with `inflight` locked.
    fn spawn_query(&self, binding: ContractBinding, key: QueryKey) -> ReadingFuture {
        let decimals = self.decimals;
        let inflight = Arc::clone(&self.inflight);
        let latest = Arc::clone(&self.latest);
        let task_key = key.clone();

        let task = tokio::spawn(async move {
            let key = task_key;
            let reading = match read_balance(&binding, &key.holder, decimals).await {
                Ok(reading) => {
                    debug!(holder = %key.holder, balance = %reading.scaled, "Balance read");
                    record_latest(&latest, &key, &reading);
                    reading
                }
                Err(err) => {
                    warn!(holder = %key.holder, contract = %key.contract, error = %err, "Balance query failed");
                    BalanceReading::zero(decimals)
                }
            };
            lock(&inflight).remove(&key);
            reading
        });

        let inflight = Arc::downgrade(&self.inflight);
        task.map(move |joined| {
            joined.unwrap_or_else(|err| {
                warn!(holder = %key.holder, error = %err, "Balance query aborted");
                if let Some(inflight) = inflight.upgrade() {
                    lock(&inflight).remove(&key);
                }
                BalanceReading::zero(decimals)
            })
        })
        .boxed()
        .shared()
    }
}

/// Keep the reading unless one from a newer session is already stored.
fn record_latest(
    latest: &Mutex<HashMap<String, (u64, BalanceReading)>>,
    key: &QueryKey,
    reading: &BalanceReading,
) {
    let mut latest = lock(latest);
    if latest
        .get(&key.holder)
        .is_some_and(|(epoch, _)| *epoch > key.epoch)
    {
        debug!(holder = %key.holder, epoch = key.epoch, "Dropping reading from a replaced session");
        return;
    }
    latest.insert(key.holder.clone(), (key.epoch, reading.clone()));
}

impl Monitor for BalanceQueryService {
    async fn query_balance(&self, binding: &ContractBinding, holder: &str) -> BalanceReading {
        Self::query_balance(self, binding, holder).await
    }
}

async fn read_balance(
    binding: &ContractBinding,
    holder: &str,
    decimals: u8,
) -> Result<BalanceReading, ReadError> {
    let values = binding
        .call_read("balanceOf", &[Value::Address(holder.to_string())])
        .await?;

    let raw = values.first().and_then(Value::as_uint).ok_or(ReadError::Empty)?;
    Ok(BalanceReading::new(raw, decimals)?)
}
