//! Allowance lookups for the connected account.

use crate::{
    approve::Approver,
    classify::{classify, Classified, ErrorKind},
};
use balance::BalanceReading;
use binding::{address::decode_address, Value};
use client::CallError;
use tracing::debug;

impl Approver {
    /// How much `spender` may currently move on behalf of the connected
    /// account.
    ///
    /// Unlike balance reads, failures are returned instead of read as zero.
    pub async fn allowance(&self, spender: &str) -> Result<BalanceReading, Classified> {
        let spender = spender.trim();
        if spender.is_empty() {
            return Err(Classified::new(
                ErrorKind::InvalidInput,
                "Spender address is empty",
            ));
        }
        decode_address(spender)
            .map_err(|err| Classified::new(ErrorKind::InvalidInput, err.to_string()))?;

        let session = self.session().await?;
        let binding = self.binding_for(&session).await?;

        let args = [
            Value::Address(session.address().to_string()),
            Value::Address(spender.to_string()),
        ];
        let values = binding
            .call_read("allowance", &args)
            .await
            .map_err(|err| match err {
                CallError::Provider(source) => classify(source.message()),
                other => Classified::new(ErrorKind::BindingUnavailable, other.to_string()),
            })?;

        let raw = values
            .first()
            .and_then(Value::as_uint)
            .ok_or_else(|| Classified::new(ErrorKind::Unknown, "allowance returned no amount"))?;

        let reading = BalanceReading::new(raw, self.token().decimals)
            .map_err(|err| Classified::new(ErrorKind::Unknown, err.to_string()))?;
        debug!(owner = session.address(), spender, allowance = %reading.scaled, "Allowance read");
        Ok(reading)
    }
}
