use std::time::Duration;

use anyhow::{Context as _, anyhow};

use crate::{
    error::{SeedwalkError, SeedwalkResult},
    seed::Seed,
};

pub const DEFAULT_RPC_URL: &str = "https://arb1.arbitrum.io/rpc";
pub const DEFAULT_CONTRACT: &str = "0x895a6f444be4ba9d124f61df736605792b35d66b";

// Selector of the contract's public `seeds(uint256)` getter.
const SEEDS_SELECTOR: &str = "f0503e80";

const SEED_BYTE_LEN: usize = 32;

/// Read-only `eth_call` transport. Abstracted so tests can exercise the
/// retry policy without a network.
pub trait SeedTransport {
    fn eth_call(&mut self, to: &str, data: &str) -> anyhow::Result<String>;
}

/// JSON-RPC 2.0 over HTTP via a blocking agent.
pub struct HttpTransport {
    url: String,
    agent: ureq::Agent,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            agent: ureq::AgentBuilder::new()
                .timeout(Duration::from_secs(30))
                .build(),
        }
    }
}

impl SeedTransport for HttpTransport {
    fn eth_call(&mut self, to: &str, data: &str) -> anyhow::Result<String> {
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "method": "eth_call",
            "params": [{ "to": to, "data": data }, "latest"],
            "id": 1,
        });
        let response: serde_json::Value = self
            .agent
            .post(&self.url)
            .send_json(body)
            .with_context(|| format!("eth_call POST to '{}'", self.url))?
            .into_json()
            .context("parse eth_call response JSON")?;

        if let Some(err) = response.get("error") {
            return Err(anyhow!("rpc node rejected eth_call: {err}"));
        }
        response
            .get("result")
            .and_then(|v| v.as_str())
            .map(str::to_owned)
            .ok_or_else(|| anyhow!("eth_call response is missing 'result'"))
    }
}

/// Fixed-delay retry. `max_attempts: None` retries indefinitely, the
/// intended default for an operator-driven idempotent call; tests bound it
/// and zero the delay.
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    pub delay: Duration,
    pub max_attempts: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(10),
            max_attempts: None,
        }
    }
}

/// Outcome of a token seed lookup. The chain returns an all-zero word for
/// ids that were never minted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchedSeed {
    Seed(Seed),
    Nonexistent,
}

pub struct SeedClient<T> {
    transport: T,
    contract: String,
    policy: RetryPolicy,
}

impl<T: SeedTransport> SeedClient<T> {
    pub fn new(transport: T, contract: impl Into<String>, policy: RetryPolicy) -> Self {
        Self {
            transport,
            contract: contract.into(),
            policy,
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn fetch(&mut self, token_id: u64) -> SeedwalkResult<FetchedSeed> {
        let data = format!("0x{SEEDS_SELECTOR}{token_id:064x}");

        let mut attempts: u32 = 0;
        let raw = loop {
            match self.transport.eth_call(&self.contract, &data) {
                Ok(raw) => break raw,
                Err(e) => {
                    attempts += 1;
                    if let Some(max) = self.policy.max_attempts
                        && attempts >= max
                    {
                        return Err(SeedwalkError::rpc(format!(
                            "seed fetch for token #{token_id} failed after {attempts} attempts: {e}"
                        )));
                    }
                    // Transient failures are not classified; every error is
                    // retried after the fixed delay.
                    tracing::warn!(token_id, attempt = attempts, error = %e, "seed fetch failed, retrying");
                    if !self.policy.delay.is_zero() {
                        std::thread::sleep(self.policy.delay);
                    }
                }
            }
        };

        parse_seed_word(&raw, token_id)
    }
}

fn parse_seed_word(raw: &str, token_id: u64) -> SeedwalkResult<FetchedSeed> {
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    let bytes = hex::decode(digits).map_err(|e| {
        SeedwalkError::rpc(format!(
            "token #{token_id}: malformed seed word '{raw}': {e}"
        ))
    })?;
    if bytes.len() != SEED_BYTE_LEN {
        return Err(SeedwalkError::rpc(format!(
            "token #{token_id}: expected a {SEED_BYTE_LEN}-byte seed word, got {} bytes",
            bytes.len()
        )));
    }
    if bytes.iter().all(|&b| b == 0) {
        return Ok(FetchedSeed::Nonexistent);
    }
    Ok(FetchedSeed::Seed(Seed::from_bytes(bytes)?))
}
