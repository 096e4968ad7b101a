//! In-memory chain used by the integration tests
#![allow(dead_code)]

use alloy::{
    primitives::{Address, Bytes, TxHash, U256},
    rpc::types::eth::TransactionRequest,
};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use swap_scheduler_bot::{
    execution::TradeSigner,
    network::ChainGateway,
    types::{Credential, NetworkConfig, ScheduleRequest, Trade, TradeRequest},
    Config, SwapEngine,
};

pub const USDC_BASE: &str = "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913";
pub const ONE_ETH: u128 = 1_000_000_000_000_000_000;
pub const GAS_PRICE: u128 = 1_000_000_000;

/// Signer that reports a fixed account and produces no real signature.
#[derive(Debug)]
pub struct StaticSigner {
    pub address: Address,
}

#[async_trait]
impl TradeSigner for StaticSigner {
    fn address(&self) -> Address {
        self.address
    }

    async fn sign_transaction(&self, _tx: TransactionRequest) -> Result<Bytes> {
        Ok(Bytes::new())
    }
}

/// Signer whose signing step panics, standing in for a buggy key backend.
#[derive(Debug)]
pub struct PanickingSigner;

#[async_trait]
impl TradeSigner for PanickingSigner {
    fn address(&self) -> Address {
        Address::repeat_byte(0x22)
    }

    async fn sign_transaction(&self, _tx: TransactionRequest) -> Result<Bytes> {
        panic!("signing backend crashed");
    }
}

pub fn signer() -> Credential {
    Arc::new(StaticSigner { address: Address::repeat_byte(0x11) })
}

/// Scriptable gateway. Defaults describe a healthy chain with liquidity,
/// a 6-decimal `USDC` token, and a 1 ETH balance.
pub struct MockGateway {
    pub connected: AtomicBool,
    pub has_code: AtomicBool,
    pub amounts_out: Mutex<Result<Vec<U256>, String>>,
    pub symbol: Mutex<Option<String>>,
    pub decimals: Mutex<Option<u8>>,
    pub estimate: Mutex<Option<u64>>,
    pub balance: Mutex<U256>,
    pub send_delay: Mutex<Duration>,
    pub send_error: Mutex<Option<String>>,
    pub code_calls: AtomicUsize,
    pub quote_calls: AtomicUsize,
    pub send_calls: AtomicUsize,
    pub last_tx: Mutex<Option<TransactionRequest>>,
}

impl Default for MockGateway {
    fn default() -> Self {
        Self {
            connected: AtomicBool::new(true),
            has_code: AtomicBool::new(true),
            amounts_out: Mutex::new(Ok(vec![U256::from(10_000_000_000_000_000u128), U256::from(1_000_000u64)])),
            symbol: Mutex::new(Some("USDC".to_string())),
            decimals: Mutex::new(Some(6)),
            estimate: Mutex::new(Some(100_000)),
            balance: Mutex::new(U256::from(ONE_ETH)),
            send_delay: Mutex::new(Duration::ZERO),
            send_error: Mutex::new(None),
            code_calls: AtomicUsize::new(0),
            quote_calls: AtomicUsize::new(0),
            send_calls: AtomicUsize::new(0),
            last_tx: Mutex::new(None),
        }
    }
}

impl MockGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    pub fn set_has_code(&self, has_code: bool) {
        self.has_code.store(has_code, Ordering::SeqCst);
    }

    pub fn set_amounts_out(&self, amounts: Vec<u128>) {
        *self.amounts_out.lock().unwrap() = Ok(amounts.into_iter().map(U256::from).collect());
    }

    pub fn set_quote_error(&self, message: &str) {
        *self.amounts_out.lock().unwrap() = Err(message.to_string());
    }

    pub fn set_metadata(&self, symbol: Option<&str>, decimals: Option<u8>) {
        *self.symbol.lock().unwrap() = symbol.map(str::to_string);
        *self.decimals.lock().unwrap() = decimals;
    }

    pub fn set_estimate(&self, estimate: Option<u64>) {
        *self.estimate.lock().unwrap() = estimate;
    }

    pub fn set_balance_wei(&self, balance: u128) {
        *self.balance.lock().unwrap() = U256::from(balance);
    }

    pub fn set_send_delay(&self, delay: Duration) {
        *self.send_delay.lock().unwrap() = delay;
    }

    pub fn set_send_error(&self, message: &str) {
        *self.send_error.lock().unwrap() = Some(message.to_string());
    }

    pub fn code_calls(&self) -> usize {
        self.code_calls.load(Ordering::SeqCst)
    }

    pub fn quote_calls(&self) -> usize {
        self.quote_calls.load(Ordering::SeqCst)
    }

    pub fn send_calls(&self) -> usize {
        self.send_calls.load(Ordering::SeqCst)
    }

    pub fn last_tx(&self) -> Option<TransactionRequest> {
        self.last_tx.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChainGateway for MockGateway {
    async fn is_connected(&self, _network: &NetworkConfig) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn code_exists_at(&self, _network: &NetworkConfig, _address: Address) -> Result<bool> {
        self.code_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.has_code.load(Ordering::SeqCst))
    }

    async fn quote_path(
        &self,
        _network: &NetworkConfig,
        _amount_in: U256,
        _path: &[Address],
    ) -> Result<Vec<U256>> {
        self.quote_calls.fetch_add(1, Ordering::SeqCst);
        self.amounts_out.lock().unwrap().clone().map_err(|e| anyhow!(e))
    }

    async fn token_symbol(&self, _network: &NetworkConfig, _token: Address) -> Result<String> {
        self.symbol.lock().unwrap().clone().ok_or_else(|| anyhow!("execution reverted"))
    }

    async fn token_decimals(&self, _network: &NetworkConfig, _token: Address) -> Result<u8> {
        self.decimals.lock().unwrap().ok_or_else(|| anyhow!("execution reverted"))
    }

    async fn gas_price(&self, _network: &NetworkConfig) -> Result<u128> {
        Ok(GAS_PRICE)
    }

    async fn next_nonce(&self, _network: &NetworkConfig, _address: Address) -> Result<u64> {
        Ok(7)
    }

    async fn estimate_gas(&self, _network: &NetworkConfig, _tx: &TransactionRequest) -> Result<u64> {
        self.estimate.lock().unwrap().ok_or_else(|| anyhow!("gas required exceeds allowance"))
    }

    async fn balance_of(&self, _network: &NetworkConfig, _address: Address) -> Result<U256> {
        Ok(*self.balance.lock().unwrap())
    }

    async fn sign_and_send(
        &self,
        _network: &NetworkConfig,
        tx: TransactionRequest,
        signer: &dyn TradeSigner,
    ) -> Result<TxHash> {
        self.send_calls.fetch_add(1, Ordering::SeqCst);
        signer.sign_transaction(tx.clone()).await?;
        *self.last_tx.lock().unwrap() = Some(tx);

        let delay = *self.send_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match self.send_error.lock().unwrap().clone() {
            Some(message) => Err(anyhow!(message)),
            None => Ok(TxHash::repeat_byte(0xab)),
        }
    }
}

pub fn engine(gateway: &Arc<MockGateway>) -> SwapEngine {
    SwapEngine::new(&Config::default(), gateway.clone()).unwrap()
}

pub fn engine_with_signer(gateway: &Arc<MockGateway>) -> SwapEngine {
    SwapEngine::with_default_signer(&Config::default(), gateway.clone(), signer()).unwrap()
}

pub fn request(amount: Decimal) -> TradeRequest {
    TradeRequest {
        token_address: USDC_BASE.to_string(),
        native_amount: amount,
        network: "base".to_string(),
        slippage_pct: None,
        credential: Some(signer()),
    }
}

pub fn schedule_request(amount: Decimal, scheduled_at: DateTime<Utc>) -> ScheduleRequest {
    ScheduleRequest {
        trade: request(amount),
        scheduled_at,
        retain_credential: true,
    }
}

/// Poll until `count` trades are finished or `limit` elapses.
pub async fn wait_for_completed(engine: &SwapEngine, count: usize, limit: Duration) -> Vec<Trade> {
    let deadline = tokio::time::Instant::now() + limit;
    loop {
        let completed = engine.list_completed().await;
        if completed.len() >= count || tokio::time::Instant::now() >= deadline {
            return completed;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

/// Poll until at least one trade is executing or `limit` elapses.
pub async fn wait_for_executing(engine: &SwapEngine, limit: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + limit;
    loop {
        if engine.stats().await.executing > 0 {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
