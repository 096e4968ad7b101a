mod common;

use alloy::{
    primitives::{Address, TxKind, U256},
    sol_types::SolCall,
};
use chrono::{Duration as ChronoDuration, Utc};
use common::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::str::FromStr;
use swap_scheduler_bot::{
    network::contracts::IUniswapV2Router02,
    types::{TradeStatus, UNISWAP_V2_ROUTER_BASE, WETH_BASE},
    SwapError, ValidationError,
};
use tokio_test::{assert_err, assert_ok};

fn decoded_swap(gateway: &MockGateway) -> IUniswapV2Router02::swapExactETHForTokensCall {
    let tx = gateway.last_tx().expect("transaction was sent");
    let input = tx.input.input().expect("calldata present").clone();
    IUniswapV2Router02::swapExactETHForTokensCall::abi_decode(&input, true).unwrap()
}

#[tokio::test]
async fn execute_now_submits_swap_and_records_result() {
    let gateway = MockGateway::new();
    let engine = engine(&gateway);

    let trade = assert_ok!(engine.execute_now(request(dec!(0.01))).await);

    assert_eq!(trade.status, TradeStatus::Completed);
    assert!(trade.id.is_none());
    assert!(trade.error.is_none());
    let result = trade.result.as_ref().unwrap();
    assert_eq!(result.tokens_received, dec!(1));
    assert_eq!(result.min_tokens, dec!(0.95));
    assert_eq!(result.symbol, "USDC");
    assert_eq!(result.gas_limit, 130_000);
    assert!(result.tx_hash.starts_with("0xabab"));
    assert_eq!(result.explorer_url, format!("https://basescan.org/tx/{}", result.tx_hash));
    assert_eq!(gateway.send_calls(), 1);

    let tx = gateway.last_tx().unwrap();
    assert_eq!(tx.to, Some(TxKind::Call(UNISWAP_V2_ROUTER_BASE)));
    assert_eq!(tx.value, Some(U256::from(10_000_000_000_000_000u128)));
    assert_eq!(tx.gas, Some(130_000));
    assert_eq!(tx.nonce, Some(7));
    assert_eq!(tx.chain_id, Some(8453));

    let call = decoded_swap(&gateway);
    assert_eq!(call.amountOutMin, U256::from(950_000u64));
    assert_eq!(call.path, vec![WETH_BASE, Address::from_str(USDC_BASE).unwrap()]);
    assert_eq!(call.to, Address::repeat_byte(0x11));
    let now = Utc::now().timestamp() as u64;
    let deadline = call.deadline.to::<u64>();
    assert!(deadline > now + 590 && deadline <= now + 600);

    let completed = engine.list_completed().await;
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].status, TradeStatus::Completed);
    assert!(completed[0].credential.is_none());
}

#[tokio::test]
async fn trade_slippage_sets_minimum_output() {
    let gateway = MockGateway::new();
    let engine = engine(&gateway);

    let mut req = request(dec!(0.01));
    req.slippage_pct = Some(10);
    let trade = assert_ok!(engine.execute_now(req).await);

    assert_eq!(trade.slippage_pct, 10);
    assert_eq!(decoded_swap(&gateway).amountOutMin, U256::from(900_000u64));
}

#[tokio::test]
async fn token_without_code_fails_before_quote() {
    let gateway = MockGateway::new();
    gateway.set_has_code(false);
    let engine = engine(&gateway);

    let trade = assert_ok!(engine.execute_now(request(dec!(0.01))).await);

    assert_eq!(trade.status, TradeStatus::Failed);
    assert_eq!(trade.error, Some(SwapError::InvalidToken { token: USDC_BASE.to_string() }));
    assert_eq!(gateway.quote_calls(), 0);
    assert_eq!(gateway.send_calls(), 0);
}

#[tokio::test]
async fn malformed_token_address_is_invalid_token() {
    let gateway = MockGateway::new();
    let engine = engine(&gateway);

    let mut req = request(dec!(0.01));
    req.token_address = "0x1234".to_string();
    let trade = assert_ok!(engine.execute_now(req).await);

    assert!(matches!(trade.error, Some(SwapError::InvalidToken { .. })));
    assert_eq!(gateway.code_calls(), 0);
    assert_eq!(gateway.quote_calls(), 0);
}

#[tokio::test]
async fn insufficient_balance_is_never_submitted() {
    let gateway = MockGateway::new();
    gateway.set_balance_wei(5_000_000_000_000_000);
    let engine = engine(&gateway);

    let trade = assert_ok!(engine.execute_now(request(dec!(0.01))).await);

    // 0.01 + 100_000 gas * 1 gwei + 0.00005 margin = 0.01015
    let error = trade.error.clone().unwrap();
    assert_eq!(
        error,
        SwapError::InsufficientBalance { shortfall: dec!(0.00515), symbol: "ETH".to_string() }
    );
    assert_eq!(error.to_string(), "Need 0.005150 more ETH");
    assert_eq!(gateway.send_calls(), 0);

    let completed = engine.list_completed().await;
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].status, TradeStatus::Failed);
    assert!(engine.list_scheduled().await.is_empty());
}

#[tokio::test]
async fn zero_output_is_no_liquidity() {
    let gateway = MockGateway::new();
    gateway.set_amounts_out(vec![10_000_000_000_000_000, 0]);
    let engine = engine(&gateway);

    let trade = assert_ok!(engine.execute_now(request(dec!(0.01))).await);

    assert!(matches!(trade.error, Some(SwapError::NoLiquidity { .. })));
    assert_eq!(gateway.send_calls(), 0);
}

#[tokio::test]
async fn router_revert_is_quote_failure() {
    let gateway = MockGateway::new();
    gateway.set_quote_error("UniswapV2Library: INSUFFICIENT_INPUT_AMOUNT");
    let engine = engine(&gateway);

    let trade = assert_ok!(engine.execute_now(request(dec!(0.01))).await);

    match trade.error {
        Some(SwapError::QuoteFailed { message }) => {
            assert!(message.contains("INSUFFICIENT_INPUT_AMOUNT"));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn missing_metadata_degrades_to_defaults() {
    let gateway = MockGateway::new();
    gateway.set_metadata(None, None);
    let engine = engine(&gateway);

    let trade = assert_ok!(engine.execute_now(request(dec!(0.01))).await);

    assert_eq!(trade.status, TradeStatus::Completed);
    let result = trade.result.unwrap();
    assert_eq!(result.symbol, "UNKNOWN");
    // 1_000_000 raw units read with 18 decimals
    assert_eq!(result.tokens_received, dec!(0.000000000001));
}

#[tokio::test]
async fn missing_symbol_keeps_token_decimals() {
    let gateway = MockGateway::new();
    gateway.set_metadata(None, Some(6));
    let engine = engine(&gateway);

    let trade = assert_ok!(engine.execute_now(request(dec!(0.01))).await);

    assert_eq!(trade.status, TradeStatus::Completed);
    let result = trade.result.unwrap();
    assert_eq!(result.symbol, "UNKNOWN");
    assert_eq!(result.tokens_received, dec!(1));
}

#[tokio::test]
async fn missing_decimals_keeps_token_symbol() {
    let gateway = MockGateway::new();
    gateway.set_metadata(Some("USDC"), None);
    let engine = engine(&gateway);

    let trade = assert_ok!(engine.execute_now(request(dec!(0.01))).await);

    assert_eq!(trade.status, TradeStatus::Completed);
    let result = trade.result.unwrap();
    assert_eq!(result.symbol, "USDC");
    assert_eq!(result.tokens_received, dec!(0.000000000001));
}

#[tokio::test]
async fn unsupported_decimals_fall_back_and_swap_proceeds() {
    let gateway = MockGateway::new();
    gateway.set_metadata(Some("WIDE"), Some(80));
    let engine = engine(&gateway);

    let trade = assert_ok!(engine.execute_now(request(dec!(0.01))).await);

    assert_eq!(trade.status, TradeStatus::Completed);
    let result = trade.result.unwrap();
    assert_eq!(result.symbol, "WIDE");
    assert_eq!(result.tokens_received, dec!(0.000000000001));
    assert_eq!(decoded_swap(&gateway).amountOutMin, U256::from(950_000u64));
    assert_eq!(gateway.send_calls(), 1);
}

#[tokio::test]
async fn huge_output_saturates_display_amount() {
    let gateway = MockGateway::new();
    gateway.set_metadata(Some("BIG"), Some(0));
    gateway.set_amounts_out(vec![10_000_000_000_000_000, u128::MAX]);
    let engine = engine(&gateway);

    let trade = assert_ok!(engine.execute_now(request(dec!(0.01))).await);

    assert_eq!(trade.status, TradeStatus::Completed);
    assert_eq!(trade.result.unwrap().tokens_received, Decimal::MAX);
    assert_eq!(gateway.send_calls(), 1);
}

#[tokio::test]
async fn failed_estimate_uses_fallback_gas_limit() {
    let gateway = MockGateway::new();
    gateway.set_estimate(None);
    let engine = engine(&gateway);

    let trade = assert_ok!(engine.execute_now(request(dec!(0.01))).await);

    assert_eq!(trade.status, TradeStatus::Completed);
    assert_eq!(trade.result.unwrap().gas_limit, 300_000);
    assert_eq!(gateway.last_tx().unwrap().gas, Some(300_000));
}

#[tokio::test]
async fn fallback_cost_applies_to_balance_check() {
    let gateway = MockGateway::new();
    gateway.set_estimate(None);
    // covers 0.01 + 0.0001 estimate + margin, but not the 0.0005 fallback
    gateway.set_balance_wei(10_200_000_000_000_000);
    let engine = engine(&gateway);

    let trade = assert_ok!(engine.execute_now(request(dec!(0.01))).await);

    assert_eq!(
        trade.error,
        Some(SwapError::InsufficientBalance { shortfall: dec!(0.0003), symbol: "ETH".to_string() })
    );
}

#[tokio::test]
async fn unreachable_rpc_fails_without_chain_calls() {
    let gateway = MockGateway::new();
    gateway.set_connected(false);
    let engine = engine(&gateway);

    let trade = assert_ok!(engine.execute_now(request(dec!(0.01))).await);

    assert_eq!(trade.error, Some(SwapError::RpcUnavailable { network: "base".to_string() }));
    assert_eq!(gateway.code_calls(), 0);
    assert_eq!(engine.list_completed().await.len(), 1);
}

#[tokio::test]
async fn submission_error_is_recorded_once() {
    let gateway = MockGateway::new();
    gateway.set_send_error("nonce too low");
    let engine = engine(&gateway);

    let trade = assert_ok!(engine.execute_now(request(dec!(0.01))).await);

    match &trade.error {
        Some(SwapError::SubmissionFailed { message }) => assert!(message.contains("nonce too low")),
        other => panic!("unexpected outcome: {:?}", other),
    }
    let completed = engine.list_completed().await;
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].status, TradeStatus::Failed);
    assert!(completed[0].error.is_some());
}

#[tokio::test]
async fn unknown_network_runs_on_default() {
    let gateway = MockGateway::new();
    let engine = engine(&gateway);

    let mut req = request(dec!(0.01));
    req.network = "solana".to_string();
    let trade = assert_ok!(engine.execute_now(req).await);

    assert_eq!(trade.network, "base");
    assert_eq!(gateway.last_tx().unwrap().chain_id, Some(8453));
}

#[tokio::test]
async fn ethereum_trades_use_mainnet_router() {
    let gateway = MockGateway::new();
    let engine = engine(&gateway);

    let mut req = request(dec!(0.01));
    req.network = "ethereum".to_string();
    let trade = assert_ok!(engine.execute_now(req).await);

    assert!(trade.result.unwrap().explorer_url.starts_with("https://etherscan.io/tx/"));
    let tx = gateway.last_tx().unwrap();
    assert_eq!(tx.chain_id, Some(1));
    assert_eq!(tx.to, Some(TxKind::Call(swap_scheduler_bot::types::UNISWAP_V2_ROUTER_MAINNET)));
}

#[tokio::test]
async fn invalid_requests_are_rejected_before_execution() {
    let gateway = MockGateway::new();
    let engine = engine(&gateway);

    let err = assert_err!(engine.execute_now(request(dec!(0))).await);
    assert_eq!(err, ValidationError::NonPositiveAmount(dec!(0)));

    let mut req = request(dec!(0.01));
    req.token_address = "  ".to_string();
    let err = assert_err!(engine.execute_now(req).await);
    assert_eq!(err, ValidationError::MissingField("token_address".to_string()));

    let mut req = request(dec!(0.01));
    req.credential = None;
    let err = assert_err!(engine.execute_now(req).await);
    assert_eq!(err, ValidationError::MissingField("credential".to_string()));

    let past = Utc::now() - ChronoDuration::seconds(5);
    let err = assert_err!(engine.schedule(schedule_request(dec!(0.01), past)).await);
    assert!(matches!(err, ValidationError::ScheduleInPast(_)));

    assert!(engine.list_completed().await.is_empty());
    assert!(engine.list_scheduled().await.is_empty());
    assert_eq!(gateway.send_calls(), 0);
}

#[tokio::test]
async fn default_signer_covers_requests_without_credential() {
    let gateway = MockGateway::new();
    let engine = engine_with_signer(&gateway);

    let mut req = request(dec!(0.01));
    req.credential = None;
    let trade = assert_ok!(engine.execute_now(req).await);

    assert_eq!(trade.status, TradeStatus::Completed);
    assert_eq!(decoded_swap(&gateway).to, Address::repeat_byte(0x11));
}

#[tokio::test]
async fn quote_returns_display_amounts() {
    let gateway = MockGateway::new();
    let engine = engine(&gateway);

    let quote = assert_ok!(engine.quote(USDC_BASE, dec!(0.01), "base", None).await);
    assert_eq!(quote.expected_out, dec!(1));
    assert_eq!(quote.min_out, dec!(0.95));
    assert_eq!(quote.symbol, "USDC");

    let quote = assert_ok!(engine.quote(USDC_BASE, dec!(0.01), "base", Some(50)).await);
    assert_eq!(quote.min_out, dec!(0.5));
    assert_eq!(gateway.send_calls(), 0);
}

#[tokio::test]
async fn quote_reports_connectivity_and_input_errors() {
    let gateway = MockGateway::new();
    let engine = engine(&gateway);

    let err = assert_err!(engine.quote("not-an-address", dec!(0.01), "base", None).await);
    assert!(matches!(err, SwapError::InvalidToken { .. }));

    let err = assert_err!(engine.quote(USDC_BASE, dec!(-1), "base", None).await);
    assert_eq!(err, SwapError::Validation(ValidationError::NonPositiveAmount(dec!(-1))));

    gateway.set_connected(false);
    let err = assert_err!(engine.quote(USDC_BASE, dec!(0.01), "base", None).await);
    assert_eq!(err, SwapError::RpcUnavailable { network: "base".to_string() });
}
