//! End-to-end transfer wizard over HTTP
//!
//! Fee tables come from the mocked backend, the coordinator submits through
//! the real ApiClient.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tesapay_transfers::api::{ApiClient, Session};
use tesapay_transfers::config::{ApiConfig, TransferPolicy};
use tesapay_transfers::transfer::{
    CryptoForm, MomoForm, Presentation, TransferCoordinator, TransferError, TransferStep,
    TransferType,
};
use tesapay_transfers::wallet::{Wallet, WalletBook};

async fn backend() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get_transfer_fees.php"))
        .and(query_param("type", "momo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "momo_fees": [
                {"min_amount": "0", "max_amount": "1000", "fee_type": "flat", "fee_value": "10"},
                {"min_amount": "1000.01", "max_amount": null, "fee_type": "percentage", "fee_value": "1"}
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/get_transfer_fees.php"))
        .and(query_param("type", "crypto"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "crypto_fees": [
                {"crypto_type": "USDT", "network_type": "TRC20", "blockchain_fee": "1.5"}
            ],
            "platform_fees": [
                {"min_amount": "0", "max_amount": null, "fee_type": "percentage", "fee_value": "1"}
            ]
        })))
        .mount(&server)
        .await;
    server
}

async fn coordinator(server: &MockServer, usd: i64) -> TransferCoordinator {
    let config = ApiConfig {
        base_url: server.uri(),
        request_timeout_secs: 5,
    };
    let client = ApiClient::new(&config, Session::new(42)).unwrap();
    let fees = client.fee_tables().await.unwrap();
    let wallets = WalletBook::new(vec![
        Wallet::new("USD", Decimal::from(usd)),
        Wallet::new("GHS", Decimal::from(1500)),
    ]);
    TransferCoordinator::new(Arc::new(client), wallets, fees, TransferPolicy::default())
}

fn enter_pin(coordinator: &mut TransferCoordinator, pin: &str) {
    for (index, digit) in pin.chars().enumerate() {
        coordinator.enter_pin_digit(index, digit).unwrap();
    }
}

#[tokio::test]
async fn test_momo_transfer_submitted_once() {
    let server = backend().await;
    Mock::given(method("POST"))
        .and(path("/transfers.php"))
        .and(body_partial_json(json!({
            "user_id": 42,
            "transfer_type": "momo",
            "amount": "510",
            "currency": "GHS",
            "recipient_info": {"sendAmount": "500", "platformFee": "10"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Transfer successful"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut wizard = coordinator(&server, 100).await;
    wizard.select_channel(TransferType::Momo).unwrap();
    wizard
        .compose(&MomoForm {
            momo_number: "0201112233".into(),
            momo_name: "Akosua Asante".into(),
            amount: "500".into(),
            currency: "ghs".into(),
            description: Some("school fees".into()),
        })
        .unwrap();
    enter_pin(&mut wizard, "54321");

    let receipt = wizard.confirm().await.unwrap();
    assert_eq!(receipt.message.as_deref(), Some("Transfer successful"));
    assert!(matches!(wizard.step(), TransferStep::Done { .. }));

    // Done only accepts Reset
    assert!(wizard.confirm().await.is_err());
}

#[tokio::test]
async fn test_crypto_over_balance_makes_no_submission() {
    let server = backend().await;
    Mock::given(method("POST"))
        .and(path("/transfers.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(0)
        .mount(&server)
        .await;

    let mut wizard = coordinator(&server, 100).await;
    wizard.select_channel(TransferType::Crypto).unwrap();
    let err = wizard
        .compose(&CryptoForm {
            crypto_type: "USDT".into(),
            wallet_address: "TXYZopYRdj2D9XRtbG411XZZ3kM5VkAeBf".into(),
            network_type: "TRC20".into(),
            amount: "100".into(),
            description: None,
        })
        .unwrap_err();

    assert_eq!(err.presentation(), Presentation::Dialog);
    assert!(matches!(
        err,
        TransferError::InsufficientBalance { required, .. } if required == Decimal::new(1025, 1)
    ));
}

#[tokio::test]
async fn test_rejected_transfer_keeps_user_on_confirm() {
    let server = backend().await;
    Mock::given(method("POST"))
        .and(path("/transfers.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "Incorrect transaction PIN"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut wizard = coordinator(&server, 100).await;
    wizard.select_channel(TransferType::Momo).unwrap();
    wizard
        .compose(&MomoForm {
            momo_number: "0201112233".into(),
            momo_name: "Akosua Asante".into(),
            amount: "25".into(),
            currency: "GHS".into(),
            description: None,
        })
        .unwrap();
    enter_pin(&mut wizard, "00001");

    let err = wizard.confirm().await.unwrap_err();
    assert_eq!(err.user_message(), "Incorrect transaction PIN");
    assert_eq!(wizard.step().as_str(), "CONFIRM");
    assert_eq!(wizard.step().last_error(), Some(&err));
}
