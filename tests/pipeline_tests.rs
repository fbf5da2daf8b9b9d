//! End-to-end pipeline tests: build → sign → wire encoding, and the
//! dry-run path through `OrderPipeline` without any network.

use alloy::sol_types::SolStruct as _;
use polymarket_order_service::POLYGON;
use polymarket_order_service::config::{HttpPolicy, Settings};
use polymarket_order_service::error::Kind;
use polymarket_order_service::order::builder::{AccountContext, OrderBuilder, OrderPolicy};
use polymarket_order_service::order::intent::TradingIntent;
use polymarket_order_service::order::signer::OrderSigner;
use polymarket_order_service::order::types::{Side, SignatureType, SignedOrder};
use polymarket_order_service::pipeline::OrderPipeline;
use rust_decimal_macros::dec;
use secrecy::SecretString;
use url::Url;

const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
const TEST_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

fn test_signer() -> OrderSigner {
    OrderSigner::from_key(&SecretString::from(TEST_KEY.to_owned()), POLYGON)
        .expect("test key must parse")
}

fn buy_intent() -> TradingIntent {
    TradingIntent::builder()
        .market_id("123456")
        .side(Side::Buy)
        .price(dec!(0.55))
        .size(dec!(10))
        .build()
}

async fn signed_buy() -> SignedOrder {
    let signer = test_signer();
    let account = AccountContext::resolve(signer.address(), None, SignatureType::Eoa)
        .expect("account must resolve");
    let canonical = OrderBuilder::new(account, OrderPolicy::default())
        .build(&buy_intent())
        .expect("order must build");
    signer.sign(&canonical).await.expect("order must sign")
}

fn dry_run_settings() -> Settings {
    Settings {
        clob_host: Url::parse("https://clob.invalid").expect("url"),
        chain_id: POLYGON,
        private_key: Some(SecretString::from(TEST_KEY.to_owned())),
        proxy_address: None,
        signature_type: SignatureType::Eoa,
        dry_run: true,
        api_key: None,
        api_secret: None,
        api_passphrase: None,
        shared_secret: None,
        bind_addr: "127.0.0.1:0".parse().expect("addr"),
        http: HttpPolicy::default(),
    }
}

#[tokio::test]
async fn signature_survives_the_wire_encoding() {
    let signer = test_signer();
    let signed = signed_buy().await;

    // The signature covers the exact struct embedded in the payload.
    let domain = signer.domain(false).expect("domain");
    let digest = signed.order.eip712_signing_hash(&domain);
    let recovered = signed
        .signature
        .recover_address_from_prehash(&digest)
        .expect("recovery must work");
    assert_eq!(recovered.to_string(), TEST_ADDRESS);
}

#[tokio::test]
async fn wire_payload_matches_the_exchange_shape() {
    let signed = signed_buy().await;
    let payload = signed.wire_payload("api-key-id").expect("payload must build");
    let json = serde_json::to_value(&payload).expect("payload must serialize");

    assert_eq!(json["owner"], "api-key-id");
    assert_eq!(json["orderType"], "GTC");

    let order = &json["order"];
    assert!(order["salt"].is_u64());
    assert_eq!(order["maker"], TEST_ADDRESS);
    assert_eq!(order["signer"], TEST_ADDRESS);
    assert_eq!(order["tokenId"], "123456");
    assert_eq!(order["makerAmount"], "5500000");
    assert_eq!(order["takerAmount"], "10000000");
    assert_eq!(order["expiration"], "0");
    assert_eq!(order["nonce"], "0");
    assert_eq!(order["feeRateBps"], "0");
    assert_eq!(order["side"], "BUY");
    assert_eq!(order["signatureType"], 0);

    let signature = order["signature"].as_str().expect("signature string");
    assert!(signature.starts_with("0x"));
    assert_eq!(signature.len(), 2 + 65 * 2);
}

#[tokio::test]
async fn dry_run_pipeline_accepts_without_an_order_id() {
    let pipeline = OrderPipeline::from_settings(&dry_run_settings())
        .await
        .expect("pipeline must build");

    let intent = TradingIntent::builder()
        .market_id("0xABC")
        .side(Side::Buy)
        .price(dec!(0.55))
        .size(dec!(10))
        .build();
    let placed = pipeline.place(&intent).await.expect("dry run must pass");

    assert!(placed.result.accepted);
    assert!(placed.result.dry_run);
    assert!(placed.result.order_id.is_none());
    assert_eq!(placed.normalized.side, "BUY");
    assert_eq!(placed.normalized.price, dec!(0.55));
}

#[tokio::test]
async fn invalid_price_never_reaches_signer_or_network() {
    let pipeline = OrderPipeline::from_settings(&dry_run_settings())
        .await
        .expect("pipeline must build");

    let intent = TradingIntent::builder()
        .market_id("0xABC")
        .side(Side::Buy)
        .price(dec!(1.2))
        .size(dec!(10))
        .build();
    let err = pipeline.place(&intent).await.expect_err("must fail");
    assert_eq!(err.kind(), Kind::Validation);
}

#[tokio::test]
async fn missing_key_fails_closed() {
    let settings = Settings {
        private_key: None,
        ..dry_run_settings()
    };
    let pipeline = OrderPipeline::from_settings(&settings)
        .await
        .expect("pipeline must build");

    let err = pipeline.place(&buy_intent()).await.expect_err("must fail");
    assert_eq!(err.kind(), Kind::Signing);
}
