mod common;

use common::{CLEAR, TestClient, error_uri, result_value, spawn_server};
use rpc_calculator::interfaces::rpc::message::ServerMessage;
use rpc_calculator::interfaces::rpc::server::MAX_LINE_BYTES;
use serde_json::json;

#[tokio::test]
async fn test_calculation_over_tcp() {
    let addr = spawn_server().await;
    let mut client = TestClient::connect(addr).await;

    assert_eq!(result_value(&client.call(CLEAR, vec![]).await), "0");
    assert_eq!(result_value(&client.calc("+", "1.5").await), "1.5");
    assert_eq!(result_value(&client.calc("*", "2.5").await), "4.0");
    assert_eq!(result_value(&client.calc("=", "4").await), "16.0");
}

#[tokio::test]
async fn test_replies_echo_request_ids() {
    let addr = spawn_server().await;
    let mut client = TestClient::connect(addr).await;

    let reply = client
        .send_raw(r#"{"type":"call","request":42,"procedure":"com.example.calculator.clear","args":[]}"#)
        .await;
    assert_eq!(
        reply,
        ServerMessage::Result {
            request: 42,
            value: json!("0"),
        }
    );
}

#[tokio::test]
async fn test_errors_keep_the_connection_usable() {
    let addr = spawn_server().await;
    let mut client = TestClient::connect(addr).await;

    client.calc("/", "9").await;
    assert_eq!(
        error_uri(&client.calc("/", "0").await),
        "com.example.calculator.error.division_by_zero"
    );
    assert_eq!(
        error_uri(&client.calc("+", "twelve").await),
        "com.example.calculator.error.invalid_operand"
    );
    assert_eq!(
        error_uri(&client.send_raw("{not json").await),
        "wamp.error.protocol_violation"
    );
    assert_eq!(
        error_uri(&client.call("com.example.calculator.sqrt", vec![json!("4")]).await),
        "wamp.error.no_such_procedure"
    );
    assert_eq!(
        error_uri(&client.call(common::CALC, vec![json!("+")]).await),
        "wamp.error.invalid_argument"
    );

    assert_eq!(result_value(&client.calc("=", "3").await), "3");
}

#[tokio::test]
async fn test_callers_share_one_calculator() {
    let addr = spawn_server().await;
    let mut alice = TestClient::connect(addr).await;
    let mut bob = TestClient::connect(addr).await;

    assert_eq!(result_value(&alice.calc("+", "10").await), "10");
    assert_eq!(result_value(&bob.calc("-", "4").await), "14");
    assert_eq!(result_value(&alice.calc("=", "1").await), "13");
}

#[tokio::test]
async fn test_bad_bytes_do_not_drop_the_caller() {
    let addr = spawn_server().await;
    let mut client = TestClient::connect(addr).await;

    assert_eq!(result_value(&client.calc("+", "4").await), "4");
    assert_eq!(
        error_uri(&client.send_bytes(b"\xff\xfe\xfd").await),
        "wamp.error.protocol_violation"
    );
    assert_eq!(
        error_uri(&client.send_bytes(&vec![b'{'; MAX_LINE_BYTES + 1]).await),
        "wamp.error.protocol_violation"
    );

    // Same connection, same accumulator
    assert_eq!(result_value(&client.calc("=", "1").await), "5");
}

#[tokio::test]
async fn test_fractional_json_number_is_rejected_over_tcp() {
    let addr = spawn_server().await;
    let mut client = TestClient::connect(addr).await;

    let reply = client
        .send_raw(r#"{"type":"call","request":5,"procedure":"com.example.calculator.calc","args":["+",0.12345678901234567890123]}"#)
        .await;
    assert_eq!(error_uri(&reply), "wamp.error.invalid_argument");

    assert_eq!(
        result_value(&client.calc("+", "0.12345678901234567890123").await),
        "0.12345678901234567890123"
    );
}
