#![allow(dead_code)]

use rpc_calculator::application::session::CalculatorSession;
use rpc_calculator::domain::ports::SessionLifecycle;
use rpc_calculator::infrastructure::in_memory::InMemoryRouter;
use rpc_calculator::interfaces::rpc::message::{ClientMessage, ServerMessage};
use rpc_calculator::interfaces::rpc::server::RpcServer;
use serde_json::Value;
use std::net::SocketAddr;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::TcpListener;
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};

pub const CLEAR: &str = "com.example.calculator.clear";
pub const CALC: &str = "com.example.calculator.calc";

/// Router with a freshly joined calculator session.
pub async fn calculator_router() -> InMemoryRouter {
    let router = InMemoryRouter::new();
    CalculatorSession::default().on_join(&router).await.unwrap();
    router
}

/// Starts the embedded router endpoint on an ephemeral port.
pub async fn spawn_server() -> SocketAddr {
    let router = calculator_router().await;
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(RpcServer::new(router).serve(listener));
    addr
}

pub struct TestClient {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
    next_request: u64,
}

impl TestClient {
    pub async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.unwrap();
        let (reader, writer) = stream.into_split();
        Self {
            lines: BufReader::new(reader).lines(),
            writer,
            next_request: 1,
        }
    }

    pub async fn send_raw(&mut self, line: &str) -> ServerMessage {
        self.send_bytes(line.as_bytes()).await
    }

    /// Sends `bytes` followed by a newline, without any UTF-8 requirement.
    pub async fn send_bytes(&mut self, bytes: &[u8]) -> ServerMessage {
        self.writer.write_all(bytes).await.unwrap();
        self.writer.write_all(b"\n").await.unwrap();
        let reply = self.lines.next_line().await.unwrap().unwrap();
        serde_json::from_str(&reply).unwrap()
    }

    pub async fn call(&mut self, procedure: &str, args: Vec<Value>) -> ServerMessage {
        let request = self.next_request;
        self.next_request += 1;
        let message = ClientMessage::Call {
            request,
            procedure: procedure.to_string(),
            args,
        };
        let line = serde_json::to_string(&message).unwrap();
        self.send_raw(&line).await
    }

    pub async fn calc(&mut self, op: &str, num: &str) -> ServerMessage {
        self.call(CALC, vec![Value::from(op), Value::from(num)]).await
    }
}

/// Unwraps a successful reply into its string value.
pub fn result_value(reply: &ServerMessage) -> &str {
    match reply {
        ServerMessage::Result { value, .. } => value.as_str().unwrap(),
        other => panic!("expected result, got {other:?}"),
    }
}

/// Unwraps an error reply into its error URI.
pub fn error_uri(reply: &ServerMessage) -> &str {
    match reply {
        ServerMessage::Error { error, .. } => error,
        other => panic!("expected error, got {other:?}"),
    }
}
