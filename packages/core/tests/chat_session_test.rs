//! Integration tests for the chat session against a local TCP server.

use std::{
    io::{BufRead, BufReader, Write},
    net::{TcpListener, TcpStream},
    sync::Arc,
    thread,
    time::{Duration, Instant},
};

use spinwheel_core::{
    domain::{EngagementGate, NoopCountdown, ParticipantRegistry, SessionConfig},
    infrastructure::{
        ChatServer, ChatSession, InMemoryParticipantRegistry, SessionError, SessionState,
    },
    usecase::JoinParticipantUseCase,
};

const SERVER_READ_TIMEOUT: Duration = Duration::from_secs(2);

/// Chat server played by the test: one listener, one accepted client.
struct FakeChatServer {
    listener: TcpListener,
}

impl FakeChatServer {
    fn bind() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind listener");
        Self { listener }
    }

    fn address(&self) -> ChatServer {
        let port = self.listener.local_addr().unwrap().port();
        ChatServer::new("127.0.0.1", port)
    }

    fn accept(&self) -> FakeConnection {
        let (stream, _) = self.listener.accept().expect("Failed to accept client");
        stream.set_read_timeout(Some(SERVER_READ_TIMEOUT)).unwrap();
        let reader = BufReader::new(stream.try_clone().unwrap());
        FakeConnection { stream, reader }
    }
}

struct FakeConnection {
    stream: TcpStream,
    reader: BufReader<TcpStream>,
}

impl FakeConnection {
    fn read_line(&mut self) -> String {
        let mut line = String::new();
        self.reader.read_line(&mut line).expect("Failed to read line");
        line
    }

    fn send(&mut self, line: &str) {
        self.stream
            .write_all(format!("{}\r\n", line).as_bytes())
            .unwrap();
    }
}

struct TestWheel {
    registry: Arc<InMemoryParticipantRegistry>,
    gate: EngagementGate,
}

impl TestWheel {
    fn new(open: bool) -> Self {
        let gate = EngagementGate::new();
        gate.set_open(open, &mut NoopCountdown, 60);
        Self {
            registry: Arc::new(InMemoryParticipantRegistry::new()),
            gate,
        }
    }

    fn join_usecase(&self) -> JoinParticipantUseCase {
        JoinParticipantUseCase::new(self.registry.clone(), self.gate.clone())
    }

    fn names(&self) -> Vec<String> {
        self.registry
            .snapshot()
            .iter()
            .map(|p| p.name().to_string())
            .collect()
    }
}

fn test_config() -> SessionConfig {
    SessionConfig::new("oauth:secret", "hostnick", "#hostnick")
}

/// Poll `condition` until it holds or two seconds pass.
fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    condition()
}

#[test]
fn test_session_logs_in_with_three_lines() {
    // テスト項目: 接続時に PASS / NICK / JOIN が順に送信される
    // given (前提条件):
    let server = FakeChatServer::bind();
    let wheel = TestWheel::new(false);

    // when (操作):
    let session = ChatSession::start(&test_config(), &server.address(), wheel.join_usecase())
        .expect("Failed to start session");
    let mut connection = server.accept();

    // then (期待する結果):
    assert_eq!(connection.read_line(), "PASS oauth:secret\r\n");
    assert_eq!(connection.read_line(), "NICK hostnick\r\n");
    assert_eq!(connection.read_line(), "JOIN #hostnick\r\n");
    assert!(wait_until(|| session.status() == SessionState::Receiving));

    session.shutdown();
}

#[test]
fn test_session_answers_keepalive() {
    // テスト項目: サーバーからの PING に PONG で応答する
    // given (前提条件):
    let server = FakeChatServer::bind();
    let wheel = TestWheel::new(false);
    let session = ChatSession::start(&test_config(), &server.address(), wheel.join_usecase())
        .expect("Failed to start session");
    let mut connection = server.accept();
    for _ in 0..3 {
        connection.read_line();
    }

    // when (操作):
    connection.send("PING :tmi.example.org");

    // then (期待する結果):
    assert_eq!(connection.read_line(), "PONG :tmi.example.org\r\n");

    session.shutdown();
}

#[test]
fn test_join_commands_fill_registry_while_open() {
    // テスト項目: 受付中は !join の送信者が一度だけ、到着順に登録される
    // given (前提条件):
    let server = FakeChatServer::bind();
    let wheel = TestWheel::new(true);
    let session = ChatSession::start(&test_config(), &server.address(), wheel.join_usecase())
        .expect("Failed to start session");
    let mut connection = server.accept();

    // when (操作):
    connection.send(":alice!alice@alice.tmi.twitch.tv PRIVMSG #hostnick :!join");
    connection.send("@color=#00FF00 :bob!bob@bob.tmi.twitch.tv PRIVMSG #hostnick :!Join me");
    connection.send(":alice!alice@alice.tmi.twitch.tv PRIVMSG #hostnick :!join again");
    connection.send(":carol!carol@carol.tmi.twitch.tv PRIVMSG #hostnick :hello");
    connection.send("PING :tmi.twitch.tv");
    // PONG arrives after every earlier line was handled
    for _ in 0..3 {
        connection.read_line();
    }
    assert_eq!(connection.read_line(), "PONG :tmi.twitch.tv\r\n");

    // then (期待する結果):
    assert_eq!(wheel.names(), vec!["alice", "bob"]);

    session.shutdown();
}

#[test]
fn test_join_commands_dropped_while_closed() {
    // テスト項目: 受付終了中の !join は登録されない
    // given (前提条件):
    let server = FakeChatServer::bind();
    let wheel = TestWheel::new(false);
    let session = ChatSession::start(&test_config(), &server.address(), wheel.join_usecase())
        .expect("Failed to start session");
    let mut connection = server.accept();
    for _ in 0..3 {
        connection.read_line();
    }

    // when (操作):
    connection.send(":alice!alice@alice.tmi.twitch.tv PRIVMSG #hostnick :!join");
    connection.send("PING :sync");
    assert_eq!(connection.read_line(), "PONG :sync\r\n");

    // then (期待する結果):
    assert!(wheel.registry.is_empty());

    session.shutdown();
}

#[test]
fn test_server_disconnect_closes_session() {
    // テスト項目: サーバーが切断するとセッションは終了状態になり、再接続しない
    // given (前提条件):
    let server = FakeChatServer::bind();
    let wheel = TestWheel::new(true);
    let session = ChatSession::start(&test_config(), &server.address(), wheel.join_usecase())
        .expect("Failed to start session");

    // when (操作):
    drop(server.accept());

    // then (期待する結果):
    assert!(wait_until(|| session.is_finished()));
    assert_eq!(session.status(), SessionState::Closed);
    server.listener.set_nonblocking(true).unwrap();
    assert!(server.listener.accept().is_err());
}

#[test]
fn test_connection_refused_is_reported() {
    // テスト項目: 接続できない場合は Connect エラーが返される
    // given (前提条件):
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let wheel = TestWheel::new(true);

    // when (操作):
    let result = ChatSession::start(
        &test_config(),
        &ChatServer::new("127.0.0.1", port),
        wheel.join_usecase(),
    );

    // then (期待する結果):
    assert!(matches!(result, Err(SessionError::Connect { .. })));
}

#[test]
fn test_shutdown_returns_promptly() {
    // テスト項目: シャットダウン要求は受信タイムアウト程度の時間で完了する
    // given (前提条件):
    let server = FakeChatServer::bind();
    let wheel = TestWheel::new(false);
    let session = ChatSession::start(&test_config(), &server.address(), wheel.join_usecase())
        .expect("Failed to start session");
    let _connection = server.accept();
    assert!(wait_until(|| session.status() == SessionState::Receiving));

    // when (操作):
    let started = Instant::now();
    session.shutdown();

    // then (期待する結果):
    assert!(started.elapsed() < Duration::from_secs(1));
}
