//! Behavioural tests for the JSONL bridge over a live socket.

use std::cell::RefCell;
use std::io::{BufRead, BufReader, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::sync::Arc;
use std::time::Duration;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Value, json};

use dockworker_config::{SocketEndpoint, default_api_version};

use crate::backend::BackendFactory;
use crate::bus::{BridgeConnectionHandler, BusFrame};
use crate::dispatch::{Dispatcher, Notification, OperationRegistry};
use crate::transport::{ListenerHandle, SocketListener};

use super::support::{MockClient, factory_expecting_connect};

const READ_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Default)]
struct BridgeWorld {
    listener: Option<ListenerHandle>,
    address: Option<SocketAddr>,
    frames: Vec<BusFrame>,
}

impl BridgeWorld {
    fn start(&mut self) {
        let mut client = MockClient::new();
        client
            .expect_stop()
            .withf(|container, _| container == "testing")
            .times(1)
            .returning(|_, _| Ok(Value::Null));
        let factory = factory_expecting_connect("localhost", client);
        let dispatcher = Dispatcher::new(
            Arc::new(OperationRegistry::standard()),
            Arc::new(factory) as Arc<dyn BackendFactory>,
            default_api_version(),
        );

        let listener =
            SocketListener::bind(&SocketEndpoint::tcp("127.0.0.1", 0)).expect("bind listener");
        self.address = listener.local_addr();
        self.listener = Some(
            listener
                .start(Arc::new(BridgeConnectionHandler::new(dispatcher)))
                .expect("start listener"),
        );
    }

    fn exchange(&mut self, lines: &[String]) {
        let address = self.address.expect("listener address");
        let mut stream = TcpStream::connect(address).expect("connect");
        stream
            .set_read_timeout(Some(READ_TIMEOUT))
            .expect("set read timeout");
        for line in lines {
            stream.write_all(line.as_bytes()).expect("write line");
            stream.write_all(b"\n").expect("write newline");
        }
        stream.flush().expect("flush");
        stream.shutdown(Shutdown::Write).expect("close write half");

        let reader = BufReader::new(stream);
        for line in reader.lines() {
            let line = line.expect("read frame");
            self.frames
                .push(serde_json::from_str(&line).expect("decode frame"));
        }
    }

    fn replies_and_notifications(&self) -> impl Iterator<Item = &BusFrame> {
        self.frames
            .iter()
            .filter(|frame| matches!(frame, BusFrame::Reply { .. } | BusFrame::Notify { .. }))
    }
}

impl Drop for BridgeWorld {
    fn drop(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.shutdown();
            drop(listener.join());
        }
    }
}

fn stop_delivery(tag: u64, correlation_id: &str) -> String {
    json!({
        "delivery_tag": tag,
        "correlation_id": correlation_id,
        "reply_to": "reply-queue",
        "body": {"parameters": {
            "subcommand": "StopContainer",
            "server_name": "localhost",
            "container_name": "testing",
        }},
    })
    .to_string()
}

#[fixture]
fn world() -> RefCell<BridgeWorld> {
    RefCell::new(BridgeWorld::default())
}

#[given("a worker listening for the bridge")]
fn given_listening_worker(world: &RefCell<BridgeWorld>) {
    world.borrow_mut().start();
}

#[when("the bridge relays a StopContainer delivery tagged {tag} with correlation id \"{id}\"")]
fn when_delivery_relayed(world: &RefCell<BridgeWorld>, tag: u64, id: String) {
    world.borrow_mut().exchange(&[stop_delivery(tag, &id)]);
}

#[when(
    "the bridge sends a malformed line before a StopContainer delivery tagged {tag} with correlation id \"{id}\""
)]
fn when_malformed_then_delivery(world: &RefCell<BridgeWorld>, tag: u64, id: String) {
    world
        .borrow_mut()
        .exchange(&["{not json".to_owned(), stop_delivery(tag, &id)]);
}

#[then("the frames are an ack, a started reply, a completed reply and a notification")]
fn then_ordered_frames(world: &RefCell<BridgeWorld>) {
    let world = world.borrow();
    assert!(
        matches!(
            world.frames.as_slice(),
            [
                BusFrame::Ack { .. },
                BusFrame::Reply {
                    payload: Notification::Started,
                    ..
                },
                BusFrame::Reply {
                    payload: Notification::Completed { .. },
                    ..
                },
                BusFrame::Notify { .. },
            ]
        ),
        "unexpected frames: {:?}",
        world.frames
    );
}

#[then("every reply and notification carries correlation id \"{id}\"")]
fn then_correlated(world: &RefCell<BridgeWorld>, id: String) {
    let world = world.borrow();
    for frame in world.replies_and_notifications() {
        match frame {
            BusFrame::Reply { correlation_id, .. } | BusFrame::Notify { correlation_id, .. } => {
                assert_eq!(correlation_id.as_str(), id);
            }
            other => panic!("unexpected frame {other:?}"),
        }
    }
}

#[then("the first frame is an error report")]
fn then_first_frame_error(world: &RefCell<BridgeWorld>) {
    let world = world.borrow();
    assert!(
        matches!(world.frames.first(), Some(BusFrame::Error { .. })),
        "unexpected frames: {:?}",
        world.frames
    );
}

#[then("delivery {tag} is acknowledged")]
fn then_delivery_acknowledged(world: &RefCell<BridgeWorld>, tag: u64) {
    let world = world.borrow();
    let acknowledged = world.frames.iter().any(|frame| match frame {
        BusFrame::Ack { delivery_tag } => delivery_tag.get() == tag,
        _ => false,
    });
    assert!(acknowledged, "no ack for {tag}: {:?}", world.frames);
}

#[scenario(path = "tests/features/bus_bridge.feature")]
fn bus_bridge(world: RefCell<BridgeWorld>) {
    let _ = world;
}
