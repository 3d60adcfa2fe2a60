//! End-to-end decoding: raw serial bytes in, events out

use std::sync::Arc;

use pretty_assertions::assert_eq;
use tracing_subscriber::EnvFilter;
use zwrust_core::{ApplicationCommand, Frame, FrameError, MessageClass, NodeInfo};
use zwrust_protocol::command_class::{
    AssociationGroupInfoHandler, BasicHandler, CommandClassHandler, Crc16Handler, MeterHandler,
    MultiInstanceHandler, SwitchBinaryHandler,
};
use zwrust_protocol::{Dispatcher, RecordingSink, Registry};
use zwrust_types::{CommandClassId, Decimal, Event, EventKind, MeterScale, MeterType};

fn dispatcher() -> (Dispatcher, RecordingSink) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let sink = RecordingSink::new();
    let dispatcher = Dispatcher::new(Arc::new(Registry::standard()), Arc::new(sink.clone()));
    (dispatcher, sink)
}

/// Serial bytes of an ApplicationCommandHandler request from `node_id`
fn inbound(node_id: u8, payload: &[u8]) -> Vec<u8> {
    ApplicationCommand::new(node_id, payload.to_vec())
        .into_frame()
        .expect("command fits a frame")
        .encode()
        .to_vec()
}

fn dispatch_bytes(dispatcher: &mut Dispatcher, bytes: &[u8]) -> Vec<Event> {
    let frame = Frame::parse(bytes).expect("valid frame");
    dispatcher.dispatch(&frame)
}

#[test]
fn basic_get_fixture() {
    const BASIC_GET: [u8; 11] = [0x01, 0x09, 0x00, 0x13, 0x63, 0x02, 0x20, 0x02, 0x00, 0x00, 0xA6];

    let frame = Frame::parse(&BASIC_GET).unwrap();
    assert!(Frame::is_valid(&BASIC_GET));
    assert_eq!(frame.message_class, MessageClass::SendData);

    let mut dispatcher = Dispatcher::standard();
    let request = dispatcher.handler_mut::<BasicHandler>(99, 0).unwrap().encode_get();
    assert_eq!(request.into_frame().unwrap().encode().as_ref(), &BASIC_GET);

    for index in 4..BASIC_GET.len() - 1 {
        let mut corrupted = BASIC_GET;
        corrupted[index] ^= 0x01;
        assert!(
            matches!(
                Frame::parse(&corrupted),
                Err(FrameError::ChecksumMismatch { .. })
            ),
            "byte {index} flipped"
        );
    }
}

#[test]
fn meter_report_scaled_decimal() {
    let (mut dispatcher, sink) = dispatcher();
    dispatcher.nodes_mut().set_class_version(12, 0, 0x32, 2);

    let events = dispatch_bytes(
        &mut dispatcher,
        &inbound(12, &[0x32, 0x02, 0x21, 0x34, 0x00, 0x00, 0x01, 0xB7]),
    );

    assert_eq!(events.len(), 1);
    let EventKind::Meter(reading) = &events[0].kind else {
        panic!("expected meter reading, got {:?}", events[0].kind);
    };
    assert_eq!(reading.meter_type, MeterType::Electric);
    assert_eq!(reading.scale, MeterScale::ElectricW);
    assert_eq!(reading.value, Decimal::new(439, 1));
    assert_eq!(reading.value.to_string(), "43.9");
    assert_eq!(sink.len(), 1);
}

#[test]
fn multi_instance_switch_binary() {
    let (mut dispatcher, sink) = dispatcher();

    // instance report: two Switch Binary instances
    dispatch_bytes(&mut dispatcher, &inbound(7, &[0x60, 0x05, 0x25, 0x02]));
    sink.drain();

    let events = dispatch_bytes(
        &mut dispatcher,
        &inbound(7, &[0x60, 0x06, 0x02, 0x25, 0x03, 0xFF]),
    );

    assert_eq!(
        events,
        vec![Event::new(
            7,
            2,
            CommandClassId::SwitchBinary,
            EventKind::SwitchBinary {
                value: 255,
                target: None,
                duration: None
            }
        )]
    );
    assert_eq!(sink.events(), events);
}

#[test]
fn multi_channel_endpoint_discovery() {
    let (mut dispatcher, _) = dispatcher();
    dispatcher.nodes_mut().set_class_version(7, 0, 0x60, 3);

    // two endpoints, capabilities of endpoint 1
    dispatch_bytes(&mut dispatcher, &inbound(7, &[0x60, 0x08, 0x00, 0x02]));
    dispatch_bytes(
        &mut dispatcher,
        &inbound(7, &[0x60, 0x0A, 0x01, 0x10, 0x01, 0x25, 0x32]),
    );

    let node = dispatcher.nodes().node(7).unwrap();
    assert_eq!(node.endpoint_ids().collect::<Vec<_>>(), vec![0, 1, 2]);
    assert!(node.endpoint(1).unwrap().supports_class(0x32));
    assert_eq!(node.endpoint(1).unwrap().generic_class(), Some(0x10));

    let events = dispatch_bytes(
        &mut dispatcher,
        &inbound(7, &[0x60, 0x0D, 0x01, 0x00, 0x25, 0x03, 0x00]),
    );
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].endpoint, 1);

    // requests for an endpoint are encapsulated
    let request = dispatcher.handler_mut::<SwitchBinaryHandler>(7, 1).unwrap().encode_get();
    assert_eq!(request.payload.as_ref(), &[0x60, 0x0D, 0x00, 0x01, 0x25, 0x02]);
}

#[test]
fn encapsulated_request_decodes_on_loopback() {
    let (mut dispatcher, _) = dispatcher();
    dispatcher.nodes_mut().set_class_version(7, 0, 0x60, 2);

    let multi = dispatcher.handler_mut::<MultiInstanceHandler>(7, 0).unwrap();
    let request = multi.encapsulate(3, &[0x20, 0x03, 0x40]).unwrap();

    // device answers with the same encapsulation from endpoint 3
    dispatcher.nodes_mut().add_node(7).add_endpoint(3).add_class(0x20);
    let mut reply = request.payload.to_vec();
    reply[2] = 0x03;
    reply[3] = 0x00;

    let events = dispatch_bytes(&mut dispatcher, &inbound(7, &reply));
    assert_eq!(
        events,
        vec![Event::new(7, 3, CommandClassId::Basic, EventKind::Basic { value: 0x40 })]
    );
}

#[test]
fn unknown_command_class_yields_nothing() {
    let (mut dispatcher, sink) = dispatcher();
    let events = dispatch_bytes(&mut dispatcher, &inbound(4, &[0xFF, 0x01, 0x02, 0x03]));
    assert!(events.is_empty());
    assert!(sink.is_empty());
}

#[test]
fn unknown_sub_command_yields_nothing() {
    let (mut dispatcher, _) = dispatcher();
    let events = dispatch_bytes(&mut dispatcher, &inbound(4, &[0x20, 0x7F, 0x01]));
    assert!(events.is_empty());
}

#[test]
fn truncated_payloads_never_panic() {
    let reports: [&[u8]; 6] = [
        &[0x32, 0x02, 0x21, 0x34, 0x00, 0x00, 0x01, 0xB7],
        &[0x71, 0x05, 0x00, 0x00, 0x00, 0xFF, 0x07, 0x08, 0x00],
        &[0x59, 0x04, 0x02, 0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00],
        &[0x70, 0x06, 0x03, 0x04, 0x00, 0x00, 0x00, 0x10],
        &[0x72, 0x05, 0x01, 0x0F, 0x00, 0x03, 0x00, 0x05],
        &[0x86, 0x12, 0x03, 0x04, 0x05, 0x01, 0x02],
    ];

    let (mut dispatcher, _) = dispatcher();
    for report in reports {
        for len in 0..=report.len() {
            dispatcher.dispatch_command(9, 0, &report[..len]);
        }
    }
}

#[test]
fn crc16_nested_command() {
    let (mut dispatcher, _) = dispatcher();

    let crc = dispatcher.handler_mut::<Crc16Handler>(5, 0).unwrap();
    let request = crc.encapsulate(&[0x80, 0x03, 0x5A]);

    let events = dispatch_bytes(&mut dispatcher, &inbound(5, &request.payload));
    assert_eq!(
        events,
        vec![Event::new(
            5,
            0,
            CommandClassId::Battery,
            EventKind::Battery { level: 90, low: false }
        )]
    );
}

#[test]
fn version_discovery_changes_layout() {
    let (mut dispatcher, _) = dispatcher();
    // scale bit 2 is only read from version 3
    let report = [0x32, 0x02, 0xA1, 0x21, 0x0A];

    let before = dispatcher.dispatch_command(3, 0, &report);
    dispatcher.dispatch_command(3, 0, &[0x86, 0x14, 0x32, 0x03]);
    let after = dispatcher.dispatch_command(3, 0, &report);

    let scale = |events: &[Event]| match &events[0].kind {
        EventKind::Meter(reading) => reading.scale,
        other => panic!("unexpected {other:?}"),
    };
    assert_eq!(scale(&before), MeterScale::ElectricKwh);
    assert_eq!(scale(&after), MeterScale::ElectricV);
    assert_eq!(dispatcher.handler::<MeterHandler>(3, 0).unwrap().version(), 3);
}

#[test]
fn association_group_info_order_independent() {
    let name = [0x59, 0x02, 0x01, 0x08, b'L', b'i', b'f', b'e', b'l', b'i', b'n', b'e'];
    let profile = [0x59, 0x04, 0x01, 0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00];
    let commands = [0x59, 0x06, 0x01, 0x02, 0x5A, 0x01];

    let (mut forward, _) = dispatcher();
    for report in [&name[..], &profile[..], &commands[..]] {
        forward.dispatch_command(2, 0, report);
    }
    let (mut shuffled, _) = dispatcher();
    for report in [&commands[..], &profile[..], &name[..]] {
        shuffled.dispatch_command(2, 0, report);
    }

    let group = forward
        .handler::<AssociationGroupInfoHandler>(2, 0)
        .and_then(|agi| agi.group(1))
        .cloned()
        .unwrap();
    assert_eq!(group.name.as_deref(), Some("Lifeline"));
    assert_eq!(group.profile, Some(1));
    assert!(!group.commands.as_deref().unwrap_or_default().is_empty());

    assert_eq!(
        shuffled.handler::<AssociationGroupInfoHandler>(2, 0).and_then(|agi| agi.group(1)),
        Some(&group)
    );
}

#[test]
fn node_information_populates_directory() {
    let (mut dispatcher, _) = dispatcher();
    let info = NodeInfo {
        node_id: 14,
        basic_class: 0x04,
        generic_class: 0x31,
        specific_class: 0x01,
        supported: vec![0x32, 0x60, 0x86],
        controlled: vec![0x20],
    };
    let frame = info.into_frame().unwrap();

    assert!(dispatch_bytes(&mut dispatcher, &frame.encode()).is_empty());
    assert!(dispatcher.nodes().supports(14, 0, 0x60, 1));
    assert!(!dispatcher.nodes().supports(14, 0, 0x20, 1));
}
