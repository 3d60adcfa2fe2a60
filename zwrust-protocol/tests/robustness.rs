//! Arbitrary input must never panic the engine

use proptest::prelude::*;
use zwrust_protocol::{Dispatcher, Registry};

/// Every registered class id, so payloads reach real handlers
fn class_id() -> impl Strategy<Value = u8> {
    let ids: Vec<u8> = Registry::standard().ids().map(|id| id.id()).collect();
    prop::sample::select(ids)
}

proptest! {
    #[test]
    fn random_commands_never_panic(
        class in class_id(),
        command in any::<u8>(),
        body in prop::collection::vec(any::<u8>(), 0..48),
        version in 1u8..=8,
    ) {
        let mut dispatcher = Dispatcher::standard();
        dispatcher.nodes_mut().set_class_version(4, 0, class, version);

        let mut payload = vec![class, command];
        payload.extend_from_slice(&body);
        for len in 0..=payload.len() {
            let events = dispatcher.dispatch_command(4, 0, &payload[..len]);
            prop_assert!(events.iter().all(|event| event.node_id == 4));
        }
    }

    #[test]
    fn nested_encapsulation_never_panics(
        layers in prop::collection::vec(prop_oneof![Just(0x56u8), Just(0x60u8)], 1..8),
        tail in prop::collection::vec(any::<u8>(), 0..16),
    ) {
        let mut dispatcher = Dispatcher::standard();
        dispatcher.nodes_mut().add_node(4).add_endpoint(1).add_class(0x60);

        let mut payload = tail;
        for class in layers {
            let mut outer = match class {
                0x60 => vec![0x60, 0x0D, 0x01, 0x00],
                _ => vec![0x56, 0x01],
            };
            outer.extend_from_slice(&payload);
            payload = outer;
        }
        dispatcher.dispatch_command(4, 0, &payload);
    }
}
