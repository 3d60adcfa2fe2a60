//! Requests answered by the report a device sends back, at every version
//!
//! Each case encodes a request with the live handler, builds the report a
//! device would answer with, dispatches it and checks that the decoded value
//! matches what was requested.

use std::ops::RangeInclusive;
use std::time::Duration;

use chrono::{NaiveDate, NaiveTime, Weekday};
use pretty_assertions::assert_eq;
use zwrust_core::SendData;
use zwrust_protocol::command_class::alarm::notification;
use zwrust_protocol::command_class::color::component;
use zwrust_protocol::command_class::door_lock::mode as door_mode;
use zwrust_protocol::command_class::protection::{local, rf};
use zwrust_protocol::command_class::switch_all::SwitchAllMode;
use zwrust_protocol::command_class::thermostat_mode::mode as thermostat_mode;
use zwrust_protocol::command_class::thermostat_setpoint::setpoint;
use zwrust_protocol::command_class::{
    AlarmHandler, BarrierOperatorHandler, BasicHandler, ClockHandler, ColorHandler,
    ConfigurationHandler, DoorLockHandler, IndicatorHandler, LockHandler, MeterHandler,
    NodeNamingHandler, PowerLevelHandler, ProtectionHandler, SceneActivationHandler,
    SensorBinaryHandler, SensorMultilevelHandler, SwitchAllHandler, SwitchBinaryHandler,
    SwitchMultilevelHandler, ThermostatFanModeHandler, ThermostatModeHandler,
    ThermostatSetpointHandler, TimeParametersHandler, WakeUpHandler,
};
use zwrust_protocol::{Dispatcher, HandlerType, Registry};
use zwrust_types::{
    AlarmReport, CommandClassId, Decimal, EventKind, IndicatorObject, MeterReading, MeterScale,
    MeterType, RateType,
};

const NODE: u8 = 6;

/// Request, device answer (`[class][command][args...]`) and the event it must decode to
struct Exchange {
    request: SendData,
    answer: Vec<u8>,
    expected: EventKind,
}

struct Case {
    class: CommandClassId,
    run: fn(&mut Dispatcher, u8) -> Exchange,
}

fn versions(class: CommandClassId) -> RangeInclusive<u8> {
    Registry::standard()
        .supported_versions(class.id())
        .unwrap_or_else(|| panic!("{class} is not registered"))
}

fn live<T: HandlerType>(dispatcher: &mut Dispatcher) -> &mut T {
    dispatcher.handler_mut::<T>(NODE, 0).expect("root endpoint exists")
}

/// Arguments after `[class][command]`
fn args(request: &SendData) -> Vec<u8> {
    request.payload[2..].to_vec()
}

/// Answer carrying the request arguments unchanged under `command`
fn echo(request: &SendData, command: u8) -> Vec<u8> {
    answer(request, command, &args(request))
}

fn answer(request: &SendData, command: u8, body: &[u8]) -> Vec<u8> {
    let mut payload = vec![request.payload[0], command];
    payload.extend_from_slice(body);
    payload
}

fn basic(dispatcher: &mut Dispatcher, _version: u8) -> Exchange {
    let request = live::<BasicHandler>(dispatcher).encode_set(0x42);
    Exchange {
        answer: echo(&request, 0x03),
        request,
        expected: EventKind::Basic { value: 0x42 },
    }
}

fn switch_binary(dispatcher: &mut Dispatcher, version: u8) -> Exchange {
    let request =
        live::<SwitchBinaryHandler>(dispatcher).encode_set(true, Some(Duration::from_secs(5)));
    let sent = args(&request);

    let (body, target, duration) = if version >= 2 {
        assert_eq!(sent, vec![0xFF, 0x05]);
        (vec![0xFF, sent[0], sent[1]], Some(0xFF), Some(Duration::from_secs(5)))
    } else {
        assert_eq!(sent, vec![0xFF]);
        (vec![0xFF], None, None)
    };
    Exchange {
        answer: answer(&request, 0x03, &body),
        request,
        expected: EventKind::SwitchBinary {
            value: 0xFF,
            target,
            duration,
        },
    }
}

fn switch_multilevel(dispatcher: &mut Dispatcher, version: u8) -> Exchange {
    let request =
        live::<SwitchMultilevelHandler>(dispatcher).encode_set(40, Some(Duration::from_secs(10)));
    let sent = args(&request);
    assert_eq!(sent.len(), if version >= 2 { 2 } else { 1 });

    let (body, target, duration) = if version >= 4 {
        (vec![40, sent[0], sent[1]], Some(40), Some(Duration::from_secs(10)))
    } else {
        (vec![sent[0]], None, None)
    };
    Exchange {
        answer: answer(&request, 0x03, &body),
        request,
        expected: EventKind::SwitchMultilevel {
            value: 40,
            target,
            duration,
        },
    }
}

fn protection(dispatcher: &mut Dispatcher, version: u8) -> Exchange {
    let rf_state = (version >= 2).then_some(rf::NO_CONTROL);
    let request = live::<ProtectionHandler>(dispatcher)
        .encode_set(local::SEQUENCE, rf_state)
        .expect("set allowed at this version");
    Exchange {
        answer: echo(&request, 0x03),
        request,
        expected: EventKind::Protection {
            local: local::SEQUENCE,
            rf: rf_state,
        },
    }
}

fn indicator(dispatcher: &mut Dispatcher, version: u8) -> Exchange {
    let handler = live::<IndicatorHandler>(dispatcher);
    if version == 1 {
        let request = handler.encode_set(0x30);
        return Exchange {
            answer: echo(&request, 0x03),
            request,
            expected: EventKind::Indicator {
                value: 0x30,
                objects: vec![],
            },
        };
    }

    let objects = vec![IndicatorObject {
        indicator: 0x50,
        property: 0x03,
        value: 0x08,
    }];
    let request = handler.encode_set_objects(&objects).expect("objects from version 2");
    Exchange {
        answer: echo(&request, 0x03),
        request,
        expected: EventKind::Indicator { value: 0, objects },
    }
}

fn barrier_operator(dispatcher: &mut Dispatcher, _version: u8) -> Exchange {
    let request = live::<BarrierOperatorHandler>(dispatcher).encode_set(true);
    Exchange {
        answer: echo(&request, 0x03),
        request,
        expected: EventKind::BarrierState { state: 0xFF },
    }
}

fn thermostat_mode(dispatcher: &mut Dispatcher, _version: u8) -> Exchange {
    let request = live::<ThermostatModeHandler>(dispatcher)
        .encode_set(thermostat_mode::AUTO)
        .expect("valid mode");
    Exchange {
        answer: echo(&request, 0x03),
        request,
        expected: EventKind::ThermostatMode {
            mode: thermostat_mode::AUTO,
        },
    }
}

fn thermostat_fan_mode(dispatcher: &mut Dispatcher, version: u8) -> Exchange {
    let off = version >= 2;
    let request = live::<ThermostatFanModeHandler>(dispatcher)
        .encode_set(0x03, off)
        .expect("off flag allowed at this version");
    Exchange {
        answer: echo(&request, 0x03),
        request,
        expected: EventKind::ThermostatFanMode { mode: 0x03, off },
    }
}

fn color(dispatcher: &mut Dispatcher, version: u8) -> Exchange {
    let request = live::<ColorHandler>(dispatcher)
        .encode_set(&[(component::RED, 0x80)], Some(Duration::from_secs(2)))
        .expect("one component");
    let sent = args(&request);
    assert_eq!(sent.len(), if version >= 2 { 4 } else { 3 });

    // one report per component
    let (body, target, duration) = if version >= 3 {
        (
            vec![sent[1], sent[2], sent[2], sent[3]],
            Some(0x80),
            Some(Duration::from_secs(2)),
        )
    } else {
        (vec![sent[1], sent[2]], None, None)
    };
    Exchange {
        answer: answer(&request, 0x04, &body),
        request,
        expected: EventKind::Color {
            component: component::RED,
            value: 0x80,
            target,
            duration,
        },
    }
}

fn clock(dispatcher: &mut Dispatcher, _version: u8) -> Exchange {
    let time = NaiveTime::from_hms_opt(14, 35, 0).expect("valid time");
    let request = live::<ClockHandler>(dispatcher).encode_set(Some(Weekday::Wed), time);
    Exchange {
        answer: echo(&request, 0x06),
        request,
        expected: EventKind::Clock {
            weekday: Some(Weekday::Wed),
            time,
        },
    }
}

fn time_parameters(dispatcher: &mut Dispatcher, _version: u8) -> Exchange {
    let timestamp = NaiveDate::from_ymd_opt(2024, 2, 29)
        .and_then(|date| date.and_hms_opt(23, 59, 58))
        .expect("valid timestamp");
    let request = live::<TimeParametersHandler>(dispatcher)
        .encode_set(timestamp)
        .expect("year fits");
    Exchange {
        answer: echo(&request, 0x03),
        request,
        expected: EventKind::TimeParameters { timestamp },
    }
}

fn alarm(dispatcher: &mut Dispatcher, version: u8) -> Exchange {
    let request =
        live::<AlarmHandler>(dispatcher).encode_get(0x15, notification::ACCESS_CONTROL, 0x06);
    let sent = args(&request);
    assert_eq!(sent.len(), usize::from(version.min(3)));

    if version == 1 {
        return Exchange {
            answer: answer(&request, 0x05, &[sent[0], 0xFF]),
            request,
            expected: EventKind::Alarm(AlarmReport {
                alarm_type: 0x15,
                alarm_level: 0xFF,
                ..AlarmReport::default()
            }),
        };
    }

    // type, level, source, status, notification type, event, one parameter
    let body = [sent[0], 0xFF, 0x00, 0xFF, sent[1], 0x06, 0x01, 0x02];
    Exchange {
        answer: answer(&request, 0x05, &body),
        request,
        expected: EventKind::Alarm(AlarmReport {
            alarm_type: 0x15,
            alarm_level: 0xFF,
            source_node: None,
            notification_status: Some(0xFF),
            notification_type: Some(notification::ACCESS_CONTROL),
            event: Some(0x06),
            event_params: vec![0x02],
            sequence: None,
        }),
    }
}

fn meter(dispatcher: &mut Dispatcher, version: u8) -> Exchange {
    // the third scale bit only exists from version 3 on
    let scale = if version >= 3 {
        MeterScale::ElectricV
    } else {
        MeterScale::ElectricW
    };
    let request = live::<MeterHandler>(dispatcher).encode_get(Some(scale));
    let sent = args(&request);

    let bits = scale.scale();
    if version >= 2 {
        assert_eq!(sent, vec![(bits & 0x07) << 3]);
    } else {
        assert!(sent.is_empty());
    }

    let mut type_byte = MeterType::Electric.id();
    if version >= 2 {
        type_byte |= 0x01 << 5;
    }
    if bits & 0x04 != 0 {
        type_byte |= 0x80;
    }
    // precision 1, two byte value
    let properties = 0x20 | (bits & 0x03) << 3 | 0x02;
    let mut body = vec![type_byte, properties, 0x01, 0xB7];
    if version >= 2 {
        body.extend_from_slice(&[0x00, 0x3C, 0x01, 0xAD]);
    }

    Exchange {
        answer: answer(&request, 0x02, &body),
        request,
        expected: EventKind::Meter(MeterReading {
            meter_type: MeterType::Electric,
            rate_type: if version >= 2 {
                RateType::Import
            } else {
                RateType::Unspecified
            },
            scale,
            value: Decimal::new(439, 1),
            delta_time: (version >= 2).then_some(60),
            previous_value: (version >= 2).then_some(Decimal::new(429, 1)),
        }),
    }
}

fn sensor_multilevel(dispatcher: &mut Dispatcher, version: u8) -> Exchange {
    let request = live::<SensorMultilevelHandler>(dispatcher).encode_get(0x01, 0);
    let sent = args(&request);
    let sensor_type = if version >= 5 {
        assert_eq!(sent, vec![0x01, 0x00]);
        sent[0]
    } else {
        assert!(sent.is_empty());
        0x01
    };

    Exchange {
        answer: answer(&request, 0x05, &[sensor_type, 0x22, 0x00, 0xDB]),
        request,
        expected: EventKind::SensorMultilevel {
            sensor_type: 0x01,
            scale: 0,
            value: Decimal::new(219, 1),
        },
    }
}

fn sensor_binary(dispatcher: &mut Dispatcher, version: u8) -> Exchange {
    let request = live::<SensorBinaryHandler>(dispatcher).encode_get(Some(0x0C));
    let mut body = vec![0xFF];
    body.extend(args(&request));
    Exchange {
        answer: answer(&request, 0x03, &body),
        request,
        expected: EventKind::SensorBinary {
            sensor_type: (version >= 2).then_some(0x0C),
            value: 0xFF,
        },
    }
}

fn lock(dispatcher: &mut Dispatcher, _version: u8) -> Exchange {
    let request = live::<LockHandler>(dispatcher).encode_set(true);
    Exchange {
        answer: echo(&request, 0x03),
        request,
        expected: EventKind::Lock { locked: true },
    }
}

fn door_lock(dispatcher: &mut Dispatcher, _version: u8) -> Exchange {
    let request = live::<DoorLockHandler>(dispatcher).encode_set(door_mode::SECURED);
    let sent = args(&request);
    // mode, handles, condition, no timeout
    let body = [sent[0], 0x00, 0x00, 0xFE, 0xFE];
    Exchange {
        answer: answer(&request, 0x03, &body),
        request,
        expected: EventKind::DoorLock {
            mode: door_mode::SECURED,
            outside_handles: 0,
            inside_handles: 0,
            condition: 0,
            timeout: None,
        },
    }
}

fn power_level(dispatcher: &mut Dispatcher, _version: u8) -> Exchange {
    let request = live::<PowerLevelHandler>(dispatcher)
        .encode_set(3, 30)
        .expect("level in range");
    Exchange {
        answer: echo(&request, 0x03),
        request,
        expected: EventKind::PowerLevel {
            level: 3,
            timeout: 30,
        },
    }
}

fn scene_activation(dispatcher: &mut Dispatcher, _version: u8) -> Exchange {
    let request = live::<SceneActivationHandler>(dispatcher)
        .encode_set(7, Some(Duration::from_secs(3)))
        .expect("scene id in range");
    // scene controllers deliver the Set itself
    Exchange {
        answer: echo(&request, 0x01),
        request,
        expected: EventKind::SceneActivation {
            scene_id: 7,
            duration: Some(Duration::from_secs(3)),
        },
    }
}

fn switch_all(dispatcher: &mut Dispatcher, _version: u8) -> Exchange {
    let request = live::<SwitchAllHandler>(dispatcher).encode_set(SwitchAllMode::OnOnly);
    Exchange {
        answer: echo(&request, 0x03),
        request,
        expected: EventKind::SwitchAllMode {
            mode: SwitchAllMode::OnOnly as u8,
        },
    }
}

fn thermostat_setpoint(dispatcher: &mut Dispatcher, _version: u8) -> Exchange {
    let request = live::<ThermostatSetpointHandler>(dispatcher)
        .encode_set(setpoint::HEATING, 0, Decimal::new(215, 1))
        .expect("value fits");
    Exchange {
        answer: echo(&request, 0x03),
        request,
        expected: EventKind::ThermostatSetpoint {
            setpoint_type: setpoint::HEATING,
            scale: 0,
            value: Decimal::new(215, 1),
        },
    }
}

fn wake_up(dispatcher: &mut Dispatcher, _version: u8) -> Exchange {
    let request = live::<WakeUpHandler>(dispatcher)
        .encode_interval_set(3600, 1)
        .expect("interval fits");
    Exchange {
        answer: echo(&request, 0x06),
        request,
        expected: EventKind::WakeUpInterval {
            seconds: 3600,
            target_node: 1,
        },
    }
}

fn node_naming(dispatcher: &mut Dispatcher, _version: u8) -> Exchange {
    let request = live::<NodeNamingHandler>(dispatcher).encode_name_set("Porch");
    Exchange {
        answer: echo(&request, 0x03),
        request,
        expected: EventKind::NodeName {
            name: "Porch".to_string(),
        },
    }
}

fn configuration(dispatcher: &mut Dispatcher, _version: u8) -> Exchange {
    let request = live::<ConfigurationHandler>(dispatcher)
        .encode_set(7, -2, 2)
        .expect("value fits");
    Exchange {
        answer: echo(&request, 0x06),
        request,
        expected: EventKind::Configuration {
            parameter: 7,
            size: 2,
            value: -2,
        },
    }
}

const CASES: &[Case] = &[
    Case { class: CommandClassId::Basic, run: basic },
    Case { class: CommandClassId::SwitchBinary, run: switch_binary },
    Case { class: CommandClassId::SwitchMultilevel, run: switch_multilevel },
    Case { class: CommandClassId::Protection, run: protection },
    Case { class: CommandClassId::Indicator, run: indicator },
    Case { class: CommandClassId::BarrierOperator, run: barrier_operator },
    Case { class: CommandClassId::ThermostatMode, run: thermostat_mode },
    Case { class: CommandClassId::ThermostatFanMode, run: thermostat_fan_mode },
    Case { class: CommandClassId::Color, run: color },
    Case { class: CommandClassId::Clock, run: clock },
    Case { class: CommandClassId::TimeParameters, run: time_parameters },
    Case { class: CommandClassId::Alarm, run: alarm },
    Case { class: CommandClassId::Meter, run: meter },
    Case { class: CommandClassId::SensorMultilevel, run: sensor_multilevel },
    Case { class: CommandClassId::SensorBinary, run: sensor_binary },
    Case { class: CommandClassId::Lock, run: lock },
    Case { class: CommandClassId::DoorLock, run: door_lock },
    Case { class: CommandClassId::PowerLevel, run: power_level },
    Case { class: CommandClassId::SceneActivation, run: scene_activation },
    Case { class: CommandClassId::SwitchAll, run: switch_all },
    Case { class: CommandClassId::ThermostatSetpoint, run: thermostat_setpoint },
    Case { class: CommandClassId::WakeUp, run: wake_up },
    Case { class: CommandClassId::NodeNaming, run: node_naming },
    Case { class: CommandClassId::Configuration, run: configuration },
];

#[test]
fn requests_loop_back_at_every_version() {
    for case in CASES {
        for version in versions(case.class) {
            let mut dispatcher = Dispatcher::standard();
            dispatcher
                .nodes_mut()
                .set_class_version(NODE, 0, case.class.id(), version);

            let Exchange {
                request,
                answer,
                expected,
            } = (case.run)(&mut dispatcher, version);
            assert_eq!(request.node_id, NODE, "{} v{version}", case.class);
            assert_eq!(request.command_class(), Some(case.class.id()), "{} v{version}", case.class);

            let events = dispatcher.dispatch_command(NODE, 0, &answer);
            assert_eq!(events.len(), 1, "{} v{version}: {answer:02X?}", case.class);
            assert_eq!(events[0].command_class, case.class, "{} v{version}", case.class);
            assert_eq!(events[0].endpoint, 0);
            assert_eq!(events[0].kind, expected, "{} v{version}", case.class);
        }
    }
}

#[test]
fn requests_loop_back_on_endpoints() {
    for case in CASES {
        let version = *versions(case.class).end();
        let mut dispatcher = Dispatcher::standard();
        dispatcher
            .nodes_mut()
            .add_node(NODE)
            .add_endpoint(2)
            .set_class_version(case.class.id(), version);
        dispatcher
            .nodes_mut()
            .set_class_version(NODE, 0, case.class.id(), version);

        // build at the root, then address the same exchange to endpoint 2
        let Exchange {
            answer, expected, ..
        } = (case.run)(&mut dispatcher, version);
        let mut encapsulated = vec![0x60, 0x0D, 0x02, 0x00];
        encapsulated.extend_from_slice(&answer);

        let events = dispatcher.dispatch_command(NODE, 0, &encapsulated);
        assert_eq!(events.len(), 1, "{}", case.class);
        assert_eq!(events[0].endpoint, 2, "{}", case.class);
        assert_eq!(events[0].kind, expected, "{}", case.class);
    }
}

#[test]
fn cases_cover_every_registered_version() {
    let registry = Registry::standard();
    for case in CASES {
        assert!(registry.is_registered(case.class.id()), "{}", case.class);
        let range = versions(case.class);
        assert_eq!(*range.start(), 1, "{}", case.class);
    }
    assert_eq!(*versions(CommandClassId::Meter).end(), 3);
    assert_eq!(*versions(CommandClassId::Alarm).end(), 8);
    assert_eq!(*versions(CommandClassId::SensorMultilevel).end(), 11);
}
