//! Event-loop tests: events replayed from their JSON-lines form.

use pretty_assertions::assert_eq;
use sdn_types::{Dpid, MacAddress, PortNo};
use stpd::{ControllerEvent, SpanningTreeOrch, StpConfig, StpDaemon};

const EVENTS: &str = r#"
{"event":"switch_connected","switch":1}
{"event":"switch_connected","switch":2}
{"event":"switch_connected","switch":3}
{"event":"link_discovery","local_switch":2,"local_port":1,"remote_switch":1,"remote_port":1}
{"event":"link_discovery","local_switch":1,"local_port":1,"remote_switch":2,"remote_port":1}
{"event":"link_discovery","local_switch":3,"local_port":1,"remote_switch":2,"remote_port":2}
{"event":"link_discovery","local_switch":3,"local_port":2,"remote_switch":99,"remote_port":1}
{"event":"unknown_packet_source","switch":3,"source_mac":"aa:bb:00:00:00:01","ingress_port":5}
"#;

fn parse(text: &str) -> Vec<ControllerEvent> {
    text.lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

#[tokio::test]
async fn test_replay_processes_events_in_order() {
    let (daemon, sender) = StpDaemon::new(SpanningTreeOrch::new(StpConfig::default()));
    let handle = tokio::spawn(daemon.run());

    for event in parse(EVENTS) {
        sender.send(event).await.unwrap();
    }
    drop(sender);
    let orch = handle.await.unwrap();

    assert_eq!(orch.root(), Some(Dpid::new(1)));
    assert_eq!(orch.stats().links_discovered, 2);
    assert_eq!(orch.stats().events_rejected, 1);
    assert_eq!(orch.topology().active_edges().len(), 2);

    let mac: MacAddress = "aa:bb:00:00:00:01".parse().unwrap();
    let snapshot = orch.snapshot();
    let ports: Vec<(Dpid, Option<PortNo>)> = snapshot
        .switches
        .iter()
        .map(|s| (s.dpid, s.mac_table.get(&mac).copied()))
        .collect();
    assert_eq!(
        ports,
        vec![
            (Dpid::new(1), Some(PortNo::new(1))),
            (Dpid::new(2), Some(PortNo::new(2))),
            (Dpid::new(3), Some(PortNo::new(5))),
        ]
    );
}

#[tokio::test]
async fn test_packet_before_links_teaches_only_reporting_switch() {
    let (daemon, sender) = StpDaemon::new(SpanningTreeOrch::new(StpConfig::default()));
    let handle = tokio::spawn(daemon.run());

    let events = parse(
        r#"{"event":"switch_connected","switch":1}
{"event":"switch_connected","switch":2}
{"event":"unknown_packet_source","switch":2,"source_mac":"aa:bb:00:00:00:02","ingress_port":3}
{"event":"link_discovery","local_switch":1,"local_port":1,"remote_switch":2,"remote_port":1}"#,
    );
    for event in events {
        sender.send(event).await.unwrap();
    }
    drop(sender);
    let orch = handle.await.unwrap();

    let mac: MacAddress = "aa:bb:00:00:00:02".parse().unwrap();
    let topology = orch.topology();
    assert_eq!(topology.lookup_switch(Dpid::new(2)).unwrap().mac_location(&mac), Some(PortNo::new(3)));
    assert_eq!(topology.lookup_switch(Dpid::new(1)).unwrap().mac_location(&mac), None);
}
