use crate::config::{PathConfig, ScenarioConfig, TrafficClassConfig};
use crate::error::ConfigError;
use crate::sim::SimTime;

#[test]
fn default_scenario_is_valid_and_matches_reference_values() {
    let s = ScenarioConfig::default();
    assert_eq!(s.validate(), Ok(()));
    assert_eq!(s.traffic_classes.len(), 3);
    assert_eq!(s.paths.len(), 2);
    assert_eq!(s.paths[0].queue_capacity(), 400);
    assert_eq!(s.paths[1].queue_capacity(), 200);
    assert_eq!(s.episode.duration(), SimTime::from_secs(30));
    assert_eq!(s.episode.processor_deadline(), SimTime::from_secs(32));
    assert_eq!(s.episode.seed, None);
}

#[test]
fn inter_arrival_and_service_time_follow_bit_rates() {
    let tc = TrafficClassConfig::new("TF", 1, 1024, 100.0, 1.0);
    // 1024 * 8 / 100e6 s = 81.92 us
    assert_eq!(tc.inter_arrival(), Some(SimTime(81_920)));
    let path = PathConfig::new("P", 1, 1, 200.0, 1.0);
    assert_eq!(path.service_time(1024), SimTime(40_960));
}

#[test]
fn zero_rate_means_no_pacing_interval() {
    let tc = TrafficClassConfig::new("idle", 1, 1024, 0.0, 1.0);
    assert_eq!(tc.inter_arrival(), None);
}

#[test]
fn scenario_parses_partial_json_with_episode_defaults() {
    let raw = r#"
    {
        "traffic_classes": [
            { "name": "TF1", "num_generator_threads": 2, "packet_size_bytes": 512,
              "target_rate_mbps": 50, "unit_price": 1.5 }
        ],
        "paths": [
            { "name": "NR", "num_processor_threads": 1, "queue_capacity_per_thread": 10,
              "service_rate_mbps": 100, "revenue_factor": 0.9 }
        ],
        "episode": { "duration_seconds": 2, "seed": 11 }
    }
    "#;
    let s = ScenarioConfig::from_json_str(raw).expect("parse scenario");
    assert_eq!(s.validate(), Ok(()));
    assert_eq!(s.traffic_classes[0].packet_size_bytes, 512);
    assert_eq!(s.episode.duration_seconds, 2.0);
    assert_eq!(s.episode.report_interval_seconds, 5.0);
    assert_eq!(s.episode.processor_dequeue_timeout_seconds, 0.5);
    assert_eq!(s.episode.scale_factor, 10.0);
    assert_eq!(s.episode.seed, Some(11));
}

#[test]
fn validation_rejects_out_of_range_fields() {
    let mut s = ScenarioConfig::default();
    s.traffic_classes[1].num_generator_threads = 0;
    assert!(matches!(
        s.validate(),
        Err(ConfigError::TrafficClass { field: "num_generator_threads", .. })
    ));

    let mut s = ScenarioConfig::default();
    s.traffic_classes[0].target_rate_mbps = -1.0;
    assert!(matches!(
        s.validate(),
        Err(ConfigError::TrafficClass { field: "target_rate_mbps", .. })
    ));

    let mut s = ScenarioConfig::default();
    s.paths[0].service_rate_mbps = 0.0;
    assert!(matches!(
        s.validate(),
        Err(ConfigError::Path { field: "service_rate_mbps", .. })
    ));

    let mut s = ScenarioConfig::default();
    s.paths[1].revenue_factor = 1.1;
    assert!(matches!(
        s.validate(),
        Err(ConfigError::Path { field: "revenue_factor", .. })
    ));

    let mut s = ScenarioConfig::default();
    s.episode.duration_seconds = 0.0;
    assert!(matches!(
        s.validate(),
        Err(ConfigError::Episode { field: "duration_seconds", .. })
    ));

    let mut s = ScenarioConfig::default();
    s.paths.push(PathConfig::new("extra", 1, 1, 1.0, 0.5));
    assert_eq!(
        s.validate(),
        Err(ConfigError::TooManyPaths { max: 2, actual: 3 })
    );

    let mut s = ScenarioConfig::default();
    s.traffic_classes.clear();
    assert_eq!(s.validate(), Err(ConfigError::NoTrafficClasses));
}

#[test]
fn zero_queue_capacity_is_a_valid_configuration() {
    let mut s = ScenarioConfig::default();
    s.paths[1].queue_capacity_per_thread = 0;
    assert_eq!(s.validate(), Ok(()));
    assert_eq!(s.paths[1].queue_capacity(), 0);
}
