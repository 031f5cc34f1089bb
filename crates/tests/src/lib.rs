//! # Integration Tests
//!
//! Cross-crate tests over real JSON Lines files.
//!
//! Covers:
//! - Contract snapshots (config and record wire shape)
//! - End-to-end realignment: JsonlSource -> Realigner -> JsonlSink

#[cfg(test)]
mod contract_tests {
    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{Payload, RealignConfig, Record, Timestamp};

    #[test]
    fn test_default_config_survives_toml() {
        let rendered = ConfigLoader::to_toml(&RealignConfig::default()).unwrap();
        let parsed = ConfigLoader::load_from_str(&rendered, ConfigFormat::Toml).unwrap();
        assert_eq!(parsed, RealignConfig::default());
    }

    #[test]
    fn test_record_wire_shape() {
        let line = r#"{"channel":"/hose/scan","arrival_time":700,"payload":{"kind":"stamped","header":{"stamp":100}}}"#;
        let record: Record = serde_json::from_str(line).unwrap();
        assert_eq!(record.channel, "/hose/scan");
        assert_eq!(record.arrival_time, Timestamp(700));
        assert_eq!(record.payload.header_stamp(), Some(Timestamp(100)));
        assert!(matches!(record.payload, Payload::Stamped { .. }));
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::path::{Path, PathBuf};

    use config_loader::ConfigLoader;
    use contracts::{
        ClockOffset, ContractError, Family, Header, LogSource, Payload, RealignConfig, Record,
        Timestamp, TransformStamped,
    };
    use log_store::{JsonlSink, JsonlSource};
    use observability::RealignMetricsAggregator;
    use realigner::{RealignReport, Realigner};
    use serde_json::json;
    use tempfile::{tempdir, TempDir};

    fn stamped(channel: &str, stamp: i64, arrival: i64) -> Record {
        Record::new(channel, Timestamp(arrival), Payload::stamped(Timestamp(stamp)))
    }

    fn tf(arrival: i64, transforms: Vec<TransformStamped>) -> Record {
        Record::new("/tf", Timestamp(arrival), Payload::Transforms { transforms })
    }

    fn write_log(dir: &TempDir, name: &str, records: &[Record]) -> PathBuf {
        use contracts::LogSink;

        let path = dir.path().join(name);
        let mut sink = JsonlSink::create(&path).unwrap();
        for record in records {
            sink.write(record).unwrap();
        }
        sink.close().unwrap();
        path
    }

    fn read_log(path: &Path) -> Vec<Record> {
        JsonlSource::open(path)
            .unwrap()
            .records()
            .unwrap()
            .map(Result::unwrap)
            .collect()
    }

    /// Realign `input` into `prefix` + its file name, next to it
    fn realign_file(
        realigner: &Realigner,
        input: &Path,
    ) -> (PathBuf, Result<RealignReport, ContractError>) {
        let mut name = realigner.config().output_prefix.clone();
        name.push_str(&input.file_name().unwrap().to_string_lossy());
        let output = input.with_file_name(name);

        let source = JsonlSource::open(input).unwrap();
        let result = realigner.realign_with(&source, |_| JsonlSink::create(&output));
        (output, result)
    }

    fn stamps(records: &[Record]) -> Vec<i64> {
        records
            .iter()
            .filter_map(|r| r.payload.header_stamp())
            .map(Timestamp::as_nanos)
            .collect()
    }

    #[test]
    fn test_e2e_scenario() {
        let dir = tempdir().unwrap();
        let input = write_log(
            &dir,
            "run1.jsonl",
            &[
                stamped("hose", 100, 700),
                stamped("shoot", 50, 900),
                stamped("hose", 110, 710),
            ],
        );

        let (output, result) = realign_file(&Realigner::default(), &input);
        let report = result.unwrap();

        assert_eq!(output, dir.path().join("new_run1.jsonl"));
        assert_eq!(report.offsets.offset(Family::Hose), ClockOffset(600));
        assert_eq!(report.offsets.offset(Family::Shoot), ClockOffset(850));
        assert_eq!(report.stats.total, 3);

        let out = read_log(&output);
        assert_eq!(stamps(&out), vec![700, 900, 710]);
        let arrivals: Vec<i64> = out.iter().map(|r| r.arrival_time.as_nanos()).collect();
        assert_eq!(arrivals, vec![700, 900, 710]);

        // Input untouched
        assert_eq!(stamps(&read_log(&input)), vec![100, 50, 110]);
    }

    #[test]
    fn test_e2e_mixed_log() {
        let dir = tempdir().unwrap();
        let odom = Record::new(
            "/odom",
            Timestamp(800),
            Payload::Stamped {
                header: Header {
                    stamp: Timestamp(3),
                    frame_id: "odom".to_string(),
                    ..Header::default()
                },
                body: json!({ "pose": { "x": 1.5, "y": -2.0 }, "covariance": [0.1, 0.2] }),
            },
        );
        let records = vec![
            stamped("/hose/scan", 400, 1000),
            odom.clone(),
            tf(
                1200,
                vec![
                    TransformStamped::identity("hose_tip", Timestamp(10)),
                    TransformStamped::identity("hose_tip", Timestamp(20)),
                    TransformStamped::identity("hose_tip", Timestamp(30)),
                ],
            ),
            tf(1300, Vec::new()),
            stamped("/shooter/cam", 0, 2000),
            Record::new(
                "/diagnostics",
                Timestamp(2100),
                Payload::Unstamped {
                    body: json!("ok"),
                },
            ),
            stamped("/hose/scan", 500, 1100),
        ];
        let input = write_log(&dir, "mixed.jsonl", &records);

        let (output, result) = realign_file(&Realigner::default(), &input);
        let report = result.unwrap();
        let out = read_log(&output);

        assert_eq!(out.len(), records.len());
        let channels: Vec<&str> = out.iter().map(|r| r.channel.as_str()).collect();
        let expected: Vec<&str> = records.iter().map(|r| r.channel.as_str()).collect();
        assert_eq!(channels, expected);

        // Unclassified records are identical
        assert_eq!(out[1], odom);
        assert_eq!(out[3], records[3]);
        assert_eq!(out[5], records[5]);

        // Every sub-transform shifted by the hose offset
        let tf_stamps: Vec<i64> = out[2]
            .payload
            .transforms()
            .unwrap()
            .iter()
            .map(|t| t.header.stamp.as_nanos())
            .collect();
        assert_eq!(tf_stamps, vec![610, 620, 630]);

        assert_eq!(out[4].payload.header_stamp(), Some(Timestamp(2000)));
        assert_eq!(out[6].payload.header_stamp(), Some(Timestamp(1100)));
        for (before, after) in records.iter().zip(&out) {
            assert_eq!(before.arrival_time, after.arrival_time);
        }

        assert_eq!(report.stats.shifted_hose, 3);
        assert_eq!(report.stats.shifted_shoot, 1);
        assert_eq!(report.stats.passed_through, 3);
        assert_eq!(report.stats.transforms_shifted, 3);
    }

    #[test]
    fn test_e2e_output_bytes() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("bytes.jsonl");
        let lines = [
            r#"{"channel":"/hose/scan","arrival_time":1000,"payload":{"kind":"stamped","header":{"seq":1,"stamp":400,"frame_id":"hose_laser"},"body":{"ranges":[1.5,2.25],"angle_min":-1}},"conn":2}"#,
            r#"{"channel":"/odom","arrival_time":1100,"payload":{"kind":"stamped","header":{"stamp":1,"frame_id":"odom","seq":7},"body":{"y":1,"x":0,"big":123456789012345678901234}}}"#,
            r#"{"channel":"/shoot/cam","arrival_time":2000,"payload":{"kind":"stamped","header":{"stamp":0}}}"#,
            r#"{"channel":"/diagnostics", "arrival_time":2100,"payload":{"kind":"unstamped","body":"ok"}}"#,
        ];
        std::fs::write(&input, lines.join("\n") + "\n").unwrap();

        let (output, result) = realign_file(&Realigner::default(), &input);
        result.unwrap();

        let written = std::fs::read_to_string(&output).unwrap();
        let out: Vec<&str> = written.lines().collect();
        assert_eq!(out.len(), 4);

        // Unclassified records are copied verbatim
        assert_eq!(out[1], lines[1]);
        assert_eq!(out[3], lines[3]);

        // Shifted records keep unknown keys and key order
        assert_eq!(
            out[0],
            r#"{"channel":"/hose/scan","arrival_time":1000,"payload":{"kind":"stamped","header":{"stamp":1000,"frame_id":"hose_laser","seq":1},"body":{"ranges":[1.5,2.25],"angle_min":-1}},"conn":2}"#
        );
        assert_eq!(
            out[2],
            r#"{"channel":"/shoot/cam","arrival_time":2000,"payload":{"kind":"stamped","header":{"stamp":2000}}}"#
        );
    }

    #[test]
    fn test_e2e_missing_clock_leaves_no_output() {
        let dir = tempdir().unwrap();
        let input = write_log(
            &dir,
            "hose_only.jsonl",
            &[stamped("/hose/scan", 100, 700), stamped("/odom", 1, 800)],
        );

        let (output, result) = realign_file(&Realigner::default(), &input);

        match result {
            Err(ContractError::MissingClock { missing, .. }) => {
                assert_eq!(missing, vec![Family::Shoot]);
            }
            other => panic!("expected MissingClock, got {other:?}"),
        }
        assert!(!output.exists());
        assert!(!dir.path().join("new_hose_only.jsonl.partial").exists());
    }

    #[test]
    fn test_e2e_decode_error_leaves_no_output() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("broken.jsonl");
        let good = [
            stamped("/hose", 1, 2),
            stamped("/shoot", 1, 2),
        ]
        .iter()
        .map(|r| serde_json::to_string(r).unwrap())
        .collect::<Vec<_>>()
        .join("\n");
        std::fs::write(&input, format!("{good}\n{{truncated\n")).unwrap();

        let (output, result) = realign_file(&Realigner::default(), &input);

        assert!(matches!(
            result,
            Err(ContractError::RecordDecode { line: 3, .. })
        ));
        assert!(!output.exists());
        assert!(!dir.path().join("new_broken.jsonl.partial").exists());
    }

    #[test]
    fn test_e2e_config_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("realign.toml");
        std::fs::write(
            &config_path,
            r#"
transform_channel = "/tf_static"
output_prefix = "aligned_"

[families]
hose = "nozzle"
shoot = "trigger"
"#,
        )
        .unwrap();
        let config: RealignConfig = ConfigLoader::load_from_path(&config_path).unwrap();

        let input = write_log(
            &dir,
            "custom.jsonl",
            &[
                stamped("/nozzle/flow", 10, 100),
                stamped("/hose/scan", 0, 0),
                Record::new(
                    "/tf_static",
                    Timestamp(500),
                    Payload::Transforms {
                        transforms: vec![TransformStamped::identity("trigger_arm", Timestamp(300))],
                    },
                ),
            ],
        );

        let (output, result) = realign_file(&Realigner::new(config), &input);
        let report = result.unwrap();

        assert_eq!(output, dir.path().join("aligned_custom.jsonl"));
        assert_eq!(report.offsets.offset(Family::Hose), ClockOffset(90));
        assert_eq!(report.offsets.offset(Family::Shoot), ClockOffset(200));
        assert_eq!(report.stats.passed_through, 1);

        let out = read_log(&output);
        assert_eq!(out[1], stamped("/hose/scan", 0, 0));
    }

    #[test]
    fn test_e2e_multiple_inputs_aggregate() {
        let dir = tempdir().unwrap();
        let realigner = Realigner::default();
        let mut aggregator = RealignMetricsAggregator::new();

        for (name, hose_arrival) in [("a.jsonl", 700), ("b.jsonl", 900)] {
            let input = write_log(
                &dir,
                name,
                &[stamped("/hose", 100, hose_arrival), stamped("/shoot", 0, 50)],
            );
            let (_, result) = realign_file(&realigner, &input);
            aggregator.update(&result.unwrap());
        }

        assert_eq!(aggregator.inputs, 2);
        assert_eq!(aggregator.totals.total, 4);
        let hose = aggregator.offset_summary(Family::Hose);
        assert_eq!(hose.count, 2);
        assert!((hose.mean - 700e-9).abs() < 1e-15);
        assert!(aggregator.to_string().contains("Inputs: 2"));
    }
}
