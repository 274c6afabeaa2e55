//! Integration tests for aggregated reports
//!
//! Drives the engine end to end from JSONL files, and checks the counting
//! and ranking properties the reports depend on:
//! - Section sums agree with the number of records ingested
//! - Tied counts rank in first-seen order
//! - A failing stream yields an error and no partial report

#[cfg(test)]
mod report_integration_tests {
    use chrono::{NaiveDate, TimeZone, Utc};
    use chrono_tz::America::Los_Angeles;
    use noiseflow::{
        rank_by_count_desc, Aggregator, ComplaintRecord, JsonlRecordStream, MemoryRecordStream,
        ReportConfig, ReportEngine, ReportError, ReportRequest, StreamError, TimeSpan,
    };
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// 2015-10-01 00:00:00 PDT
    const OCT_1_LOCAL: i64 = 1_443_682_800;

    fn span(first_day: u32, last_day: u32) -> TimeSpan {
        TimeSpan::from_date_range(
            NaiveDate::from_ymd_opt(2015, 10, first_day).unwrap(),
            NaiveDate::from_ymd_opt(2015, 10, last_day).unwrap(),
            Los_Angeles,
        )
        .unwrap()
    }

    fn jsonl_line(ts: i64, reporter: &str, city: &str, airline: &str, equip: &str) -> String {
        format!(
            r#"{{"timestamp":{},"reporter_id":"{}","city":"{}","zip":"94301","airline_code":"{}","equipment_type":"{}","loudness":1}}"#,
            ts, reporter, city, airline, equip
        )
    }

    fn write_jsonl(lines: &[String]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file.flush().unwrap();
        file
    }

    fn config_for(file: &NamedTempFile) -> ReportConfig {
        ReportConfig::default().with_input_path(file.path())
    }

    #[tokio::test]
    async fn test_summary_from_jsonl_file() {
        let mut lines = Vec::new();
        for m in 0..7 {
            // Oct 1, 09:xx local
            lines.push(jsonl_line(OCT_1_LOCAL + 9 * 3600 + m * 60, "alice@example.com", "Palo Alto", "UA", "B738"));
        }
        for m in 0..5 {
            // Oct 2, 18:xx local
            lines.push(jsonl_line(OCT_1_LOCAL + 86_400 + 18 * 3600 + m * 60, "bob@example.com", "Menlo Park", "SWA", "A320"));
        }
        // Oct 5, outside the span
        lines.push(jsonl_line(OCT_1_LOCAL + 4 * 86_400 + 3600, "carol@example.com", "Atherton", "UA", "B738"));
        let file = write_jsonl(&lines);

        let engine = ReportEngine::new(config_for(&file));
        let request = ReportRequest::summary(span(1, 3));
        let mut stream = JsonlRecordStream::open(&engine.config().input_path, request.query())
            .await
            .unwrap();

        let mut out = Vec::new();
        let outcome = engine.run(&request, &mut stream, &mut out).await.unwrap();
        assert_eq!(outcome.records, 12);
        assert_eq!(stream.skipped(), 1);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(" To   [2015-10-03 23:59:59 -0700 PDT]\n"));
        assert!(text.contains(" Days                : 2\n Disturbance reports : 12\n People reporting    : 2\n"));
        assert!(text.contains(&format!(" {:<40}:     7 (  1 people reporting)\n", "Palo Alto")));
        assert!(text.contains(&format!(" {:<40}:     5 (  1 people reporting)\n", "Menlo Park")));
        assert!(text.contains(" 2015.10.01:     7 (  1 people reporting)\n 2015.10.02:     5 (  1 people reporting)\n"));
        assert!(text.contains(&format!(" {:<40}:     7\n {:<40}:     5\n", "B738", "A320")));
        assert!(text.contains(" UA:      7\n"));
        assert!(!text.contains("SWA"));
        assert!(!text.contains("Atherton"));
        assert!(text.contains(" 09:     7\n"));
        assert!(text.contains(" 18:     5\n"));

        // Cities rank by count, largest first
        let palo_alto = text.find("Palo Alto").unwrap();
        let menlo_park = text.find("Menlo Park").unwrap();
        assert!(palo_alto < menlo_park);
    }

    #[tokio::test]
    async fn test_malformed_line_fails_report_without_output() {
        let file = write_jsonl(&[
            jsonl_line(OCT_1_LOCAL + 3600, "alice@example.com", "Palo Alto", "UA", "B738"),
            "{not json".to_string(),
            jsonl_line(OCT_1_LOCAL + 7200, "alice@example.com", "Palo Alto", "UA", "B738"),
        ]);

        let engine = ReportEngine::new(config_for(&file));
        let request = ReportRequest::summary(span(1, 1));
        let mut stream = JsonlRecordStream::open(file.path(), request.query()).await.unwrap();

        let mut out = Vec::new();
        let result = engine.run(&request, &mut stream, &mut out).await;

        assert!(matches!(result, Err(ReportError::Stream(StreamError::Parse { line: 2, .. }))));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_missing_input_file() {
        let result = JsonlRecordStream::open("/nonexistent/complaints.jsonl", Default::default()).await;
        assert!(matches!(result, Err(StreamError::Io(_))));
    }

    fn city_record(city: &str, reporter: &str, minute: u32) -> ComplaintRecord {
        let mut record = ComplaintRecord::new(Utc.with_ymd_and_hms(2015, 10, 1, 17, minute, 0).unwrap(), reporter);
        record.location_city = Some(city.to_string());
        record
    }

    #[tokio::test]
    async fn test_tied_counts_rank_in_first_seen_order() {
        let first = vec![
            city_record("Palo Alto", "a@x", 0),
            city_record("Menlo Park", "b@x", 1),
            city_record("Palo Alto", "c@x", 2),
            city_record("Menlo Park", "d@x", 3),
            city_record("Atherton", "a@x", 4),
        ];
        let mut second = first.clone();
        second.swap(0, 1);

        let snap_first = Aggregator::new(Los_Angeles)
            .consume(&mut MemoryRecordStream::from_records(first), std::time::Duration::from_secs(5))
            .await
            .unwrap();
        let snap_second = Aggregator::new(Los_Angeles)
            .consume(&mut MemoryRecordStream::from_records(second), std::time::Duration::from_secs(5))
            .await
            .unwrap();

        // Same counts either way
        assert_eq!(snap_first.cities.count("Palo Alto"), snap_second.cities.count("Palo Alto"));
        assert_eq!(snap_first.cities.count("Menlo Park"), snap_second.cities.count("Menlo Park"));

        let ranked_first = rank_by_count_desc(&snap_first.cities);
        let ranked_second = rank_by_count_desc(&snap_second.cities);
        assert_eq!(ranked_first, vec!["Palo Alto", "Menlo Park", "Atherton"]);
        assert_eq!(ranked_second, vec!["Menlo Park", "Palo Alto", "Atherton"]);

        // Re-ranking the same snapshot never reorders
        assert_eq!(rank_by_count_desc(&snap_first.cities), ranked_first);
    }

    #[test]
    fn test_section_sums_match_records_ingested() {
        let cities = ["Palo Alto", "Menlo Park", "", "Atherton"];
        let airlines = ["UA", "AA", "SWA"];
        let mut agg = Aggregator::new(Los_Angeles);
        let mut with_city = 0u64;
        let mut with_airline = 0u64;

        // Deterministic spread over ~9 days, including the fall-back DST change
        let mut seed: u64 = 0x5eed;
        for i in 0..500u64 {
            seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1_442_695_040_888_963_407);
            let offset = (seed >> 33) % (9 * 86_400);
            let ts = Utc.timestamp_opt(1_446_184_800 + offset as i64, 0).unwrap();

            let mut record = ComplaintRecord::new(ts, format!("r{}@x", seed % 17));
            let city = cities[(i % 4) as usize];
            if !city.is_empty() {
                record.location_city = Some(city.to_string());
                with_city += 1;
            }
            if i % 3 != 0 {
                record.aircraft_airline_code = Some(airlines[(i % 3) as usize].to_string());
                with_airline += 1;
            }
            agg.ingest(&record);
        }

        let snap = agg.finalize();
        assert_eq!(snap.total_records, 500);
        assert_eq!(snap.hours.total(), 500);
        assert_eq!(snap.dates.total(), 500);
        assert_eq!(snap.cities.total(), with_city);
        assert_eq!(snap.airlines.total(), with_airline);
        assert!(snap.unique_reporters <= 17);

        for entry in snap.dates.iter().chain(snap.cities.iter()) {
            assert!(entry.unique_reporters as u64 <= entry.count);
            assert!(entry.unique_reporters <= snap.unique_reporters);
        }
        for hour in 0..24 {
            assert!(snap.hours.unique_reporters[hour] as u64 <= snap.hours.counts[hour]);
        }
    }

    #[tokio::test]
    async fn test_personal_report_from_jsonl_file() {
        let file = write_jsonl(&[
            jsonl_line(OCT_1_LOCAL + 8 * 3600, "alice@example.com", "Palo Alto", "UA", "B738"),
            jsonl_line(OCT_1_LOCAL + 8 * 3600 + 60, "bob@example.com", "Palo Alto", "AA", "A320"),
            jsonl_line(OCT_1_LOCAL + 86_400 + 22 * 3600, "alice@example.com", "Palo Alto", "UA", "B738"),
        ]);

        let engine = ReportEngine::new(config_for(&file));
        let request = ReportRequest::personal(span(1, 2), "alice@example.com");
        let mut stream = JsonlRecordStream::open(file.path(), request.query()).await.unwrap();

        let mut out = Vec::new();
        let outcome = engine.run(&request, &mut stream, &mut out).await.unwrap();
        assert_eq!(outcome.records, 2);

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Personal disturbances report for <alice@example.com>:\n"));
        assert!(text.contains("over 2 days:  2\n"));
        assert!(text.contains(" UA:    2\n"));
        assert!(!text.contains(" AA:"));
        assert!(text.contains(" 2015.10.01:    1\n 2015.10.02:    1\n"));
        assert!(text.contains(" 08:    1\n"));
        assert!(text.contains(" 22:    1\n"));
        assert!(text.contains("Time: 2015.10.01 08:00:00, Loudness:1,"));
        assert!(text.contains("Time: 2015.10.02 22:00:00, Loudness:1,"));
    }
}
