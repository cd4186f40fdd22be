//! Workout aggregation and statistics.
//!
//! This module provides the pure functions that turn a loaded record set
//! into progress series, rep totals, personal bests and date lookups.
//! Every function takes the records it works on explicitly and never
//! mutates them.

use crate::models::{
    DateLookup, ExerciseSeries, PersonalBest, Record, RepTotal, SeriesPoint, SessionDetail,
};
use std::collections::{HashMap, HashSet};

/// Remove records belonging to excluded exercises, keeping input order.
pub fn filter_active(records: &[Record], excluded: &HashSet<String>) -> Vec<Record> {
    records
        .iter()
        .filter(|r| !excluded.contains(&r.exercise))
        .cloned()
        .collect()
}

/// Group working weights by exercise into date-sorted series.
///
/// Groups come out in order of first appearance. Sessions logged on the
/// same day stay as separate points, in input order.
pub fn group_series(records: &[Record]) -> Vec<ExerciseSeries> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut grouped: Vec<ExerciseSeries> = Vec::new();

    for record in records {
        let slot = *index.entry(record.exercise.as_str()).or_insert_with(|| {
            grouped.push(ExerciseSeries {
                name: record.exercise.clone(),
                points: Vec::new(),
            });
            grouped.len() - 1
        });

        grouped[slot].points.push(SeriesPoint {
            date: record.date,
            weight: record.working_weight,
        });
    }

    // sort_by_key is stable: same-day points keep their relative order
    for series in &mut grouped {
        series.points.sort_by_key(|p| p.date);
    }

    grouped
}

/// Sum every logged repetition per exercise.
pub fn total_reps(records: &[Record]) -> Vec<RepTotal> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<RepTotal> = Vec::new();

    for record in records {
        let slot = *index.entry(record.exercise.as_str()).or_insert_with(|| {
            totals.push(RepTotal {
                exercise: record.exercise.clone(),
                total: 0,
            });
            totals.len() - 1
        });

        totals[slot].total += record.rep_total();
    }

    totals
}

/// Track the heaviest positive working weight per exercise.
///
/// Only a strictly heavier session replaces the current best, so the first
/// session at a given maximum wins.
pub fn personal_bests(records: &[Record]) -> Vec<PersonalBest> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut bests: Vec<PersonalBest> = Vec::new();

    for record in records.iter().filter(|r| r.working_weight > 0.0) {
        match index.get(record.exercise.as_str()) {
            Some(&slot) => {
                let best = &mut bests[slot];
                if record.working_weight > best.weight {
                    best.weight = record.working_weight;
                    best.date = record.date;
                }
            }
            None => {
                index.insert(record.exercise.as_str(), bests.len());
                bests.push(PersonalBest {
                    exercise: record.exercise.clone(),
                    weight: record.working_weight,
                    date: record.date,
                });
            }
        }
    }

    bests
}

/// All records whose date matches a `YYYY-MM-DD` key, in input order.
///
/// An empty result means nothing was logged that day.
pub fn lookup_by_date<'a>(records: &'a [Record], key: &str) -> Vec<&'a Record> {
    let key = key.trim();
    records.iter().filter(|r| r.date_key() == key).collect()
}

/// Look up a date and build the display details for each match.
pub fn lookup_sessions(records: &[Record], key: &str) -> DateLookup {
    DateLookup {
        date: key.trim().to_string(),
        sessions: lookup_by_date(records, key)
            .into_iter()
            .map(SessionDetail::from_record)
            .collect(),
    }
}

/// Earliest and latest session dates.
pub fn date_range(records: &[Record]) -> Option<(chrono::NaiveDate, chrono::NaiveDate)> {
    let first = records.iter().map(|r| r.date).min()?;
    let last = records.iter().map(|r| r.date).max()?;
    Some((first, last))
}

/// Generate a text summary of the aggregated tables.
pub fn generate_summary_text(totals: &[RepTotal], bests: &[PersonalBest], unit: &str) -> String {
    let mut lines = Vec::new();

    lines.push(format!("Exercises: {}", totals.len()));
    lines.push(format!(
        "Total reps: {}",
        totals.iter().map(|t| t.total).sum::<u64>()
    ));

    if !bests.is_empty() {
        lines.push(String::new());
        lines.push("Personal bests:".to_string());

        for best in bests {
            lines.push(format!(
                "- {}: {}{} ({})",
                best.exercise,
                crate::models::format_weight(best.weight),
                unit,
                best.date.format(crate::models::DISPLAY_DATE_FORMAT)
            ));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_test_record(exercise: &str, day: NaiveDate, weight: f64) -> Record {
        let mut record = Record::new(exercise, day, weight);
        record.reps = [Some(5), Some(5), Some(5)];
        record
    }

    fn excluded(names: &[&str]) -> HashSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn sample_log() -> Vec<Record> {
        vec![
            create_test_record("Bench Press", date(2024, 1, 1), 60.0),
            create_test_record("Barbell Row", date(2024, 1, 1), 100.0),
            create_test_record("Bench Press", date(2024, 1, 8), 65.0),
        ]
    }

    #[test]
    fn test_filter_active_removes_excluded() {
        let records = sample_log();
        let active = filter_active(&records, &excluded(&["Barbell Row"]));

        assert_eq!(active.len(), 2);
        assert!(active.iter().all(|r| r.exercise != "Barbell Row"));
        assert_eq!(active[0], records[0]);
        assert_eq!(active[1], records[2]);
    }

    #[test]
    fn test_filter_active_is_idempotent() {
        let set = excluded(&["Barbell Row"]);
        let once = filter_active(&sample_log(), &set);
        let twice = filter_active(&once, &set);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_excluded_exercise_example() {
        let active = filter_active(&sample_log(), &excluded(&["Barbell Row"]));

        let bests = personal_bests(&active);
        assert_eq!(
            bests,
            vec![PersonalBest {
                exercise: "Bench Press".to_string(),
                weight: 65.0,
                date: date(2024, 1, 8),
            }]
        );
        assert_eq!(group_series(&active).len(), 1);
    }

    #[test]
    fn test_group_series_sorts_by_date() {
        let records = vec![
            create_test_record("Squat", date(2024, 3, 1), 110.0),
            create_test_record("Deadlift", date(2024, 2, 1), 140.0),
            create_test_record("Squat", date(2024, 1, 1), 100.0),
            create_test_record("Squat", date(2024, 2, 1), 105.0),
        ];

        let series = group_series(&records);

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].name, "Squat");
        assert_eq!(series[1].name, "Deadlift");
        for s in &series {
            assert!(s.points.windows(2).all(|w| w[0].date <= w[1].date));
        }
        let weights: Vec<f64> = series[0].points.iter().map(|p| p.weight).collect();
        assert_eq!(weights, vec![100.0, 105.0, 110.0]);
    }

    #[test]
    fn test_group_series_keeps_same_day_duplicates() {
        let records = vec![
            create_test_record("Squat", date(2024, 1, 2), 100.0),
            create_test_record("Squat", date(2024, 1, 1), 90.0),
            create_test_record("Squat", date(2024, 1, 1), 95.0),
        ];

        let series = group_series(&records);
        let weights: Vec<f64> = series[0].points.iter().map(|p| p.weight).collect();
        assert_eq!(weights, vec![90.0, 95.0, 100.0]);
    }

    #[test]
    fn test_group_series_is_case_sensitive() {
        let records = vec![
            create_test_record("squat", date(2024, 1, 1), 90.0),
            create_test_record("Squat", date(2024, 1, 1), 95.0),
        ];
        assert_eq!(group_series(&records).len(), 2);
    }

    #[test]
    fn test_total_reps_example() {
        let records = vec![
            create_test_record("Bench Press", date(2024, 1, 1), 60.0),
            create_test_record("Bench Press", date(2024, 1, 8), 65.0),
        ];
        let totals = total_reps(&records);
        assert_eq!(
            totals,
            vec![RepTotal {
                exercise: "Bench Press".to_string(),
                total: 30,
            }]
        );
    }

    #[test]
    fn test_total_reps_order_invariant_and_additive() {
        let mut records = sample_log();
        records[1].warmup_reps = [Some(10), None, Some(3), None, None];
        let forward = total_reps(&records);

        let mut reversed = records.clone();
        reversed.reverse();
        let backward = total_reps(&reversed);
        for total in &forward {
            let other = backward.iter().find(|t| t.exercise == total.exercise).unwrap();
            assert_eq!(other.total, total.total);
        }

        let mut extra = create_test_record("Barbell Row", date(2024, 1, 9), 100.0);
        extra.reps = [Some(8), None, Some(6)];
        records.push(extra.clone());
        let grown = total_reps(&records);
        let row_before = forward.iter().find(|t| t.exercise == "Barbell Row").unwrap();
        let row_after = grown.iter().find(|t| t.exercise == "Barbell Row").unwrap();
        assert_eq!(row_after.total, row_before.total + extra.rep_total());
    }

    #[test]
    fn test_total_reps_absent_term_does_not_poison_total() {
        let mut partial = create_test_record("Squat", date(2024, 1, 1), 100.0);
        partial.reps = [Some(5), None, Some(3)];
        let full = create_test_record("Squat", date(2024, 1, 2), 100.0);

        let totals = total_reps(&[partial, full]);
        assert_eq!(totals[0].total, 8 + 15);
    }

    #[test]
    fn test_personal_bests_ignore_non_positive() {
        let records = vec![
            create_test_record("Pull Up", date(2024, 1, 1), 0.0),
            create_test_record("Pull Up", date(2024, 1, 2), 0.0),
        ];
        assert!(personal_bests(&records).is_empty());
    }

    #[test]
    fn test_personal_bests_first_occurrence_wins_ties() {
        let records = vec![
            create_test_record("Squat", date(2024, 1, 1), 100.0),
            create_test_record("Squat", date(2024, 1, 5), 120.0),
            create_test_record("Squat", date(2024, 1, 9), 120.0),
            create_test_record("Squat", date(2024, 1, 12), 110.0),
        ];

        let bests = personal_bests(&records);
        let squat = bests.iter().find(|b| b.exercise == "Squat").unwrap();
        assert_eq!(squat.weight, 120.0);
        assert_eq!(squat.date, date(2024, 1, 5));
        assert!(bests.iter().all(|b| b.exercise != "Bench Press"));
    }

    #[test]
    fn test_personal_bests_match_maximum() {
        let records = vec![
            create_test_record("Deadlift", date(2024, 1, 1), 140.0),
            create_test_record("Deadlift", date(2023, 12, 1), 150.0),
            create_test_record("Deadlift", date(2024, 2, 1), 145.0),
        ];

        let max = records
            .iter()
            .map(|r| r.working_weight)
            .fold(f64::MIN, f64::max);
        assert_eq!(personal_bests(&records)[0].weight, max);
    }

    #[test]
    fn test_lookup_by_date() {
        let records = sample_log();

        let hits = lookup_by_date(&records, "2024-01-01");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].exercise, "Bench Press");
        assert_eq!(hits[1].exercise, "Barbell Row");

        let single = lookup_by_date(&records, "2024-01-08");
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].working_weight, 65.0);

        assert!(lookup_by_date(&records, "2099-01-01").is_empty());
    }

    #[test]
    fn test_lookup_sessions_builds_details() {
        let lookup = lookup_sessions(&sample_log(), " 2024-01-08 ");
        assert_eq!(lookup.date, "2024-01-08");
        assert_eq!(lookup.sessions.len(), 1);
        assert_eq!(lookup.sessions[0].sets, vec![5, 5, 5]);

        assert!(lookup_sessions(&sample_log(), "2099-01-01").is_empty());
    }

    #[test]
    fn test_date_range() {
        assert_eq!(
            date_range(&sample_log()),
            Some((date(2024, 1, 1), date(2024, 1, 8)))
        );
        assert_eq!(date_range(&[]), None);
    }

    #[test]
    fn test_generate_summary_text() {
        let records = sample_log();
        let text = generate_summary_text(&total_reps(&records), &personal_bests(&records), "kg");

        assert!(text.contains("Exercises: 2"));
        assert!(text.contains("Total reps: 45"));
        assert!(text.contains("- Bench Press: 65kg (08/01/2024)"));
    }
}
