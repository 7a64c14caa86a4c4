use chrono::{DateTime, Utc};

use super::RecurrenceGenerator;

pub struct RecurrenceCase {
    pub name: &'static str,
    pub rule: &'static str,
    pub anchor: &'static str,
    pub exclude: &'static [&'static str],
    pub window: (&'static str, &'static str),
    pub expected: &'static [&'static str],
    pub first: Option<&'static str>,
}

pub fn recurrence_cases() -> Vec<RecurrenceCase> {
    vec![
        RecurrenceCase {
            name: "daily_basic",
            rule: "FREQ=DAILY;COUNT=3",
            anchor: "2024-02-01T09:30:00Z",
            exclude: &[],
            window: ("2024-01-01T00:00:00Z", "2024-12-31T00:00:00Z"),
            expected: &[
                "2024-02-01T09:30:00Z",
                "2024-02-02T09:30:00Z",
                "2024-02-03T09:30:00Z",
            ],
            first: Some("2024-02-01T09:30:00Z"),
        },
        RecurrenceCase {
            name: "weekly_byday",
            rule: "FREQ=WEEKLY;COUNT=4;BYDAY=TU,TH",
            anchor: "2024-05-07T09:00:00Z",
            exclude: &[],
            window: ("2024-05-01T00:00:00Z", "2024-05-31T00:00:00Z"),
            expected: &[
                "2024-05-07T09:00:00Z",
                "2024-05-09T09:00:00Z",
                "2024-05-14T09:00:00Z",
                "2024-05-16T09:00:00Z",
            ],
            first: Some("2024-05-07T09:00:00Z"),
        },
        RecurrenceCase {
            name: "weekly_window_middle",
            rule: "FREQ=WEEKLY",
            anchor: "2024-01-03T12:00:00Z",
            exclude: &[],
            window: ("2024-05-01T00:00:00Z", "2024-05-14T23:59:59Z"),
            expected: &["2024-05-01T12:00:00Z", "2024-05-08T12:00:00Z"],
            first: Some("2024-01-03T12:00:00Z"),
        },
        RecurrenceCase {
            name: "monthly_bymonthday",
            rule: "FREQ=MONTHLY;COUNT=3;BYMONTHDAY=1",
            anchor: "2024-01-01T09:00:00Z",
            exclude: &[],
            window: ("2024-01-01T00:00:00Z", "2024-12-31T00:00:00Z"),
            expected: &[
                "2024-01-01T09:00:00Z",
                "2024-02-01T09:00:00Z",
                "2024-03-01T09:00:00Z",
            ],
            first: Some("2024-01-01T09:00:00Z"),
        },
        RecurrenceCase {
            name: "daily_until",
            rule: "FREQ=DAILY;UNTIL=20240503T090000Z",
            anchor: "2024-05-01T09:00:00Z",
            exclude: &[],
            window: ("2024-04-01T00:00:00Z", "2024-06-01T00:00:00Z"),
            expected: &[
                "2024-05-01T09:00:00Z",
                "2024-05-02T09:00:00Z",
                "2024-05-03T09:00:00Z",
            ],
            first: Some("2024-05-01T09:00:00Z"),
        },
        RecurrenceCase {
            name: "daily_with_exclusions",
            rule: "FREQ=DAILY;COUNT=5",
            anchor: "2024-05-01T10:00:00Z",
            exclude: &["2024-05-02T10:00:00Z", "2024-05-04T10:00:00Z"],
            window: ("2024-05-01T00:00:00Z", "2024-05-31T00:00:00Z"),
            expected: &[
                "2024-05-01T10:00:00Z",
                "2024-05-03T10:00:00Z",
                "2024-05-05T10:00:00Z",
            ],
            first: Some("2024-05-01T10:00:00Z"),
        },
        RecurrenceCase {
            name: "all_day_weekly_until_date",
            rule: "FREQ=WEEKLY;UNTIL=20240515",
            anchor: "2024-05-01T00:00:00Z",
            exclude: &[],
            window: ("2024-04-01T00:00:00Z", "2024-06-30T00:00:00Z"),
            expected: &[
                "2024-05-01T00:00:00Z",
                "2024-05-08T00:00:00Z",
                "2024-05-15T00:00:00Z",
            ],
            first: Some("2024-05-01T00:00:00Z"),
        },
        RecurrenceCase {
            name: "window_before_anchor",
            rule: "FREQ=DAILY",
            anchor: "2024-05-01T10:00:00Z",
            exclude: &[],
            window: ("2024-04-01T00:00:00Z", "2024-04-30T23:59:59Z"),
            expected: &[],
            first: Some("2024-05-01T10:00:00Z"),
        },
    ]
}

fn parse_rfc3339(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .unwrap_or_else(|err| panic!("Invalid RFC3339 datetime {value}: {err}"))
        .with_timezone(&Utc)
}

pub fn assert_case(case: &RecurrenceCase) {
    let exclude: Vec<DateTime<Utc>> = case.exclude.iter().copied().map(parse_rfc3339).collect();
    let generator = RecurrenceGenerator::new(case.rule, parse_rfc3339(case.anchor), &exclude)
        .unwrap_or_else(|err| panic!("Failed to build {}: {}", case.name, err));

    let actual = generator.generate_occurrences(
        parse_rfc3339(case.window.0),
        parse_rfc3339(case.window.1),
    );
    let expected: Vec<DateTime<Utc>> = case.expected.iter().copied().map(parse_rfc3339).collect();

    assert_eq!(actual, expected, "Case {} did not match", case.name);
    assert_eq!(
        generator.first_occurrence(),
        case.first.map(parse_rfc3339),
        "Case {} first occurrence",
        case.name
    );
}
