//! Priority evaluation from category and due-date distance

use chrono::{DateTime, Utc};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Contribution of the category alone
pub fn category_weight(category: &str) -> u32 {
    match category {
        "urgent" => 10,
        "work" => 5,
        _ => 0,
    }
}

/// Whole days until `due`, rounded up. Zero or negative once `due` has passed.
pub fn days_until(due: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (due - now).num_milliseconds() as f64;
    (millis / MILLIS_PER_DAY).ceil() as i64
}

/// Contribution of the due date
pub fn due_weight(due: Option<DateTime<Utc>>, now: DateTime<Utc>) -> u32 {
    let Some(due) = due else {
        return 0;
    };

    match days_until(due, now) {
        d if d <= 1 => 20,
        d if d <= 3 => 15,
        d if d <= 7 => 10,
        d if d <= 14 => 5,
        _ => 0,
    }
}

/// Priority of a task with this category and due date, evaluated at `now`
pub fn evaluate(category: &str, due: Option<DateTime<Utc>>, now: DateTime<Utc>) -> u32 {
    category_weight(category) + due_weight(due, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_category_weight() {
        assert_eq!(category_weight("urgent"), 10);
        assert_eq!(category_weight("work"), 5);
        assert_eq!(category_weight("personal"), 0);
        assert_eq!(category_weight("Urgent"), 0);
    }

    #[test]
    fn test_no_due_date() {
        assert_eq!(evaluate("personal", None, now()), 0);
        assert_eq!(evaluate("urgent", None, now()), 10);
    }

    #[test]
    fn test_exactly_one_day_ahead() {
        let due = now() + Duration::days(1);
        assert_eq!(days_until(due, now()), 1);
        assert_eq!(due_weight(Some(due), now()), 20);
    }

    #[test]
    fn test_ceiling_rounding() {
        let due = now() + Duration::hours(25);
        assert_eq!(days_until(due, now()), 2);
        assert_eq!(due_weight(Some(due), now()), 15);
    }

    #[test]
    fn test_past_due() {
        let due = now() - Duration::days(30);
        assert!(days_until(due, now()) <= 0);
        assert_eq!(due_weight(Some(due), now()), 20);
    }

    #[test]
    fn test_buckets() {
        let at = |days: i64| due_weight(Some(now() + Duration::days(days)), now());
        assert_eq!(at(0), 20);
        assert_eq!(at(2), 15);
        assert_eq!(at(3), 15);
        assert_eq!(at(4), 10);
        assert_eq!(at(7), 10);
        assert_eq!(at(8), 5);
        assert_eq!(at(14), 5);
        assert_eq!(at(15), 0);
    }

    #[test]
    fn test_combined() {
        let n = now();
        assert_eq!(evaluate("work", Some(n + Duration::days(2)), n), 20);
        assert_eq!(evaluate("personal", Some(n + Duration::days(10)), n), 5);
        assert_eq!(evaluate("urgent", Some(n - Duration::hours(1)), n), 30);
    }

    #[test]
    fn test_pure() {
        let due = Some(now() + Duration::days(5));
        assert_eq!(evaluate("work", due, now()), evaluate("work", due, now()));
    }
}
