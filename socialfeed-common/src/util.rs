use time::UtcDateTime;

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const THIRTY_DAYS: i64 = 30 * DAY;

/// Coarse relative age of `then` as seen from `now`, falling back to a `M/D/YYYY` date after 30 days.
#[must_use]
pub fn time_ago(then: UtcDateTime, now: UtcDateTime) -> String {
    let seconds = (now - then).whole_seconds();

    if seconds < MINUTE {
        "Just now".to_owned()
    } else if seconds < HOUR {
        format!("{} minutes ago", seconds / MINUTE)
    } else if seconds < DAY {
        format!("{} hours ago", seconds / HOUR)
    } else if seconds < THIRTY_DAYS {
        format!("{} days ago", seconds / DAY)
    } else {
        let date = then.date();
        format!("{}/{}/{}", u8::from(date.month()), date.day(), date.year())
    }
}
