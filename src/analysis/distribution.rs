use crate::model::{HourCount, NormalizedCommit, WeekdayCount};
use crate::util::{weekday_name, WEEKDAYS};

pub fn weekday_counts(rows: &[NormalizedCommit]) -> Vec<WeekdayCount> {
    let mut counts = [0u64; 7];
    for row in rows {
        counts[row.day_of_week.num_days_from_monday() as usize] += 1;
    }
    WEEKDAYS
        .iter()
        .zip(counts)
        .map(|(day, commits)| WeekdayCount {
            day: weekday_name(*day).to_string(),
            commits,
        })
        .collect()
}

pub fn hour_counts(rows: &[NormalizedCommit]) -> Vec<HourCount> {
    let mut counts = [0u64; 24];
    for row in rows {
        if let Some(slot) = counts.get_mut(row.hour as usize) {
            *slot += 1;
        }
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(hour, commits)| HourCount {
            hour: hour as u32,
            commits,
        })
        .collect()
}

/// Highest count; ties go to the earlier weekday.
pub fn busiest_weekday(counts: &[WeekdayCount]) -> String {
    counts
        .iter()
        .fold(None::<&WeekdayCount>, |best, c| match best {
            Some(b) if b.commits >= c.commits => Some(b),
            _ => Some(c),
        })
        .map(|c| c.day.clone())
        .unwrap_or_else(|| weekday_name(WEEKDAYS[0]).to_string())
}

/// Highest count; ties go to the lower hour.
pub fn busiest_hour(counts: &[HourCount]) -> u32 {
    counts
        .iter()
        .fold(None::<&HourCount>, |best, c| match best {
            Some(b) if b.commits >= c.commits => Some(b),
            _ => Some(c),
        })
        .map(|c| c.hour)
        .unwrap_or(0)
}

/// Share of commits made Monday through Friday, as a percentage.
pub fn workday_share(counts: &[WeekdayCount], total: u64) -> f64 {
    let workdays: u64 = counts.iter().take(5).map(|c| c.commits).sum();
    crate::util::percentage(workdays as f64, total as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weekdays(values: [u64; 7]) -> Vec<WeekdayCount> {
        WEEKDAYS
            .iter()
            .zip(values)
            .map(|(d, commits)| WeekdayCount {
                day: weekday_name(*d).to_string(),
                commits,
            })
            .collect()
    }

    #[test]
    fn empty_input_still_has_every_bucket() {
        assert_eq!(weekday_counts(&[]).len(), 7);
        assert_eq!(hour_counts(&[]).len(), 24);
        assert!(hour_counts(&[]).iter().all(|h| h.commits == 0));
    }

    #[test]
    fn weekday_tie_prefers_monday_side() {
        assert_eq!(busiest_weekday(&weekdays([0, 3, 0, 3, 0, 0, 0])), "Tuesday");
        assert_eq!(busiest_weekday(&weekdays([0; 7])), "Monday");
    }

    #[test]
    fn hour_tie_prefers_lower_hour() {
        let mut hours: Vec<HourCount> = (0..24).map(|h| HourCount { hour: h, commits: 0 }).collect();
        hours[9].commits = 4;
        hours[17].commits = 4;
        assert_eq!(busiest_hour(&hours), 9);
    }

    #[test]
    fn workday_share_is_zero_guarded() {
        assert_eq!(workday_share(&weekdays([0; 7]), 0), 0.0);
        assert_eq!(workday_share(&weekdays([1, 1, 0, 0, 0, 1, 1]), 4), 50.0);
    }
}
