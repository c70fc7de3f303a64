use chrono::{DateTime, Duration, FixedOffset, NaiveTime};

/// 開始時間距離現在至少 30 分鐘
pub const MIN_LEAD_MINUTES: i64 = 30;
/// 結束時間至少比開始晚 15 分鐘
pub const MIN_DURATION_MINUTES: i64 = 15;
/// 結束時間過早時自動設為開始後 30 分鐘
pub const END_FALLBACK_MINUTES: i64 = 30;
pub const SLOT_MINUTES: i64 = 15;

/// Start and end of a gig as currently displayed on the location & time step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl Schedule {
    /// Two days from now, 09:00 to 16:00 in `now`'s offset.
    pub fn default_for(now: DateTime<FixedOffset>) -> Self {
        let day = now.date_naive() + Duration::days(2);
        let offset = *now.offset();
        let at = |hour: i64| {
            let local = day.and_time(NaiveTime::MIN) + Duration::hours(hour);
            let utc = local - Duration::seconds(offset.local_minus_utc() as i64);
            DateTime::<FixedOffset>::from_naive_utc_and_offset(utc, offset)
        };

        Self {
            start: at(9),
            end: at(16),
        }
    }

    /// 使用者選擇開始時間：過早則往後調整，並視需要推移結束時間
    pub fn pick_start(&mut self, picked: DateTime<FixedOffset>, now: DateTime<FixedOffset>) {
        self.start = clamp_start(picked, now);

        if self.end < self.start + Duration::minutes(MIN_DURATION_MINUTES) {
            self.end = self.start + Duration::minutes(END_FALLBACK_MINUTES);
        }
    }

    pub fn pick_end(&mut self, picked: DateTime<FixedOffset>) {
        self.end = clamp_end(picked, self.start);
    }
}

/// now + 30 分鐘，再往上取整到 15 分鐘刻度
pub fn earliest_start(now: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    ceil_to_slot(now + Duration::minutes(MIN_LEAD_MINUTES))
}

pub fn clamp_start(
    picked: DateTime<FixedOffset>,
    now: DateTime<FixedOffset>,
) -> DateTime<FixedOffset> {
    let earliest = earliest_start(now);
    if picked < earliest {
        earliest
    } else {
        picked
    }
}

pub fn clamp_end(
    picked: DateTime<FixedOffset>,
    start: DateTime<FixedOffset>,
) -> DateTime<FixedOffset> {
    if picked < start + Duration::minutes(MIN_DURATION_MINUTES) {
        start + Duration::minutes(END_FALLBACK_MINUTES)
    } else {
        picked
    }
}

/// Rounds up to the next quarter hour of the timestamp's own local clock.
pub fn ceil_to_slot(t: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    let slot = SLOT_MINUTES * 60;
    let secs = t.timestamp();
    let local_secs = secs + t.offset().local_minus_utc() as i64;
    let rem = local_secs.rem_euclid(slot);

    if rem == 0 && t.timestamp_subsec_nanos() == 0 {
        return t;
    }

    DateTime::from_timestamp(secs - rem + slot, 0)
        .map(|utc| utc.with_timezone(t.offset()))
        .unwrap_or(t)
}

/// `GMT+03:00` style label.
pub fn offset_label(offset: &FixedOffset) -> String {
    let total = offset.local_minus_utc();
    let sign = if total < 0 { '-' } else { '+' };
    let minutes = total.abs() / 60;
    format!("GMT{}{:02}:{:02}", sign, minutes / 60, minutes % 60)
}

/// `America/Port_of_Spain` -> `Port of Spain`
pub fn city_from_time_zone(iana: &str) -> String {
    iana.rsplit('/').next().unwrap_or(iana).replace('_', " ")
}
