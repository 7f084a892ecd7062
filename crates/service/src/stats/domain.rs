use serde::Serialize;

/// Counts accumulated between two flushes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterDelta {
    pub get: u64,
    pub post: u64,
}

impl CounterDelta {
    pub fn is_empty(&self) -> bool {
        self.get == 0 && self.post == 0
    }

    pub fn total(&self) -> u64 {
        self.get + self.post
    }
}

/// Durable counters. `today_*` only ever count requests attributed to `today_date`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalStats {
    pub all_time_get: u64,
    pub all_time_post: u64,
    pub today_date: String,
    pub today_get: u64,
    pub today_post: u64,
}

impl GlobalStats {
    pub fn empty(today: &str) -> Self {
        Self {
            all_time_get: 0,
            all_time_post: 0,
            today_date: today.to_string(),
            today_get: 0,
            today_post: 0,
        }
    }

    /// Roll the day over if needed, then add `delta` to both windows.
    pub fn apply(&mut self, delta: CounterDelta, today: &str) {
        if self.today_date != today {
            self.today_date = today.to_string();
            self.today_get = 0;
            self.today_post = 0;
        }
        self.all_time_get += delta.get;
        self.all_time_post += delta.post;
        self.today_get += delta.get;
        self.today_post += delta.post;
    }

    /// Day counters as of `today`; a stale stored day reads as zero.
    pub fn day_counts(&self, today: &str) -> CounterDelta {
        if self.today_date == today {
            CounterDelta { get: self.today_get, post: self.today_post }
        } else {
            CounterDelta::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllTimeView {
    pub get: u64,
    pub post: u64,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodayView {
    pub get: u64,
    pub post: u64,
    pub total: u64,
    pub date: String,
}

/// Display snapshot returned by the stats reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedStats {
    pub all_time: AllTimeView,
    pub today: TodayView,
}

impl FormattedStats {
    pub fn new(all_time: CounterDelta, today: CounterDelta, date: String) -> Self {
        Self {
            all_time: AllTimeView { get: all_time.get, post: all_time.post, total: all_time.total() },
            today: TodayView { get: today.get, post: today.post, total: today.total(), date },
        }
    }
}
