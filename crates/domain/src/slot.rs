use crate::catalog::Stylist;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt::Display, str::FromStr};
use thiserror::Error;

/// A time of day at minute granularity, written on the wire in the
/// 12-hour form used by the salon, e.g. `09:30 AM`.
///
/// Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SlotTime {
    hour: u32,
    minute: u32,
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Please select a valid time slot (e.g., 10:00 AM, 2:30 PM). Got: `{0}`")]
pub struct InvalidSlotTimeError(pub String);

static SLOT_TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(0?[1-9]|1[0-2]):([0-5][0-9])\s*(AM|PM)$").expect("valid slot time regex")
});

impl SlotTime {
    /// `hour` uses the 24-hour clock
    const fn new_unchecked(hour: u32, minute: u32) -> Self {
        Self { hour, minute }
    }

    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self { hour, minute })
        } else {
            None
        }
    }

    /// Hour on the 24-hour clock: `12 AM` is 0, `12 PM` stays 12 and
    /// any other PM hour has 12 added.
    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    pub fn minutes_since_midnight(&self) -> u32 {
        self.hour * 60 + self.minute
    }

    fn from_12_hour(hour: u32, minute: u32, pm: bool) -> Self {
        let hour = match (hour, pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, true) => h + 12,
            (h, false) => h,
        };
        Self { hour, minute }
    }
}

impl FromStr for SlotTime {
    type Err = InvalidSlotTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let captures = SLOT_TIME_RE
            .captures(s)
            .ok_or_else(|| InvalidSlotTimeError(s.to_string()))?;
        let parse = |idx: usize| {
            captures
                .get(idx)
                .and_then(|m| m.as_str().parse::<u32>().ok())
                .ok_or_else(|| InvalidSlotTimeError(s.to_string()))
        };
        let hour = parse(1)?;
        let minute = parse(2)?;
        let pm = captures
            .get(3)
            .map(|m| m.as_str().eq_ignore_ascii_case("PM"))
            .unwrap_or(false);

        Ok(Self::from_12_hour(hour, minute, pm))
    }
}

impl Display for SlotTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (hour, period) = match self.hour {
            0 => (12, "AM"),
            h if h < 12 => (h, "AM"),
            12 => (12, "PM"),
            h => (h - 12, "PM"),
        };
        write!(f, "{:02}:{:02} {}", hour, self.minute, period)
    }
}

impl TryFrom<String> for SlotTime {
    type Error = InvalidSlotTimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SlotTime> for String {
    fn from(slot: SlotTime) -> Self {
        slot.to_string()
    }
}

/// The bookable slots of a business day, 09:00 AM to 07:30 PM every 30 minutes
pub const TIME_SLOTS: [SlotTime; 22] = [
    SlotTime::new_unchecked(9, 0),
    SlotTime::new_unchecked(9, 30),
    SlotTime::new_unchecked(10, 0),
    SlotTime::new_unchecked(10, 30),
    SlotTime::new_unchecked(11, 0),
    SlotTime::new_unchecked(11, 30),
    SlotTime::new_unchecked(12, 0),
    SlotTime::new_unchecked(12, 30),
    SlotTime::new_unchecked(13, 0),
    SlotTime::new_unchecked(13, 30),
    SlotTime::new_unchecked(14, 0),
    SlotTime::new_unchecked(14, 30),
    SlotTime::new_unchecked(15, 0),
    SlotTime::new_unchecked(15, 30),
    SlotTime::new_unchecked(16, 0),
    SlotTime::new_unchecked(16, 30),
    SlotTime::new_unchecked(17, 0),
    SlotTime::new_unchecked(17, 30),
    SlotTime::new_unchecked(18, 0),
    SlotTime::new_unchecked(18, 30),
    SlotTime::new_unchecked(19, 0),
    SlotTime::new_unchecked(19, 30),
];

/// A slot that is taken on some date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookedSlot {
    pub time: SlotTime,
    pub stylist: Stylist,
}

/// Returns the slots of the day in which `stylist` can still be booked,
/// given the active bookings of that day.
pub fn get_available_slots(booked: &[BookedSlot], stylist: Stylist) -> Vec<SlotTime> {
    TIME_SLOTS
        .iter()
        .filter(|slot| {
            !booked
                .iter()
                .any(|b| b.time == **slot && b.stylist.conflicts_with(&stylist))
        })
        .copied()
        .collect()
}
