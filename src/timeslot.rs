//! Week parity, event types and the weekly slot grid.

use crate::error::TimetableError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Teaching days per week.
pub const DAYS_PER_WEEK: u8 = 5;

/// Teaching periods per day.
pub const PERIODS_PER_DAY: u8 = 4;

/// Total number of slots across both week parities.
pub const SLOT_COUNT: usize = 2 * DAYS_PER_WEEK as usize * PERIODS_PER_DAY as usize;

/// Alternating week parity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WeekParity {
    Even,
    Odd,
}

impl WeekParity {
    pub const ALL: [WeekParity; 2] = [WeekParity::Even, WeekParity::Odd];
}

impl fmt::Display for WeekParity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeekParity::Even => f.write_str("EVEN"),
            WeekParity::Odd => f.write_str("ODD"),
        }
    }
}

/// Which week parities a subject is taught in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WeekType {
    Even,
    Odd,
    #[default]
    Both,
}

impl WeekType {
    /// The parities this week type expands to.
    pub fn parities(self) -> &'static [WeekParity] {
        match self {
            WeekType::Even => &[WeekParity::Even],
            WeekType::Odd => &[WeekParity::Odd],
            WeekType::Both => &WeekParity::ALL,
        }
    }
}

/// Kind of teaching event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventType {
    Lecture,
    Practical,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventType::Lecture => f.write_str("Lecture"),
            EventType::Practical => f.write_str("Practical"),
        }
    }
}

/// An atomic (week parity, day, period) scheduling unit.
///
/// Ordering is parity first, then day, then period. Day and period always lie
/// on the grid; deserialisation goes through the same check as [`TimeSlot::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawTimeSlot")]
pub struct TimeSlot {
    parity: WeekParity,
    day: u8,
    period: u8,
}

#[derive(Deserialize)]
struct RawTimeSlot {
    parity: WeekParity,
    day: u8,
    period: u8,
}

impl TryFrom<RawTimeSlot> for TimeSlot {
    type Error = TimetableError;

    fn try_from(raw: RawTimeSlot) -> Result<Self, Self::Error> {
        TimeSlot::new(raw.parity, raw.day, raw.period).ok_or(TimetableError::InvalidTimeSlot {
            day: raw.day,
            period: raw.period,
        })
    }
}

impl TimeSlot {
    /// Create a slot, or `None` when day or period fall outside the grid.
    pub fn new(parity: WeekParity, day: u8, period: u8) -> Option<Self> {
        if day >= DAYS_PER_WEEK || period >= PERIODS_PER_DAY {
            return None;
        }
        Some(TimeSlot {
            parity,
            day,
            period,
        })
    }

    pub fn parity(&self) -> WeekParity {
        self.parity
    }

    /// Zero-based day of the week.
    pub fn day(&self) -> u8 {
        self.day
    }

    /// Zero-based period of the day.
    pub fn period(&self) -> u8 {
        self.period
    }

    /// A uniformly drawn slot of the given parity.
    pub fn random<R: Rng + ?Sized>(parity: WeekParity, rng: &mut R) -> Self {
        TimeSlot {
            parity,
            day: rng.gen_range(0..DAYS_PER_WEEK),
            period: rng.gen_range(0..PERIODS_PER_DAY),
        }
    }

    /// All slots of one week parity, in order.
    pub fn for_parity(parity: WeekParity) -> impl Iterator<Item = TimeSlot> {
        (0..DAYS_PER_WEEK).flat_map(move |day| {
            (0..PERIODS_PER_DAY).map(move |period| TimeSlot {
                parity,
                day,
                period,
            })
        })
    }

    /// The full slot universe, in order.
    pub fn all() -> impl Iterator<Item = TimeSlot> {
        WeekParity::ALL.into_iter().flat_map(TimeSlot::for_parity)
    }

    /// Dense position of this slot in `TimeSlot::all()`.
    pub fn index(&self) -> usize {
        let parity = match self.parity {
            WeekParity::Even => 0,
            WeekParity::Odd => 1,
        };
        (parity * DAYS_PER_WEEK as usize + self.day as usize) * PERIODS_PER_DAY as usize
            + self.period as usize
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - day {}, lesson {}",
            self.parity,
            self.day + 1,
            self.period + 1
        )
    }
}
