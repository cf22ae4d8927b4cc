//! Summaries an adventurer sees over their own bookings, plus the hints
//! clients use to grey out actions the server would refuse.
use chrono::{DateTime, Utc};
use records::{
    bookings::{BookingStatus, BookingWithTrip, MyHikes},
    policy,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookingStats {
    pub total: usize,
    pub active: usize,
    pub cancelled: usize,
    pub participants: usize,
}

impl BookingStats {
    pub fn from_hikes(hikes: &MyHikes) -> Self {
        hikes
            .upcoming
            .iter()
            .chain(&hikes.past)
            .chain(&hikes.cancelled)
            .fold(Self::default(), |mut stats, booking| {
                stats.total += 1;
                stats.participants += booking.participants.len();

                match booking.status {
                    BookingStatus::Confirmed => stats.active += 1,
                    BookingStatus::Cancelled => stats.cancelled += 1,
                }

                stats
            })
    }

    /// Share of bookings still confirmed, as a whole percentage.
    pub fn booking_rate(&self) -> Option<u32> {
        percentage(self.active, self.total)
    }

    pub fn cancellation_rate(&self) -> Option<u32> {
        percentage(self.cancelled, self.total)
    }
}

fn percentage(part: usize, total: usize) -> Option<u32> {
    if total == 0 {
        return None;
    }

    Some((part as f64 / total as f64 * 100.0).round() as u32)
}

/// Whether the owning company may still edit or delete a trip set for `date`.
pub fn can_edit(date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    policy::outside_window(date, now)
}

pub fn can_cancel(booking: &BookingWithTrip, now: DateTime<Utc>) -> bool {
    booking.status == BookingStatus::Confirmed && policy::outside_window(booking.trip.date(), now)
}
