// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::{Duration, OffsetDateTime};

use crate::{
    ActivityId, ActivityStatus, OutreachActivity, OutreachSequence, OutreachStats, SequenceId,
    SequenceStatus,
};

pub const SEND_PROBABILITY: f64 = 0.7;
pub const OPEN_PROBABILITY: f64 = 0.3;
pub const REPLY_PROBABILITY: f64 = 0.1;
pub const OPEN_AFTER: Duration = Duration::hours(1);
pub const REPLY_AFTER: Duration = Duration::hours(2);
pub const ADVANCE_INTERVAL: std::time::Duration = std::time::Duration::from_secs(10);

/// Source of uniform draws in `[0, 1)` for the simulated mailbox.
pub trait Chance {
    fn roll(&mut self) -> f64;
}

impl Chance for fastrand::Rng {
    fn roll(&mut self) -> f64 {
        self.f64()
    }
}

/// One activity per (lead, email). Each lead's sends are chained: every
/// email lands `delay_days` after the previous one, starting at creation.
/// Offsets past the calendar's end clamp to its last instant.
pub fn schedule_activities(sequence: &OutreachSequence, first_id: i64) -> Vec<OutreachActivity> {
    let mut activities = Vec::with_capacity(sequence.leads.len() * sequence.emails.len());
    let mut next_id = first_id;
    for lead in &sequence.leads {
        let mut scheduled = sequence.created_at;
        for email in &sequence.emails {
            scheduled = scheduled.saturating_add(Duration::days(i64::from(email.delay_days)));
            activities.push(OutreachActivity {
                id: ActivityId::new(next_id),
                lead_id: lead.id,
                sequence_id: sequence.id,
                email_id: email.id,
                status: ActivityStatus::Scheduled,
                scheduled_for: scheduled,
                sent_at: None,
                opened_at: None,
                replied_at: None,
            });
            next_id += 1;
        }
    }
    activities
}

/// One tick of the simulated mailbox. Returns how many activities moved.
pub fn advance_activities(
    activities: &mut [OutreachActivity],
    now: OffsetDateTime,
    chance: &mut dyn Chance,
) -> usize {
    let mut moved = 0;
    for activity in activities.iter_mut() {
        match activity.status {
            ActivityStatus::Scheduled if activity.scheduled_for <= now => {
                if chance.roll() < SEND_PROBABILITY {
                    activity.status = ActivityStatus::Sent;
                    activity.sent_at = Some(now);
                    moved += 1;
                }
            }
            ActivityStatus::Sent => {
                if let Some(sent_at) = activity.sent_at
                    && now - sent_at > OPEN_AFTER
                    && chance.roll() < OPEN_PROBABILITY
                {
                    activity.status = ActivityStatus::Opened;
                    activity.opened_at = Some(now);
                    moved += 1;
                }
            }
            ActivityStatus::Opened => {
                if let Some(opened_at) = activity.opened_at
                    && now - opened_at > REPLY_AFTER
                    && chance.roll() < REPLY_PROBABILITY
                {
                    activity.status = ActivityStatus::Replied;
                    activity.replied_at = Some(now);
                    moved += 1;
                }
            }
            ActivityStatus::Scheduled | ActivityStatus::Replied => {}
        }
    }
    if moved > 0 {
        tracing::debug!(moved, "outreach activities advanced");
    }
    moved
}

pub(crate) fn count_activities<'a>(
    activities: impl Iterator<Item = &'a OutreachActivity>,
) -> (usize, usize, usize) {
    activities.fold((0, 0, 0), |(sent, opened, replied), activity| {
        match activity.status {
            ActivityStatus::Scheduled => (sent, opened, replied),
            ActivityStatus::Sent => (sent + 1, opened, replied),
            ActivityStatus::Opened => (sent + 1, opened + 1, replied),
            ActivityStatus::Replied => (sent + 1, opened + 1, replied + 1),
        }
    })
}

pub fn outreach_stats(
    sequences: &[OutreachSequence],
    activities: &[OutreachActivity],
) -> OutreachStats {
    let (total_sent, total_opened, total_replied) = count_activities(activities.iter());
    OutreachStats {
        active_sequences: sequences
            .iter()
            .filter(|sequence| sequence.status == SequenceStatus::Active)
            .count(),
        total_sent,
        total_opened,
        total_replied,
    }
}

/// Sent, opened and replied counts for one sequence.
pub fn sequence_progress(
    activities: &[OutreachActivity],
    sequence_id: SequenceId,
) -> (usize, usize, usize) {
    count_activities(
        activities
            .iter()
            .filter(|activity| activity.sequence_id == sequence_id),
    )
}
