// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::outreach::count_activities;
use crate::{
    Campaign, IndustryFilter, Lead, LeadQuery, LeadTab, OutreachActivity, OutreachSequence,
    SequenceId, SequenceStatus, SortSpec, average_score, filter_and_sort, industries,
};

/// Workspace-wide outreach totals. Rates are percentages.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnalyticsSummary {
    pub total_leads: usize,
    pub starred_leads: usize,
    pub total_campaigns: usize,
    pub total_sequences: usize,
    pub active_sequences: usize,
    pub total_emails: usize,
    pub sent: usize,
    pub opened: usize,
    pub replied: usize,
    pub scheduled: usize,
    pub open_rate: f64,
    pub reply_rate: f64,
    /// Replies per saved lead.
    pub conversion_rate: f64,
    pub avg_emails_per_sequence: f64,
    pub avg_leads_per_sequence: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SequencePerformance {
    pub id: SequenceId,
    pub name: String,
    pub status: SequenceStatus,
    pub total_emails: usize,
    pub sent: usize,
    pub opened: usize,
    pub replied: usize,
    pub open_rate: f64,
    pub reply_rate: f64,
    pub leads: usize,
    pub email_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndustryPerformance {
    pub industry: String,
    pub leads: usize,
    pub sent: usize,
    pub opened: usize,
    pub replied: usize,
    pub open_rate: f64,
    pub reply_rate: f64,
}

/// `part` as a percentage of `whole`; zero when `whole` is zero.
pub fn rate(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 * 100.0 / whole as f64
}

fn mean(total: usize, count: usize) -> f64 {
    if count == 0 { 0.0 } else { total as f64 / count as f64 }
}

pub fn analytics_summary(
    leads: &[Lead],
    campaigns: &[Campaign],
    sequences: &[OutreachSequence],
    activities: &[OutreachActivity],
) -> AnalyticsSummary {
    let (sent, opened, replied) = count_activities(activities.iter());
    let scheduled = activities.len() - sent;
    AnalyticsSummary {
        total_leads: leads.len(),
        starred_leads: leads.iter().filter(|lead| lead.starred).count(),
        total_campaigns: campaigns.len(),
        total_sequences: sequences.len(),
        active_sequences: sequences
            .iter()
            .filter(|sequence| sequence.status == SequenceStatus::Active)
            .count(),
        total_emails: activities.len(),
        sent,
        opened,
        replied,
        scheduled,
        open_rate: rate(opened, sent),
        reply_rate: rate(replied, sent),
        conversion_rate: rate(replied, leads.len()),
        avg_emails_per_sequence: mean(
            sequences.iter().map(|sequence| sequence.emails.len()).sum(),
            sequences.len(),
        ),
        avg_leads_per_sequence: mean(
            sequences.iter().map(|sequence| sequence.leads.len()).sum(),
            sequences.len(),
        ),
    }
}

/// Per-sequence counts, best reply rate first. Ties keep creation order.
pub fn sequence_performance(
    sequences: &[OutreachSequence],
    activities: &[OutreachActivity],
) -> Vec<SequencePerformance> {
    let mut rows: Vec<SequencePerformance> = sequences
        .iter()
        .map(|sequence| {
            let own: Vec<&OutreachActivity> = activities
                .iter()
                .filter(|activity| activity.sequence_id == sequence.id)
                .collect();
            let (sent, opened, replied) = count_activities(own.iter().copied());
            SequencePerformance {
                id: sequence.id,
                name: sequence.name.clone(),
                status: sequence.status,
                total_emails: own.len(),
                sent,
                opened,
                replied,
                open_rate: rate(opened, sent),
                reply_rate: rate(replied, sent),
                leads: sequence.leads.len(),
                email_count: sequence.emails.len(),
            }
        })
        .collect();
    rows.sort_by(|a, b| b.reply_rate.total_cmp(&a.reply_rate));
    rows
}

/// Saved leads grouped by industry with the activity counts of their
/// members, best reply rate first. Ties keep first-seen order.
pub fn industry_performance(
    leads: &[Lead],
    activities: &[OutreachActivity],
) -> Vec<IndustryPerformance> {
    let mut rows: Vec<IndustryPerformance> = Vec::new();
    for lead in leads {
        let (sent, opened, replied) = count_activities(
            activities
                .iter()
                .filter(|activity| activity.lead_id == lead.id),
        );
        let row = match rows.iter().position(|row| row.industry == lead.industry) {
            Some(index) => &mut rows[index],
            None => {
                rows.push(IndustryPerformance {
                    industry: lead.industry.clone(),
                    leads: 0,
                    sent: 0,
                    opened: 0,
                    replied: 0,
                    open_rate: 0.0,
                    reply_rate: 0.0,
                });
                let last = rows.len() - 1;
                &mut rows[last]
            }
        };
        row.leads += 1;
        row.sent += sent;
        row.opened += opened;
        row.replied += replied;
    }
    for row in &mut rows {
        row.open_rate = rate(row.opened, row.sent);
        row.reply_rate = rate(row.replied, row.sent);
    }
    rows.sort_by(|a, b| b.reply_rate.total_cmp(&a.reply_rate));
    rows
}

/// Search and industry filter over one campaign's lead snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CampaignLeadQuery {
    pub search: String,
    pub industry: IndustryFilter,
}

/// What the campaign detail screen shows for the current query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignDetail<'a> {
    pub leads: Vec<&'a Lead>,
    pub total: usize,
    /// Over the whole snapshot, not just the visible rows.
    pub average_score: u8,
    pub industries: Vec<String>,
}

pub fn campaign_detail<'a>(
    campaign: &'a Campaign,
    query: &CampaignLeadQuery,
    sort: SortSpec,
) -> CampaignDetail<'a> {
    let query = LeadQuery {
        search: query.search.clone(),
        industry: query.industry.clone(),
        tab: LeadTab::All,
    };
    CampaignDetail {
        leads: filter_and_sort(&campaign.leads, &query, sort),
        total: campaign.leads.len(),
        average_score: average_score(campaign.leads.iter()),
        industries: industries(&campaign.leads),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        CampaignLeadQuery, analytics_summary, campaign_detail, industry_performance, rate,
        sequence_performance,
    };
    use crate::{
        ActivityStatus, Campaign, CampaignId, EmailId, IndustryFilter, Lead, LeadId,
        LeadSortField, NewLead, OutreachActivity, OutreachEmail, OutreachSequence, SOURCE_AI_CHAT,
        SequenceId, SequenceStatus, SortDirection, SortSpec, schedule_activities,
    };
    use time::OffsetDateTime;
    use time::macros::datetime;

    const CREATED: OffsetDateTime = datetime!(2026-04-01 12:00 UTC);

    fn lead(id: i64, name: &str, industry: &str, score: u8) -> Lead {
        NewLead {
            name: name.to_owned(),
            company: format!("{name} Inc"),
            industry: industry.to_owned(),
            score,
            ..NewLead::default()
        }
        .into_lead(LeadId::new(id), SOURCE_AI_CHAT, CREATED)
    }

    fn email(id: i64) -> OutreachEmail {
        OutreachEmail {
            id: EmailId::new(id),
            subject: format!("email {id}"),
            content: String::new(),
            delay_days: 0,
            is_follow_up: id > 1,
        }
    }

    fn sequence(id: i64, name: &str, leads: Vec<Lead>, status: SequenceStatus) -> OutreachSequence {
        OutreachSequence {
            id: SequenceId::new(id),
            name: name.to_owned(),
            description: String::new(),
            emails: vec![email(1), email(2)],
            leads,
            status,
            created_at: CREATED,
        }
    }

    fn mark(activities: &mut [OutreachActivity], statuses: &[ActivityStatus]) {
        for (activity, status) in activities.iter_mut().zip(statuses) {
            activity.status = *status;
        }
    }

    fn fixture() -> (Vec<Lead>, Vec<OutreachSequence>, Vec<OutreachActivity>) {
        let mut leads = vec![
            lead(1, "Ada", "Fintech", 90),
            lead(2, "Bo", "Health", 70),
            lead(3, "Cy", "Fintech", 50),
        ];
        leads[0].starred = true;
        let cold = sequence(
            10,
            "Cold",
            vec![leads[0].clone(), leads[1].clone()],
            SequenceStatus::Active,
        );
        let warm = sequence(20, "Warm", vec![leads[2].clone()], SequenceStatus::Draft);
        let mut cold_activities = schedule_activities(&cold, 100);
        // Ada: replied, opened. Bo: sent, scheduled.
        mark(
            &mut cold_activities,
            &[
                ActivityStatus::Replied,
                ActivityStatus::Opened,
                ActivityStatus::Sent,
                ActivityStatus::Scheduled,
            ],
        );
        let mut warm_activities = schedule_activities(&warm, 200);
        // Cy: replied, replied.
        mark(&mut warm_activities, &[ActivityStatus::Replied, ActivityStatus::Replied]);
        let activities = cold_activities.into_iter().chain(warm_activities).collect();
        (leads, vec![cold, warm], activities)
    }

    #[test]
    fn rate_is_zero_for_empty_whole() {
        assert_eq!(rate(3, 0), 0.0);
        assert_eq!(rate(1, 4), 25.0);
    }

    #[test]
    fn summary_counts_progressed_statuses_as_sent() {
        let (leads, sequences, activities) = fixture();
        let summary = analytics_summary(&leads, &[], &sequences, &activities);
        assert_eq!(summary.total_leads, 3);
        assert_eq!(summary.starred_leads, 1);
        assert_eq!(summary.total_sequences, 2);
        assert_eq!(summary.active_sequences, 1);
        assert_eq!(summary.total_emails, 6);
        assert_eq!((summary.sent, summary.opened, summary.replied), (5, 4, 3));
        assert_eq!(summary.scheduled, 1);
        assert_eq!(summary.open_rate, 80.0);
        assert_eq!(summary.reply_rate, 60.0);
        assert_eq!(summary.conversion_rate, 100.0);
        assert_eq!(summary.avg_emails_per_sequence, 2.0);
        assert_eq!(summary.avg_leads_per_sequence, 1.5);
    }

    #[test]
    fn empty_workspace_has_zero_rates() {
        let summary = analytics_summary(&[], &[], &[], &[]);
        assert_eq!(summary.open_rate, 0.0);
        assert_eq!(summary.conversion_rate, 0.0);
        assert_eq!(summary.avg_leads_per_sequence, 0.0);
    }

    #[test]
    fn sequences_rank_by_reply_rate() {
        let (_, sequences, activities) = fixture();
        let rows = sequence_performance(&sequences, &activities);
        let names: Vec<&str> = rows.iter().map(|row| row.name.as_str()).collect();
        assert_eq!(names, vec!["Warm", "Cold"]);
        assert_eq!(rows[0].reply_rate, 100.0);
        let cold = &rows[1];
        assert_eq!(cold.total_emails, 4);
        assert_eq!((cold.sent, cold.opened, cold.replied), (3, 2, 1));
        assert_eq!(cold.leads, 2);
        assert_eq!(cold.email_count, 2);
    }

    #[test]
    fn industries_pool_their_leads_activity() {
        let (leads, _, activities) = fixture();
        let rows = industry_performance(&leads, &activities);
        assert_eq!(rows.len(), 2);
        let fintech = &rows[0];
        assert_eq!(fintech.industry, "Fintech");
        assert_eq!(fintech.leads, 2);
        assert_eq!((fintech.sent, fintech.opened, fintech.replied), (4, 4, 3));
        assert_eq!(fintech.reply_rate, 75.0);
        let health = &rows[1];
        assert_eq!((health.leads, health.sent, health.replied), (1, 1, 0));
        assert_eq!(health.reply_rate, 0.0);
    }

    fn campaign_of(leads: Vec<Lead>) -> Campaign {
        Campaign {
            id: CampaignId::new(5),
            name: "Q3 push".to_owned(),
            description: String::new(),
            leads,
            created_at: CREATED,
            priority: None,
            goal: None,
            category: None,
            tags: Default::default(),
        }
    }

    #[test]
    fn campaign_detail_filters_but_scores_the_whole_snapshot() {
        let campaign = campaign_of(vec![
            lead(1, "Ada", "Fintech", 90),
            lead(2, "Bo", "Health", 71),
            lead(3, "Cy", "Fintech", 50),
        ]);
        let query = CampaignLeadQuery {
            search: String::new(),
            industry: IndustryFilter::Only("Fintech".to_owned()),
        };
        let detail = campaign_detail(&campaign, &query, SortSpec::default());
        let names: Vec<&str> = detail.leads.iter().map(|lead| lead.name.as_str()).collect();
        assert_eq!(names, vec!["Ada", "Cy"]);
        assert_eq!(detail.total, 3);
        assert_eq!(detail.average_score, 70);
        assert_eq!(detail.industries, vec!["Fintech", "Health"]);
    }

    #[test]
    fn campaign_detail_ignores_star_state_and_honours_sort() {
        let mut leads = vec![lead(1, "Ada", "Fintech", 90), lead(2, "Bo", "Health", 71)];
        leads[1].starred = true;
        let campaign = campaign_of(leads);
        let query = CampaignLeadQuery {
            search: "inc".to_owned(),
            industry: IndustryFilter::All,
        };
        let sort = SortSpec {
            field: LeadSortField::Score,
            direction: SortDirection::Asc,
        };
        let detail = campaign_detail(&campaign, &query, sort);
        let names: Vec<&str> = detail.leads.iter().map(|lead| lead.name.as_str()).collect();
        assert_eq!(names, vec!["Bo", "Ada"]);
        assert!(campaign_detail(&campaign_of(Vec::new()), &query, sort).leads.is_empty());
    }
}
