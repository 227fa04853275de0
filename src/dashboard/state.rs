use chrono::{DateTime, Utc};
use num_format::{Locale, ToFormattedString};

use crate::leads::{Conversation, Lead, LeadStatus, Note};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(LeadStatus),
}

/// Draft values for the create-lead form. Everything is kept as entered;
/// conversion to a webhook payload happens on submit.
#[derive(Debug, Clone, Default)]
pub struct LeadForm {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub budget: String,
    pub timeline: String,
    pub is_vip: bool,
    pub notes: String,
}

impl LeadForm {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeadStats {
    pub total: usize,
    pub vip: usize,
    pub qualified: usize,
    pub in_progress: usize,
}

/// View state for the lead dashboard. `loading` only covers the initial
/// fetch; after that the state is "ready" and sub-state is determined by
/// the selection and the create-lead form.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub loading: bool,
    pub refreshing: bool,
    pub creating_lead: bool,
    pub show_lead_form: bool,
    pub leads: Vec<Lead>,
    pub selected: Option<Lead>,
    pub conversations: Vec<Conversation>,
    pub notes: Vec<Note>,
    pub note_draft: String,
    pub search_term: String,
    pub status_filter: StatusFilter,
    pub lead_form: LeadForm,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardState {
    pub fn new() -> Self {
        Self {
            loading: true,
            refreshing: false,
            creating_lead: false,
            show_lead_form: false,
            leads: Vec::new(),
            selected: None,
            conversations: Vec::new(),
            notes: Vec::new(),
            note_draft: String::new(),
            search_term: String::new(),
            status_filter: StatusFilter::All,
            lead_form: LeadForm::default(),
        }
    }

    /// Search matches the name case-insensitively or the phone literally;
    /// the status filter is an exact match. Always filters the lead vector,
    /// so "no leads" and "no matches" are both an empty result.
    pub fn filtered_leads(&self) -> Vec<&Lead> {
        let needle = self.search_term.to_lowercase();
        self.leads
            .iter()
            .filter(|lead| {
                let matches_search = lead.name.to_lowercase().contains(&needle)
                    || lead.phone.contains(&self.search_term);
                let matches_filter = match self.status_filter {
                    StatusFilter::All => true,
                    StatusFilter::Only(status) => lead.status == status,
                };
                matches_search && matches_filter
            })
            .collect()
    }

    pub fn stats(&self) -> LeadStats {
        LeadStats {
            total: self.leads.len(),
            vip: self.leads.iter().filter(|l| l.is_vip).count(),
            qualified: self
                .leads
                .iter()
                .filter(|l| l.status == LeadStatus::Qualified)
                .count(),
            in_progress: self
                .leads
                .iter()
                .filter(|l| l.status == LeadStatus::InProgress)
                .count(),
        }
    }
}

pub fn format_budget(amount: Option<i64>) -> String {
    match amount {
        Some(amount) => format!("${}", amount.to_formatted_string(&Locale::en)),
        None => "Not specified".to_string(),
    }
}

pub fn format_age(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - timestamp).num_minutes();
    if minutes < 1 {
        return "Just now".to_string();
    }
    if minutes < 60 {
        return format!("{minutes}m ago");
    }
    if minutes < 1440 {
        return format!("{}h ago", minutes / 60);
    }
    timestamp.format("%b %-d, %H:%M").to_string()
}

pub fn status_label(status: LeadStatus) -> &'static str {
    match status {
        LeadStatus::New => "New",
        LeadStatus::InProgress => "In Progress",
        LeadStatus::Qualified => "Qualified",
        LeadStatus::NeedsHumanReview => "Needs Review",
    }
}
