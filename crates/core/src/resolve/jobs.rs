use serde::{Deserialize, Serialize};

use super::template_callouts;
use crate::models::{
    rule::callouts_for, Callout, Configuration, Contact, JobMode, Rule, RuleDomain, RuleEffect,
    Step,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDetails {
    pub mode: JobMode,
    /// Contacts each player draws a starting job from. Empty when no jobs are dealt.
    pub contacts: Vec<Contact>,
    pub forbidden: Vec<Contact>,
    pub callouts: Vec<Callout>,
}

pub fn resolve_jobs(_config: &Configuration, step: &Step, rules: &[Rule]) -> JobDetails {
    let mode = rules
        .iter()
        .find_map(|rule| match rule.effect {
            RuleEffect::SetJobMode { mode } => Some(mode),
            _ => None,
        })
        .or(step.overrides.job_mode)
        .unwrap_or_default();

    let mut forbidden = Vec::new();
    let mut extra = Vec::new();
    for rule in rules {
        match &rule.effect {
            RuleEffect::ForbidContact { contact } if !forbidden.contains(contact) => {
                forbidden.push(*contact)
            }
            RuleEffect::AllowContacts { contacts } => extra.extend(contacts.iter().copied()),
            _ => {}
        }
    }

    let contacts = match mode {
        JobMode::NoJobs | JobMode::CaperStart => Vec::new(),
        JobMode::Standard | JobMode::RimOnly | JobMode::DraftPick => {
            let mut contacts: Vec<Contact> = Vec::new();
            for contact in Contact::STANDARD.into_iter().chain(extra) {
                if !forbidden.contains(&contact) && !contacts.contains(&contact) {
                    contacts.push(contact);
                }
            }
            contacts
        }
    };

    let mut callouts = template_callouts(&step.overrides.notes);
    callouts.extend(callouts_for(rules, RuleDomain::Jobs));

    JobDetails {
        mode,
        contacts,
        forbidden,
        callouts,
    }
}
