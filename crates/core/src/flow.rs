#![allow(missing_docs)]

//! Composition of the ordered setup flow from setup card templates.

use tracing::debug;

use crate::{
    catalog::{Catalog, PairedEntry, SetupCard, StepEntry},
    models::{step::ids, Configuration, Step, StepKind},
};

/// Ordered steps for `config`. Unknown setup cards fall back to the standard card.
pub fn compose(catalog: &Catalog, config: &Configuration) -> Vec<Step> {
    let primary = catalog.setup_card(&config.setup_card).unwrap_or_else(|| {
        debug!(setup_card = %config.setup_card, "Unknown setup card; using standard");
        catalog.standard()
    });
    let secondary = config
        .secondary_setup_card
        .as_deref()
        .filter(|id| *id != primary.id)
        .and_then(|id| {
            let card = catalog.setup_card(id);
            if card.is_none() {
                debug!(secondary = %id, "Unknown secondary setup card ignored");
            }
            card
        });

    let (mut steps, paired) = match (primary.pairing.as_deref(), secondary) {
        (Some(pairing), Some(secondary)) => (paired_steps(primary, pairing, secondary), Some(secondary)),
        (None, Some(secondary)) => {
            debug!(
                setup_card = %primary.id,
                secondary = %secondary.id,
                "Setup card has no pairing template; secondary ignored"
            );
            (own_steps(primary), None)
        }
        _ => (own_steps(primary), None),
    };

    let solo_pairing = paired.is_some_and(|secondary| primary.solo_variant || secondary.solo_variant);
    if config.expansions.tenth || solo_pairing {
        insert_optional_rules(&mut steps, &primary.label);
    }
    steps
}

fn own_steps(card: &SetupCard) -> Vec<Step> {
    card.steps
        .iter()
        .map(|entry| entry.to_step(&card.label))
        .collect()
}

fn paired_steps(primary: &SetupCard, pairing: &[PairedEntry], secondary: &SetupCard) -> Vec<Step> {
    pairing
        .iter()
        .map(|slot| match slot {
            PairedEntry::Own(entry) => entry.to_step(&primary.label),
            PairedEntry::Inherit { id } => secondary
                .entry(id)
                .map(|entry| entry.to_step(&secondary.label))
                .or_else(|| primary.entry(id).map(|entry| entry.to_step(&primary.label)))
                .unwrap_or_else(|| StepEntry::plain(id).to_step(&secondary.label)),
        })
        .collect()
}

/// Insert the optional-rules step ahead of the first final step, once.
fn insert_optional_rules(steps: &mut Vec<Step>, template_name: &str) {
    if steps.iter().any(|step| step.id == ids::OPTIONAL_RULES) {
        return;
    }
    let position = steps
        .iter()
        .position(|step| step.kind == StepKind::Final)
        .unwrap_or(steps.len());
    steps.insert(
        position,
        StepEntry::plain(ids::OPTIONAL_RULES).to_step(template_name),
    );
}
