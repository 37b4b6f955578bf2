use std::{io, thread, time::Duration};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use rand::Rng;
use tokio::sync::mpsc;
use tracing::{debug, error, info};
use verse_setup_core::{
    build_guide,
    catalog::Catalog,
    guide::{StepDetails, StoryDetails},
    models::{
        text::SpanStyle, Callout, CalloutCategory, Configuration, DetailMode, Edition,
        ExpansionId, Resource, RichText, TimerMode, MAX_PLAYERS,
    },
    resolve::{
        AllianceDetails, DraftDetails, GameLengthDetails, JobDetails, NavDetails, PrimingDetails,
        ResourceDetails,
    },
    stale_since,
    store::{self, ConfigStore},
    turn_order, ConflictSide, DraftState, Selections, StepView,
};

const TICK_RATE: Duration = Duration::from_millis(250);

#[derive(Debug, Clone)]
struct Theme {
    primary_fg: Color,
    accent: Color,
    accent_alt: Color,
    muted: Color,
    selection_bg: Color,
    success: Color,
    warning: Color,
    danger: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_fg: Color::White,
            accent: Color::Cyan,
            accent_alt: Color::Blue,
            muted: Color::DarkGray,
            selection_bg: Color::DarkGray,
            success: Color::Green,
            warning: Color::Yellow,
            danger: Color::Red,
        }
    }
}

enum AppEvent {
    Input(Event),
    Tick,
}

/// Terminal checklist over the composed setup flow.
pub struct VerseSetupApp<S: ConfigStore> {
    catalog: Catalog,
    store: S,
    config: Configuration,
    selections: Selections,
    detail_mode: DetailMode,
    guide: Vec<StepView>,
    draft: Option<DraftState>,
    /// The draft as rolled, before any winner override.
    rolled_draft: Option<DraftState>,
    draft_override: Option<usize>,
    state: UiState,
    theme: Theme,
}

impl<S: ConfigStore> VerseSetupApp<S> {
    pub fn new(catalog: Catalog, store: S, config: Configuration, detail_mode: DetailMode) -> Self {
        let mut app = Self {
            catalog,
            store,
            config: config.normalized(),
            selections: Selections::default(),
            detail_mode,
            guide: Vec::new(),
            draft: None,
            rolled_draft: None,
            draft_override: None,
            state: UiState::default(),
            theme: Theme::default(),
        };
        app.rebuild();
        app
    }

    pub async fn run(&mut self) -> Result<()> {
        self.state
            .set_status(format!("Loaded {} setup steps", self.guide.len()));

        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx);

        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.state.should_quit {
                break;
            }
            let maybe_event = event_rx.recv().await;
            if !self.process_app_event(maybe_event) {
                break;
            }
        }

        restore_terminal(&mut terminal)?;
        Ok(())
    }

    fn process_app_event(&mut self, maybe_event: Option<AppEvent>) -> bool {
        match maybe_event {
            Some(AppEvent::Input(Event::Key(key))) => {
                if let Err(err) = self.handle_key(key) {
                    error!(?err, "Key handling failed");
                    self.state.set_status(format!("Error: {err}"));
                }
                true
            }
            Some(AppEvent::Input(_)) | Some(AppEvent::Tick) => true,
            None => false,
        }
    }

    fn rebuild(&mut self) {
        self.guide = build_guide(&self.catalog, &self.config, self.selections, self.detail_mode);
        self.state.clamp_cursor(self.guide.len());
    }

    /// Apply a change to the table configuration, persist it and refresh the guide.
    fn update_config(&mut self, change: impl FnOnce(&mut Configuration)) -> Result<()> {
        let before_names = self.config.player_names.clone();
        let mut next = self.config.clone();
        change(&mut next);
        self.config = next.normalized();
        if self.config.player_names != before_names {
            self.draft = None;
            self.rolled_draft = None;
            self.draft_override = None;
        }
        store::save_configuration(&self.store, &self.config)
            .context("failed to save configuration")?;
        debug!(setup_card = %self.config.setup_card, story = ?self.config.story_card, "Configuration saved");
        self.rebuild();
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.state.should_quit = true,
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
            KeyCode::Home | KeyCode::Char('g') => self.move_cursor(isize::MIN),
            KeyCode::End | KeyCode::Char('G') => self.move_cursor(isize::MAX),
            KeyCode::PageDown => self.state.detail_scroll = self.state.detail_scroll.saturating_add(5),
            KeyCode::PageUp => self.state.detail_scroll = self.state.detail_scroll.saturating_sub(5),
            KeyCode::Char('s') => self.cycle_story(1)?,
            KeyCode::Char('S') => self.cycle_story(-1)?,
            KeyCode::Char('c') => self.cycle_setup_card(1)?,
            KeyCode::Char('C') => self.cycle_setup_card(-1)?,
            KeyCode::Char('b') => self.cycle_secondary_card()?,
            KeyCode::Char('p') => self.change_players(1)?,
            KeyCode::Char('P') => self.change_players(-1)?,
            KeyCode::Char(digit @ '1'..='8') => self.toggle_expansion(digit)?,
            KeyCode::Char('e') => {
                self.update_config(|config| {
                    config.edition = match config.edition {
                        Edition::Original => Edition::Tenth,
                        Edition::Tenth => Edition::Original,
                    };
                })?;
            }
            KeyCode::Char('d') => {
                self.detail_mode = self.detail_mode.toggled();
                self.rebuild();
                self.state
                    .set_status(format!("Detail mode: {}", detail_label(self.detail_mode)));
            }
            KeyCode::Char('m') => {
                self.update_config(|config| {
                    config.optional_rules.resolve_conflicts_manually =
                        !config.optional_rules.resolve_conflicts_manually;
                })?;
                let state = if self.config.optional_rules.resolve_conflicts_manually {
                    "on"
                } else {
                    "off"
                };
                self.state
                    .set_status(format!("Manual conflict resolution {state}"));
            }
            KeyCode::Char('y') => self.choose_credits(ConflictSide::Story),
            KeyCode::Char('t') => self.choose_credits(ConflictSide::ScenarioTemplate),
            KeyCode::Char('x') => self.toggle_challenge()?,
            KeyCode::Char('h') => self.update_config(|config| {
                config.optional_rules.high_volume_supply = !config.optional_rules.high_volume_supply;
            })?,
            KeyCode::Char('u') => self.update_config(|config| {
                config.optional_rules.optional_ship_upgrades =
                    !config.optional_rules.optional_ship_upgrades;
            })?,
            KeyCode::Char('n') => self.update_config(|config| {
                config.solo.no_sure_things = !config.solo.no_sure_things;
            })?,
            KeyCode::Char('a') => self.update_config(|config| {
                config.solo.extra_goal_push = !config.solo.extra_goal_push;
            })?,
            KeyCode::Char('T') => self.update_config(|config| {
                config.timer.mode = match config.timer.mode {
                    TimerMode::Standard => TimerMode::Unpredictable,
                    TimerMode::Unpredictable => TimerMode::Standard,
                };
            })?,
            KeyCode::Char('r') => self.roll_draft(),
            KeyCode::Char('w') => self.cycle_draft_winner(),
            _ => {}
        }
        Ok(())
    }

    fn move_cursor(&mut self, delta: isize) {
        let len = self.guide.len();
        if len == 0 {
            return;
        }
        let next = match delta {
            isize::MIN => 0,
            isize::MAX => len - 1,
            _ => (self.state.cursor as isize + delta).clamp(0, len as isize - 1) as usize,
        };
        if next != self.state.cursor {
            self.state.cursor = next;
            self.state.detail_scroll = 0;
        }
        if let Some(view) = self.guide.get(next) {
            let id = view.step.id.clone();
            self.state.stale.retain(|stale| *stale != id);
        }
    }

    fn cycle_story(&mut self, delta: isize) -> Result<()> {
        let ids: Vec<String> = self
            .catalog
            .available_stories(&self.config)
            .into_iter()
            .map(|story| story.id.clone())
            .collect();
        let Some(next) = cycle(&ids, self.config.story_card.as_deref(), delta) else {
            self.state.set_status("No stories available for these modules".to_string());
            return Ok(());
        };
        self.selections = Selections::default();
        self.update_config(|config| {
            config.story_card = Some(next.clone());
            config.challenge_options.clear();
        })?;
        info!(story = %next, "Story selected");
        self.report_stale_steps();
        Ok(())
    }

    /// Warn about steps already passed whose content the new story changes.
    fn report_stale_steps(&mut self) {
        let stale = stale_since(&self.catalog, &self.config, self.state.cursor);
        let title = self
            .catalog
            .selected_story(&self.config)
            .map(|story| story.title.clone())
            .unwrap_or_default();
        if stale.is_empty() {
            self.state.stale.clear();
            self.state.set_status(format!("Story: {title}"));
            return;
        }
        let titles: Vec<String> = stale
            .iter()
            .filter_map(|id| self.guide.iter().find(|view| view.step.id == *id))
            .map(|view| view.step.title.clone())
            .collect();
        self.state.set_status(format!(
            "Story: {title}. Earlier answers may now be wrong: {}",
            titles.join(", ")
        ));
        self.state.stale = stale;
    }

    fn cycle_setup_card(&mut self, delta: isize) -> Result<()> {
        let ids: Vec<String> = self
            .catalog
            .available_setup_cards(&self.config)
            .into_iter()
            .map(|card| card.id.clone())
            .collect();
        let Some(next) = cycle(&ids, Some(self.config.setup_card.as_str()), delta) else {
            return Ok(());
        };
        self.selections = Selections::default();
        self.update_config(|config| config.setup_card = next.clone())?;
        let label = self
            .catalog
            .setup_card(&self.config.setup_card)
            .map(|card| card.label.clone())
            .unwrap_or_default();
        self.state.set_status(format!("Setup card: {label}"));
        Ok(())
    }

    fn cycle_secondary_card(&mut self) -> Result<()> {
        let primary = self.config.setup_card.clone();
        let mut options: Vec<Option<String>> = vec![None];
        options.extend(
            self.catalog
                .available_setup_cards(&self.config)
                .into_iter()
                .filter(|card| card.id != primary)
                .map(|card| Some(card.id.clone())),
        );
        let current = options
            .iter()
            .position(|option| *option == self.config.secondary_setup_card)
            .unwrap_or(0);
        let next = options[(current + 1) % options.len()].clone();
        self.selections = Selections::default();
        self.update_config(|config| config.secondary_setup_card = next)?;
        let label = self
            .config
            .secondary_setup_card
            .as_deref()
            .and_then(|id| self.catalog.setup_card(id))
            .map(|card| card.label.clone())
            .unwrap_or_else(|| "none".to_string());
        self.state.set_status(format!("Paired setup card: {label}"));
        Ok(())
    }

    fn change_players(&mut self, delta: isize) -> Result<()> {
        let next = (self.config.player_count as isize + delta).clamp(1, MAX_PLAYERS as isize) as usize;
        self.update_config(|config| config.player_count = next)?;
        self.state
            .set_status(format!("{} player(s)", self.config.player_count));
        Ok(())
    }

    fn toggle_expansion(&mut self, digit: char) -> Result<()> {
        let Some(index) = digit.to_digit(10).map(|value| value as usize) else {
            return Ok(());
        };
        let Some(id) = ExpansionId::ALL.get(index.saturating_sub(1)).copied() else {
            return Ok(());
        };
        let active = !self.config.expansions.is_active(id);
        self.update_config(|config| config.expansions.set(id, active))?;
        let state = if active { "on" } else { "off" };
        self.state.set_status(format!("{}: {state}", id.label()));
        Ok(())
    }

    fn toggle_challenge(&mut self) -> Result<()> {
        let Some(story) = self.catalog.selected_story(&self.config) else {
            return Ok(());
        };
        let Some(challenge) = story.challenges.first() else {
            self.state
                .set_status(format!("{} has no challenge options", story.title));
            return Ok(());
        };
        let (id, label) = (challenge.id.clone(), challenge.label.clone());
        let enabled = !self.config.challenge_enabled(&id);
        self.update_config(|config| {
            config.challenge_options.insert(id, enabled);
        })?;
        let state = if enabled { "on" } else { "off" };
        self.state.set_status(format!("Challenge {label}: {state}"));
        Ok(())
    }

    fn choose_credits(&mut self, side: ConflictSide) {
        if !self.config.optional_rules.resolve_conflicts_manually {
            self.state
                .set_status("Enable manual conflict resolution (m) first".to_string());
            return;
        }
        self.selections.credits = Some(side);
        self.rebuild();
        let label = match side {
            ConflictSide::Story => "story",
            ConflictSide::ScenarioTemplate => "setup card",
        };
        self.state
            .set_status(format!("Starting credits follow the {label}"));
    }

    fn roll_draft(&mut self) {
        self.roll_draft_with(&mut rand::thread_rng());
    }

    fn roll_draft_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let draft = if self.config.is_solo() {
            let name = self.config.player_names.first().cloned().unwrap_or_default();
            turn_order::solo(&name)
        } else {
            turn_order::run_automated(&self.config.player_names, rng)
        };
        if let Some(winner) = draft.winner() {
            info!(winner = %winner.player, "Draft rolled");
            self.state
                .set_status(format!("{} drafts first", winner.player));
        }
        self.draft_override = None;
        self.rolled_draft = Some(draft.clone());
        self.draft = Some(draft);
    }

    fn cycle_draft_winner(&mut self) {
        let Some(rolled) = self.rolled_draft.as_ref() else {
            self.state.set_status("Roll the draft first (r)".to_string());
            return;
        };
        let count = rolled.rolls.len();
        let next = match self.draft_override {
            None => Some(0),
            Some(index) if index + 1 < count => Some(index + 1),
            Some(_) => None,
        };
        // Back to no override restores the rolled result, tie re-rolls included.
        let updated = match next {
            Some(_) => turn_order::resolve(&rolled.rolls, count, next),
            None => rolled.clone(),
        };
        if let Some(winner) = updated.winner() {
            let note = if next.is_some() { "override" } else { "highest roll" };
            self.state
                .set_status(format!("{} drafts first ({note})", winner.player));
        }
        self.draft_override = next;
        self.draft = Some(updated);
    }

    fn draw(&mut self, frame: &mut Frame) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(5),
                Constraint::Length(4),
            ])
            .split(frame.size());
        self.render_header(frame, layout[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(32), Constraint::Percentage(68)])
            .split(layout[1]);
        self.render_step_list(frame, body[0]);
        self.render_step_details(frame, body[1]);
        self.render_status(frame, layout[2]);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let card = self
            .catalog
            .setup_card(&self.config.setup_card)
            .unwrap_or_else(|| self.catalog.standard());
        let mut card_line = vec![
            Span::styled("Setup card: ", Style::default().fg(self.theme.muted)),
            Span::styled(
                card.label.clone(),
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
        ];
        if let Some(secondary) = self
            .config
            .secondary_setup_card
            .as_deref()
            .and_then(|id| self.catalog.setup_card(id))
        {
            card_line.push(Span::styled(
                format!(" + {}", secondary.label),
                Style::default().fg(self.theme.accent_alt),
            ));
        }
        let story = self
            .catalog
            .selected_story(&self.config)
            .map(|story| story.title.clone())
            .unwrap_or_else(|| "none".to_string());
        card_line.push(Span::styled("   Story: ", Style::default().fg(self.theme.muted)));
        card_line.push(Span::styled(
            story,
            Style::default().add_modifier(Modifier::BOLD),
        ));
        card_line.push(Span::styled(
            format!("   Players: {}", self.config.player_count),
            Style::default().fg(self.theme.primary_fg),
        ));

        let modules: Vec<Span> = ExpansionId::ALL
            .iter()
            .enumerate()
            .map(|(index, id)| {
                let style = if self.config.expansions.is_active(*id) {
                    Style::default().fg(self.theme.success)
                } else {
                    Style::default().fg(self.theme.muted)
                };
                Span::styled(format!("{}:{} ", index + 1, id.label()), style)
            })
            .collect();

        let paragraph = Paragraph::new(vec![Line::from(card_line), Line::from(modules)])
            .block(Block::default().borders(Borders::ALL).title("Verse Setup"))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_step_list(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .guide
            .iter()
            .enumerate()
            .map(|(index, view)| {
                let marker = if index == self.state.cursor {
                    Span::styled(
                        "▶ ",
                        Style::default()
                            .fg(self.theme.accent)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::raw("  ")
                };
                let mut line = vec![
                    marker,
                    Span::styled(
                        format!("{}. {}", index + 1, view.step.title),
                        Style::default().fg(self.theme.primary_fg),
                    ),
                ];
                if self.state.stale.contains(&view.step.id) {
                    line.push(Span::styled(
                        " !",
                        Style::default()
                            .fg(self.theme.warning)
                            .add_modifier(Modifier::BOLD),
                    ));
                }
                ListItem::new(Line::from(line))
            })
            .collect();

        let mut list_state = ListState::default();
        if !self.guide.is_empty() {
            list_state.select(Some(self.state.cursor));
        }
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Steps"))
            .highlight_style(Style::default().bg(self.theme.selection_bg));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn render_step_details(&self, frame: &mut Frame, area: Rect) {
        let Some(view) = self.guide.get(self.state.cursor) else {
            let paragraph = Paragraph::new("No steps")
                .block(Block::default().borders(Borders::ALL).title("Details"));
            frame.render_widget(paragraph, area);
            return;
        };

        let mut lines = vec![Line::from(Span::styled(
            format!("From: {}", view.step.template_name),
            Style::default().fg(self.theme.muted),
        ))];
        if let Some(citation) = &view.step.citation {
            lines.push(Line::from(Span::styled(
                format!("See {}, p. {}", citation.manual, citation.page),
                Style::default().fg(self.theme.muted),
            )));
        }
        lines.push(Line::default());
        lines.extend(self.detail_lines(&view.details));

        if !view.callouts.is_empty() {
            lines.push(Line::default());
            for callout in &view.callouts {
                lines.extend(self.callout_lines(callout));
            }
        }

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(view.step.title.clone()),
            )
            .wrap(Wrap { trim: false })
            .scroll((self.state.detail_scroll, 0));
        frame.render_widget(paragraph, area);
    }

    fn detail_lines(&self, details: &StepDetails) -> Vec<Line<'static>> {
        match details {
            StepDetails::Story(story) => self.story_lines(story),
            StepDetails::GameLength(details) => game_length_lines(details),
            StepDetails::Nav(details) => nav_lines(details),
            StepDetails::Alliance(details) => alliance_lines(details),
            StepDetails::Draft(details) => self.draft_lines(details),
            StepDetails::Resources(details) => self.resource_lines(details),
            StepDetails::Jobs(details) => job_lines(details),
            StepDetails::Priming(details) => priming_lines(details),
            StepDetails::OptionalRules(details) => details
                .enabled
                .iter()
                .map(|label| Line::from(format!("• {label}")))
                .collect(),
            StepDetails::Plain => vec![Line::from("Flip the first Nav card and begin play.")],
        }
    }

    fn story_lines(&self, story: &StoryDetails) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        if !story.title.is_empty() {
            lines.push(Line::from(Span::styled(
                story.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )));
        }
        if !story.summary.is_empty() {
            lines.push(Line::from(story.summary.clone()));
        }
        if !story.requirements.is_empty() {
            lines.push(Line::from(format!(
                "Requires: {}",
                story.requirements.join(", ")
            )));
        }
        for challenge in &story.challenges {
            let mark = if challenge.enabled { "[x]" } else { "[ ]" };
            lines.push(Line::from(format!("{mark} Challenge: {}", challenge.label)));
        }
        lines
    }

    fn draft_lines(&self, details: &DraftDetails) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        if details.skip_draft {
            lines.push(Line::from("No draft: take your leader and ship."));
        }
        lines.push(Line::from(format!(
            "Leader placement: {}",
            details.leader_placement
        )));
        if details.haven_placement {
            lines.push(Line::from("Place your Haven before your ship."));
        }
        if details.skip_draft && !self.config.is_solo() {
            return lines;
        }
        match &self.draft {
            Some(draft) => {
                lines.push(Line::default());
                for roll in &draft.rolls {
                    let style = if roll.winner {
                        Style::default()
                            .fg(self.theme.success)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(self.theme.primary_fg)
                    };
                    lines.push(Line::from(Span::styled(
                        format!("{}: {}", roll.player, roll.value),
                        style,
                    )));
                }
                lines.push(Line::from(format!(
                    "Draft order: {}",
                    draft.draft_order.join(" → ")
                )));
                lines.push(Line::from(format!(
                    "Placement order: {}",
                    draft.placement_order.join(" → ")
                )));
            }
            None => lines.push(Line::from(Span::styled(
                "Press r to roll for the draft.",
                Style::default().fg(self.theme.muted),
            ))),
        }
        lines
    }

    fn resource_lines(&self, details: &ResourceDetails) -> Vec<Line<'static>> {
        let mut credits = format!("Credits: ${}", details.credits);
        if let Some(source) = &details.credits_source {
            credits.push_str(&format!(" (from {})", source.source_name));
        }
        let mut lines = vec![Line::from(credits)];
        for resource in [Resource::Fuel, Resource::Parts, Resource::Warrants] {
            let amount = details.amount(resource);
            if details.disabled.contains(&resource) {
                lines.push(Line::from(Span::styled(
                    format!("{}: none", resource.label()),
                    Style::default().fg(self.theme.danger),
                )));
            } else if amount > 0 || resource != Resource::Warrants {
                lines.push(Line::from(format!("{}: {amount}", resource.label())));
            }
        }
        for stack in &details.token_stacks {
            lines.push(Line::from(format!(
                "{} tokens: {} each ({} total)",
                stack.token, stack.per_player, stack.count
            )));
        }
        if let Some(conflict) = &details.conflict {
            lines.push(Line::from(Span::styled(
                format!(
                    "Conflict: {} says ${}, {} says ${}. Press y or t to choose once manual resolution is on.",
                    conflict.story.source_name,
                    conflict.story.value,
                    conflict.template.source_name,
                    conflict.template.value
                ),
                Style::default().fg(self.theme.warning),
            )));
        }
        lines
    }

    fn callout_lines(&self, callout: &Callout) -> Vec<Line<'static>> {
        let (label, color) = match callout.category {
            CalloutCategory::Module => ("Module", self.theme.accent_alt),
            CalloutCategory::ScenarioTemplate => ("Setup Card", self.theme.accent),
            CalloutCategory::Story => ("Story", self.theme.success),
            CalloutCategory::Warning => ("Warning", self.theme.warning),
            CalloutCategory::Info => ("Info", self.theme.muted),
        };
        vec![
            Line::from(vec![
                Span::styled(
                    format!("[{label}] "),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    callout.title.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]),
            rich_line(&callout.content),
            Line::default(),
        ]
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let help = "j/k move  s/S story  c/C card  b pair  p/P players  1-8 modules  x challenge  d detail  m manual  y/t credits  r roll  w winner  q quit";
        let paragraph = Paragraph::new(vec![
            Line::from(self.state.status.clone()),
            Line::from(Span::styled(help, Style::default().fg(self.theme.muted))),
        ])
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}

fn game_length_lines(details: &GameLengthDetails) -> Vec<Line<'static>> {
    let timer = match details.timer {
        TimerMode::Standard => "standard",
        TimerMode::Unpredictable => "unpredictable",
    };
    vec![Line::from(format!(
        "Game length: {} tokens ({timer} timer)",
        details.tokens
    ))]
}

fn nav_lines(details: &NavDetails) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(format!("Nav decks: {}", details.mode.label()))];
    if !details.included_modules.is_empty() {
        let labels: Vec<&str> = details.included_modules.iter().map(|id| id.label()).collect();
        lines.push(Line::from(format!("Including: {}", labels.join(", "))));
    }
    lines
}

fn alliance_lines(details: &AllianceDetails) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(format!("Alliance Cruiser: {}", details.cruiser))];
    for (index, location) in details.reavers.iter().enumerate() {
        lines.push(Line::from(format!("Reaver Cutter {}: {location}", index + 1)));
    }
    if details.alert_tokens {
        lines.push(Line::from("Place Alliance Alert tokens."));
    }
    lines
}

fn job_lines(details: &JobDetails) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(format!("Starting jobs: {}", details.mode.label()))];
    if !details.contacts.is_empty() {
        let labels: Vec<&str> = details.contacts.iter().map(|contact| contact.label()).collect();
        lines.push(Line::from(format!("Draw from: {}", labels.join(", "))));
    }
    if !details.forbidden.is_empty() {
        let labels: Vec<&str> = details.forbidden.iter().map(|contact| contact.label()).collect();
        lines.push(Line::from(format!("Not available: {}", labels.join(", "))));
    }
    lines
}

fn priming_lines(details: &PrimingDetails) -> Vec<Line<'static>> {
    let mut formula = format!("{}", details.base);
    if details.multiplier != 1 {
        formula.push_str(&format!(" × {}", details.multiplier));
    }
    if details.bonus > 0 {
        formula.push_str(&format!(" + {}", details.bonus));
    }
    vec![Line::from(format!(
        "Discard {} cards from each supply deck ({formula})",
        details.discard_count
    ))]
}

fn rich_line(text: &RichText) -> Line<'static> {
    let spans: Vec<Span<'static>> = text
        .spans()
        .iter()
        .map(|span| {
            let style = match span.style {
                SpanStyle::Plain => Style::default(),
                SpanStyle::Strong => Style::default().add_modifier(Modifier::BOLD),
                SpanStyle::Emphasis => Style::default().add_modifier(Modifier::ITALIC),
            };
            Span::styled(span.text.clone(), style)
        })
        .collect();
    Line::from(spans)
}

fn detail_label(mode: DetailMode) -> &'static str {
    match mode {
        DetailMode::Concise => "concise",
        DetailMode::Detailed => "detailed",
    }
}

/// Next id after `current` in `ids`, wrapping. Starts at the first id when `current` is absent.
fn cycle(ids: &[String], current: Option<&str>, delta: isize) -> Option<String> {
    if ids.is_empty() {
        return None;
    }
    let len = ids.len() as isize;
    let next = match current.and_then(|current| ids.iter().position(|id| id == current)) {
        Some(index) => (index as isize + delta).rem_euclid(len),
        None => 0,
    };
    ids.get(next as usize).cloned()
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}

struct UiState {
    cursor: usize,
    detail_scroll: u16,
    status: String,
    /// Steps the last story change may have invalidated.
    stale: Vec<String>,
    should_quit: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            cursor: 0,
            detail_scroll: 0,
            status: "Ready".to_string(),
            stale: Vec::new(),
            should_quit: false,
        }
    }
}

impl UiState {
    fn set_status(&mut self, message: String) {
        self.status = message;
    }

    fn clamp_cursor(&mut self, len: usize) {
        if len == 0 {
            self.cursor = 0;
        } else if self.cursor >= len {
            self.cursor = len - 1;
        }
    }
}
