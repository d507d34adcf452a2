use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use std::time::Instant;

use crate::catalog::{self, CatalogSource, Category, DemoCatalog, MovieRow};
use crate::config::AppConfig;
use crate::family::invite::{
    ContactMethod, DemoCodeIssuer, InvitationFlow, InviteError, InviteEvent, InviteStep,
    Relationship,
};
use crate::family::share::ShareChannel;
use crate::family::{Roster, RosterError};
use crate::notify::{DesktopNotifier, Notifier, Toast, ToastKind};
use crate::player::Playback;
use crate::profiles::{self, ViewerProfile, WatchLog};

/// Toast lifetime in seconds before the info line clears itself
const TOAST_SECONDS: u64 = 3;

pub const ONBOARDING_SLIDES: [(&str, &str); 3] = [
    (
        "Family plan",
        "Share the subscription with the people close to you and save up to 60% on movies and series",
    ),
    (
        "One payment",
        "The owner pays once for the whole family, renewed automatically every month",
    ),
    (
        "Up to 5 members",
        "Add up to five relatives; everyone gets personal recommendations and their own watch history",
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Onboarding,
    Profiles,
    Dashboard,
    Player,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Catalog,
    Family,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    Invite,
    Share,
    ConfirmRemove,
    Help,
}

// Focus slots inside the invitation popup's contact form
pub const INVITE_FIELD_NAME: usize = 0;
pub const INVITE_FIELD_CONTACT: usize = 1;
pub const INVITE_FIELD_RELATION: usize = 2;
pub const INVITE_FIELD_BUTTONS: usize = 3;

pub struct App {
    pub screen: Screen,
    pub tab: Tab,
    pub popup: Popup,

    // Onboarding slides
    pub onboarding_step: usize,

    // Profile picker
    pub profiles: Vec<ViewerProfile>,
    pub selected_profile: usize,
    pub active_profile: Option<u64>,

    // Catalog browsing
    catalog: Box<dyn CatalogSource>,
    pub search_query: String,
    pub search_active: bool,
    pub category: Category,
    pub selected_row: usize,
    pub selected_movie: usize,

    // Family roster
    pub roster: Roster,
    pub selected_member: usize,
    pub member_to_remove: Option<u64>,

    // Invitation wizard
    pub invite: Option<InvitationFlow>,
    pub invite_focus: usize,
    pub invite_button: usize,
    pub invite_method_cursor: usize,
    code_issuer: DemoCodeIssuer,

    // Share dialog
    pub share_cursor: usize,

    // Simulated playback
    pub playback: Option<Playback>,
    pub watch_log: WatchLog,

    // Toast (shown in the info line, auto-clears after timeout)
    pub toast: Option<Toast>,
    toast_time: Option<Instant>,
    notifier: DesktopNotifier,

    pub config: AppConfig,
}

impl App {
    pub fn new(config: AppConfig, skip_onboarding: bool) -> Self {
        let today = chrono::Local::now().date_naive();
        let roster = Roster::demo(today);
        let profiles = profiles::from_roster(roster.members());
        let owner_id = roster.members().first().map(|m| m.id).unwrap_or(1);
        let watch_log = WatchLog::demo(owner_id);

        let selected_profile = config
            .last_profile
            .as_deref()
            .and_then(|name| profiles.iter().position(|p| p.name == name))
            .unwrap_or(0);

        let screen = if config.onboarding_done || skip_onboarding {
            Screen::Profiles
        } else {
            Screen::Onboarding
        };

        let notifier = DesktopNotifier {
            enabled: config.desktop_notifications,
        };

        Self {
            screen,
            tab: Tab::Catalog,
            popup: Popup::None,

            onboarding_step: 0,

            profiles,
            selected_profile,
            active_profile: None,

            catalog: Box::new(DemoCatalog),
            search_query: String::new(),
            search_active: false,
            category: Category::All,
            selected_row: 0,
            selected_movie: 0,

            roster,
            selected_member: 0,
            member_to_remove: None,

            invite: None,
            invite_focus: 0,
            invite_button: 0,
            invite_method_cursor: 0,
            code_issuer: DemoCodeIssuer,

            share_cursor: 0,

            playback: None,
            watch_log,

            toast: None,
            toast_time: None,
            notifier,

            config,
        }
    }

    /// True while 'q' should not quit the app (text entry, player, popups).
    pub fn allows_quick_quit(&self) -> bool {
        self.popup == Popup::None && self.screen != Screen::Player && !self.search_active
    }

    pub fn select_profile_by_name(&mut self, name: &str) {
        if let Some(idx) = self
            .profiles
            .iter()
            .position(|p| p.name.eq_ignore_ascii_case(name))
        {
            self.selected_profile = idx;
        }
    }

    pub fn report_error(&mut self, err: anyhow::Error) {
        self.push_toast(Toast::error("Error", err.to_string()));
    }

    /// The catalog rows after search and category filtering.
    pub fn visible_rows(&self) -> Vec<MovieRow> {
        self.catalog
            .rows()
            .iter()
            .map(|row| catalog::filter_row(row, &self.search_query, self.category))
            .collect()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.popup != Popup::None {
            return self.handle_popup_key(key);
        }

        match self.screen {
            Screen::Onboarding => self.handle_onboarding_key(key),
            Screen::Profiles => self.handle_profiles_key(key),
            Screen::Dashboard => self.handle_dashboard_key(key),
            Screen::Player => self.handle_player_key(key),
        }
        Ok(())
    }

    pub fn tick(&mut self) {
        // Clear the toast after its display window
        if let Some(time) = self.toast_time {
            if time.elapsed().as_secs() >= TOAST_SECONDS {
                self.toast = None;
                self.toast_time = None;
            }
        }

        if let Some(pb) = self.playback.as_mut() {
            pb.tick();
        }
    }

    fn push_toast(&mut self, toast: Toast) {
        if toast.kind == ToastKind::Success {
            self.notifier.notify(&toast);
        }
        self.toast = Some(toast);
        self.toast_time = Some(Instant::now());
    }

    // ---- onboarding ----

    fn handle_onboarding_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Right | KeyCode::Char(' ') | KeyCode::Char('l') => {
                if self.onboarding_step + 1 < ONBOARDING_SLIDES.len() {
                    self.onboarding_step += 1;
                } else {
                    self.finish_onboarding();
                }
            }
            KeyCode::Char('s') | KeyCode::Esc => self.finish_onboarding(),
            _ => {}
        }
    }

    fn finish_onboarding(&mut self) {
        self.config.onboarding_done = true;
        if let Err(e) = self.config.save() {
            tracing::warn!("failed to save config: {}", e);
        }
        self.screen = Screen::Profiles;
    }

    // ---- profile picker ----

    fn handle_profiles_key(&mut self, key: KeyEvent) {
        let count = self.profiles.len();
        match key.code {
            KeyCode::Left | KeyCode::Up | KeyCode::Char('h') | KeyCode::Char('k') => {
                if count > 0 {
                    self.selected_profile =
                        self.selected_profile.checked_sub(1).unwrap_or(count - 1);
                }
            }
            KeyCode::Right | KeyCode::Down | KeyCode::Char('l') | KeyCode::Char('j') => {
                if count > 0 {
                    self.selected_profile = (self.selected_profile + 1) % count;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.choose_profile(),
            _ => {}
        }
    }

    fn choose_profile(&mut self) {
        if let Some(profile) = self.profiles.get(self.selected_profile) {
            self.active_profile = Some(profile.id);
            self.config.last_profile = Some(profile.name.clone());
            if let Err(e) = self.config.save() {
                tracing::warn!("failed to save config: {}", e);
            }
            self.screen = Screen::Dashboard;
        }
    }

    fn refresh_profiles(&mut self) {
        self.profiles = profiles::from_roster(self.roster.members());
        if self.selected_profile >= self.profiles.len() && !self.profiles.is_empty() {
            self.selected_profile = self.profiles.len() - 1;
        }
        // Fall back to the owner if the active profile's member is gone
        if let Some(active) = self.active_profile {
            if !self.profiles.iter().any(|p| p.id == active) {
                self.active_profile = self.profiles.first().map(|p| p.id);
            }
        }
    }

    // ---- dashboard ----

    fn handle_dashboard_key(&mut self, key: KeyEvent) {
        if self.search_active {
            self.handle_search_key(key);
            return;
        }

        match key.code {
            KeyCode::Tab | KeyCode::BackTab => {
                self.tab = match self.tab {
                    Tab::Catalog => Tab::Family,
                    Tab::Family => Tab::Catalog,
                };
            }
            KeyCode::Char('?') => self.popup = Popup::Help,
            KeyCode::Char('p') => self.screen = Screen::Profiles,
            _ => match self.tab {
                Tab::Catalog => self.handle_catalog_key(key),
                Tab::Family => self.handle_family_key(key),
            },
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => self.search_active = false,
            KeyCode::Backspace => {
                self.search_query.pop();
            }
            KeyCode::Char(c) => self.search_query.push(c),
            _ => {}
        }
        self.clamp_catalog_selection();
    }

    fn handle_catalog_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('/') => self.search_active = true,
            KeyCode::Char('c') => {
                self.category = self.category.next();
                self.clamp_catalog_selection();
            }
            KeyCode::Char('j') | KeyCode::Down => {
                let rows = self.visible_rows();
                if !rows.is_empty() {
                    self.selected_row = (self.selected_row + 1) % rows.len();
                }
                self.clamp_catalog_selection();
            }
            KeyCode::Char('k') | KeyCode::Up => {
                let rows = self.visible_rows();
                if !rows.is_empty() {
                    self.selected_row =
                        self.selected_row.checked_sub(1).unwrap_or(rows.len() - 1);
                }
                self.clamp_catalog_selection();
            }
            KeyCode::Char('h') | KeyCode::Left => {
                self.selected_movie = self.selected_movie.saturating_sub(1);
            }
            KeyCode::Char('l') | KeyCode::Right => {
                self.selected_movie += 1;
                self.clamp_catalog_selection();
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.play_selected(),
            _ => {}
        }
    }

    fn clamp_catalog_selection(&mut self) {
        let rows = self.visible_rows();
        if rows.is_empty() {
            self.selected_row = 0;
            self.selected_movie = 0;
            return;
        }
        self.selected_row = self.selected_row.min(rows.len() - 1);
        let len = rows[self.selected_row].movies.len();
        self.selected_movie = match len {
            0 => 0,
            n => self.selected_movie.min(n - 1),
        };
    }

    fn play_selected(&mut self) {
        let rows = self.visible_rows();
        let Some(movie) = rows
            .get(self.selected_row)
            .and_then(|row| row.movies.get(self.selected_movie))
        else {
            return;
        };
        self.playback = Some(Playback::start(&movie.title, self.config.volume));
        self.screen = Screen::Player;
    }

    // ---- family tab ----

    fn handle_family_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if !self.roster.is_empty() {
                    self.selected_member = (self.selected_member + 1) % self.roster.len();
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if !self.roster.is_empty() {
                    self.selected_member = self
                        .selected_member
                        .checked_sub(1)
                        .unwrap_or(self.roster.len() - 1);
                }
            }
            KeyCode::Char('i') | KeyCode::Char('a') => self.open_invite(),
            KeyCode::Char('s') => {
                self.share_cursor = 0;
                self.popup = Popup::Share;
            }
            KeyCode::Char('d') | KeyCode::Delete => self.request_remove_member(),
            _ => {}
        }
    }

    fn open_invite(&mut self) {
        if self.roster.is_full() {
            self.push_toast(Toast::error(
                "Family is full",
                RosterError::Full.to_string(),
            ));
            return;
        }
        self.invite = Some(InvitationFlow::new());
        self.invite_focus = 0;
        self.invite_button = 0;
        self.invite_method_cursor = 0;
        self.popup = Popup::Invite;
    }

    fn request_remove_member(&mut self) {
        let Some(member) = self.roster.members().get(self.selected_member) else {
            return;
        };
        if member.is_owner {
            self.push_toast(Toast::error("Cannot remove", RosterError::Owner.to_string()));
            return;
        }
        self.member_to_remove = Some(member.id);
        self.popup = Popup::ConfirmRemove;
    }

    fn confirm_remove_member(&mut self) {
        if let Some(id) = self.member_to_remove.take() {
            match self.roster.remove(id) {
                Ok(member) => {
                    self.refresh_profiles();
                    if self.selected_member >= self.roster.len() && !self.roster.is_empty() {
                        self.selected_member = self.roster.len() - 1;
                    }
                    self.push_toast(Toast::success(
                        "Member removed",
                        format!("{} no longer has access to the plan", member.name),
                    ));
                }
                Err(e) => self.push_toast(Toast::error("Could not remove", e.to_string())),
            }
        }
        self.popup = Popup::None;
    }

    // ---- popups ----

    fn handle_popup_key(&mut self, key: KeyEvent) -> Result<()> {
        match self.popup {
            Popup::Invite => self.handle_invite_key(key),
            Popup::Share => self.handle_share_key(key),
            Popup::ConfirmRemove => {
                match key.code {
                    KeyCode::Char('y') | KeyCode::Enter => self.confirm_remove_member(),
                    KeyCode::Char('n') | KeyCode::Esc => {
                        self.member_to_remove = None;
                        self.popup = Popup::None;
                    }
                    _ => {}
                }
            }
            Popup::Help => {
                if matches!(
                    key.code,
                    KeyCode::Esc | KeyCode::Char('?') | KeyCode::Enter | KeyCode::Char('q')
                ) {
                    self.popup = Popup::None;
                }
            }
            Popup::None => {}
        }
        Ok(())
    }

    fn handle_share_key(&mut self, key: KeyEvent) {
        let count = ShareChannel::ALL.len();
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.popup = Popup::None,
            KeyCode::Char('j') | KeyCode::Down => {
                self.share_cursor = (self.share_cursor + 1) % count;
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.share_cursor = self.share_cursor.checked_sub(1).unwrap_or(count - 1);
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                let channel = ShareChannel::ALL[self.share_cursor];
                // the demo stops at building the link; a real client would
                // hand it to the system opener here
                tracing::info!("share link requested: {}", channel.url());
                self.push_toast(Toast::info(
                    format!("{} link ready", channel.label()),
                    channel.url(),
                ));
            }
            _ => {}
        }
    }

    // ---- invitation wizard ----

    fn handle_invite_key(&mut self, key: KeyEvent) {
        let (step, code_sent) = match self.invite.as_ref() {
            Some(flow) => (flow.step, flow.code_sent),
            None => {
                self.popup = Popup::None;
                return;
            }
        };
        match (step, code_sent) {
            (InviteStep::Method, _) => self.handle_invite_method_key(key),
            (InviteStep::Contact, false) => self.handle_invite_contact_key(key),
            (InviteStep::Contact, true) => self.handle_invite_code_key(key),
        }
    }

    fn handle_invite_method_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.cancel_invite(),
            KeyCode::Up | KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('k') => {
                self.invite_method_cursor ^= 1;
            }
            KeyCode::Char(' ') => {
                let method = if self.invite_method_cursor == 0 {
                    ContactMethod::Email
                } else {
                    ContactMethod::Phone
                };
                if let Some(flow) = self.invite.as_mut() {
                    flow.select_method(method);
                }
            }
            KeyCode::Enter => {
                let result = match self.invite.as_mut() {
                    Some(flow) => flow.next_from_method(),
                    None => return,
                };
                match result {
                    Ok(()) => {
                        self.invite_focus = INVITE_FIELD_NAME;
                        self.invite_button = 0;
                    }
                    Err(e) => self.push_toast(invite_error_toast(&e)),
                }
            }
            _ => {}
        }
    }

    fn handle_invite_contact_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.cancel_invite(),
            KeyCode::Tab => self.invite_focus = (self.invite_focus + 1) % 4,
            KeyCode::BackTab => self.invite_focus = (self.invite_focus + 3) % 4,
            KeyCode::Enter => {
                if self.invite_focus == INVITE_FIELD_BUTTONS {
                    if self.invite_button == 0 {
                        self.send_invite_code();
                    } else {
                        self.invite_back_to_method();
                    }
                } else {
                    self.invite_focus += 1;
                }
            }
            KeyCode::Left | KeyCode::Right => match self.invite_focus {
                INVITE_FIELD_RELATION => {
                    if let Some(flow) = self.invite.as_mut() {
                        cycle_relationship(flow, key.code == KeyCode::Right);
                    }
                }
                INVITE_FIELD_BUTTONS => self.invite_button ^= 1,
                _ => {}
            },
            KeyCode::Backspace => {
                if let Some(flow) = self.invite.as_mut() {
                    match self.invite_focus {
                        INVITE_FIELD_NAME => {
                            flow.member_name.pop();
                        }
                        INVITE_FIELD_CONTACT => {
                            flow.contact.pop();
                        }
                        _ => {}
                    }
                }
            }
            KeyCode::Char(c) => {
                if let Some(flow) = self.invite.as_mut() {
                    match self.invite_focus {
                        INVITE_FIELD_NAME => flow.member_name.push(c),
                        INVITE_FIELD_CONTACT => flow.contact.push(c),
                        INVITE_FIELD_RELATION if c == ' ' => cycle_relationship(flow, true),
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_invite_code_key(&mut self, key: KeyEvent) {
        match key.code {
            // Esc reopens the form instead of cancelling once a code is out
            KeyCode::Esc => self.resend_invite_code(),
            KeyCode::Tab | KeyCode::BackTab => self.invite_focus = (self.invite_focus + 1) % 2,
            KeyCode::Left | KeyCode::Right => {
                if self.invite_focus == 1 {
                    self.invite_button ^= 1;
                }
            }
            KeyCode::Backspace => {
                if let Some(flow) = self.invite.as_mut() {
                    flow.pop_code_digit();
                }
            }
            KeyCode::Char(c) => {
                if self.invite_focus == 0 {
                    if let Some(flow) = self.invite.as_mut() {
                        flow.push_code_digit(c);
                    }
                }
            }
            KeyCode::Enter => {
                if self.invite_focus == 1 && self.invite_button == 1 {
                    self.resend_invite_code();
                } else {
                    self.verify_invite();
                }
            }
            _ => {}
        }
    }

    fn invite_back_to_method(&mut self) {
        if let Some(flow) = self.invite.as_mut() {
            flow.back_to_method();
            self.invite_method_cursor = match flow.method {
                Some(ContactMethod::Phone) => 1,
                _ => 0,
            };
        }
    }

    fn cancel_invite(&mut self) {
        let cancelled = self
            .invite
            .as_mut()
            .and_then(InvitationFlow::cancel)
            .is_some();
        if cancelled {
            self.invite = None;
            self.popup = Popup::None;
        }
    }

    fn send_invite_code(&mut self) {
        let Some(flow) = self.invite.as_mut() else {
            return;
        };
        match flow.send_code(&mut self.code_issuer) {
            Ok(InviteEvent::CodeDispatched { contact, method }) => {
                self.invite_focus = 0;
                self.invite_button = 0;
                self.push_toast(Toast::info(
                    "Code sent",
                    format!("Check your {} at {contact}", method.inbox_hint()),
                ));
            }
            Ok(_) => {}
            Err(e) => self.push_toast(invite_error_toast(&e)),
        }
    }

    fn resend_invite_code(&mut self) {
        if let Some(flow) = self.invite.as_mut() {
            flow.resend();
        }
        self.invite_focus = INVITE_FIELD_NAME;
        self.invite_button = 0;
    }

    fn verify_invite(&mut self) {
        let Some(flow) = self.invite.as_mut() else {
            return;
        };
        match flow.verify() {
            Ok(InviteEvent::Completed {
                contact,
                method,
                name,
                relationship,
            }) => {
                self.invite = None;
                self.popup = Popup::None;
                self.complete_invitation(contact, method, name, relationship);
            }
            Ok(_) => {}
            Err(e) => self.push_toast(invite_error_toast(&e)),
        }
    }

    /// The roster re-checks capacity here; the wizard may have been open
    /// while the family filled up.
    fn complete_invitation(
        &mut self,
        contact: String,
        method: ContactMethod,
        name: String,
        relationship: Relationship,
    ) {
        let today = chrono::Local::now().date_naive();
        match self
            .roster
            .add(&name, &contact, method, Some(relationship), today)
        {
            Ok(_) => {
                self.refresh_profiles();
                self.push_toast(Toast::success(
                    "Member added",
                    format!("{name} confirmed and joined the family"),
                ));
            }
            Err(e) => self.push_toast(Toast::error("Could not add member", e.to_string())),
        }
    }

    // ---- player ----

    fn handle_player_key(&mut self, key: KeyEvent) {
        let Some(pb) = self.playback.as_mut() else {
            self.screen = Screen::Dashboard;
            return;
        };
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.close_player(),
            KeyCode::Char(' ') => pb.toggle_play(),
            KeyCode::Left => pb.skip_back(),
            KeyCode::Right => pb.skip_forward(),
            KeyCode::Char('+') | KeyCode::Char('=') => pb.adjust_volume(true),
            KeyCode::Char('-') => pb.adjust_volume(false),
            KeyCode::Char('f') => pb.toggle_fullscreen(),
            _ => pb.poke_controls(),
        }
    }

    fn close_player(&mut self) {
        if let Some(pb) = self.playback.take() {
            self.config.volume = pb.volume;
            if let Err(e) = self.config.save() {
                tracing::warn!("failed to save config: {}", e);
            }
            if let Some(profile) = self.active_profile {
                self.watch_log
                    .record(profile, &pb.title, "Feature film", pb.progress_percent());
            }
        }
        self.screen = Screen::Dashboard;
    }
}

fn cycle_relationship(flow: &mut InvitationFlow, forward: bool) {
    let len = Relationship::ALL.len();
    let idx = flow
        .relationship
        .and_then(|r| Relationship::ALL.iter().position(|x| *x == r));
    let next = match (idx, forward) {
        (None, _) => 0,
        (Some(i), true) => (i + 1) % len,
        (Some(i), false) => (i + len - 1) % len,
    };
    flow.relationship = Some(Relationship::ALL[next]);
}

fn invite_error_toast(err: &InviteError) -> Toast {
    let title = match err {
        InviteError::Missing(_) => "Fill in every field",
        InviteError::BadContact(_) => "Invalid format",
        InviteError::BadCode => "Enter the code",
        InviteError::WrongCode => "Wrong code",
        InviteError::Finished => "Already settled",
    };
    Toast::error(title, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use std::time::Duration;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn dashboard_app() -> App {
        let mut app = App::new(AppConfig::default(), true);
        app.screen = Screen::Dashboard;
        app.tab = Tab::Family;
        app
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c))).unwrap();
        }
    }

    #[test]
    fn invite_wizard_end_to_end_adds_a_member() {
        let mut app = dashboard_app();
        assert_eq!(app.roster.len(), 3);

        app.handle_key(key(KeyCode::Char('i'))).unwrap();
        assert_eq!(app.popup, Popup::Invite);

        // pick email and continue
        app.handle_key(key(KeyCode::Char(' '))).unwrap();
        app.handle_key(key(KeyCode::Enter)).unwrap();

        // name, contact, relationship
        type_text(&mut app, "Anna Lee");
        app.handle_key(key(KeyCode::Tab)).unwrap();
        type_text(&mut app, "anna@example.com");
        app.handle_key(key(KeyCode::Tab)).unwrap();
        app.handle_key(key(KeyCode::Right)).unwrap();

        // send the code from the buttons row
        app.handle_key(key(KeyCode::Tab)).unwrap();
        app.handle_key(key(KeyCode::Enter)).unwrap();
        assert!(app.invite.as_ref().is_some_and(|f| f.code_sent));

        // type the demo code and confirm
        type_text(&mut app, "123456");
        app.handle_key(key(KeyCode::Enter)).unwrap();

        assert_eq!(app.popup, Popup::None);
        assert!(app.invite.is_none());
        assert_eq!(app.roster.len(), 4);
        let added = app.roster.members().last().unwrap();
        assert_eq!(added.name, "Anna Lee");
        assert_eq!(added.contact, "anna@example.com");
        assert_eq!(added.verification, Some(ContactMethod::Email));
        assert!(!added.is_owner);
        assert_eq!(app.profiles.len(), 4);
    }

    #[test]
    fn wrong_code_keeps_the_wizard_open() {
        let mut app = dashboard_app();
        app.handle_key(key(KeyCode::Char('i'))).unwrap();
        app.handle_key(key(KeyCode::Char(' '))).unwrap();
        app.handle_key(key(KeyCode::Enter)).unwrap();
        type_text(&mut app, "Anna Lee");
        app.handle_key(key(KeyCode::Tab)).unwrap();
        type_text(&mut app, "anna@example.com");
        app.handle_key(key(KeyCode::Tab)).unwrap();
        app.handle_key(key(KeyCode::Right)).unwrap();
        app.handle_key(key(KeyCode::Tab)).unwrap();
        app.handle_key(key(KeyCode::Enter)).unwrap();

        type_text(&mut app, "000000");
        app.handle_key(key(KeyCode::Enter)).unwrap();

        assert_eq!(app.popup, Popup::Invite);
        assert_eq!(app.roster.len(), 3);
        assert_eq!(app.toast.as_ref().unwrap().title, "Wrong code");
    }

    #[test]
    fn esc_cancels_the_wizard_before_a_code_is_sent() {
        let mut app = dashboard_app();
        app.handle_key(key(KeyCode::Char('i'))).unwrap();
        app.handle_key(key(KeyCode::Esc)).unwrap();

        assert_eq!(app.popup, Popup::None);
        assert!(app.invite.is_none());
        assert_eq!(app.roster.len(), 3);
    }

    #[test]
    fn continue_without_method_selection_is_rejected() {
        let mut app = dashboard_app();
        app.handle_key(key(KeyCode::Char('i'))).unwrap();
        // Enter without a prior Space selection
        app.handle_key(key(KeyCode::Enter)).unwrap();

        assert_eq!(
            app.invite.as_ref().unwrap().step,
            InviteStep::Method
        );
        assert_eq!(app.toast.as_ref().unwrap().kind, ToastKind::Error);
    }

    #[test]
    fn invite_is_blocked_while_the_family_is_full() {
        let mut app = dashboard_app();
        let today = chrono::Local::now().date_naive();
        while !app.roster.is_full() {
            let n = app.roster.len();
            app.roster
                .add(
                    &format!("Filler {n}"),
                    &format!("f{n}@example.com"),
                    ContactMethod::Email,
                    None,
                    today,
                )
                .unwrap();
        }

        app.handle_key(key(KeyCode::Char('i'))).unwrap();
        assert_eq!(app.popup, Popup::None);
        assert!(app.invite.is_none());
        assert_eq!(app.toast.as_ref().unwrap().title, "Family is full");
    }

    #[test]
    fn completion_rechecks_capacity() {
        let mut app = dashboard_app();
        let today = chrono::Local::now().date_naive();
        while !app.roster.is_full() {
            let n = app.roster.len();
            app.roster
                .add(
                    &format!("Filler {n}"),
                    &format!("f{n}@example.com"),
                    ContactMethod::Email,
                    None,
                    today,
                )
                .unwrap();
        }

        // the family filled up while a wizard was (hypothetically) open
        app.complete_invitation(
            "late@example.com".to_string(),
            ContactMethod::Email,
            "Late Arrival".to_string(),
            Relationship::Other,
        );
        assert_eq!(app.roster.len(), 5);
        assert_eq!(app.toast.as_ref().unwrap().kind, ToastKind::Error);
    }

    #[test]
    fn removing_a_member_needs_confirmation() {
        let mut app = dashboard_app();
        app.selected_member = 1;
        app.handle_key(key(KeyCode::Char('d'))).unwrap();
        assert_eq!(app.popup, Popup::ConfirmRemove);

        app.handle_key(key(KeyCode::Char('n'))).unwrap();
        assert_eq!(app.roster.len(), 3);

        app.handle_key(key(KeyCode::Char('d'))).unwrap();
        app.handle_key(key(KeyCode::Char('y'))).unwrap();
        assert_eq!(app.roster.len(), 2);
        assert_eq!(app.profiles.len(), 2);
    }

    #[test]
    fn the_owner_cannot_be_removed_from_the_ui() {
        let mut app = dashboard_app();
        app.selected_member = 0;
        app.handle_key(key(KeyCode::Char('d'))).unwrap();
        assert_eq!(app.popup, Popup::None);
        assert_eq!(app.roster.len(), 3);
        assert_eq!(app.toast.as_ref().unwrap().kind, ToastKind::Error);
    }

    #[test]
    fn search_filters_the_visible_rows() {
        let mut app = App::new(AppConfig::default(), true);
        app.screen = Screen::Dashboard;
        app.tab = Tab::Catalog;

        app.handle_key(key(KeyCode::Char('/'))).unwrap();
        assert!(app.search_active);
        type_text(&mut app, "night");
        app.handle_key(key(KeyCode::Enter)).unwrap();
        assert!(!app.search_active);

        let rows = app.visible_rows();
        let total: usize = rows.iter().map(|r| r.movies.len()).sum();
        assert_eq!(total, 1);
        assert_eq!(rows[0].movies[0].title, "Night City");
    }

    #[test]
    fn closing_the_player_records_watch_progress() {
        let mut app = App::new(AppConfig::default(), true);
        app.handle_key(key(KeyCode::Enter)).unwrap(); // pick owner profile
        assert_eq!(app.screen, Screen::Dashboard);

        app.handle_key(key(KeyCode::Enter)).unwrap(); // play selected movie
        assert_eq!(app.screen, Screen::Player);
        if let Some(pb) = app.playback.as_mut() {
            pb.position = pb.duration / 2;
        }
        app.handle_key(key(KeyCode::Esc)).unwrap();

        assert_eq!(app.screen, Screen::Dashboard);
        let owner = app.active_profile.unwrap();
        let entries = app.watch_log.for_profile(owner);
        assert_eq!(entries[0].title, "The Last Drop");
        assert_eq!(entries[0].percent, 50);
    }

    #[test]
    fn toast_clears_after_its_window() {
        let mut app = dashboard_app();
        app.push_toast(Toast::info("Hello", "world"));
        assert!(app.toast.is_some());

        app.toast_time = Some(Instant::now() - Duration::from_secs(4));
        app.tick();
        assert!(app.toast.is_none());
    }
}
