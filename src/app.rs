use std::io;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::{Frame, Terminal};
use tracing::{debug, error, info};

use crate::catalog::{Action, ActionItem};
use crate::config::{DEFAULT_READY_MESSAGE, DEFAULT_TITLE};
use crate::exec::{self, ExecHost, ShellHost};
use crate::report::{self, SystemReport};
use crate::screens;
use crate::screens::menu::{DashboardView, StatusLine};
use crate::signals;
use crate::term::{DashboardTerminal, ModeSwitch, Passthrough};
use crate::theme::ThemeTokens;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Browsing,
    RunningExternal,
    ShowingHelp,
    ShowingSystemInfo,
    Terminated,
}

/// Highlighted entry; always `< len` when `len > 0`, wrapping at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuState {
    selected_index: usize,
    len: usize,
}

impl MenuState {
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            selected_index: 0,
            len,
        }
    }

    #[must_use]
    pub fn with_selected(len: usize, index: usize) -> Self {
        Self {
            selected_index: if len == 0 { 0 } else { index % len },
            len,
        }
    }

    #[must_use]
    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn up(self) -> Self {
        if self.len == 0 {
            return self;
        }
        Self {
            selected_index: (self.selected_index + self.len - 1) % self.len,
            ..self
        }
    }

    #[must_use]
    pub fn down(self) -> Self {
        if self.len == 0 {
            return self;
        }
        Self {
            selected_index: (self.selected_index + 1) % self.len,
            ..self
        }
    }

    #[must_use]
    pub fn first(self) -> Self {
        Self {
            selected_index: 0,
            ..self
        }
    }

    #[must_use]
    pub fn last(self) -> Self {
        Self {
            selected_index: self.len.saturating_sub(1),
            ..self
        }
    }
}

/// The whole mutable session, threaded through the event loop by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub menu: MenuState,
    pub screen: Screen,
}

impl Session {
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            menu: MenuState::new(len),
            screen: Screen::Browsing,
        }
    }

    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.screen == Screen::Terminated
    }

    fn on(self, screen: Screen) -> Self {
        Self { screen, ..self }
    }
}

/// Work the driver performs after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Run { title: String, command: String },
    CollectSystemInfo,
    Quit,
}

fn is_interrupt(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c' | 'C'))
}

/// Pure transition function: one key event in, next session and effect out.
#[must_use]
pub fn reduce(session: Session, catalog: &[ActionItem], key: KeyEvent) -> (Session, Effect) {
    match session.screen {
        Screen::Terminated => (session, Effect::None),
        // Informational screens take exactly one key to close.
        Screen::ShowingHelp | Screen::ShowingSystemInfo | Screen::RunningExternal => {
            (session.on(Screen::Browsing), Effect::None)
        }
        Screen::Browsing => reduce_browsing(session, catalog, key),
    }
}

fn reduce_browsing(session: Session, catalog: &[ActionItem], key: KeyEvent) -> (Session, Effect) {
    if is_interrupt(&key) {
        return (session.on(Screen::Terminated), Effect::Quit);
    }
    let navigate = |menu: MenuState| (Session { menu, ..session }, Effect::None);
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => navigate(session.menu.up()),
        KeyCode::Down | KeyCode::Char('j') => navigate(session.menu.down()),
        KeyCode::Home => navigate(session.menu.first()),
        KeyCode::End => navigate(session.menu.last()),
        KeyCode::Enter | KeyCode::Char(' ') => activate(session, catalog),
        KeyCode::Char('h' | '?') => (session.on(Screen::ShowingHelp), Effect::None),
        KeyCode::Char('q' | 'Q') => (session.on(Screen::Terminated), Effect::Quit),
        _ => (session, Effect::None),
    }
}

fn activate(session: Session, catalog: &[ActionItem]) -> (Session, Effect) {
    let Some(item) = catalog.get(session.menu.selected_index()) else {
        return (session, Effect::None);
    };
    match &item.action {
        Action::External(cmd) if cmd.trim().is_empty() => (session, Effect::None),
        Action::External(cmd) => (
            session.on(Screen::RunningExternal),
            Effect::Run {
                title: item.title.clone(),
                command: cmd.clone(),
            },
        ),
        Action::ShowHelp => (session.on(Screen::ShowingHelp), Effect::None),
        Action::ShowSystemInfo => (
            session.on(Screen::ShowingSystemInfo),
            Effect::CollectSystemInfo,
        ),
        Action::Quit => (session.on(Screen::Terminated), Effect::Quit),
    }
}

/// Blocking source of terminal events.
pub trait EventSource {
    fn next_event(&mut self) -> io::Result<Event>;
}

#[derive(Debug, Default)]
pub struct CrosstermEvents;

impl EventSource for CrosstermEvents {
    fn next_event(&mut self) -> io::Result<Event> {
        event::read()
    }
}

#[derive(Debug, Clone)]
pub struct DashboardOptions {
    pub title: String,
    pub version: String,
    pub ready_message: String,
    pub theme: ThemeTokens,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            ready_message: DEFAULT_READY_MESSAGE.to_string(),
            theme: ThemeTokens::default(),
        }
    }
}

/// Event loop driver: draws, reads one key, applies `reduce`, performs effects.
pub struct Dashboard<'a, M: ModeSwitch, H: ExecHost> {
    catalog: &'a [ActionItem],
    modes: M,
    host: H,
    options: DashboardOptions,
    status: Option<StatusLine>,
    report: Option<SystemReport>,
    collect_report: fn() -> SystemReport,
    needs_clear: bool,
}

impl<'a, M: ModeSwitch, H: ExecHost> Dashboard<'a, M, H> {
    pub fn new(catalog: &'a [ActionItem], modes: M, host: H, options: DashboardOptions) -> Self {
        Self {
            catalog,
            modes,
            host,
            options,
            status: None,
            report: None,
            collect_report: report::collect,
            needs_clear: true,
        }
    }

    #[must_use]
    pub fn with_report_source(mut self, collect: fn() -> SystemReport) -> Self {
        self.collect_report = collect;
        self
    }

    /// Set after passthrough; the next draw clears the whole screen first.
    #[must_use]
    pub fn needs_clear(&self) -> bool {
        self.needs_clear
    }

    #[must_use]
    pub fn status_line(&self) -> StatusLine {
        self.status
            .clone()
            .unwrap_or_else(|| StatusLine::neutral(self.options.ready_message.clone()))
    }

    pub fn render(&self, f: &mut Frame, session: &Session) {
        let area = f.area();
        let theme = &self.options.theme;
        match session.screen {
            Screen::ShowingHelp => {
                screens::help::render(f, area, &self.options.title, self.catalog, theme);
            }
            Screen::ShowingSystemInfo => {
                screens::sysinfo::render(f, area, &self.options.title, self.report.as_ref(), theme);
            }
            _ => {
                let status = self.status_line();
                let view = DashboardView {
                    title: &self.options.title,
                    version: &self.options.version,
                    catalog: self.catalog,
                    selected: session.menu.selected_index(),
                    status: &status,
                    theme,
                };
                screens::menu::render(f, area, &view);
            }
        }
    }

    /// # Errors
    /// Returns error if the terminal cannot be cleared or written.
    pub fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>, session: &Session) -> Result<()> {
        if self.needs_clear {
            terminal.clear().context("failed to clear terminal")?;
            self.needs_clear = false;
        }
        terminal
            .draw(|f| self.render(f, session))
            .context("failed to draw dashboard")?;
        Ok(())
    }

    /// Run until the session terminates and return the final session.
    ///
    /// # Errors
    /// Returns error on terminal I/O failure or if dashboard mode cannot be
    /// restored after a command.
    pub fn run<B: Backend, E: EventSource>(
        &mut self,
        terminal: &mut Terminal<B>,
        events: &mut E,
        mut session: Session,
    ) -> Result<Session> {
        info!(entries = self.catalog.len(), "dashboard started");
        while !session.is_terminated() {
            self.draw(terminal, &session)?;
            match events.next_event().context("failed to read terminal input")? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    session = self.handle_key(session, key)?;
                }
                Event::Resize(cols, rows) => debug!(cols, rows, "terminal resized"),
                _ => {}
            }
        }
        info!("dashboard terminated");
        Ok(session)
    }

    /// Apply one key press and perform the resulting effect.
    ///
    /// # Errors
    /// Returns error if dashboard mode cannot be restored after a command.
    pub fn handle_key(&mut self, session: Session, key: KeyEvent) -> Result<Session> {
        if session.screen == Screen::Browsing {
            // A command result is shown for one frame only.
            self.status = None;
        }
        let (next, effect) = reduce(session, self.catalog, key);
        if next.screen == Screen::Browsing {
            self.report = None;
        }
        match effect {
            Effect::None => Ok(next),
            Effect::Quit => {
                debug!("quit requested");
                Ok(next)
            }
            Effect::CollectSystemInfo => {
                self.report = Some((self.collect_report)());
                Ok(next)
            }
            Effect::Run { title, command } => {
                self.run_external(&title, &command)?;
                Ok(next.on(Screen::Browsing))
            }
        }
    }

    fn run_external(&mut self, title: &str, command: &str) -> Result<()> {
        self.needs_clear = true;
        let guard = match Passthrough::acquire(&mut self.modes) {
            Ok(guard) => guard,
            Err(e) => {
                error!(title, error = %e, "failed to hand the terminal to the command");
                self.status = Some(StatusLine::problem(format!(
                    "{title}: terminal hand-off failed ({e})"
                )));
                return Ok(());
            }
        };
        let result = exec::run(&mut self.host, command);
        guard.release().context("failed to restore dashboard mode")?;

        if let Some(result) = result {
            let text = format!("{title}: {}", result.status_text());
            self.status = Some(if result.success() {
                StatusLine::success(text)
            } else {
                StatusLine::problem(text)
            });
        }
        Ok(())
    }
}

/// Take over the real terminal and run the dashboard until quit.
///
/// # Errors
/// Returns error if the terminal cannot be set up or fails mid-session. The
/// terminal is restored before the error is returned.
pub fn run_interactive(
    catalog: &[ActionItem],
    options: DashboardOptions,
    shell: Option<&str>,
) -> Result<()> {
    let passthrough = Arc::new(AtomicBool::new(false));
    signals::install(Arc::clone(&passthrough)).context("failed to install signal handlers")?;
    signals::install_panic_hook();

    let modes = DashboardTerminal::enter(passthrough)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
    let mut dashboard = Dashboard::new(catalog, modes, ShellHost::new(shell), options);
    dashboard.run(&mut terminal, &mut CrosstermEvents, Session::new(catalog.len()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn catalog() -> Vec<ActionItem> {
        vec![
            ActionItem::external("One", "first", "true"),
            ActionItem::external("Blank", "nothing to run", ""),
            ActionItem::builtin("System Information", "info", Action::ShowSystemInfo),
            ActionItem::builtin("Help", "help", Action::ShowHelp),
            ActionItem::builtin("Exit", "quit", Action::Quit),
        ]
    }

    #[test]
    fn navigation_wraps_both_ways() {
        for n in 1..=7 {
            for start in 0..n {
                let mut down = MenuState::with_selected(n, start);
                let mut up = down;
                for _ in 0..n {
                    down = down.down();
                    up = up.up();
                    assert!(down.selected_index() < n && up.selected_index() < n);
                }
                assert_eq!(down.selected_index(), start);
                assert_eq!(up.selected_index(), start);
            }
        }
    }

    #[test]
    fn up_from_top_goes_to_bottom() {
        let m = MenuState::new(4).up();
        assert_eq!(m.selected_index(), 3);
        assert_eq!(m.down().selected_index(), 0);
    }

    #[test]
    fn vim_keys_match_arrows() {
        let items = catalog();
        let s = Session::new(items.len());
        let (a, _) = reduce(s, &items, key(KeyCode::Char('j')));
        let (b, _) = reduce(s, &items, key(KeyCode::Down));
        assert_eq!(a, b);
        let (a, _) = reduce(s, &items, key(KeyCode::Char('k')));
        let (b, _) = reduce(s, &items, key(KeyCode::Up));
        assert_eq!(a, b);
        assert_eq!(a.menu.selected_index(), items.len() - 1);
    }

    #[test]
    fn enter_on_external_requests_run() {
        let items = catalog();
        let (s, effect) = reduce(Session::new(items.len()), &items, key(KeyCode::Enter));
        assert_eq!(s.screen, Screen::RunningExternal);
        assert_eq!(
            effect,
            Effect::Run {
                title: "One".into(),
                command: "true".into()
            }
        );
    }

    #[test]
    fn blank_command_does_nothing() {
        let items = catalog();
        let s = Session {
            menu: MenuState::with_selected(items.len(), 1),
            screen: Screen::Browsing,
        };
        assert_eq!(reduce(s, &items, key(KeyCode::Char(' '))), (s, Effect::None));
    }

    #[test]
    fn builtins_dispatch_by_variant() {
        let items = catalog();
        let at = |i| Session {
            menu: MenuState::with_selected(items.len(), i),
            screen: Screen::Browsing,
        };
        let (s, e) = reduce(at(2), &items, key(KeyCode::Enter));
        assert_eq!((s.screen, e), (Screen::ShowingSystemInfo, Effect::CollectSystemInfo));
        let (s, e) = reduce(at(3), &items, key(KeyCode::Enter));
        assert_eq!((s.screen, e), (Screen::ShowingHelp, Effect::None));
        let (s, e) = reduce(at(4), &items, key(KeyCode::Enter));
        assert_eq!((s.screen, e), (Screen::Terminated, Effect::Quit));
    }

    #[test]
    fn help_keys_work_regardless_of_selection() {
        let items = catalog();
        for c in ['h', '?'] {
            let (s, _) = reduce(Session::new(items.len()), &items, key(KeyCode::Char(c)));
            assert_eq!(s.screen, Screen::ShowingHelp);
        }
    }

    #[test]
    fn any_key_closes_informational_screens() {
        let items = catalog();
        for screen in [Screen::ShowingHelp, Screen::ShowingSystemInfo] {
            let s = Session {
                menu: MenuState::with_selected(items.len(), 2),
                screen,
            };
            let (next, effect) = reduce(s, &items, key(KeyCode::Char('q')));
            assert_eq!(next.screen, Screen::Browsing);
            assert_eq!(next.menu.selected_index(), 2);
            assert_eq!(effect, Effect::None);
        }
    }

    #[test]
    fn quit_keys_and_interrupt_terminate() {
        let items = catalog();
        let s = Session::new(items.len());
        for k in [
            key(KeyCode::Char('q')),
            key(KeyCode::Char('Q')),
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        ] {
            assert_eq!(reduce(s, &items, k), (s.on(Screen::Terminated), Effect::Quit));
        }
        // Plain 'c' is not an interrupt.
        assert_eq!(reduce(s, &items, key(KeyCode::Char('c'))), (s, Effect::None));
    }

    #[test]
    fn terminated_is_final() {
        let items = catalog();
        let s = Session::new(items.len()).on(Screen::Terminated);
        assert_eq!(reduce(s, &items, key(KeyCode::Down)), (s, Effect::None));
    }

    #[test]
    fn home_and_end_jump() {
        let items = catalog();
        let (s, _) = reduce(Session::new(items.len()), &items, key(KeyCode::End));
        assert_eq!(s.menu.selected_index(), items.len() - 1);
        let (s, _) = reduce(s, &items, key(KeyCode::Home));
        assert_eq!(s.menu.selected_index(), 0);
    }
}
