//! Keyboard input handling.

use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use crate::app::{App, AppEvent};
use crate::feed::{SortOrder, SwitchAction};

use super::helpers::spawn_backfill_load;
use super::loop_runner::Action;

/// Handle a key press in the video list.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => return Action::Quit,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            return Action::Quit;
        }

        KeyCode::Char('j') | KeyCode::Down => app.nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.nav_up(),
        KeyCode::Char('g') | KeyCode::Home => app.nav_top(),
        KeyCode::Char('G') | KeyCode::End => app.nav_bottom(),

        KeyCode::Tab => {
            let target = app.feed.active_order().opposite();
            switch_order(app, target, event_tx);
        }
        KeyCode::Char('n') => switch_order(app, SortOrder::Newest, event_tx),
        KeyCode::Char('o') => switch_order(app, SortOrder::Oldest, event_tx),

        KeyCode::Enter => open_selected(app),

        _ => {}
    }
    Action::Continue
}

/// Request an order switch and run the backfill if one is needed.
fn switch_order(app: &mut App, target: SortOrder, event_tx: &mpsc::Sender<AppEvent>) {
    match app.controller.begin_switch(&mut app.feed, target) {
        SwitchAction::AlreadyActive => {}
        SwitchAction::Activated => {
            app.reset_selection();
        }
        SwitchAction::Backfill(request) => {
            app.set_status("Loading videos...");
            spawn_backfill_load(app.api.clone(), request, event_tx.clone());
        }
    }
}

/// Open the selected video's watch page in the system browser.
fn open_selected(app: &mut App) {
    let Some(url) = app.selected_watch_url() else {
        return;
    };
    // Validate before open::that() so a malformed site_url or id never
    // reaches the shell.
    if let Err(e) = validate_url_for_open(&url) {
        app.set_status(e);
        return;
    }
    if let Err(e) = open::that(&url) {
        app.set_status(format!("Failed to open browser: {}", e));
    } else {
        app.set_status("Opening in browser...");
    }
}

/// Only well-formed http(s) URLs are handed to the OS opener.
fn validate_url_for_open(raw: &str) -> Result<(), String> {
    match url::Url::parse(raw) {
        Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => Ok(()),
        Ok(parsed) => Err(format!("Refusing to open {} URL", parsed.scheme())),
        Err(_) => Err("Invalid video URL".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::VideoApi;
    use crate::config::Config;
    use crate::feed::testutil::desc_page;

    fn test_app(seed_count: u32) -> App {
        let api = VideoApi::new(
            reqwest::Client::new(),
            url::Url::parse("http://localhost:9/api/").unwrap(),
            None,
        );
        App::new(api, &Config::default(), desc_page(0..seed_count, 100_000))
    }

    #[tokio::test]
    async fn test_quit_keys() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = test_app(3);
        assert!(matches!(
            handle_input(&mut app, KeyCode::Char('q'), KeyModifiers::NONE, &tx),
            Action::Quit
        ));
        assert!(matches!(
            handle_input(&mut app, KeyCode::Esc, KeyModifiers::NONE, &tx),
            Action::Quit
        ));
        assert!(matches!(
            handle_input(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL, &tx),
            Action::Quit
        ));
    }

    #[tokio::test]
    async fn test_navigation_keys() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = test_app(5);
        handle_input(&mut app, KeyCode::Char('j'), KeyModifiers::NONE, &tx);
        handle_input(&mut app, KeyCode::Down, KeyModifiers::NONE, &tx);
        assert_eq!(app.selected, 2);
        handle_input(&mut app, KeyCode::Char('k'), KeyModifiers::NONE, &tx);
        assert_eq!(app.selected, 1);
        handle_input(&mut app, KeyCode::Char('G'), KeyModifiers::SHIFT, &tx);
        assert_eq!(app.selected, 4);
        handle_input(&mut app, KeyCode::Char('g'), KeyModifiers::NONE, &tx);
        assert_eq!(app.selected, 0);
    }

    #[tokio::test]
    async fn test_first_switch_shows_loading_status() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut app = test_app(5);

        handle_input(&mut app, KeyCode::Char('o'), KeyModifiers::NONE, &tx);
        // Activation waits for the backfill; display unchanged.
        assert_eq!(app.feed.active_order(), SortOrder::Newest);
        let (msg, _) = app.status_message.as_ref().expect("status set");
        assert_eq!(msg, "Loading videos...");

        // The spawned task will fail against the unroutable host and report
        // through the channel; just make sure something was spawned.
        let event = rx.recv().await.expect("backfill completion");
        assert!(matches!(event, AppEvent::BackfillLoaded { .. }));
    }

    #[test]
    fn test_url_validation() {
        assert!(validate_url_for_open("https://example.com/watch/abc").is_ok());
        assert!(validate_url_for_open("http://localhost:3000/watch/x").is_ok());
        assert!(validate_url_for_open("file:///etc/passwd").is_err());
        assert!(validate_url_for_open("not a url").is_err());
    }
}
