    use super::*;
    use crate::remote::MemoryStore;
    use crossterm::event::KeyModifiers;
    use serde_json::json;
    use std::time::Instant;

    fn app_with(store: &Arc<MemoryStore>) -> App {
        let mut app = App::new(
            store.clone(),
            SavePolicy::Permissive,
            CanonicalStore::new(),
            Duration::from_millis(50),
        );
        pump_until(&mut app, |a| a.controller.last_revision().is_some());
        app
    }

    fn pump_until(app: &mut App, cond: impl Fn(&App) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            app.pump();
            if cond(app) {
                return;
            }
            assert!(Instant::now() < deadline, "condition not reached");
            std::thread::sleep(Duration::from_millis(10));
        }
    }

    fn press(app: &mut App, code: KeyCode) {
        event_loop::handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn logged(app: &App, needle: &str) -> bool {
        app.log.iter().any(|l| l.text.contains(needle))
    }

    #[test]
    fn shows_the_remote_tree_once_loaded() {
        let store = Arc::new(MemoryStore::with_value(json!({
            "Aimbot": "https://x/a",
            "Zoom": { "url": "", "path": "/z" },
        })));
        let app = app_with(&store);

        assert_eq!(app.status_label(), "viewing");
        assert_eq!(app.controller.view().len(), 2);
        assert_eq!(app.selected_key().as_deref(), Some("Aimbot"));
    }

    #[test]
    fn toggling_and_saving_writes_the_tree() {
        let store = Arc::new(MemoryStore::with_value(json!({ "Aimbot": "https://x/a" })));
        let mut app = app_with(&store);

        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Char('s'));
        pump_until(&mut app, |a| !a.controller.is_editing());

        assert_eq!(
            store.value(),
            json!({ "Aimbot": { "url": "", "path": "/sdcard/Download/Aimbot.txt" } })
        );
        assert!(logged(&app, "saved"));
        assert_eq!(
            app.controller.cache().recall("Aimbot").map(|e| e.url.as_str()),
            Some("https://x/a")
        );
    }

    #[test]
    fn failed_save_keeps_the_draft() {
        let store = Arc::new(MemoryStore::with_value(json!({ "Aimbot": "https://x/a" })));
        let mut app = app_with(&store);
        store.fail_writes(Some("permission denied"));

        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Char('s'));
        pump_until(&mut app, |a| !a.controller.save_pending());

        assert!(app.controller.is_editing());
        assert!(logged(&app, "permission denied"));
        assert_eq!(app.controller.view()["Aimbot"].url, "");
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn prompt_edits_the_selected_url() {
        let store = Arc::new(MemoryStore::with_value(json!({ "Aimbot": "https://x/a" })));
        let mut app = app_with(&store);

        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(
            app.prompt,
            Some(Prompt::Url {
                key: "Aimbot".to_string()
            })
        );
        assert_eq!(app.input.buf, "https://x/a");

        press(&mut app, KeyCode::Backspace);
        type_text(&mut app, "b");
        press(&mut app, KeyCode::Enter);

        assert!(app.prompt.is_none());
        assert_eq!(app.controller.view()["Aimbot"].url, "https://x/b");
    }

    #[test]
    fn adding_an_entry_selects_it() {
        let store = Arc::new(MemoryStore::with_value(json!({ "Aimbot": "https://x/a" })));
        let mut app = app_with(&store);

        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "Extra");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.selected_key().as_deref(), Some("Extra"));
        assert_eq!(app.controller.view()["Extra"].path, "/sdcard/Download");
    }

    #[test]
    fn remote_changes_do_not_touch_the_draft() {
        let store = Arc::new(MemoryStore::with_value(json!({ "Aimbot": "https://x/a" })));
        let mut app = app_with(&store);

        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::Char(' '));
        store.push(json!({ "Aimbot": "https://x/other" }));
        pump_until(&mut app, |a| a.controller.last_revision() == Some(2));

        assert_eq!(app.controller.view()["Aimbot"].url, "");
        assert!(logged(&app, "changed while editing"));

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.controller.view()["Aimbot"].url, "https://x/other");
    }

    #[test]
    fn quit_is_refused_with_unsaved_changes() {
        let store = Arc::new(MemoryStore::with_value(json!({ "Aimbot": "https://x/a" })));
        let mut app = app_with(&store);

        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.quit);

        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.quit);
    }
