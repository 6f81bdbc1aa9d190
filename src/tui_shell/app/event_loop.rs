use super::*;

pub(super) fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        app.pump();

        terminal
            .draw(|f| super::render::draw(f, app))
            .context("draw")?;
        if app.quit {
            return Ok(());
        }

        if event::poll(Duration::from_millis(50)).context("poll")? {
            match event::read().context("read event")? {
                Event::Key(k) if k.kind == KeyEventKind::Press => handle_key(app, k),
                _ => {}
            }
        }
    }
}

pub(super) fn handle_key(app: &mut App, key: KeyEvent) {
    if app.prompt.is_some() {
        handle_prompt_key(app, key);
        return;
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.move_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_down(),
        KeyCode::Char('P') => app.cycle_policy(),
        _ if app.controller.is_editing() => handle_editing_key(app, key),
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Char('e') => app.start_edit(),
        KeyCode::Char('r') => app.reset_to_defaults(),
        _ => {}
    }
}

fn handle_editing_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel_edit(),
        KeyCode::Char('q') if app.controller.cache().is_dirty() => app.push_log(
            LogKind::Warn,
            "unsaved changes; s to save or Esc to discard".to_string(),
        ),
        KeyCode::Char('q') => app.quit = true,
        KeyCode::Char(' ') => app.toggle_selected(),
        KeyCode::Enter => {
            if let Some(key) = app.selected_key() {
                app.open_prompt(Prompt::Url { key });
            }
        }
        KeyCode::Char('p') => {
            if let Some(key) = app.selected_key() {
                app.open_prompt(Prompt::Path { key });
            }
        }
        KeyCode::Char('a') => app.open_prompt(Prompt::NewKey),
        KeyCode::Char('s') => app.save(),
        KeyCode::Char('r') => app.reset_to_defaults(),
        _ => {}
    }
}

fn handle_prompt_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_prompt(),
        KeyCode::Enter => app.submit_prompt(),
        KeyCode::Backspace => app.input.backspace(),
        KeyCode::Delete => app.input.delete(),
        KeyCode::Left => app.input.move_left(),
        KeyCode::Right => app.input.move_right(),
        KeyCode::Home => app.input.move_home(),
        KeyCode::End => app.input.move_end(),
        KeyCode::Char(c) => app.input.insert_char(c),
        _ => {}
    }
}
