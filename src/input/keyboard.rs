use crate::app::{App, Focus, Mode};
use crate::input::Command;
use crate::ui::dialogs::{first_line, AddTaskForm, ConfirmAction, DialogType, FormField};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

/// 处理键盘输入
/// 返回 false 表示应该退出应用
pub fn handle_key_input(app: &mut App, key: KeyEvent) -> bool {
    match app.mode {
        Mode::Normal => handle_normal_mode(app, key),
        Mode::Dialog => handle_dialog_mode(app, key),
        Mode::Help => handle_help_mode(app, key),
    }
}

/// 处理正常模式的按键
fn handle_normal_mode(app: &mut App, key: KeyEvent) -> bool {
    let Some(cmd) = match_key(key) else {
        return true;
    };

    // 特殊处理退出命令
    if cmd == Command::Quit {
        return false;
    }

    execute_command(app, cmd);
    true
}

/// 单键命令映射
pub fn match_key(key: KeyEvent) -> Option<Command> {
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(Command::Quit),
        (KeyCode::Char('q'), KeyModifiers::NONE) => Some(Command::Quit),
        (KeyCode::Char('?'), _) => Some(Command::Help),

        (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => Some(Command::Down),
        (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => Some(Command::Up),
        (KeyCode::Char('h'), KeyModifiers::NONE) | (KeyCode::Left, _) => Some(Command::FocusTasks),
        (KeyCode::Char('l'), KeyModifiers::NONE) | (KeyCode::Right, _) => Some(Command::FocusSteps),
        (KeyCode::Tab, _) => Some(Command::ToggleFocus),

        (KeyCode::Char(' '), _) | (KeyCode::Char('x'), KeyModifiers::NONE) | (KeyCode::Enter, _) => {
            Some(Command::ToggleStep)
        }
        (KeyCode::Char('a'), KeyModifiers::NONE) | (KeyCode::Char('n'), KeyModifiers::NONE) => {
            Some(Command::NewTask)
        }
        (KeyCode::Char('d'), KeyModifiers::NONE) => Some(Command::DeleteTask),
        (KeyCode::Char('u'), KeyModifiers::NONE) => Some(Command::SwitchUser),
        (KeyCode::Char('r'), KeyModifiers::NONE) => Some(Command::Reload),

        _ => None,
    }
}

/// 执行命令
fn execute_command(app: &mut App, cmd: Command) {
    debug!(?cmd, "execute command");

    match cmd {
        Command::Quit => {}
        Command::Up => app.select_prev(),
        Command::Down => app.select_next(),
        Command::FocusTasks => app.focus = Focus::Tasks,
        Command::FocusSteps => {
            if app.selected().is_some() {
                app.focus = Focus::Steps;
                app.clamp_selection();
            }
        }
        Command::ToggleFocus => {
            let target = match app.focus {
                Focus::Tasks => Command::FocusSteps,
                Focus::Steps => Command::FocusTasks,
            };
            execute_command(app, target);
        }
        Command::ToggleStep => {
            // 任务面板下回车先进入步骤面板
            if app.focus == Focus::Tasks {
                execute_command(app, Command::FocusSteps);
            } else {
                app.toggle_selected_step();
            }
        }
        Command::NewTask => app.open_add_dialog(),
        Command::DeleteTask => app.open_delete_dialog(),
        Command::Reload => app.reload(),
        Command::SwitchUser => app.open_login_dialog(),
        Command::Help => app.mode = Mode::Help,
    }
}

/// 处理对话框模式的按键
fn handle_dialog_mode(app: &mut App, key: KeyEvent) -> bool {
    // 先取出对话框，处理完再放回
    let Some(dialog) = app.dialog.take() else {
        app.mode = Mode::Normal;
        return true;
    };

    let (next, keep_running) = match dialog {
        DialogType::Login { textarea, error } => handle_login_dialog(app, key, textarea, error),
        DialogType::AddTask(form) => (handle_add_task_dialog(app, key, form), true),
        DialogType::Confirm {
            title,
            message,
            yes_selected,
            action,
        } => (handle_confirm_dialog(app, key, title, message, yes_selected, action), true),
    };

    match next {
        Some(dialog) => {
            app.dialog = Some(dialog);
            app.mode = Mode::Dialog;
        }
        None => {
            // 处理过程中可能已打开新对话框
            if app.dialog.is_none() {
                app.mode = Mode::Normal;
            }
        }
    }

    keep_running
}

fn handle_login_dialog(
    app: &mut App,
    key: KeyEvent,
    mut textarea: tui_textarea::TextArea<'static>,
    error: Option<String>,
) -> (Option<DialogType>, bool) {
    match key.code {
        KeyCode::Esc => {
            // 未登录时无法继续使用，直接退出
            if app.tracker.is_none() {
                return (None, false);
            }
            (None, true)
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => (None, false),
        KeyCode::Enter => {
            let username = first_line(&textarea);
            if username.is_empty() {
                let error = Some("Vui lòng nhập tên để sử dụng app".to_string());
                return (Some(DialogType::Login { textarea, error }), true);
            }
            if app.login(&username) {
                (None, true)
            } else {
                let error = app.notification.as_ref().map(|n| n.message.clone());
                (Some(DialogType::Login { textarea, error }), true)
            }
        }
        _ => {
            textarea.input(to_textarea_input(key));
            (Some(DialogType::Login { textarea, error }), true)
        }
    }
}

fn handle_add_task_dialog(app: &mut App, key: KeyEvent, mut form: AddTaskForm) -> Option<DialogType> {
    let submit = matches!(key.code, KeyCode::Enter)
        || (key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL));

    if submit {
        let (name, deadline, category) = (form.name_value(), form.deadline_value(), form.category());
        return match app.submit_task(&name, &deadline, category) {
            Ok(()) => {
                app.focus = Focus::Tasks;
                None
            }
            Err(message) => {
                form.error = Some(message);
                Some(DialogType::AddTask(form))
            }
        };
    }

    match key.code {
        KeyCode::Esc => return None,
        KeyCode::Tab | KeyCode::Down => form.next_field(),
        KeyCode::BackTab | KeyCode::Up => form.prev_field(),
        KeyCode::Left if form.field == FormField::Category => form.cycle_category(false),
        KeyCode::Right if form.field == FormField::Category => form.cycle_category(true),
        KeyCode::Char(' ') if form.field == FormField::Category => form.cycle_category(true),
        _ => {
            if let Some(textarea) = form.focused_input() {
                textarea.input(to_textarea_input(key));
            }
        }
    }

    Some(DialogType::AddTask(form))
}

fn handle_confirm_dialog(
    app: &mut App,
    key: KeyEvent,
    title: String,
    message: String,
    yes_selected: bool,
    action: ConfirmAction,
) -> Option<DialogType> {
    let confirmed = match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => Some(true),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(false),
        KeyCode::Enter => Some(yes_selected),
        _ => None,
    };

    match confirmed {
        Some(true) => {
            match action {
                ConfirmAction::DeleteTask(index) => app.delete_task(index),
            }
            None
        }
        Some(false) => None,
        None => {
            let yes_selected = match key.code {
                KeyCode::Left | KeyCode::Char('h') => false,
                KeyCode::Right | KeyCode::Char('l') => true,
                KeyCode::Tab => !yes_selected,
                _ => yes_selected,
            };
            Some(DialogType::Confirm {
                title,
                message,
                yes_selected,
                action,
            })
        }
    }
}

/// 处理帮助模式的按键
fn handle_help_mode(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
            app.mode = Mode::Normal;
        }
        _ => {}
    }
    true
}

/// crossterm 按键转换为 tui-textarea 输入
pub fn to_textarea_input(key: KeyEvent) -> tui_textarea::Input {
    use tui_textarea::Key;

    let code = match key.code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Enter => Key::Enter,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Tab => Key::Tab,
        KeyCode::Delete => Key::Delete,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Esc => Key::Esc,
        KeyCode::F(n) => Key::F(n),
        _ => Key::Null,
    };

    tui_textarea::Input {
        key: code,
        ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
        alt: key.modifiers.contains(KeyModifiers::ALT),
        shift: key.modifiers.contains(KeyModifiers::SHIFT),
    }
}
