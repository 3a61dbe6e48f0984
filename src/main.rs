use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing::{error, info};

mod app;
mod cli;
mod config;
mod core;
mod error;
mod fs;
mod input;
mod logging;
mod models;
mod state;
mod ui;

use app::App;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let global = cli::parse_global_args(&args);

    // 日志初始化失败不影响使用
    if let Err(e) = logging::init(global.verbose) {
        eprintln!("Không khởi tạo được log: {:#}", e);
    }

    // 处理 CLI 命令
    let should_run_tui = cli::handle_cli(&global)?;

    // 如果 CLI 命令已处理，直接退出
    if !should_run_tui {
        return Ok(());
    }

    // 创建应用（数据库损坏时在进入 TUI 之前报错）
    let mut app = App::new(&global)?;

    // 设置终端
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    info!(user = app.username().unwrap_or("-"), "tui started");

    // 运行应用
    let res = run_app(&mut terminal, &mut app);

    // 恢复终端
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!(error = %err, "tui exited with error");
        eprintln!("Lỗi: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::render(f, app))?;

        app.clear_expired_notification();

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                // Windows 上按下和松开都会产生事件
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                if !app.handle_key(key) {
                    // 退出前保存状态
                    app.save_state();
                    info!("tui stopped");
                    return Ok(()); // 退出应用
                }
            }
        }
    }
}
