use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::config::Config;
use crate::core::{Award, Countdown, Evaluation, Risk, Tracker};
use crate::error::GuardianError;
use crate::fs::{JsonFileStore, TaskStore};
use crate::models::{parse_date, Category, Database, Task};

/// 全局参数（可出现在任意位置）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalArgs {
    pub user: Option<String>,
    pub db: Option<PathBuf>,
    pub verbose: bool,
    /// 去掉全局参数后的剩余参数（不含程序名）
    pub rest: Vec<String>,
}

/// Strip `--user <name>`, `--db <path>` and `--verbose` from anywhere in argv
pub fn parse_global_args(args: &[String]) -> GlobalArgs {
    let mut global = GlobalArgs::default();
    let mut iter = args.iter().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--user" | "-u" => global.user = iter.next().cloned(),
            "--db" => global.db = iter.next().map(PathBuf::from),
            "--verbose" => global.verbose = true,
            _ => global.rest.push(arg.clone()),
        }
    }

    global
}

/// 今天的日期（本地时区）
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// 处理 CLI 命令
/// 返回 true 表示应该继续进入 TUI，false 表示已处理完毕应该退出
pub fn handle_cli(global: &GlobalArgs) -> Result<bool> {
    let args = &global.rest;

    // 如果没有参数，进入 TUI 模式
    if args.is_empty() {
        return Ok(true);
    }

    match args[0].as_str() {
        "task" => {
            if let Err(e) = handle_task_command(global, &args[1..]) {
                eprintln!("Lỗi: {:#}", e);
                std::process::exit(1);
            }
            Ok(false)
        }
        "dashboard" => {
            if let Err(e) = dashboard(global) {
                eprintln!("Lỗi: {:#}", e);
                std::process::exit(1);
            }
            Ok(false)
        }
        "user" => {
            if let Err(e) = handle_user_command(global, &args[1..]) {
                eprintln!("Lỗi: {:#}", e);
                std::process::exit(1);
            }
            Ok(false)
        }
        "config" => {
            match args.get(1).map(|s| s.as_str()) {
                None | Some("show") => crate::config::show_config()?,
                Some("user") => {
                    let user = args.get(2..).map(|s| s.join(" ")).unwrap_or_default();
                    crate::config::set_default_user(user)?;
                }
                Some("db") => {
                    let path = args.get(2).ok_or_else(|| anyhow::anyhow!("Cách dùng: dlg config db <đường-dẫn>"))?;
                    crate::config::set_data_file(PathBuf::from(path))?;
                }
                Some("medium-risk") => {
                    let days = args
                        .get(2)
                        .and_then(|s| s.parse::<i64>().ok())
                        .ok_or_else(|| anyhow::anyhow!("Cách dùng: dlg config medium-risk <số-ngày>"))?;
                    crate::config::set_medium_risk_days(days)?;
                }
                Some(other) => {
                    eprintln!("Tùy chọn cấu hình không hợp lệ: {}", other);
                    eprintln!("Các tùy chọn: show, user, db, medium-risk");
                    std::process::exit(1);
                }
            }
            Ok(false)
        }
        "--help" | "-h" | "help" => {
            print_help();
            Ok(false)
        }
        "--version" | "-V" | "-v" => {
            print_version();
            Ok(false)
        }
        _ => {
            eprintln!("Lệnh không hợp lệ: {}", args[0]);
            eprintln!("Dùng 'dlg --help' để xem hướng dẫn");
            std::process::exit(1);
        }
    }
}

/// Resolve the username: `--user`, then config, then the last TUI login
pub fn resolve_user(global: &GlobalArgs, config: &Config) -> Option<String> {
    global
        .user
        .clone()
        .or_else(|| config.default_user.clone())
        .or_else(|| crate::state::load_state().ok().and_then(|s| s.last_user))
        .filter(|u| !u.trim().is_empty())
}

pub fn database_path(global: &GlobalArgs, config: &Config) -> PathBuf {
    global.db.clone().unwrap_or_else(|| config.database_path())
}

/// Open a tracker for the resolved user and database
pub fn open_tracker(global: &GlobalArgs) -> Result<Tracker<JsonFileStore>> {
    let config = crate::config::load_config()?;
    let user = resolve_user(global, &config).ok_or_else(|| {
        anyhow::anyhow!("Chưa chọn người dùng. Dùng --user <tên> hoặc 'dlg config user <tên>'")
    })?;
    let store = JsonFileStore::new(database_path(global, &config));

    let tracker = Tracker::open_with(store, &user, config.recover_corrupt_state)
        .with_context(|| format!("Không mở được dữ liệu của '{}'", user))?
        .with_thresholds(config.thresholds());

    Ok(tracker)
}

// ============================================================================
// Task Commands
// ============================================================================

fn handle_task_command(global: &GlobalArgs, args: &[String]) -> Result<()> {
    let Some(cmd) = args.first().map(|s| s.as_str()) else {
        print_task_usage();
        return Ok(());
    };

    if matches!(cmd, "help" | "--help" | "-h") {
        print_task_usage();
        return Ok(());
    }
    if !TASK_COMMANDS.contains(&cmd) {
        anyhow::bail!("Lệnh task không hợp lệ: {}\nDùng 'dlg task help' để xem hướng dẫn", cmd);
    }

    let mut tracker = open_tracker(global)?;
    run_task_command(&mut tracker, args, today(), &mut io::stdout().lock())
}

const TASK_COMMANDS: [&str; 6] = ["add", "list", "show", "check", "uncheck", "delete"];

/// 在已打开的会话上执行 `task` 子命令，输出写入 `out`
fn run_task_command<S: TaskStore, W: Write>(
    tracker: &mut Tracker<S>,
    args: &[String],
    today: NaiveDate,
    out: &mut W,
) -> Result<()> {
    match args[0].as_str() {
        "add" => {
            let name = leading_words(&args[1..]);
            if name.is_empty() {
                anyhow::bail!("Thiếu tên bài tập\nCách dùng: dlg task add <tên> --deadline YYYY-MM-DD --category <loại>");
            }
            let deadline = parse_flag(&args[1..], "--deadline")
                .ok_or_else(|| anyhow::anyhow!("Thiếu --deadline"))?;
            let category = parse_flag(&args[1..], "--category")
                .ok_or_else(|| anyhow::anyhow!("Thiếu --category"))?;
            task_add(tracker, &name, &deadline, &category, today, out)
        }
        "list" => task_list(tracker, today, out),
        "show" => {
            let index = parse_index(args.get(1), "Cách dùng: dlg task show <số-thứ-tự>")?;
            task_show(tracker, index, today, out)
        }
        "check" | "uncheck" => {
            let usage = "Cách dùng: dlg task check|uncheck <số-thứ-tự> <bước>";
            let index = parse_index(args.get(1), usage)?;
            let step = parse_index(args.get(2), usage)?;
            task_check(tracker, index, step, args[0] == "check", out)
        }
        "delete" => {
            let index = parse_index(args.get(1), "Cách dùng: dlg task delete <số-thứ-tự>")?;
            task_delete(tracker, index, out)
        }
        cmd => anyhow::bail!("Lệnh task không hợp lệ: {}\nDùng 'dlg task help' để xem hướng dẫn", cmd),
    }
}

fn print_task_usage() {
    println!("Deadline Guardian - Lệnh bài tập

CÁCH DÙNG:
    dlg task <LỆNH> [--user <tên>]

LỆNH:
    add <tên> --deadline YYYY-MM-DD --category <loại>
        Tạo bài tập mới và lập kế hoạch theo ngày
        Loại: presentation | essay | exam-prep | short-assignment

    list
        Liệt kê bài tập và tiến độ

    show <số-thứ-tự>
        Xem kế hoạch chi tiết

    check <số-thứ-tự> <bước>
    uncheck <số-thứ-tự> <bước>
        Đánh dấu / bỏ đánh dấu một bước

    delete <số-thứ-tự>
        Xoá bài tập (huy hiệu đã nhận vẫn được giữ)

VÍ DỤ:
    dlg task add Tiểu luận triết học --deadline 2025-01-04 --category essay
    dlg task list
    dlg task check 1 2
    dlg task delete 1");
}

/// Words before the first `--flag`
fn leading_words(args: &[String]) -> String {
    args.iter()
        .take_while(|s| !s.starts_with("--"))
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

fn parse_flag(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|s| s == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

/// 命令行中的编号从 1 开始
fn parse_index(arg: Option<&String>, usage: &str) -> Result<usize> {
    let raw = arg.ok_or_else(|| anyhow::anyhow!("Thiếu tham số\n{}", usage))?;
    match raw.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => anyhow::bail!("Số thứ tự không hợp lệ: {} (bắt đầu từ 1)", raw),
    }
}


fn print_awards<W: Write>(out: &mut W, awards: &[Award]) -> Result<()> {
    for award in awards {
        writeln!(out, "🎉 HOÀN THÀNH \"{}\"! +1 huy hiệu (tổng: {})", award.task_name, award.badges)?;
    }
    Ok(())
}

fn task_add<S: TaskStore, W: Write>(
    tracker: &mut Tracker<S>,
    name: &str,
    deadline: &str,
    category: &str,
    today: NaiveDate,
    out: &mut W,
) -> Result<()> {
    let deadline = parse_date(deadline).ok_or_else(|| GuardianError::InvalidDate(deadline.to_string()))?;
    let category: Category = category.parse()?;

    let index = tracker
        .create_task(name, deadline, category, today)
        .map_err(|e| match e {
            GuardianError::InvalidDeadline { .. } => anyhow::anyhow!("Deadline không hợp lệ! ({})", e),
            other => other.into(),
        })?;

    let task = tracker.task(index)?;
    writeln!(out, "✓ Đã tạo kế hoạch thành công! (#{})", index + 1)?;
    writeln!(out, "  {} | {} | còn {} ngày", task.name, task.category, task.days_left)?;
    for (i, step) in task.plan.iter().enumerate() {
        writeln!(out, "  {}. {} - {}", i + 1, step.date, step.label)?;
    }

    Ok(())
}

fn task_list<S: TaskStore, W: Write>(tracker: &mut Tracker<S>, today: NaiveDate, out: &mut W) -> Result<()> {
    let awards = tracker.refresh()?;
    print_awards(out, &awards)?;

    if tracker.tasks().is_empty() {
        writeln!(out, "Chưa có bài tập nào.")?;
        return Ok(());
    }

    let evaluations = tracker.evaluations(today);

    writeln!(out, "#    TÊN                              LOẠI           DEADLINE    TIẾN ĐỘ          RỦI RO")?;
    writeln!(out, "---  -------------------------------  -------------  ----------  ---------------  -----------")?;

    for (i, (task, eval)) in tracker.tasks().iter().zip(&evaluations).enumerate() {
        writeln!(
            out,
            "{:<3}  {:<31}  {:<13}  {:<10}  {:<15}  {}",
            i + 1,
            truncate(&task.name, 31),
            task.category.display_name(),
            truncate(&task.deadline, 10),
            progress_bar(eval.percent, 10),
            risk_marker(eval.risk)
        )?;
    }

    Ok(())
}

fn task_show<S: TaskStore, W: Write>(
    tracker: &mut Tracker<S>,
    index: usize,
    today: NaiveDate,
    out: &mut W,
) -> Result<()> {
    let awards = tracker.refresh()?;
    print_awards(out, &awards)?;

    let task = tracker.task(index)?;
    let eval = crate::core::evaluate(task, today, tracker.thresholds());
    print_task(out, index, task, &eval)
}

fn print_task<W: Write>(out: &mut W, index: usize, task: &Task, eval: &Evaluation) -> Result<()> {
    writeln!(out, "📌 #{} {}", index + 1, task.name)?;
    writeln!(out, "Loại: {} | Deadline: {}", task.category, task.deadline)?;
    writeln!(out, "{} | {}", eval.countdown.describe(), risk_marker(eval.risk))?;
    writeln!(out)?;

    for (i, step) in task.plan.iter().enumerate() {
        let mark = if step.done { "[x]" } else { "[ ]" };
        writeln!(out, "  {} {}. {} - {}", mark, i + 1, step.date, step.label)?;
    }

    writeln!(out)?;
    writeln!(out, "Tiến độ: {} ({}/{})", progress_bar(eval.percent, 20), eval.completed, eval.total)?;
    if eval.is_complete() {
        writeln!(out, "🎉 HOÀN THÀNH!")?;
    }
    Ok(())
}

fn task_check<S: TaskStore, W: Write>(
    tracker: &mut Tracker<S>,
    index: usize,
    step: usize,
    done: bool,
    out: &mut W,
) -> Result<()> {
    let award = tracker.set_step_done(index, step, done)?;
    let task = tracker.task(index)?;
    let label = &task.plan[step].label;

    if done {
        writeln!(out, "✓ Đã xong: {} - {}", task.name, label)?;
    } else {
        writeln!(out, "○ Chưa xong: {} - {}", task.name, label)?;
    }

    print_awards(out, award.as_slice())
}

fn task_delete<S: TaskStore, W: Write>(tracker: &mut Tracker<S>, index: usize, out: &mut W) -> Result<()> {
    let task = tracker.remove(index)?;
    writeln!(out, "🗑 Đã xoá bài \"{}\"", task.name)?;
    Ok(())
}

fn dashboard(global: &GlobalArgs) -> Result<()> {
    let mut tracker = open_tracker(global)?;
    print_dashboard(&mut tracker, &mut io::stdout().lock())
}

fn print_dashboard<S: TaskStore, W: Write>(tracker: &mut Tracker<S>, out: &mut W) -> Result<()> {
    let awards = tracker.refresh()?;
    print_awards(out, &awards)?;

    let dashboard = tracker.dashboard();

    writeln!(out, "📊 Dashboard - {}", tracker.username())?;
    writeln!(out, "  🏆 Huy hiệu:        {}", dashboard.badges)?;
    if let Some(title) = dashboard.level.title() {
        writeln!(out, "  🎖 Danh hiệu:       {}", title)?;
    }
    writeln!(out, "  📚 Tổng bài tập:    {}", dashboard.total_tasks)?;
    writeln!(out, "  ✅ Đã hoàn thành:   {}", dashboard.completed_tasks)?;
    writeln!(out, "  🔴 Bài gấp:         {}", dashboard.urgent_tasks)?;

    Ok(())
}

// ============================================================================
// User Commands
// ============================================================================

fn handle_user_command(global: &GlobalArgs, args: &[String]) -> Result<()> {
    match args.first().map(|s| s.as_str()) {
        None | Some("list") => user_list(global),
        Some(cmd) => anyhow::bail!("Lệnh user không hợp lệ: {}\nCách dùng: dlg user list", cmd),
    }
}

/// 只读列出用户，不会创建新用户
fn user_list(global: &GlobalArgs) -> Result<()> {
    let config = crate::config::load_config()?;
    let store = JsonFileStore::new(database_path(global, &config));
    let db = store.load()?;

    let mut out = io::stdout().lock();
    print_users(&mut out, &db)?;
    writeln!(out, "\nTệp dữ liệu: {}", store.path().display())?;
    Ok(())
}

fn print_users<W: Write>(out: &mut W, db: &Database) -> Result<()> {
    if db.is_empty() {
        writeln!(out, "Chưa có người dùng nào.")?;
        return Ok(());
    }

    writeln!(out, "NGƯỜI DÙNG                 BÀI TẬP  HUY HIỆU")?;
    writeln!(out, "-------------------------  -------  --------")?;
    for user in db.summaries() {
        writeln!(out, "{:<25}  {:<7}  {}", truncate(&user.name, 25), user.tasks, user.badges)?;
    }

    Ok(())
}

// ============================================================================
// Formatting
// ============================================================================

pub fn progress_bar(percent: u8, width: usize) -> String {
    let filled = (percent as usize * width) / 100;
    format!(
        "{}{} {:>3}%",
        "█".repeat(filled),
        "░".repeat(width - filled),
        percent
    )
}

fn risk_marker(risk: Risk) -> String {
    let icon = match risk {
        Risk::High => "🔴",
        Risk::Medium => "🟡",
        Risk::Safe => "🟢",
    };
    format!("{} {}", icon, risk.label())
}

/// `Countdown` 在列表里的简短显示
pub fn countdown_short(countdown: Countdown) -> String {
    match countdown {
        Countdown::Remaining(days) => format!("{}d", days),
        Countdown::Invalid => "?".to_string(),
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        format!("{}...", s.chars().take(max_len - 3).collect::<String>())
    }
}

/// 打印帮助信息
fn print_help() {
    println!("Deadline Guardian (dlg) - Trợ lý bảo vệ bạn khỏi trễ deadline\n");
    println!("Cách dùng:");
    println!("  dlg                        Mở giao diện dashboard (TUI)");
    println!("  dlg <lệnh> [tham số]       Chạy lệnh CLI");
    println!("  dlg --help                 Hiển thị hướng dẫn");
    println!("  dlg --version              Hiển thị phiên bản\n");

    println!("Lệnh:");
    println!("  task                       Quản lý bài tập (dlg task help)");
    println!("  dashboard                  Tổng quan huy hiệu và bài gấp");
    println!("  user list                  Liệt kê người dùng");
    println!("  config [show|user|db|medium-risk]  Cấu hình\n");

    println!("Tham số chung:");
    println!("  --user, -u <tên>           Người dùng (mặc định: config hoặc lần đăng nhập trước)");
    println!("  --db <đường-dẫn>           Tệp dữ liệu JSON");
    println!("  --verbose                  Ghi log chi tiết vào {}\n", crate::logging::get_log_path().display());

    println!("Ví dụ:");
    println!("  dlg --user An task add Slide nhóm --deadline 2025-03-10 --category presentation");
    println!("  dlg task check 1 1");
    println!("  dlg dashboard");
}

/// 打印版本信息
fn print_version() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const NAME: &str = env!("CARGO_PKG_NAME");
    println!("{} {}", NAME, VERSION);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryStore;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_global_args_anywhere() {
        let global = parse_global_args(&args(&[
            "dlg", "task", "--user", "An", "list", "--db", "/tmp/x.json", "--verbose",
        ]));

        assert_eq!(global.user.as_deref(), Some("An"));
        assert_eq!(global.db, Some(PathBuf::from("/tmp/x.json")));
        assert!(global.verbose);
        assert_eq!(global.rest, args(&["task", "list"]));
    }

    #[test]
    fn test_no_args_means_tui() {
        let global = parse_global_args(&args(&["dlg", "-u", "Lan"]));
        assert!(global.rest.is_empty());
        assert!(handle_cli(&global).unwrap());
    }

    #[test]
    fn test_leading_words_and_flags() {
        let rest = args(&["Tiểu", "luận", "--deadline", "2025-01-04", "--category", "essay"]);
        assert_eq!(leading_words(&rest), "Tiểu luận");
        assert_eq!(parse_flag(&rest, "--deadline").as_deref(), Some("2025-01-04"));
        assert_eq!(parse_flag(&rest, "--category").as_deref(), Some("essay"));
        assert_eq!(parse_flag(&rest, "--missing"), None);
    }

    #[test]
    fn test_parse_index_is_one_based() {
        assert_eq!(parse_index(Some(&"1".to_string()), "").unwrap(), 0);
        assert_eq!(parse_index(Some(&"3".to_string()), "").unwrap(), 2);
        assert!(parse_index(Some(&"0".to_string()), "").is_err());
        assert!(parse_index(Some(&"x".to_string()), "").is_err());
        assert!(parse_index(None, "").is_err());
    }

    #[test]
    fn test_resolve_user_prefers_flag() {
        let config = Config {
            default_user: Some("config-user".to_string()),
            ..Config::default()
        };
        let global = GlobalArgs {
            user: Some("flag-user".to_string()),
            ..GlobalArgs::default()
        };
        assert_eq!(resolve_user(&global, &config).as_deref(), Some("flag-user"));
        assert_eq!(
            resolve_user(&GlobalArgs::default(), &config).as_deref(),
            Some("config-user")
        );
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0, 4), "░░░░   0%");
        assert_eq!(progress_bar(66, 3), "█░░  66%");
        assert_eq!(progress_bar(100, 4), "████ 100%");
    }

    #[test]
    fn test_truncate_unicode() {
        assert_eq!(truncate("Ôn thi", 10), "Ôn thi");
        assert_eq!(truncate("Chuẩn bị thuyết trình", 10), "Chuẩn b...");
    }

    #[test]
    fn test_countdown_short() {
        assert_eq!(countdown_short(Countdown::Remaining(3)), "3d");
        assert_eq!(countdown_short(Countdown::Invalid), "?");
    }

    fn session() -> Tracker<MemoryStore> {
        Tracker::open(MemoryStore::default(), "an").unwrap()
    }

    fn run(tracker: &mut Tracker<MemoryStore>, argv: &[&str]) -> Result<String> {
        let mut out = Vec::new();
        let today = parse_date("2024-01-01").unwrap();
        run_task_command(tracker, &args(argv), today, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_task_add_prints_plan() {
        let mut tracker = session();
        let out = run(
            &mut tracker,
            &["add", "Tiểu", "luận", "--deadline", "2024-01-04", "--category", "essay"],
        )
        .unwrap();

        assert!(out.contains("#1"));
        assert!(out.contains("1. 2024-01-01"));
        assert!(out.contains("3. 2024-01-03"));
        assert_eq!(tracker.tasks()[0].name, "Tiểu luận");
        assert_eq!(tracker.tasks()[0].category, Category::Essay);
    }

    #[test]
    fn test_task_add_rejects_bad_input() {
        let mut tracker = session();

        let err = run(&mut tracker, &["add", "Late", "--deadline", "2024-01-01", "--category", "essay"])
            .unwrap_err();
        assert!(err.to_string().starts_with("Deadline không hợp lệ!"));

        let err = run(&mut tracker, &["add", "X", "--deadline", "04/01/2024", "--category", "essay"])
            .unwrap_err();
        assert!(matches!(err.downcast_ref::<GuardianError>(), Some(GuardianError::InvalidDate(_))));

        let err = run(&mut tracker, &["add", "X", "--deadline", "2024-01-04", "--category", "poem"])
            .unwrap_err();
        assert!(matches!(err.downcast_ref::<GuardianError>(), Some(GuardianError::InvalidCategory(_))));

        assert!(run(&mut tracker, &["add", "X", "--category", "essay"]).is_err());
        assert!(tracker.tasks().is_empty());
    }

    #[test]
    fn test_task_check_uses_one_based_indexes() {
        let mut tracker = session();
        tracker
            .create_task("Talk", parse_date("2024-01-10").unwrap(), Category::Presentation, parse_date("2024-01-01").unwrap())
            .unwrap();

        let out = run(&mut tracker, &["check", "1", "2"]).unwrap();
        assert!(out.starts_with("✓ Đã xong: Talk"));
        assert!(!tracker.tasks()[0].plan[0].done);
        assert!(tracker.tasks()[0].plan[1].done);

        run(&mut tracker, &["uncheck", "1", "2"]).unwrap();
        assert!(!tracker.tasks()[0].plan[1].done);

        assert!(run(&mut tracker, &["check", "0", "1"]).is_err());
        let err = run(&mut tracker, &["check", "1", "6"]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GuardianError>(),
            Some(GuardianError::StepNotFound { task: 0, step: 5 })
        ));
    }

    #[test]
    fn test_task_check_announces_badge() {
        let mut tracker = session();
        tracker
            .create_task("Quiz", parse_date("2024-01-02").unwrap(), Category::ShortAssignment, parse_date("2024-01-01").unwrap())
            .unwrap();

        let out = run(&mut tracker, &["check", "1", "1"]).unwrap();
        assert!(out.contains("🎉 HOÀN THÀNH \"Quiz\"! +1 huy hiệu (tổng: 1)"));
    }

    #[test]
    fn test_task_delete_and_list() {
        let mut tracker = session();
        let today = parse_date("2024-01-01").unwrap();
        tracker.create_task("A", parse_date("2024-01-03").unwrap(), Category::Essay, today).unwrap();
        tracker.create_task("B", parse_date("2024-01-09").unwrap(), Category::Essay, today).unwrap();

        let out = run(&mut tracker, &["delete", "2"]).unwrap();
        assert!(out.contains("\"B\""));
        assert_eq!(tracker.tasks().len(), 1);
        assert!(matches!(
            run(&mut tracker, &["delete", "2"]).unwrap_err().downcast_ref::<GuardianError>(),
            Some(GuardianError::TaskNotFound(1))
        ));

        let out = run(&mut tracker, &["list"]).unwrap();
        assert!(out.contains("Nguy cơ cao"));
        run(&mut tracker, &["delete", "1"]).unwrap();
        assert_eq!(run(&mut tracker, &["list"]).unwrap(), "Chưa có bài tập nào.\n");
    }

    #[test]
    fn test_print_users() {
        let mut db = Database::default();
        let mut out = Vec::new();
        print_users(&mut out, &db).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Chưa có người dùng nào.\n");

        db.provision("an");
        db.get_mut("an").unwrap().badges = 3;
        let mut out = Vec::new();
        print_users(&mut out, &db).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.lines().last().unwrap().starts_with("an "));
        assert!(out.trim_end().ends_with('3'));
    }

    #[test]
    fn test_print_dashboard() {
        let mut tracker = session();
        let today = parse_date("2024-01-01").unwrap();
        tracker.create_task("Quiz", parse_date("2024-01-02").unwrap(), Category::ShortAssignment, today).unwrap();

        let mut out = Vec::new();
        print_dashboard(&mut tracker, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Dashboard - an"));
        assert!(out.contains("Bài gấp:         1"));
    }
}
