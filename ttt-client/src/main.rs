use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use ttt_client::command::HELP;
use ttt_client::render::{render_game, render_scores};
use ttt_client::{Command, GameSession, GameSettings, SessionError, SessionEvent};

#[tokio::main]
async fn main() -> Result<()> {
    let mut settings = GameSettings::load();

    // 初始化日志（RUST_LOG 优先于设置文件）
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(settings.log_level.directive()))?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    info!("井字棋启动中...");

    let default_mode = settings.default_mode;
    let (mut session, mut replies) = GameSession::new(settings.clone());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", HELP);
    session.start(default_mode);
    print_game(&session);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<Command>() {
                    Ok(Command::Quit) => break,
                    Ok(command) => handle_command(&mut session, &mut settings, command),
                    Err(e) => println!("{}", e),
                }
            }
            Some(reply) = replies.recv() => {
                if let Some(event) = session.handle_ai_reply(reply) {
                    print_event(&session, event);
                }
            }
        }
    }

    info!("井字棋退出");
    Ok(())
}

fn handle_command(session: &mut GameSession, settings: &mut GameSettings, command: Command) {
    match command {
        Command::Start(mode) => {
            session.start(mode);
            print_game(session);
        }
        Command::Play(mv) => match session.play(mv) {
            Ok(event) => print_event(session, event),
            Err(SessionError::NoGame) => println!("请先输入 classic 或 ultimate 开始对局"),
            Err(e) => println!("{}", e),
        },
        Command::Difficulty(difficulty) => {
            session.set_difficulty(difficulty);
            settings.default_difficulty = difficulty;
            save_settings(settings);
            println!("难度: {}", difficulty.display_name());
        }
        Command::Symbol(symbol) => {
            session.set_human(symbol);
            settings.human_symbol = symbol;
            save_settings(settings);
            println!("玩家符号: {}（下一局生效）", symbol);
        }
        Command::Scores => println!("{}", render_scores(session.scores())),
        Command::Reset => {
            session.reset();
            println!("已回到菜单，{}", render_scores(session.scores()));
        }
        Command::Help => println!("{}", HELP),
        Command::Quit => {}
    }
}

fn save_settings(settings: &GameSettings) {
    if let Err(e) = settings.save() {
        tracing::warn!("保存设置失败: {:#}", e);
    }
}

fn print_game(session: &GameSession) {
    if let Some(game) = session.game() {
        println!("{}", render_game(game, session.is_ai_thinking()));
    }
}

fn print_event(session: &GameSession, event: SessionEvent) {
    print_game(session);
    if let SessionEvent::Finished { .. } = event {
        println!("{}", render_scores(session.scores()));
        println!("输入 classic 或 ultimate 再来一局");
    }
}
