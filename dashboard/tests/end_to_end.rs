//! Drives the dashboard through the real `ureq` transport against the mock
//! server on a random port.

use std::io::{self, Cursor, Write};
use std::sync::atomic::Ordering;
use std::sync::Arc;

use clap::Parser;
use mock_server::{sample_users, AppState};
use parking_lot::Mutex;
use users_core::{Shell, SyncState, UserId};
use users_dashboard::commands::Command;
use users_dashboard::repl::{self, Flow};
use users_dashboard::{Cli, Console};

fn start_server(state: AppState) -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::serve(listener, state).await
        })
        .unwrap();
    });
    format!("http://{addr}")
}

fn shell(base_url: &str, confirm: Arc<dyn users_core::Confirm>) -> Shell {
    Cli::try_parse_from(["users-dashboard", "--base-url", base_url, "--resource", "users"])
        .unwrap()
        .build_shell(confirm)
        .unwrap()
}

async fn run(shell: &mut Shell, line: &str) -> Flow {
    repl::execute(shell, Command::parse(line).unwrap()).await.unwrap()
}

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Captured {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

#[tokio::test]
async fn create_edit_delete_round_trip() {
    let url = start_server(AppState::seeded(sample_users()));
    let mut shell = shell(&url, Arc::new(|_: &str| true));
    shell.start().await;
    assert_eq!(shell.dashboard().records().len(), 3);

    assert_eq!(run(&mut shell, "add name=Ann Lee email=ann@x.com").await, Flow::Continue);
    let records = shell.dashboard().records();
    assert_eq!(records.len(), 4);
    assert_eq!(records[3].user.id, UserId::Number(4));
    assert_eq!(records[3].state, SyncState::Confirmed);
    assert_eq!(records[3].user.username, "annlee");
    assert!(shell.dashboard().form().values().name.is_empty());

    run(&mut shell, "edit 4").await;
    run(&mut shell, "set phone=555-0100").await;
    run(&mut shell, "save").await;
    assert_eq!(shell.dashboard().records()[3].user.phone, "555-0100");
    assert!(shell.dashboard().editing().is_none());
    assert_eq!(shell.dashboard().error(), None);

    run(&mut shell, "delete 4").await;
    run(&mut shell, "refresh").await;
    let names: Vec<String> = shell.dashboard().records().into_iter().map(|r| r.user.name).collect();
    assert_eq!(names, ["Leanne Graham", "Ervin Howell", "Clementine Bauch"]);
}

#[tokio::test]
async fn failed_create_keeps_unsaved_row() {
    let state = AppState::default();
    state.faults.create.store(true, Ordering::SeqCst);
    let url = start_server(state);
    let mut shell = shell(&url, Arc::new(|_: &str| true));
    shell.start().await;

    run(&mut shell, "add name=Bo Diaz email=bo@x.com").await;
    let records = shell.dashboard().records();
    assert_eq!(records.len(), 1);
    assert!(records[0].is_pending());
    assert_eq!(
        shell.dashboard().error().as_deref(),
        Some("User created locally but not saved to server.")
    );
    assert!(shell.render().contains("(unsaved)"));

    let temp = records[0].user.id.to_string();
    run(&mut shell, &format!("delete {temp}")).await;
    assert!(shell.dashboard().records().is_empty());
}

#[tokio::test]
async fn rejected_update_is_applied_locally() {
    let state = AppState::seeded(sample_users());
    state.faults.update.store(true, Ordering::SeqCst);
    let url = start_server(state);
    let mut shell = shell(&url, Arc::new(|_: &str| true));
    shell.start().await;

    run(&mut shell, "edit 2").await;
    run(&mut shell, "set name=Ervin H.").await;
    run(&mut shell, "save").await;
    assert_eq!(shell.dashboard().records()[1].user.name, "Ervin H.");
    assert_eq!(
        shell.dashboard().error().as_deref(),
        Some("Changes saved locally; the server did not confirm the update.")
    );

    run(&mut shell, "dismiss").await;
    assert_eq!(shell.dashboard().error(), None);
}

#[tokio::test]
async fn scripted_session_confirms_through_console() {
    let url = start_server(AppState::seeded(sample_users()));
    let output = Captured::default();
    let script = "view 2\nback\ndelete 1\nn\ndelete 1\ny\nbogus\nquit\n";
    let console = Arc::new(Console::new(Cursor::new(script), output.clone()));
    let mut shell = shell(&url, console.clone());

    repl::run(&mut shell, &console, None).await.unwrap();

    let text = output.text();
    assert!(text.contains("User Details"));
    assert!(text.contains("Shanna@melissa.tv"));
    assert!(text.contains("Are you sure you want to delete this user? [y/N]"));
    assert!(text.contains("unknown command 'bogus'"));
    let ids: Vec<UserId> = shell.dashboard().records().into_iter().map(|r| r.user.id).collect();
    assert_eq!(ids, [UserId::Number(2), UserId::Number(3)]);
}

#[tokio::test]
async fn unreachable_server_shows_load_banner() {
    let mut shell = shell("http://127.0.0.1:9", Arc::new(|_: &str| true));
    shell.start().await;
    assert!(!shell.dashboard().is_loading());
    assert_eq!(
        shell.dashboard().error().as_deref(),
        Some("Failed to load users. Please try again later.")
    );
    assert!(shell.render().contains("No users found"));
}
