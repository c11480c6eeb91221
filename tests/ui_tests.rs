//! UI-related tests for ie
//!
//! These render a headless [Session] into ratatui's `TestBackend` and check what lands
//! on screen: the header, listing rows, status line, prompts and popups.
//!
//! Temporary directories are created for each test and cleaned up afterwards.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ie_tui::app::Session;
use ie_tui::config::Config;
use ie_tui::core::fm;
use ie_tui::ui;

use ratatui::{Terminal, backend::TestBackend};
use std::error;
use std::fs::{self, File};
use tempfile::tempdir;

type TestResult = Result<(), Box<dyn error::Error>>;

fn draw(
    session: &mut Session,
    width: u16,
    height: u16,
) -> Result<Vec<String>, Box<dyn error::Error>> {
    let mut terminal = Terminal::new(TestBackend::new(width, height))?;
    session.synchronize();
    terminal.draw(|f| ui::render(f, session))?;

    let buf = terminal.backend().buffer();
    Ok((0..buf.area.height)
        .map(|y| {
            (0..buf.area.width)
                .map(|x| buf[(x, y)].symbol())
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect())
}

fn press(session: &mut Session, code: KeyCode) {
    session.handle_keypress(KeyEvent::new(code, KeyModifiers::NONE));
}

#[test]
fn header_listing_and_status_line() -> TestResult {
    let tmp = tempdir()?;
    File::create(tmp.path().join("a.txt"))?;
    fs::create_dir(tmp.path().join("dir"))?;
    let path = fm::resolve_dir(tmp.path())?;

    let config = Config::default();
    let mut session = Session::new(&config, path.clone());
    let screen = draw(&mut session, 160, 10)?;

    let header = format!(
        "(I)nteractive.(E)xplorer-v{} list. {}",
        env!("CARGO_PKG_VERSION"),
        path.display()
    );
    assert_eq!(screen[0], header);

    // `.` is selected and carries its resolved absolute path.
    assert!(screen[1].starts_with("    d"), "{}", screen[1]);
    assert!(
        screen[1].ends_with(&format!(".  {}", path.display())),
        "{}",
        screen[1]
    );
    assert!(screen[2].ends_with(" .."), "{}", screen[2]);
    assert!(screen[3].ends_with(" a.txt"), "{}", screen[3]);
    assert!(screen[4].ends_with(" dir"), "{}", screen[4]);

    assert_eq!(screen[9], "2 items  (1 dirs)  [1/4]");
    Ok(())
}

#[test]
fn parent_row_shows_resolved_parent_path() -> TestResult {
    let tmp = tempdir()?;
    fs::create_dir(tmp.path().join("inner"))?;
    let inner = fm::resolve_dir(&tmp.path().join("inner"))?;
    let parent = inner.parent().ok_or("no parent")?.to_path_buf();

    let config = Config::default();
    let mut session = Session::new(&config, inner);
    session.synchronize();
    press(&mut session, KeyCode::Char('j'));

    let screen = draw(&mut session, 160, 6)?;
    assert!(
        screen[2].ends_with(&format!("..  {}", parent.display())),
        "{}",
        screen[2]
    );
    Ok(())
}

#[test]
fn marked_rows_show_marker() -> TestResult {
    let tmp = tempdir()?;
    File::create(tmp.path().join("one"))?;
    File::create(tmp.path().join("two"))?;

    let config = Config::default();
    let mut session = Session::new(&config, fm::resolve_dir(tmp.path())?);
    session.synchronize();
    press(&mut session, KeyCode::Char('m'));

    let screen = draw(&mut session, 160, 8)?;
    assert!(screen[1].starts_with("    "));
    assert!(screen[3].starts_with("<M> "));
    assert!(screen[4].starts_with("<M> "));
    assert!(screen[7].ends_with("2 MARKED (u to unmark)"), "{}", screen[7]);
    Ok(())
}

#[test]
fn search_prompt_is_on_status_line() -> TestResult {
    let tmp = tempdir()?;
    let config = Config::default();
    let mut session = Session::new(&config, fm::resolve_dir(tmp.path())?);
    session.synchronize();

    press(&mut session, KeyCode::Char('/'));
    for c in "lo".chars() {
        press(&mut session, KeyCode::Char(c));
    }

    let screen = draw(&mut session, 80, 6)?;
    assert_eq!(screen[5], "Query: lo");
    Ok(())
}

#[test]
fn rename_prompt_sits_after_the_name() -> TestResult {
    let tmp = tempdir()?;
    File::create(tmp.path().join("target"))?;

    let config = Config::default();
    let mut session = Session::new(&config, fm::resolve_dir(tmp.path())?);
    session.synchronize();
    press(&mut session, KeyCode::Char('G'));
    press(&mut session, KeyCode::Char('r'));

    let screen = draw(&mut session, 160, 6)?;
    assert!(screen[3].ends_with(" target Rename:"), "{}", screen[3]);
    Ok(())
}

#[test]
fn delete_confirmation_lists_targets() -> TestResult {
    let tmp = tempdir()?;
    File::create(tmp.path().join("victim"))?;

    let config = Config::default();
    let mut session = Session::new(&config, fm::resolve_dir(tmp.path())?);
    session.synchronize();
    press(&mut session, KeyCode::Char('G'));
    press(&mut session, KeyCode::Char('d'));

    let screen = draw(&mut session, 80, 20)?.join("\n");
    assert!(screen.contains("Confirm Delete"));
    assert!(screen.contains("victim"));
    assert!(screen.contains("Delete? [Y/n]"));
    Ok(())
}

#[test]
fn second_buffer_is_shown_in_header() -> TestResult {
    let tmp = tempdir()?;
    let config = Config::default();
    let mut session = Session::new(&config, fm::resolve_dir(tmp.path())?);
    session.synchronize();

    session.handle_keypress(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL));
    let pending = draw(&mut session, 160, 5)?;
    assert_eq!(pending[4], "C-x-");

    press(&mut session, KeyCode::Char('c'));
    let screen = draw(&mut session, 160, 5)?;
    assert!(screen[0].ends_with("[buf 2/2]"), "{}", screen[0]);
    Ok(())
}

#[test]
fn empty_listing_placeholder() -> TestResult {
    let tmp = tempdir()?;
    let gone = tmp.path().join("gone");
    fs::create_dir(&gone)?;
    let gone = fm::resolve_dir(&gone)?;

    let config = Config::default();
    let mut session = Session::new(&config, gone.clone());
    fs::remove_dir(&gone)?;

    let screen = draw(&mut session, 80, 5)?;
    assert_eq!(screen[1], "    [Empty]");
    Ok(())
}
