use std::fs;
use std::path::PathBuf;

use pretty_assertions::assert_eq;

use exfuz::search::spawn_loader;
use exfuz::{
    Caret, CandidateSearch, Candidates, LoadStatus, RecordingSurface, Screen, ScreenState,
    SearchCommand, SourceName, Status, SurfaceOp,
};

fn drive<St: Status, C: SearchCommand>(screen: &mut Screen<RecordingSurface, St, C>, units: &[u8]) {
    screen.surface_mut().push_input(units);
    while screen.surface().pending_input() > 0 && !screen.is_closed() {
        screen.wait_input().expect("wait_input");
    }
}

fn written(ops: &[SurfaceOp]) -> Vec<String> {
    ops.iter()
        .filter_map(|op| match op {
            SurfaceOp::Write(text) => Some(text.trim_end().to_string()),
            _ => None,
        })
        .collect()
}

struct Books {
    _dir: tempfile::TempDir,
    paths: Vec<PathBuf>,
}

fn books() -> Books {
    let dir = tempfile::tempdir().expect("tempdir");
    let fruit = dir.path().join("fruit.txt");
    let more = dir.path().join("more.txt");
    fs::write(&fruit, "apple pie\nbanana\n").expect("write fruit");
    fs::write(&more, "grape\napricot\n").expect("write more");
    Books {
        _dir: dir,
        paths: vec![fruit, more],
    }
}

#[test]
fn background_load_is_picked_up_once() {
    let books = books();
    let status = LoadStatus::new(books.paths.len());
    let candidates = Candidates::new();
    let mut screen = Screen::new(
        RecordingSurface::new(40),
        status.clone(),
        CandidateSearch::new(candidates.clone()),
    );
    screen.init().expect("init");
    assert!(screen.surface().line(0).ends_with("[0/2]"));
    assert!(!screen.changed_state());

    let lines = spawn_loader(books.paths.clone(), candidates.clone(), status.progress())
        .join()
        .expect("loader thread");
    assert_eq!(lines, 4);
    assert_eq!(candidates.len(), 4);

    assert!(screen.changed_state());
    screen.rerender().expect("rerender");
    assert!(!screen.changed_state());
    assert!(screen.surface().line(0).ends_with("[2/2]"));
}

#[test]
fn search_streams_filtered_candidates_in_order() {
    let books = books();
    let status = LoadStatus::new(books.paths.len());
    let candidates = Candidates::new();
    spawn_loader(books.paths.clone(), candidates.clone(), status.progress())
        .join()
        .expect("loader thread");

    let mut screen = Screen::new(
        RecordingSurface::new(160),
        status,
        CandidateSearch::new(candidates),
    );
    screen.init().expect("init");
    drive(&mut screen, b"ap");
    screen.surface_mut().take_ops();

    drive(&mut screen, &[0x12]);

    let ops = screen.surface_mut().take_ops();
    let clear_at = ops
        .iter()
        .position(|op| *op == SurfaceOp::Clear)
        .expect("search clears the screen");
    let fruit = SourceName::new(&books.paths[0]).relative_path();
    let more = SourceName::new(&books.paths[1]).relative_path();
    assert_eq!(
        written(&ops[..clear_at]),
        vec![
            format!("0:{fruit}:1:apple pie"),
            format!("2:{more}:1:grape"),
            format!("3:{more}:2:apricot"),
        ]
    );
    assert_eq!(ops[clear_at + 1], SurfaceOp::InitScreen);
    assert_eq!(screen.state(), ScreenState::Ready);
    assert_eq!(screen.surface().line(0).trim_end_matches("[2/2]").trim_end(), "ap");
}

#[test]
fn capped_search_stops_early() {
    let books = books();
    let status = LoadStatus::new(books.paths.len());
    let candidates = Candidates::new();
    spawn_loader(books.paths.clone(), candidates.clone(), status.progress())
        .join()
        .expect("loader thread");

    let search = CandidateSearch::new(candidates).with_max_results(Some(1));
    let mut screen = Screen::new(RecordingSurface::new(160), status, search);
    screen.init().expect("init");
    drive(&mut screen, b"a");
    screen.surface_mut().take_ops();

    drive(&mut screen, &[0x12]);

    let ops = screen.surface().ops().to_vec();
    let clear_at = ops.iter().position(|op| *op == SurfaceOp::Clear).expect("clear");
    assert_eq!(written(&ops[..clear_at]).len(), 1);
}

#[test]
fn full_session_from_first_key_to_finish() {
    let status = LoadStatus::new(1);
    let progress = status.progress();
    let mut screen = Screen::new(
        RecordingSurface::new(20),
        status,
        CandidateSearch::new(Candidates::new()),
    )
    .with_caret(Caret::new(0, 0));

    progress.advance();
    let surface = screen.surface_mut();
    surface.push_input(b"xyz");
    surface.push_input(b"\x1b[D\x1b[D\x7f");
    surface.push_idle();
    surface.push_input(&[0x05]);
    screen.run().expect("run");

    assert!(screen.is_closed());
    assert_eq!(screen.query().text(), "yz");
    assert_eq!(screen.query().caret(), Caret::new(0, 0));
    assert_eq!(screen.surface().line(0), "yz             [1/1]");
    assert_eq!(screen.surface().ops().last(), Some(&SurfaceOp::CloseScreen));
}
