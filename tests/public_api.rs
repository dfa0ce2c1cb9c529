#![allow(unused_imports)]

use exfuz::{
    decode, is_self_describing, Action, ActionKind, Candidate, CandidateSearch, Candidates, Caret,
    EnvConfig, Error, KeyId, KeyMap, KeyMapConfig, KeyReader, LoadProgress, LoadStatus,
    ProcessSurface, Query, ReadMode, RecordingSurface, Result, Screen, ScreenSettings,
    ScreenState, SearchCommand, SourceName, StaticSearch, Status, Surface, SurfaceOp,
};

#[test]
fn public_api_exports_compile() {}

#[test]
fn screen_accepts_any_surface_status_and_search() {
    fn build<S: Surface, St: Status, C: SearchCommand>(surface: S, status: St, search: C) -> Screen<S, St, C> {
        Screen::new(surface, status, search).with_settings(ScreenSettings::default())
    }

    let screen = build(RecordingSurface::new(10), LoadStatus::new(0), StaticSearch::default());
    assert_eq!(screen.state(), ScreenState::Uninitialized);
    assert_eq!(screen.keymap().len(), 6);
}
