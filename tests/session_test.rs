//! Tests for the session state machine.

use icebound::{
    Board, Difficulty, Direction, MOVE_TIME_PER_TILE, Position, ResetOutcome, Session,
    SessionState,
};
use std::collections::HashSet;

fn open_board(id: &str) -> Board {
    // 9x9, ring walls only, start (1,1), end (7,7).
    Board::new(
        9,
        9,
        Position::new(1, 1),
        Position::new(7, 7),
        HashSet::new(),
        id.to_string(),
    )
}

fn rocky_board(id: &str, rocks: &[(i32, i32)]) -> Board {
    let obstacles = rocks
        .iter()
        .map(|&(col, row)| Position::new(col, row))
        .collect::<HashSet<_>>();
    Board::new(
        9,
        9,
        Position::new(1, 1),
        Position::new(7, 7),
        obstacles,
        id.to_string(),
    )
}

fn ready_session(board: Board) -> Session {
    let mut session = Session::new(Difficulty::Easy);
    let token = session.begin_request(Difficulty::Easy);
    session.apply_level_outcome(token, Ok(board));
    assert_eq!(session.state(), SessionState::Ready);
    session
}

#[test]
fn lifecycle_idle_loading_ready() {
    let mut session = Session::new(Difficulty::Easy);
    assert_eq!(session.state(), SessionState::Idle);

    let token = session.begin_request(Difficulty::Easy);
    assert_eq!(session.state(), SessionState::Loading);

    session.apply_level_outcome(token, Ok(open_board("lvl-1")));
    assert_eq!(session.state(), SessionState::Ready);
    assert_eq!(session.player(), Position::new(1, 1));
}

#[test]
fn slide_right_crosses_the_open_board() {
    let mut session = ready_session(open_board("lvl-1"));

    let pending = session
        .move_player(Direction::Right)
        .expect("move should start");
    assert_eq!(pending.target, Position::new(7, 1));
    assert_eq!(session.player(), Position::new(7, 1));

    // 6 tiles of travel on the reference-width board.
    let expected = 6.0 * MOVE_TIME_PER_TILE;
    assert!((pending.duration.as_secs_f32() - expected).abs() < 1e-5);
}

#[test]
fn slide_stops_one_tile_before_a_rock() {
    let mut session = ready_session(rocky_board("lvl-rock", &[(3, 1)]));

    let pending = session
        .move_player(Direction::Right)
        .expect("move should start");
    assert_eq!(pending.target, Position::new(2, 1));
}

#[test]
fn animation_speed_scales_with_board_size() {
    // An 18-wide board halves the per-tile time.
    let board = Board::new(
        9,
        18,
        Position::new(1, 1),
        Position::new(16, 7),
        HashSet::new(),
        "wide".to_string(),
    );
    let mut session = ready_session(board);

    let pending = session
        .move_player(Direction::Right)
        .expect("move should start");
    let steps = 15.0;
    let expected = steps * (MOVE_TIME_PER_TILE / 2.0);
    assert!((pending.duration.as_secs_f32() - expected).abs() < 1e-5);
}

#[test]
fn moves_are_rejected_while_animating() {
    let mut session = ready_session(open_board("lvl-1"));

    session
        .move_player(Direction::Right)
        .expect("move should start");
    let position = session.player();

    assert!(session.move_player(Direction::Down).is_none());
    assert_eq!(session.player(), position);
    assert!(session.animating());

    session.finish_move();
    assert!(!session.animating());
    assert!(session.move_player(Direction::Down).is_some());
}

#[test]
fn blocked_first_step_is_a_no_op() {
    let mut session = ready_session(rocky_board("lvl-wall", &[(2, 1)]));

    assert!(session.move_player(Direction::Right).is_none());
    assert!(session.move_player(Direction::Up).is_none());
    assert!(!session.animating());
}

#[test]
fn reaching_the_goal_wins_exactly_once() {
    let mut session = ready_session(open_board("lvl-1"));

    // Right to (7,1), then down to (7,7): the goal column.
    session
        .move_player(Direction::Right)
        .expect("move should start");
    session.finish_move();
    assert!(!session.won());

    let pending = session
        .move_player(Direction::Down)
        .expect("move should start");
    assert_eq!(pending.target, Position::new(7, 7));
    assert!(!session.won(), "win is committed on animation completion");

    session.finish_move();
    assert!(session.won());
    assert_eq!(session.win_count(), 1);
    assert_eq!(session.state(), SessionState::Won);

    // A second completion must not double-count.
    session.finish_move();
    assert_eq!(session.win_count(), 1);
}

#[test]
fn moves_are_rejected_after_winning() {
    let mut session = ready_session(open_board("lvl-1"));
    session.move_player(Direction::Right).expect("move");
    session.finish_move();
    session.move_player(Direction::Down).expect("move");
    session.finish_move();
    assert!(session.won());

    let position = session.player();
    assert!(session.move_player(Direction::Left).is_none());
    assert_eq!(session.player(), position);
    assert!(session.won());
    assert!(!session.animating());
}

#[test]
fn reset_mid_game_repositions_on_the_same_board() {
    let mut session = ready_session(open_board("lvl-1"));
    session.move_player(Direction::Right).expect("move");
    session.finish_move();

    assert_eq!(session.reset(), ResetOutcome::Repositioned);
    assert_eq!(session.player(), Position::new(1, 1));
    assert_eq!(session.state(), SessionState::Ready);
    assert_eq!(
        session.board().map(|b| b.level_id().to_string()),
        Some("lvl-1".to_string())
    );
}

#[test]
fn reset_after_win_requests_a_fresh_level() {
    let mut session = ready_session(open_board("lvl-1"));
    session.move_player(Direction::Right).expect("move");
    session.finish_move();
    session.move_player(Direction::Down).expect("move");
    session.finish_move();
    assert!(session.won());

    let token = match session.reset() {
        ResetOutcome::NewLevel(token) => token,
        other => panic!("expected a new level request, got {:?}", other),
    };
    assert_eq!(session.state(), SessionState::Loading);

    session.apply_level_outcome(token, Ok(open_board("lvl-2")));
    assert_eq!(session.state(), SessionState::Ready);
    assert!(!session.won());
    assert_eq!(session.win_count(), 1, "win count survives the new level");
    assert_eq!(
        session.board().map(|b| b.level_id().to_string()),
        Some("lvl-2".to_string())
    );
}

#[test]
fn reset_without_a_board_is_ignored() {
    let mut session = Session::new(Difficulty::Easy);
    assert_eq!(session.reset(), ResetOutcome::Ignored);
}

#[test]
fn stale_success_is_discarded_in_either_arrival_order() {
    // Newer-first arrival.
    let mut session = Session::new(Difficulty::Easy);
    let first = session.begin_request(Difficulty::Easy);
    let second = session.begin_request(Difficulty::Hard);

    session.apply_level_outcome(second, Ok(open_board("newer")));
    session.apply_level_outcome(first, Ok(open_board("older")));
    assert_eq!(
        session.board().map(|b| b.level_id().to_string()),
        Some("newer".to_string())
    );

    // Older-first arrival.
    let mut session = Session::new(Difficulty::Easy);
    let first = session.begin_request(Difficulty::Easy);
    let second = session.begin_request(Difficulty::Hard);

    session.apply_level_outcome(first, Ok(open_board("older")));
    assert_eq!(session.state(), SessionState::Loading, "stale success ignored");
    assert!(session.board().is_none());

    session.apply_level_outcome(second, Ok(open_board("newer")));
    assert_eq!(
        session.board().map(|b| b.level_id().to_string()),
        Some("newer".to_string())
    );
}

#[test]
fn stale_failure_is_discarded_like_stale_success() {
    let mut session = Session::new(Difficulty::Easy);
    let first = session.begin_request(Difficulty::Easy);
    let second = session.begin_request(Difficulty::Hard);

    session.apply_level_outcome(first, Err("connection refused".to_string()));
    assert_eq!(session.state(), SessionState::Loading);
    assert!(session.snapshot().error.is_none());

    session.apply_level_outcome(second, Ok(open_board("newer")));
    assert_eq!(session.state(), SessionState::Ready);
}

#[test]
fn current_failure_clears_the_board_and_surfaces_the_message() {
    let mut session = ready_session(open_board("lvl-1"));
    let token = session.begin_request(Difficulty::Hard);

    session.apply_level_outcome(token, Err("level service unavailable".to_string()));
    assert_eq!(session.state(), SessionState::Idle);
    assert!(session.board().is_none());
    assert_eq!(
        session.snapshot().error.as_deref(),
        Some("level service unavailable")
    );
    // Difficulty sticks so the player can retry the same selection.
    assert_eq!(session.difficulty(), Difficulty::Hard);
    assert!(session.change_difficulty(Difficulty::Hard).is_some());
}

#[test]
fn duplicate_difficulty_request_is_suppressed_while_in_flight() {
    let mut session = Session::new(Difficulty::Easy);
    let _ = session.begin_request(Difficulty::Easy);

    assert!(session.change_difficulty(Difficulty::Easy).is_none());
    assert!(session.change_difficulty(Difficulty::Medium).is_some());
}

#[test]
fn snapshot_reflects_every_published_field() {
    let mut session = ready_session(open_board("lvl-1"));
    let pending = session.move_player(Direction::Right).expect("move");

    let snapshot = session.snapshot();
    assert_eq!(snapshot.state, SessionState::Ready);
    assert_eq!(snapshot.player, Some(Position::new(7, 1)));
    assert!(!snapshot.won);
    assert_eq!(snapshot.win_count, 0);
    assert!(!snapshot.loading);
    assert!(snapshot.error.is_none());
    assert!(
        (snapshot.animation_duration_seconds - pending.duration.as_secs_f32()).abs() < 1e-6
    );
}
