//! End-to-end decoding of realistic host streams.
//!
//! These feed whole multi-line streams through the public decoders, the same
//! way the turn loop does, and check the records that come out.

use slither_protocol::{
    GameConfig, Point, ProtocolError, SnakeId, SnakeState, decode_config, decode_turn,
    encode_config, encode_snake, encode_turn,
};

// =========================================================================
// Helpers
// =========================================================================

fn lines(text: &str) -> Vec<&str> {
    text.lines().collect()
}

fn bounded_config(lifetime: u32, value: f64) -> GameConfig {
    let setup = format!("20 20\n{lifetime} {value}\n1 0\n50 0\n");
    decode_config(lines(&setup)).unwrap()
}

// =========================================================================
// Setup and first turn
// =========================================================================

#[test]
fn test_two_snakes_no_food() {
    let stream = "20 20\n0 1.0\n2 1\n50 1000\n0\n1 0 0 3 5 5 5 6 5 7\n2 0 0 1 10 10\n";
    let mut it = lines(stream).into_iter();

    let cfg = decode_config(&mut it).unwrap();
    assert_eq!(cfg.snake_count, 2);
    assert_eq!(cfg.my_id, SnakeId(1));

    let snap = decode_turn(&mut it, &cfg, 1).unwrap();
    assert_eq!(snap.turn, 1);
    assert!(snap.food.is_empty());
    assert_eq!(snap.snakes.len(), 2);

    let me = snap.snake(SnakeId(1)).unwrap();
    assert_eq!(me.len(), 3);
    assert_eq!(
        me.body,
        vec![Point::new(5, 5), Point::new(5, 6), Point::new(5, 7)]
    );
    assert_eq!(snap.snake(SnakeId(2)).unwrap().head(), Some(Point::new(10, 10)));

    // Exactly the turn's lines were consumed.
    assert_eq!(it.next(), None);
}

#[test]
fn test_off_board_food_is_skipped_and_turn_completes() {
    let stream = "20 20\n0 1.0\n1 0\n50 0\n3\n2.0 1 1\n5.0 100 100\n4.0 19 19\n0 0 0 1 3 3\n";
    let mut it = lines(stream).into_iter();
    let cfg = decode_config(&mut it).unwrap();

    let snap = decode_turn(&mut it, &cfg, 1).unwrap();
    let positions: Vec<Point> = snap.food.iter().map(|f| f.position).collect();
    assert_eq!(positions, vec![Point::new(1, 1), Point::new(19, 19)]);
    assert_eq!(snap.snakes.len(), 1);
    assert_eq!(it.next(), None);
}

#[test]
fn test_zero_width_is_range_error() {
    let err = decode_config(lines("0 20\n0 1.0\n2 1\n50 1000\n")).unwrap_err();
    match err {
        ProtocolError::Range { field, value } => {
            assert_eq!(field, "width");
            assert_eq!(value, 0);
        }
        other => panic!("expected range error, got {other:?}"),
    }
}

#[test]
fn test_stream_ending_after_setup_is_closed() {
    let mut it = lines("20 20\n0 1.0\n2 1\n50 1000\n").into_iter();
    let cfg = decode_config(&mut it).unwrap();
    let err = decode_turn(&mut it, &cfg, 1).unwrap_err();
    assert!(err.is_stream_closed());
}

#[test]
fn test_turn_index_is_passed_through_in_sequence() {
    let mut text = String::from("5 5\n0 1\n1 7\n10 0\n");
    for _ in 0..4 {
        text.push_str("0\n7 0 0 1 2 2\n");
    }
    let mut it = lines(&text).into_iter();
    let cfg = decode_config(&mut it).unwrap();

    let mut turn = 0;
    let mut seen = Vec::new();
    loop {
        match decode_turn(&mut it, &cfg, turn + 1) {
            Ok(snap) => {
                turn += 1;
                seen.push(snap.turn);
            }
            Err(e) if e.is_stream_closed() => break,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert_eq!(seen, vec![1, 2, 3, 4]);
}

// =========================================================================
// Food decay
// =========================================================================

#[test]
fn test_decay_is_monotone_in_remaining_lifetime() {
    for (lifetime, value) in [(10, 5.0), (7, 3.0), (100, 12.0), (1, 1.0)] {
        let cfg = bounded_config(lifetime, value);
        let mut previous = f64::NEG_INFINITY;
        for step in 0..=(lifetime * 4) {
            let remaining = f64::from(step) / 4.0;
            let decayed = cfg.decayed_value(remaining);
            assert!(
                decayed >= previous,
                "value dropped from {previous} to {decayed} at remaining={remaining}"
            );
            previous = decayed;
        }
        assert_eq!(cfg.decayed_value(f64::from(lifetime)), value);
    }
}

#[test]
fn test_decay_through_the_decoder() {
    let cfg = bounded_config(10, 4.0);
    let snap = decode_turn(
        lines("3\n10 0 0\n5 1 1\n0 2 2\n0 0 0 1 9 9\n"),
        &cfg,
        1,
    )
    .unwrap();
    let values: Vec<f64> = snap.food.iter().map(|f| f.value).collect();
    assert_eq!(values, vec![4.0, 0.0, -4.0]);
}

#[test]
fn test_unbounded_food_keeps_base_value() {
    let cfg = decode_config(lines("20 20\n0 3\n1 0\n50 0\n")).unwrap();
    assert_eq!(cfg.food_lifetime, None);
    let snap = decode_turn(
        lines("3\n0 0 0\n1.5 1 1\n99999 2 2\n0 0 0 1 9 9\n"),
        &cfg,
        1,
    )
    .unwrap();
    assert!(snap.food.iter().all(|f| f.value == 3.0));
}

// =========================================================================
// Encode → decode
// =========================================================================

#[test]
fn test_snake_segments_survive_encode_and_decode() {
    let cfg = decode_config(lines("30 30\n0 1\n1 4\n10 0\n")).unwrap();
    let bodies = [
        vec![Point::new(0, 0)],
        vec![Point::new(3, 4), Point::new(3, 5), Point::new(4, 5), Point::new(5, 5)],
        (0..29).map(|y| Point::new(7, 29 - y)).collect(),
    ];

    for body in bodies {
        let snake = SnakeState {
            id: SnakeId(4),
            kills: 2,
            deaths: 1,
            body: body.clone(),
        };
        let line = encode_snake(&snake);
        let snap = decode_turn(["0", line.as_str()], &cfg, 1).unwrap();
        assert_eq!(snap.snakes[0].body, body);
        assert_eq!(snap.snakes[0], snake);
    }
}

#[test]
fn test_encoded_stream_decodes_to_same_records() {
    let text = "12 9\n6 2\n2 3\n40 150\n2\n6 1 2\n3 4 5\n3 1 0 2 0 0 1 0\n5 0 2 0\n";
    let mut it = lines(text).into_iter();
    let cfg = decode_config(&mut it).unwrap();
    let snap = decode_turn(&mut it, &cfg, 1).unwrap();

    let mut replay: Vec<String> = encode_config(&cfg);
    replay.extend(encode_turn(&snap));
    let mut it = replay.iter();
    assert_eq!(decode_config(&mut it).unwrap(), cfg);
    assert_eq!(decode_turn(&mut it, &cfg, 1).unwrap(), snap);
}

#[test]
fn test_snapshot_serializes_to_json() {
    let cfg = decode_config(lines("5 5\n0 1\n1 0\n10 0\n")).unwrap();
    let snap = decode_turn(lines("1\n3 1 1\n0 0 0 1 2 2\n"), &cfg, 1).unwrap();
    let json = serde_json::to_value(&snap).unwrap();
    assert_eq!(json["turn"], 1);
    assert_eq!(json["snakes"][0]["id"], 0);
    assert_eq!(json["food"][0]["position"]["x"], 1);
}
