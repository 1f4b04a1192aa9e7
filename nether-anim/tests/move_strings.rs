//! End-to-end checks over realistic move strings

use std::sync::Arc;

use nether_anim::{
    Cursor, DecodeErrorKind, Script, decode, encode, encode_to_string, encoded_length, mnemonic,
};

/// Move strings in the shapes the game data uses
const MOVES: &[&str] = &[
    "brA20-bs200B200-bf200C200",
    "brA20-bs200B200-bf200C200-d1B10",
    "s5cp1m2bs64A100-s1mx3B10-C34",
    "x=160y=190A1-s12B4-x+6C4-x+6cp15D6-x-2E8-F12",
    "smo3A1-m14mx-20my5B3-mdC3-md14D40-smfE1",
    "fA3-rB3-brbs100bf0C6-D6-d0E1",
    "y-20A2-y-10B2-y=190C4-y10D4",
    "A0-B0-C5",
];

#[test]
fn test_all_moves_round_trip() {
    for &text in MOVES {
        let script = decode(text).unwrap_or_else(|e| panic!("{text}: {e}"));
        let canonical = encode_to_string(&script);
        assert_eq!(canonical, text);
        assert_eq!(decode(&canonical).unwrap(), script);
        assert_eq!(encoded_length(&script), canonical.len());
    }
}

#[test]
fn test_encode_into_exact_buffer() {
    for &text in MOVES {
        let script = decode(text).unwrap();
        let mut buf = vec![0u8; encoded_length(&script)];
        let written = encode(&script, &mut buf).unwrap();
        assert_eq!(&buf[..written], text.as_bytes());
    }
}

#[test]
fn test_rejects_garbage_move() {
    let err = decode("x+4zcubs21l50zp").unwrap_err();
    assert_eq!(err.kind, DecodeErrorKind::InvalidTag);
    assert_eq!(err.to_string(), "invalid tag at byte 3");
}

#[test]
fn test_truncated_moves_never_panic() {
    for &text in MOVES {
        for end in 0..=text.len() {
            match decode(&text[..end]) {
                Ok(script) => assert!(script.frame_count() >= 1),
                Err(err) => assert!(err.offset <= end, "{:?} past end {end}", err),
            }
        }
    }
}

#[test]
fn test_every_move_finishes_or_loops_boundedly() {
    for &text in MOVES {
        let script = decode(text).unwrap();
        let mut cursor = Cursor::new(&script);
        let mut changes = 0;
        for tick in 0..5000 {
            if cursor.advance(tick) {
                changes += 1;
            }
        }
        assert!(changes >= 1, "{text} never entered a frame");
        let loops = script.frames().iter().any(|f| f.has_tag(mnemonic::JUMP));
        assert_eq!(cursor.is_finished(), !loops, "{text}");
    }
}

#[test]
fn test_shared_script_many_cursors() {
    let script: Arc<Script> = Arc::new(decode(MOVES[0]).unwrap());

    let handles: Vec<_> = (0..4u32)
        .map(|offset| {
            let script = Arc::clone(&script);
            std::thread::spawn(move || {
                let mut cursor = Cursor::starting_at(&script, offset * 10);
                let mut frames = Vec::new();
                for tick in 0..500 {
                    if cursor.advance(tick) {
                        frames.push(cursor.current_frame());
                    }
                }
                (frames, cursor.is_finished())
            })
        })
        .collect();

    for handle in handles {
        let (frames, finished) = handle.join().unwrap();
        assert_eq!(frames, vec![0, 1, 2]);
        assert!(finished);
    }
}
