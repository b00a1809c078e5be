//! Trail cores: the record format, invariant checker, and z-translation
//! canonicalization (§3, §6, §8).

use std::io::{BufRead, Write};

use crate::error::{Result, TrailError};
use crate::position::{COLUMNS, ROWS, SLICES};
use crate::state::TroikaState;
use crate::weight::Weight;

/// A `k`-round trail core: `2*(k-1)` states (the pairs around each Λ), the
/// minimum-reverse weight of the first state, the minimum-direct weight of
/// the last, and `k-2` Sbox transition weights for the ST boundaries
/// between them.
#[derive(Clone, Debug, PartialEq)]
pub struct TrailCore {
    pub states: Vec<TroikaState>,
    pub w_min_rev: Weight,
    pub transition_weights: Vec<Weight>,
    pub w_min_dir: Weight,
}

impl TrailCore {
    pub fn nr_rounds(&self) -> usize {
        self.states.len() / 2 + 1
    }

    pub fn total_weight(&self) -> Weight {
        let mut total = self.w_min_rev + self.w_min_dir;
        for w in &self.transition_weights {
            total += *w;
        }
        total
    }

    /// Verify invariants 1-5 of §3/§8. Returns the first violation found.
    pub fn check(&self) -> Result<()> {
        let k = self.nr_rounds();
        if self.states.len() != 2 * (k - 1) {
            return Err(TrailError::InvariantViolation {
                round: 0,
                detail: format!("expected {} states for {k} rounds, got {}", 2 * (k - 1), self.states.len()),
            });
        }
        if self.transition_weights.len() != k.saturating_sub(2) {
            return Err(TrailError::InvariantViolation {
                round: 0,
                detail: format!(
                    "expected {} transition weights for {k} rounds, got {}",
                    k.saturating_sub(2),
                    self.transition_weights.len()
                ),
            });
        }

        for lane_state in &self.states {
            for lane in lane_state.lanes.iter() {
                if lane.lane_1 & lane.lane_2 != 0 {
                    return Err(TrailError::InvariantViolation {
                        round: 0,
                        detail: "lane_1 & lane_2 != 0".to_string(),
                    });
                }
            }
        }

        for i in 0..(k - 1) {
            let a = self.states[2 * i];
            let b = self.states[2 * i + 1];
            if a.l() != b {
                return Err(TrailError::InvariantViolation {
                    round: i,
                    detail: "Λ(a) != b".to_string(),
                });
            }
        }

        for i in 0..k.saturating_sub(2) {
            let b = self.states[2 * i + 1];
            let c = self.states[2 * i + 2];
            let active_b = b.active_state();
            let active_c = c.active_state();
            if active_b != active_c {
                return Err(TrailError::InvariantViolation {
                    round: i,
                    detail: "active tryte positions differ across ST boundary".to_string(),
                });
            }
            let mut measured = Weight::ZERO;
            let ok = crate::sbox::sbox().are_st_compatible(
                active_tryte_pairs(&b, &c),
                &mut measured,
            );
            if !ok {
                return Err(TrailError::InvariantViolation {
                    round: i,
                    detail: "ST-incompatible transition".to_string(),
                });
            }
            if measured != self.transition_weights[i] {
                return Err(TrailError::InvariantViolation {
                    round: i,
                    detail: format!(
                        "stored transition weight {} does not match measured {}",
                        self.transition_weights[i], measured
                    ),
                });
            }
        }

        let expected_rev = Weight::from_active_trytes(self.states[0].get_nr_active_trytes());
        if expected_rev != self.w_min_rev {
            return Err(TrailError::InvariantViolation {
                round: 0,
                detail: format!("wMinRev {} != 2*activeTrytes(a1) = {expected_rev}", self.w_min_rev),
            });
        }
        let last = *self.states.last().expect("nonempty states");
        let expected_dir = Weight::from_active_trytes(last.get_nr_active_trytes());
        if expected_dir != self.w_min_dir {
            return Err(TrailError::InvariantViolation {
                round: k - 1,
                detail: format!("wMinDir {} != 2*activeTrytes(last) = {expected_dir}", self.w_min_dir),
            });
        }

        Ok(())
    }

    fn translate(&self, dz: u8) -> TrailCore {
        TrailCore {
            states: self.states.iter().map(|s| s.translate(dz)).collect(),
            w_min_rev: self.w_min_rev,
            transition_weights: self.transition_weights.clone(),
            w_min_dir: self.w_min_dir,
        }
    }

    fn sort_key(&self) -> Vec<(u32, u32)> {
        self.states.iter().flat_map(|s| s.lanes.iter().map(|l| (l.lane_1, l.lane_2))).collect()
    }

    /// The canonical z-translation: the `dz` in `0..27` producing the
    /// lexicographically smallest sequence of lane masks, ties resolved to
    /// the smallest `dz` (scanning ascending and only replacing on strict
    /// `<` preserves this automatically).
    pub fn make_canonical(&self) -> TrailCore {
        let mut best = self.translate(0);
        let mut best_key = best.sort_key();
        for dz in 1..SLICES as u8 {
            let candidate = self.translate(dz);
            let key = candidate.sort_key();
            if key < best_key {
                best_key = key;
                best = candidate;
            }
        }
        best
    }
}

fn active_tryte_pairs(b: &TroikaState, c: &TroikaState) -> Vec<(u8, u8)> {
    let active = b.active_state();
    let mut pairs = Vec::new();
    for z in 0..SLICES as u8 {
        for y in 0..ROWS as u8 {
            for x_tryte in 0..(COLUMNS / 3) as u8 {
                if active.is_tryte_active(x_tryte, y, z) {
                    pairs.push((b.get_tryte(x_tryte, y, z), c.get_tryte(x_tryte, y, z)));
                }
            }
        }
    }
    pairs
}

/// Whitespace/newline-agnostic token source over a trail record stream,
/// tolerant of blank lines and trailing whitespace per §6.
struct TokenReader<R: BufRead> {
    reader: R,
    buffer: std::collections::VecDeque<String>,
}

impl<R: BufRead> TokenReader<R> {
    fn new(reader: R) -> Self {
        TokenReader { reader, buffer: std::collections::VecDeque::new() }
    }

    fn next_token(&mut self) -> Option<String> {
        loop {
            if let Some(tok) = self.buffer.pop_front() {
                return Some(tok);
            }
            let mut line = String::new();
            let n = self.reader.read_line(&mut line).ok()?;
            if n == 0 {
                return None;
            }
            self.buffer.extend(line.split_whitespace().map(str::to_string));
        }
    }

    fn next_hex_i64(&mut self) -> std::result::Result<Option<i64>, TrailError> {
        match self.next_token() {
            None => Ok(None),
            Some(tok) => i64::from_str_radix(&tok, 16)
                .map(Some)
                .map_err(|_| TrailError::MalformedRecord { context: tok }),
        }
    }

    fn expect_hex_i64(&mut self) -> std::result::Result<i64, TrailError> {
        self.next_hex_i64()?.ok_or_else(|| TrailError::MalformedRecord { context: "unexpected end of stream".into() })
    }

    fn expect_hex_u32(&mut self) -> std::result::Result<u32, TrailError> {
        let tok = self.next_token().ok_or_else(|| TrailError::MalformedRecord { context: "unexpected end of stream".into() })?;
        u32::from_str_radix(&tok, 16).map_err(|_| TrailError::MalformedRecord { context: tok })
    }
}

/// Outcome of reading one record from a trail stream.
pub enum LoadOutcome {
    Trail(TrailCore),
    Eof,
}

/// Load a single trail record. Returns `LoadOutcome::Eof` once the stream is
/// exhausted between records; a record that starts but does not complete is
/// a [`TrailError::MalformedRecord`].
pub fn load_trail<R: BufRead>(reader: &mut R) -> Result<LoadOutcome> {
    let mut tokens = TokenReader::new(reader);
    let nr_rounds = match tokens.next_hex_i64()? {
        None => return Ok(LoadOutcome::Eof),
        Some(v) => v as usize,
    };
    if nr_rounds < 2 {
        return Err(TrailError::MalformedRecord { context: format!("nrRounds={nr_rounds}") });
    }
    let w_min_rev = Weight::new(tokens.expect_hex_i64()?, tokens.expect_hex_i64()?);

    let mut transition_weights = Vec::with_capacity(nr_rounds.saturating_sub(2));
    for _ in 0..nr_rounds.saturating_sub(2) {
        transition_weights.push(Weight::new(tokens.expect_hex_i64()?, tokens.expect_hex_i64()?));
    }

    let w_min_dir = Weight::new(tokens.expect_hex_i64()?, tokens.expect_hex_i64()?);

    let nr_states = 2 * (nr_rounds - 1);
    let mut states = Vec::with_capacity(nr_states);
    for _ in 0..nr_states {
        let mut state = TroikaState::ZERO;
        for lane in state.lanes.iter_mut() {
            let m1 = tokens.expect_hex_u32()?;
            let m2 = tokens.expect_hex_u32()?;
            *lane = crate::lane::TroikaLane::from_masks(m1, m2);
        }
        states.push(state);
    }

    Ok(LoadOutcome::Trail(TrailCore { states, w_min_rev, transition_weights, w_min_dir }))
}

/// Append `trail` to `writer` in the textual record format of §6.
pub fn save_trail<W: Write>(writer: &mut W, trail: &TrailCore) -> Result<()> {
    writeln!(writer, "{:x} {:x} {:x}", trail.nr_rounds(), trail.w_min_rev.integer, trail.w_min_rev.log_part)?;
    for w in &trail.transition_weights {
        writeln!(writer, "{:x} {:x}", w.integer, w.log_part)?;
    }
    writeln!(writer, "{:x} {:x}", trail.w_min_dir.integer, trail.w_min_dir.log_part)?;
    for state in &trail.states {
        for lane in state.lanes.iter() {
            write!(writer, "{:x} {:x} ", lane.lane_1, lane.lane_2)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Read every trail in `reader`, canonicalize and deduplicate via an
/// ordered set, and write the deduplicated, canonical trails to `writer`.
/// Malformed records and invariant violations are logged and dropped;
/// enumeration continues.
pub fn canonicalize_and_dedup<R: BufRead, W: Write>(reader: &mut R, writer: &mut W) -> Result<usize> {
    use std::collections::BTreeSet;

    let mut seen: BTreeSet<Vec<(u32, u32)>> = BTreeSet::new();
    let mut canonical_trails = Vec::new();

    loop {
        match load_trail(reader) {
            Ok(LoadOutcome::Eof) => break,
            Ok(LoadOutcome::Trail(trail)) => {
                if let Err(e) = trail.check() {
                    tracing::warn!(error = %e, "dropping trail that failed invariant check");
                    continue;
                }
                let canonical = trail.make_canonical();
                let key = canonical.sort_key();
                if seen.insert(key) {
                    canonical_trails.push(canonical);
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "dropping malformed trail record");
                continue;
            }
        }
    }

    for trail in &canonical_trails {
        save_trail(writer, trail)?;
    }
    writer.flush()?;
    Ok(canonical_trails.len())
}

/// A human-readable histogram of trail counts per integer-weight bucket,
/// grouped by trail length (number of rounds). The `.txt` sidecar to a
/// canonicalization pass (§6).
pub fn weight_histogram(trails: &[TrailCore]) -> String {
    use std::collections::BTreeMap;
    let mut buckets: BTreeMap<(usize, i64), usize> = BTreeMap::new();
    for trail in trails {
        let bucket = trail.total_weight().integer;
        *buckets.entry((trail.nr_rounds(), bucket)).or_default() += 1;
    }
    let mut out = String::new();
    for ((rounds, weight), count) in buckets {
        out.push_str(&format!("rounds={rounds} weight>={weight} count={count}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lane::TroikaLane;

    fn round_trip_state(dz: u8) -> TrailCore {
        let mut a = TroikaState::ZERO;
        a.set_trit(0, 0, 0, 1);
        a = a.translate(dz);
        let b = a.l();
        TrailCore {
            states: vec![a, b],
            w_min_rev: Weight::from_active_trytes(a.get_nr_active_trytes()),
            transition_weights: vec![],
            w_min_dir: Weight::from_active_trytes(b.get_nr_active_trytes()),
        }
    }

    #[test]
    fn check_passes_for_a_well_formed_two_round_trail() {
        let trail = round_trip_state(0);
        assert!(trail.check().is_ok());
    }

    #[test]
    fn check_fails_when_w_min_rev_is_wrong() {
        let mut trail = round_trip_state(0);
        trail.w_min_rev = Weight::new(999, 0);
        assert!(trail.check().is_err());
    }

    #[test]
    fn canonicalization_collapses_translations_to_the_same_trail() {
        let t1 = round_trip_state(0).make_canonical();
        let t2 = round_trip_state(13).make_canonical();
        assert_eq!(t1, t2);
    }

    #[test]
    fn canonicalization_is_idempotent() {
        let once = round_trip_state(13).make_canonical();
        let twice = once.make_canonical();
        assert_eq!(once, twice);
    }

    #[test]
    fn save_then_load_round_trips() {
        let trail = round_trip_state(5);
        let mut buf = Vec::new();
        save_trail(&mut buf, &trail).unwrap();
        let mut cursor = std::io::Cursor::new(buf);
        match load_trail(&mut cursor).unwrap() {
            LoadOutcome::Trail(loaded) => assert_eq!(loaded, trail),
            LoadOutcome::Eof => panic!("expected a trail, got EOF"),
        }
        match load_trail(&mut cursor).unwrap() {
            LoadOutcome::Eof => {}
            LoadOutcome::Trail(_) => panic!("expected EOF on second read"),
        }
    }

    #[test]
    fn malformed_record_surfaces_as_an_error() {
        let mut cursor = std::io::Cursor::new(b"2 1 0\nnot-hex 0\n".to_vec());
        assert!(load_trail(&mut cursor).is_err());
    }

    #[test]
    fn loader_tolerates_blank_lines() {
        let trail = round_trip_state(0);
        let mut buf = Vec::new();
        save_trail(&mut buf, &trail).unwrap();
        let mut padded = b"\n\n  \n".to_vec();
        padded.extend(buf);
        padded.extend(b"\n\n");
        let mut cursor = std::io::Cursor::new(padded);
        match load_trail(&mut cursor).unwrap() {
            LoadOutcome::Trail(loaded) => assert_eq!(loaded, trail),
            LoadOutcome::Eof => panic!("expected a trail"),
        }
    }

    #[test]
    fn lane_masks_are_mutually_exclusive_after_load() {
        let lane = TroikaLane::from_masks(0b101, 0b010);
        assert_eq!(lane.lane_1 & lane.lane_2, 0);
    }
}
